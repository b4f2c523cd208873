use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
#[schema(
    example = json!({
        "id": 1000,
        "full_name": "John Doe",
        "username": "john.doe",
        "department_id": 10,
        "department_name": "Engineering",
        "default_shift_id": 1
    })
)]
pub struct Employee {
    #[schema(example = 1000)]
    pub id: u64,

    #[schema(example = "John Doe")]
    pub full_name: String,

    #[schema(example = "john.doe")]
    pub username: String,

    #[schema(example = 10, nullable = true)]
    pub department_id: Option<u64>,

    #[schema(example = "Engineering", nullable = true)]
    pub department_name: Option<String>,

    /// Shift that applies on days without an explicit schedule assignment.
    #[schema(example = 1, nullable = true)]
    pub default_shift_id: Option<u64>,
}
