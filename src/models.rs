use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Bearer token claims. Tokens are issued by the identity service.
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub user_id: u64,
    pub sub: String,
    pub role: u8, // role id
    pub exp: usize,

    /// Present only if this user is linked to an employee record
    pub employee_id: Option<u64>,
}

/// Outcome of a create command; validation failures are reported here
/// instead of as an error.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[schema(example = json!({
    "success": true,
    "message": "Allocations Successful",
    "id": null,
    "errors": []
}))]
pub struct CommandResponse {
    pub success: bool,
    pub message: String,
    pub id: Option<u64>,
    pub errors: Vec<String>,
}

impl CommandResponse {
    pub fn succeeded(message: impl Into<String>, id: Option<u64>) -> Self {
        Self {
            success: true,
            message: message.into(),
            id,
            errors: Vec::new(),
        }
    }

    pub fn failed(message: impl Into<String>, errors: Vec<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
            id: None,
            errors,
        }
    }
}
