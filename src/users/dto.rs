use serde::{Deserialize, Serialize};

/// Request body for `PUT /users/{id}`. Absent or blank fields are ignored.
#[derive(Debug, Default, Deserialize)]
pub struct UpdateUserRequest {
    pub name: Option<String>,
    pub email: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}
