//! Authentication payloads.
//!
//! The login response keys match what the web client stores in its session:
//! `token`, `maNguoiDung`, `tenNguoiDung`, `email` and `vaiTros`.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use coursereg_auth::Role;

use crate::ids::{LecturerId, StudentId, UserId};

pub use coursereg_auth::{Claims, RefreshTokenClaims};

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct LoginRequest {
    #[validate(email)]
    #[schema(example = "admin@coursereg.edu.vn")]
    pub email: String,
    #[validate(length(min = 1))]
    #[schema(example = "password123")]
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct LoginResponse {
    /// Access token
    pub token: String,
    pub refresh_token: String,
    #[serde(rename = "maNguoiDung")]
    pub user_id: UserId,
    #[serde(rename = "tenNguoiDung")]
    pub full_name: String,
    pub email: String,
    #[serde(rename = "vaiTros")]
    pub roles: Vec<Role>,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct RefreshTokenRequest {
    #[validate(length(min = 1))]
    pub refresh_token: String,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct ChangePasswordDto {
    #[validate(length(min = 1))]
    pub current_password: String,
    #[validate(length(min = 8, message = "New password must be at least 8 characters"))]
    pub new_password: String,
}

/// The authenticated user with the profile rows linked to the account.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ProfileResponse {
    pub id: UserId,
    pub email: String,
    pub full_name: String,
    pub roles: Vec<Role>,
    pub student_id: Option<StudentId>,
    pub lecturer_id: Option<LecturerId>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}
