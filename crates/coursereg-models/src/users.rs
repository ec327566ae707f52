//! Login accounts.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

use crate::ids::UserId;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct User {
    pub id: UserId,
    pub email: String,
    pub full_name: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Row used for password checks; never serialized.
#[derive(Debug, Clone, FromRow)]
pub struct UserCredentials {
    pub id: UserId,
    pub email: String,
    pub full_name: String,
    pub password: String,
}
