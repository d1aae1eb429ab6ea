/// User domain type
use super::ids::UserId;
use chrono::Utc;
use serde::{Deserialize, Serialize};

/// User account
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// Unique user identifier
    pub id: UserId,

    /// Login email, unique across accounts
    pub email: String,

    /// Account creation timestamp (RFC 3339 string)
    pub created_at: String,
}

impl User {
    /// Create a new user with a generated ID
    pub fn new(email: impl Into<String>) -> Self {
        Self {
            id: UserId::generate(),
            email: email.into(),
            created_at: Utc::now().to_rfc3339(),
        }
    }
}
