mod trip;

pub use trip::*;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub username: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub created_at: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserPublic {
    pub username: String,
    pub created_at: String,
}

impl From<User> for UserPublic {
    fn from(u: User) -> Self {
        Self {
            username: u.username,
            created_at: u.created_at,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    pub id: String,
    pub username: String,
    pub token: String,
    pub expires_at: String,
    pub created_at: String,
}

/// A saved itinerary from a user's history.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TripRecord {
    pub id: i64,
    pub username: String,
    pub destination: String,
    pub itinerary: Itinerary,
    pub notes: String,
    pub created_at: String,
}
