use serde::{Deserialize, Serialize};

/// A full account record as returned by the backend.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub username: String,
    pub email: String,
    pub is_active: bool,
    pub role: String,
    pub is_subscribed: bool,
}

/// Slim account record returned by user search.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserSummary {
    pub id: i64,
    pub username: String,
    pub email: String,
}

impl UserSummary {
    /// "username <email>" for list rows
    pub fn display(&self) -> String {
        format!("{} <{}>", self.username, self.email)
    }
}

/// A project participant as embedded in membership responses.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Participant {
    pub id: i64,
    pub username: String,
}
