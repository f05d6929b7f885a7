use chrono::{DateTime, Utc};

/// Account as seen by the identity service.
///
/// Unlike the stored record this keeps `password_hash`, so it never leaves
/// the application layer.
#[derive(Debug, Clone)]
pub struct User {
    pub id: i32,
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub is_active: bool,
    pub last_login_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
