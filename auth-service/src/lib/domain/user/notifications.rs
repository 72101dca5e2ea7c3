use chrono::DateTime;
use chrono::Utc;
use uuid::Uuid;

use crate::domain::user::models::User;

/// Request to send a mailbox verification link to a newly registered user.
///
/// Carries the verification token; the sender decides how the link is built
/// and delivered.
#[derive(Debug, Clone)]
pub struct VerificationRequested {
    pub notification_id: String,
    pub user_id: String,
    pub email: String,
    pub token: String,
    pub requested_at: DateTime<Utc>,
}

impl VerificationRequested {
    /// Create a new verification request for a user.
    ///
    /// # Arguments
    /// * `user` - User that was registered
    /// * `token` - Signed email-verification token
    pub fn new(user: &User, token: String) -> Self {
        Self {
            notification_id: Uuid::new_v4().to_string(),
            user_id: user.id.to_string(),
            email: user.email.as_str().to_string(),
            token,
            requested_at: Utc::now(),
        }
    }
}
