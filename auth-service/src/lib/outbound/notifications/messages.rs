use chrono::DateTime;
use chrono::Utc;
use serde::Deserialize;
use serde::Serialize;

use crate::domain::user::notifications::VerificationRequested;

/// Serializable envelope for notifications handed to the mail worker.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "message_type", rename_all = "snake_case")]
pub enum NotificationMessage {
    VerificationRequested(VerificationEmailMessage),
}

/// Everything the mail worker needs to send a verification email.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VerificationEmailMessage {
    pub notification_id: String,
    pub user_id: String,
    pub email: String,
    pub verification_link: String,
    pub requested_at: DateTime<Utc>,
}

impl VerificationEmailMessage {
    /// Build the message, appending the token to `verify_url` as a query parameter.
    pub fn new(notification: &VerificationRequested, verify_url: &str) -> Self {
        let separator = if verify_url.contains('?') { '&' } else { '?' };

        Self {
            notification_id: notification.notification_id.clone(),
            user_id: notification.user_id.clone(),
            email: notification.email.clone(),
            verification_link: format!("{verify_url}{separator}token={}", notification.token),
            requested_at: notification.requested_at,
        }
    }
}
