//! mockall doubles for the user ports, shared by the domain unit tests.

use async_trait::async_trait;
use chrono::NaiveDate;
use chrono::Utc;
use mockall::mock;

use crate::domain::user::models::EmailAddress;
use crate::domain::user::models::PersonName;
use crate::domain::user::models::Role;
use crate::domain::user::models::User;
use crate::domain::user::models::UserId;
use crate::domain::user::notifications::VerificationRequested;
use crate::domain::user::ports::NotificationSender;
use crate::domain::user::ports::UserRepository;
use crate::user::errors::NotificationError;
use crate::user::errors::UserError;

pub const TEST_SECRET: &[u8] = b"test-secret-key-for-jwt-signing-at-least-32-bytes";

mock! {
    pub TestUserRepository {}

    #[async_trait]
    impl UserRepository for TestUserRepository {
        async fn create(&self, user: User) -> Result<User, UserError>;
        async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserError>;
        async fn find_by_email(&self, email: &str) -> Result<Option<User>, UserError>;
        async fn list_all(&self) -> Result<Vec<User>, UserError>;
        async fn update(&self, user: User) -> Result<User, UserError>;
        async fn delete(&self, id: &UserId) -> Result<(), UserError>;
    }
}

mock! {
    pub TestNotificationSender {}

    #[async_trait]
    impl NotificationSender for TestNotificationSender {
        async fn send_verification(&self, notification: &VerificationRequested) -> Result<(), NotificationError>;
    }
}

pub fn test_authenticator() -> auth::Authenticator {
    auth::Authenticator::new(TEST_SECRET, "HS256").expect("Failed to create authenticator")
}

/// A stored user whose credential is a real hash of `password`.
pub fn stored_user(email: &str, password: &str) -> User {
    User {
        id: UserId::new(),
        email: EmailAddress::new(email.to_string()).unwrap(),
        name: PersonName::new("Alice".to_string()).unwrap(),
        surname: PersonName::new("Liddell".to_string()).unwrap(),
        role: Role::User,
        date_of_birth: NaiveDate::from_ymd_opt(1990, 5, 17).unwrap(),
        password_hash: auth::PasswordHasher::new().hash(password).unwrap(),
        is_active: false,
        created_at: Utc::now(),
    }
}
