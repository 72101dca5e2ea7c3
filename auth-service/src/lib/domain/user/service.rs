use std::sync::Arc;

use async_trait::async_trait;
use auth::Authenticator;
use auth::TokenKind;
use chrono::Duration;

use crate::domain::auth::CredentialAuthenticator;
use crate::domain::user::models::CreateUserCommand;
use crate::domain::user::models::EmailAddress;
use crate::domain::user::models::Principal;
use crate::domain::user::models::UpdateUserCommand;
use crate::domain::user::models::User;
use crate::domain::user::models::UserId;
use crate::domain::user::notifications::VerificationRequested;
use crate::user::errors::UserError;
use crate::user::ports::NotificationSender;
use crate::user::ports::UserRepository;
use crate::user::ports::UserServicePort;

/// Domain service implementation for user operations.
///
/// Concrete implementation of UserServicePort with dependency injection.
pub struct UserService<UR, NS>
where
    UR: UserRepository,
    NS: NotificationSender,
{
    repository: Arc<UR>,
    notification_sender: Arc<NS>,
    authenticator: Arc<Authenticator>,
    credentials: CredentialAuthenticator<UR>,
    verification_ttl: Duration,
}

impl<UR, NS> UserService<UR, NS>
where
    UR: UserRepository,
    NS: NotificationSender,
{
    /// Create a new user service with injected dependencies.
    ///
    /// # Arguments
    /// * `repository` - User persistence implementation
    /// * `notification_sender` - Outbound notification implementation
    /// * `authenticator` - Shared hasher and token codec
    /// * `verification_ttl` - Validity window of email-verification tokens
    pub fn new(
        repository: Arc<UR>,
        notification_sender: Arc<NS>,
        authenticator: Arc<Authenticator>,
        verification_ttl: Duration,
    ) -> Self {
        let credentials =
            CredentialAuthenticator::new(Arc::clone(&repository), Arc::clone(&authenticator));

        Self {
            repository,
            notification_sender,
            authenticator,
            credentials,
            verification_ttl,
        }
    }

    /// Queue the verification email on a detached task.
    fn request_verification(&self, user: &User) {
        let token = match self.authenticator.issue_token(
            user.id,
            user.role,
            TokenKind::EmailVerification,
            self.verification_ttl,
        ) {
            Ok(token) => token,
            Err(e) => {
                tracing::error!(
                    user_id = %user.id,
                    error = %e,
                    "Failed to issue verification token"
                );
                return;
            }
        };

        let notification = VerificationRequested::new(user, token);
        let sender = Arc::clone(&self.notification_sender);

        tokio::spawn(async move {
            if let Err(e) = sender.send_verification(&notification).await {
                tracing::error!(
                    user_id = %notification.user_id,
                    error = %e,
                    "Failed to send verification notification"
                );
            }
        });
    }
}

#[async_trait]
impl<UR, NS> UserServicePort for UserService<UR, NS>
where
    UR: UserRepository,
    NS: NotificationSender,
{
    async fn create_user(&self, command: CreateUserCommand) -> Result<Principal, UserError> {
        let created_user = self.credentials.register(command).await?;

        self.request_verification(&created_user);

        Ok(created_user.into())
    }

    async fn get_user(&self, id: &UserId) -> Result<Principal, UserError> {
        self.repository
            .find_by_id(id)
            .await?
            .map(Principal::from)
            .ok_or(UserError::NotFound(id.to_string()))
    }

    async fn get_user_by_email(&self, email: &EmailAddress) -> Result<Principal, UserError> {
        self.repository
            .find_by_email(email.as_str())
            .await?
            .map(Principal::from)
            .ok_or(UserError::NotFoundByEmail(email.to_string()))
    }

    async fn list_users(&self) -> Result<Vec<Principal>, UserError> {
        Ok(self
            .repository
            .list_all()
            .await?
            .into_iter()
            .map(Principal::from)
            .collect())
    }

    async fn update_user(
        &self,
        id: &UserId,
        command: UpdateUserCommand,
    ) -> Result<Principal, UserError> {
        let mut user = self
            .repository
            .find_by_id(id)
            .await?
            .ok_or(UserError::NotFound(id.to_string()))?;

        if let Some(new_name) = command.name {
            user.name = new_name;
        }

        if let Some(new_surname) = command.surname {
            user.surname = new_surname;
        }

        let updated_user = self.repository.update(user).await?;
        tracing::info!(user_id = %updated_user.id, "User updated");

        Ok(updated_user.into())
    }

    async fn delete_user(&self, id: &UserId) -> Result<(), UserError> {
        self.repository.delete(id).await?;
        tracing::info!(user_id = %id, "User deleted");

        Ok(())
    }

    async fn verify_email(&self, token: &str) -> Result<Principal, UserError> {
        let claims = self.authenticator.validate_token(token).map_err(|e| {
            tracing::warn!(reason = e.reason(), error = %e, "Verification token rejected");
            UserError::InvalidToken
        })?;

        if claims.kind != TokenKind::EmailVerification {
            tracing::warn!(reason = "wrong_kind", "Verification token rejected");
            return Err(UserError::InvalidToken);
        }

        let user_id = claims
            .subject()
            .and_then(|sub| UserId::from_string(sub).ok())
            .ok_or(UserError::InvalidToken)?;

        let mut user = self
            .repository
            .find_by_id(&user_id)
            .await?
            .ok_or(UserError::NotFound(user_id.to_string()))?;

        if user.is_active {
            return Ok(user.into());
        }

        user.is_active = true;
        let activated = self.repository.update(user).await?;
        tracing::info!(user_id = %activated.id, "Email verified");

        Ok(activated.into())
    }
}
