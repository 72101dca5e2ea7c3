use std::sync::Arc;

use auth::AuthenticationError;
use auth::Authenticator;
use chrono::Duration;
use chrono::Utc;

use crate::domain::user::models::CreateUserCommand;
use crate::domain::user::models::Principal;
use crate::domain::user::models::Role;
use crate::domain::user::models::User;
use crate::domain::user::models::UserId;
use crate::domain::user::ports::UserRepository;
use crate::user::errors::UserError;

/// Argon2id hash with default parameters that no real password is expected
/// to match. Verified against when the email is unknown.
const UNKNOWN_USER_HASH: &str =
    "$argon2id$v=19$m=19456,t=2,p=1$c29tZXNhbHRzb21lc2FsdA$AAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAA";

/// Access token handed out after a successful login.
#[derive(Debug, Clone)]
pub struct AccessGrant {
    pub principal: Principal,
    pub access_token: String,
}

/// Checks email/password pairs against the store and creates credentials.
///
/// "No such email" and "wrong password" produce the same `None`; the
/// difference only shows up in the `reason` log field.
pub struct CredentialAuthenticator<UR>
where
    UR: UserRepository,
{
    repository: Arc<UR>,
    authenticator: Arc<Authenticator>,
}

impl<UR> CredentialAuthenticator<UR>
where
    UR: UserRepository,
{
    pub fn new(repository: Arc<UR>, authenticator: Arc<Authenticator>) -> Self {
        Self {
            repository,
            authenticator,
        }
    }

    /// Look up the account a login attempt names.
    ///
    /// Unknown emails still pay for one password verification, so response
    /// timing does not reveal which accounts exist.
    async fn find_candidate(&self, email: &str, password: &str) -> Result<Option<User>, UserError> {
        let user = self.repository.find_by_email(email).await?;

        if user.is_none() {
            let _ = self
                .authenticator
                .verify_password(password, UNKNOWN_USER_HASH);
            tracing::info!(reason = "unknown_email", "Authentication rejected");
        }

        Ok(user)
    }

    /// Look up a user by email and check the password.
    ///
    /// # Returns
    /// The user on match, `None` for an unknown email or a wrong password
    ///
    /// # Errors
    /// * `Password` - Stored hash is malformed
    /// * `DatabaseError` - Database operation failed
    pub async fn authenticate(&self, email: &str, password: &str) -> Result<Option<User>, UserError> {
        let Some(user) = self.find_candidate(email, password).await? else {
            return Ok(None);
        };

        if !self
            .authenticator
            .verify_password(password, &user.password_hash)?
        {
            tracing::info!(
                user_id = %user.id,
                reason = "password_mismatch",
                "Authentication rejected"
            );
            return Ok(None);
        }

        tracing::debug!(user_id = %user.id, "Authentication succeeded");
        Ok(Some(user))
    }

    /// Authenticate and issue an access token valid for `ttl`.
    ///
    /// # Errors
    /// * `InvalidCredentials` - Unknown email or wrong password
    /// * `Password` - Stored hash is malformed
    /// * `Token` - Token could not be signed
    /// * `DatabaseError` - Database operation failed
    pub async fn login(
        &self,
        email: &str,
        password: &str,
        ttl: Duration,
    ) -> Result<AccessGrant, UserError> {
        let user = self
            .find_candidate(email, password)
            .await?
            .ok_or(UserError::InvalidCredentials)?;

        let result = self
            .authenticator
            .authenticate(password, &user.password_hash, user.id, &user.role, ttl)
            .map_err(|e| match e {
                AuthenticationError::InvalidCredentials => {
                    tracing::info!(
                        user_id = %user.id,
                        reason = "password_mismatch",
                        "Authentication rejected"
                    );
                    UserError::InvalidCredentials
                }
                AuthenticationError::PasswordError(err) => UserError::Password(err),
                AuthenticationError::JwtError(err) => UserError::Token(err),
            })?;

        Ok(AccessGrant {
            principal: user.into(),
            access_token: result.access_token,
        })
    }

    /// Hash the password and persist a new user.
    ///
    /// The plaintext is dropped once hashed and is never logged.
    ///
    /// # Errors
    /// * `EmailAlreadyExists` - Store reports a duplicate email
    /// * `Password` - Hashing failed
    /// * `DatabaseError` - Database operation failed
    pub async fn register(&self, command: CreateUserCommand) -> Result<User, UserError> {
        let password_hash = self
            .authenticator
            .hash_password(command.password.expose())?;

        let user = User {
            id: UserId::new(),
            email: command.email,
            name: command.name,
            surname: command.surname,
            role: Role::User,
            date_of_birth: command.date_of_birth.date(),
            password_hash,
            is_active: false,
            created_at: Utc::now(),
        };

        let created_user = self.repository.create(user).await?;
        tracing::info!(user_id = %created_user.id, "User registered");

        Ok(created_user)
    }
}

#[cfg(test)]
mod tests {
    use auth::TokenKind;
    use chrono::NaiveDate;

    use super::*;
    use crate::domain::user::mocks::stored_user;
    use crate::domain::user::mocks::test_authenticator;
    use crate::domain::user::mocks::MockTestUserRepository;
    use crate::domain::user::models::DateOfBirth;
    use crate::domain::user::models::EmailAddress;
    use crate::domain::user::models::Password;
    use crate::domain::user::models::PersonName;

    fn authenticator_with(
        repository: MockTestUserRepository,
    ) -> CredentialAuthenticator<MockTestUserRepository> {
        CredentialAuthenticator::new(Arc::new(repository), Arc::new(test_authenticator()))
    }

    fn registration(email: &str) -> CreateUserCommand {
        CreateUserCommand::new(
            EmailAddress::new(email.to_string()).unwrap(),
            PersonName::new("Alice".to_string()).unwrap(),
            PersonName::new("Liddell".to_string()).unwrap(),
            Password::new("correcthorse".to_string()).unwrap(),
            DateOfBirth::new(
                NaiveDate::from_ymd_opt(1990, 5, 17).unwrap(),
                NaiveDate::from_ymd_opt(2024, 6, 23).unwrap(),
            )
            .unwrap(),
        )
    }

    #[tokio::test]
    async fn test_authenticate_success() {
        let mut repository = MockTestUserRepository::new();
        let user = stored_user("alice@example.com", "correcthorse");
        let user_id = user.id;

        repository
            .expect_find_by_email()
            .withf(|email| email == "alice@example.com")
            .times(1)
            .returning(move |_| Ok(Some(user.clone())));

        let result = authenticator_with(repository)
            .authenticate("alice@example.com", "correcthorse")
            .await
            .expect("Authentication errored");

        assert_eq!(result.map(|u| u.id), Some(user_id));
    }

    #[tokio::test]
    async fn test_unknown_email_and_wrong_password_are_indistinguishable() {
        let mut repository = MockTestUserRepository::new();
        let user = stored_user("alice@example.com", "correcthorse");

        repository
            .expect_find_by_email()
            .returning(move |email| {
                if email == "alice@example.com" {
                    Ok(Some(user.clone()))
                } else {
                    Ok(None)
                }
            });

        let authenticator = authenticator_with(repository);

        let unknown = authenticator
            .authenticate("nobody@x.com", "irrelevant")
            .await
            .unwrap();
        let wrong = authenticator
            .authenticate("alice@example.com", "wrong_password")
            .await
            .unwrap();

        assert!(unknown.is_none());
        assert!(wrong.is_none());
    }

    #[test]
    fn test_unknown_user_hash_is_well_formed() {
        let result = test_authenticator().verify_password("correcthorse", UNKNOWN_USER_HASH);

        assert!(matches!(result, Ok(false)));
    }

    #[tokio::test]
    async fn test_login_rejects_wrong_password() {
        let mut repository = MockTestUserRepository::new();
        let user = stored_user("alice@example.com", "correcthorse");
        repository
            .expect_find_by_email()
            .returning(move |_| Ok(Some(user.clone())));

        let result = authenticator_with(repository)
            .login("alice@example.com", "wrong_password", Duration::hours(8))
            .await;

        assert!(matches!(result, Err(UserError::InvalidCredentials)));
    }

    #[tokio::test]
    async fn test_login_malformed_hash_is_an_error() {
        let mut repository = MockTestUserRepository::new();
        let mut user = stored_user("alice@example.com", "correcthorse");
        user.password_hash = "plaintext-by-mistake".to_string();
        repository
            .expect_find_by_email()
            .returning(move |_| Ok(Some(user.clone())));

        let result = authenticator_with(repository)
            .login("alice@example.com", "correcthorse", Duration::hours(8))
            .await;

        assert!(matches!(result, Err(UserError::Password(_))));
    }

    #[tokio::test]
    async fn test_login_rejects_with_invalid_credentials() {
        let mut repository = MockTestUserRepository::new();
        repository.expect_find_by_email().returning(|_| Ok(None));

        let result = authenticator_with(repository)
            .login("nobody@x.com", "irrelevant", Duration::hours(8))
            .await;

        assert!(matches!(result, Err(UserError::InvalidCredentials)));
    }

    #[tokio::test]
    async fn test_login_issues_access_token_for_subject() {
        let mut repository = MockTestUserRepository::new();
        let user = stored_user("alice@example.com", "correcthorse");
        let user_id = user.id;
        repository
            .expect_find_by_email()
            .returning(move |_| Ok(Some(user.clone())));

        let grant = authenticator_with(repository)
            .login("alice@example.com", "correcthorse", Duration::hours(8))
            .await
            .expect("Login failed");

        let claims = test_authenticator()
            .validate_token(&grant.access_token)
            .expect("Issued token did not verify");
        assert_eq!(claims.subject(), Some(user_id.to_string().as_str()));
        assert_eq!(claims.role.as_deref(), Some("user"));
        assert_eq!(claims.kind, TokenKind::Access);
        assert_eq!(claims.exp - claims.iat, 8 * 60 * 60);
        assert_eq!(grant.principal.id, user_id);
    }

    #[tokio::test]
    async fn test_authenticate_malformed_hash_is_an_error() {
        let mut repository = MockTestUserRepository::new();
        let mut user = stored_user("alice@example.com", "correcthorse");
        user.password_hash = "plaintext-by-mistake".to_string();
        repository
            .expect_find_by_email()
            .returning(move |_| Ok(Some(user.clone())));

        let result = authenticator_with(repository)
            .authenticate("alice@example.com", "correcthorse")
            .await;

        assert!(matches!(result, Err(UserError::Password(_))));
    }

    #[tokio::test]
    async fn test_register_hashes_password() {
        let mut repository = MockTestUserRepository::new();

        repository
            .expect_create()
            .withf(|user| {
                user.email.as_str() == "alice@example.com"
                    && user.password_hash.starts_with("$argon2")
                    && !user.password_hash.contains("correcthorse")
                    && user.role == Role::User
                    && !user.is_active
            })
            .times(1)
            .returning(|user| Ok(user));

        let user = authenticator_with(repository)
            .register(registration("alice@example.com"))
            .await
            .expect("Registration failed");

        assert!(test_authenticator()
            .verify_password("correcthorse", &user.password_hash)
            .unwrap());
    }

    #[tokio::test]
    async fn test_register_duplicate_email() {
        let mut repository = MockTestUserRepository::new();

        repository.expect_create().times(1).returning(|user| {
            Err(UserError::EmailAlreadyExists(
                user.email.as_str().to_string(),
            ))
        });

        let result = authenticator_with(repository)
            .register(registration("alice@example.com"))
            .await;

        assert!(matches!(result, Err(UserError::EmailAlreadyExists(_))));
    }
}
