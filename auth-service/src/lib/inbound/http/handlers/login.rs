use axum::extract::State;
use axum::Form;
use axum::Json;
use serde::Deserialize;
use serde::Serialize;

use super::ApiError;
use crate::inbound::http::router::AppState;
use crate::user::ports::NotificationSender;
use crate::user::ports::UserRepository;

/// Exchange an email/password form for a bearer access token.
///
/// Unknown emails and wrong passwords produce the same 401.
pub async fn login<UR, NS>(
    State(state): State<AppState<UR, NS>>,
    Form(form): Form<LoginForm>,
) -> Result<Json<TokenResponse>, ApiError>
where
    UR: UserRepository,
    NS: NotificationSender,
{
    let grant = state
        .credentials
        .login(&form.username, &form.password, state.access_token_ttl)
        .await?;

    tracing::info!(user_id = %grant.principal.id, "User logged in");

    Ok(Json(TokenResponse::bearer(grant.access_token)))
}

/// OAuth2 password-flow form; `username` carries the email address.
#[derive(Clone, Deserialize)]
pub struct LoginForm {
    username: String,
    password: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub token_type: String,
}

impl TokenResponse {
    fn bearer(access_token: String) -> Self {
        Self {
            access_token,
            token_type: "bearer".to_string(),
        }
    }
}
