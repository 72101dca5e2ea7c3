use axum::extract::Query;
use axum::extract::State;
use axum::http::StatusCode;
use serde::Deserialize;

use super::ApiError;
use super::ApiSuccess;
use super::UserData;
use crate::domain::user::ports::UserServicePort;
use crate::inbound::http::router::AppState;
use crate::user::ports::NotificationSender;
use crate::user::ports::UserRepository;

/// Target of the link sent in the verification email.
pub async fn verify_email<UR, NS>(
    State(state): State<AppState<UR, NS>>,
    Query(params): Query<VerifyEmailParams>,
) -> Result<ApiSuccess<UserData>, ApiError>
where
    UR: UserRepository,
    NS: NotificationSender,
{
    state
        .user_service
        .verify_email(&params.token)
        .await
        .map_err(ApiError::from)
        .map(|ref principal| ApiSuccess::new(StatusCode::OK, principal.into()))
}

#[derive(Clone, Deserialize)]
pub struct VerifyEmailParams {
    token: String,
}
