use axum::extract::Path;
use axum::extract::State;
use axum::http::StatusCode;

use super::ApiError;
use super::ApiSuccess;
use super::UserData;
use crate::domain::user::models::EmailAddress;
use crate::domain::user::models::UserId;
use crate::domain::user::ports::UserServicePort;
use crate::inbound::http::router::AppState;
use crate::user::errors::UserError;
use crate::user::ports::NotificationSender;
use crate::user::ports::UserRepository;

pub async fn get_user<UR, NS>(
    State(state): State<AppState<UR, NS>>,
    Path(user_id): Path<String>,
) -> Result<ApiSuccess<UserData>, ApiError>
where
    UR: UserRepository,
    NS: NotificationSender,
{
    let user_id = UserId::from_string(&user_id).map_err(UserError::from)?;

    state
        .user_service
        .get_user(&user_id)
        .await
        .map_err(ApiError::from)
        .map(|ref principal| ApiSuccess::new(StatusCode::OK, principal.into()))
}

pub async fn get_user_by_email<UR, NS>(
    State(state): State<AppState<UR, NS>>,
    Path(email): Path<String>,
) -> Result<ApiSuccess<UserData>, ApiError>
where
    UR: UserRepository,
    NS: NotificationSender,
{
    let email = EmailAddress::new(email).map_err(UserError::from)?;

    state
        .user_service
        .get_user_by_email(&email)
        .await
        .map_err(ApiError::from)
        .map(|ref principal| ApiSuccess::new(StatusCode::OK, principal.into()))
}
