use axum::extract::State;
use axum::http::StatusCode;
use axum::Extension;

use super::ApiError;
use super::ApiSuccess;
use super::UserData;
use crate::domain::user::ports::UserServicePort;
use crate::inbound::http::middleware::AuthenticatedUser;
use crate::inbound::http::router::AppState;
use crate::user::ports::NotificationSender;
use crate::user::ports::UserRepository;

pub async fn list_users<UR, NS>(
    State(state): State<AppState<UR, NS>>,
    Extension(current_user): Extension<AuthenticatedUser>,
) -> Result<ApiSuccess<Vec<UserData>>, ApiError>
where
    UR: UserRepository,
    NS: NotificationSender,
{
    tracing::debug!(user_id = %current_user.principal.id, "Listing users");

    state
        .user_service
        .list_users()
        .await
        .map_err(ApiError::from)
        .map(|principals| {
            ApiSuccess::new(
                StatusCode::OK,
                principals.iter().map(UserData::from).collect(),
            )
        })
}
