use axum::extract::Path;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Extension;

use crate::domain::user::models::UserId;
use crate::inbound::http::handlers::ApiError;
use crate::inbound::http::middleware::AuthenticatedUser;
use crate::inbound::http::router::AppState;
use crate::user::errors::UserError;
use crate::user::ports::NotificationSender;
use crate::user::ports::UserRepository;
use crate::user::ports::UserServicePort;

pub async fn delete_user<UR, NS>(
    State(state): State<AppState<UR, NS>>,
    Extension(current_user): Extension<AuthenticatedUser>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError>
where
    UR: UserRepository,
    NS: NotificationSender,
{
    let user_id = UserId::from_string(&id).map_err(UserError::from)?;

    tracing::debug!(
        actor_id = %current_user.principal.id,
        user_id = %user_id,
        "Deleting user"
    );

    state
        .user_service
        .delete_user(&user_id)
        .await
        .map_err(ApiError::from)
        .map(|_| StatusCode::NO_CONTENT)
}
