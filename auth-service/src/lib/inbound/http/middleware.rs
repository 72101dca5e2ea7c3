use axum::extract::Request;
use axum::extract::State;
use axum::http;
use axum::middleware::Next;
use axum::response::IntoResponse;
use axum::response::Response;

use crate::domain::user::models::Principal;
use crate::inbound::http::handlers::ApiError;
use crate::inbound::http::router::AppState;
use crate::user::ports::NotificationSender;
use crate::user::ports::UserRepository;

/// Extension type carrying the principal resolved from the bearer token
#[derive(Debug, Clone)]
pub struct AuthenticatedUser {
    pub principal: Principal,
}

/// Middleware that runs the access gate and adds the principal to request extensions
pub async fn authenticate<UR, NS>(
    State(state): State<AppState<UR, NS>>,
    mut req: Request,
    next: Next,
) -> Result<Response, Response>
where
    UR: UserRepository,
    NS: NotificationSender,
{
    // A header that is not valid ASCII is treated as absent
    let authorization = req
        .headers()
        .get(http::header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok());

    let principal = state
        .access_gate
        .authorize_header(authorization)
        .await
        .map_err(|e| ApiError::from(e).into_response())?;

    req.extensions_mut().insert(AuthenticatedUser { principal });

    Ok(next.run(req).await)
}
