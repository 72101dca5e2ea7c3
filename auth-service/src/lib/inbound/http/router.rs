use std::sync::Arc;
use std::time::Duration;

use auth::Authenticator;
use axum::body::Body;
use axum::http::header;
use axum::http::header::InvalidHeaderValue;
use axum::http::HeaderValue;
use axum::http::Method;
use axum::http::Request;
use axum::http::Response;
use axum::middleware;
use axum::routing::get;
use axum::routing::post;
use axum::routing::put;
use axum::Router;
use tower::ServiceBuilder;
use tower_http::cors::AllowOrigin;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::Span;

use super::handlers::create_user::create_user;
use super::handlers::delete_user::delete_user;
use super::handlers::get_user::get_user;
use super::handlers::get_user::get_user_by_email;
use super::handlers::list_users::list_users;
use super::handlers::login::login;
use super::handlers::update_user::update_user;
use super::handlers::verify_email::verify_email;
use super::middleware::authenticate as auth_middleware;
use crate::domain::auth::AccessGate;
use crate::domain::auth::CredentialAuthenticator;
use crate::domain::user::service::UserService;
use crate::user::ports::NotificationSender;
use crate::user::ports::UserRepository;

pub struct AppState<UR, NS>
where
    UR: UserRepository,
    NS: NotificationSender,
{
    pub user_service: Arc<UserService<UR, NS>>,
    pub credentials: Arc<CredentialAuthenticator<UR>>,
    pub access_gate: Arc<AccessGate<UR>>,
    pub access_token_ttl: chrono::Duration,
}

impl<UR, NS> AppState<UR, NS>
where
    UR: UserRepository,
    NS: NotificationSender,
{
    /// Wire the domain services around one shared repository and authenticator.
    pub fn new(
        repository: Arc<UR>,
        notification_sender: Arc<NS>,
        authenticator: Arc<Authenticator>,
        access_token_ttl: chrono::Duration,
        verification_token_ttl: chrono::Duration,
    ) -> Self {
        let user_service = Arc::new(UserService::new(
            Arc::clone(&repository),
            notification_sender,
            Arc::clone(&authenticator),
            verification_token_ttl,
        ));
        let credentials = Arc::new(CredentialAuthenticator::new(
            Arc::clone(&repository),
            Arc::clone(&authenticator),
        ));
        let access_gate = Arc::new(AccessGate::new(repository, authenticator));

        Self {
            user_service,
            credentials,
            access_gate,
            access_token_ttl,
        }
    }
}

impl<UR, NS> Clone for AppState<UR, NS>
where
    UR: UserRepository,
    NS: NotificationSender,
{
    fn clone(&self) -> Self {
        Self {
            user_service: Arc::clone(&self.user_service),
            credentials: Arc::clone(&self.credentials),
            access_gate: Arc::clone(&self.access_gate),
            access_token_ttl: self.access_token_ttl,
        }
    }
}

/// CORS for browser clients on the listed origins, credentials included.
pub fn cors_layer(allowed_origins: &[String]) -> Result<CorsLayer, InvalidHeaderValue> {
    let origins = allowed_origins
        .iter()
        .map(|origin| HeaderValue::from_str(origin.trim()))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE])
        .allow_credentials(true))
}

pub fn create_router<UR, NS>(state: AppState<UR, NS>, cors: CorsLayer) -> Router
where
    UR: UserRepository,
    NS: NotificationSender,
{
    let public_routes = Router::new()
        .route("/users", post(create_user::<UR, NS>))
        .route("/users/login", post(login::<UR, NS>))
        .route("/users/verify", get(verify_email::<UR, NS>))
        .route("/users/by-email/:email", get(get_user_by_email::<UR, NS>))
        .route("/users/:user_id", get(get_user::<UR, NS>));

    let protected_routes = Router::new()
        .route("/users", get(list_users::<UR, NS>))
        .route(
            "/users/:user_id",
            put(update_user::<UR, NS>).delete(delete_user::<UR, NS>),
        )
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware::<UR, NS>,
        ));

    // Headers and query strings are left out of the span: both can carry tokens.
    let trace_layer = TraceLayer::new_for_http()
        .make_span_with(|request: &Request<Body>| {
            tracing::info_span!(
                "http_request",
                method = %request.method(),
                path = %request.uri().path(),
                version = ?request.version(),
            )
        })
        .on_request(|request: &Request<Body>, _span: &Span| {
            tracing::info!(
                method = %request.method(),
                path = %request.uri().path(),
                "Request started"
            );
        })
        .on_response(
            |response: &Response<Body>, latency: Duration, _span: &Span| {
                tracing::info!(
                    status = response.status().as_u16(),
                    latency_ms = latency.as_millis(),
                    "Request completed"
                );
            },
        );

    Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        .layer(
            ServiceBuilder::new()
                .layer(trace_layer)
                .layer(cors),
        )
        .with_state(state)
}
