use std::sync::Arc;

use auth::Authenticator;
use auth_service::config::Config;
use auth_service::inbound::http::cors_layer;
use auth_service::inbound::http::create_router;
use auth_service::inbound::http::AppState;
use auth_service::outbound::notifications::KafkaNotificationProducer;
use auth_service::outbound::repositories::PostgresUserRepository;
use sqlx::postgres::PgPoolOptions;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "auth_service=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!(
        service = "auth-service",
        version = env!("CARGO_PKG_VERSION"),
        "Service starting"
    );

    let config = Config::load()?;

    tracing::info!(
        http_port = config.server.http_port,
        jwt_algorithm = %config.jwt.algorithm,
        access_token_ttl_minutes = config.jwt.access_token_ttl_minutes,
        cors_allowed_origins = ?config.server.cors_allowed_origins,
        kafka_brokers = %config.kafka.brokers,
        kafka_topic = %config.kafka.topic,
        "Configuration loaded"
    );

    let authenticator = Arc::new(Authenticator::new(
        config.jwt.secret.as_bytes(),
        &config.jwt.algorithm,
    )?);

    let pg_pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(&config.database.url)
        .await?;
    tracing::info!(
        max_connections = 5,
        database = "postgresql",
        "Database connection pool created"
    );

    sqlx::migrate!("./migrations").run(&pg_pool).await?;
    tracing::info!(database = "postgresql", "Database migrations completed");

    let user_repository = Arc::new(PostgresUserRepository::new(pg_pool));
    let notification_producer = Arc::new(KafkaNotificationProducer::new(&config)?);

    let state = AppState::new(
        user_repository,
        notification_producer,
        authenticator,
        config.jwt.access_token_ttl(),
        config.jwt.verification_token_ttl(),
    );

    let cors = cors_layer(&config.server.cors_allowed_origins)?;

    let http_address = format!("0.0.0.0:{}", config.server.http_port);
    let http_listener = tokio::net::TcpListener::bind(&http_address).await?;
    tracing::info!(
        address = %http_address,
        port = config.server.http_port,
        protocol = "http",
        "Http server listening"
    );

    axum::serve(http_listener, create_router(state, cors)).await?;
    tracing::info!("Server exited successfully");

    Ok(())
}
