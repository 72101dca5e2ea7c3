use std::env;
use std::fmt;

use auth::TokenCodec;
use chrono::Duration;
use config::builder::ConfigBuilder;
use config::builder::DefaultState;
use config::ConfigError;
use config::Environment;
use config::File;
use serde::Deserialize;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub database: DatabaseConfig,
    pub server: ServerConfig,
    pub jwt: JwtConfig,
    pub kafka: KafkaConfig,
    pub notifications: NotificationsConfig,
}

#[derive(Deserialize, Clone)]
pub struct DatabaseConfig {
    pub url: String,
}

impl fmt::Debug for DatabaseConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DatabaseConfig")
            .field("url", &"<redacted>")
            .finish()
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub http_port: u16,
    /// Browser origins allowed to call the API with credentials.
    #[serde(default = "default_cors_allowed_origins")]
    pub cors_allowed_origins: Vec<String>,
}

fn default_cors_allowed_origins() -> Vec<String> {
    vec!["http://localhost:3000".to_string()]
}

/// Upper bound for both token lifetimes: thirty days.
pub const MAX_TOKEN_TTL_MINUTES: i64 = 60 * 24 * 30;

#[derive(Deserialize, Clone)]
pub struct JwtConfig {
    pub secret: String,
    #[serde(default = "default_algorithm")]
    pub algorithm: String,
    #[serde(default = "default_access_token_ttl_minutes")]
    pub access_token_ttl_minutes: i64,
    #[serde(default = "default_verification_token_ttl_minutes")]
    pub verification_token_ttl_minutes: i64,
}

impl JwtConfig {
    pub fn access_token_ttl(&self) -> Duration {
        Duration::minutes(self.access_token_ttl_minutes)
    }

    pub fn verification_token_ttl(&self) -> Duration {
        Duration::minutes(self.verification_token_ttl_minutes)
    }
}

impl fmt::Debug for JwtConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("JwtConfig")
            .field("secret", &"<redacted>")
            .field("algorithm", &self.algorithm)
            .field("access_token_ttl_minutes", &self.access_token_ttl_minutes)
            .field(
                "verification_token_ttl_minutes",
                &self.verification_token_ttl_minutes,
            )
            .finish()
    }
}

fn default_algorithm() -> String {
    "HS256".to_string()
}

fn default_access_token_ttl_minutes() -> i64 {
    480
}

fn default_verification_token_ttl_minutes() -> i64 {
    1440
}

#[derive(Debug, Deserialize, Clone)]
pub struct KafkaConfig {
    pub brokers: String,
    pub topic: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct NotificationsConfig {
    /// Base URL of the verification endpoint; the token is appended as `?token=`.
    pub verify_url: String,
}

impl Config {
    /// Load configuration from files with environment variable overrides
    ///
    /// Priority (highest to lowest):
    /// 1. Environment variables (DATABASE__URL, JWT__SECRET, etc.)
    /// 2. Environment-specific config file (config/{environment}.toml)
    /// 3. Default config file (config/default.toml)
    ///
    /// `jwt.secret` has no default and must come from the environment or an
    /// environment-specific file.
    pub fn load() -> Result<Self, ConfigError> {
        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());

        let files = config::Config::builder()
            // Start with default configuration
            .add_source(File::with_name("config/default").required(false))
            // Layer on environment-specific configuration
            .add_source(File::with_name(&format!("config/{}", run_mode)).required(false));

        Self::from_sources(files, environment())
    }

    fn from_sources(
        files: ConfigBuilder<DefaultState>,
        environment: Environment,
    ) -> Result<Self, ConfigError> {
        let config: Config = files.add_source(environment).build()?.try_deserialize()?;
        config.validate()?;

        Ok(config)
    }

    /// Reject values that would only fail later, at request time.
    pub fn validate(&self) -> Result<(), ConfigError> {
        check_ttl(
            "jwt.access_token_ttl_minutes",
            self.jwt.access_token_ttl_minutes,
        )?;
        check_ttl(
            "jwt.verification_token_ttl_minutes",
            self.jwt.verification_token_ttl_minutes,
        )?;

        TokenCodec::new(self.jwt.secret.as_bytes(), &self.jwt.algorithm)
            .map_err(|e| ConfigError::Message(format!("jwt: {e}")))?;

        // Credentialed CORS cannot answer with a wildcard origin.
        if self
            .server
            .cors_allowed_origins
            .iter()
            .any(|origin| origin.trim() == "*")
        {
            return Err(ConfigError::Message(
                "server.cors_allowed_origins must list explicit origins, not `*`".to_string(),
            ));
        }

        Ok(())
    }
}

/// Environment variables, `__` separated: `JWT__SECRET` overrides `jwt.secret`.
fn environment() -> Environment {
    Environment::default()
        .separator("__")
        .try_parsing(true)
        .list_separator(",")
        .with_list_parse_key("server.cors_allowed_origins")
}

fn check_ttl(key: &str, minutes: i64) -> Result<(), ConfigError> {
    if minutes <= 0 || minutes > MAX_TOKEN_TTL_MINUTES {
        return Err(ConfigError::Message(format!(
            "{key} must be between 1 and {MAX_TOKEN_TTL_MINUTES}, got {minutes}"
        )));
    }
    Ok(())
}
