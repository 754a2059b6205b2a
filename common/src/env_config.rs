use std::{env, sync::Arc};

use crate::error::{AppError, Res};

#[derive(Clone, Debug)]
/// Configuration struct for the server.
///
/// Holds the database connection string, the hosted auth service's JWT
/// secret, server bind options, CORS and logging preferences, the public
/// application URL used for checkout redirects, and the Stripe secrets.
pub struct Config {
    // environment
    pub environment: String, // development or production
    /// The URL of the database to connect to.
    pub database_url: String,
    /// Configuration for validating JWTs issued by the hosted auth service.
    pub jwt_config: JwtConfig,
    /// The hostname or IP address the server will bind to.
    pub server_host: String,
    /// The port number the server will listen on.
    pub server_port: u16,
    /// The number of worker threads to spawn for handling requests.
    pub num_workers: usize,
    /// The allowed origin for the dashboard API.
    pub cors_allowed_origin: String,
    /// A boolean indicating whether console logging is enabled.
    pub console_logging_enabled: bool,
    /// Public base URL of the dashboard, used for checkout redirects.
    pub app_url: String,
    /// Stripe secret key
    pub stripe_secret_key: String,
    /// Stripe webhook signing secret. `None` when not configured, in which
    /// case every webhook delivery is rejected.
    pub stripe_webhook_secret: Option<String>,
}

#[derive(Clone, Debug)]
/// Configuration for JSON Web Token (JWT) validation.
///
/// Tokens are issued by the hosted auth service; this server only verifies
/// them with the shared HS256 secret.
pub struct JwtConfig {
    /// The secret key used to verify JWTs.
    pub secret: String,
    /// Expected `aud` claim.
    pub audience: String,
}

impl JwtConfig {
    /// Reads `AUTH_JWT_SECRET` (required) and `AUTH_JWT_AUDIENCE`
    /// (default: `authenticated`).
    pub fn from_env() -> Res<Self> {
        Ok(JwtConfig {
            secret: required("AUTH_JWT_SECRET")?,
            audience: env::var("AUTH_JWT_AUDIENCE")
                .unwrap_or_else(|_| "authenticated".to_string()),
        })
    }
}

impl Config {
    /// Creates a new `Config` instance from environment variables.
    ///
    /// # Environment Variables
    ///
    /// Required:
    /// - `ENVIRONMENT`: `development` or `production`
    /// - `DATABASE_URL`: Connection string for the database
    /// - `AUTH_JWT_SECRET`: Secret used by the hosted auth service to sign JWTs
    ///
    /// Optional (with defaults):
    /// - `IP`: Server host (default: "127.0.0.1")
    /// - `PORT`: Server port (default: 8080)
    /// - `WORKERS`: Number of worker threads (default: 4)
    /// - `CORS_ALLOWED_ORIGIN`: Allowed dashboard origin (default: "http://localhost:3000")
    /// - `ENABLE_CONSOLE_LOGGING`: Whether to enable console logging (default: true)
    /// - `APP_URL`: Public dashboard URL (default: "http://localhost:3000")
    /// - `STRIPE_SECRET_KEY`: Stripe API key (default: empty)
    /// - `STRIPE_WEBHOOK_SECRET`: Stripe signing secret (default: unset)
    pub fn from_env() -> Res<Arc<Self>> {
        dotenvy::dotenv().ok();

        let stripe_webhook_secret = env::var("STRIPE_WEBHOOK_SECRET")
            .ok()
            .filter(|secret| !secret.trim().is_empty());

        Ok(Arc::new(Config {
            environment: required("ENVIRONMENT")?,
            database_url: required("DATABASE_URL")?,
            jwt_config: JwtConfig::from_env()?,
            server_host: env::var("IP").unwrap_or_else(|_| "127.0.0.1".to_string()),
            server_port: env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse()
                .unwrap_or(8080),
            num_workers: env::var("WORKERS")
                .unwrap_or_else(|_| "4".to_string())
                .parse()
                .unwrap_or(4),
            cors_allowed_origin: env::var("CORS_ALLOWED_ORIGIN")
                .unwrap_or_else(|_| "http://localhost:3000".to_string()),
            console_logging_enabled: env::var("ENABLE_CONSOLE_LOGGING")
                .unwrap_or_else(|_| "true".to_string())
                .to_lowercase()
                == "true",
            app_url: env::var("APP_URL")
                .unwrap_or_else(|_| "http://localhost:3000".to_string())
                .trim_end_matches('/')
                .to_string(),
            stripe_secret_key: env::var("STRIPE_SECRET_KEY").unwrap_or_default(),
            stripe_webhook_secret,
        }))
    }

    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }
}

fn required(name: &str) -> Res<String> {
    env::var(name).map_err(|_| AppError::Internal(format!("{} must be set", name)))
}
