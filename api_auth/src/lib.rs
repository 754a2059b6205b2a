use common::env_config::JwtConfig;
use middleware::auth::AuthMiddleware;

pub mod middleware {
    pub mod auth;
}
pub mod session;

pub use session::Session;

// Auth middleware
pub fn auth_middleware(config: &JwtConfig) -> AuthMiddleware {
    AuthMiddleware::new(config.clone())
}
