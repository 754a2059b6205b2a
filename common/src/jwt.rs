use jsonwebtoken::{Algorithm, DecodingKey, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    env_config::JwtConfig,
    error::{AppError, Res},
};

/// Claims carried by the hosted auth service's access tokens.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct JwtClaims {
    pub sub: String,
    pub email: Option<String>,
    #[serde(default)]
    pub role: String,
    pub aud: String,
    pub exp: usize,
}

/// Authenticated caller, inserted into request extensions by the auth
/// middleware.
#[derive(Debug, Clone, PartialEq)]
pub struct AuthUser {
    pub user_id: Uuid,
    pub email: Option<String>,
    pub role: String,
}

/// Extracts claims object from JWT token.
/// Requires JWT secret and expected audience.
pub fn validate_jwt(token: &str, config: &JwtConfig) -> Res<JwtClaims> {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.set_audience(&[config.audience.as_str()]);

    let token_data = jsonwebtoken::decode::<JwtClaims>(
        token,
        &DecodingKey::from_secret(config.secret.as_bytes()),
        &validation,
    )?;
    Ok(token_data.claims)
}

/// Validates the token and turns its subject into an [`AuthUser`].
pub fn authenticate(token: &str, config: &JwtConfig) -> Res<AuthUser> {
    let claims = validate_jwt(token, config)?;
    let user_id = Uuid::parse_str(&claims.sub)
        .map_err(|_| AppError::Unauthorized("Invalid user ID in token".to_string()))?;

    Ok(AuthUser {
        user_id,
        email: claims.email,
        role: claims.role,
    })
}
