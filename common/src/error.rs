use actix_web::HttpResponse;
use thiserror::Error;

pub type Res<T> = std::result::Result<T, AppError>;

#[derive(Error, Debug)]
pub enum AppError {
    // === CONVERSION ERRORS ===
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("JWT error: {0}")]
    Jwt(#[from] jsonwebtoken::errors::Error),

    #[error("Stripe error: {0}")]
    Stripe(#[from] stripe::StripeError),

    // === APPLICATION ERRORS ===
    #[error("{0}")]
    Unauthorized(String),

    #[error("{0}")]
    Forbidden(String),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    InvalidArgument(String),

    #[error("{0}")]
    SignatureInvalid(String),

    #[error("Malformed event: {0}")]
    MalformedEvent(String),

    #[error("Failed to create checkout session")]
    CheckoutCreationFailed,

    #[error("Upstream failure: {0}")]
    Upstream(String),

    #[error("Partial update failure: {0}")]
    PartialUpdate(String),

    #[error("{0}")]
    Internal(String),
}

impl AppError {
    /// Client-facing errors keep their message, everything else is logged
    /// and collapsed so internal details never leave the process.
    pub fn to_http_response(&self) -> HttpResponse {
        let internal_json = serde_json::json!({ "error": "Internal server error" });
        let message_json = serde_json::json!({ "error": self.to_string() });

        match self {
            // === CONVERSION ERRORS ===
            AppError::Database(error) => {
                log::error!("Database error: {}", error);
                HttpResponse::InternalServerError().json(internal_json)
            }
            AppError::Jwt(error) => {
                log::error!("JWT error: {}", error);
                HttpResponse::InternalServerError().json(internal_json)
            }
            AppError::Stripe(error) => {
                log::error!("Stripe error: {}", error);
                HttpResponse::InternalServerError().json(internal_json)
            }

            // === APPLICATION ERRORS ===
            AppError::Unauthorized(_) => HttpResponse::Unauthorized().json(message_json),
            AppError::Forbidden(_) => HttpResponse::Forbidden().json(message_json),
            AppError::NotFound(_) => HttpResponse::NotFound().json(message_json),
            AppError::BadRequest(_)
            | AppError::InvalidArgument(_)
            | AppError::SignatureInvalid(_)
            | AppError::MalformedEvent(_) => HttpResponse::BadRequest().json(message_json),
            AppError::CheckoutCreationFailed => {
                HttpResponse::InternalServerError().json(message_json)
            }

            AppError::Upstream(error) => {
                log::error!("Upstream failure: {}", error);
                HttpResponse::InternalServerError().json(internal_json)
            }
            AppError::PartialUpdate(error) => {
                log::error!("Partial update failure: {}", error);
                HttpResponse::InternalServerError().json(internal_json)
            }
            AppError::Internal(error) => {
                log::error!("Internal error: {}", error);
                HttpResponse::InternalServerError().json(internal_json)
            }
        }
    }
}

impl actix_web::ResponseError for AppError {
    fn status_code(&self) -> actix_web::http::StatusCode {
        self.to_http_response().status()
    }

    fn error_response(&self) -> HttpResponse {
        self.to_http_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::{body, http::StatusCode};

    async fn body_json(res: HttpResponse) -> serde_json::Value {
        let bytes = body::to_bytes(res.into_body()).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[actix_web::test]
    async fn validation_errors_keep_their_message() {
        let res = AppError::InvalidArgument("Invalid plan selected".to_string()).to_http_response();
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_json(res).await["error"], "Invalid plan selected");

        let res = AppError::NotFound("Restaurant not found".to_string()).to_http_response();
        assert_eq!(res.status(), StatusCode::NOT_FOUND);
        assert_eq!(body_json(res).await["error"], "Restaurant not found");
    }

    #[actix_web::test]
    async fn upstream_errors_are_collapsed() {
        let res = AppError::Upstream("connection reset by db-7.internal".to_string())
            .to_http_response();
        assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body_json(res).await["error"], "Internal server error");

        let res = AppError::Database(sqlx::Error::RowNotFound).to_http_response();
        assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body_json(res).await["error"], "Internal server error");
    }

    #[actix_web::test]
    async fn checkout_failure_uses_fixed_message() {
        let res = AppError::CheckoutCreationFailed.to_http_response();
        assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            body_json(res).await["error"],
            "Failed to create checkout session"
        );
    }
}
