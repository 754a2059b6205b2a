use actix_web::{
    HttpRequest, HttpResponse, Responder, error::JsonPayloadError, http::header, web,
};
use serde::Serialize;

use super::error::{AppError, Res};

pub struct Success;
impl Success {
    pub fn created<T: Serialize>(body: T) -> Res<impl Responder> {
        Result::Ok(HttpResponse::Created().json(body))
    }
    pub fn ok<T: Serialize>(body: T) -> Res<impl Responder> {
        Result::Ok(HttpResponse::Ok().json(body))
    }
    pub fn no_content() -> Res<impl Responder> {
        Result::Ok(HttpResponse::NoContent().finish())
    }
}

/// Fallback for resources that only accept `POST`.
pub async fn post_only(req: HttpRequest) -> HttpResponse {
    HttpResponse::MethodNotAllowed()
        .insert_header((header::ALLOW, "POST"))
        .json(serde_json::json!({
            "error": format!("Method {} Not Allowed", req.method())
        }))
}

/// JSON extractor settings that answer unreadable bodies with the usual
/// `{ "error": ... }` shape.
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default().error_handler(json_error)
}

fn json_error(err: JsonPayloadError, _req: &HttpRequest) -> actix_web::Error {
    AppError::BadRequest(format!("Invalid request body: {}", err)).into()
}
