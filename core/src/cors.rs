use actix_cors::Cors;
use actix_web::http::header;

/// CORS for the dashboard API: only the console's origin, with credentials.
pub fn middleware(origin: &str) -> Cors {
    Cors::default()
        .allowed_methods(vec!["GET", "POST", "PUT", "PATCH", "DELETE", "OPTIONS"])
        .allowed_headers(vec![header::AUTHORIZATION, header::CONTENT_TYPE, header::ACCEPT])
        .allowed_origin(origin)
        .supports_credentials()
        .max_age(3600)
}
