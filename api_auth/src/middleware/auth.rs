use std::{future::Future, pin::Pin, rc::Rc};

use actix_web::{
    Error, HttpMessage, HttpResponse,
    dev::{Service, ServiceRequest, ServiceResponse, Transform, forward_ready},
};
use common::{env_config::JwtConfig, jwt};
use futures::future::{Ready, ok};

/// Verifies `Authorization: Bearer <jwt>` against the hosted auth
/// service's secret and stores the resulting [`jwt::AuthUser`] in the
/// request extensions.
pub struct AuthMiddleware {
    jwt_config: Rc<JwtConfig>,
}

impl AuthMiddleware {
    pub fn new(jwt_config: JwtConfig) -> Self {
        AuthMiddleware {
            jwt_config: Rc::new(jwt_config),
        }
    }
}

impl<S, B> Transform<S, ServiceRequest> for AuthMiddleware
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: actix_web::body::MessageBody + 'static,
{
    type Response = ServiceResponse<actix_web::body::BoxBody>;
    type Error = Error;
    type Transform = AuthMiddlewareService<S>;
    type InitError = ();
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ok(AuthMiddlewareService {
            service: Rc::new(service),
            jwt_config: self.jwt_config.clone(),
        })
    }
}

pub struct AuthMiddlewareService<S> {
    service: Rc<S>,
    jwt_config: Rc<JwtConfig>,
}

impl<S, B> Service<ServiceRequest> for AuthMiddlewareService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: actix_web::body::MessageBody + 'static,
{
    type Response = ServiceResponse<actix_web::body::BoxBody>;
    type Error = Error;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>>>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        // preflight requests are answered by the CORS layer
        if req.method() == actix_web::http::Method::OPTIONS {
            let fut = self.service.call(req);
            return Box::pin(async move { fut.await.map(|res| res.map_into_boxed_body()) });
        }

        let token_value = req
            .headers()
            .get("Authorization")
            .and_then(|header| header.to_str().ok())
            .and_then(|header| header.strip_prefix("Bearer "))
            .map(|token| token.trim().to_string());

        let jwt_config = self.jwt_config.clone();
        let srv = Rc::clone(&self.service);

        Box::pin(async move {
            let Some(token) = token_value else {
                // no token passed - 401
                let response = HttpResponse::Unauthorized()
                    .json(serde_json::json!({"error": "No authorization token provided"}))
                    .map_into_boxed_body();
                return Ok(req.into_response(response));
            };

            match jwt::authenticate(&token, &jwt_config) {
                Ok(user) => {
                    req.extensions_mut().insert(user);
                    srv.call(req).await.map(|res| res.map_into_boxed_body())
                }
                Err(e) => {
                    log::debug!("Rejected bearer token: {}", e);
                    let response = HttpResponse::Unauthorized()
                        .json(serde_json::json!({"error": "Invalid token"}))
                        .map_into_boxed_body();
                    Ok(req.into_response(response))
                }
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::{App, test, web};
    use common::jwt::{AuthUser, JwtClaims};
    use jsonwebtoken::{EncodingKey, Header, encode};
    use uuid::Uuid;

    const SECRET: &str = "dashboard-test-secret";

    fn jwt_config() -> JwtConfig {
        JwtConfig {
            secret: SECRET.to_string(),
            audience: "authenticated".to_string(),
        }
    }

    fn token_for(user_id: Uuid, secret: &str) -> String {
        let claims = JwtClaims {
            sub: user_id.to_string(),
            email: Some("chef@trattoria.test".to_string()),
            role: "authenticated".to_string(),
            aud: "authenticated".to_string(),
            exp: 9999999999,
        };
        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(secret.as_bytes()),
        )
        .unwrap()
    }

    async fn whoami(user: web::ReqData<AuthUser>) -> HttpResponse {
        HttpResponse::Ok().body(user.user_id.to_string())
    }

    #[actix_web::test]
    async fn rejects_missing_token() {
        let app = test::init_service(
            App::new()
                .wrap(AuthMiddleware::new(jwt_config()))
                .route("/me", web::get().to(whoami)),
        )
        .await;

        let res = test::call_service(&app, test::TestRequest::get().uri("/me").to_request()).await;
        assert_eq!(res.status().as_u16(), 401);
        let body: serde_json::Value = test::read_body_json(res).await;
        assert_eq!(body["error"], "No authorization token provided");
    }

    #[actix_web::test]
    async fn rejects_token_signed_with_other_secret() {
        let app = test::init_service(
            App::new()
                .wrap(AuthMiddleware::new(jwt_config()))
                .route("/me", web::get().to(whoami)),
        )
        .await;

        let req = test::TestRequest::get()
            .uri("/me")
            .insert_header((
                "Authorization",
                format!("Bearer {}", token_for(Uuid::new_v4(), "not-the-secret")),
            ))
            .to_request();
        let res = test::call_service(&app, req).await;
        assert_eq!(res.status().as_u16(), 401);
        let body: serde_json::Value = test::read_body_json(res).await;
        assert_eq!(body["error"], "Invalid token");
    }

    #[actix_web::test]
    async fn forwards_authenticated_user() {
        let app = test::init_service(
            App::new()
                .wrap(AuthMiddleware::new(jwt_config()))
                .route("/me", web::get().to(whoami)),
        )
        .await;

        let user_id = Uuid::new_v4();
        let req = test::TestRequest::get()
            .uri("/me")
            .insert_header(("Authorization", format!("Bearer {}", token_for(user_id, SECRET))))
            .to_request();
        let res = test::call_service(&app, req).await;
        assert_eq!(res.status().as_u16(), 200);
        let body = test::read_body(res).await;
        assert_eq!(body, user_id.to_string().as_bytes());
    }
}
