use actix_web::{
    Error, HttpMessage,
    dev::{Service, ServiceRequest, ServiceResponse, Transform, forward_ready},
};
use colored::Colorize;
use common::jwt::AuthUser;
use futures::future::{LocalBoxFuture, Ready, ready};
use log::info;
use std::{rc::Rc, time::Instant};

/// Access log: one line per request with the colored status, method, path,
/// elapsed time and the authenticated user when the auth layer set one.
pub struct LoggerMiddleware {
    enabled: bool,
}

impl LoggerMiddleware {
    pub fn new(enabled: bool) -> Self {
        Self { enabled }
    }
}

impl<S, B> Transform<S, ServiceRequest> for LoggerMiddleware
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Transform = LoggerMiddlewareService<S>;
    type InitError = ();
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(LoggerMiddlewareService {
            service: Rc::new(service),
            enabled: self.enabled,
        }))
    }
}

pub struct LoggerMiddlewareService<S> {
    service: Rc<S>,
    enabled: bool,
}

impl<S, B> Service<ServiceRequest> for LoggerMiddlewareService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let method = req.method().to_string();
        let path = req.path().to_string();
        let enabled = self.enabled;
        let srv = Rc::clone(&self.service);

        Box::pin(async move {
            let started = Instant::now();
            let res = srv.call(req).await?;

            if enabled {
                let elapsed_ms = started.elapsed().as_millis();
                let user_id = res
                    .request()
                    .extensions()
                    .get::<AuthUser>()
                    .map(|user| user.user_id.to_string());
                info!("{}", format_line(&method, &path, res.status().as_u16(), elapsed_ms, user_id));
            }

            Ok(res)
        })
    }
}

fn format_line(
    method: &str,
    path: &str,
    status_code: u16,
    elapsed_ms: u128,
    user_id: Option<String>,
) -> String {
    let colored_status = match status_code {
        200..=299 => status_code.to_string().green(),
        300..=399 => status_code.to_string().yellow(),
        400..=499 => status_code.to_string().bright_red(),
        _ => status_code.to_string().red(),
    };

    let colored_method = match method {
        "GET" => method.blue(),
        "POST" => method.yellow(),
        "PUT" | "PATCH" => method.purple(),
        "DELETE" => method.red(),
        _ => method.normal(),
    };

    format!(
        "[{}] {} {} {} user_id={}",
        colored_status,
        colored_method,
        path.bright_white(),
        format!("({}ms)", elapsed_ms).bright_black(),
        user_id.unwrap_or_else(|| "None".to_string()).bright_blue(),
    )
}
