//! API Key 认证中间件
//!
//! 通过 Header 中的 `Authorization: Bearer <token>` 或 `X-API-Key: <token>` 进行认证。
//! 未配置 API Key 时不做认证，健康检查接口始终放行。

use actix_web::{
    body::EitherBody,
    dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform},
    http::header::AUTHORIZATION,
    Error, HttpResponse,
};
use futures::future::{ok, LocalBoxFuture, Ready};
use std::rc::Rc;

use crate::models::ApiResponse;

const API_KEY_HEADER: &str = "X-API-Key";

/// API Key 中间件
pub struct ApiKeyMiddleware {
    api_key: Option<Rc<String>>,
}

impl ApiKeyMiddleware {
    /// 空字符串表示关闭认证
    pub fn new(api_key: String) -> Self {
        Self {
            api_key: (!api_key.is_empty()).then(|| Rc::new(api_key)),
        }
    }
}

impl<S, B> Transform<S, ServiceRequest> for ApiKeyMiddleware
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Transform = ApiKeyMiddlewareService<S>;
    type InitError = ();
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ok(ApiKeyMiddlewareService {
            service: Rc::new(service),
            api_key: self.api_key.clone(),
        })
    }
}

pub struct ApiKeyMiddlewareService<S> {
    service: Rc<S>,
    api_key: Option<Rc<String>>,
}

/// 从请求头中取出客户端提供的 key
fn provided_key(req: &ServiceRequest) -> Option<&str> {
    let headers = req.headers();
    headers
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .or_else(|| headers.get(API_KEY_HEADER).and_then(|v| v.to_str().ok()))
        .map(str::trim)
}

impl<S, B> Service<ServiceRequest> for ApiKeyMiddlewareService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let service = self.service.clone();

        let authorized = match &self.api_key {
            None => true,
            Some(_) if req.path().ends_with("/health") => true,
            Some(expected) => provided_key(&req) == Some(expected.as_str()),
        };

        Box::pin(async move {
            if authorized {
                let res = service.call(req).await?;
                return Ok(res.map_into_left_body());
            }

            log::warn!("拒绝未认证请求: {}", req.path());
            let response = HttpResponse::Unauthorized()
                .json(ApiResponse::<()>::error("无效的 API Key"));
            Ok(req.into_response(response).map_into_right_body())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::{http::StatusCode, test, web, App};

    async fn ok_handler() -> HttpResponse {
        HttpResponse::Ok().finish()
    }

    macro_rules! app {
        ($key:expr) => {
            test::init_service(
                App::new()
                    .wrap(ApiKeyMiddleware::new($key.to_string()))
                    .route("/api/v1/health", web::get().to(ok_handler))
                    .route("/api/v1/macro/gdp", web::get().to(ok_handler)),
            )
            .await
        };
    }

    #[actix_web::test]
    async fn test_missing_key_rejected() {
        let app = app!("secret");
        let req = test::TestRequest::get().uri("/api/v1/macro/gdp").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    }

    #[actix_web::test]
    async fn test_bearer_and_header_accepted() {
        let app = app!("secret");

        let req = test::TestRequest::get()
            .uri("/api/v1/macro/gdp")
            .insert_header(("Authorization", "Bearer secret"))
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::OK);

        let req = test::TestRequest::get()
            .uri("/api/v1/macro/gdp")
            .insert_header(("X-API-Key", "secret"))
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::OK);

        let req = test::TestRequest::get()
            .uri("/api/v1/macro/gdp")
            .insert_header(("Authorization", "Bearer wrong"))
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::UNAUTHORIZED);
    }

    #[actix_web::test]
    async fn test_health_skips_auth() {
        let app = app!("secret");
        let req = test::TestRequest::get().uri("/api/v1/health").to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::OK);
    }

    #[actix_web::test]
    async fn test_empty_key_disables_auth() {
        let app = app!("");
        let req = test::TestRequest::get().uri("/api/v1/macro/gdp").to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::OK);
    }
}
