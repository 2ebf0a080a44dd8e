//! Bearer token 认证
//!
//! 校验 `Authorization: Bearer <jwt>`，成功后把 [`AuthUser`] 放进 request extensions，
//! handler 直接以 `AuthUser` 作为参数提取。

use actix_service::{Service, Transform};
use actix_web::{
    Error, FromRequest, HttpMessage, HttpRequest, HttpResponse,
    body::EitherBody,
    dev::{Payload, ServiceRequest, ServiceResponse},
    error::InternalError,
    http::{Method, header::AUTHORIZATION, header::CONTENT_TYPE},
};
use futures_util::future::{LocalBoxFuture, Ready, ready};
use std::rc::Rc;
use tracing::{debug, trace};

use crate::api::jwt::get_jwt_service;
use crate::api::services::v1::{ApiResponse, ErrorCode};
use crate::services::AuthUser;

fn unauthorized_response(message: &str) -> HttpResponse {
    HttpResponse::Unauthorized()
        .insert_header((CONTENT_TYPE, "application/json; charset=utf-8"))
        .json(ApiResponse::<()> {
            code: ErrorCode::Unauthorized as i32,
            message: message.to_string(),
            data: None,
        })
}

/// 从 Authorization header 提取 Bearer token
fn extract_bearer_token(req: &ServiceRequest) -> Option<String> {
    req.headers()
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(|s| s.strip_prefix("Bearer "))
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

/// JWT 认证中间件
#[derive(Clone, Default)]
pub struct UserAuth;

impl<S, B> Transform<S, ServiceRequest> for UserAuth
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type InitError = ();
    type Transform = UserAuthMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(UserAuthMiddleware {
            service: Rc::new(service),
        }))
    }
}

pub struct UserAuthMiddleware<S> {
    service: Rc<S>,
}

impl<S, B> Service<ServiceRequest> for UserAuthMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(
        &self,
        ctx: &mut std::task::Context<'_>,
    ) -> std::task::Poll<Result<(), Self::Error>> {
        self.service.poll_ready(ctx)
    }

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let srv = self.service.clone();

        Box::pin(async move {
            // CORS 预检直接放行
            if req.method() == Method::OPTIONS {
                trace!("OPTIONS request - bypassing authentication");
                return Ok(srv.call(req).await?.map_into_left_body());
            }

            let Some(token) = extract_bearer_token(&req) else {
                debug!("Missing bearer token for {}", req.path());
                let response = unauthorized_response("Unauthorized: missing bearer token");
                return Ok(req.into_response(response.map_into_right_body()));
            };

            match get_jwt_service().validate_access_token(&token) {
                Ok(claims) => {
                    trace!("Authenticated user {}", claims.sub);
                    req.extensions_mut().insert(AuthUser {
                        id: claims.sub,
                        email: claims.email,
                    });
                    Ok(srv.call(req).await?.map_into_left_body())
                }
                Err(e) => {
                    debug!("Bearer token validation failed: {}", e);
                    let response = unauthorized_response("Unauthorized: invalid or expired token");
                    Ok(req.into_response(response.map_into_right_body()))
                }
            }
        })
    }
}

impl FromRequest for AuthUser {
    type Error = Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let user = req.extensions().get::<AuthUser>().cloned();
        ready(user.ok_or_else(|| {
            InternalError::from_response(
                "missing authenticated user",
                unauthorized_response("Unauthorized"),
            )
            .into()
        }))
    }
}
