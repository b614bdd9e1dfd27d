//! AuthMiddleware 인증 로직의 핵심적인 기능
use std::rc::Rc;
use actix_web::body::EitherBody;
use actix_web::dev::{forward_ready, Service, ServiceRequest, ServiceResponse};
use actix_web::{Error, HttpMessage, HttpResponse};
use futures_util::future::LocalBoxFuture;
use crate::domain::models::auth::{AuthMode, AuthenticatedUser};
use crate::errors::AppError;
use crate::handlers::responses::SESSION_COOKIE;
use crate::services::auth::TokenService;

/// 실제 인증 로직을 수행하는 서비스
pub struct AuthMiddlewareService<S> {
    pub service: Rc<S>,
    pub mode: AuthMode,
}

impl<S, B> Service<ServiceRequest> for AuthMiddlewareService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, actix_web::Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let service = self.service.clone();
        let mode = self.mode.clone();

        Box::pin(async move {
            let token_service = TokenService::instance();

            match (&mode, authenticate(&req, &token_service)) {
                (AuthMode::Required, Err(err)) => {
                    log::warn!("인증 실패: {}", err);
                    let response = HttpResponse::Unauthorized()
                        .json(serde_json::json!({
                            "error": "authentication_required",
                            "message": "로그인이 필요합니다"
                        }));
                    let (req, _) = req.into_parts();
                    return Ok(ServiceResponse::new(req, response).map_into_right_body());
                }
                (_, Ok(user)) => {
                    log::debug!("인증 성공: 사용자 ID {}", user.user_id);
                    req.extensions_mut().insert(user);
                }
                (AuthMode::Optional, Err(_)) => {
                    log::debug!("선택적 인증: 세션 없음, 요청 진행");
                }
            }

            let res = service.call(req).await?;
            Ok(res.map_into_left_body())
        })
    }
}

/// Bearer 헤더가 있으면 헤더를, 없으면 세션 쿠키를 사용합니다.
fn authenticate(
    req: &ServiceRequest,
    token_service: &TokenService,
) -> Result<AuthenticatedUser, AppError> {
    let header = req.headers()
        .get("Authorization")
        .and_then(|h| h.to_str().ok());

    let claims = match header {
        Some(value) => token_service.verify_session(token_service.extract_bearer_token(value)?)?,
        None => {
            let cookie = req.cookie(SESSION_COOKIE)
                .ok_or_else(|| AppError::AuthenticationError("세션이 없습니다".to_string()))?;
            token_service.verify_session(cookie.value())?
        }
    };

    Ok(AuthenticatedUser {
        user_id: claims.sub,
        email: claims.email,
        login_method: claims.login_method,
    })
}
