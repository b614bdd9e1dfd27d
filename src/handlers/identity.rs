//! Social Login HTTP Handlers
//!
//! 브라우저 리디렉션으로 진행되는 소셜 로그인/탈퇴 경로입니다.
//! 모든 핸들러는 302 로 끝나며, 실패도 에러 응답 대신 플래시 메시지로 전달됩니다.
//! 시작 경로는 `oauth_state` 쿠키를 심고, 콜백은 그 쿠키를 확인한 뒤 지웁니다.
//!
//! | 경로 | 동작 |
//! |------|------|
//! | `GET /login/{provider}` | 동의 화면으로 이동 |
//! | `GET /login/{provider}/callback` | 로그인/가입 후 `/` |
//! | `GET /leave/{provider}` | 연결 끊기 동의 화면으로 이동 (Kakao) |
//! | `GET /leave/{provider}/callback` | 연결 끊기 + 계정 삭제 후 `/` |
use actix_web::{get, web, HttpRequest, HttpResponse};
use crate::domain::dto::users::request::OAuthCallbackQuery;
use crate::domain::models::flash::FlashMessage;
use crate::domain::models::oauth::FlowPurpose;
use crate::errors::AppError;
use crate::services::identity::{IdentityFlowService, SessionDirective};
use super::responses::{bound_state_nonce, outcome_response, redirect};

/// 서비스 초기화 실패도 플래시로 돌려보냅니다.
fn unavailable(req: &HttpRequest, purpose: FlowPurpose, error: AppError) -> HttpResponse {
    log::error!("소셜 로그인 서비스를 사용할 수 없습니다: {}", error);
    redirect(
        req,
        purpose.fallback_path(),
        Some(FlashMessage::error("Something went wrong. Please try again")),
        &SessionDirective::Unchanged,
    )
}

#[get("/login/{provider}")]
pub async fn social_login(req: HttpRequest, provider: web::Path<String>) -> HttpResponse {
    match IdentityFlowService::instance() {
        Ok(service) => outcome_response(&req, service.begin(&provider, FlowPurpose::Login)),
        Err(e) => unavailable(&req, FlowPurpose::Login, e),
    }
}

#[get("/login/{provider}/callback")]
pub async fn social_login_callback(
    req: HttpRequest,
    provider: web::Path<String>,
    query: web::Query<OAuthCallbackQuery>,
) -> HttpResponse {
    let service = match IdentityFlowService::instance() {
        Ok(service) => service,
        Err(e) => return unavailable(&req, FlowPurpose::Login, e),
    };

    let nonce = bound_state_nonce(&req);
    let outcome = service.complete_login(&provider, &query, nonce.as_deref()).await;
    outcome_response(&req, outcome)
}

#[get("/leave/{provider}")]
pub async fn social_leave(req: HttpRequest, provider: web::Path<String>) -> HttpResponse {
    match IdentityFlowService::instance() {
        Ok(service) => outcome_response(&req, service.begin(&provider, FlowPurpose::Leave)),
        Err(e) => unavailable(&req, FlowPurpose::Leave, e),
    }
}

#[get("/leave/{provider}/callback")]
pub async fn social_leave_callback(
    req: HttpRequest,
    provider: web::Path<String>,
    query: web::Query<OAuthCallbackQuery>,
) -> HttpResponse {
    let service = match IdentityFlowService::instance() {
        Ok(service) => service,
        Err(e) => return unavailable(&req, FlowPurpose::Leave, e),
    };

    let nonce = bound_state_nonce(&req);
    let outcome = service.complete_deletion(&provider, &query, nonce.as_deref()).await;
    outcome_response(&req, outcome)
}
