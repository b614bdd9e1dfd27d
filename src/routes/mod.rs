//! API 라우트 설정 모듈
//!
//! 브라우저 리디렉션 경로(소셜 로그인/탈퇴, 로그아웃, 이메일 인증)와
//! JSON API(`/api/v1/...`), 헬스체크를 등록합니다.
//!
//! # Auth Middleware Usage
//!
//! - `/api/v1/me`, `POST /signout` - `AuthMiddleware::required()`
//! - `/`, `/login` - `AuthMiddleware::optional()`
//! - 그 밖의 경로는 인증이 필요 없습니다.
//!
//! actix-web 스코프는 매칭에 실패해도 다음 서비스로 넘어가지 않으므로,
//! 빈 접두사 스코프는 항상 마지막에 등록합니다.

use crate::config::{GitHubOAuthConfig, KakaoOAuthConfig, LoginMethod};
use crate::handlers;
use crate::middlewares::AuthMiddleware;
use actix_web::web;
use serde_json::json;

/// 모든 라우트를 설정합니다
///
/// ```rust,ignore
/// use actix_web::{web, App};
///
/// let app = App::new().configure(configure_all_routes);
/// ```
pub fn configure_all_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(health_check);

    configure_identity_routes(cfg);
    configure_auth_routes(cfg);
    configure_user_routes(cfg);
    configure_page_routes(cfg);
}

/// 소셜 로그인/탈퇴 플로우
///
/// ```bash
/// # GitHub 동의 화면으로 302
/// curl -i http://localhost:8080/login/github
///
/// # Kakao 연결 끊기 + 탈퇴
/// curl -i http://localhost:8080/leave/kakao
/// ```
fn configure_identity_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(handlers::identity::social_login)
        .service(handlers::identity::social_login_callback)
        .service(handlers::identity::social_leave)
        .service(handlers::identity::social_leave_callback);
}

/// 로컬 계정 인증
///
/// ```bash
/// curl -X POST http://localhost:8080/api/v1/auth/login \
///   -H "Content-Type: application/json" \
///   -d '{"email":"user@example.com","password":"password123"}'
/// ```
fn configure_auth_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/auth")
            .service(handlers::auth::sign_up)
            .service(handlers::auth::local_login)
    );

    cfg.service(handlers::auth::logout)
        .service(handlers::auth::complete_verification);

    cfg.service(
        web::scope("/signout")
            .wrap(AuthMiddleware::required())
            .service(handlers::auth::sign_out)
    );
}

/// 사용자 프로필
fn configure_user_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/users")
            .service(handlers::users::get_user)
    );

    cfg.service(
        web::scope("/api/v1/me")
            .wrap(AuthMiddleware::required())
            .service(handlers::users::get_me)
            .service(handlers::users::update_me)
            .service(handlers::users::change_password)
    );
}

fn configure_page_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1")
            .service(handlers::pages::messages)
    );

    cfg.service(
        web::scope("")
            .wrap(AuthMiddleware::optional())
            .service(handlers::pages::home)
            .service(handlers::pages::login_page)
    );
}

/// 서비스 상태를 확인하는 헬스체크 엔드포인트
///
/// ```bash
/// curl http://localhost:8080/health
/// ```
///
/// Response:
/// ```json
/// {
///   "status": "healthy",
///   "service": "social_login_service",
///   "version": "0.1.0",
///   "timestamp": "2026-01-01T00:00:00Z",
///   "features": {
///     "database": "MongoDB",
///     "cache": "Redis",
///     "identity_providers": ["github", "kakao"]
///   }
/// }
/// ```
#[actix_web::get("/health")]
async fn health_check() -> actix_web::HttpResponse {
    let providers: Vec<&str> = [
        (LoginMethod::GitHub, GitHubOAuthConfig::credentials().is_some()),
        (LoginMethod::Kakao, KakaoOAuthConfig::credentials().is_some()),
    ]
    .into_iter()
    .filter(|(_, enabled)| *enabled)
    .map(|(method, _)| method.as_str())
    .collect();

    actix_web::HttpResponse::Ok().json(json!({
        "status": "healthy",
        "service": "social_login_service",
        "version": env!("CARGO_PKG_VERSION"),
        "timestamp": chrono::Utc::now().to_rfc3339(),
        "features": {
            "database": "MongoDB",
            "cache": "Redis",
            "identity_providers": providers
        }
    }))
}
