//! 리디렉션 응답과 쿠키
//!
//! - `session`: 세션 토큰 (HttpOnly, SameSite=Lax)
//! - `flash`: 다음 요청에서 한 번 읽고 지우는 메시지 목록
//!   (JSON 을 URL-safe base64 로 인코딩)
//! - `oauth_state`: 소셜 로그인/탈퇴를 시작한 브라우저의 state nonce.
//!   콜백 응답에서 항상 지워집니다.

use actix_web::cookie::{time::Duration, Cookie, SameSite};
use actix_web::http::header;
use actix_web::{HttpRequest, HttpResponse, HttpResponseBuilder};
use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
use crate::config::OAuthConfig;
use crate::domain::models::flash::FlashMessage;
use crate::domain::models::token::SessionToken;
use crate::services::identity::{FlowOutcome, SessionDirective, StateBinding};

pub const SESSION_COOKIE: &str = "session";
pub const FLASH_COOKIE: &str = "flash";
pub const STATE_COOKIE: &str = "oauth_state";

/// 쌓아 둘 수 있는 플래시 메시지 수
const MAX_FLASH_MESSAGES: usize = 5;

fn secure_cookies() -> bool {
    OAuthConfig::domain().starts_with("https://")
}

pub fn session_cookie(session: &SessionToken) -> Cookie<'static> {
    Cookie::build(SESSION_COOKIE, session.token.clone())
        .path("/")
        .http_only(true)
        .secure(secure_cookies())
        .same_site(SameSite::Lax)
        .max_age(Duration::seconds(session.expires_in))
        .finish()
}

fn removal_cookie(name: &'static str) -> Cookie<'static> {
    let mut cookie = Cookie::build(name, "").path("/").finish();
    cookie.make_removal();
    cookie
}

pub fn clear_session_cookie() -> Cookie<'static> {
    removal_cookie(SESSION_COOKIE)
}

fn state_cookie(nonce: &str, max_age_seconds: i64) -> Cookie<'static> {
    Cookie::build(STATE_COOKIE, nonce.to_string())
        .path("/")
        .http_only(true)
        .secure(secure_cookies())
        .same_site(SameSite::Lax)
        .max_age(Duration::seconds(max_age_seconds))
        .finish()
}

/// 콜백 요청에 실려 온 state nonce
pub fn bound_state_nonce(req: &HttpRequest) -> Option<String> {
    req.cookie(STATE_COOKIE)
        .map(|cookie| cookie.value().to_string())
        .filter(|nonce| !nonce.is_empty())
}

/// 요청에 실려 온 플래시 메시지. 손상된 쿠키는 빈 목록으로 취급합니다.
pub fn read_flash(req: &HttpRequest) -> Vec<FlashMessage> {
    req.cookie(FLASH_COOKIE)
        .and_then(|cookie| URL_SAFE_NO_PAD.decode(cookie.value()).ok())
        .and_then(|bytes| serde_json::from_slice(&bytes).ok())
        .unwrap_or_default()
}

fn flash_cookie(messages: &[FlashMessage]) -> Cookie<'static> {
    let encoded = serde_json::to_vec(messages)
        .map(|json| URL_SAFE_NO_PAD.encode(json))
        .unwrap_or_default();

    Cookie::build(FLASH_COOKIE, encoded)
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .finish()
}

/// 기존 메시지 뒤에 새 메시지를 붙인 쿠키
pub fn append_flash(req: &HttpRequest, message: FlashMessage) -> Cookie<'static> {
    let mut messages = read_flash(req);
    messages.push(message);
    if messages.len() > MAX_FLASH_MESSAGES {
        messages.drain(..messages.len() - MAX_FLASH_MESSAGES);
    }
    flash_cookie(&messages)
}

/// 메시지를 꺼내고 쿠키를 지웁니다.
pub fn take_flash(req: &HttpRequest) -> (Vec<FlashMessage>, Cookie<'static>) {
    (read_flash(req), removal_cookie(FLASH_COOKIE))
}

fn found(location: &str) -> HttpResponseBuilder {
    let mut builder = HttpResponse::Found();
    builder.insert_header((header::LOCATION, location.to_string()));
    builder
}

/// 302 리디렉션. 플래시와 세션 지시를 쿠키로 옮깁니다.
pub fn redirect(
    req: &HttpRequest,
    location: &str,
    flash: Option<FlashMessage>,
    session: &SessionDirective,
) -> HttpResponse {
    let mut builder = found(location);

    if let Some(message) = flash {
        builder.cookie(append_flash(req, message));
    }

    match session {
        SessionDirective::Unchanged => {}
        SessionDirective::Establish(token) => {
            builder.cookie(session_cookie(token));
        }
        SessionDirective::Clear => {
            builder.cookie(clear_session_cookie());
        }
    }

    builder.finish()
}

pub fn outcome_response(req: &HttpRequest, outcome: FlowOutcome) -> HttpResponse {
    let mut res = redirect(req, &outcome.redirect_to, outcome.flash, &outcome.session);

    let binding = match &outcome.state_binding {
        StateBinding::Unchanged => None,
        StateBinding::Bind { nonce, max_age_seconds } => Some(state_cookie(nonce, *max_age_seconds)),
        StateBinding::Release => Some(removal_cookie(STATE_COOKIE)),
    };

    if let Some(cookie) = binding {
        if let Err(e) = res.add_cookie(&cookie) {
            log::error!("oauth_state 쿠키 설정 실패: {}", e);
        }
    }

    res
}
