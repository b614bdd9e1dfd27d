//! Local Account HTTP Handlers
//!
//! 이메일/비밀번호 가입과 로그인(JSON API), 그리고 브라우저용
//! 로그아웃/이메일 인증/탈퇴 경로입니다.
//!
//! - `POST /api/v1/auth/signup`, `POST /api/v1/auth/login` - JSON 응답 + `session` 쿠키
//! - `POST /logout`, `GET /verify/{key}`, `POST /signout` - 302 + 플래시 메시지
//!
//! 세션을 바꾸는 로그아웃/탈퇴는 교차 사이트 링크나 이미지로 실행되지 않도록 POST 만 받습니다.
use actix_web::{get, post, web, HttpRequest, HttpResponse};
use crate::domain::dto::users::request::{LocalLoginRequest, SignUpRequest};
use crate::domain::dto::users::response::AuthResponse;
use crate::domain::models::auth::AuthenticatedUser;
use crate::domain::models::flash::FlashMessage;
use crate::errors::AppError;
use crate::services::auth::TokenService;
use crate::services::identity::SessionDirective;
use crate::services::users::{SignOutOutcome, UserService};
use super::responses::{redirect, session_cookie};
use validator::Validate;

#[post("/signup")]
pub async fn sign_up(payload: web::Json<SignUpRequest>) -> Result<HttpResponse, AppError> {
    let user_service = UserService::instance();
    let token_service = TokenService::instance();

    let user = user_service.sign_up(payload.into_inner()).await?;
    let session = token_service.issue_session(&user)?;

    Ok(HttpResponse::Created()
        .cookie(session_cookie(&session))
        .json(AuthResponse::new(
            user,
            session.token,
            session.expires_in,
            "가입되었습니다. 이메일 인증 링크를 확인해 주세요.",
        )))
}

#[post("/login")]
pub async fn local_login(payload: web::Json<LocalLoginRequest>) -> Result<HttpResponse, AppError> {
    payload.validate()?;

    let user_service = UserService::instance();
    let token_service = TokenService::instance();

    let user = user_service
        .authenticate(&payload.email, &payload.password)
        .await
        .inspect_err(|e| log::info!("로컬 로그인 실패 - {}: {}", payload.email, e))?;

    let session = token_service.issue_session(&user)?;
    let message = format!("Welcome back {}", user.display_name());

    log::info!("로컬 로그인 성공: {}", user.email);

    Ok(HttpResponse::Ok()
        .cookie(session_cookie(&session))
        .json(AuthResponse::new(user, session.token, session.expires_in, message)))
}

#[post("/logout")]
pub async fn logout(req: HttpRequest) -> HttpResponse {
    redirect(
        &req,
        "/",
        Some(FlashMessage::info("로그아웃 되었습니다.")),
        &SessionDirective::Clear,
    )
}

#[get("/verify/{key}")]
pub async fn complete_verification(req: HttpRequest, key: web::Path<String>) -> HttpResponse {
    let flash = match UserService::instance().verify_email(&key).await {
        Ok(_) => FlashMessage::success("인증이 완료되었습니다."),
        Err(AppError::NotFound(_)) => FlashMessage::error("사용자가 존재하지 않습니다."),
        Err(e) => {
            log::error!("이메일 인증 처리 실패: {}", e);
            FlashMessage::error("Something went wrong. Please try again")
        }
    };

    redirect(&req, "/", Some(flash), &SessionDirective::Unchanged)
}

/// 탈퇴. Kakao 계정은 연결 끊기 플로우로 보냅니다.
#[post("")]
pub async fn sign_out(req: HttpRequest, user: AuthenticatedUser) -> HttpResponse {
    match UserService::instance().delete_account(&user.user_id).await {
        Ok(SignOutOutcome::RequiresProviderUnlink(method)) => redirect(
            &req,
            &format!("/leave/{}", method),
            None,
            &SessionDirective::Unchanged,
        ),
        Ok(SignOutOutcome::Deleted(_)) => redirect(
            &req,
            "/",
            Some(FlashMessage::info("탈퇴되었습니다! 다시 만날 수 있었으면 좋겠네요!")),
            &SessionDirective::Clear,
        ),
        Err(e) => {
            log::warn!("탈퇴 실패 ({}): {}", user.email, e);
            redirect(
                &req,
                "/",
                Some(FlashMessage::error("Something went wrong. Please try again")),
                &SessionDirective::Unchanged,
            )
        }
    }
}
