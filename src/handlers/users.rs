//! 사용자 프로필 핸들러
//!
//! - `GET /api/v1/users/{user_id}` - 공개 프로필
//! - `GET /api/v1/me`, `PUT /api/v1/me` - 내 프로필 조회/수정 (세션 필요)
//! - `PUT /api/v1/me/password` - 로컬 계정 비밀번호 변경 (세션 필요)
use actix_web::{get, put, web, HttpResponse};
use crate::domain::dto::users::request::{UpdatePasswordRequest, UpdateProfileRequest};
use crate::domain::dto::users::response::UserResponse;
use crate::domain::models::auth::AuthenticatedUser;
use crate::errors::AppError;
use crate::services::users::UserService;

#[get("/{user_id}")]
pub async fn get_user(user_id: web::Path<String>) -> Result<HttpResponse, AppError> {
    let service = UserService::instance();
    let user = service.get_profile(&user_id).await?;
    Ok(HttpResponse::Ok().json(UserResponse::from(user)))
}

#[get("")]
pub async fn get_me(user: AuthenticatedUser) -> Result<HttpResponse, AppError> {
    let service = UserService::instance();
    let profile = service.get_profile(&user.user_id).await?;
    Ok(HttpResponse::Ok().json(UserResponse::from(profile)))
}

#[put("")]
pub async fn update_me(
    user: AuthenticatedUser,
    payload: web::Json<UpdateProfileRequest>,
) -> Result<HttpResponse, AppError> {
    let service = UserService::instance();
    let updated = service.update_profile(&user.user_id, payload.into_inner()).await?;
    Ok(HttpResponse::Ok().json(UserResponse::from(updated)))
}

#[put("/password")]
pub async fn change_password(
    user: AuthenticatedUser,
    payload: web::Json<UpdatePasswordRequest>,
) -> Result<HttpResponse, AppError> {
    let service = UserService::instance();
    service.change_password(&user.user_id, payload.into_inner()).await?;
    Ok(HttpResponse::Ok().json(serde_json::json!({
        "message": "비밀번호가 변경되었습니다"
    })))
}
