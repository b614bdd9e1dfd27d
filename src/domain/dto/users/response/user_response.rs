use serde::{Deserialize, Serialize};
use crate::config::LoginMethod;
use crate::domain::entities::users::user::User;
use crate::domain::models::flash::FlashMessage;

/// 사용자 응답 DTO
///
/// 비밀번호 해시와 이메일 인증 키는 포함하지 않습니다.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserResponse {
    pub id: String,
    pub email: String,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub bio: String,
    pub avatar: Option<String>,
    pub login_method: LoginMethod,
    pub email_verified: bool,
    pub last_login_at: Option<String>,
    pub created_at: String,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        let User {
            id,
            email,
            username,
            first_name,
            last_name,
            bio,
            avatar,
            login_method,
            email_verified,
            last_login_at,
            created_at,
            ..
        } = user;

        Self {
            id: id.map(|id| id.to_hex()).unwrap_or_default(),
            email,
            username,
            first_name,
            last_name,
            bio,
            avatar,
            login_method,
            email_verified,
            last_login_at: last_login_at.and_then(|t| t.try_to_rfc3339_string().ok()),
            created_at: created_at.try_to_rfc3339_string().unwrap_or_default(),
        }
    }
}

/// 로그인/가입 응답 DTO (세션 토큰 포함)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthResponse {
    pub user: UserResponse,
    pub access_token: String,
    pub token_type: String,
    pub expires_in: i64,
    pub message: String,
}

impl AuthResponse {
    pub fn new(user: User, access_token: String, expires_in: i64, message: impl Into<String>) -> Self {
        Self {
            user: UserResponse::from(user),
            access_token,
            token_type: "Bearer".to_string(),
            expires_in,
            message: message.into(),
        }
    }
}

/// 대기 중인 플래시 메시지 응답
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessagesResponse {
    pub messages: Vec<FlashMessage>,
}
