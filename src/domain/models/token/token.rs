//! 세션 토큰 클레임과 발급 결과
//!
//! 소셜/로컬 로그인이 끝나면 HS256 JWT 하나를 발급해 `session` 쿠키로 내려보냅니다.
use serde::{Deserialize, Serialize};
use crate::config::LoginMethod;

/// JWT 토큰의 클레임(Payload) 구조체
///
/// - `sub`: 사용자 ID (hex ObjectId)
/// - `email`: 사용자 이메일
/// - `login_method`: 가입 시 로그인 방식
/// - `iat` / `exp`: 발급/만료 시각 (Unix timestamp)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionClaims {
    pub sub: String,
    pub email: String,
    pub login_method: LoginMethod,
    pub iat: i64,
    pub exp: i64,
}

/// 발급된 세션 토큰
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SessionToken {
    pub token: String,
    /// 만료까지 남은 시간 (초)
    pub expires_in: i64,
}
