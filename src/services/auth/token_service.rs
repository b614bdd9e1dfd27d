//! 세션 토큰 관리 서비스
//!
//! 로그인(로컬/소셜)이 끝난 사용자에게 HS256 JWT 세션 토큰을 발급하고 검증합니다.
//! 토큰은 `session` 쿠키로 내려가며, API 클라이언트는 `Authorization: Bearer`
//! 헤더로도 보낼 수 있습니다.

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use singleton_macro::service;
use crate::{
    config::JwtConfig,
    domain::entities::users::user::User,
    domain::models::token::{SessionClaims, SessionToken},
    errors::AppError,
};

/// 세션 토큰 서비스
///
/// 서명 키와 만료 시간은 호출할 때마다 `JWT_SECRET`, `JWT_EXPIRATION_HOURS`에서 읽습니다.
#[service(name = "token")]
pub struct TokenService {
    // 외부 의존성 없음
}

impl TokenService {
    /// 사용자를 위한 세션 토큰 발급
    ///
    /// # Errors
    ///
    /// * `AppError::InternalError` - 토큰 생성 실패 또는 저장되지 않은(ID 없는) 사용자
    ///
    /// ```rust,ignore
    /// let session = TokenService::instance().issue_session(&user)?;
    /// ```
    pub fn issue_session(&self, user: &User) -> Result<SessionToken, AppError> {
        sign_session(user, &JwtConfig::secret(), JwtConfig::expiration_hours())
    }

    /// 세션 토큰 검증 및 클레임 추출
    ///
    /// # Errors
    ///
    /// * `AppError::AuthenticationError` - 만료, 잘못된 형식/서명
    pub fn verify_session(&self, token: &str) -> Result<SessionClaims, AppError> {
        verify_signed_session(token, &JwtConfig::secret())
    }

    /// "Bearer {token}" 헤더에서 토큰 부분만 추출
    pub fn extract_bearer_token<'a>(&self, auth_header: &'a str) -> Result<&'a str, AppError> {
        auth_header
            .strip_prefix("Bearer ")
            .map(str::trim)
            .filter(|token| !token.is_empty())
            .ok_or_else(|| AppError::AuthenticationError("유효하지 않은 인증 헤더 형식입니다".to_string()))
    }

    pub fn expiration_hours(&self) -> i64 {
        JwtConfig::expiration_hours()
    }
}

fn sign_session(user: &User, secret: &str, expiration_hours: i64) -> Result<SessionToken, AppError> {
    let now = Utc::now();
    let expiration = now + Duration::hours(expiration_hours);

    let claims = SessionClaims {
        sub: user.id_string().ok_or_else(|| {
            AppError::InternalError("사용자 ID가 없습니다".to_string())
        })?,
        email: user.email.clone(),
        login_method: user.login_method,
        iat: now.timestamp(),
        exp: expiration.timestamp(),
    };

    let encoding_key = EncodingKey::from_secret(secret.as_ref());

    let token = encode(&Header::default(), &claims, &encoding_key)
        .map_err(|e| AppError::InternalError(format!("세션 토큰 생성 실패: {}", e)))?;

    Ok(SessionToken {
        token,
        expires_in: expiration_hours * 3600,
    })
}

fn verify_signed_session(token: &str, secret: &str) -> Result<SessionClaims, AppError> {
    let decoding_key = DecodingKey::from_secret(secret.as_ref());
    let validation = Validation::default();

    decode::<SessionClaims>(token, &decoding_key, &validation)
        .map(|token_data| token_data.claims)
        .map_err(|e| match e.kind() {
            jsonwebtoken::errors::ErrorKind::ExpiredSignature => {
                AppError::AuthenticationError("토큰이 만료되었습니다".to_string())
            },
            _ => AppError::AuthenticationError(format!("유효하지 않은 토큰입니다: {}", e)),
        })
}
