//! 애플리케이션 전역에서 사용하는 에러 시스템
//!
//! JSON API 핸들러가 돌려주는 에러 타입입니다. `thiserror`로 메시지를 정의하고
//! `actix_web::ResponseError`로 HTTP 상태 코드와 `{"error": ...}` 본문을 만듭니다.
//!
//! 소셜 로그인 플로우의 에러는 [`IdentityError`](crate::services::identity::IdentityError)
//! 가 따로 담당하며, 항상 리디렉션 + 플래시 메시지로 변환되므로 이 타입을 거쳐
//! 에러 페이지로 나가지 않습니다.
//!
//! ```rust,ignore
//! use crate::errors::AppError;
//!
//! async fn find(id: &str) -> Result<User, AppError> {
//!     users.find_by_id(id).await?
//!         .ok_or_else(|| AppError::NotFound("사용자를 찾을 수 없습니다".to_string()))
//! }
//! ```

use thiserror::Error;

/// 애플리케이션 전역 에러 타입
#[derive(Error, Debug)]
pub enum AppError {
    /// 데이터베이스 관련 에러 (500)
    #[error("Database error: {0}")]
    DatabaseError(String),

    /// Redis 캐시 관련 에러 (500)
    #[error("Redis error: {0}")]
    RedisError(String),

    /// 입력값 검증 에러 (400)
    #[error("Validation error: {0}")]
    ValidationError(String),

    /// 리소스 없음 (404)
    #[error("Not found: {0}")]
    NotFound(String),

    /// 중복/충돌 (409)
    #[error("Conflict error: {0}")]
    ConflictError(String),

    /// 인증 실패 (401)
    #[error("Authentication error: {0}")]
    AuthenticationError(String),

    /// 권한 부족 (403)
    #[error("Authorization error: {0}")]
    AuthorizationError(String),

    /// 외부 서비스 에러 (502)
    #[error("External service error: {0}")]
    ExternalServiceError(String),

    /// 내부 서버 에러 (500)
    #[error("Internal server error: {0}")]
    InternalError(String),
}

impl actix_web::ResponseError for AppError {
    fn status_code(&self) -> actix_web::http::StatusCode {
        use actix_web::http::StatusCode;

        match self {
            AppError::ValidationError(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::ConflictError(_) => StatusCode::CONFLICT,
            AppError::AuthenticationError(_) => StatusCode::UNAUTHORIZED,
            AppError::AuthorizationError(_) => StatusCode::FORBIDDEN,
            AppError::ExternalServiceError(_) => StatusCode::BAD_GATEWAY,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> actix_web::HttpResponse {
        if self.status_code().is_server_error() {
            log::error!("{}", self);
        }

        actix_web::HttpResponse::build(self.status_code())
            .json(serde_json::json!({
                "error": self.to_string()
            }))
    }
}

impl From<mongodb::error::Error> for AppError {
    fn from(e: mongodb::error::Error) -> Self {
        AppError::DatabaseError(e.to_string())
    }
}

impl From<redis::RedisError> for AppError {
    fn from(e: redis::RedisError) -> Self {
        AppError::RedisError(e.to_string())
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(e: validator::ValidationErrors) -> Self {
        AppError::ValidationError(e.to_string())
    }
}

/// 편의성을 위한 Result 타입 별칭
pub type AppResult<T> = Result<T, AppError>;

/// 외부 라이브러리 에러를 AppError로 변환하는 확장 trait
pub trait ErrorContext<T> {
    /// 컨텍스트 메시지를 붙여 `InternalError`로 변환합니다.
    fn context(self, msg: &str) -> AppResult<T>;

    /// 지연 평가되는 컨텍스트 메시지
    fn with_context<F>(self, f: F) -> AppResult<T>
    where
        F: FnOnce() -> String;
}

impl<T, E> ErrorContext<T> for Result<T, E>
where
    E: std::fmt::Display,
{
    fn context(self, msg: &str) -> AppResult<T> {
        self.map_err(|e| AppError::InternalError(format!("{}: {}", msg, e)))
    }

    fn with_context<F>(self, f: F) -> AppResult<T>
    where
        F: FnOnce() -> String,
    {
        self.map_err(|e| AppError::InternalError(format!("{}: {}", f(), e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::ResponseError;
    use actix_web::http::StatusCode;

    #[test]
    fn test_client_errors_map_to_4xx() {
        let cases = [
            (AppError::ValidationError("bad".into()), StatusCode::BAD_REQUEST),
            (AppError::NotFound("none".into()), StatusCode::NOT_FOUND),
            (AppError::ConflictError("dup".into()), StatusCode::CONFLICT),
            (AppError::AuthenticationError("who".into()), StatusCode::UNAUTHORIZED),
            (AppError::AuthorizationError("no".into()), StatusCode::FORBIDDEN),
        ];

        for (error, expected) in cases {
            assert_eq!(error.error_response().status(), expected);
        }
    }

    #[test]
    fn test_infrastructure_errors_map_to_5xx() {
        assert_eq!(
            AppError::DatabaseError("down".into()).error_response().status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            AppError::ExternalServiceError("github".into()).error_response().status(),
            StatusCode::BAD_GATEWAY
        );
    }

    #[test]
    fn test_error_context_trait() {
        let result: Result<(), &str> = Err("original error");
        match result.context("Additional context") {
            Err(AppError::InternalError(msg)) => {
                assert!(msg.contains("Additional context"));
                assert!(msg.contains("original error"));
            }
            other => panic!("Expected InternalError, got {:?}", other),
        }
    }
}
