//! 소셜 로그인 플로우 에러
//!
//! 모든 변형은 오케스트레이터 경계에서 리디렉션 + 플래시 메시지로 바뀌며,
//! HTTP 에러 응답으로 나가지 않습니다.

use thiserror::Error;
use crate::config::LoginMethod;
use crate::errors::AppError;

#[derive(Error, Debug)]
pub enum IdentityError {
    /// 코드 없음/만료, 프로바이더가 토큰 교환을 거부
    #[error("Token exchange failed: {0}")]
    Exchange(String),

    /// 토큰 거부, 응답 해석 실패, 이메일 없음
    #[error("Profile fetch failed: {0}")]
    ProfileFetch(String),

    /// 이메일이 이미 다른 로그인 방식으로 가입됨
    #[error("Please log in with: {existing}")]
    LoginMethodConflict { existing: LoginMethod },

    /// 프로바이더 연결 끊기 실패
    #[error("Unlink failed: {0}")]
    Unlink(String),

    /// state 누락/위조/만료
    #[error("Invalid OAuth state")]
    InvalidState,

    /// 프로바이더가 해당 플로우를 지원하지 않음 (예: GitHub 탈퇴)
    #[error("{0} does not support this flow")]
    UnsupportedFlow(LoginMethod),

    /// 자격 증명이 설정되지 않은 프로바이더
    #[error("{0} login is not configured")]
    NotConfigured(LoginMethod),

    /// 경로의 프로바이더 이름을 해석할 수 없음
    #[error("Unknown provider: {0}")]
    UnknownProvider(String),

    /// 저장소/토큰 발급 등 내부 실패
    #[error(transparent)]
    Storage(#[from] AppError),
}

impl IdentityError {
    pub fn missing_email() -> Self {
        IdentityError::ProfileFetch("Please also give me your email".to_string())
    }

    /// 플래시 메시지로 보여 줄 문구
    ///
    /// 내부 에러는 상세 내용을 숨깁니다.
    pub fn user_message(&self) -> String {
        match self {
            IdentityError::Exchange(_) => "Can't get access token".to_string(),
            IdentityError::ProfileFetch(reason) if reason.contains("email") => {
                "Please also give me your email".to_string()
            }
            IdentityError::ProfileFetch(_) => "Can't get your profile".to_string(),
            IdentityError::LoginMethodConflict { existing } => {
                format!("Please log in with: {}", existing)
            }
            IdentityError::Unlink(_) => "Can't disconnect your account".to_string(),
            IdentityError::InvalidState => "Login session expired. Please try again".to_string(),
            IdentityError::UnsupportedFlow(method) => {
                format!("{} accounts can't be deleted this way", method)
            }
            IdentityError::NotConfigured(method) => {
                format!("{} login is not available", method)
            }
            IdentityError::UnknownProvider(name) => format!("Unknown login provider: {}", name),
            IdentityError::Storage(_) => "Something went wrong. Please try again".to_string(),
        }
    }
}
