//! 프로바이더 공통 모델
//!
//! 각 프로바이더의 응답은 여기 정의된 형태로 정규화된 뒤 리컨사일러로 넘어갑니다.

use serde::{Deserialize, Serialize};
use crate::utils::string_utils::clean_optional_string;

/// 정규화된 외부 프로필
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExternalProfile {
    pub email: String,
    pub display_name: String,
    pub bio: Option<String>,
    pub avatar_url: Option<String>,
}

/// OAuth 토큰 엔드포인트 응답
///
/// 프로바이더는 실패 시에도 200 으로 `error` 필드를 돌려줄 수 있어
/// 상태 코드와 무관하게 본문을 해석합니다.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TokenResponse {
    pub access_token: Option<String>,
    pub error: Option<String>,
    pub error_description: Option<String>,
}

impl TokenResponse {
    /// 에러가 없고 비어 있지 않은 액세스 토큰
    pub fn into_access_token(self) -> Result<String, String> {
        if let Some(error) = self.error {
            return Err(match self.error_description {
                Some(description) => format!("{}: {}", error, description),
                None => error,
            });
        }

        clean_optional_string(self.access_token)
            .ok_or_else(|| "access_token missing from token response".to_string())
    }
}

/// OAuth 플로우의 목적. 리디렉션 URI 경로와 실패 시 돌아갈 페이지가 달라집니다.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FlowPurpose {
    /// 로그인 (없으면 가입)
    Login,
    /// 프로바이더 연결 끊기 후 계정 삭제
    Leave,
}

impl FlowPurpose {
    /// `/login/...`, `/leave/...` 경로 세그먼트
    pub fn path_segment(&self) -> &'static str {
        match self {
            FlowPurpose::Login => "login",
            FlowPurpose::Leave => "leave",
        }
    }

    /// 플로우 실패 시 리디렉션 대상
    pub fn fallback_path(&self) -> &'static str {
        match self {
            FlowPurpose::Login => "/login",
            FlowPurpose::Leave => "/",
        }
    }
}
