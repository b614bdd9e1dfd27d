//! # Identity Provider
//!
//! 프로바이더별 차이(인증 URL, 토큰 교환, 프로필 조회, 연결 끊기)를
//! 하나의 trait 으로 감쌉니다. 오케스트레이터는 [`LoginMethod`] 키로 구현체를 고릅니다.
//!
//! ```text
//! authorize_url ──(브라우저)──▶ callback?code
//!                                   │
//!                  exchange_code ◀──┘
//!                        │ access token
//!                  fetch_profile ──▶ ExternalProfile
//!                        │
//!                  unlink (탈퇴 플로우만)
//! ```

use async_trait::async_trait;
use crate::config::{LoginMethod, ProviderCredentials, ProviderEndpoints};
use crate::domain::models::oauth::{ExternalProfile, FlowPurpose, TokenResponse};
use super::error::IdentityError;

#[async_trait]
pub trait IdentityProvider: Send + Sync {
    fn login_method(&self) -> LoginMethod;

    /// 동의 화면 URL
    fn authorize_url(&self, purpose: FlowPurpose, state: &str) -> String;

    /// 인가 코드 → 액세스 토큰
    ///
    /// `purpose`는 인증 URL 을 만들 때와 같은 리디렉션 URI 를 보내기 위해 필요합니다.
    async fn exchange_code(&self, code: &str, purpose: FlowPurpose) -> Result<String, IdentityError>;

    /// 액세스 토큰 → 정규화된 프로필
    async fn fetch_profile(&self, access_token: &str) -> Result<ExternalProfile, IdentityError>;

    fn supports_unlink(&self) -> bool {
        false
    }

    /// 프로바이더 쪽 연결 끊기. 성공해야만 로컬 계정을 지울 수 있습니다.
    async fn unlink(&self, _access_token: &str) -> Result<(), IdentityError> {
        Err(IdentityError::UnsupportedFlow(self.login_method()))
    }
}

/// 프로바이더 구현체가 공유하는 설정
#[derive(Debug, Clone)]
pub struct ProviderSettings {
    pub credentials: ProviderCredentials,
    pub endpoints: ProviderEndpoints,
    /// 서비스 자체 주소 (끝에 `/` 없음)
    pub domain: String,
}

impl ProviderSettings {
    /// `{domain}/{login|leave}/{provider}/callback`
    pub fn redirect_uri(&self, method: LoginMethod, purpose: FlowPurpose) -> String {
        format!(
            "{}/{}/{}/callback",
            self.domain.trim_end_matches('/'),
            purpose.path_segment(),
            method.as_str()
        )
    }

    /// 쿼리 파라미터를 인코딩해 인증 URL 을 만듭니다.
    pub fn authorize_url_with(&self, params: &[(&str, &str)]) -> String {
        let query = params
            .iter()
            .map(|(key, value)| format!("{}={}", key, urlencoding::encode(value)))
            .collect::<Vec<_>>()
            .join("&");

        format!("{}?{}", self.endpoints.authorize_uri, query)
    }
}

/// 토큰 엔드포인트 응답 해석
///
/// 상태 코드와 무관하게 본문을 읽습니다. 본문에 `error`가 있거나
/// `access_token`이 없으면 교환 실패입니다.
pub async fn decode_token_response(response: reqwest::Response) -> Result<String, IdentityError> {
    let status = response.status();
    let body = response
        .text()
        .await
        .map_err(|e| IdentityError::Exchange(format!("token response unreadable: {}", e)))?;

    let parsed: TokenResponse = serde_json::from_str(&body)
        .map_err(|_| IdentityError::Exchange(format!("token endpoint returned non-JSON body ({})", status)))?;

    parsed.into_access_token().map_err(IdentityError::Exchange)
}

/// 프로필 조회 공통 처리: 상태 확인 후 JSON 해석
pub async fn decode_profile_response<T: serde::de::DeserializeOwned>(
    response: reqwest::Response,
) -> Result<T, IdentityError> {
    let status = response.status();
    if !status.is_success() {
        return Err(IdentityError::ProfileFetch(format!("profile endpoint returned {}", status)));
    }

    response
        .json::<T>()
        .await
        .map_err(|e| IdentityError::ProfileFetch(format!("profile response undecodable: {}", e)))
}

/// 코드가 비어 있으면 네트워크 호출 전에 실패시킵니다.
pub fn require_code(code: &str) -> Result<&str, IdentityError> {
    let code = code.trim();
    if code.is_empty() {
        return Err(IdentityError::Exchange("Can't get code".to_string()));
    }
    Ok(code)
}
