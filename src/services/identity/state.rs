//! OAuth `state` 서명과 브라우저 바인딩
//!
//! state 에는 발급 시각, nonce, HMAC-SHA256 서명이 담깁니다.
//!
//! ```text
//! {unix_ts}.{nonce}.{hex(hmac_sha256(secret, unix_ts:nonce:provider:purpose))}
//! ```
//!
//! 같은 nonce 가 플로우를 시작한 브라우저의 `oauth_state` 쿠키에도 저장됩니다.
//! 콜백은 서명, 유효 시간, 쿠키의 nonce 가 모두 맞을 때만 통과하고 쿠키는
//! 콜백 응답에서 지워지므로 같은 state 를 다시 쓸 수 없습니다.
//! 서명에 프로바이더와 플로우 목적이 포함되어 로그인용 state 로
//! 탈퇴 콜백을 통과할 수 없습니다.

use chrono::Utc;
use hmac::{Hmac, Mac};
use sha2::Sha256;
use crate::config::LoginMethod;
use crate::domain::models::oauth::FlowPurpose;
use crate::errors::AppError;
use super::error::IdentityError;

type HmacSha256 = Hmac<Sha256>;

/// 발급된 state 와 브라우저 쿠키에 둘 nonce
#[derive(Debug, Clone, PartialEq)]
pub struct IssuedState {
    pub value: String,
    pub nonce: String,
}

pub struct OAuthStateSigner {
    secret: String,
    ttl_seconds: i64,
}

impl OAuthStateSigner {
    pub fn new(secret: impl Into<String>, ttl_minutes: i64) -> Self {
        Self {
            secret: secret.into(),
            ttl_seconds: ttl_minutes * 60,
        }
    }

    /// 바인딩 쿠키의 수명 (초)
    pub fn ttl_seconds(&self) -> i64 {
        self.ttl_seconds
    }

    pub fn issue(&self, method: LoginMethod, purpose: FlowPurpose) -> Result<IssuedState, IdentityError> {
        self.issue_at(Utc::now().timestamp(), method, purpose)
    }

    fn issue_at(&self, timestamp: i64, method: LoginMethod, purpose: FlowPurpose) -> Result<IssuedState, IdentityError> {
        let nonce = uuid::Uuid::new_v4().simple().to_string();
        let signature = hex::encode(self.mac(timestamp, &nonce, method, purpose)?.finalize().into_bytes());

        Ok(IssuedState {
            value: format!("{}.{}.{}", timestamp, nonce, signature),
            nonce,
        })
    }

    /// 서명, 유효 시간, 브라우저 바인딩을 확인합니다.
    ///
    /// `bound_nonce`는 요청의 `oauth_state` 쿠키 값입니다.
    pub fn verify(
        &self,
        state: &str,
        method: LoginMethod,
        purpose: FlowPurpose,
        bound_nonce: Option<&str>,
    ) -> Result<(), IdentityError> {
        let mut parts = state.splitn(3, '.');
        let (Some(ts), Some(nonce), Some(signature)) = (parts.next(), parts.next(), parts.next()) else {
            return Err(IdentityError::InvalidState);
        };

        let timestamp: i64 = ts.parse().map_err(|_| IdentityError::InvalidState)?;
        let signature = hex::decode(signature).map_err(|_| IdentityError::InvalidState)?;

        if self.mac(timestamp, nonce, method, purpose)?.verify_slice(&signature).is_err() {
            log::warn!("OAuth state 서명 불일치 ({} {:?})", method, purpose);
            return Err(IdentityError::InvalidState);
        }

        let age = Utc::now().timestamp() - timestamp;
        if !(0..=self.ttl_seconds).contains(&age) {
            log::debug!("OAuth state 만료: {}초 경과", age);
            return Err(IdentityError::InvalidState);
        }

        if bound_nonce != Some(nonce) {
            log::warn!("OAuth state 가 이 브라우저에서 시작되지 않았습니다 ({} {:?})", method, purpose);
            return Err(IdentityError::InvalidState);
        }

        Ok(())
    }

    fn mac(&self, timestamp: i64, nonce: &str, method: LoginMethod, purpose: FlowPurpose) -> Result<HmacSha256, IdentityError> {
        let mut mac = HmacSha256::new_from_slice(self.secret.as_bytes())
            .map_err(|e| AppError::InternalError(format!("OAuth state 키 오류: {}", e)))?;
        mac.update(format!("{}:{}:{}:{}", timestamp, nonce, method.as_str(), purpose.path_segment()).as_bytes());
        Ok(mac)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn signer() -> OAuthStateSigner {
        OAuthStateSigner::new("secret", 10)
    }

    #[test]
    fn test_issued_state_verifies_with_its_nonce() {
        let signer = signer();
        let issued = signer.issue(LoginMethod::Kakao, FlowPurpose::Login).unwrap();

        assert_eq!(issued.value.split('.').count(), 3);
        assert_eq!(issued.value.split('.').nth(1), Some(issued.nonce.as_str()));
        assert!(signer.verify(&issued.value, LoginMethod::Kakao, FlowPurpose::Login, Some(&issued.nonce)).is_ok());
    }

    #[test]
    fn test_state_without_browser_binding_fails() {
        let signer = signer();
        let issued = signer.issue(LoginMethod::Kakao, FlowPurpose::Login).unwrap();
        let other = signer.issue(LoginMethod::Kakao, FlowPurpose::Login).unwrap();

        assert!(signer.verify(&issued.value, LoginMethod::Kakao, FlowPurpose::Login, None).is_err());
        assert!(signer.verify(&issued.value, LoginMethod::Kakao, FlowPurpose::Login, Some(&other.nonce)).is_err());
    }

    #[test]
    fn test_state_is_bound_to_provider_and_purpose() {
        let signer = signer();
        let issued = signer.issue(LoginMethod::Kakao, FlowPurpose::Login).unwrap();
        let nonce = Some(issued.nonce.as_str());

        assert!(signer.verify(&issued.value, LoginMethod::GitHub, FlowPurpose::Login, nonce).is_err());
        assert!(signer.verify(&issued.value, LoginMethod::Kakao, FlowPurpose::Leave, nonce).is_err());
    }

    #[test]
    fn test_tampered_or_foreign_state_fails() {
        let signer = signer();
        let other = OAuthStateSigner::new("other-secret", 10);
        let foreign = other.issue(LoginMethod::GitHub, FlowPurpose::Login).unwrap();

        assert!(matches!(
            signer.verify(&foreign.value, LoginMethod::GitHub, FlowPurpose::Login, Some(&foreign.nonce)),
            Err(IdentityError::InvalidState)
        ));

        let issued = signer.issue(LoginMethod::GitHub, FlowPurpose::Login).unwrap();
        let mut tampered = issued.value.clone();
        let last = if tampered.ends_with('0') { '1' } else { '0' };
        tampered.pop();
        tampered.push(last);
        assert!(signer.verify(&tampered, LoginMethod::GitHub, FlowPurpose::Login, Some(&issued.nonce)).is_err());

        assert!(signer.verify("", LoginMethod::GitHub, FlowPurpose::Login, None).is_err());
        assert!(signer.verify("abc.def.ghi", LoginMethod::GitHub, FlowPurpose::Login, Some("def")).is_err());
    }

    #[test]
    fn test_expired_state_fails() {
        let signer = signer();
        let old = Utc::now().timestamp() - 11 * 60;
        let issued = signer.issue_at(old, LoginMethod::GitHub, FlowPurpose::Login).unwrap();

        assert!(signer.verify(&issued.value, LoginMethod::GitHub, FlowPurpose::Login, Some(&issued.nonce)).is_err());
        assert_eq!(signer.ttl_seconds(), 600);
    }
}
