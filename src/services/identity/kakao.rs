//! Kakao 로그인 프로바이더
//!
//! - 인증: `GET https://kauth.kakao.com/oauth/authorize?response_type=code`
//! - 토큰: `POST https://kauth.kakao.com/oauth/token` (`grant_type=authorization_code`)
//! - 프로필: `GET https://kapi.kakao.com/v2/user/me` (Bearer)
//! - 연결 끊기: `POST https://kapi.kakao.com/v1/user/unlink` (Bearer)

use async_trait::async_trait;
use reqwest::Client;
use crate::config::{KakaoOAuthConfig, LoginMethod, OAuthConfig};
use crate::domain::models::oauth::{ExternalProfile, FlowPurpose, KakaoUnlinkResponse, KakaoUserMe};
use super::error::IdentityError;
use super::provider::{decode_profile_response, decode_token_response, require_code, IdentityProvider, ProviderSettings};

pub struct KakaoProvider {
    settings: ProviderSettings,
    http: Client,
}

impl KakaoProvider {
    pub fn new(settings: ProviderSettings, http: Client) -> Self {
        Self { settings, http }
    }

    /// `KAKAO_ID`가 없으면 `None`
    pub fn from_env(http: Client) -> Option<Self> {
        let credentials = KakaoOAuthConfig::credentials()?;

        Some(Self::new(
            ProviderSettings {
                credentials,
                endpoints: KakaoOAuthConfig::endpoints(),
                domain: OAuthConfig::domain(),
            },
            http,
        ))
    }
}

#[async_trait]
impl IdentityProvider for KakaoProvider {
    fn login_method(&self) -> LoginMethod {
        LoginMethod::Kakao
    }

    fn authorize_url(&self, purpose: FlowPurpose, state: &str) -> String {
        let redirect_uri = self.settings.redirect_uri(LoginMethod::Kakao, purpose);

        self.settings.authorize_url_with(&[
            ("client_id", self.settings.credentials.client_id.as_str()),
            ("redirect_uri", redirect_uri.as_str()),
            ("response_type", "code"),
            ("state", state),
        ])
    }

    async fn exchange_code(&self, code: &str, purpose: FlowPurpose) -> Result<String, IdentityError> {
        let code = require_code(code)?;
        let redirect_uri = self.settings.redirect_uri(LoginMethod::Kakao, purpose);

        let mut form = vec![
            ("grant_type", "authorization_code"),
            ("client_id", self.settings.credentials.client_id.as_str()),
            ("redirect_uri", redirect_uri.as_str()),
            ("code", code),
        ];
        if let Some(secret) = self.settings.credentials.client_secret.as_deref() {
            form.push(("client_secret", secret));
        }

        let response = self.http
            .post(&self.settings.endpoints.token_uri)
            .form(&form)
            .send()
            .await
            .map_err(|e| IdentityError::Exchange(format!("Kakao token request failed: {}", e)))?;

        decode_token_response(response).await
    }

    async fn fetch_profile(&self, access_token: &str) -> Result<ExternalProfile, IdentityError> {
        let response = self.http
            .get(&self.settings.endpoints.profile_uri)
            .bearer_auth(access_token)
            .send()
            .await
            .map_err(|e| IdentityError::ProfileFetch(format!("Kakao profile request failed: {}", e)))?;

        let me: KakaoUserMe = decode_profile_response(response).await?;
        me.into_profile().ok_or_else(IdentityError::missing_email)
    }

    fn supports_unlink(&self) -> bool {
        self.settings.endpoints.unlink_uri.is_some()
    }

    async fn unlink(&self, access_token: &str) -> Result<(), IdentityError> {
        let unlink_uri = self.settings.endpoints.unlink_uri.as_deref()
            .ok_or(IdentityError::UnsupportedFlow(LoginMethod::Kakao))?;

        let response = self.http
            .post(unlink_uri)
            .bearer_auth(access_token)
            .send()
            .await
            .map_err(|e| IdentityError::Unlink(format!("Kakao unlink request failed: {}", e)))?;

        let status = response.status();
        let body: KakaoUnlinkResponse = response
            .json()
            .await
            .map_err(|_| IdentityError::Unlink(format!("Kakao unlink returned {}", status)))?;

        match body.id {
            Some(id) => {
                log::info!("Kakao 연결 끊기 완료: {}", id);
                Ok(())
            }
            None => Err(IdentityError::Unlink(format!("Kakao unlink not confirmed ({})", status))),
        }
    }
}
