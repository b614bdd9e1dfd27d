//! GitHub OAuth App 프로바이더
//!
//! - 인증: `GET https://github.com/login/oauth/authorize`
//! - 토큰: `POST https://github.com/login/oauth/access_token` (`Accept: application/json`)
//! - 프로필: `GET https://api.github.com/user` (`Authorization: token ...`)
//!
//! GitHub 은 연결 끊기를 지원하지 않으므로 탈퇴 플로우에 쓸 수 없습니다.

use async_trait::async_trait;
use reqwest::Client;
use reqwest::header::{ACCEPT, AUTHORIZATION};
use crate::config::{GitHubOAuthConfig, LoginMethod, OAuthConfig};
use crate::domain::models::oauth::{ExternalProfile, FlowPurpose, GitHubUser};
use super::error::IdentityError;
use super::provider::{decode_profile_response, decode_token_response, require_code, IdentityProvider, ProviderSettings};

const SCOPE: &str = "read:user user:email";

pub struct GitHubProvider {
    settings: ProviderSettings,
    http: Client,
}

impl GitHubProvider {
    pub fn new(settings: ProviderSettings, http: Client) -> Self {
        Self { settings, http }
    }

    /// `GH_ID`, `GH_SECRET`이 없으면 `None`
    pub fn from_env(http: Client) -> Option<Self> {
        let credentials = GitHubOAuthConfig::credentials()?;

        Some(Self::new(
            ProviderSettings {
                credentials,
                endpoints: GitHubOAuthConfig::endpoints(),
                domain: OAuthConfig::domain(),
            },
            http,
        ))
    }
}

#[async_trait]
impl IdentityProvider for GitHubProvider {
    fn login_method(&self) -> LoginMethod {
        LoginMethod::GitHub
    }

    fn authorize_url(&self, purpose: FlowPurpose, state: &str) -> String {
        let redirect_uri = self.settings.redirect_uri(LoginMethod::GitHub, purpose);

        self.settings.authorize_url_with(&[
            ("client_id", self.settings.credentials.client_id.as_str()),
            ("redirect_uri", redirect_uri.as_str()),
            ("scope", SCOPE),
            ("state", state),
        ])
    }

    async fn exchange_code(&self, code: &str, purpose: FlowPurpose) -> Result<String, IdentityError> {
        let code = require_code(code)?;
        let redirect_uri = self.settings.redirect_uri(LoginMethod::GitHub, purpose);
        let client_secret = self.settings.credentials.client_secret.as_deref().unwrap_or_default();

        let response = self.http
            .post(&self.settings.endpoints.token_uri)
            .header(ACCEPT, "application/json")
            .form(&[
                ("client_id", self.settings.credentials.client_id.as_str()),
                ("client_secret", client_secret),
                ("code", code),
                ("redirect_uri", redirect_uri.as_str()),
            ])
            .send()
            .await
            .map_err(|e| IdentityError::Exchange(format!("GitHub token request failed: {}", e)))?;

        decode_token_response(response).await
    }

    async fn fetch_profile(&self, access_token: &str) -> Result<ExternalProfile, IdentityError> {
        let response = self.http
            .get(&self.settings.endpoints.profile_uri)
            .header(AUTHORIZATION, format!("token {}", access_token))
            .header(ACCEPT, "application/json")
            .send()
            .await
            .map_err(|e| IdentityError::ProfileFetch(format!("GitHub profile request failed: {}", e)))?;

        let user: GitHubUser = decode_profile_response(response).await?;
        user.into_profile().ok_or_else(IdentityError::missing_email)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use crate::config::{ProviderCredentials, ProviderEndpoints};
    use crate::services::identity::http::build_http_client;
    use wiremock::matchers::{body_string_contains, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn provider(server: &MockServer) -> GitHubProvider {
        provider_with_timeout(server, Duration::from_secs(5))
    }

    fn provider_with_timeout(server: &MockServer, timeout: Duration) -> GitHubProvider {
        GitHubProvider::new(
            ProviderSettings {
                credentials: ProviderCredentials {
                    client_id: "gh-id".to_string(),
                    client_secret: Some("gh-secret".to_string()),
                },
                endpoints: ProviderEndpoints {
                    authorize_uri: format!("{}/login/oauth/authorize", server.uri()),
                    token_uri: format!("{}/login/oauth/access_token", server.uri()),
                    profile_uri: format!("{}/user", server.uri()),
                    unlink_uri: None,
                },
                domain: "http://app.test".to_string(),
            },
            build_http_client(timeout).unwrap(),
        )
    }

    fn slow(body: serde_json::Value) -> ResponseTemplate {
        ResponseTemplate::new(200).set_body_json(body).set_delay(Duration::from_secs(3))
    }

    #[tokio::test]
    async fn test_authorize_url_contains_scope_and_state() {
        let server = MockServer::start().await;
        let url = provider(&server).authorize_url(FlowPurpose::Login, "st4te");

        assert!(url.starts_with(&format!("{}/login/oauth/authorize?", server.uri())));
        assert!(url.contains("client_id=gh-id"));
        assert!(url.contains("redirect_uri=http%3A%2F%2Fapp.test%2Flogin%2Fgithub%2Fcallback"));
        assert!(url.contains("scope=read%3Auser%20user%3Aemail"));
        assert!(url.contains("state=st4te"));
    }

    #[tokio::test]
    async fn test_exchange_code_posts_credentials() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/login/oauth/access_token"))
            .and(header("accept", "application/json"))
            .and(body_string_contains("code=abc123"))
            .and(body_string_contains("client_secret=gh-secret"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "access_token": "tok1", "token_type": "bearer", "scope": "read:user"
            })))
            .expect(1)
            .mount(&server)
            .await;

        let token = provider(&server).exchange_code("abc123", FlowPurpose::Login).await.unwrap();
        assert_eq!(token, "tok1");
    }

    #[tokio::test]
    async fn test_exchange_error_field() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "error": "bad_verification_code"
            })))
            .mount(&server)
            .await;

        let error = provider(&server).exchange_code("expired", FlowPurpose::Login).await.unwrap_err();
        assert!(matches!(error, IdentityError::Exchange(msg) if msg.contains("bad_verification_code")));
    }

    #[tokio::test]
    async fn test_fetch_profile_uses_token_scheme() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/user"))
            .and(header("authorization", "token tok1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "login": "ann", "email": "a@x.com", "name": "Ann"
            })))
            .mount(&server)
            .await;

        let profile = provider(&server).fetch_profile("tok1").await.unwrap();
        assert_eq!(profile.email, "a@x.com");
        assert_eq!(profile.display_name, "Ann");
    }

    #[tokio::test]
    async fn test_fetch_profile_rejected_token() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(401).set_body_json(serde_json::json!({
                "message": "Bad credentials"
            })))
            .mount(&server)
            .await;

        let error = provider(&server).fetch_profile("revoked").await.unwrap_err();
        assert!(matches!(error, IdentityError::ProfileFetch(_)));
    }

    #[tokio::test]
    async fn test_github_cannot_unlink() {
        let server = MockServer::start().await;
        let github = provider(&server);

        assert!(!github.supports_unlink());
        assert!(matches!(
            github.unlink("tok1").await,
            Err(IdentityError::UnsupportedFlow(LoginMethod::GitHub))
        ));
    }

    #[tokio::test]
    async fn test_slow_token_endpoint_times_out_as_exchange_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(slow(serde_json::json!({"access_token": "tok1"})))
            .mount(&server)
            .await;

        let error = provider_with_timeout(&server, Duration::from_millis(300))
            .exchange_code("abc123", FlowPurpose::Login)
            .await
            .unwrap_err();

        assert!(matches!(error, IdentityError::Exchange(msg) if msg.contains("token request failed")));
    }

    #[tokio::test]
    async fn test_slow_profile_endpoint_times_out_as_profile_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(slow(serde_json::json!({"email": "a@x.com", "name": "Ann"})))
            .mount(&server)
            .await;

        let error = provider_with_timeout(&server, Duration::from_millis(300))
            .fetch_profile("tok1")
            .await
            .unwrap_err();

        assert!(matches!(error, IdentityError::ProfileFetch(msg) if msg.contains("profile request failed")));
    }
}
