//! # Flow Orchestrator
//!
//! 프로바이더 × 목적(로그인, 탈퇴) 조합마다 같은 순서로 플로우를 진행하고,
//! 결과를 항상 리디렉션 + 플래시 메시지인 [`FlowOutcome`]으로 돌려줍니다.
//!
//! ```text
//! begin            : provider 확인 → state 발급 + 브라우저 바인딩 → 302 authorize URL
//! complete_login   : state/바인딩 확인 → code → 토큰 교환 → 프로필 → 리컨사일 → 세션 발급 → 302 /
//! complete_deletion: state/바인딩 확인 → code → 토큰 교환 → 프로필 → 연결 끊기 → 삭제 → 302 /
//! ```
//!
//! 어느 단계든 실패하면 그 뒤 단계는 실행되지 않고, 로그인은 `/login`,
//! 탈퇴는 `/`로 에러 메시지와 함께 돌아갑니다. 콜백은 성공 여부와 관계없이
//! 바인딩을 해제하므로 같은 state 로 콜백을 다시 통과할 수 없습니다.

use std::any::Any;
use std::collections::HashMap;
use std::sync::Arc;
use once_cell::sync::OnceCell;
use crate::config::{LoginMethod, OAuthConfig};
use crate::core::registry::ServiceRegistration;
use crate::domain::dto::users::request::OAuthCallbackQuery;
use crate::domain::entities::users::user::User;
use crate::domain::models::flash::FlashMessage;
use crate::domain::models::oauth::FlowPurpose;
use crate::domain::models::token::SessionToken;
use crate::errors::AppError;
use crate::repositories::{AvatarRepository, UserRepository};
use crate::services::auth::TokenService;
use super::error::IdentityError;
use super::github::GitHubProvider;
use super::http::build_http_client;
use super::kakao::KakaoProvider;
use super::provider::IdentityProvider;
use super::reconciler::{DeletionOutcome, IdentityReconciler};
use super::state::OAuthStateSigner;

/// 세션 쿠키에 대한 지시
#[derive(Debug, Clone, PartialEq)]
pub enum SessionDirective {
    Unchanged,
    Establish(SessionToken),
    Clear,
}

/// `oauth_state` 쿠키에 대한 지시
#[derive(Debug, Clone, PartialEq)]
pub enum StateBinding {
    Unchanged,
    /// 이 nonce 를 `max_age_seconds` 동안 브라우저에 묶습니다.
    Bind { nonce: String, max_age_seconds: i64 },
    Release,
}

/// 플로우 한 단계의 최종 결과
#[derive(Debug, Clone)]
pub struct FlowOutcome {
    pub redirect_to: String,
    pub flash: Option<FlashMessage>,
    pub session: SessionDirective,
    pub state_binding: StateBinding,
    pub user: Option<User>,
}

impl FlowOutcome {
    fn redirect(to: impl Into<String>) -> Self {
        Self {
            redirect_to: to.into(),
            flash: None,
            session: SessionDirective::Unchanged,
            state_binding: StateBinding::Unchanged,
            user: None,
        }
    }

    fn failure(purpose: FlowPurpose, error: &IdentityError) -> Self {
        Self {
            flash: Some(FlashMessage::error(error.user_message())),
            ..Self::redirect(purpose.fallback_path())
        }
    }

    fn released(self) -> Self {
        Self { state_binding: StateBinding::Release, ..self }
    }

    pub fn is_failure(&self) -> bool {
        matches!(&self.flash, Some(flash) if flash.level == crate::domain::models::flash::FlashLevel::Error)
    }
}

pub struct IdentityFlowService {
    providers: HashMap<LoginMethod, Arc<dyn IdentityProvider>>,
    reconciler: IdentityReconciler,
    tokens: Arc<TokenService>,
    states: OAuthStateSigner,
}

static IDENTITY_FLOW_SERVICE_INSTANCE: OnceCell<Arc<IdentityFlowService>> = OnceCell::new();

impl IdentityFlowService {
    pub fn new(
        providers: Vec<Arc<dyn IdentityProvider>>,
        reconciler: IdentityReconciler,
        tokens: Arc<TokenService>,
        states: OAuthStateSigner,
    ) -> Self {
        let providers = providers
            .into_iter()
            .map(|provider| (provider.login_method(), provider))
            .collect();

        Self { providers, reconciler, tokens, states }
    }

    /// 환경 변수로 구성된 전역 인스턴스
    ///
    /// 자격 증명이 없는 프로바이더는 빠지고, 해당 경로는 "not available" 플래시로 응답합니다.
    pub fn instance() -> Result<Arc<Self>, AppError> {
        IDENTITY_FLOW_SERVICE_INSTANCE
            .get_or_try_init(|| {
                let http = build_http_client(OAuthConfig::http_timeout())?;

                let mut providers: Vec<Arc<dyn IdentityProvider>> = Vec::new();
                match GitHubProvider::from_env(http.clone()) {
                    Some(github) => providers.push(Arc::new(github)),
                    None => log::warn!("GH_ID/GH_SECRET 미설정: GitHub 로그인 비활성화"),
                }
                match KakaoProvider::from_env(http.clone()) {
                    Some(kakao) => providers.push(Arc::new(kakao)),
                    None => log::warn!("KAKAO_ID 미설정: Kakao 로그인 비활성화"),
                }

                let reconciler = IdentityReconciler::new(
                    UserRepository::instance(),
                    AvatarRepository::instance(),
                    http,
                );

                Ok(Arc::new(Self::new(
                    providers,
                    reconciler,
                    TokenService::instance(),
                    OAuthStateSigner::new(OAuthConfig::state_secret(), OAuthConfig::session_timeout_minutes()),
                )))
            })
            .cloned()
    }

    /// 자격 증명이 설정된 프로바이더 (이름순)
    pub fn enabled_providers(&self) -> Vec<LoginMethod> {
        let mut methods: Vec<_> = self.providers.keys().copied().collect();
        methods.sort_by_key(|m| m.as_str());
        methods
    }

    fn provider(&self, name: &str, purpose: FlowPurpose) -> Result<&Arc<dyn IdentityProvider>, IdentityError> {
        let method = match LoginMethod::from_str(name) {
            Ok(method) if method.is_external() => method,
            _ => return Err(IdentityError::UnknownProvider(name.to_string())),
        };

        let provider = self.providers
            .get(&method)
            .ok_or(IdentityError::NotConfigured(method))?;

        if purpose == FlowPurpose::Leave && !provider.supports_unlink() {
            return Err(IdentityError::UnsupportedFlow(method));
        }

        Ok(provider)
    }

    /// 동의 화면으로 보내는 첫 단계
    pub fn begin(&self, provider_name: &str, purpose: FlowPurpose) -> FlowOutcome {
        let started = self.provider(provider_name, purpose).and_then(|provider| {
            let state = self.states.issue(provider.login_method(), purpose)?;
            Ok((provider, state))
        });

        match started {
            Ok((provider, state)) => {
                log::debug!("{} {:?} 플로우 시작", provider.login_method(), purpose);
                FlowOutcome {
                    state_binding: StateBinding::Bind {
                        nonce: state.nonce,
                        max_age_seconds: self.states.ttl_seconds(),
                    },
                    ..FlowOutcome::redirect(provider.authorize_url(purpose, &state.value))
                }
            }
            Err(e) => {
                log::warn!("{} {:?} 플로우 시작 실패: {}", provider_name, purpose, e);
                FlowOutcome::failure(purpose, &e)
            }
        }
    }

    /// 콜백 공통 구간: state 확인, 코드 교환, 프로필 조회
    ///
    /// 액세스 토큰은 탈퇴 플로우의 연결 끊기에 다시 쓰입니다.
    async fn exchange(
        &self,
        provider: &Arc<dyn IdentityProvider>,
        purpose: FlowPurpose,
        query: &OAuthCallbackQuery,
        bound_nonce: Option<&str>,
    ) -> Result<(String, crate::domain::models::oauth::ExternalProfile), IdentityError> {
        if let Some(error) = query.error.as_deref() {
            let detail = query.error_description.as_deref().unwrap_or(error);
            return Err(IdentityError::Exchange(format!("provider returned error: {}", detail)));
        }

        let state = query.state.as_deref().ok_or(IdentityError::InvalidState)?;
        self.states.verify(state, provider.login_method(), purpose, bound_nonce)?;

        let code = query.code.as_deref()
            .ok_or_else(|| IdentityError::Exchange("Can't get code".to_string()))?;

        let access_token = provider.exchange_code(code, purpose).await?;
        let profile = provider.fetch_profile(&access_token).await?;

        Ok((access_token, profile))
    }

    async fn login_flow(
        &self,
        provider_name: &str,
        query: &OAuthCallbackQuery,
        bound_nonce: Option<&str>,
    ) -> Result<(User, SessionToken), IdentityError> {
        let provider = self.provider(provider_name, FlowPurpose::Login)?;
        let (_, profile) = self.exchange(provider, FlowPurpose::Login, query, bound_nonce).await?;

        let user = self.reconciler.reconcile_login(&profile, provider.login_method()).await?;
        let session = self.tokens.issue_session(&user)?;

        Ok((user, session))
    }

    /// 로그인 콜백
    ///
    /// `bound_nonce`는 요청의 `oauth_state` 쿠키 값입니다.
    pub async fn complete_login(&self, provider_name: &str, query: &OAuthCallbackQuery, bound_nonce: Option<&str>) -> FlowOutcome {
        let outcome = match self.login_flow(provider_name, query, bound_nonce).await {
            Ok((user, session)) => {
                log::info!("{} 로그인 성공: {}", user.login_method, user.email);
                FlowOutcome {
                    flash: Some(FlashMessage::success(format!("Welcome back {}", user.display_name()))),
                    session: SessionDirective::Establish(session),
                    user: Some(user),
                    ..FlowOutcome::redirect("/")
                }
            }
            Err(e) => {
                log::warn!("{} 로그인 실패: {}", provider_name, e);
                FlowOutcome::failure(FlowPurpose::Login, &e)
            }
        };

        outcome.released()
    }

    async fn deletion_flow(
        &self,
        provider_name: &str,
        query: &OAuthCallbackQuery,
        bound_nonce: Option<&str>,
    ) -> Result<DeletionOutcome, IdentityError> {
        let provider = self.provider(provider_name, FlowPurpose::Leave)?;
        let (access_token, profile) = self.exchange(provider, FlowPurpose::Leave, query, bound_nonce).await?;

        // 원격 연결이 끊긴 것이 확인된 뒤에만 로컬 계정을 지웁니다.
        provider.unlink(&access_token).await?;

        self.reconciler.reconcile_deletion(&profile.email).await
    }

    /// 탈퇴 콜백
    pub async fn complete_deletion(&self, provider_name: &str, query: &OAuthCallbackQuery, bound_nonce: Option<&str>) -> FlowOutcome {
        let outcome = match self.deletion_flow(provider_name, query, bound_nonce).await {
            Ok(DeletionOutcome::Deleted(user)) => FlowOutcome {
                flash: Some(FlashMessage::info("Good bye!")),
                session: SessionDirective::Clear,
                user: Some(user),
                ..FlowOutcome::redirect("/")
            },
            Ok(DeletionOutcome::NotFound) => FlowOutcome {
                session: SessionDirective::Clear,
                ..FlowOutcome::redirect("/")
            },
            Err(e) => {
                log::warn!("{} 탈퇴 실패: {}", provider_name, e);
                FlowOutcome::failure(FlowPurpose::Leave, &e)
            }
        };

        outcome.released()
    }
}

fn identity_flow_service_constructor() -> Box<dyn Any + Send + Sync> {
    match IdentityFlowService::instance() {
        Ok(service) => Box::new(service),
        Err(e) => Box::new(e),
    }
}

inventory::submit! {
    ServiceRegistration {
        name: "identity_flow_service",
        constructor: identity_flow_service_constructor,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use crate::config::{ProviderCredentials, ProviderEndpoints};
    use crate::domain::models::flash::FlashLevel;
    use crate::repositories::memory::{InMemoryAvatarStore, InMemoryUserStore};
    use crate::repositories::UserStore;
    use super::super::provider::ProviderSettings;
    use wiremock::matchers::{body_string_contains, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    struct Harness {
        server: MockServer,
        users: Arc<InMemoryUserStore>,
        service: IdentityFlowService,
    }

    fn settings(server: &MockServer, prefix: &str, unlink: bool) -> ProviderSettings {
        ProviderSettings {
            credentials: ProviderCredentials {
                client_id: format!("{}-id", prefix),
                client_secret: Some(format!("{}-secret", prefix)),
            },
            endpoints: ProviderEndpoints {
                authorize_uri: format!("{}/{}/authorize", server.uri(), prefix),
                token_uri: format!("{}/{}/token", server.uri(), prefix),
                profile_uri: format!("{}/{}/profile", server.uri(), prefix),
                unlink_uri: unlink.then(|| format!("{}/{}/unlink", server.uri(), prefix)),
            },
            domain: "http://app.test".to_string(),
        }
    }

    async fn harness() -> Harness {
        let server = MockServer::start().await;
        let http = build_http_client(Duration::from_secs(5)).unwrap();
        let users = Arc::new(InMemoryUserStore::new());

        let providers: Vec<Arc<dyn IdentityProvider>> = vec![
            Arc::new(GitHubProvider::new(settings(&server, "github", false), http.clone())),
            Arc::new(KakaoProvider::new(settings(&server, "kakao", true), http.clone())),
        ];

        let service = IdentityFlowService::new(
            providers,
            IdentityReconciler::new(users.clone(), Arc::new(InMemoryAvatarStore::new()), http),
            TokenService::instance(),
            OAuthStateSigner::new("state-secret", 10),
        );

        Harness { server, users, service }
    }

    impl Harness {
        /// 브라우저가 동의 화면에서 돌아온 콜백 쿼리와 그 브라우저의 바인딩 nonce
        fn callback(&self, method: LoginMethod, purpose: FlowPurpose, code: &str) -> (OAuthCallbackQuery, String) {
            let issued = self.service.states.issue(method, purpose).unwrap();
            let query = OAuthCallbackQuery {
                code: Some(code.to_string()),
                state: Some(issued.value),
                ..Default::default()
            };
            (query, issued.nonce)
        }

        async fn login(&self, provider: &str, method: LoginMethod, code: &str) -> FlowOutcome {
            let (query, nonce) = self.callback(method, FlowPurpose::Login, code);
            self.service.complete_login(provider, &query, Some(&nonce)).await
        }

        async fn leave(&self, method: LoginMethod, purpose: FlowPurpose) -> FlowOutcome {
            let (query, nonce) = self.callback(method, purpose, "kcode");
            self.service.complete_deletion("kakao", &query, Some(&nonce)).await
        }

        async fn mock_token(&self, prefix: &str, body: serde_json::Value, times: u64) {
            Mock::given(method("POST"))
                .and(path(format!("/{}/token", prefix)))
                .respond_with(ResponseTemplate::new(200).set_body_json(body))
                .expect(times)
                .mount(&self.server)
                .await;
        }

        async fn mock_profile(&self, prefix: &str, body: serde_json::Value, times: u64) {
            Mock::given(method("GET"))
                .and(path(format!("/{}/profile", prefix)))
                .respond_with(ResponseTemplate::new(200).set_body_json(body))
                .expect(times)
                .mount(&self.server)
                .await;
        }

        async fn mock_unlink(&self, status: u16, body: serde_json::Value, times: u64) {
            Mock::given(method("POST"))
                .and(path("/kakao/unlink"))
                .respond_with(ResponseTemplate::new(status).set_body_json(body))
                .expect(times)
                .mount(&self.server)
                .await;
        }
    }

    fn kakao_me(email: &str) -> serde_json::Value {
        serde_json::json!({
            "id": 7,
            "kakao_account": {"email": email},
            "properties": {"nickname": "Kim"}
        })
    }

    #[tokio::test]
    async fn test_github_login_creates_user_and_session() {
        let h = harness().await;
        Mock::given(method("POST"))
            .and(path("/github/token"))
            .and(body_string_contains("code=abc123"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"access_token": "tok1"})))
            .expect(1)
            .mount(&h.server)
            .await;
        h.mock_profile("github", serde_json::json!({"email": "a@x.com", "name": "Ann"}), 1).await;

        let outcome = h.login("github", LoginMethod::GitHub, "abc123").await;

        assert_eq!(outcome.redirect_to, "/");
        assert!(matches!(outcome.session, SessionDirective::Establish(_)));
        assert_eq!(outcome.flash, Some(FlashMessage::success("Welcome back Ann")));

        let users = h.users.snapshot();
        assert_eq!(users.len(), 1);
        assert_eq!(users[0].email, "a@x.com");
        assert_eq!(users[0].login_method, LoginMethod::GitHub);
        assert!(users[0].email_verified);
    }

    #[tokio::test]
    async fn test_session_identifies_created_user() {
        let h = harness().await;
        h.mock_token("github", serde_json::json!({"access_token": "tok1"}), 1).await;
        h.mock_profile("github", serde_json::json!({"email": "a@x.com", "name": "Ann"}), 1).await;

        let outcome = h.login("github", LoginMethod::GitHub, "abc123").await;

        let SessionDirective::Establish(session) = outcome.session else {
            panic!("session expected");
        };
        let claims = h.service.tokens.verify_session(&session.token).unwrap();
        assert_eq!(claims.sub, h.users.snapshot()[0].id_string().unwrap());
    }

    #[tokio::test]
    async fn test_repeated_login_does_not_duplicate() {
        let h = harness().await;
        h.mock_token("github", serde_json::json!({"access_token": "tok1"}), 2).await;
        h.mock_profile("github", serde_json::json!({"email": "a@x.com", "name": "Ann"}), 2).await;

        for _ in 0..2 {
            let outcome = h.login("github", LoginMethod::GitHub, "abc123").await;
            assert!(!outcome.is_failure());
        }

        assert_eq!(h.users.len(), 1);
    }

    #[tokio::test]
    async fn test_kakao_login_for_github_email_conflicts() {
        let h = harness().await;
        h.mock_token("github", serde_json::json!({"access_token": "tok1"}), 1).await;
        h.mock_profile("github", serde_json::json!({"email": "a@x.com", "name": "Ann"}), 1).await;
        h.mock_token("kakao", serde_json::json!({"access_token": "ktok"}), 1).await;
        h.mock_profile("kakao", kakao_me("a@x.com"), 1).await;

        h.login("github", LoginMethod::GitHub, "abc123").await;
        let before = h.users.snapshot();

        let outcome = h.login("kakao", LoginMethod::Kakao, "kcode").await;

        assert_eq!(outcome.redirect_to, "/login");
        assert_eq!(outcome.session, SessionDirective::Unchanged);
        let flash = outcome.flash.unwrap();
        assert_eq!(flash.level, FlashLevel::Error);
        assert!(flash.message.contains("github"));

        let after = h.users.snapshot();
        assert_eq!(after.len(), 1);
        assert_eq!(after[0].login_method, LoginMethod::GitHub);
        assert_eq!(after[0].last_login_at, before[0].last_login_at);
    }

    #[tokio::test]
    async fn test_exchange_error_skips_profile_fetch() {
        let h = harness().await;
        h.mock_token("github", serde_json::json!({"error": "bad_code"}), 1).await;
        h.mock_profile("github", serde_json::json!({"email": "a@x.com"}), 0).await;

        let outcome = h.login("github", LoginMethod::GitHub, "abc123").await;

        assert_eq!(outcome.redirect_to, "/login");
        assert_eq!(outcome.flash, Some(FlashMessage::error("Can't get access token")));
        assert_eq!(outcome.session, SessionDirective::Unchanged);
        assert_eq!(h.users.len(), 0);
    }

    #[tokio::test]
    async fn test_invalid_state_makes_no_outbound_calls() {
        let h = harness().await;
        h.mock_token("github", serde_json::json!({"access_token": "tok1"}), 0).await;

        let query = OAuthCallbackQuery {
            code: Some("abc123".to_string()),
            state: Some("1.forged.state".to_string()),
            ..Default::default()
        };
        let outcome = h.service.complete_login("github", &query, Some("forged")).await;

        assert!(outcome.is_failure());
        assert_eq!(outcome.redirect_to, "/login");
        assert_eq!(outcome.state_binding, StateBinding::Release);

        let missing = OAuthCallbackQuery { code: Some("abc123".to_string()), ..Default::default() };
        assert!(h.service.complete_login("github", &missing, None).await.is_failure());
    }

    #[tokio::test]
    async fn test_missing_code_and_denied_consent() {
        let h = harness().await;
        h.mock_token("kakao", serde_json::json!({"access_token": "ktok"}), 0).await;

        let (with_code, nonce) = h.callback(LoginMethod::Kakao, FlowPurpose::Login, "kcode");
        let no_code = OAuthCallbackQuery { code: None, ..with_code.clone() };
        assert!(h.service.complete_login("kakao", &no_code, Some(&nonce)).await.is_failure());

        let denied = OAuthCallbackQuery {
            error: Some("access_denied".to_string()),
            ..with_code
        };
        assert!(h.service.complete_login("kakao", &denied, Some(&nonce)).await.is_failure());
    }

    #[tokio::test]
    async fn test_begin_redirects_to_provider() {
        let h = harness().await;

        let outcome = h.service.begin("github", FlowPurpose::Login);
        assert!(outcome.redirect_to.starts_with(&format!("{}/github/authorize?", h.server.uri())));
        assert!(outcome.flash.is_none());

        let StateBinding::Bind { nonce, max_age_seconds } = &outcome.state_binding else {
            panic!("begin must bind the state to the browser");
        };
        assert!(outcome.redirect_to.contains(nonce.as_str()));
        assert_eq!(*max_age_seconds, 600);

        let outcome = h.service.begin("KAKAO", FlowPurpose::Leave);
        assert!(outcome.redirect_to.contains("leave%2Fkakao%2Fcallback"));
    }

    #[tokio::test]
    async fn test_begin_rejects_unknown_and_unsupported() {
        let h = harness().await;

        let unknown = h.service.begin("google", FlowPurpose::Login);
        assert_eq!(unknown.redirect_to, "/login");
        assert!(unknown.is_failure());

        let password = h.service.begin("password", FlowPurpose::Login);
        assert!(password.is_failure());

        let github_leave = h.service.begin("github", FlowPurpose::Leave);
        assert_eq!(github_leave.redirect_to, "/");
        assert!(github_leave.is_failure());
        assert_eq!(github_leave.state_binding, StateBinding::Unchanged);
    }

    #[tokio::test]
    async fn test_unconfigured_provider() {
        let server = MockServer::start().await;
        let http = build_http_client(Duration::from_secs(5)).unwrap();
        let service = IdentityFlowService::new(
            vec![Arc::new(KakaoProvider::new(settings(&server, "kakao", true), http.clone()))],
            IdentityReconciler::new(
                Arc::new(InMemoryUserStore::new()),
                Arc::new(InMemoryAvatarStore::new()),
                http,
            ),
            TokenService::instance(),
            OAuthStateSigner::new("s", 10),
        );

        assert_eq!(service.enabled_providers(), vec![LoginMethod::Kakao]);
        let outcome = service.begin("github", FlowPurpose::Login);
        assert_eq!(outcome.flash, Some(FlashMessage::error("github login is not available")));
    }

    #[tokio::test]
    async fn test_kakao_deletion_unlinks_then_deletes() {
        let h = harness().await;
        h.users.seed(User::new_external("k@x.com".into(), "Kim".into(), None, LoginMethod::Kakao));
        h.mock_token("kakao", serde_json::json!({"access_token": "ktok"}), 1).await;
        h.mock_profile("kakao", kakao_me("k@x.com"), 1).await;
        h.mock_unlink(200, serde_json::json!({"id": 7}), 1).await;

        let outcome = h.leave(LoginMethod::Kakao, FlowPurpose::Leave).await;

        assert_eq!(outcome.redirect_to, "/");
        assert_eq!(outcome.session, SessionDirective::Clear);
        assert_eq!(outcome.flash, Some(FlashMessage::info("Good bye!")));
        assert_eq!(h.users.len(), 0);
    }

    #[tokio::test]
    async fn test_deletion_of_unknown_email_is_silent() {
        let h = harness().await;
        h.users.seed(User::new_external("other@x.com".into(), "O".into(), None, LoginMethod::Kakao));
        h.mock_token("kakao", serde_json::json!({"access_token": "ktok"}), 1).await;
        h.mock_profile("kakao", kakao_me("k@x.com"), 1).await;
        h.mock_unlink(200, serde_json::json!({"id": 7}), 1).await;

        let outcome = h.leave(LoginMethod::Kakao, FlowPurpose::Leave).await;

        assert_eq!(outcome.redirect_to, "/");
        assert!(outcome.flash.is_none());
        assert_eq!(h.users.len(), 1);
    }

    #[tokio::test]
    async fn test_failed_unlink_keeps_local_account() {
        let h = harness().await;
        h.users.seed(User::new_external("k@x.com".into(), "Kim".into(), None, LoginMethod::Kakao));
        h.mock_token("kakao", serde_json::json!({"access_token": "ktok"}), 1).await;
        h.mock_profile("kakao", kakao_me("k@x.com"), 1).await;
        h.mock_unlink(401, serde_json::json!({"code": -401}), 1).await;

        let outcome = h.leave(LoginMethod::Kakao, FlowPurpose::Leave).await;

        assert!(outcome.is_failure());
        assert_eq!(outcome.session, SessionDirective::Unchanged);
        assert!(h.users.find_by_email("k@x.com").await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_login_state_cannot_complete_deletion() {
        let h = harness().await;
        h.users.seed(User::new_external("k@x.com".into(), "Kim".into(), None, LoginMethod::Kakao));
        h.mock_token("kakao", serde_json::json!({"access_token": "ktok"}), 0).await;
        h.mock_unlink(200, serde_json::json!({"id": 7}), 0).await;

        let outcome = h.leave(LoginMethod::Kakao, FlowPurpose::Login).await;

        assert!(outcome.is_failure());
        assert_eq!(h.users.len(), 1);
    }

    #[tokio::test]
    async fn test_callback_from_other_browser_is_rejected() {
        let h = harness().await;
        h.mock_token("github", serde_json::json!({"access_token": "tok1"}), 0).await;

        let (query, _) = h.callback(LoginMethod::GitHub, FlowPurpose::Login, "abc123");

        let without_cookie = h.service.complete_login("github", &query, None).await;
        assert!(without_cookie.is_failure());
        assert_eq!(without_cookie.flash, Some(FlashMessage::error("Login session expired. Please try again")));

        let (_, other_nonce) = h.callback(LoginMethod::GitHub, FlowPurpose::Login, "abc123");
        assert!(h.service.complete_login("github", &query, Some(&other_nonce)).await.is_failure());
        assert_eq!(h.users.len(), 0);
    }

    #[tokio::test]
    async fn test_completed_callback_releases_binding_and_cannot_be_replayed() {
        let h = harness().await;
        h.mock_token("github", serde_json::json!({"access_token": "tok1"}), 1).await;
        h.mock_profile("github", serde_json::json!({"email": "a@x.com", "name": "Ann"}), 1).await;

        let (query, nonce) = h.callback(LoginMethod::GitHub, FlowPurpose::Login, "abc123");
        let first = h.service.complete_login("github", &query, Some(&nonce)).await;
        assert!(!first.is_failure());
        assert_eq!(first.state_binding, StateBinding::Release);

        // 쿠키가 지워진 브라우저에서 같은 콜백 URL 을 다시 연 경우
        let replay = h.service.complete_login("github", &query, None).await;
        assert!(replay.is_failure());
        assert_eq!(replay.session, SessionDirective::Unchanged);
    }
}
