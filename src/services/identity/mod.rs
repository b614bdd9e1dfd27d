//! # External Identity Exchange
//!
//! GitHub/Kakao 소셜 로그인과 Kakao 연결 끊기(탈퇴)를 담당합니다.
//!
//! ```text
//! IdentityFlowService (orchestrator)
//! ├── IdentityProvider     ← GitHubProvider, KakaoProvider
//! │     exchange_code / fetch_profile / unlink
//! ├── OAuthStateSigner     ← state 서명 + 브라우저 바인딩
//! ├── IdentityReconciler   ← UserStore, AvatarStore
//! └── TokenService         ← 세션 발급
//! ```
//!
//! 핸들러는 [`IdentityFlowService`]만 호출하고, 돌려받은 [`FlowOutcome`]을
//! 302 응답과 쿠키로 옮깁니다.

pub mod error;
pub mod http;
pub mod provider;
pub mod github;
pub mod kakao;
pub mod state;
pub mod reconciler;
pub mod orchestrator;

pub use error::IdentityError;
pub use provider::{IdentityProvider, ProviderSettings};
pub use github::GitHubProvider;
pub use kakao::KakaoProvider;
pub use state::{IssuedState, OAuthStateSigner};
pub use reconciler::{DeletionOutcome, IdentityReconciler};
pub use orchestrator::{FlowOutcome, IdentityFlowService, SessionDirective, StateBinding};
