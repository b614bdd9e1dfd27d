//! 소셜 로그인 계정 서비스 백엔드
//!
//! 이메일/비밀번호 계정과 GitHub, Kakao 소셜 로그인을 하나의 사용자 저장소로
//! 묶는 계정 서비스입니다. 소셜 로그인은 인가 코드 교환, 프로필 조회,
//! 기존 계정과의 리컨사일(생성/로그인/로그인 방식 충돌), 세션 발급까지
//! 한 번의 리디렉션 왕복으로 끝나며, Kakao 계정 탈퇴는 프로바이더 연결 끊기가
//! 성공한 뒤에만 로컬 계정을 지웁니다.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────┐
//! │   HTTP Routes   │ ← 리디렉션 경로 + /api/v1 JSON API
//! └─────────────────┘
//!          │
//!          ▼
//! ┌─────────────────┐
//! │    Handlers     │ ← 302 + 플래시 메시지 / JSON 응답
//! └─────────────────┘
//!          │
//!          ▼
//! ┌─────────────────┐
//! │    Services     │ ← IdentityFlowService, UserService, TokenService
//! └─────────────────┘
//!          │
//!          ▼
//! ┌─────────────────┐
//! │  Repositories   │ ← UserStore, AvatarStore
//! └─────────────────┘
//!          │
//!          ▼
//! ┌─────────────────┐
//! │ MongoDB + Redis │ ← 저장소 + 사용자 캐시
//! └─────────────────┘
//! ```
//!
//! # Examples
//!
//! ```rust,ignore
//! use social_login_service::domain::models::oauth::FlowPurpose;
//! use social_login_service::services::identity::IdentityFlowService;
//!
//! let flows = IdentityFlowService::instance()?;
//! let outcome = flows.begin("kakao", FlowPurpose::Login);
//! // outcome.redirect_to == "https://kauth.kakao.com/oauth/authorize?..."
//! ```

pub mod core;
pub mod config;
pub mod db;
pub mod caching;
pub mod domain;
pub mod repositories;
pub mod services;
pub mod utils;
pub mod routes;
pub mod handlers;
pub mod errors;
pub mod middlewares;
