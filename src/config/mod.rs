//! # Configuration Module
//!
//! 환경 변수 기반 설정을 한곳에서 읽는 모듈입니다.
//! 설정 구조체는 상태를 갖지 않고, 필요한 시점에 환경 변수를 읽는
//! 연관 함수들로 구성됩니다.
//!
//! ## 모듈 구성
//!
//! - [`data_config`] - 실행 환경, 비밀번호 해싱, HTTP 서버/CORS/Rate Limit
//! - [`auth_config`] - 로그인 방식, GitHub/Kakao OAuth, OAuth state, 세션 토큰
//!
//! ## 환경 파일
//!
//! `PROFILE=dev` 이면 `.env.dev`, `PROFILE=prod` 이면 `.env.prod`,
//! 그 밖에는 `.env` 를 읽습니다 (`main.rs` 참고).
//!
//! ```rust,ignore
//! use crate::config::{GitHubOAuthConfig, OAuthConfig, ServerConfig};
//!
//! let bind = ServerConfig::bind_address();
//! let domain = OAuthConfig::domain();
//! let github_enabled = GitHubOAuthConfig::credentials().is_some();
//! ```

pub mod data_config;
pub mod auth_config;

pub use data_config::*;
pub use auth_config::*;
