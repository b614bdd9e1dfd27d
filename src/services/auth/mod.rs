//! 인증 서비스
//!
//! - [`token_service`] - 세션 토큰(JWT) 발급/검증

pub mod token_service;

pub use token_service::*;
