//! # Domain Models Module
//!
//! 영속되지 않는 도메인 모델과 값 객체입니다.
//!
//! - [`oauth`] - 프로바이더 응답과 정규화된 외부 프로필
//! - [`auth`] - 요청에 붙는 인증 사용자, 인증 모드
//! - [`token`] - 세션 토큰 클레임
//! - [`flash`] - 리디렉션 후 한 번 보여 주는 메시지

pub mod oauth;
pub mod auth;
pub mod token;
pub mod flash;
