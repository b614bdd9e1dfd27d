//! # Service Layer
//!
//! - [`identity`] - 소셜 로그인/탈퇴 플로우 (토큰 교환, 프로필 조회, 리컨사일)
//! - [`auth`] - 세션 토큰 발급/검증
//! - [`users`] - 로컬 계정, 프로필, 탈퇴
//!
//! 각 서비스는 `instance()`로 얻는 싱글톤이며, 시작 시
//! [`ServiceLocator::initialize_all`](crate::core::ServiceLocator::initialize_all)이 미리 생성합니다.
//! 테스트에서는 `new(...)`로 메모리 저장소를 주입합니다.

pub mod identity;
pub mod auth;
pub mod users;
