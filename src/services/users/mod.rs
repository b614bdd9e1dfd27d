//! 사용자 계정 서비스

pub mod user_service;

pub use user_service::{SignOutOutcome, UserService};
