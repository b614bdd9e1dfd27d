//! 사용자 엔티티
//!
//! MongoDB `users` 컬렉션에 저장되는 [`user::User`] 문서를 정의합니다.

pub mod user;

pub use user::User;
