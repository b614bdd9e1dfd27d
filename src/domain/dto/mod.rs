//! # Data Transfer Objects
//!
//! HTTP 계층과 서비스 계층 사이에서 오가는 요청/응답 타입입니다.
//! 엔티티를 그대로 노출하지 않고, 응답 DTO는 `From<User>`로 변환합니다.

pub mod users;

pub use users::*;
