//! # Domain Layer Module
//!
//! ```text
//! Domain Layer (이 모듈)
//! ├── entities  - MongoDB 문서와 매핑되는 영속 객체 (User, AvatarAsset)
//! ├── dto       - HTTP 요청/응답 계약
//! └── models    - 프로바이더 응답, 세션 클레임, 플래시 메시지
//!      │
//!      ▼
//! Application Layer (services)
//!      │
//!      ▼
//! Infrastructure Layer (repositories, db, caching)
//! ```
//!
//! 도메인 타입은 데이터베이스나 HTTP 클라이언트에 의존하지 않습니다.
//! 외부 프로바이더 응답은 `models::oauth`에서 [`ExternalProfile`](models::oauth::ExternalProfile)
//! 로 정규화된 뒤에만 서비스 계층으로 넘어갑니다.

pub mod entities;
pub mod dto;
pub mod models;

pub use entities::avatars::AvatarAsset;
pub use entities::users::User;
pub use models::auth::{AuthMode, AuthenticatedUser, OptionalUser};
pub use models::flash::{FlashLevel, FlashMessage};
pub use models::oauth::{ExternalProfile, FlowPurpose};
pub use models::token::{SessionClaims, SessionToken};
