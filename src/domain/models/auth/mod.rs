//! 요청 단위 인증 모델
//!
//! [`AuthMiddleware`](crate::middlewares::AuthMiddleware)가 세션 토큰을 검증한 뒤
//! request extension 에 넣는 [`AuthenticatedUser`]와 추출자들입니다.

pub mod authenticated_user;
pub mod authentication_request;

pub use authenticated_user::{AuthenticatedUser, OptionalUser};
pub use authentication_request::AuthMode;
