//! # Repository Layer
//!
//! 저장소 접근 계층입니다. 서비스는 구체 타입이 아닌 [`UserStore`],
//! [`AvatarStore`] trait 객체에 의존합니다.
//!
//! | 리포지토리 | 컬렉션 | 캐시 |
//! |-----------|--------|------|
//! | [`UserRepository`] | `users` | Redis 10분 |
//! | [`AvatarRepository`] | `avatars` | 없음 |

pub mod users;
pub mod avatars;

#[cfg(test)]
pub mod memory;

pub use users::{UserRepository, UserStore};
pub use avatars::{AvatarRepository, AvatarStore};
