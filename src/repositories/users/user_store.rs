//! 사용자 저장소 추상화
//!
//! 리컨사일러와 사용자 서비스는 이 trait 에만 의존합니다.
//! 운영에서는 [`UserRepository`](super::user_repo::UserRepository)(MongoDB + Redis)가,
//! 테스트에서는 메모리 구현이 주입됩니다.

use async_trait::async_trait;
use crate::domain::entities::users::user::User;
use crate::errors::AppError;

#[async_trait]
pub trait UserStore: Send + Sync {
    /// 정규화된 이메일로 조회
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, AppError>;

    async fn find_by_id(&self, id: &str) -> Result<Option<User>, AppError>;

    async fn find_by_email_secret(&self, secret: &str) -> Result<Option<User>, AppError>;

    /// 새 사용자 저장. 이메일/사용자명이 이미 있으면 `AppError::ConflictError`.
    async fn create(&self, user: User) -> Result<User, AppError>;

    /// 전체 문서 교체. `login_method`는 저장된 값과 같아야 하며 바뀌지 않습니다.
    async fn update(&self, user: &User) -> Result<User, AppError>;

    /// 삭제되었으면 `true`
    async fn delete(&self, user: &User) -> Result<bool, AppError>;
}
