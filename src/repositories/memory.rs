//! 테스트용 메모리 저장소
//!
//! MongoDB 유니크 인덱스와 `login_method` 고정 규칙을 그대로 흉내 냅니다.

use std::collections::HashMap;
use std::sync::Mutex;
use async_trait::async_trait;
use mongodb::bson::oid::ObjectId;
use crate::domain::entities::{avatars::AvatarAsset, users::user::User};
use crate::errors::AppError;
use super::{AvatarStore, UserStore};

#[derive(Default)]
pub struct InMemoryUserStore {
    users: Mutex<Vec<User>>,
}

impl InMemoryUserStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.users.lock().unwrap().len()
    }

    pub fn snapshot(&self) -> Vec<User> {
        self.users.lock().unwrap().clone()
    }

    /// 테스트 준비용 직접 삽입
    pub fn seed(&self, mut user: User) -> User {
        user.id = Some(ObjectId::new());
        self.users.lock().unwrap().push(user.clone());
        user
    }
}

#[async_trait]
impl UserStore for InMemoryUserStore {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        Ok(self.users.lock().unwrap().iter().find(|u| u.email == email).cloned())
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<User>, AppError> {
        Ok(self.users.lock().unwrap().iter().find(|u| u.id_string().as_deref() == Some(id)).cloned())
    }

    async fn find_by_email_secret(&self, secret: &str) -> Result<Option<User>, AppError> {
        if secret.is_empty() {
            return Ok(None);
        }
        Ok(self.users.lock().unwrap().iter().find(|u| u.email_secret == secret).cloned())
    }

    async fn create(&self, mut user: User) -> Result<User, AppError> {
        let mut users = self.users.lock().unwrap();
        if users.iter().any(|u| u.email == user.email || u.username == user.username) {
            return Err(AppError::ConflictError("이미 사용 중인 이메일입니다".to_string()));
        }
        user.id = Some(ObjectId::new());
        users.push(user.clone());
        Ok(user)
    }

    async fn update(&self, user: &User) -> Result<User, AppError> {
        let mut users = self.users.lock().unwrap();
        let slot = users
            .iter_mut()
            .find(|u| u.id == user.id && u.login_method == user.login_method)
            .ok_or_else(|| AppError::NotFound("사용자를 찾을 수 없습니다".to_string()))?;
        *slot = user.clone();
        Ok(user.clone())
    }

    async fn delete(&self, user: &User) -> Result<bool, AppError> {
        let mut users = self.users.lock().unwrap();
        let before = users.len();
        users.retain(|u| u.id != user.id);
        Ok(users.len() < before)
    }
}

#[derive(Default)]
pub struct InMemoryAvatarStore {
    assets: Mutex<HashMap<String, AvatarAsset>>,
}

impl InMemoryAvatarStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, id: &str) -> Option<AvatarAsset> {
        self.assets.lock().unwrap().get(id).cloned()
    }

    pub fn len(&self) -> usize {
        self.assets.lock().unwrap().len()
    }
}

#[async_trait]
impl AvatarStore for InMemoryAvatarStore {
    async fn save(&self, asset: AvatarAsset) -> Result<String, AppError> {
        let id = ObjectId::new().to_hex();
        self.assets.lock().unwrap().insert(id.clone(), asset);
        Ok(id)
    }

    async fn delete(&self, id: &str) -> Result<bool, AppError> {
        Ok(self.assets.lock().unwrap().remove(id).is_some())
    }
}
