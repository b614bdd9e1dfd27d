//! # 아바타 에셋 리포지토리
//!
//! 소셜 로그인 가입 시 내려받은 프로필 이미지를 `avatars` 컬렉션에 저장합니다.
//! 캐시는 두지 않습니다.

use std::sync::Arc;
use async_trait::async_trait;
use mongodb::bson::{doc, oid::ObjectId};
use singleton_macro::repository;
use crate::{
    db::Database,
    domain::entities::avatars::AvatarAsset,
    errors::AppError,
};

const COLLECTION: &str = "avatars";

#[async_trait]
pub trait AvatarStore: Send + Sync {
    /// 저장된 에셋의 ID (hex)
    async fn save(&self, asset: AvatarAsset) -> Result<String, AppError>;

    async fn delete(&self, id: &str) -> Result<bool, AppError>;
}

#[repository(name = "avatar", collection = "avatars")]
pub struct AvatarRepository {
    db: Arc<Database>,
}

#[async_trait]
impl AvatarStore for AvatarRepository {
    async fn save(&self, asset: AvatarAsset) -> Result<String, AppError> {
        let result = self.db.collection::<AvatarAsset>(COLLECTION)
            .insert_one(&asset)
            .await?;

        result.inserted_id
            .as_object_id()
            .map(|id| id.to_hex())
            .ok_or_else(|| AppError::DatabaseError("삽입된 아바타의 ID를 확인할 수 없습니다".to_string()))
    }

    async fn delete(&self, id: &str) -> Result<bool, AppError> {
        let object_id = ObjectId::parse_str(id)
            .map_err(|_| AppError::ValidationError("유효하지 않은 ID 형식입니다".to_string()))?;

        let result = self.db.collection::<AvatarAsset>(COLLECTION)
            .delete_one(doc! { "_id": object_id })
            .await?;

        Ok(result.deleted_count > 0)
    }
}
