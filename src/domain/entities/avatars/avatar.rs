//! 아바타 에셋 엔티티
//!
//! 소셜 로그인 프로필 이미지를 내려받아 `avatars` 컬렉션에 그대로 저장합니다.

use mongodb::bson::{oid::ObjectId, spec::BinarySubtype, Binary, DateTime};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AvatarAsset {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    /// 저장 파일 이름 (`{username}-avatar`)
    pub file_name: String,
    pub content_type: String,
    pub data: Binary,
    pub created_at: DateTime,
}

impl AvatarAsset {
    pub fn new(file_name: String, content_type: String, bytes: Vec<u8>) -> Self {
        Self {
            id: None,
            file_name,
            content_type,
            data: Binary {
                subtype: BinarySubtype::Generic,
                bytes,
            },
            created_at: DateTime::now(),
        }
    }

    pub fn size(&self) -> usize {
        self.data.bytes.len()
    }
}
