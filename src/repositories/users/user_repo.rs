//! # 사용자 리포지토리 구현
//!
//! MongoDB `users` 컬렉션을 주 저장소로, Redis 를 조회 캐시로 사용합니다.
//!
//! ## 캐시 키
//!
//! - `user:email:{email}` (10분)
//! - `user:id:{hex}` (10분)
//!
//! 쓰기와 삭제는 두 키를 항상 함께 무효화합니다. 삭제 직후 캐시에서
//! 지워진 사용자가 다시 나타나지 않도록 하기 위함입니다.

use std::sync::Arc;
use async_trait::async_trait;
use mongodb::{bson::{doc, oid::ObjectId}, options::IndexOptions, Collection, IndexModel};
use singleton_macro::repository;
use crate::{
    caching::redis::RedisClient,
    db::Database,
    domain::entities::users::user::User,
    errors::AppError,
};
use super::user_store::UserStore;

const COLLECTION: &str = "users";
const CACHE_TTL_SECS: u64 = 600;
const DUPLICATE_KEY: i32 = 11000;

/// `Database`와 `RedisClient`는 `ServiceLocator`에서 주입됩니다.
#[repository(name = "user", collection = "users")]
pub struct UserRepository {
    db: Arc<Database>,

    redis_client: Arc<RedisClient>,
}

impl UserRepository {
    fn users(&self) -> Collection<User> {
        self.db.collection::<User>(COLLECTION)
    }

    fn email_key(email: &str) -> String {
        format!("user:email:{}", email)
    }

    fn id_key(id: &str) -> String {
        format!("user:id:{}", id)
    }

    async fn cache(&self, key: &str, user: &User) {
        if let Err(e) = self.redis_client.set_with_expiry(key, user, CACHE_TTL_SECS).await {
            log::debug!("사용자 캐시 저장 실패 ({}): {}", key, e);
        }
    }

    async fn invalidate(&self, user: &User) {
        let mut keys = vec![Self::email_key(&user.email)];
        if let Some(id) = user.id_string() {
            keys.push(Self::id_key(&id));
        }

        if let Err(e) = self.redis_client.del_multiple(&keys).await {
            log::warn!("사용자 캐시 무효화 실패: {}", e);
        }
    }

    async fn find_uncached(&self, filter: mongodb::bson::Document) -> Result<Option<User>, AppError> {
        Ok(self.users().find_one(filter).await?)
    }

    pub async fn create_indexes(&self) -> Result<(), AppError> {
        self.users()
            .create_indexes(user_indexes())
            .await?;

        log::info!("users 컬렉션 인덱스 확인 완료");
        Ok(())
    }
}

/// email, username 은 유니크. `email_secret`은 인증을 마친 사용자와 소셜 사용자가
/// 모두 빈 문자열을 가지므로 일반 인덱스입니다.
fn user_indexes() -> Vec<IndexModel> {
    // 이메일 유니크 인덱스
    let email_index = IndexModel::builder()
        .keys(doc! { "email": 1 })
        .options(IndexOptions::builder()
            .unique(true)
            .name("email_unique".to_string())
            .build())
        .build();

    // 사용자명 유니크 인덱스
    let username_index = IndexModel::builder()
        .keys(doc! { "username": 1 })
        .options(IndexOptions::builder()
            .unique(true)
            .name("username_unique".to_string())
            .build())
        .build();

    let secret_index = IndexModel::builder()
        .keys(doc! { "email_secret": 1 })
        .options(IndexOptions::builder()
            .name("email_secret".to_string())
            .build())
        .build();

    let created_at_index = IndexModel::builder()
        .keys(doc! { "created_at": -1 })
        .options(IndexOptions::builder()
            .name("created_at_desc".to_string())
            .build())
        .build();

    vec![email_index, username_index, secret_index, created_at_index]
}

fn is_duplicate_key(error: &mongodb::error::Error) -> bool {
    use mongodb::error::{ErrorKind, WriteFailure};

    match error.kind.as_ref() {
        ErrorKind::Write(WriteFailure::WriteError(e)) => e.code == DUPLICATE_KEY,
        ErrorKind::InsertMany(e) => e
            .write_errors
            .as_ref()
            .is_some_and(|errors| errors.iter().any(|e| e.code == DUPLICATE_KEY)),
        _ => false,
    }
}

fn parse_object_id(id: &str) -> Result<ObjectId, AppError> {
    ObjectId::parse_str(id)
        .map_err(|_| AppError::ValidationError("유효하지 않은 ID 형식입니다".to_string()))
}

#[async_trait]
impl UserStore for UserRepository {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        // 캐시에서 먼저 확인
        let cache_key = Self::email_key(email);

        if let Ok(Some(cached)) = self.redis_client.get::<User>(&cache_key).await {
            return Ok(Some(cached));
        }

        let user = self.find_uncached(doc! { "email": email }).await?;

        if let Some(ref user) = user {
            self.cache(&cache_key, user).await;
        }

        Ok(user)
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<User>, AppError> {
        let object_id = parse_object_id(id)?;
        let cache_key = Self::id_key(id);

        if let Ok(Some(cached)) = self.redis_client.get::<User>(&cache_key).await {
            return Ok(Some(cached));
        }

        let user = self.find_uncached(doc! { "_id": object_id }).await?;

        if let Some(ref user) = user {
            self.cache(&cache_key, user).await;
        }

        Ok(user)
    }

    async fn find_by_email_secret(&self, secret: &str) -> Result<Option<User>, AppError> {
        if secret.is_empty() {
            return Ok(None);
        }
        self.find_uncached(doc! { "email_secret": secret }).await
    }

    async fn create(&self, mut user: User) -> Result<User, AppError> {
        // 중복 확인
        if self.find_uncached(doc! { "email": &user.email }).await?.is_some() {
            return Err(AppError::ConflictError("이미 사용 중인 이메일입니다".to_string()));
        }

        if self.find_uncached(doc! { "username": &user.username }).await?.is_some() {
            return Err(AppError::ConflictError("이미 사용 중인 사용자명입니다".to_string()));
        }

        // 동시 가입은 유니크 인덱스가 막습니다.
        let result = self.users()
            .insert_one(&user)
            .await
            .map_err(|e| {
                if is_duplicate_key(&e) {
                    AppError::ConflictError("이미 사용 중인 이메일입니다".to_string())
                } else {
                    AppError::from(e)
                }
            })?;

        user.id = result.inserted_id.as_object_id();
        if user.id.is_none() {
            return Err(AppError::DatabaseError("삽입된 문서의 ID를 확인할 수 없습니다".to_string()));
        }

        self.invalidate(&user).await;
        log::info!("사용자 생성: {} ({})", user.email, user.login_method);

        Ok(user)
    }

    async fn update(&self, user: &User) -> Result<User, AppError> {
        let object_id = user.id
            .ok_or_else(|| AppError::ValidationError("ID가 없는 사용자는 수정할 수 없습니다".to_string()))?;

        let mut updated = user.clone();
        updated.updated_at = mongodb::bson::DateTime::now();

        // login_method 가 다르면 매칭되지 않으므로 변경될 수 없습니다.
        let result = self.users()
            .replace_one(
                doc! { "_id": object_id, "login_method": user.login_method.as_str() },
                &updated,
            )
            .await?;

        if result.matched_count == 0 {
            // 캐시에서 읽은 사용자가 이미 지워졌을 수 있습니다.
            self.invalidate(user).await;
            return Err(AppError::NotFound("사용자를 찾을 수 없습니다".to_string()));
        }

        self.invalidate(&updated).await;
        Ok(updated)
    }

    async fn delete(&self, user: &User) -> Result<bool, AppError> {
        let Some(object_id) = user.id else {
            return Ok(false);
        };

        let result = self.users()
            .delete_one(doc! { "_id": object_id })
            .await?;

        // 삭제 결과와 무관하게 남은 캐시는 지웁니다.
        self.invalidate(user).await;

        Ok(result.deleted_count > 0)
    }
}
