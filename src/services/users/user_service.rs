//! # 사용자 관리 서비스 구현
//!
//! 이메일/비밀번호 계정의 가입, 로그인, 이메일 인증과
//! 모든 계정에 공통인 프로필 조회/수정, 탈퇴를 담당합니다.
//!
//! ```text
//! UserService
//! ├── sign_up / authenticate / verify_email   ← 로컬 계정
//! ├── get_profile / update_profile            ← 공통
//! ├── change_password                         ← 로컬 계정 전용
//! └── delete_account                          ← Kakao 계정은 연결 끊기 플로우로 보냄
//!        │
//!        ▼
//! UserStore (UserRepository: MongoDB + Redis)
//! ```
//!
//! 소셜 로그인으로 만들어진 계정은 비밀번호가 없으므로 비밀번호 로그인/변경이
//! 거부되고, 가입한 프로바이더 이름이 안내됩니다.

use std::sync::Arc;
use std::any::Any;
use bcrypt::hash;
use once_cell::sync::OnceCell;
use validator::Validate;
use crate::{
    config::{LoginMethod, OAuthConfig, PasswordConfig},
    core::registry::ServiceRegistration,
    domain::{
        entities::users::user::User,
        dto::users::request::{SignUpRequest, UpdatePasswordRequest, UpdateProfileRequest},
    },
    errors::AppError,
    repositories::{AvatarRepository, AvatarStore, UserRepository, UserStore},
    utils::string_utils::{normalize_email, validate_required_string},
};

/// 탈퇴 요청 결과
#[derive(Debug)]
pub enum SignOutOutcome {
    /// 로컬에서 바로 삭제됨
    Deleted(User),
    /// 프로바이더 연결 끊기를 먼저 거쳐야 함
    RequiresProviderUnlink(LoginMethod),
}

pub struct UserService {
    users: Arc<dyn UserStore>,
    avatars: Arc<dyn AvatarStore>,
    bcrypt_cost: u32,
}

static USER_SERVICE_INSTANCE: OnceCell<Arc<UserService>> = OnceCell::new();

impl UserService {
    pub fn new(users: Arc<dyn UserStore>, avatars: Arc<dyn AvatarStore>, bcrypt_cost: u32) -> Self {
        Self { users, avatars, bcrypt_cost }
    }

    /// MongoDB/Redis 리포지토리를 사용하는 전역 인스턴스
    pub fn instance() -> Arc<Self> {
        USER_SERVICE_INSTANCE
            .get_or_init(|| {
                Arc::new(Self::new(
                    UserRepository::instance(),
                    AvatarRepository::instance(),
                    PasswordConfig::bcrypt_cost(),
                ))
            })
            .clone()
    }

    /// 이메일/비밀번호 회원 가입
    ///
    /// 인증 링크는 메일 발송 대신 debug 로그로 남깁니다.
    pub async fn sign_up(&self, request: SignUpRequest) -> Result<User, AppError> {
        request.validate()?;

        let email = normalize_email(&request.email);
        let first_name = validate_required_string(&request.first_name, "이름")?;

        if let Some(existing) = self.users.find_by_email(&email).await? {
            return Err(AppError::ConflictError(match existing.login_method {
                LoginMethod::Password => "이미 사용 중인 이메일입니다".to_string(),
                method => format!("Please log in with: {}", method),
            }));
        }

        let start_time = std::time::Instant::now();
        let password_hash = hash(&request.password, self.bcrypt_cost)
            .map_err(|e| AppError::InternalError(format!("비밀번호 해싱 실패: {}", e)))?;
        log::debug!("Password hashing took: {:?}", start_time.elapsed());

        let user = User::new_password(
            email,
            first_name,
            request.last_name.trim().to_string(),
            password_hash,
        );

        let created = self.users.create(user).await?;

        log::info!("로컬 계정 가입: {}", created.email);
        log::debug!(
            "이메일 인증 링크 ({}): {}/verify/{}",
            created.email,
            OAuthConfig::domain(),
            created.email_secret
        );

        Ok(created)
    }

    /// 비밀번호 로그인
    ///
    /// 소셜 계정은 비밀번호가 없으므로 가입한 로그인 방식을 안내합니다.
    pub async fn authenticate(&self, email: &str, password: &str) -> Result<User, AppError> {
        let email = normalize_email(email);

        let mut user = self.users
            .find_by_email(&email)
            .await?
            .ok_or_else(|| AppError::AuthenticationError("잘못된 이메일 또는 비밀번호입니다".to_string()))?;

        if !user.can_authenticate_with_password() {
            return Err(AppError::AuthenticationError(format!("Please log in with: {}", user.login_method)));
        }

        let password_hash = user.password_hash.as_deref()
            .ok_or_else(|| AppError::InternalError("비밀번호 해시가 없습니다".to_string()))?;

        let is_valid = bcrypt::verify(password, password_hash)
            .map_err(|e| AppError::InternalError(format!("비밀번호 검증 실패: {}", e)))?;

        if !is_valid {
            return Err(AppError::AuthenticationError("잘못된 이메일 또는 비밀번호입니다".to_string()));
        }

        user.last_login_at = Some(mongodb::bson::DateTime::now());
        match self.users.update(&user).await {
            Ok(updated) => Ok(updated),
            Err(e) => {
                log::warn!("마지막 로그인 시각 갱신 실패 ({}): {}", user.email, e);
                Ok(user)
            }
        }
    }

    /// 이메일 인증 키 확인
    pub async fn verify_email(&self, key: &str) -> Result<User, AppError> {
        let mut user = self.users
            .find_by_email_secret(key.trim())
            .await?
            .ok_or_else(|| AppError::NotFound("사용자가 존재하지 않습니다.".to_string()))?;

        user.email_verified = true;
        user.email_secret = String::new();

        let updated = self.users.update(&user).await?;
        log::info!("이메일 인증 완료: {}", updated.email);
        Ok(updated)
    }

    pub async fn get_profile(&self, id: &str) -> Result<User, AppError> {
        self.users
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound("사용자를 찾을 수 없습니다".to_string()))
    }

    pub async fn update_profile(&self, id: &str, request: UpdateProfileRequest) -> Result<User, AppError> {
        request.validate()?;
        let mut user = self.get_profile(id).await?;

        if request.is_empty() {
            return Ok(user);
        }

        if let Some(first_name) = request.first_name {
            user.first_name = first_name;
        }
        if let Some(last_name) = request.last_name {
            user.last_name = last_name;
        }
        if let Some(bio) = request.bio {
            user.bio = bio.trim().to_string();
        }

        self.users.update(&user).await
    }

    /// 로컬 계정 비밀번호 변경
    pub async fn change_password(&self, id: &str, request: UpdatePasswordRequest) -> Result<(), AppError> {
        request.validate()?;
        let mut user = self.get_profile(id).await?;

        if !user.can_authenticate_with_password() {
            return Err(AppError::AuthorizationError(format!(
                "{} 계정은 비밀번호를 변경할 수 없습니다", user.login_method
            )));
        }

        let current_hash = user.password_hash.as_deref().unwrap_or_default();
        let is_valid = bcrypt::verify(&request.old_password, current_hash)
            .map_err(|e| AppError::InternalError(format!("비밀번호 검증 실패: {}", e)))?;
        if !is_valid {
            return Err(AppError::ValidationError("현재 비밀번호가 올바르지 않습니다".to_string()));
        }

        user.password_hash = Some(
            hash(&request.new_password, self.bcrypt_cost)
                .map_err(|e| AppError::InternalError(format!("비밀번호 해싱 실패: {}", e)))?,
        );

        self.users.update(&user).await?;
        log::info!("비밀번호 변경: {}", user.email);
        Ok(())
    }

    /// 탈퇴
    ///
    /// Kakao 계정은 프로바이더 연결을 먼저 끊어야 하므로 삭제하지 않고
    /// [`SignOutOutcome::RequiresProviderUnlink`]를 돌려줍니다.
    pub async fn delete_account(&self, id: &str) -> Result<SignOutOutcome, AppError> {
        let user = self.get_profile(id).await?;

        if user.login_method.requires_provider_unlink() {
            return Ok(SignOutOutcome::RequiresProviderUnlink(user.login_method));
        }

        if !self.users.delete(&user).await? {
            return Err(AppError::NotFound("사용자를 찾을 수 없습니다".to_string()));
        }

        if let Some(avatar_id) = user.avatar.as_deref() {
            if let Err(e) = self.avatars.delete(avatar_id).await {
                log::warn!("아바타 삭제 실패 {}: {}", avatar_id, e);
            }
        }

        log::info!("계정 삭제: {} ({})", user.email, user.login_method);
        Ok(SignOutOutcome::Deleted(user))
    }
}

fn user_service_constructor() -> Box<dyn Any + Send + Sync> {
    Box::new(UserService::instance())
}

inventory::submit! {
    ServiceRegistration {
        name: "user_service",
        constructor: user_service_constructor,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repositories::memory::{InMemoryAvatarStore, InMemoryUserStore};

    fn service() -> (Arc<InMemoryUserStore>, UserService) {
        let users = Arc::new(InMemoryUserStore::new());
        let service = UserService::new(users.clone(), Arc::new(InMemoryAvatarStore::new()), 4);
        (users, service)
    }

    fn sign_up_request(email: &str) -> SignUpRequest {
        SignUpRequest {
            first_name: "Bob".to_string(),
            last_name: "Lee".to_string(),
            email: email.to_string(),
            password: "password123".to_string(),
            password_confirm: "password123".to_string(),
        }
    }

    #[tokio::test]
    async fn test_sign_up_then_authenticate() {
        let (_, service) = service();

        let user = service.sign_up(sign_up_request("Bob@X.com")).await.unwrap();
        assert_eq!(user.email, "bob@x.com");
        assert_eq!(user.login_method, LoginMethod::Password);
        assert!(!user.email_verified);

        let logged_in = service.authenticate("bob@x.com", "password123").await.unwrap();
        assert_eq!(logged_in.id, user.id);
        assert!(logged_in.last_login_at.is_some());

        assert!(matches!(
            service.authenticate("bob@x.com", "wrong-password").await,
            Err(AppError::AuthenticationError(_))
        ));
    }

    #[tokio::test]
    async fn test_sign_up_duplicate_email() {
        let (users, service) = service();
        users.seed(User::new_external("bob@x.com".into(), "Bob".into(), None, LoginMethod::GitHub));

        match service.sign_up(sign_up_request("bob@x.com")).await {
            Err(AppError::ConflictError(msg)) => assert_eq!(msg, "Please log in with: github"),
            other => panic!("expected conflict, got {:?}", other.map(|u| u.email)),
        }
    }

    #[tokio::test]
    async fn test_social_account_cannot_use_password() {
        let (users, service) = service();
        users.seed(User::new_external("k@x.com".into(), "Kim".into(), None, LoginMethod::Kakao));

        match service.authenticate("k@x.com", "anything").await {
            Err(AppError::AuthenticationError(msg)) => assert_eq!(msg, "Please log in with: kakao"),
            other => panic!("expected authentication error, got {:?}", other.map(|u| u.email)),
        }
    }

    #[tokio::test]
    async fn test_verify_email_clears_secret() {
        let (users, service) = service();
        let user = service.sign_up(sign_up_request("bob@x.com")).await.unwrap();

        let verified = service.verify_email(&user.email_secret).await.unwrap();
        assert!(verified.email_verified);
        assert!(verified.email_secret.is_empty());
        assert!(users.snapshot()[0].email_verified);

        assert!(matches!(
            service.verify_email(&user.email_secret).await,
            Err(AppError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_update_profile_keeps_login_method() {
        let (users, service) = service();
        let user = users.seed(User::new_external("a@x.com".into(), "Ann".into(), None, LoginMethod::GitHub));
        let id = user.id_string().unwrap();

        let request = UpdateProfileRequest {
            first_name: Some("Anna".to_string()),
            bio: Some("  rustacean ".to_string()),
            ..Default::default()
        };
        let updated = service.update_profile(&id, request).await.unwrap();

        assert_eq!(updated.first_name, "Anna");
        assert_eq!(updated.bio, "rustacean");
        assert_eq!(updated.login_method, LoginMethod::GitHub);
    }

    #[tokio::test]
    async fn test_change_password_only_for_local_accounts() {
        let (users, service) = service();
        let social = users.seed(User::new_external("a@x.com".into(), "Ann".into(), None, LoginMethod::GitHub));
        let request = UpdatePasswordRequest {
            old_password: "x".into(),
            new_password: "new-password".into(),
            new_password_confirm: "new-password".into(),
        };

        assert!(matches!(
            service.change_password(&social.id_string().unwrap(), request.clone()).await,
            Err(AppError::AuthorizationError(_))
        ));

        let local = service.sign_up(sign_up_request("bob@x.com")).await.unwrap();
        let request = UpdatePasswordRequest { old_password: "password123".into(), ..request };
        service.change_password(&local.id_string().unwrap(), request).await.unwrap();

        assert!(service.authenticate("bob@x.com", "new-password").await.is_ok());
        assert!(service.authenticate("bob@x.com", "password123").await.is_err());
    }

    #[tokio::test]
    async fn test_delete_account_routes_kakao_to_unlink() {
        let (users, service) = service();
        let kakao = users.seed(User::new_external("k@x.com".into(), "Kim".into(), None, LoginMethod::Kakao));
        let github = users.seed(User::new_external("g@x.com".into(), "Gil".into(), None, LoginMethod::GitHub));

        assert!(matches!(
            service.delete_account(&kakao.id_string().unwrap()).await.unwrap(),
            SignOutOutcome::RequiresProviderUnlink(LoginMethod::Kakao)
        ));
        assert!(matches!(
            service.delete_account(&github.id_string().unwrap()).await.unwrap(),
            SignOutOutcome::Deleted(_)
        ));

        let remaining = users.snapshot();
        assert_eq!(remaining.len(), 1);
        assert_eq!(remaining[0].email, "k@x.com");
    }
}
