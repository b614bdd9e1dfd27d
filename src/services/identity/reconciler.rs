//! # Identity Reconciler
//!
//! 외부 프로필을 로컬 사용자와 맞춥니다.
//!
//! ## 로그인
//!
//! 1. 이메일로 조회
//! 2. 있으면 `login_method` 비교. 다르면 [`IdentityError::LoginMethodConflict`],
//!    아무것도 바꾸지 않습니다. 같으면 마지막 로그인 시각만 갱신합니다.
//!    조회 결과가 캐시에만 남은 사용자라 갱신이 `NotFound`로 끝나면 3으로 갑니다.
//! 3. 없으면 비밀번호 없이, 이메일 인증 완료 상태로 생성하고
//!    아바타를 최선 노력으로 붙입니다.
//!
//! ## 탈퇴
//!
//! 프로바이더가 연결 끊기를 확인한 뒤에만 호출됩니다.
//! 사용자가 있으면 삭제, 없으면 아무 일도 하지 않습니다.

use std::sync::Arc;
use mongodb::bson::DateTime;
use reqwest::Client;
use crate::config::LoginMethod;
use crate::domain::entities::{avatars::AvatarAsset, users::user::User};
use crate::domain::models::oauth::ExternalProfile;
use crate::errors::AppError;
use crate::repositories::{AvatarStore, UserStore};
use crate::utils::string_utils::normalize_email;
use super::error::IdentityError;
use super::http::download_image;

/// 탈퇴 처리 결과
#[derive(Debug)]
pub enum DeletionOutcome {
    Deleted(User),
    NotFound,
}

pub struct IdentityReconciler {
    users: Arc<dyn UserStore>,
    avatars: Arc<dyn AvatarStore>,
    http: Client,
}

impl IdentityReconciler {
    pub fn new(users: Arc<dyn UserStore>, avatars: Arc<dyn AvatarStore>, http: Client) -> Self {
        Self { users, avatars, http }
    }

    pub async fn reconcile_login(
        &self,
        profile: &ExternalProfile,
        method: LoginMethod,
    ) -> Result<User, IdentityError> {
        let email = normalize_email(&profile.email);
        if email.is_empty() {
            return Err(IdentityError::missing_email());
        }

        if let Some(existing) = self.users.find_by_email(&email).await? {
            match self.login_existing(existing, method).await {
                Err(IdentityError::Storage(AppError::NotFound(_))) => {
                    log::warn!("조회된 사용자 {} 가 저장소에 없습니다. 새로 가입시킵니다", email);
                }
                result => return result,
            }
        }

        self.sign_up(email, profile, method).await
    }

    async fn sign_up(&self, email: String, profile: &ExternalProfile, method: LoginMethod) -> Result<User, IdentityError> {
        let user = User::new_external(
            email.clone(),
            profile.display_name.clone(),
            profile.bio.clone(),
            method,
        );

        let created = match self.users.create(user).await {
            Ok(created) => created,
            // 동시에 같은 이메일로 가입한 요청이 먼저 끝난 경우
            Err(AppError::ConflictError(_)) => {
                let existing = self.users.find_by_email(&email).await?
                    .ok_or_else(|| AppError::InternalError(format!("{} 가입 충돌 후 조회 실패", email)))?;
                return self.login_existing(existing, method).await;
            }
            Err(e) => return Err(e.into()),
        };

        log::info!("외부 계정으로 신규 가입: {} ({})", created.email, method);

        match profile.avatar_url.as_deref() {
            Some(url) => Ok(self.attach_avatar(created, url).await),
            None => Ok(created),
        }
    }

    async fn login_existing(&self, mut user: User, method: LoginMethod) -> Result<User, IdentityError> {
        if user.login_method != method {
            log::info!(
                "로그인 방식 충돌: {} 는 {} 로 가입됨 (시도: {})",
                user.email, user.login_method, method
            );
            return Err(IdentityError::LoginMethodConflict { existing: user.login_method });
        }

        user.last_login_at = Some(DateTime::now());
        match self.users.update(&user).await {
            Ok(updated) => Ok(updated),
            Err(AppError::NotFound(reason)) => Err(AppError::NotFound(reason).into()),
            Err(e) => {
                log::warn!("마지막 로그인 시각 갱신 실패 ({}): {}", user.email, e);
                Ok(user)
            }
        }
    }

    /// 아바타 다운로드/저장 실패는 로그만 남기고 사용자를 그대로 돌려줍니다.
    async fn attach_avatar(&self, mut user: User, url: &str) -> User {
        let image = match download_image(&self.http, url).await {
            Ok(image) => image,
            Err(reason) => {
                log::warn!("아바타 다운로드 실패 ({}): {}", user.email, reason);
                return user;
            }
        };

        let asset = AvatarAsset::new(
            format!("{}-avatar", user.username),
            image.content_type,
            image.bytes,
        );

        let asset_id = match self.avatars.save(asset).await {
            Ok(id) => id,
            Err(e) => {
                log::warn!("아바타 저장 실패 ({}): {}", user.email, e);
                return user;
            }
        };

        user.avatar = Some(asset_id.clone());
        match self.users.update(&user).await {
            Ok(updated) => updated,
            Err(e) => {
                log::warn!("아바타 연결 실패 ({}): {}", user.email, e);
                if let Err(e) = self.avatars.delete(&asset_id).await {
                    log::debug!("고아 아바타 정리 실패 {}: {}", asset_id, e);
                }
                user.avatar = None;
                user
            }
        }
    }

    /// 연결 끊기가 확인된 이메일의 로컬 계정을 지웁니다.
    ///
    /// 로그인 방식과 무관하게 삭제합니다.
    pub async fn reconcile_deletion(&self, email: &str) -> Result<DeletionOutcome, IdentityError> {
        let email = normalize_email(email);

        let Some(user) = self.users.find_by_email(&email).await? else {
            log::info!("탈퇴 대상 로컬 계정 없음: {}", email);
            return Ok(DeletionOutcome::NotFound);
        };

        if !self.users.delete(&user).await? {
            return Ok(DeletionOutcome::NotFound);
        }

        if let Some(avatar_id) = user.avatar.as_deref() {
            if let Err(e) = self.avatars.delete(avatar_id).await {
                log::warn!("아바타 삭제 실패 {}: {}", avatar_id, e);
            }
        }

        log::info!("계정 삭제: {} ({})", user.email, user.login_method);
        Ok(DeletionOutcome::Deleted(user))
    }
}
