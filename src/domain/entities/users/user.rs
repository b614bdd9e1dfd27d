//! User Entity Implementation
//!
//! 사용자 엔티티의 핵심 구현체입니다.
//! 이메일/비밀번호 가입자와 GitHub/Kakao 소셜 로그인 사용자를 하나의 모델로 표현합니다.

use mongodb::bson::{oid::ObjectId, DateTime};
use serde::{Deserialize, Serialize};
use crate::config::LoginMethod;

/// 사용자 엔티티
///
/// 이메일은 모든 로그인 방식을 통틀어 계정을 식별하는 키입니다.
/// `login_method`는 최초 생성 시 정해지며 이후 변경되지 않습니다.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    /// 사용자 이메일 (unique, 정규화된 소문자)
    pub email: String,
    /// 사용자 이름 (unique). 소셜 로그인 사용자는 이메일과 같습니다.
    pub username: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub bio: String,
    /// 아바타 에셋 ID (hex)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
    /// 가입 시 사용한 로그인 방식
    pub login_method: LoginMethod,
    pub email_verified: bool,
    /// 이메일 인증 키. 인증이 끝나면 빈 문자열로 지워집니다.
    #[serde(default)]
    pub email_secret: String,
    /// 해시된 비밀번호. `None`이면 비밀번호로 로그인할 수 없습니다.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password_hash: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_login_at: Option<DateTime>,
    pub created_at: DateTime,
    pub updated_at: DateTime,
}

impl User {
    /// 새 로컬 사용자 생성 (이메일/패스워드)
    ///
    /// 이메일 인증 전 상태로 시작하며, 인증 키가 함께 발급됩니다.
    pub fn new_password(
        email: String,
        first_name: String,
        last_name: String,
        password_hash: String,
    ) -> Self {
        let now = DateTime::now();

        Self {
            id: None,
            username: email.clone(),
            email,
            first_name,
            last_name,
            bio: String::new(),
            avatar: None,
            login_method: LoginMethod::Password,
            email_verified: false,
            email_secret: uuid::Uuid::new_v4().simple().to_string()[..20].to_string(),
            password_hash: Some(password_hash),
            last_login_at: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// 외부 프로바이더 프로필로 새 사용자 생성
    ///
    /// 프로바이더가 이메일을 확인해 주므로 인증 완료 상태이고,
    /// 비밀번호는 사용할 수 없는 상태로 남습니다.
    pub fn new_external(
        email: String,
        display_name: String,
        bio: Option<String>,
        login_method: LoginMethod,
    ) -> Self {
        let now = DateTime::now();

        Self {
            id: None,
            username: email.clone(),
            email,
            first_name: display_name,
            last_name: String::new(),
            bio: bio.unwrap_or_default(),
            avatar: None,
            login_method,
            email_verified: true,
            email_secret: String::new(),
            password_hash: None,
            last_login_at: Some(now),
            created_at: now,
            updated_at: now,
        }
    }

    /// ID 문자열로 변환
    pub fn id_string(&self) -> Option<String> {
        self.id.as_ref().map(|id| id.to_hex())
    }

    pub fn has_usable_password(&self) -> bool {
        self.password_hash.as_deref().is_some_and(|hash| !hash.is_empty())
    }

    /// 비밀번호 인증이 가능한 사용자인지 확인
    pub fn can_authenticate_with_password(&self) -> bool {
        self.login_method == LoginMethod::Password && self.has_usable_password()
    }

    /// 화면 표시용 이름 (이름이 비어 있으면 username)
    pub fn display_name(&self) -> &str {
        if self.first_name.trim().is_empty() {
            &self.username
        } else {
            &self.first_name
        }
    }
}
