//! GitHub `GET /user` 응답 모델

use serde::Deserialize;
use crate::domain::models::oauth::profile::ExternalProfile;
use crate::utils::string_utils::{clean_optional_string, normalize_email};

#[derive(Debug, Clone, Deserialize)]
pub struct GitHubUser {
    pub login: Option<String>,
    pub name: Option<String>,
    /// 공개 이메일이 없는 계정은 `null`
    pub email: Option<String>,
    pub bio: Option<String>,
    pub avatar_url: Option<String>,
}

impl GitHubUser {
    /// 공통 프로필로 정규화합니다. 이메일이 없으면 `None`.
    ///
    /// 표시 이름은 `name` → `login` → 이메일 순으로 고릅니다.
    pub fn into_profile(self) -> Option<ExternalProfile> {
        let email = clean_optional_string(self.email).map(|e| normalize_email(&e))?;
        let display_name = clean_optional_string(self.name)
            .or_else(|| clean_optional_string(self.login))
            .unwrap_or_else(|| email.clone());

        Some(ExternalProfile {
            email,
            display_name,
            bio: clean_optional_string(self.bio),
            avatar_url: clean_optional_string(self.avatar_url),
        })
    }
}
