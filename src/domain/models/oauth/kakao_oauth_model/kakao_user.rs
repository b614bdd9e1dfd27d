//! Kakao `GET /v2/user/me`, `POST /v1/user/unlink` 응답 모델

use serde::Deserialize;
use crate::domain::models::oauth::profile::ExternalProfile;
use crate::utils::string_utils::{clean_optional_string, normalize_email};

#[derive(Debug, Clone, Default, Deserialize)]
pub struct KakaoAccount {
    pub email: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct KakaoProperties {
    pub nickname: Option<String>,
    pub profile_image: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct KakaoUserMe {
    pub id: Option<i64>,
    #[serde(default)]
    pub kakao_account: KakaoAccount,
    #[serde(default)]
    pub properties: KakaoProperties,
}

impl KakaoUserMe {
    /// 이메일 제공에 동의하지 않은 계정은 `None`.
    pub fn into_profile(self) -> Option<ExternalProfile> {
        let email = clean_optional_string(self.kakao_account.email).map(|e| normalize_email(&e))?;
        let display_name = clean_optional_string(self.properties.nickname)
            .unwrap_or_else(|| email.clone());

        Some(ExternalProfile {
            email,
            display_name,
            bio: None,
            avatar_url: clean_optional_string(self.properties.profile_image),
        })
    }
}

/// 연결 끊기 응답. 성공하면 끊긴 회원번호가 `id`로 옵니다.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct KakaoUnlinkResponse {
    pub id: Option<i64>,
}
