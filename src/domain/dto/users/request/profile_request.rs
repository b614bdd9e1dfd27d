//! 프로필/비밀번호 수정 요청 DTO
use serde::Deserialize;
use validator::{Validate, ValidationError};
use crate::utils::string_utils::deserialize_optional_string;

/// 프로필 수정 요청. 전달된 필드만 바뀝니다.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateProfileRequest {
    #[serde(default, deserialize_with = "deserialize_optional_string")]
    #[validate(length(max = 80, message = "이름은 80자 이하여야 합니다"))]
    pub first_name: Option<String>,

    #[serde(default, deserialize_with = "deserialize_optional_string")]
    #[validate(length(max = 80, message = "성은 80자 이하여야 합니다"))]
    pub last_name: Option<String>,

    /// 빈 문자열을 보내면 소개가 지워집니다.
    #[serde(default)]
    #[validate(length(max = 500, message = "소개는 500자 이하여야 합니다"))]
    pub bio: Option<String>,
}

impl UpdateProfileRequest {
    pub fn is_empty(&self) -> bool {
        self.first_name.is_none() && self.last_name.is_none() && self.bio.is_none()
    }
}

/// 비밀번호 변경 요청 (로컬 계정 전용)
#[derive(Debug, Clone, Deserialize, Validate)]
#[validate(schema(function = "validate_new_passwords_match"))]
pub struct UpdatePasswordRequest {
    #[validate(length(min = 1, message = "현재 비밀번호를 입력해주세요"))]
    pub old_password: String,

    #[validate(length(min = 8, message = "비밀번호는 최소 8자 이상이어야 합니다"))]
    pub new_password: String,

    pub new_password_confirm: String,
}

fn validate_new_passwords_match(req: &UpdatePasswordRequest) -> Result<(), ValidationError> {
    if req.new_password != req.new_password_confirm {
        return Err(ValidationError::new("passwords_mismatch")
            .with_message("비밀번호가 일치하지 않습니다".into()));
    }
    Ok(())
}
