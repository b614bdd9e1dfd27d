//! # 문자열 유틸리티
//!
//! 이메일 정규화와 선택 입력값 정리에 쓰이는 함수들입니다.

use serde::Deserialize;
use crate::errors::AppError;

/// 앞뒤 공백을 제거하고, 비어 있으면 검증 에러를 돌려줍니다.
pub fn validate_required_string(value: &str, field_name: &str) -> Result<String, AppError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(AppError::ValidationError(
            format!("{}은(는) 필수입니다", field_name)
        ));
    }
    Ok(trimmed.to_string())
}

/// 공백뿐인 값은 `None`으로 바꿉니다.
pub fn clean_optional_string(value: Option<String>) -> Option<String> {
    value.and_then(|s| {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_string())
        }
    })
}

/// 이메일은 모든 로그인 방식에서 계정 식별 키이므로 항상 같은 형태로 저장/조회합니다.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// serde `deserialize_with` 용: 공백 문자열을 `None`으로 역직렬화
pub fn deserialize_optional_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let opt = Option::<String>::deserialize(deserializer)?;
    Ok(clean_optional_string(opt))
}
