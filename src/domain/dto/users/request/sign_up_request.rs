//! 회원 가입 요청 DTO
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

/// 이메일/비밀번호 회원 가입 요청
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[validate(schema(function = "validate_passwords_match"))]
pub struct SignUpRequest {
    #[validate(length(min = 1, max = 80, message = "이름은 1-80자 사이여야 합니다"))]
    pub first_name: String,

    #[serde(default)]
    #[validate(length(max = 80, message = "성은 80자 이하여야 합니다"))]
    pub last_name: String,

    #[validate(email(message = "유효한 이메일 주소를 입력해주세요"))]
    pub email: String,

    #[validate(length(min = 8, message = "비밀번호는 최소 8자 이상이어야 합니다"))]
    pub password: String,

    /// 비밀번호 확인 (password와 일치해야 함)
    pub password_confirm: String,
}

fn validate_passwords_match(req: &SignUpRequest) -> Result<(), ValidationError> {
    if req.password != req.password_confirm {
        return Err(ValidationError::new("passwords_mismatch")
            .with_message("비밀번호가 일치하지 않습니다".into()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(password: &str, confirm: &str) -> SignUpRequest {
        SignUpRequest {
            first_name: "Bob".to_string(),
            last_name: String::new(),
            email: "bob@x.com".to_string(),
            password: password.to_string(),
            password_confirm: confirm.to_string(),
        }
    }

    #[test]
    fn test_valid_sign_up() {
        assert!(request("password123", "password123").validate().is_ok());
    }

    #[test]
    fn test_password_mismatch_fails() {
        assert!(request("password123", "password124").validate().is_err());
    }

    #[test]
    fn test_short_password_fails() {
        let errors = request("short", "short").validate().unwrap_err();
        assert!(errors.field_errors().contains_key("password"));
    }
}
