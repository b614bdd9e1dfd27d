use std::future::{ready, Ready};
use actix_web::{Error, FromRequest, HttpMessage, HttpRequest};
use serde::{Deserialize, Serialize};
use crate::config::LoginMethod;

/// 세션 토큰에서 추출된 사용자 정보
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthenticatedUser {
    /// 사용자 고유 ID
    pub user_id: String,

    pub email: String,

    /// 가입 시 사용한 로그인 방식
    pub login_method: LoginMethod,
}

/// ActixWeb FromRequest trait 구현
impl FromRequest for AuthenticatedUser {
    type Error = Error;
    type Future = Ready<actix_web::Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut actix_web::dev::Payload) -> Self::Future {
        match req.extensions().get::<AuthenticatedUser>() {
            Some(user) => ready(Ok(user.clone())),
            None => ready(Err(actix_web::error::ErrorUnauthorized(
                "인증되지 않은 요청입니다"
            ))),
        }
    }
}

/// 선택적 인증 사용자 추출자
#[derive(Debug, Clone)]
pub struct OptionalUser(pub Option<AuthenticatedUser>);

impl FromRequest for OptionalUser {
    type Error = Error;
    type Future = Ready<actix_web::Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut actix_web::dev::Payload) -> Self::Future {
        let user = req.extensions().get::<AuthenticatedUser>().cloned();
        ready(Ok(OptionalUser(user)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::test::TestRequest;

    fn sample(method: LoginMethod) -> AuthenticatedUser {
        AuthenticatedUser {
            user_id: "64b7f0c2a1b2c3d4e5f60718".to_string(),
            email: "a@x.com".to_string(),
            login_method: method,
        }
    }

    #[actix_web::test]
    async fn test_extractors_read_request_extensions() {
        let req = TestRequest::default().to_http_request();
        assert!(AuthenticatedUser::extract(&req).await.is_err());
        assert!(OptionalUser::extract(&req).await.unwrap().0.is_none());

        req.extensions_mut().insert(sample(LoginMethod::GitHub));
        let user = AuthenticatedUser::extract(&req).await.unwrap();
        assert_eq!(user.email, "a@x.com");
        assert!(OptionalUser::extract(&req).await.unwrap().0.is_some());
    }
}
