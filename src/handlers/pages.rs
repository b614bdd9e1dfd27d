//! 화면 데이터 핸들러
//!
//! 서버 렌더링 대신 JSON 으로 홈/로그인 화면에 필요한 데이터를 내려주고,
//! 리디렉션으로 넘어온 플래시 메시지는 읽는 즉시 쿠키에서 지웁니다.
use actix_web::{get, HttpRequest, HttpResponse};
use serde::Serialize;
use crate::domain::dto::users::response::{MessagesResponse, UserResponse};
use crate::domain::models::auth::OptionalUser;
use crate::domain::models::flash::FlashMessage;
use crate::services::identity::IdentityFlowService;
use crate::services::users::UserService;
use super::responses::take_flash;

#[derive(Debug, Serialize)]
struct HomePage {
    user: Option<UserResponse>,
    messages: Vec<FlashMessage>,
}

#[derive(Debug, Serialize)]
struct ProviderLink {
    name: String,
    login_url: String,
}

#[derive(Debug, Serialize)]
struct LoginPage {
    providers: Vec<ProviderLink>,
    local_login_url: &'static str,
    signup_url: &'static str,
    messages: Vec<FlashMessage>,
}

#[get("/")]
pub async fn home(req: HttpRequest, user: OptionalUser) -> HttpResponse {
    let profile = match user.0 {
        Some(user) => UserService::instance()
            .get_profile(&user.user_id)
            .await
            .ok()
            .map(UserResponse::from),
        None => None,
    };

    let (flash, removal) = take_flash(&req);

    HttpResponse::Ok()
        .cookie(removal)
        .json(HomePage { user: profile, messages: flash })
}

#[get("/login")]
pub async fn login_page(req: HttpRequest) -> HttpResponse {
    let providers = match IdentityFlowService::instance() {
        Ok(service) => service
            .enabled_providers()
            .into_iter()
            .map(|method| ProviderLink {
                name: method.to_string(),
                login_url: format!("/login/{}", method),
            })
            .collect(),
        Err(e) => {
            log::error!("소셜 로그인 서비스 초기화 실패: {}", e);
            Vec::new()
        }
    };

    let (flash, removal) = take_flash(&req);

    HttpResponse::Ok().cookie(removal).json(LoginPage {
        providers,
        local_login_url: "/api/v1/auth/login",
        signup_url: "/api/v1/auth/signup",
        messages: flash,
    })
}

#[get("/messages")]
pub async fn messages(req: HttpRequest) -> HttpResponse {
    let (flash, removal) = take_flash(&req);
    HttpResponse::Ok().cookie(removal).json(MessagesResponse { messages: flash })
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::{test, App};
    use crate::handlers::responses::{append_flash, FLASH_COOKIE};

    #[actix_web::test]
    async fn test_messages_are_consumed_once() {
        let app = test::init_service(App::new().service(messages)).await;

        let seed = test::TestRequest::default().to_http_request();
        let cookie = append_flash(&seed, FlashMessage::success("Welcome back Ann"));

        let req = test::TestRequest::get().uri("/messages").cookie(cookie).to_request();
        let res = test::call_service(&app, req).await;

        let removal = res.response().cookies().find(|c| c.name() == FLASH_COOKIE).unwrap();
        assert_eq!(removal.value(), "");

        let body: serde_json::Value = test::read_body_json(res).await;
        assert_eq!(body["messages"][0]["message"], "Welcome back Ann");
        assert_eq!(body["messages"][0]["level"], "success");
    }

    #[actix_web::test]
    async fn test_messages_without_cookie_is_empty() {
        let app = test::init_service(App::new().service(messages)).await;

        let req = test::TestRequest::get().uri("/messages").to_request();
        let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;

        assert_eq!(body["messages"], serde_json::json!([]));
    }
}
