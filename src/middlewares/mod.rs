//! 미들웨어 모듈
//!
//! 세션 토큰을 검증해 [`AuthenticatedUser`](crate::domain::models::auth::AuthenticatedUser)
//! 를 요청 extension 에 넣는 [`AuthMiddleware`]를 제공합니다.
//!
//! ```rust,ignore
//! App::new()
//!     .service(
//!         web::scope("/api/v1/me")
//!             .wrap(AuthMiddleware::required())
//!             .service(users::get_me)
//!     )
//!     .service(
//!         web::scope("")
//!             .wrap(AuthMiddleware::optional())
//!             .service(pages::home)
//!     )
//! ```

pub mod auth_middleware;
mod auth_inner;

pub use auth_middleware::AuthMiddleware;
