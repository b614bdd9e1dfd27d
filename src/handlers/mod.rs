//! # HTTP Request Handlers Module
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//!   Browser / API Client
//! └─────────────────────┬───────────────────────┘
//!                       │ HTTP Request/Response
//! ┌─────────────────────▼───────────────────────┐
//!   Handlers (이 모듈)                             ← Web Layer
//! ├─────────────────────────────────────────────┤
//!   Services - IdentityFlowService, UserService    ← Service Layer
//! ├─────────────────────────────────────────────┤
//!   Repositories - UserRepository, AvatarRepository ← Repository Layer
//! └─────────────────────────────────────────────┘
//! ```
//!
//! ## 모듈 구성
//!
//! - **`identity`**: 소셜 로그인/탈퇴 플로우. 항상 302 + 플래시 메시지
//!   - `GET /login/{provider}`, `GET /login/{provider}/callback`
//!   - `GET /leave/{provider}`, `GET /leave/{provider}/callback`
//! - **`auth`**: 로컬 계정
//!   - `POST /api/v1/auth/signup`, `POST /api/v1/auth/login`
//!   - `POST /logout`, `GET /verify/{key}`, `POST /signout`
//! - **`users`**: 프로필
//!   - `GET /api/v1/users/{id}`, `GET|PUT /api/v1/me`, `PUT /api/v1/me/password`
//! - **`pages`**: 홈/로그인 화면 데이터와 플래시 메시지 조회
//! - **`responses`**: 세션/플래시 쿠키와 리디렉션 응답
//!
//! JSON API 핸들러는 `Result<HttpResponse, AppError>`를 돌려주고,
//! 브라우저 리디렉션 핸들러는 에러를 플래시 메시지로 바꿔 항상 `HttpResponse`를 돌려줍니다.

pub mod auth;
pub mod identity;
pub mod pages;
pub mod responses;
pub mod users;
