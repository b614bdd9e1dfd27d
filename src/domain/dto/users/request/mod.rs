//! # 사용자 관련 요청 DTO 모듈
//!
//! 클라이언트로부터 받은 JSON/쿼리 데이터를 구조화된 타입으로 바꾸고
//! `validator`로 검증합니다. 검증 실패는 `AppError::ValidationError` (400)로 변환됩니다.
//!
//! ```rust,ignore
//! async fn sign_up(req: web::Json<SignUpRequest>) -> Result<HttpResponse, AppError> {
//!     req.validate()?;
//!     // ...
//! }
//! ```

pub mod auth_request;
pub mod sign_up_request;
pub mod profile_request;

pub use auth_request::{LocalLoginRequest, OAuthCallbackQuery};
pub use sign_up_request::SignUpRequest;
pub use profile_request::{UpdatePasswordRequest, UpdateProfileRequest};
