//! # OAuth Domain Models Module
//!
//! 소셜 로그인 프로바이더(GitHub, Kakao) 응답 모델과 공통 프로필 모델입니다.
//!
//! ```text
//! oauth/
//! ├── profile.rs            ← ExternalProfile, TokenResponse, FlowPurpose
//! ├── github_oauth_model/   ← GET /user 응답
//! └── kakao_oauth_model/    ← GET /v2/user/me, POST /v1/user/unlink 응답
//! ```
//!
//! 프로바이더별 응답은 `into_profile()`로 [`ExternalProfile`]이 되며,
//! 이메일이 없으면 `None`을 돌려 호출 측이 프로필 조회 실패로 처리합니다.
//!
//! ```rust,ignore
//! let me: KakaoUserMe = response.json().await?;
//! let profile = me.into_profile().ok_or_else(IdentityError::missing_email)?;
//! ```

pub mod profile;
pub mod github_oauth_model;
pub mod kakao_oauth_model;

pub use profile::{ExternalProfile, FlowPurpose, TokenResponse};
pub use github_oauth_model::GitHubUser;
pub use kakao_oauth_model::{KakaoUnlinkResponse, KakaoUserMe};
