//! # Authentication Configuration Module
//!
//! 소셜 로그인 프로바이더(GitHub, Kakao), OAuth state, 세션 토큰 설정을 관리합니다.
//! 모든 값은 환경 변수에서 읽으며, 프로바이더 자격 증명이 없는 경우
//! 패닉 대신 `None`을 돌려주어 해당 로그인 방식만 비활성화됩니다.
//!
//! ## 필수 환경 변수
//!
//! ```bash
//! # 리디렉션 URI를 만들 때 사용하는 서비스 자체 주소
//! export DOMAIN="https://example.com"
//!
//! # GitHub OAuth App
//! export GH_ID="github-client-id"
//! export GH_SECRET="github-client-secret"
//!
//! # Kakao REST API 키 (client secret은 선택)
//! export KAKAO_ID="kakao-rest-api-key"
//! export KAKAO_SECRET="kakao-client-secret"
//! ```
//!
//! ## 선택 환경 변수
//!
//! ```bash
//! export OAUTH_STATE_SECRET="state-signing-secret"
//! export OAUTH_SESSION_TIMEOUT_MINUTES="10"
//! export OAUTH_HTTP_TIMEOUT_SECS="10"
//! export JWT_SECRET="session-signing-secret"
//! export JWT_EXPIRATION_HOURS="24"
//! ```
//!
//! 프로바이더 엔드포인트는 `GITHUB_TOKEN_URI`, `KAKAO_UNLINK_URI` 처럼
//! 개별적으로 덮어쓸 수 있습니다 (스테이징 프록시, 테스트 서버 등).

use std::env;
use std::fmt;
use std::time::Duration;
use serde::{Deserialize, Serialize};

/// 사용자가 처음 가입할 때 사용한 로그인 방식
///
/// 한 번 저장되면 바뀌지 않으며, 같은 이메일로 다른 방식의 로그인을
/// 시도하면 충돌로 처리됩니다.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LoginMethod {
    /// 이메일/비밀번호 로컬 로그인
    Password,
    /// GitHub OAuth
    GitHub,
    /// Kakao OAuth
    Kakao,
}

impl LoginMethod {
    /// 문자열에서 로그인 방식을 파싱합니다 (대소문자 무관).
    ///
    /// 라우트 경로의 `{provider}` 세그먼트를 해석할 때 사용됩니다.
    pub fn from_str(s: &str) -> Result<Self, String> {
        match s.trim().to_lowercase().as_str() {
            "password" | "email" => Ok(LoginMethod::Password),
            "github" => Ok(LoginMethod::GitHub),
            "kakao" => Ok(LoginMethod::Kakao),
            _ => Err(format!("Unsupported login method: {}", s)),
        }
    }

    /// 저장/직렬화에 쓰이는 소문자 이름
    pub fn as_str(&self) -> &'static str {
        match self {
            LoginMethod::Password => "password",
            LoginMethod::GitHub => "github",
            LoginMethod::Kakao => "kakao",
        }
    }

    /// 외부 프로바이더를 통한 로그인인지 여부
    pub fn is_external(&self) -> bool {
        !matches!(self, LoginMethod::Password)
    }

    /// 탈퇴 전에 프로바이더 연결 끊기가 필요한지 여부
    pub fn requires_provider_unlink(&self) -> bool {
        matches!(self, LoginMethod::Kakao)
    }
}

impl fmt::Display for LoginMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 프로바이더 OAuth 앱 자격 증명
#[derive(Debug, Clone)]
pub struct ProviderCredentials {
    pub client_id: String,
    /// Kakao는 client secret 사용이 선택 사항입니다.
    pub client_secret: Option<String>,
}

/// 프로바이더 REST 엔드포인트 묶음
#[derive(Debug, Clone)]
pub struct ProviderEndpoints {
    pub authorize_uri: String,
    pub token_uri: String,
    pub profile_uri: String,
    /// 연결 끊기(탈퇴) 엔드포인트. 지원하지 않는 프로바이더는 `None`.
    pub unlink_uri: Option<String>,
}

/// GitHub OAuth App 설정
///
/// GitHub Developer settings > OAuth Apps 에서 발급한 값을 사용합니다.
/// Authorization callback URL 은 `{DOMAIN}/login/github/callback` 으로 등록해야 합니다.
pub struct GitHubOAuthConfig;

impl GitHubOAuthConfig {
    /// `GH_ID`, `GH_SECRET` 둘 다 있어야 GitHub 로그인이 활성화됩니다.
    pub fn credentials() -> Option<ProviderCredentials> {
        let client_id = non_empty_var("GH_ID")?;
        let client_secret = non_empty_var("GH_SECRET")?;

        Some(ProviderCredentials {
            client_id,
            client_secret: Some(client_secret),
        })
    }

    pub fn endpoints() -> ProviderEndpoints {
        ProviderEndpoints {
            authorize_uri: var_or("GITHUB_AUTHORIZE_URI", "https://github.com/login/oauth/authorize"),
            token_uri: var_or("GITHUB_TOKEN_URI", "https://github.com/login/oauth/access_token"),
            profile_uri: var_or("GITHUB_PROFILE_URI", "https://api.github.com/user"),
            unlink_uri: None,
        }
    }
}

/// Kakao 로그인 설정
///
/// Kakao Developers 의 REST API 키를 client id 로 사용합니다.
/// Redirect URI 는 로그인과 탈퇴 두 가지를 모두 등록해야 합니다.
///
/// - `{DOMAIN}/login/kakao/callback`
/// - `{DOMAIN}/leave/kakao/callback`
pub struct KakaoOAuthConfig;

impl KakaoOAuthConfig {
    pub fn credentials() -> Option<ProviderCredentials> {
        let client_id = non_empty_var("KAKAO_ID")?;

        Some(ProviderCredentials {
            client_id,
            client_secret: non_empty_var("KAKAO_SECRET"),
        })
    }

    pub fn endpoints() -> ProviderEndpoints {
        ProviderEndpoints {
            authorize_uri: var_or("KAKAO_AUTHORIZE_URI", "https://kauth.kakao.com/oauth/authorize"),
            token_uri: var_or("KAKAO_TOKEN_URI", "https://kauth.kakao.com/oauth/token"),
            profile_uri: var_or("KAKAO_PROFILE_URI", "https://kapi.kakao.com/v2/user/me"),
            unlink_uri: Some(var_or("KAKAO_UNLINK_URI", "https://kapi.kakao.com/v1/user/unlink")),
        }
    }
}

/// 모든 프로바이더에 공통인 OAuth 설정
pub struct OAuthConfig;

impl OAuthConfig {
    /// 리디렉션 URI 를 만들 때 쓰는 서비스 자체 주소 (끝의 `/` 제거)
    pub fn domain() -> String {
        var_or("DOMAIN", "http://localhost:8080")
            .trim_end_matches('/')
            .to_string()
    }

    /// OAuth `state` 서명 키
    pub fn state_secret() -> String {
        env::var("OAUTH_STATE_SECRET")
            .unwrap_or_else(|_| {
                log::warn!("OAUTH_STATE_SECRET not set, using default (not secure for production!)");
                "oauth-state-secret".to_string()
            })
    }

    /// 인증 시작부터 콜백까지 허용하는 시간 (분)
    pub fn session_timeout_minutes() -> i64 {
        env::var("OAUTH_SESSION_TIMEOUT_MINUTES")
            .ok()
            .and_then(|v| v.parse().ok())
            .filter(|m: &i64| *m > 0)
            .unwrap_or(10)
    }

    /// 프로바이더로 나가는 모든 HTTP 호출의 타임아웃
    pub fn http_timeout() -> Duration {
        let secs = env::var("OAUTH_HTTP_TIMEOUT_SECS")
            .ok()
            .and_then(|v| v.parse::<u64>().ok())
            .filter(|s| *s > 0)
            .unwrap_or(10);

        Duration::from_secs(secs)
    }
}

/// 세션 토큰(JWT) 설정
pub struct JwtConfig;

impl JwtConfig {
    pub fn secret() -> String {
        env::var("JWT_SECRET")
            .unwrap_or_else(|_| {
                log::warn!("JWT_SECRET not set, using default (not secure for production!)");
                "your-secret-key".to_string()
            })
    }

    pub fn expiration_hours() -> i64 {
        env::var("JWT_EXPIRATION_HOURS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(24)
    }
}

fn non_empty_var(key: &str) -> Option<String> {
    env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn var_or(key: &str, default: &str) -> String {
    non_empty_var(key).unwrap_or_else(|| default.to_string())
}
