//! 소셜 로그인 계정 서비스 메인 애플리케이션
//!
//! 환경 파일과 로깅을 준비하고, MongoDB/Redis 연결을 등록한 뒤
//! 모든 컴포넌트를 초기화하고 HTTP 서버를 실행합니다.

use std::io;
use std::sync::Arc;
use actix_cors::Cors;
use actix_web::http::header;
use actix_web::{middleware, App, HttpServer};
use actix_governor::{Governor, GovernorConfigBuilder};
use dotenv::dotenv;
use env_logger::Env;
use log::{error, info};
use social_login_service::caching::redis::RedisClient;
use social_login_service::config::{GitHubOAuthConfig, KakaoOAuthConfig, OAuthConfig, ServerConfig};
use social_login_service::core::registry::ServiceLocator;
use social_login_service::db::Database;
use social_login_service::repositories::UserRepository;
use social_login_service::routes::configure_all_routes;

#[actix_web::main]
async fn main() -> io::Result<()> {
    init_logging();
    load_env_file();

    info!("🚀 소셜 로그인 서비스 시작중...");

    let (database, redis_client) = initialize_data_stores().await?;

    ServiceLocator::set(database);
    ServiceLocator::set(redis_client);

    ServiceLocator::initialize_all()
        .await
        .map_err(|e| io::Error::other(format!("서비스 초기화 실패: {}", e)))?;

    UserRepository::instance()
        .create_indexes()
        .await
        .map_err(|e| io::Error::other(format!("인덱스 생성 실패: {}", e)))?;

    info!("✅ 모든 서비스가 성공적으로 초기화되었습니다!");
    log_identity_providers();

    start_http_server().await
}

/// HTTP 서버를 구성하고 실행합니다
///
/// # Errors
///
/// * `std::io::Error` - Rate Limiter 구성 실패, 포트 바인딩 실패 또는 서버 실행 오류
async fn start_http_server() -> io::Result<()> {
    let bind_address = ServerConfig::bind_address();

    info!("🌐 서버가 http://{} 에서 실행중입니다", bind_address);
    info!("📍 Health check: http://{}/health", bind_address);
    info!("📍 Login: http://{}/login", bind_address);

    let rate_limit = ServerConfig::rate_limit();
    let governor_conf = GovernorConfigBuilder::default()
        .requests_per_second(rate_limit.per_second)
        .burst_size(rate_limit.burst_size)
        .use_headers()
        .finish()
        .ok_or_else(|| io::Error::other("Rate Limiting 설정이 올바르지 않습니다"))?;

    info!(
        "🛡️ Rate Limiting 활성화: 초당 {}요청, 버스트 {}개",
        rate_limit.per_second,
        rate_limit.burst_size
    );

    let allowed_origins = ServerConfig::cors_allowed_origins();

    HttpServer::new(move || {
        App::new()
            .wrap(Governor::new(&governor_conf))
            .wrap(configure_cors(&allowed_origins))
            .wrap(middleware::Logger::default())
            .wrap(middleware::NormalizePath::trim())
            .configure(configure_all_routes)
    })
        .bind(bind_address)?
        .run()
        .await
}

/// PROFILE 환경변수에 따라 환경 파일을 로드합니다
///
/// * `PROFILE=dev` - .env.dev 파일 로드 (기본값)
/// * `PROFILE=prod` - .env.prod 파일 로드
/// * 기타 - 기본 .env 파일 로드
fn load_env_file() {
    let profile = std::env::var("PROFILE").unwrap_or_else(|_| "dev".to_string());

    info!("Current profile: {}", profile);

    match profile.as_str() {
        "prod" => match dotenv::from_filename(".env.prod") {
            Ok(_) => info!(".env.prod 파일 로드 됨"),
            Err(e) => error!(".env.prod 파일 로드 실패: {}", e),
        },
        "dev" => match dotenv::from_filename(".env.dev") {
            Ok(_) => info!(".env.dev 파일 로드 됨"),
            Err(e) => error!(".env.dev 파일 로드 실패: {}", e),
        },
        _ => {
            dotenv().ok();
            info!("기본 .env 파일 로드");
        }
    }
}

/// `RUST_LOG` 기준 로깅 (기본값: "info,actix_web=debug")
///
/// 프로필 파일 로드 결과도 남기도록 가장 먼저 호출합니다.
fn init_logging() {
    env_logger::init_from_env(Env::default().default_filter_or("info,actix_web=debug"));
}

/// MongoDB와 Redis 연결을 초기화합니다
///
/// # Errors
///
/// 어느 한쪽이라도 연결에 실패하면 서버를 띄우지 않습니다.
async fn initialize_data_stores() -> io::Result<(Arc<Database>, Arc<RedisClient>)> {
    info!("📡 데이터베이스 연결 중...");

    let database = Database::new()
        .await
        .map_err(|e| io::Error::other(format!("데이터베이스 연결 실패: {}", e)))?;
    info!("✅ MongoDB 연결 성공");

    let redis_client = RedisClient::new()
        .await
        .map_err(|e| io::Error::other(format!("Redis 연결 실패: {}", e)))?;
    info!("✅ Redis 연결 성공");

    Ok((Arc::new(database), Arc::new(redis_client)))
}

fn log_identity_providers() {
    info!("🔗 OAuth redirect base: {}", OAuthConfig::domain());
    for (name, enabled) in [
        ("GitHub", GitHubOAuthConfig::credentials().is_some()),
        ("Kakao", KakaoOAuthConfig::credentials().is_some()),
    ] {
        if enabled {
            info!("   {} 로그인 활성화", name);
        } else {
            info!("   {} 로그인 비활성화 (자격 증명 없음)", name);
        }
    }
}

/// `CORS_ALLOWED_ORIGINS` 기반 CORS 설정. 세션 쿠키를 위해 자격 증명을 허용합니다.
fn configure_cors(allowed_origins: &[String]) -> Cors {
    allowed_origins
        .iter()
        .fold(Cors::default(), |cors, origin| cors.allowed_origin(origin))
        .allowed_methods(vec!["GET", "POST", "PUT", "DELETE", "OPTIONS"])
        .allowed_headers(vec![
            header::AUTHORIZATION,
            header::ACCEPT,
            header::CONTENT_TYPE,
        ])
        .supports_credentials()
        .max_age(3600)
}
