//! Database Connection Management Module
//!
//! MongoDB 연결을 관리합니다. 사용자와 아바타 에셋이 이 데이터베이스에 저장됩니다.
//!
//! # 환경 변수
//!
//! ```bash
//! export MONGODB_URI="mongodb://localhost:27017"
//! export DATABASE_NAME="social_login_dev"
//! ```
//!
//! ```rust,ignore
//! let database = Arc::new(Database::new().await?);
//! ServiceLocator::set(database);
//! ```

use mongodb::{Client, Collection, options::ClientOptions};
use std::env;
use log::info;
use crate::errors::AppError;

/// MongoDB 데이터베이스 연결 래퍼
#[derive(Clone)]
pub struct Database {
    client: Client,
    database_name: String,
}

impl Database {
    /// 환경 변수로 클라이언트를 만들고 `ping`으로 연결을 확인합니다.
    ///
    /// - `MONGODB_URI` (기본값: `mongodb://localhost:27017`)
    /// - `DATABASE_NAME` (기본값: `social_login_dev`)
    pub async fn new() -> Result<Self, AppError> {
        let mongodb_uri = env::var("MONGODB_URI")
            .unwrap_or_else(|_| "mongodb://localhost:27017".to_string());
        let database_name = env::var("DATABASE_NAME")
            .unwrap_or_else(|_| "social_login_dev".to_string());

        let mut client_options = ClientOptions::parse(&mongodb_uri).await?;
        client_options.app_name = Some("social_login_service".to_string());

        let client = Client::with_options(client_options)?;

        client
            .database(&database_name)
            .run_command(mongodb::bson::doc! { "ping": 1 })
            .await?;

        info!("✅ MongoDB 연결 성공: {}", database_name);

        Ok(Self {
            client,
            database_name,
        })
    }

    pub fn get_database(&self) -> mongodb::Database {
        self.client.database(&self.database_name)
    }

    /// 타입이 지정된 컬렉션 핸들
    pub fn collection<T: Send + Sync>(&self, name: &str) -> Collection<T> {
        self.get_database().collection::<T>(name)
    }

    pub fn database_name(&self) -> &str {
        &self.database_name
    }
}
