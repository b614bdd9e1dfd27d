//! 프로바이더 호출용 HTTP 클라이언트

use std::time::Duration;
use reqwest::Client;
use crate::errors::AppError;

/// 아바타로 받을 수 있는 최대 크기
pub const MAX_AVATAR_BYTES: usize = 5 * 1024 * 1024;

/// 모든 외부 호출에 같은 타임아웃을 적용하는 클라이언트
pub fn build_http_client(timeout: Duration) -> Result<Client, AppError> {
    Client::builder()
        .timeout(timeout)
        .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
        .build()
        .map_err(|e| AppError::InternalError(format!("HTTP 클라이언트 생성 실패: {}", e)))
}

/// 내려받은 아바타 이미지
#[derive(Debug, Clone)]
pub struct DownloadedImage {
    pub content_type: String,
    pub bytes: Vec<u8>,
}

/// 이미지 URL 을 내려받습니다. 실패 사유는 문자열로 돌려 호출 측이 로그만 남깁니다.
pub async fn download_image(client: &Client, url: &str) -> Result<DownloadedImage, String> {
    download_image_within(client, url, MAX_AVATAR_BYTES).await
}

/// 본문을 청크 단위로 읽다가 `limit`을 넘으면 바로 중단합니다.
async fn download_image_within(client: &Client, url: &str, limit: usize) -> Result<DownloadedImage, String> {
    let mut response = client
        .get(url)
        .send()
        .await
        .map_err(|e| format!("request failed: {}", e))?;

    if !response.status().is_success() {
        return Err(format!("unexpected status {}", response.status()));
    }

    if response.content_length().is_some_and(|len| len > limit as u64) {
        return Err("image too large".to_string());
    }

    let content_type = response
        .headers()
        .get(reqwest::header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("application/octet-stream")
        .to_string();

    let mut bytes = Vec::new();
    while let Some(chunk) = response
        .chunk()
        .await
        .map_err(|e| format!("body read failed: {}", e))?
    {
        if bytes.len() + chunk.len() > limit {
            return Err("image too large".to_string());
        }
        bytes.extend_from_slice(&chunk);
    }

    if bytes.is_empty() {
        return Err("empty body".to_string());
    }

    Ok(DownloadedImage { content_type, bytes })
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn test_download_image() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/a.png"))
            .respond_with(ResponseTemplate::new(200).set_body_raw(vec![1u8, 2, 3], "image/png"))
            .mount(&server)
            .await;

        let client = build_http_client(Duration::from_secs(5)).unwrap();
        let image = download_image(&client, &format!("{}/a.png", server.uri())).await.unwrap();

        assert_eq!(image.content_type, "image/png");
        assert_eq!(image.bytes, vec![1, 2, 3]);
    }

    #[tokio::test]
    async fn test_download_image_failure_status() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let client = build_http_client(Duration::from_secs(5)).unwrap();
        let error = download_image(&client, &format!("{}/missing.png", server.uri())).await.unwrap_err();
        assert!(error.contains("404"));
    }

    #[tokio::test]
    async fn test_download_image_over_limit_is_rejected() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/big.png"))
            .respond_with(ResponseTemplate::new(200).set_body_raw(vec![7u8; 64], "image/png"))
            .mount(&server)
            .await;

        let client = build_http_client(Duration::from_secs(5)).unwrap();
        let url = format!("{}/big.png", server.uri());

        assert_eq!(download_image_within(&client, &url, 16).await.unwrap_err(), "image too large");
        assert_eq!(download_image_within(&client, &url, 64).await.unwrap().bytes.len(), 64);
    }

    #[tokio::test]
    async fn test_slow_avatar_host_times_out() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_raw(vec![1u8], "image/png")
                    .set_delay(Duration::from_secs(3)),
            )
            .mount(&server)
            .await;

        let client = build_http_client(Duration::from_millis(300)).unwrap();
        let error = download_image(&client, &format!("{}/slow.png", server.uri())).await.unwrap_err();

        assert!(error.starts_with("request failed"));
    }
}
