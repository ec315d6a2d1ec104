use std::time::Duration;

use crawler_core::{PersistedConfigRecord, Platform, PlatformStatistics, StatusReport};
use crawler_logging::crawler_debug;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::json;

use crate::types::{Acknowledgement, StatusResponse};
use crate::{ApiError, FailureKind, StartRequest, StatisticsResponse};

#[derive(Debug, Clone)]
pub struct ApiSettings {
    pub base_url: String,
    pub connect_timeout: Duration,
    pub request_timeout: Duration,
}

impl Default for ApiSettings {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:8000/api".to_string(),
            connect_timeout: Duration::from_secs(5),
            request_timeout: Duration::from_secs(10),
        }
    }
}

/// Remote crawler control API.
#[async_trait::async_trait]
pub trait CrawlerApi: Send + Sync {
    async fn get_status(&self) -> Result<StatusReport, ApiError>;

    async fn start_crawler(&self, request: &StartRequest) -> Result<(), ApiError>;

    async fn stop_crawler(&self) -> Result<(), ApiError>;

    /// Mirror a saved record to the remote `config` endpoint.
    async fn update_config(
        &self,
        platform: Platform,
        record: &PersistedConfigRecord,
    ) -> Result<(), ApiError>;

    async fn get_statistics(&self, platform: Platform) -> Result<PlatformStatistics, ApiError>;
}

#[derive(Debug, Clone)]
pub struct ReqwestApi {
    base: reqwest::Url,
    client: reqwest::Client,
}

impl ReqwestApi {
    pub fn new(settings: ApiSettings) -> Result<Self, ApiError> {
        // Url::join drops the last segment unless the base ends with a slash.
        let mut base_url = settings.base_url.trim().to_string();
        if !base_url.ends_with('/') {
            base_url.push('/');
        }
        let base = reqwest::Url::parse(&base_url)
            .map_err(|err| ApiError::new(FailureKind::InvalidUrl, err.to_string()))?;

        let client = reqwest::Client::builder()
            .connect_timeout(settings.connect_timeout)
            .timeout(settings.request_timeout)
            .build()
            .map_err(|err| ApiError::new(FailureKind::Network, err.to_string()))?;

        Ok(Self { base, client })
    }

    fn endpoint(&self, path: &str) -> Result<reqwest::Url, ApiError> {
        self.base
            .join(path)
            .map_err(|err| ApiError::new(FailureKind::InvalidUrl, err.to_string()))
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let url = self.endpoint(path)?;
        crawler_debug!("GET {}", url);
        let response = self.client.get(url).send().await.map_err(map_reqwest_error)?;
        let body = read_success_body(response).await?;
        serde_json::from_slice(&body).map_err(|err| ApiError::new(FailureKind::Decode, err.to_string()))
    }

    async fn post_json<B: Serialize + ?Sized>(&self, path: &str, body: &B) -> Result<(), ApiError> {
        let url = self.endpoint(path)?;
        crawler_debug!("POST {}", url);
        let response = self
            .client
            .post(url)
            .json(body)
            .send()
            .await
            .map_err(map_reqwest_error)?;
        let body = read_success_body(response).await?;

        // An empty or non-JSON 2xx body counts as accepted.
        let ack: Acknowledgement = serde_json::from_slice(&body).unwrap_or_default();
        if ack.success == Some(false) {
            return Err(ApiError::new(FailureKind::Rejected, ack.reason()));
        }
        Ok(())
    }
}

#[async_trait::async_trait]
impl CrawlerApi for ReqwestApi {
    async fn get_status(&self) -> Result<StatusReport, ApiError> {
        let wire: StatusResponse = self.get_json("status").await?;
        Ok(wire.into())
    }

    async fn start_crawler(&self, request: &StartRequest) -> Result<(), ApiError> {
        self.post_json("crawler/start", request).await
    }

    async fn stop_crawler(&self) -> Result<(), ApiError> {
        self.post_json("crawler/stop", &json!({})).await
    }

    async fn update_config(
        &self,
        platform: Platform,
        record: &PersistedConfigRecord,
    ) -> Result<(), ApiError> {
        let record = serde_json::to_value(record)
            .map_err(|err| ApiError::new(FailureKind::Decode, err.to_string()))?;
        let mut config = serde_json::Map::new();
        config.insert(platform.as_str().to_string(), record);
        self.post_json("config", &json!({ "config": config })).await
    }

    async fn get_statistics(&self, platform: Platform) -> Result<PlatformStatistics, ApiError> {
        let wire: StatisticsResponse = self
            .get_json(&format!("statistics/{}", platform.as_str()))
            .await?;
        Ok(wire.normalize())
    }
}

async fn read_success_body(response: reqwest::Response) -> Result<Vec<u8>, ApiError> {
    let status = response.status();
    if !status.is_success() {
        return Err(ApiError::new(
            FailureKind::HttpStatus(status.as_u16()),
            status.to_string(),
        ));
    }
    let bytes = response.bytes().await.map_err(map_reqwest_error)?;
    Ok(bytes.to_vec())
}

fn map_reqwest_error(err: reqwest::Error) -> ApiError {
    if err.is_timeout() {
        return ApiError::new(FailureKind::Timeout, err.to_string());
    }
    if err.is_builder() {
        return ApiError::new(FailureKind::InvalidUrl, err.to_string());
    }
    ApiError::new(FailureKind::Network, err.to_string())
}
