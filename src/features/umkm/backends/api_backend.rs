use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, ACCEPT};
use reqwest::{Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::{debug, error, info};

use super::{not_found, UmkmBackend};
use crate::core::config::ApiConfig;
use crate::core::error::{AppError, Result};
use crate::features::umkm::models::{deserialize_id, NewUmkm, Umkm, UmkmFields};

/// Header carrying the remote API key (`X-API-KEY`)
pub const API_KEY_HEADER: &str = "x-api-key";

/// Remote payloads arrive either bare or wrapped in a `data` envelope
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum Envelope<T> {
    Wrapped { data: T },
    Bare(T),
}

impl<T> Envelope<T> {
    fn into_inner(self) -> T {
        match self {
            Envelope::Wrapped { data } => data,
            Envelope::Bare(value) => value,
        }
    }
}

#[derive(Debug, Deserialize)]
struct CreatedRecord {
    #[serde(deserialize_with = "deserialize_id")]
    id: i64,
}

/// Backend that delegates storage to a remote UMKM REST API
pub struct ApiUmkmBackend {
    http_client: reqwest::Client,
    base_url: String,
}

impl ApiUmkmBackend {
    pub fn new(config: &ApiConfig) -> Result<Self> {
        let api_key = HeaderValue::from_str(&config.api_key)
            .map_err(|e| AppError::Internal(format!("Invalid API key header value: {}", e)))?;

        let mut headers = HeaderMap::new();
        headers.insert(HeaderName::from_static(API_KEY_HEADER), api_key);
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let http_client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(config.timeout)
            .build()
            .map_err(|e| AppError::Internal(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            http_client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    fn record_url(&self, id: i64) -> String {
        format!("{}/{}", self.base_url, id)
    }

    /// Turn a non-success response into the matching error
    async fn check(response: Response, id: Option<i64>) -> Result<Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        if status == StatusCode::NOT_FOUND {
            if let Some(id) = id {
                return Err(not_found(id));
            }
        }

        let body = response.text().await.unwrap_or_default();
        error!("Remote API error: HTTP {} - {}", status, body);
        Err(AppError::Persistence(format!(
            "Remote API error: HTTP {}: {}",
            status, body
        )))
    }

    async fn parse<T: DeserializeOwned>(response: Response) -> Result<T> {
        response
            .json::<Envelope<T>>()
            .await
            .map(Envelope::into_inner)
            .map_err(|e| {
                error!("Failed to parse remote API response: {}", e);
                AppError::Persistence(format!("Failed to parse remote API response: {}", e))
            })
    }
}

fn transport_error(e: reqwest::Error) -> AppError {
    error!("Failed to reach remote API: {}", e);
    AppError::Persistence(format!("Failed to reach remote API: {}", e))
}

#[async_trait]
impl UmkmBackend for ApiUmkmBackend {
    fn name(&self) -> &'static str {
        "api"
    }

    async fn create(&self, record: &NewUmkm) -> Result<i64> {
        debug!("Creating UMKM record via remote API: {}", self.base_url);

        let response = self
            .http_client
            .post(&self.base_url)
            .json(record)
            .send()
            .await
            .map_err(transport_error)?;

        let response = Self::check(response, None).await?;
        let created: CreatedRecord = Self::parse(response).await?;

        info!("UMKM record created remotely: id={}", created.id);
        Ok(created.id)
    }

    async fn list(&self) -> Result<Vec<Umkm>> {
        let response = self
            .http_client
            .get(&self.base_url)
            .send()
            .await
            .map_err(transport_error)?;

        let response = Self::check(response, None).await?;
        Self::parse(response).await
    }

    async fn get(&self, id: i64) -> Result<Umkm> {
        let response = self
            .http_client
            .get(self.record_url(id))
            .send()
            .await
            .map_err(transport_error)?;

        let response = Self::check(response, Some(id)).await?;
        Self::parse(response).await
    }

    async fn update(&self, id: i64, fields: &UmkmFields, new_foto: Option<&str>) -> Result<()> {
        let mut body = serde_json::to_value(fields)
            .map_err(|e| AppError::Internal(format!("Failed to encode update: {}", e)))?;
        if let Some(foto) = new_foto {
            body["foto"] = serde_json::Value::from(foto);
        }

        let response = self
            .http_client
            .post(format!("{}/update", self.record_url(id)))
            .json(&body)
            .send()
            .await
            .map_err(transport_error)?;

        Self::check(response, Some(id)).await?;
        debug!("UMKM record updated remotely: id={}", id);
        Ok(())
    }

    async fn delete(&self, id: i64) -> Result<()> {
        let response = self
            .http_client
            .delete(self.record_url(id))
            .send()
            .await
            .map_err(transport_error)?;

        Self::check(response, Some(id)).await?;
        info!("UMKM record deleted remotely: id={}", id);
        Ok(())
    }
}
