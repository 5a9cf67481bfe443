use crate::core::{AvatarSource, EmployeeProfile, ProfileSource};
use crate::domain::model::DEFAULT_MAX_AVATAR_BYTES;
use crate::utils::error::{OnePagerError, Result};
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use reqwest::{Client, StatusCode};
use std::collections::HashMap;
use std::time::Duration;

/// Profile service client.
///
/// `GET {endpoint}/employees/{id}` returns the profile JSON and
/// `GET {endpoint}/employees/{id}/avatar` the raw image; 404 means "none".
/// Avatar bodies are read chunk by chunk and never buffered past
/// `max_avatar_bytes`.
#[derive(Debug, Clone)]
pub struct HttpProfileSource {
    client: Client,
    endpoint: String,
    max_avatar_bytes: usize,
}

impl HttpProfileSource {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            endpoint: endpoint.into().trim_end_matches('/').to_string(),
            max_avatar_bytes: DEFAULT_MAX_AVATAR_BYTES,
        }
    }

    pub fn with_options(
        endpoint: impl Into<String>,
        headers: Option<&HashMap<String, String>>,
        timeout_seconds: Option<u64>,
    ) -> Result<Self> {
        let mut builder = Client::builder();

        if let Some(headers) = headers {
            let mut map = HeaderMap::new();
            for (key, value) in headers {
                let name = HeaderName::from_bytes(key.as_bytes()).map_err(|e| {
                    OnePagerError::InvalidConfigValueError {
                        field: "source.headers".to_string(),
                        value: key.clone(),
                        reason: e.to_string(),
                    }
                })?;
                let value = HeaderValue::from_str(value).map_err(|e| {
                    OnePagerError::InvalidConfigValueError {
                        field: format!("source.headers.{}", key),
                        value: "<redacted>".to_string(),
                        reason: e.to_string(),
                    }
                })?;
                map.insert(name, value);
            }
            builder = builder.default_headers(map);
        }

        if let Some(seconds) = timeout_seconds {
            builder = builder.timeout(Duration::from_secs(seconds));
        }

        Ok(Self {
            client: builder.build()?,
            endpoint: endpoint.into().trim_end_matches('/').to_string(),
            max_avatar_bytes: DEFAULT_MAX_AVATAR_BYTES,
        })
    }

    pub fn with_max_avatar_bytes(mut self, max_avatar_bytes: usize) -> Self {
        self.max_avatar_bytes = max_avatar_bytes;
        self
    }

    pub fn max_avatar_bytes(&self) -> usize {
        self.max_avatar_bytes
    }

    fn avatar_too_large(&self, employee_id: &str, size: impl std::fmt::Display) -> OnePagerError {
        OnePagerError::ProcessingError {
            message: format!(
                "avatar for '{}' is {} bytes, limit is {}",
                employee_id, size, self.max_avatar_bytes
            ),
        }
    }

    fn profile_url(&self, employee_id: &str) -> String {
        format!("{}/employees/{}", self.endpoint, employee_id)
    }

    fn avatar_url(&self, employee_id: &str) -> String {
        format!("{}/employees/{}/avatar", self.endpoint, employee_id)
    }
}

#[async_trait]
impl ProfileSource for HttpProfileSource {
    async fn fetch_profile(&self, employee_id: &str) -> Result<EmployeeProfile> {
        let url = self.profile_url(employee_id);
        tracing::debug!("Making API request to: {}", url);

        let response = self.client.get(&url).send().await?;
        tracing::debug!("API response status: {}", response.status());

        if response.status() == StatusCode::NOT_FOUND {
            return Err(OnePagerError::not_found(employee_id));
        }
        let response = response.error_for_status()?;

        let bytes = response.bytes().await?;
        EmployeeProfile::from_json(&bytes)
    }
}

#[async_trait]
impl AvatarSource for HttpProfileSource {
    async fn fetch_avatar(&self, employee_id: &str) -> Result<Option<Vec<u8>>> {
        let url = self.avatar_url(employee_id);
        tracing::debug!("Making API request to: {}", url);

        let response = self.client.get(&url).send().await?;
        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        let mut response = response.error_for_status()?;

        // 先看 Content-Length，超過上限就不下載
        if let Some(length) = response.content_length() {
            if length > self.max_avatar_bytes as u64 {
                return Err(self.avatar_too_large(employee_id, length));
            }
        }

        let mut buffer = Vec::new();
        while let Some(chunk) = response.chunk().await? {
            let received = buffer.len() + chunk.len();
            if received > self.max_avatar_bytes {
                return Err(self.avatar_too_large(employee_id, format!("at least {}", received)));
            }
            buffer.extend_from_slice(&chunk);
        }

        Ok(Some(buffer))
    }
}
