//! HttpRemoteStore — reqwest client for the remote document/blob API

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use shared::models::{
    ActiveSos, Announcement, AppSettings, AttendanceRecord, DutyState, Location, RemoteReport,
    Role, StaffProfile,
};
use shared::{AppError, AppResult};
use std::time::Duration;

use crate::core::config::Config;
use crate::remote::RemoteStore;

#[derive(Debug, Deserialize)]
struct IdResponse {
    id: String,
}

#[derive(Debug, Deserialize)]
struct UrlResponse {
    url: String,
}

#[derive(Debug, Deserialize)]
struct TokensResponse {
    tokens: Vec<String>,
}

/// HTTP client for the remote document store.
pub struct HttpRemoteStore {
    client: Client,
    base_url: String,
}

impl HttpRemoteStore {
    pub fn new(config: &Config) -> AppResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_millis(config.request_timeout_ms))
            .build()
            .map_err(|e| AppError::internal(format!("Failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url: config.remote_url.trim_end_matches('/').to_string(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{path}", self.base_url)
    }

    /// Map a response status to the error taxonomy. Transport errors and
    /// 5xx are transient; 404/409 carry their specific meaning so callers
    /// can distinguish "retry later" from "will never work".
    async fn check(response: reqwest::Response) -> AppResult<reqwest::Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_default();
        Err(match status {
            StatusCode::NOT_FOUND => AppError::not_found(body),
            StatusCode::CONFLICT => AppError::conflict(body),
            StatusCode::FORBIDDEN | StatusCode::UNAUTHORIZED => AppError::unauthorized(body),
            StatusCode::UNPROCESSABLE_ENTITY => AppError::business_rule(body),
            _ => AppError::network(format!("Remote store returned {status}: {body}")),
        })
    }

    async fn get_json<T: serde::de::DeserializeOwned>(&self, path: &str) -> AppResult<Option<T>> {
        let response = self
            .client
            .get(self.url(path))
            .send()
            .await
            .map_err(|e| AppError::network(format!("GET {path} failed: {e}")))?;

        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        let response = Self::check(response).await?;
        let value = response
            .json::<T>()
            .await
            .map_err(|e| AppError::network(format!("Failed to parse {path} response: {e}")))?;
        Ok(Some(value))
    }

    async fn put_json<B: serde::Serialize>(&self, path: &str, body: &B) -> AppResult<()> {
        let response = self
            .client
            .put(self.url(path))
            .json(body)
            .send()
            .await
            .map_err(|e| AppError::network(format!("PUT {path} failed: {e}")))?;
        Self::check(response).await?;
        Ok(())
    }

    async fn post_json<B: serde::Serialize, T: serde::de::DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> AppResult<T> {
        let response = self
            .client
            .post(self.url(path))
            .json(body)
            .send()
            .await
            .map_err(|e| AppError::network(format!("POST {path} failed: {e}")))?;
        let response = Self::check(response).await?;
        response
            .json::<T>()
            .await
            .map_err(|e| AppError::network(format!("Failed to parse {path} response: {e}")))
    }
}

#[async_trait]
impl RemoteStore for HttpRemoteStore {
    async fn get_staff(&self, id: &str) -> AppResult<Option<StaffProfile>> {
        self.get_json(&format!("users/{id}")).await
    }

    async fn update_duty(&self, id: &str, duty: DutyState) -> AppResult<()> {
        self.put_json(&format!("users/{id}/duty"), &duty).await
    }

    async fn list_pending_staff(&self) -> AppResult<Vec<StaffProfile>> {
        Ok(self
            .get_json::<Vec<StaffProfile>>("users?status=pending")
            .await?
            .unwrap_or_default())
    }

    async fn add_points(&self, id: &str, delta: i64) -> AppResult<()> {
        let body = serde_json::json!({ "delta": delta });
        let response = self
            .client
            .post(self.url(&format!("users/{id}/points")))
            .json(&body)
            .send()
            .await
            .map_err(|e| AppError::network(format!("POST users/{id}/points failed: {e}")))?;
        Self::check(response).await?;
        Ok(())
    }

    async fn upload_blob(
        &self,
        key: &str,
        bytes: Vec<u8>,
        content_type: &str,
    ) -> AppResult<String> {
        let response = self
            .client
            .put(self.url(&format!("blobs/{key}")))
            .header(reqwest::header::CONTENT_TYPE, content_type)
            .body(bytes)
            .send()
            .await
            .map_err(|e| AppError::network(format!("Blob upload {key} failed: {e}")))?;
        let response = Self::check(response).await?;
        let parsed: UrlResponse = response
            .json()
            .await
            .map_err(|e| AppError::network(format!("Failed to parse blob response: {e}")))?;
        Ok(parsed.url)
    }

    async fn add_report(&self, report: RemoteReport) -> AppResult<String> {
        let parsed: IdResponse = self.post_json("reports", &report).await?;
        Ok(parsed.id)
    }

    async fn list_locations(&self) -> AppResult<Vec<Location>> {
        Ok(self.get_json("locations").await?.unwrap_or_default())
    }

    async fn get_attendance(&self, key: &str) -> AppResult<Option<AttendanceRecord>> {
        self.get_json(&format!("attendance/{key}")).await
    }

    async fn put_attendance(&self, key: &str, record: AttendanceRecord) -> AppResult<()> {
        self.put_json(&format!("attendance/{key}"), &record).await
    }

    async fn active_sos(&self) -> AppResult<Option<ActiveSos>> {
        self.get_json("sos/active").await
    }

    async fn add_sos(&self, sos: ActiveSos) -> AppResult<String> {
        let parsed: IdResponse = self.post_json("sos", &sos).await?;
        Ok(parsed.id)
    }

    async fn resolve_sos(&self, id: &str, resolved_by: &str, resolved_at: i64) -> AppResult<()> {
        let body = serde_json::json!({ "resolved_by": resolved_by, "resolved_at": resolved_at });
        let response = self
            .client
            .post(self.url(&format!("sos/{id}/resolve")))
            .json(&body)
            .send()
            .await
            .map_err(|e| AppError::network(format!("POST sos/{id}/resolve failed: {e}")))?;
        Self::check(response).await?;
        Ok(())
    }

    async fn get_announcement(&self) -> AppResult<Option<Announcement>> {
        self.get_json("app_config/announcement").await
    }

    async fn set_announcement(&self, announcement: Announcement) -> AppResult<()> {
        self.put_json("app_config/announcement", &announcement).await
    }

    async fn get_app_settings(&self) -> AppResult<Option<AppSettings>> {
        self.get_json("app_config/settings").await
    }

    async fn push_tokens_for_roles(&self, roles: &[Role]) -> AppResult<Vec<String>> {
        let names: Vec<String> = roles
            .iter()
            .map(|r| {
                serde_json::to_value(r)
                    .ok()
                    .and_then(|v| v.as_str().map(str::to_string))
                    .unwrap_or_default()
            })
            .collect();
        let parsed: TokensResponse = self
            .get_json(&format!("users/tokens?roles={}", names.join(",")))
            .await?
            .unwrap_or(TokensResponse { tokens: Vec::new() });
        Ok(parsed.tokens)
    }

    async fn push_tokens_except(&self, exclude_id: &str) -> AppResult<Vec<String>> {
        let parsed: TokensResponse = self
            .get_json(&format!("users/tokens?exclude={exclude_id}"))
            .await?
            .unwrap_or(TokensResponse { tokens: Vec::new() });
        Ok(parsed.tokens)
    }
}
