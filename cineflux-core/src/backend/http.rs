//! HTTP backend for the content/account service.
//!
//! Implements the engine ports over the service's REST API. Auth is a
//! bearer credential supplied by an external collaborator; this client
//! stores it opaquely and attaches it to every request.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::{Client, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use tokio::sync::RwLock;

use cineflux_model::{
    Content, ContentId, FavoriteEntry, PlayerPosition, ProgressRecord,
};

use crate::error::{CoreError, Result};
use crate::ports::{CatalogPort, FavoritesPort, ProgressPort};

/// HTTP client for the content/account service.
#[derive(Clone)]
pub struct HttpBackend {
    client: Client,
    base_url: String,
    token_store: Arc<RwLock<Option<String>>>,
}

impl std::fmt::Debug for HttpBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpBackend")
            .field("base_url", &self.base_url)
            .field(
                "has_token",
                &self
                    .token_store
                    .try_read()
                    .map(|t| t.is_some())
                    .unwrap_or(false),
            )
            .finish()
    }
}

impl HttpBackend {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_timeout(base_url, Duration::from_secs(30))
    }

    pub fn with_timeout(base_url: impl Into<String>, timeout: Duration) -> Self {
        let base_url = normalize_base_url(base_url.into());
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .expect("Failed to create HTTP client");

        tracing::info!(%base_url, "creating HTTP backend");

        Self {
            client,
            base_url,
            token_store: Arc::new(RwLock::new(None)),
        }
    }

    /// Set or clear the bearer credential.
    pub async fn set_token(&self, token: Option<String>) {
        *self.token_store.write().await = token;
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}/api/{}", self.base_url, path.trim_start_matches('/'))
    }

    /// Attach the bearer credential, when present.
    async fn authorize(&self, builder: RequestBuilder) -> RequestBuilder {
        if let Some(token) = self.token_store.read().await.as_ref() {
            builder.header("Authorization", format!("Bearer {token}"))
        } else {
            builder
        }
    }

    async fn execute_json<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
    ) -> Result<T> {
        let response = self.authorize(request).await.send().await?;
        let status = response.status();

        if status.is_success() {
            return Ok(response.json::<T>().await?);
        }

        Err(self.error_for(status, response).await)
    }

    async fn execute_ok(&self, request: RequestBuilder) -> Result<()> {
        let response = self.authorize(request).await.send().await?;
        let status = response.status();

        if status.is_success() {
            return Ok(());
        }

        Err(self.error_for(status, response).await)
    }

    async fn error_for(
        &self,
        status: StatusCode,
        response: reqwest::Response,
    ) -> CoreError {
        let detail = response
            .text()
            .await
            .unwrap_or_else(|_| "unknown error".to_string());

        match status {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
                // Credential expired or invalid; drop it so the host
                // re-authenticates instead of hammering the service.
                self.set_token(None).await;
                CoreError::Unauthorized
            }
            StatusCode::NOT_FOUND => CoreError::NotFound(detail),
            StatusCode::BAD_REQUEST | StatusCode::UNPROCESSABLE_ENTITY => {
                CoreError::Validation(detail)
            }
            status => {
                CoreError::Network(format!("status {status}: {detail}"))
            }
        }
    }
}

#[async_trait]
impl CatalogPort for HttpBackend {
    async fn fetch_contents(
        &self,
        category: Option<&str>,
    ) -> Result<Vec<Content>> {
        let mut request = self.client.get(self.url("contents"));
        if let Some(category) = category {
            request = request.query(&[("category", category)]);
        }
        self.execute_json(request).await
    }

    async fn fetch_content(&self, content_id: &ContentId) -> Result<Content> {
        let request = self
            .client
            .get(self.url(&format!("contents/{content_id}")));
        self.execute_json(request).await
    }

    async fn fetch_categories(&self) -> Result<Vec<String>> {
        let request = self.client.get(self.url("categories"));
        self.execute_json(request).await
    }
}

#[async_trait]
impl FavoritesPort for HttpBackend {
    async fn fetch_favorites(&self) -> Result<Vec<FavoriteEntry>> {
        let request = self.client.get(self.url("favorites"));
        self.execute_json(request).await
    }

    async fn add_favorite(&self, content_id: &ContentId) -> Result<()> {
        let request = self
            .client
            .post(self.url(&format!("favorites/{content_id}")));
        self.execute_ok(request).await
    }

    async fn remove_favorite(&self, content_id: &ContentId) -> Result<()> {
        let request = self
            .client
            .delete(self.url(&format!("favorites/{content_id}")));
        self.execute_ok(request).await
    }
}

/// Wire shape of one progress read. The service answers with a zeroed
/// pair (and no timestamp) when the pair is unstarted.
#[derive(Debug, serde::Deserialize)]
struct ProgressResponse {
    watched_time: u32,
    total_duration: u32,
    #[serde(default)]
    last_watched: Option<DateTime<Utc>>,
}

#[async_trait]
impl ProgressPort for HttpBackend {
    async fn fetch_progress(
        &self,
        content_id: &ContentId,
    ) -> Result<Option<ProgressRecord>> {
        let request = self
            .client
            .get(self.url(&format!("watch-progress/{content_id}")));
        let response: ProgressResponse = self.execute_json(request).await?;

        if response.last_watched.is_none()
            && response.watched_time == 0
            && response.total_duration == 0
        {
            return Ok(None);
        }

        Ok(Some(ProgressRecord {
            content_id: *content_id,
            watched_time: response.watched_time,
            total_duration: response.total_duration,
            last_watched: response.last_watched.unwrap_or_else(Utc::now),
        }))
    }

    async fn upsert_progress(
        &self,
        content_id: &ContentId,
        position: PlayerPosition,
    ) -> Result<()> {
        // The service takes the pair as query parameters on the upsert.
        let request = self
            .client
            .post(self.url(&format!("watch-progress/{content_id}")))
            .query(&[
                ("watched_time", position.watched_time),
                ("total_duration", position.total_duration),
            ]);
        self.execute_ok(request).await
    }

    async fn fetch_all_progress(&self) -> Result<Vec<ProgressRecord>> {
        // The service only exposes per-content progress reads, so the
        // bulk load is a catalog sweep joined client-side.
        let contents = self.fetch_contents(None).await?;
        let mut records = Vec::new();

        for content in &contents {
            match self.fetch_progress(&content.id).await {
                Ok(Some(record)) => records.push(record),
                Ok(None) => {}
                Err(CoreError::NotFound(_)) => {}
                Err(err) if err.is_transient() => {
                    tracing::warn!(
                        content_id = %content.id,
                        %err,
                        "skipping progress record during bulk load"
                    );
                }
                Err(err) => return Err(err),
            }
        }

        Ok(records)
    }
}

/// Add a scheme if missing and trim a trailing slash so path joins
/// don't produce double slashes.
fn normalize_base_url(raw: String) -> String {
    let trimmed = raw.trim().trim_end_matches('/').to_string();
    if trimmed.starts_with("http://") || trimmed.starts_with("https://") {
        trimmed
    } else {
        format!("http://{trimmed}")
    }
}
