//! In-memory backend fake shared by the service tests.

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::{Mutex, Notify, RwLock};

use cineflux_model::{
    Content, ContentId, ContentType, FavoriteEntry, PlayerPosition,
    ProgressRecord, VideoSource,
};

use crate::error::{CoreError, Result};
use crate::ports::{CatalogPort, FavoritesPort, ProgressPort};

pub(crate) fn sample_content(title: &str, category: &str) -> Content {
    Content {
        id: ContentId::new(),
        title: title.to_string(),
        description: format!("{title} description"),
        category: category.to_string(),
        video_url: "https://player.vimeo.com/video/76979871".to_string(),
        video_source: VideoSource::Vimeo,
        cover_image: "https://img.example.com/cover.jpg".to_string(),
        content_type: ContentType::Movie,
        duration: Some(120),
        year: Some(2021),
    }
}

/// Fake content/account service backing all three ports.
///
/// Failure toggles simulate transient outages. The catalog pause gate
/// holds exactly one fetch (the next one issued) until released, for
/// stale-query race tests.
#[derive(Default)]
pub(crate) struct FakeBackend {
    contents: RwLock<Vec<Content>>,
    favorites: RwLock<BTreeMap<ContentId, chrono::DateTime<Utc>>>,
    progress: RwLock<HashMap<ContentId, ProgressRecord>>,
    catalog_failing: AtomicBool,
    favorites_failing: AtomicBool,
    progress_failing: AtomicBool,
    upserts: AtomicU64,
    gate: Mutex<Option<Arc<Notify>>>,
    gate_release: Mutex<Option<Arc<Notify>>>,
    gate_entered: Notify,
}

impl FakeBackend {
    pub async fn seed_contents(&self, contents: Vec<Content>) {
        *self.contents.write().await = contents;
    }

    pub async fn seed_favorite(&self, content_id: &ContentId) {
        self.favorites.write().await.insert(*content_id, Utc::now());
    }

    pub async fn seed_progress(&self, record: ProgressRecord) {
        self.progress.write().await.insert(record.content_id, record);
    }

    pub async fn fail_catalog(&self, failing: bool) {
        self.catalog_failing.store(failing, Ordering::SeqCst);
    }

    pub async fn fail_favorites(&self, failing: bool) {
        self.favorites_failing.store(failing, Ordering::SeqCst);
    }

    pub async fn fail_progress(&self, failing: bool) {
        self.progress_failing.store(failing, Ordering::SeqCst);
    }

    pub async fn has_favorite(&self, content_id: &ContentId) -> bool {
        self.favorites.read().await.contains_key(content_id)
    }

    pub async fn progress_record(
        &self,
        content_id: &ContentId,
    ) -> Option<ProgressRecord> {
        self.progress.read().await.get(content_id).cloned()
    }

    pub fn upsert_count(&self) -> u64 {
        self.upserts.load(Ordering::SeqCst)
    }

    /// Hold the next catalog fetch until [`Self::resume_catalog`].
    pub async fn pause_catalog(&self) {
        let gate = Arc::new(Notify::new());
        *self.gate.lock().await = Some(gate.clone());
        *self.gate_release.lock().await = Some(gate);
    }

    /// Wait until a fetch is parked on the gate.
    pub async fn wait_for_catalog_waiter(&self) {
        self.gate_entered.notified().await;
    }

    pub async fn resume_catalog(&self) {
        if let Some(gate) = self.gate_release.lock().await.take() {
            gate.notify_one();
        }
    }
}

#[async_trait]
impl CatalogPort for FakeBackend {
    async fn fetch_contents(
        &self,
        category: Option<&str>,
    ) -> Result<Vec<Content>> {
        let gate = self.gate.lock().await.take();
        if let Some(gate) = gate {
            self.gate_entered.notify_one();
            gate.notified().await;
        }

        if self.catalog_failing.load(Ordering::SeqCst) {
            return Err(CoreError::Network("catalog unavailable".into()));
        }

        let contents = self.contents.read().await;
        Ok(contents
            .iter()
            .filter(|content| {
                category.is_none_or(|category| content.category == category)
            })
            .cloned()
            .collect())
    }

    async fn fetch_content(&self, content_id: &ContentId) -> Result<Content> {
        if self.catalog_failing.load(Ordering::SeqCst) {
            return Err(CoreError::Network("catalog unavailable".into()));
        }
        self.contents
            .read()
            .await
            .iter()
            .find(|content| content.id == *content_id)
            .cloned()
            .ok_or_else(|| CoreError::NotFound("content not found".into()))
    }

    async fn fetch_categories(&self) -> Result<Vec<String>> {
        if self.catalog_failing.load(Ordering::SeqCst) {
            return Err(CoreError::Network("catalog unavailable".into()));
        }
        let contents = self.contents.read().await;
        let mut categories = Vec::new();
        for content in contents.iter() {
            if !categories.contains(&content.category) {
                categories.push(content.category.clone());
            }
        }
        Ok(categories)
    }
}

#[async_trait]
impl FavoritesPort for FakeBackend {
    async fn fetch_favorites(&self) -> Result<Vec<FavoriteEntry>> {
        if self.favorites_failing.load(Ordering::SeqCst) {
            return Err(CoreError::Network("favorites unavailable".into()));
        }
        let favorites = self.favorites.read().await;
        let contents = self.contents.read().await;
        Ok(favorites
            .iter()
            .filter_map(|(content_id, created_at)| {
                contents
                    .iter()
                    .find(|content| content.id == *content_id)
                    .map(|content| FavoriteEntry {
                        content: content.clone(),
                        created_at: *created_at,
                    })
            })
            .collect())
    }

    async fn add_favorite(&self, content_id: &ContentId) -> Result<()> {
        if self.favorites_failing.load(Ordering::SeqCst) {
            return Err(CoreError::Network("favorites unavailable".into()));
        }
        let mut favorites = self.favorites.write().await;
        if favorites.contains_key(content_id) {
            return Err(CoreError::Validation(
                "content already in favorites".into(),
            ));
        }
        favorites.insert(*content_id, Utc::now());
        Ok(())
    }

    async fn remove_favorite(&self, content_id: &ContentId) -> Result<()> {
        if self.favorites_failing.load(Ordering::SeqCst) {
            return Err(CoreError::Network("favorites unavailable".into()));
        }
        if self.favorites.write().await.remove(content_id).is_none() {
            return Err(CoreError::NotFound("favorite not found".into()));
        }
        Ok(())
    }
}

#[async_trait]
impl ProgressPort for FakeBackend {
    async fn fetch_progress(
        &self,
        content_id: &ContentId,
    ) -> Result<Option<ProgressRecord>> {
        if self.progress_failing.load(Ordering::SeqCst) {
            return Err(CoreError::Network("progress unavailable".into()));
        }
        Ok(self.progress.read().await.get(content_id).cloned())
    }

    async fn upsert_progress(
        &self,
        content_id: &ContentId,
        position: PlayerPosition,
    ) -> Result<()> {
        if self.progress_failing.load(Ordering::SeqCst) {
            return Err(CoreError::Network("progress unavailable".into()));
        }
        self.progress.write().await.insert(
            *content_id,
            ProgressRecord {
                content_id: *content_id,
                watched_time: position.watched_time,
                total_duration: position.total_duration,
                last_watched: Utc::now(),
            },
        );
        self.upserts.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    async fn fetch_all_progress(&self) -> Result<Vec<ProgressRecord>> {
        if self.progress_failing.load(Ordering::SeqCst) {
            return Err(CoreError::Network("progress unavailable".into()));
        }
        Ok(self.progress.read().await.values().cloned().collect())
    }
}
