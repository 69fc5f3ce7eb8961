use serde::{Deserialize, Serialize};

use crate::error::{ModelError, Result};
use crate::ids::ContentId;

/// Kind of catalog title
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContentType {
    Movie,
    Series,
}

/// Third-party provider hosting the actual video stream
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VideoSource {
    Vimeo,
    Dailymotion,
    GoogleDrive,
}

/// A published catalog title.
///
/// Immutable from the engine's perspective; the catalog-management
/// collaborator owns writes. The engine only reads.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Content {
    pub id: ContentId,
    pub title: String,
    pub description: String,
    /// Open vocabulary, e.g. "drame", "horreur", "action"
    pub category: String,
    pub video_url: String,
    pub video_source: VideoSource,
    /// Cover image URL
    pub cover_image: String,
    #[serde(rename = "type")]
    pub content_type: ContentType,
    /// Runtime in minutes, when known
    pub duration: Option<u32>,
    pub year: Option<u16>,
}

impl Content {
    /// Sanity-check the fields the engine relies on.
    pub fn validate(&self) -> Result<()> {
        if self.title.trim().is_empty() {
            return Err(ModelError::InvalidContent("empty title".into()));
        }
        if let Some(year) = self.year {
            if !(1900..=2030).contains(&year) {
                return Err(ModelError::InvalidContent(format!(
                    "year {year} out of range"
                )));
            }
        }
        Ok(())
    }
}
