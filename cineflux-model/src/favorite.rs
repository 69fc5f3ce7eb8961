use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::content::Content;

/// Confirmed favorite membership after a toggle resolves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FavoriteState {
    Favorite,
    NotFavorite,
}

impl FavoriteState {
    pub fn from_membership(is_favorite: bool) -> Self {
        if is_favorite {
            FavoriteState::Favorite
        } else {
            FavoriteState::NotFavorite
        }
    }

    pub fn is_favorite(&self) -> bool {
        matches!(self, FavoriteState::Favorite)
    }
}

/// One favorite as the account service returns it: the membership
/// record with its content embedded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FavoriteEntry {
    pub content: Content,
    pub created_at: DateTime<Utc>,
}
