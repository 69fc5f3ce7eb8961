use thiserror::Error;

/// Engine error taxonomy.
///
/// Propagation policy: catalog/favorites/progress reads fail open
/// (last-known or empty state), progress writes fail silent with
/// retry-at-next-tick, favorite toggles fail loud. Nothing here is
/// fatal to the host process.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Transient transport failure; retry-eligible.
    #[error("network failure: {0}")]
    Network(String),

    /// Credential invalid or expired. Propagated so the host can
    /// re-authenticate; never retried silently.
    #[error("unauthorized")]
    Unauthorized,

    /// Referenced record no longer exists. Treated as exclusion, not a
    /// user-visible error.
    #[error("not found: {0}")]
    NotFound(String),

    /// Malformed payload rejected by the service; never auto-retried.
    #[error("validation failure: {0}")]
    Validation(String),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("internal error: {0}")]
    Internal(String),
}

impl From<reqwest::Error> for CoreError {
    fn from(err: reqwest::Error) -> Self {
        CoreError::Network(err.to_string())
    }
}

impl CoreError {
    /// Whether a retry at the next scheduled tick is appropriate.
    pub fn is_transient(&self) -> bool {
        matches!(self, CoreError::Network(_))
    }
}

pub type Result<T> = std::result::Result<T, CoreError>;
