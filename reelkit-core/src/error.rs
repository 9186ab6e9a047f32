use thiserror::Error;

/// Error taxonomy for the Reelkit core.
///
/// Staleness is deliberately not represented here: a stale capability still
/// resolves and is reported on the resulting handle, never as a failure.
/// Scan read failures likewise degrade to empty results instead of erroring.
#[derive(Error, Debug)]
pub enum CoreError {
    /// The backing registry could not be opened or its schema created.
    /// Fatal at process start; there is no safe degraded mode without it.
    #[error("library registry unavailable: {0}")]
    StoreUnavailable(String),

    /// The platform refused to issue a scoped grant for a location.
    #[error("capability creation failed: {0}")]
    CapabilityCreationFailed(String),

    /// A persisted token could not be resolved back into a location.
    #[error("capability resolution failed: {0}")]
    CapabilityResolutionFailed(String),

    /// The token resolved, but the platform refused to grant live access
    /// (location deleted, access budget exhausted, ...).
    #[error("access denied: {0}")]
    AccessDenied(String),

    /// A navigation request that the current session state does not permit.
    #[error("invalid navigation: {0}")]
    InvalidNavigation(String),

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, CoreError>;
