//! Error types for the content store client and the duplication engine.

use thiserror::Error;

/// Failures reported by a [`crate::api::ContentStore`] implementation.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The requested resource does not exist in the environment.
    #[error("{resource} '{id}' not found")]
    NotFound { resource: &'static str, id: String },

    /// The store rejected the payload (schema or content validation).
    #[error("validation failed: {0}")]
    Validation(String),

    /// The resource was modified since it was read.
    #[error("version mismatch on '{0}'")]
    VersionMismatch(String),

    /// Any other non-success response.
    #[error("API request failed with status {status}: {message}")]
    Api { status: u16, message: String },

    /// Transport-level failure.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The response body did not match the expected shape.
    #[error("unexpected response body: {0}")]
    Decode(#[from] serde_json::Error),

    /// The entry is missing data required for the call (e.g. no version).
    #[error("invalid request: {0}")]
    InvalidRequest(String),
}

impl StoreError {
    pub fn not_found(resource: &'static str, id: impl Into<String>) -> Self {
        Self::NotFound {
            resource,
            id: id.into(),
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Fatal failures of a duplication job.
///
/// Publish failures and unresolved loop references are deliberately absent:
/// they downgrade to warnings in the job report.
#[derive(Debug, Error)]
pub enum DuplicateError {
    /// The target environment lacks content types needed by the reachable entries.
    #[error("target environment does not have these content types [{}]", .0.join(", "))]
    MissingContentTypes(Vec<String>),

    /// Could not load the content types of the target environment.
    #[error("failed to load content types from environment '{environment}': {source}")]
    ContentTypes {
        environment: String,
        #[source]
        source: StoreError,
    },

    /// An entry lookup failed.
    #[error("failed to fetch entry '{id}': {source}")]
    Fetch {
        id: String,
        #[source]
        source: StoreError,
    },

    /// Creating a duplicate was rejected by the target store.
    #[error("failed to create duplicate of entry '{id}' ({content_type}): {source}")]
    Create {
        id: String,
        content_type: String,
        #[source]
        source: StoreError,
    },

    /// Persisting a deferred link rewrite failed.
    #[error("failed to patch duplicate entry '{id}': {source}")]
    Patch {
        id: String,
        #[source]
        source: StoreError,
    },
}

pub type DuplicateResult<T> = Result<T, DuplicateError>;
