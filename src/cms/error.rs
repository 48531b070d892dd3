//! Content API error types.

use thiserror::Error;

/// Failure of a content API call. Loaders never catch these; the server
/// turns `NotFound` into a 404 page and everything else into a 500.
#[derive(Debug, Error)]
pub enum CmsError {
    #[error("request to `{url}` failed")]
    Http {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("`{url}` answered with status {status}")]
    Status { url: String, status: u16 },

    #[error("no `{kind}` document with uid `{uid}`")]
    NotFound { kind: String, uid: String },

    #[error("content API at `{0}` exposes no master ref")]
    MissingRef(String),

    #[error(transparent)]
    Decode(#[from] DecodeError),
}

impl CmsError {
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}

/// A document payload that does not match the typed record expected for it.
#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("document `{id}` is a `{found}`, expected `{expected}`")]
    WrongType {
        id: String,
        expected: &'static str,
        found: String,
    },

    #[error("document `{id}` ({kind}) has an invalid payload: {source}")]
    Payload {
        id: String,
        kind: String,
        #[source]
        source: serde_json::Error,
    },
}
