use http::StatusCode;
use thiserror::Error;

/// Extraction error
#[derive(Debug, Error)]
pub enum Error {
    /// Request content type is not `multipart/form-data`
    #[error("unsupported content type `{0}`, expected `multipart/form-data`")]
    UnsupportedContentType(String),

    /// Content type carries no `boundary` parameter
    #[error("no boundary found in content type")]
    MissingBoundary,

    /// No part names the requested field
    #[error("no form part named `{0}`")]
    FieldNotFound(String),

    /// Matched part has no blank-line separator or an empty payload range
    #[error("malformed form part for field `{0}`")]
    MalformedPart(String),
}

impl Error {
    /// Status code the HTTP layer should answer with. Parsing failures are
    /// never retried, so every kind is a client error.
    #[must_use]
    pub fn status(&self) -> StatusCode {
        StatusCode::BAD_REQUEST
    }
}
