use bytes::Bytes;
use http::StatusCode;
use serde::Serialize;
use thiserror::Error;
use tracing::debug;

use crate::{Error, Extractor, MultipartWriter, UpstreamConfig};

const MOCK_TEXT: &str = "This is a mock transcription.";

/// Proxy preparation error
#[derive(Debug, Error)]
pub enum ProxyError {
    /// Inbound body could not be parsed
    #[error(transparent)]
    Extract(#[from] Error),

    /// Mock mode is off and no API key is configured
    #[error("upstream API key is not configured")]
    MissingApiKey,
}

impl ProxyError {
    /// Status code the HTTP layer should answer with.
    #[must_use]
    pub fn status(&self) -> StatusCode {
        match self {
            Self::Extract(e) => e.status(),
            Self::MissingApiKey => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// The fixed response contract of the transcription proxy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Transcription {
    /// Transcribed text.
    pub text: String,
}

/// Everything the caller needs to issue the upstream request.
#[derive(Debug)]
pub struct UpstreamRequest {
    /// Upstream endpoint URL.
    pub endpoint: String,
    /// Value for the `api-key` header.
    pub api_key: String,
    /// Value for the `Content-Type` header.
    pub content_type: String,
    /// Re-wrapped multipart body.
    pub body: Bytes,
}

/// Outcome of [`prepare_upstream`].
#[derive(Debug)]
pub enum Prepared {
    /// Issue this request to the upstream.
    Forward(UpstreamRequest),
    /// Mock mode: answer the client directly with this.
    Mock(Transcription),
}

/// Turns an inbound multipart request into an outbound upstream request.
///
/// Extracts the configured file field and re-wraps it into a fresh
/// multipart body under a new boundary. The part's own content type is
/// forwarded when present, falling back to the configured one. In mock
/// mode a canned [`Transcription`] comes back without the body being
/// inspected at all.
///
/// No I/O happens here; the caller sends [`UpstreamRequest`] with whatever
/// HTTP client it owns.
pub fn prepare_upstream(
    config: &UpstreamConfig,
    body: &[u8],
    content_type: &str,
) -> Result<Prepared, ProxyError> {
    if config.mock {
        debug!("mock mode, skipping upstream");
        return Ok(Prepared::Mock(Transcription {
            text: MOCK_TEXT.to_owned(),
        }));
    }

    let api_key = config.api_key.clone().ok_or(ProxyError::MissingApiKey)?;

    let file = Extractor::new(config.field_name.as_str())
        .default_filename(config.default_filename.as_str())
        .extract(body, content_type)?;

    let forward_type = file
        .content_type
        .as_ref()
        .map(ToString::to_string)
        .unwrap_or_else(|| config.forward_content_type.clone());

    let mut writer = MultipartWriter::new();
    writer.add_file(&config.field_name, &file.filename, &forward_type, &file.payload);

    debug!(
        endpoint = %config.endpoint,
        filename = %file.filename,
        size = file.payload.len(),
        "prepared upstream request"
    );

    Ok(Prepared::Forward(UpstreamRequest {
        endpoint: config.endpoint.clone(),
        api_key,
        content_type: writer.content_type(),
        body: writer.finish(),
    }))
}
