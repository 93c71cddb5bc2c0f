use bytes::Bytes;
use http::header::CONTENT_TYPE;
use memchr::memmem;
use tracing::{debug, trace};

use crate::{
    utils::{parse_boundary, parse_content_type, parse_part_headers, quoted_param, split_parts, CRLF, CRLFS},
    Error, Result,
};

const CONTENT_DISPOSITION: &[u8] = b"Content-Disposition";
const FILENAME_MARKER: &[u8] = b"filename=\"";
const DEFAULT_FILENAME: &str = "upload.bin";

/// One extracted form field.
///
/// The payload stays raw bytes; only the filename is decoded (lossy UTF-8).
#[derive(Debug, Clone)]
pub struct ExtractedFile {
    /// Filename from the `Content-Disposition` header, or the extractor's
    /// default when the part carries none.
    pub filename: String,
    /// The part's own `Content-Type`, when present and parseable.
    pub content_type: Option<mime::Mime>,
    /// Raw part payload.
    pub payload: Bytes,
}

/// Pulls one named file field out of a buffered `multipart/form-data` body.
///
/// Stateless; one instance can serve any number of bodies.
#[derive(Debug, Clone)]
pub struct Extractor {
    field_name: String,
    default_filename: String,
}

impl Extractor {
    /// Creates an extractor targeting `field_name`.
    pub fn new(field_name: impl Into<String>) -> Self {
        Self {
            field_name: field_name.into(),
            default_filename: DEFAULT_FILENAME.to_owned(),
        }
    }

    /// Filename to report when the matched part has no `filename` parameter.
    #[must_use]
    pub fn default_filename(mut self, filename: impl Into<String>) -> Self {
        self.default_filename = filename.into();
        self
    }

    /// Extracts the target field from `body`.
    ///
    /// `content_type` is the raw `Content-Type` header of the request; it
    /// must name `multipart/form-data` and carry a `boundary` parameter.
    /// The first part whose `Content-Disposition` names the field wins;
    /// later matches are ignored.
    pub fn extract(&self, body: &[u8], content_type: &str) -> Result<ExtractedFile> {
        let boundary = parse_boundary(content_type)?;
        trace!(boundary, "parsed boundary");

        // `name="<field>"` with the closing quote, so `file` never matches
        // a part named `filename`.
        let mut marker = Vec::with_capacity(7 + self.field_name.len());
        marker.extend_from_slice(b"name=\"");
        marker.extend_from_slice(self.field_name.as_bytes());
        marker.push(b'"');

        let part = split_parts(body, boundary.as_bytes())
            .into_iter()
            .map(Part::new)
            .find(|part| part.is_field(&marker))
            .ok_or_else(|| Error::FieldNotFound(self.field_name.clone()))?;

        let payload = part
            .payload()
            .ok_or_else(|| Error::MalformedPart(self.field_name.clone()))?;

        let filename = part
            .filename()
            .unwrap_or_else(|| self.default_filename.clone());

        debug!(
            field = %self.field_name,
            filename = %filename,
            size = payload.len(),
            "extracted form part"
        );

        Ok(ExtractedFile {
            filename,
            content_type: part.content_type(),
            payload: Bytes::copy_from_slice(payload),
        })
    }
}

/// Extracts `field_name` from `body` with default settings.
///
/// See [`Extractor::extract`].
pub fn extract(body: &[u8], content_type: &str, field_name: &str) -> Result<ExtractedFile> {
    Extractor::new(field_name).extract(body, content_type)
}

/// One candidate slice between two boundary delimiters.
///
/// Offsets are resolved once at construction; all lookups below are pure
/// functions over `bytes`.
struct Part<'a> {
    bytes: &'a [u8],
    /// Offset of the first `\r\n\r\n`, when present.
    headers_end: Option<usize>,
}

impl<'a> Part<'a> {
    fn new(raw: &'a [u8]) -> Self {
        // The delimiter line's trailing CRLF lands at the front of the
        // candidate; drop it so the slice starts at the header block.
        let bytes = raw.strip_prefix(&CRLF[..]).unwrap_or(raw);
        Self {
            bytes,
            headers_end: memmem::find(bytes, &CRLFS),
        }
    }

    /// Header block, or the whole slice when the blank-line separator is
    /// missing. A separator-less part can still match its field and is then
    /// reported as malformed, rather than silently skipped.
    fn header_region(&self) -> &'a [u8] {
        match self.headers_end {
            Some(end) => &self.bytes[..end],
            None => self.bytes,
        }
    }

    fn is_field(&self, name_marker: &[u8]) -> bool {
        let region = self.header_region();
        memmem::find(region, CONTENT_DISPOSITION).is_some()
            && memmem::find(region, name_marker).is_some()
    }

    fn filename(&self) -> Option<String> {
        quoted_param(self.header_region(), FILENAME_MARKER)
            .map(|raw| String::from_utf8_lossy(raw).into_owned())
    }

    fn content_type(&self) -> Option<mime::Mime> {
        let end = self.headers_end?;
        let headers = parse_part_headers(&self.bytes[..end + CRLFS.len()])?;
        parse_content_type(headers.get(CONTENT_TYPE))
    }

    /// Payload bytes: everything between the first `\r\n\r\n` and the last
    /// `\r\n` of the part. `None` when the separator is missing or the
    /// range is empty or inverted.
    fn payload(&self) -> Option<&'a [u8]> {
        let start = self.headers_end? + CRLFS.len();
        let end = memmem::rfind(self.bytes, &CRLF)?;
        if end <= start {
            return None;
        }
        Some(&self.bytes[start..end])
    }
}
