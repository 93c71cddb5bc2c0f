//! Buffered `multipart/form-data` field extraction for proxy handlers.
//!
//! A request body that has already been read into memory is scanned for one
//! named file field; the field's filename and raw payload come back as an
//! [`ExtractedFile`]. The payload can then be re-wrapped with a
//! [`MultipartWriter`] into a fresh multipart body for a downstream API, or
//! the whole extract-and-rewrap step can be driven by [`prepare_upstream`]
//! with an [`UpstreamConfig`].
//!
//! # Example
//!
//! ```rust
//! use form_extract::{extract, MultipartWriter};
//!
//! # fn main() -> form_extract::Result<()> {
//! let mut writer = MultipartWriter::with_boundary("XYZ");
//! writer.add_file("file", "clip.webm", "audio/webm", b"\x00\x01\x02binarydata");
//! let body = writer.finish();
//!
//! let file = extract(&body, "multipart/form-data; boundary=XYZ", "file")?;
//!
//! assert_eq!(file.filename, "clip.webm");
//! assert_eq!(&file.payload[..], b"\x00\x01\x02binarydata");
//! # Ok(())
//! # }
//! ```
//!
//! The extractor participates in, but does not define, the
//! `multipart/form-data` wire format ([rfc7578]). It never reads from a
//! socket and never enforces a size limit; the caller owns both.
//!
//! [rfc7578]: <https://tools.ietf.org/html/rfc7578>

#![forbid(unsafe_code)]
#![deny(nonstandard_style)]
#![warn(missing_docs, unreachable_pub)]

mod config;
mod error;
mod extract;
mod proxy;
mod utils;
mod writer;

pub use config::UpstreamConfig;

pub use error::Error;

pub use extract::{extract, ExtractedFile, Extractor};

pub use proxy::{prepare_upstream, Prepared, ProxyError, Transcription, UpstreamRequest};

pub use writer::MultipartWriter;

/// Crate result alias.
pub type Result<T, E = Error> = std::result::Result<T, E>;
