use bytes::{BufMut, Bytes, BytesMut};
use rand::{distributions::Alphanumeric, Rng};

use crate::utils::{CRLF, DASHES};

const BOUNDARY_PREFIX: &str = "----FormBoundary";
const BOUNDARY_RAND_LEN: usize = 32;

/// Builds a `multipart/form-data` body for an outbound request.
///
/// Parts are framed per [rfc7578]: a `--<boundary>` line, header lines, a
/// blank line, the raw payload, a trailing CRLF. [`finish`] appends the
/// closing `--<boundary>--` marker.
///
/// [rfc7578]: <https://tools.ietf.org/html/rfc7578>
/// [`finish`]: MultipartWriter::finish
#[derive(Debug)]
pub struct MultipartWriter {
    boundary: String,
    buffer: BytesMut,
}

impl MultipartWriter {
    /// Creates a writer with a random boundary.
    pub fn new() -> Self {
        let suffix: String = rand::thread_rng()
            .sample_iter(&Alphanumeric)
            .take(BOUNDARY_RAND_LEN)
            .map(char::from)
            .collect();
        Self::with_boundary(format!("{BOUNDARY_PREFIX}{suffix}"))
    }

    /// Creates a writer with a caller-chosen boundary.
    pub fn with_boundary(boundary: impl Into<String>) -> Self {
        Self {
            boundary: boundary.into(),
            buffer: BytesMut::new(),
        }
    }

    /// The boundary token in use.
    pub fn boundary(&self) -> &str {
        &self.boundary
    }

    /// Value for the request's `Content-Type` header.
    pub fn content_type(&self) -> String {
        format!("multipart/form-data; boundary={}", self.boundary)
    }

    /// Appends a file part.
    pub fn add_file(&mut self, field: &str, filename: &str, content_type: &str, data: &[u8]) {
        self.open_part();
        self.buffer.put_slice(
            format!("Content-Disposition: form-data; name=\"{field}\"; filename=\"{filename}\"")
                .as_bytes(),
        );
        self.buffer.put_slice(&CRLF);
        self.buffer
            .put_slice(format!("Content-Type: {content_type}").as_bytes());
        self.buffer.put_slice(&CRLF);
        self.buffer.put_slice(&CRLF);
        self.buffer.put_slice(data);
        self.buffer.put_slice(&CRLF);
    }

    /// Appends a plain text part.
    pub fn add_text(&mut self, field: &str, value: &str) {
        self.open_part();
        self.buffer
            .put_slice(format!("Content-Disposition: form-data; name=\"{field}\"").as_bytes());
        self.buffer.put_slice(&CRLF);
        self.buffer.put_slice(&CRLF);
        self.buffer.put_slice(value.as_bytes());
        self.buffer.put_slice(&CRLF);
    }

    /// Closes the body and returns it.
    pub fn finish(mut self) -> Bytes {
        self.buffer.put_slice(&DASHES);
        self.buffer.put_slice(self.boundary.as_bytes());
        self.buffer.put_slice(&DASHES);
        self.buffer.put_slice(&CRLF);
        self.buffer.freeze()
    }

    fn open_part(&mut self) {
        self.buffer.put_slice(&DASHES);
        self.buffer.put_slice(self.boundary.as_bytes());
        self.buffer.put_slice(&CRLF);
    }
}

impl Default for MultipartWriter {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_part_framing() {
        let mut writer = MultipartWriter::with_boundary("XYZ");
        writer.add_file("file", "clip.webm", "audio/webm", b"\x00\x01data");
        let body = writer.finish();

        assert_eq!(
            &body[..],
            &b"--XYZ\r\n\
               Content-Disposition: form-data; name=\"file\"; filename=\"clip.webm\"\r\n\
               Content-Type: audio/webm\r\n\
               \r\n\
               \x00\x01data\r\n\
               --XYZ--\r\n"[..]
        );
    }

    #[test]
    fn text_part_framing() {
        let mut writer = MultipartWriter::with_boundary("b");
        writer.add_text("model", "whisper");
        let body = writer.finish();

        assert_eq!(
            &body[..],
            &b"--b\r\n\
               Content-Disposition: form-data; name=\"model\"\r\n\
               \r\n\
               whisper\r\n\
               --b--\r\n"[..]
        );
    }

    #[test]
    fn random_boundaries_differ() {
        let a = MultipartWriter::new();
        let b = MultipartWriter::new();
        assert_ne!(a.boundary(), b.boundary());
        assert!(a.content_type().starts_with("multipart/form-data; boundary="));
    }
}
