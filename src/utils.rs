use http::header::{HeaderMap, HeaderName, HeaderValue};
use httparse::{parse_headers, Status, EMPTY_HEADER};
use memchr::{memchr, memmem};

use crate::{Error, Result};

pub(crate) const MAX_HEADERS: usize = 8 * 2;
pub(crate) const DASHES: [u8; 2] = [b'-', b'-']; // `--`
pub(crate) const CRLF: [u8; 2] = [b'\r', b'\n']; // `\r\n`
pub(crate) const CRLFS: [u8; 4] = [b'\r', b'\n', b'\r', b'\n']; // `\r\n\r\n`

const FORM_DATA: &str = "multipart/form-data";
const BOUNDARY: &str = "boundary=";

/// Pulls the boundary token out of a raw `Content-Type` header value.
///
/// The header must start with `multipart/form-data`; the token is the value
/// of the first `boundary=` parameter, with surrounding whitespace and
/// quotes stripped.
pub(crate) fn parse_boundary(content_type: &str) -> Result<&str> {
    let value = content_type.trim();

    if !value.starts_with(FORM_DATA) {
        let essence = value.split(';').next().unwrap_or(value).trim();
        return Err(Error::UnsupportedContentType(essence.to_owned()));
    }

    for param in value.split(';').skip(1) {
        if let Some(rest) = param.trim().strip_prefix(BOUNDARY) {
            let boundary = rest.trim().trim_matches('"');
            if boundary.is_empty() {
                break;
            }
            return Ok(boundary);
        }
    }

    Err(Error::MissingBoundary)
}

/// Splits a body on `--<boundary>` into candidate parts.
///
/// The preamble before the first delimiter and the closing `--` marker come
/// back as candidates too; the caller filters them out by matching on
/// `Content-Disposition`.
pub(crate) fn split_parts<'a>(body: &'a [u8], boundary: &[u8]) -> Vec<&'a [u8]> {
    let mut delimiter = Vec::with_capacity(DASHES.len() + boundary.len());
    delimiter.extend_from_slice(&DASHES);
    delimiter.extend_from_slice(boundary);

    let mut parts = Vec::new();
    let mut start = 0;
    for hit in memmem::find_iter(body, &delimiter) {
        parts.push(&body[start..hit]);
        start = hit + delimiter.len();
    }
    parts.push(&body[start..]);
    parts
}

/// Finds `<marker>"..."` in a header region and returns the bytes between
/// the marker and the next `"`.
pub(crate) fn quoted_param<'a>(region: &'a [u8], marker: &[u8]) -> Option<&'a [u8]> {
    let start = memmem::find(region, marker)? + marker.len();
    let end = memchr(b'"', &region[start..])? + start;
    Some(&region[start..end])
}

/// Parses a part's header block (terminated by `\r\n\r\n`) into a
/// `HeaderMap`. Best effort: the extractor's matching is byte-based, so an
/// unparseable block only costs the optional part metadata.
pub(crate) fn parse_part_headers(bytes: &[u8]) -> Option<HeaderMap> {
    let mut headers = [EMPTY_HEADER; MAX_HEADERS];
    match parse_headers(bytes, &mut headers) {
        Ok(Status::Complete((_, hs))) => {
            let mut header_map = HeaderMap::with_capacity(hs.len());
            for h in hs {
                header_map.append(
                    HeaderName::from_bytes(h.name.as_bytes()).ok()?,
                    HeaderValue::from_bytes(h.value).ok()?,
                );
            }
            Some(header_map)
        }
        Ok(Status::Partial) | Err(_) => {
            tracing::debug!("unparseable part headers");
            None
        }
    }
}

pub(crate) fn parse_content_type(header: Option<&HeaderValue>) -> Option<mime::Mime> {
    header
        .map(HeaderValue::to_str)
        .and_then(Result::ok)
        .map(str::parse)
        .and_then(Result::ok)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn boundary_plain() {
        let b = parse_boundary("multipart/form-data; boundary=XYZ").unwrap();
        assert_eq!(b, "XYZ");
    }

    #[test]
    fn boundary_quoted_and_spaced() {
        let b = parse_boundary("multipart/form-data; charset=utf-8; boundary= \"--x--\" ").unwrap();
        assert_eq!(b, "--x--");
    }

    #[test]
    fn boundary_missing() {
        assert!(matches!(
            parse_boundary("multipart/form-data"),
            Err(Error::MissingBoundary)
        ));
        assert!(matches!(
            parse_boundary("multipart/form-data; boundary="),
            Err(Error::MissingBoundary)
        ));
    }

    #[test]
    fn content_type_not_multipart() {
        let err = parse_boundary("application/json; charset=utf-8").unwrap_err();
        assert!(matches!(err, Error::UnsupportedContentType(t) if t == "application/json"));
    }

    #[test]
    fn split_keeps_preamble_and_close_marker() {
        let body = b"preamble--XYZ\r\npart one\r\n--XYZ\r\npart two\r\n--XYZ--\r\n";
        let parts = split_parts(body, b"XYZ");
        assert_eq!(
            parts,
            [
                &b"preamble"[..],
                &b"\r\npart one\r\n"[..],
                &b"\r\npart two\r\n"[..],
                &b"--\r\n"[..],
            ]
        );
    }

    #[test]
    fn split_without_delimiter_yields_whole_body() {
        assert_eq!(split_parts(b"junk", b"XYZ"), [&b"junk"[..]]);
    }

    #[test]
    fn quoted_param_stops_at_quote() {
        let region = br#"Content-Disposition: form-data; name="file"; filename="a.webm""#;
        assert_eq!(quoted_param(region, b"filename=\""), Some(&b"a.webm"[..]));
        assert_eq!(quoted_param(region, b"size=\""), None);
    }

    #[test]
    fn part_headers_roundtrip() {
        let raw = b"Content-Disposition: form-data; name=\"file\"\r\nContent-Type: audio/webm\r\n\r\n";
        let headers = parse_part_headers(raw).unwrap();
        assert_eq!(headers.len(), 2);
        assert_eq!(headers[http::header::CONTENT_TYPE], "audio/webm");
    }
}
