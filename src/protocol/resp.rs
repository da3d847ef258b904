//! RESP2 parser and encoder
//!
//! The parser works on a borrowed view of the read buffer and only advances
//! it once a whole value is available, so a partially received frame is left
//! in place for the next read.

use super::types::{RespError, RespValue};
use bytes::{Buf, BufMut, Bytes, BytesMut};

const CRLF: &[u8] = b"\r\n";

/// Longest inline request accepted without a line ending
const MAX_INLINE_LEN: usize = 64 * 1024;

/// Upper bound on preallocation for an announced array
const MAX_PREALLOC: usize = 1024;

/// Largest bulk string a peer may announce (512 MB)
const MAX_BULK_LEN: usize = 512 * 1024 * 1024;

/// Deepest array nesting accepted in a reply
const MAX_DEPTH: usize = 32;

/// RESP2 Parser
pub struct RespParser;

impl RespParser {
    /// Parse a RESP value from a buffer
    ///
    /// Returns Ok(Some(value)) if a complete value was parsed,
    /// Ok(None) if more data is needed,
    /// Err(e) if parsing failed
    pub fn parse(buf: &mut BytesMut) -> Result<Option<RespValue>, RespError> {
        match parse_at(&buf[..], 0, 0)? {
            Some((value, consumed)) => {
                buf.advance(consumed);
                Ok(Some(value))
            }
            None => Ok(None),
        }
    }

    /// Parse one client request into its words
    ///
    /// Accepts both an array of bulk strings and an inline command line
    /// (`PING\r\n`). A blank inline line yields an empty request.
    pub fn parse_command(buf: &mut BytesMut) -> Result<Option<Vec<String>>, RespError> {
        match buf.first().copied() {
            None => Ok(None),
            Some(b'*') => match parse_request(&buf[..])? {
                Some((request, consumed)) => {
                    buf.advance(consumed);
                    Ok(Some(request))
                }
                None => Ok(None),
            },
            Some(_) => Self::parse_inline(buf),
        }
    }

    fn parse_inline(buf: &mut BytesMut) -> Result<Option<Vec<String>>, RespError> {
        let Some(newline) = buf.iter().position(|&b| b == b'\n') else {
            if buf.len() > MAX_INLINE_LEN {
                return Err(RespError::InlineTooLong);
            }
            return Ok(None);
        };
        let line = buf.split_to(newline + 1);
        let line = std::str::from_utf8(&line).map_err(|_| RespError::InvalidUtf8)?;
        Ok(Some(line.split_whitespace().map(str::to_string).collect()))
    }
}

/// Parse a request array; every element must be a bulk string, so nested
/// arrays are refused before any recursion
fn parse_request(src: &[u8]) -> Result<Option<(Vec<String>, usize)>, RespError> {
    let Some((line, next)) = read_line(src, 1) else {
        return Ok(None);
    };
    let count = parse_number(line, "multibulk length")?;
    if count == -1 {
        return Ok(Some((Vec::new(), next)));
    }
    let count = usize::try_from(count).map_err(|_| RespError::InvalidNumber("multibulk length"))?;

    let mut words = Vec::with_capacity(count.min(MAX_PREALLOC));
    let mut cursor = next;
    for _ in 0..count {
        match src.get(cursor) {
            None => return Ok(None),
            Some(b'$') => {}
            Some(&other) => {
                return Err(RespError::InvalidProtocol(format!(
                    "expected '$', got '{}'",
                    other as char
                )))
            }
        }
        let Some((item, after)) = parse_at(src, cursor, 0)? else {
            return Ok(None);
        };
        words.push(request_word(item)?);
        cursor = after;
    }
    Ok(Some((words, cursor)))
}

fn request_word(item: RespValue) -> Result<String, RespError> {
    match item {
        RespValue::BulkString(bytes) => {
            String::from_utf8(bytes.to_vec()).map_err(|_| RespError::InvalidUtf8)
        }
        other => Err(RespError::InvalidProtocol(format!(
            "expected bulk string, got {other}"
        ))),
    }
}

/// Find the line starting at `start`, returning it without CRLF and the
/// position just past the CRLF
fn read_line(src: &[u8], start: usize) -> Option<(&[u8], usize)> {
    let offset = src.get(start..)?.windows(2).position(|w| w == CRLF)?;
    let end = start + offset;
    Some((&src[start..end], end + 2))
}

fn parse_number(line: &[u8], what: &'static str) -> Result<i64, RespError> {
    std::str::from_utf8(line)
        .ok()
        .and_then(|s| s.parse().ok())
        .ok_or(RespError::InvalidNumber(what))
}

fn parse_text(line: &[u8]) -> Result<String, RespError> {
    String::from_utf8(line.to_vec()).map_err(|_| RespError::InvalidUtf8)
}

/// Parse the value starting at `pos`, returning it with the position just
/// past it
fn parse_at(src: &[u8], pos: usize, depth: usize) -> Result<Option<(RespValue, usize)>, RespError> {
    let Some(&prefix) = src.get(pos) else {
        return Ok(None);
    };
    if !matches!(prefix, b'+' | b'-' | b':' | b'$' | b'*') {
        return Err(RespError::InvalidProtocol(format!(
            "unknown type prefix '{}'",
            prefix as char
        )));
    }
    let Some((line, next)) = read_line(src, pos + 1) else {
        return Ok(None);
    };

    let parsed = match prefix {
        b'+' => (RespValue::SimpleString(parse_text(line)?), next),
        b'-' => (RespValue::Error(parse_text(line)?), next),
        b':' => (RespValue::Integer(parse_number(line, "integer")?), next),
        b'$' => {
            let len = parse_number(line, "bulk length")?;
            if len == -1 {
                return Ok(Some((RespValue::Null, next)));
            }
            let len = usize::try_from(len)
                .ok()
                .filter(|&len| len <= MAX_BULK_LEN)
                .ok_or(RespError::InvalidNumber("bulk length"))?;
            let end = next + len;
            if src.len() < end + 2 {
                return Ok(None);
            }
            if &src[end..end + 2] != CRLF {
                return Err(RespError::InvalidProtocol(
                    "missing CRLF after bulk string".to_string(),
                ));
            }
            (RespValue::BulkString(Bytes::copy_from_slice(&src[next..end])), end + 2)
        }
        _ => {
            let count = parse_number(line, "multibulk length")?;
            if count == -1 {
                return Ok(Some((RespValue::Null, next)));
            }
            let count =
                usize::try_from(count).map_err(|_| RespError::InvalidNumber("multibulk length"))?;
            if depth >= MAX_DEPTH {
                return Err(RespError::InvalidProtocol("nesting too deep".to_string()));
            }
            let mut items = Vec::with_capacity(count.min(MAX_PREALLOC));
            let mut cursor = next;
            for _ in 0..count {
                let Some((item, after)) = parse_at(src, cursor, depth + 1)? else {
                    return Ok(None);
                };
                items.push(item);
                cursor = after;
            }
            (RespValue::Array(items), cursor)
        }
    };
    Ok(Some(parsed))
}

/// RESP2 Encoder
pub struct RespEncoder;

impl RespEncoder {
    /// Encode a RESP value to bytes
    pub fn encode(value: &RespValue) -> Bytes {
        let mut buf = BytesMut::new();
        Self::encode_to(&mut buf, value);
        buf.freeze()
    }

    /// Encode a RESP value into an existing buffer
    pub fn encode_to(buf: &mut BytesMut, value: &RespValue) {
        match value {
            RespValue::SimpleString(s) => put_line(buf, b'+', s.as_bytes()),
            RespValue::Error(e) => put_line(buf, b'-', e.as_bytes()),
            RespValue::Integer(i) => put_line(buf, b':', i.to_string().as_bytes()),
            RespValue::BulkString(bytes) => {
                put_line(buf, b'$', bytes.len().to_string().as_bytes());
                buf.put_slice(bytes);
                buf.put_slice(CRLF);
            }
            RespValue::Null => buf.put_slice(b"$-1\r\n"),
            RespValue::Array(items) => {
                put_line(buf, b'*', items.len().to_string().as_bytes());
                for item in items {
                    Self::encode_to(buf, item);
                }
            }
        }
    }

    /// Encode a request the way clients send it: an array of bulk strings
    pub fn encode_command<S: AsRef<str>>(words: &[S]) -> Bytes {
        let request = RespValue::Array(
            words
                .iter()
                .map(|w| RespValue::BulkString(Bytes::copy_from_slice(w.as_ref().as_bytes())))
                .collect(),
        );
        Self::encode(&request)
    }
}

fn put_line(buf: &mut BytesMut, prefix: u8, body: &[u8]) {
    buf.put_u8(prefix);
    buf.put_slice(body);
    buf.put_slice(CRLF);
}
