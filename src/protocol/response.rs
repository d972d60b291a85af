//! Responses
//!
//! Text rendering of command results. Scalars take one line; arrays start
//! with a `*<n>` header followed by `n` numbered lines. Stored values and
//! array items are double-quoted so no payload can pass for a header, a
//! status, an error or `(nil)`.

use bytes::{BufMut, Bytes, BytesMut};

use crate::error::{ProtocolError, StoreError};

/// Response to a command
#[derive(Debug, Clone, PartialEq)]
pub enum Response {
    /// Simple OK response
    Ok,

    /// Pong response (for PING)
    Pong,

    /// Stored value, rendered as `"<value>"`
    Value(Bytes),

    /// Integer value
    Integer(i64),

    /// Boolean rendered as `TRUE` / `FALSE`
    Bool(bool),

    /// Array response, `None` entries render as `(nil)`
    Array(Vec<Option<Bytes>>),

    /// Error response
    Error(String),
}

impl Response {
    /// Array of strings
    pub fn strings(items: Vec<String>) -> Self {
        Response::Array(items.into_iter().map(|s| Some(Bytes::from(s))).collect())
    }

    pub fn is_error(&self) -> bool {
        matches!(self, Response::Error(_))
    }

    /// Append the wire form, including line terminators
    pub fn encode(&self, dst: &mut BytesMut) {
        match self {
            Response::Ok => dst.put_slice(b"OK\n"),
            Response::Pong => dst.put_slice(b"PONG\n"),
            Response::Value(data) => {
                dst.put_u8(b'"');
                dst.put_slice(data);
                dst.put_slice(b"\"\n");
            }
            Response::Integer(n) => dst.put_slice(format!("{}\n", n).as_bytes()),
            Response::Bool(true) => dst.put_slice(b"TRUE\n"),
            Response::Bool(false) => dst.put_slice(b"FALSE\n"),
            Response::Array(items) => {
                dst.put_slice(format!("*{}\n", items.len()).as_bytes());
                for (i, item) in items.iter().enumerate() {
                    dst.put_slice(format!("{}) ", i + 1).as_bytes());
                    match item {
                        Some(data) => {
                            dst.put_u8(b'"');
                            dst.put_slice(data);
                            dst.put_u8(b'"');
                        }
                        None => dst.put_slice(b"(nil)"),
                    }
                    dst.put_u8(b'\n');
                }
            }
            Response::Error(msg) => dst.put_slice(format!("[ERROR] {}\n", msg).as_bytes()),
        }
    }

    /// Number of item lines following an array header line, if `line` is one
    pub fn array_len(line: &str) -> Option<usize> {
        line.strip_prefix('*')?.parse().ok()
    }
}

impl From<StoreError> for Response {
    fn from(err: StoreError) -> Self {
        Response::Error(err.to_string())
    }
}

impl From<ProtocolError> for Response {
    fn from(err: ProtocolError) -> Self {
        Response::Error(err.to_string())
    }
}
