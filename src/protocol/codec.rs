//! Line Codec for Tokio
//!
//! Splits the byte stream on `\n` (dropping a trailing `\r`) and writes
//! responses back as text lines.

use bytes::{BufMut, BytesMut};
use tokio_util::codec::{Decoder, Encoder};

use super::Response;
use crate::error::ProtocolError;

/// Default upper bound on a single request line
pub const DEFAULT_MAX_LINE_LENGTH: usize = 64 * 1024;

/// Tokio codec for newline-delimited text
#[derive(Debug)]
pub struct LineCodec {
    max_length: usize,
    /// Bytes already scanned without finding a newline
    next_index: usize,
}

impl Default for LineCodec {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_LINE_LENGTH)
    }
}

impl LineCodec {
    pub fn new(max_length: usize) -> Self {
        Self {
            max_length,
            next_index: 0,
        }
    }
}

fn to_line(raw: &[u8]) -> Result<String, ProtocolError> {
    let raw = raw.strip_suffix(b"\r").unwrap_or(raw);
    std::str::from_utf8(raw)
        .map(str::to_owned)
        .map_err(|_| ProtocolError::InvalidUtf8)
}

impl Decoder for LineCodec {
    type Item = String;
    type Error = ProtocolError;

    fn decode(&mut self, src: &mut BytesMut) -> Result<Option<Self::Item>, Self::Error> {
        let read_to = src.len().min(self.max_length + 1);

        match src[self.next_index..read_to].iter().position(|b| *b == b'\n') {
            Some(offset) => {
                let newline = self.next_index + offset;
                self.next_index = 0;
                let line = src.split_to(newline + 1);
                to_line(&line[..newline]).map(Some)
            }
            None if src.len() > self.max_length => Err(ProtocolError::LineTooLong {
                max: self.max_length,
            }),
            None => {
                self.next_index = read_to;
                Ok(None)
            }
        }
    }

    fn decode_eof(&mut self, src: &mut BytesMut) -> Result<Option<Self::Item>, Self::Error> {
        if let Some(line) = self.decode(src)? {
            return Ok(Some(line));
        }
        if src.is_empty() {
            return Ok(None);
        }
        // unterminated last line
        self.next_index = 0;
        let rest = src.split();
        to_line(&rest).map(Some)
    }
}

impl Encoder<Response> for LineCodec {
    type Error = ProtocolError;

    fn encode(&mut self, item: Response, dst: &mut BytesMut) -> Result<(), Self::Error> {
        item.encode(dst);
        Ok(())
    }
}

/// Request lines sent by clients
impl Encoder<String> for LineCodec {
    type Error = ProtocolError;

    fn encode(&mut self, item: String, dst: &mut BytesMut) -> Result<(), Self::Error> {
        dst.reserve(item.len() + 1);
        dst.put_slice(item.as_bytes());
        dst.put_u8(b'\n');
        Ok(())
    }
}
