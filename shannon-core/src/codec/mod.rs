//! `tokio_util` codecs for framed TCP I/O.
//!
//! Each direction of the exchange gets its own codec so a `Framed` stream
//! both sends and receives the right frame type:
//! - [`ClientCodec`]: encodes [`Request`]s, decodes [`EncodedLine`]s.
//! - [`AuthorityCodec`]: decodes [`Request`]s, encodes [`EncodedLine`]s.
//!
//! Both carry the request buffer capacity; the two ends must agree on it
//! since the request frame has no length prefix of its own.

use bytes::BytesMut;
use tokio_util::codec::{Decoder, Encoder};

use crate::error::ShannonError;
use crate::frame::{self, DEFAULT_LINE_CAPACITY, Request};
use crate::job::EncodedLine;

// ── ClientCodec ──────────────────────────────────────────────────

/// Requester-side codec: one request out, one result frame back.
#[derive(Debug, Clone)]
pub struct ClientCodec {
    line_capacity: usize,
}

impl ClientCodec {
    pub fn new(line_capacity: usize) -> Self {
        Self { line_capacity }
    }
}

impl Default for ClientCodec {
    fn default() -> Self {
        Self::new(DEFAULT_LINE_CAPACITY)
    }
}

impl Encoder<Request> for ClientCodec {
    type Error = ShannonError;

    fn encode(&mut self, item: Request, dst: &mut BytesMut) -> Result<(), Self::Error> {
        frame::write_request(&item, self.line_capacity, dst)
    }
}

impl Decoder for ClientCodec {
    type Item = EncodedLine;
    type Error = ShannonError;

    fn decode(&mut self, src: &mut BytesMut) -> Result<Option<Self::Item>, Self::Error> {
        frame::read_result(src)
    }

    fn decode_eof(&mut self, src: &mut BytesMut) -> Result<Option<Self::Item>, Self::Error> {
        match self.decode(src)? {
            Some(result) => Ok(Some(result)),
            None if src.is_empty() => Ok(None),
            // A short read is a transport error, not end-of-data.
            None => Err(ShannonError::UnexpectedEof("result frame")),
        }
    }
}

// ── AuthorityCodec ───────────────────────────────────────────────

/// Authority-side codec: one request in, one result frame out.
#[derive(Debug, Clone)]
pub struct AuthorityCodec {
    line_capacity: usize,
}

impl AuthorityCodec {
    pub fn new(line_capacity: usize) -> Self {
        Self { line_capacity }
    }
}

impl Default for AuthorityCodec {
    fn default() -> Self {
        Self::new(DEFAULT_LINE_CAPACITY)
    }
}

impl Decoder for AuthorityCodec {
    type Item = Request;
    type Error = ShannonError;

    fn decode(&mut self, src: &mut BytesMut) -> Result<Option<Self::Item>, Self::Error> {
        frame::read_request(src, self.line_capacity)
    }

    fn decode_eof(&mut self, src: &mut BytesMut) -> Result<Option<Self::Item>, Self::Error> {
        match self.decode(src)? {
            Some(request) => Ok(Some(request)),
            None if src.is_empty() => Ok(None),
            None => Err(ShannonError::UnexpectedEof("request frame")),
        }
    }
}

impl Encoder<EncodedLine> for AuthorityCodec {
    type Error = ShannonError;

    fn encode(&mut self, item: EncodedLine, dst: &mut BytesMut) -> Result<(), Self::Error> {
        frame::write_result(&item, dst);
        Ok(())
    }
}
