//! Domain-specific error types for the Shannon encoding service.
//!
//! All fallible operations return `Result<T, ShannonError>`. Errors fall
//! into two recoverable families — invalid input and transport failures —
//! and both are scoped to a single job or connection. A broken ordering
//! barrier is *not* represented here: that is an implementation defect and
//! panics instead (see [`crate::gate::OrderedGate`]).

use thiserror::Error;

/// The canonical error type for the Shannon encoding service.
#[derive(Debug, Error)]
pub enum ShannonError {
    // ── Input Errors ─────────────────────────────────────────────
    /// The input line is empty; a code table cannot be built from it.
    #[error("empty input line")]
    EmptyLine,

    /// The input line does not fit in the request buffer.
    #[error("line too long: {len} bytes (max {max})")]
    LineTooLong { len: usize, max: usize },

    /// Code precision came out negative for a symbol. Cannot occur for a
    /// well-formed frequency table; checked before bit generation anyway.
    #[error("negative code precision {precision} for symbol {symbol:#04x}")]
    NegativePrecision { symbol: u8, precision: i64 },

    // ── Transport Errors ─────────────────────────────────────────
    /// The TCP/IO layer reported an error.
    #[error("connection error: {0}")]
    Io(#[from] std::io::Error),

    /// The peer closed the stream in the middle of a frame.
    #[error("connection closed mid-frame while reading {0}")]
    UnexpectedEof(&'static str),

    /// The peer closed the stream before sending any frame at all.
    #[error("connection closed before a frame arrived")]
    ConnectionClosed,

    /// A declared length in a frame header exceeds the codec limit.
    #[error("frame too large: {size} bytes (max {max})")]
    FrameTooLarge { size: usize, max: usize },

    /// A frame field violated the wire format.
    #[error("malformed frame: {0}")]
    InvalidFrame(&'static str),

    /// A code byte on the wire was not ASCII `'0'` or `'1'`.
    #[error("invalid bit character on wire: {0:#04x}")]
    InvalidBitChar(u8),

    /// UTF-8 conversion of a received line failed.
    #[error("invalid utf-8: {0}")]
    InvalidUtf8(#[from] std::string::FromUtf8Error),

    // ── Runner Errors ────────────────────────────────────────────
    /// A dispatched worker task was aborted before it finished.
    #[error("worker task aborted before completion")]
    WorkerAborted,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display_messages() {
        let e = ShannonError::EmptyLine;
        assert!(e.to_string().contains("empty"));

        let e = ShannonError::LineTooLong { len: 40, max: 32 };
        assert!(e.to_string().contains("40"));
        assert!(e.to_string().contains("32"));

        let e = ShannonError::InvalidBitChar(b'x');
        assert!(e.to_string().contains("0x78"));
    }

    #[test]
    fn from_io() {
        let io_err = std::io::Error::new(std::io::ErrorKind::BrokenPipe, "pipe broke");
        let e: ShannonError = io_err.into();
        assert!(matches!(e, ShannonError::Io(_)));
    }
}
