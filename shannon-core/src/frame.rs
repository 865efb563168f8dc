//! Wire format for one request/response exchange.
//!
//! Request: a fixed-size buffer (32 bytes by default) holding the raw
//! line, NUL-padded. Response, in this exact order:
//!
//! ```text
//! +--------------------+
//! | table_size (4)     |  u32: number of symbol entries
//! +--------------------+
//! | per entry:         |
//! |   symbol (1)       |  u8
//! |   frequency (4)    |  u32
//! |   code_len (4)     |  u32
//! |   code (code_len)  |  ASCII '0'/'1', one byte per bit
//! +--------------------+
//! | encoded_len (4)    |  u32
//! | encoded (variable) |  ASCII '0'/'1', one byte per bit
//! +--------------------+
//! ```
//!
//! All multi-byte integers are little-endian on the wire, on both ends,
//! so heterogeneous hosts interoperate. Readers consume exact declared
//! byte counts; a stream that ends mid-frame is a transport error, never
//! end-of-data.

use bytes::{Buf, BufMut, BytesMut};

use crate::error::ShannonError;
use crate::job::EncodedLine;
use crate::table::{CodeTable, SymbolEntry};

/// Default request buffer size in bytes (the original service's 32-byte
/// line buffer). Codecs accept a different capacity at construction.
pub const DEFAULT_LINE_CAPACITY: usize = 32;

/// Upper bound on any single declared length in a response frame.
pub const MAX_FRAME_SIZE: usize = 64 * 1024;

/// A code table cannot have more entries than the 8-bit symbol alphabet.
const MAX_TABLE_ENTRIES: u32 = 256;

// ── Request ──────────────────────────────────────────────────────

/// One line submitted to the computing authority.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Request {
    line: String,
}

impl Request {
    /// Validates the line at construction: non-empty and free of NUL
    /// bytes (NUL is the wire padding and cannot appear in the payload).
    pub fn new(line: impl Into<String>) -> Result<Self, ShannonError> {
        let line = line.into();
        if line.is_empty() {
            return Err(ShannonError::EmptyLine);
        }
        if line.bytes().any(|b| b == 0) {
            return Err(ShannonError::InvalidFrame("line contains NUL byte"));
        }
        Ok(Self { line })
    }

    pub fn line(&self) -> &str {
        &self.line
    }

    pub fn into_line(self) -> String {
        self.line
    }
}

/// Write a request as a fixed `capacity`-byte NUL-padded buffer.
pub fn write_request(
    request: &Request,
    capacity: usize,
    dst: &mut BytesMut,
) -> Result<(), ShannonError> {
    let bytes = request.line.as_bytes();
    if bytes.len() > capacity {
        return Err(ShannonError::LineTooLong {
            len: bytes.len(),
            max: capacity,
        });
    }
    dst.reserve(capacity);
    dst.put_slice(bytes);
    dst.put_bytes(0, capacity - bytes.len());
    Ok(())
}

/// Read one fixed-size request buffer. Returns `Ok(None)` until a full
/// buffer has arrived; trailing NUL padding is stripped.
pub fn read_request(
    src: &mut BytesMut,
    capacity: usize,
) -> Result<Option<Request>, ShannonError> {
    if src.len() < capacity {
        return Ok(None);
    }
    let raw = src.split_to(capacity);
    let end = raw.iter().position(|&b| b == 0).unwrap_or(capacity);
    let line = String::from_utf8(raw[..end].to_vec())?;
    if line.is_empty() {
        return Err(ShannonError::EmptyLine);
    }
    Ok(Some(Request { line }))
}

// ── Response ─────────────────────────────────────────────────────

/// Serialize a computed result into the response frame layout.
pub fn write_result(result: &EncodedLine, dst: &mut BytesMut) {
    let entries = result.table.entries();

    let mut frame_len = 4 + 4 + result.bits.len();
    for entry in entries {
        frame_len += 1 + 4 + 4 + entry.code.len();
    }
    dst.reserve(frame_len);

    dst.put_u32_le(entries.len() as u32);
    for entry in entries {
        dst.put_u8(entry.symbol);
        dst.put_u32_le(entry.frequency);
        dst.put_u32_le(entry.code.len() as u32);
        dst.put_slice(entry.code.as_bytes());
    }
    dst.put_u32_le(result.bits.len() as u32);
    dst.put_slice(result.bits.as_bytes());
}

/// Read one response frame. Returns `Ok(None)` while the frame is still
/// incomplete; nothing is consumed until a whole frame can be decoded.
pub fn read_result(src: &mut BytesMut) -> Result<Option<EncodedLine>, ShannonError> {
    let buf = &src[..];
    let mut pos = 0usize;

    let Some(table_size) = peek_u32(buf, &mut pos) else {
        return Ok(None);
    };
    if table_size > MAX_TABLE_ENTRIES {
        return Err(ShannonError::InvalidFrame(
            "table size exceeds the 8-bit symbol alphabet",
        ));
    }

    let mut entries = Vec::with_capacity(table_size as usize);
    for _ in 0..table_size {
        if buf.len() < pos + 1 {
            return Ok(None);
        }
        let symbol = buf[pos];
        pos += 1;

        let Some(frequency) = peek_u32(buf, &mut pos) else {
            return Ok(None);
        };
        if frequency == 0 {
            return Err(ShannonError::InvalidFrame("zero symbol frequency"));
        }

        let Some(code) = peek_bits(buf, &mut pos)? else {
            return Ok(None);
        };

        entries.push(SymbolEntry {
            symbol,
            frequency,
            code,
        });
    }

    let Some(bits) = peek_bits(buf, &mut pos)? else {
        return Ok(None);
    };

    src.advance(pos);
    Ok(Some(EncodedLine {
        table: CodeTable::from_entries(entries),
        bits,
    }))
}

/// Peek a little-endian u32 at `*pos`, advancing the cursor on success.
fn peek_u32(buf: &[u8], pos: &mut usize) -> Option<u32> {
    let bytes = buf.get(*pos..*pos + 4)?;
    *pos += 4;
    Some(u32::from_le_bytes(bytes.try_into().expect("4-byte slice")))
}

/// Peek a length-prefixed run of `'0'`/`'1'` bytes at `*pos`.
///
/// `Ok(None)` means the buffer does not yet hold the declared bytes;
/// declared lengths over [`MAX_FRAME_SIZE`] and non-bit bytes are errors.
fn peek_bits(buf: &[u8], pos: &mut usize) -> Result<Option<String>, ShannonError> {
    let start = *pos;
    let Some(len) = peek_u32(buf, pos) else {
        return Ok(None);
    };
    let len = len as usize;
    if len > MAX_FRAME_SIZE {
        return Err(ShannonError::FrameTooLarge {
            size: len,
            max: MAX_FRAME_SIZE,
        });
    }
    let Some(bytes) = buf.get(*pos..*pos + len) else {
        *pos = start;
        return Ok(None);
    };
    let mut bits = String::with_capacity(len);
    for &b in bytes {
        match b {
            b'0' => bits.push('0'),
            b'1' => bits.push('1'),
            other => return Err(ShannonError::InvalidBitChar(other)),
        }
    }
    *pos += len;
    Ok(Some(bits))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::job::EncodeJob;

    fn sample_result() -> EncodedLine {
        EncodeJob::new(0, "AAABAAABAAAAMMAAAAAU").run().unwrap()
    }

    #[test]
    fn result_round_trip() {
        let original = sample_result();
        let mut buf = BytesMut::new();
        write_result(&original, &mut buf);

        let decoded = read_result(&mut buf).unwrap().unwrap();
        assert_eq!(decoded, original);
        assert!(buf.is_empty());
    }

    #[test]
    fn empty_code_round_trip() {
        // Single-symbol line: empty code, empty bitstring.
        let original = EncodeJob::new(0, "A").run().unwrap();
        let mut buf = BytesMut::new();
        write_result(&original, &mut buf);

        let decoded = read_result(&mut buf).unwrap().unwrap();
        assert_eq!(decoded, original);
    }

    #[test]
    fn incomplete_frame_consumes_nothing() {
        let mut buf = BytesMut::new();
        write_result(&sample_result(), &mut buf);
        let full_len = buf.len();

        // Feed the frame one byte at a time; every prefix must decode to
        // None and leave the buffer untouched.
        let frame = buf.clone();
        for cut in 0..full_len {
            let mut partial = BytesMut::from(&frame[..cut]);
            assert!(read_result(&mut partial).unwrap().is_none(), "cut {cut}");
            assert_eq!(partial.len(), cut, "cut {cut} consumed bytes");
        }
    }

    #[test]
    fn invalid_bit_char_rejected() {
        let mut buf = BytesMut::new();
        write_result(&sample_result(), &mut buf);
        // Corrupt the final bit of the encoded message.
        let last = buf.len() - 1;
        buf[last] = b'2';
        assert!(matches!(
            read_result(&mut buf),
            Err(ShannonError::InvalidBitChar(b'2'))
        ));
    }

    #[test]
    fn oversized_table_rejected() {
        let mut buf = BytesMut::new();
        buf.put_u32_le(300);
        assert!(matches!(
            read_result(&mut buf),
            Err(ShannonError::InvalidFrame(_))
        ));
    }

    #[test]
    fn oversized_declared_length_rejected() {
        let mut buf = BytesMut::new();
        buf.put_u32_le(0); // empty table
        buf.put_u32_le(u32::MAX); // absurd encoded length
        assert!(matches!(
            read_result(&mut buf),
            Err(ShannonError::FrameTooLarge { .. })
        ));
    }

    #[test]
    fn zero_frequency_rejected() {
        let mut buf = BytesMut::new();
        buf.put_u32_le(1);
        buf.put_u8(b'A');
        buf.put_u32_le(0); // frequency must be >= 1
        buf.put_u32_le(0);
        buf.put_u32_le(0);
        assert!(matches!(
            read_result(&mut buf),
            Err(ShannonError::InvalidFrame(_))
        ));
    }

    #[test]
    fn request_round_trip_strips_padding() {
        let request = Request::new("hello").unwrap();
        let mut buf = BytesMut::new();
        write_request(&request, DEFAULT_LINE_CAPACITY, &mut buf).unwrap();
        assert_eq!(buf.len(), DEFAULT_LINE_CAPACITY);

        let decoded = read_request(&mut buf, DEFAULT_LINE_CAPACITY)
            .unwrap()
            .unwrap();
        assert_eq!(decoded.line(), "hello");
        assert!(buf.is_empty());
    }

    #[test]
    fn request_fills_capacity_exactly() {
        let line = "x".repeat(DEFAULT_LINE_CAPACITY);
        let request = Request::new(line.clone()).unwrap();
        let mut buf = BytesMut::new();
        write_request(&request, DEFAULT_LINE_CAPACITY, &mut buf).unwrap();

        let decoded = read_request(&mut buf, DEFAULT_LINE_CAPACITY)
            .unwrap()
            .unwrap();
        assert_eq!(decoded.line(), line);
    }

    #[test]
    fn request_too_long_rejected() {
        let request = Request::new("y".repeat(DEFAULT_LINE_CAPACITY + 1)).unwrap();
        let mut buf = BytesMut::new();
        assert!(matches!(
            write_request(&request, DEFAULT_LINE_CAPACITY, &mut buf),
            Err(ShannonError::LineTooLong { len: 33, max: 32 })
        ));
    }

    #[test]
    fn request_rejects_empty_and_nul() {
        assert!(matches!(Request::new(""), Err(ShannonError::EmptyLine)));
        assert!(matches!(
            Request::new("a\0b"),
            Err(ShannonError::InvalidFrame(_))
        ));
    }

    #[test]
    fn request_partial_buffer_returns_none() {
        let mut buf = BytesMut::from(&b"short"[..]);
        assert!(
            read_request(&mut buf, DEFAULT_LINE_CAPACITY)
                .unwrap()
                .is_none()
        );
        assert_eq!(buf.len(), 5);
    }

    #[test]
    fn all_nul_request_is_empty_line() {
        let mut buf = BytesMut::from(&[0u8; DEFAULT_LINE_CAPACITY][..]);
        assert!(matches!(
            read_request(&mut buf, DEFAULT_LINE_CAPACITY),
            Err(ShannonError::EmptyLine)
        ));
    }
}
