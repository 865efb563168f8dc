//! # shannon-core
//!
//! Core library for the Shannon line-encoding service.
//!
//! This crate contains:
//! - **Code tables**: `CodeTable` / `SymbolEntry` — Shannon prefix codes
//!   built per input line
//! - **Encoding**: `encode_line` — bitstring production from a code table
//! - **Jobs**: `EncodeJob`, `EncodedLine`, `JobOutcome`
//! - **Ordering**: `OrderedGate` and `OrderedJobRunner` — concurrent
//!   execution with strictly ordered emission
//! - **Wire**: `Request` frames and the result frame layout, with
//!   `ClientCodec` / `AuthorityCodec` for framed TCP I/O via `tokio_util`
//! - **Network**: per-connection request/response helpers
//! - **Error**: `ShannonError` — typed, `thiserror`-based error hierarchy

pub mod codec;
pub mod encode;
pub mod error;
pub mod frame;
pub mod gate;
pub mod job;
pub mod network;
pub mod runner;
pub mod table;

// ── Re-exports for ergonomic usage ───────────────────────────────

pub use codec::{AuthorityCodec, ClientCodec};
pub use encode::encode_line;
pub use error::ShannonError;
pub use frame::{DEFAULT_LINE_CAPACITY, MAX_FRAME_SIZE, Request};
pub use gate::OrderedGate;
pub use job::{EncodeJob, EncodedLine, JobOutcome};
pub use network::{ConnectionInfo, request_encoding, serve_connection};
pub use runner::OrderedJobRunner;
pub use table::{CodeTable, SymbolEntry};
