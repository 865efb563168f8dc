//! Per-line encoding jobs and their outcomes.

use crate::encode::encode_line;
use crate::error::ShannonError;
use crate::table::CodeTable;

/// One unit of work: a line and its ordinal position in the input.
///
/// The index defines the required output order. A job is owned by exactly
/// one worker; dispatch moves it into the worker task, so no staging state
/// is ever shared between workers.
#[derive(Debug, Clone)]
pub struct EncodeJob {
    pub index: usize,
    pub line: String,
}

impl EncodeJob {
    pub fn new(index: usize, line: impl Into<String>) -> Self {
        Self {
            index,
            line: line.into(),
        }
    }

    /// Run the full encoding pipeline locally: build the code table, then
    /// produce the bitstring.
    pub fn run(&self) -> Result<EncodedLine, ShannonError> {
        let table = CodeTable::build(&self.line)?;
        let bits = encode_line(&self.line, &table);
        Ok(EncodedLine { table, bits })
    }
}

/// The write-once result of one job: the derived alphabet and the encoded
/// bitstring as `'0'`/`'1'` characters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedLine {
    pub table: CodeTable,
    pub bits: String,
}

/// What crosses the ordering barrier for one job. A failed job keeps its
/// slot in the output sequence; downstream consumers never see a skipped
/// index.
#[derive(Debug)]
pub struct JobOutcome {
    pub index: usize,
    pub line: String,
    pub result: Result<EncodedLine, ShannonError>,
}
