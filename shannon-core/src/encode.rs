//! Line encoding: concatenate each symbol's assigned code.
//!
//! This is a pure lookup pass over the original line. Every byte of the
//! line must appear in the table — the builder guarantees it — so a miss
//! here means the table was built from a different line and panics rather
//! than producing a silently wrong bitstring.

use crate::table::CodeTable;

/// Encode `line` by appending, for each byte in original order, the code
/// its symbol was assigned in `table`.
///
/// # Panics
///
/// Panics if a byte of `line` has no entry in `table`. That is an
/// invariant violation in table construction, not a runtime condition.
pub fn encode_line(line: &str, table: &CodeTable) -> String {
    let mut lookup: [Option<&str>; 256] = [None; 256];
    for entry in table.entries() {
        lookup[entry.symbol as usize] = Some(entry.code.as_str());
    }

    let mut bits = String::with_capacity(line.len() * 8);
    for &b in line.as_bytes() {
        match lookup[b as usize] {
            Some(code) => bits.push_str(code),
            None => panic!("symbol {b:#04x} missing from code table"),
        }
    }
    bits
}
