//! Shannon code table construction.
//!
//! A [`CodeTable`] maps every distinct byte of one input line to a prefix
//! code derived from its probability interval. Construction follows the
//! classic Shannon procedure: sort symbols by descending frequency (ties
//! broken by descending raw byte value), then walk the list keeping a
//! running cumulative probability; each symbol's code is the binary
//! expansion of that cumulative value, truncated to
//! `ceil(log2(1 / probability))` bits.
//!
//! The sort order is part of the observable behavior — it decides which
//! symbol owns which probability interval — so the tie-break must be
//! reproduced exactly.

use crate::error::ShannonError;

/// One row of the alphabet: a symbol, how often it occurs in the source
/// line, and its assigned Shannon code as `'0'`/`'1'` characters.
///
/// The code is assigned once during table construction and never mutated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SymbolEntry {
    pub symbol: u8,
    pub frequency: u32,
    pub code: String,
}

/// The derived alphabet for one input line, in code-assignment order.
///
/// Invariants held after [`CodeTable::build`]:
/// - entry frequencies sum to the byte length of the source line;
/// - no entry's code is a prefix of another entry's code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodeTable {
    entries: Vec<SymbolEntry>,
}

impl CodeTable {
    /// Build the code table for a non-empty line.
    pub fn build(line: &str) -> Result<Self, ShannonError> {
        let bytes = line.as_bytes();
        if bytes.is_empty() {
            return Err(ShannonError::EmptyLine);
        }

        // Fixed-slot counting keeps iteration order deterministic.
        let mut freqs = [0u32; 256];
        for &b in bytes {
            freqs[b as usize] += 1;
        }

        let mut entries: Vec<SymbolEntry> = freqs
            .iter()
            .enumerate()
            .filter(|&(_, &freq)| freq > 0)
            .map(|(symbol, &freq)| SymbolEntry {
                symbol: symbol as u8,
                frequency: freq,
                code: String::new(),
            })
            .collect();

        // Descending frequency, ties by descending symbol value.
        entries.sort_by(|a, b| {
            b.frequency
                .cmp(&a.frequency)
                .then(b.symbol.cmp(&a.symbol))
        });

        let line_len = bytes.len() as f64;
        let mut cumulative = 0.0f64;

        for entry in &mut entries {
            let probability = entry.frequency as f64 / line_len;
            // probability == 1 gives precision 0 and an empty code; that is
            // the valid single-symbol-line case, not an error.
            let precision = (1.0 / probability).log2().ceil() as i64;
            if precision < 0 {
                return Err(ShannonError::NegativePrecision {
                    symbol: entry.symbol,
                    precision,
                });
            }

            entry.code = binary_fraction(cumulative, precision as usize);
            cumulative += probability;
        }

        Ok(Self { entries })
    }

    /// Reassemble a table from wire-decoded entries. Performs no
    /// re-derivation; the authority already assigned the codes.
    pub fn from_entries(entries: Vec<SymbolEntry>) -> Self {
        Self { entries }
    }

    pub fn entries(&self) -> &[SymbolEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Binary expansion of `value` (in `[0, 1)`) to exactly `precision` bits,
/// by repeated doubling: emit `1` and subtract when the doubled value
/// reaches 1, else emit `0`. Pads with `0` if the value hits zero early.
fn binary_fraction(mut value: f64, precision: usize) -> String {
    let mut bits = String::with_capacity(precision);

    while value > 0.0 && bits.len() < precision {
        let doubled = value * 2.0;
        if doubled >= 1.0 {
            bits.push('1');
            value = doubled - 1.0;
        } else {
            bits.push('0');
            value = doubled;
        }
    }

    while bits.len() < precision {
        bits.push('0');
    }

    bits
}
