use std::collections::BTreeMap;
use std::io::Read;

use crate::bit_io::BitReader;
use crate::error::Result;

/// One 8-bit unit of input, or the end-of-stream sentinel.
pub type Symbol = u16;

pub const BITS_PER_WORD: u32 = 8;
pub const ALPH_SIZE: usize = 1 << BITS_PER_WORD;
/// Synthetic symbol closing every encoded body; one past the largest byte value.
pub const PSEUDO_EOF: Symbol = ALPH_SIZE as Symbol;

/// Occurrence counts per symbol, iterated in ascending symbol order.
///
/// The sentinel is always present with a count of exactly one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrequencyTable {
    counts: BTreeMap<Symbol, u64>,
    symbol_count: u64,
}

impl FrequencyTable {
    /// A table for empty input: just the sentinel.
    pub fn new() -> Self {
        let mut counts = BTreeMap::new();
        counts.insert(PSEUDO_EOF, 1);
        FrequencyTable {
            counts,
            symbol_count: 0,
        }
    }

    pub fn from_bytes(bytes: &[u8]) -> Self {
        let mut table = FrequencyTable::new();
        for &byte in bytes {
            table.record(byte);
        }
        table
    }

    /// Rebuild a table from a positional count list, as stored in a count header.
    /// Zero entries are left out; the sentinel is added implicitly.
    pub fn from_counts(counts: &[u32]) -> Self {
        let mut table = FrequencyTable::new();
        for (value, &count) in counts.iter().enumerate().take(ALPH_SIZE) {
            if count != 0 {
                table.counts.insert(value as Symbol, count as u64);
                table.symbol_count += count as u64;
            }
        }
        table
    }

    fn record(&mut self, byte: u8) {
        *self.counts.entry(byte as Symbol).or_insert(0) += 1;
        self.symbol_count += 1;
    }

    pub fn get(&self, symbol: Symbol) -> Option<u64> {
        self.counts.get(&symbol).copied()
    }

    /// Entries in ascending symbol order, sentinel last.
    pub fn iter(&self) -> impl Iterator<Item = (Symbol, u64)> + '_ {
        self.counts.iter().map(|(&symbol, &count)| (symbol, count))
    }

    /// Number of distinct entries, sentinel included, so never zero.
    pub fn entry_count(&self) -> usize {
        self.counts.len()
    }

    /// True when no byte was counted and only the sentinel is present.
    pub fn has_no_symbols(&self) -> bool {
        self.symbol_count == 0
    }

    /// Number of real symbols counted, sentinel excluded.
    pub fn symbol_count(&self) -> u64 {
        self.symbol_count
    }

    /// Size of the raw input in bits.
    pub fn original_bits(&self) -> u64 {
        self.symbol_count * BITS_PER_WORD as u64
    }
}

impl Default for FrequencyTable {
    fn default() -> Self {
        Self::new()
    }
}

/// Count every symbol of `input` in one pass.
///
/// Returns the table together with the raw input size in bits.
pub fn analyze<R: Read>(input: R) -> Result<(FrequencyTable, u64)> {
    let mut reader = BitReader::new(input);
    let mut table = FrequencyTable::new();
    while let Some(value) = reader.read_bits(BITS_PER_WORD)? {
        table.record(value as u8);
    }
    reader.close();

    let original_bits = table.original_bits();
    log::debug!(
        "analyzed {} symbols ({} distinct, {} bits)",
        table.symbol_count(),
        table.entry_count() - 1,
        original_bits
    );
    Ok((table, original_bits))
}
