use crate::code_table::CodeTable;
use crate::error::Result;
use crate::frequency::{FrequencyTable, PSEUDO_EOF};
use crate::header::{Header, HeaderFormat, BITS_PER_INT};
use crate::hufftree::HuffmanTree;

/// Bit totals for one input under one header format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SizeAccounting {
    pub original_bits: u64,
    pub compressed_bits: u64,
}

impl SizeAccounting {
    /// Original minus compressed size; negative when compression would grow the data.
    pub fn saved_bits(&self) -> i64 {
        self.original_bits as i64 - self.compressed_bits as i64
    }
}

/// Everything preprocessing learns about an input, ready for one encode pass.
#[derive(Debug, Clone)]
pub struct EncodingMetaData {
    pub frequencies: FrequencyTable,
    pub tree: HuffmanTree,
    pub codes: CodeTable,
    pub header: Header,
    pub sizes: SizeAccounting,
}

impl EncodingMetaData {
    pub fn build(frequencies: FrequencyTable, format: HeaderFormat) -> Result<Self> {
        let tree = HuffmanTree::from_frequencies(&frequencies)?;
        let codes = CodeTable::from_tree(&tree);
        let header = Header::build(format, &frequencies, &tree)?;
        let sizes = SizeAccounting {
            original_bits: frequencies.original_bits(),
            compressed_bits: compressed_bits(&frequencies, &codes, &header),
        };
        log::debug!(
            "{} header: {} header bits, {} bits in, {} bits out",
            format,
            header.bit_len(),
            sizes.original_bits,
            sizes.compressed_bits
        );
        Ok(EncodingMetaData {
            frequencies,
            tree,
            codes,
            header,
            sizes,
        })
    }

    pub fn format(&self) -> HeaderFormat {
        self.header.format()
    }
}

/// Magic number and selector, the header, every body code, and the closing sentinel code.
fn compressed_bits(frequencies: &FrequencyTable, codes: &CodeTable, header: &Header) -> u64 {
    // the sentinel's table count is 1, so it is covered by the same sum
    let body: u64 = frequencies
        .iter()
        .map(|(symbol, count)| count * codes.code_len(symbol).unwrap_or(0))
        .sum();
    debug_assert_eq!(frequencies.get(PSEUDO_EOF), Some(1));
    2 * BITS_PER_INT as u64 + header.bit_len() + body
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_repeated_byte_sizes() {
        let data = vec![b'q'; 1000];
        let meta = EncodingMetaData::build(FrequencyTable::from_bytes(&data), HeaderFormat::Tree).unwrap();
        // 64 framing + (32 + 1 + 10 + 10) header + 1000 one-bit codes + 1 sentinel bit
        assert_eq!(meta.sizes.compressed_bits, 64 + 53 + 1000 + 1);
        assert_eq!(meta.sizes.original_bits, 8000);
        assert_eq!(meta.sizes.saved_bits(), 8000 - 1118);
    }

    #[test]
    fn test_count_format_costs_fixed_header() {
        let data = vec![b'q'; 1000];
        let meta = EncodingMetaData::build(FrequencyTable::from_bytes(&data), HeaderFormat::Count).unwrap();
        assert_eq!(meta.sizes.compressed_bits, 64 + 256 * 32 + 1001);
        assert!(meta.sizes.saved_bits() < 0);
    }

    #[test]
    fn test_empty_input_sizes() {
        let meta = EncodingMetaData::build(FrequencyTable::new(), HeaderFormat::Tree).unwrap();
        assert_eq!(meta.sizes.original_bits, 0);
        assert_eq!(meta.sizes.compressed_bits, 64 + 42 + 1);
        assert_eq!(meta.sizes.saved_bits(), -107);
    }

    #[test]
    fn test_custom_format_is_rejected() {
        assert!(EncodingMetaData::build(FrequencyTable::new(), HeaderFormat::Custom).is_err());
    }
}
