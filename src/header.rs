//! Header representations that let a decoder rebuild the encoding tree.
//!
//! * **Count**: 256 positional 32-bit counts, one per byte value. The
//!   decoder reruns tree construction on them, with the sentinel count of 1
//!   implied.
//! * **Tree**: a 32-bit bit length followed by the pre-order flattened tree
//!   (see [`HuffmanTree::flatten`]).

use std::fmt;
use std::io::{Read, Write};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::bit_io::{BitReader, BitWriter};
use crate::bit_vec::BitVec;
use crate::error::{HuffError, Result};
use crate::frequency::{FrequencyTable, Symbol, ALPH_SIZE};
use crate::hufftree::HuffmanTree;

pub const BITS_PER_INT: u32 = 32;

/// Header format selector as written after the magic number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HeaderFormat {
    Count,
    Tree,
    /// Reserved for a user-defined header. Never produced, refused on decode.
    Custom,
}

impl HeaderFormat {
    pub fn selector(self) -> u32 {
        match self {
            HeaderFormat::Count => 0,
            HeaderFormat::Tree => 1,
            HeaderFormat::Custom => 2,
        }
    }

    pub fn from_selector(selector: u32) -> Option<Self> {
        match selector {
            0 => Some(HeaderFormat::Count),
            1 => Some(HeaderFormat::Tree),
            2 => Some(HeaderFormat::Custom),
            _ => None,
        }
    }

    /// Count and Tree can be both written and read.
    pub fn is_supported(self) -> bool {
        matches!(self, HeaderFormat::Count | HeaderFormat::Tree)
    }
}

impl fmt::Display for HeaderFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            HeaderFormat::Count => "count",
            HeaderFormat::Tree => "tree",
            HeaderFormat::Custom => "custom",
        })
    }
}

impl FromStr for HeaderFormat {
    type Err = HuffError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "count" | "counts" => Ok(HeaderFormat::Count),
            "tree" => Ok(HeaderFormat::Tree),
            "custom" => Ok(HeaderFormat::Custom),
            other => Err(HuffError::invalid_usage(format!("unknown header format '{}'", other))),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Header {
    Count(Vec<u32>),
    Tree(BitVec),
}

impl Header {
    /// Build the header of `format` for a tree and the table it came from.
    pub fn build(format: HeaderFormat, frequencies: &FrequencyTable, tree: &HuffmanTree) -> Result<Self> {
        match format {
            HeaderFormat::Count => {
                let mut counts = vec![0u32; ALPH_SIZE];
                for (symbol, count) in frequencies.iter() {
                    if (symbol as usize) < ALPH_SIZE {
                        counts[symbol as usize] = u32::try_from(count)
                            .map_err(|_| HuffError::CountOverflow { symbol, count })?;
                    }
                }
                Ok(Header::Count(counts))
            }
            HeaderFormat::Tree => {
                let flat = tree.flatten();
                if u32::try_from(flat.len()).is_err() {
                    return Err(HuffError::invalid_usage("flattened tree too large for its length field"));
                }
                Ok(Header::Tree(flat))
            }
            HeaderFormat::Custom => Err(HuffError::invalid_usage(
                "custom header format cannot be produced",
            )),
        }
    }

    pub fn format(&self) -> HeaderFormat {
        match self {
            Header::Count(_) => HeaderFormat::Count,
            Header::Tree(_) => HeaderFormat::Tree,
        }
    }

    /// Exact number of bits [`Header::write`] emits.
    pub fn bit_len(&self) -> u64 {
        match self {
            Header::Count(counts) => counts.len() as u64 * BITS_PER_INT as u64,
            Header::Tree(flat) => BITS_PER_INT as u64 + flat.len() as u64,
        }
    }

    pub fn write<W: Write>(&self, writer: &mut BitWriter<W>) -> Result<()> {
        match self {
            Header::Count(counts) => {
                for &count in counts {
                    writer.write_bits(BITS_PER_INT, count)?;
                }
            }
            Header::Tree(flat) => {
                writer.write_bits(BITS_PER_INT, flat.len() as u32)?;
                for bit in flat.iter() {
                    writer.write_bit(bit)?;
                }
            }
        }
        Ok(())
    }
}

/// Read the header of `format` and rebuild the tree it describes.
pub fn read_tree<R: Read>(format: HeaderFormat, reader: &mut BitReader<R>) -> Result<HuffmanTree> {
    match format {
        HeaderFormat::Count => {
            let mut counts = vec![0u32; ALPH_SIZE];
            for (value, slot) in counts.iter_mut().enumerate() {
                *slot = read_int(reader, "count header", value as Symbol)?;
            }
            HuffmanTree::from_frequencies(&FrequencyTable::from_counts(&counts))
        }
        HeaderFormat::Tree => {
            let bit_len = reader
                .read_bits(BITS_PER_INT)?
                .ok_or_else(|| HuffError::truncated("stream ended before the tree header length"))?;
            HuffmanTree::read_flattened(reader, bit_len)
        }
        HeaderFormat::Custom => Err(HuffError::UnsupportedFormat(format.selector())),
    }
}

fn read_int<R: Read>(reader: &mut BitReader<R>, what: &str, index: Symbol) -> Result<u32> {
    reader
        .read_bits(BITS_PER_INT)?
        .ok_or_else(|| HuffError::truncated(format!("stream ended in {} at entry {}", what, index)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::code_table::CodeTable;
    use crate::frequency::PSEUDO_EOF;
    use std::io::Cursor;

    fn codes(tree: &HuffmanTree) -> Vec<(Symbol, String)> {
        CodeTable::from_tree(tree)
            .iter()
            .map(|(s, c)| (s, c.to_string()))
            .collect()
    }

    fn write_to_vec(header: &Header) -> Vec<u8> {
        let mut buf = Vec::new();
        {
            let mut writer = BitWriter::new(&mut buf);
            header.write(&mut writer).unwrap();
            assert_eq!(writer.bits_written(), header.bit_len());
            writer.close().unwrap();
        }
        buf
    }

    #[test]
    fn test_selector_round_trip() {
        for format in [HeaderFormat::Count, HeaderFormat::Tree, HeaderFormat::Custom] {
            assert_eq!(HeaderFormat::from_selector(format.selector()), Some(format));
        }
        assert_eq!(HeaderFormat::from_selector(7), None);
        assert!(!HeaderFormat::Custom.is_supported());
    }

    #[test]
    fn test_parse_format_names() {
        assert_eq!("Tree".parse::<HeaderFormat>().unwrap(), HeaderFormat::Tree);
        assert_eq!("count".parse::<HeaderFormat>().unwrap(), HeaderFormat::Count);
        assert!("zip".parse::<HeaderFormat>().is_err());
    }

    #[test]
    fn test_count_header_is_positional() {
        let table = FrequencyTable::from_bytes(b"aab");
        let tree = HuffmanTree::from_frequencies(&table).unwrap();
        let header = Header::build(HeaderFormat::Count, &table, &tree).unwrap();
        match &header {
            Header::Count(counts) => {
                assert_eq!(counts.len(), ALPH_SIZE);
                assert_eq!(counts[b'a' as usize], 2);
                assert_eq!(counts[b'b' as usize], 1);
                assert_eq!(counts.iter().map(|&c| c as u64).sum::<u64>(), 3);
            }
            other => panic!("unexpected header {:?}", other),
        }
        assert_eq!(header.bit_len(), 256 * 32);
    }

    #[test]
    fn test_tree_header_length_prefix() {
        let table = FrequencyTable::from_bytes(b"aab");
        let tree = HuffmanTree::from_frequencies(&table).unwrap();
        let header = Header::build(HeaderFormat::Tree, &table, &tree).unwrap();
        // three leaves of 10 bits, two internal nodes of 1 bit
        assert_eq!(header.bit_len(), 32 + 32);

        let buf = write_to_vec(&header);
        assert_eq!(&buf[..4], &32u32.to_be_bytes());
    }

    #[test]
    fn test_both_headers_rebuild_same_tree() {
        let data = b"Header equivalence: both layouts describe one tree.";
        let table = FrequencyTable::from_bytes(data);
        let tree = HuffmanTree::from_frequencies(&table).unwrap();

        for format in [HeaderFormat::Count, HeaderFormat::Tree] {
            let header = Header::build(format, &table, &tree).unwrap();
            let buf = write_to_vec(&header);
            let mut reader = BitReader::new(Cursor::new(buf));
            let rebuilt = read_tree(format, &mut reader).unwrap();
            assert_eq!(reader.bits_read(), header.bit_len());
            assert_eq!(codes(&rebuilt), codes(&tree), "{} header rebuilt a different tree", format);
        }
    }

    #[test]
    fn test_empty_input_headers() {
        let table = FrequencyTable::new();
        let tree = HuffmanTree::from_frequencies(&table).unwrap();

        let header = Header::build(HeaderFormat::Tree, &table, &tree).unwrap();
        assert_eq!(header.bit_len(), 32 + 10);
        let mut reader = BitReader::new(Cursor::new(write_to_vec(&header)));
        let rebuilt = read_tree(HeaderFormat::Tree, &mut reader).unwrap();
        assert!(rebuilt.is_single_leaf());
        assert!(rebuilt.contains(PSEUDO_EOF));

        let header = Header::build(HeaderFormat::Count, &table, &tree).unwrap();
        let mut reader = BitReader::new(Cursor::new(write_to_vec(&header)));
        let rebuilt = read_tree(HeaderFormat::Count, &mut reader).unwrap();
        assert!(rebuilt.is_single_leaf());
    }

    #[test]
    fn test_truncated_count_header() {
        let mut reader = BitReader::new(Cursor::new(vec![0u8; 100]));
        let err = read_tree(HeaderFormat::Count, &mut reader).unwrap_err();
        assert!(matches!(err, HuffError::Truncated { .. }), "{}", err);
    }

    #[test]
    fn test_custom_cannot_be_built_or_read() {
        let table = FrequencyTable::new();
        let tree = HuffmanTree::from_frequencies(&table).unwrap();
        assert!(matches!(
            Header::build(HeaderFormat::Custom, &table, &tree),
            Err(HuffError::InvalidUsage { .. })
        ));
        let mut reader = BitReader::new(Cursor::new(vec![0u8; 4]));
        assert!(matches!(
            read_tree(HeaderFormat::Custom, &mut reader),
            Err(HuffError::UnsupportedFormat(2))
        ));
        assert_eq!(reader.bits_read(), 0);
    }
}
