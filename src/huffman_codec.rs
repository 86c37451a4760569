use std::io::{BufReader, BufWriter, Read, Write};

use crate::bit_io::{BitReader, BitWriter};
use crate::error::{HuffError, Result};
use crate::frequency::{self, BITS_PER_WORD, PSEUDO_EOF};
use crate::header::{self, HeaderFormat, BITS_PER_INT};
use crate::hufftree::{HuffNode, HuffmanTree};
use crate::metadata::EncodingMetaData;

/// First 32 bits of every compressed stream.
pub const MAGIC_NUMBER: u32 = 0xface_8200;

/// Receives human-readable status lines from the codec.
pub trait HuffViewer {
    fn update(&self, message: &str);
}

impl<F: Fn(&str)> HuffViewer for F {
    fn update(&self, message: &str) {
        self(message)
    }
}

enum DecodeState {
    ReadingMagic,
    ReadingFormatSelector,
    RebuildingTree(HeaderFormat),
    Walking(HuffmanTree),
    Done,
}

/// Two-pass Huffman compressor and decompressor.
///
/// Compressing is `preprocess` followed by exactly one `encode` over the same
/// data. Decompressing needs no prior state.
#[derive(Default)]
pub struct HuffmanCodec {
    prepared: Option<EncodingMetaData>,
    viewer: Option<Box<dyn HuffViewer>>,
}

impl HuffmanCodec {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_viewer<V: HuffViewer + 'static>(&mut self, viewer: V) {
        self.viewer = Some(Box::new(viewer));
    }

    /// Result of the last `preprocess`, until `encode` consumes it.
    pub fn prepared(&self) -> Option<&EncodingMetaData> {
        self.prepared.as_ref()
    }

    /// Count the symbols of `input` and plan its encoding under `format`.
    ///
    /// Returns the bits that encoding would save, which is negative when the
    /// output would be larger than the input.
    pub fn preprocess<R: Read>(&mut self, input: R, format: HeaderFormat) -> Result<i64> {
        if !format.is_supported() {
            return Err(HuffError::invalid_usage(format!(
                "cannot compress with the {} header format",
                format
            )));
        }
        self.prepared = None;

        let (frequencies, original_bits) = frequency::analyze(BufReader::new(input))?;
        let meta = EncodingMetaData::build(frequencies, format)?;
        debug_assert_eq!(meta.sizes.original_bits, original_bits);

        let saved = meta.sizes.saved_bits();
        self.prepared = Some(meta);
        Ok(saved)
    }

    /// Compress `input`, which must be the data given to the last `preprocess`.
    ///
    /// Unless `force` is set, nothing is written when compression would not
    /// shrink the data. Returns the number of bits written.
    pub fn encode<R: Read, W: Write>(&mut self, input: R, output: W, force: bool) -> Result<u64> {
        let meta = self
            .prepared
            .take()
            .ok_or_else(|| HuffError::invalid_usage("encode called without preprocess"))?;

        let sizes = meta.sizes;
        if sizes.saved_bits() <= 0 {
            if !force {
                return Err(HuffError::WouldGrow {
                    original_bits: sizes.original_bits,
                    compressed_bits: sizes.compressed_bits,
                });
            }
            log::warn!(
                "forcing compression that grows {} bits to {}",
                sizes.original_bits,
                sizes.compressed_bits
            );
        }

        let mut reader = BitReader::new(BufReader::new(input));
        let mut writer = BitWriter::new(BufWriter::new(output));

        writer.write_bits(BITS_PER_INT, MAGIC_NUMBER)?;
        writer.write_bits(BITS_PER_INT, meta.format().selector())?;
        meta.header.write(&mut writer)?;

        while let Some(value) = reader.read_bits(BITS_PER_WORD)? {
            let code = meta.codes.get(value as u16).ok_or_else(|| {
                HuffError::input_mismatch(format!("byte {} was not seen during preprocessing", value))
            })?;
            for bit in code.iter() {
                writer.write_bit(bit)?;
            }
        }
        reader.close();

        let eof = meta
            .codes
            .get(PSEUDO_EOF)
            .ok_or_else(|| HuffError::input_mismatch("no code for the end-of-stream marker"))?;
        for bit in eof.iter() {
            writer.write_bit(bit)?;
        }

        let written = writer.bits_written();
        writer.close()?;
        if written != sizes.compressed_bits {
            return Err(HuffError::input_mismatch(format!(
                "wrote {} bits but preprocessing planned {}",
                written, sizes.compressed_bits
            )));
        }

        log::debug!("encoded {} bits with {} header", written, meta.format());
        self.show(&format!("{} bits saved by compression", sizes.saved_bits()));
        self.show(&format!("{} bits written to compressed file", written));
        Ok(written)
    }

    /// Reconstruct the original bytes from a compressed `input`.
    ///
    /// Returns the number of bits written to `output`.
    pub fn decode<R: Read, W: Write>(&self, input: R, output: W) -> Result<u64> {
        let mut reader = BitReader::new(BufReader::new(input));
        // nothing reaches `output` before the tree is rebuilt
        let mut writer = BitWriter::new(BufWriter::new(output));
        let mut state = DecodeState::ReadingMagic;

        loop {
            state = match state {
                DecodeState::ReadingMagic => {
                    let magic = reader
                        .read_bits(BITS_PER_INT)?
                        .ok_or_else(|| HuffError::truncated("stream ended before the magic number"))?;
                    if magic != MAGIC_NUMBER {
                        return Err(HuffError::BadMagic {
                            expected: MAGIC_NUMBER,
                            found: magic,
                        });
                    }
                    DecodeState::ReadingFormatSelector
                }
                DecodeState::ReadingFormatSelector => {
                    let selector = reader
                        .read_bits(BITS_PER_INT)?
                        .ok_or_else(|| HuffError::truncated("stream ended before the header format"))?;
                    match HeaderFormat::from_selector(selector) {
                        Some(format) if format.is_supported() => DecodeState::RebuildingTree(format),
                        _ => return Err(HuffError::UnsupportedFormat(selector)),
                    }
                }
                DecodeState::RebuildingTree(format) => {
                    let tree = header::read_tree(format, &mut reader)?;
                    log::debug!("rebuilt tree with {} leaves from {} header", tree.leaf_count(), format);
                    DecodeState::Walking(tree)
                }
                DecodeState::Walking(tree) => {
                    walk(&tree, &mut reader, &mut writer)?;
                    DecodeState::Done
                }
                DecodeState::Done => break,
            };
        }

        reader.close();
        let written = writer.bits_written();
        writer.close()?;

        log::debug!("decoded {} bits", written);
        self.show(&format!("{} bits written to uncompressed file", written));
        Ok(written)
    }

    fn show(&self, message: &str) {
        log::info!("{}", message);
        if let Some(viewer) = &self.viewer {
            viewer.update(message);
        }
    }
}

/// Follow body bits from the root, emitting each leaf reached, until the sentinel.
fn walk<R: Read, W: Write>(tree: &HuffmanTree, reader: &mut BitReader<R>, out: &mut BitWriter<W>) -> Result<()> {
    let mut node = &tree.root;
    loop {
        let bit = reader
            .read_bit()?
            .ok_or_else(|| HuffError::truncated("end-of-stream code never found in body"))?;

        // a lone root leaf is reached by any single bit
        if let HuffNode::Internal { left, right, .. } = node {
            node = if bit == 0 { left } else { right };
        }

        if let HuffNode::Leaf { symbol, .. } = node {
            if *symbol == PSEUDO_EOF {
                return Ok(());
            }
            out.write_bits(BITS_PER_WORD, *symbol as u32)?;
            node = &tree.root;
        }
    }
}
