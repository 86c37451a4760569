//! # huff_codec
//!
//! Lossless two-pass Huffman compression of byte streams.
//!
//! A compressed stream is a 32-bit magic number, a 32-bit header format
//! selector, a header from which the decoder rebuilds the code tree, the
//! bit-packed body, and a closing end-of-stream code.
//!
//! ## Quick Start
//!
//! ```rust
//! use huff_codec::{HeaderFormat, HuffmanCodec};
//! use std::io::Cursor;
//!
//! let data = b"abracadabra abracadabra abracadabra".repeat(8);
//!
//! let mut codec = HuffmanCodec::new();
//! let saved = codec.preprocess(Cursor::new(&data), HeaderFormat::Tree)?;
//! assert!(saved > 0);
//!
//! let mut compressed = Vec::new();
//! codec.encode(Cursor::new(&data), &mut compressed, false)?;
//!
//! let mut restored = Vec::new();
//! codec.decode(Cursor::new(&compressed), &mut restored)?;
//! assert_eq!(restored, data);
//! # Ok::<(), huff_codec::HuffError>(())
//! ```

pub mod bit_io;
pub mod code_table;
pub mod config;
pub mod error;
pub mod frequency;
pub mod header;
pub mod huffman_codec;
pub mod hufftree;
pub mod mark;
pub mod metadata;
pub mod output;

// Internal modules - not part of public API
mod bit_vec;
mod min_heap;

pub use bit_vec::BitVec;
pub use config::CodecConfig;
pub use error::{HuffError, Result};
pub use frequency::{FrequencyTable, Symbol, PSEUDO_EOF};
pub use header::HeaderFormat;
pub use huffman_codec::{HuffViewer, HuffmanCodec, MAGIC_NUMBER};
pub use hufftree::HuffmanTree;
pub use min_heap::HeapErr;
pub use mark::HuffMark;
pub use metadata::{EncodingMetaData, SizeAccounting};
