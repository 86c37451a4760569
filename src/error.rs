//! Error handling for the codec.
//!
//! Every fallible operation in the crate returns [`Result`], and every failure
//! is one of the [`HuffError`] variants below.

use thiserror::Error;

use crate::min_heap::HeapErr;

/// Main error type for the codec
#[derive(Error, Debug)]
pub enum HuffError {
    /// I/O failure on the underlying byte channel
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A call was made with arguments or in a state the codec cannot accept
    #[error("Invalid usage: {message}")]
    InvalidUsage {
        /// What was wrong with the call
        message: String,
    },

    /// The stream does not start with the expected magic number
    #[error("Huffman magic number not found: expected {expected:#010x}, found {found:#010x}")]
    BadMagic {
        /// Magic number this codec writes
        expected: u32,
        /// Value actually read
        found: u32,
    },

    /// The header format selector names a format that cannot be decoded
    #[error("Unsupported header format selector: {0}")]
    UnsupportedFormat(u32),

    /// The header could not be turned back into a tree
    #[error("Malformed header: {message}")]
    MalformedHeader {
        /// Description of the defect
        message: String,
    },

    /// Compressing would not shrink the data and no override was given
    #[error("Compression would not shrink the data: {original_bits} bits in, {compressed_bits} bits out")]
    WouldGrow {
        /// Size of the raw input
        original_bits: u64,
        /// Size the compressed stream would have
        compressed_bits: u64,
    },

    /// The compressed body ended before the sentinel code was read
    #[error("Truncated stream: {message}")]
    Truncated {
        /// Where the data ran out
        message: String,
    },

    /// The data handed to encode differs from the data that was preprocessed
    #[error("Input does not match preprocessed data: {message}")]
    InputMismatch {
        /// How the input differed
        message: String,
    },

    /// A symbol count does not fit the 32-bit count header
    #[error("Count for symbol {symbol} is {count}, too large for a count header")]
    CountOverflow {
        /// Offending symbol
        symbol: u16,
        /// Its occurrence count
        count: u64,
    },

    /// Priority structure failure during tree construction
    #[error("Heap error: {0}")]
    Heap(#[from] HeapErr),

    /// Configuration could not be read, written or validated
    #[error("Invalid configuration: {message}")]
    Configuration {
        /// Configuration error message
        message: String,
    },
}

impl HuffError {
    /// Create an invalid usage error
    pub fn invalid_usage<S: Into<String>>(message: S) -> Self {
        Self::InvalidUsage { message: message.into() }
    }

    /// Create a malformed header error
    pub fn malformed_header<S: Into<String>>(message: S) -> Self {
        Self::MalformedHeader { message: message.into() }
    }

    /// Create a truncation error
    pub fn truncated<S: Into<String>>(message: S) -> Self {
        Self::Truncated { message: message.into() }
    }

    /// Create an input mismatch error
    pub fn input_mismatch<S: Into<String>>(message: S) -> Self {
        Self::InputMismatch { message: message.into() }
    }

    /// Create a configuration error
    pub fn configuration<S: Into<String>>(message: S) -> Self {
        Self::Configuration { message: message.into() }
    }

    /// True for errors caused by the bytes of a compressed stream rather than by the caller
    pub fn is_format_error(&self) -> bool {
        matches!(
            self,
            Self::BadMagic { .. }
                | Self::UnsupportedFormat(_)
                | Self::MalformedHeader { .. }
                | Self::Truncated { .. }
        )
    }

    /// Get the error category for logging
    pub fn category(&self) -> &'static str {
        match self {
            Self::Io(_) => "io",
            Self::InvalidUsage { .. } => "usage",
            Self::BadMagic { .. } => "format",
            Self::UnsupportedFormat(_) => "format",
            Self::MalformedHeader { .. } => "format",
            Self::WouldGrow { .. } => "growth",
            Self::Truncated { .. } => "truncation",
            Self::InputMismatch { .. } => "usage",
            Self::CountOverflow { .. } => "usage",
            Self::Heap(_) => "internal",
            Self::Configuration { .. } => "config",
        }
    }
}

/// Result type alias for convenience
pub type Result<T> = std::result::Result<T, HuffError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_errors_are_classified() {
        let err = HuffError::BadMagic { expected: 0xface8200, found: 0 };
        assert!(err.is_format_error());
        assert_eq!(err.category(), "format");

        let err = HuffError::truncated("body");
        assert!(err.is_format_error());
        assert_eq!(err.category(), "truncation");

        let err = HuffError::WouldGrow { original_bits: 8, compressed_bits: 100 };
        assert!(!err.is_format_error());
        assert_eq!(err.category(), "growth");
    }

    #[test]
    fn test_magic_is_shown_in_hex() {
        let err = HuffError::BadMagic { expected: 0xface8200, found: 0x1234 };
        let msg = err.to_string();
        assert!(msg.contains("0xface8200"), "{}", msg);
        assert!(msg.contains("0x00001234"), "{}", msg);
    }

    #[test]
    fn test_io_conversion() {
        let io = std::io::Error::new(std::io::ErrorKind::Other, "disk gone");
        let err: HuffError = io.into();
        assert_eq!(err.category(), "io");
    }
}
