//! Error handling for the huffzip library
//!
//! This module provides the error taxonomy for compression and decompression:
//! format errors (bad magic), truncation during header parsing, a missing
//! end-of-stream terminator in the payload, and malformed tree headers.
//! Every error is fatal for the current invocation — a Huffman-coded stream
//! cannot be locally repaired once a bit is lost.

use std::fmt;

use thiserror::Error;

/// Result type alias for huffzip operations
pub type Result<T> = std::result::Result<T, HuffzipError>;

/// The decode phase in which a truncation was detected
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StreamPhase {
    /// Reading the 32-bit magic number at the start of the stream
    Magic,
    /// Reading a structural bit of the pre-order tree header
    HeaderNode,
    /// Reading the 9-bit value field of a tree header leaf
    HeaderSymbol,
}

impl fmt::Display for StreamPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let phase = match self {
            StreamPhase::Magic => "reading the magic number",
            StreamPhase::HeaderNode => "reading a tree header node bit",
            StreamPhase::HeaderSymbol => "reading a tree header leaf value",
        };
        f.write_str(phase)
    }
}

/// Main error type for the huffzip library
#[derive(Error, Debug)]
pub enum HuffzipError {
    /// I/O related errors from file- or writer-backed bit ports
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The stream does not start with the tree-header magic number
    #[error("invalid magic number: {found:#010x}")]
    InvalidMagic {
        /// The 32-bit value found where the magic number was expected
        found: u32,
    },

    /// End of input where a header bit or leaf value field was expected
    #[error("unexpected end of input while {phase}")]
    Truncated {
        /// The parse position at which input ran out
        phase: StreamPhase,
    },

    /// The payload was exhausted before the end-of-stream leaf was reached
    #[error("encoded payload ended without an end-of-stream marker")]
    MissingTerminator,

    /// The tree header parsed, but describes an unusable tree
    #[error("malformed tree header: {message}")]
    MalformedHeader {
        /// Description of the defect
        message: String,
    },

    /// A symbol seen during the encode pass has no entry in the code table
    #[error("no code for symbol {symbol} in the current table")]
    MissingCode {
        /// The symbol that missed the lookup
        symbol: u16,
    },

    /// A frequency table with no populated entries was handed to the tree builder
    #[error("frequency table has no populated symbols")]
    EmptyAlphabet,
}

impl HuffzipError {
    /// Create an invalid magic number error
    pub fn invalid_magic(found: u32) -> Self {
        Self::InvalidMagic { found }
    }

    /// Create a truncation error for the given decode phase
    pub fn truncated(phase: StreamPhase) -> Self {
        Self::Truncated { phase }
    }

    /// Create a malformed header error
    pub fn malformed_header<S: Into<String>>(message: S) -> Self {
        Self::MalformedHeader {
            message: message.into(),
        }
    }

    /// Create a missing code error
    pub fn missing_code(symbol: u16) -> Self {
        Self::MissingCode { symbol }
    }
}
