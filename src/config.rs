//! Codec configuration
//!
//! Diagnostic verbosity is a construction-time value carried by the codec,
//! never hidden module state. Output goes through the `log` facade, so the
//! consumer's logger configuration still decides what becomes visible.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Diagnostic verbosity for compress/decompress operations
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Verbosity {
    /// No diagnostic output
    Off,
    /// Per-operation summaries: symbol counts, tree shape, bits in/out
    Low,
    /// Everything in `Low` plus a dump of the derived code table
    High,
}

impl Default for Verbosity {
    fn default() -> Self {
        Self::Off
    }
}

/// Configuration for a [`HuffmanCodec`](crate::codec::HuffmanCodec)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct CodecConfig {
    /// Diagnostic verbosity for this codec instance
    pub verbosity: Verbosity,
}

impl Default for CodecConfig {
    fn default() -> Self {
        Self {
            verbosity: Verbosity::Off,
        }
    }
}

impl CodecConfig {
    /// Configuration with diagnostics disabled
    pub fn silent() -> Self {
        Self::default()
    }

    /// Configuration with per-operation summary diagnostics
    pub fn verbose() -> Self {
        Self {
            verbosity: Verbosity::Low,
        }
    }

    /// Configuration with full diagnostics including code table dumps
    pub fn debug() -> Self {
        Self {
            verbosity: Verbosity::High,
        }
    }
}
