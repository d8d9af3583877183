//! Bit-level I/O ports
//!
//! The codec is generic over a pair of traits: [`BitInput`] for a sequential,
//! rewindable bit reader and [`BitOutput`] for a sequential bit writer with
//! explicit byte-aligned finalization. This module carries those traits and
//! stock implementations over byte slices, vectors, and std I/O streams.
//!
//! A compress or decompress call owns its ports exclusively for its whole
//! lifetime; nothing here is shared between invocations.

pub mod bit_input;
pub mod bit_output;

// Re-export core types
pub use bit_input::{BitInput, ReaderBitInput, SliceBitInput};
pub use bit_output::{BitOutput, VecBitOutput, WriterBitOutput};

/// Create a bit input over a byte slice
pub fn from_slice(data: &[u8]) -> SliceBitInput<'_> {
    SliceBitInput::new(data)
}

/// Create an empty vector-backed bit output
pub fn to_vec() -> VecBitOutput {
    VecBitOutput::new()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_write_then_read_round_trip() {
        let mut output = to_vec();
        output.write_bits(9, 256).unwrap();
        output.write_bits(1, 0).unwrap();
        output.write_bits(9, 65).unwrap();
        output.close().unwrap();

        let bytes = output.into_bytes();
        let mut input = from_slice(&bytes);
        assert_eq!(input.read_bits(9).unwrap(), Some(256));
        assert_eq!(input.read_bits(1).unwrap(), Some(0));
        assert_eq!(input.read_bits(9).unwrap(), Some(65));
        // The remainder is zero padding to the byte boundary.
        assert_eq!(input.read_bits(5).unwrap(), Some(0));
        assert_eq!(input.read_bits(1).unwrap(), None);
    }
}
