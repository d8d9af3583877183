//! Compression and decompression pipelines
//!
//! Compression makes two strictly ordered passes over the input port: a
//! counting pass that builds the frequency table, then an encode pass that
//! replaces each byte with its prefix code. The output is the 32-bit magic
//! number, the pre-order tree header, the concatenated codes, one final
//! end-of-stream code, and zero padding to the byte boundary.
//!
//! Decompression validates the magic number, parses the header back into a
//! tree, and walks it bit-by-bit from the root, emitting a byte at every
//! non-sentinel leaf and terminating at the end-of-stream leaf.

use log::{debug, trace};

use crate::config::{CodecConfig, Verbosity};
use crate::error::{HuffzipError, Result, StreamPhase};
use crate::io::{from_slice, to_vec, BitInput, BitOutput};
use crate::tree::{CodeTable, FrequencyTable, HuffNode, HuffmanTree, Symbol, END_OF_STREAM};

/// Magic number identifying the tree-header stream format
pub const TREE_MAGIC: u32 = 0xFACE_8201;

/// Width of the magic number field
pub const MAGIC_BITS: u32 = 32;

/// Bit counts observed by a single compress or decompress call
///
/// Input bits are counted from the last port reset, so for compression they
/// cover the encode pass only, not the counting pass. Output bits include
/// the final padding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CodecStats {
    /// Bits read from the input port
    pub input_bits: u64,
    /// Bits written to the output port
    pub output_bits: u64,
}

impl CodecStats {
    /// Output size over input size; `0.0` for empty input
    pub fn compression_ratio(&self) -> f64 {
        if self.input_bits == 0 {
            0.0
        } else {
            self.output_bits as f64 / self.input_bits as f64
        }
    }
}

/// Two-pass Huffman compressor/decompressor
///
/// The codec is stateless between calls; each invocation builds its own
/// frequency table, tree, and code table, and owns its ports exclusively.
#[derive(Debug, Clone, Default)]
pub struct HuffmanCodec {
    config: CodecConfig,
}

impl HuffmanCodec {
    /// Create a codec with the default (silent) configuration
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a codec with an explicit configuration
    pub fn with_config(config: CodecConfig) -> Self {
        Self { config }
    }

    /// The codec's configuration
    pub fn config(&self) -> &CodecConfig {
        &self.config
    }

    /// Compress `input` into `output`
    ///
    /// Reads the input twice: once to count frequencies, then again (after
    /// an internal [`reset`](BitInput::reset)) to encode. Closes the output
    /// port when done.
    pub fn compress<R, W>(&self, input: &mut R, output: &mut W) -> Result<CodecStats>
    where
        R: BitInput + ?Sized,
        W: BitOutput + ?Sized,
    {
        let frequencies = FrequencyTable::count_symbols(input)?;
        let tree = HuffmanTree::from_frequencies(&frequencies)?;
        let codes = tree.code_table();

        if self.config.verbosity >= Verbosity::Low {
            debug!(
                "compress: {} populated symbols, {} tree leaves, max code length {}",
                frequencies.populated_symbols(),
                tree.leaf_count(),
                codes.max_code_length()
            );
        }
        if self.config.verbosity >= Verbosity::High {
            dump_code_table(&codes);
        }

        output.write_bits(MAGIC_BITS, TREE_MAGIC)?;
        tree.write_header(output)?;

        input.reset()?;
        while let Some(byte) = input.read_bits(8)? {
            write_code(&codes, byte as Symbol, output)?;
        }
        write_code(&codes, END_OF_STREAM, output)?;
        output.close()?;

        let stats = CodecStats {
            input_bits: input.bits_read(),
            output_bits: output.bits_written(),
        };
        if self.config.verbosity >= Verbosity::Low {
            debug!(
                "compress: {} bits in, {} bits out (ratio {:.3})",
                stats.input_bits,
                stats.output_bits,
                stats.compression_ratio()
            );
        }
        Ok(stats)
    }

    /// Decompress `input` into `output`
    ///
    /// Validates the magic number before any other read, then parses the
    /// tree header and decodes the payload until the end-of-stream leaf.
    /// Closes the output port when done.
    pub fn decompress<R, W>(&self, input: &mut R, output: &mut W) -> Result<CodecStats>
    where
        R: BitInput + ?Sized,
        W: BitOutput + ?Sized,
    {
        let magic = input.read_bits(MAGIC_BITS)?.ok_or(HuffzipError::Truncated {
            phase: StreamPhase::Magic,
        })?;
        if magic != TREE_MAGIC {
            return Err(HuffzipError::invalid_magic(magic));
        }

        let tree = HuffmanTree::read_header(input)?;
        if self.config.verbosity >= Verbosity::Low {
            debug!("decompress: parsed header with {} leaves", tree.leaf_count());
        }

        let root = tree.root();
        if let HuffNode::Leaf { symbol, .. } = root {
            // Degenerate single-leaf tree from empty input: the decoder is
            // seeded at the sentinel leaf and consumes no payload bits.
            if *symbol != END_OF_STREAM {
                return Err(HuffzipError::malformed_header(
                    "single-leaf tree without an end-of-stream leaf can never terminate",
                ));
            }
            output.close()?;
            return Ok(CodecStats {
                input_bits: input.bits_read(),
                output_bits: output.bits_written(),
            });
        }

        let mut current = root;
        loop {
            let bit = input
                .read_bits(1)?
                .ok_or(HuffzipError::MissingTerminator)?;

            let next = match current {
                HuffNode::Internal { left, right, .. } => {
                    if bit == 0 {
                        left.as_ref()
                    } else {
                        right.as_ref()
                    }
                }
                // The walk resets to the root after every leaf and the root
                // is internal here, so a leaf can never be stepped from.
                HuffNode::Leaf { .. } => {
                    return Err(HuffzipError::malformed_header(
                        "decoder stepped from a leaf node",
                    ))
                }
            };

            match next {
                HuffNode::Leaf { symbol, .. } => {
                    if *symbol == END_OF_STREAM {
                        break;
                    }
                    output.write_bits(8, u32::from(*symbol))?;
                    current = root;
                }
                HuffNode::Internal { .. } => current = next,
            }
        }
        output.close()?;

        let stats = CodecStats {
            input_bits: input.bits_read(),
            output_bits: output.bits_written(),
        };
        if self.config.verbosity >= Verbosity::Low {
            debug!(
                "decompress: {} bits in, {} bits out",
                stats.input_bits, stats.output_bits
            );
        }
        Ok(stats)
    }
}

fn write_code<W: BitOutput + ?Sized>(
    codes: &CodeTable,
    symbol: Symbol,
    output: &mut W,
) -> Result<()> {
    let code = codes
        .code(symbol)
        .ok_or_else(|| HuffzipError::missing_code(symbol))?;
    for &bit in code {
        output.write_bits(1, u32::from(bit))?;
    }
    Ok(())
}

fn dump_code_table(codes: &CodeTable) {
    for (symbol, code) in codes.iter() {
        let rendered: String = code.iter().map(|&b| if b { '1' } else { '0' }).collect();
        trace!("code {:>3}: {}", symbol, rendered);
    }
}

/// Compress a byte slice with the default configuration
pub fn huffman_compress(data: &[u8]) -> Result<Vec<u8>> {
    huffman_compress_with_config(data, CodecConfig::default())
}

/// Compress a byte slice with an explicit configuration
pub fn huffman_compress_with_config(data: &[u8], config: CodecConfig) -> Result<Vec<u8>> {
    let codec = HuffmanCodec::with_config(config);
    let mut input = from_slice(data);
    let mut output = to_vec();
    codec.compress(&mut input, &mut output)?;
    Ok(output.into_bytes())
}

/// Decompress a byte slice with the default configuration
pub fn huffman_decompress(data: &[u8]) -> Result<Vec<u8>> {
    huffman_decompress_with_config(data, CodecConfig::default())
}

/// Decompress a byte slice with an explicit configuration
pub fn huffman_decompress_with_config(data: &[u8], config: CodecConfig) -> Result<Vec<u8>> {
    let codec = HuffmanCodec::with_config(config);
    let mut input = from_slice(data);
    let mut output = to_vec();
    codec.decompress(&mut input, &mut output)?;
    Ok(output.into_bytes())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_trip_text() {
        let data = b"hello world! this is a test message for huffman coding.";
        let compressed = huffman_compress(data).unwrap();
        let decompressed = huffman_decompress(&compressed).unwrap();
        assert_eq!(decompressed, data);
    }

    #[test]
    fn test_compressed_stream_starts_with_magic() {
        let compressed = huffman_compress(b"abc").unwrap();
        assert_eq!(&compressed[..4], &[0xFA, 0xCE, 0x82, 0x01]);
    }

    #[test]
    fn test_stats_reflect_port_counters() {
        let data = b"aaaaaaaaaaaaaaaa";
        let codec = HuffmanCodec::new();
        let mut input = from_slice(data);
        let mut output = to_vec();
        let stats = codec.compress(&mut input, &mut output).unwrap();

        assert_eq!(stats.input_bits, data.len() as u64 * 8);
        assert_eq!(stats.output_bits, output.bits_written());
        assert!(stats.compression_ratio() < 1.0);
    }

    #[test]
    fn test_decompress_rejects_short_stream() {
        let err = huffman_decompress(&[0xFA, 0xCE]).unwrap_err();
        assert!(matches!(
            err,
            HuffzipError::Truncated {
                phase: StreamPhase::Magic
            }
        ));
    }

    #[test]
    fn test_decompress_rejects_single_leaf_without_terminator() {
        let mut output = to_vec();
        output.write_bits(MAGIC_BITS, TREE_MAGIC).unwrap();
        output.write_bits(1, 1).unwrap();
        output.write_bits(9, u32::from(b'A')).unwrap();
        output.close().unwrap();

        let err = huffman_decompress(&output.into_bytes()).unwrap_err();
        assert!(matches!(err, HuffzipError::MalformedHeader { .. }));
    }
}
