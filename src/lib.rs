//! # Huffzip: Lossless Huffman Compression
//!
//! This crate implements a lossless byte-stream compressor/decompressor
//! based on two-pass Huffman coding with a self-describing tree header.
//!
//! ## Key Features
//!
//! - **Tree-header format**: the prefix-code tree is serialized pre-order
//!   into the stream, so no side table travels with the data
//! - **Sentinel termination**: a 257th end-of-stream symbol marks the
//!   logical end of the payload independent of byte alignment
//! - **Deterministic trees**: priority-queue ties break by strict insertion
//!   order, so identical input produces identical output on every platform
//! - **Pluggable bit I/O**: the codec is generic over [`BitInput`] /
//!   [`BitOutput`] ports, with stock implementations for slices, vectors,
//!   and std I/O streams
//! - **Typed failures**: bad magic, header truncation, and a missing
//!   end-of-stream terminator are distinct error variants
//!
//! ## Quick Start
//!
//! ```rust
//! use huffzip::{huffman_compress, huffman_decompress};
//!
//! let data = b"compress me, then get me back bit-for-bit";
//! let compressed = huffman_compress(data)?;
//! let restored = huffman_decompress(&compressed)?;
//! assert_eq!(restored, data);
//! # Ok::<(), huffzip::HuffzipError>(())
//! ```
//!
//! Streaming sources work through the port traits:
//!
//! ```rust
//! use std::io::Cursor;
//! use huffzip::{HuffmanCodec, ReaderBitInput, VecBitOutput};
//!
//! let codec = HuffmanCodec::new();
//! let mut input = ReaderBitInput::new(Cursor::new(b"two passes over this".to_vec()));
//! let mut output = VecBitOutput::new();
//! codec.compress(&mut input, &mut output)?;
//! # Ok::<(), huffzip::HuffzipError>(())
//! ```

#![warn(missing_docs)]
#![deny(unsafe_code)]

pub mod codec;
pub mod config;
pub mod error;
pub mod io;
pub mod tree;

// Re-export core types
pub use codec::{
    huffman_compress, huffman_compress_with_config, huffman_decompress,
    huffman_decompress_with_config, CodecStats, HuffmanCodec, MAGIC_BITS, TREE_MAGIC,
};
pub use config::{CodecConfig, Verbosity};
pub use error::{HuffzipError, Result, StreamPhase};
pub use io::{BitInput, BitOutput, ReaderBitInput, SliceBitInput, VecBitOutput, WriterBitOutput};
pub use tree::{
    CodeTable, FrequencyTable, HuffNode, HuffmanTree, Symbol, END_OF_STREAM, SYMBOL_BITS,
    SYMBOL_COUNT,
};

/// Library version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
