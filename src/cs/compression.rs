//! Compression algorithms implementation.
//!
//! This module provides the pieces of a Huffman compressor and the GRIN
//! container that persists its output:
//! - Bit-granularity reading and writing over byte streams
//! - Frequency analysis, tree construction and tree serialization
//! - Symbol code tables derived from a tree
//! - The GRIN encoder and decoder
//!
//! # Examples
//!
//! ```rust
//! use grin::cs::compression::{Compression, grin::Grin};
//!
//! let codec = Grin::new();
//! let packed = codec.compress(b"abracadabra").unwrap();
//! assert_eq!(codec.decompress(&packed).unwrap(), b"abracadabra");
//! ```

pub use crate::cs::error::Result;

/// Trait for compression algorithms
pub trait Compression {
    /// Compress the input data
    fn compress(&self, data: &[u8]) -> Result<Vec<u8>>;

    /// Decompress the compressed data
    fn decompress(&self, data: &[u8]) -> Result<Vec<u8>>;
}

pub mod bitstream;
pub mod grin;
pub mod huffman;

pub use self::bitstream::{BitReader, BitWriter};
pub use self::grin::{
    decode, decode_bytes, decode_file, encode, encode_bytes, encode_file, encode_stream,
    EncodeStats, Grin,
};
pub use self::huffman::{build_tree, CodeTable, FrequencyTable, HuffmanNode, Symbol, EOF};
