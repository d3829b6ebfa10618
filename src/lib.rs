//! # grin
//!
//! Lossless file compression with Huffman coding, stored in the GRIN
//! container format.
//!
//! ```rust
//! use grin::{decode_bytes, encode_bytes};
//!
//! let packed = encode_bytes(b"hello, hello, hello").unwrap();
//! assert_eq!(decode_bytes(&packed).unwrap(), b"hello, hello, hello");
//! ```

pub mod cs;

pub use cs::compression::{
    decode, decode_bytes, decode_file, encode, encode_bytes, encode_file, encode_stream,
    Compression, EncodeStats, Grin,
};
pub use cs::error::{Error, Result};
