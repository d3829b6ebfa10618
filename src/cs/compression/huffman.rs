//! Huffman coding over byte symbols with an end-of-stream pseudo-symbol.
//!
//! A tree is built from byte frequencies plus one [`EOF`] leaf, serialized in
//! pre-order ahead of the coded data, and walked bit by bit to decode. The
//! pieces are split by stage:
//!
//! - [`frequency`]: one pass over the source counting each byte value
//! - [`node`]: the tree itself, a leaf or an internal node with two owned children
//! - [`builder`]: repeated minimum-pair merging with a first-in-first-out tie-break
//! - [`tree_codec`]: the bit-level tree encoding stored in a container
//! - [`code_table`]: symbol to bit-path mapping for the encoder
//!
//! # Example
//!
//! ```rust
//! use grin::cs::compression::huffman::{build_tree, CodeTable, FrequencyTable, EOF};
//!
//! let freqs = FrequencyTable::from_bytes(b"aab");
//! let tree = build_tree(&freqs);
//! let codes = CodeTable::build(&tree);
//!
//! assert_eq!(tree.leaf_count(), 3);
//! assert!(codes.get(EOF).is_some());
//! ```

/// A coded value: 0-255 are literal bytes, [`EOF`] marks the end of the data.
pub type Symbol = u16;

/// End-of-stream pseudo-symbol.
pub const EOF: Symbol = 256;

/// Width of a serialized leaf symbol. Nine bits are needed to hold [`EOF`].
pub const SYMBOL_BITS: usize = 9;

pub mod builder;
pub mod code_table;
pub mod frequency;
pub mod node;
pub mod tree_codec;

pub use builder::build_tree;
pub use code_table::CodeTable;
pub use frequency::FrequencyTable;
pub use node::HuffmanNode;
pub use tree_codec::{read_tree, tree_bit_len, write_tree, DEFAULT_MAX_TREE_DEPTH};
