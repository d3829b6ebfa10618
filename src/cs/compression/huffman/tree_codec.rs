//! Pre-order bit encoding of a Huffman tree.
//!
//! A leaf is written as a `0` bit followed by its symbol in [`SYMBOL_BITS`]
//! bits; an internal node as a `1` bit followed by its left and then its
//! right subtree. Frequencies are not stored.

use super::{HuffmanNode, Symbol, EOF, SYMBOL_BITS};
use crate::cs::compression::bitstream::{BitReader, BitWriter};
use crate::cs::compression::Result;
use crate::cs::error::Error;
use std::io::{Read, Write};

/// Deepest tree accepted by [`read_tree`] unless configured otherwise.
///
/// A tree over 257 distinct symbols can be at most 256 levels deep.
pub const DEFAULT_MAX_TREE_DEPTH: usize = 256;

/// Serialize `node` in pre-order.
pub fn write_tree<W: Write>(node: &HuffmanNode, out: &mut BitWriter<W>) -> Result<()> {
    match node {
        HuffmanNode::Leaf { symbol, .. } => {
            if *symbol > EOF {
                return Err(Error::InvalidInput(format!(
                    "symbol {} does not fit the {}-bit leaf field",
                    symbol, SYMBOL_BITS
                )));
            }
            out.write_bit(false)?;
            out.write_bits(u32::from(*symbol), SYMBOL_BITS)
        }
        HuffmanNode::Internal { left, right, .. } => {
            out.write_bit(true)?;
            write_tree(left, out)?;
            write_tree(right, out)
        }
    }
}

/// Number of bits [`write_tree`] emits for `node`.
pub fn tree_bit_len(node: &HuffmanNode) -> u64 {
    match node {
        HuffmanNode::Leaf { .. } => 1 + SYMBOL_BITS as u64,
        HuffmanNode::Internal { left, right, .. } => 1 + tree_bit_len(left) + tree_bit_len(right),
    }
}

/// Reconstruct a tree written by [`write_tree`].
///
/// Every frequency in the result is zero. Fails with [`Error::MalformedTree`]
/// if the input ends before the tree is complete, a leaf value exceeds
/// [`EOF`], or an internal node would place leaves deeper than `max_depth`.
pub fn read_tree<R: Read>(input: &mut BitReader<R>, max_depth: usize) -> Result<HuffmanNode> {
    read_node(input, 0, max_depth)
}

fn read_node<R: Read>(
    input: &mut BitReader<R>,
    depth: usize,
    max_depth: usize,
) -> Result<HuffmanNode> {
    match input.read_bit()? {
        None => Err(truncated(input)),
        Some(false) => {
            let value = input
                .read_bits(SYMBOL_BITS)?
                .ok_or_else(|| truncated(input))?;
            if value > u32::from(EOF) {
                return Err(Error::MalformedTree(format!(
                    "leaf symbol {} is out of range",
                    value
                )));
            }
            Ok(HuffmanNode::leaf(value as Symbol, 0))
        }
        Some(true) => {
            if depth >= max_depth {
                return Err(Error::MalformedTree(format!(
                    "tree is deeper than {} levels",
                    max_depth
                )));
            }
            let left = read_node(input, depth + 1, max_depth)?;
            let right = read_node(input, depth + 1, max_depth)?;
            Ok(HuffmanNode::Internal {
                freq: 0,
                left: Box::new(left),
                right: Box::new(right),
            })
        }
    }
}

fn truncated<R: Read>(input: &BitReader<R>) -> Error {
    Error::MalformedTree(format!(
        "stream ended after {} bits, before the tree was complete",
        input.bits_read()
    ))
}
