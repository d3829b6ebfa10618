use super::{Symbol, EOF};
use std::fmt;

/// Represents a node in the Huffman tree.
///
/// Frequencies are only meaningful for trees built from a frequency table.
/// A tree read back from a container carries a frequency of zero everywhere,
/// since only its shape is stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HuffmanNode {
    /// A leaf node holds a symbol and its frequency.
    Leaf { symbol: Symbol, freq: u64 },
    /// An internal node with left and right children and combined frequency.
    Internal {
        freq: u64,
        left: Box<HuffmanNode>,
        right: Box<HuffmanNode>,
    },
}

impl HuffmanNode {
    /// Create a leaf
    pub fn leaf(symbol: Symbol, freq: u64) -> Self {
        HuffmanNode::Leaf { symbol, freq }
    }

    /// Join two subtrees under a new internal node whose frequency is their sum.
    pub fn merge(left: HuffmanNode, right: HuffmanNode) -> Self {
        HuffmanNode::Internal {
            freq: left.freq() + right.freq(),
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    /// Returns the frequency of the node.
    pub fn freq(&self) -> u64 {
        match self {
            HuffmanNode::Leaf { freq, .. } => *freq,
            HuffmanNode::Internal { freq, .. } => *freq,
        }
    }

    /// Returns `true` for a leaf.
    pub fn is_leaf(&self) -> bool {
        matches!(self, HuffmanNode::Leaf { .. })
    }

    /// Number of leaves below (and including) this node.
    pub fn leaf_count(&self) -> usize {
        match self {
            HuffmanNode::Leaf { .. } => 1,
            HuffmanNode::Internal { left, right, .. } => left.leaf_count() + right.leaf_count(),
        }
    }

    /// Length of the longest root-to-leaf path. A lone leaf has depth 0.
    pub fn depth(&self) -> usize {
        match self {
            HuffmanNode::Leaf { .. } => 0,
            HuffmanNode::Internal { left, right, .. } => 1 + left.depth().max(right.depth()),
        }
    }

    /// Leaf symbols in left-to-right order.
    pub fn symbols(&self) -> Vec<Symbol> {
        let mut out = Vec::with_capacity(self.leaf_count());
        self.collect_symbols(&mut out);
        out
    }

    fn collect_symbols(&self, out: &mut Vec<Symbol>) {
        match self {
            HuffmanNode::Leaf { symbol, .. } => out.push(*symbol),
            HuffmanNode::Internal { left, right, .. } => {
                left.collect_symbols(out);
                right.collect_symbols(out);
            }
        }
    }

    /// Compare structure and leaf symbols, ignoring frequencies.
    pub fn same_shape(&self, other: &HuffmanNode) -> bool {
        match (self, other) {
            (HuffmanNode::Leaf { symbol: a, .. }, HuffmanNode::Leaf { symbol: b, .. }) => a == b,
            (
                HuffmanNode::Internal {
                    left: l1,
                    right: r1,
                    ..
                },
                HuffmanNode::Internal {
                    left: l2,
                    right: r2,
                    ..
                },
            ) => l1.same_shape(l2) && r1.same_shape(r2),
            _ => false,
        }
    }

    fn fmt_indented(&self, f: &mut fmt::Formatter<'_>, depth: usize, label: &str) -> fmt::Result {
        let indent = "  ".repeat(depth);
        match self {
            HuffmanNode::Leaf { symbol, freq } => {
                if *symbol == EOF {
                    writeln!(f, "{}{} leaf EOF [freq {}]", indent, label, freq)
                } else {
                    writeln!(f, "{}{} leaf {:#04x} [freq {}]", indent, label, symbol, freq)
                }
            }
            HuffmanNode::Internal { freq, left, right } => {
                writeln!(f, "{}{} internal [freq {}]", indent, label, freq)?;
                left.fmt_indented(f, depth + 1, "0")?;
                right.fmt_indented(f, depth + 1, "1")
            }
        }
    }
}

/// Indented dump of the tree, one node per line, children labelled by branch bit.
impl fmt::Display for HuffmanNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.fmt_indented(f, 0, "root")
    }
}
