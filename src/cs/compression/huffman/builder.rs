//! Huffman tree construction.
//!
//! Leaves are queued in ascending byte order followed by the [`EOF`] leaf, and
//! the two lowest-frequency nodes are merged until one remains. Among equal
//! frequencies the node queued first is taken first, and the first node taken
//! becomes the left child. Merged nodes are queued behind everything already
//! present, so identical frequency tables always give identical trees.

use super::{FrequencyTable, HuffmanNode, Symbol, EOF};
use std::cmp::Ordering;
use std::collections::BinaryHeap;

/// Stand-in leaf paired with [`EOF`] when the source is empty.
const PLACEHOLDER: Symbol = 0;

/// A queued node ordered by frequency, then by insertion sequence.
/// We want the smallest frequency, and the oldest entry, to have highest priority.
#[derive(Debug)]
struct Queued {
    freq: u64,
    seq: u64,
    node: HuffmanNode,
}

impl PartialEq for Queued {
    fn eq(&self, other: &Self) -> bool {
        self.freq == other.freq && self.seq == other.seq
    }
}

impl Eq for Queued {}

impl Ord for Queued {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reverse both keys: BinaryHeap pops the maximum.
        other
            .freq
            .cmp(&self.freq)
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

impl PartialOrd for Queued {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Minimum-frequency queue with first-in-first-out tie-breaking.
#[derive(Debug, Default)]
struct MergeQueue {
    heap: BinaryHeap<Queued>,
    next_seq: u64,
}

impl MergeQueue {
    fn push(&mut self, node: HuffmanNode) {
        self.heap.push(Queued {
            freq: node.freq(),
            seq: self.next_seq,
            node,
        });
        self.next_seq += 1;
    }

    fn pop(&mut self) -> Option<HuffmanNode> {
        self.heap.pop().map(|queued| queued.node)
    }
}

/// Build the Huffman tree for `freqs`, including one [`EOF`] leaf of frequency 1.
///
/// The result always has at least two leaves. An empty table yields a
/// zero-frequency leaf for byte 0 alongside the EOF leaf, so every leaf,
/// EOF included, has a non-empty code.
pub fn build_tree(freqs: &FrequencyTable) -> HuffmanNode {
    let mut queue = MergeQueue::default();
    for (byte, count) in freqs.iter() {
        queue.push(HuffmanNode::leaf(Symbol::from(byte), count));
    }
    if freqs.is_empty() {
        queue.push(HuffmanNode::leaf(PLACEHOLDER, 0));
    }
    let mut root = HuffmanNode::leaf(EOF, 1);
    queue.push(root.clone());

    // The last node popped without a partner is the root.
    while let Some(left) = queue.pop() {
        match queue.pop() {
            Some(right) => queue.push(HuffmanNode::merge(left, right)),
            None => root = left,
        }
    }
    log::debug!(
        "built huffman tree: {} leaves, depth {}, weight {}",
        root.leaf_count(),
        root.depth(),
        root.freq()
    );
    root
}
