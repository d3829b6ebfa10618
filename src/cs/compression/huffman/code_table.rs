use super::{HuffmanNode, Symbol, EOF};
use bitvec::prelude::*;

/// Bit path of a symbol, root to leaf. `false` is a left branch.
pub type Code = BitVec<u8, Msb0>;

/// Symbol to code mapping derived from a Huffman tree.
#[derive(Debug, Clone)]
pub struct CodeTable {
    codes: Vec<Option<Code>>,
}

impl CodeTable {
    /// Walk `root` depth-first and record the path to every leaf.
    ///
    /// If the tree consists of a single leaf, that leaf is assigned the code `0`.
    pub fn build(root: &HuffmanNode) -> Self {
        let mut table = CodeTable {
            codes: vec![None; EOF as usize + 1],
        };
        match root {
            HuffmanNode::Leaf { symbol, .. } => table.insert(*symbol, bitvec![u8, Msb0; 0]),
            HuffmanNode::Internal { .. } => {
                let mut path = Code::new();
                table.collect(root, &mut path);
            }
        }
        table
    }

    fn collect(&mut self, node: &HuffmanNode, path: &mut Code) {
        match node {
            HuffmanNode::Leaf { symbol, .. } => self.insert(*symbol, path.clone()),
            HuffmanNode::Internal { left, right, .. } => {
                path.push(false);
                self.collect(left, path);
                path.pop();
                path.push(true);
                self.collect(right, path);
                path.pop();
            }
        }
    }

    fn insert(&mut self, symbol: Symbol, code: Code) {
        if let Some(slot) = self.codes.get_mut(symbol as usize) {
            *slot = Some(code);
        }
    }

    /// The code for `symbol`, if the tree has a leaf for it.
    pub fn get(&self, symbol: Symbol) -> Option<&BitSlice<u8, Msb0>> {
        self.codes
            .get(symbol as usize)
            .and_then(|code| code.as_deref())
    }

    /// Number of symbols with a code
    pub fn len(&self) -> usize {
        self.codes.iter().filter(|code| code.is_some()).count()
    }

    /// Returns `true` if no symbol has a code
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Iterate over `(symbol, code)` in ascending symbol order.
    pub fn iter(&self) -> impl Iterator<Item = (Symbol, &BitSlice<u8, Msb0>)> + '_ {
        self.codes
            .iter()
            .enumerate()
            .filter_map(|(symbol, code)| code.as_deref().map(|c| (symbol as Symbol, c)))
    }
}
