use std::cmp::Ordering;
use std::io::Read;

use crate::bit_io::BitReader;
use crate::bit_vec::BitVec;
use crate::error::{HuffError, Result};
use crate::frequency::{FrequencyTable, Symbol, ALPH_SIZE, BITS_PER_WORD, PSEUDO_EOF};
use crate::min_heap::MinHeap;

/// Width of a leaf symbol in the flattened tree; one wider than a byte so the
/// sentinel fits.
pub const LEAF_SYMBOL_BITS: u32 = BITS_PER_WORD + 1;

/// No Huffman tree over 257 symbols has more internal nodes on a path than this.
const MAX_TREE_DEPTH: usize = ALPH_SIZE;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HuffNode {
    Leaf {
        weight: u64,
        symbol: Symbol,
    },
    Internal {
        weight: u64,
        left: Box<HuffNode>,
        right: Box<HuffNode>,
    },
}

impl HuffNode {
    pub fn new(symbol: Symbol, weight: u64) -> Self {
        HuffNode::Leaf { weight, symbol }
    }

    pub fn weight(&self) -> u64 {
        match self {
            HuffNode::Leaf { weight, .. } => *weight,
            HuffNode::Internal { weight, .. } => *weight,
        }
    }

    pub fn is_leaf(&self) -> bool {
        matches!(self, HuffNode::Leaf { .. })
    }

    /// Join two subtrees; `a` goes left.
    pub fn merge(a: Self, b: Self) -> Self {
        let weight = a.weight() + b.weight();
        HuffNode::Internal {
            weight,
            left: Box::new(a),
            right: Box::new(b),
        }
    }
}

/// Queue entry: a subtree plus the order it entered the queue in.
#[derive(Debug)]
struct QueuedNode {
    weight: u64,
    seq: u64,
    node: HuffNode,
}

impl PartialEq for QueuedNode {
    fn eq(&self, other: &Self) -> bool {
        self.weight == other.weight && self.seq == other.seq
    }
}

impl Eq for QueuedNode {}

impl PartialOrd for QueuedNode {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for QueuedNode {
    fn cmp(&self, other: &Self) -> Ordering {
        // equal weights: whoever entered the queue first is smaller
        self.weight
            .cmp(&other.weight)
            .then_with(|| self.seq.cmp(&other.seq))
    }
}

/// Ascending-by-weight priority sequence of subtrees.
///
/// Ties go to the earliest insertion, so a given insertion order always
/// produces the same tree.
#[derive(Debug, Default)]
pub struct NodeQueue {
    heap: MinHeap<QueuedNode>,
    next_seq: u64,
}

impl NodeQueue {
    pub fn new() -> Self {
        NodeQueue {
            heap: MinHeap::new(),
            next_seq: 0,
        }
    }

    pub fn add(&mut self, node: HuffNode) {
        let entry = QueuedNode {
            weight: node.weight(),
            seq: self.next_seq,
            node,
        };
        self.next_seq += 1;
        self.heap.insert(entry);
    }

    pub fn poll(&mut self) -> Option<HuffNode> {
        self.heap.extract_min().ok().map(|entry| entry.node)
    }

    pub fn len(&self) -> usize {
        self.heap.heap_size()
    }

    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }

    /// Merge the two lightest subtrees until one remains.
    pub fn combine(&mut self) -> Result<()> {
        while self.len() > 1 {
            let left = self.heap.extract_min()?.node;
            let right = self.heap.extract_min()?.node;
            self.add(HuffNode::merge(left, right));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HuffmanTree {
    pub root: HuffNode,
}

impl HuffmanTree {
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        HuffmanTree::from_frequencies(&FrequencyTable::from_bytes(bytes))
    }

    /// Build the tree for `frequencies`, inserting leaves in ascending symbol order.
    pub fn from_frequencies(frequencies: &FrequencyTable) -> Result<Self> {
        let mut queue = NodeQueue::new();
        for (symbol, count) in frequencies.iter() {
            queue.add(HuffNode::new(symbol, count));
        }
        queue.combine()?;
        let root = queue.poll().ok_or(crate::min_heap::HeapErr::HeapUnderflow)?;
        Ok(HuffmanTree { root })
    }

    /// True for the degenerate tree whose root is its only leaf.
    pub fn is_single_leaf(&self) -> bool {
        self.root.is_leaf()
    }

    pub fn leaf_count(&self) -> usize {
        fn count(node: &HuffNode) -> usize {
            match node {
                HuffNode::Leaf { .. } => 1,
                HuffNode::Internal { left, right, .. } => count(left) + count(right),
            }
        }
        count(&self.root)
    }

    pub fn contains(&self, symbol: Symbol) -> bool {
        fn find(node: &HuffNode, symbol: Symbol) -> bool {
            match node {
                HuffNode::Leaf { symbol: s, .. } => *s == symbol,
                HuffNode::Internal { left, right, .. } => find(left, symbol) || find(right, symbol),
            }
        }
        find(&self.root, symbol)
    }

    /// Pre-order flattening: `0` then both children for an internal node,
    /// `1` then the 9-bit symbol for a leaf.
    pub fn flatten(&self) -> BitVec {
        fn walk(node: &HuffNode, out: &mut BitVec) {
            match node {
                HuffNode::Leaf { symbol, .. } => {
                    out.push_bit(true);
                    out.push_bits(*symbol as u32, LEAF_SYMBOL_BITS as usize);
                }
                HuffNode::Internal { left, right, .. } => {
                    out.push_bit(false);
                    walk(left, out);
                    walk(right, out);
                }
            }
        }
        let mut out = BitVec::new();
        walk(&self.root, &mut out);
        out
    }

    /// Parse a flattened tree of exactly `bit_len` bits from `reader`.
    ///
    /// Rebuilt leaves carry no weight.
    pub fn read_flattened<R: Read>(reader: &mut BitReader<R>, bit_len: u32) -> Result<Self> {
        let mut budget = bit_len as u64;
        let root = read_node(reader, &mut budget, 0)?;
        if budget != 0 {
            return Err(HuffError::malformed_header(format!(
                "tree header declares {} bits but the tree ends after {}",
                bit_len,
                bit_len as u64 - budget
            )));
        }
        let tree = HuffmanTree { root };
        if !tree.contains(PSEUDO_EOF) {
            return Err(HuffError::malformed_header("tree has no end-of-stream leaf"));
        }
        Ok(tree)
    }
}

fn read_node<R: Read>(reader: &mut BitReader<R>, budget: &mut u64, depth: usize) -> Result<HuffNode> {
    if take_bits(reader, budget, 1)? == 1 {
        let symbol = take_bits(reader, budget, LEAF_SYMBOL_BITS)?;
        if symbol > PSEUDO_EOF as u32 {
            return Err(HuffError::malformed_header(format!("leaf symbol {} out of range", symbol)));
        }
        return Ok(HuffNode::new(symbol as Symbol, 0));
    }
    if depth >= MAX_TREE_DEPTH {
        return Err(HuffError::malformed_header(format!(
            "tree deeper than {} levels",
            MAX_TREE_DEPTH
        )));
    }
    let left = read_node(reader, budget, depth + 1)?;
    let right = read_node(reader, budget, depth + 1)?;
    Ok(HuffNode::merge(left, right))
}

fn take_bits<R: Read>(reader: &mut BitReader<R>, budget: &mut u64, n: u32) -> Result<u32> {
    if *budget < n as u64 {
        return Err(HuffError::malformed_header("tree runs past its declared length"));
    }
    *budget -= n as u64;
    reader
        .read_bits(n)?
        .ok_or_else(|| HuffError::truncated("stream ended inside the tree header"))
}
