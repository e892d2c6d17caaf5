//! This helper function is part of the huffman encoding system.
//!
//! It turns the byte frequencies of a block into a table of code lengths, one entry per byte value.
//! The lengths come from the classic greedy merge: the two lightest nodes are joined until one tree
//! is left, and the depth of every leaf is the length of its code.
//!
//! Equal weights are taken in insertion order. Leaves are inserted by ascending byte value and every
//! merged node is inserted after all nodes that exist before it, so the result is deterministic.
//!

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use crate::tools::freq_count::{freqs, BYTE_CAPACITY};

/// A table of code lengths, indexed by byte value. Zero means the byte has no code.
pub type LengthTable = [u8; BYTE_CAPACITY];

#[derive(Debug)]
pub enum NodeData {
    Kids(Box<Node>, Box<Node>),
    Leaf(u8),
}

#[derive(Debug)]
pub struct Node {
    pub weight: u64,
    /// Insertion order, used to break ties between equal weights.
    pub order: u32,
    pub node_data: NodeData,
}

impl Node {
    /// Create a new node
    pub fn new(weight: u64, order: u32, node_data: NodeData) -> Node {
        Node {
            weight,
            order,
            node_data,
        }
    }
}

impl PartialEq for Node {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Node {}

impl PartialOrd for Node {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Node {
    /// Sort Nodes by decreasing weight and decreasing insertion order, so the max-heap pops the
    /// lightest, oldest node first.
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .weight
            .cmp(&self.weight)
            .then(other.order.cmp(&self.order))
    }
}

/// Code lengths for the bytes of `block`.
pub fn lengths_from_block(block: &[u8]) -> LengthTable {
    lengths_from_weights(&freqs(block))
}

/// Code lengths for a frequency table. Bytes with a weight of zero get length 0. A table with a
/// single used byte gives it length 1.
pub fn lengths_from_weights(weights: &[u32; BYTE_CAPACITY]) -> LengthTable {
    let mut lengths = [0_u8; BYTE_CAPACITY];

    let mut heap = weights
        .iter()
        .enumerate()
        .filter(|(_, &w)| w > 0)
        .map(|(sym, &w)| Node::new(w as u64, sym as u32, NodeData::Leaf(sym as u8)))
        .collect::<BinaryHeap<Node>>();

    let mut order = BYTE_CAPACITY as u32;
    // Pare the heap down to one single node with child nodes.
    while heap.len() > 1 {
        if let (Some(left_child), Some(right_child)) = (heap.pop(), heap.pop()) {
            heap.push(Node::new(
                left_child.weight + right_child.weight,
                order,
                NodeData::Kids(Box::new(left_child), Box::new(right_child)),
            ));
            order += 1;
        }
    }

    if let Some(root) = heap.pop() {
        let mut leaves = vec![];
        return_leaves(&root, 0, &mut leaves);
        for (sym, len) in leaves {
            // A lone leaf is the root itself; it still needs one bit.
            lengths[sym as usize] = len.max(1);
        }
    }
    lengths
}

/// Recursively walk the tree and return in "leaves" how far (deep) from the root node each leaf is.
fn return_leaves(node: &Node, depth: u8, leaves: &mut Vec<(u8, u8)>) {
    match &node.node_data {
        NodeData::Kids(left_child, right_child) => {
            return_leaves(left_child, depth + 1, leaves);
            return_leaves(right_child, depth + 1, leaves);
        }
        NodeData::Leaf(sym) => leaves.push((*sym, depth)),
    }
}
