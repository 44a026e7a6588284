//! Min-ordered queue of tree nodes.
//!
//! Nodes come out lowest weight first. Equal weights come out in insertion
//! order, so identical frequency tables always yield identical trees.

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use crate::error::{Result, SqueezError};
use crate::tree::TreeNode;

#[derive(Debug)]
struct Entry {
    weight: u64,
    seq: u64,
    node: TreeNode,
}

impl Eq for Entry {}
impl PartialEq for Entry {
    fn eq(&self, other: &Self) -> bool {
        self.weight == other.weight && self.seq == other.seq
    }
}
impl PartialOrd for Entry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}
impl Ord for Entry {
    fn cmp(&self, other: &Self) -> Ordering {
        // reversed: BinaryHeap is a max-heap
        other
            .weight
            .cmp(&self.weight)
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

#[derive(Debug, Default)]
pub struct PriorityQueue {
    heap: BinaryHeap<Entry>,
    next_seq: u64,
}

impl PriorityQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, node: TreeNode) {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.heap.push(Entry {
            weight: node.weight(),
            seq,
            node,
        });
    }

    /// Remove the lightest node. Popping an empty queue is a caller bug and
    /// reports `EmptyQueue`.
    pub fn pop(&mut self) -> Result<TreeNode> {
        self.heap
            .pop()
            .map(|entry| entry.node)
            .ok_or(SqueezError::EmptyQueue)
    }

    pub fn len(&self) -> usize {
        self.heap.len()
    }

    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }
}
