//! Huffman tree construction and the decoder-side tree.

use tracing::debug;

use crate::code_table::CodeTable;
use crate::error::{Result, SqueezError};
use crate::frequency::FrequencyTable;
use crate::queue::PriorityQueue;

/// Node of the Huffman tree. Symbols live only at leaves; an internal node
/// weighs the sum of its two children.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TreeNode {
    Leaf {
        symbol: char,
        weight: u64,
    },
    Internal {
        weight: u64,
        left: Box<TreeNode>,
        right: Box<TreeNode>,
    },
}

impl TreeNode {
    pub fn leaf(symbol: char, weight: u64) -> Self {
        TreeNode::Leaf { symbol, weight }
    }

    /// Join two subtrees; `left` takes the `0` branch.
    pub fn merge(left: TreeNode, right: TreeNode) -> Self {
        TreeNode::Internal {
            weight: left.weight() + right.weight(),
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    pub fn weight(&self) -> u64 {
        match self {
            TreeNode::Leaf { weight, .. } | TreeNode::Internal { weight, .. } => *weight,
        }
    }

    pub fn is_leaf(&self) -> bool {
        matches!(self, TreeNode::Leaf { .. })
    }

    /// Length of the longest root-to-leaf path.
    pub fn depth(&self) -> usize {
        match self {
            TreeNode::Leaf { .. } => 0,
            TreeNode::Internal { left, right, .. } => 1 + left.depth().max(right.depth()),
        }
    }

    pub fn leaf_count(&self) -> usize {
        match self {
            TreeNode::Leaf { .. } => 1,
            TreeNode::Internal { left, right, .. } => left.leaf_count() + right.leaf_count(),
        }
    }
}

/// Build the Huffman tree for `table`, or `None` when it is empty.
///
/// Leaves are seeded in ascending symbol order. Each round pops the two
/// lightest nodes; the first popped becomes the left child.
pub fn build_tree(table: &FrequencyTable) -> Result<Option<TreeNode>> {
    if table.is_empty() {
        return Ok(None);
    }

    let mut queue = PriorityQueue::new();
    for (symbol, weight) in table.iter() {
        queue.push(TreeNode::leaf(symbol, weight));
    }

    while queue.len() > 1 {
        let left = queue.pop()?;
        let right = queue.pop()?;
        queue.push(TreeNode::merge(left, right));
    }

    let root = queue.pop()?;
    debug!(
        weight = root.weight(),
        depth = root.depth(),
        leaves = root.leaf_count(),
        "built huffman tree"
    );
    Ok(Some(root))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Child {
    Branch(usize),
    Leaf(char),
}

/// Result of following one bit in a [`DecodeTree`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Walk {
    /// Landed on an inner node; keep reading from this cursor.
    Inner(usize),
    /// Landed on a leaf; the walk restarts at the root.
    Emit(char),
}

/// Tree rebuilt from persisted codewords. Weights are not persisted, so the
/// decoder keeps only the branch structure: `0` goes left, `1` goes right.
#[derive(Debug, Clone)]
pub struct DecodeTree {
    branches: Vec<[Option<Child>; 2]>,
}

impl DecodeTree {
    /// Rebuild the tree from a code table, `None` for an empty table.
    ///
    /// The codewords must be prefix-free and describe a full binary tree.
    /// A single-symbol table must use the codeword `0`.
    pub fn from_code_table(table: &CodeTable) -> Result<Option<Self>> {
        if table.is_empty() {
            return Ok(None);
        }

        let mut tree = DecodeTree {
            branches: vec![[None, None]],
        };
        for (symbol, code) in table.iter() {
            tree.insert(symbol, code.bits())?;
        }

        if table.len() == 1 {
            let code = table.iter().next().map(|(_, code)| code.to_string());
            if code.as_deref() != Some("0") {
                return Err(SqueezError::MalformedHeader(
                    "a single-symbol table must use the codeword 0".into(),
                ));
            }
        } else if let Some(at) = tree
            .branches
            .iter()
            .position(|children| children.iter().any(Option::is_none))
        {
            return Err(SqueezError::MalformedHeader(format!(
                "codewords leave branch {} with a missing child",
                at
            )));
        }

        Ok(Some(tree))
    }

    fn insert(&mut self, symbol: char, bits: &[bool]) -> Result<()> {
        let conflict = || {
            SqueezError::MalformedHeader(format!(
                "codeword of {:?} collides with another codeword",
                symbol
            ))
        };

        let Some((&last, path)) = bits.split_last() else {
            return Err(SqueezError::MalformedHeader(format!(
                "empty codeword for {:?}",
                symbol
            )));
        };

        let mut at = 0;
        for &bit in path {
            let child = self.branches[at][bit as usize];
            at = match child {
                Some(Child::Branch(next)) => next,
                Some(Child::Leaf(_)) => return Err(conflict()),
                None => {
                    let next = self.branches.len();
                    self.branches.push([None, None]);
                    self.branches[at][bit as usize] = Some(Child::Branch(next));
                    next
                }
            };
        }

        let slot = &mut self.branches[at][last as usize];
        if slot.is_some() {
            return Err(conflict());
        }
        *slot = Some(Child::Leaf(symbol));
        Ok(())
    }

    /// Cursor of the root node.
    pub fn root(&self) -> usize {
        0
    }

    /// Follow `bit` from the inner node at `cursor`.
    pub fn step(&self, cursor: usize, bit: bool) -> Result<Walk> {
        let children = self.branches.get(cursor).ok_or_else(|| {
            SqueezError::CorruptPayload(format!("decode cursor {} out of range", cursor))
        })?;
        match children[bit as usize] {
            Some(Child::Branch(next)) => Ok(Walk::Inner(next)),
            Some(Child::Leaf(symbol)) => Ok(Walk::Emit(symbol)),
            None => Err(SqueezError::CorruptPayload(format!(
                "bit {} has no branch in the code tree",
                bit as u8
            ))),
        }
    }
}
