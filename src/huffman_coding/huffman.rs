use std::fmt::{self, Display, Formatter};
use std::io::{self, Write};

use log::{debug, trace};

use super::min_heap::{PriorityQueue, Weighted};
use crate::error::{HuffError, Result};
use crate::tools::freq_count::FrequencyTable;

/// A node of a Huffman tree. Each internal node owns both of its children.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    Leaf {
        symbol: u8,
        weight: u64,
    },
    Internal {
        weight: u64,
        left: Box<Node>,
        right: Box<Node>,
    },
}

impl Node {
    /// Create a new leaf
    pub fn leaf(symbol: u8, weight: u64) -> Node {
        Node::Leaf { symbol, weight }
    }

    /// Join two subtrees. `left` is the one extracted from the queue first.
    ///
    /// The weights must not add up past u64::MAX. HuffmanTree::build checks the table total
    /// up front, and no internal weight can exceed it.
    pub fn merge(left: Node, right: Node) -> Node {
        Node::Internal {
            weight: left.weight() + right.weight(),
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    pub fn weight(&self) -> u64 {
        match self {
            Node::Leaf { weight, .. } | Node::Internal { weight, .. } => *weight,
        }
    }

    pub fn is_leaf(&self) -> bool {
        matches!(self, Node::Leaf { .. })
    }

    /// Number of leaves below (and including) this node.
    pub fn leaf_count(&self) -> usize {
        match self {
            Node::Leaf { .. } => 1,
            Node::Internal { left, right, .. } => left.leaf_count() + right.leaf_count(),
        }
    }

    /// Length of the longest root-to-leaf path.
    pub fn depth(&self) -> usize {
        match self {
            Node::Leaf { .. } => 0,
            Node::Internal { left, right, .. } => 1 + left.depth().max(right.depth()),
        }
    }
}

impl Weighted for Node {
    fn weight(&self) -> u64 {
        Node::weight(self)
    }
}

impl Display for Node {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Node::Leaf { symbol, .. } => write!(f, "{}", SymbolName(*symbol)),
            Node::Internal { .. } => write!(f, "*"),
        }
    }
}

/// Prints a symbol as a quoted character when it is printable ASCII, as hex otherwise.
pub struct SymbolName(pub u8);

impl Display for SymbolName {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        if self.0.is_ascii_graphic() || self.0 == b' ' {
            write!(f, "'{}'", self.0 as char)
        } else {
            write!(f, "{:#04x}", self.0)
        }
    }
}

/// A Huffman tree built from a frequency table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HuffmanTree {
    root: Node,
}

impl HuffmanTree {
    /// Fill a priority queue with one leaf per symbol, in ascending symbol order.
    pub fn seed_queue(table: &FrequencyTable) -> PriorityQueue<Node> {
        let mut queue = PriorityQueue::with_capacity(table.len());
        for (symbol, count) in table.iter() {
            queue.insert(Node::leaf(symbol, count));
        }
        queue
    }

    /// Build the tree: keep joining the two lightest nodes until one is left.
    pub fn build(table: &FrequencyTable) -> Result<Self> {
        if table.is_empty() {
            return Err(HuffError::EmptyInput);
        }
        if table.checked_total().is_none() {
            return Err(HuffError::WeightOverflow);
        }
        let mut queue = Self::seed_queue(table);
        while queue.size() > 1 {
            let x = queue.extract_min()?;
            let y = queue.extract_min()?;
            trace!("Joining {} ({}) with {} ({})", x, x.weight(), y, y.weight());
            queue.insert(Node::merge(x, y));
        }
        let root = queue.extract_min()?;
        debug!(
            "Built tree over {} symbols, total weight {}, depth {}",
            root.leaf_count(),
            root.weight(),
            root.depth()
        );
        Ok(HuffmanTree { root })
    }

    pub fn root(&self) -> &Node {
        &self.root
    }

    /// Number of symbols the tree was built from. Equal to the root weight.
    pub fn total(&self) -> u64 {
        self.root.weight()
    }

    pub fn alphabet_size(&self) -> usize {
        self.root.leaf_count()
    }

    /// Recover the frequency table from the leaves.
    pub fn frequencies(&self) -> FrequencyTable {
        let mut leaves = vec![];
        collect_leaves(&self.root, &mut leaves);
        leaves.into_iter().collect()
    }

    /// In-order listing of the leaves, one `symbol: weight` per line.
    pub fn write_leaves<W: Write>(&self, out: &mut W) -> io::Result<()> {
        let mut leaves = vec![];
        collect_leaves(&self.root, &mut leaves);
        for (symbol, weight) in leaves {
            writeln!(out, "{}: {}", SymbolName(symbol), weight)?;
        }
        Ok(())
    }

    /// Indented view of the whole tree. Children are labelled L (bit 0) and R (bit 1).
    pub fn write_structure<W: Write>(&self, out: &mut W) -> io::Result<()> {
        write_node(out, &self.root, 0, "root")
    }
}

/// Walk the tree left to right and push every leaf.
fn collect_leaves(node: &Node, leaves: &mut Vec<(u8, u64)>) {
    match node {
        Node::Internal { left, right, .. } => {
            collect_leaves(left, leaves);
            collect_leaves(right, leaves);
        }
        Node::Leaf { symbol, weight } => leaves.push((*symbol, *weight)),
    }
}

fn write_node<W: Write>(out: &mut W, node: &Node, depth: usize, label: &str) -> io::Result<()> {
    let indent = "  ".repeat(depth);
    match node {
        Node::Leaf { symbol, weight } => {
            writeln!(out, "{}{}-> Leaf {} [weight: {}]", indent, label, SymbolName(*symbol), weight)
        }
        Node::Internal {
            weight,
            left,
            right,
        } => {
            writeln!(out, "{}{}-> Internal [weight: {}]", indent, label, weight)?;
            write_node(out, left, depth + 1, "L")?;
            write_node(out, right, depth + 1, "R")
        }
    }
}
