//! The huffman_coding module turns a frequency table into codewords.
//!
//! - min_heap: the priority queue that always hands back the two lightest nodes.
//! - huffman: tree nodes and tree construction, plus text dumps of the tree.
//! - code_table: the symbol to codeword mapping read off the tree.
//!
//! Construction is deterministic: the same table always yields the same tree, which is what
//! lets the decoder rebuild the encoder's tree from nothing but the frequency file.
//!

pub mod code_table;
pub mod huffman;
pub mod min_heap;
