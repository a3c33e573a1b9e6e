//! Codeword table derived from a Huffman tree.
//!
//! Descending left appends a 0, descending right appends a 1. A tree that is a single leaf
//! has no edges at all, so its symbol gets the one bit code `0` instead of an empty one.

use std::fmt::{self, Display, Formatter};

use log::trace;
use rustc_hash::FxHashMap;

use super::huffman::{HuffmanTree, Node, SymbolName};
use crate::error::{HuffError, Result};
use crate::tools::freq_count::FrequencyTable;

/// A codeword: the root-to-leaf path of a symbol.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Code {
    bits: Vec<bool>,
}

impl Code {
    pub fn from_bits(bits: &[bool]) -> Self {
        Code {
            bits: bits.to_vec(),
        }
    }

    pub fn len(&self) -> usize {
        self.bits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bits.is_empty()
    }

    pub fn bits(&self) -> impl Iterator<Item = bool> + '_ {
        self.bits.iter().copied()
    }

    /// True when `self` is a (non-strict) prefix of `other`.
    pub fn is_prefix_of(&self, other: &Code) -> bool {
        other.bits.starts_with(&self.bits)
    }
}

impl Display for Code {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        for &bit in &self.bits {
            f.write_str(if bit { "1" } else { "0" })?;
        }
        Ok(())
    }
}

/// Symbol to codeword mapping. Built once, never changed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodeTable {
    codes: FxHashMap<u8, Code>,
}

impl CodeTable {
    /// Derive the codes for every leaf of `tree`.
    pub fn build(tree: &HuffmanTree) -> Self {
        let mut codes = FxHashMap::default();
        match tree.root() {
            Node::Leaf { symbol, .. } => {
                codes.insert(*symbol, Code::from_bits(&[false]));
            }
            root => {
                let mut path = Vec::with_capacity(32);
                assign_codes(root, &mut path, &mut codes);
            }
        }
        CodeTable { codes }
    }

    pub fn get(&self, symbol: u8) -> Option<&Code> {
        self.codes.get(&symbol)
    }

    /// Like get(), but a missing symbol is an error.
    pub fn code(&self, symbol: u8) -> Result<&Code> {
        self.codes.get(&symbol).ok_or(HuffError::UnknownSymbol(symbol))
    }

    pub fn len(&self) -> usize {
        self.codes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.codes.is_empty()
    }

    /// (symbol, code) pairs in ascending symbol order.
    pub fn iter(&self) -> impl Iterator<Item = (u8, &Code)> + '_ {
        (0..=u8::MAX).filter_map(move |symbol| self.codes.get(&symbol).map(|code| (symbol, code)))
    }

    /// Payload size in bits of encoding data with these frequencies.
    pub fn encoded_bits(&self, table: &FrequencyTable) -> Result<u64> {
        table
            .iter()
            .map(|(symbol, count)| self.code(symbol).map(|code| code.len() as u64 * count))
            .sum()
    }
}

/// Depth first walk, recording the path taken to every leaf.
fn assign_codes(node: &Node, path: &mut Vec<bool>, codes: &mut FxHashMap<u8, Code>) {
    match node {
        Node::Leaf { symbol, .. } => {
            trace!("Code for {} is {}", SymbolName(*symbol), Code::from_bits(path));
            codes.insert(*symbol, Code::from_bits(path));
        }
        Node::Internal { left, right, .. } => {
            path.push(false);
            assign_codes(left, path, codes);
            path.pop();
            path.push(true);
            assign_codes(right, path, codes);
            path.pop();
        }
    }
}

#[cfg(test)]
mod test {
    use super::{Code, CodeTable};
    use crate::error::HuffError;
    use crate::huffman_coding::huffman::HuffmanTree;
    use crate::tools::freq_count::FrequencyTable;

    fn table_for(data: &[u8]) -> (FrequencyTable, CodeTable) {
        let freqs = FrequencyTable::from_bytes(data);
        let tree = HuffmanTree::build(&freqs).unwrap();
        (freqs, CodeTable::build(&tree))
    }

    fn prefix_free(codes: &CodeTable) -> bool {
        let all: Vec<_> = codes.iter().collect();
        all.iter().all(|(a, ca)| {
            all.iter()
                .all(|(b, cb)| a == b || (!ca.is_prefix_of(cb) && !cb.is_prefix_of(ca)))
        })
    }

    #[test]
    fn aaabbc_codes() {
        let (_, codes) = table_for(b"aaabbc");
        assert_eq!(codes.len(), 3);
        assert_eq!(codes.get(b'a').unwrap().to_string(), "0");
        assert_eq!(codes.get(b'c').unwrap().to_string(), "10");
        assert_eq!(codes.get(b'b').unwrap().to_string(), "11");
        assert!(codes.get(b'a').unwrap().len() <= codes.get(b'c').unwrap().len());
    }

    #[test]
    fn lone_symbol_gets_a_one_bit_code() {
        let (_, codes) = table_for(&[b'z'; 17]);
        assert_eq!(codes.len(), 1);
        assert_eq!(codes.get(b'z'), Some(&Code::from_bits(&[false])));
    }

    #[test]
    fn codes_are_non_empty_and_prefix_free() {
        let data: Vec<u8> = (0..=255u8)
            .flat_map(|b| vec![b; (b as usize * 37) % 101 + 1])
            .collect();
        let (_, codes) = table_for(&data);
        assert_eq!(codes.len(), 256);
        assert!(codes.iter().all(|(_, code)| !code.is_empty()));
        assert!(prefix_free(&codes));
    }

    #[test]
    fn missing_symbol_is_unknown() {
        let (_, codes) = table_for(b"abc");
        assert!(codes.code(b'a').is_ok());
        assert!(matches!(codes.code(b'x'), Err(HuffError::UnknownSymbol(b'x'))));
    }

    #[test]
    fn encoded_bits_for_skewed_data() {
        let mut data = vec![b'e'; 900];
        data.extend_from_slice(&[b't'; 60]);
        data.extend_from_slice(&[b'q'; 40]);
        let (freqs, codes) = table_for(&data);
        // 'e' gets one bit, the other two get two bits each
        assert_eq!(codes.encoded_bits(&freqs).unwrap(), 900 + 2 * 100);
        assert!(codes.encoded_bits(&freqs).unwrap() < 8 * data.len() as u64);
    }

    #[test]
    fn prefix_check() {
        let short = Code::from_bits(&[true, false]);
        let long = Code::from_bits(&[true, false, true]);
        assert!(short.is_prefix_of(&long));
        assert!(!long.is_prefix_of(&short));
        assert_eq!(long.to_string(), "101");
    }
}
