//! Array-backed binary min-heap used to pick the two lightest nodes while building a
//! Huffman tree.
//!
//! Entries are ordered by weight, then by the order in which they were inserted. The
//! second key makes the tree shape (and therefore every codeword) a pure function of the
//! insertion order, so the encoder and the decoder build identical trees from the same
//! frequency table.

use std::fmt::Display;
use std::io::{self, Write};

use crate::error::{HuffError, Result};

/// Anything the queue can order.
pub trait Weighted {
    fn weight(&self) -> u64;
}

#[derive(Debug, Clone)]
struct Entry<T> {
    weight: u64,
    seq: u64,
    item: T,
}

impl<T> Entry<T> {
    #[inline(always)]
    fn less(&self, other: &Self) -> bool {
        (self.weight, self.seq) < (other.weight, other.seq)
    }
}

#[derive(Debug, Clone)]
pub struct PriorityQueue<T> {
    heap: Vec<Entry<T>>,
    next_seq: u64,
}

impl<T> PriorityQueue<T> {
    pub fn new() -> Self {
        Self::with_capacity(0)
    }

    pub fn with_capacity(n: usize) -> Self {
        PriorityQueue {
            heap: Vec::with_capacity(n),
            next_seq: 0,
        }
    }

    pub fn size(&self) -> usize {
        self.heap.len()
    }

    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }

    /// The lightest item, without removing it.
    pub fn peek(&self) -> Option<&T> {
        self.heap.first().map(|e| &e.item)
    }

    /// Items in heap (array) order.
    pub fn iter(&self) -> impl Iterator<Item = &T> + '_ {
        self.heap.iter().map(|e| &e.item)
    }

    fn sift_up(&mut self, mut i: usize) {
        while i > 0 {
            let parent = (i - 1) / 2;
            if !self.heap[i].less(&self.heap[parent]) {
                break;
            }
            self.heap.swap(i, parent);
            i = parent;
        }
    }

    fn sift_down(&mut self, mut i: usize) {
        let n = self.heap.len();
        loop {
            let left = 2 * i + 1;
            if left >= n {
                break;
            }
            let right = left + 1;
            let smallest = if right < n && self.heap[right].less(&self.heap[left]) {
                right
            } else {
                left
            };
            if !self.heap[smallest].less(&self.heap[i]) {
                break;
            }
            self.heap.swap(i, smallest);
            i = smallest;
        }
    }

    #[cfg(test)]
    fn valid_min_heap(&self) -> bool {
        (1..self.heap.len()).all(|i| !self.heap[i].less(&self.heap[(i - 1) / 2]))
    }
}

impl<T: Weighted> PriorityQueue<T> {
    /// Add an item in O(log n).
    pub fn insert(&mut self, item: T) {
        let entry = Entry {
            weight: item.weight(),
            seq: self.next_seq,
            item,
        };
        self.next_seq += 1;
        self.heap.push(entry);
        self.sift_up(self.heap.len() - 1);
    }

    /// Remove and return the lightest item in O(log n). Among equal weights the item
    /// inserted first comes out first.
    pub fn extract_min(&mut self) -> Result<T> {
        if self.heap.is_empty() {
            return Err(HuffError::EmptyQueue);
        }
        let last = self.heap.len() - 1;
        self.heap.swap(0, last);
        let min = self.heap.pop().ok_or(HuffError::EmptyQueue)?;
        if !self.heap.is_empty() {
            self.sift_down(0);
        }
        Ok(min.item)
    }
}

impl<T: Weighted + Display> PriorityQueue<T> {
    /// Write the heap level by level, one line per level, each entry as `weight: item`.
    pub fn dump<W: Write>(&self, out: &mut W) -> io::Result<()> {
        let n = self.heap.len();
        if n == 0 {
            return Ok(());
        }
        let height = usize::BITS - n.leading_zeros();
        let mut start = 0;
        let mut level = 1;
        while start < n {
            let end = (2 * start + 1).min(n);
            let indent = " ".repeat((height - level + 1) as usize * 2);
            for entry in &self.heap[start..end] {
                write!(out, "{}{}: {}", indent, entry.weight, entry.item)?;
            }
            writeln!(out)?;
            start = end;
            level += 1;
        }
        Ok(())
    }
}

impl<T> Default for PriorityQueue<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod test {
    use super::{PriorityQueue, Weighted};
    use crate::error::HuffError;

    #[derive(Debug, PartialEq)]
    struct Item(u64, char);

    impl Weighted for Item {
        fn weight(&self) -> u64 {
            self.0
        }
    }

    impl std::fmt::Display for Item {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            write!(f, "{}", self.1)
        }
    }

    #[test]
    fn extracts_in_weight_order() {
        let mut pq = PriorityQueue::new();
        for (w, c) in [(5, 'a'), (1, 'b'), (9, 'c'), (3, 'd'), (7, 'e'), (2, 'f')] {
            pq.insert(Item(w, c));
            assert!(pq.valid_min_heap());
        }
        assert_eq!(pq.size(), 6);
        assert_eq!(pq.peek(), Some(&Item(1, 'b')));
        let mut weights = vec![];
        while !pq.is_empty() {
            weights.push(pq.extract_min().unwrap().0);
            assert!(pq.valid_min_heap());
        }
        assert_eq!(weights, vec![1, 2, 3, 5, 7, 9]);
    }

    #[test]
    fn ties_come_out_in_insertion_order() {
        let mut pq = PriorityQueue::new();
        for c in ['q', 'w', 'e', 'r', 't', 'y', 'u'] {
            pq.insert(Item(4, c));
        }
        pq.insert(Item(1, 'z'));
        let order: String = (0..8).map(|_| pq.extract_min().unwrap().1).collect();
        assert_eq!(order, "zqwertyu");
    }

    #[test]
    fn empty_queue_fails() {
        let mut pq: PriorityQueue<Item> = PriorityQueue::default();
        assert!(matches!(pq.extract_min(), Err(HuffError::EmptyQueue)));
        pq.insert(Item(1, 'a'));
        assert!(pq.extract_min().is_ok());
        assert!(matches!(pq.extract_min(), Err(HuffError::EmptyQueue)));
    }

    #[test]
    fn interleaved_insert_and_extract() {
        let mut pq = PriorityQueue::with_capacity(4);
        pq.insert(Item(10, 'a'));
        pq.insert(Item(4, 'b'));
        assert_eq!(pq.extract_min().unwrap(), Item(4, 'b'));
        pq.insert(Item(6, 'c'));
        pq.insert(Item(10, 'd'));
        assert_eq!(pq.extract_min().unwrap(), Item(6, 'c'));
        assert_eq!(pq.extract_min().unwrap(), Item(10, 'a'));
        assert_eq!(pq.extract_min().unwrap(), Item(10, 'd'));
        assert!(pq.is_empty());
    }

    #[test]
    fn dump_lists_each_level() {
        let mut pq = PriorityQueue::new();
        for (w, c) in [(1, 'a'), (2, 'b'), (3, 'c'), (4, 'd')] {
            pq.insert(Item(w, c));
        }
        let mut out = Vec::new();
        pq.dump(&mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0].trim(), "1: a");
        assert_eq!(lines[1].split_whitespace().collect::<Vec<_>>(), ["2:", "b", "3:", "c"]);
        assert_eq!(lines[2].trim(), "4: d");
        assert_eq!(pq.iter().count(), 4);
    }
}
