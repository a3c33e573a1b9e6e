//! Huffman coding file compressor.
//!
//! Version 0.1.0
//!
//! Compresses a file with a Huffman code built from the file's own byte frequencies. The
//! frequencies are saved next to the compressed data as a small text file, one
//! `binary-symbol:count` pair per line, and decompression rebuilds the very same tree from
//! that file.
//!
//! Basic usage to compress a file is as follows:
//!
//! `$> huffman test.txt`
//!
//! This will create test.txt.huf and test.txt.freq. `huffman -d test.txt.huf` restores
//! test.txt.
//!
//! The same pipeline is available in memory:
//!
//! ```
//! use huffman::compression::compress::compress_bytes;
//! use huffman::compression::decompress::decompress_bytes;
//!
//! let (table, packed) = compress_bytes(b"abracadabra")?;
//! assert!(packed.len() < 11);
//! assert_eq!(decompress_bytes(&packed, &table)?, b"abracadabra");
//! # Ok::<(), huffman::error::HuffError>(())
//! ```
//!
pub mod bitstream;
pub mod compression;
pub mod error;
pub mod huffman_coding;
pub mod tools;

pub use error::HuffError;
pub use huffman_coding::code_table::{Code, CodeTable};
pub use huffman_coding::huffman::{HuffmanTree, Node};
pub use tools::freq_count::FrequencyTable;
