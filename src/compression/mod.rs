//! The compression module drives the two halves of the codec.
//!
//! Compression:
//! - Count every byte of the input and save the counts as the frequency file.
//! - Build the Huffman tree from the counts and read the code table off it.
//! - Write the code of every input byte to the bitstream, then pad to a whole byte.
//!
//! Decompression:
//! - Rebuild the identical tree from the frequency file.
//! - Walk the tree one bit at a time, emitting a byte at every leaf, until the number of
//!   symbols in the frequency file has been produced. The remaining bits are padding.
//!
//! A run that fails after creating a file removes that file again, so nothing half written is
//! left behind.
//!

pub mod compress;
pub mod decompress;

use std::path::Path;

use log::warn;

/// Remove a file this run created but could not finish.
pub(crate) fn remove_partial(path: &Path) {
    if let Err(e) = std::fs::remove_file(path) {
        warn!("Could not remove partial file {}: {}", path.display(), e);
    }
}
