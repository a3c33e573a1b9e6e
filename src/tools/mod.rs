//! The tools module provides the helpers around the codec proper.
//!
//! The tools are:
//! - cli: Command line interface and run options.
//! - freq_count: Frequency counting plus the frequency file writer and parser.
//! - tree_dump: Debug report of the priority queue and the finished tree.
//!
pub mod cli;
pub mod freq_count;
pub mod tree_dump;
