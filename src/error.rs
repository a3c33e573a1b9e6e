//! Error type shared by every stage of the compressor.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum HuffError {
    /// There were no symbols to build a tree from.
    #[error("no symbols to build a Huffman tree from")]
    EmptyInput,

    /// Extract was called on an empty priority queue. Never happens while building a tree.
    #[error("attempted to extract from an empty priority queue")]
    EmptyQueue,

    /// Decode was asked to use a frequency file that could not be read.
    #[error("frequency file {} could not be read: {source}", .path.display())]
    MissingFrequencyFile { path: PathBuf, source: io::Error },

    /// A frequency file line is not `binary:count`.
    #[error("frequency file line {line} is not a valid `binary:count` pair: {text:?}")]
    MalformedFrequencyLine { line: usize, text: String },

    /// The symbol counts add up to more than a u64 can hold.
    #[error("symbol counts add up to more than {}", u64::MAX)]
    WeightOverflow,

    /// Encode found a byte missing from its own code table.
    #[error("byte {0:#04x} has no code in the frequency table")]
    UnknownSymbol(u8),

    /// The bitstream ran out before the total symbol count was reached.
    #[error("compressed stream ended after {decoded} of {expected} symbols")]
    TruncatedStream { decoded: u64, expected: u64 },

    /// A single symbol stream may only contain 0 bits.
    #[error("invalid code bit in a single symbol stream")]
    InvalidCode,

    /// A file could not be opened or created.
    #[error("{}: {source}", .path.display())]
    Io { path: PathBuf, source: io::Error },

    /// Read or write failure in the middle of a stream.
    #[error(transparent)]
    Stream(#[from] io::Error),
}

impl HuffError {
    /// Attach a path to an I/O failure.
    pub fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        HuffError::Io {
            path: path.into(),
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, HuffError>;

#[cfg(test)]
mod test {
    use super::HuffError;
    use std::error::Error;
    use std::io;

    #[test]
    fn messages_name_the_problem() {
        let err = HuffError::MalformedFrequencyLine {
            line: 4,
            text: "oops".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "frequency file line 4 is not a valid `binary:count` pair: \"oops\""
        );
        assert_eq!(
            HuffError::UnknownSymbol(b'\n').to_string(),
            "byte 0x0a has no code in the frequency table"
        );
    }

    #[test]
    fn io_errors_keep_path_and_source() {
        let err = HuffError::io("in.txt", io::Error::new(io::ErrorKind::NotFound, "gone"));
        assert_eq!(err.to_string(), "in.txt: gone");
        assert!(err.source().is_some());
        let err: HuffError = io::Error::new(io::ErrorKind::Other, "pipe").into();
        assert_eq!(err.to_string(), "pipe");
    }
}
