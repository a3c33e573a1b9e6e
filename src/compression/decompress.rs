use std::fs::File;
use std::io::{self, BufReader, BufWriter, Read, Write};
use std::path::Path;

use log::{debug, info, warn};

use super::remove_partial;
use crate::bitstream::bitreader::BitReader;
use crate::error::{HuffError, Result};
use crate::huffman_coding::huffman::{HuffmanTree, Node};
use crate::tools::freq_count::FrequencyTable;

const BUFFER_SIZE: usize = 64 * 1024;

/// What a decode run produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodeSummary {
    /// Symbols emitted. Always equal to the tree's total weight.
    pub symbols: u64,
    /// Bits consumed to produce them.
    pub bits: u64,
    /// Unused bits left in the last byte read.
    pub padding: u8,
}

/// Walk `tree` from the root for every bit read, emitting a symbol at each leaf, until the
/// tree's total weight worth of symbols has been written. Anything after that is padding.
pub fn decode_into<R: Read, W: Write>(
    br: &mut BitReader<R>,
    tree: &HuffmanTree,
    out: &mut W,
) -> Result<DecodeSummary> {
    let expected = tree.total();
    let root = tree.root();
    let mut node = root;
    let mut decoded = 0_u64;
    let mut buf = Vec::with_capacity(BUFFER_SIZE);

    while decoded < expected {
        let bit = match br.bit()? {
            Some(bit) => bit,
            None => return Err(HuffError::TruncatedStream { decoded, expected }),
        };
        node = match node {
            Node::Internal { left, right, .. } => {
                if bit {
                    &**right
                } else {
                    &**left
                }
            }
            // Only a lone leaf root gets here. Its code is a single 0.
            Node::Leaf { .. } => {
                if bit {
                    return Err(HuffError::InvalidCode);
                }
                node
            }
        };
        if let Node::Leaf { symbol, .. } = node {
            buf.push(*symbol);
            decoded += 1;
            node = root;
            if buf.len() >= BUFFER_SIZE {
                out.write_all(&buf)?;
                buf.clear();
            }
        }
    }
    out.write_all(&buf)?;

    let summary = DecodeSummary {
        symbols: decoded,
        bits: br.bits_read(),
        padding: br.bits_left_in_byte(),
    };
    // Skip the padding, then make sure nothing else follows
    for _ in 0..summary.padding {
        br.bit()?;
    }
    if br.bit()?.is_some() {
        warn!(
            "Ignoring trailing data after {} symbols at {}",
            decoded,
            br.loc()
        );
    }
    Ok(summary)
}

/// Decode a complete bitstream held in memory.
pub fn decode(data: &[u8], tree: &HuffmanTree) -> Result<Vec<u8>> {
    let mut out = Vec::with_capacity(tree.total().min(1 << 20) as usize);
    let mut br = BitReader::new(data);
    decode_into(&mut br, tree, &mut out)?;
    Ok(out)
}

/// Inverse of compress_bytes().
pub fn decompress_bytes(data: &[u8], table: &FrequencyTable) -> Result<Vec<u8>> {
    let tree = HuffmanTree::build(table)?;
    decode(data, &tree)
}

/// Rebuild the tree from the frequency file and open the compressed input.
fn open_stream(input: &Path, freq: &Path) -> Result<(HuffmanTree, BitReader<BufReader<File>>)> {
    let table = FrequencyTable::load(freq)?;
    let tree = HuffmanTree::build(&table)?;
    let file = File::open(input).map_err(|e| HuffError::io(input, e))?;
    Ok((tree, BitReader::new(BufReader::new(file))))
}

/// Decompress `input` into `output` using the table saved in `freq`. On failure `output` is
/// removed again.
pub fn decode_file(input: &Path, output: &Path, freq: &Path) -> Result<DecodeSummary> {
    let (tree, mut br) = open_stream(input, freq)?;
    let file = File::create(output).map_err(|e| HuffError::io(output, e))?;
    let mut out = BufWriter::new(file);
    let result = decode_into(&mut br, &tree, &mut out).and_then(|summary| {
        out.flush()?;
        Ok(summary)
    });
    drop(out);
    let summary = result.map_err(|e| {
        remove_partial(output);
        e
    })?;
    debug!("Read {} bits, {} padding", summary.bits, summary.padding);
    info!("Wrote {} bytes to {}", summary.symbols, output.display());
    Ok(summary)
}

/// Decode `input` and throw the result away. Succeeds when the stream holds exactly the
/// symbols its frequency file promises.
pub fn test_file(input: &Path, freq: &Path) -> Result<DecodeSummary> {
    let (tree, mut br) = open_stream(input, freq)?;
    let summary = decode_into(&mut br, &tree, &mut io::sink())?;
    info!("{}: ok, {} symbols", input.display(), summary.symbols);
    Ok(summary)
}
