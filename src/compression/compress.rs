use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::Path;

use log::{debug, info};

use super::remove_partial;
use crate::bitstream::bitwriter::BitWriter;
use crate::error::{HuffError, Result};
use crate::huffman_coding::code_table::CodeTable;
use crate::huffman_coding::huffman::HuffmanTree;
use crate::tools::freq_count::FrequencyTable;

/// What an encode run produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodeSummary {
    /// Symbols read from the input.
    pub symbols: u64,
    /// Distinct symbols in the input.
    pub alphabet: usize,
    /// Payload bits, padding excluded.
    pub bits: u64,
    /// Padding bits added to the last byte.
    pub padding: u8,
    /// The table saved to the frequency file.
    pub table: FrequencyTable,
}

impl EncodeSummary {
    /// Size of the compressed stream in bytes.
    pub fn bytes(&self) -> u64 {
        (self.bits + self.padding as u64) / 8
    }
}

/// Push the code of every input byte through `bw`, in input order.
pub fn encode_into<W: Write>(input: &[u8], codes: &CodeTable, bw: &mut BitWriter<W>) -> Result<()> {
    for &byte in input {
        bw.write_code(codes.code(byte)?)?;
    }
    Ok(())
}

/// Encode `input` with `codes` into a zero padded, byte aligned bitstream.
pub fn encode(input: &[u8], codes: &CodeTable) -> Result<Vec<u8>> {
    let mut bw = BitWriter::new(Vec::with_capacity(input.len() / 2));
    encode_into(input, codes, &mut bw)?;
    let (output, _) = bw.finish()?;
    Ok(output)
}

/// Count, build and encode in one go. Returns the frequency table a decoder needs along
/// with the compressed stream.
pub fn compress_bytes(input: &[u8]) -> Result<(FrequencyTable, Vec<u8>)> {
    let table = FrequencyTable::from_bytes(input);
    let tree = HuffmanTree::build(&table)?;
    let codes = CodeTable::build(&tree);
    let output = encode(input, &codes)?;
    Ok((table, output))
}

/// Compress the file at `input` into `output`, saving the frequency table to `freq`.
/// Nothing is written when the input is empty, and nothing is left behind on failure.
pub fn encode_file(input: &Path, output: &Path, freq: &Path) -> Result<EncodeSummary> {
    let data = fs::read(input).map_err(|e| HuffError::io(input, e))?;
    info!("Read {} bytes from {}", data.len(), input.display());

    let table = FrequencyTable::from_bytes(&data);
    let tree = HuffmanTree::build(&table)?;
    let codes = CodeTable::build(&tree);
    debug!(
        "{} distinct symbols, longest code {} bits",
        codes.len(),
        codes.iter().map(|(_, code)| code.len()).max().unwrap_or(0)
    );

    // The frequency file goes last, so a stray one always has its compressed file next to it
    let file = File::create(output).map_err(|e| HuffError::io(output, e))?;
    let written = write_encoded(&data, &codes, file).and_then(|written| {
        table.save(freq)?;
        info!("Wrote frequency table to {}", freq.display());
        Ok(written)
    });
    let (bits, padding) = written.map_err(|e| {
        remove_partial(output);
        e
    })?;

    let summary = EncodeSummary {
        symbols: table.total(),
        alphabet: table.len(),
        bits,
        padding,
        table,
    };
    info!(
        "Wrote {} bytes to {} ({} bits + {} padding)",
        summary.bytes(),
        output.display(),
        bits,
        padding
    );
    Ok(summary)
}

/// Encode `data` into `file`. Returns the payload bits and the padding bits.
fn write_encoded(data: &[u8], codes: &CodeTable, file: File) -> Result<(u64, u8)> {
    let mut bw = BitWriter::new(BufWriter::new(file));
    encode_into(data, codes, &mut bw)?;
    let bits = bw.bits_written();
    debug!("Payload ends at {}", bw.loc());
    let (_, padding) = bw.finish()?;
    Ok((bits, padding))
}
