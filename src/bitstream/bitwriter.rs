//! BitWriter: the output half of the bit codec.
//!
//! Bits are queued most significant bit first and moved into a byte buffer as soon as
//! whole bytes are available. The buffer is written through to the sink whenever it grows
//! past BUFFER_SIZE, so the writer never holds more than one buffer of compressed data.
//!
//! The stream has no header and no length. `finish()` pads the last partial byte with zero
//! bits in the least significant positions; the decoder knows the symbol count from the
//! frequency file and never looks at the padding.

use std::io::{self, Write};

use crate::huffman_coding::code_table::Code;

const BUFFER_SIZE: usize = 64 * 1024;

/// Writes a packed bitstream to any sink that supports write().
pub struct BitWriter<W: Write> {
    /// Bytes waiting to be written to the sink.
    output: Vec<u8>,
    /// Private queue to hold bits that are waiting to be put as bytes into the output buffer.
    queue: u64,
    /// Count of valid bits in the queue.
    q_bits: u8,
    /// Total data bits written so far (padding excluded).
    bits: u64,
    /// Handle to the output stream
    writer: W,
}

impl<W: Write> BitWriter<W> {
    /// Create a new BitWriter on top of `writer`. Call finish() to pad and flush.
    pub fn new(writer: W) -> Self {
        Self {
            output: Vec::with_capacity(BUFFER_SIZE),
            queue: 0,
            q_bits: 0,
            bits: 0,
            writer,
        }
    }

    /// Move all full bytes from the queue into the output buffer, and the buffer to the sink
    /// once it is big enough.
    fn push_queue(&mut self) -> io::Result<()> {
        while self.q_bits > 7 {
            let byte = (self.queue >> (self.q_bits - 8)) as u8;
            self.output.push(byte);
            self.q_bits -= 8;
        }
        if self.output.len() >= BUFFER_SIZE {
            self.writer.write_all(&self.output)?;
            self.output.clear();
        }
        Ok(())
    }

    /// Put a single bit on the stream.
    pub fn write_bit(&mut self, bit: bool) -> io::Result<()> {
        self.queue = (self.queue << 1) | bit as u64;
        self.q_bits += 1;
        self.bits += 1;
        // Leave headroom so the queue never overflows its 64 bits
        if self.q_bits > 56 {
            self.push_queue()?;
        }
        Ok(())
    }

    /// Put every bit of a codeword on the stream, in order.
    pub fn write_code(&mut self, code: &Code) -> io::Result<()> {
        for bit in code.bits() {
            self.write_bit(bit)?;
        }
        Ok(())
    }

    /// Number of data bits written so far.
    pub fn bits_written(&self) -> u64 {
        self.bits
    }

    /// Pads the remaining bits (1-7) to a full byte with 0s in the least significant bits,
    /// writes everything to the sink and hands the sink back along with the number of
    /// padding bits used.
    pub fn finish(mut self) -> io::Result<(W, u8)> {
        self.push_queue()?;
        let mut padding = 0;
        if self.q_bits > 0 {
            padding = 8 - self.q_bits;
            let byte = ((self.queue << padding) & 0xff) as u8;
            self.output.push(byte);
            self.q_bits = 0;
        }
        self.writer.write_all(&self.output)?;
        self.output.clear();
        self.writer.flush()?;
        Ok((self.writer, padding))
    }

    /// Debugging function to return the number of bytes.bits output so far
    pub fn loc(&self) -> String {
        format!("[{}.{}]", self.bits / 8, self.bits % 8)
    }
}

#[cfg(test)]
mod test {
    use super::BitWriter;
    use crate::huffman_coding::code_table::Code;

    #[test]
    fn partial_byte_is_zero_padded() {
        let mut bw = BitWriter::new(Vec::new());
        bw.write_bit(true).unwrap();
        bw.write_bit(false).unwrap();
        bw.write_bit(true).unwrap();
        let (out, padding) = bw.finish().unwrap();
        assert_eq!(out, vec![0b1010_0000]);
        assert_eq!(padding, 5);
    }

    #[test]
    fn whole_bytes_need_no_padding() {
        let mut bw = BitWriter::new(Vec::new());
        for &bit in &[false, true, true, true, true, false, false, false] {
            bw.write_bit(bit).unwrap();
        }
        assert_eq!(bw.loc(), "[1.0]");
        let (out, padding) = bw.finish().unwrap();
        assert_eq!(out, "x".as_bytes());
        assert_eq!(padding, 0);
    }

    #[test]
    fn codes_are_written_msb_first() {
        let mut bw = BitWriter::new(Vec::new());
        let code = Code::from_bits(&[true, true, false]);
        for _ in 0..4 {
            bw.write_code(&code).unwrap();
        }
        assert_eq!(bw.bits_written(), 12);
        assert_eq!(bw.loc(), "[1.4]");
        let (out, padding) = bw.finish().unwrap();
        assert_eq!(out, vec![0b1101_1011, 0b0110_0000]);
        assert_eq!(padding, 4);
    }

    #[test]
    fn long_streams_spill_through_the_buffer() {
        let mut bw = BitWriter::new(Vec::new());
        // 200k bytes of 0b1000_0001
        for _ in 0..200_000 {
            bw.write_bit(true).unwrap();
            for _ in 0..6 {
                bw.write_bit(false).unwrap();
            }
            bw.write_bit(true).unwrap();
        }
        let (out, padding) = bw.finish().unwrap();
        assert_eq!(padding, 0);
        assert_eq!(out.len(), 200_000);
        assert!(out.iter().all(|&b| b == 0b1000_0001));
    }

    #[test]
    fn empty_stream_writes_nothing() {
        let bw = BitWriter::new(Vec::new());
        let (out, padding) = bw.finish().unwrap();
        assert!(out.is_empty());
        assert_eq!(padding, 0);
    }
}
