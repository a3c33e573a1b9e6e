//! BitReader: the input half of the bit codec.
//!
//! Reads a packed bitstream one bit at a time, most significant bit of each byte first.
//!
//! NOTE: This module can read from any I/O source that supports the read() call.
//!

use std::io::{self, ErrorKind, Read};

const BUFFER_SIZE: usize = 1024 * 1024;

/// Reads a packed bitstream.
#[derive(Debug)]
pub struct BitReader<R> {
    buffer: Vec<u8>,
    cursor: usize,
    bit_index: usize,
    bits: u64,
    source: R,
}

impl<R: Read> BitReader<R> {
    /// Creates a new BitReader (with a 1Mbyte buffer).
    pub fn new(source: R) -> Self {
        Self {
            buffer: Vec::new(),
            cursor: 0,
            bit_index: 0,
            bits: 0,
            source,
        }
    }

    /// Check (and refill) buffer. Returns true if we have data, false if there is no more
    fn have_data(&mut self) -> io::Result<bool> {
        // Only try to read more data when the buffer cursor has reached the end of the buffer
        if self.cursor == self.buffer.len() {
            self.buffer.resize(BUFFER_SIZE, 0);
            let size = loop {
                match self.source.read(&mut self.buffer) {
                    Ok(size) => break size,
                    Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                    Err(e) => return Err(e),
                }
            };
            // Adjust the buffer if we read less than the buffer size
            self.buffer.truncate(size);
            self.cursor = 0;
            self.bit_index = 0;
            // If nothing came back from our read attempt, then we have no more data.
            if size == 0 {
                return Ok(false);
            }
        }
        Ok(true)
    }

    /// Return the next bit (true for 1), or None if there is no more data to read
    pub fn bit(&mut self) -> io::Result<Option<bool>> {
        // At a byte boundary, make sure we still have a byte to read
        if self.bit_index == 0 && !self.have_data()? {
            return Ok(None);
        }
        let bit = (self.buffer[self.cursor] >> (7 - self.bit_index)) & 1;
        self.bit_index += 1;
        self.bit_index %= 8;
        if self.bit_index == 0 {
            self.cursor += 1;
        }
        self.bits += 1;
        Ok(Some(bit == 1))
    }

    /// Number of bits consumed so far.
    pub fn bits_read(&self) -> u64 {
        self.bits
    }

    /// Number of bits left in the byte currently being read (0 at a byte boundary).
    pub fn bits_left_in_byte(&self) -> u8 {
        if self.bit_index == 0 {
            0
        } else {
            (8 - self.bit_index) as u8
        }
    }

    /// Debugging function. Report current position in the stream.
    pub fn loc(&self) -> String {
        format!("[{}.{}]", self.bits / 8, self.bits % 8)
    }
}
