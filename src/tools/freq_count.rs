//! Symbol frequency counting and the frequency file.
//!
//! The frequency file is the only thing shared between an encode run and a later decode run.
//! Each line is `<symbol in binary, no leading zeros>:<decimal count>`, e.g. `1100001:3` for
//! three `a`s. Lines are written in ascending symbol order, so a given table always produces
//! the same file, byte for byte.

use std::fmt;
use std::fs::{self, File};
use std::io::{self, BufWriter, Read, Write};
use std::path::Path;

use log::{debug, warn};
use rayon::prelude::*;

use crate::error::{HuffError, Result};

/// Occurrence count of every byte value. Only symbols with a non-zero count are present.
#[derive(Clone, PartialEq, Eq)]
pub struct FrequencyTable {
    counts: Vec<u64>,
}

impl FrequencyTable {
    pub fn new() -> Self {
        FrequencyTable {
            counts: vec![0; 256],
        }
    }

    /// Returns a frequency count of the input data. Uses parallelism when data set is over 64k.
    pub fn from_bytes(data: &[u8]) -> Self {
        let counts = if data.len() > 64_000 {
            // 16k is pretty much the sweet spot for chunk size.
            data.par_chunks(16_000)
                .fold(
                    || vec![0_u64; 256],
                    |mut freqs, chunk| {
                        chunk.iter().for_each(|&el| freqs[el as usize] += 1);
                        freqs
                    },
                )
                .reduce(
                    || vec![0_u64; 256],
                    |s, f| s.iter().zip(&f).map(|(a, b)| a + b).collect::<Vec<u64>>(),
                )
        } else {
            let mut freqs = vec![0_u64; 256];
            data.iter().for_each(|&el| freqs[el as usize] += 1);
            freqs
        };
        FrequencyTable { counts }
    }

    /// Add `count` occurrences of `symbol`. Saturates at u64::MAX.
    pub fn add(&mut self, symbol: u8, count: u64) {
        let slot = &mut self.counts[symbol as usize];
        *slot = slot.saturating_add(count);
    }

    pub fn get(&self, symbol: u8) -> u64 {
        self.counts[symbol as usize]
    }

    /// Number of distinct symbols.
    pub fn len(&self) -> usize {
        self.counts.iter().filter(|&&c| c > 0).count()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.iter().all(|&c| c == 0)
    }

    /// Total number of symbols counted. Saturates at u64::MAX.
    pub fn total(&self) -> u64 {
        self.checked_total().unwrap_or(u64::MAX)
    }

    /// Total number of symbols counted, or None if it does not fit in a u64.
    pub fn checked_total(&self) -> Option<u64> {
        self.counts.iter().try_fold(0_u64, |sum, &c| sum.checked_add(c))
    }

    /// (symbol, count) pairs with a non-zero count, in ascending symbol order.
    pub fn iter(&self) -> impl Iterator<Item = (u8, u64)> + '_ {
        self.counts
            .iter()
            .enumerate()
            .filter(|(_, c)| **c > 0)
            .map(|(s, &c)| (s as u8, c))
    }

    /// Write the table in frequency file format.
    pub fn write_to<W: Write>(&self, out: &mut W) -> io::Result<()> {
        for (symbol, count) in self.iter() {
            writeln!(out, "{:b}:{}", symbol, count)?;
        }
        Ok(())
    }

    /// Parse the frequency file format. Blank lines are skipped. The counts must add up to
    /// no more than u64::MAX, which bounds every node weight of the tree built from them.
    pub fn parse(text: &str) -> Result<Self> {
        let mut table = FrequencyTable::new();
        let mut total = 0_u64;
        for (idx, raw) in text.lines().enumerate() {
            let line = raw.trim_end_matches('\r');
            if line.trim().is_empty() {
                continue;
            }
            let malformed = || HuffError::MalformedFrequencyLine {
                line: idx + 1,
                text: raw.to_string(),
            };
            let (symbol, count) = parse_line(line).ok_or_else(malformed)?;
            // Every symbol appears once, with a positive count
            if table.get(symbol) != 0 {
                return Err(malformed());
            }
            total = total.checked_add(count).ok_or_else(malformed)?;
            table.add(symbol, count);
        }
        Ok(table)
    }

    /// Read a frequency file from any source.
    pub fn read_from<R: Read>(mut reader: R) -> Result<Self> {
        let mut text = String::new();
        reader.read_to_string(&mut text)?;
        Self::parse(&text)
    }

    /// Load the frequency file at `path`.
    pub fn load(path: &Path) -> Result<Self> {
        let missing = |source| HuffError::MissingFrequencyFile {
            path: path.to_path_buf(),
            source,
        };
        let text = fs::read_to_string(path).map_err(missing)?;
        let table = Self::parse(&text)?;
        debug!(
            "Read {} symbols ({} total) from {}",
            table.len(),
            table.total(),
            path.display()
        );
        Ok(table)
    }

    /// Write the frequency file to `path`, replacing any existing file. A file that could
    /// not be written completely is removed.
    pub fn save(&self, path: &Path) -> Result<()> {
        let file = File::create(path).map_err(|e| HuffError::io(path, e))?;
        let mut out = BufWriter::new(file);
        let result = self.write_to(&mut out).and_then(|_| out.flush());
        drop(out);
        if let Err(e) = result {
            if let Err(rm) = fs::remove_file(path) {
                warn!("Could not remove partial file {}: {}", path.display(), rm);
            }
            return Err(HuffError::io(path, e));
        }
        Ok(())
    }
}

/// Split `binary:count`. None if either side is not a valid number.
fn parse_line(line: &str) -> Option<(u8, u64)> {
    let (symbol, count) = line.split_once(':')?;
    if symbol.is_empty() || !symbol.bytes().all(|b| b == b'0' || b == b'1') {
        return None;
    }
    if count.is_empty() || !count.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    // Leading zeros carry no value, and could overflow the radix parse
    let digits = symbol.trim_start_matches('0');
    let symbol = if digits.is_empty() {
        0
    } else {
        u8::from_str_radix(digits, 2).ok()?
    };
    let count = count.parse::<u64>().ok().filter(|&c| c > 0)?;
    Some((symbol, count))
}

impl Default for FrequencyTable {
    fn default() -> Self {
        Self::new()
    }
}

impl FromIterator<(u8, u64)> for FrequencyTable {
    fn from_iter<I: IntoIterator<Item = (u8, u64)>>(iter: I) -> Self {
        let mut table = FrequencyTable::new();
        for (symbol, count) in iter {
            table.add(symbol, count);
        }
        table
    }
}

impl fmt::Debug for FrequencyTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

#[cfg(test)]
mod test {
    use super::FrequencyTable;
    use crate::error::HuffError;

    fn freq_string(table: &FrequencyTable) -> String {
        let mut out = Vec::new();
        table.write_to(&mut out).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn counts_aaabbc() {
        let table = FrequencyTable::from_bytes(b"aaabbc");
        assert_eq!(table.len(), 3);
        assert_eq!(table.total(), 6);
        assert_eq!(table.get(97), 3);
        assert_eq!(table.get(98), 2);
        assert_eq!(table.get(99), 1);
        assert_eq!(table.get(100), 0);
        assert_eq!(
            table.iter().collect::<Vec<_>>(),
            vec![(97, 3), (98, 2), (99, 1)]
        );
    }

    #[test]
    fn parallel_count_matches_serial() {
        let data: Vec<u8> = (0..300_000u32).map(|i| (i * 7 % 251) as u8).collect();
        let table = FrequencyTable::from_bytes(&data);
        let mut serial = FrequencyTable::new();
        data.iter().for_each(|&b| serial.add(b, 1));
        assert_eq!(table, serial);
        assert_eq!(table.total(), 300_000);
    }

    #[test]
    fn file_format() {
        let table = FrequencyTable::from_bytes(b"aaabbc\0");
        assert_eq!(freq_string(&table), "0:1\n1100001:3\n1100010:2\n1100011:1\n");
    }

    #[test]
    fn file_round_trip() {
        let table: FrequencyTable = vec![(0, 5), (1, 1), (128, 99), (255, u64::MAX / 2)]
            .into_iter()
            .collect();
        let text = freq_string(&table);
        assert_eq!(FrequencyTable::parse(&text).unwrap(), table);
        assert_eq!(FrequencyTable::read_from(text.as_bytes()).unwrap(), table);
    }

    #[test]
    fn parse_tolerates_blank_lines_and_crlf() {
        let table = FrequencyTable::parse("1100001:3\r\n\n00001100010:2\n").unwrap();
        assert_eq!(table.get(b'a'), 3);
        assert_eq!(table.get(b'b'), 2);
        assert_eq!(table.len(), 2);
    }

    #[test]
    fn malformed_lines_are_rejected() {
        for (text, bad_line) in [
            ("1100001:3\nhello\n", 2),
            ("1100001\n", 1),
            (":3\n", 1),
            ("102:3\n", 1),
            ("1100001:\n", 1),
            ("1100001:-3\n", 1),
            ("1100001:0\n", 1),
            ("1100001:3:4\n", 1),
            ("100000000:1\n", 1),
            ("1:1\n1:2\n", 2),
        ] {
            match FrequencyTable::parse(text) {
                Err(HuffError::MalformedFrequencyLine { line, .. }) => assert_eq!(line, bad_line, "{:?}", text),
                other => panic!("{:?} parsed as {:?}", text, other),
            }
        }
    }

    #[test]
    fn counts_past_u64_max_are_rejected() {
        match FrequencyTable::parse("0:18446744073709551615\n1:1\n") {
            Err(HuffError::MalformedFrequencyLine { line, text }) => {
                assert_eq!(line, 2);
                assert_eq!(text, "1:1");
            }
            other => panic!("overflowing counts parsed as {:?}", other),
        }
        // Exactly u64::MAX in total is still fine
        let table = FrequencyTable::parse("0:18446744073709551614\n1:1\n").unwrap();
        assert_eq!(table.checked_total(), Some(u64::MAX));
    }

    #[test]
    fn total_saturates() {
        let table: FrequencyTable = vec![(0, u64::MAX), (1, 1)].into_iter().collect();
        assert_eq!(table.checked_total(), None);
        assert_eq!(table.total(), u64::MAX);
    }

    #[test]
    fn missing_file() {
        let err = FrequencyTable::load(std::path::Path::new("/no/such/dir/freq.txt")).unwrap_err();
        assert!(matches!(err, HuffError::MissingFrequencyFile { .. }));
    }
}
