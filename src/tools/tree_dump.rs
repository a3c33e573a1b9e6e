//! Human readable report of how a tree is built from a frequency table.
//!
//! The report goes to whatever sink the caller hands in (usually a file named on the
//! command line with --tree).

use std::io::Write;

use crate::error::Result;
use crate::huffman_coding::code_table::CodeTable;
use crate::huffman_coding::huffman::{HuffmanTree, SymbolName};
use crate::tools::freq_count::FrequencyTable;

/// Write the seeded queue, the leaves of the finished tree, its structure and the codes.
pub fn write_report<W: Write>(table: &FrequencyTable, out: &mut W) -> Result<()> {
    let queue = HuffmanTree::seed_queue(table);
    writeln!(out, "Size: {}", queue.size())?;
    queue.dump(out)?;
    writeln!(out)?;
    for node in queue.iter() {
        writeln!(out, "{}: {}", node, node.weight())?;
    }
    writeln!(out)?;

    let tree = HuffmanTree::build(table)?;
    tree.write_leaves(out)?;
    writeln!(out)?;
    tree.write_structure(out)?;
    writeln!(out)?;

    for (symbol, code) in CodeTable::build(&tree).iter() {
        writeln!(out, "{} {}", SymbolName(symbol), code)?;
    }
    Ok(())
}

#[cfg(test)]
mod test {
    use super::write_report;
    use crate::error::HuffError;
    use crate::tools::freq_count::FrequencyTable;

    #[test]
    fn report_sections() {
        let table = FrequencyTable::from_bytes(b"aaabbc");
        let mut out = Vec::new();
        write_report(&table, &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.starts_with("Size: 3\n"));
        assert!(text.contains("root-> Internal [weight: 6]"));
        assert!(text.ends_with("'a' 0\n'b' 11\n'c' 10\n"));
        // queue dump, queue, leaves, structure and codes are separated by blank lines
        assert_eq!(text.matches("\n\n").count(), 4);
    }

    #[test]
    fn empty_table_has_no_tree() {
        let mut out = Vec::new();
        let err = write_report(&FrequencyTable::new(), &mut out).unwrap_err();
        assert!(matches!(err, HuffError::EmptyInput));
    }
}
