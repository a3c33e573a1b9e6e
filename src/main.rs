//Enable more cargo lint tests
#![warn(rust_2018_idioms)]

use std::fs::File;
use std::io::{BufWriter, Write};
use std::process::exit;

use log::{error, info};
use simplelog::{ColorChoice, Config, TermLogger, TerminalMode};

use huffman::compression::compress::encode_file;
use huffman::compression::decompress::{decode_file, test_file};
use huffman::error::{HuffError, Result};
use huffman::tools::cli::{check_overwrite, huffopts_init, HuffOpts, Mode};
use huffman::tools::freq_count::FrequencyTable;
use huffman::tools::tree_dump::write_report;

fn main() {
    let options = huffopts_init();

    // Log to stderr so stdout stays clean. Available log levels are Error, Warn, Info, Debug, Trace
    if let Err(e) = TermLogger::init(
        options.verbose.level_filter(),
        Config::default(),
        TerminalMode::Stderr,
        ColorChoice::Auto,
    ) {
        eprintln!("Unable to start the logger: {}", e);
    }

    if let Err(e) = run(&options) {
        error!("{}", e);
        exit(1);
    }
}

/// Figure out what we need to do and go do it
fn run(opts: &HuffOpts) -> Result<()> {
    opts.report();

    // Compression already holds the table; the other modes read it back for the report
    let table = match opts.op_mode {
        Mode::Zip => {
            check_overwrite(&opts.output, opts.force_overwrite)?;
            check_overwrite(&opts.freq, opts.force_overwrite)?;
            let summary = encode_file(&opts.input, &opts.output, &opts.freq)?;
            info!(
                "{}: {} symbols ({} distinct) in, {} bytes out",
                opts.input.display(),
                summary.symbols,
                summary.alphabet,
                summary.bytes()
            );
            Some(summary.table)
        }
        Mode::Unzip => {
            check_overwrite(&opts.output, opts.force_overwrite)?;
            let summary = decode_file(&opts.input, &opts.output, &opts.freq)?;
            info!(
                "{}: {} bits in, {} symbols out",
                opts.input.display(),
                summary.bits,
                summary.symbols
            );
            None
        }
        Mode::Test => {
            test_file(&opts.input, &opts.freq)?;
            None
        }
    };

    if let Some(path) = &opts.tree {
        let table = match table {
            Some(table) => table,
            None => FrequencyTable::load(&opts.freq)?,
        };
        let file = File::create(path).map_err(|e| HuffError::io(path, e))?;
        let mut out = BufWriter::new(file);
        write_report(&table, &mut out)?;
        out.flush()?;
        info!("Wrote tree report to {}", path.display());
    }

    info!("Done.");
    Ok(())
}
