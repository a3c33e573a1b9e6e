use std::ffi::OsString;
use std::fmt::{Display, Formatter};
use std::io;
use std::path::{Path, PathBuf};

use clap::{ArgAction, Parser};
use log::{info, LevelFilter};

use crate::error::{HuffError, Result};

/// Extension added to compressed files.
pub const COMPRESSED_EXT: &str = "huf";
/// Extension added to frequency files.
pub const FREQ_EXT: &str = "freq";

/// Verbosity of user information
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verbosity {
    Quiet,
    Errors,
    Warnings,
    Info,
    Debug,
    Trace,
}

impl Verbosity {
    pub fn level_filter(self) -> LevelFilter {
        match self {
            Verbosity::Quiet => LevelFilter::Off,
            Verbosity::Errors => LevelFilter::Error,
            Verbosity::Warnings => LevelFilter::Warn,
            Verbosity::Info => LevelFilter::Info,
            Verbosity::Debug => LevelFilter::Debug,
            Verbosity::Trace => LevelFilter::Trace,
        }
    }
}

/// Zip, Unzip, Test
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Zip,
    Unzip,
    Test,
}
impl Display for Mode {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}", self)
    }
}

/// Command Line Interpretation - uses external CLAP crate.
#[derive(Parser, Debug)]
#[clap(
    name = "huffman",
    version,
    about = "Compress and decompress files with Huffman coding",
    long_about = "
    Compresses a file with a Huffman code built from its own byte frequencies.

    Compressing FILE writes FILE.huf and FILE.freq. The frequency file is needed to
    decompress: keep the two together. Decompressing FILE.huf restores FILE."
)]
pub struct Args {
    /// File to process
    #[clap()]
    input: String,

    /// Compress the input file (default)
    #[clap(short = 'z', long = "compress", conflicts_with_all = &["decompress", "test"])]
    compress: bool,

    /// Decompress the input file
    #[clap(short = 'd', long = "decompress", conflicts_with = "test")]
    decompress: bool,

    /// Decode the input file without writing anything, checking it against its frequency file
    #[clap(short = 't', long = "test")]
    test: bool,

    /// Output file
    #[clap(short = 'o', long = "output")]
    output: Option<String>,

    /// Frequency file to write (compress) or read (decompress, test)
    #[clap(long = "freq")]
    freq: Option<String>,

    /// Write a report of the priority queue, tree and codes to this file
    #[clap(long = "tree")]
    tree: Option<String>,

    /// Overwrite existing output files
    #[clap(short = 'f', long = "force")]
    force: bool,

    /// Be verbose (a 2nd -v gives more)
    #[clap(short = 'v', long = "verbose", action = ArgAction::Count)]
    verbose: u8,

    /// Suppress all messages
    #[clap(short = 'q', long = "quiet")]
    quiet: bool,
}

/// Everything a run needs to know, with defaults filled in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HuffOpts {
    /// Compress/Decompress/Test
    pub op_mode: Mode,
    /// File to read
    pub input: PathBuf,
    /// File to write (unused when testing)
    pub output: PathBuf,
    /// Frequency file shared by compress and decompress
    pub freq: PathBuf,
    /// Optional debug report of the tree
    pub tree: Option<PathBuf>,
    /// Silently overwrite existing files with the same name
    pub force_overwrite: bool,
    /// Verbosity of user information
    pub verbose: Verbosity,
}

impl HuffOpts {
    /// Fill in the default paths for anything not given on the command line.
    pub fn from_args(args: Args) -> Self {
        let op_mode = if args.decompress {
            Mode::Unzip
        } else if args.test {
            Mode::Test
        } else {
            Mode::Zip
        };
        let input = PathBuf::from(args.input);

        // Compressed files are named after the input; decompression strips that name back off.
        let base = match op_mode {
            Mode::Zip => input.clone(),
            Mode::Unzip | Mode::Test => decompressed_name(&input),
        };
        let output = match (args.output, op_mode) {
            (Some(output), _) => PathBuf::from(output),
            (None, Mode::Zip) => with_suffix(&input, COMPRESSED_EXT),
            (None, _) => base.clone(),
        };
        let freq = args
            .freq
            .map(PathBuf::from)
            .unwrap_or_else(|| with_suffix(&base, FREQ_EXT));

        let verbose = match (args.quiet, args.verbose) {
            (true, _) => Verbosity::Quiet,
            (false, 0) => Verbosity::Warnings,
            (false, 1) => Verbosity::Info,
            (false, 2) => Verbosity::Debug,
            _ => Verbosity::Trace,
        };

        HuffOpts {
            op_mode,
            input,
            output,
            freq,
            tree: args.tree.map(PathBuf::from),
            force_overwrite: args.force,
            verbose,
        }
    }

    /// Log the options in effect.
    pub fn report(&self) {
        info!("---- Huffman Initialization Start ----");
        info!("Verbosity set to {}", self.verbose.level_filter());
        info!("Operational mode set to {}", self.op_mode);
        info!("Getting input from the file {}", self.input.display());
        if self.op_mode != Mode::Test {
            info!("Sending output to the file {}", self.output.display());
        }
        info!("Frequency file is {}", self.freq.display());
        if let Some(tree) = &self.tree {
            info!("Writing the tree report to {}", tree.display());
        }
        if self.force_overwrite {
            info!("Forcing file overwriting")
        };
        info!("---- Huffman Initialization End ----");
    }
}

impl Default for HuffOpts {
    fn default() -> Self {
        Self {
            op_mode: Mode::Zip,
            input: PathBuf::new(),
            output: PathBuf::new(),
            freq: PathBuf::new(),
            tree: None,
            force_overwrite: false,
            verbose: Verbosity::Warnings,
        }
    }
}

/// Parse the process arguments.
pub fn huffopts_init() -> HuffOpts {
    HuffOpts::from_args(Args::parse())
}

/// Append `.ext` to the full file name (`a.txt` -> `a.txt.huf`).
fn with_suffix(path: &Path, ext: &str) -> PathBuf {
    let mut name: OsString = path.as_os_str().to_owned();
    name.push(".");
    name.push(ext);
    PathBuf::from(name)
}

/// `a.txt.huf` -> `a.txt`; anything without the .huf extension gets `.out` added.
fn decompressed_name(path: &Path) -> PathBuf {
    match path.extension() {
        Some(ext) if ext == COMPRESSED_EXT => path.with_extension(""),
        _ => with_suffix(path, "out"),
    }
}

/// Refuse to clobber an existing file unless forced.
pub fn check_overwrite(path: &Path, force: bool) -> Result<()> {
    if !force && path.exists() {
        return Err(HuffError::io(
            path,
            io::Error::new(
                io::ErrorKind::AlreadyExists,
                "output file already exists, use --force to overwrite",
            ),
        ));
    }
    Ok(())
}
