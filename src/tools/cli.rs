use std::ffi::OsString;
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};

use clap::Parser;
use log::{info, LevelFilter};

use crate::bwt_algorithms::bwt_sort::RotationSort;
use crate::compression::pipeline::{parse_pipeline, standard_pipeline};
use crate::compression::transform::Composition;
use crate::compression::{Packager, DEFAULT_BLOCK_SIZE};
use crate::error::Result;

/// Extension given to encoded files.
pub const EXTENSION: &str = "sbz";
/// Extension added on decode when the input does not end in `EXTENSION`.
const DECODED_EXTENSION: &str = "out";

/// Encode or decode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Encode,
    Decode,
}

impl Display for Mode {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}", self)
    }
}

/// Command Line Interpretation - uses external CLAP crate.
#[derive(Parser, Debug)]
#[clap(
    version,
    about = "A block-sorting file compressor",
    long_about = "
    Compresses a file block by block. Every block runs through a chain of reversible transforms,
    by default RLE, BWT, MTF, RLE and Huffman coding, and is written with its length in front.

    Decoding must use the same chain of transforms as encoding. The block size may differ."
)]
pub struct Args {
    /// File to process
    #[clap(parse(from_os_str))]
    input: PathBuf,

    /// Output file. Defaults to INPUT.sbz when encoding, and INPUT without .sbz when decoding
    #[clap(parse(from_os_str))]
    output: Option<PathBuf>,

    /// Perform decompression on the input file
    #[clap(short = 'd', long = "decompress")]
    decompress: bool,

    /// Block size in KiB
    #[clap(short = 'b', long = "block-size", default_value_t = DEFAULT_BLOCK_SIZE / 1024)]
    block_size: usize,

    /// Rotation sort used by the BWT: simple or doubling
    #[clap(long, default_value = "doubling")]
    sort: RotationSort,

    /// Comma separated stages, in encode order (rle, pairs, streams, bwt, mtf, hfc, id)
    #[clap(short = 'p', long)]
    pipeline: Option<String>,

    /// Sets verbosity. -v shows each block, -vv each stage, -vvv everything
    #[clap(short = 'v', parse(from_occurrences))]
    verbose: u64,

    /// Turns logging off
    #[clap(short = 'q', long)]
    quiet: bool,
}

/// Everything the binary needs to run, gathered from the command line.
#[derive(Debug, Clone)]
pub struct Options {
    pub mode: Mode,
    pub input: PathBuf,
    pub output: PathBuf,
    /// Block size in bytes
    pub block_size: usize,
    pub sort: RotationSort,
    pub pipeline: Option<String>,
    pub verbosity: LevelFilter,
}

impl Options {
    /// Read the options from the process arguments.
    pub fn from_env() -> Self {
        Self::from(Args::parse())
    }

    /// Read the options from an explicit argument list, the first item being the program name.
    pub fn try_from_iter<I, T>(args: I) -> std::result::Result<Self, clap::Error>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        Args::try_parse_from(args).map(Self::from)
    }

    /// The transform chain named by `pipeline`, or the standard one.
    pub fn transform(&self) -> Result<Composition> {
        match &self.pipeline {
            Some(list) => parse_pipeline(list, self.sort),
            None => Ok(standard_pipeline(self.sort)),
        }
    }

    pub fn packager(&self) -> Result<Packager> {
        Ok(Packager::new(self.transform()?, self.block_size))
    }

    /// Report the settings at info level.
    pub fn report(&self) {
        info!("---- Initialization Start ----");
        info!("Verbosity set to {}", self.verbosity);
        info!("Operational mode set to {}", self.mode);
        info!("Getting input from the file {}", self.input.display());
        info!("Sending output to the file {}", self.output.display());
        info!("Block size set to {} bytes", self.block_size);
        info!("Rotation sort set to {}", self.sort);
        match &self.pipeline {
            Some(list) => info!("Pipeline set to {}", list),
            None => info!("Using the standard pipeline"),
        }
        info!("---- Initialization End ----");
    }
}

impl From<Args> for Options {
    fn from(args: Args) -> Self {
        let mode = if args.decompress {
            Mode::Decode
        } else {
            Mode::Encode
        };
        let output = args
            .output
            .unwrap_or_else(|| default_output(&args.input, mode));
        let verbosity = if args.quiet {
            LevelFilter::Off
        } else {
            match args.verbose {
                0 => LevelFilter::Warn,
                1 => LevelFilter::Info,
                2 => LevelFilter::Debug,
                _ => LevelFilter::Trace,
            }
        };
        Self {
            mode,
            input: args.input,
            output,
            block_size: args.block_size.saturating_mul(1024),
            sort: args.sort,
            pipeline: args.pipeline,
            verbosity,
        }
    }
}

/// Output name used when none is given.
pub fn default_output(input: &Path, mode: Mode) -> PathBuf {
    match mode {
        Mode::Encode => append_extension(input, EXTENSION),
        Mode::Decode => {
            if input.extension().map_or(false, |ext| ext == EXTENSION) {
                input.with_extension("")
            } else {
                append_extension(input, DECODED_EXTENSION)
            }
        }
    }
}

fn append_extension(path: &Path, extension: &str) -> PathBuf {
    let mut name = path.as_os_str().to_owned();
    name.push(".");
    name.push(extension);
    PathBuf::from(name)
}
