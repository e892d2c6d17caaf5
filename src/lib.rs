//! A block-sorting file compressor built from composable, reversible transforms.
//!
//! Version 0.1.0
//!
//! The input is cut into blocks and every block runs through a chain of transforms on its own.
//! The standard chain is the bzip2 lineup: PackBits RLE, Burrows-Wheeler Transform, Move-To-Front,
//! PackBits RLE again and a per-block canonical Huffman code. Each encoded block is written as a
//! frame, `[length: u32 BE][bytes]`. There is no file header; decoding must use the same chain.
//!
//! Basic usage to compress a file is as follows:
//!
//! `$> sbzip test.txt`
//!
//! This will compress the file and create the file test.txt.sbz. `sbzip -d test.txt.sbz`
//! restores it.
//!
//! Transforms can also be chained by hand:
//!
//! ```
//! use sbzip::{Bwt, Composition, Hfc, Mtf, RlePackBits, Transform};
//!
//! let chain = Composition::new().then(Bwt::default()).then(Mtf).then(RlePackBits).then(Hfc);
//! let encoded = chain.encode(b"abcabc");
//! assert_eq!(chain.decode(&encoded).unwrap(), b"abcabc".to_vec());
//! ```
//!
#![warn(rust_2018_idioms)]

use std::path::Path;

pub mod bitstream;
pub mod bwt_algorithms;
pub mod compression;
pub mod error;
pub mod huffman_coding;
pub mod tools;

pub use bitstream::{bitpacker::BitStream, bitreader::BitReader};
pub use bwt_algorithms::bwt_sort::{Bwt, RotationSort};
pub use compression::pipeline::{parse_pipeline, standard_pipeline, Stage};
pub use compression::transform::{then, Composition, Id, Transform};
pub use compression::{Packager, DEFAULT_BLOCK_SIZE, MAX_BLOCK_SIZE};
pub use error::{CodecError, Result};
pub use huffman_coding::{hfc::Hfc, huffman::CanonicalHuffmanTree};
pub use tools::{
    mtf::Mtf, rle_packbits::RlePackBits, rle_pairs::RlePairs, rle_streams::RleStreams,
};

/// Encode the file at `path_in` to `path_out` with the standard pipeline and block size.
pub fn encode<P: AsRef<Path>, Q: AsRef<Path>>(path_in: P, path_out: Q) -> Result<()> {
    Packager::with_default_block_size(standard_pipeline(RotationSort::default()))
        .encode(path_in, path_out)
        .map(|_| ())
}

/// Decode a file written by `encode`.
pub fn decode<P: AsRef<Path>, Q: AsRef<Path>>(path_in: P, path_out: Q) -> Result<()> {
    Packager::with_default_block_size(standard_pipeline(RotationSort::default()))
        .decode(path_in, path_out)
        .map(|_| ())
}
