//! The compression module manages block framing and the transform pipeline.
//!
//! Compression happens in the following steps:
//! - The input is read in blocks of a fixed size (512 KiB unless configured otherwise).
//! - Every block goes through the transform pipeline on its own. The standard pipeline is:
//!   - Run Length Encoding: Compress runs of three or more identical bytes.
//!   - Burrow Wheeler Transform: Sort the data to increase the probability of runs of identical bytes.
//!   - Move To Front transform: Increase the frequency of lower byte values.
//!   - Run Length Encoding: Compress the runs of small values the MTF leaves behind.
//!   - Huffman coding: Encode frequent byte values using shorter bit codes.
//! - Each encoded block is written as a frame: its length as a 4 byte big endian integer, then
//!   its bytes.
//!
//! Decompression reads the frames back one by one and runs the pipeline in reverse. The block size
//! is not stored; frame lengths alone drive decoding, so only the pipeline has to match.
//!
//! Blocks carry no state from one to the next.
//!

use std::io::{self, Read};

use log::warn;

use self::transform::Transform;

pub mod compress;
pub mod decompress;
pub mod pipeline;
pub mod transform;

/// Default size of a raw input block.
pub const DEFAULT_BLOCK_SIZE: usize = 512 * 1024;
/// Largest block size accepted.
pub const MAX_BLOCK_SIZE: usize = 64 * 1024 * 1024;
/// Width of a frame's length prefix.
pub const FRAME_HEADER_SIZE: usize = 4;

/// Splits a stream into blocks, runs each through a transform and frames the results.
pub struct Packager {
    transform: Box<dyn Transform>,
    block_size: usize,
}

impl Packager {
    /// Create a Packager. `block_size` is in bytes and is kept within 1..=MAX_BLOCK_SIZE.
    pub fn new<T: Transform + 'static>(transform: T, block_size: usize) -> Self {
        let clamped = block_size.clamp(1, MAX_BLOCK_SIZE);
        if clamped != block_size {
            warn!(
                "Block size {} is out of range, using {} bytes.",
                block_size, clamped
            );
        }
        Self {
            transform: Box::new(transform),
            block_size: clamped,
        }
    }

    /// A Packager with the default block size.
    pub fn with_default_block_size<T: Transform + 'static>(transform: T) -> Self {
        Self::new(transform, DEFAULT_BLOCK_SIZE)
    }

    pub fn block_size(&self) -> usize {
        self.block_size
    }

    pub fn transform(&self) -> &dyn Transform {
        self.transform.as_ref()
    }
}

/// Fill `buf` from `reader`, stopping early only at end of input. Returns the bytes read.
pub(crate) fn read_full<R: Read>(reader: &mut R, buf: &mut [u8]) -> io::Result<usize> {
    let mut filled = 0;
    while filled < buf.len() {
        match reader.read(&mut buf[filled..]) {
            Ok(0) => break,
            Ok(n) => filled += n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => {}
            Err(e) => return Err(e),
        }
    }
    Ok(filled)
}
