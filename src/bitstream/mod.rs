//! The bitstream module is the bit-level I/O subsystem of the codec.
//!
//! Values narrower than a byte are accumulated by a BitStream and read back by a BitReader. The
//! Huffman stage uses them to pack variable length codes into bytes; the flag channel of the
//! stream RLE uses them to pack 4-bit run-length units.
//!
//! This subsystem is built to serve the other modules of this crate. It has not been generalized
//! beyond what they need.
//!
pub mod bitpacker;
pub mod bitreader;
