//! The tools module provides the byte level transforms and helpers used by the pipeline.
//!
//! The tools are:
//! - cli: Command line interface.
//! - freq_count: Byte frequency count.
//! - mtf: Move-To-Front transform.
//! - rle_packbits: PackBits style Run-Length-Encoding.
//! - rle_pairs: Run-Length-Encoding keyed on doubled bytes.
//! - rle_streams: Run-Length-Encoding with separate flag and symbol streams.
//!
pub mod cli;
pub mod freq_count;
pub mod mtf;
pub mod rle_packbits;
pub mod rle_pairs;
pub mod rle_streams;
