//! The bwt_algorithms module holds the Burrows-Wheeler Transform and the rotation sorts behind it.
//!
//! The transform alters the data in such a way that runs of similar bytes are more likely to
//! occur, which lets the later stages compress the block more effectively.
//!
//! Sorting the rotations of a block is the expensive part. Two sorts are provided, a plain
//! comparison sort and prefix doubling, and they produce the same order.
//!
pub mod bwt_sort;
pub mod rotation_doubling;
