//! The huffman_coding module holds the entropy coding stage of the codec.
//!
//! Every block gets its own canonical Huffman code. Only the code lengths are stored with the
//! block, since a canonical code can be rebuilt from its lengths alone. Decoding walks a binary
//! trie built from the rebuilt codes.
//!
//! The process of encoding and decoding each block is inherently sequential and does not benefit
//! from multithreading.
//!

pub mod hfc;
pub mod huffman;
pub mod huffman_code_from_weights;
