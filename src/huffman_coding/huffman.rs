use std::cell::OnceCell;

use log::trace;

use super::huffman_code_from_weights::{lengths_from_block, LengthTable};
use crate::bitstream::bitpacker::BitStream;
use crate::error::{CodecError, Result};
use crate::tools::freq_count::BYTE_CAPACITY;

/// Longest code a length table may ask for.
pub const MAX_CODE_LEN: u8 = 64;

/// One canonical code: the `len` least significant bits of `value`, most significant first.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Code {
    pub value: u64,
    pub len: u8,
}

impl Code {
    /// The bits of the code in emission order.
    pub fn bits(&self) -> impl Iterator<Item = bool> {
        let Code { value, len } = *self;
        (0..len).rev().map(move |i| (value >> i) & 1 == 1)
    }
}

/// A node of the decoding trie. Children are indexes into the trie arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrieNode {
    Leaf(u8),
    Internal {
        zero: Option<usize>,
        one: Option<usize>,
    },
}

const ROOT: usize = 0;

/// A canonical Huffman code for one block.
///
/// The code is fully described by its length table. Codes are handed out in order of
/// (length, byte value), starting from 0 and counting up, shifting left whenever the length grows.
/// The decoding trie is built on first use and then reused.
#[derive(Debug, Clone)]
pub struct CanonicalHuffmanTree {
    lengths: LengthTable,
    codes: Vec<Option<Code>>,
    trie: OnceCell<Vec<TrieNode>>,
}

impl CanonicalHuffmanTree {
    /// Build the code for the bytes of `block`.
    pub fn from_block(block: &[u8]) -> Self {
        Self::build(lengths_from_block(block))
    }

    /// Build the code for a length table read from elsewhere. The table must describe a prefix
    /// code: no length above 64, and a Kraft sum of at most one.
    pub fn from_lengths(lengths: LengthTable) -> Result<Self> {
        if let Some(len) = lengths.iter().find(|&&len| len > MAX_CODE_LEN) {
            return Err(CodecError::corrupt(format!(
                "huffman code length {} is over the limit of {}",
                len, MAX_CODE_LEN
            )));
        }
        let kraft: u128 = lengths
            .iter()
            .filter(|&&len| len > 0)
            .map(|&len| 1_u128 << (MAX_CODE_LEN - len))
            .sum();
        if kraft > 1_u128 << MAX_CODE_LEN {
            return Err(CodecError::corrupt(
                "huffman length table does not describe a prefix code",
            ));
        }
        Ok(Self::build(lengths))
    }

    fn build(lengths: LengthTable) -> Self {
        let codes = encoding_table(&lengths);
        Self {
            lengths,
            codes,
            trie: OnceCell::new(),
        }
    }

    pub fn lengths(&self) -> &LengthTable {
        &self.lengths
    }

    /// The code of every byte value, None for bytes with length 0.
    pub fn encoding_table(&self) -> &[Option<Code>] {
        &self.codes
    }

    pub fn code(&self, byte: u8) -> Option<Code> {
        self.codes[byte as usize]
    }

    /// The length table as 256 bytes, in byte value order.
    pub fn lengths_to_bytes(&self) -> Vec<u8> {
        self.lengths.to_vec()
    }

    /// Read a length table written by `lengths_to_bytes`.
    pub fn lengths_from_bytes(bytes: &[u8]) -> Result<LengthTable> {
        bytes.try_into().map_err(|_| {
            CodecError::corrupt(format!(
                "huffman length table has {} entries, expected {}",
                bytes.len(),
                BYTE_CAPACITY
            ))
        })
    }

    /// The decoding trie. Index 0 is the root.
    pub fn trie(&self) -> &[TrieNode] {
        self.trie.get_or_init(|| build_trie(&self.codes))
    }

    /// Write the code of every byte of `block` to `stream`.
    ///
    /// Every byte of `block` must have a code, which is the case when the tree was built from it.
    pub fn encode_into(&self, block: &[u8], stream: &mut BitStream) {
        for &byte in block {
            if let Some(code) = self.codes[byte as usize] {
                stream.append_bits(code.value, code.len);
            }
        }
    }

    /// Walk the trie over `bits`, one output byte per leaf reached.
    pub fn decode_bits<I: IntoIterator<Item = bool>>(&self, bits: I) -> Result<Vec<u8>> {
        let trie = self.trie();
        let bits = bits.into_iter();
        let mut out = Vec::with_capacity(bits.size_hint().0 / 2);
        let mut node = ROOT;

        for bit in bits {
            let next = match trie[node] {
                TrieNode::Internal { zero, one } => {
                    if bit {
                        one
                    } else {
                        zero
                    }
                }
                TrieNode::Leaf(_) => None,
            };
            node = next.ok_or_else(|| CodecError::corrupt("bit sequence matches no huffman code"))?;
            if let TrieNode::Leaf(byte) = trie[node] {
                out.push(byte);
                node = ROOT;
            }
        }
        if node != ROOT {
            return Err(CodecError::corrupt("bit stream ends inside a huffman code"));
        }
        Ok(out)
    }
}

/// Assign canonical codes to a length table.
pub fn encoding_table(lengths: &LengthTable) -> Vec<Option<Code>> {
    let mut order = lengths
        .iter()
        .enumerate()
        .filter(|(_, &len)| len > 0)
        .map(|(sym, &len)| (len, sym))
        .collect::<Vec<(u8, usize)>>();
    order.sort_unstable();

    let mut codes = vec![None; BYTE_CAPACITY];
    // Wider than any code so the count past the last code cannot overflow.
    let mut next_code = 0_u128;
    let mut prev_len = order.first().map_or(0, |&(len, _)| len);
    for (len, sym) in order {
        next_code <<= len - prev_len;
        codes[sym] = Some(Code {
            value: next_code as u64,
            len,
        });
        next_code += 1;
        prev_len = len;
    }
    codes
}

/// Build the decoding trie of a prefix code as a flat arena.
fn build_trie(codes: &[Option<Code>]) -> Vec<TrieNode> {
    let mut trie = vec![TrieNode::Internal {
        zero: None,
        one: None,
    }];

    for (sym, code) in codes.iter().enumerate() {
        let Some(code) = code else { continue };
        let mut node = ROOT;
        for (i, bit) in code.bits().enumerate() {
            let last = i + 1 == code.len as usize;
            let new_index = trie.len();
            let slot = match &mut trie[node] {
                TrieNode::Internal { zero, one } => {
                    if bit {
                        one
                    } else {
                        zero
                    }
                }
                TrieNode::Leaf(_) => unreachable!("canonical codes are prefix free"),
            };
            let existing = *slot;
            match existing {
                Some(child) if !last => node = child,
                Some(_) => unreachable!("canonical codes are prefix free"),
                None => {
                    *slot = Some(new_index);
                    node = new_index;
                    trie.push(if last {
                        TrieNode::Leaf(sym as u8)
                    } else {
                        TrieNode::Internal {
                            zero: None,
                            one: None,
                        }
                    });
                }
            }
        }
    }
    trace!("huffman trie built with {} nodes", trie.len());
    trie
}
