/*
Huffman transform.

Block layout:
  [table size: u32 BE][length table, PackBits encoded][packed codes][tail length: u8]

The length table has one entry per byte value and is mostly zeros, so it goes through the PackBits
encoder. The tail length is the number of zero bits padding the last byte of the packed codes.
*/

use log::trace;

use super::huffman::CanonicalHuffmanTree;
use crate::bitstream::bitpacker::{BitStream, BYTE_SIZE};
use crate::bitstream::bitreader::BitReader;
use crate::compression::transform::Transform;
use crate::error::{CodecError, Result};
use crate::tools::rle_packbits::RlePackBits;

const TABLE_SIZE_BYTES: usize = 4;
const TAIL_BYTES: usize = 1;

#[derive(Debug, Clone, Copy, Default)]
pub struct Hfc;

impl Transform for Hfc {
    fn encode(&self, block: &[u8]) -> Vec<u8> {
        let tree = CanonicalHuffmanTree::from_block(block);
        let table = RlePackBits.encode(&tree.lengths_to_bytes());

        let mut stream = BitStream::with_capacity(BYTE_SIZE, block.len());
        tree.encode_into(block, &mut stream);
        let tail_length = stream.padding();
        trace!(
            "HFC table {} bytes, {} code bits, {} tail bits",
            table.len(),
            stream.len(),
            tail_length
        );

        let mut out = Vec::with_capacity(TABLE_SIZE_BYTES + table.len() + stream.len() / 8 + 2);
        out.extend_from_slice(&(table.len() as u32).to_be_bytes());
        out.extend_from_slice(&table);
        out.extend(stream.into_byte_array());
        out.push(tail_length);
        out
    }

    fn decode(&self, block: &[u8]) -> Result<Vec<u8>> {
        if block.len() < TABLE_SIZE_BYTES + TAIL_BYTES {
            return Err(CodecError::corrupt(format!(
                "HFC block of {} bytes is too short",
                block.len()
            )));
        }
        let (head, rest) = block.split_at(TABLE_SIZE_BYTES);
        let mut size_bytes = [0_u8; TABLE_SIZE_BYTES];
        size_bytes.copy_from_slice(head);
        let table_size = u32::from_be_bytes(size_bytes) as usize;
        if table_size + TAIL_BYTES > rest.len() {
            return Err(CodecError::corrupt(format!(
                "HFC length table of {} bytes runs past the end of the block",
                table_size
            )));
        }

        let (table, rest) = rest.split_at(table_size);
        let (payload, tail) = rest.split_at(rest.len() - TAIL_BYTES);
        let tail_length = tail[0];
        if tail_length >= BYTE_SIZE || (payload.is_empty() && tail_length != 0) {
            return Err(CodecError::corrupt(format!(
                "invalid HFC tail length {}",
                tail_length
            )));
        }

        let lengths = CanonicalHuffmanTree::lengths_from_bytes(&RlePackBits.decode(table)?)?;
        let tree = CanonicalHuffmanTree::from_lengths(lengths)?;
        let reader = BitReader::new(payload).drop_last(tail_length as usize);
        tree.decode_bits(reader)
    }
}
