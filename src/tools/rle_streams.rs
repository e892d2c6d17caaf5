//! Run Length Encoding with separate flag and symbol streams.
//!
//! The symbol stream carries literal bytes and, for every run of three or more, the run's byte
//! followed by the run length in big endian with leading zero bytes dropped. The flag stream holds
//! one flag per symbol: false for a literal, true for a byte of a run length field.
//!
//! Flags are packed as fixed width units (4 bits by default): a unit of value n > 0 stands for n
//! literal flags, a unit of 0 for a single run length flag. The packed flags are prefixed with the
//! unpacked flag count.
//!
//! Block layout: `[flag section length: u32 BE][flag count: u32 BE][packed flags][symbols]`.

use super::rle_packbits::run_length;
use crate::bitstream::bitpacker::{BitStream, BYTE_SIZE};
use crate::bitstream::bitreader::BitReader;
use crate::compression::transform::Transform;
use crate::compression::MAX_BLOCK_SIZE;
use crate::error::{CodecError, Result};

/// Width of the length prefixes.
const HEADER_SIZE: usize = 4;
/// Default width in bits of a packed flag unit.
pub const FLAG_BLOCK_SIZE: u8 = 4;
const MAX_FLAG_BLOCK_SIZE: u8 = 16;
/// Widest run length field the decoder accepts.
const MAX_COUNT_BYTES: usize = 8;
const MIN_RUN: usize = 3;

#[derive(Debug, Clone, Copy)]
pub struct RleStreams {
    flag_width: u8,
}

impl RleStreams {
    pub fn new() -> Self {
        Self::with_flag_width(FLAG_BLOCK_SIZE)
    }

    /// Use flag units of `width` bits (clamped to 1..=16).
    pub fn with_flag_width(width: u8) -> Self {
        Self {
            flag_width: width.clamp(1, MAX_FLAG_BLOCK_SIZE),
        }
    }

    pub fn flag_width(&self) -> u8 {
        self.flag_width
    }

    /// Pack the flags into `[flag count][units]`.
    fn compress_flags(&self, flags: &[bool]) -> Vec<u8> {
        let max_block = (1_usize << self.flag_width) - 1;
        let mut packed = BitStream::with_capacity(self.flag_width, flags.len() / 2 + 1);
        let mut idx = 0;
        while idx < flags.len() {
            let flag = flags[idx];
            let run = flags[idx..].iter().take_while(|&&f| f == flag).count();
            if flag {
                (0..run).for_each(|_| packed.append_unit(0));
            } else {
                let mut count = run;
                while count > 0 {
                    let sub_count = count.min(max_block);
                    packed.append_unit(sub_count as u32);
                    count -= sub_count;
                }
            }
            idx += run;
        }

        let mut out = Vec::with_capacity(HEADER_SIZE + packed.len() / 8 + 1);
        out.extend_from_slice(&(flags.len() as u32).to_be_bytes());
        out.extend(packed.into_byte_array());
        out
    }

    /// Unpack a flag section written by `compress_flags`.
    fn uncompress_flags(&self, section: &[u8]) -> Result<Vec<bool>> {
        let (count, packed) = split_header(section, "flag count")?;
        let length = count as usize;
        let mut reader = BitReader::new(packed);

        // Every flag takes at least one packed bit.
        let mut flags = Vec::with_capacity(length.min(packed.len() * BYTE_SIZE as usize));
        while flags.len() < length {
            let unit = reader.bint(self.flag_width as usize).ok_or_else(|| {
                CodecError::corrupt(format!(
                    "flag stream ends at {} after {} flags, expected {}",
                    reader.loc(),
                    flags.len(),
                    length
                ))
            })?;
            if unit == 0 {
                flags.push(true);
            } else {
                flags.resize(flags.len() + unit, false);
            }
        }
        flags.truncate(length);
        Ok(flags)
    }
}

impl Default for RleStreams {
    fn default() -> Self {
        Self::new()
    }
}

/// Read a u32 BE prefix, returning it and the rest of the data.
fn split_header<'a>(data: &'a [u8], what: &str) -> Result<(u32, &'a [u8])> {
    if data.len() < HEADER_SIZE {
        return Err(CodecError::corrupt(format!("missing {} header", what)));
    }
    let (head, rest) = data.split_at(HEADER_SIZE);
    let mut bytes = [0_u8; HEADER_SIZE];
    bytes.copy_from_slice(head);
    Ok((u32::from_be_bytes(bytes), rest))
}

/// Frame the flag section and the symbol stream into one block.
fn join_streams(flags: &[u8], symbols: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(HEADER_SIZE + flags.len() + symbols.len());
    out.extend_from_slice(&(flags.len() as u32).to_be_bytes());
    out.extend_from_slice(flags);
    out.extend_from_slice(symbols);
    out
}

/// Split a block into its flag section and symbol stream.
fn split_streams(block: &[u8]) -> Result<(&[u8], &[u8])> {
    let (flags_length, rest) = split_header(block, "flag section length")?;
    let flags_length = flags_length as usize;
    if flags_length > rest.len() {
        return Err(CodecError::corrupt(format!(
            "flag section of {} bytes exceeds the {} bytes left",
            flags_length,
            rest.len()
        )));
    }
    Ok(rest.split_at(flags_length))
}

impl Transform for RleStreams {
    fn encode(&self, block: &[u8]) -> Vec<u8> {
        let mut flags: Vec<bool> = Vec::with_capacity(block.len());
        let mut symbols: Vec<u8> = Vec::with_capacity(block.len());
        let mut idx = 0;

        while idx < block.len() {
            let byte = block[idx];
            let run = run_length(block, idx).min(MAX_BLOCK_SIZE);
            if run >= MIN_RUN {
                flags.push(false);
                symbols.push(byte);
                let count = (run as u64).to_be_bytes();
                let first = count.iter().position(|&b| b != 0).unwrap_or(count.len() - 1);
                for &count_byte in &count[first..] {
                    flags.push(true);
                    symbols.push(count_byte);
                }
            } else {
                flags.resize(flags.len() + run, false);
                symbols.resize(symbols.len() + run, byte);
            }
            idx += run;
        }

        join_streams(&self.compress_flags(&flags), &symbols)
    }

    fn decode(&self, block: &[u8]) -> Result<Vec<u8>> {
        let (flag_section, symbols) = split_streams(block)?;
        let flags = self.uncompress_flags(flag_section)?;
        if flags.len() != symbols.len() {
            return Err(CodecError::corrupt(format!(
                "{} flags for {} symbols",
                flags.len(),
                symbols.len()
            )));
        }

        let mut out = Vec::with_capacity(symbols.len() * 2);
        let mut idx = 0;
        while idx < flags.len() {
            if !flags[idx] {
                out.push(symbols[idx]);
                idx += 1;
                continue;
            }
            // A run length field: every consecutive true flag.
            let end = idx + flags[idx..].iter().take_while(|&&f| f).count();
            let field = &symbols[idx..end];
            if field.len() > MAX_COUNT_BYTES {
                return Err(CodecError::corrupt("run length field is too wide"));
            }
            let count = field.iter().fold(0_u64, |acc, &b| (acc << 8) | b as u64);
            if count < MIN_RUN as u64 || count > MAX_BLOCK_SIZE as u64 {
                return Err(CodecError::corrupt(format!("invalid run length {}", count)));
            }
            let last = *out
                .last()
                .ok_or_else(|| CodecError::corrupt("run length with no byte to repeat"))?;
            // The run's byte was already written as a literal.
            out.resize(out.len() + count as usize - 1, last);
            idx = end;
        }
        Ok(out)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn encode_layout_test() {
        let encoded = RleStreams::new().encode(b"aaaaaa");
        // Flags [lit, count] pack to units 1 and 0.
        assert_eq!(encoded, vec![0, 0, 0, 5, 0, 0, 0, 2, 0b0001_0000, b'a', 6]);
        assert_eq!(RleStreams::new().decode(&encoded).unwrap(), b"aaaaaa".to_vec());
    }

    #[test]
    fn join_split_streams_test() {
        let flags = [1_u8, 2, 3];
        let symbols = [9_u8; 40];
        let joined = join_streams(&flags, &symbols);
        assert_eq!(&joined[..4], &[0, 0, 0, 3]);
        let (f, s) = split_streams(&joined).unwrap();
        assert_eq!(f, &flags);
        assert_eq!(s, &symbols);
    }

    #[test]
    fn flag_stream_round_trip_test() {
        let patterns: Vec<Vec<bool>> = vec![
            vec![],
            vec![true],
            vec![false],
            vec![false; 31],
            vec![true; 9],
            (0..1997).map(|i| i % 3 == 0 || i % 7 == 0).collect(),
            (0..200).map(|i| (i / 20) % 2 == 1).collect(),
        ];
        for width in [1, 3, 4, 8, 13] {
            let rle = RleStreams::with_flag_width(width);
            for flags in &patterns {
                let packed = rle.compress_flags(flags);
                assert_eq!(&rle.uncompress_flags(&packed).unwrap(), flags);
            }
        }
    }

    #[test]
    fn long_literal_flag_runs_are_split_test() {
        let rle = RleStreams::new();
        // 16 literal flags need a unit of 15 and a unit of 1.
        let packed = rle.compress_flags(&[false; 16]);
        assert_eq!(packed, vec![0, 0, 0, 16, 0b1111_0001]);
    }

    #[test]
    fn round_trip_test() {
        let mut long = b"cskjhfkjslakjhdfl".to_vec();
        long.extend(vec![b'd'; 27]);
        long.extend_from_slice(b"lkjhkjhadlkcfj");
        long.extend(vec![b'y'; 513]);
        long.extend_from_slice(b"dksj");
        let inputs: Vec<Vec<u8>> = vec![
            b"aaaaaa".to_vec(),
            b"aaabbcccccccadd".to_vec(),
            vec![0; 70_000],
            long,
        ];
        for width in [2, 4, 7] {
            let rle = RleStreams::with_flag_width(width);
            for input in &inputs {
                let encoded = rle.encode(input);
                assert_eq!(&rle.decode(&encoded).unwrap(), input);
            }
        }
    }

    #[test]
    fn multi_byte_count_test() {
        let input = vec![b'y'; 513];
        let encoded = RleStreams::new().encode(&input);
        // Symbols: the byte, then 513 as [0x02, 0x01].
        assert_eq!(&encoded[encoded.len() - 3..], &[b'y', 2, 1]);
    }

    #[test]
    fn empty_test() {
        let encoded = RleStreams::new().encode(&[]);
        assert_eq!(encoded, vec![0, 0, 0, 4, 0, 0, 0, 0]);
        assert!(RleStreams::new().decode(&encoded).unwrap().is_empty());
    }

    #[test]
    fn corrupt_input_test() {
        let rle = RleStreams::new();
        assert!(rle.decode(&[]).is_err());
        assert!(rle.decode(&[0, 0, 0, 9, 0, 0]).is_err());
        // Two flags announced, but only one symbol.
        assert!(rle.decode(&[0, 0, 0, 5, 0, 0, 0, 2, 0b0010_0000, b'a']).is_err());
        // A run length field with nothing before it.
        assert!(rle.decode(&[0, 0, 0, 5, 0, 0, 0, 1, 0b0000_0000, 4]).is_err());
        // Flags claim more units than the packed bits hold.
        assert!(rle.decode(&[0, 0, 0, 5, 0xff, 0xff, 0xff, 0xff, 0x10, b'a']).is_err());
    }

    #[test]
    fn run_length_bounds_test() {
        let rle = RleStreams::new();
        // A four byte count of 0x10000000 would expand one byte to 256 MiB.
        let block = [0, 0, 0, 7, 0, 0, 0, 5, 0x10, 0, 0, b'a', 0x10, 0, 0, 0];
        assert!(matches!(rle.decode(&block), Err(CodecError::CorruptData(_))));
        // Runs shorter than MIN_RUN are never written as a count.
        assert!(rle.decode(&[0, 0, 0, 5, 0, 0, 0, 2, 0x10, b'a', 2]).is_err());
        assert_eq!(
            rle.decode(&[0, 0, 0, 5, 0, 0, 0, 2, 0x10, b'a', 3]).unwrap(),
            b"aaa".to_vec()
        );
        // One past the largest block a Packager produces.
        let mut block = vec![0, 0, 0, 6, 0, 0, 0, 5, 0x10, 0, b'a'];
        block.extend_from_slice(&(MAX_BLOCK_SIZE as u32 + 1).to_be_bytes());
        assert!(rle.decode(&block).is_err());
    }

    #[test]
    fn flag_width_is_clamped_test() {
        assert_eq!(RleStreams::with_flag_width(0).flag_width(), 1);
        assert_eq!(RleStreams::with_flag_width(40).flag_width(), 16);
    }
}
