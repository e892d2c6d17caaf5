use super::rle_packbits::run_length;
use crate::compression::transform::Transform;
use crate::error::{CodecError, Result};

/// Longest run a single (byte, byte, count) group can describe.
const MAX_GROUP: usize = u8::MAX as usize;

/// Run Length Encoding keyed on doubled bytes.
///
/// A lone byte is written as itself. A run of two or more identical bytes is written as the byte
/// twice followed by a counter holding the TOTAL length of the run (2..=255). Longer runs are
/// split into several groups; a remainder of one is written as a plain byte.
///
/// When decoding, two identical consecutive bytes mean the next byte is a counter.
#[derive(Debug, Clone, Copy, Default)]
pub struct RlePairs;

impl Transform for RlePairs {
    fn encode(&self, block: &[u8]) -> Vec<u8> {
        let mut out = Vec::with_capacity(block.len() + block.len() / 2);
        let mut idx = 0;
        while idx < block.len() {
            let byte = block[idx];
            let run = run_length(block, idx);
            let mut count = run;
            while count >= 2 {
                let group = count.min(MAX_GROUP);
                out.extend_from_slice(&[byte, byte, group as u8]);
                count -= group;
            }
            if count == 1 {
                out.push(byte);
            }
            idx += run;
        }
        out
    }

    fn decode(&self, block: &[u8]) -> Result<Vec<u8>> {
        let mut out = Vec::with_capacity(block.len() * 2);
        let mut prev: Option<u8> = None;
        let mut counter_next = false;

        for &byte in block {
            if counter_next {
                counter_next = false;
                if byte < 2 {
                    return Err(CodecError::corrupt(format!(
                        "pair counter of {} is below the doubled bytes",
                        byte
                    )));
                }
                // The first byte of the pair is already in the output.
                if let Some(&last) = out.last() {
                    out.resize(out.len() + byte as usize - 1, last);
                }
            } else if prev == Some(byte) {
                prev = None;
                counter_next = true;
            } else {
                prev = Some(byte);
                out.push(byte);
            }
        }
        if counter_next {
            return Err(CodecError::corrupt("block ends before the pair counter"));
        }
        Ok(out)
    }
}

#[cfg(test)]
mod test {
    use super::RlePairs;
    use crate::compression::transform::Transform;

    #[test]
    fn pairs_test() {
        let input = b"aaabcc";
        let encoded = RlePairs.encode(input);
        assert_eq!(encoded, vec![b'a', b'a', 3, b'b', b'c', b'c', 2]);
        assert_eq!(RlePairs.decode(&encoded).unwrap(), input.to_vec());
    }

    #[test]
    fn no_runs_test() {
        let input = b"abcabc";
        assert_eq!(RlePairs.encode(input), input.to_vec());
        assert_eq!(RlePairs.decode(input).unwrap(), input.to_vec());
    }

    #[test]
    fn long_runs_are_split_test() {
        let input = vec![b'x'; 300];
        let encoded = RlePairs.encode(&input);
        assert_eq!(encoded, vec![b'x', b'x', 255, b'x', b'x', 45]);
        assert_eq!(RlePairs.decode(&encoded).unwrap(), input);

        let input = vec![b'x'; 256];
        let encoded = RlePairs.encode(&input);
        assert_eq!(encoded, vec![b'x', b'x', 255, b'x']);
        assert_eq!(RlePairs.decode(&encoded).unwrap(), input);

        let mut input = vec![b'x'; 257];
        input.extend_from_slice(b"yy");
        let encoded = RlePairs.encode(&input);
        assert_eq!(encoded, vec![b'x', b'x', 255, b'x', b'x', 2, b'y', b'y', 2]);
        assert_eq!(RlePairs.decode(&encoded).unwrap(), input);
    }

    #[test]
    fn counter_equal_to_byte_test() {
        // The counter byte happens to equal the repeated byte.
        let input = vec![3_u8; 3];
        let encoded = RlePairs.encode(&input);
        assert_eq!(encoded, vec![3, 3, 3]);
        assert_eq!(RlePairs.decode(&encoded).unwrap(), input);

        let mut input = vec![5_u8; 5];
        input.extend_from_slice(&[5, 2, 2]);
        // Runs are maximal, so the 6 fives form one group.
        let encoded = RlePairs.encode(&input);
        assert_eq!(encoded, vec![5, 5, 6, 2, 2, 2]);
        assert_eq!(RlePairs.decode(&encoded).unwrap(), input);
    }

    #[test]
    fn empty_test() {
        assert!(RlePairs.encode(&[]).is_empty());
        assert!(RlePairs.decode(&[]).unwrap().is_empty());
    }

    #[test]
    fn corrupt_input_test() {
        assert!(RlePairs.decode(b"aa").is_err());
        assert!(RlePairs.decode(&[b'a', b'a', 1]).is_err());
    }
}
