use std::cmp::Ordering;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

use log::trace;

use super::rotation_doubling::doubling_sort;
use crate::compression::transform::Transform;
use crate::error::{CodecError, Result};
use crate::tools::freq_count::{freqs, BYTE_CAPACITY};

/// Width of the origin pointer written ahead of the last column.
pub const ORIGIN_PTR_SIZE: usize = 4;

/// Algorithm used to order the rotations of a block. Both give the same order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RotationSort {
    /// Comparison sort of whole rotations. Slow on highly repetitive blocks.
    Simple,
    /// Prefix doubling over rotation ranks.
    #[default]
    Doubling,
}

impl Display for RotationSort {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}", self)
    }
}

impl FromStr for RotationSort {
    type Err = CodecError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "simple" => Ok(RotationSort::Simple),
            "doubling" => Ok(RotationSort::Doubling),
            other => Err(CodecError::InvalidOption(format!(
                "unknown rotation sort '{}'",
                other
            ))),
        }
    }
}

/// Burrows-Wheeler Transform.
///
/// Encoded layout: `[origin pointer: u32 BE][last column]`, where the origin pointer is the
/// sorted position of the rotation starting at the first byte of the block.
#[derive(Debug, Clone, Copy, Default)]
pub struct Bwt {
    sort: RotationSort,
}

impl Bwt {
    pub fn new(sort: RotationSort) -> Self {
        Self { sort }
    }

    pub fn sort(&self) -> RotationSort {
        self.sort
    }
}

/// Compare the rotations of `block` starting at `a` and `b`, wrapping around the block end.
pub fn rotation_cmp(block: &[u8], a: usize, b: usize) -> Ordering {
    let n = block.len();
    let mut done = 0;
    while done < n {
        let ra = (a + done) % n;
        let rb = (b + done) % n;
        // Compare the longest stretch where neither rotation wraps.
        let stretch = (n - ra).min(n - rb).min(n - done);
        let result = block[ra..ra + stretch].cmp(&block[rb..rb + stretch]);
        if result != Ordering::Equal {
            return result;
        }
        done += stretch;
    }
    Ordering::Equal
}

/// Order all rotations by comparing them in full. Equal rotations keep index order.
pub fn simple_sort(block: &[u8]) -> Vec<u32> {
    let mut index = (0_u32..block.len() as u32).collect::<Vec<u32>>();
    index.sort_unstable_by(|&a, &b| {
        rotation_cmp(block, a as usize, b as usize).then(a.cmp(&b))
    });
    index
}

impl Transform for Bwt {
    fn encode(&self, block: &[u8]) -> Vec<u8> {
        let end = block.len();
        let mut out = vec![0_u8; ORIGIN_PTR_SIZE];
        if end == 0 {
            return out;
        }

        let index = match self.sort {
            RotationSort::Simple => simple_sort(block),
            RotationSort::Doubling => doubling_sort(block),
        };

        // Get key and BWT output
        out.reserve(end);
        let mut key = 0_u32;
        for (i, &rot) in index.iter().enumerate() {
            if rot == 0 {
                key = i as u32;
                out.push(block[end - 1]);
            } else {
                out.push(block[rot as usize - 1]);
            }
        }
        out[..ORIGIN_PTR_SIZE].copy_from_slice(&key.to_be_bytes());
        trace!("BWT of {} bytes, origin pointer {}", end, key);
        out
    }

    fn decode(&self, block: &[u8]) -> Result<Vec<u8>> {
        if block.len() < ORIGIN_PTR_SIZE {
            return Err(CodecError::corrupt("BWT block is missing its origin pointer"));
        }
        let (head, bwt_in) = block.split_at(ORIGIN_PTR_SIZE);
        let mut key_bytes = [0_u8; ORIGIN_PTR_SIZE];
        key_bytes.copy_from_slice(head);
        let key = u32::from_be_bytes(key_bytes) as usize;

        let end = bwt_in.len();
        if end == 0 && key == 0 {
            return Ok(Vec::new());
        }
        if key >= end {
            return Err(CodecError::corrupt(format!(
                "BWT origin pointer {} is outside a block of {} bytes",
                key, end
            )));
        }

        // Convert frequency count to the first sorted position of every byte value
        let freq_in = freqs(bwt_in);
        let mut freq = [0_usize; BYTE_CAPACITY];
        for i in 0..BYTE_CAPACITY - 1 {
            freq[i + 1] = freq[i] + freq_in[i] as usize;
        }

        // Build the transformation vector to find the next character in the original data
        let mut t_vec = vec![0_u32; end];
        for (i, &s) in bwt_in.iter().enumerate() {
            t_vec[freq[s as usize]] = i as u32;
            freq[s as usize] += 1;
        }

        // Walk the vector from the origin, one output byte per step
        let mut out = Vec::with_capacity(end);
        let mut cur = key;
        for _ in 0..end {
            cur = t_vec[cur] as usize;
            out.push(bwt_in[cur]);
        }
        Ok(out)
    }
}
