/*
PackBits style Run Length Encoder.

The block is split into packets, each starting with a signed counter byte n:
  1..=127   the next n bytes are literals, copied as they are
  -128..=-1 the next single byte is repeated -n times

Runs of three or more identical bytes become repeat packets (split every 128 bytes). Runs of one
or two bytes are gathered into literal packets (split every 127 bytes). A counter of 0 is never
written.
*/

use crate::compression::transform::Transform;
use crate::error::{CodecError, Result};

const MAX_REPEAT: usize = 128;
const MAX_LITERAL: usize = 127;
/// Runs longer than this are worth a repeat packet.
const MIN_REPEAT: usize = 3;

#[derive(Debug, Clone, Copy, Default)]
pub struct RlePackBits;

/// Count how many bytes starting at `start` are equal to `data[start]`.
pub(crate) fn run_length(data: &[u8], start: usize) -> usize {
    let compare = data[start];
    data[start..].iter().take_while(|&&x| x == compare).count()
}

/// Write pending literals as packets of at most 127 bytes.
fn flush_literals(out: &mut Vec<u8>, literals: &[u8]) {
    for chunk in literals.chunks(MAX_LITERAL) {
        out.push(chunk.len() as u8);
        out.extend_from_slice(chunk);
    }
}

impl Transform for RlePackBits {
    fn encode(&self, block: &[u8]) -> Vec<u8> {
        let mut out = Vec::with_capacity(block.len() + block.len() / MAX_LITERAL + 1);
        // Start of the literals we skipped over and have not written yet.
        let mut skip_start = 0;
        let mut idx = 0;

        while idx < block.len() {
            let run = run_length(block, idx);
            if run >= MIN_REPEAT {
                flush_literals(&mut out, &block[skip_start..idx]);
                let mut times = run;
                while times > 0 {
                    let counter = times.min(MAX_REPEAT);
                    out.push((-(counter as i16)) as u8);
                    out.push(block[idx]);
                    times -= counter;
                }
                skip_start = idx + run;
            }
            idx += run;
        }
        flush_literals(&mut out, &block[skip_start..]);
        out
    }

    fn decode(&self, block: &[u8]) -> Result<Vec<u8>> {
        let mut out = Vec::with_capacity(block.len() * 2);
        let mut idx = 0;

        while idx < block.len() {
            let counter = block[idx] as i8;
            idx += 1;
            match counter {
                1..=i8::MAX => {
                    let end = idx + counter as usize;
                    let literals = block.get(idx..end).ok_or_else(|| {
                        CodecError::corrupt(format!(
                            "packbits literal packet at {} runs past the end of the block",
                            idx - 1
                        ))
                    })?;
                    out.extend_from_slice(literals);
                    idx = end;
                }
                i8::MIN..=-1 => {
                    let byte = *block.get(idx).ok_or_else(|| {
                        CodecError::corrupt("packbits repeat packet is missing its byte")
                    })?;
                    out.resize(out.len() + counter.unsigned_abs() as usize, byte);
                    idx += 1;
                }
                0 => {
                    return Err(CodecError::corrupt(format!(
                        "packbits counter of zero at {}",
                        idx - 1
                    )))
                }
            }
        }
        Ok(out)
    }
}
