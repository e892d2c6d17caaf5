use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;

use log::{debug, info, trace};

use super::{read_full, Packager, FRAME_HEADER_SIZE};
use crate::error::{CodecError, Result};

impl Packager {
    /// Decode the frames `reader` yields and write the restored blocks to `writer`. Stops at a
    /// clean end of input; a partial length prefix or a short payload is corrupt data. Returns
    /// the number of blocks decoded.
    pub fn decode_stream<R: Read, W: Write>(&self, reader: &mut R, writer: &mut W) -> Result<u64> {
        let mut blocks = 0_u64;
        let mut payload = Vec::new();

        loop {
            let mut prefix = [0_u8; FRAME_HEADER_SIZE];
            match read_full(reader, &mut prefix)? {
                0 => break,
                FRAME_HEADER_SIZE => {}
                n => {
                    return Err(CodecError::corrupt(format!(
                        "frame {} has a {} byte length prefix",
                        blocks, n
                    )))
                }
            }
            let length = u32::from_be_bytes(prefix) as usize;
            trace!("Frame {}: {} bytes.", blocks, length);

            payload.clear();
            let got = reader.by_ref().take(length as u64).read_to_end(&mut payload)?;
            if got < length {
                return Err(CodecError::corrupt(format!(
                    "frame {} is truncated: {} of {} bytes",
                    blocks, got, length
                )));
            }

            let decoded = self.transform.decode(&payload)?;
            writer.write_all(&decoded)?;
            info!("Block {}: {} bytes decoded to {}.", blocks, length, decoded.len());
            blocks += 1;
        }
        writer.flush()?;
        debug!("Decoded {} blocks.", blocks);
        Ok(blocks)
    }

    /// Decode the file at `path_in` into a new file at `path_out`.
    pub fn decode<P: AsRef<Path>, Q: AsRef<Path>>(&self, path_in: P, path_out: Q) -> Result<u64> {
        let mut fin = BufReader::new(File::open(path_in.as_ref())?);
        let mut fout = BufWriter::new(File::create(path_out.as_ref())?);
        info!(
            "Decoding {} to {}.",
            path_in.as_ref().display(),
            path_out.as_ref().display()
        );
        self.decode_stream(&mut fin, &mut fout)
    }
}
