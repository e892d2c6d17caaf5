use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;

use log::{debug, info};

use super::{read_full, Packager, FRAME_HEADER_SIZE};
use crate::error::Result;

impl Packager {
    /// Encode everything `reader` yields into frames written to `writer`. Returns the number of
    /// blocks written.
    pub fn encode_stream<R: Read, W: Write>(&self, reader: &mut R, writer: &mut W) -> Result<u64> {
        let mut buf = vec![0_u8; self.block_size];
        let mut blocks = 0_u64;
        let mut bytes_in = 0_u64;
        let mut bytes_out = 0_u64;

        loop {
            let n = read_full(reader, &mut buf)?;
            if n == 0 {
                break;
            }
            let encoded = self.transform.encode(&buf[..n]);
            writer.write_all(&(encoded.len() as u32).to_be_bytes())?;
            writer.write_all(&encoded)?;

            info!("Block {}: {} bytes encoded to {}.", blocks, n, encoded.len());
            blocks += 1;
            bytes_in += n as u64;
            bytes_out += (encoded.len() + FRAME_HEADER_SIZE) as u64;
            if n < buf.len() {
                break;
            }
        }
        writer.flush()?;
        debug!(
            "Encoded {} blocks, {} bytes in, {} bytes out.",
            blocks, bytes_in, bytes_out
        );
        Ok(blocks)
    }

    /// Encode the file at `path_in` into a new file at `path_out`.
    pub fn encode<P: AsRef<Path>, Q: AsRef<Path>>(&self, path_in: P, path_out: Q) -> Result<u64> {
        let mut fin = BufReader::new(File::open(path_in.as_ref())?);
        let mut fout = BufWriter::new(File::create(path_out.as_ref())?);
        info!(
            "Encoding {} to {}.",
            path_in.as_ref().display(),
            path_out.as_ref().display()
        );
        self.encode_stream(&mut fin, &mut fout)
    }
}

#[cfg(test)]
mod test {
    use crate::compression::transform::{Id, Transform};
    use crate::compression::Packager;
    use crate::error::Result;

    /// Reverses each block, so the frames show where the block boundaries fell.
    struct Reverse;

    impl Transform for Reverse {
        fn encode(&self, block: &[u8]) -> Vec<u8> {
            block.iter().rev().copied().collect()
        }
        fn decode(&self, block: &[u8]) -> Result<Vec<u8>> {
            Ok(self.encode(block))
        }
    }

    #[test]
    fn frame_layout_test() {
        let mut out = Vec::new();
        let blocks = Packager::new(Reverse, 3)
            .encode_stream(&mut &b"abcdefg"[..], &mut out)
            .unwrap();
        assert_eq!(blocks, 3);
        assert_eq!(
            out,
            vec![0, 0, 0, 3, b'c', b'b', b'a', 0, 0, 0, 3, b'f', b'e', b'd', 0, 0, 0, 1, b'g']
        );
    }

    #[test]
    fn exact_multiple_of_block_size_test() {
        let mut out = Vec::new();
        let blocks = Packager::new(Id, 2)
            .encode_stream(&mut &b"abcd"[..], &mut out)
            .unwrap();
        assert_eq!(blocks, 2);
        assert_eq!(out, vec![0, 0, 0, 2, b'a', b'b', 0, 0, 0, 2, b'c', b'd']);
    }

    #[test]
    fn empty_input_test() {
        let mut out = Vec::new();
        let blocks = Packager::new(Id, 16)
            .encode_stream(&mut &b""[..], &mut out)
            .unwrap();
        assert_eq!(blocks, 0);
        assert!(out.is_empty());
    }
}
