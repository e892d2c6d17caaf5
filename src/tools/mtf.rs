use super::freq_count::BYTE_CAPACITY;
use crate::compression::transform::Transform;
use crate::error::Result;

/// Move To Front transform over the full byte alphabet.
///
/// Each block starts from the ascending index [0, 1, .. 255]; nothing carries over between blocks.
#[derive(Debug, Clone, Copy, Default)]
pub struct Mtf;

/// The starting index every block uses.
fn initial_index() -> [u8; BYTE_CAPACITY] {
    let mut index = [0_u8; BYTE_CAPACITY];
    index
        .iter_mut()
        .enumerate()
        .for_each(|(i, slot)| *slot = i as u8);
    index
}

/// Move the symbol at `idx` to the front, shifting everything in front of it back by one.
#[inline]
fn move_to_front(index: &mut [u8; BYTE_CAPACITY], idx: usize) {
    let temp_sym = index[idx];
    index.copy_within(0..idx, 1);
    index[0] = temp_sym;
}

impl Transform for Mtf {
    fn encode(&self, block: &[u8]) -> Vec<u8> {
        let mut index = initial_index();
        let mut out = Vec::with_capacity(block.len());
        for &byte in block {
            // Every byte value is in the index, so the search always succeeds.
            let idx = index.iter().position(|&c| c == byte).unwrap_or_default();
            out.push(idx as u8);
            move_to_front(&mut index, idx);
        }
        out
    }

    fn decode(&self, block: &[u8]) -> Result<Vec<u8>> {
        let mut index = initial_index();
        let mut out = Vec::with_capacity(block.len());
        for &idx in block {
            out.push(index[idx as usize]);
            move_to_front(&mut index, idx as usize);
        }
        Ok(out)
    }
}

#[cfg(test)]
mod test {
    use super::Mtf;
    use crate::compression::transform::Transform;

    #[test]
    fn simple_encode() {
        let output = Mtf.encode(b"Baa baa");
        assert_eq!(output, vec![66, 97, 0, 34, 98, 2, 0]);
        assert_eq!(Mtf.decode(&output).unwrap(), b"Baa baa".to_vec());
    }

    #[test]
    fn mtf_encode_from_book() {
        // Same clustering pattern as the classic textbook example, over the full alphabet.
        let input = b"bbyaeeeeeeafeeeybzzzzzzzzzyz";
        let output = Mtf.encode(input);
        assert_eq!(
            output,
            vec![
                98, 0, 121, 99, 102, 0, 0, 0, 0, 0, 1, 103, 2, 0, 0, 3, 4, 122, 0, 0, 0, 0, 0, 0,
                0, 0, 2, 1
            ]
        );
        assert_eq!(Mtf.decode(&output).unwrap(), input.to_vec());
    }

    #[test]
    fn runs_become_zeros_test() {
        let output = Mtf.encode(&[7, 7, 7, 7, 0, 0]);
        assert_eq!(output, vec![7, 0, 0, 0, 1, 0]);
    }

    #[test]
    fn full_alphabet_test() {
        let input: Vec<u8> = (0..=255).rev().collect();
        let output = Mtf.encode(&input);
        // Each byte is found at the end of the list in turn.
        assert!(output.iter().all(|&x| x == 255));
        assert_eq!(Mtf.decode(&output).unwrap(), input);
    }

    #[test]
    fn empty_test() {
        assert!(Mtf.encode(&[]).is_empty());
        assert!(Mtf.decode(&[]).unwrap().is_empty());
    }
}
