/// Number of distinct byte values.
pub const BYTE_CAPACITY: usize = 256;

/// Returns a frequency count of every byte value in the input data. Absent bytes count 0.
pub fn freqs(data: &[u8]) -> [u32; BYTE_CAPACITY] {
    let mut freqs = [0_u32; BYTE_CAPACITY];
    data.iter().for_each(|&el| freqs[el as usize] += 1);
    freqs
}

#[test]
fn freqs_test() {
    let f = freqs(b"abracadabra");
    assert_eq!(f[b'a' as usize], 5);
    assert_eq!(f[b'b' as usize], 2);
    assert_eq!(f[b'r' as usize], 2);
    assert_eq!(f[b'c' as usize], 1);
    assert_eq!(f[b'd' as usize], 1);
    assert_eq!(f.iter().sum::<u32>(), 11);
    assert_eq!(freqs(&[]), [0; BYTE_CAPACITY]);
}
