/// Width of a real byte, and the default unit width of a BitStream.
pub const BYTE_SIZE: u8 = 8;
/// Widest unit a BitStream will quantize to.
pub const MAX_UNIT_SIZE: u8 = 32;

/// Append-only bit accumulator.
///
/// Bits are packed most significant bit first. Whole bytes are moved out of the queue as soon as
/// they are complete, so the queue never holds more than 7 bits between calls. The unit size only
/// affects `append_unit`, `append_code` and `to_units`; the packed storage is the same for every
/// unit size, which makes regrouping (e.g. 4-bit units read back as bytes) free.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BitStream {
    /// Whole bytes packed so far.
    output: Vec<u8>,
    /// Private queue holding bits that are waiting to become a byte.
    queue: u64,
    /// Count of valid bits in the queue.
    q_bits: u8,
    /// Width in bits of one unit.
    unit_size: u8,
}

impl BitStream {
    /// Create an empty stream with the given unit size (clamped to 1..=32).
    pub fn new(unit_size: u8) -> Self {
        Self {
            output: Vec::new(),
            queue: 0,
            q_bits: 0,
            unit_size: unit_size.clamp(1, MAX_UNIT_SIZE),
        }
    }

    /// Create an empty stream, reserving room for `bytes` packed bytes.
    pub fn with_capacity(unit_size: u8, bytes: usize) -> Self {
        let mut stream = Self::new(unit_size);
        stream.output.reserve(bytes);
        stream
    }

    /// Wrap already packed bytes. Every bit of every byte counts as appended.
    pub fn from_bytes(bytes: &[u8], unit_size: u8) -> Self {
        let mut stream = Self::new(unit_size);
        stream.output.extend_from_slice(bytes);
        stream
    }

    /// Regroup the same bits into units of a different width.
    pub fn with_unit_size(mut self, unit_size: u8) -> Self {
        self.unit_size = unit_size.clamp(1, MAX_UNIT_SIZE);
        self
    }

    pub fn unit_size(&self) -> u8 {
        self.unit_size
    }

    /// Move every complete byte from the queue to the output buffer.
    fn write_stream(&mut self) {
        while self.q_bits > 7 {
            let byte = (self.queue >> (self.q_bits - 8)) as u8;
            self.output.push(byte);
            self.q_bits -= 8;
        }
    }

    /// Append the `depth` least significant bits of `data`, most significant of those first.
    pub fn append_bits(&mut self, data: u64, depth: u8) {
        if depth == 0 {
            return;
        }
        // Keep the queue from overflowing: feed wide values in two halves.
        if depth > 32 {
            self.append_bits(data >> 32, depth - 32);
            self.append_bits(data & 0xffff_ffff, 32);
            return;
        }
        let mask = (1_u64 << depth) - 1;
        self.queue = (self.queue << depth) | (data & mask);
        self.q_bits += depth;
        self.write_stream();
    }

    pub fn append_bit(&mut self, bit: bool) {
        self.append_bits(bit as u64, 1);
    }

    pub fn extend_bits<I: IntoIterator<Item = bool>>(&mut self, bits: I) {
        for bit in bits {
            self.append_bit(bit);
        }
    }

    /// Append exactly `unit_size` bits of `value`.
    pub fn append_unit(&mut self, value: u32) {
        self.append_bits(value as u64, self.unit_size);
    }

    /// Append `value` within the unit width with its leading zeros dropped. Zero is written as
    /// a single 0 bit.
    pub fn append_code(&mut self, value: u32) {
        let value = value as u64 & ((1_u64 << self.unit_size) - 1);
        let significant = (64 - value.leading_zeros()) as u8;
        self.append_bits(value, significant.max(1));
    }

    /// Total number of bits appended.
    pub fn len(&self) -> usize {
        self.output.len() * BYTE_SIZE as usize + self.q_bits as usize
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of zero bits `to_byte_array` appends to fill its last byte.
    pub fn padding(&self) -> u8 {
        (BYTE_SIZE - self.q_bits % BYTE_SIZE) % BYTE_SIZE
    }

    /// The packed bytes, with any pending bits padded on the right with zeros.
    pub fn to_byte_array(&self) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(self.output.len() + 1);
        bytes.extend_from_slice(&self.output);
        if self.q_bits > 0 {
            bytes.push((self.queue << (BYTE_SIZE - self.q_bits)) as u8);
        }
        bytes
    }

    /// Consume the stream and return the packed bytes, padding as `to_byte_array` does.
    pub fn into_byte_array(mut self) -> Vec<u8> {
        if self.q_bits > 0 {
            let byte = (self.queue << (BYTE_SIZE - self.q_bits)) as u8;
            self.output.push(byte);
        }
        self.output
    }

    /// The bits grouped into `unit_size` wide values, the last one padded on the right with zeros.
    pub fn to_units(&self) -> Vec<u32> {
        let unit = self.unit_size as usize;
        let mut units = Vec::with_capacity(self.len() / unit + 1);
        let mut acc = 0_u32;
        let mut count = 0;
        for bit in self.bits() {
            acc = (acc << 1) | bit as u32;
            count += 1;
            if count == unit {
                units.push(acc);
                acc = 0;
                count = 0;
            }
        }
        if count > 0 {
            units.push(acc << (unit - count));
        }
        units
    }

    /// The exact sequence of appended bits, without padding.
    pub fn bits(&self) -> impl Iterator<Item = bool> + '_ {
        let packed = self
            .output
            .iter()
            .flat_map(|&byte| (0..BYTE_SIZE).rev().map(move |i| (byte >> i) & 1 == 1));
        let pending = (0..self.q_bits)
            .rev()
            .map(move |i| (self.queue >> i) & 1 == 1);
        packed.chain(pending)
    }
}

impl Default for BitStream {
    fn default() -> Self {
        Self::new(BYTE_SIZE)
    }
}
