/// Growable bit sequence, packed MSB-first into bytes.
///
/// Holds Huffman codes and the flattened tree header, both of which are built
/// one bit at a time and written out in the same order.
#[derive(Default, Debug, Clone, PartialEq, Eq)]
pub struct BitVec {
    bits: Vec<u8>,
    bit_count: usize,
}

impl BitVec {
    pub fn new() -> Self {
        BitVec {
            bits: Vec::new(),
            bit_count: 0,
        }
    }

    pub fn len(&self) -> usize {
        self.bit_count
    }

    pub fn is_empty(&self) -> bool {
        self.bit_count == 0
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bits
    }

    pub fn push_bit(&mut self, bit: bool) {
        let byte_index = self.bit_count / 8;
        let bit_offset = self.bit_count % 8;

        if byte_index >= self.bits.len() {
            self.bits.push(0);
        }

        if bit {
            self.bits[byte_index] |= 1 << (7 - bit_offset);
        }

        self.bit_count += 1;
    }

    /// Append the low `bit_length` bits of `value`, most significant first.
    pub fn push_bits(&mut self, value: u32, bit_length: usize) {
        for bit_pos in (0..bit_length).rev() {
            let bit = (value >> bit_pos) & 1;
            self.push_bit(bit != 0);
        }
    }

    pub fn pop_bit(&mut self) -> Option<bool> {
        if self.bit_count == 0 {
            return None;
        }
        let bit = self.get(self.bit_count - 1)?;
        self.bit_count -= 1;

        // clear the slot so a later push starts from zero
        let byte_index = self.bit_count / 8;
        self.bits[byte_index] &= !(1 << (7 - self.bit_count % 8));
        if self.bit_count % 8 == 0 {
            self.bits.truncate(byte_index);
        }
        Some(bit)
    }

    pub fn get(&self, index: usize) -> Option<bool> {
        if index >= self.bit_count {
            return None;
        }
        Some((self.bits[index / 8] >> (7 - index % 8)) & 1 == 1)
    }

    pub fn iter(&self) -> impl Iterator<Item = bool> + '_ {
        (0..self.bit_count).filter_map(move |i| self.get(i))
    }
}

impl std::fmt::Display for BitVec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for bit in self.iter() {
            f.write_str(if bit { "1" } else { "0" })?;
        }
        Ok(())
    }
}

impl From<&str> for BitVec {
    /// Builds a bit sequence from a string of '0' and '1'; other characters are skipped.
    fn from(text: &str) -> Self {
        let mut bits = BitVec::new();
        for c in text.chars() {
            match c {
                '0' => bits.push_bit(false),
                '1' => bits.push_bit(true),
                _ => {}
            }
        }
        bits
    }
}
