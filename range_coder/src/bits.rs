// range_coder/src/bits.rs

//! Bit-sequence plumbing.
//!
//! Coded streams are plain `bitvec` sequences in emission order with no header
//! or padding. Callers that store them as bytes carry the bit count alongside.

use bitvec::prelude::*;

use crate::interval::CODE_BITS;

/// A coded stream: bits in emission order, most significant first.
pub type Bits = BitVec<u8, Msb0>;

/// Implicit zero bits the decoder may read past the end of a valid stream.
const MAX_PADDING: u32 = CODE_BITS;

/// Reads a stream bit by bit, yielding zeros past its end.
pub(crate) struct BitReader<'a> {
    bits: &'a BitSlice<u8, Msb0>,
    position: usize,
    padding: u32,
}

impl<'a> BitReader<'a> {
    pub fn new(bits: &'a BitSlice<u8, Msb0>) -> Self {
        Self {
            bits,
            position: 0,
            padding: 0,
        }
    }

    /// Returns the next bit, or `None` once the padding allowance is used up.
    ///
    /// A complete stream never needs more than `CODE_BITS` implicit zeros, so
    /// running past that means the stream is truncated or corrupt.
    pub fn next_bit(&mut self) -> Option<bool> {
        if self.position < self.bits.len() {
            let bit = self.bits[self.position];
            self.position += 1;
            Some(bit)
        } else if self.padding < MAX_PADDING {
            self.padding += 1;
            Some(false)
        } else {
            None
        }
    }
}

/// Packs a stream into bytes, zero-filling the last byte.
///
/// Returns the bytes and the bit count needed to [`unpack`] them.
pub fn pack(bits: &BitSlice<u8, Msb0>) -> (Vec<u8>, usize) {
    let len = bits.len();
    let mut bytes = vec![0u8; (len + 7) / 8];
    bytes.view_bits_mut::<Msb0>()[..len].copy_from_bitslice(bits);
    (bytes, len)
}

/// Restores a stream from bytes produced by [`pack`].
///
/// Returns `None` if `bit_count` exceeds the bits available in `bytes`.
pub fn unpack(bytes: &[u8], bit_count: usize) -> Option<Bits> {
    let bits = bytes.view_bits::<Msb0>();
    if bit_count > bits.len() {
        return None;
    }
    Some(bits[..bit_count].to_bitvec())
}
