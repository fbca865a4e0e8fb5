// range_coder/src/decoder.rs

//! Bits back to symbols, in lockstep with the encoder.

use bitvec::prelude::*;

use crate::bits::BitReader;
use crate::error::{Error, Result};
use crate::interval::{CandidateTable, RangeState, Shift, Target, CODE_BITS, QUARTER};
use crate::model::ProbabilityModel;

/// Decoder-side state: the same working interval as the encoder plus the
/// `code` register tracking where the stream points inside it.
struct Decoder<'a> {
    range: RangeState,
    code: u32,
    input: BitReader<'a>,
}

/// Decodes a stream produced by [`encode`](crate::encode) with the same model.
///
/// Symbols are decoded until the terminator is reached. Bits past the end of
/// `bits` read as zero.
///
/// # Errors
///
/// * [`Error::ModelContractViolation`] if the model returns an invalid weight.
/// * [`Error::UndecodableSequence`] if a step's distribution is empty.
/// * [`Error::StreamCorruption`] if the stream points outside every candidate
///   or runs out long before a terminator is found.
///
/// # Examples
///
/// ```
/// use range_coder::{decode, encode, AdaptiveCountModel};
///
/// let model = AdaptiveCountModel::bytes(1.0);
/// let bits = encode(b"mississippi", &model).unwrap();
/// assert_eq!(decode(&bits, &model).unwrap(), b"mississippi");
/// ```
#[tracing::instrument(skip_all, fields(bits = bits.len()))]
pub fn decode<M: ProbabilityModel + ?Sized>(
    bits: &BitSlice<u8, Msb0>,
    model: &M,
) -> Result<Vec<M::Symbol>> {
    let mut decoder = Decoder::new(bits)?;
    let mut output = Vec::new();

    loop {
        let table = CandidateTable::build(model, &output)?;
        match decoder.decode_step(&table, output.len())? {
            Target::Symbol(index) => output.push(model.to_symbol(index)),
            Target::Terminator => break,
        }
    }

    tracing::debug!(symbols = output.len(), bits = bits.len(), "decoded sequence");
    Ok(output)
}

impl<'a> Decoder<'a> {
    /// Seeds `code` with the first `CODE_BITS` bits of the stream.
    fn new(bits: &'a BitSlice<u8, Msb0>) -> Result<Self> {
        let mut decoder = Decoder {
            range: RangeState::new(),
            code: 0,
            input: BitReader::new(bits),
        };
        for _ in 0..CODE_BITS {
            decoder.code = (decoder.code << 1) | decoder.input_bit(0)?;
        }
        Ok(decoder)
    }

    fn input_bit(&mut self, position: usize) -> Result<u32> {
        self.input
            .next_bit()
            .map(u32::from)
            .ok_or(Error::StreamCorruption { position })
    }

    /// Finds the candidate the stream points into and, unless it is the
    /// terminator, narrows to it and consumes one bit per renormalization
    /// shift.
    fn decode_step(&mut self, table: &CandidateTable, position: usize) -> Result<Target> {
        if table.is_empty() {
            return Err(Error::UndecodableSequence {
                position,
                target: Target::Terminator,
            });
        }

        let width = self.range.width();
        let offset = u64::from(self.code.wrapping_sub(self.range.min()));
        let candidate = table
            .locate(offset, width)
            .ok_or(Error::StreamCorruption { position })?;
        if candidate.target == Target::Terminator {
            return Ok(Target::Terminator);
        }

        let (low, high) = candidate.span(width);
        self.range.narrow(low, high);
        while let Some(shift) = self.range.shift() {
            let bit = self.input_bit(position)?;
            self.code = match shift {
                Shift::Settled(_) => (self.code << 1) | bit,
                // Mirror the quarter the encoder subtracted.
                Shift::Straddle => ((self.code ^ QUARTER) << 1) | bit,
            };
        }

        tracing::trace!(
            position,
            target = %candidate.target,
            code = self.code,
            min = self.range.min(),
            max = self.range.max(),
            "decoded step"
        );
        Ok(candidate.target)
    }
}
