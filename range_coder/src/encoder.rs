// range_coder/src/encoder.rs

//! Symbols to bits.

use crate::bits::Bits;
use crate::error::{Error, Result};
use crate::interval::{CandidateTable, RangeState, Shift, Target, QUARTER};
use crate::model::ProbabilityModel;

const INITIAL_OUTPUT_CAPACITY: usize = 1024;

/// Encoder-side state: the working interval plus the bits emitted so far.
struct Encoder {
    range: RangeState,
    bits_to_follow: usize,
    output: Bits,
}

/// Encodes `symbols` against `model`, ending the stream with the terminator.
///
/// Every position `i` is coded with the model queried at `symbols[..i]`; one
/// extra step codes the terminator, which must have a non-zero weight there.
///
/// # Errors
///
/// * [`Error::SymbolOutOfRange`] if the model maps a symbol outside its alphabet.
/// * [`Error::ModelContractViolation`] if the model returns an invalid weight.
/// * [`Error::UndecodableSequence`] if a symbol or the final terminator has no
///   codable interval.
///
/// # Examples
///
/// ```
/// use range_coder::{decode, encode, StaticModel};
///
/// let model = StaticModel::new([('A', 3.0), ('B', 1.0)], 1.0);
/// let bits = encode(&['A', 'A', 'B'], &model).unwrap();
/// assert_eq!(decode(&bits, &model).unwrap(), ['A', 'A', 'B']);
/// ```
#[tracing::instrument(skip_all, fields(symbols = symbols.len()))]
pub fn encode<M: ProbabilityModel + ?Sized>(symbols: &[M::Symbol], model: &M) -> Result<Bits> {
    let count = model.symbol_count();
    let mut encoder = Encoder::new();

    for position in 0..=symbols.len() {
        let target = match symbols.get(position) {
            Some(symbol) => {
                let index = model.to_index(symbol);
                if index >= count {
                    return Err(Error::SymbolOutOfRange { index, count });
                }
                Target::Symbol(index)
            }
            None => Target::Terminator,
        };
        let table = CandidateTable::build(model, &symbols[..position])?;
        encoder.encode_step(&table, target, position)?;
    }

    let bits = encoder.finish();
    tracing::debug!(symbols = symbols.len(), bits = bits.len(), "encoded sequence");
    Ok(bits)
}

impl Encoder {
    fn new() -> Self {
        Encoder {
            range: RangeState::new(),
            bits_to_follow: 0,
            output: Bits::with_capacity(INITIAL_OUTPUT_CAPACITY),
        }
    }

    /// Narrows to `target`'s interval and emits every bit that settles.
    fn encode_step(&mut self, table: &CandidateTable, target: Target, position: usize) -> Result<()> {
        let width = self.range.width();
        let (low, high) = table
            .find(target)
            .map(|candidate| candidate.span(width))
            .filter(|(low, high)| low < high)
            .ok_or(Error::UndecodableSequence { position, target })?;

        self.range.narrow(low, high);
        while let Some(shift) = self.range.shift() {
            match shift {
                Shift::Settled(bit) => self.output_bit(bit),
                Shift::Straddle => self.bits_to_follow += 1,
            }
        }

        tracing::trace!(
            position,
            %target,
            min = self.range.min(),
            max = self.range.max(),
            pending = self.bits_to_follow,
            "coded step"
        );
        Ok(())
    }

    /// Emits a settled bit, then the opposite bit for every pending straddle.
    fn output_bit(&mut self, bit: bool) {
        self.output.push(bit);
        self.output
            .extend(std::iter::repeat(!bit).take(self.bits_to_follow));
        self.bits_to_follow = 0;
    }

    /// Emits enough bits to single out a point inside the final interval.
    ///
    /// After renormalization the interval contains either `0x4000_0000` (when
    /// `min` is below the first quarter) or `0x8000_0000`; two more bits plus
    /// the pending ones select it, and the decoder's zero padding fills in the
    /// rest.
    fn finish(mut self) -> Bits {
        self.bits_to_follow += 1;
        self.output_bit(self.range.min() & QUARTER != 0);
        self.output
    }
}
