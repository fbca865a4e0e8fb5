// range_coder/src/interval.rs

//! Fixed-point interval arithmetic shared by the encoder and decoder.
//!
//! The working interval is a pair of 32-bit registers over the code space
//! `[0, 2^32)`. Each step narrows it to the sub-interval of the coded entry and
//! then renormalizes one shift at a time. Both directions call the same
//! [`RangeState::shift`], so they agree on every shift point by construction.

use std::fmt;

use contracts::{debug_ensures, debug_requires};

use crate::error::Result;
use crate::model::{check_weight, ProbabilityModel};

/// Width of the range and code registers, in bits.
pub const CODE_BITS: u32 = 32;
const HALF: u32 = 1 << (CODE_BITS - 1);
pub(crate) const QUARTER: u32 = 1 << (CODE_BITS - 2);

/// An entry of a step's distribution: a real symbol or the terminator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Target {
    /// Symbol with the given model index.
    Symbol(usize),
    /// The virtual end-of-sequence symbol.
    Terminator,
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Target::Symbol(index) => write!(f, "symbol {}", index),
            Target::Terminator => write!(f, "terminator"),
        }
    }
}

/// Sub-interval `[start, end)` of `[0, 1)` assigned to one entry.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct Candidate {
    pub target: Target,
    pub start: f64,
    pub end: f64,
}

impl Candidate {
    /// Floored integer span `[low, high)` of the candidate inside a working
    /// interval `width` wide.
    pub fn span(&self, width: u64) -> (u64, u64) {
        let scale = width as f64;
        ((scale * self.start) as u64, (scale * self.end) as u64)
    }
}

/// The distribution of one step, in enumeration order.
///
/// Real symbols come first, from the highest index down to zero, and the
/// terminator takes the topmost interval. Entries with zero weight are left
/// out. Cumulative weights are summed in this same order, so adjacent entries
/// share their boundary exactly and the last entry ends at exactly `1.0`.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct CandidateTable {
    entries: Vec<Candidate>,
}

impl CandidateTable {
    /// Queries `model` at `context` and lays the weights out on `[0, 1)`.
    pub fn build<M: ProbabilityModel + ?Sized>(model: &M, context: &[M::Symbol]) -> Result<Self> {
        let count = model.symbol_count();
        let mut entries = Vec::with_capacity(count + 1);
        let mut total = 0.0;

        let mut push = |target: Target, weight: f64| -> Result<()> {
            let weight = check_weight(weight, target)?;
            if weight > 0.0 {
                let start = total;
                total += weight;
                entries.push(Candidate {
                    target,
                    start,
                    end: total,
                });
            }
            Ok(())
        };

        for index in (0..count).rev() {
            push(Target::Symbol(index), model.symbol_weight(context, index))?;
        }
        push(Target::Terminator, model.terminator_weight(context))?;

        for candidate in &mut entries {
            candidate.start /= total;
            candidate.end /= total;
        }
        Ok(Self { entries })
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn find(&self, target: Target) -> Option<&Candidate> {
        self.entries.iter().find(|c| c.target == target)
    }

    /// First candidate whose span contains `offset`, scanning in enumeration
    /// order.
    pub fn locate(&self, offset: u64, width: u64) -> Option<&Candidate> {
        self.entries.iter().find(|c| {
            let (low, high) = c.span(width);
            low <= offset && offset < high
        })
    }
}

/// One renormalization step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Shift {
    /// Both registers agreed on their top bit, which is now final.
    Settled(bool),
    /// The interval straddled the midpoint inside the middle half and was
    /// widened around it; its bit is decided by the next settled bit.
    Straddle,
}

/// The working interval `[min, max]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct RangeState {
    min: u32,
    max: u32,
}

impl RangeState {
    pub fn new() -> Self {
        Self {
            min: 0,
            max: u32::MAX,
        }
    }

    pub fn min(&self) -> u32 {
        self.min
    }

    pub fn max(&self) -> u32 {
        self.max
    }

    pub fn width(&self) -> u64 {
        u64::from(self.max) - u64::from(self.min) + 1
    }

    /// Narrows to the offsets `[low, high)` relative to `min`.
    #[debug_requires(low < high && high <= self.width())]
    #[debug_ensures(self.min <= self.max)]
    pub fn narrow(&mut self, low: u64, high: u64) {
        let base = u64::from(self.min);
        self.max = (base + high - 1) as u32;
        self.min = (base + low) as u32;
    }

    /// Performs a single renormalization shift, or returns `None` once the
    /// interval is wide enough.
    #[debug_ensures(self.min <= self.max)]
    pub fn shift(&mut self) -> Option<Shift> {
        if (self.min ^ self.max) & HALF == 0 {
            let bit = self.min & HALF != 0;
            self.min <<= 1;
            self.max = (self.max << 1) | 1;
            Some(Shift::Settled(bit))
        } else if self.min & QUARTER != 0 && self.max & QUARTER == 0 {
            // Subtract a quarter from both ends, then double.
            self.min = (self.min << 1) & (HALF - 1);
            self.max = (self.max << 1) | HALF | 1;
            Some(Shift::Straddle)
        } else {
            None
        }
    }
}
