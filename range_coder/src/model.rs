// range_coder/src/model.rs

//! Probability models consumed by the coder.
//!
//! The coder never builds or adapts a model itself. It asks the model for one
//! weight per symbol and one for the terminator at every step, passing the
//! symbols coded so far as context. Encoder and decoder replay the same
//! contexts, so any model that is a pure function of its context round-trips.

use crate::error::{Error, Result};
use crate::interval::Target;

/// Sanity ceiling for a single weight.
///
/// Weights at or above this value are rejected so that a misbehaving adaptive
/// model cannot erode the precision of the interval arithmetic.
pub const MAX_WEIGHT: f64 = 100_000.0;

/// Supplies per-symbol weights given a causal context.
///
/// Weights are relative: the coder normalizes them by their sum at every step.
/// A weight of zero removes the entry from that step's distribution.
pub trait ProbabilityModel {
    /// Value type being coded.
    type Symbol;

    /// Alphabet size, excluding the terminator. Must not change during a call.
    fn symbol_count(&self) -> usize;

    /// Weight of the symbol at `index` after `context`.
    fn symbol_weight(&self, context: &[Self::Symbol], index: usize) -> f64;

    /// Weight of the end-of-sequence terminator after `context`.
    fn terminator_weight(&self, context: &[Self::Symbol]) -> f64;

    /// Maps a symbol to its index in `0..symbol_count()`.
    fn to_index(&self, symbol: &Self::Symbol) -> usize;

    /// Maps an index in `0..symbol_count()` back to its symbol.
    fn to_symbol(&self, index: usize) -> Self::Symbol;
}

impl<M: ProbabilityModel + ?Sized> ProbabilityModel for &M {
    type Symbol = M::Symbol;

    fn symbol_count(&self) -> usize {
        (**self).symbol_count()
    }

    fn symbol_weight(&self, context: &[Self::Symbol], index: usize) -> f64 {
        (**self).symbol_weight(context, index)
    }

    fn terminator_weight(&self, context: &[Self::Symbol]) -> f64 {
        (**self).terminator_weight(context)
    }

    fn to_index(&self, symbol: &Self::Symbol) -> usize {
        (**self).to_index(symbol)
    }

    fn to_symbol(&self, index: usize) -> Self::Symbol {
        (**self).to_symbol(index)
    }
}

impl<M: ProbabilityModel + ?Sized> ProbabilityModel for Box<M> {
    type Symbol = M::Symbol;

    fn symbol_count(&self) -> usize {
        (**self).symbol_count()
    }

    fn symbol_weight(&self, context: &[Self::Symbol], index: usize) -> f64 {
        (**self).symbol_weight(context, index)
    }

    fn terminator_weight(&self, context: &[Self::Symbol]) -> f64 {
        (**self).terminator_weight(context)
    }

    fn to_index(&self, symbol: &Self::Symbol) -> usize {
        (**self).to_index(symbol)
    }

    fn to_symbol(&self, index: usize) -> Self::Symbol {
        (**self).to_symbol(index)
    }
}

/// Checks a weight returned by a model against the contract.
pub(crate) fn check_weight(weight: f64, target: Target) -> Result<f64> {
    if weight.is_finite() && weight >= 0.0 && weight < MAX_WEIGHT {
        Ok(weight)
    } else {
        Err(Error::ModelContractViolation { target, weight })
    }
}

/// A model with fixed weights that ignores its context.
#[derive(Debug, Clone, PartialEq)]
pub struct StaticModel<S> {
    symbols: Vec<S>,
    weights: Vec<f64>,
    terminator: f64,
}

impl<S: Clone + PartialEq> StaticModel<S> {
    /// Builds a model from `(symbol, weight)` pairs. A symbol's index is its
    /// position in `entries`.
    pub fn new(entries: impl IntoIterator<Item = (S, f64)>, terminator_weight: f64) -> Self {
        let (symbols, weights) = entries.into_iter().unzip();
        Self {
            symbols,
            weights,
            terminator: terminator_weight,
        }
    }

    /// Builds a model whose weights are the occurrence counts of each distinct
    /// symbol in `sample`, in order of first appearance.
    pub fn from_counts(sample: &[S], terminator_weight: f64) -> Self {
        let mut symbols: Vec<S> = Vec::new();
        let mut weights: Vec<f64> = Vec::new();
        for symbol in sample {
            match symbols.iter().position(|s| s == symbol) {
                Some(index) => weights[index] += 1.0,
                None => {
                    symbols.push(symbol.clone());
                    weights.push(1.0);
                }
            }
        }
        Self {
            symbols,
            weights,
            terminator: terminator_weight,
        }
    }

    /// Weight assigned to `symbol`, if it is part of the alphabet.
    pub fn weight_of(&self, symbol: &S) -> Option<f64> {
        let index = self.symbols.iter().position(|s| s == symbol)?;
        Some(self.weights[index])
    }
}

impl<S: Clone + PartialEq> ProbabilityModel for StaticModel<S> {
    type Symbol = S;

    fn symbol_count(&self) -> usize {
        self.symbols.len()
    }

    fn symbol_weight(&self, _context: &[S], index: usize) -> f64 {
        self.weights[index]
    }

    fn terminator_weight(&self, _context: &[S]) -> f64 {
        self.terminator
    }

    /// Unknown symbols map to `symbol_count()`, which the coder rejects.
    fn to_index(&self, symbol: &S) -> usize {
        self.symbols
            .iter()
            .position(|s| s == symbol)
            .unwrap_or(self.symbols.len())
    }

    fn to_symbol(&self, index: usize) -> S {
        self.symbols[index].clone()
    }
}

/// Every byte value equally likely, with a fixed terminator weight.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UniformModel {
    terminator: f64,
}

impl UniformModel {
    /// Creates a uniform byte model.
    pub fn new(terminator_weight: f64) -> Self {
        Self {
            terminator: terminator_weight,
        }
    }
}

impl Default for UniformModel {
    fn default() -> Self {
        Self::new(1.0)
    }
}

impl ProbabilityModel for UniformModel {
    type Symbol = u8;

    fn symbol_count(&self) -> usize {
        256
    }

    fn symbol_weight(&self, _context: &[u8], _index: usize) -> f64 {
        1.0
    }

    fn terminator_weight(&self, _context: &[u8]) -> f64 {
        self.terminator
    }

    fn to_index(&self, symbol: &u8) -> usize {
        usize::from(*symbol)
    }

    fn to_symbol(&self, index: usize) -> u8 {
        index as u8
    }
}

/// Weight of a symbol is one plus the number of times it already occurred in
/// the context. The terminator weight is fixed.
#[derive(Debug, Clone, PartialEq)]
pub struct AdaptiveCountModel<S> {
    alphabet: Vec<S>,
    terminator: f64,
}

impl<S: Clone + PartialEq> AdaptiveCountModel<S> {
    /// Creates an adaptive model over `alphabet`.
    pub fn new(alphabet: Vec<S>, terminator_weight: f64) -> Self {
        Self {
            alphabet,
            terminator: terminator_weight,
        }
    }
}

impl AdaptiveCountModel<u8> {
    /// Adaptive model over all byte values.
    pub fn bytes(terminator_weight: f64) -> Self {
        Self::new((0..=u8::MAX).collect(), terminator_weight)
    }
}

impl<S: Clone + PartialEq> ProbabilityModel for AdaptiveCountModel<S> {
    type Symbol = S;

    fn symbol_count(&self) -> usize {
        self.alphabet.len()
    }

    fn symbol_weight(&self, context: &[S], index: usize) -> f64 {
        let symbol = &self.alphabet[index];
        1.0 + context.iter().filter(|s| *s == symbol).count() as f64
    }

    fn terminator_weight(&self, _context: &[S]) -> f64 {
        self.terminator
    }

    fn to_index(&self, symbol: &S) -> usize {
        self.alphabet
            .iter()
            .position(|s| s == symbol)
            .unwrap_or(self.alphabet.len())
    }

    fn to_symbol(&self, index: usize) -> S {
        self.alphabet[index].clone()
    }
}
