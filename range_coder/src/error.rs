// range_coder/src/error.rs

//! Error types for range encoding and decoding.

use thiserror::Error;

use crate::interval::Target;
use crate::model::MAX_WEIGHT;

/// Error variants for encode and decode operations.
///
/// None of these are recoverable within a single call: the coder stops at the
/// first one and the partial output is discarded.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    /// The model returned a negative, non-finite or oversized weight.
    #[error("model weight {weight} for {target} is outside [0, {max})", max = MAX_WEIGHT)]
    ModelContractViolation {
        /// Entry the weight was requested for.
        target: Target,
        /// The offending weight.
        weight: f64,
    },

    /// `ProbabilityModel::to_index` mapped a symbol outside the alphabet.
    #[error("symbol index {index} is outside an alphabet of {count} symbols")]
    SymbolOutOfRange {
        /// Index returned by the model.
        index: usize,
        /// Alphabet size reported by the model.
        count: usize,
    },

    /// The step's target has no codable interval (zero weight, or a width that
    /// floors to nothing at the current precision).
    #[error("{target} at position {position} has no codable interval")]
    UndecodableSequence {
        /// Step at which coding failed.
        position: usize,
        /// Entry that could not be coded.
        target: Target,
    },

    /// The decoder's code register matches no candidate, or the stream ran out
    /// long before a terminator was found.
    #[error("stream corrupted at symbol {position}")]
    StreamCorruption {
        /// Number of symbols decoded before the failure.
        position: usize,
    },
}

/// A specialized Result type for range coding operations.
pub type Result<T> = std::result::Result<T, Error>;
