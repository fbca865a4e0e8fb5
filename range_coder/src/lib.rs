// range_coder/src/lib.rs

//! Range Coding Library
//!
//! Adaptive arithmetic coding over 32-bit fixed-point intervals. A sequence of
//! symbols is coded against a [`ProbabilityModel`] queried with the causal
//! context at every step, and ended with a virtual terminator symbol so the
//! stream needs no length header.
//!
//! ```
//! use range_coder::{decode, encode, StaticModel};
//!
//! let model = StaticModel::from_counts(&b"hello world"[..], 1.0);
//! let bits = encode(b"hello world", &model).unwrap();
//! assert_eq!(decode(&bits, &model).unwrap(), b"hello world");
//! ```

#![warn(missing_docs)]

pub mod bits;
pub mod decoder;
pub mod encoder;
pub mod error;
pub mod interval;
pub mod model;

pub use bits::{pack, unpack, Bits};
pub use decoder::decode;
pub use encoder::encode;
pub use error::{Error, Result};
pub use interval::{Target, CODE_BITS};
pub use model::{AdaptiveCountModel, ProbabilityModel, StaticModel, UniformModel, MAX_WEIGHT};
