//! Error taxonomy for the analysis library

use rug::Integer;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

/// Failure modes of the numeric core and the attack orchestrator.
///
/// Every failure is a distinguishable value; no operation falls back to a
/// best-effort numeric answer. `NoSolution` (the congruence provably has no
/// root) and `PrecisionInsufficient` (a candidate was found but failed
/// verification) carry different meanings for an attacker and are never
/// merged.
#[derive(Debug, Error)]
pub enum Error {
    #[error("precondition violated: {0}")]
    Precondition(String),

    #[error("no modular inverse: gcd({a}, {m}) != 1")]
    NonInvertible { a: Integer, m: Integer },

    #[error("congruence unsolvable: gcd {gcd} does not divide {rhs}")]
    NoSolution { gcd: Integer, rhs: Integer },

    #[error("verification residual {residual} exceeds tolerance {tolerance}")]
    PrecisionInsufficient { residual: String, tolerance: String },

    #[error("invalid numeric literal: {0}")]
    InvalidNumeric(String),
}
