//! Attack traits and recovered-secret types

use crate::cipher::{Ciphertext, PublicKey};
use crate::error::Result;
use crate::precision::Precision;
use rug::{Float, Integer};

pub mod bergamo;
pub use bergamo::BergamoAttack;

pub trait Attack {
    fn name(&self) -> &'static str;
    fn recover(
        &self,
        public: &PublicKey,
        ciphertext: &Ciphertext,
        ctx: Precision,
    ) -> Result<RecoveredSecret>;
}

/// Which branch of the congruence solver produced the exponent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SolutionMethod {
    /// `gcd(b, c) = 1`: direct multiplication by the modular inverse.
    DirectInverse,
    /// `gcd(b, c) > 1`: Bezout coefficients scaled by the reduced residue.
    BezoutReduction,
}

#[derive(Debug, Clone)]
pub struct RecoveredSecret {
    /// An exponent equivalent to the unknown ephemeral one.
    pub exponent: Integer,
    /// The plaintext unmasked with the equivalent exponent.
    pub plaintext: Float,
    pub method: SolutionMethod,
    /// Verification residual `|T_exponent(x) - z0|`.
    pub residual: Float,
}
