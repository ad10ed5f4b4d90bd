//! Chebyshev-polynomial cryptosystem analysis library
//!
//! This library implements a public-key scheme built on Chebyshev polynomial
//! evaluation over arbitrary-precision reals, together with the tools that
//! break it: a fast transfer-matrix evaluator, a modular-congruence toolkit,
//! and the Bergamo exponent-recovery attack.

pub mod attack;
pub mod chebyshev;
pub mod cipher;
pub mod error;
pub mod matrix;
pub mod modular;
pub mod precision;

pub use attack::{Attack, BergamoAttack};
pub use error::{Error, Result};
pub use precision::Precision;
