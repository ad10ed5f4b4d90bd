//! The Chebyshev public-key scheme under analysis
//!
//! Key generation picks `x` in (-1, 1) and a secret integer `s`; the public
//! key is `(x, T_s(x))`. Encryption of a plaintext `u` under an ephemeral
//! integer `r` publishes `(T_r(x), u * T_r(y))`; decryption divides by
//! `T_s(z0)`, which equals `T_r(y)` by the semigroup property
//! `T_s(T_r(x)) = T_r(T_s(x))`.

use crate::chebyshev::eval_fast;
use crate::error::Result;
use crate::precision::{to_decimal_domain, Precision};
use rug::float::Constant;
use rug::{Float, Integer};

#[derive(Debug, Clone)]
pub struct PublicKey {
    /// The shared base in (-1, 1).
    pub x: Float,
    /// `T_s(x)` for the holder's secret `s`.
    pub y: Float,
}

#[derive(Debug, Clone)]
pub struct KeyPair {
    pub public: PublicKey,
    pub secret: Integer,
}

/// A ciphertext pair `(z0, z2) = (T_r(x), u * T_r(y))`.
#[derive(Debug, Clone)]
pub struct Ciphertext {
    pub z0: Float,
    pub z2: Float,
}

impl KeyPair {
    pub fn generate(x: Float, secret: Integer, ctx: Precision) -> Result<Self> {
        let y = eval_fast(&x, &secret, ctx)?;
        Ok(Self {
            public: PublicKey { x, y },
            secret,
        })
    }

    pub fn decrypt(&self, ciphertext: &Ciphertext, ctx: Precision) -> Result<Float> {
        let mask = eval_fast(&ciphertext.z0, &self.secret, ctx)?;
        Ok(ctx.float(&ciphertext.z2 / &mask))
    }
}

impl PublicKey {
    pub fn encrypt(&self, plaintext: &Float, r: &Integer, ctx: Precision) -> Result<Ciphertext> {
        let z0 = eval_fast(&self.x, r, ctx)?;
        let z1 = eval_fast(&self.y, r, ctx)?;
        let z2 = ctx.float(plaintext * &z1);
        Ok(Ciphertext { z0, z2 })
    }
}

/// Builds `x = cos(numerator * pi / denominator)` in the transcendental
/// domain and pins it into the working domain.
pub fn cos_fraction_of_pi(numerator: u32, denominator: u32, ctx: Precision) -> Result<Float> {
    let pi = ctx.transcendental(Constant::Pi);
    let scaled = ctx.transcendental(&pi * numerator);
    let theta = ctx.transcendental(&scaled / denominator);
    to_decimal_domain(&theta.cos(), ctx)
}
