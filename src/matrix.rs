//! 2x2 transfer-matrix arithmetic over arbitrary-precision reals
//!
//! The Chebyshev recurrence `T_{k+1} = 2x*T_k - T_{k-1}` is one application
//! of a fixed 2x2 matrix to the pair `(T_{k-1}, T_k)`; powers of that matrix
//! encode multi-step jumps.

use crate::precision::Precision;
use rug::Float;

/// A 2x2 matrix stored as four cells `[a, b, c, d]` in row-major order.
#[derive(Debug, Clone)]
pub struct Transfer {
    pub cells: [Float; 4],
}

impl Transfer {
    /// The canonical one-step matrix `[0, -1, 1, 2x]` mapping
    /// `(T_{k-1}, T_k)` to `(T_k, T_{k+1})`.
    pub fn step(x: &Float, ctx: Precision) -> Self {
        Self {
            cells: [
                ctx.float(0),
                ctx.float(-1),
                ctx.float(1),
                ctx.float(x * 2),
            ],
        }
    }

    /// The evaluation state `[T0, T1, T1, T2] = [1, x, x, 2x^2 - 1]`.
    pub fn state(x: &Float, ctx: Precision) -> Self {
        let two_x_sq = ctx.float(x * x) * 2;
        Self {
            cells: [
                ctx.float(1),
                ctx.float(x),
                ctx.float(x),
                ctx.float(&two_x_sq - 1),
            ],
        }
    }

    /// The multiplicative identity.
    pub fn identity(ctx: Precision) -> Self {
        Self {
            cells: [ctx.float(1), ctx.float(0), ctx.float(0), ctx.float(1)],
        }
    }

    /// Standard 2x2 product `self * other`: 8 multiplications, 4 additions.
    ///
    /// Non-mutating; `self` and `other` may alias.
    pub fn multiply(&self, other: &Transfer, ctx: Precision) -> Transfer {
        let u = &self.cells;
        let v = &other.cells;
        let cell = |p: &Float, q: &Float, r: &Float, s: &Float| {
            let left = ctx.float(p * q);
            let right = ctx.float(r * s);
            ctx.float(&left + &right)
        };
        Transfer {
            cells: [
                cell(&u[0], &v[0], &u[1], &v[2]),
                cell(&u[0], &v[1], &u[1], &v[3]),
                cell(&u[2], &v[0], &u[3], &v[2]),
                cell(&u[2], &v[1], &u[3], &v[3]),
            ],
        }
    }

    /// Raises `self` to the power encoded by `exponent_bits`, scanning bits
    /// most-significant first: square the accumulator each position, multiply
    /// `self` in on set bits. The multiplication order is fixed; the
    /// primitive does not assume commutativity even though every caller in
    /// this crate feeds it powers of a single base.
    pub fn power(&self, exponent_bits: &[bool], ctx: Precision) -> Transfer {
        let mut acc = Transfer::identity(ctx);
        for &bit in exponent_bits {
            acc = acc.multiply(&acc, ctx);
            if bit {
                acc = acc.multiply(self, ctx);
            }
        }
        acc
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ctx() -> Precision {
        Precision::digits(20)
    }

    fn assert_cells(m: &Transfer, expected: [f64; 4]) {
        for (cell, want) in m.cells.iter().zip(expected) {
            assert_eq!(*cell, want);
        }
    }

    #[test]
    fn test_step_matrix_cells() {
        let c = ctx();
        let m = Transfer::step(&c.float(0.5), c);
        assert_cells(&m, [0.0, -1.0, 1.0, 1.0]);
    }

    #[test]
    fn test_multiply_against_hand_product() {
        let c = ctx();
        let a = Transfer {
            cells: [c.float(1), c.float(2), c.float(3), c.float(4)],
        };
        let b = Transfer {
            cells: [c.float(5), c.float(6), c.float(7), c.float(8)],
        };
        let p = a.multiply(&b, c);
        assert_cells(&p, [19.0, 22.0, 43.0, 50.0]);
    }

    #[test]
    fn test_multiply_aliasing_is_safe() {
        let c = ctx();
        let a = Transfer {
            cells: [c.float(1), c.float(2), c.float(3), c.float(4)],
        };
        let sq = a.multiply(&a, c);
        assert_cells(&sq, [7.0, 10.0, 15.0, 22.0]);
        // operand untouched
        assert_cells(&a, [1.0, 2.0, 3.0, 4.0]);
    }

    #[test]
    fn test_power_matches_repeated_multiply() {
        let c = ctx();
        let m = Transfer::step(&c.float(0.25), c);
        // 5 = 0b101, padded the way the evaluator pads
        let bits = [false, true, false, true];
        let pow = m.power(&bits, c);
        let mut manual = m.clone();
        for _ in 0..4 {
            manual = manual.multiply(&m, c);
        }
        for (got, want) in pow.cells.iter().zip(manual.cells.iter()) {
            let diff = c.float(got - want).abs();
            assert!(diff < 1e-15);
        }
    }

    #[test]
    fn test_power_zero_is_identity() {
        let c = ctx();
        let m = Transfer::step(&c.float(0.7), c);
        let pow = m.power(&[false, false], c);
        assert_cells(&pow, [1.0, 0.0, 0.0, 1.0]);
    }
}
