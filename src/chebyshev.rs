//! Chebyshev polynomial evaluation
//!
//! Two evaluators for `T_n(x)`: a linear-recurrence scan that serves as the
//! correctness oracle, and a transfer-matrix exponentiation that reaches the
//! same value in O(log n) multiplications. Both thread an operation counter
//! so callers can compare their cost profiles.

use crate::error::{Error, Result};
use crate::matrix::Transfer;
use crate::precision::{count_digits, Precision};
use rug::{Float, Integer};

/// Fixed-length bit decomposition of `n`, most-significant first.
///
/// The sequence spans `4 * len` positions for a `len`-digit `n`: since
/// `2^(4k) > 10^k`, four bit positions per decimal digit always suffice.
/// Bits are extracted by repeated subtraction of descending powers of two.
pub fn exponent_bits(n: &Integer, len: u32) -> Vec<bool> {
    let positions = (4 * len) as usize;
    let mut bits = vec![false; positions];
    let mut threshold = Integer::from(1);
    for _ in 0..positions.saturating_sub(1) {
        threshold *= 2;
    }
    let mut rest = n.clone();
    for slot in bits.iter_mut() {
        if rest >= threshold {
            *slot = true;
            rest -= &threshold;
        }
        threshold /= 2;
    }
    bits
}

/// Evaluates `T_n(x)` by the recurrence `T_{k+1} = 2x*T_k - T_{k-1}`,
/// counting one operation per step.
pub fn eval_naive_counted(
    x: &Float,
    n: &Integer,
    ctx: Precision,
    count: &mut u64,
) -> Result<Float> {
    let steps = checked_exponent(n)?;
    let mut t_prev = ctx.float(1);
    let mut t_curr = ctx.float(x);
    for _ in 0..steps {
        let double = ctx.float(x * 2);
        let scaled = ctx.float(&double * &t_curr);
        let t_next = ctx.float(&scaled - &t_prev);
        t_prev = t_curr;
        t_curr = t_next;
        *count += 1;
    }
    Ok(t_prev)
}

/// Evaluates `T_n(x)` by the linear recurrence; O(n) multiplications.
pub fn eval_naive(x: &Float, n: &Integer, ctx: Precision) -> Result<Float> {
    let mut count = 0;
    eval_naive_counted(x, n, ctx, &mut count)
}

/// Evaluates `T_n(x)` through transfer-matrix exponentiation, counting two
/// operations per matrix multiplication.
///
/// The running exponent matrix starts at the one-step value and accumulates,
/// for each set bit of `n - 1` (most-significant first), a fresh one-step
/// copy squared once per remaining position. The accumulated matrix is
/// applied to the initial state `[T0, T1, T1, T2]` exactly once at the end.
pub fn eval_fast_counted(
    x: &Float,
    n: &Integer,
    ctx: Precision,
    count: &mut u64,
) -> Result<Float> {
    require_non_negative(n)?;
    if *n == 0 {
        return Ok(ctx.float(1));
    }
    if *n == 1 {
        return Ok(ctx.float(x));
    }

    let m = Integer::from(n - 1u32);
    let len = count_digits(&m);
    let bits = exponent_bits(&m, len);
    let positions = bits.len();

    let mut exponent = Transfer::step(x, ctx);
    for (i, bit) in bits.iter().enumerate() {
        if *bit {
            let mut square = Transfer::step(x, ctx);
            for _ in 0..positions - 1 - i {
                square = square.multiply(&square, ctx);
                *count += 2;
            }
            exponent = exponent.multiply(&square, ctx);
            *count += 2;
        }
    }

    let finished = Transfer::state(x, ctx).multiply(&exponent, ctx);
    *count += 2;
    Ok(finished.cells[0].clone())
}

/// Evaluates `T_n(x)` in O(log n) multiplications.
pub fn eval_fast(x: &Float, n: &Integer, ctx: Precision) -> Result<Float> {
    let mut count = 0;
    eval_fast_counted(x, n, ctx, &mut count)
}

fn require_non_negative(n: &Integer) -> Result<()> {
    if *n < 0 {
        return Err(Error::Precondition(format!(
            "polynomial index must be non-negative, got {n}"
        )));
    }
    Ok(())
}

fn checked_exponent(n: &Integer) -> Result<u64> {
    require_non_negative(n)?;
    n.to_u64().ok_or_else(|| {
        Error::Precondition(format!(
            "polynomial index {n} is too large for the linear recurrence"
        ))
    })
}
