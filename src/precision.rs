//! Working-precision context and exact decimal/binary conversion helpers
//!
//! Every numeric operation in this crate takes an explicit [`Precision`]
//! value instead of mutating a process-wide default. The attack deliberately
//! works at several precisions in one run (candidate extraction, integer
//! reconstruction, verification), so the context travels with each call.

use crate::error::{Error, Result};
use rug::{Assign, Float, Integer};

/// Bits allocated per requested decimal digit in the working domain.
///
/// Kept at 3.2 (true value is about 3.32): downstream digit counts in the
/// congruence recovery are tuned against the slight under-provisioning, so
/// this constant must not be corrected in isolation.
pub const BITS_PER_DIGIT: f64 = 3.2;

/// Bits per decimal digit for the transcendental domain (`log2(10)`).
///
/// Mirrors the convention of the transcendental evaluator; values computed
/// there are moved into the working domain only through an exact string
/// round-trip, never by direct assignment.
pub const TRANSCENDENTAL_BITS_PER_DIGIT: f64 = 3.321_928_094_887_362;

/// Working precision expressed in decimal digits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Precision {
    digits: u32,
}

impl Precision {
    pub fn digits(n: u32) -> Self {
        Self { digits: n.max(1) }
    }

    pub fn decimal_digits(self) -> u32 {
        self.digits
    }

    /// Working-domain precision in bits: `ceil(3.2 * digits)`.
    pub fn bits(self) -> u32 {
        (BITS_PER_DIGIT * f64::from(self.digits)).ceil() as u32
    }

    /// Transcendental-domain precision in bits: `ceil(log2(10) * digits)`.
    pub fn transcendental_bits(self) -> u32 {
        (TRANSCENDENTAL_BITS_PER_DIGIT * f64::from(self.digits)).ceil() as u32
    }

    /// Creates a working-domain value at this precision.
    pub fn float<T>(self, value: T) -> Float
    where
        Float: Assign<T>,
    {
        Float::with_val(self.bits(), value)
    }

    /// Creates a transcendental-domain value at this precision.
    pub fn transcendental<T>(self, value: T) -> Float
    where
        Float: Assign<T>,
    {
        Float::with_val(self.transcendental_bits(), value)
    }
}

/// Parses a decimal literal into the working domain.
pub fn parse_decimal(text: &str, ctx: Precision) -> Result<Float> {
    let parsed = Float::parse(text).map_err(|_| Error::InvalidNumeric(text.to_string()))?;
    Ok(ctx.float(parsed))
}

/// Moves a transcendental-domain value into the working domain.
///
/// The value is printed to `ctx` significant digits and re-parsed. The two
/// domains use different bits-per-digit conventions, so a direct precision
/// change would carry binary tails that the digit-level congruence machinery
/// must never see; the string hop pins the decimal digits deterministically.
pub fn to_decimal_domain(value: &Float, ctx: Precision) -> Result<Float> {
    if !value.is_finite() {
        return Err(Error::Precondition(
            "cannot convert a non-finite value between precision domains".into(),
        ));
    }
    let text = value.to_string_radix(10, Some(ctx.decimal_digits() as usize));
    parse_decimal(&text, ctx)
}

/// Counts the decimal digits of the integer part of `x`.
///
/// Repeated division by 10 while the value exceeds 1, so `x = 1` counts as
/// zero digits and negative values always count as zero.
pub fn count_integer_digits(x: &Float) -> u32 {
    let mut v = x.clone();
    let mut count = 0;
    while v > 1 {
        v /= 10;
        count += 1;
    }
    count
}

/// Counts the decimal digits of the fractional part of `x`.
///
/// Multiplies by 10 until the value is a whole number. The count reflects
/// the exact decimal expansion of the stored binary value, so the same
/// mathematical number yields different counts at different precisions.
pub fn count_fraction_digits(x: &Float) -> u32 {
    let mut v = x.clone();
    let mut count = 0;
    while !v.is_integer() {
        v *= 10;
        count += 1;
    }
    count
}

/// Counts the decimal digits of an integer; zero has zero digits.
pub fn count_digits(n: &Integer) -> u32 {
    let mut v = n.clone();
    let mut count = 0;
    while v != 0 {
        v /= 10;
        count += 1;
    }
    count
}

/// Rounds to an integer value: `ceil(x)` when the fractional part exceeds
/// one half, `floor(x)` otherwise. Ties go to the floor, which makes the
/// rule asymmetric around zero for negative inputs.
pub fn round_half_up(x: &Float, ctx: Precision) -> Float {
    let floor = ctx.float(x.floor_ref());
    let frac = ctx.float(x - &floor);
    if frac > 0.5 {
        ctx.float(x.ceil_ref())
    } else {
        floor
    }
}

/// Expands the fractional part of `x` into an exact integer.
///
/// The integer part is peeled off toward zero (`floor` for positive `x`,
/// `ceil` for negative), then the remainder and its integer-part copy are
/// both scaled by 10 until the remainder is whole. The result carries the
/// fractional digits of the stored value exactly.
pub fn split_fraction_to_integer(x: &Float) -> Result<Integer> {
    if !x.is_finite() {
        return Err(Error::Precondition(
            "cannot expand the fraction of a non-finite value".into(),
        ));
    }
    let mut v = x.clone();
    let mut whole = if *x > 0 {
        x.clone().floor()
    } else {
        x.clone().ceil()
    };
    while !v.is_integer() {
        whole *= 10;
        v *= 10;
    }
    let frac: Float = v - whole;
    frac.to_integer().ok_or_else(|| {
        Error::Precondition("fraction expansion did not reach a whole value".into())
    })
}

/// Rebuilds a value whose fractional digits match `fraction` exactly.
///
/// Concatenates the integer part of `x`, a decimal point, and the digits of
/// `|fraction|`, then re-parses at a precision raised to cover the whole
/// string. Arithmetic reconstruction (`int + frac * 10^-k`) loses digits at
/// the caller's precision; the string hop does not.
pub fn merge_integer_and_fraction(x: &Float, fraction: &Integer) -> Result<Float> {
    let whole = if *x > 0 {
        x.clone().floor()
    } else {
        x.clone().ceil()
    };
    let whole_int = whole
        .to_integer()
        .ok_or_else(|| Error::Precondition("integer part of a non-finite value".into()))?;
    let mut text = whole_int.to_string();
    text.push('.');
    let fraction_abs = Integer::from(fraction.abs_ref());
    text.push_str(&fraction_abs.to_string());

    let raised = Precision::digits(text.len() as u32);
    parse_decimal(&text, raised)
}

/// `a mod b` as `a - b * trunc(a / b)`; the result keeps the sign of `a`.
pub fn real_modulo(a: &Float, b: &Float, ctx: Precision) -> Float {
    let quotient = ctx.float(a / b).trunc();
    let product = ctx.float(b * &quotient);
    ctx.float(a - &product)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ctx() -> Precision {
        Precision::digits(20)
    }

    #[test]
    fn test_bits_per_digit_constant() {
        assert_eq!(Precision::digits(20).bits(), 64);
        assert_eq!(Precision::digits(97).bits(), 311);
        // transcendental convention allocates more bits for the same digits
        assert!(Precision::digits(20).transcendental_bits() > Precision::digits(20).bits());
    }

    #[test]
    fn test_count_integer_digits() {
        assert_eq!(count_integer_digits(&ctx().float(123.25)), 3);
        assert_eq!(count_integer_digits(&ctx().float(9.5)), 1);
        // exactly one does not exceed one
        assert_eq!(count_integer_digits(&ctx().float(1)), 0);
        assert_eq!(count_integer_digits(&ctx().float(-42)), 0);
    }

    #[test]
    fn test_count_fraction_digits_dyadic() {
        // 0.25 and 3.5 are exact in binary, so the counts are stable
        assert_eq!(count_fraction_digits(&ctx().float(0.25)), 2);
        assert_eq!(count_fraction_digits(&ctx().float(3.5)), 1);
        assert_eq!(count_fraction_digits(&ctx().float(7)), 0);
    }

    #[test]
    fn test_count_digits_integer() {
        assert_eq!(count_digits(&Integer::from(0)), 0);
        assert_eq!(count_digits(&Integer::from(7)), 1);
        assert_eq!(count_digits(&Integer::from(81500)), 5);
        assert_eq!(count_digits(&Integer::from(-250)), 3);
    }

    #[test]
    fn test_round_half_up_fractions() {
        let c = ctx();
        assert_eq!(round_half_up(&c.float(2.75), c), 3);
        assert_eq!(round_half_up(&c.float(2.25), c), 2);
        assert_eq!(round_half_up(&c.float(-2.25), c), -2);
        assert_eq!(round_half_up(&c.float(-2.75), c), -3);
    }

    #[test]
    fn test_round_half_up_ties_go_to_floor() {
        let c = ctx();
        assert_eq!(round_half_up(&c.float(2.5), c), 2);
        assert_eq!(round_half_up(&c.float(-2.5), c), -3);
    }

    #[test]
    fn test_split_fraction_to_integer() {
        let c = ctx();
        let a = split_fraction_to_integer(&c.float(3.25)).unwrap();
        assert_eq!(a, 25);
        let a = split_fraction_to_integer(&c.float(-3.25)).unwrap();
        assert_eq!(a, -25);
        let a = split_fraction_to_integer(&c.float(42)).unwrap();
        assert_eq!(a, 0);
    }

    #[test]
    fn test_merge_integer_and_fraction_exact() {
        let c = ctx();
        let merged = merge_integer_and_fraction(&c.float(3.9), &Integer::from(25)).unwrap();
        assert_eq!(merged, c.float(3.25));
        // the sign of the fraction integer is discarded
        let merged = merge_integer_and_fraction(&c.float(3.9), &Integer::from(-25)).unwrap();
        assert_eq!(merged, c.float(3.25));
    }

    #[test]
    fn test_split_then_merge_round_trip() {
        let c = ctx();
        let x = c.float(81499.5);
        let a = split_fraction_to_integer(&x).unwrap();
        assert_eq!(a, 5);
        let back = merge_integer_and_fraction(&x, &a).unwrap();
        assert_eq!(back, x);
    }

    #[test]
    fn test_real_modulo_truncates_toward_zero() {
        let c = ctx();
        assert_eq!(real_modulo(&c.float(7.5), &c.float(2), c), 1.5);
        assert_eq!(real_modulo(&c.float(-7.5), &c.float(2), c), -1.5);
    }

    #[test]
    fn test_to_decimal_domain_pins_digits() {
        let c = ctx();
        let wide = Precision::digits(40);
        let v = wide.transcendental(2.5);
        let moved = to_decimal_domain(&v, c).unwrap();
        assert_eq!(moved, c.float(2.5));
    }

    #[test]
    fn test_parse_decimal_rejects_garbage() {
        assert!(matches!(
            parse_decimal("not-a-number", ctx()),
            Err(Error::InvalidNumeric(_))
        ));
    }
}
