//! Extended Euclid, modular inverse, and the linear congruence solver
//!
//! Integer machinery backing the exponent-recovery attack. Division and
//! remainder follow the truncated convention (remainder keeps the sign of
//! the dividend), which the sign handling below relies on.

use crate::error::{Error, Result};
use rug::Integer;

/// Returns `(g, x, y)` with `a*x + b*y = g = gcd(a, b)`.
///
/// Recursive Euclidean descent; depth is bounded by O(log(min(a, b))).
/// Defined for all integer pairs, negatives included, except `a = b = 0`.
pub fn extended_gcd(a: &Integer, b: &Integer) -> Result<(Integer, Integer, Integer)> {
    if *a == 0 && *b == 0 {
        return Err(Error::Precondition("gcd(0, 0) is undefined".into()));
    }
    Ok(descend(a.clone(), b.clone()))
}

fn descend(a: Integer, b: Integer) -> (Integer, Integer, Integer) {
    if a == 0 {
        return (b, Integer::new(), Integer::from(1));
    }
    let quotient = Integer::from(&b / &a);
    let remainder = Integer::from(&b % &a);
    let (g, x1, y1) = descend(remainder, a);
    let x = y1 - Integer::from(&quotient * &x1);
    (g, x, x1)
}

/// Returns `x` in `[0, m)` with `a*x = 1 (mod m)`.
///
/// Exists only when `gcd(a, m) = 1`.
pub fn modular_inverse(a: &Integer, m: &Integer) -> Result<Integer> {
    let (g, x, _) = extended_gcd(a, m)?;
    if g != 1 {
        return Err(Error::NonInvertible {
            a: a.clone(),
            m: m.clone(),
        });
    }
    let reduced = Integer::from(&x % m);
    let shifted = reduced + m;
    Ok(Integer::from(&shifted % m))
}

/// Finds `k` in `[0, c)` with `a + b*k = 0 (mod c)`.
///
/// When `gcd(b, c) = 1` the root is `(-a) * b^-1 mod c`. Otherwise the
/// congruence is solvable only if the gcd divides `a`; the Bezout
/// coefficient of `b` is then scaled by `a / gcd` and reduced.
pub fn solve_linear_congruence(a: &Integer, b: &Integer, c: &Integer) -> Result<Integer> {
    if *c == 0 {
        return Err(Error::Precondition("congruence modulus must be nonzero".into()));
    }
    let negated = {
        let r = Integer::from(&Integer::from(-a) % c);
        let shifted = r + c;
        Integer::from(&shifted % c)
    };

    let (g, _, bezout_b) = extended_gcd(c, b)?;
    if g == 1 {
        let inverse = modular_inverse(b, c)?;
        let k = Integer::from(&negated * &inverse);
        return Ok(Integer::from(&k % c));
    }

    if Integer::from(&negated % &g) != 0 {
        return Err(Error::NoSolution {
            gcd: g,
            rhs: negated,
        });
    }

    let mut k = bezout_b;
    if k < 0 {
        k += c;
    }
    k *= &negated;
    k /= &g;
    Ok(Integer::from(&k % c))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn int(v: i64) -> Integer {
        Integer::from(v)
    }

    #[test]
    fn test_extended_gcd_identity_holds() {
        let pairs = [
            (240i64, 46i64),
            (46, 240),
            (17, 5),
            (0, 5),
            (5, 0),
            (-4, 6),
            (6, -4),
            (-15, -25),
            (1, 1),
        ];
        for (a, b) in pairs {
            let (g, x, y) = extended_gcd(&int(a), &int(b)).unwrap();
            let lhs = int(a) * &x + int(b) * &y;
            assert_eq!(lhs, g, "identity failed for ({a}, {b})");
        }
    }

    #[test]
    fn test_extended_gcd_base_case() {
        let (g, x, y) = extended_gcd(&int(0), &int(5)).unwrap();
        assert_eq!(g, 5);
        assert_eq!(x, 0);
        assert_eq!(y, 1);
    }

    #[test]
    fn test_extended_gcd_rejects_double_zero() {
        assert!(matches!(
            extended_gcd(&int(0), &int(0)),
            Err(Error::Precondition(_))
        ));
    }

    #[test]
    fn test_modular_inverse_roundtrip() {
        for (a, m) in [(3i64, 7i64), (5, 12), (10, 17), (2, 101)] {
            let inv = modular_inverse(&int(a), &int(m)).unwrap();
            assert!(inv >= 0 && inv < int(m));
            let product = Integer::from(&(int(a) * &inv) % &int(m));
            assert_eq!(product, 1, "inverse failed for ({a}, {m})");
        }
    }

    #[test]
    fn test_modular_inverse_requires_coprimality() {
        assert!(matches!(
            modular_inverse(&int(4), &int(8)),
            Err(Error::NonInvertible { .. })
        ));
    }

    #[test]
    fn test_congruence_coprime_case() {
        // 3 + 5k = 0 (mod 7)
        let k = solve_linear_congruence(&int(3), &int(5), &int(7)).unwrap();
        assert!(k >= 0 && k < int(7));
        let check = Integer::from(&(int(3) + int(5) * &k) % &int(7));
        assert_eq!(check, 0);
    }

    #[test]
    fn test_congruence_reduced_case() {
        // gcd(4, 6) = 2 divides 2: 2 + 4k = 0 (mod 6) has a root
        let k = solve_linear_congruence(&int(2), &int(4), &int(6)).unwrap();
        assert!(k >= 0 && k < int(6));
        let check = Integer::from(&(int(2) + int(4) * &k) % &int(6));
        assert_eq!(check, 0);
    }

    #[test]
    fn test_congruence_unsolvable() {
        // gcd(4, 6) = 2 does not divide the negated residue of 3
        assert!(matches!(
            solve_linear_congruence(&int(3), &int(4), &int(6)),
            Err(Error::NoSolution { .. })
        ));
    }

    #[test]
    fn test_congruence_zero_residue() {
        let k = solve_linear_congruence(&int(0), &int(4), &int(6)).unwrap();
        assert_eq!(k, 0);
    }

    #[test]
    fn test_congruence_zero_modulus_rejected() {
        assert!(matches!(
            solve_linear_congruence(&int(1), &int(2), &int(0)),
            Err(Error::Precondition(_))
        ));
    }
}
