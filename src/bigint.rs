/*!
Thin adapter over an arbitrary-precision integer provider.

The rest of this crate only ever needs nonnegative integers — cardinalities,
mixed-radix digits, index positions — so everything here is phrased in terms
of [`BigUint`]. The two operations [`BigUint`] doesn't expose in quite the
shape we want are collected here: truncated division-with-remainder and
uniform sampling below a bound.
*/

use num_bigint::{BigUint, RandBigInt};
use num_traits::Zero;
use rand::Rng;

/// Truncated division with remainder: `(n / d, n % d)`.
///
/// Since both operands are nonnegative, ordinary `Div`/`Rem` already
/// truncate toward zero, so this is a thin pairing rather than new
/// arithmetic.
///
/// `tdiv_qr(17, 5)` is `(3, 2)`: `3 * 5 + 2 == 17`.
pub(crate) fn tdiv_qr(n: &BigUint, d: &BigUint) -> (BigUint, BigUint) {
    (n / d, n % d)
}

/// Draws a uniform-random value in `[0, bound)`.
///
/// # Panics
/// Panics if `bound` is zero.
pub(crate) fn random_below<R: Rng + ?Sized>(rng: &mut R, bound: &BigUint) -> BigUint {
    assert!(!bound.is_zero(), "random_below: bound must be nonzero");
    rng.gen_biguint_below(bound)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tdiv_qr_exact() {
        let (q, r) = tdiv_qr(&BigUint::from(10u32), &BigUint::from(2u32));
        assert_eq!(q, BigUint::from(5u32));
        assert_eq!(r, BigUint::from(0u32));
    }

    #[test]
    fn tdiv_qr_remainder() {
        let (q, r) = tdiv_qr(&BigUint::from(7u32), &BigUint::from(3u32));
        assert_eq!(q, BigUint::from(2u32));
        assert_eq!(r, BigUint::from(1u32));
    }

    #[test]
    fn random_below_stays_in_range() {
        let mut rng = rand::thread_rng();
        let bound = BigUint::from(1000u32);
        for _ in 0..50 {
            let v = random_below(&mut rng, &bound);
            assert!(v < bound);
        }
    }

    #[test]
    #[should_panic]
    fn random_below_rejects_zero_bound() {
        let mut rng = rand::thread_rng();
        random_below(&mut rng, &BigUint::from(0u32));
    }
}
