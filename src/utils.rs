use num_bigint::BigUint;
use num_traits::One;

/// Computes `2^exponent` by repeated squaring.
///
/// This is the number of assignments to `exponent` free variables.
///
/// ```
/// use bdd_count::utils::pow2;
/// use num_bigint::BigUint;
///
/// assert_eq!(pow2(0), BigUint::from(1u32));
/// assert_eq!(pow2(10), BigUint::from(1024u32));
/// ```
pub fn pow2(exponent: u64) -> BigUint {
    let mut result = BigUint::one();
    let mut base = BigUint::from(2u32);
    let mut exp = exponent;
    while exp > 0 {
        if exp & 1 == 1 {
            result *= &base;
        }
        exp >>= 1;
        if exp > 0 {
            base = &base * &base;
        }
    }
    result
}

/// Number of variables strictly between a parent at `index_parent` and a child at `index_child`.
///
/// Returns `None` if the child is not strictly below the parent.
pub fn gap(index_parent: u64, index_child: u64) -> Option<u64> {
    index_child.checked_sub(index_parent)?.checked_sub(1)
}
