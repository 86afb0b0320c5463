//! Integer Amount Arithmetic
//!
//! All fund accounting is done in indivisible base units (`u128`).
//! No floats anywhere near money.
//!
//! ## Rounding
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │  payout = floor(stake * pool / winning_pool)                │
//! │                                                             │
//! │  Σ payouts <= pool       (floor never rounds up)            │
//! │  pool - Σ payouts < #winners   (at most 1 unit lost each)   │
//! └─────────────────────────────────────────────────────────────┘
//! ```

/// Funds in base units.
pub type Amount = u128;

/// Scale a stake by `pool / winning_pool`, rounding down.
///
/// Returns `None` when `winning_pool` is zero or the result cannot be
/// represented. Callers in the settlement path always have
/// `stake <= winning_pool <= pool`, so the result is at most `pool`.
pub fn pro_rata(stake: Amount, pool: Amount, winning_pool: Amount) -> Option<Amount> {
    if let Some(wide) = stake.checked_mul(pool) {
        return wide.checked_div(winning_pool);
    }
    mul_div(stake, pool, winning_pool)
}

const LOW_MASK: u128 = u64::MAX as u128;

/// Full 256-bit product of two amounts as `(high, low)` halves.
fn widening_mul(a: u128, b: u128) -> (u128, u128) {
    let (a_hi, a_lo) = (a >> 64, a & LOW_MASK);
    let (b_hi, b_lo) = (b >> 64, b & LOW_MASK);

    let lo_lo = a_lo * b_lo;
    let lo_hi = a_lo * b_hi;
    let hi_lo = a_hi * b_lo;
    let hi_hi = a_hi * b_hi;

    // < 3 * 2^64, no overflow
    let mid = (lo_lo >> 64) + (lo_hi & LOW_MASK) + (hi_lo & LOW_MASK);
    let low = (lo_lo & LOW_MASK) | (mid << 64);
    let high = hi_hi + (lo_hi >> 64) + (hi_lo >> 64) + (mid >> 64);
    (high, low)
}

/// `floor(a * b / d)` without losing the high half of the product.
///
/// Shift-subtract long division of the 256-bit product. `None` when `d`
/// is zero or the quotient does not fit in 128 bits.
fn mul_div(a: u128, b: u128, d: u128) -> Option<u128> {
    if d == 0 {
        return None;
    }
    let (high, low) = widening_mul(a, b);
    if high >= d {
        return None;
    }

    // remainder < d holds at the top of every step
    let mut remainder = high;
    let mut quotient: u128 = 0;
    for bit in (0..128).rev() {
        let carry = remainder >> 127;
        remainder = (remainder << 1) | ((low >> bit) & 1);
        quotient <<= 1;
        if carry == 1 || remainder >= d {
            remainder = remainder.wrapping_sub(d);
            quotient |= 1;
        }
    }
    Some(quotient)
}

/// Checked sum of amounts.
pub fn checked_sum<I>(amounts: I) -> Option<Amount>
where
    I: IntoIterator<Item = Amount>,
{
    amounts
        .into_iter()
        .try_fold(0 as Amount, |acc, a| acc.checked_add(a))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pro_rata_floor() {
        // 1 * 5 / 3 = 1.66 -> 1
        assert_eq!(pro_rata(1, 5, 3), Some(1));
        // 2 * 5 / 3 = 3.33 -> 3
        assert_eq!(pro_rata(2, 5, 3), Some(3));
        // Sole winner takes the pool
        assert_eq!(pro_rata(7, 20, 7), Some(20));
    }

    #[test]
    fn test_pro_rata_zero_winning_pool() {
        assert_eq!(pro_rata(1, 10, 0), None);
    }

    #[test]
    fn test_pro_rata_wide_values() {
        // stake * pool overflows u128, result is still exact
        let w = u128::MAX / 4;
        let pool = w * 2;
        assert_eq!(pro_rata(w, pool, w), Some(pool));
        assert_eq!(pro_rata(w / 2, pool, w), Some(w - 1));
    }

    #[test]
    fn test_pro_rata_wei_scale() {
        // 20 ETH against 20 ETH minus one wei: pool % winners > 2^64
        let stake: u128 = 20_000_000_000_000_000_000;
        let pool = 2 * stake - 1;
        assert_eq!(pro_rata(stake, pool, stake), Some(pool));

        // two winners at 15 and 5 ETH share 40 ETH - 1 wei
        let small: u128 = 5_000_000_000_000_000_000;
        let large = 3 * small;
        let first = pro_rata(large, pool, large + small).unwrap();
        let second = pro_rata(small, pool, large + small).unwrap();
        assert_eq!(first, 29_999_999_999_999_999_999);
        assert_eq!(second, 9_999_999_999_999_999_999);
        assert!(pool - (first + second) < 2);
    }

    #[test]
    fn test_pro_rata_near_max() {
        let big = 1u128 << 126;
        let winning_pool = big + 1;
        let pool = (1u128 << 127) + big + 1;

        // 2^126 * (3 * 2^126 + 1) = (2^126 + 1)(3 * 2^126 - 2) + 2
        assert_eq!(pro_rata(big, pool, winning_pool), Some(3 * big - 2));
        assert_eq!(pro_rata(1, pool, winning_pool), Some(2));

        assert_eq!(pro_rata(u128::MAX, u128::MAX, u128::MAX), Some(u128::MAX));
        assert_eq!(
            pro_rata(u128::MAX - 1, u128::MAX, u128::MAX),
            Some(u128::MAX - 1)
        );
        assert_eq!(pro_rata(u128::MAX / 3, u128::MAX, u128::MAX / 3), Some(u128::MAX));
    }

    #[test]
    fn test_pro_rata_unrepresentable() {
        assert_eq!(pro_rata(u128::MAX, u128::MAX, 1), None);
        assert_eq!(pro_rata(u128::MAX, 2, 1), None);
        assert_eq!(pro_rata(u128::MAX, u128::MAX, 0), None);
    }

    #[test]
    fn test_widening_mul() {
        assert_eq!(widening_mul(0, u128::MAX), (0, 0));
        assert_eq!(widening_mul(1 << 64, 1 << 64), (1, 0));
        // (2^128 - 1)^2 = 2^256 - 2^129 + 1
        assert_eq!(widening_mul(u128::MAX, u128::MAX), (u128::MAX - 1, 1));
    }

    #[test]
    fn test_checked_sum() {
        assert_eq!(checked_sum([1, 2, 3]), Some(6));
        assert_eq!(checked_sum(Vec::new()), Some(0));
        assert_eq!(checked_sum([u128::MAX, 1]), None);
    }
}
