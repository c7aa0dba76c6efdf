//! Constant-product pricing with an input-side fee.
//!
//! Two parallel paths exist:
//! - `Decimal` functions for human-scaled display values
//! - `_raw` functions on ledger `u64` amounts, carried through `U256` the way the
//!   program computes the executed amount
//!
//! Every function is total. Non-positive inputs produce zero, and an
//! unreachable target produces `None`.

use crate::value_objects::price::Price;
use primitive_types::U256;
use rust_decimal::Decimal;

/// Basis-point denominator for fees and margins.
pub const BPS_DENOMINATOR: u32 = 10_000;

/// Share of the output reserve a single quote may never take (10 bps, i.e. a 0.999 cap).
pub const DEFAULT_RESERVE_SAFETY_MARGIN_BPS: u32 = 10;

/// `1 - fee_bps / 10000`, or `None` for a fee of 100% or more.
fn fee_multiplier(fee_bps: u32) -> Option<Decimal> {
    if fee_bps >= BPS_DENOMINATOR {
        return None;
    }
    Some(Decimal::from(BPS_DENOMINATOR - fee_bps) / Decimal::from(BPS_DENOMINATOR))
}

/// `a * b / c`, reordered when the product overflows.
fn mul_div(a: Decimal, b: Decimal, c: Decimal) -> Option<Decimal> {
    if c.is_zero() {
        return None;
    }
    a.checked_mul(b)
        .and_then(|p| p.checked_div(c))
        .or_else(|| b.checked_div(c).and_then(|q| a.checked_mul(q)))
        .or_else(|| a.checked_div(c).and_then(|q| q.checked_mul(b)))
}

/// Largest output a quote may report: `reserve_out * (1 - margin_bps / 10000)`.
fn output_cap(reserve_out: Decimal, margin_bps: u32) -> Decimal {
    let retained = BPS_DENOMINATOR.saturating_sub(margin_bps.min(BPS_DENOMINATOR));
    mul_div(
        reserve_out,
        Decimal::from(retained),
        Decimal::from(BPS_DENOMINATOR),
    )
    .unwrap_or(Decimal::ZERO)
}

/// Output for `amount_in`, using the default reserve safety margin.
///
/// See [`compute_output_amount_with_margin`].
pub fn compute_output_amount(
    amount_in: Decimal,
    reserve_in: Decimal,
    reserve_out: Decimal,
    fee_bps: u32,
) -> Decimal {
    compute_output_amount_with_margin(
        amount_in,
        reserve_in,
        reserve_out,
        fee_bps,
        DEFAULT_RESERVE_SAFETY_MARGIN_BPS,
    )
}

/// Calculates the output amount for a given input amount in a constant product pool.
///
/// formula: dy = y * dx' / (x + dx'), where dx' = dx * (1 - fee)
///
/// The result is clamped to `reserve_out * (1 - margin_bps / 10000)`. Any
/// non-positive argument yields zero.
pub fn compute_output_amount_with_margin(
    amount_in: Decimal,
    reserve_in: Decimal,
    reserve_out: Decimal,
    fee_bps: u32,
    margin_bps: u32,
) -> Decimal {
    if amount_in <= Decimal::ZERO || reserve_in <= Decimal::ZERO || reserve_out <= Decimal::ZERO {
        return Decimal::ZERO;
    }
    let Some(multiplier) = fee_multiplier(fee_bps) else {
        return Decimal::ZERO;
    };

    let cap = output_cap(reserve_out, margin_bps);
    let effective_in = amount_in * multiplier;
    let Some(denominator) = reserve_in.checked_add(effective_in) else {
        // Input dwarfs the pool; the curve is already at its asymptote.
        return cap;
    };

    mul_div(effective_in, reserve_out, denominator)
        .unwrap_or(cap)
        .min(cap)
}

/// Raw-unit output for `amount_in`, computed in 256-bit integers and floored.
///
/// Mirrors [`compute_output_amount_with_margin`] on ledger amounts.
pub fn compute_output_amount_raw(
    amount_in: u64,
    reserve_in: u64,
    reserve_out: u64,
    fee_bps: u32,
    margin_bps: u32,
) -> u64 {
    if amount_in == 0 || reserve_in == 0 || reserve_out == 0 || fee_bps >= BPS_DENOMINATOR {
        return 0;
    }
    let denominator_bps = U256::from(BPS_DENOMINATOR);
    let reserve_out = U256::from(reserve_out);

    let amount_in_with_fee = U256::from(amount_in) * U256::from(BPS_DENOMINATOR - fee_bps);
    let numerator = amount_in_with_fee * reserve_out;
    let denominator = U256::from(reserve_in) * denominator_bps + amount_in_with_fee;
    let amount_out = numerator / denominator;

    let retained = BPS_DENOMINATOR.saturating_sub(margin_bps.min(BPS_DENOMINATOR));
    let cap = reserve_out * U256::from(retained) / denominator_bps;

    // Both operands are bounded by reserve_out, which came from a u64.
    amount_out.min(cap).low_u64()
}

/// Input needed to receive exactly `desired_out`.
///
/// formula: dx = dy * x / ((y - dy) * (1 - fee))
///
/// Returns `None` when the target is not positive or not strictly below
/// `reserve_out`, or when the pool is empty on the input side.
pub fn compute_required_input(
    desired_out: Decimal,
    reserve_in: Decimal,
    reserve_out: Decimal,
    fee_bps: u32,
) -> Option<Decimal> {
    if desired_out <= Decimal::ZERO || desired_out >= reserve_out || reserve_in <= Decimal::ZERO {
        return None;
    }
    let multiplier = fee_multiplier(fee_bps)?;
    let denominator = (reserve_out - desired_out).checked_mul(multiplier)?;
    mul_div(desired_out, reserve_in, denominator)
}

/// Raw-unit input needed to receive at least `desired_out`, rounded up.
pub fn compute_required_input_raw(
    desired_out: u64,
    reserve_in: u64,
    reserve_out: u64,
    fee_bps: u32,
) -> Option<u64> {
    if desired_out == 0 || desired_out >= reserve_out || reserve_in == 0 {
        return None;
    }
    if fee_bps >= BPS_DENOMINATOR {
        return None;
    }
    let numerator =
        U256::from(desired_out) * U256::from(reserve_in) * U256::from(BPS_DENOMINATOR);
    let denominator =
        U256::from(reserve_out - desired_out) * U256::from(BPS_DENOMINATOR - fee_bps);
    let (quotient, remainder) = numerator.div_mod(denominator);
    let required = if remainder.is_zero() {
        quotient
    } else {
        quotient + U256::one()
    };

    if required > U256::from(u64::MAX) {
        return None;
    }
    Some(required.low_u64())
}

/// Price impact of `amount_in` as a percentage, using the default safety margin.
///
/// before = y / x, after = (y - dy) / (x + dx), impact = |after - before| / before * 100
pub fn compute_price_impact(
    amount_in: Decimal,
    reserve_in: Decimal,
    reserve_out: Decimal,
    fee_bps: u32,
) -> Decimal {
    compute_price_impact_with_margin(
        amount_in,
        reserve_in,
        reserve_out,
        fee_bps,
        DEFAULT_RESERVE_SAFETY_MARGIN_BPS,
    )
}

/// Price impact of `amount_in` as a percentage, never negative.
pub fn compute_price_impact_with_margin(
    amount_in: Decimal,
    reserve_in: Decimal,
    reserve_out: Decimal,
    fee_bps: u32,
    margin_bps: u32,
) -> Decimal {
    if amount_in <= Decimal::ZERO || reserve_in <= Decimal::ZERO || reserve_out <= Decimal::ZERO {
        return Decimal::ZERO;
    }
    let amount_out =
        compute_output_amount_with_margin(amount_in, reserve_in, reserve_out, fee_bps, margin_bps);

    let before = calculate_spot_price(reserve_in, reserve_out).value;
    let Some(new_reserve_in) = reserve_in.checked_add(amount_in) else {
        return Decimal::ONE_HUNDRED;
    };
    let after = Price::from_ratio(reserve_out - amount_out, new_reserve_in).value;

    mul_div((after - before).abs(), Decimal::ONE_HUNDRED, before).unwrap_or(Decimal::ZERO)
}

/// Calculates the spot price of token_in in terms of token_out
/// Price = reserve_out / reserve_in
pub fn calculate_spot_price(reserve_in: Decimal, reserve_out: Decimal) -> Price {
    Price::from_ratio(reserve_out, reserve_in)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_compute_output_amount() {
        // 1000/1000 pool, 10 in at 0.3%
        // effective = 9.97, out = 9.97 * 1000 / 1009.97 = 9.8715...
        let out = compute_output_amount(dec!(10), dec!(1000), dec!(1000), 30);
        assert_eq!(out.round_dp(4), dec!(9.8716));
    }

    #[test]
    fn test_zero_and_negative_inputs_yield_zero() {
        assert_eq!(
            compute_output_amount(Decimal::ZERO, dec!(1000), dec!(1000), 30),
            Decimal::ZERO
        );
        assert_eq!(
            compute_output_amount(dec!(10), dec!(-1), dec!(1000), 30),
            Decimal::ZERO
        );
        assert_eq!(
            compute_output_amount(dec!(10), dec!(1000), Decimal::ZERO, 30),
            Decimal::ZERO
        );
    }

    #[test]
    fn test_output_stays_below_reserve() {
        let reserve_out = dec!(500);
        for amount_in in [dec!(0.000001), dec!(1), dec!(1000), dec!(1000000000000)] {
            for fee_bps in [0, 30, 9_999] {
                let out = compute_output_amount(amount_in, dec!(1000), reserve_out, fee_bps);
                assert!(out < reserve_out, "{amount_in} at {fee_bps} bps gave {out}");
            }
        }
    }

    #[test]
    fn test_output_is_clamped_by_margin() {
        let out = compute_output_amount(dec!(1000000000), dec!(1), dec!(1000), 0);
        assert_eq!(out, dec!(999));
    }

    #[test]
    fn test_output_is_strictly_increasing() {
        let mut previous = Decimal::ZERO;
        for amount_in in [dec!(1), dec!(2), dec!(10), dec!(50), dec!(100), dec!(400)] {
            let out = compute_output_amount(amount_in, dec!(1000), dec!(2000), 30);
            assert!(out > previous);
            previous = out;
        }
    }

    #[test]
    fn test_required_input_round_trip() {
        let reserve_in = dec!(1000);
        let reserve_out = dec!(2000);
        for amount_in in [dec!(0.5), dec!(10), dec!(250)] {
            let out = compute_output_amount(amount_in, reserve_in, reserve_out, 30);
            let back = compute_required_input(out, reserve_in, reserve_out, 30).unwrap();
            assert!((back - amount_in).abs() < dec!(0.000000001), "{amount_in} -> {back}");
        }
    }

    #[test]
    fn test_required_input_unavailable() {
        assert_eq!(
            compute_required_input(dec!(2000), dec!(1000), dec!(2000), 30),
            None
        );
        assert_eq!(
            compute_required_input(Decimal::ZERO, dec!(1000), dec!(2000), 30),
            None
        );
        assert_eq!(
            compute_required_input(dec!(1), Decimal::ZERO, dec!(2000), 30),
            None
        );
    }

    #[test]
    fn test_price_impact_grows_with_size() {
        let small = compute_price_impact(dec!(1), dec!(1000), dec!(1000), 30);
        let medium = compute_price_impact(dec!(10), dec!(1000), dec!(1000), 30);
        let large = compute_price_impact(dec!(500), dec!(1000), dec!(1000), 30);

        assert!(small >= Decimal::ZERO);
        assert!(small < medium);
        assert!(medium < large);
        assert_eq!(
            compute_price_impact(Decimal::ZERO, dec!(1000), dec!(1000), 30),
            Decimal::ZERO
        );
    }

    #[test]
    fn test_compute_output_amount_raw() {
        // 1000 reserve0, 1000 reserve1, 10 input, 0.3% fee (30 bps)
        // amount_in_with_fee = 10 * 9970 = 99700 (scaled by 10000)
        // numerator = 99700 * 1000 = 99,700,000
        // denominator = 1000 * 10000 + 99700 = 10,099,700
        // out = 99,700,000 / 10,099,700 = 9.8715... -> 9
        assert_eq!(compute_output_amount_raw(10, 1000, 1000, 30, 10), 9);
        assert_eq!(compute_output_amount_raw(0, 1000, 1000, 30, 10), 0);
        assert_eq!(compute_output_amount_raw(u64::MAX, 1, 1000, 0, 10), 999);
    }

    #[test]
    fn test_required_input_raw_delivers_target() {
        let (reserve_in, reserve_out) = (5_000_000_000u64, 750_000_000u64);
        let desired = 10_000_000u64;
        let required = compute_required_input_raw(desired, reserve_in, reserve_out, 30).unwrap();

        assert!(compute_output_amount_raw(required, reserve_in, reserve_out, 30, 0) >= desired);
        assert!(compute_output_amount_raw(required - 1, reserve_in, reserve_out, 30, 0) < desired);
        assert_eq!(
            compute_required_input_raw(reserve_out, reserve_in, reserve_out, 30),
            None
        );
    }

    #[test]
    fn test_calculate_spot_price() {
        let price = calculate_spot_price(dec!(2000), dec!(1000));
        assert_eq!(price.value, dec!(0.5));
        assert!(calculate_spot_price(Decimal::ZERO, dec!(1000)).is_zero());
    }
}
