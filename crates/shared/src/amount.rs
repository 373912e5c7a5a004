use std::str::FromStr;

use fraction::{BigFraction, BigUint, Zero};

/// Exact decimal quantity used for every sum in the aggregation pipeline.
///
/// Amounts are arbitrary-precision rationals: summing thousands of small
/// contributions never accumulates binary rounding error and long decimals
/// never overflow. Rounding only happens through [`format`] / [`to_f64`]
/// when a value leaves the core.
pub type Amount = BigFraction;

pub fn zero() -> Amount {
    BigFraction::zero()
}

pub fn whole(value: u64) -> Amount {
    BigFraction::new(value, 1u64)
}

/// Converts a decimal literal (as read from JSON or TOML) into an amount.
///
/// The value is taken at its shortest decimal spelling, so `0.1` becomes
/// exactly 1/10 rather than the nearest binary fraction.
pub fn from_f64(value: f64) -> Amount {
    if value.is_nan() {
        return BigFraction::nan();
    }
    if value.is_infinite() {
        return if value > 0.0 {
            BigFraction::infinity()
        } else {
            BigFraction::neg_infinity()
        };
    }

    BigFraction::from_str(&value.to_string()).unwrap_or_else(|_| BigFraction::nan())
}

pub fn is_positive(amount: &Amount) -> bool {
    !amount.is_nan() && !amount.is_infinite() && *amount > zero()
}

pub fn is_non_negative(amount: &Amount) -> bool {
    !amount.is_nan() && !amount.is_infinite() && *amount >= zero()
}

/// Scaled integer representation of `amount` rounded half-up to `places`
/// decimals, with the sign split out.
fn scaled(amount: &Amount, places: u32) -> Option<(bool, BigUint, BigUint)> {
    let negative = *amount < zero();
    let (Some(numer), Some(denom)) = (amount.numer(), amount.denom()) else {
        return None;
    };

    let scale = BigUint::from(10u32).pow(places);
    let two = BigUint::from(2u32);
    let value = (numer * &scale * &two + denom) / (denom * &two);

    Some((negative, value, scale))
}

/// Renders an amount with at most `places` decimals, trailing zeros trimmed.
///
/// - 200 → "200"
/// - 12.5 → "12.5"
/// - 1/3 → "0.33"
pub fn format(amount: &Amount, places: u32) -> String {
    let Some((negative, value, scale)) = scaled(amount, places) else {
        return amount.to_string();
    };

    let sign = if negative && !value.is_zero() { "-" } else { "" };
    let integer = &value / &scale;
    let fractional = &value % &scale;

    if fractional.is_zero() {
        return format!("{sign}{integer}");
    }

    let digits = format!("{:0width$}", fractional, width = places as usize);
    format!("{sign}{integer}.{}", digits.trim_end_matches('0'))
}

/// Lossy conversion for serialized output, rounded to `places` first.
pub fn to_f64(amount: &Amount, places: u32) -> f64 {
    format(amount, places).parse().unwrap_or(0.0)
}
