//! # Math
//!
//! Full-precision `floor(a * b / d)` over `u128` words and the exchange
//! conversions built on it.
//!
//! The product of two words is formed as a 256-bit `(hi, lo)` pair. When the
//! high word is non-zero the quotient is obtained by an exact two-word by
//! one-word division: the remainder is subtracted so the division is exact,
//! the denominator's power-of-two factor is shifted out, and the odd part is
//! divided by multiplying with its inverse modulo `2^128`.
//!
//! Conversions between the two assets are always two `mul_div` steps (scale by
//! price, then rebase decimals) so that widely differing decimal bases never
//! collapse precision in a single step.

use crate::Error;

/// Fixed-point scale for prices (18 decimals).
pub const PRICE_SCALE: u128 = 1_000_000_000_000_000_000;

/// Fixed-point scale for the fee rate; `FEE_SCALE` is 100%.
pub const FEE_SCALE: u128 = 1_000_000_000_000_000_000;

/// Highest decimal precision accepted for either asset.
pub const MAX_DECIMALS: u32 = 18;

const LOW_MASK: u128 = u64::MAX as u128;

/// 256-bit product of `a` and `b` as `(hi, lo)`.
pub fn full_mul(a: u128, b: u128) -> (u128, u128) {
    let (a1, a0) = (a >> 64, a & LOW_MASK);
    let (b1, b0) = (b >> 64, b & LOW_MASK);

    let p00 = a0 * b0;
    let p01 = a0 * b1;
    let p10 = a1 * b0;
    let p11 = a1 * b1;

    // Each term is below 2^64, so the sum cannot overflow.
    let mid = (p00 >> 64) + (p01 & LOW_MASK) + (p10 & LOW_MASK);
    let lo = (mid << 64) | (p00 & LOW_MASK);
    let hi = p11 + (p01 >> 64) + (p10 >> 64) + (mid >> 64);
    (hi, lo)
}

/// `(hi * 2^128 + lo) mod d`, requires `hi < d`.
fn wide_rem(hi: u128, lo: u128, d: u128) -> u128 {
    let mut rem = hi;
    for bit in (0..128).rev() {
        let carry = rem >> 127;
        rem = (rem << 1) | ((lo >> bit) & 1);
        if carry == 1 || rem >= d {
            rem = rem.wrapping_sub(d);
        }
    }
    rem
}

/// `floor(a * b / denominator)` without intermediate overflow.
///
/// Fails with [`Error::DivisionByZero`] for a zero denominator and with
/// [`Error::ArithmeticOverflow`] when the quotient does not fit in `u128`.
pub fn mul_div(a: u128, b: u128, denominator: u128) -> Result<u128, Error> {
    if denominator == 0 {
        return Err(Error::DivisionByZero);
    }

    let (mut hi, mut lo) = full_mul(a, b);
    if hi == 0 {
        return Ok(lo / denominator);
    }
    if denominator <= hi {
        return Err(Error::ArithmeticOverflow);
    }

    // Make the division exact.
    let remainder = wide_rem(hi, lo, denominator);
    if remainder > lo {
        hi -= 1;
    }
    lo = lo.wrapping_sub(remainder);

    // Strip the power-of-two factor from the denominator.
    let twos = denominator & denominator.wrapping_neg();
    let denominator = denominator / twos;
    lo /= twos;

    // Shift the high word in: 2^128 / twos, which wraps to 0 when twos == 1.
    let flip = (twos.wrapping_neg() / twos).wrapping_add(1);
    lo |= hi.wrapping_mul(flip);

    // Inverse of the odd denominator mod 2^128. The seed is correct to four
    // bits and each Newton-Raphson step doubles that: 8, 16, 32, 64, 128.
    let mut inverse = denominator.wrapping_mul(3) ^ 2;
    for _ in 0..5 {
        inverse = inverse.wrapping_mul(2u128.wrapping_sub(denominator.wrapping_mul(inverse)));
    }

    Ok(lo.wrapping_mul(inverse))
}

/// `10^decimals` as a `u128`.
pub fn pow10(decimals: u32) -> Result<u128, Error> {
    10u128
        .checked_pow(decimals)
        .ok_or(Error::ArithmeticOverflow)
}

/// Reinterpret a token amount as unsigned units.
pub fn to_units(amount: i128) -> Result<u128, Error> {
    u128::try_from(amount).map_err(|_| Error::InvalidAmount)
}

/// Reinterpret unsigned units as a token amount.
pub fn from_units(units: u128) -> Result<i128, Error> {
    i128::try_from(units).map_err(|_| Error::ArithmeticOverflow)
}

/// Offer-asset units bought by `amount` payment-asset units at `price`.
pub fn payment_to_offer(
    amount: i128,
    price: u128,
    payment_decimals: u32,
    offer_decimals: u32,
) -> Result<i128, Error> {
    let scaled = mul_div(to_units(amount)?, price, pow10(payment_decimals)?)?;
    from_units(mul_div(scaled, pow10(offer_decimals)?, PRICE_SCALE)?)
}

/// Payment-asset units equivalent to `amount` offer-asset units at `price`.
pub fn offer_to_payment(
    amount: i128,
    price: u128,
    payment_decimals: u32,
    offer_decimals: u32,
) -> Result<i128, Error> {
    let scaled = mul_div(to_units(amount)?, PRICE_SCALE, pow10(offer_decimals)?)?;
    from_units(mul_div(scaled, pow10(payment_decimals)?, price)?)
}

/// Protocol fee owed on `amount` at `fee_rate`.
pub fn fee_on(amount: i128, fee_rate: u128) -> Result<i128, Error> {
    from_units(mul_div(to_units(amount)?, fee_rate, FEE_SCALE)?)
}

/// Smallest accepted contribution for a payment asset of `decimals` precision.
pub fn min_contribution(decimals: u32) -> Result<i128, Error> {
    from_units(pow10(decimals / 2)?)
}
