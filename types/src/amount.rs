//! Conversion between human-denominated and atomic amounts.
//!
//! Human amounts are [`Decimal`]s (`0.5` eth); atomic amounts are unsigned
//! 256-bit integers in the asset's smallest unit (`500000000000000000` wei),
//! the full range the platform reports. The scale factor is `10^decimals`,
//! taken from the asset's metadata.
//!
//! Atomic amounts never go through `Decimal` arithmetic; only the human side
//! does. A `Decimal` carries 28 significant digits, so [`to_human`] rounds
//! balances that need more than that.

use ethers::types::U256;
use rust_decimal::Decimal;

use crate::error::ConversionError;

/// An amount in an asset's smallest unit.
pub type AtomicAmount = U256;

/// Largest `decimals` whose scale factor fits in 256 bits.
pub const MAX_DECIMALS: u32 = 77;

/// Largest scale a `Decimal` can carry.
const DECIMAL_MAX_SCALE: u32 = 28;

/// Largest `Decimal` mantissa (2^96 - 1).
const DECIMAL_MAX_MANTISSA: u128 = 79_228_162_514_264_337_593_543_950_335;

#[derive(Clone, Copy)]
enum Rounding {
    HalfUp,
    Up,
}

fn pow10(exp: u32) -> Result<U256, ConversionError> {
    if exp > MAX_DECIMALS {
        return Err(ConversionError::DecimalsTooLarge(exp));
    }
    Ok(U256::exp10(exp as usize))
}

/// `value / 10^exp`, rounded.
fn div_pow10(value: U256, exp: u32, rounding: Rounding) -> Result<U256, ConversionError> {
    if exp == 0 {
        return Ok(value);
    }
    let divisor = pow10(exp)?;
    let (quotient, remainder) = value.div_mod(divisor);
    let round_up = match rounding {
        Rounding::HalfUp => remainder >= divisor - remainder,
        Rounding::Up => !remainder.is_zero(),
    };
    Ok(if round_up {
        quotient + U256::one()
    } else {
        quotient
    })
}

fn scale_up(human: Decimal, decimals: u32, rounding: Rounding) -> Result<AtomicAmount, ConversionError> {
    if decimals > MAX_DECIMALS {
        return Err(ConversionError::DecimalsTooLarge(decimals));
    }
    if human.is_sign_negative() && !human.is_zero() {
        return Err(ConversionError::Negative(human.to_string()));
    }

    let mantissa = U256::from(human.mantissa().unsigned_abs());
    let scale = human.scale();
    if decimals >= scale {
        mantissa
            .checked_mul(pow10(decimals - scale)?)
            .ok_or_else(|| ConversionError::Overflow {
                amount: human.to_string(),
                decimals,
            })
    } else {
        div_pow10(mantissa, scale - decimals, rounding)
    }
}

/// `round(human * 10^decimals)`, half away from zero.
///
/// Negative amounts are rejected rather than having their sign dropped.
pub fn to_atomic(human: Decimal, decimals: u32) -> Result<AtomicAmount, ConversionError> {
    scale_up(human, decimals, Rounding::HalfUp)
}

/// `ceil(human * 10^decimals)`: the fewest atomic units covering `human`.
///
/// `human > balance` exactly when `to_atomic_ceil(human) > atomic_balance`.
pub fn to_atomic_ceil(human: Decimal, decimals: u32) -> Result<AtomicAmount, ConversionError> {
    scale_up(human, decimals, Rounding::Up)
}

/// `atomic / 10^decimals`, normalized (no trailing zeros).
///
/// Digits beyond a `Decimal`'s 28 significant digits are rounded half up.
/// Fails with [`ConversionError::Overflow`] when the whole part alone does not
/// fit.
pub fn to_human(atomic: AtomicAmount, decimals: u32) -> Result<Decimal, ConversionError> {
    if decimals > MAX_DECIMALS {
        return Err(ConversionError::DecimalsTooLarge(decimals));
    }
    let overflow = || ConversionError::Overflow {
        amount: atomic.to_string(),
        decimals,
    };

    let max = U256::from(DECIMAL_MAX_MANTISSA);
    let mut dropped = decimals.saturating_sub(DECIMAL_MAX_SCALE);
    let mut mantissa = div_pow10(atomic, dropped, Rounding::HalfUp)?;
    while mantissa > max {
        dropped += 1;
        if dropped > decimals {
            return Err(overflow());
        }
        mantissa = div_pow10(atomic, dropped, Rounding::HalfUp)?;
    }

    let mantissa = i128::try_from(mantissa.low_u128()).map_err(|_| overflow())?;
    Decimal::try_from_i128_with_scale(mantissa, decimals - dropped)
        .map(|d| d.normalize())
        .map_err(|_| overflow())
}

/// Parse an atomic amount as sent by the platform (a base-10 unsigned
/// integer string, up to `2^256 - 1`).
pub fn parse_atomic(raw: &str) -> Result<AtomicAmount, ConversionError> {
    let digits = raw.trim();
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return Err(ConversionError::InvalidAtomic(raw.to_string()));
    }
    U256::from_dec_str(digits).map_err(|_| ConversionError::InvalidAtomic(raw.to_string()))
}
