//! Decimal ⟷ base-unit conversion
//!
//! Human amounts are held exactly as `mantissa / 10^scale`, so scaling by a
//! token's decimals never goes through binary floating point. Conversion to
//! base units floors: a remainder smaller than one base unit is dropped.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use num_bigint::BigUint;
use num_integer::Integer;
use num_traits::Zero;

use crate::types::RawAmount;
use crate::QuoteError;

/// Largest exponent accepted in scientific notation input
const MAX_EXPONENT: u32 = 1_000;

/// Non-negative arbitrary-precision decimal
#[derive(Debug, Clone)]
pub struct DecimalAmount {
    mantissa: BigUint,
    scale: u32,
}

fn pow10(exp: u32) -> BigUint {
    BigUint::from(10u8).pow(exp)
}

impl DecimalAmount {
    pub fn new(mantissa: BigUint, scale: u32) -> Self {
        Self { mantissa, scale }
    }

    /// `self × 10^exp`, exact
    pub fn mul_pow10(&self, exp: u32) -> Self {
        if exp <= self.scale {
            Self::new(self.mantissa.clone(), self.scale - exp)
        } else {
            Self::new(&self.mantissa * pow10(exp - self.scale), 0)
        }
    }

    /// Integer part, discarding the fraction
    pub fn floor(&self) -> BigUint {
        if self.scale == 0 {
            return self.mantissa.clone();
        }
        &self.mantissa / pow10(self.scale)
    }

    /// Round to `places` fractional digits, ties to even
    pub fn round_dp(&self, places: u32) -> Self {
        if self.scale <= places {
            return self.clone();
        }
        let divisor = pow10(self.scale - places);
        let (mut q, r) = self.mantissa.div_rem(&divisor);
        let twice = r << 1u8;
        match twice.cmp(&divisor) {
            Ordering::Greater => q += 1u8,
            Ordering::Equal if q.is_odd() => q += 1u8,
            _ => {}
        }
        Self::new(q, places)
    }

    /// Fixed-point text with exactly `places` fractional digits (like `%.6f`)
    pub fn format_fixed(&self, places: u32) -> String {
        let rounded = self.round_dp(places);
        let padded = Self::new(
            &rounded.mantissa * pow10(places - rounded.scale),
            places,
        );
        padded.render()
    }

    /// Same value with trailing fractional zeros removed
    pub fn normalized(&self) -> Self {
        let mut mantissa = self.mantissa.clone();
        let mut scale = self.scale;
        let ten = BigUint::from(10u8);
        while scale > 0 && !mantissa.is_zero() {
            let (q, r) = mantissa.div_rem(&ten);
            if !r.is_zero() {
                break;
            }
            mantissa = q;
            scale -= 1;
        }
        if mantissa.is_zero() {
            scale = 0;
        }
        Self::new(mantissa, scale)
    }

    fn render(&self) -> String {
        let digits = self.mantissa.to_string();
        if self.scale == 0 {
            return digits;
        }
        let scale = self.scale as usize;
        let padded = if digits.len() <= scale {
            format!("{}{}", "0".repeat(scale + 1 - digits.len()), digits)
        } else {
            digits
        };
        let (int_part, frac_part) = padded.split_at(padded.len() - scale);
        format!("{}.{}", int_part, frac_part)
    }

    /// Mantissas brought to a common scale
    fn aligned(&self, other: &Self) -> (BigUint, BigUint) {
        match self.scale.cmp(&other.scale) {
            Ordering::Equal => (self.mantissa.clone(), other.mantissa.clone()),
            Ordering::Less => (
                &self.mantissa * pow10(other.scale - self.scale),
                other.mantissa.clone(),
            ),
            Ordering::Greater => (
                self.mantissa.clone(),
                &other.mantissa * pow10(self.scale - other.scale),
            ),
        }
    }
}

impl PartialEq for DecimalAmount {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for DecimalAmount {}

impl PartialOrd for DecimalAmount {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for DecimalAmount {
    fn cmp(&self, other: &Self) -> Ordering {
        let (a, b) = self.aligned(other);
        a.cmp(&b)
    }
}

impl From<BigUint> for DecimalAmount {
    fn from(value: BigUint) -> Self {
        Self::new(value, 0)
    }
}

impl From<u64> for DecimalAmount {
    fn from(value: u64) -> Self {
        Self::new(BigUint::from(value), 0)
    }
}

impl FromStr for DecimalAmount {
    type Err = QuoteError;

    /// Accepts `1`, `1.3`, `.5`, `2.`, `+0.7777`, `1e-3`, `2.5E2`
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || QuoteError::InvalidAmount(s.to_string());
        let text = s.trim();
        let text = text.strip_prefix('+').unwrap_or(text);

        let (body, exponent) = match text.find(['e', 'E']) {
            Some(idx) => {
                let exp = text[idx + 1..].parse::<i64>().map_err(|_| invalid())?;
                (&text[..idx], exp)
            }
            None => (text, 0),
        };
        if exponent.unsigned_abs() > u64::from(MAX_EXPONENT) {
            return Err(invalid());
        }

        let (int_part, frac_part) = body.split_once('.').unwrap_or((body, ""));
        let all_digits = |p: &str| p.bytes().all(|b| b.is_ascii_digit());
        if int_part.is_empty() && frac_part.is_empty() {
            return Err(invalid());
        }
        if !all_digits(int_part) || !all_digits(frac_part) {
            return Err(invalid());
        }

        let digits = format!("{}{}", int_part, frac_part);
        let mantissa = BigUint::parse_bytes(digits.as_bytes(), 10).ok_or_else(invalid)?;
        let scale = u32::try_from(frac_part.len()).map_err(|_| invalid())?;
        let parsed = Self::new(mantissa, scale);

        if exponent >= 0 {
            Ok(parsed.mul_pow10(exponent as u32))
        } else {
            let shift = exponent.unsigned_abs() as u32;
            let scale = parsed.scale.checked_add(shift).ok_or_else(invalid)?;
            Ok(Self::new(parsed.mantissa, scale))
        }
    }
}

impl fmt::Display for DecimalAmount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.normalized().render())
    }
}

/// `floor(amount × 10^decimals)`
pub fn to_raw(amount: &DecimalAmount, decimals: u8) -> RawAmount {
    amount.mul_pow10(u32::from(decimals)).floor()
}

/// `raw / 10^decimals`, exact; meant for display
pub fn to_readable(raw: &RawAmount, decimals: u8) -> DecimalAmount {
    DecimalAmount::new(raw.clone(), u32::from(decimals))
}
