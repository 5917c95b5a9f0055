use core::{fmt, str::FromStr};

use alloy_primitives::U256;
use serde::{Deserialize, Serialize};

/// Non-negative fixed-point decimal with [`Dec::PRECISION`] fractional digits.
///
/// Gas prices (fee per unit of gas) are carried as [`Dec`] while coin amounts stay integers. The
/// value is stored as the raw integer `value * 10^18`.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Dec(U256);

/// Error parsing a [`Dec`] from its decimal string form.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DecParseError {
    /// The input is empty or has no digits on one side of the point.
    #[error("invalid decimal: {0:?}")]
    Invalid(String),
    /// More fractional digits than the supported precision.
    #[error("decimal {input:?} has more than {precision} fractional digits")]
    TooPrecise {
        /// The offending input.
        input: String,
        /// Supported number of fractional digits.
        precision: u8,
    },
    /// The value does not fit in 256 bits.
    #[error("decimal {0:?} out of range")]
    Overflow(String),
}

impl Dec {
    /// Number of fractional digits.
    pub const PRECISION: u8 = 18;

    /// Raw value of `1`.
    const ONE_RAW: U256 = U256::from_limbs([1_000_000_000_000_000_000, 0, 0, 0]);

    /// The decimal `0`.
    pub const ZERO: Self = Self(U256::ZERO);

    /// The decimal `1`.
    pub const ONE: Self = Self(Self::ONE_RAW);

    /// Creates a decimal from its raw representation (`value * 10^18`).
    pub const fn from_raw(raw: U256) -> Self {
        Self(raw)
    }

    /// Returns the raw representation (`value * 10^18`).
    pub const fn raw(self) -> U256 {
        self.0
    }

    /// Creates a decimal from an integer. Returns `None` if the value does not fit.
    pub fn from_int(value: U256) -> Option<Self> {
        value.checked_mul(Self::ONE_RAW).map(Self)
    }

    /// Creates a decimal from a `u64`.
    pub fn from_u64(value: u64) -> Self {
        // u64::MAX * 10^18 < 2^128
        Self(U256::from(value) * Self::ONE_RAW)
    }

    /// Whether the value is zero.
    pub fn is_zero(self) -> bool {
        self.0.is_zero()
    }

    /// Multiplies by an integer.
    pub fn checked_mul_int(self, rhs: U256) -> Option<Self> {
        self.0.checked_mul(rhs).map(Self)
    }

    /// Adds two decimals.
    pub fn checked_add(self, rhs: Self) -> Option<Self> {
        self.0.checked_add(rhs.0).map(Self)
    }

    /// Subtracts two decimals, `None` if the result would be negative.
    pub fn checked_sub(self, rhs: Self) -> Option<Self> {
        self.0.checked_sub(rhs.0).map(Self)
    }

    /// Divides by an integer, truncating. `None` on division by zero.
    pub fn checked_div_int(self, rhs: U256) -> Option<Self> {
        (!rhs.is_zero()).then(|| Self(self.0 / rhs))
    }

    /// Multiplies by `10^exp`.
    pub fn checked_mul_pow10(self, exp: u8) -> Option<Self> {
        let factor = U256::from(10u64).checked_pow(U256::from(exp))?;
        self.0.checked_mul(factor).map(Self)
    }

    /// Integer part, rounding toward zero.
    pub fn truncate(self) -> U256 {
        self.0 / Self::ONE_RAW
    }

    /// Integer part, rounding up.
    pub fn ceil(self) -> U256 {
        let (quotient, remainder) = self.0.div_rem(Self::ONE_RAW);
        if remainder.is_zero() {
            quotient
        } else {
            quotient + U256::from(1u64)
        }
    }
}

impl From<u64> for Dec {
    fn from(value: u64) -> Self {
        Self::from_u64(value)
    }
}

impl fmt::Display for Dec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (int, frac) = self.0.div_rem(Self::ONE_RAW);
        write!(f, "{int}.{:0>18}", frac.to_string())
    }
}

impl FromStr for Dec {
    type Err = DecParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || DecParseError::Invalid(s.to_string());
        let (int_part, frac_part) = match s.split_once('.') {
            Some((int, frac)) => (int, frac),
            None => (s, ""),
        };
        if int_part.is_empty() || (s.contains('.') && frac_part.is_empty()) {
            return Err(invalid());
        }
        if !int_part.bytes().chain(frac_part.bytes()).all(|b| b.is_ascii_digit()) {
            return Err(invalid());
        }
        if frac_part.len() > Self::PRECISION as usize {
            return Err(DecParseError::TooPrecise {
                input: s.to_string(),
                precision: Self::PRECISION,
            });
        }

        let overflow = || DecParseError::Overflow(s.to_string());
        let int = U256::from_str_radix(int_part, 10).map_err(|_| overflow())?;
        let frac = if frac_part.is_empty() {
            U256::ZERO
        } else {
            let padded = format!("{frac_part:0<18}");
            U256::from_str_radix(&padded, 10).map_err(|_| invalid())?
        };
        int.checked_mul(Self::ONE_RAW)
            .and_then(|raw| raw.checked_add(frac))
            .map(Self)
            .ok_or_else(overflow)
    }
}
