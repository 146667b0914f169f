//! Peso amounts kept as integer centavos.

use std::{
    fmt,
    iter::Sum,
    ops::{Add, Sub},
    str::FromStr,
};

use serde::{Deserialize, Serialize};

use crate::EngineError;

/// Amount of pesos stored as **integer centavos**.
///
/// Package prices, payments and debts all use it. It is signed because a
/// debt goes below zero once a client pays more than the package price.
///
/// ```rust
/// use engine::Money;
///
/// let price = Money::from_major(1250);
/// let paid = Money::new(100_000);
/// assert_eq!((price - paid).to_string(), "$250.00");
/// assert_eq!("1250,5".parse::<Money>().unwrap().minor(), 125_050);
/// ```
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
#[repr(transparent)]
pub struct Money(i64);

impl Money {
    pub const ZERO: Money = Money(0);

    /// Largest price or payment the ledger accepts. Stored amounts are summed
    /// by the database in `i64`, so this must stay far below `i64::MAX`.
    pub const LIMIT: Money = Money::from_major(10_000_000);

    #[must_use]
    pub const fn new(minor: i64) -> Self {
        Self(minor)
    }

    /// Whole pesos.
    #[must_use]
    pub const fn from_major(major: i64) -> Self {
        Self(major * 100)
    }

    #[must_use]
    pub const fn minor(self) -> i64 {
        self.0
    }

    #[must_use]
    pub const fn is_zero(self) -> bool {
        self.0 == 0
    }

    #[must_use]
    pub const fn is_positive(self) -> bool {
        self.0 > 0
    }

    #[must_use]
    pub const fn is_negative(self) -> bool {
        self.0 < 0
    }

    /// `true` for amounts between zero and [`Money::LIMIT`], both included.
    #[must_use]
    pub const fn is_storable(self) -> bool {
        self.0 >= 0 && self.0 <= Self::LIMIT.0
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0 < 0 {
            f.write_str("-")?;
        }
        let centavos = self.0.unsigned_abs();
        write!(f, "${}.{:02}", centavos / 100, centavos % 100)
    }
}

impl Add for Money {
    type Output = Money;

    fn add(self, rhs: Money) -> Money {
        Money(self.0 + rhs.0)
    }
}

impl Sub for Money {
    type Output = Money;

    fn sub(self, rhs: Money) -> Money {
        Money(self.0 - rhs.0)
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Self {
        Money(iter.map(Money::minor).sum())
    }
}

impl<'a> Sum<&'a Money> for Money {
    fn sum<I: Iterator<Item = &'a Money>>(iter: I) -> Self {
        iter.copied().sum()
    }
}

/// Parses an ASCII digit run, `None` when empty, non numeric or too large.
fn digits(raw: &str) -> Option<i64> {
    if raw.is_empty() || !raw.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    raw.parse().ok()
}

impl FromStr for Money {
    type Err = EngineError;

    /// Reads amounts typed on the clinic forms: `1250`, `$1250.50`, `10,5`
    /// or `-3.00`. At most two decimals.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = |reason: &str| EngineError::Validation(format!("monto inválido: {reason}"));

        let text = s.trim();
        let (negative, text) = match text.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, text.strip_prefix('+').unwrap_or(text)),
        };
        let text = text.trim_start();
        let text = text.strip_prefix('$').unwrap_or(text);
        if text.is_empty() {
            return Err(invalid("vacío"));
        }

        let (pesos, fraction) = match text.split_once(['.', ',']) {
            Some((pesos, fraction)) => (pesos, fraction),
            None => (text, ""),
        };
        let pesos = digits(pesos).ok_or_else(|| invalid(text))?;
        let centavos = match fraction.len() {
            0 => 0,
            1 => digits(fraction).ok_or_else(|| invalid(text))? * 10,
            2 => digits(fraction).ok_or_else(|| invalid(text))?,
            _ => return Err(invalid("demasiados decimales")),
        };

        let minor = pesos
            .checked_mul(100)
            .and_then(|value| value.checked_add(centavos))
            .ok_or_else(|| invalid("demasiado grande"))?;
        Ok(Money(if negative { -minor } else { minor }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_formats_pesos() {
        assert_eq!(Money::new(0).to_string(), "$0.00");
        assert_eq!(Money::new(1).to_string(), "$0.01");
        assert_eq!(Money::new(1050).to_string(), "$10.50");
        assert_eq!(Money::from_major(1250).to_string(), "$1250.00");
        assert_eq!(Money::new(-25000).to_string(), "-$250.00");
        assert_eq!(Money::LIMIT.to_string(), "$10000000.00");
    }

    #[test]
    fn parse_accepts_dot_comma_and_dollar_sign() {
        assert_eq!("10".parse::<Money>().unwrap().minor(), 1000);
        assert_eq!("10.5".parse::<Money>().unwrap().minor(), 1050);
        assert_eq!("10,50".parse::<Money>().unwrap().minor(), 1050);
        assert_eq!("$1250".parse::<Money>().unwrap().minor(), 125000);
        assert_eq!("-0.01".parse::<Money>().unwrap().minor(), -1);
        assert_eq!("  2.30 ".parse::<Money>().unwrap().minor(), 230);
        assert_eq!("7.".parse::<Money>().unwrap().minor(), 700);
    }

    #[test]
    fn parse_rejects_garbage_and_extra_decimals() {
        assert!("12.345".parse::<Money>().is_err());
        assert!("".parse::<Money>().is_err());
        assert!("$".parse::<Money>().is_err());
        assert!("1.2.3".parse::<Money>().is_err());
        assert!("abc".parse::<Money>().is_err());
        assert!(".50".parse::<Money>().is_err());
        assert!("99999999999999999999".parse::<Money>().is_err());
    }

    #[test]
    fn storable_range() {
        assert!(Money::ZERO.is_storable());
        assert!(Money::LIMIT.is_storable());
        assert!(!(Money::LIMIT + Money::new(1)).is_storable());
        assert!(!Money::new(-1).is_storable());
    }

    #[test]
    fn sums_payments() {
        let total: Money = [Money::from_major(1000), Money::from_major(250)]
            .iter()
            .sum();
        assert_eq!(total, Money::from_major(1250));
    }
}
