use std::{
    fmt,
    ops::{Add, AddAssign, Neg, Sub, SubAssign},
};

/// Signed amount of whole Naira.
///
/// The ledger never deals in kobo: prices, commissions and cash counts are
/// all whole Naira, so the value is a plain `i64`. The type is used where an
/// amount leaves the engine as text (notifications, logs).
///
/// # Examples
///
/// ```rust
/// use engine::Naira;
///
/// assert_eq!(Naira::new(52_300).to_string(), "₦52,300");
/// assert_eq!(Naira::new(-500).to_string(), "-₦500");
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(transparent)]
pub struct Naira(i64);

impl Naira {
    pub const ZERO: Naira = Naira(0);

    #[must_use]
    pub const fn new(amount: i64) -> Self {
        Self(amount)
    }

    #[must_use]
    pub const fn amount(self) -> i64 {
        self.0
    }

    /// Returns the amount with an explicit sign, used for variances.
    #[must_use]
    pub fn signed(self) -> String {
        if self.0 > 0 {
            format!("+{self}")
        } else {
            self.to_string()
        }
    }
}

impl fmt::Display for Naira {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let digits = self.0.unsigned_abs().to_string();
        let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
        for (i, ch) in digits.chars().enumerate() {
            if i > 0 && (digits.len() - i) % 3 == 0 {
                grouped.push(',');
            }
            grouped.push(ch);
        }
        write!(f, "{sign}₦{grouped}")
    }
}

impl From<i64> for Naira {
    fn from(value: i64) -> Self {
        Self(value)
    }
}

impl From<Naira> for i64 {
    fn from(value: Naira) -> Self {
        value.0
    }
}

impl Add for Naira {
    type Output = Naira;

    fn add(self, rhs: Naira) -> Self::Output {
        Naira(self.0 + rhs.0)
    }
}

impl AddAssign for Naira {
    fn add_assign(&mut self, rhs: Naira) {
        self.0 += rhs.0;
    }
}

impl Sub for Naira {
    type Output = Naira;

    fn sub(self, rhs: Naira) -> Self::Output {
        Naira(self.0 - rhs.0)
    }
}

impl SubAssign for Naira {
    fn sub_assign(&mut self, rhs: Naira) {
        self.0 -= rhs.0;
    }
}

impl Neg for Naira {
    type Output = Naira;

    fn neg(self) -> Self::Output {
        Naira(-self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn groups_thousands() {
        assert_eq!(Naira::new(0).to_string(), "₦0");
        assert_eq!(Naira::new(999).to_string(), "₦999");
        assert_eq!(Naira::new(1_000).to_string(), "₦1,000");
        assert_eq!(Naira::new(139_500).to_string(), "₦139,500");
        assert_eq!(Naira::new(1_234_567).to_string(), "₦1,234,567");
    }

    #[test]
    fn signed_variance() {
        assert_eq!(Naira::new(500).signed(), "+₦500");
        assert_eq!(Naira::new(-7_250).signed(), "-₦7,250");
        assert_eq!(Naira::ZERO.signed(), "₦0");
    }

    #[test]
    fn arithmetic() {
        let mut total = Naira::new(1_000) + Naira::new(500);
        total -= Naira::new(200);
        assert_eq!(total, Naira::new(1_300));
        assert_eq!(-total, Naira::new(-1_300));
    }
}
