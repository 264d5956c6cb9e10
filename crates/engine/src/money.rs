use crate::Currency;

/// Signed money amount represented as integer **minor units**.
///
/// The engine itself computes commission splits in `f64` major units because
/// every figure is the product of percentages. `Money` is where those figures
/// are rounded once, at the reporting boundary, so report rows add up to the
/// cent the same way every time.
///
/// # Examples
///
/// ```rust
/// use engine::{Currency, Money};
///
/// let fee = Money::from_major(3600.0, Currency::Usd);
/// assert_eq!(fee.minor(), 360_000);
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(transparent)]
pub struct Money(i64);

impl Money {
    pub const ZERO: Money = Money(0);

    /// Rounds a major-unit amount (half away from zero) into minor units.
    ///
    /// Non-finite input maps to zero; out-of-range values saturate.
    #[must_use]
    pub fn from_major(amount: f64, currency: Currency) -> Self {
        if !amount.is_finite() {
            return Self::ZERO;
        }
        let scale = 10f64.powi(i32::from(currency.minor_units()));
        Self((amount * scale).round() as i64)
    }

    /// Returns the raw value in minor units.
    #[must_use]
    pub const fn minor(self) -> i64 {
        self.0
    }
}
