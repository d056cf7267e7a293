//! Conversion of user-facing percentage rates into the monthly factor the
//! schedule is built on.

use rust_decimal::{Decimal, MathematicalOps};
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

/// How the percentage typed by the user maps onto the monthly rate.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RateConvention {
    /// The percentage already is the monthly rate: `r = rate / 100`.
    #[default]
    Monthly,
    /// The percentage is an annual effective rate, compounded monthly.
    AnnualEffective,
}

impl RateConvention {
    /// Converts a percentage (e.g. `1.5` for 1.5%) into a monthly decimal rate.
    pub fn monthly_rate(self, rate_percent: Decimal) -> Decimal {
        match self {
            Self::Monthly => rate_percent / dec!(100),
            Self::AnnualEffective => normalize_annual_interest_rate(rate_percent),
        }
    }
}

/// Normalizes an annual interest rate percentage to a monthly decimal factor.
///
/// A rate like 12% per year becomes `(1.12)^(1/12) - 1`, roughly 0.9489% per month.
pub fn normalize_annual_interest_rate(input: Decimal) -> Decimal {
    if input.is_zero() {
        return Decimal::ZERO;
    }

    let base = Decimal::ONE + input / dec!(100);
    let exponent = Decimal::ONE / dec!(12);

    base.powd(exponent) - Decimal::ONE
}
