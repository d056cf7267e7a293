use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::AmortizationError;

/// Amortization method used to split each installment into principal and interest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum AmortizationSystem {
    /// French system: constant installment, growing principal portion.
    Price,
    /// Constant amortization: fixed principal portion, decreasing installment.
    Sac,
}

impl AmortizationSystem {
    /// Every supported system, in display order.
    pub const ALL: [AmortizationSystem; 2] = [AmortizationSystem::Price, AmortizationSystem::Sac];

    /// The canonical upper-case name used on forms and in JSON.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Price => "PRICE",
            Self::Sac => "SAC",
        }
    }
}

impl fmt::Display for AmortizationSystem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AmortizationSystem {
    type Err = AmortizationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "PRICE" | "FRENCH" => Ok(Self::Price),
            "SAC" => Ok(Self::Sac),
            _ => Err(AmortizationError::UnsupportedAmortizationSystem(s.to_string())),
        }
    }
}

impl TryFrom<String> for AmortizationSystem {
    type Error = AmortizationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<AmortizationSystem> for String {
    fn from(value: AmortizationSystem) -> Self {
        value.as_str().to_string()
    }
}

/// Input parameters for an installment simulation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AmortizationRequest {
    /// The total financed amount.
    pub principal: Decimal,
    /// The interest rate as a percentage (e.g., 1.5 for 1.5%).
    ///
    /// Read as a monthly rate unless the engine is configured otherwise.
    pub rate_percent: Decimal,
    /// The number of monthly installments.
    pub term_months: u32,
    pub system: AmortizationSystem,
    /// Reference date of the first installment. Only used to date the lines.
    pub start_date: NaiveDate,
}

/// A single period of the schedule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InstallmentLine {
    /// 1-based period index.
    pub number: u32,
    pub due_date: NaiveDate,
    /// Total paid in the period: principal plus interest.
    pub gross_value: Decimal,
    pub principal_portion: Decimal,
    pub interest_portion: Decimal,
    /// Outstanding principal after this installment.
    pub remaining_balance: Decimal,
    pub cumulative_paid: Decimal,
    pub cumulative_interest: Decimal,
}

/// A complete installment schedule and its totals.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AmortizationResult {
    pub system: AmortizationSystem,
    pub principal: Decimal,
    /// The monthly rate actually applied, as a decimal fraction (0.01 for 1%).
    pub monthly_rate: Decimal,
    /// The nominal installment of the PRICE system. `None` for SAC.
    pub fixed_installment: Option<Decimal>,
    /// The principal paid each period under SAC. `None` for PRICE.
    pub fixed_amortization: Option<Decimal>,
    pub installments: Vec<InstallmentLine>,
    pub first_installment_amount: Decimal,
    pub last_installment_amount: Decimal,
    pub total_interest: Decimal,
    /// `principal + total_interest`.
    pub total_cost: Decimal,
    /// Constant decrease between consecutive SAC installments. Zero for PRICE.
    pub monthly_decrease_amount: Decimal,
}

/// Both amortization systems simulated for the same input.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SystemComparison {
    pub price: AmortizationResult,
    pub sac: AmortizationResult,
    /// How much less interest SAC pays than PRICE. Never negative for a positive rate.
    pub interest_savings: Decimal,
}
