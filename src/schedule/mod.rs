//! Installment schedule computation for the PRICE and SAC systems.
//!
//! Every money value in a schedule is expressed in currency minor units. Rounding is
//! never compounded across periods: a line is off by less than one minor unit from
//! its exact value, and the final period always pays off the exact remaining balance.

mod price;
mod sac;

#[cfg(test)]
mod props;

use chrono::{Months, NaiveDate};
use rust_decimal::{Decimal, RoundingStrategy};
use tracing::debug;

use crate::config::EngineConfig;
use crate::error::AmortizationError;
use crate::types::{AmortizationRequest, AmortizationResult, AmortizationSystem, InstallmentLine, SystemComparison};

/// Principal and interest paid in one period, before cumulative totals are known.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Period {
    principal: Decimal,
    interest: Decimal,
}

/// The raw output of one amortization system.
#[derive(Debug, Clone)]
struct Plan {
    periods: Vec<Period>,
    fixed_installment: Option<Decimal>,
    fixed_amortization: Option<Decimal>,
    monthly_decrease: Decimal,
}

/// Computes installment schedules from validated requests.
///
/// The engine only holds immutable configuration; a single instance can be shared
/// across threads and reused for any number of requests.
#[derive(Debug, Clone, Default)]
pub struct AmortizationEngine {
    config: EngineConfig,
}

impl AmortizationEngine {
    /// Builds an engine from a configuration, validating it first.
    ///
    /// # Errors
    ///
    /// Returns an error if [`EngineConfig::validate`] rejects the configuration.
    pub fn new(config: EngineConfig) -> anyhow::Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    /// Computes the full installment schedule and its totals.
    ///
    /// # Errors
    ///
    /// Returns [`AmortizationError::InvalidArgument`] if the principal is not positive,
    /// the rate is negative, the term is outside `1..=max_term_months`, or the
    /// schedule cannot be represented (dates or amounts out of range). Nothing is
    /// computed when validation fails.
    pub fn compute_schedule(&self, request: &AmortizationRequest) -> Result<AmortizationResult, AmortizationError> {
        let due_dates = self.validate(request)?;
        let monthly_rate = self.config.rate_convention.monthly_rate(request.rate_percent);
        let places = self.config.decimal_places;

        debug!(
            system = %request.system,
            principal = %request.principal,
            monthly_rate = %monthly_rate,
            term_months = request.term_months,
            "computing installment schedule"
        );

        ensure_representable(request.principal, monthly_rate, request.term_months)?;

        let plan = match request.system {
            AmortizationSystem::Price => price::plan(request.principal, monthly_rate, request.term_months, places)?,
            AmortizationSystem::Sac => sac::plan(request.principal, monthly_rate, request.term_months, places),
        };

        let result = assemble(request, monthly_rate, plan, &due_dates);

        debug!(
            system = %result.system,
            first_installment = %result.first_installment_amount,
            last_installment = %result.last_installment_amount,
            total_interest = %result.total_interest,
            "installment schedule computed"
        );

        Ok(result)
    }

    /// Simulates PRICE and SAC for the same principal, rate, term and start date.
    ///
    /// The request's own `system` is ignored.
    ///
    /// # Errors
    ///
    /// Same as [`Self::compute_schedule`].
    pub fn compare_systems(&self, request: &AmortizationRequest) -> Result<SystemComparison, AmortizationError> {
        let price = self.compute_schedule(&AmortizationRequest {
            system: AmortizationSystem::Price,
            ..request.clone()
        })?;
        let sac = self.compute_schedule(&AmortizationRequest {
            system: AmortizationSystem::Sac,
            ..request.clone()
        })?;

        Ok(SystemComparison {
            interest_savings: price.total_interest - sac.total_interest,
            price,
            sac,
        })
    }

    /// Checks the request and returns the due date of every installment.
    fn validate(&self, request: &AmortizationRequest) -> Result<Vec<NaiveDate>, AmortizationError> {
        if request.principal <= Decimal::ZERO {
            return Err(AmortizationError::invalid(
                "principal",
                format!("must be greater than zero, got {}", request.principal),
            ));
        }
        if request.rate_percent.is_sign_negative() && !request.rate_percent.is_zero() {
            return Err(AmortizationError::invalid(
                "rate_percent",
                format!("cannot be negative, got {}", request.rate_percent),
            ));
        }
        let max_term = self.config.max_term_months;
        if request.term_months == 0 || request.term_months > max_term {
            return Err(AmortizationError::invalid(
                "term_months",
                format!("must be between 1 and {max_term}, got {}", request.term_months),
            ));
        }

        (0..request.term_months)
            .map(|offset| {
                request
                    .start_date
                    .checked_add_months(Months::new(offset))
                    .ok_or_else(|| {
                        AmortizationError::invalid(
                            "start_date",
                            format!("{} plus {offset} months is out of range", request.start_date),
                        )
                    })
            })
            .collect()
    }
}

/// Computes a schedule with the default configuration.
///
/// # Errors
///
/// Same as [`AmortizationEngine::compute_schedule`].
pub fn compute_schedule(request: &AmortizationRequest) -> Result<AmortizationResult, AmortizationError> {
    AmortizationEngine::default().compute_schedule(request)
}

/// Compares PRICE and SAC with the default configuration.
///
/// # Errors
///
/// Same as [`AmortizationEngine::compute_schedule`].
pub fn compare_systems(request: &AmortizationRequest) -> Result<SystemComparison, AmortizationError> {
    AmortizationEngine::default().compare_systems(request)
}

/// Rejects inputs whose total interest could overflow a `Decimal`.
///
/// The balance never exceeds the principal, so bounding `principal * r * n` bounds
/// every interest amount and running total built afterwards.
fn ensure_representable(principal: Decimal, monthly_rate: Decimal, term_months: u32) -> Result<(), AmortizationError> {
    principal
        .checked_mul(monthly_rate)
        .and_then(|interest| interest.checked_mul(Decimal::from(term_months)))
        .and_then(|interest| interest.checked_add(principal))
        .map(|_| ())
        .ok_or_else(|| AmortizationError::invalid("rate_percent", "interest on this principal is out of range"))
}

/// Rounds a money amount to the minor unit, half away from zero.
fn round_money(value: Decimal, places: u32) -> Decimal {
    value.round_dp_with_strategy(places, RoundingStrategy::MidpointAwayFromZero)
}

fn assemble(request: &AmortizationRequest, monthly_rate: Decimal, plan: Plan, due_dates: &[NaiveDate]) -> AmortizationResult {
    let mut balance = request.principal;
    let mut cumulative_paid = Decimal::ZERO;
    let mut cumulative_interest = Decimal::ZERO;

    let installments: Vec<InstallmentLine> = plan
        .periods
        .iter()
        .zip(due_dates)
        .zip(1u32..)
        .map(|((period, due_date), number)| {
            let gross_value = period.principal + period.interest;
            balance -= period.principal;
            cumulative_paid += gross_value;
            cumulative_interest += period.interest;

            InstallmentLine {
                number,
                due_date: *due_date,
                gross_value,
                principal_portion: period.principal,
                interest_portion: period.interest,
                remaining_balance: balance,
                cumulative_paid,
                cumulative_interest,
            }
        })
        .collect();

    let first_installment_amount = installments.first().map(|line| line.gross_value).unwrap_or_default();
    let last_installment_amount = installments.last().map(|line| line.gross_value).unwrap_or_default();

    AmortizationResult {
        system: request.system,
        principal: request.principal,
        monthly_rate,
        fixed_installment: plan.fixed_installment,
        fixed_amortization: plan.fixed_amortization,
        installments,
        first_installment_amount,
        last_installment_amount,
        total_interest: cumulative_interest,
        total_cost: request.principal + cumulative_interest,
        monthly_decrease_amount: plan.monthly_decrease,
    }
}
