use rust_decimal::{Decimal, MathematicalOps};

use super::{Period, Plan, round_money};
use crate::error::AmortizationError;

/// Builds a Price table (fixed installment).
///
/// The installment follows PMT = P * [i(1 + i)^n] / [(1 + i)^n – 1], or P / n when
/// the rate is zero. The table is iterated at full precision and only rounded when
/// the lines are presented, so rounding never compounds across periods.
pub(super) fn plan(
    total_amount: Decimal,
    monthly_interest_rate: Decimal,
    total_months: u32,
    places: u32,
) -> Result<Plan, AmortizationError> {
    let fixed_payment = fixed_payment(total_amount, monthly_interest_rate, total_months)?;
    let exact = exact_periods(total_amount, monthly_interest_rate, total_months, fixed_payment);

    Ok(Plan {
        periods: round_cumulative(total_amount, &exact, places),
        fixed_installment: Some(round_money(fixed_payment, places)),
        fixed_amortization: None,
        monthly_decrease: Decimal::ZERO,
    })
}

/// Unrounded annuity installment.
fn fixed_payment(
    total_amount: Decimal,
    monthly_interest_rate: Decimal,
    total_months: u32,
) -> Result<Decimal, AmortizationError> {
    let months = Decimal::from(total_months);
    if monthly_interest_rate.is_zero() {
        return Ok(total_amount / months);
    }

    let out_of_range = || AmortizationError::invalid("rate_percent", "annuity factor is out of range for this term");

    let i_plus_1_pow_n = (Decimal::ONE + monthly_interest_rate)
        .checked_powu(total_months.into())
        .ok_or_else(out_of_range)?;

    total_amount
        .checked_mul(monthly_interest_rate)
        .and_then(|value| value.checked_mul(i_plus_1_pow_n))
        .and_then(|numerator| numerator.checked_div(i_plus_1_pow_n - Decimal::ONE))
        .ok_or_else(out_of_range)
}

/// The table at full `Decimal` precision. The last period pays the exact remaining balance.
fn exact_periods(
    total_amount: Decimal,
    monthly_interest_rate: Decimal,
    total_months: u32,
    fixed_payment: Decimal,
) -> Vec<Period> {
    let mut current_balance = total_amount;
    let mut periods = Vec::with_capacity(total_months as usize);

    for number in 1..=total_months {
        let interest_payment = current_balance * monthly_interest_rate;
        let amortization = if number == total_months {
            current_balance
        } else {
            (fixed_payment - interest_payment).max(Decimal::ZERO).min(current_balance)
        };

        current_balance -= amortization;
        periods.push(Period {
            principal: amortization,
            interest: interest_payment,
        });
    }

    periods
}

/// Rounds the exact table to the minor unit through its running totals.
///
/// Each line is the difference between consecutive rounded running totals, so the
/// sub-unit residue of a line is carried into the next one instead of being
/// dropped. Installments stay within one minor unit of the exact PMT, amounts
/// never go negative, and the principal portions add up to the principal.
fn round_cumulative(total_amount: Decimal, exact: &[Period], places: u32) -> Vec<Period> {
    let mut exact_paid = Decimal::ZERO;
    let mut exact_amortized = Decimal::ZERO;
    let mut shown_paid = Decimal::ZERO;
    let mut shown_amortized = Decimal::ZERO;
    let mut periods = Vec::with_capacity(exact.len());

    for (index, period) in exact.iter().enumerate() {
        exact_paid += period.principal + period.interest;
        exact_amortized += period.principal;

        let paid = round_money(exact_paid, places);
        let shown_interest = shown_paid - shown_amortized;

        let (principal, interest) = if index + 1 == exact.len() {
            let principal = total_amount - shown_amortized;
            (principal, (paid - total_amount - shown_interest).max(Decimal::ZERO))
        } else {
            let amortized = round_money(exact_amortized, places)
                .max(shown_amortized)
                .min(paid - shown_interest);
            (amortized - shown_amortized, paid - amortized - shown_interest)
        };

        shown_paid += principal + interest;
        shown_amortized += principal;
        periods.push(Period { principal, interest });
    }

    periods
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn gross(plan: &Plan) -> Vec<Decimal> {
        plan.periods.iter().map(|p| p.principal + p.interest).collect()
    }

    #[test]
    fn test_fixed_payment_matches_annuity_table() {
        let payment = fixed_payment(dec!(10000), dec!(0.01), 12).unwrap();
        assert_eq!(payment.round_dp(2), dec!(888.49));
    }

    #[test]
    fn test_zero_rate_payment_is_even_split() {
        assert_eq!(fixed_payment(dec!(6000), Decimal::ZERO, 6).unwrap(), dec!(1000));
    }

    #[test]
    fn test_huge_factor_is_rejected() {
        let err = fixed_payment(dec!(1000000), dec!(10), 600).unwrap_err();
        assert!(matches!(err, AmortizationError::InvalidArgument { field: "rate_percent", .. }));
    }

    #[test]
    fn test_installments_stay_within_one_cent_of_pmt() {
        let plan = plan(dec!(1000), dec!(0.02), 3, 2).unwrap();

        assert_eq!(plan.fixed_installment, Some(dec!(346.75)));
        assert_eq!(gross(&plan), vec![dec!(346.75), dec!(346.76), dec!(346.75)]);
        let principal: Decimal = plan.periods.iter().map(|p| p.principal).sum();
        assert_eq!(principal, dec!(1000));
    }

    #[test]
    fn test_long_term_last_installment_does_not_jump() {
        let plan = plan(dec!(100000), dec!(0.01), 600, 2).unwrap();
        let gross = gross(&plan);

        assert_eq!(plan.fixed_installment, Some(dec!(1002.56)));
        assert!(gross.iter().all(|value| (*value - dec!(1002.56)).abs() <= dec!(0.01)));
        assert_eq!(gross.last(), Some(&dec!(1002.56)));
    }

    #[test]
    fn test_installment_barely_above_interest_still_amortizes() {
        let plan = plan(dec!(100), dec!(0.05), 600, 2).unwrap();
        let gross = gross(&plan);

        assert_eq!(plan.fixed_installment, Some(dec!(5.00)));
        assert!(gross.iter().all(|value| *value == dec!(5.00)));

        let last = plan.periods.last().unwrap();
        assert_eq!(last.principal, dec!(4.76));
        assert_eq!(last.interest, dec!(0.24));
    }

    #[test]
    fn test_rounded_amounts_are_never_negative() {
        let plan = plan(dec!(0.09), Decimal::ZERO, 6, 2).unwrap();

        assert!(plan.periods.iter().all(|p| p.principal >= Decimal::ZERO && p.interest.is_zero()));
        assert_eq!(gross(&plan), vec![dec!(0.02), dec!(0.01), dec!(0.02), dec!(0.01), dec!(0.02), dec!(0.01)]);
    }
}
