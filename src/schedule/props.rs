//! Property tests for schedule invariants.

use chrono::NaiveDate;
use proptest::prelude::*;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use super::compute_schedule;
use crate::types::{AmortizationRequest, AmortizationResult, AmortizationSystem};

fn cents(value: i64) -> Decimal {
    Decimal::new(value, 2)
}

fn any_system() -> impl Strategy<Value = AmortizationSystem> {
    prop_oneof![Just(AmortizationSystem::Price), Just(AmortizationSystem::Sac)]
}

/// Rates from 0% to 5% a month, in basis-point steps.
fn rate_percent() -> impl Strategy<Value = Decimal> {
    (0i64..=500).prop_map(cents)
}

fn schedule(principal: Decimal, rate_percent: Decimal, term_months: u32, system: AmortizationSystem) -> AmortizationResult {
    compute_schedule(&AmortizationRequest {
        principal,
        rate_percent,
        term_months,
        system,
        start_date: NaiveDate::from_ymd_opt(2024, 3, 15).unwrap(),
    })
    .unwrap()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(128))]

    #[test]
    fn prop_balance_reaches_zero_without_going_negative(
        principal in (100_000i64..100_000_000).prop_map(cents),
        rate in rate_percent(),
        term in 1u32..=600,
        system in any_system(),
    ) {
        let result = schedule(principal, rate, term, system);

        prop_assert_eq!(result.installments.len(), term as usize);
        prop_assert_eq!(result.installments.last().unwrap().remaining_balance, Decimal::ZERO);

        let mut previous = principal;
        for (index, line) in result.installments.iter().enumerate() {
            prop_assert_eq!(line.number as usize, index + 1);
            prop_assert!(line.remaining_balance >= Decimal::ZERO);
            prop_assert!(line.remaining_balance <= previous);
            previous = line.remaining_balance;
        }
    }

    #[test]
    fn prop_principal_is_conserved(
        principal in (100_000i64..100_000_000).prop_map(cents),
        rate in rate_percent(),
        term in 1u32..=600,
        system in any_system(),
    ) {
        let result = schedule(principal, rate, term, system);
        let amortized: Decimal = result.installments.iter().map(|line| line.principal_portion).sum();

        prop_assert_eq!(amortized, principal);
    }

    #[test]
    fn prop_totals_are_consistent(
        principal in (100_000i64..100_000_000).prop_map(cents),
        rate in rate_percent(),
        term in 1u32..=600,
        system in any_system(),
    ) {
        let result = schedule(principal, rate, term, system);
        let interest: Decimal = result.installments.iter().map(|line| line.interest_portion).sum();
        let last = result.installments.last().unwrap();

        prop_assert_eq!(result.total_interest, interest);
        prop_assert_eq!(result.total_cost, principal + result.total_interest);
        prop_assert_eq!(last.cumulative_interest, result.total_interest);
        prop_assert_eq!(last.cumulative_paid, result.total_cost);
        prop_assert_eq!(result.first_installment_amount, result.installments[0].gross_value);
        prop_assert_eq!(result.last_installment_amount, last.gross_value);
    }

    #[test]
    fn prop_price_installments_stay_within_one_cent(
        principal in (100_000i64..100_000_000).prop_map(cents),
        rate in rate_percent(),
        term in 2u32..=600,
    ) {
        let result = schedule(principal, rate, term, AmortizationSystem::Price);
        let fixed = result.fixed_installment.unwrap();

        prop_assert!(result.installments.iter().all(|line| (line.gross_value - fixed).abs() <= dec!(0.01)));
        prop_assert!((result.last_installment_amount - result.first_installment_amount).abs() <= dec!(0.01));
        prop_assert_eq!(result.monthly_decrease_amount, Decimal::ZERO);
    }

    #[test]
    fn prop_sac_amortization_is_constant_and_interest_declines_linearly(
        principal in (100_000i64..100_000_000).prop_map(cents),
        rate in rate_percent(),
        term in 2u32..=600,
    ) {
        let result = schedule(principal, rate, term, AmortizationSystem::Sac);
        let fixed = result.fixed_amortization.unwrap();

        prop_assert!(result.installments.iter().all(|line| (line.principal_portion - fixed).abs() <= dec!(0.01)));

        for pair in result.installments.windows(2) {
            prop_assert!(pair[0].gross_value >= pair[1].gross_value);
            let step = pair[0].interest_portion - pair[1].interest_portion;
            prop_assert!(step >= Decimal::ZERO);
            prop_assert!((step - result.monthly_decrease_amount).abs() <= dec!(0.01));
        }
    }

    #[test]
    fn prop_zero_rate_degenerates_to_even_split(
        installment in (100i64..1_000_000).prop_map(cents),
        term in 1u32..=600,
        system in any_system(),
    ) {
        let principal = installment * Decimal::from(term);
        let result = schedule(principal, Decimal::ZERO, term, system);

        prop_assert!(result.installments.iter().all(|line| line.interest_portion.is_zero()));
        prop_assert!(result.installments.iter().all(|line| line.gross_value == installment));
        prop_assert_eq!(result.total_interest, Decimal::ZERO);
    }
}
