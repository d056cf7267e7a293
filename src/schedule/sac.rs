use rust_decimal::{Decimal, RoundingStrategy};

use super::{Period, Plan, round_money};

/// Builds a SAC table (constant amortization).
///
/// The exact amortization is `P / n`. In minor units it is split into a base amount
/// plus one extra unit for the first periods, as many as needed to cover the
/// remainder, so no two principal portions differ by more than one unit and the
/// installments never increase.
pub(super) fn plan(total_amount: Decimal, monthly_interest_rate: Decimal, total_months: u32, places: u32) -> Plan {
    let months = Decimal::from(total_months);
    let exact_amortization = total_amount / months;
    let unit = Decimal::new(1, places);

    let base_amortization = exact_amortization.round_dp_with_strategy(places, RoundingStrategy::ToZero);
    let extra_units = ((total_amount - base_amortization * months) / unit).trunc();

    let mut current_balance = total_amount;
    let mut periods = Vec::with_capacity(total_months as usize);

    for number in 1..=total_months {
        let interest_payment = round_money(current_balance * monthly_interest_rate, places);
        let amortization = if number == total_months {
            current_balance
        } else if Decimal::from(number) <= extra_units {
            base_amortization + unit
        } else {
            base_amortization
        };

        current_balance -= amortization;
        periods.push(Period {
            principal: amortization,
            interest: interest_payment,
        });
    }

    Plan {
        periods,
        fixed_installment: None,
        fixed_amortization: Some(round_money(exact_amortization, places)),
        monthly_decrease: round_money(exact_amortization * monthly_interest_rate, places),
    }
}
