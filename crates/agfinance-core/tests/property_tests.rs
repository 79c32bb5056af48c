use agfinance_core::loans::{compare, quote, LoanScenario};
use proptest::prelude::*;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

/// Principal from 1,000 to 2,000,000 in whole dollars.
fn arb_principal() -> impl Strategy<Value = Decimal> {
    (1_000u64..2_000_000u64).prop_map(Decimal::from)
}

/// Annual rate 0.00% to 18.00% in basis-point steps.
fn arb_rate() -> impl Strategy<Value = Decimal> {
    (0u32..=1_800u32).prop_map(|bps| Decimal::from(bps) / dec!(100))
}

/// Term from 1 month to 40 years.
fn arb_term() -> impl Strategy<Value = i64> {
    1i64..=480i64
}

/// A valid scenario with a down payment of 0-50% of principal.
fn arb_scenario() -> impl Strategy<Value = LoanScenario> {
    (arb_principal(), 0u32..=50u32, arb_rate(), arb_term()).prop_map(
        |(principal, down_pct, rate, term)| {
            let down = (principal * Decimal::from(down_pct) / dec!(100)).round_dp(2);
            LoanScenario::new(principal, down, rate, term)
        },
    )
}

proptest! {
    // ===================================================================
    // Loan amount is exactly principal less down payment.
    // ===================================================================
    #[test]
    fn loan_amount_is_exact(s in arb_scenario()) {
        let q = quote(&s).unwrap();
        prop_assert_eq!(q.loan_amount, s.principal - s.down_payment);
    }

    // ===================================================================
    // Total cost reconciles with interest, financed amount and down payment.
    // ===================================================================
    #[test]
    fn total_cost_reconciles(s in arb_scenario()) {
        let q = quote(&s).unwrap();
        let rebuilt = q.total_interest + q.loan_amount + q.down_payment;
        prop_assert!((q.total_cost - rebuilt).abs() <= dec!(0.01),
            "total_cost {} vs rebuilt {}", q.total_cost, rebuilt);
    }

    // ===================================================================
    // Zero rate: flat payment and no interest.
    // ===================================================================
    #[test]
    fn zero_rate_has_no_interest(principal in arb_principal(), term in arb_term()) {
        let s = LoanScenario::new(principal, Decimal::ZERO, Decimal::ZERO, term);
        let q = quote(&s).unwrap();
        let flat = principal / Decimal::from(term);
        prop_assert!((q.monthly_payment - flat).abs() <= dec!(0.005));
        prop_assert!(q.total_interest.abs() <= dec!(0.01));
    }

    // ===================================================================
    // Raising the rate never lowers total interest.
    // ===================================================================
    #[test]
    fn interest_is_monotonic_in_rate(
        s in arb_scenario(),
        bump in (1u32..=500u32).prop_map(|bps| Decimal::from(bps) / dec!(100)),
    ) {
        let base = quote(&s).unwrap();
        let higher = quote(&LoanScenario {
            annual_interest_rate: s.annual_interest_rate + bump,
            ..s.clone()
        })
        .unwrap();
        prop_assert!(higher.total_interest >= base.total_interest,
            "{}% -> {} but {}% -> {}",
            s.annual_interest_rate, base.total_interest,
            higher.interest_rate, higher.total_interest);
    }

    // ===================================================================
    // Identical input, identical output.
    // ===================================================================
    #[test]
    fn quote_is_idempotent(s in arb_scenario()) {
        prop_assert_eq!(quote(&s).unwrap(), quote(&s).unwrap());
    }

    // ===================================================================
    // Comparison is sorted, stable, and headed by the best option.
    // ===================================================================
    #[test]
    fn compare_is_sorted_and_stable(scenarios in prop::collection::vec(arb_scenario(), 0..12)) {
        let cmp = compare(&scenarios).unwrap();
        prop_assert_eq!(cmp.count, scenarios.len());
        prop_assert_eq!(cmp.best_option.as_ref(), cmp.all_options.first());

        // Stable ascending order: re-sorting the input quotes must match.
        let mut expected: Vec<_> = scenarios.iter().map(|s| quote(s).unwrap()).collect();
        expected.sort_by(|a, b| a.total_cost.cmp(&b.total_cost));
        prop_assert_eq!(cmp.all_options, expected);
    }
}
