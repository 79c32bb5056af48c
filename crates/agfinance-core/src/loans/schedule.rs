use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::error::AgFinanceError;
use crate::loans::calculator::{AmortizationEngine, LoanQuote, LoanScenario};
use crate::types::{with_metadata, ComputationOutput, Money};
use crate::AgFinanceResult;

/// Longest schedule that will be materialised (100 years of months).
pub const MAX_SCHEDULE_PERIODS: u32 = 1200;

/// A single month of the amortization table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AmortizationPeriod {
    pub month: u32,
    pub opening_balance: Money,
    pub payment: Money,
    pub interest: Money,
    pub principal: Money,
    pub closing_balance: Money,
    pub cumulative_interest: Money,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AmortizationSchedule {
    pub quote: LoanQuote,
    pub periods: Vec<AmortizationPeriod>,
    pub total_interest_paid: Money,
    pub total_principal_paid: Money,
}

impl AmortizationEngine {
    /// Month-by-month breakdown of a level-payment loan.
    ///
    /// Balances are carried unrounded; each reported row is rounded. The last
    /// month pays off whatever balance remains, so the closing balance is zero.
    pub fn schedule(&self, scenario: &LoanScenario) -> AgFinanceResult<AmortizationSchedule> {
        if scenario.term_months > i64::from(MAX_SCHEDULE_PERIODS) {
            return Err(AgFinanceError::invalid(
                "term_months",
                format!("Schedules are limited to {MAX_SCHEDULE_PERIODS} months"),
            ));
        }
        let terms = self.terms(scenario)?;
        let quote = self.quote_terms(scenario, &terms)?;

        let mut periods = Vec::with_capacity(terms.periods as usize);
        let mut balance = terms.loan_amount;
        let mut cumulative_interest = Decimal::ZERO;
        let mut total_principal = Decimal::ZERO;

        for month in 1..=terms.periods {
            let opening = balance;
            let interest = opening * terms.monthly_rate;
            let (payment, principal) = if month == terms.periods {
                (opening + interest, opening)
            } else {
                (terms.payment, terms.payment - interest)
            };
            balance = opening - principal;
            cumulative_interest += interest;
            total_principal += principal;

            periods.push(AmortizationPeriod {
                month,
                opening_balance: self.round(opening),
                payment: self.round(payment),
                interest: self.round(interest),
                principal: self.round(principal),
                closing_balance: self.round(balance),
                cumulative_interest: self.round(cumulative_interest),
            });
        }

        Ok(AmortizationSchedule {
            quote,
            periods,
            total_interest_paid: self.round(cumulative_interest),
            total_principal_paid: self.round(total_principal),
        })
    }

    /// [`schedule`](Self::schedule) wrapped in the standard output envelope.
    pub fn build_schedule(
        &self,
        scenario: &LoanScenario,
    ) -> AgFinanceResult<ComputationOutput<AmortizationSchedule>> {
        let start = Instant::now();
        let schedule = self.schedule(scenario)?;
        let warnings = self.scenario_warnings(scenario);

        let elapsed = start.elapsed().as_micros() as u64;
        Ok(with_metadata(
            "Level-payment amortization schedule (monthly)",
            scenario,
            warnings,
            elapsed,
            schedule,
        ))
    }
}

/// Build a schedule with the default engine configuration.
pub fn schedule(scenario: &LoanScenario) -> AgFinanceResult<AmortizationSchedule> {
    AmortizationEngine::default().schedule(scenario)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loans::calculator::quote;
    use rust_decimal_macros::dec;

    const TOL: Decimal = dec!(0.05);

    #[test]
    fn test_schedule_length_and_payoff() {
        let scenario = LoanScenario::new(dec!(100_000), dec!(20_000), dec!(5.5), 360);
        let s = schedule(&scenario).unwrap();

        assert_eq!(s.periods.len(), 360);
        assert_eq!(s.periods[0].opening_balance, dec!(80_000));
        assert_eq!(s.periods.last().unwrap().closing_balance, Decimal::ZERO);
        assert_eq!(s.total_principal_paid, dec!(80_000));
        assert_eq!(s.quote, quote(&scenario).unwrap());
    }

    #[test]
    fn test_schedule_first_month_split() {
        // 80k at 5.5%/12: first-month interest = 366.67
        let scenario = LoanScenario::new(dec!(100_000), dec!(20_000), dec!(5.5), 360);
        let first = &schedule(&scenario).unwrap().periods[0];
        assert_eq!(first.interest, dec!(366.67));
        assert_eq!(first.payment, dec!(454.23));
        assert_eq!(first.principal, dec!(87.56));
    }

    #[test]
    fn test_schedule_interest_matches_quote() {
        let scenario = LoanScenario::new(dec!(250_000), dec!(50_000), dec!(7.25), 240);
        let s = schedule(&scenario).unwrap();
        assert!((s.total_interest_paid - s.quote.total_interest).abs() <= TOL);
        assert_eq!(
            s.periods.last().unwrap().cumulative_interest,
            s.total_interest_paid
        );
    }

    #[test]
    fn test_schedule_zero_rate() {
        let s = schedule(&LoanScenario::new(dec!(1_200), dec!(0), dec!(0), 12)).unwrap();
        assert!(s.periods.iter().all(|p| p.interest.is_zero()));
        assert!(s.periods.iter().all(|p| p.payment == dec!(100)));
        assert_eq!(s.total_interest_paid, Decimal::ZERO);
    }

    #[test]
    fn test_schedule_rejects_excessive_term() {
        let err = schedule(&LoanScenario::new(dec!(1_000), dec!(0), dec!(0), 1201)).unwrap_err();
        assert!(matches!(err, AgFinanceError::InvalidInput { .. }));
    }

    #[test]
    fn test_schedule_term_limit_checked_before_quoting() {
        // Would overflow the growth factor if quoted first.
        let err = schedule(&LoanScenario::new(dec!(1_000), dec!(0), dec!(12_000), 5_000))
            .unwrap_err();
        match err {
            AgFinanceError::InvalidInput { field, reason } => {
                assert_eq!(field, "term_months");
                assert!(reason.contains("1200"), "got {reason}");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_schedule_still_validates_scenario() {
        let err = schedule(&LoanScenario::new(dec!(1_000), dec!(0), dec!(5), -12)).unwrap_err();
        assert!(
            matches!(err, AgFinanceError::InvalidInput { ref field, .. } if field == "term_months")
        );
    }
}
