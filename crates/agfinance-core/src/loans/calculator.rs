//! Level-payment loan quotes and multi-scenario comparison.
//!
//! A quote turns a principal, down payment, quoted annual percentage rate and
//! a term in months into the monthly payment, total interest and all-in cost
//! of the loan. Comparison quotes a batch of scenarios and ranks them by total
//! cost. All math in `rust_decimal::Decimal`; only the reported monetary
//! outputs are rounded.

use log::{debug, warn};
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::error::AgFinanceError;
use crate::time_value::{level_payment, periodic_rate, MONTHS_PER_YEAR};
use crate::types::{with_metadata, ComputationOutput, Money, Percent, Rate};
use crate::AgFinanceResult;

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

/// Midpoint rule applied when reported amounts are rounded.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoundingRule {
    /// 0.005 rounds to 0.01 (midpoint away from zero).
    #[default]
    HalfUp,
    /// 0.005 rounds to 0.00, 0.015 to 0.02 (midpoint to even).
    Bankers,
}

impl RoundingRule {
    fn strategy(self) -> RoundingStrategy {
        match self {
            RoundingRule::HalfUp => RoundingStrategy::MidpointAwayFromZero,
            RoundingRule::Bankers => RoundingStrategy::MidpointNearestEven,
        }
    }
}

/// Engine settings. Every field has a default, so a partial JSON document
/// is a valid configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AmortizationConfig {
    /// Rounding rule for reported amounts.
    pub rounding: RoundingRule,
    /// Decimal places kept in reported amounts.
    pub decimal_places: u32,
    /// Terms longer than this produce an advisory warning.
    pub long_term_warning_months: u32,
}

impl Default for AmortizationConfig {
    fn default() -> Self {
        Self {
            rounding: RoundingRule::HalfUp,
            decimal_places: 2,
            long_term_warning_months: 480,
        }
    }
}

// ---------------------------------------------------------------------------
// Input / output types
// ---------------------------------------------------------------------------

/// One financing scenario as a borrower would describe it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoanScenario {
    /// Purchase amount before the down payment.
    pub principal: Money,
    /// Cash paid up front. Defaults to zero.
    #[serde(default)]
    pub down_payment: Money,
    /// Annual rate as a percentage (5.5 = 5.5%).
    #[serde(rename = "interest_rate", alias = "annual_interest_rate")]
    pub annual_interest_rate: Percent,
    /// Number of monthly payments.
    pub term_months: i64,
}

impl LoanScenario {
    pub fn new(
        principal: Money,
        down_payment: Money,
        annual_interest_rate: Percent,
        term_months: i64,
    ) -> Self {
        Self {
            principal,
            down_payment,
            annual_interest_rate,
            term_months,
        }
    }
}

/// Payment summary for a single scenario. Echoes the inputs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoanQuote {
    pub principal: Money,
    pub down_payment: Money,
    /// Principal less down payment, unrounded.
    pub loan_amount: Money,
    pub interest_rate: Percent,
    pub term_months: u32,
    pub monthly_payment: Money,
    pub total_interest: Money,
    /// All payments plus the down payment.
    pub total_cost: Money,
}

/// Scenarios ranked by total cost, cheapest first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comparison {
    pub count: usize,
    pub best_option: Option<LoanQuote>,
    pub all_options: Vec<LoanQuote>,
}

/// Validated, unrounded terms shared by quotes and schedules.
#[derive(Debug, Clone, Copy)]
pub(crate) struct LoanTerms {
    pub loan_amount: Money,
    pub monthly_rate: Rate,
    pub periods: u32,
    pub payment: Money,
}

// ---------------------------------------------------------------------------
// Engine
// ---------------------------------------------------------------------------

/// Stateless amortization calculator. Cheap to clone and share.
#[derive(Debug, Clone, Default)]
pub struct AmortizationEngine {
    config: AmortizationConfig,
}

impl AmortizationEngine {
    pub fn new(config: AmortizationConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &AmortizationConfig {
        &self.config
    }

    /// Quote a single scenario.
    pub fn quote(&self, scenario: &LoanScenario) -> AgFinanceResult<LoanQuote> {
        let terms = self.terms(scenario)?;
        self.quote_terms(scenario, &terms)
    }

    /// Totals and rounding for terms already derived from `scenario`.
    pub(crate) fn quote_terms(
        &self,
        scenario: &LoanScenario,
        terms: &LoanTerms,
    ) -> AgFinanceResult<LoanQuote> {
        let total_payments = terms
            .payment
            .checked_mul(Decimal::from(terms.periods))
            .ok_or_else(|| AgFinanceError::invalid("principal", "Total payments overflow"))?;
        let total_interest = total_payments - terms.loan_amount;
        let total_cost = total_payments
            .checked_add(scenario.down_payment)
            .ok_or_else(|| AgFinanceError::invalid("principal", "Total cost overflow"))?;

        debug!(
            "quoted {} over {} months at {}%: payment {}",
            terms.loan_amount, terms.periods, scenario.annual_interest_rate, terms.payment
        );

        Ok(LoanQuote {
            principal: scenario.principal,
            down_payment: scenario.down_payment,
            loan_amount: terms.loan_amount,
            interest_rate: scenario.annual_interest_rate,
            term_months: terms.periods,
            monthly_payment: self.round(terms.payment),
            total_interest: self.round(total_interest),
            total_cost: self.round(total_cost),
        })
    }

    /// Quote every scenario, then rank ascending by total cost.
    ///
    /// The sort is stable: equal costs keep their input order. One invalid
    /// scenario fails the whole comparison.
    pub fn compare(&self, scenarios: &[LoanScenario]) -> AgFinanceResult<Comparison> {
        let mut quotes = scenarios
            .iter()
            .enumerate()
            .map(|(i, s)| self.quote(s).map_err(|e| at_index(i, e)))
            .collect::<AgFinanceResult<Vec<_>>>()?;

        quotes.sort_by(|a, b| a.total_cost.cmp(&b.total_cost));
        debug!("compared {} loan scenarios", quotes.len());

        Ok(Comparison {
            count: quotes.len(),
            best_option: quotes.first().cloned(),
            all_options: quotes,
        })
    }

    /// [`quote`](Self::quote) wrapped in the standard output envelope.
    pub fn calculate_loan(
        &self,
        scenario: &LoanScenario,
    ) -> AgFinanceResult<ComputationOutput<LoanQuote>> {
        let start = Instant::now();
        let quote = self.quote(scenario)?;
        let warnings = self.scenario_warnings(scenario);

        let elapsed = start.elapsed().as_micros() as u64;
        Ok(with_metadata(
            "Level-payment amortization (monthly compounding)",
            scenario,
            warnings,
            elapsed,
            quote,
        ))
    }

    /// [`compare`](Self::compare) wrapped in the standard output envelope.
    pub fn compare_loans(
        &self,
        scenarios: &[LoanScenario],
    ) -> AgFinanceResult<ComputationOutput<Comparison>> {
        let start = Instant::now();
        let comparison = self.compare(scenarios)?;

        let mut warnings = Vec::new();
        if scenarios.is_empty() {
            warnings.push("No scenarios supplied; nothing to rank".to_string());
        }
        for (i, s) in scenarios.iter().enumerate() {
            warnings.extend(
                self.scenario_warnings(s)
                    .into_iter()
                    .map(|w| format!("scenarios[{i}]: {w}")),
            );
        }

        let elapsed = start.elapsed().as_micros() as u64;
        Ok(with_metadata(
            "Level-payment amortization, ranked by total cost",
            &scenarios,
            warnings,
            elapsed,
            comparison,
        ))
    }

    /// Validate a scenario and derive its unrounded payment terms.
    pub(crate) fn terms(&self, scenario: &LoanScenario) -> AgFinanceResult<LoanTerms> {
        validate_scenario(scenario)?;

        let periods = u32::try_from(scenario.term_months).map_err(|_| {
            AgFinanceError::invalid("term_months", "Term exceeds the supported number of months")
        })?;
        let loan_amount = scenario.principal - scenario.down_payment;
        let monthly_rate = periodic_rate(scenario.annual_interest_rate, MONTHS_PER_YEAR);
        let payment = level_payment(monthly_rate, periods, loan_amount)?;

        Ok(LoanTerms {
            loan_amount,
            monthly_rate,
            periods,
            payment,
        })
    }

    /// Round a reported amount with the configured rule.
    pub(crate) fn round(&self, value: Decimal) -> Decimal {
        let mut rounded =
            value.round_dp_with_strategy(self.config.decimal_places, self.config.rounding.strategy());
        // Residue such as -0.000…4 must not print as "-0.00".
        if rounded.is_zero() {
            rounded.set_sign_positive(true);
        }
        rounded
    }

    pub(crate) fn scenario_warnings(&self, scenario: &LoanScenario) -> Vec<String> {
        let mut warnings = Vec::new();
        if scenario.annual_interest_rate.is_zero() {
            warnings.push("Zero interest rate: payment is principal divided by term".to_string());
        }
        if scenario.down_payment == scenario.principal {
            warnings.push("Down payment covers the full principal; nothing is financed".to_string());
        }
        if scenario.term_months > i64::from(self.config.long_term_warning_months) {
            warnings.push(format!(
                "Term of {} months exceeds {} months",
                scenario.term_months, self.config.long_term_warning_months
            ));
        }
        for w in &warnings {
            warn!("{w}");
        }
        warnings
    }
}

// ---------------------------------------------------------------------------
// Convenience functions (default configuration)
// ---------------------------------------------------------------------------

/// Quote a scenario with the default engine configuration.
pub fn quote(scenario: &LoanScenario) -> AgFinanceResult<LoanQuote> {
    AmortizationEngine::default().quote(scenario)
}

/// Compare scenarios with the default engine configuration.
pub fn compare(scenarios: &[LoanScenario]) -> AgFinanceResult<Comparison> {
    AmortizationEngine::default().compare(scenarios)
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

fn validate_scenario(scenario: &LoanScenario) -> AgFinanceResult<()> {
    if scenario.term_months <= 0 {
        return Err(AgFinanceError::invalid(
            "term_months",
            "Term must be a positive number of months",
        ));
    }
    if scenario.principal <= Decimal::ZERO {
        return Err(AgFinanceError::invalid(
            "principal",
            "Principal must be positive",
        ));
    }
    if scenario.down_payment < Decimal::ZERO {
        return Err(AgFinanceError::invalid(
            "down_payment",
            "Down payment cannot be negative",
        ));
    }
    if scenario.down_payment > scenario.principal {
        return Err(AgFinanceError::invalid(
            "down_payment",
            "Down payment cannot exceed principal",
        ));
    }
    if scenario.annual_interest_rate < Decimal::ZERO {
        return Err(AgFinanceError::invalid(
            "interest_rate",
            "Interest rate cannot be negative",
        ));
    }
    Ok(())
}

fn at_index(index: usize, err: AgFinanceError) -> AgFinanceError {
    match err {
        AgFinanceError::InvalidInput { field, reason } => AgFinanceError::InvalidInput {
            field: format!("scenarios[{index}].{field}"),
            reason,
        },
        other => other,
    }
}
