pub mod calculator;
pub mod schedule;

pub use calculator::{
    compare, quote, AmortizationConfig, AmortizationEngine, Comparison, LoanQuote, LoanScenario,
    RoundingRule,
};
pub use schedule::{schedule, AmortizationPeriod, AmortizationSchedule};
