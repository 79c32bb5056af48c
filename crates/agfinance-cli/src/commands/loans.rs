use clap::Args;
use rust_decimal::Decimal;
use serde_json::Value;

use agfinance_core::loans::{AmortizationEngine, LoanScenario};

use crate::input;

/// Arguments describing a single loan scenario
#[derive(Args)]
#[command(allow_hyphen_values = true)]
pub struct ScenarioArgs {
    /// Path to JSON input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,

    /// Purchase amount before the down payment
    #[arg(long)]
    pub principal: Option<Decimal>,

    /// Annual interest rate as a percentage (5.5 = 5.5%)
    #[arg(long, alias = "rate")]
    pub interest_rate: Option<Decimal>,

    /// Number of monthly payments
    #[arg(long, alias = "months")]
    pub term_months: Option<i64>,

    /// Cash paid up front
    #[arg(long, alias = "down", default_value = "0")]
    pub down_payment: Decimal,
}

/// Arguments for comparing loan scenarios
#[derive(Args)]
pub struct CompareArgs {
    /// Path to JSON file holding an array of scenarios
    #[arg(long)]
    pub input: Option<String>,
}

/// Resolve a scenario from --input, piped stdin, or individual flags.
pub fn resolve_scenario(args: &ScenarioArgs) -> Result<LoanScenario, Box<dyn std::error::Error>> {
    if let Some(ref path) = args.input {
        return input::file::read_json(path);
    }
    if let Some(data) = input::stdin::read_stdin()? {
        return Ok(serde_json::from_value(data)?);
    }
    Ok(LoanScenario::new(
        args.principal
            .ok_or("--principal is required (or provide --input)")?,
        args.down_payment,
        args.interest_rate
            .ok_or("--interest-rate is required (or provide --input)")?,
        args.term_months
            .ok_or("--term-months is required (or provide --input)")?,
    ))
}

pub fn run_quote(
    engine: &AmortizationEngine,
    args: ScenarioArgs,
) -> Result<Value, Box<dyn std::error::Error>> {
    let scenario = resolve_scenario(&args)?;
    let result = engine.calculate_loan(&scenario)?;
    Ok(serde_json::to_value(result)?)
}

pub fn run_schedule(
    engine: &AmortizationEngine,
    args: ScenarioArgs,
) -> Result<Value, Box<dyn std::error::Error>> {
    let scenario = resolve_scenario(&args)?;
    let result = engine.build_schedule(&scenario)?;
    Ok(serde_json::to_value(result)?)
}

pub fn run_compare(
    engine: &AmortizationEngine,
    args: CompareArgs,
) -> Result<Value, Box<dyn std::error::Error>> {
    let scenarios: Vec<LoanScenario> = if let Some(ref path) = args.input {
        input::file::read_json(path)?
    } else if let Some(data) = input::stdin::read_stdin()? {
        serde_json::from_value(data)?
    } else {
        return Err("--input <file.json> or stdin required for loan comparison".into());
    };
    let result = engine.compare_loans(&scenarios)?;
    Ok(serde_json::to_value(result)?)
}
