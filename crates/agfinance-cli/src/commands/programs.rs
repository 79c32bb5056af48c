use clap::Args;
use serde::Serialize;
use serde_json::Value;
use std::time::Instant;

use agfinance_core::loans::AmortizationEngine;
use agfinance_core::programs::{self, fsa, LoanProgram, ProgramFitRequest};
use agfinance_core::{with_metadata, AgFinanceError};

use crate::commands::loans::{resolve_scenario, ScenarioArgs};
use crate::input;

#[derive(Args)]
pub struct ProgramsArgs {
    /// Show a single program by code (OL, FO, GOL, GFO, EM, YL)
    #[arg(long)]
    pub code: Option<String>,
}

#[derive(Args)]
pub struct ProgramFitArgs {
    /// Catalog program code; overrides any code in the input file
    #[arg(long)]
    pub code: Option<String>,

    #[command(flatten)]
    pub scenario: ScenarioArgs,
}

#[derive(Serialize)]
struct ProgramCatalog {
    programs: Vec<LoanProgram>,
    note: &'static str,
    website: &'static str,
}

pub fn run_programs(args: ProgramsArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let start = Instant::now();
    let programs = match args.code {
        Some(ref code) => vec![programs::find_program(code)
            .ok_or_else(|| AgFinanceError::NotFound(format!("loan program '{code}'")))?],
        None => programs::fsa_programs(),
    };
    let catalog = ProgramCatalog {
        programs,
        note: "Rates updated quarterly. Contact local FSA office for current rates.",
        website: fsa::fsa_website(),
    };
    let elapsed = start.elapsed().as_micros() as u64;
    let output = with_metadata("FSA farm loan program catalog", &args.code, vec![], elapsed, catalog);
    Ok(serde_json::to_value(output)?)
}

pub fn run_program_fit(
    engine: &AmortizationEngine,
    args: ProgramFitArgs,
) -> Result<Value, Box<dyn std::error::Error>> {
    let mut request = read_request(&args)?;
    if args.code.is_some() {
        request.code = args.code.clone();
        request.program = None;
    }
    let result = programs::evaluate_program_fit(engine, &request)?;
    Ok(serde_json::to_value(result)?)
}

/// A full request ({code, program, scenario}) or a bare scenario plus --code.
fn read_request(args: &ProgramFitArgs) -> Result<ProgramFitRequest, Box<dyn std::error::Error>> {
    let data = match args.scenario.input {
        Some(ref path) => Some(input::file::read_json_value(path)?),
        None => input::stdin::read_stdin()?,
    };
    match data {
        Some(value) if value.get("scenario").is_some() => Ok(serde_json::from_value(value)?),
        Some(value) => Ok(ProgramFitRequest {
            code: args.code.clone(),
            program: None,
            scenario: serde_json::from_value(value)?,
        }),
        None => Ok(ProgramFitRequest {
            code: args.code.clone(),
            program: None,
            scenario: resolve_scenario(&args.scenario)?,
        }),
    }
}
