use napi::Result as NapiResult;
use napi_derive::napi;

use agfinance_core::loans::{AmortizationConfig, AmortizationEngine, LoanScenario};
use agfinance_core::programs::{self, ProgramFitRequest};

/// Convert any Display error into a napi::Error.
fn to_napi_error(e: impl std::fmt::Display) -> napi::Error {
    napi::Error::from_reason(e.to_string())
}

/// Engine from an optional JSON config; defaults when absent.
fn engine_from(config_json: Option<String>) -> NapiResult<AmortizationEngine> {
    let config = match config_json {
        Some(json) => serde_json::from_str::<AmortizationConfig>(&json).map_err(to_napi_error)?,
        None => AmortizationConfig::default(),
    };
    Ok(AmortizationEngine::new(config))
}

// ---------------------------------------------------------------------------
// Loans
// ---------------------------------------------------------------------------

#[napi]
pub fn quote_loan(input_json: String, config_json: Option<String>) -> NapiResult<String> {
    let scenario: LoanScenario = serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = engine_from(config_json)?
        .quote(&scenario)
        .map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

#[napi]
pub fn compare_loans(input_json: String, config_json: Option<String>) -> NapiResult<String> {
    let scenarios: Vec<LoanScenario> = serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = engine_from(config_json)?
        .compare(&scenarios)
        .map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

#[napi]
pub fn loan_schedule(input_json: String, config_json: Option<String>) -> NapiResult<String> {
    let scenario: LoanScenario = serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = engine_from(config_json)?
        .schedule(&scenario)
        .map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// Programs
// ---------------------------------------------------------------------------

#[napi]
pub fn fsa_programs() -> NapiResult<String> {
    serde_json::to_string(&programs::fsa_programs()).map_err(to_napi_error)
}

#[napi]
pub fn program_fit(input_json: String, config_json: Option<String>) -> NapiResult<String> {
    let request: ProgramFitRequest = serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let program = request.resolve_program().map_err(to_napi_error)?;
    let output = programs::check_program_fit(&engine_from(config_json)?, &program, &request.scenario)
        .map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}
