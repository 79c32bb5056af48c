//! Farm loan program catalog and program-fit checks.
//!
//! Carries the USDA Farm Service Agency direct and guaranteed loan programs
//! as static reference data, and checks a financing scenario against a
//! program's amount, term, rate and down-payment limits.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::error::AgFinanceError;
use crate::loans::calculator::{AmortizationEngine, LoanQuote, LoanScenario};
use crate::types::{with_metadata, ComputationOutput, Money, Percent};
use crate::AgFinanceResult;

/// FSA loan rates are reset quarterly; the catalog carries no fixed rate.
const FSA_RATE_BASIS: &str = "Current rate set quarterly";

const FSA_WEBSITE: &str = "https://www.fsa.usda.gov/programs-and-services/farm-loan-programs/";

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LoanType {
    FsaOperating,
    FsaOwnership,
    FsaEmergency,
    FsaYouth,
    CommercialOperating,
    CommercialRealEstate,
    Equipment,
    LineOfCredit,
}

/// A lending program and the limits a scenario must respect.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoanProgram {
    pub code: String,
    pub name: String,
    pub loan_type: LoanType,
    pub lender: String,
    #[serde(default)]
    pub min_amount: Option<Money>,
    #[serde(default)]
    pub max_amount: Option<Money>,
    #[serde(default)]
    pub min_term_months: Option<u32>,
    #[serde(default)]
    pub max_term_months: Option<u32>,
    #[serde(default)]
    pub interest_rate_min: Option<Percent>,
    #[serde(default)]
    pub interest_rate_max: Option<Percent>,
    /// Minimum down payment as a percentage of principal.
    #[serde(default)]
    pub down_payment_percent: Percent,
    #[serde(default)]
    pub is_fsa: bool,
    pub rate_basis: String,
    pub use_of_funds: String,
    pub eligibility: String,
}

/// Result of checking one scenario against one program.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProgramFit {
    pub program_code: String,
    pub eligible: bool,
    pub issues: Vec<String>,
    pub quote: LoanQuote,
}

/// Program-fit request as read from JSON: a catalog code or an inline
/// program definition, plus the scenario to test.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProgramFitRequest {
    #[serde(default)]
    pub code: Option<String>,
    #[serde(default)]
    pub program: Option<LoanProgram>,
    pub scenario: LoanScenario,
}

impl ProgramFitRequest {
    /// The inline program wins over a catalog code.
    pub fn resolve_program(&self) -> AgFinanceResult<LoanProgram> {
        if let Some(program) = &self.program {
            return Ok(program.clone());
        }
        match &self.code {
            Some(code) => find_program(code)
                .ok_or_else(|| AgFinanceError::NotFound(format!("loan program '{code}'"))),
            None => Err(AgFinanceError::invalid(
                "program",
                "Provide either a program code or an inline program",
            )),
        }
    }
}

// ---------------------------------------------------------------------------
// Catalog
// ---------------------------------------------------------------------------

#[allow(clippy::too_many_arguments)]
fn fsa_program(
    code: &str,
    name: &str,
    loan_type: LoanType,
    lender: &str,
    max_amount: Decimal,
    term_months: (Option<u32>, u32),
    use_of_funds: &str,
    eligibility: &str,
) -> LoanProgram {
    let rate_basis = if lender == "FSA" {
        FSA_RATE_BASIS
    } else {
        "Negotiated with lender"
    };
    LoanProgram {
        code: code.to_string(),
        name: name.to_string(),
        loan_type,
        lender: lender.to_string(),
        min_amount: None,
        max_amount: Some(max_amount),
        min_term_months: term_months.0,
        max_term_months: Some(term_months.1),
        interest_rate_min: None,
        interest_rate_max: None,
        down_payment_percent: Decimal::ZERO,
        is_fsa: true,
        rate_basis: rate_basis.to_string(),
        use_of_funds: use_of_funds.to_string(),
        eligibility: eligibility.to_string(),
    }
}

/// The FSA farm loan programs, direct and guaranteed.
pub fn fsa_programs() -> Vec<LoanProgram> {
    let operating = (Some(12), 84);
    let ownership = (None, 480);
    vec![
        fsa_program(
            "OL",
            "FSA Direct Operating Loan",
            LoanType::FsaOperating,
            "FSA",
            dec!(400_000),
            operating,
            "Annual operating expenses, equipment, livestock, farm improvements",
            "Beginning farmer or unable to obtain commercial credit",
        ),
        fsa_program(
            "FO",
            "FSA Direct Farm Ownership Loan",
            LoanType::FsaOwnership,
            "FSA",
            dec!(600_000),
            ownership,
            "Purchase farmland, construct/improve buildings, soil/water conservation",
            "Beginning farmer or unable to obtain commercial credit",
        ),
        fsa_program(
            "GOL",
            "FSA Guaranteed Operating Loan",
            LoanType::FsaOperating,
            "Approved lender",
            dec!(1_750_000),
            operating,
            "Same as direct operating",
            "Work with approved lender, FSA guarantees 90-95%",
        ),
        fsa_program(
            "GFO",
            "FSA Guaranteed Farm Ownership Loan",
            LoanType::FsaOwnership,
            "Approved lender",
            dec!(1_750_000),
            ownership,
            "Same as direct ownership",
            "Work with approved lender, FSA guarantees 90-95%",
        ),
        fsa_program(
            "EM",
            "FSA Emergency Loan",
            LoanType::FsaEmergency,
            "FSA",
            dec!(500_000),
            (Some(12), 480),
            "Recovery from natural disaster in declared counties",
            "Located in disaster-declared county, suffered 30%+ loss",
        ),
        fsa_program(
            "YL",
            "FSA Youth Loan",
            LoanType::FsaYouth,
            "FSA",
            dec!(5_000),
            operating,
            "Agricultural project (4-H, FFA)",
            "Ages 10-20, member of 4-H/FFA or similar",
        ),
    ]
}

/// Case-insensitive lookup by program code.
pub fn find_program(code: &str) -> Option<LoanProgram> {
    fsa_programs()
        .into_iter()
        .find(|p| p.code.eq_ignore_ascii_case(code.trim()))
}

/// Where borrowers can confirm current rates.
pub fn fsa_website() -> &'static str {
    FSA_WEBSITE
}

// ---------------------------------------------------------------------------
// Program fit
// ---------------------------------------------------------------------------

/// Quote `scenario` and list every program limit it violates.
pub fn check_program_fit(
    engine: &AmortizationEngine,
    program: &LoanProgram,
    scenario: &LoanScenario,
) -> AgFinanceResult<ProgramFit> {
    let quote = engine.quote(scenario)?;
    let mut issues = Vec::new();

    if let Some(max) = program.max_amount {
        if quote.loan_amount > max {
            issues.push(format!(
                "Loan amount {} exceeds program maximum {}",
                quote.loan_amount, max
            ));
        }
    }
    if let Some(min) = program.min_amount {
        if quote.loan_amount < min {
            issues.push(format!(
                "Loan amount {} is below program minimum {}",
                quote.loan_amount, min
            ));
        }
    }
    if let Some(min) = program.min_term_months {
        if quote.term_months < min {
            issues.push(format!(
                "Term of {} months is shorter than the {} month minimum",
                quote.term_months, min
            ));
        }
    }
    if let Some(max) = program.max_term_months {
        if quote.term_months > max {
            issues.push(format!(
                "Term of {} months exceeds the {} month maximum",
                quote.term_months, max
            ));
        }
    }
    if let Some(min) = program.interest_rate_min {
        if quote.interest_rate < min {
            issues.push(format!(
                "Interest rate {}% is below the program floor of {}%",
                quote.interest_rate, min
            ));
        }
    }
    if let Some(max) = program.interest_rate_max {
        if quote.interest_rate > max {
            issues.push(format!(
                "Interest rate {}% exceeds the program cap of {}%",
                quote.interest_rate, max
            ));
        }
    }
    if program.down_payment_percent > Decimal::ZERO {
        let required = scenario.principal * program.down_payment_percent / dec!(100);
        if scenario.down_payment < required {
            issues.push(format!(
                "Down payment {} is below the required {}% ({})",
                scenario.down_payment,
                program.down_payment_percent,
                engine.round(required)
            ));
        }
    }

    Ok(ProgramFit {
        program_code: program.code.clone(),
        eligible: issues.is_empty(),
        issues,
        quote,
    })
}

/// [`check_program_fit`] for a request, wrapped in the output envelope.
pub fn evaluate_program_fit(
    engine: &AmortizationEngine,
    request: &ProgramFitRequest,
) -> AgFinanceResult<ComputationOutput<ProgramFit>> {
    let start = Instant::now();
    let program = request.resolve_program()?;
    let fit = check_program_fit(engine, &program, &request.scenario)?;

    let mut warnings = engine.scenario_warnings(&request.scenario);
    if program.is_fsa {
        warnings.push(format!(
            "FSA rates change quarterly; confirm with the local FSA office ({FSA_WEBSITE})"
        ));
    }

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Program limit check with level-payment quote",
        request,
        warnings,
        elapsed,
        fit,
    ))
}
