pub mod fsa;

pub use fsa::{
    check_program_fit, evaluate_program_fit, find_program, fsa_programs, LoanProgram, LoanType,
    ProgramFit, ProgramFitRequest,
};
