pub mod error;
pub mod time_value;
pub mod types;

#[cfg(feature = "loans")]
pub mod loans;

#[cfg(feature = "programs")]
pub mod programs;

pub use error::AgFinanceError;
pub use types::*;

/// Standard result type for all agfinance operations
pub type AgFinanceResult<T> = Result<T, AgFinanceError>;
