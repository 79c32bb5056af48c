pub mod loans;
pub mod programs;

use agfinance_core::loans::{AmortizationConfig, AmortizationEngine};

use crate::input;

/// Build the engine from an optional JSON config file; defaults otherwise.
pub fn load_engine(config_path: Option<&str>) -> Result<AmortizationEngine, Box<dyn std::error::Error>> {
    let config: AmortizationConfig = match config_path {
        Some(path) => input::file::read_json(path)?,
        None => AmortizationConfig::default(),
    };
    log::debug!("engine config: {config:?}");
    Ok(AmortizationEngine::new(config))
}
