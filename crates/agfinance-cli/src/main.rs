mod commands;
mod input;
mod output;

use clap::{ArgAction, Parser, Subcommand, ValueEnum};
use colored::Colorize;
use std::process;

use commands::loans::{CompareArgs, ScenarioArgs};
use commands::programs::{ProgramFitArgs, ProgramsArgs};

/// Farm loan quotes, comparisons and amortization schedules
#[derive(Parser)]
#[command(
    name = "agf",
    version,
    about = "Farm loan quotes, comparisons and amortization schedules",
    long_about = "A CLI for level-payment loan calculations with decimal precision. \
                  Quotes a single financing scenario, ranks several by total cost, \
                  prints month-by-month schedules and checks scenarios against the \
                  FSA farm loan program limits."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output format
    #[arg(long, default_value = "json", global = true)]
    output: OutputFormat,

    /// Engine configuration file (JSON: rounding, decimal_places, long_term_warning_months)
    #[arg(long, global = true)]
    config: Option<String>,

    /// Log verbosity (-v warn, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,
}

#[derive(Subcommand)]
enum Commands {
    /// Quote monthly payment, total interest and total cost for one loan
    Quote(ScenarioArgs),
    /// Rank several loan scenarios by total cost
    Compare(CompareArgs),
    /// Month-by-month amortization schedule for one loan
    Schedule(ScenarioArgs),
    /// List FSA farm loan programs
    Programs(ProgramsArgs),
    /// Check a loan scenario against a program's limits
    ProgramFit(ProgramFitArgs),
    /// Print version information
    Version,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    Json,
    Table,
    Csv,
    Minimal,
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "error",
        1 => "warn",
        2 => "debug",
        _ => "trace",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp(None)
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let engine = match commands::load_engine(cli.config.as_deref()) {
        Ok(engine) => engine,
        Err(e) => {
            eprintln!("{}: {}", "error".red().bold(), e);
            process::exit(1);
        }
    };

    let result: Result<serde_json::Value, Box<dyn std::error::Error>> = match cli.command {
        Commands::Quote(args) => commands::loans::run_quote(&engine, args),
        Commands::Compare(args) => commands::loans::run_compare(&engine, args),
        Commands::Schedule(args) => commands::loans::run_schedule(&engine, args),
        Commands::Programs(args) => commands::programs::run_programs(args),
        Commands::ProgramFit(args) => commands::programs::run_program_fit(&engine, args),
        Commands::Version => {
            println!("agf {}", env!("CARGO_PKG_VERSION"));
            return;
        }
    };

    match result {
        Ok(value) => {
            output::format_output(&cli.output, &value);
            process::exit(0);
        }
        Err(e) => {
            log::debug!("command failed: {e:?}");
            eprintln!("{}: {}", "error".red().bold(), e);
            process::exit(1);
        }
    }
}
