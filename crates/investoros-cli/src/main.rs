mod commands;
mod input;
mod output;

use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use std::process;

use commands::underwrite::{PaymentArgs, UnderwriteArgs};

/// Rental property underwriting
#[derive(Parser)]
#[command(
    name = "investoros",
    version,
    about = "Rental property underwriting",
    long_about = "Underwrite a rental property acquisition with decimal precision: loan sizing, \
                  amortized debt service, operating expenses, NOI, PITI, annual cash flow \
                  and cash-on-cash return."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output format
    #[arg(long, default_value = "json", global = true)]
    output: OutputFormat,
}

#[derive(Subcommand)]
enum Commands {
    /// Underwrite a deal from flags, a JSON file, or JSON on stdin
    Underwrite(UnderwriteArgs),
    /// Monthly payment on a fixed-rate amortizing loan
    Payment(PaymentArgs),
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

fn main() {
    let cli = Cli::parse();

    let result: Result<serde_json::Value, Box<dyn std::error::Error>> = match cli.command {
        Commands::Underwrite(args) => commands::underwrite::run_underwrite(args),
        Commands::Payment(args) => commands::underwrite::run_payment(args),
        Commands::Version => {
            println!("investoros {}", env!("CARGO_PKG_VERSION"));
            return;
        }
    };

    match result {
        Ok(value) => {
            output::format_output(&cli.output, &value);
            process::exit(0);
        }
        Err(e) => {
            eprintln!("{}: {}", "error".red().bold(), e);
            process::exit(1);
        }
    }
}
