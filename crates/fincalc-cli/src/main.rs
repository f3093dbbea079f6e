mod commands;
mod input;
mod output;

use clap::{ArgAction, Parser, Subcommand, ValueEnum};
use colored::Colorize;
use std::process;

use commands::lending::EmiArgs;
use commands::real_assets::RentalNpvArgs;
use commands::wealth::{AllocationArgs, GoalArgs, GoalsArgs, RetirementArgs};

/// Personal finance projections: loans, rental property, retirement, goals
#[derive(Parser)]
#[command(
    name = "fincalc",
    version,
    about = "Personal finance projections with decimal precision",
    long_about = "A CLI for loan amortization, rental property NPV, retirement corpus \
                  planning, goal-based SIP sizing and age-based asset allocation. \
                  Inputs come from flags, a JSON/YAML file, or JSON piped on stdin."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output format
    #[arg(long, default_value = "json", global = true)]
    output: OutputFormat,

    /// Format the minimal figure as rupees (₹, lakh/crore)
    #[arg(long, global = true)]
    inr: bool,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,
}

#[derive(Subcommand)]
enum Commands {
    /// EMI and month-by-month amortization schedule of a loan
    Emi(EmiArgs),
    /// NPV of a buy-to-let property with optional terminal sale
    RentalNpv(RentalNpvArgs),
    /// Retirement corpus required vs projected, with lifetime trajectory
    Retirement(RetirementArgs),
    /// Monthly SIP for a single inflation-adjusted goal
    Goal(GoalArgs),
    /// Monthly SIPs for a list of goals (invalid goals are reported, not fatal)
    Goals(GoalsArgs),
    /// Age-based equity/debt/alternatives split
    Allocation(AllocationArgs),
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

fn init_logging(verbosity: u8) {
    let level = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let result: Result<serde_json::Value, Box<dyn std::error::Error>> = match cli.command {
        Commands::Emi(args) => commands::lending::run_emi(args),
        Commands::RentalNpv(args) => commands::real_assets::run_rental_npv(args),
        Commands::Retirement(args) => commands::wealth::run_retirement(args),
        Commands::Goal(args) => commands::wealth::run_goal(args),
        Commands::Goals(args) => commands::wealth::run_goals(args),
        Commands::Allocation(args) => commands::wealth::run_allocation(args),
        Commands::Version => {
            println!("fincalc {}", env!("CARGO_PKG_VERSION"));
            return;
        }
    };

    match result {
        Ok(value) => {
            output::format_output(&cli.output, &value, cli.inr);
            process::exit(0);
        }
        Err(e) => {
            eprintln!("{}: {}", "error".red().bold(), e);
            process::exit(1);
        }
    }
}
