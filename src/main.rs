use anyhow::Result;
use clap::{CommandFactory, Parser, Subcommand};
use finex::core::log::init_logging;

#[derive(Parser)]
#[command(version, about)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to optional configuration file
    #[arg(short, long, global = true)]
    config_path: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

impl From<Commands> for finex::AppCommand {
    fn from(cmd: Commands) -> finex::AppCommand {
        match cmd {
            Commands::Refresh => finex::AppCommand::Refresh,
            Commands::Summary { json } => finex::AppCommand::Summary { json },
            Commands::Invoke { query } => finex::AppCommand::Invoke { query },
            Commands::Setup => unreachable!("Setup command should be handled separately"),
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Create default configuration
    Setup,
    /// Refresh the next group of cached rates
    Refresh,
    /// Display wallet balances valued in USD
    Summary {
        /// Print the valuation as JSON
        #[arg(long)]
        json: bool,
    },
    /// Run a single invocation from query pairs, e.g. `--query summary=true`
    Invoke {
        #[arg(short, long = "query", value_parser = parse_query_pair)]
        query: Vec<(String, String)>,
    },
}

fn parse_query_pair(s: &str) -> Result<(String, String), String> {
    finex::cli::invoke::parse_query_pair(s).map_err(|e| e.to_string())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbose);

    let result = match cli.command {
        Some(Commands::Setup) => finex::cli::setup::setup(),
        Some(cmd) => finex::run_command(cmd.into(), cli.config_path.as_deref()).await,
        None => {
            Cli::command().print_help()?;
            Ok(())
        }
    };

    if let Err(e) = &result {
        tracing::error!(error = %e, "Application failed");
    }
    result
}
