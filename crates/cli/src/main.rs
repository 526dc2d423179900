// custlink CLI - link ERP customer records to a data broker dataset

mod exit_codes;
mod link;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{ArgAction, Parser, Subcommand};

use exit_codes::EXIT_SUCCESS;

#[derive(Parser)]
#[command(name = "custlink")]
#[command(about = "Link ERP customer records to their best-matching broker records")]
#[command(version)]
#[command(subcommand_required = false)]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug); RUST_LOG overrides
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Link every ERP record to one broker record and write the matches
    #[command(after_help = "\
Without a config file the default dataset paths are used, relative to the
working directory. Flag paths always resolve against the working directory;
paths from a config file resolve against the config file's directory.

Examples:
  custlink run
  custlink run nightly.link.toml
  custlink run nightly.link.toml --json
  custlink run --erp erp.csv --broker broker.csv --out clients.csv
  custlink run nightly.link.toml --report report.json --parallel")]
    Run {
        /// Path to the .link.toml config file
        config: Option<PathBuf>,

        /// ERP customer CSV (overrides config)
        #[arg(long)]
        erp: Option<PathBuf>,

        /// Broker dataset CSV (overrides config)
        #[arg(long)]
        broker: Option<PathBuf>,

        /// Output CSV of matched broker rows (overrides config)
        #[arg(long)]
        out: Option<PathBuf>,

        /// Print the JSON report to stdout
        #[arg(long)]
        json: bool,

        /// Write the JSON report to a file
        #[arg(long)]
        report: Option<PathBuf>,

        /// Match ERP records in parallel
        #[arg(long)]
        parallel: bool,

        /// Omit the leading broker row index column
        #[arg(long)]
        no_index: bool,
    },

    /// Validate a link config without reading any data
    #[command(after_help = "\
Examples:
  custlink validate nightly.link.toml")]
    Validate {
        /// Path to the .link.toml config file
        config: PathBuf,
    },

    /// Score two strings the way names are scored during linkage
    #[command(after_help = "\
Examples:
  custlink score \"Acme Corporation\" \"ACME CORP\"
  custlink score \"Smith & Sons, Ltd\" \"smith and sons ltd\" --json")]
    Score {
        left: String,
        right: String,

        /// Print normalized inputs and score as JSON
        #[arg(long)]
        json: bool,
    },
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp(None)
        .init();
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let result = match cli.command {
        None => {
            // No subcommand = show help
            eprintln!("Usage: custlink <command> [options]");
            eprintln!("       custlink --help for more information");
            Ok(())
        }
        Some(Commands::Run {
            config,
            erp,
            broker,
            out,
            json,
            report,
            parallel,
            no_index,
        }) => link::cmd_run(link::RunArgs {
            config,
            erp,
            broker,
            out,
            json,
            report,
            parallel,
            no_index,
        }),
        Some(Commands::Validate { config }) => link::cmd_validate(config),
        Some(Commands::Score { left, right, json }) => link::cmd_score(left, right, json),
    };

    match result {
        Ok(()) => ExitCode::from(EXIT_SUCCESS),
        Err(CliError { code, message, hint }) => {
            if !message.is_empty() {
                eprintln!("error: {}", message);
            }
            if let Some(hint) = hint {
                eprintln!("hint:  {}", hint);
            }
            ExitCode::from(code)
        }
    }
}

#[derive(Debug)]
pub struct CliError {
    pub code: u8,
    pub message: String,
    pub hint: Option<String>,
}
