// namerecon CLI - customer name reconciliation across CSV sources

mod exit_codes;
mod inspect;
mod output;
mod recon;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{ArgAction, Parser, Subcommand};

use exit_codes::{EXIT_RUNTIME, EXIT_SUCCESS, EXIT_USAGE};

#[derive(Parser)]
#[command(name = "namerecon")]
#[command(about = "Group and reconcile customer names across data sources")]
#[command(version)]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug). RUST_LOG overrides.
    #[arg(short, long, global = true, action = ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Reconcile the sources named in a TOML config and write the CSV output
    #[command(after_help = "\
Examples:
  namerecon run recon.toml
  namerecon run recon.toml --json
  namerecon run recon.toml --output result.json --csv out/customers.csv
  namerecon run recon.toml --no-csv --json

Config layout:
  name = \"Customer reconciliation\"

  [matcher]                  # optional
  min_token_similarity = 0.95
  min_match_ratio = 0.8
  min_meaningful_matches = 2

  [vocabulary]               # optional, replaces the built-in lists given
  ignore_words = [\"INC\", \"LLC\"]

  [[sources]]                # 2 or 3, matched in this order
  label = \"tb\"
  file = \"tb_customer_names.csv\"
  column = \"account_name\"

  [output]                   # optional
  file = \"customer_reconciliation.csv\"
  max_rows_per_file = 10000")]
    Run {
        /// Path to the .recon.toml config file
        config: PathBuf,

        /// Output JSON to stdout instead of human summary
        #[arg(long)]
        json: bool,

        /// Write JSON output to file
        #[arg(long)]
        output: Option<PathBuf>,

        /// CSV output path (default: output.file from the config)
        #[arg(long, conflicts_with = "no_csv")]
        csv: Option<PathBuf>,

        /// Skip writing the CSV output
        #[arg(long)]
        no_csv: bool,
    },

    /// Validate a config without running
    #[command(after_help = "\
Examples:
  namerecon validate recon.toml")]
    Validate {
        /// Path to the .recon.toml config file
        config: PathBuf,
    },

    /// Decide whether two names denote the same customer (exit 1 if not)
    #[command(after_help = "\
Examples:
  namerecon match \"A&A EXPRESS LLC\" \"A A Express Llc\"
  namerecon match \"United Rentals\" \"United Construction\" --json
  namerecon match \"ARROW\" \"ARROWS\" --config recon.toml")]
    Match {
        /// First customer name
        name1: String,

        /// Second customer name
        name2: String,

        /// Config file supplying [matcher] and [vocabulary]
        #[arg(long)]
        config: Option<PathBuf>,

        #[arg(long)]
        json: bool,
    },

    /// Show how a name is cleaned, normalized, tokenized and indexed
    #[command(after_help = "\
Examples:
  namerecon tokens \"Abbott's Garage & Wrecker Service, Inc.\"
  namerecon tokens \"1 Source Solutions\" --json")]
    Tokens {
        /// Customer name to inspect
        name: String,

        /// Config file supplying [matcher] and [vocabulary]
        #[arg(long)]
        config: Option<PathBuf>,

        #[arg(long)]
        json: bool,
    },

    /// Group duplicate names within one CSV column
    #[command(after_help = "\
Examples:
  namerecon group tb_customer_names.csv --column account_name
  namerecon group fb_customer_names.csv --column customer --json")]
    Group {
        /// CSV file with a header row
        file: PathBuf,

        /// Header of the column holding the names
        #[arg(long, short = 'c')]
        column: String,

        /// Config file supplying [matcher] and [vocabulary]
        #[arg(long)]
        config: Option<PathBuf>,

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
        Commands::Run { config, json, output, csv, no_csv } => {
            recon::cmd_run(config, json, output, csv, no_csv)
        }
        Commands::Validate { config } => recon::cmd_validate(config),
        Commands::Match { name1, name2, config, json } => {
            inspect::cmd_match(name1, name2, config, json)
        }
        Commands::Tokens { name, config, json } => inspect::cmd_tokens(name, config, json),
        Commands::Group { file, column, config, json } => {
            inspect::cmd_group(file, column, config, json)
        }
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

impl CliError {
    pub fn args(msg: impl Into<String>) -> Self {
        Self { code: EXIT_USAGE, message: msg.into(), hint: None }
    }

    pub fn runtime(msg: impl Into<String>) -> Self {
        Self { code: EXIT_RUNTIME, message: msg.into(), hint: None }
    }

    /// Add a hint to an existing error.
    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }
}
