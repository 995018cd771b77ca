//! Vizor CLI - Turn chart requests into structured queries and result tables
//!
//! Usage:
//!   vizor parse <request> --columns <a,b,c>
//!   vizor run <data.csv> <request> [--pretty]
//!   vizor aliases <data.csv>
//!   vizor command <command> [--api-key <key>]
//!
//! Examples:
//!   vizor parse "pie chart on devicetype" --columns deviceType,age
//!   vizor run students.csv "bar chart of gender where math score above 50 group by gender"
//!   vizor command "sum bytesFromClient+bytesFromServer group by ts order by ts ascending"

use clap::{Parser, Subcommand};
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;
use vizor::alias::AliasIndex;
use vizor::command::{curl_command, retrieval_url, CommandRequest};
use vizor::config::Settings;
use vizor::data::Table;
use vizor::parser::RequestParser;
use vizor::session::Session;

#[derive(Parser)]
#[command(name = "vizor")]
#[command(about = "Vizor - Turn free-form chart requests into structured queries")]
#[command(version)]
struct Cli {
    /// Path to a vizor.toml (defaults to the usual search locations)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Parse a request into a structured query
    Parse {
        /// The request text
        request: String,

        /// Comma-separated column names the request may refer to
        #[arg(short, long, value_delimiter = ',')]
        columns: Vec<String>,
    },

    /// Parse a request and run it against a CSV file
    Run {
        /// Path to the .csv file
        file: PathBuf,

        /// The request text
        request: String,

        /// Pretty-print the JSON output
        #[arg(short, long)]
        pretty: bool,
    },

    /// List the aliases recognized for a CSV file's columns
    Aliases {
        /// Path to the .csv file
        file: PathBuf,
    },

    /// Build the data-retrieval URL for a keyword command
    Command {
        /// The command text
        command: String,

        /// API key for the curl command (overrides the config file)
        #[arg(long)]
        api_key: Option<String>,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let settings = match load_settings(cli.config.as_deref()) {
        Ok(s) => s,
        Err(code) => return code,
    };

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&settings.logging.filter));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Parse { request, columns } => cmd_parse(&settings, &request, &columns),
        Commands::Run {
            file,
            request,
            pretty,
        } => cmd_run(&settings, &file, &request, pretty),
        Commands::Aliases { file } => cmd_aliases(&file),
        Commands::Command { command, api_key } => cmd_command(&settings, &command, api_key),
    }
}

fn load_settings(path: Option<&Path>) -> Result<Settings, ExitCode> {
    let result = match path {
        Some(path) => Settings::from_file(path),
        None => Settings::load(),
    };
    result.map_err(|e| {
        eprintln!("Configuration error: {}", e);
        ExitCode::FAILURE
    })
}

fn load_table(file: &Path) -> Result<Table, ExitCode> {
    Table::from_csv_path(file).map_err(|e| {
        eprintln!("Error reading file '{}': {}", file.display(), e);
        ExitCode::FAILURE
    })
}

fn print_json<T: Serialize>(value: &T, pretty: bool) -> ExitCode {
    let rendered = if pretty {
        serde_json::to_string_pretty(value)
    } else {
        serde_json::to_string(value)
    };
    match rendered {
        Ok(json) => {
            println!("{}", json);
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("Serialization error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn cmd_parse(settings: &Settings, request: &str, columns: &[String]) -> ExitCode {
    let index = AliasIndex::build(columns);
    let outcome = RequestParser::with_settings(&settings.parser).parse(request, &index);
    print_json(&outcome, true)
}

fn cmd_run(settings: &Settings, file: &Path, request: &str, pretty: bool) -> ExitCode {
    let table = match load_table(file) {
        Ok(t) => t,
        Err(code) => return code,
    };

    let session = Session::new(Arc::new(table))
        .with_parser(RequestParser::with_settings(&settings.parser));

    match session.handle(request) {
        Ok(render) => {
            for diag in &render.diagnostics {
                eprintln!("  {}", diag);
            }
            print_json(&render, pretty)
        }
        Err(e) => {
            eprintln!("Execution error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn cmd_aliases(file: &Path) -> ExitCode {
    let table = match load_table(file) {
        Ok(t) => t,
        Err(code) => return code,
    };

    let index = AliasIndex::build(table.columns());
    println!("File: {}", file.display());
    println!();
    println!("Aliases:");
    for (alias, column) in index.entries() {
        println!("  {} -> {}", alias, column);
    }

    ExitCode::SUCCESS
}

fn cmd_command(settings: &Settings, command: &str, api_key: Option<String>) -> ExitCode {
    let request = match CommandRequest::parse(command) {
        Ok(r) => r,
        Err(e) => {
            eprintln!("Command error: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let api_key = match api_key {
        Some(key) => Some(key),
        None => match settings.retrieval.resolved_api_key() {
            Ok(key) => key,
            Err(e) => {
                eprintln!("Configuration error: {}", e);
                return ExitCode::FAILURE;
            }
        },
    };

    let url = retrieval_url(&request, &settings.retrieval);
    println!("{}", url);
    match api_key {
        Some(key) => println!("{}", curl_command(&url, &key)),
        None => eprintln!("No API key configured; skipping curl command"),
    }

    ExitCode::SUCCESS
}
