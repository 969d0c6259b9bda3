// Copyright 2026 Transcript Engine Contributors
// SPDX-License-Identifier: Apache-2.0

use anyhow::Result;
use clap::{CommandFactory, Parser, Subcommand, ValueEnum};
use clap_complete::Shell;
use transcript_engine::cli::{self, EngineArgs};
use transcript_engine::rest::RestOptions;

#[derive(Parser)]
#[command(
    name = "transcript",
    about = "Fetch a student's result from the university LMS and compute GPA/CGPA",
    version
)]
struct Cli {
    #[command(flatten)]
    engine: EngineArgs,

    /// Log level (trace, debug, info, warn, error). RUST_LOG takes precedence.
    #[arg(long, global = true, default_value = "info")]
    log_level: String,

    /// Log output format
    #[arg(long, global = true, value_enum, default_value_t = LogFormat::Text)]
    log_format: LogFormat,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, ValueEnum)]
enum LogFormat {
    Text,
    Json,
}

#[derive(Subcommand)]
enum Commands {
    /// Look up one registration number and print the result as JSON
    Lookup {
        /// Registration number, e.g. 2022-ag-7755
        reg_no: String,
        /// Pretty-print the JSON output
        #[arg(long)]
        pretty: bool,
    },
    /// Serve the REST API
    Serve {
        /// Address to bind
        #[arg(long, default_value = "0.0.0.0")]
        host: String,
        /// Port to listen on
        #[arg(long, env = "PORT", default_value = "5000")]
        port: u16,
        /// Key clients must send in the x-api-key header
        #[arg(long, env = "API_KEY", hide_env_values = true)]
        api_key: Option<String>,
        /// Extra allowed CORS origin
        #[arg(long, env = "FRONTEND_URL")]
        frontend_url: Option<String>,
        /// Maximum lookups running at once
        #[arg(long, env = "MAX_CONCURRENT_LOOKUPS", default_value = "4")]
        max_concurrent_lookups: usize,
    },
    /// Compute quality points for a single course
    Grade {
        /// Obtained marks
        #[arg(long)]
        marks: u32,
        /// Credit hours
        #[arg(long)]
        credit_hours: u32,
    },
    /// Generate shell completion scripts
    Completions {
        /// Shell type (bash, zsh, fish, powershell)
        shell: Shell,
    },
}

fn init_tracing(level: &str, format: LogFormat) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);
    match format {
        LogFormat::Text => builder.init(),
        LogFormat::Json => builder.json().init(),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(&cli.log_level, cli.log_format);

    let config = cli.engine.into_config();

    match cli.command {
        Commands::Lookup { reg_no, pretty } => {
            if !cli::lookup_cmd::run(config, &reg_no, pretty).await? {
                std::process::exit(1);
            }
        }
        Commands::Serve {
            host,
            port,
            api_key,
            frontend_url,
            max_concurrent_lookups,
        } => {
            let options = RestOptions {
                api_key,
                frontend_url,
                max_concurrent_lookups,
            };
            cli::serve_cmd::run(config, &host, port, options).await?;
        }
        Commands::Grade {
            marks,
            credit_hours,
        } => cli::grade_cmd::run(marks, credit_hours)?,
        Commands::Completions { shell } => {
            let mut cmd = Cli::command();
            clap_complete::generate(shell, &mut cmd, "transcript", &mut std::io::stdout());
        }
    }

    Ok(())
}
