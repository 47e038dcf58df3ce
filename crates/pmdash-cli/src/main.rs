//! pmdash CLI - Project dashboard data pipeline
//!
//! Command-line interface for converting, publishing and inspecting the
//! dashboard document.

mod commands;
mod config;

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Result;
use chrono::NaiveDate;
use clap::{Parser, Subcommand, ValueEnum};
use pmdash_render::Section;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use crate::config::Config;

#[derive(Parser)]
#[command(name = "pmdash")]
#[command(author, version, about = "Project dashboard data pipeline", long_about = None)]
struct Cli {
    /// Verbose output (-v info, -vv debug)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Configuration file (defaults to ./pmdash.toml when present)
    #[arg(long, env = "PMDASH_CONFIG", value_name = "FILE", global = true)]
    config: Option<PathBuf>,

    /// Storage directory, overriding `storage.root`
    #[arg(long, env = "PMDASH_DATA_DIR", value_name = "DIR", global = true)]
    data_dir: Option<PathBuf>,

    /// Pin the current date (YYYY-MM-DD) instead of reading the clock
    #[arg(long, value_name = "DATE", global = true)]
    today: Option<NaiveDate>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Convert a workbook to the dashboard JSON document
    Convert {
        /// Input workbook (.xlsx)
        #[arg(value_name = "WORKBOOK")]
        workbook: PathBuf,

        /// Output file (stdout if not specified)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Indent the JSON output
        #[arg(long)]
        pretty: bool,
    },

    /// Store a workbook and publish the document converted from it
    Upload {
        /// Workbook to upload (.xlsx)
        #[arg(value_name = "WORKBOOK")]
        workbook: PathBuf,
    },

    /// Re-convert the stored workbook and publish the result
    Refresh,

    /// Show the current dashboard
    Show {
        /// Section to show
        #[arg(short, long, value_enum, default_value = "all")]
        section: SectionArg,

        /// Print JSON instead of text
        #[arg(long)]
        json: bool,

        /// List individual activities, support tasks and risks
        #[arg(short, long)]
        details: bool,
    },

    /// Filter records of the current dashboard
    Query {
        #[command(subcommand)]
        query: QueryCommand,
    },
}

#[derive(Subcommand)]
enum QueryCommand {
    /// Project activities
    Activities {
        /// Status token, Arabic or English (e.g. "مكتمل", "completed")
        #[arg(long)]
        status: Option<String>,

        /// Exact phase name
        #[arg(long)]
        phase: Option<String>,

        #[arg(long)]
        json: bool,
    },

    /// Risks and challenges
    Risks {
        /// Risk status, Arabic or English (e.g. "قائم", "active")
        #[arg(long)]
        status: Option<String>,

        /// Risk type, Arabic or English (e.g. "تحدي", "challenge")
        #[arg(long = "type")]
        kind: Option<String>,

        #[arg(long)]
        json: bool,
    },

    /// Operational support tasks
    Support {
        /// Exact team member name
        #[arg(long)]
        member: Option<String>,

        #[arg(long)]
        json: bool,
    },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum SectionArg {
    All,
    Overview,
    Phases,
    Support,
    Risks,
    Timeline,
}

impl SectionArg {
    fn section(self) -> Option<Section> {
        match self {
            SectionArg::All => None,
            SectionArg::Overview => Some(Section::Overview),
            SectionArg::Phases => Some(Section::Phases),
            SectionArg::Support => Some(Section::Support),
            SectionArg::Risks => Some(Section::Risks),
            SectionArg::Timeline => Some(Section::Timeline),
        }
    }
}

fn init_tracing(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();
}

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let mut config = Config::load(cli.config.as_deref())?;
    if let Some(dir) = cli.data_dir {
        config.storage.root = dir;
    }

    match cli.command {
        Commands::Convert {
            workbook,
            output,
            pretty,
        } => commands::convert(&config, cli.today, &workbook, output.as_deref(), pretty),
        Commands::Upload { workbook } => commands::upload(&config, cli.today, &workbook),
        Commands::Refresh => commands::refresh(&config, cli.today),
        Commands::Show {
            section,
            json,
            details,
        } => commands::show(&config, cli.today, section.section(), json, details),
        Commands::Query { query } => match query {
            QueryCommand::Activities {
                status,
                phase,
                json,
            } => commands::query_activities(
                &config,
                cli.today,
                status.as_deref(),
                phase.as_deref(),
                json,
            ),
            QueryCommand::Risks { status, kind, json } => {
                commands::query_risks(&config, cli.today, status.as_deref(), kind.as_deref(), json)
            }
            QueryCommand::Support { member, json } => {
                commands::query_support(&config, cli.today, member.as_deref(), json)
            }
        },
    }
}
