//! CLI entry and dispatch.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use crate::config;

mod commands;

#[derive(Parser)]
#[command(name = "insightpulse")]
#[command(version = "0.1")]
#[command(about = "Analyze a CSV dataset: statistics, AI insights, chat, and a PDF report")]
#[command(args_conflicts_with_subcommands = true)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    #[command(flatten)]
    analyze_args: AnalyzeArgs,
}

/// Arguments shared by `analyze` and the bare default invocation.
#[derive(clap::Args, Debug, Clone)]
struct AnalyzeArgs {
    /// Path to the CSV file to analyze
    #[arg(value_name = "FILE")]
    file: Option<PathBuf>,

    /// Override the model from config
    #[arg(short, long)]
    model: Option<String>,

    /// Where to write the PDF report
    #[arg(long, value_name = "PATH")]
    report: Option<PathBuf>,

    /// Skip the report export
    #[arg(long)]
    no_report: bool,
}

#[derive(clap::Subcommand)]
enum Commands {
    /// Full analysis: overview, AI insights, follow-up chat, report export
    Analyze {
        #[command(flatten)]
        args: AnalyzeArgs,
    },

    /// Print the dataset overview without calling the model
    Describe {
        /// Path to the CSV file to describe
        #[arg(value_name = "FILE")]
        file: PathBuf,
    },

    /// Manage configuration
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

#[derive(clap::Subcommand)]
enum ConfigCommands {
    /// Show the path to the config file
    Path,
    /// Initialize a default config file (if not present)
    Init,
    /// Set and persist the default model
    Model {
        /// Model name, e.g. gemini-1.5-flash
        #[arg(value_name = "MODEL")]
        name: String,
    },
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

pub fn run() -> Result<()> {
    let cli = Cli::parse();

    init_tracing();

    // one tokio runtime for everything
    let rt = tokio::runtime::Runtime::new().context("create tokio runtime")?;

    rt.block_on(async move { dispatch(cli).await })
}

async fn dispatch(cli: Cli) -> Result<()> {
    let config = config::Config::load().context("load config")?;

    // bare `insightpulse <FILE>` defaults to analyze
    let Some(command) = cli.command else {
        return run_analyze(cli.analyze_args, &config).await;
    };

    match command {
        Commands::Analyze { args } => run_analyze(args, &config).await,

        Commands::Describe { file } => commands::describe::run(&file),

        Commands::Config { command } => match command {
            ConfigCommands::Path => commands::config::path(),
            ConfigCommands::Init => commands::config::init(),
            ConfigCommands::Model { name } => commands::config::set_model(&name),
        },
    }
}

async fn run_analyze(args: AnalyzeArgs, config: &config::Config) -> Result<()> {
    let Some(file) = args.file else {
        anyhow::bail!("missing CSV file. Usage: insightpulse analyze <FILE>");
    };
    commands::analyze::run(
        &file,
        config,
        args.model.as_deref(),
        args.report,
        args.no_report,
    )
    .await
}
