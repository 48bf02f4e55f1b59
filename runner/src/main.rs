mod config;
#[cfg(test)]
mod config_test;

use cartbench_analysis::run_analysis;
use cartbench_ingest::combine_files;
use clap::{Args, Parser, Subcommand};
use config::BenchConfig;
use std::{
    io::{self, IsTerminal},
    path::PathBuf,
    process::ExitCode,
};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

/// Combine and compare the result logs of the MySQL and DynamoDB cart benchmarks
#[derive(Debug, Parser)]
#[command(name = "cartbench", version)]
struct Cli {
    /// YAML config file, flags given on the command line take precedence
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Increase log verbosity (-v debug, -vv trace), RUST_LOG takes precedence
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Validate both result logs and merge them into one document
    Combine(CombineArgs),
    /// Compute comparison metrics from a combined document
    Analyze(AnalyzeArgs),
    /// Combine, then analyze
    Run {
        #[command(flatten)]
        combine: CombineArgs,
        #[command(flatten)]
        analyze: AnalyzeArgs,
    },
}

#[derive(Debug, Clone, Copy)]
enum Step {
    Combine,
    Analyze,
    Run,
}

#[derive(Debug, Args)]
struct CombineArgs {
    /// Result log of the MySQL backend
    #[arg(long)]
    mysql: Option<PathBuf>,
    /// Result log of the DynamoDB backend
    #[arg(long)]
    dynamodb: Option<PathBuf>,
    /// Where to write the combined document
    #[arg(long)]
    output: Option<PathBuf>,
}

#[derive(Debug, Args)]
struct AnalyzeArgs {
    /// Combined document to analyze
    #[arg(long)]
    input: Option<PathBuf>,
    /// Where to write the rendered comparison tables
    #[arg(long)]
    tables: Option<PathBuf>,
    /// Where to write the raw metrics as json
    #[arg(long)]
    metrics: Option<PathBuf>,
}

impl CombineArgs {
    fn apply(self, config: &mut BenchConfig) {
        if let Some(mysql) = self.mysql {
            config.combine.mysql = mysql;
        }
        if let Some(dynamodb) = self.dynamodb {
            config.combine.dynamodb = dynamodb;
        }
        if let Some(output) = self.output {
            // a combined run analyzes what it just wrote
            config.analyze.input = output.clone();
            config.combine.output = output;
        }
    }
}

impl AnalyzeArgs {
    fn apply(self, config: &mut BenchConfig) {
        if let Some(input) = self.input {
            config.analyze.input = input;
        }
        if let Some(tables) = self.tables {
            config.analyze.tables = tables;
        }
        if let Some(metrics) = self.metrics {
            config.analyze.metrics = metrics;
        }
    }
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_ansi(io::stderr().is_terminal())
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level)))
        .init();
}

fn combine(config: &BenchConfig) -> bool {
    let combine = &config.combine;

    match combine_files(
        &combine.mysql,
        &combine.dynamodb,
        &combine.output,
        &combine.operation_kinds(),
    ) {
        Ok(_) => true,
        Err(error) => {
            error!("{error}");
            false
        }
    }
}

fn analyze(config: &BenchConfig) -> bool {
    let analyze = &config.analyze;

    match run_analysis(&analyze.input, &analyze.tables, &analyze.metrics) {
        Ok(_) => true,
        Err(error) => {
            error!("{error}");
            false
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let mut config = match BenchConfig::load(cli.config.as_ref()) {
        Ok(config) => config,
        Err(error) => {
            error!("Failed to load config: {error}");
            return ExitCode::FAILURE;
        }
    };

    let command = match cli.command {
        Commands::Combine(args) => {
            args.apply(&mut config);
            Step::Combine
        }
        Commands::Analyze(args) => {
            args.apply(&mut config);
            Step::Analyze
        }
        Commands::Run {
            combine: combine_args,
            analyze: analyze_args,
        } => {
            combine_args.apply(&mut config);
            analyze_args.apply(&mut config);
            Step::Run
        }
    };

    if config.preflight_checks() {
        error!("Refusing to run with an invalid configuration");
        return ExitCode::FAILURE;
    }

    let succeeded = match command {
        Step::Combine => combine(&config),
        Step::Analyze => analyze(&config),
        Step::Run => combine(&config) && analyze(&config),
    };

    if succeeded {
        info!("Done");
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}
