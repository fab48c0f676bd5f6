//! CLI entry point for codeslice

use std::io::IsTerminal;
use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand, ValueEnum};
use codeslice::{
    DatasetConfig, Division, Error, FilterMode, FilterSpec, PipelineConfig, PipelineLayout,
    Report, build_dataset, filter_by_extension, filter_by_filename, filter_dataset, print_report,
    print_report_json, run_pipeline,
};
use tracing_subscriber::EnvFilter;

/// Color output mode
#[derive(Debug, Clone, Copy, Default, ValueEnum)]
enum ColorMode {
    /// Auto-detect based on terminal and environment
    #[default]
    Auto,
    /// Always use colors
    Always,
    /// Never use colors
    Never,
}

/// Determine whether to use color output based on mode and environment.
fn should_use_color(mode: ColorMode) -> bool {
    match mode {
        ColorMode::Always => true,
        ColorMode::Never => false,
        ColorMode::Auto => {
            // Respect NO_COLOR environment variable (https://no-color.org/)
            if std::env::var_os("NO_COLOR").is_some() {
                return false;
            }
            if std::env::var_os("FORCE_COLOR").is_some() {
                return true;
            }
            if std::env::var("TERM").map(|t| t == "dumb").unwrap_or(false) {
                return false;
            }
            std::io::stdout().is_terminal()
        }
    }
}

#[derive(Parser, Debug)]
#[command(name = "codeslice")]
#[command(about = "Slice source trees into file, line, method and class datasets")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Output results as JSON
    #[arg(long = "json", global = true)]
    json: bool,

    /// Control color output: auto, always, never
    #[arg(long = "color", value_name = "WHEN", default_value = "auto", global = true)]
    color: ColorMode,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace). RUST_LOG overrides.
    #[arg(short = 'v', long = "verbose", action = clap::ArgAction::Count, global = true)]
    verbose: u8,
}

/// Options shared by the filter subcommands.
#[derive(clap::Args, Debug)]
struct FilterArgs {
    /// Keep only matches (in) or drop matches (out)
    #[arg(short = 'm', long = "mode")]
    mode: FilterMode,

    /// Patterns to match (repeatable, or comma-separated)
    #[arg(short = 'p', long = "pattern", value_delimiter = ',')]
    patterns: Vec<String>,
}

impl FilterArgs {
    fn spec(&self) -> FilterSpec {
        FilterSpec::new(self.mode, self.patterns.iter().cloned())
    }
}

/// Options for dataset building.
#[derive(clap::Args, Debug)]
struct BuildArgs {
    /// Number of parallel workers for segmentation
    /// (0 = auto-detect, 1 = sequential, N = use N workers)
    #[arg(short = 'j', long = "jobs", default_value = "0")]
    jobs: usize,

    /// Skip files larger than SIZE. Use suffixes: K, M, G (e.g., 5M for 5MB)
    #[arg(long = "max-file-size", value_name = "SIZE", value_parser = parse_file_size)]
    max_file_size: Option<u64>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Copy files whose names end with a pattern into DEST
    FilterExt {
        #[command(flatten)]
        filter: FilterArgs,
        /// Source tree (left untouched)
        source: PathBuf,
        /// Destination root for the mirrored copy
        dest: PathBuf,
    },

    /// Delete files whose names do (or do not) match exactly. Modifies SOURCE in place.
    FilterName {
        #[command(flatten)]
        filter: FilterArgs,
        /// Tree to filter in place
        source: PathBuf,
    },

    /// Cut a tree into an unprocessed dataset
    Divide {
        /// Granularity of records
        #[arg(short = 'd', long = "division")]
        division: Division,
        #[command(flatten)]
        build: BuildArgs,
        /// Tree to read
        source: PathBuf,
        /// Directory for unprocessed_dataset.jsonl
        dest: PathBuf,
    },

    /// Filter an unprocessed dataset into a processed one
    Process {
        /// Division the dataset was built with (file, method or class)
        #[arg(short = 'd', long = "division")]
        division: Division,
        #[command(flatten)]
        filter: FilterArgs,
        /// Unprocessed dataset file
        input: PathBuf,
        /// Directory for processed_dataset.jsonl
        dest: PathBuf,
    },

    /// Run every stage from a JSON config
    Run {
        /// Pipeline config file
        config: PathBuf,
        /// Workspace holding raw/, file_filtered/, divisioned/ and processed/
        #[arg(default_value = ".")]
        workspace: PathBuf,
        /// Override the config's worker count
        #[arg(short = 'j', long = "jobs")]
        jobs: Option<usize>,
    },
}

/// Parse a file size string like "5M", "100K", "1G" into bytes.
/// Supports suffixes: K/KB (1024), M/MB (1024^2), G/GB (1024^3)
/// Without suffix, interprets as bytes.
fn parse_file_size(s: &str) -> Result<u64, String> {
    let s = s.trim().to_uppercase();
    let (num_str, multiplier) = if let Some(n) = s.strip_suffix("GB") {
        (n, 1024 * 1024 * 1024)
    } else if let Some(n) = s.strip_suffix('G') {
        (n, 1024 * 1024 * 1024)
    } else if let Some(n) = s.strip_suffix("MB") {
        (n, 1024 * 1024)
    } else if let Some(n) = s.strip_suffix('M') {
        (n, 1024 * 1024)
    } else if let Some(n) = s.strip_suffix("KB") {
        (n, 1024)
    } else if let Some(n) = s.strip_suffix('K') {
        (n, 1024)
    } else {
        (s.as_str(), 1)
    };

    let num: u64 = num_str
        .trim()
        .parse()
        .map_err(|_| format!("invalid number: {}", num_str))?;

    num.checked_mul(multiplier)
        .ok_or_else(|| format!("size too large: {}", s))
}

/// Install the stderr log subscriber. `RUST_LOG` wins over `-v`.
fn init_tracing(verbosity: u8) {
    let default = match verbosity {
        0 => "warn",
        1 => "info,ignore=warn",
        2 => "debug,ignore=warn",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

/// Print a stage result in the requested format.
fn emit(report: Report<'_>, json: bool, use_color: bool) -> codeslice::Result<()> {
    let printed = if json {
        print_report_json(report)
    } else {
        print_report(report, use_color)
    };
    printed.map_err(|e| Error::io("<stdout>", e))
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let json = cli.json;
    let use_color = should_use_color(cli.color);

    let result = match cli.command {
        Command::FilterExt { filter, source, dest } => {
            filter_by_extension(&filter.spec(), &source, &dest)
                .and_then(|counter| emit(Report::Counter(&counter), json, use_color))
        }
        Command::FilterName { filter, source } => filter_by_filename(&filter.spec(), &source)
            .and_then(|counter| emit(Report::Counter(&counter), json, use_color)),
        Command::Divide {
            division,
            build,
            source,
            dest,
        } => {
            let config = DatasetConfig {
                jobs: build.jobs,
                max_file_size: build.max_file_size,
            };
            build_dataset(&source, division, &dest, &config)
                .and_then(|dataset| emit(Report::Dataset(&dataset), json, use_color))
        }
        Command::Process {
            division,
            filter,
            input,
            dest,
        } => filter_dataset(&input, division, &filter.spec(), &dest)
            .and_then(|records| emit(Report::Records(&records), json, use_color)),
        Command::Run {
            config,
            workspace,
            jobs,
        } => PipelineConfig::load(&config)
            .map(|mut config| {
                if let Some(jobs) = jobs {
                    config.jobs = jobs;
                }
                config
            })
            .and_then(|config| run_pipeline(&config, &PipelineLayout::under(&workspace)))
            .and_then(|pipeline| emit(Report::Pipeline(&pipeline), json, use_color)),
    };

    if let Err(e) = result {
        eprintln!("codeslice: {}", e);
        process::exit(1);
    }
}
