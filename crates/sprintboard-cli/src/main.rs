#![forbid(unsafe_code)]

mod cmd;
mod output;

use clap::{CommandFactory, Parser, Subcommand};
use output::OutputMode;
use sprintboard_core::{ErrorCode, SprintError};
use std::env;
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

#[derive(Parser, Debug)]
#[command(
    name = "sb",
    author,
    version,
    about = "sb: release-label triage and ordering for a sprint board",
    long_about = None
)]
struct Cli {
    /// Enable verbose logging.
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Emit JSON output instead of human-readable text.
    #[arg(long, global = true)]
    json: bool,

    /// Output format (overrides --json and SPRINTBOARD_FORMAT).
    #[arg(long, value_enum, global = true)]
    format: Option<OutputMode>,

    /// Board config file (default: .sprintboard/config.toml, then the user config).
    #[arg(long, value_name = "FILE", global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

impl Cli {
    fn output_mode(&self) -> OutputMode {
        output::resolve_output_mode(self.format, self.json)
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    #[command(
        next_help_heading = "Labels",
        about = "Decode release labels",
        long_about = "Decode release labels into state, product and version. With --resolve, \
                      treat the labels as one card's set and report which duplicates would be removed.",
        after_help = "EXAMPLES:\n    # Decode a label in the default product\n    sb decode committed-3.1\n\n    # Resolve a card's labels\n    sb decode committed-3.1 proposed-3.1 targeted-web-3.2 --resolve\n\n    # Emit machine-readable output\n    sb decode committed-3.1 --json"
    )]
    Decode(cmd::decode::DecodeArgs),

    #[command(
        next_help_heading = "Read",
        about = "Classify a board snapshot",
        long_about = "Run the configured status queries over a board snapshot and list the \
                      matching items per query.",
        after_help = "EXAMPLES:\n    # Classify every configured query\n    sb classify --board board.json\n\n    # Only one query, or its complement\n    sb classify --board board.json --query approved\n    sb classify --board board.json --query not_approved --json"
    )]
    Classify(cmd::classify::ClassifyArgs),

    #[command(
        next_help_heading = "Ordering",
        about = "Preview the moves that sort a column",
        long_about = "Show the duplicate labels that would be stripped and the minimal set of \
                      moves that puts a column in release order. Nothing is written.",
        after_help = "EXAMPLES:\n    # Preview a column\n    sb plan --board board.json --column Next\n\n    # Emit machine-readable output\n    sb plan --board board.json --column Next --json"
    )]
    Plan(cmd::plan::PlanArgs),

    #[command(
        next_help_heading = "Ordering",
        about = "Clean up and sort a column",
        long_about = "Strip duplicate release labels, then move the fewest items needed to put \
                      a column in release order. The snapshot is rewritten in place unless \
                      --output is given.",
        after_help = "EXAMPLES:\n    # Sort a column in place\n    sb sort --board board.json --column Next\n\n    # Write the result elsewhere\n    sb sort --board board.json --column Next --output sorted.json"
    )]
    Sort(cmd::sort::SortArgs),

    #[command(
        next_help_heading = "Shell",
        about = "Generate shell completion scripts",
        after_help = "EXAMPLES:\n    # Bash\n    sb completions bash > ~/.local/share/bash-completion/completions/sb"
    )]
    Completions(cmd::completions::CompletionsArgs),
}

fn init_tracing(verbose: bool) {
    let filter = EnvFilter::try_from_env("SPRINTBOARD_LOG").unwrap_or_else(|_| {
        EnvFilter::new(if verbose || env::var("DEBUG").is_ok() {
            "sprintboard=debug,info"
        } else {
            "sprintboard=info,warn"
        })
    });

    let format = env::var("SPRINTBOARD_LOG_FORMAT").unwrap_or_else(|_| "compact".to_string());

    let registry = tracing_subscriber::registry().with(filter);

    match format.as_str() {
        "json" => {
            registry
                .with(fmt::layer().json().with_ansi(false).with_writer(std::io::stderr))
                .init();
        }
        _ => {
            registry
                .with(fmt::layer().compact().with_writer(std::io::stderr))
                .init();
        }
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if cli.verbose {
        info!("Verbose mode enabled");
    }

    if let Commands::Completions(ref args) = cli.command {
        return cmd::completions::run_completions(args.shell, &mut Cli::command());
    }

    let project_root = env::current_dir()?;
    let output = cli.output_mode();
    let config = cmd::load_config(cli.config.as_deref(), &project_root).inspect_err(|e| {
        let code = e
            .chain()
            .find_map(|cause| cause.downcast_ref::<SprintError>())
            .map_or(ErrorCode::ConfigParseError, SprintError::error_code);
        let err = output::CliError::with_details(
            format!("{e:#}"),
            code.hint().unwrap_or_default(),
            code.code(),
        );
        if let Err(render_err) = output::render_error(output, &err) {
            tracing::warn!(error = %render_err, "failed to render error");
        }
    })?;

    match cli.command {
        Commands::Decode(ref args) => cmd::decode::run_decode(args, &config, output),
        Commands::Classify(ref args) => cmd::classify::run_classify(args, &config, output),
        Commands::Plan(ref args) => cmd::plan::run_plan(args, &config, output),
        Commands::Sort(ref args) => cmd::sort::run_sort(args, &config, output),
        Commands::Completions(_) => Ok(()),
    }
}
