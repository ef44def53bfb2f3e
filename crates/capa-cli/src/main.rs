#![forbid(unsafe_code)]

mod cmd;
mod output;

use capa_core::config::resolve_config;
use capa_core::error::ErrorCode;
use clap::{CommandFactory, Parser, Subcommand};
use output::{CliError, OutputMode};
use std::env;
use tracing::info;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "capa: corrective-action case reports",
    long_about = None
)]
struct Cli {
    /// Enable verbose logging.
    #[arg(short, long)]
    verbose: bool,

    /// Output format.
    #[arg(long, global = true, value_enum)]
    format: Option<OutputMode>,

    /// Shorthand for `--format json`.
    #[arg(long, global = true, hide = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    #[command(
        next_help_heading = "Setup",
        about = "Write a template case file",
        long_about = "Write a commented template case file to start a new report from.",
        after_help = "EXAMPLES:\n    # Create case.toml in the current directory\n    capa init\n\n    # Pick a name, overwriting an old draft\n    capa init ncr-0815.toml --force"
    )]
    Init(cmd::init::InitArgs),

    #[command(
        next_help_heading = "Read",
        about = "List Fishbone cause categories",
        long_about = "List the cause category groups and their sub-categories.",
        after_help = "EXAMPLES:\n    # Show the taxonomy\n    capa taxonomy\n\n    # Emit machine-readable output\n    capa taxonomy --format json"
    )]
    Taxonomy,

    #[command(
        next_help_heading = "Read",
        about = "Show root-cause options and references",
        long_about = "Show Fishbone root options, identified root causes, and action items whose reference no longer matches.",
        after_help = "EXAMPLES:\n    # Check a case before rendering\n    capa roots case.toml\n\n    # Emit machine-readable output\n    capa roots case.toml --json"
    )]
    Roots(cmd::roots::RootsArgs),

    #[command(
        next_help_heading = "Report",
        about = "Render the paginated report layout",
        long_about = "Render the case report into pages and write <name>.layout.json.",
        after_help = "EXAMPLES:\n    # Render into the configured output directory\n    capa render case.toml\n\n    # Render elsewhere and print every page\n    capa render case.toml --out-dir out --preview"
    )]
    Render(cmd::render::RenderArgs),

    #[command(
        next_help_heading = "Report",
        about = "Export the case workbook as CSV",
        long_about = "Export the case as a workbook directory holding one CSV file per sheet.",
        after_help = "EXAMPLES:\n    # Export into the configured output directory\n    capa export case.toml\n\n    # Export elsewhere\n    capa export case.toml --out-dir out"
    )]
    Export(cmd::export::ExportArgs),

    #[command(
        next_help_heading = "Setup",
        about = "Generate shell completions",
        after_help = "EXAMPLES:\n    capa completions bash > ~/.local/share/bash-completion/completions/capa"
    )]
    Completions(cmd::completions::CompletionsArgs),
}

fn init_tracing() {
    let filter = EnvFilter::try_from_env("CAPA_LOG").unwrap_or_else(|_| {
        EnvFilter::new(if env::var("DEBUG").is_ok() {
            "capa=debug,info"
        } else {
            "capa=info,warn"
        })
    });

    let format = env::var("CAPA_LOG_FORMAT").unwrap_or_else(|_| "compact".to_string());

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
    init_tracing();

    let cli = Cli::parse();

    if cli.verbose {
        info!("Verbose mode enabled");
    }

    let project_root = env::current_dir()?;
    let config = match resolve_config(&project_root, cli.json) {
        Ok(config) => config,
        Err(e) => {
            let code = ErrorCode::ConfigParseError;
            let mode = output::resolve_output_mode(cli.format, cli.json, "text");
            output::render_error(
                mode,
                &CliError::with_details(
                    format!("{e:#}"),
                    code.hint().unwrap_or_default(),
                    code.code(),
                ),
            )?;
            return Err(e);
        }
    };
    let output = output::resolve_output_mode(cli.format, cli.json, &config.resolved_output);
    let project = &config.project;

    match cli.command {
        Commands::Init(ref args) => cmd::init::run_init(args, output, &project_root),
        Commands::Taxonomy => cmd::taxonomy::run_taxonomy(output),
        Commands::Roots(ref args) => cmd::roots::run_roots(args, output, &project_root),
        Commands::Render(ref args) => {
            cmd::render::run_render(args, output, &project_root, project)
        }
        Commands::Export(ref args) => {
            cmd::export::run_export(args, output, &project_root, project)
        }
        Commands::Completions(args) => {
            let mut command = Cli::command();
            cmd::completions::run_completions(args.shell, &mut command)
        }
    }
}
