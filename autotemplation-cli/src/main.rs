//! Autotemplation CLI - fill document templates
//!
//! A command-line interface for rendering `.docx` templates.

#![allow(clippy::print_stdout)] // CLI program intentionally uses stdout

use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;

use autotemplation::prelude::*;
use autotemplation_cli::config::{
    Config, IssueLevel, init_config, load_config, local_config_path, resolve_config_path,
};
use autotemplation_cli::error::{CliError, Result};
use clap::{Args, Parser, Subcommand};
use tracing::Level;
use tracing_subscriber::EnvFilter;

const SAMPLE_TEMPLATE: &str = "Report_{{ CLIENT }}_{{ DATE_FULL_NUM }}";

/// Autotemplation - fill `.docx` templates from prompts, dates and a lookup sheet
#[derive(Debug, Parser)]
#[command(name = "autotemplation")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Verbosity level (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Configuration file path
    #[arg(short, long, env = "AUTOTEMPLATION_CONFIG", global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Render a template and publish or export the result
    Render(RenderArgs),

    /// List the placeholders of a template
    Scan(ScanArgs),

    /// Create a configuration file and template folder
    Init(InitArgs),

    /// Manage configuration
    Config(ConfigArgs),
}

/// Arguments for the render command
#[derive(Debug, Args)]
struct RenderArgs {
    /// Write the document's table to a local CSV instead of publishing
    #[arg(long)]
    csv: bool,

    /// Document date as YYYYMMDD (prompted for when omitted)
    #[arg(short, long)]
    date: Option<String>,

    /// Lookup sheet (overrides config; prompted for when needed and unset)
    #[arg(short, long)]
    lookup: Option<PathBuf>,

    /// Template name (skips the selection menu)
    #[arg(short, long)]
    template: Option<String>,
}

/// Arguments for the scan command
#[derive(Debug, Args)]
struct ScanArgs {
    /// Template name (skips the selection menu)
    #[arg(short, long)]
    template: Option<String>,

    /// Print the report as JSON
    #[arg(long)]
    json: bool,
}

/// Arguments for the init command
#[derive(Debug, Args)]
struct InitArgs {
    /// Force overwrite existing configuration
    #[arg(short, long)]
    force: bool,

    /// Also write a sample template
    #[arg(long)]
    sample: bool,
}

/// Arguments for the config command
#[derive(Debug, Args)]
struct ConfigArgs {
    #[command(subcommand)]
    command: ConfigCommands,
}

#[derive(Debug, Subcommand)]
enum ConfigCommands {
    /// Show current configuration
    Show,
    /// Show configuration file path
    Path,
    /// Validate configuration
    Validate,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    init_logging(cli.verbose);

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) if e.is_aborted() => {
            println!("Exiting.");
            ExitCode::SUCCESS
        }
        Err(e) => {
            tracing::error!("{e}");
            ExitCode::FAILURE
        }
    }
}

/// Initialize logging with the given verbosity level.
fn init_logging(verbosity: u8) {
    let level = match verbosity {
        0 => Level::INFO,
        1 => Level::DEBUG,
        _ => Level::TRACE,
    };

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!(
            "autotemplation={level},autotemplation_cli={level},{}",
            if verbosity >= 2 { "debug" } else { "warn" }
        ))
    });

    // Prompts and reports go to stdout; keep logs out of the way.
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(verbosity >= 2)
        .with_writer(std::io::stderr)
        .init();
}

fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Render(args) => cmd_render(args, cli.config),
        Commands::Scan(args) => cmd_scan(&args, cli.config),
        Commands::Init(args) => cmd_init(&args, cli.config),
        Commands::Config(args) => cmd_config(&args, cli.config),
    }
}

/// Load the configuration, log its issues, and refuse to run on errors.
fn load_checked_config(config_path: Option<PathBuf>) -> Result<Config> {
    let config = load_config(config_path)?;
    let issues = config.validate();
    for issue in &issues {
        match issue.level {
            IssueLevel::Error => tracing::error!("{issue}"),
            IssueLevel::Warning => tracing::warn!("{issue}"),
        }
    }
    if !config.is_valid() {
        return Err(CliError::config(format!(
            "{} error(s); run 'autotemplation config validate'",
            issues
                .iter()
                .filter(|i| i.level == IssueLevel::Error)
                .count()
        )));
    }
    Ok(config)
}

/// Render a template.
fn cmd_render(args: RenderArgs, config_path: Option<PathBuf>) -> Result<()> {
    let config = load_checked_config(config_path)?;

    let mut lookup: Box<dyn LookupSource> = match args.lookup.or_else(|| config.lookup.clone()) {
        Some(path) => Box::new(FileLookupSource::new(path)),
        None => Box::new(InteractiveLookupSource),
    };
    let options = RunOptions {
        template: args.template,
        date: args.date,
        csv: args.csv,
    };

    let mut generator = Generator::new(config.store(), ConsolePrompter::stdio(), config.settings());
    let outcome = generator.generate(lookup.as_mut(), &options)?;

    println!("Saved {}", outcome.document.display());
    match &outcome.delivery {
        Delivery::Published { folder, .. } => {
            println!("{} placed in folder {folder}.", outcome.name);
        }
        Delivery::Exported { csv } => {
            println!("{} exported to {}.", outcome.name, csv.display());
        }
    }
    for id in &outcome.unresolved {
        println!("Unresolved lookup: {id}");
    }

    Ok(())
}

/// List a template's placeholders.
fn cmd_scan(args: &ScanArgs, config_path: Option<PathBuf>) -> Result<()> {
    let config = load_checked_config(config_path)?;
    let mut generator = Generator::new(config.store(), ConsolePrompter::stdio(), config.settings());
    let report = generator.scan(args.template.as_deref())?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    println!("{}", report.template);
    if report.identifiers.is_empty() {
        println!("  (no placeholders)");
    }
    for ident in &report.identifiers {
        println!("  {:<8}  {}", ident.class.as_str(), ident.name);
    }
    Ok(())
}

/// Initialize configuration.
fn cmd_init(args: &InitArgs, config_path: Option<PathBuf>) -> Result<()> {
    let config_file = config_path.unwrap_or_else(local_config_path);

    if config_file.exists() && !args.force {
        println!("Configuration already exists at: {}", config_file.display());
        println!("Use --force to overwrite.");
        return Ok(());
    }

    let config = init_config(&config_file, args.force)?;
    println!("Configuration created: {}", config_file.display());

    let templates_dir = config
        .template_folders
        .first()
        .map(|folder| config.store_root.join(folder))
        .ok_or_else(|| CliError::config("no template folder configured"))?;

    if args.sample {
        let path = templates_dir.join(format!("{SAMPLE_TEMPLATE}.docx"));
        fs::write(&path, write_model(&sample_template())?)?;
        println!("Sample template created: {}", path.display());
    }

    println!();
    println!("Next steps:");
    println!("  1. put .docx templates in {}", templates_dir.display());
    println!("  2. autotemplation scan");
    println!("  3. autotemplation render");

    Ok(())
}

fn sample_template() -> DocumentModel {
    DocumentModel::new(SAMPLE_TEMPLATE)
        .with_paragraph("{{ DATE_FULL }}")
        .with_paragraph(
            "Prepared for {{ CLIENT }} on {{ DATE_DAY_FULL }} the \
             {{ DATE_DAY_NUM }}{{ DATE_DAY_SUFFIX }}.",
        )
        .with_paragraph("Account status: {{ status__acme }}")
        .with_table(vec![
            vec!["Item".into(), "Owner".into()],
            vec!["{{ ITEM }}".into(), "{{ owner__acme }}".into()],
        ])
}

/// Manage configuration.
fn cmd_config(args: &ConfigArgs, config_path: Option<PathBuf>) -> Result<()> {
    let config_file = resolve_config_path(config_path);

    match args.command {
        ConfigCommands::Path => {
            println!("{}", config_file.display());
        }
        ConfigCommands::Show => {
            if config_file.exists() {
                println!("{}", fs::read_to_string(&config_file)?);
            } else {
                println!("Configuration file does not exist; defaults apply.");
                println!("Run 'autotemplation init' to create one.");
            }
        }
        ConfigCommands::Validate => {
            let config = load_config(Some(config_file).filter(|p| p.exists()))?;
            let issues = config.validate();
            for issue in &issues {
                println!("{issue}");
            }
            if !config.is_valid() {
                return Err(CliError::config("configuration has errors"));
            }
            if issues.is_empty() {
                println!("Configuration is valid");
            }
        }
    }

    Ok(())
}
