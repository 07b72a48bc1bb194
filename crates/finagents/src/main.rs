use std::path::PathBuf;

use anyhow::{bail, Result};
use clap::{Parser, Subcommand, ValueEnum};
use finagents::config::{
    load_config, render, resolve_config_path, validate, ConfigError, OutputFormat,
};
use finagents::models::{LogLevel, PipelineConfig};
use tracing::level_filters::LevelFilter;

#[derive(Parser, Debug)]
#[command(
    name = "finagents",
    about = "Validate and inspect the finance agents pipeline configuration"
)]
struct Cli {
    /// Path to configuration file (defaults to $FINAGENTS_CONFIG, then config.yaml)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Load and validate the configuration
    Check,
    /// Print the resolved configuration with defaults filled in
    Show {
        #[arg(short, long, value_enum, default_value_t = Format::Yaml)]
        format: Format,
    },
    /// Print the value at a dotted key path, e.g. agents.defaults.timeout_seconds
    Get { key: String },
    /// Print effective per-agent settings
    Agents {
        /// Emit JSON instead of a table
        #[arg(long)]
        json: bool,
    },
    /// Write a default configuration file
    Init {
        #[arg(short, long, default_value = "config.yaml")]
        output: PathBuf,
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum Format {
    Yaml,
    Json,
    Toml,
}

impl From<Format> for OutputFormat {
    fn from(format: Format) -> Self {
        match format {
            Format::Yaml => OutputFormat::Yaml,
            Format::Json => OutputFormat::Json,
            Format::Toml => OutputFormat::Toml,
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    if matches!(cli.command, Command::Init { .. }) {
        finagents::init_tracing(LogLevel::Info);
        return run(cli.command, &PipelineConfig::default());
    }

    let path = resolve_config_path(cli.config.as_deref());
    // `check` prints validation warnings itself.
    let bootstrap_level = match cli.command {
        Command::Check => LevelFilter::ERROR,
        _ => LevelFilter::WARN,
    };
    let loaded = tracing::subscriber::with_default(
        finagents::bootstrap_subscriber(bootstrap_level),
        || load_config(&path),
    );

    let config = match loaded {
        Ok(config) => config,
        Err(ConfigError::Invalid(issues)) if matches!(cli.command, Command::Check) => {
            for issue in &issues {
                eprintln!("error: {issue}");
            }
            bail!("{}: {} invalid setting(s)", path.display(), issues.len());
        }
        Err(e) => {
            return Err(anyhow::Error::new(e)
                .context(format!("Failed to load config: {}", path.display())))
        }
    };

    finagents::init_tracing(config.system.logging_level);
    tracing::debug!(path = %path.display(), "Configuration ready");

    run(cli.command, &config)
}

fn run(command: Command, config: &PipelineConfig) -> Result<()> {
    match command {
        Command::Check => {
            for issue in validate(config) {
                println!("{}: {issue}", issue.severity);
            }
            println!("ok");
        }
        Command::Show { format } => {
            let rendered = render(config, format.into())?;
            print!("{rendered}");
            if !rendered.ends_with('\n') {
                println!();
            }
        }
        Command::Get { key } => {
            let value = finagents::get_value(config, &key)?;
            match value {
                serde_json::Value::String(s) => println!("{s}"),
                other => println!("{}", serde_json::to_string_pretty(&other)?),
            }
        }
        Command::Agents { json } => {
            let rows = finagents::agent_table(config);
            if json {
                println!("{}", serde_json::to_string_pretty(&rows)?);
            } else {
                print!("{}", finagents::format_agent_table(&rows));
            }
        }
        Command::Init { output, force } => finagents::write_default_config(&output, force)?,
    }
    Ok(())
}
