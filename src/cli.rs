//! CLI argument parsing and command dispatch

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};

use shotpath::defaults::DEFAULT_CONFIG_FILENAME;
use shotpath::output::OutputConfig;

use crate::commands;

/// Shotpath - Template-driven path resolution for VFX pipelines
#[derive(Parser, Debug)]
#[command(name = "shotpath")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    command: Commands,

    /// Path to the studio configuration file.
    #[arg(
        short,
        long,
        global = true,
        value_name = "FILE",
        env = "SHOTPATH_CONFIG",
        default_value = DEFAULT_CONFIG_FILENAME
    )]
    config: PathBuf,

    /// Colorize output (always, never, auto)
    #[arg(long, global = true, value_name = "WHEN", default_value = "auto")]
    color: String,

    /// Set log level (error, warn, info, debug, trace)
    #[arg(long, global = true, value_name = "LEVEL", default_value = "warn")]
    log_level: String,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// List the templates in the registry
    Templates(commands::templates::TemplatesArgs),
    /// Resolve a concrete path or name back into a template and fields
    Fields(commands::fields::FieldsArgs),
    /// Render a template into a concrete path or name
    Resolve(commands::resolve::ResolveArgs),
    /// Enumerate paths on disk matching a template
    Paths(commands::paths::PathsArgs),
    /// Produce the abstract path standing for a group of files
    Abstract(commands::abstract_path::AbstractArgs),
    /// Validate the studio configuration file
    Validate(commands::validate::ValidateArgs),
    /// Generate shell completion scripts
    Completions(commands::completions::CompletionsArgs),
}

impl Cli {
    /// Execute the CLI command
    pub fn execute(self) -> Result<()> {
        env_logger::Builder::from_env(
            env_logger::Env::default().default_filter_or(&self.log_level),
        )
        .init();
        OutputConfig::from_env_and_flag(&self.color).apply();

        match self.command {
            Commands::Templates(args) => commands::templates::execute(args, &self.config),
            Commands::Fields(args) => commands::fields::execute(args, &self.config),
            Commands::Resolve(args) => commands::resolve::execute(args, &self.config),
            Commands::Paths(args) => commands::paths::execute(args, &self.config),
            Commands::Abstract(args) => commands::abstract_path::execute(args, &self.config),
            Commands::Validate(args) => commands::validate::execute(args, &self.config),
            Commands::Completions(args) => commands::completions::execute(args),
        }
    }
}
