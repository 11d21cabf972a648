//! # Abstract Command Implementation
//!
//! This module implements the `abstract` subcommand, which collapses a
//! group of files that differ only in frame number or stereo eye into a
//! single representative path with placeholder tokens (`%04d`, `%V`).
//!
//! The command scans the filesystem to confirm such files exist; with
//! nothing on disk there is nothing to abstract over, and the command
//! fails with a message instead of inventing a path.

use std::path::Path;

use anyhow::Result;
use clap::Args;

use crate::commands;

/// Produce the abstract path standing for a group of files
#[derive(Args, Debug)]
pub struct AbstractArgs {
    /// Name of the template to abstract.
    pub template: String,

    /// Field assignments as name=value (repeatable). Abstract keys left
    /// unassigned render as placeholders.
    #[arg(short = 'f', long = "field", value_name = "NAME=VALUE")]
    pub fields: Vec<String>,
}

pub fn execute(args: AbstractArgs, config_path: &Path) -> Result<()> {
    let project = commands::load_project(config_path)?;
    let template = commands::lookup_template(&project, &args.template)?;
    let fields = commands::parse_fields(template, &args.fields)?;
    let template = commands::require_path_template(template)?;

    match project.abstract_path_from_template(template, &fields)? {
        Some(path) => {
            println!("{}", path.display());
            Ok(())
        }
        None => anyhow::bail!(
            "No files on disk match template '{}' with the given fields",
            args.template
        ),
    }
}
