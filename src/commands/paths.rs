//! # Paths Command Implementation
//!
//! This module implements the `paths` subcommand, which enumerates the
//! files on disk matching a template. Keys named with `--skip` (and keys
//! left out of the `-f` assignments) are widened to wildcards, so a
//! single invocation can sweep across versions, shots or frames.
//!
//! Every glob hit is re-validated through the template before being
//! printed; files that merely resemble the pattern are not reported.

use std::path::Path;

use anyhow::Result;
use clap::Args;

use crate::commands;

/// Enumerate paths on disk matching a template
#[derive(Args, Debug)]
pub struct PathsArgs {
    /// Name of the template to scan with.
    pub template: String,

    /// Field assignments as name=value (repeatable).
    #[arg(short = 'f', long = "field", value_name = "NAME=VALUE")]
    pub fields: Vec<String>,

    /// Keys to widen to wildcards (repeatable).
    #[arg(short = 's', long = "skip", value_name = "KEY")]
    pub skip: Vec<String>,

    /// Print only the number of matching paths.
    #[arg(long)]
    pub count: bool,
}

pub fn execute(args: PathsArgs, config_path: &Path) -> Result<()> {
    let project = commands::load_project(config_path)?;
    let template = commands::lookup_template(&project, &args.template)?;
    let fields = commands::parse_fields(template, &args.fields)?;
    let template = commands::require_path_template(template)?;
    let skip = commands::check_skip_keys(template, &args.skip)?;

    let paths = project.paths_from_template(template, &fields, &skip)?;
    if args.count {
        println!("{}", paths.len());
    } else {
        for path in &paths {
            println!("{}", path.display());
        }
    }
    Ok(())
}
