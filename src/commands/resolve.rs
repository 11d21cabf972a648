//! # Resolve Command Implementation
//!
//! This module implements the `resolve` subcommand, the forward direction
//! of the engine: render a named template with a set of `-f name=value`
//! field assignments into a concrete path (or name, for string
//! templates).

use std::path::Path;

use anyhow::Result;
use clap::Args;

use shotpath::template::Template;

use crate::commands;

/// Render a template into a concrete path or name
#[derive(Args, Debug)]
pub struct ResolveArgs {
    /// Name of the template to render.
    pub template: String,

    /// Field assignments as name=value (repeatable).
    #[arg(short = 'f', long = "field", value_name = "NAME=VALUE")]
    pub fields: Vec<String>,
}

pub fn execute(args: ResolveArgs, config_path: &Path) -> Result<()> {
    let project = commands::load_project(config_path)?;
    let template = commands::lookup_template(&project, &args.template)?;
    let fields = commands::parse_fields(template, &args.fields)?;

    match template {
        Template::Path(t) => println!("{}", t.apply_fields(&fields)?.display()),
        Template::Str(t) => println!("{}", t.apply_fields(&fields)?),
    }
    Ok(())
}
