//! # Fields Command Implementation
//!
//! This module implements the `fields` subcommand, the reverse direction
//! of the engine: given a concrete path (or resolved name), find the
//! template it was rendered from and print the recovered field values.
//!
//! A path that no template manages exits with an error message rather
//! than a stack of matches; that outcome is common and deliberate.

use std::path::Path;

use anyhow::Result;
use clap::Args;
use console::style;

use crate::commands::{self, field_value_json};

/// Resolve a concrete path or name back into a template and fields
#[derive(Args, Debug)]
pub struct FieldsArgs {
    /// The path or name to resolve.
    pub path: String,

    /// Emit the result as JSON.
    #[arg(long)]
    pub json: bool,
}

pub fn execute(args: FieldsArgs, config_path: &Path) -> Result<()> {
    let project = commands::load_project(config_path)?;

    let Some((template, fields)) = project.fields_from_path(&args.path) else {
        anyhow::bail!("Path is not managed by any template: {}", args.path);
    };

    if args.json {
        let values: serde_json::Map<String, serde_json::Value> = fields
            .iter()
            .map(|(name, value)| (name.clone(), field_value_json(value)))
            .collect();
        let result = serde_json::json!({
            "template": template.name(),
            "fields": values,
        });
        println!("{}", serde_json::to_string_pretty(&result)?);
        return Ok(());
    }

    println!("{}", style(template.name()).cyan().bold());
    for (name, value) in &fields {
        println!("  {} = {}", name, value);
    }
    Ok(())
}
