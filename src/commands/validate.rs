//! # Validate Command Implementation
//!
//! This module implements the `validate` subcommand, which loads the
//! studio configuration and reports whether every root, key and template
//! definition is well-formed. Definition problems surface here, at load
//! time, exactly as they would when any other command loads the project.
//!
//! Templates anchored to a root with no prefix for the current platform
//! still validate (the configuration may serve other platforms), but are
//! called out as warnings.

use std::path::Path;

use anyhow::Result;
use clap::Args;
use console::style;

use shotpath::template::Template;

use crate::commands;

/// Validate the studio configuration file
#[derive(Args, Debug)]
pub struct ValidateArgs {}

pub fn execute(_args: ValidateArgs, config_path: &Path) -> Result<()> {
    let project = commands::load_project(config_path)?;

    let mut unavailable = Vec::new();
    for template in project.templates() {
        if let Template::Path(t) = template {
            if t.root_path().is_err() {
                unavailable.push((t.name(), t.root_name()));
            }
        }
    }
    for (template, root) in &unavailable {
        println!(
            "{} template '{}' uses root '{}', which has no path on this platform",
            style("warning:").yellow().bold(),
            template,
            root
        );
    }

    println!(
        "{} {} ({} keys, {} templates, {} roots)",
        style("Configuration OK:").green().bold(),
        config_path.display(),
        project.keys().len(),
        project.templates().count(),
        project.roots().names().count()
    );
    Ok(())
}
