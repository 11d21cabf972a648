//! # Templates Command Implementation
//!
//! This module implements the `templates` subcommand, which lists every
//! template in the registry with its definition, shape and storage root.
//! With `--keys` the listing expands to show each template's keys and
//! their types; with `--json` the listing is emitted as JSON for
//! scripting.
//!
//! This command is a safe, read-only operation that does not touch the
//! filesystem beyond reading the configuration.

use std::path::Path;

use anyhow::Result;
use clap::Args;
use console::style;

use shotpath::template::Template;

use crate::commands::{self, field_value_json};

/// List the templates in the registry
#[derive(Args, Debug)]
pub struct TemplatesArgs {
    /// Show the keys used by each template.
    #[arg(short, long)]
    pub keys: bool,

    /// Emit the listing as JSON.
    #[arg(long)]
    pub json: bool,
}

pub fn execute(args: TemplatesArgs, config_path: &Path) -> Result<()> {
    let project = commands::load_project(config_path)?;

    if args.json {
        let listing: Vec<serde_json::Value> = project.templates().map(template_json).collect();
        println!("{}", serde_json::to_string_pretty(&listing)?);
        return Ok(());
    }

    for template in project.templates() {
        match template {
            Template::Path(t) => println!(
                "{}  {}  (path, root: {})",
                style(t.name()).cyan().bold(),
                t.definition(),
                t.root_name()
            ),
            Template::Str(t) => println!(
                "{}  {}  (string)",
                style(t.name()).cyan().bold(),
                t.definition()
            ),
        }
        if args.keys {
            for (name, key) in template.keys() {
                let mut annotations = vec![key.kind().label().to_string()];
                if let Some(default) = key.default() {
                    annotations.push(format!("default: {}", default));
                }
                if !key.choices().is_empty() {
                    annotations.push(format!("choices: {}", key.choices().join("|")));
                }
                if key.is_optional() {
                    annotations.push("optional".to_string());
                }
                println!("    {} ({})", name, annotations.join(", "));
            }
        }
    }
    Ok(())
}

fn template_json(template: &Template) -> serde_json::Value {
    let keys: serde_json::Map<String, serde_json::Value> = template
        .keys()
        .iter()
        .map(|(name, key)| {
            let mut entry = serde_json::Map::new();
            entry.insert(
                "type".to_string(),
                serde_json::Value::from(key.kind().label()),
            );
            if let Some(default) = key.default() {
                entry.insert("default".to_string(), field_value_json(default));
            }
            if !key.choices().is_empty() {
                entry.insert("choices".to_string(), serde_json::Value::from(key.choices()));
            }
            (name.clone(), serde_json::Value::Object(entry))
        })
        .collect();

    match template {
        Template::Path(t) => serde_json::json!({
            "name": t.name(),
            "kind": "path",
            "definition": t.definition(),
            "root": t.root_name(),
            "keys": keys,
        }),
        Template::Str(t) => serde_json::json!({
            "name": t.name(),
            "kind": "string",
            "definition": t.definition(),
            "keys": keys,
        }),
    }
}
