//! Command implementations for the shotpath CLI, plus the small helpers
//! they share: loading the project from the configuration file, parsing
//! `name=value` field assignments, and template lookup with suggestions.

pub mod abstract_path;
pub mod completions;
pub mod fields;
pub mod paths;
pub mod resolve;
pub mod templates;
pub mod validate;

use std::path::Path;

use anyhow::Result;

use shotpath::key::{FieldValue, Fields};
use shotpath::project::Project;
use shotpath::suggestions;
use shotpath::template::{Template, TemplatePath};

/// Load the project from the configuration file, with a hint-carrying
/// error when the file does not exist.
pub(crate) fn load_project(config_path: &Path) -> Result<Project> {
    if !config_path.exists() {
        return Err(suggestions::config_not_found(config_path));
    }
    Ok(Project::load(config_path)?)
}

/// Look up a template by name, suggesting a close match on a miss.
pub(crate) fn lookup_template<'a>(project: &'a Project, name: &str) -> Result<&'a Template> {
    project.template(name).ok_or_else(|| {
        let candidates: Vec<&str> = project.template_names().collect();
        suggestions::unknown_template(name, &candidates)
    })
}

/// Commands that scan the filesystem need a path template.
pub(crate) fn require_path_template(template: &Template) -> Result<&TemplatePath> {
    template.as_path().ok_or_else(|| {
        anyhow::anyhow!(
            "Template '{}' is a string template; this command needs a path template",
            template.name()
        )
    })
}

/// Parse `-f name=value` assignments against a template's key set.
pub(crate) fn parse_fields(template: &Template, raw: &[String]) -> Result<Fields> {
    let mut fields = Fields::new();
    for assignment in raw {
        let Some((name, value)) = assignment.split_once('=') else {
            return Err(suggestions::invalid_field_assignment(assignment));
        };
        if !template.keys().contains_key(name) {
            let candidates: Vec<&str> = template.keys().keys().map(String::as_str).collect();
            return Err(suggestions::unknown_key(template.name(), name, &candidates));
        }
        fields.insert(name.to_string(), FieldValue::infer(value));
    }
    Ok(fields)
}

/// Validate `--skip` key names against a template's key set.
pub(crate) fn check_skip_keys<'a>(
    template: &TemplatePath,
    skip: &'a [String],
) -> Result<Vec<&'a str>> {
    for name in skip {
        if !template.keys().contains_key(name) {
            let candidates: Vec<&str> = template.keys().keys().map(String::as_str).collect();
            return Err(suggestions::unknown_key(template.name(), name, &candidates));
        }
    }
    Ok(skip.iter().map(String::as_str).collect())
}

/// Render a field value as JSON, keeping integers numeric.
pub(crate) fn field_value_json(value: &FieldValue) -> serde_json::Value {
    match value {
        FieldValue::Int(n) => serde_json::Value::from(*n),
        other => serde_json::Value::from(other.to_string()),
    }
}
