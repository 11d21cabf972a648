//! # Shotpath Library
//!
//! This library implements template-driven path resolution for VFX and
//! animation pipelines. Declarative path templates map between structured
//! "fields" (named, typed values such as Shot, Sequence, version, frame)
//! and concrete filesystem paths, in both directions. It is designed to
//! be used by the `shotpath` command-line tool but can also be embedded
//! in pipeline applications directly.
//!
//! ## Quick Example
//!
//! ```
//! use shotpath::key::{FieldValue, Fields};
//! use shotpath::project::Project;
//!
//! let config = r#"
//! roots:
//!   primary: { linux: /mnt/projects, mac: /mnt/projects, windows: /mnt/projects }
//! keys:
//!   Shot: { type: str }
//!   version: { type: int, format_spec: "03" }
//! paths:
//!   maya_shot_work: "shots/{Shot}/work/scene.v{version}.ma"
//! "#;
//!
//! let project = Project::from_yaml(config).unwrap();
//! let template = project.template("maya_shot_work").unwrap().as_path().unwrap();
//!
//! // Fields to path.
//! let mut fields = Fields::new();
//! fields.insert("Shot".to_string(), FieldValue::from("shot_010"));
//! fields.insert("version".to_string(), FieldValue::from(4));
//! let path = template.apply_fields(&fields).unwrap();
//! assert!(path.ends_with("scene.v004.ma"));
//!
//! // And back again.
//! let recovered = template.get_fields(&path).unwrap();
//! assert_eq!(recovered, fields);
//! ```
//!
//! ## Core Concepts
//!
//! - **Keys (`key`)**: typed, named field definitions (string, integer,
//!   frame sequence) with per-key validation, defaults, choices, and
//!   zero-padded rendering rules.
//! - **Templates (`template`, `parser`)**: named, reversible patterns
//!   built from `{key}` placeholders and literal text. `TemplatePath`
//!   produces filesystem paths under a storage root; `TemplateString`
//!   produces flat names such as publish labels.
//! - **Roots (`roots`)**: named, per-platform storage prefixes; a path is
//!   resolved against the primary root first, then the alternates.
//! - **Project (`project`)**: the session handle owning the key set, the
//!   template registry and the root resolver, built once from the studio
//!   configuration (`config`).
//! - **Enumeration (`scan`)**: widening partially-specified fields into
//!   filesystem globs, with every hit re-validated through the template.
//!
//! A path that is not managed by any template is an expected outcome and
//! is reported as `None`/empty rather than as an error; see `error` for
//! the full taxonomy.

pub mod config;
pub mod defaults;
pub mod error;
pub mod key;
pub mod output;
pub mod parser;
pub mod project;
pub mod roots;
pub mod scan;
pub mod suggestions;
pub mod template;

#[cfg(test)]
mod template_proptest;
