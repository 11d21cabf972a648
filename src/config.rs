//! # Configuration Schema and Parsing
//!
//! This module defines the data structures that represent the studio
//! configuration file, as well as the logic for parsing it. The file
//! declares three things: the named storage roots (with one absolute
//! prefix per platform), the typed template keys, and the path/string
//! templates built from those keys.
//!
//! ```yaml
//! roots:
//!   primary: { linux: /mnt/projects, mac: /Volumes/projects }
//! keys:
//!   Shot: { type: str }
//!   version: { type: int, format_spec: "03" }
//!   frame: { type: sequence, format_spec: "04" }
//!   eye: { type: str, default: "%V", choices: ["%V", "L", "R"], abstract: true }
//! paths:
//!   maya_shot_work: "shots/{Shot}/work/scene.v{version}.ma"
//!   shot_render:
//!     definition: "shots/{Shot}/images/{eye}/{Shot}.{version}.{frame}.exr"
//!     root: renders
//! strings:
//!   publish_name: "{name}, v{version}"
//! ```
//!
//! Path template entries accept both a bare definition string (anchored
//! under the `primary` root) and a structured mapping naming another
//! root; the parser accepts either form.
//!
//! Parsing is strict and fails fast: a malformed key or template
//! definition aborts the load with an error naming the offending entry
//! and the rule it violates, rather than being deferred to use time.

use std::collections::BTreeMap;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::key::{self, FieldValue, KeyKind, TemplateKey};
use crate::roots::{Platform, PRIMARY_ROOT};

/// The kind tag of a key definition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum KeyKindSpec {
    Str,
    Int,
    Sequence,
}

/// One key definition from the `keys:` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct KeySpec {
    /// Key kind: `str`, `int`, or `sequence`.
    #[serde(rename = "type")]
    pub kind: KeyKindSpec,
    /// Value substituted when the field is omitted.
    #[serde(default)]
    pub default: Option<serde_yaml::Value>,
    /// Closed set of legal values; empty means unrestricted.
    #[serde(default)]
    pub choices: Vec<serde_yaml::Value>,
    /// Zero-padding width for `int`/`sequence` keys, e.g. `"03"`.
    #[serde(default)]
    pub format_spec: Option<String>,
    /// Pass-through production-tracking metadata.
    #[serde(default)]
    pub shotgun_entity_type: Option<String>,
    /// Pass-through production-tracking metadata.
    #[serde(default)]
    pub shotgun_field_name: Option<String>,
    /// Whether the key may be absent from a path entirely.
    #[serde(default)]
    pub optional: bool,
    /// Whether a non-sequence key is an abstract dimension (stereo eye).
    #[serde(default, rename = "abstract")]
    pub abstract_marker: bool,
}

impl KeySpec {
    /// Build the typed key this spec describes, validating every field.
    pub fn build(&self, name: &str) -> Result<TemplateKey> {
        validate_key_name(name)?;

        let kind = match self.kind {
            KeyKindSpec::Str => {
                if self.format_spec.is_some() {
                    return Err(Error::KeyDefinition {
                        key: name.to_string(),
                        message: "format_spec is only valid for int and sequence keys".to_string(),
                    });
                }
                KeyKind::String
            }
            KeyKindSpec::Int => KeyKind::Integer {
                padding: self
                    .format_spec
                    .as_deref()
                    .map(|spec| key::parse_format_spec(name, spec))
                    .transpose()?,
            },
            KeyKindSpec::Sequence => KeyKind::Sequence {
                padding: match self.format_spec.as_deref() {
                    Some(spec) => key::parse_format_spec(name, spec)?,
                    None => 1,
                },
            },
        };

        let default = self
            .default
            .as_ref()
            .map(|value| scalar_to_field_value(name, value, self.kind))
            .transpose()?;

        let mut choices = Vec::with_capacity(self.choices.len());
        for choice in &self.choices {
            choices.push(scalar_to_string(name, choice)?);
        }

        let mut built = TemplateKey::new(name, kind)
            .with_choices(choices)
            .with_shotgun_mapping(
                self.shotgun_entity_type.clone(),
                self.shotgun_field_name.clone(),
            )
            .with_optional(self.optional)
            .with_abstract(self.abstract_marker);
        if let Some(default) = default {
            built = built.with_default(default);
        }
        Ok(built)
    }
}

/// One path template entry: either a bare definition string or a mapping
/// with an explicit storage root.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PathTemplateSpec {
    /// Shorthand: the definition, anchored under the primary root.
    Definition(String),
    /// Structured form naming the storage root.
    Full {
        definition: String,
        #[serde(default = "default_root_name")]
        root: String,
    },
}

impl PathTemplateSpec {
    /// The definition string and root name, whichever form was used.
    pub fn parts(&self) -> (&str, &str) {
        match self {
            PathTemplateSpec::Definition(definition) => (definition, PRIMARY_ROOT),
            PathTemplateSpec::Full { definition, root } => (definition, root),
        }
    }
}

fn default_root_name() -> String {
    PRIMARY_ROOT.to_string()
}

/// The complete studio configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StudioConfig {
    /// Root name -> platform -> absolute prefix.
    #[serde(default)]
    pub roots: BTreeMap<String, BTreeMap<Platform, PathBuf>>,
    /// Key name -> key definition.
    #[serde(default)]
    pub keys: BTreeMap<String, KeySpec>,
    /// Path template name -> definition.
    #[serde(default)]
    pub paths: BTreeMap<String, PathTemplateSpec>,
    /// String template name -> definition.
    #[serde(default)]
    pub strings: BTreeMap<String, String>,
}

/// Parses a YAML string into a `StudioConfig`.
pub fn parse(yaml_content: &str) -> Result<StudioConfig> {
    let config: StudioConfig =
        serde_yaml::from_str(yaml_content).map_err(|source| Error::ConfigParse {
            message: source.to_string(),
            hint: Some(
                "expected top-level 'roots', 'keys', 'paths' and 'strings' mappings".to_string(),
            ),
        })?;
    Ok(config)
}

/// Key names double as regex capture-group names, so they are restricted
/// to identifier characters.
fn validate_key_name(name: &str) -> Result<()> {
    let mut chars = name.chars();
    let head_ok = chars.next().map(|c| c.is_ascii_alphabetic()).unwrap_or(false);
    if head_ok && chars.all(|c| c.is_ascii_alphanumeric() || c == '_') {
        Ok(())
    } else {
        Err(Error::KeyDefinition {
            key: name.to_string(),
            message: "key names must start with a letter and contain only letters, digits and '_'"
                .to_string(),
        })
    }
}

fn scalar_to_field_value(
    key: &str,
    value: &serde_yaml::Value,
    kind: KeyKindSpec,
) -> Result<FieldValue> {
    match kind {
        KeyKindSpec::Str => match value.as_str() {
            Some(text) => Ok(FieldValue::Str(text.to_string())),
            None => Err(Error::KeyDefinition {
                key: key.to_string(),
                message: "default for a str key must be a string".to_string(),
            }),
        },
        KeyKindSpec::Int | KeyKindSpec::Sequence => match value.as_i64() {
            Some(number) => Ok(FieldValue::Int(number)),
            None => Err(Error::KeyDefinition {
                key: key.to_string(),
                message: "default for an int or sequence key must be an integer".to_string(),
            }),
        },
    }
}

/// Choices compare against the plain (unpadded) string form of a value.
fn scalar_to_string(key: &str, value: &serde_yaml::Value) -> Result<String> {
    if let Some(text) = value.as_str() {
        return Ok(text.to_string());
    }
    if let Some(number) = value.as_i64() {
        return Ok(number.to_string());
    }
    Err(Error::KeyDefinition {
        key: key.to_string(),
        message: "choices must be strings or integers".to_string(),
    })
}
