//! # Template Keys and Field Values
//!
//! This module defines the typed field system that templates are built
//! from. A [`TemplateKey`] is a named, typed field definition (string,
//! integer, or frame-sequence number) that knows how to validate a
//! candidate value, convert between its in-path string form and its
//! in-memory form, and contribute a regex fragment to template matching.
//!
//! Field values are represented by the closed [`FieldValue`] enum rather
//! than loosely-typed containers, so every conversion between a path
//! segment and a value goes through an explicit, per-kind rule.
//!
//! ## Key Kinds
//!
//! - **String**: free text without path separators, optionally restricted
//!   to a closed set of choices (e.g. a stereo eye of `%V`, `L`, `R`).
//! - **Integer**: digits only, rendered with zero-padding when the key
//!   carries a format spec such as `"03"`.
//! - **Sequence**: a frame-sequence number. Accepts concrete integers, the
//!   `*` wildcard, and `FORMAT:<spec>` tokens that render as literal frame
//!   placeholders (`%04d`, `####`) instead of a concrete frame.

use std::fmt;
use std::sync::Arc;

use crate::error::{Error, Result};

/// A typed field value, as carried in a field mapping.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum FieldValue {
    /// Free-form text, e.g. a shot or sequence name.
    Str(String),
    /// An integer, e.g. a version or frame number.
    Int(i64),
    /// A frame-placeholder request, the `<spec>` part of `FORMAT:<spec>`.
    FrameSpec(String),
    /// The wildcard sentinel used when a key is deliberately skipped.
    Any,
}

impl FieldValue {
    /// Interpret a raw string the way a user would type it on the command
    /// line: integers become `Int`, `*` becomes `Any`, `FORMAT:<spec>`
    /// becomes `FrameSpec`, everything else is `Str`.
    pub fn infer(raw: &str) -> FieldValue {
        if raw == "*" {
            return FieldValue::Any;
        }
        if let Some(spec) = raw.strip_prefix("FORMAT:") {
            return FieldValue::FrameSpec(spec.to_string());
        }
        if !raw.is_empty() && raw.bytes().all(|b| b.is_ascii_digit()) {
            if let Ok(n) = raw.parse::<i64>() {
                return FieldValue::Int(n);
            }
        }
        FieldValue::Str(raw.to_string())
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Str(s) => write!(f, "{}", s),
            FieldValue::Int(n) => write!(f, "{}", n),
            FieldValue::FrameSpec(spec) => write!(f, "FORMAT:{}", spec),
            FieldValue::Any => write!(f, "*"),
        }
    }
}

impl From<&str> for FieldValue {
    fn from(s: &str) -> Self {
        FieldValue::Str(s.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(s: String) -> Self {
        FieldValue::Str(s)
    }
}

impl From<i64> for FieldValue {
    fn from(n: i64) -> Self {
        FieldValue::Int(n)
    }
}

impl From<i32> for FieldValue {
    fn from(n: i32) -> Self {
        FieldValue::Int(n as i64)
    }
}

/// A field mapping handed to template operations.
///
/// `BTreeMap` keeps iteration deterministic, which keeps error messages
/// and glob patterns stable across runs.
pub type Fields = std::collections::BTreeMap<String, FieldValue>;

/// A shared handle to a key; one key instance may be referenced by several
/// templates.
pub type KeyRef = Arc<TemplateKey>;

/// The frame-placeholder specs accepted in `FORMAT:<spec>` tokens.
const KNOWN_FRAME_SPECS: &[&str] = &["%d", "#d", "#"];

/// The kind of a template key, with kind-specific formatting data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyKind {
    /// Free text without path separators.
    String,
    /// Digits, optionally zero-padded to a fixed width on write.
    Integer { padding: Option<usize> },
    /// A frame-sequence number, zero-padded to `padding` on write.
    Sequence { padding: usize },
}

impl KeyKind {
    /// Short lowercase label used in CLI listings and error messages.
    pub fn label(&self) -> &'static str {
        match self {
            KeyKind::String => "str",
            KeyKind::Integer { .. } => "int",
            KeyKind::Sequence { .. } => "sequence",
        }
    }
}

/// Parse a zero-padding format spec such as `"03"` into a width.
///
/// The accepted grammar is a leading `0` followed by the total width in
/// digits, matching printf-style `%03d` padding. A bare `"1"`-style width
/// (no padding) is also accepted.
pub fn parse_format_spec(key: &str, spec: &str) -> Result<usize> {
    let digits_ok = !spec.is_empty() && spec.bytes().all(|b| b.is_ascii_digit());
    if !digits_ok {
        return Err(Error::KeyDefinition {
            key: key.to_string(),
            message: format!(
                "format_spec '{}' is not a zero-padding width such as '03'",
                spec
            ),
        });
    }
    spec.parse::<usize>().map_err(|_| Error::KeyDefinition {
        key: key.to_string(),
        message: format!("format_spec '{}' is out of range", spec),
    })
}

/// A named, typed field definition usable across templates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateKey {
    name: String,
    kind: KeyKind,
    default: Option<FieldValue>,
    choices: Vec<String>,
    shotgun_entity_type: Option<String>,
    shotgun_field_name: Option<String>,
    optional: bool,
    abstract_marker: bool,
}

impl TemplateKey {
    /// Create a key with no default, no choices and no metadata.
    pub fn new(name: &str, kind: KeyKind) -> Self {
        TemplateKey {
            name: name.to_string(),
            kind,
            default: None,
            choices: Vec::new(),
            shotgun_entity_type: None,
            shotgun_field_name: None,
            optional: false,
            abstract_marker: false,
        }
    }

    /// Set the default value substituted when the field is omitted.
    pub fn with_default(mut self, default: FieldValue) -> Self {
        self.default = Some(default);
        self
    }

    /// Restrict legal values to a closed set of choices.
    pub fn with_choices(mut self, choices: Vec<String>) -> Self {
        self.choices = choices;
        self
    }

    /// Attach pass-through production-tracking metadata. Not interpreted
    /// by any resolution logic.
    pub fn with_shotgun_mapping(mut self, entity_type: Option<String>, field_name: Option<String>) -> Self {
        self.shotgun_entity_type = entity_type;
        self.shotgun_field_name = field_name;
        self
    }

    /// Mark the key as optional; an unset optional key renders as an empty
    /// segment.
    pub fn with_optional(mut self, optional: bool) -> Self {
        self.optional = optional;
        self
    }

    /// Mark a non-sequence key as abstract (e.g. a stereo-eye key).
    /// Sequence keys are always abstract.
    pub fn with_abstract(mut self, abstract_marker: bool) -> Self {
        self.abstract_marker = abstract_marker;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> &KeyKind {
        &self.kind
    }

    pub fn default(&self) -> Option<&FieldValue> {
        self.default.as_ref()
    }

    pub fn choices(&self) -> &[String] {
        &self.choices
    }

    pub fn shotgun_entity_type(&self) -> Option<&str> {
        self.shotgun_entity_type.as_deref()
    }

    pub fn shotgun_field_name(&self) -> Option<&str> {
        self.shotgun_field_name.as_deref()
    }

    pub fn is_optional(&self) -> bool {
        self.optional
    }

    /// Whether the key represents an abstract dimension (frame number or a
    /// stereo-eye style marker) that can stand for a whole group of files.
    pub fn is_abstract(&self) -> bool {
        matches!(self.kind, KeyKind::Sequence { .. }) || self.abstract_marker
    }

    /// The canonical placeholder used when an abstract key is rendered
    /// without a concrete value: `%0Nd` for sequence keys, the configured
    /// default (e.g. `%V`) for abstract string keys.
    pub fn abstract_placeholder(&self) -> Option<FieldValue> {
        match self.kind {
            KeyKind::Sequence { .. } => Some(FieldValue::FrameSpec("%d".to_string())),
            _ if self.abstract_marker => self.default.clone(),
            _ => None,
        }
    }

    /// Check whether a value is acceptable for this key.
    ///
    /// Used to pre-filter candidate matches during ambiguous parsing, so
    /// it never errors.
    pub fn validate(&self, value: &FieldValue) -> bool {
        match (&self.kind, value) {
            (KeyKind::String, FieldValue::Str(s)) => {
                !s.is_empty() && !s.contains('/') && self.choice_ok(s)
            }
            (KeyKind::Integer { .. }, FieldValue::Int(n)) => self.choice_ok(&n.to_string()),
            (KeyKind::Sequence { .. }, FieldValue::Int(n)) => *n >= 0,
            (KeyKind::Sequence { .. }, FieldValue::FrameSpec(spec)) => {
                KNOWN_FRAME_SPECS.contains(&spec.as_str())
            }
            (KeyKind::Sequence { .. }, FieldValue::Any) => true,
            _ => false,
        }
    }

    fn choice_ok(&self, rendered: &str) -> bool {
        self.choices.is_empty() || self.choices.iter().any(|c| c == rendered)
    }

    /// Render a value into its in-path string form.
    pub fn str_from_value(&self, value: &FieldValue) -> Result<String> {
        match (&self.kind, value) {
            (KeyKind::String, FieldValue::Str(s)) => {
                if s.is_empty() || s.contains('/') {
                    return Err(self.value_error(value, "must be non-empty text without '/'"));
                }
                if !self.choice_ok(s) {
                    return Err(self.value_error(
                        value,
                        &format!("must be one of: {}", self.choices.join(", ")),
                    ));
                }
                Ok(s.clone())
            }
            (KeyKind::Integer { padding }, FieldValue::Int(n)) => {
                if !self.choice_ok(&n.to_string()) {
                    return Err(self.value_error(
                        value,
                        &format!("must be one of: {}", self.choices.join(", ")),
                    ));
                }
                Ok(match padding {
                    Some(width) => format!("{:0width$}", n, width = *width),
                    None => n.to_string(),
                })
            }
            (KeyKind::Sequence { padding }, FieldValue::Int(n)) => {
                if *n < 0 {
                    return Err(self.value_error(value, "frame numbers cannot be negative"));
                }
                Ok(format!("{:0width$}", n, width = *padding))
            }
            (KeyKind::Sequence { padding }, FieldValue::FrameSpec(spec)) => {
                frame_placeholder(spec, *padding).ok_or_else(|| {
                    self.value_error(
                        value,
                        &format!(
                            "unknown frame spec; expected one of: {}",
                            KNOWN_FRAME_SPECS.join(", ")
                        ),
                    )
                })
            }
            (KeyKind::Sequence { .. }, FieldValue::Any) => Ok("*".to_string()),
            _ => Err(self.value_error(value, &format!("expected a {} value", self.kind.label()))),
        }
    }

    /// Parse a path segment back into a typed value, or `None` when the
    /// text does not conform to this key.
    pub fn value_from_str(&self, text: &str) -> Option<FieldValue> {
        match &self.kind {
            KeyKind::String => {
                let value = FieldValue::Str(text.to_string());
                self.validate(&value).then_some(value)
            }
            KeyKind::Integer { .. } => {
                // Width mismatches are tolerated on read; padding is only
                // enforced when writing.
                if text.is_empty() || !text.bytes().all(|b| b.is_ascii_digit()) {
                    return None;
                }
                let value = FieldValue::Int(text.parse().ok()?);
                self.validate(&value).then_some(value)
            }
            KeyKind::Sequence { .. } => {
                if text == "*" {
                    return Some(FieldValue::Any);
                }
                if let Some(spec) = text.strip_prefix("FORMAT:") {
                    let value = FieldValue::FrameSpec(spec.to_string());
                    return self.validate(&value).then_some(value);
                }
                if text.is_empty() || !text.bytes().all(|b| b.is_ascii_digit()) {
                    return None;
                }
                Some(FieldValue::Int(text.parse().ok()?))
            }
        }
    }

    /// The regex fragment this key contributes to a template's matching
    /// pattern. The lazy variant is used as the fallback parse when the
    /// greedy parse captures values that fail validation.
    pub fn regex_fragment(&self, lazy: bool) -> String {
        match &self.kind {
            KeyKind::String => {
                if self.choices.is_empty() {
                    if lazy { "[^/]+?".to_string() } else { "[^/]+".to_string() }
                } else {
                    let alternates: Vec<String> =
                        self.choices.iter().map(|c| regex::escape(c)).collect();
                    format!("(?:{})", alternates.join("|"))
                }
            }
            KeyKind::Integer { padding } => match padding {
                Some(width) => format!("\\d{{{},}}", width),
                None => "\\d+".to_string(),
            },
            KeyKind::Sequence { .. } => "\\d+".to_string(),
        }
    }

    fn value_error(&self, value: &FieldValue, message: &str) -> Error {
        Error::Value {
            key: self.name.clone(),
            message: format!("'{}' {}", value, message),
        }
    }
}

/// Render a frame spec into the literal placeholder for a given padding
/// width: `%d` -> `%04d`, `#d`/`#` -> `####`.
fn frame_placeholder(spec: &str, padding: usize) -> Option<String> {
    match spec {
        "%d" => {
            if padding > 1 {
                Some(format!("%0{}d", padding))
            } else {
                Some("%d".to_string())
            }
        }
        "#d" | "#" => Some("#".repeat(padding.max(1))),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn version_key() -> TemplateKey {
        TemplateKey::new("version", KeyKind::Integer { padding: Some(3) })
    }

    fn frame_key() -> TemplateKey {
        TemplateKey::new("frame", KeyKind::Sequence { padding: 3 })
    }

    fn eye_key() -> TemplateKey {
        TemplateKey::new("eye", KeyKind::String)
            .with_default(FieldValue::Str("%V".to_string()))
            .with_choices(vec!["%V".to_string(), "L".to_string(), "R".to_string()])
            .with_abstract(true)
    }

    #[test]
    fn test_infer_field_values() {
        assert_eq!(FieldValue::infer("12"), FieldValue::Int(12));
        assert_eq!(FieldValue::infer("*"), FieldValue::Any);
        assert_eq!(
            FieldValue::infer("FORMAT:#d"),
            FieldValue::FrameSpec("#d".to_string())
        );
        assert_eq!(
            FieldValue::infer("shot_010"),
            FieldValue::Str("shot_010".to_string())
        );
    }

    #[test]
    fn test_string_key_rejects_separator() {
        let key = TemplateKey::new("Shot", KeyKind::String);
        assert!(key.validate(&FieldValue::Str("shot_010".to_string())));
        assert!(!key.validate(&FieldValue::Str("a/b".to_string())));
        assert!(!key.validate(&FieldValue::Str(String::new())));
        assert!(!key.validate(&FieldValue::Int(3)));
    }

    #[test]
    fn test_string_key_choices() {
        let key = eye_key();
        assert!(key.validate(&FieldValue::Str("L".to_string())));
        assert!(key.validate(&FieldValue::Str("%V".to_string())));
        assert!(!key.validate(&FieldValue::Str("C".to_string())));

        let err = key.str_from_value(&FieldValue::Str("C".to_string())).unwrap_err();
        let message = format!("{}", err);
        assert!(message.contains("eye"));
        assert!(message.contains("'C'"));
    }

    #[test]
    fn test_integer_key_padding_on_write() {
        let key = version_key();
        assert_eq!(key.str_from_value(&FieldValue::Int(4)).unwrap(), "004");
        // Values wider than the padding render unclipped.
        assert_eq!(key.str_from_value(&FieldValue::Int(12345)).unwrap(), "12345");
    }

    #[test]
    fn test_integer_key_tolerates_width_on_read() {
        let key = version_key();
        assert_eq!(key.value_from_str("004"), Some(FieldValue::Int(4)));
        assert_eq!(key.value_from_str("1234"), Some(FieldValue::Int(1234)));
        assert_eq!(key.value_from_str("va"), None);
        assert_eq!(key.value_from_str(""), None);
    }

    #[test]
    fn test_sequence_key_concrete_and_wildcard() {
        let key = frame_key();
        assert_eq!(key.str_from_value(&FieldValue::Int(2)).unwrap(), "002");
        assert_eq!(key.str_from_value(&FieldValue::Any).unwrap(), "*");
        assert_eq!(key.value_from_str("*"), Some(FieldValue::Any));
        assert_eq!(key.value_from_str("045"), Some(FieldValue::Int(45)));
    }

    #[test]
    fn test_sequence_key_frame_specs() {
        let key = frame_key();
        assert_eq!(
            key.str_from_value(&FieldValue::FrameSpec("%d".to_string())).unwrap(),
            "%03d"
        );
        assert_eq!(
            key.str_from_value(&FieldValue::FrameSpec("#d".to_string())).unwrap(),
            "###"
        );
        assert!(key.str_from_value(&FieldValue::FrameSpec("$F".to_string())).is_err());

        let wide = TemplateKey::new("seq_num", KeyKind::Sequence { padding: 1 });
        assert_eq!(
            wide.str_from_value(&FieldValue::FrameSpec("%d".to_string())).unwrap(),
            "%d"
        );
    }

    #[test]
    fn test_abstract_detection() {
        assert!(frame_key().is_abstract());
        assert!(eye_key().is_abstract());
        assert!(!version_key().is_abstract());
        assert_eq!(
            frame_key().abstract_placeholder(),
            Some(FieldValue::FrameSpec("%d".to_string()))
        );
        assert_eq!(
            eye_key().abstract_placeholder(),
            Some(FieldValue::Str("%V".to_string()))
        );
    }

    #[test]
    fn test_regex_fragments() {
        assert_eq!(TemplateKey::new("Shot", KeyKind::String).regex_fragment(false), "[^/]+");
        assert_eq!(TemplateKey::new("Shot", KeyKind::String).regex_fragment(true), "[^/]+?");
        assert_eq!(version_key().regex_fragment(false), "\\d{3,}");
        assert_eq!(
            TemplateKey::new("v", KeyKind::Integer { padding: None }).regex_fragment(false),
            "\\d+"
        );
        assert_eq!(frame_key().regex_fragment(false), "\\d+");
        // Choice keys match only their alternates.
        assert_eq!(eye_key().regex_fragment(false), "(?:%V|L|R)");
    }

    #[test]
    fn test_parse_format_spec() {
        assert_eq!(parse_format_spec("version", "03").unwrap(), 3);
        assert_eq!(parse_format_spec("seq_num", "05").unwrap(), 5);
        assert_eq!(parse_format_spec("frame", "1").unwrap(), 1);
        assert!(parse_format_spec("version", "abc").is_err());
        assert!(parse_format_spec("version", "").is_err());
    }
}
