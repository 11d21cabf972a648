//! # Templates
//!
//! The reversible mapping between field mappings and concrete strings.
//! [`TemplatePath`] produces filesystem paths anchored under a storage
//! root; [`TemplateString`] produces flat names such as publish labels.
//! Both directions are supported:
//!
//! - `apply_fields`: fields -> path or name, with per-key validation,
//!   defaults, and zero-padded rendering.
//! - `get_fields`: path or name -> fields, by matching against an anchored
//!   regex built from the template's tokens and re-validating every
//!   captured value through its key.
//!
//! Matching prefers the parse in which every captured value validates:
//! the greedy pattern is tried first and a lazy-quantifier variant second.
//! Further ambiguity is not distinguished; the first fully-valid parse
//! wins.
//!
//! Templates are immutable once constructed (match regexes are compiled in
//! the constructor), so they can be shared freely across threads.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf, MAIN_SEPARATOR};

use log::trace;
use regex::{Captures, Regex};

use crate::error::{Error, Result};
use crate::key::{Fields, KeyRef};
use crate::parser::{self, Token};
use crate::roots::Platform;

/// How a skipped key widens a glob pattern: a key that owns its whole
/// directory level turns that level into `*`; a key embedded between
/// literals only wildcards its own span.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WildcardScope {
    SingleToken,
    WholeLevel,
}

/// Token structure, key set, and compiled matchers shared by both template
/// shapes.
#[derive(Debug)]
struct TemplateCore {
    name: String,
    definition: String,
    levels: Vec<Vec<Token>>,
    keys: BTreeMap<String, KeyRef>,
    ordered_key_names: Vec<String>,
    greedy: Regex,
    lazy: Regex,
}

impl TemplateCore {
    fn new(
        name: &str,
        definition: &str,
        levels: Vec<Vec<Token>>,
        all_keys: &BTreeMap<String, KeyRef>,
    ) -> Result<Self> {
        let mut ordered_key_names = Vec::new();
        let mut keys = BTreeMap::new();
        for token in levels.iter().flatten() {
            if let Token::Key(key_name) = token {
                // The parser has already rejected unknown and duplicate keys.
                keys.insert(key_name.clone(), all_keys[key_name].clone());
                ordered_key_names.push(key_name.clone());
            }
        }
        let core = TemplateCore {
            name: name.to_string(),
            definition: definition.to_string(),
            greedy: build_regex(&levels, &keys, false)?,
            lazy: build_regex(&levels, &keys, true)?,
            levels,
            keys,
            ordered_key_names,
        };
        Ok(core)
    }

    /// Whether a key's optional flag is honored: only keys in the final
    /// level can vanish from a path.
    fn key_is_skippable(&self, key_name: &str) -> bool {
        let Some(key) = self.keys.get(key_name) else {
            return false;
        };
        if !key.is_optional() {
            return false;
        }
        self.levels
            .last()
            .map(|level| level.iter().any(|t| matches!(t, Token::Key(n) if n == key_name)))
            .unwrap_or(false)
    }

    /// Required keys that neither `fields` nor a default can supply.
    fn missing_keys(&self, fields: &Fields) -> Vec<String> {
        let mut missing = Vec::new();
        for name in &self.ordered_key_names {
            let key = &self.keys[name];
            if fields.get(name).is_none()
                && key.default().is_none()
                && !self.key_is_skippable(name)
            {
                missing.push(name.clone());
            }
        }
        missing
    }

    /// Render every directory level. A final level consisting entirely of
    /// unset optional content is dropped.
    fn render_levels(&self, fields: &Fields) -> Result<Vec<String>> {
        let missing = self.missing_keys(fields);
        if !missing.is_empty() {
            return Err(Error::MissingKeys {
                template: self.name.clone(),
                keys: missing,
            });
        }

        let last = self.levels.len() - 1;
        let mut rendered = Vec::with_capacity(self.levels.len());
        for (index, level) in self.levels.iter().enumerate() {
            let mut segment = String::new();
            for token in level {
                match token {
                    Token::Literal(text) => segment.push_str(text),
                    Token::Key(key_name) => {
                        let key = &self.keys[key_name];
                        match fields.get(key_name).or_else(|| key.default()) {
                            Some(value) => segment.push_str(&key.str_from_value(value)?),
                            // Unset optional key in the final level.
                            None => {}
                        }
                    }
                }
            }
            if index == last && segment.is_empty() {
                continue;
            }
            rendered.push(segment);
        }
        Ok(rendered)
    }

    /// Match a root-relative, `/`-separated string and recover its fields.
    fn get_fields(&self, input: &str) -> Option<Fields> {
        if let Some(fields) = self.try_pattern(&self.greedy, input) {
            return Some(fields);
        }
        // Prefer the parse in which every captured value validates: retry
        // with lazy string quantifiers before giving up.
        if self.lazy.as_str() != self.greedy.as_str() {
            if let Some(fields) = self.try_pattern(&self.lazy, input) {
                trace!("template '{}': lazy parse accepted '{}'", self.name, input);
                return Some(fields);
            }
        }
        None
    }

    fn try_pattern(&self, pattern: &Regex, input: &str) -> Option<Fields> {
        let captures = pattern.captures(input)?;
        self.fields_from_captures(&captures)
    }

    fn fields_from_captures(&self, captures: &Captures<'_>) -> Option<Fields> {
        let mut fields = Fields::new();
        for name in &self.ordered_key_names {
            let key = &self.keys[name];
            match captures.name(name) {
                Some(capture) => {
                    let value = key.value_from_str(capture.as_str())?;
                    fields.insert(name.clone(), value);
                }
                None => {
                    if !self.key_is_skippable(name) {
                        return None;
                    }
                }
            }
        }
        Some(fields)
    }

    /// Cheap validity pre-check, without building the output string.
    fn validate(&self, fields: &Fields) -> bool {
        if !self.missing_keys(fields).is_empty() {
            return false;
        }
        self.ordered_key_names.iter().all(|name| {
            let key = &self.keys[name];
            match fields.get(name) {
                Some(value) => key.validate(value),
                None => true,
            }
        })
    }
}

/// Build the anchored match regex across all levels. A final level made
/// only of optional keys becomes an optional group together with its
/// leading separator.
fn build_regex(
    levels: &[Vec<Token>],
    keys: &BTreeMap<String, KeyRef>,
    lazy: bool,
) -> Result<Regex> {
    let last = levels.len() - 1;
    let mut pattern = String::from("^");
    for (index, level) in levels.iter().enumerate() {
        let all_optional = index == last
            && !level.is_empty()
            && level.iter().all(|t| matches!(t, Token::Key(n) if keys[n].is_optional()));

        let mut level_pattern = String::new();
        for token in level {
            match token {
                Token::Literal(text) => level_pattern.push_str(&regex::escape(text)),
                Token::Key(name) => {
                    let key = &keys[name];
                    let optional_key =
                        index == last && key.is_optional() && !all_optional;
                    level_pattern.push_str(&format!("(?P<{}>{})", name, key.regex_fragment(lazy)));
                    if optional_key {
                        level_pattern.push('?');
                    }
                }
            }
        }

        if index == 0 {
            pattern.push_str(&level_pattern);
        } else if all_optional {
            pattern.push_str(&format!("(?:/{})?", level_pattern));
        } else {
            pattern.push('/');
            pattern.push_str(&level_pattern);
        }
    }
    pattern.push('$');
    Ok(Regex::new(&pattern)?)
}

/// A multi-root aware, hierarchical template producing filesystem paths.
#[derive(Debug)]
pub struct TemplatePath {
    core: TemplateCore,
    root_name: String,
    root_path: Option<PathBuf>,
    scopes: BTreeMap<String, WildcardScope>,
}

impl TemplatePath {
    /// Construct from a definition string. `root_path` is the storage-root
    /// prefix for the current platform; `None` when the root is not
    /// available here.
    pub fn new(
        name: &str,
        definition: &str,
        keys: &BTreeMap<String, KeyRef>,
        root_name: &str,
        root_path: Option<PathBuf>,
    ) -> Result<Self> {
        let levels = parser::parse_path_definition(name, definition, keys)?;

        let mut scopes = BTreeMap::new();
        for level in &levels {
            let whole = level.len() == 1;
            for token in level {
                if let Token::Key(key_name) = token {
                    let scope = if whole {
                        WildcardScope::WholeLevel
                    } else {
                        WildcardScope::SingleToken
                    };
                    scopes.insert(key_name.clone(), scope);
                }
            }
        }

        Ok(TemplatePath {
            core: TemplateCore::new(name, definition, levels, keys)?,
            root_name: root_name.to_string(),
            root_path,
            scopes,
        })
    }

    pub fn name(&self) -> &str {
        &self.core.name
    }

    pub fn definition(&self) -> &str {
        &self.core.definition
    }

    pub fn root_name(&self) -> &str {
        &self.root_name
    }

    /// The storage-root prefix this template renders under, or an error
    /// naming the root and platform when it is not configured here.
    pub fn root_path(&self) -> Result<&Path> {
        self.root_path
            .as_deref()
            .ok_or_else(|| Error::RootUnavailable {
                root: self.root_name.clone(),
                platform: Platform::current().to_string(),
            })
    }

    /// The keys used by this template, by name.
    pub fn keys(&self) -> &BTreeMap<String, KeyRef> {
        &self.core.keys
    }

    /// Key names in definition order.
    pub fn key_names(&self) -> impl Iterator<Item = &str> {
        self.core.ordered_key_names.iter().map(String::as_str)
    }

    /// How a skipped value for the named key widens a glob.
    pub fn wildcard_scope(&self, key_name: &str) -> Option<WildcardScope> {
        self.scopes.get(key_name).copied()
    }

    /// Directory levels of tokens, root-relative.
    pub(crate) fn levels(&self) -> &[Vec<Token>] {
        &self.core.levels
    }

    /// Render a concrete path from a field mapping.
    pub fn apply_fields(&self, fields: &Fields) -> Result<PathBuf> {
        let mut path = self.root_path()?.to_path_buf();
        for segment in self.core.render_levels(fields)? {
            path.push(segment);
        }
        Ok(path)
    }

    /// Recover the field mapping a path was rendered from, or `None` when
    /// the path does not conform to this template (wrong root, wrong
    /// structure, or a captured value its key rejects).
    pub fn get_fields(&self, path: &Path) -> Option<Fields> {
        let root = self.root_path.as_ref()?;
        let relative = path.strip_prefix(root).ok()?;
        let relative = relative.to_str()?;
        if relative.is_empty() {
            return None;
        }
        let normalized = if MAIN_SEPARATOR == '/' {
            relative.to_string()
        } else {
            relative.replace(MAIN_SEPARATOR, "/")
        };
        self.core.get_fields(&normalized)
    }

    /// Cheap check that a field mapping could be applied to this template.
    pub fn validate(&self, fields: &Fields) -> bool {
        self.core.validate(fields)
    }
}

/// A single-level template producing flat names such as UI labels.
#[derive(Debug)]
pub struct TemplateString {
    core: TemplateCore,
}

impl TemplateString {
    pub fn new(name: &str, definition: &str, keys: &BTreeMap<String, KeyRef>) -> Result<Self> {
        let tokens = parser::parse_flat_definition(name, definition, keys)?;
        Ok(TemplateString {
            core: TemplateCore::new(name, definition, vec![tokens], keys)?,
        })
    }

    pub fn name(&self) -> &str {
        &self.core.name
    }

    pub fn definition(&self) -> &str {
        &self.core.definition
    }

    pub fn keys(&self) -> &BTreeMap<String, KeyRef> {
        &self.core.keys
    }

    pub fn key_names(&self) -> impl Iterator<Item = &str> {
        self.core.ordered_key_names.iter().map(String::as_str)
    }

    /// Render a concrete name from a field mapping.
    pub fn apply_fields(&self, fields: &Fields) -> Result<String> {
        Ok(self.core.render_levels(fields)?.concat())
    }

    /// Recover the field mapping a name was rendered from.
    pub fn get_fields(&self, input: &str) -> Option<Fields> {
        self.core.get_fields(input)
    }

    pub fn validate(&self, fields: &Fields) -> bool {
        self.core.validate(fields)
    }
}

/// Either template shape, as stored in the project registry.
#[derive(Debug)]
pub enum Template {
    Path(TemplatePath),
    Str(TemplateString),
}

impl Template {
    pub fn name(&self) -> &str {
        match self {
            Template::Path(t) => t.name(),
            Template::Str(t) => t.name(),
        }
    }

    pub fn definition(&self) -> &str {
        match self {
            Template::Path(t) => t.definition(),
            Template::Str(t) => t.definition(),
        }
    }

    pub fn keys(&self) -> &BTreeMap<String, KeyRef> {
        match self {
            Template::Path(t) => t.keys(),
            Template::Str(t) => t.keys(),
        }
    }

    pub fn as_path(&self) -> Option<&TemplatePath> {
        match self {
            Template::Path(t) => Some(t),
            Template::Str(_) => None,
        }
    }

    pub fn as_string(&self) -> Option<&TemplateString> {
        match self {
            Template::Path(_) => None,
            Template::Str(t) => Some(t),
        }
    }

    /// Recover fields from a raw input, treating it as a path or a name
    /// depending on the template shape.
    pub fn fields_from(&self, input: &str) -> Option<Fields> {
        match self {
            Template::Path(t) => t.get_fields(Path::new(input)),
            Template::Str(t) => t.get_fields(input),
        }
    }

    pub fn validate(&self, fields: &Fields) -> bool {
        match self {
            Template::Path(t) => t.validate(fields),
            Template::Str(t) => t.validate(fields),
        }
    }
}
