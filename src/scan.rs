//! # Path Enumeration
//!
//! Widens a partially-specified field mapping into a filesystem glob and
//! runs it. Keys named in `skip_keys`, keys absent from the field
//! mapping, and keys carrying wildcard or frame-placeholder values all
//! render as `*`; a key that owns its whole directory level widens the
//! entire level.
//!
//! Raw glob hits are not trusted: every returned path is re-validated
//! through `get_fields` on the same template, so a directory that merely
//! looks right to the glob (say, non-numeric text where a zero-padded
//! version is expected) is discarded.

use std::collections::BTreeSet;
use std::path::PathBuf;

use log::debug;

use crate::error::{Error, Result};
use crate::key::{FieldValue, Fields};
use crate::parser::Token;
use crate::template::{TemplatePath, WildcardScope};

/// Build the glob pattern for a template/fields/skip-keys combination.
///
/// Exposed separately from [`scan_paths`] so callers (and tests) can
/// inspect the exact pattern that will hit the filesystem.
pub fn glob_pattern(
    template: &TemplatePath,
    fields: &Fields,
    skip_keys: &[&str],
) -> Result<PathBuf> {
    let skip: BTreeSet<&str> = skip_keys.iter().copied().collect();
    let mut pattern = template.root_path()?.to_path_buf();

    for level in template.levels() {
        let level_widened = level.iter().any(|token| match token {
            Token::Key(name) => {
                is_wildcard(fields, &skip, name)
                    && template.wildcard_scope(name) == Some(WildcardScope::WholeLevel)
            }
            Token::Literal(_) => false,
        });
        if level_widened {
            pattern.push("*");
            continue;
        }

        let mut segment = String::new();
        for token in level {
            match token {
                Token::Literal(text) => segment.push_str(text),
                Token::Key(name) => {
                    if is_wildcard(fields, &skip, name) {
                        segment.push('*');
                    } else {
                        let key = &template.keys()[name];
                        // is_wildcard returned false, so a value exists.
                        let value = &fields[name];
                        segment.push_str(&key.str_from_value(value)?);
                    }
                }
            }
        }
        pattern.push(segment);
    }
    Ok(pattern)
}

/// Whether a key renders as `*` in the glob: explicitly skipped, absent
/// from the fields, or carrying a value that cannot name one file.
fn is_wildcard(fields: &Fields, skip: &BTreeSet<&str>, name: &str) -> bool {
    if skip.contains(name) {
        return true;
    }
    matches!(
        fields.get(name),
        None | Some(FieldValue::Any) | Some(FieldValue::FrameSpec(_))
    )
}

/// Enumerate every path on disk matching the widened pattern, keeping
/// only those that fully parse back through the template. The result is
/// deduplicated and sorted; an empty result is not an error.
pub fn scan_paths(
    template: &TemplatePath,
    fields: &Fields,
    skip_keys: &[&str],
) -> Result<Vec<PathBuf>> {
    let pattern = glob_pattern(template, fields, skip_keys)?;
    let pattern = pattern.to_str().ok_or_else(|| {
        Error::Io(std::io::Error::new(
            std::io::ErrorKind::InvalidData,
            "glob pattern is not valid UTF-8",
        ))
    })?;
    debug!("template '{}': scanning glob '{}'", template.name(), pattern);

    let mut matches = BTreeSet::new();
    for entry in glob::glob(pattern)? {
        let path = entry.map_err(|e| Error::Io(e.into_error()))?;
        if template.get_fields(&path).is_some() {
            matches.insert(path);
        } else {
            debug!(
                "template '{}': discarding glob hit '{}'",
                template.name(),
                path.display()
            );
        }
    }
    Ok(matches.into_iter().collect())
}
