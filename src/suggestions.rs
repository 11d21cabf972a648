//! # Error Suggestions
//!
//! This module provides helper functions for generating helpful error
//! messages with hints and suggestions. Following CLI recommendations,
//! errors should tell users what went wrong AND how to fix it.

use std::path::Path;

/// Generate an error for when the configuration file is not found.
///
/// Includes hints about:
/// - Creating a new config file
/// - Using the -c/--config flag
/// - Using the SHOTPATH_CONFIG environment variable
pub fn config_not_found(path: &Path) -> anyhow::Error {
    anyhow::anyhow!(
        "Configuration file not found: {path}\n\n\
         hint: Create a shotpath.yaml file describing your roots, keys and templates\n\
         hint: Use -c/--config to specify a different path\n\
         hint: Set SHOTPATH_CONFIG environment variable",
        path = path.display()
    )
}

/// Generate an error for a template name that is not in the registry.
///
/// Suggests a close match when one exists and lists what is available.
pub fn unknown_template(name: &str, candidates: &[&str]) -> anyhow::Error {
    let suggestion = find_similar(name, candidates);
    let did_you_mean = suggestion
        .map(|s| format!("\nhint: Did you mean '{s}'?"))
        .unwrap_or_default();

    anyhow::anyhow!(
        "Unknown template: {name}{did_you_mean}\n\n\
         Available templates: {names}\n\
         hint: Run 'shotpath templates' to inspect the registry",
        names = candidates.join(", ")
    )
}

/// Generate an error for a field assignment naming a key the template
/// does not use.
pub fn unknown_key(template: &str, key: &str, candidates: &[&str]) -> anyhow::Error {
    let suggestion = find_similar(key, candidates);
    let did_you_mean = suggestion
        .map(|s| format!("\nhint: Did you mean '{s}'?"))
        .unwrap_or_default();

    anyhow::anyhow!(
        "Template '{template}' has no key named '{key}'{did_you_mean}\n\n\
         Keys of '{template}': {names}",
        names = candidates.join(", ")
    )
}

/// Generate an error for a malformed `-f` field assignment.
pub fn invalid_field_assignment(raw: &str) -> anyhow::Error {
    anyhow::anyhow!(
        "Invalid field assignment: {raw}\n\n\
         hint: Fields are written as name=value, e.g. -f Shot=shot_010 -f version=4\n\
         hint: Use '*' as the value to wildcard a key, or FORMAT:#d for frame placeholders"
    )
}

/// Find a similar string from a list of candidates using edit distance.
///
/// Returns Some(candidate) if a close match is found (edit distance <= 2).
fn find_similar<'a>(input: &str, candidates: &[&'a str]) -> Option<&'a str> {
    candidates
        .iter()
        .filter_map(|&candidate| {
            let distance = edit_distance(input, candidate);
            if distance <= 2 && distance < input.len() {
                Some((candidate, distance))
            } else {
                None
            }
        })
        .min_by_key(|(_, distance)| *distance)
        .map(|(candidate, _)| candidate)
}

/// Calculate the Levenshtein edit distance between two strings.
fn edit_distance(a: &str, b: &str) -> usize {
    let a_chars: Vec<char> = a.chars().collect();
    let b_chars: Vec<char> = b.chars().collect();
    let a_len = a_chars.len();
    let b_len = b_chars.len();

    if a_len == 0 {
        return b_len;
    }
    if b_len == 0 {
        return a_len;
    }

    let mut matrix = vec![vec![0usize; b_len + 1]; a_len + 1];

    for (i, row) in matrix.iter_mut().enumerate() {
        row[0] = i;
    }
    for (j, cell) in matrix[0].iter_mut().enumerate() {
        *cell = j;
    }

    for i in 1..=a_len {
        for j in 1..=b_len {
            let cost = if a_chars[i - 1] == b_chars[j - 1] {
                0
            } else {
                1
            };
            matrix[i][j] = (matrix[i - 1][j] + 1)
                .min(matrix[i][j - 1] + 1)
                .min(matrix[i - 1][j - 1] + cost);
        }
    }

    matrix[a_len][b_len]
}
