//! # Template Definition Parser
//!
//! Converts a definition string such as
//! `sequences/{Sequence}/{Shot}/work/{name}.v{version}.ma` into an ordered
//! list of literal and key tokens, grouped into directory levels for path
//! templates or kept flat for name templates.
//!
//! All structural problems in a definition are reported here, at
//! configuration-load time: references to keys that do not exist, the same
//! key appearing twice (the definition could not be reversed), two key
//! placeholders with no literal text between them (the boundary between
//! their captures would be ambiguous), and malformed braces.

use std::collections::BTreeMap;

use crate::error::{Error, Result};
use crate::key::KeyRef;

/// One element of a parsed definition: literal text or a key placeholder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    Literal(String),
    Key(String),
}

/// Parse a path definition into directory levels of tokens.
pub fn parse_path_definition(
    template: &str,
    definition: &str,
    keys: &BTreeMap<String, KeyRef>,
) -> Result<Vec<Vec<Token>>> {
    if definition.is_empty() {
        return Err(definition_error(template, "definition is empty"));
    }
    let mut levels = Vec::new();
    for segment in definition.split('/') {
        if segment.is_empty() {
            return Err(definition_error(
                template,
                "definition must be a relative path with no empty segments",
            ));
        }
        levels.push(tokenize(template, segment)?);
    }
    check_keys(template, levels.iter().flatten(), keys)?;
    Ok(levels)
}

/// Parse a flat (single-level) name definition. The `/` character has no
/// separator meaning here and is kept as literal text.
pub fn parse_flat_definition(
    template: &str,
    definition: &str,
    keys: &BTreeMap<String, KeyRef>,
) -> Result<Vec<Token>> {
    if definition.is_empty() {
        return Err(definition_error(template, "definition is empty"));
    }
    let tokens = tokenize(template, definition)?;
    check_keys(template, tokens.iter(), keys)?;
    Ok(tokens)
}

/// Tokenize one chunk of definition text into alternating literal and key
/// tokens.
fn tokenize(template: &str, text: &str) -> Result<Vec<Token>> {
    let mut tokens = Vec::new();
    let mut literal = String::new();
    let mut chars = text.chars();

    while let Some(ch) = chars.next() {
        match ch {
            '{' => {
                let mut name = String::new();
                loop {
                    match chars.next() {
                        Some('}') => break,
                        Some('{') => {
                            return Err(definition_error(template, "nested '{' in placeholder"));
                        }
                        Some(c) => name.push(c),
                        None => {
                            return Err(definition_error(template, "unclosed '{' in definition"));
                        }
                    }
                }
                if name.is_empty() {
                    return Err(definition_error(template, "empty '{}' placeholder"));
                }
                if !literal.is_empty() {
                    tokens.push(Token::Literal(std::mem::take(&mut literal)));
                }
                if matches!(tokens.last(), Some(Token::Key(_))) {
                    return Err(definition_error(
                        template,
                        &format!(
                            "key '{{{}}}' directly follows another placeholder with no separating text",
                            name
                        ),
                    ));
                }
                tokens.push(Token::Key(name));
            }
            '}' => {
                return Err(definition_error(template, "'}' without matching '{'"));
            }
            c => literal.push(c),
        }
    }
    if !literal.is_empty() {
        tokens.push(Token::Literal(literal));
    }
    Ok(tokens)
}

/// Reject unknown and duplicated key references across a whole definition.
fn check_keys<'a>(
    template: &str,
    tokens: impl Iterator<Item = &'a Token>,
    keys: &BTreeMap<String, KeyRef>,
) -> Result<()> {
    let mut seen = Vec::new();
    for token in tokens {
        if let Token::Key(name) = token {
            if !keys.contains_key(name) {
                return Err(definition_error(
                    template,
                    &format!("unknown key '{}' referenced in definition", name),
                ));
            }
            if seen.contains(&name) {
                return Err(definition_error(
                    template,
                    &format!("key '{}' appears more than once in definition", name),
                ));
            }
            seen.push(name);
        }
    }
    Ok(())
}

fn definition_error(template: &str, message: &str) -> Error {
    Error::Definition {
        template: template.to_string(),
        message: message.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::key::{KeyKind, TemplateKey};
    use std::sync::Arc;

    fn keys(names: &[&str]) -> BTreeMap<String, KeyRef> {
        names
            .iter()
            .map(|n| (n.to_string(), Arc::new(TemplateKey::new(n, KeyKind::String))))
            .collect()
    }

    #[test]
    fn test_parse_simple_path() {
        let levels =
            parse_path_definition("t", "sequences/{Sequence}/{Shot}", &keys(&["Sequence", "Shot"]))
                .unwrap();
        assert_eq!(levels.len(), 3);
        assert_eq!(levels[0], vec![Token::Literal("sequences".to_string())]);
        assert_eq!(levels[1], vec![Token::Key("Sequence".to_string())]);
        assert_eq!(levels[2], vec![Token::Key("Shot".to_string())]);
    }

    #[test]
    fn test_parse_mixed_level() {
        let levels =
            parse_path_definition("t", "{Shot}/filename.{seq_num}", &keys(&["Shot", "seq_num"]))
                .unwrap();
        assert_eq!(
            levels[1],
            vec![
                Token::Literal("filename.".to_string()),
                Token::Key("seq_num".to_string())
            ]
        );
    }

    #[test]
    fn test_unknown_key_rejected() {
        let err = parse_path_definition("my_template", "{Shoot}", &keys(&["Shot"])).unwrap_err();
        let message = format!("{}", err);
        assert!(message.contains("my_template"));
        assert!(message.contains("unknown key 'Shoot'"));
    }

    #[test]
    fn test_duplicate_key_rejected() {
        let err =
            parse_path_definition("t", "{Shot}/work/{Shot}.ma", &keys(&["Shot"])).unwrap_err();
        assert!(format!("{}", err).contains("more than once"));
    }

    #[test]
    fn test_adjacent_keys_rejected() {
        let err = parse_path_definition("t", "{Shot}{Step}", &keys(&["Shot", "Step"])).unwrap_err();
        assert!(format!("{}", err).contains("no separating text"));
    }

    #[test]
    fn test_adjacent_keys_across_levels_allowed() {
        assert!(parse_path_definition("t", "{Shot}/{Step}", &keys(&["Shot", "Step"])).is_ok());
    }

    #[test]
    fn test_malformed_braces() {
        let known = keys(&["Shot"]);
        assert!(parse_path_definition("t", "{Shot", &known).is_err());
        assert!(parse_path_definition("t", "Shot}", &known).is_err());
        assert!(parse_path_definition("t", "{}", &known).is_err());
        assert!(parse_path_definition("t", "{{Shot}}", &known).is_err());
    }

    #[test]
    fn test_empty_and_absolute_definitions_rejected() {
        let known = keys(&["Shot"]);
        assert!(parse_path_definition("t", "", &known).is_err());
        assert!(parse_path_definition("t", "/abs/{Shot}", &known).is_err());
        assert!(parse_path_definition("t", "a//b", &known).is_err());
    }

    #[test]
    fn test_flat_definition_keeps_slash_literal() {
        let tokens =
            parse_flat_definition("t", "{name}, v{version}", &keys(&["name", "version"])).unwrap();
        assert_eq!(
            tokens,
            vec![
                Token::Key("name".to_string()),
                Token::Literal(", v".to_string()),
                Token::Key("version".to_string()),
            ]
        );
    }
}
