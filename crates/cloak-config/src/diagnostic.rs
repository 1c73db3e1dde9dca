// SPDX-FileCopyrightText: 2026 Cloak Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Figment-to-miette error bridge with "did you mean?" suggestions.

#![allow(unused_assignments)] // miette's Diagnostic derive generates code triggering this lint

use miette::{Diagnostic, NamedSource, SourceSpan};
use thiserror::Error;

use cloak_core::CloakError;

/// Minimum Jaro-Winkler similarity score to suggest a correction.
const SUGGESTION_THRESHOLD: f64 = 0.75;

/// A configuration error with enough context for miette to render source
/// spans, suggestions and valid key listings.
#[derive(Debug, Error, Diagnostic)]
pub enum ConfigError {
    /// A key that no section of `cloak.toml` accepts.
    #[error("unknown configuration key `{key}`")]
    #[diagnostic(
        code(cloak::config::unknown_key),
        help("{}", format_unknown_key_help(suggestion.as_deref(), valid_keys))
    )]
    UnknownKey {
        /// The unrecognized key name.
        key: String,
        /// Closest valid key by Jaro-Winkler similarity, if any.
        suggestion: Option<String>,
        /// Comma-separated keys the section accepts.
        valid_keys: String,
        /// Location of the offending key.
        #[label("this key is not recognized")]
        span: Option<SourceSpan>,
        /// The file the key was read from.
        #[source_code]
        src: Option<NamedSource<String>>,
    },

    /// A value of the wrong type.
    #[error("invalid type for key `{key}`: {detail}")]
    #[diagnostic(code(cloak::config::invalid_type), help("expected {expected}"))]
    InvalidType {
        /// Dotted path of the key.
        key: String,
        /// What was found versus what was expected.
        detail: String,
        /// The expected type.
        expected: String,
    },

    /// A required key is absent.
    #[error("missing required key `{key}`")]
    #[diagnostic(
        code(cloak::config::missing_key),
        help("add `{key} = <value>` to the section in cloak.toml")
    )]
    MissingKey {
        /// Dotted path of the missing key.
        key: String,
    },

    /// A value that parsed but fails a semantic check.
    #[error("validation error: {message}")]
    #[diagnostic(code(cloak::config::validation))]
    Validation {
        /// Which value failed and why.
        message: String,
    },

    /// Any other figment error, e.g. unreadable files or malformed TOML.
    #[error("configuration error: {0}")]
    #[diagnostic(code(cloak::config::other))]
    Other(String),
}

impl From<ConfigError> for CloakError {
    fn from(err: ConfigError) -> Self {
        CloakError::Config(err.to_string())
    }
}

fn format_unknown_key_help(suggestion: Option<&str>, valid_keys: &str) -> String {
    match suggestion {
        Some(s) => format!("did you mean `{s}`? Valid keys: {valid_keys}"),
        None => format!("valid keys: {valid_keys}"),
    }
}

/// Convert every error inside a `figment::Error` into a [`ConfigError`].
///
/// `toml_sources` holds `(path, content)` pairs used to attach source spans
/// to unknown-key errors.
pub fn figment_to_config_errors(
    err: figment::Error,
    toml_sources: &[(String, String)],
) -> Vec<ConfigError> {
    use figment::error::Kind;

    err.into_iter()
        .map(|error| match &error.kind {
            Kind::UnknownField(field, expected) => {
                let (span, src) = find_source_span(&error, field, toml_sources);
                ConfigError::UnknownKey {
                    key: field.clone(),
                    suggestion: suggest_key(field, expected),
                    valid_keys: expected.join(", "),
                    span,
                    src,
                }
            }
            Kind::MissingField(field) => ConfigError::MissingKey {
                key: dotted(&error.path, field),
            },
            Kind::InvalidType(actual, expected) => ConfigError::InvalidType {
                key: error.path.join("."),
                detail: format!("found {actual}, expected {expected}"),
                expected: expected.to_string(),
            },
            _ => ConfigError::Other(error.to_string()),
        })
        .collect()
}

fn dotted(path: &[String], field: &str) -> String {
    if path.is_empty() {
        field.to_string()
    } else {
        format!("{}.{field}", path.join("."))
    }
}

fn find_source_span(
    error: &figment::error::Error,
    field: &str,
    toml_sources: &[(String, String)],
) -> (Option<SourceSpan>, Option<NamedSource<String>>) {
    let source_path = match error.metadata.as_ref().and_then(|m| m.source.as_ref()) {
        Some(figment::Source::File(path)) => path.display().to_string(),
        _ => return (None, None),
    };

    let Some((path, content)) = toml_sources.iter().find(|(p, _)| *p == source_path) else {
        return (None, None);
    };

    match find_key_offset(content, &error.path, field) {
        Some(offset) => (
            Some(SourceSpan::new(offset.into(), field.len())),
            Some(NamedSource::new(path, content.clone())),
        ),
        None => (None, None),
    }
}

/// Byte offset of `field` in TOML `content`, searched inside the table named
/// by `path`.
///
/// An index in `path` selects the matching array-of-tables entry, so
/// `["sources", "1"]` looks after the second `[[sources]]` header. The search
/// stops at the next table header. An empty path searches the top level.
pub fn find_key_offset(content: &str, path: &[String], field: &str) -> Option<usize> {
    let section: Vec<&str> = path
        .iter()
        .map(String::as_str)
        .filter(|segment| segment.parse::<usize>().is_err())
        .collect();
    let index = path.iter().rev().find_map(|segment| segment.parse::<usize>().ok());

    let search_start = if section.is_empty() {
        0
    } else {
        let header = match index {
            Some(_) => format!("[[{}]]", section.join(".")),
            None => format!("[{}]", section.join(".")),
        };
        let (pos, _) = content.match_indices(&header).nth(index.unwrap_or(0))?;
        pos + header.len()
    };

    let mut byte_offset = search_start;
    for line in content[search_start..].split_inclusive('\n') {
        let trimmed = line.trim_start();
        if trimmed.starts_with('[') {
            break;
        }
        if let Some(after) = trimmed.strip_prefix(field)
            && (after.starts_with(' ') || after.starts_with('=') || after.starts_with('\t'))
        {
            return Some(byte_offset + line.len() - trimmed.len());
        }
        byte_offset += line.len();
    }

    None
}

/// Best Jaro-Winkler match for `unknown` above the similarity threshold.
pub fn suggest_key(unknown: &str, valid_keys: &[&str]) -> Option<String> {
    valid_keys
        .iter()
        .map(|&key| (strsim::jaro_winkler(unknown, key), key))
        .filter(|(score, _)| *score > SUGGESTION_THRESHOLD)
        .max_by(|a, b| a.0.total_cmp(&b.0))
        .map(|(_, key)| key.to_string())
}

/// Render `errors` to stderr with miette's graphical handler.
pub fn render_errors(errors: &[ConfigError]) {
    use miette::GraphicalReportHandler;

    let handler = GraphicalReportHandler::new();
    for error in errors {
        let mut buf = String::new();
        let diagnostic: &dyn Diagnostic = error;
        if handler.render_report(&mut buf, diagnostic).is_ok() {
            eprint!("{buf}");
        } else {
            eprintln!("Error: {error}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn suggest_admn_path_for_admin_path() {
        let valid = &["name", "url", "admin_path", "assets_path", "meta"];
        assert_eq!(suggest_key("admn_path", valid), Some("admin_path".to_string()));
    }

    #[test]
    fn suggest_picks_closest_key() {
        let valid = &["admin_path", "assets_path", "content_path"];
        assert_eq!(
            suggest_key("contnet_path", valid),
            Some("content_path".to_string())
        );
    }

    #[test]
    fn no_suggestion_for_distant_typo() {
        let valid = &["name", "url", "admin_path"];
        assert_eq!(suggest_key("zzzzzz", valid), None);
    }

    #[test]
    fn find_key_offset_at_top_level() {
        let content = "defualt_source = \"a\"\n";
        assert_eq!(find_key_offset(content, &[], "defualt_source"), Some(0));
    }

    #[test]
    fn find_key_offset_in_array_of_tables() {
        let content = "[[cms.instances]]\nurl = \"https://x\"\n  contnet_path = \"/\"\n";
        let path = vec!["cms".to_string(), "instances".to_string(), "0".to_string()];
        let offset = find_key_offset(content, &path, "contnet_path").unwrap();
        assert_eq!(&content[offset..offset + 12], "contnet_path");
    }

    #[test]
    fn find_key_offset_uses_array_index() {
        let content = "[[sources]]\nurl = \"https://a\"\nadmn_path = \"/a\"\n\n\
                       [[sources]]\nurl = \"https://b\"\nadmn_path = \"/b\"\n";
        let path = vec!["sources".to_string(), "1".to_string()];
        let offset = find_key_offset(content, &path, "admn_path").unwrap();
        assert_eq!(offset, content.rfind("admn_path").unwrap());
    }

    #[test]
    fn find_key_offset_stops_at_next_header() {
        let content = "[[sources]]\nurl = \"https://a\"\n\n[[sources]]\nnmae = \"b\"\n";
        let path = vec!["sources".to_string(), "0".to_string()];
        assert_eq!(find_key_offset(content, &path, "nmae"), None);
    }

    #[test]
    fn find_key_offset_missing_section() {
        let content = "[[sources]]\nurl = \"https://x\"\n";
        let path = vec!["cms".to_string()];
        assert_eq!(find_key_offset(content, &path, "url"), None);
    }

    #[test]
    fn config_error_converts_into_cloak_error() {
        let err: CloakError = ConfigError::Validation {
            message: "bad".into(),
        }
        .into();
        assert_eq!(
            err.to_string(),
            "configuration error: validation error: bad"
        );
    }
}
