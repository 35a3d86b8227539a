// SPDX-FileCopyrightText: 2026 Vigil Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Figment-to-miette error bridge.
//!
//! Turns raw deserialization failures into diagnostics a person can act on:
//! each unknown key gets a source span into the offending TOML file, the
//! list of keys its section accepts, and a "did you mean?" suggestion
//! picked by Jaro-Winkler similarity.

#![allow(unused_assignments)] // miette's Diagnostic derive generates code triggering this lint

use miette::{Diagnostic, NamedSource, SourceSpan};
use thiserror::Error;

/// A configuration error with enough context for miette to render it.
#[derive(Debug, Error, Diagnostic)]
pub enum ConfigError {
    /// A key the config model does not know.
    #[error("unknown configuration key `{key}`")]
    #[diagnostic(code(vigil::config::unknown_key), help("{hint}"))]
    UnknownKey {
        key: String,
        /// Pre-rendered help line: suggestion (if any) plus the valid keys.
        hint: String,
        #[label("this key is not recognized")]
        span: Option<SourceSpan>,
        #[source_code]
        src: Option<NamedSource<String>>,
    },

    /// A value of the wrong TOML type.
    #[error("invalid type for `{key}`: {detail}")]
    #[diagnostic(code(vigil::config::invalid_type))]
    InvalidType { key: String, detail: String },

    /// A key the model requires but the merged config lacks.
    #[error("missing required key `{key}`")]
    #[diagnostic(
        code(vigil::config::missing_key),
        help("add `{key} = <value>` to your vigil.toml")
    )]
    MissingKey { key: String },

    /// A semantic constraint violated by an otherwise well-typed value.
    #[error("validation error: {message}")]
    #[diagnostic(code(vigil::config::validation))]
    Validation { message: String },

    /// Anything figment reports that does not fit the cases above.
    #[error("configuration error: {0}")]
    #[diagnostic(code(vigil::config::other))]
    Other(String),
}

/// Convert a figment error (which may bundle several failures) into
/// renderable diagnostics.
pub fn figment_to_config_errors(
    err: figment::Error,
    toml_sources: &[(String, String)],
) -> Vec<ConfigError> {
    use figment::error::Kind;

    err.into_iter()
        .map(|e| match &e.kind {
            Kind::UnknownField(field, accepted) => unknown_key_error(&e, field, accepted, toml_sources),
            Kind::MissingField(field) => ConfigError::MissingKey {
                key: field.clone().into_owned(),
            },
            Kind::InvalidType(actual, expected) => ConfigError::InvalidType {
                key: e.path.join("."),
                detail: format!("found {actual}, expected {expected}"),
            },
            _ => ConfigError::Other(e.to_string()),
        })
        .collect()
}

fn unknown_key_error(
    error: &figment::error::Error,
    field: &str,
    accepted: &[&str],
    toml_sources: &[(String, String)],
) -> ConfigError {
    let hint = match suggest_key(field, accepted) {
        Some(best) => format!("did you mean `{best}`? Valid keys: {}", accepted.join(", ")),
        None => format!("valid keys: {}", accepted.join(", ")),
    };

    // Attach a span when the error traces back to a file we actually read.
    let file = error
        .metadata
        .as_ref()
        .and_then(|m| m.source.as_ref())
        .and_then(|s| match s {
            figment::Source::File(path) => Some(path.display().to_string()),
            _ => None,
        })
        .and_then(|path| {
            toml_sources
                .iter()
                .find(|(p, _)| *p == path)
                .map(|(p, content)| (p.clone(), content.clone()))
        });

    let (span, src) = match file {
        Some((path, content)) => {
            let section = error.path.first().map(String::as_str);
            match locate_key(&content, section, field) {
                Some(offset) => (
                    Some(SourceSpan::new(offset.into(), field.len())),
                    Some(NamedSource::new(path, content)),
                ),
                None => (None, None),
            }
        }
        None => (None, None),
    };

    ConfigError::UnknownKey {
        key: field.to_string(),
        hint,
        span,
        src,
    }
}

/// Byte offset of `key` within `content`, scoped to `section` when given.
///
/// Scans line by line: once past the `[section]` header (or from the top for
/// top-level keys), the first line that starts with `key` followed by
/// whitespace or `=` wins.
pub fn locate_key(content: &str, section: Option<&str>, key: &str) -> Option<usize> {
    let mut offset = 0;
    let mut in_scope = section.is_none();

    for line in content.lines() {
        let trimmed = line.trim_start();

        if let Some(section) = section
            && trimmed.starts_with('[')
        {
            in_scope = trimmed == format!("[{section}]");
        } else if in_scope
            && let Some(rest) = trimmed.strip_prefix(key)
            && rest.starts_with([' ', '\t', '='])
        {
            return Some(offset + (line.len() - trimmed.len()));
        }

        offset += line.len() + 1; // newline
    }

    None
}

/// The accepted key most similar to `unknown`, if any is similar enough.
///
/// 0.78 Jaro-Winkler catches transpositions and dropped letters
/// (`deadlne_ms` -> `deadline_ms`) without suggesting unrelated keys.
pub fn suggest_key(unknown: &str, accepted: &[&str]) -> Option<String> {
    accepted
        .iter()
        .map(|key| (strsim::jaro_winkler(unknown, key), *key))
        .filter(|(score, _)| *score > 0.78)
        .max_by(|(a, _), (b, _)| a.total_cmp(b))
        .map(|(_, key)| key.to_string())
}

/// Render diagnostics to stderr with miette's graphical handler.
pub fn render_errors(errors: &[ConfigError]) {
    let handler = miette::GraphicalReportHandler::new();
    for error in errors {
        let mut rendered = String::new();
        if handler.render_report(&mut rendered, error as &dyn Diagnostic).is_ok() {
            eprint!("{rendered}");
        } else {
            eprintln!("Error: {error}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn close_typos_get_a_suggestion() {
        let accepted = &["deadline_ms", "dedup_retention_secs"];
        assert_eq!(
            suggest_key("deadlne_ms", accepted).as_deref(),
            Some("deadline_ms")
        );
        assert_eq!(
            suggest_key("dedup_retention_sec", accepted).as_deref(),
            Some("dedup_retention_secs")
        );
    }

    #[test]
    fn distant_strings_get_none() {
        assert_eq!(suggest_key("zzzzzz", &["name", "log_level"]), None);
    }

    #[test]
    fn locate_key_respects_section_scope() {
        let content = "[agent]\nname = \"x\"\n\n[dispatch]\ndeadlne_ms = 100\n";

        let offset = locate_key(content, Some("dispatch"), "deadlne_ms").unwrap();
        assert_eq!(&content[offset..offset + 10], "deadlne_ms");

        // The same key is not found under the wrong section.
        assert!(locate_key(content, Some("agent"), "deadlne_ms").is_none());
    }

    #[test]
    fn locate_key_handles_top_level_and_indentation() {
        let content = "  stray = 1\n[agent]\nname = \"x\"\n";
        let offset = locate_key(content, None, "stray").unwrap();
        assert_eq!(&content[offset..offset + 5], "stray");
    }
}
