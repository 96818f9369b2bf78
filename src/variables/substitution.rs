//! Variable substitution engine for REST Harness
//!
//! This module replaces `{{variable}}` placeholders in URLs, header values and
//! request bodies with values from the [`EnvironmentStore`]. Substitution is plain
//! text replacement in a single left-to-right pass: values are inserted exactly as
//! stored, never escaped, and never scanned again for placeholders.

use super::VarError;
use crate::environment::{EnvironmentStore, MissingVariablePolicy};
use once_cell::sync::Lazy;
use regex::Regex;

/// Cached regex pattern for matching `{{name}}` on a single line.
/// The identifier may be empty or padded with whitespace but never contains a
/// brace, so a stray `{{` cannot swallow a later placeholder.
static PLACEHOLDER_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\{\{([^{}\n]*)\}\}").expect("Failed to compile placeholder regex"));

/// Substitutes all `{{variable}}` placeholders in `text` with values from `store`
///
/// - Identifiers are trimmed before lookup: `{{ token }}` reads `token`.
/// - A null binding is written as the literal text `null`.
/// - An unterminated `{{` is left verbatim.
/// - Unset variables follow `store.policy()`: kept as literal `{{name}}` text,
///   replaced with an empty string, or reported as [`VarError::UndefinedVariable`].
///
/// # Examples
///
/// ```
/// use rest_harness::environment::EnvironmentStore;
/// use rest_harness::variables::substitute_variables;
///
/// let store = EnvironmentStore::new();
/// store.set("last_event_id", "42");
///
/// let url = substitute_variables("/events/{{last_event_id}}/fans", &store).unwrap();
/// assert_eq!(url, "/events/42/fans");
/// ```
pub fn substitute_variables(text: &str, store: &EnvironmentStore) -> Result<String, VarError> {
    // Fast path: no placeholder markers at all
    if !text.contains("{{") {
        return Ok(text.to_string());
    }

    let policy = store.policy();
    let mut result = String::with_capacity(text.len() + (text.len() / 4));
    let mut last_match_end = 0;

    for cap in PLACEHOLDER_REGEX.captures_iter(text) {
        let Some(full_match) = cap.get(0) else {
            continue;
        };
        let name = cap.get(1).map_or("", |m| m.as_str()).trim();

        result.push_str(&text[last_match_end..full_match.start()]);

        match store.binding(name) {
            Some(binding) => result.push_str(binding.substitution_text()),
            None => match policy {
                MissingVariablePolicy::LeaveAsIs => {
                    log::warn!("substitution: '{}' is not set, placeholder left in place", name);
                    result.push_str(full_match.as_str());
                }
                MissingVariablePolicy::Empty => {
                    log::warn!("substitution: '{}' is not set, replaced with empty text", name);
                }
                MissingVariablePolicy::Fail => {
                    return Err(VarError::UndefinedVariable(name.to_string()));
                }
            },
        }

        last_match_end = full_match.end();
    }

    result.push_str(&text[last_match_end..]);
    Ok(result)
}

/// Lists the trimmed identifiers of every placeholder in `text`, in order
///
/// Duplicates are kept, so `{{a}}{{a}}` yields two entries.
pub fn find_placeholders(text: &str) -> Vec<String> {
    PLACEHOLDER_REGEX
        .captures_iter(text)
        .filter_map(|cap| cap.get(1))
        .map(|m| m.as_str().trim().to_string())
        .collect()
}

/// Lists the placeholders in `text` whose variables are not set in `store`
pub fn missing_variables(text: &str, store: &EnvironmentStore) -> Vec<String> {
    let mut missing: Vec<String> = Vec::new();
    for name in find_placeholders(text) {
        if !store.contains(&name) && !missing.contains(&name) {
            missing.push(name);
        }
    }
    missing
}
