use regex::Regex;

use crate::archive::TableMapping;
use crate::domain::SearchKind;
use crate::error::UisError;

/// Identifiers matching any of the regular expressions in `patterns`.
///
/// Patterns are searched unanchored. Results keep first-match order and hold
/// each identifier once, however many patterns match it.
pub fn search<S: AsRef<str>>(
    tables: &TableMapping,
    patterns: &[S],
    kind: SearchKind,
) -> Result<Vec<String>, UisError> {
    let (table, column) = kind.source();
    let candidates = tables
        .get(table)?
        .text_values(column)?
        .into_iter()
        .flatten()
        .collect::<Vec<_>>();

    let regexes = patterns
        .iter()
        .map(|pattern| {
            Regex::new(pattern.as_ref())
                .map_err(|err| UisError::InvalidPattern(format!("{}: {err}", pattern.as_ref())))
        })
        .collect::<Result<Vec<_>, _>>()?;

    let mut matches: Vec<String> = Vec::new();
    for regex in &regexes {
        for candidate in &candidates {
            if regex.is_match(candidate) && !matches.contains(candidate) {
                matches.push(candidate.clone());
            }
        }
    }
    Ok(matches)
}
