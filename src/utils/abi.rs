//! ABI parsing and keyword matching
//!
//! Explorer ABIs arrive as JSON arrays or as JSON-encoded strings. Anything that
//! does not parse is treated as "no ABI" rather than an error.

use serde::Serialize;
use tracing::warn;

use crate::models::errors::{AppError, AppResult};
use crate::models::types::{AbiEntry, AbiEntryKind};

/// How a keyword is compared against a function name
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum MatchMode {
    /// Keyword anywhere in the name (owner privileges)
    Contains,
    /// Name begins with the keyword (dangerous functions)
    StartsWith,
}

impl MatchMode {
    #[inline]
    fn matches(&self, name: &str, keyword: &str) -> bool {
        match self {
            MatchMode::Contains => name.contains(keyword),
            MatchMode::StartsWith => name.starts_with(keyword),
        }
    }
}

/// A function name that hit a keyword
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct KeywordMatch {
    pub function: String,
    pub keyword: &'static str,
}

/// Parse an ABI given either as a JSON array or as a JSON string holding one
pub fn parse_abi(value: &serde_json::Value) -> Option<Vec<AbiEntry>> {
    let parsed = match value {
        serde_json::Value::Null => return None,
        serde_json::Value::String(text) => parse_abi_str(text),
        other => serde_json::from_value::<Vec<AbiEntry>>(other.clone())
            .map_err(|e| AppError::abi_malformed(e.to_string())),
    };

    match parsed {
        Ok(entries) => Some(entries),
        Err(e) => {
            warn!("Treating ABI as absent: {}", e);
            None
        }
    }
}

/// Parse ABI JSON text
pub fn parse_abi_str(text: &str) -> AppResult<Vec<AbiEntry>> {
    serde_json::from_str(text.trim()).map_err(|e| AppError::abi_malformed(e.to_string()))
}

/// Lowercased names of all named function entries; empty if there is no ABI
pub fn function_names(abi: Option<&[AbiEntry]>) -> Vec<String> {
    abi.unwrap_or_default()
        .iter()
        .filter(|entry| entry.kind == AbiEntryKind::Function)
        .filter_map(|entry| entry.name.as_deref())
        .filter(|name| !name.is_empty())
        .map(str::to_lowercase)
        .collect()
}

/// Match lowercased names against a keyword vocabulary.
///
/// One match per (function, keyword) pair, in name order then vocabulary order.
pub fn match_keywords(
    names: &[String],
    keywords: &'static [&'static str],
    mode: MatchMode,
) -> Vec<KeywordMatch> {
    names
        .iter()
        .flat_map(|name| {
            keywords
                .iter()
                .filter(move |keyword| mode.matches(name, keyword))
                .map(move |keyword| KeywordMatch {
                    function: name.clone(),
                    keyword: *keyword,
                })
        })
        .collect()
}
