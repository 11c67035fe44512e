//! The `areas` literal: the interchange format between export and import.
//!
//! The exporter writes a script array of relaxed object literals:
//!
//! ```text
//! areas = [{x1:10, y1:10, x2:50, y2:50, target:'B.png', base:'A.png'}]
//! ```
//!
//! Reading it back is a pipeline of small stages:
//! [`extract_literal`] finds the array in a document, [`normalize_literal`]
//! rewrites the relaxed syntax into JSON, and [`parse_literal`] hands the
//! result to `serde_json`.
//!
//! Normalization is textual. It replaces every `'` with `"` and quotes every
//! `word:` sequence, so a page name containing a quote or a `word:` pattern
//! will not survive the trip.

use crate::error::{MapperError, MapperResult};
use crate::page::HotspotRect;
use regex::Regex;
use serde::Deserialize;
use std::sync::OnceLock;

/// One flattened hotspot: its rectangle, its target and the page it sits on.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Deserialize)]
pub struct AreaEntry {
    pub x1: i32,
    pub y1: i32,
    pub x2: i32,
    pub y2: i32,
    pub target: String,
    pub base: String,
}

impl AreaEntry {
    pub fn new(rect: HotspotRect, target: &str, base: &str) -> Self {
        Self {
            x1: rect.x1,
            y1: rect.y1,
            x2: rect.x2,
            y2: rect.y2,
            target: target.to_string(),
            base: base.to_string(),
        }
    }

    pub fn rect(&self) -> HotspotRect {
        HotspotRect::new(self.x1, self.y1, self.x2, self.y2)
    }

    /// Relaxed object literal: unquoted keys, single-quoted strings.
    pub fn to_literal(&self) -> String {
        format!(
            "{{x1:{}, y1:{}, x2:{}, y2:{}, target:'{}', base:'{}'}}",
            self.x1, self.y1, self.x2, self.y2, self.target, self.base
        )
    }
}

/// Whether `name` survives rendering and re-reading unchanged.
///
/// Quotes, backslashes, line breaks and `]` break the literal itself, and a
/// `word:` sequence is rewritten by [`normalize_literal`].
pub fn is_literal_safe(name: &str) -> bool {
    static RE_KEYLIKE: OnceLock<Regex> = OnceLock::new();
    let re_keylike = RE_KEYLIKE.get_or_init(|| Regex::new(r"\w:").unwrap());

    !name.contains(['\'', '"', '\\', '\n', '\r', ']']) && !re_keylike.is_match(name)
}

/// Renders entries as a comma separated array literal with no trailing comma.
pub fn render_literal(entries: &[AreaEntry]) -> String {
    let items: Vec<String> = entries.iter().map(AreaEntry::to_literal).collect();
    format!("[{}]", items.join(","))
}

/// Finds the array assigned to `areas` in an arbitrary document.
pub fn extract_literal(document: &str) -> MapperResult<&str> {
    static RE_AREAS: OnceLock<Regex> = OnceLock::new();
    let re_areas = RE_AREAS.get_or_init(|| Regex::new(r"areas\s*=\s*(\[[^\]]*\])").unwrap());

    re_areas
        .captures(document)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
        .ok_or(MapperError::NoHotspotData)
}

/// Rewrites single-quoted strings and bare keys into JSON syntax.
pub fn normalize_literal(literal: &str) -> String {
    static RE_KEY: OnceLock<Regex> = OnceLock::new();
    let re_key = RE_KEY.get_or_init(|| Regex::new(r"(\w+):").unwrap());

    let double_quoted = literal.replace('\'', "\"");
    re_key
        .replace_all(&double_quoted, "\"$1\":")
        .into_owned()
}

/// Parses normalized JSON into area entries.
pub fn parse_literal(json: &str) -> MapperResult<Vec<AreaEntry>> {
    serde_json::from_str(json).map_err(|err| MapperError::MalformedHotspotData(err.to_string()))
}

/// Runs the whole pipeline over a document.
pub fn read_entries(document: &str) -> MapperResult<Vec<AreaEntry>> {
    let literal = extract_literal(document)?;
    parse_literal(&normalize_literal(literal))
}
