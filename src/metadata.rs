use std::{collections::BTreeMap, sync::LazyLock};

use regex::Regex;
use serde::Serialize;

const MARKER: &str = "---";

// [[wiki links]] and <% template tags %>
static LINK_PATTERN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\[\[.*?\]\]").unwrap());
static TEMPLATE_PATTERN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<%.*?%>").unwrap());

/// Flat scalar key/value pairs from a note's frontmatter block.
#[derive(Serialize, Debug, Clone, Default, PartialEq, Eq)]
#[serde(transparent)]
pub(crate) struct Metadata(BTreeMap<String, String>);

impl Metadata {
    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    pub fn get_or<'a>(&'a self, key: &str, default: &'a str) -> &'a str {
        self.get(key).unwrap_or(default)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }
}

/// One `key: value` per line, values always strings. The block must start at
/// the very first byte and end at the next `---`.
pub(crate) fn extract(content: &str) -> Metadata {
    let mut metadata = Metadata::default();
    if !content.starts_with(MARKER) {
        return metadata;
    }

    let parts: Vec<_> = content.splitn(3, MARKER).collect();
    if parts.len() < 3 {
        return metadata;
    }

    for line in parts[1].trim().lines() {
        let Some((key, value)) = line.trim().split_once(':') else {
            continue;
        };
        let value = clean_value(value);
        if !value.is_empty() {
            metadata.0.insert(key.trim().to_string(), value);
        }
    }

    metadata
}

fn clean_value(raw: &str) -> String {
    let value = unquote(raw.trim());
    let value = LINK_PATTERN.replace_all(value, "");
    let value = TEMPLATE_PATTERN.replace_all(&value, "");
    value.trim().to_string()
}

/// Strips one layer of matching surrounding quotes.
fn unquote(value: &str) -> &str {
    for quote in ['"', '\''] {
        if value.len() >= 2 && value.starts_with(quote) && value.ends_with(quote) {
            return &value[1..value.len() - 1];
        }
    }
    value
}
