use crate::filter::normalize_filter_colors;
use graph::SortMode;
use serde_json::{Map, Value};

pub const PROPERTY_SORT: &str = "sort";
pub const PROPERTY_SORT_CUSTOM_ALPHA: &str = "customSortAlphabet";
pub const PROPERTY_MATCH_COLORS: &str = "matchColors";
pub const PROPERTY_MATCH_TITLE: &str = "matchTitle";
pub const PROPERTY_SHOW_ALL_GRAPHS: &str = "showAllGraphs";

/// Properties whose change invalidates the current input list.
pub const REFRESH_PROPERTIES: [&str; 5] = [
    PROPERTY_SORT,
    PROPERTY_SORT_CUSTOM_ALPHA,
    PROPERTY_MATCH_COLORS,
    PROPERTY_MATCH_TITLE,
    PROPERTY_SHOW_ALL_GRAPHS,
];

/// Parsed view of a controller's property bag for one reconciliation pass.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RemoteConfig {
    pub sort: SortMode,
    /// Lower-cased prefix tokens. Only set when `sort` is custom alphabet.
    pub custom_alphabet: Option<Vec<String>>,
    /// Normalized `#rrggbb` colors; empty means no color filter.
    pub match_colors: Vec<String>,
    pub match_title: Option<String>,
    pub show_all_graphs: bool,
}

pub fn default_properties() -> Map<String, Value> {
    let mut map = Map::new();
    map.insert(PROPERTY_SORT.to_string(), Value::from(SortMode::Position.as_str()));
    map.insert(PROPERTY_SORT_CUSTOM_ALPHA.to_string(), Value::from(""));
    map.insert(PROPERTY_MATCH_COLORS.to_string(), Value::from(""));
    map.insert(PROPERTY_MATCH_TITLE.to_string(), Value::from(""));
    map.insert(PROPERTY_SHOW_ALL_GRAPHS.to_string(), Value::from(false));
    map
}

fn string_property<'a>(properties: &'a Map<String, Value>, key: &str) -> Option<&'a str> {
    properties.get(key).and_then(|v| v.as_str())
}

/// Splits a custom alphabet into prefix tokens. A comma anywhere switches to
/// comma-delimited tokens; otherwise every non-space character is a token.
/// Newlines are ignored in both forms.
pub fn parse_custom_alphabet(raw: &str) -> Option<Vec<String>> {
    let cleaned: String = raw.chars().filter(|c| *c != '\n' && *c != '\r').collect();
    if cleaned.trim().is_empty() {
        return None;
    }
    let lowered = cleaned.to_lowercase();
    // Tokens are trimmed and empty ones dropped.
    let tokens: Vec<String> = if lowered.contains(',') {
        lowered
            .split(',')
            .map(|token| token.trim())
            .filter(|token| !token.is_empty())
            .map(str::to_string)
            .collect()
    } else {
        lowered
            .trim()
            .chars()
            .filter(|c| !c.is_whitespace())
            .map(|c| c.to_string())
            .collect()
    };
    if tokens.is_empty() {
        None
    } else {
        Some(tokens)
    }
}

impl RemoteConfig {
    pub fn from_properties(properties: &Map<String, Value>) -> Self {
        let mut sort = string_property(properties, PROPERTY_SORT)
            .and_then(SortMode::parse)
            .unwrap_or_default();
        let mut custom_alphabet = None;
        if sort == SortMode::CustomAlphabet {
            custom_alphabet =
                string_property(properties, PROPERTY_SORT_CUSTOM_ALPHA).and_then(parse_custom_alphabet);
            if custom_alphabet.is_none() {
                sort = SortMode::Alphanumeric;
            }
        }

        let match_colors = string_property(properties, PROPERTY_MATCH_COLORS)
            .map(normalize_filter_colors)
            .unwrap_or_default();
        let match_title = string_property(properties, PROPERTY_MATCH_TITLE)
            .filter(|pattern| !pattern.trim().is_empty())
            .map(str::to_string);
        let show_all_graphs = properties
            .get(PROPERTY_SHOW_ALL_GRAPHS)
            .and_then(|v| v.as_bool())
            .unwrap_or(false);

        Self {
            sort,
            custom_alphabet,
            match_colors,
            match_title,
            show_all_graphs,
        }
    }
}
