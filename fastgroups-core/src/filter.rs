//! Group selection and ordering for a controller's inputs.

use crate::config::RemoteConfig;
use graph::{GraphId, Group, GroupProvider, SortMode};
use regex::{Regex, RegexBuilder};

/// Editor color presets, mapped to their group color.
const GROUP_COLOR_PRESETS: [(&str, &str); 9] = [
    ("red", "#a88"),
    ("brown", "#b06634"),
    ("green", "#8a8"),
    ("blue", "#88a"),
    ("pale_blue", "#3f789e"),
    ("cyan", "#8aa"),
    ("purple", "#a1309b"),
    ("yellow", "#b58b2a"),
    ("black", "#444"),
];

/// `#abc`, `ABC` and `#aabbcc` all become `#aabbcc`.
pub fn normalize_hex(raw: &str) -> Option<String> {
    let hex = raw.replace('#', "").trim().to_lowercase();
    if hex.is_empty() {
        return None;
    }
    if hex.chars().count() == 3 {
        let expanded: String = hex.chars().flat_map(|c| [c, c]).collect();
        return Some(format!("#{expanded}"));
    }
    Some(format!("#{hex}"))
}

/// Entries with no hex digits are kept as a bare `#`, which no group color
/// matches.
pub fn normalize_filter_colors(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|color| color.trim().to_lowercase())
        .filter(|color| !color.is_empty())
        .map(|color| {
            let resolved = GROUP_COLOR_PRESETS
                .iter()
                .find(|(name, _)| *name == color)
                .map(|(_, hex)| hex.to_string())
                .unwrap_or(color);
            normalize_hex(&resolved).unwrap_or_else(|| "#".to_string())
        })
        .collect()
}

enum TitleFilter {
    Any,
    Pattern(Regex),
    Invalid,
}

impl TitleFilter {
    fn compile(pattern: Option<&str>) -> Self {
        let Some(pattern) = pattern else {
            return TitleFilter::Any;
        };
        match RegexBuilder::new(pattern).case_insensitive(true).build() {
            Ok(regex) => TitleFilter::Pattern(regex),
            Err(err) => {
                log::error!("invalid title filter {pattern:?}, excluding all groups: {err}");
                TitleFilter::Invalid
            }
        }
    }

    fn accepts(&self, title: &str) -> bool {
        match self {
            TitleFilter::Any => true,
            TitleFilter::Pattern(regex) => regex.is_match(title),
            TitleFilter::Invalid => false,
        }
    }
}

fn color_accepted(group: &Group, filter: &[String]) -> bool {
    if filter.is_empty() {
        return true;
    }
    group
        .color
        .as_deref()
        .and_then(normalize_hex)
        .is_some_and(|color| filter.contains(&color))
}

fn alphabet_index(title: &str, alphabet: &[String]) -> Option<usize> {
    let lowered = title.to_lowercase();
    alphabet
        .iter()
        .position(|token| lowered.starts_with(token.as_str()))
}

/// Applies the color, title and graph-scope filters, then orders what is
/// left. Position order is whatever order `groups` arrived in.
pub fn filter_and_sort(groups: Vec<Group>, config: &RemoteConfig, current_graph: GraphId) -> Vec<Group> {
    let title_filter = TitleFilter::compile(config.match_title.as_deref());
    let mut selected: Vec<Group> = groups
        .into_iter()
        .filter(|group| color_accepted(group, &config.match_colors))
        .filter(|group| title_filter.accepts(&group.title))
        .filter(|group| config.show_all_graphs || group.graph == current_graph)
        .collect();

    match (config.sort, config.custom_alphabet.as_deref()) {
        (SortMode::CustomAlphabet, Some(alphabet)) => {
            selected.sort_by_cached_key(|group| {
                (
                    alphabet_index(&group.title, alphabet).unwrap_or(usize::MAX),
                    group.title.clone(),
                )
            });
        }
        (SortMode::Alphanumeric, _) | (SortMode::CustomAlphabet, None) => {
            selected.sort_by(|a, b| a.title.cmp(&b.title));
        }
        (SortMode::Position, _) => {}
    }
    selected
}

/// Groups the controller should expose, fetched from `provider`.
pub fn visible_groups<P: GroupProvider + ?Sized>(provider: &P, config: &RemoteConfig) -> Vec<Group> {
    let groups = provider.groups(config.sort);
    log::debug!(
        "found {} groups: {:?}",
        groups.len(),
        groups.iter().map(|g| g.title.as_str()).collect::<Vec<_>>()
    );
    let selected = filter_and_sort(groups, config, provider.current_graph());
    log::debug!(
        "exposing inputs for {} groups: {:?}",
        selected.len(),
        selected.iter().map(|g| g.title.as_str()).collect::<Vec<_>>()
    );
    selected
}
