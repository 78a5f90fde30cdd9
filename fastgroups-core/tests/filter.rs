use fastgroups_core::{filter_and_sort, visible_groups, RemoteConfig};
use graph::{GraphDefinition, Group, GroupDefinition, MemoryHost, SortMode};
use serde_json::json;

fn titles(groups: &[Group]) -> Vec<&str> {
    groups.iter().map(|g| g.title.as_str()).collect()
}

fn config(value: serde_json::Value) -> RemoteConfig {
    RemoteConfig::from_properties(value.as_object().expect("object"))
}

fn fruit() -> Vec<Group> {
    vec![Group::new("Cherry"), Group::new("Banana"), Group::new("Apple")]
}

#[test]
fn position_keeps_provider_order() {
    let sorted = filter_and_sort(fruit(), &RemoteConfig::default(), 0);
    assert_eq!(titles(&sorted), vec!["Cherry", "Banana", "Apple"]);
}

#[test]
fn alphanumeric_sorts_by_title() {
    let cfg = config(json!({"sort": "alphanumeric"}));
    let sorted = filter_and_sort(fruit(), &cfg, 0);
    assert_eq!(titles(&sorted), vec!["Apple", "Banana", "Cherry"]);
}

#[test]
fn custom_alphabet_orders_matched_tokens_first() {
    let cfg = config(json!({"sort": "custom alphabet", "customSortAlphabet": "b,a"}));
    let sorted = filter_and_sort(fruit(), &cfg, 0);
    assert_eq!(titles(&sorted), vec!["Banana", "Apple", "Cherry"]);
}

#[test]
fn custom_alphabet_breaks_ties_by_title() {
    let groups = vec![
        Group::new("zeta"),
        Group::new("Beta 2"),
        Group::new("yak"),
        Group::new("Beta 1"),
    ];
    let cfg = config(json!({"sort": "custom alphabet", "customSortAlphabet": "B"}));
    let sorted = filter_and_sort(groups, &cfg, 0);
    assert_eq!(titles(&sorted), vec!["Beta 1", "Beta 2", "yak", "zeta"]);
}

#[test]
fn invalid_custom_alphabet_sorts_alphanumerically() {
    let cfg = config(json!({"sort": "custom alphabet", "customSortAlphabet": "\n"}));
    assert_eq!(cfg.sort, SortMode::Alphanumeric);
    let sorted = filter_and_sort(fruit(), &cfg, 0);
    assert_eq!(titles(&sorted), vec!["Apple", "Banana", "Cherry"]);
}

#[test]
fn sorting_is_deterministic() {
    let cfg = config(json!({"sort": "custom alphabet", "customSortAlphabet": "c,x"}));
    let first = filter_and_sort(fruit(), &cfg, 0);
    for _ in 0..5 {
        assert_eq!(filter_and_sort(fruit(), &cfg, 0), first);
    }
}

#[test]
fn color_filter_normalizes_both_sides() {
    let groups = vec![
        Group::new("Short").with_color("#ABC"),
        Group::new("Long").with_color("aabbcc"),
        Group::new("Other").with_color("#123456"),
        Group::new("Plain"),
    ];
    let cfg = config(json!({"matchColors": " #abc "}));
    let selected = filter_and_sort(groups, &cfg, 0);
    assert_eq!(titles(&selected), vec!["Short", "Long"]);
}

#[test]
fn color_filter_without_hex_digits_excludes_everything() {
    let groups = vec![
        Group::new("Colored").with_color("#a88"),
        Group::new("Plain"),
    ];
    let cfg = config(json!({"matchColors": "#"}));
    assert_eq!(cfg.match_colors, vec!["#"]);
    assert!(filter_and_sort(groups, &cfg, 0).is_empty());
}

#[test]
fn color_filter_accepts_presets() {
    let groups = vec![
        Group::new("Red").with_color("#a88"),
        Group::new("Blue").with_color("#88A"),
        Group::new("Green").with_color("#8a8"),
    ];
    let cfg = config(json!({"matchColors": "red,BLUE"}));
    let selected = filter_and_sort(groups, &cfg, 0);
    assert_eq!(titles(&selected), vec!["Red", "Blue"]);
}

#[test]
fn title_filter_is_case_insensitive() {
    let groups = vec![Group::new("Load Models"), Group::new("upscale"), Group::new("LOADER")];
    let cfg = config(json!({"matchTitle": "^load"}));
    let selected = filter_and_sort(groups, &cfg, 0);
    assert_eq!(titles(&selected), vec!["Load Models", "LOADER"]);
}

#[test]
fn invalid_title_pattern_excludes_everything() {
    let cfg = config(json!({"matchTitle": "(unclosed"}));
    assert!(filter_and_sort(fruit(), &cfg, 0).is_empty());
}

#[test]
fn scope_filter_limits_to_current_graph() {
    let groups = vec![
        Group::new("Root"),
        Group::new("Nested").in_graph(7),
        Group::new("Elsewhere").in_graph(9),
    ];
    let selected = filter_and_sort(groups.clone(), &RemoteConfig::default(), 7);
    assert_eq!(titles(&selected), vec!["Nested"]);

    let cfg = config(json!({"showAllGraphs": true}));
    let selected = filter_and_sort(groups, &cfg, 7);
    assert_eq!(titles(&selected), vec!["Root", "Nested", "Elsewhere"]);
}

#[test]
fn filters_are_conjunctive() {
    let groups = vec![
        Group::new("Load A").with_color("#a88"),
        Group::new("Load B").with_color("#8a8"),
        Group::new("Save A").with_color("#a88"),
        Group::new("Load C").with_color("#a88").in_graph(3),
    ];
    let cfg = config(json!({"matchColors": "red", "matchTitle": "load"}));
    let selected = filter_and_sort(groups, &cfg, 0);
    assert_eq!(titles(&selected), vec!["Load A"]);
}

#[test]
fn visible_groups_reads_from_provider() {
    let mut graph = GraphDefinition::empty("test");
    for (title, x, y) in [("Second", 0.0, 300.0), ("First", 0.0, 0.0), ("Aside", 400.0, 0.0)] {
        graph.groups.push(GroupDefinition {
            title: title.to_string(),
            color: None,
            graph: 0,
            bounding: [x, y, 100.0, 100.0],
        });
    }
    let host = MemoryHost::new(graph);

    let by_position = visible_groups(&host, &RemoteConfig::default());
    assert_eq!(titles(&by_position), vec!["First", "Aside", "Second"]);

    let alpha = visible_groups(&host, &config(json!({"sort": "alphanumeric"})));
    assert_eq!(titles(&alpha), vec!["Aside", "First", "Second"]);
}
