use graph::{Group, LinkId};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

pub const INPUT_PREFIX: &str = "Enable ";
pub const BOOLEAN_INPUT: &str = "BOOLEAN";

pub fn input_name(title: &str) -> String {
    format!("{INPUT_PREFIX}{title}")
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InputSlot {
    pub name: String,
    pub kind: String,
    #[serde(default)]
    pub link: Option<LinkId>,
}

impl InputSlot {
    pub fn for_group(title: &str) -> Self {
        Self {
            name: input_name(title),
            kind: BOOLEAN_INPUT.to_string(),
            link: None,
        }
    }

    /// Title of the group this slot enables, if it is a group slot.
    pub fn group_title(&self) -> Option<&str> {
        self.name.strip_prefix(INPUT_PREFIX)
    }
}

/// Group title to input index, in the order the last pass visited groups.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GroupInputMap {
    entries: Vec<(String, usize)>,
}

impl GroupInputMap {
    fn insert(&mut self, title: &str, index: usize) {
        match self.entries.iter_mut().find(|(t, _)| t == title) {
            Some(entry) => entry.1 = index,
            None => self.entries.push((title.to_string(), index)),
        }
    }

    pub fn get(&self, title: &str) -> Option<usize> {
        self.entries
            .iter()
            .find(|(t, _)| t == title)
            .map(|(_, index)| *index)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, usize)> {
        self.entries.iter().map(|(title, index)| (title.as_str(), *index))
    }

    pub fn titles(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(title, _)| title.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Brings `inputs` in line with `groups` and returns the new map.
///
/// Slots for vanished groups are removed. Slots for surviving groups stay
/// where they are, so their wiring is untouched even if the desired order
/// changed. Slots for new groups are inserted after the last slot already
/// placed this pass, ahead of the first following slot whose name does not
/// sort before theirs.
pub fn reconcile_inputs(inputs: &mut Vec<InputSlot>, groups: &[Group]) -> GroupInputMap {
    let desired: HashSet<&str> = groups.iter().map(|g| g.title.as_str()).collect();

    let mut existing: HashMap<String, usize> = HashMap::new();
    let mut stale: Vec<usize> = Vec::new();
    for (index, input) in inputs.iter().enumerate() {
        let Some(title) = input.group_title() else {
            continue;
        };
        if existing.contains_key(title) {
            log::warn!("duplicate input {:?} at {index}, removing it", input.name);
            stale.push(index);
        } else {
            existing.insert(title.to_string(), index);
        }
    }
    log::debug!("existing group inputs: {:?}", existing.keys().collect::<Vec<_>>());

    stale.extend(
        existing
            .iter()
            .filter(|(title, _)| !desired.contains(title.as_str()))
            .map(|(_, index)| *index),
    );
    stale.sort_unstable_by(|a, b| b.cmp(a));
    for removed in stale {
        inputs.remove(removed);
        existing.retain(|_, index| *index != removed);
        for index in existing.values_mut() {
            if *index > removed {
                *index -= 1;
            }
        }
    }

    let mut map = GroupInputMap::default();
    let mut cursor = 0;
    for group in groups {
        if map.get(&group.title).is_some() {
            log::warn!("duplicate group title {:?}, keeping the first", group.title);
            continue;
        }
        if let Some(&index) = existing.get(&group.title) {
            map.insert(&group.title, index);
            cursor = cursor.max(index + 1);
            continue;
        }

        let name = input_name(&group.title);
        let mut insert_at = cursor;
        while insert_at < inputs.len() {
            let current = &inputs[insert_at].name;
            if !current.is_empty() && *current < name {
                insert_at += 1;
            } else {
                break;
            }
        }
        inputs.insert(insert_at, InputSlot::for_group(&group.title));
        for index in existing.values_mut() {
            if *index >= insert_at {
                *index += 1;
            }
        }
        map.insert(&group.title, insert_at);
        cursor = insert_at + 1;
    }
    map
}
