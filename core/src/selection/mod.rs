use crate::diagram::{Circle, CircleId, RegionKey};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap, HashSet};

#[cfg(test)]
mod tests_selection;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SelectionFilter {
    /// Only single circles can be chosen.
    Circle,
    /// Only multi-circle regions can be chosen.
    Region,
    Any,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SelectionGroup {
    pub name: String,
    pub targets: BTreeSet<RegionKey>,
    pub selected_region: Option<RegionKey>,
}

/// Selection that outlives individual passes.
///
/// Targets are circle-id sets, so they keep pointing at the same region
/// however the overlap ids get renumbered.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SelectionState {
    /// Everything currently highlighted.
    pub targets: BTreeSet<RegionKey>,
    /// The region raised to the top of the draw order, if any.
    pub selected_region: Option<RegionKey>,
    pub active_filter: SelectionFilter,
    pub groups: HashMap<String, SelectionGroup>,
}

impl Default for SelectionState {
    fn default() -> Self {
        Self {
            targets: BTreeSet::new(),
            selected_region: None,
            active_filter: SelectionFilter::Any,
            groups: HashMap::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResolutionReport {
    /// Targets whose circles all still exist.
    pub kept: Vec<RegionKey>,
    /// Targets dropped because a circle they name is gone.
    pub lost: Vec<RegionKey>,
}

impl SelectionState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_filter(&mut self, filter: SelectionFilter) {
        self.active_filter = filter;
    }

    fn matches_filter(&self, key: &RegionKey) -> bool {
        match self.active_filter {
            SelectionFilter::Any => true,
            SelectionFilter::Circle => key.len() == 1,
            SelectionFilter::Region => key.len() > 1,
        }
    }

    /// Adds `key` to the highlighted targets, replacing them unless `multi_select`.
    /// Returns false if the key is empty or filtered out.
    pub fn choose(&mut self, key: RegionKey, multi_select: bool) -> bool {
        if key.is_empty() || !self.matches_filter(&key) {
            return false;
        }
        if !multi_select {
            self.targets.clear();
        }
        self.targets.insert(key);
        true
    }

    /// Flips `key` in or out of the targets. Returns whether it is chosen afterwards.
    pub fn toggle(&mut self, key: RegionKey) -> bool {
        if self.targets.remove(&key) {
            false
        } else {
            self.choose(key, true)
        }
    }

    pub fn unchoose(&mut self, key: &RegionKey) {
        self.targets.remove(key);
    }

    pub fn is_chosen(&self, key: &RegionKey) -> bool {
        self.targets.contains(key)
    }

    pub fn targets(&self) -> impl Iterator<Item = &RegionKey> {
        self.targets.iter()
    }

    /// Sets the region drawn on top. A key naming fewer than two circles is
    /// not a region: it is refused and the current one is kept.
    pub fn select_region(&mut self, key: Option<RegionKey>) -> bool {
        match key {
            Some(key) if key.len() < 2 => false,
            key => {
                self.selected_region = key;
                true
            }
        }
    }

    pub fn selected_region(&self) -> Option<&RegionKey> {
        self.selected_region.as_ref()
    }

    pub fn clear(&mut self) {
        self.targets.clear();
        self.selected_region = None;
    }

    /// Saves the current selection under `name`, overwriting any group of that name.
    pub fn create_group(&mut self, name: &str) {
        let group = SelectionGroup {
            name: name.to_string(),
            targets: self.targets.clone(),
            selected_region: self.selected_region.clone(),
        };
        self.groups.insert(name.to_string(), group);
    }

    /// Returns true if the group existed and the selection was restored.
    pub fn restore_group(&mut self, name: &str) -> bool {
        if let Some(group) = self.groups.get(name) {
            self.targets = group.targets.clone();
            self.selected_region = group.selected_region.clone();
            true
        } else {
            false
        }
    }

    pub fn delete_group(&mut self, name: &str) -> bool {
        self.groups.remove(name).is_some()
    }

    /// (name, target count) for every group, sorted by name.
    pub fn list_groups(&self) -> Vec<(String, usize)> {
        let mut result: Vec<_> = self
            .groups
            .iter()
            .map(|(name, group)| (name.clone(), group.targets.len()))
            .collect();
        result.sort_by(|a, b| a.0.cmp(&b.0));
        result
    }

    /// Drops targets that name circles no longer present. Saved groups are
    /// left untouched.
    pub fn validate(&mut self, circles: &[Circle]) -> ResolutionReport {
        let live: HashSet<CircleId> = circles.iter().map(|c| c.id).collect();
        let resolves = |key: &RegionKey| key.ids().all(|id| live.contains(&id));

        let (kept, lost): (Vec<RegionKey>, Vec<RegionKey>) =
            std::mem::take(&mut self.targets).into_iter().partition(|k| resolves(k));
        self.targets = kept.iter().cloned().collect();

        if let Some(region) = &self.selected_region {
            if !resolves(region) {
                self.selected_region = None;
            }
        }

        ResolutionReport { kept, lost }
    }
}
