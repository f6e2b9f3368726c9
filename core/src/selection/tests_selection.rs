use crate::diagram::{Circle, CircleId, RegionKey};
use crate::selection::{SelectionFilter, SelectionState};

fn key(raw: &[u32]) -> RegionKey {
    raw.iter().map(|r| CircleId(*r)).collect()
}

#[test]
fn test_choose_basic() {
    let mut state = SelectionState::new();

    assert!(state.choose(key(&[0]), false));
    assert!(state.is_chosen(&key(&[0])));
    assert_eq!(state.targets.len(), 1);

    // Replace
    assert!(state.choose(key(&[0, 1]), false));
    assert!(state.is_chosen(&key(&[1, 0])));
    assert!(!state.is_chosen(&key(&[0])));
}

#[test]
fn test_choose_multi() {
    let mut state = SelectionState::new();
    state.choose(key(&[0]), false);
    state.choose(key(&[1, 2]), true);

    assert!(state.is_chosen(&key(&[0])));
    assert!(state.is_chosen(&key(&[2, 1])));
    assert_eq!(state.targets.len(), 2);
}

#[test]
fn test_choose_rejects_empty() {
    let mut state = SelectionState::new();
    assert!(!state.choose(RegionKey::default(), true));
    assert!(state.targets.is_empty());
}

#[test]
fn test_toggle() {
    let mut state = SelectionState::new();
    assert!(state.toggle(key(&[0, 1])));
    assert!(state.is_chosen(&key(&[0, 1])));
    assert!(!state.toggle(key(&[1, 0])));
    assert!(state.targets.is_empty());
}

#[test]
fn test_filter_logic() {
    let mut state = SelectionState::new();
    state.set_filter(SelectionFilter::Region);
    assert_eq!(state.active_filter, SelectionFilter::Region);

    assert!(!state.choose(key(&[0]), true));
    assert!(state.choose(key(&[0, 1]), true));

    state.set_filter(SelectionFilter::Circle);
    assert!(state.choose(key(&[2]), true));
    assert!(!state.choose(key(&[2, 3]), true));
}

#[test]
fn test_selected_region_requires_several_circles() {
    let mut state = SelectionState::new();
    assert!(!state.select_region(Some(key(&[0]))));
    assert_eq!(state.selected_region(), None);

    assert!(state.select_region(Some(key(&[0, 1]))));
    assert_eq!(state.selected_region(), Some(&key(&[0, 1])));

    // A single circle leaves the raised region in place
    assert!(!state.select_region(Some(key(&[1]))));
    assert_eq!(state.selected_region(), Some(&key(&[0, 1])));

    state.clear();
    assert_eq!(state.selected_region(), None);
}

#[test]
fn test_selection_group_restore() {
    let mut state = SelectionState::new();
    state.choose(key(&[0]), false);
    state.choose(key(&[0, 1]), true);
    state.select_region(Some(key(&[0, 1])));
    state.create_group("SavedSelection");

    state.clear();
    assert!(state.targets.is_empty());

    assert!(state.restore_group("SavedSelection"));
    assert_eq!(state.targets.len(), 2);
    assert_eq!(state.selected_region(), Some(&key(&[0, 1])));

    assert!(!state.restore_group("NonExistent"));
}

#[test]
fn test_selection_group_delete_and_list() {
    let mut state = SelectionState::new();
    state.choose(key(&[0]), false);
    state.create_group("Beta");
    state.choose(key(&[1]), true);
    state.choose(key(&[1, 2]), true);
    state.create_group("Alpha");

    let groups = state.list_groups();
    assert_eq!(groups, vec![("Alpha".to_string(), 3), ("Beta".to_string(), 1)]);

    assert!(state.delete_group("Beta"));
    assert!(!state.delete_group("Beta"));
    assert_eq!(state.list_groups().len(), 1);
}

#[test]
fn test_selection_group_overwrite() {
    let mut state = SelectionState::new();
    state.choose(key(&[0]), false);
    state.create_group("Overwrite");

    state.choose(key(&[1]), false);
    state.create_group("Overwrite");

    let group = state.groups.get("Overwrite").unwrap();
    assert_eq!(group.targets.len(), 1);
    assert!(group.targets.contains(&key(&[1])));
}

#[test]
fn test_validate_drops_missing_circles() {
    let mut state = SelectionState::new();
    state.choose(key(&[0]), true);
    state.choose(key(&[1]), true);
    state.choose(key(&[0, 1]), true);
    state.choose(key(&[0, 2]), true);
    state.select_region(Some(key(&[0, 1])));

    let circles = vec![
        Circle::new(CircleId(0), 0.0, 0.0, 10.0),
        Circle::new(CircleId(2), 5.0, 0.0, 10.0),
    ];
    let report = state.validate(&circles);

    assert_eq!(report.kept, vec![key(&[0]), key(&[0, 2])]);
    assert_eq!(report.lost, vec![key(&[0, 1]), key(&[1])]);
    assert_eq!(state.targets.len(), 2);
    assert_eq!(state.selected_region(), None);
}
