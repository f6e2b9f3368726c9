use crate::diagram::{find_overlaps, Circle, CircleId, Color, RegionKey};
use crate::error::EngineError;
use proptest::prelude::*;
use std::collections::HashSet;

fn circle(id: u32, x: f64, y: f64, r: f64) -> Circle {
    Circle::new(CircleId(id), x, y, r)
}

fn key(raw: &[u32]) -> RegionKey {
    raw.iter().map(|r| CircleId(*r)).collect()
}

fn layout_strategy() -> impl Strategy<Value = Vec<Circle>> {
    prop::collection::vec((0.0..300.0f64, 0.0..300.0f64, 20.0..100.0f64), 0..=8).prop_map(
        |discs| {
            discs
                .into_iter()
                .enumerate()
                .map(|(i, (x, y, r))| circle(i as u32, x, y, r))
                .collect()
        },
    )
}

/// Every subset of size >= 2 whose members pairwise overlap, by bitmask.
fn brute_force(circles: &[Circle]) -> HashSet<RegionKey> {
    let n = circles.len();
    let mut found = HashSet::new();
    for mask in 0u32..(1 << n) {
        if mask.count_ones() < 2 {
            continue;
        }
        let members: Vec<&Circle> = (0..n)
            .filter(|&i| mask & (1u32 << i) != 0)
            .map(|i| &circles[i])
            .collect();
        let pairwise = members
            .iter()
            .enumerate()
            .all(|(i, a)| members[i + 1..].iter().all(|b| a.overlaps(b)));
        if pairwise {
            found.insert(members.iter().map(|c| c.id).collect());
        }
    }
    found
}

#[test]
fn test_chain_has_no_triple() {
    let circles = vec![
        circle(0, 0.0, 0.0, 10.0),
        circle(1, 15.0, 0.0, 10.0),
        circle(2, 30.0, 0.0, 10.0),
    ];
    let overlaps = find_overlaps(&circles, Color::BLACK).unwrap();

    assert_eq!(overlaps.len(), 2);
    assert_eq!(overlaps[0].members, vec![CircleId(0), CircleId(1)]);
    assert_eq!(overlaps[1].members, vec![CircleId(1), CircleId(2)]);
    assert!(overlaps.iter().all(|o| !o.matches(&key(&[0, 1, 2]))));
}

#[test]
fn test_identical_circles_form_one_overlap() {
    let circles = vec![circle(0, 50.0, 50.0, 20.0), circle(1, 50.0, 50.0, 20.0)];
    let overlaps = find_overlaps(&circles, Color::BLACK).unwrap();

    assert_eq!(overlaps.len(), 1);
    assert_eq!(overlaps[0].id, 0);
    assert_eq!(overlaps[0].members, vec![CircleId(0), CircleId(1)]);
    assert_eq!(overlaps[0].color, Color::BLACK);
    assert_eq!(overlaps[0].base_color, Color::BLACK);
}

#[test]
fn test_mutual_triple_is_sorted_after_pairs() {
    let circles = vec![
        circle(0, 0.0, 0.0, 10.0),
        circle(1, 5.0, 0.0, 10.0),
        circle(2, 0.0, 5.0, 10.0),
    ];
    let overlaps = find_overlaps(&circles, Color::BLACK).unwrap();

    let labels: Vec<String> = overlaps.iter().map(|o| o.label()).collect();
    assert_eq!(labels, vec!["AB", "AC", "BC", "ABC"]);

    // Ids follow discovery order (AB, ABC, AC, BC); sorting keeps them attached.
    let ids: Vec<usize> = overlaps.iter().map(|o| o.id).collect();
    assert_eq!(ids, vec![0, 2, 3, 1]);
}

#[test]
fn test_touching_circles_produce_nothing() {
    let circles = vec![circle(0, 0.0, 0.0, 10.0), circle(1, 20.0, 0.0, 10.0)];
    assert!(find_overlaps(&circles, Color::BLACK).unwrap().is_empty());
}

#[test]
fn test_degenerate_inputs() {
    assert!(find_overlaps(&[], Color::BLACK).unwrap().is_empty());
    assert!(find_overlaps(&[circle(0, 0.0, 0.0, 5.0)], Color::BLACK)
        .unwrap()
        .is_empty());
}

#[test]
fn test_members_follow_list_order_not_id_order() {
    let circles = vec![circle(5, 0.0, 0.0, 10.0), circle(2, 5.0, 0.0, 10.0)];
    let overlaps = find_overlaps(&circles, Color::BLACK).unwrap();
    assert_eq!(overlaps[0].members, vec![CircleId(5), CircleId(2)]);
}

#[test]
fn test_invalid_geometry_is_rejected() {
    let circles = vec![circle(0, 0.0, 0.0, 10.0), circle(1, 5.0, 0.0, -3.0)];
    let err = find_overlaps(&circles, Color::BLACK).unwrap_err();
    assert!(matches!(err, EngineError::InvalidGeometry { id: CircleId(1), .. }));

    let circles = vec![circle(0, f64::NAN, 0.0, 10.0)];
    assert!(find_overlaps(&circles, Color::BLACK).is_err());
}

#[test]
fn test_duplicate_ids_are_rejected() {
    let circles = vec![circle(3, 0.0, 0.0, 10.0), circle(3, 5.0, 0.0, 10.0)];
    assert_eq!(
        find_overlaps(&circles, Color::BLACK).unwrap_err(),
        EngineError::DuplicateCircle(CircleId(3))
    );
}

proptest! {
    #[test]
    fn test_matches_brute_force_on_random_layouts(circles in layout_strategy()) {
        let overlaps = find_overlaps(&circles, Color::BLACK).unwrap();
        let expected = brute_force(&circles);

        let keys: HashSet<RegionKey> = overlaps.iter().map(|o| o.key()).collect();
        prop_assert_eq!(keys.len(), overlaps.len(), "duplicate overlap emitted");
        prop_assert_eq!(keys, expected);

        for overlap in &overlaps {
            let members: Vec<&Circle> = overlap
                .members
                .iter()
                .filter_map(|id| circles.iter().find(|c| c.id == *id))
                .collect();
            prop_assert_eq!(members.len(), overlap.members.len());
            for (i, a) in members.iter().enumerate() {
                for b in &members[i + 1..] {
                    prop_assert!(a.overlaps(b), "{} is not pairwise", overlap.label());
                }
            }
        }

        prop_assert!(overlaps.windows(2).all(|w| w[0].len() <= w[1].len()));

        let mut ids: Vec<usize> = overlaps.iter().map(|o| o.id).collect();
        ids.sort_unstable();
        prop_assert_eq!(ids, (0..overlaps.len()).collect::<Vec<_>>());
    }
}
