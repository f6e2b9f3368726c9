//! Overlap enumeration.
//!
//! Finds every group of two or more circles in which each pair overlaps.
//! The search is depth-first over circle indices with a forward-only cursor,
//! so each combination is visited once and no permutation is ever produced.
//! A candidate is rejected as soon as it misses one existing member, which
//! cuts off whole branches when circles are spread apart.
//!
//! Worst case is exponential in the number of circles; diagrams are small.

use super::types::{Circle, Color, Overlap};
use crate::error::{EngineError, EngineResult};
use std::collections::HashSet;

/// Enumerates all mutually overlapping groups and returns them as fresh
/// overlaps with ids `0..n` in discovery order, sorted for rendering.
pub fn find_overlaps(circles: &[Circle], base_color: Color) -> EngineResult<Vec<Overlap>> {
    validate_circles(circles)?;

    let groups = extend_group(circles, &[], 0);
    let mut overlaps: Vec<Overlap> = groups
        .into_iter()
        .enumerate()
        .map(|(id, group)| {
            let members = group.into_iter().map(|i| circles[i].id).collect();
            Overlap::new(id, members, base_color)
        })
        .collect();

    sort_for_render(&mut overlaps);
    tracing::debug!(
        circles = circles.len(),
        overlaps = overlaps.len(),
        "enumerated overlaps"
    );
    Ok(overlaps)
}

/// Stable ascending sort by member count.
///
/// Regions with fewer members cover more area and are drawn first, so the
/// narrower regions filled after them land on top. Ties keep discovery order.
pub fn sort_for_render(overlaps: &mut [Overlap]) {
    overlaps.sort_by_key(|o| o.len());
}

/// Returns every qualifying group reachable by extending `group` with
/// circles at index `start` or later. `group` holds indices into `circles`.
fn extend_group(circles: &[Circle], group: &[usize], start: usize) -> Vec<Vec<usize>> {
    let mut found = Vec::new();
    if group.len() > 1 {
        found.push(group.to_vec());
    }

    for candidate in start..circles.len() {
        let fits = group
            .iter()
            .all(|&member| circles[member].overlaps(&circles[candidate]));
        if fits {
            let mut next = Vec::with_capacity(group.len() + 1);
            next.extend_from_slice(group);
            next.push(candidate);
            found.extend(extend_group(circles, &next, candidate + 1));
        }
    }

    found
}

fn validate_circles(circles: &[Circle]) -> EngineResult<()> {
    let mut seen = HashSet::with_capacity(circles.len());
    for circle in circles {
        circle.validate()?;
        if !seen.insert(circle.id) {
            return Err(EngineError::DuplicateCircle(circle.id));
        }
    }
    Ok(())
}
