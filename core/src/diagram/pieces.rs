//! Selectable pieces: the labels a selection menu offers.

use super::types::{Circle, CircleId, Overlap, Piece};
use crate::naming;

/// One singleton piece per circle (circle order), then one piece per overlap
/// (overlap order, members in the overlap's own order).
pub fn selectable_pieces(circle_ids: &[CircleId], overlaps: &[Overlap]) -> Vec<Piece> {
    let singles = circle_ids
        .iter()
        .map(|id| Piece(vec![naming::id_to_name(*id)]));
    let regions = overlaps
        .iter()
        .map(|o| Piece(o.members.iter().map(|id| naming::id_to_name(*id)).collect()));
    singles.chain(regions).collect()
}

/// Memoizing wrapper around [`selectable_pieces`].
///
/// The cached list is reused only while both the circle ids and the overlap
/// list compare equal to the last inputs.
#[derive(Debug, Default, Clone)]
pub struct PieceDeriver {
    prev_circle_ids: Vec<CircleId>,
    prev_overlaps: Vec<Overlap>,
    memo: Option<Vec<Piece>>,
    computations: usize,
}

impl PieceDeriver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn derive(&mut self, circles: &[Circle], overlaps: &[Overlap]) -> &[Piece] {
        let unchanged = self.memo.is_some()
            && circles.len() == self.prev_circle_ids.len()
            && circles
                .iter()
                .zip(&self.prev_circle_ids)
                .all(|(c, id)| c.id == *id)
            && overlaps == self.prev_overlaps.as_slice();

        if unchanged {
            tracing::trace!("selectable pieces served from memo");
        } else {
            self.prev_circle_ids = circles.iter().map(|c| c.id).collect();
            self.prev_overlaps = overlaps.to_vec();
            self.memo = Some(selectable_pieces(&self.prev_circle_ids, overlaps));
            self.computations += 1;
        }

        self.memo.as_deref().unwrap_or_default()
    }

    /// Drops the cached result so the next call recomputes.
    pub fn invalidate(&mut self) {
        self.memo = None;
    }

    /// How many times the pieces were actually rebuilt.
    pub fn computations(&self) -> usize {
        self.computations
    }
}
