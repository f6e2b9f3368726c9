//! Diagram session: the single owner of circles and selection.
//!
//! Callers mutate the diagram through the session and call
//! [`DiagramSession::recompute`] whenever they need a fresh [`Frame`]. Every
//! recompute is a full pass; nothing is patched incrementally.

use crate::config::EngineConfig;
use crate::diagram::{Circle, CircleId, Frame, Piece, PieceDeriver, RegionKey, RenderPass};
use crate::error::{EngineError, EngineResult};
use crate::geometry::{Point2, Vector2};
use crate::naming;
use crate::selection::{ResolutionReport, SelectionState};
use tracing::{debug, info};


#[derive(Debug, Clone)]
pub struct DiagramSession {
    config: EngineConfig,
    circles: Vec<Circle>,
    selection: SelectionState,
    pieces: PieceDeriver,
    dragging: Option<CircleId>,
}

impl Default for DiagramSession {
    fn default() -> Self {
        Self::new(EngineConfig::default())
    }
}

impl DiagramSession {
    pub fn new(config: EngineConfig) -> Self {
        Self {
            config,
            circles: Vec::new(),
            selection: SelectionState::new(),
            pieces: PieceDeriver::new(),
            dragging: None,
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn circles(&self) -> &[Circle] {
        &self.circles
    }

    pub fn circle(&self, id: CircleId) -> Option<&Circle> {
        self.circles.iter().find(|c| c.id == id)
    }

    fn circle_mut(&mut self, id: CircleId) -> EngineResult<&mut Circle> {
        self.circles
            .iter_mut()
            .find(|c| c.id == id)
            .ok_or(EngineError::UnknownCircle(id))
    }

    pub fn selection(&self) -> &SelectionState {
        &self.selection
    }

    pub fn selection_mut(&mut self) -> &mut SelectionState {
        &mut self.selection
    }

    /// Lowest id not in use, so freed letters get reused before the alphabet runs out.
    fn allocate_id(&self) -> EngineResult<CircleId> {
        let mut candidate = 0u32;
        loop {
            let id = CircleId(candidate);
            if self.circle(id).is_none() {
                return Ok(id);
            }
            candidate = candidate
                .checked_add(1)
                .ok_or(EngineError::IdSpaceExhausted)?;
        }
    }

    /// Adds a circle at (x, y) and returns its id. `radius` defaults to the configured one.
    pub fn add_circle(&mut self, x: f64, y: f64, radius: Option<f64>) -> EngineResult<CircleId> {
        let id = self.allocate_id()?;
        let radius = radius.unwrap_or(self.config.default_radius);
        let circle = Circle::new(id, x, y, radius).with_color(self.config.circle_fill);
        self.insert_circle(circle)?;
        if !naming::is_nameable(id) {
            info!(id = %id, "circle added past the nameable range");
        }
        Ok(id)
    }

    /// Appends a fully specified circle. Fails on invalid geometry or a taken id.
    pub fn insert_circle(&mut self, circle: Circle) -> EngineResult<()> {
        circle.validate()?;
        if self.circle(circle.id).is_some() {
            return Err(EngineError::DuplicateCircle(circle.id));
        }
        debug!(id = %circle.id, name = %circle.name(), "circle added");
        self.circles.push(circle);
        Ok(())
    }

    /// Removes a circle and drops any selection that referenced it.
    pub fn remove_circle(&mut self, id: CircleId) -> EngineResult<(Circle, ResolutionReport)> {
        let pos = self
            .circles
            .iter()
            .position(|c| c.id == id)
            .ok_or(EngineError::UnknownCircle(id))?;
        let removed = self.circles.remove(pos);
        if self.dragging == Some(id) {
            self.dragging = None;
        }
        let report = self.selection.validate(&self.circles);
        if !report.lost.is_empty() {
            info!(lost = report.lost.len(), "removed stale selection targets");
        }
        Ok((removed, report))
    }

    pub fn move_circle(&mut self, id: CircleId, x: f64, y: f64) -> EngineResult<()> {
        let circle = self.circle_mut(id)?;
        let mut moved = circle.clone();
        moved.center = Point2::new(x, y);
        moved.validate()?;
        *circle = moved;
        Ok(())
    }

    pub fn resize_circle(&mut self, id: CircleId, radius: f64) -> EngineResult<()> {
        let circle = self.circle_mut(id)?;
        let mut resized = circle.clone();
        resized.radius = radius;
        resized.validate()?;
        *circle = resized;
        Ok(())
    }

    /// Flips a circle's outline selection flag. Returns the new value.
    pub fn toggle_circle(&mut self, id: CircleId) -> EngineResult<bool> {
        let circle = self.circle_mut(id)?;
        circle.selected = !circle.selected;
        Ok(circle.selected)
    }

    /// Topmost circle containing `point`. Later circles sit above earlier ones.
    pub fn circle_at(&self, point: &Point2) -> Option<CircleId> {
        self.circles
            .iter()
            .rev()
            .find(|c| c.contains_point(point))
            .map(|c| c.id)
    }

    /// Topmost circle whose outline passes within the edge tolerance of `point`.
    pub fn edge_at(&self, point: &Point2) -> Option<CircleId> {
        let tolerance = self.config.edge_tolerance;
        self.circles
            .iter()
            .rev()
            .find(|c| c.near_edge(point, tolerance))
            .map(|c| c.id)
    }

    /// Starts dragging the circle under `point`, remembering where it was grabbed.
    pub fn begin_drag(&mut self, point: Point2) -> Option<CircleId> {
        let id = self.circle_at(&point)?;
        let circle = self.circle_mut(id).ok()?;
        circle.offset = Some(circle.center - point);
        self.dragging = Some(id);
        Some(id)
    }

    /// Moves the dragged circle so the grab point follows `point`.
    /// Returns false when nothing is being dragged.
    pub fn drag_to(&mut self, point: Point2) -> EngineResult<bool> {
        let Some(id) = self.dragging else {
            return Ok(false);
        };
        let offset = self.circle_mut(id)?.offset.unwrap_or_else(Vector2::zeros);
        let target = point + offset;
        self.move_circle(id, target.x, target.y)?;
        Ok(true)
    }

    pub fn end_drag(&mut self) -> Option<CircleId> {
        let id = self.dragging.take()?;
        if let Ok(circle) = self.circle_mut(id) {
            circle.offset = None;
        }
        Some(id)
    }

    pub fn dragging(&self) -> Option<CircleId> {
        self.dragging
    }

    /// Chooses a highlight target by circle ids. See [`SelectionState::choose`].
    pub fn choose(&mut self, ids: &[CircleId], multi_select: bool) -> EngineResult<bool> {
        for id in ids {
            if self.circle(*id).is_none() {
                return Err(EngineError::UnknownCircle(*id));
            }
        }
        Ok(self.selection.choose(RegionKey::new(ids.iter().copied()), multi_select))
    }

    /// Chooses a highlight target by label, e.g. `"A"` or `"AB"`.
    pub fn choose_label(&mut self, label: &str, multi_select: bool) -> EngineResult<bool> {
        let ids = naming::parse_label(label)?;
        self.choose(&ids, multi_select)
    }

    /// Toggles a highlight target by circle ids. Returns whether it is now chosen.
    pub fn toggle(&mut self, ids: &[CircleId]) -> EngineResult<bool> {
        for id in ids {
            if self.circle(*id).is_none() {
                return Err(EngineError::UnknownCircle(*id));
            }
        }
        Ok(self.selection.toggle(RegionKey::new(ids.iter().copied())))
    }

    /// Toggles a target given as a piece's names.
    pub fn toggle_piece(&mut self, piece: &Piece) -> EngineResult<bool> {
        let ids = piece
            .names()
            .iter()
            .map(|name| {
                naming::name_to_id(name).ok_or_else(|| EngineError::UnknownLabel(name.clone()))
            })
            .collect::<EngineResult<Vec<_>>>()?;
        self.toggle(&ids)
    }

    pub fn unchoose(&mut self, ids: &[CircleId]) {
        self.selection.unchoose(&RegionKey::new(ids.iter().copied()));
    }

    /// Marks the region over `ids` as the one drawn on top. `None` clears it.
    pub fn select_region(&mut self, ids: Option<&[CircleId]>) -> EngineResult<()> {
        let Some(ids) = ids else {
            self.selection.select_region(None);
            return Ok(());
        };
        for id in ids {
            if self.circle(*id).is_none() {
                return Err(EngineError::UnknownCircle(*id));
            }
        }
        let key = RegionKey::new(ids.iter().copied());
        if key.len() < 2 {
            return Err(EngineError::NotARegion(key.label()));
        }
        self.selection.select_region(Some(key));
        Ok(())
    }

    pub fn clear_selection(&mut self) {
        self.selection.clear();
    }

    /// Restores a saved group, discarding targets whose circles are gone.
    pub fn restore_group(&mut self, name: &str) -> Option<ResolutionReport> {
        if !self.selection.restore_group(name) {
            return None;
        }
        Some(self.selection.validate(&self.circles))
    }

    /// Current selectable pieces, served from the memo when nothing changed.
    pub fn pieces(&mut self) -> EngineResult<Vec<Piece>> {
        let regions = crate::diagram::find_overlaps(&self.circles, self.config.base_color)?;
        Ok(self.pieces.derive(&self.circles, &regions).to_vec())
    }

    /// Runs a full pass and returns what the drawing side needs.
    pub fn recompute(&mut self) -> EngineResult<Frame> {
        let pass = RenderPass::run(&self.circles, &self.selection, &self.config)?;
        let pieces = self.pieces.derive(&self.circles, &pass.regions).to_vec();
        debug!(
            circles = self.circles.len(),
            overlaps = pass.regions.len(),
            pieces = pieces.len(),
            "recomputed diagram"
        );
        Ok(pass.into_frame(pieces))
    }
}
