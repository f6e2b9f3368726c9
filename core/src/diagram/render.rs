//! Render pass orchestration.
//!
//! A pass rebuilds every overlap from scratch, orders them for drawing,
//! raises the selected region to the top, resolves highlight colours and
//! hands the result to a [`Canvas`]. Nothing from a previous pass is reused
//! except what the [`SelectionState`] carries, which is keyed by circle-id
//! sets rather than by overlap ids.

use super::overlaps::find_overlaps;
use super::types::{Circle, CircleId, Color, Overlap, Piece, RegionKey};
use crate::config::EngineConfig;
use crate::error::EngineResult;
use crate::geometry::{Disc, Point2};
use crate::selection::SelectionState;
use serde::{Deserialize, Serialize};

/// Resolved draw state of one circle for the current pass.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CircleDrawState {
    pub id: CircleId,
    pub center: Point2,
    pub radius: f64,
    pub fill: Color,
    pub outline: Color,
    pub outline_width: f64,
}

impl CircleDrawState {
    pub fn resolve(circle: &Circle, config: &EngineConfig) -> Self {
        Self {
            id: circle.id,
            center: circle.center,
            radius: circle.radius,
            fill: circle.color,
            outline: if circle.selected {
                config.outline_selected
            } else {
                config.outline_unselected
            },
            outline_width: config.outline_width,
        }
    }

    pub fn disc(&self) -> Disc {
        Disc::new(self.center, self.radius)
    }
}

/// Output of one recomputation pass.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderPass {
    /// Enumerated overlaps in size order, base colours only.
    pub regions: Vec<Overlap>,
    /// Overlaps in final draw order with highlights applied.
    pub draw_order: Vec<Overlap>,
    pub circles: Vec<CircleDrawState>,
    /// Chosen targets that matched nothing this pass.
    pub unmatched: Vec<RegionKey>,
}

impl RenderPass {
    pub fn run(
        circles: &[Circle],
        selection: &SelectionState,
        config: &EngineConfig,
    ) -> EngineResult<Self> {
        let regions = find_overlaps(circles, config.base_color)?;

        let mut draw_order = regions.clone();
        if let Some(key) = selection.selected_region() {
            if !raise_region(&mut draw_order, key) {
                tracing::debug!(region = %key.label(), "selected region not present this pass");
            }
        }

        let mut states: Vec<CircleDrawState> = circles
            .iter()
            .map(|c| CircleDrawState::resolve(c, config))
            .collect();

        let unmatched = apply_highlights(
            &mut states,
            &mut draw_order,
            selection.targets(),
            config.highlight_color,
        );
        for key in &unmatched {
            tracing::warn!(target_label = %key.label(), "selection target matches no circle or region");
        }

        Ok(Self {
            regions,
            draw_order,
            circles: states,
            unmatched,
        })
    }

    pub fn into_frame(self, pieces: Vec<Piece>) -> Frame {
        Frame {
            overlaps: self.draw_order,
            circles: self.circles,
            pieces,
        }
    }
}

/// Moves the overlap matching `key` to the end of the list so it draws last.
/// Returns false when no overlap matches.
pub fn raise_region(overlaps: &mut Vec<Overlap>, key: &RegionKey) -> bool {
    match overlaps.iter().position(|o| o.matches(key)) {
        Some(pos) => {
            let raised = overlaps.remove(pos);
            overlaps.push(raised);
            true
        }
        None => false,
    }
}

/// Paints every chosen target with `color`: single-id targets colour their
/// circle, larger targets colour the overlap with exactly that id set.
/// Returns the targets that found nothing to paint.
pub fn apply_highlights<'a, I>(
    circles: &mut [CircleDrawState],
    overlaps: &mut [Overlap],
    targets: I,
    color: Color,
) -> Vec<RegionKey>
where
    I: IntoIterator<Item = &'a RegionKey>,
{
    let mut unmatched = Vec::new();
    for key in targets {
        let mut hit = false;
        match key.as_circle() {
            Some(id) => {
                for circle in circles.iter_mut().filter(|c| c.id == id) {
                    circle.fill = color;
                    hit = true;
                }
            }
            None => {
                for overlap in overlaps.iter_mut().filter(|o| o.matches(key)) {
                    overlap.highlight(color);
                    hit = true;
                }
            }
        }
        if !hit {
            unmatched.push(key.clone());
        }
    }
    unmatched
}

/// Everything the drawing collaborator needs for one pass.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Frame {
    /// Overlaps in draw order.
    pub overlaps: Vec<Overlap>,
    pub circles: Vec<CircleDrawState>,
    pub pieces: Vec<Piece>,
}

impl Frame {
    pub fn circle(&self, id: CircleId) -> Option<&CircleDrawState> {
        self.circles.iter().find(|c| c.id == id)
    }

    pub fn region(&self, key: &RegionKey) -> Option<&Overlap> {
        self.overlaps.iter().find(|o| o.matches(key))
    }

    /// Circle fills, then each overlap clipped to all its members in list
    /// order, then circle outlines on top.
    pub fn draw<C: Canvas + ?Sized>(&self, canvas: &mut C) {
        canvas.clear();
        for circle in &self.circles {
            canvas.fill_circle(&circle.disc(), circle.fill);
        }
        for overlap in &self.overlaps {
            let clip: Vec<Disc> = overlap
                .members
                .iter()
                .filter_map(|id| self.circle(*id))
                .map(CircleDrawState::disc)
                .collect();
            canvas.fill_intersection(&clip, overlap.color);
        }
        for circle in &self.circles {
            canvas.stroke_circle(&circle.disc(), circle.outline, circle.outline_width);
        }
    }

    pub fn draw_commands(&self) -> Vec<DrawCommand> {
        let mut recorder = CommandRecorder::new();
        self.draw(&mut recorder);
        recorder.into_commands()
    }
}

/// Drawing collaborator. Implementations own pixels; the engine only sequences calls.
pub trait Canvas {
    fn clear(&mut self);

    fn fill_circle(&mut self, disc: &Disc, color: Color);

    /// Fills the area inside every disc in `clip`.
    fn fill_intersection(&mut self, clip: &[Disc], color: Color);

    fn stroke_circle(&mut self, disc: &Disc, color: Color, width: f64);
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum DrawCommand {
    Clear,
    FillCircle { disc: Disc, color: Color },
    FillIntersection { clip: Vec<Disc>, color: Color },
    StrokeCircle { disc: Disc, color: Color, width: f64 },
}

/// A [`Canvas`] that records calls, for remote front ends and tests.
#[derive(Debug, Default, Clone)]
pub struct CommandRecorder {
    commands: Vec<DrawCommand>,
}

impl CommandRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    pub fn into_commands(self) -> Vec<DrawCommand> {
        self.commands
    }
}

impl Canvas for CommandRecorder {
    fn clear(&mut self) {
        self.commands.clear();
        self.commands.push(DrawCommand::Clear);
    }

    fn fill_circle(&mut self, disc: &Disc, color: Color) {
        self.commands.push(DrawCommand::FillCircle { disc: *disc, color });
    }

    fn fill_intersection(&mut self, clip: &[Disc], color: Color) {
        self.commands.push(DrawCommand::FillIntersection {
            clip: clip.to_vec(),
            color,
        });
    }

    fn stroke_circle(&mut self, disc: &Disc, color: Color, width: f64) {
        self.commands.push(DrawCommand::StrokeCircle {
            disc: *disc,
            color,
            width,
        });
    }
}
