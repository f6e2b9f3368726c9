//! The circle diagram model and the passes that run over it.

pub mod types;
pub use types::*;

pub mod overlaps;
pub use overlaps::{find_overlaps, sort_for_render};

pub mod pieces;
pub use pieces::{selectable_pieces, PieceDeriver};

pub mod render;
pub use render::{Canvas, CircleDrawState, CommandRecorder, DrawCommand, Frame, RenderPass};

#[cfg(test)]
mod tests_overlaps;
#[cfg(test)]
mod tests_render;
