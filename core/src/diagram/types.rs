use crate::error::{EngineError, EngineResult};
use crate::geometry::{self, Disc, Point2, Vector2};
use crate::naming;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

/// Identifier of a circle. Stable for the circle's whole lifetime, unlike overlap ids.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CircleId(pub u32);

impl CircleId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for CircleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// An RGBA colour. Displays as a CSS `rgba(...)` string.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: f32,
}

impl Color {
    pub const BLACK: Color = Color::rgba(0, 0, 0, 1.0);
    pub const GREEN: Color = Color::rgba(0, 255, 0, 1.0);
    pub const WHITE: Color = Color::rgba(255, 255, 255, 1.0);
    pub const GREY: Color = Color::rgba(128, 128, 128, 1.0);
    pub const TRANSPARENT: Color = Color::rgba(0, 0, 0, 0.0);

    pub const fn rgba(r: u8, g: u8, b: u8, a: f32) -> Self {
        Self { r, g, b, a }
    }

    pub fn css(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "rgba({}, {}, {}, {})", self.r, self.g, self.b, self.a)
    }
}

/// A user-placed circle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Circle {
    pub id: CircleId,
    pub center: Point2,
    pub radius: f64,
    /// Outline emphasis toggled by the user. Independent of region selection.
    #[serde(default)]
    pub selected: bool,
    pub color: Color,
    /// Pointer-to-centre offset while the circle is being dragged.
    #[serde(default)]
    pub offset: Option<Vector2>,
}

impl Circle {
    pub fn new(id: CircleId, x: f64, y: f64, radius: f64) -> Self {
        Self {
            id,
            center: Point2::new(x, y),
            radius,
            selected: false,
            color: Color::TRANSPARENT,
            offset: None,
        }
    }

    pub fn with_color(mut self, color: Color) -> Self {
        self.color = color;
        self
    }

    pub fn disc(&self) -> Disc {
        Disc::new(self.center, self.radius)
    }

    pub fn overlaps(&self, other: &Circle) -> bool {
        geometry::overlaps(&self.disc(), &other.disc())
    }

    pub fn contains_point(&self, point: &Point2) -> bool {
        geometry::contains_point(&self.disc(), point)
    }

    pub fn near_edge(&self, point: &Point2, tolerance: f64) -> bool {
        geometry::near_edge(&self.disc(), point, tolerance)
    }

    pub fn name(&self) -> String {
        naming::id_to_name(self.id)
    }

    pub fn validate(&self) -> EngineResult<()> {
        match self.disc().defect() {
            Some(reason) => Err(EngineError::InvalidGeometry {
                id: self.id,
                reason: reason.to_string(),
            }),
            None => Ok(()),
        }
    }
}

/// Order-independent identity of a region: the set of circle ids it covers.
///
/// This is what survives from one pass to the next; overlap ids do not.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RegionKey(BTreeSet<CircleId>);

impl RegionKey {
    pub fn new<I: IntoIterator<Item = CircleId>>(ids: I) -> Self {
        Self(ids.into_iter().collect())
    }

    pub fn single(id: CircleId) -> Self {
        Self::new([id])
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// The circle this key names, if it names exactly one.
    pub fn as_circle(&self) -> Option<CircleId> {
        if self.0.len() == 1 {
            self.0.iter().next().copied()
        } else {
            None
        }
    }

    pub fn contains(&self, id: CircleId) -> bool {
        self.0.contains(&id)
    }

    pub fn ids(&self) -> impl Iterator<Item = CircleId> + '_ {
        self.0.iter().copied()
    }

    pub fn label(&self) -> String {
        naming::format_label(&self.ids().collect::<Vec<_>>())
    }
}

impl FromIterator<CircleId> for RegionKey {
    fn from_iter<I: IntoIterator<Item = CircleId>>(iter: I) -> Self {
        Self::new(iter)
    }
}

/// A set of two or more mutually overlapping circles found in one pass.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Overlap {
    /// Pass-local id. Reassigned from 0 on every pass.
    pub id: usize,
    /// Participating circles in discovery order.
    pub members: Vec<CircleId>,
    pub color: Color,
    /// Colour assigned at discovery; highlighting never touches it.
    pub base_color: Color,
}

impl Overlap {
    pub fn new(id: usize, members: Vec<CircleId>, base_color: Color) -> Self {
        Self {
            id,
            members,
            color: base_color,
            base_color,
        }
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    pub fn key(&self) -> RegionKey {
        RegionKey::new(self.members.iter().copied())
    }

    pub fn matches(&self, key: &RegionKey) -> bool {
        self.members.len() == key.len() && self.members.iter().all(|id| key.contains(*id))
    }

    pub fn highlight(&mut self, color: Color) {
        self.color = color;
    }

    pub fn revert_color(&mut self) {
        self.color = self.base_color;
    }

    pub fn label(&self) -> String {
        naming::format_label(&self.members)
    }
}

/// A user-facing selectable label: one name for a circle, several for a region.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Piece(pub Vec<String>);

impl Piece {
    pub fn names(&self) -> &[String] {
        &self.0
    }

    pub fn is_region(&self) -> bool {
        self.0.len() > 1
    }
}

impl fmt::Display for Piece {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.concat())
    }
}
