//! Anchor points and the per-edition map of already placed layers

use crate::geometry::rect::Rect;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

/// One of nine reference points on a rectangle
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum AnchorPosition {
    /// Middle of the rectangle
    #[default]
    Center,
    /// Top-left corner
    TopLeft,
    /// Middle of the top edge
    Top,
    /// Top-right corner
    TopRight,
    /// Middle of the left edge
    Left,
    /// Middle of the right edge
    Right,
    /// Bottom-left corner
    BottomLeft,
    /// Middle of the bottom edge
    Bottom,
    /// Bottom-right corner
    BottomRight,
}

impl AnchorPosition {
    /// Horizontal and vertical position as fractions of the rectangle size
    pub const fn fractions(self) -> (f64, f64) {
        match self {
            Self::Center => (0.5, 0.5),
            Self::TopLeft => (0.0, 0.0),
            Self::Top => (0.5, 0.0),
            Self::TopRight => (1.0, 0.0),
            Self::Left => (0.0, 0.5),
            Self::Right => (1.0, 0.5),
            Self::BottomLeft => (0.0, 1.0),
            Self::Bottom => (0.5, 1.0),
            Self::BottomRight => (1.0, 1.0),
        }
    }

    /// Canvas coordinates of this point on `rect`
    pub fn point_on(self, rect: &Rect) -> (f64, f64) {
        let (fx, fy) = self.fractions();
        (fx.mul_add(rect.width, rect.x), fy.mul_add(rect.height, rect.y))
    }

    const fn as_str(self) -> &'static str {
        match self {
            Self::Center => "center",
            Self::TopLeft => "top-left",
            Self::Top => "top",
            Self::TopRight => "top-right",
            Self::Left => "left",
            Self::Right => "right",
            Self::BottomLeft => "bottom-left",
            Self::Bottom => "bottom",
            Self::BottomRight => "bottom-right",
        }
    }
}

/// Which rectangle of a placed layer an anchor point refers to
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum AnchorMode {
    /// Follow the layer's `useBounds` option
    #[default]
    Inherit,
    /// Always the visible-content bounding box
    Bounds,
    /// Always the drawn rectangle including transparent padding
    Rect,
}

/// Parsed anchor point string such as `bounds-top-left`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct AnchorSpec {
    /// Reference point
    pub position: AnchorPosition,
    /// Rectangle the point is taken from
    pub mode: AnchorMode,
}

impl AnchorSpec {
    /// Spec with inherited mode
    pub const fn new(position: AnchorPosition) -> Self {
        Self {
            position,
            mode: AnchorMode::Inherit,
        }
    }

    /// Whether the point is taken from the bounding box
    pub const fn uses_bounds(&self, use_bounds: bool) -> bool {
        match self.mode {
            AnchorMode::Inherit => use_bounds,
            AnchorMode::Bounds => true,
            AnchorMode::Rect => false,
        }
    }
}

/// Anchor string that names none of the nine positions
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownAnchor(pub String);

impl fmt::Display for UnknownAnchor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown anchor point '{}'", self.0)
    }
}

impl std::error::Error for UnknownAnchor {}

impl FromStr for AnchorSpec {
    type Err = UnknownAnchor;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let text = s.trim().to_ascii_lowercase();
        let (mode, rest) = if let Some(rest) = text.strip_prefix("bounds-") {
            (AnchorMode::Bounds, rest)
        } else if let Some(rest) = text.strip_prefix("rect-") {
            (AnchorMode::Rect, rest)
        } else {
            (AnchorMode::Inherit, text.as_str())
        };

        let position = match rest {
            "center" | "middle" => AnchorPosition::Center,
            "top-left" => AnchorPosition::TopLeft,
            "top" => AnchorPosition::Top,
            "top-right" => AnchorPosition::TopRight,
            "left" => AnchorPosition::Left,
            "right" => AnchorPosition::Right,
            "bottom-left" => AnchorPosition::BottomLeft,
            "bottom" => AnchorPosition::Bottom,
            "bottom-right" => AnchorPosition::BottomRight,
            _ => return Err(UnknownAnchor(s.to_string())),
        };
        Ok(Self { position, mode })
    }
}

impl TryFrom<String> for AnchorSpec {
    type Error = UnknownAnchor;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<AnchorSpec> for String {
    fn from(spec: AnchorSpec) -> Self {
        let prefix = match spec.mode {
            AnchorMode::Inherit => "",
            AnchorMode::Bounds => "bounds-",
            AnchorMode::Rect => "rect-",
        };
        format!("{prefix}{}", spec.position.as_str())
    }
}

/// Geometry of a layer already drawn in the current edition
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlacedLayer {
    /// Drawn rectangle including transparent padding
    pub rect: Rect,
    /// Natural width of the asset
    pub original_width: f64,
    /// Natural height of the asset
    pub original_height: f64,
    /// Visible content in canvas space
    pub bounds: Rect,
}

impl PlacedLayer {
    /// Rectangle an anchor point of the given mode is taken from
    pub fn reference_rect(&self, spec: AnchorSpec, use_bounds: bool) -> Rect {
        if spec.uses_bounds(use_bounds) {
            self.bounds
        } else {
            self.rect
        }
    }
}

/// Placed layers of the current edition keyed by display name
///
/// Filled in draw order, so a layer can only anchor to layers drawn before
/// it. Cleared at the start of every edition.
#[derive(Debug, Clone, Default)]
pub struct AnchorMap {
    placed: HashMap<String, PlacedLayer>,
}

impl AnchorMap {
    /// Create an empty map
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a drawn layer, replacing an earlier layer of the same name
    pub fn publish(&mut self, name: &str, layer: PlacedLayer) {
        self.placed.insert(name.to_string(), layer);
    }

    /// Geometry of a previously drawn layer
    pub fn get(&self, name: &str) -> Option<&PlacedLayer> {
        self.placed.get(name)
    }

    /// Whether a layer of that name has been drawn
    pub fn contains(&self, name: &str) -> bool {
        self.placed.contains_key(name)
    }

    /// Number of published layers
    pub fn len(&self) -> usize {
        self.placed.len()
    }

    /// Whether nothing has been published yet
    pub fn is_empty(&self) -> bool {
        self.placed.is_empty()
    }

    /// Forget every published layer
    pub fn clear(&mut self) {
        self.placed.clear();
    }
}
