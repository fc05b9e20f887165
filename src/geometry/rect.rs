//! Axis-aligned rectangles in canvas pixel space

/// Rectangle with a top-left origin and `f64` extents
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Rect {
    /// Left edge
    pub x: f64,
    /// Top edge
    pub y: f64,
    /// Horizontal extent
    pub width: f64,
    /// Vertical extent
    pub height: f64,
}

impl Rect {
    /// Create a rectangle from its origin and size
    pub const fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Exclusive right edge
    pub const fn right(&self) -> f64 {
        self.x + self.width
    }

    /// Exclusive bottom edge
    pub const fn bottom(&self) -> f64 {
        self.y + self.height
    }

    /// Horizontal centre
    pub const fn center_x(&self) -> f64 {
        self.x + self.width / 2.0
    }

    /// Vertical centre
    pub const fn center_y(&self) -> f64 {
        self.y + self.height / 2.0
    }

    /// Same size, moved by `(dx, dy)`
    #[must_use]
    pub const fn translated(&self, dx: f64, dy: f64) -> Self {
        Self::new(self.x + dx, self.y + dy, self.width, self.height)
    }

    /// Whether the two rectangles share any area
    pub const fn intersects(&self, other: &Self) -> bool {
        self.x < other.right()
            && other.x < self.right()
            && self.y < other.bottom()
            && other.y < self.bottom()
    }
}
