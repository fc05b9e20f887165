//! Bounding boxes of visible content inside decoded assets

use crate::geometry::rect::Rect;
use image::RgbaImage;

/// Rectangle of pixels whose alpha exceeds a threshold
///
/// Expressed in the source image's own pixel space, independent of where or
/// how large the image is later drawn. `max_x` and `max_y` are exclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoundingBox {
    /// First content column
    pub min_x: u32,
    /// First content row
    pub min_y: u32,
    /// One past the last content column
    pub max_x: u32,
    /// One past the last content row
    pub max_y: u32,
    /// Width of the analysed image
    pub image_width: u32,
    /// Height of the analysed image
    pub image_height: u32,
    /// No pixel passed the threshold and the box covers the whole image
    pub degenerate: bool,
}

impl BoundingBox {
    /// Box covering a whole image
    pub const fn full(image_width: u32, image_height: u32) -> Self {
        Self {
            min_x: 0,
            min_y: 0,
            max_x: image_width,
            max_y: image_height,
            image_width,
            image_height,
            degenerate: true,
        }
    }

    /// Content width
    pub const fn width(&self) -> u32 {
        self.max_x - self.min_x
    }

    /// Content height
    pub const fn height(&self) -> u32 {
        self.max_y - self.min_y
    }

    /// Left content edge
    pub const fn left(&self) -> u32 {
        self.min_x
    }

    /// Exclusive right content edge
    pub const fn right(&self) -> u32 {
        self.max_x
    }

    /// Top content edge
    pub const fn top(&self) -> u32 {
        self.min_y
    }

    /// Exclusive bottom content edge
    pub const fn bottom(&self) -> u32 {
        self.max_y
    }

    /// Horizontal content centre
    pub fn center_x(&self) -> f64 {
        f64::from(self.min_x + self.max_x) / 2.0
    }

    /// Vertical content centre
    pub fn center_y(&self) -> f64 {
        f64::from(self.min_y + self.max_y) / 2.0
    }

    /// Map the box into canvas space for an image drawn into `placement`
    pub fn to_canvas(&self, placement: &Rect) -> Rect {
        if self.image_width == 0 || self.image_height == 0 {
            return *placement;
        }
        let sx = placement.width / f64::from(self.image_width);
        let sy = placement.height / f64::from(self.image_height);
        Rect::new(
            f64::from(self.min_x).mul_add(sx, placement.x),
            f64::from(self.min_y).mul_add(sy, placement.y),
            f64::from(self.width()) * sx,
            f64::from(self.height()) * sy,
        )
    }
}

/// Compute the box enclosing every pixel with alpha above `alpha_threshold`
///
/// An image without any such pixel yields the full image rectangle marked
/// as degenerate.
pub fn compute_bounds(image: &RgbaImage, alpha_threshold: u8) -> BoundingBox {
    let (width, height) = image.dimensions();
    let mut min_x = u32::MAX;
    let mut min_y = u32::MAX;
    let mut max_x = 0;
    let mut max_y = 0;
    let mut found = false;

    for (x, y, pixel) in image.enumerate_pixels() {
        if pixel.0[3] > alpha_threshold {
            found = true;
            min_x = min_x.min(x);
            min_y = min_y.min(y);
            max_x = max_x.max(x + 1);
            max_y = max_y.max(y + 1);
        }
    }

    if !found {
        return BoundingBox::full(width, height);
    }

    BoundingBox {
        min_x,
        min_y,
        max_x,
        max_y,
        image_width: width,
        image_height: height,
        degenerate: false,
    }
}
