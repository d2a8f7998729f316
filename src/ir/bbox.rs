//! Bounding boxes in absolute pixel XYWH form.

use serde::{Deserialize, Serialize};

/// An axis-aligned box: top-left corner `(x, y)` plus `width` and `height`,
/// all in pixels with the origin at the image's top-left.
///
/// Construction does not enforce positive extents; callers that need a
/// drawable box check [`BBoxXYWH::is_valid`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "[f64; 4]", into = "[f64; 4]")]
pub struct BBoxXYWH {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl BBoxXYWH {
    #[inline]
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// A box covering a whole `width` x `height` image.
    #[inline]
    pub fn whole_image(width: u32, height: u32) -> Self {
        Self::new(0.0, 0.0, width as f64, height as f64)
    }

    #[inline]
    pub fn area(&self) -> f64 {
        self.width * self.height
    }

    /// True when both extents are strictly positive. NaN extents are invalid.
    #[inline]
    pub fn is_valid(&self) -> bool {
        self.width > 0.0 && self.height > 0.0
    }

    #[inline]
    pub fn to_array(self) -> [f64; 4] {
        [self.x, self.y, self.width, self.height]
    }
}

impl From<[f64; 4]> for BBoxXYWH {
    fn from([x, y, width, height]: [f64; 4]) -> Self {
        Self::new(x, y, width, height)
    }
}

impl From<BBoxXYWH> for [f64; 4] {
    fn from(bbox: BBoxXYWH) -> Self {
        bbox.to_array()
    }
}
