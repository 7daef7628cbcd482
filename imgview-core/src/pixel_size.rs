use crate::points::Point;

/// Width and height of an element in pixels.
///
/// Used both for the natural size of the content image and for the
/// rendered size of the viewport container.
#[derive(Clone, Copy, Debug, PartialEq, Default)]
pub struct PixelSize {
    pub width: f64,
    pub height: f64,
}

impl PixelSize {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// True once the host has reported a usable size.
    ///
    /// Layout engines report 0x0 for elements that are not attached or not
    /// yet decoded, so anything non-positive counts as unmeasured.
    pub fn is_measured(&self) -> bool {
        self.width.is_finite() && self.height.is_finite() && self.width > 0.0 && self.height > 0.0
    }

    pub fn center(&self) -> Point {
        Point::new(self.width / 2.0, self.height / 2.0)
    }
}
