use crate::points::Point;
use crate::transforms::Mat3;

/// Current view of the content inside the viewport.
///
/// A content-space point `c` is drawn at screen point `offset + c * scale`:
/// - `scale`: uniform zoom factor
/// - `offset`: where the content's top-left corner sits in viewport space
/// - `fit_scale`: the scale at which the whole content fits the viewport
///
/// Created once both the content and viewport sizes are known; the gesture
/// engine is the only writer.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ViewportState {
    pub scale: f64,
    pub offset: Point,
    pub fit_scale: f64,
}

impl ViewportState {
    pub fn new(scale: f64, offset: Point, fit_scale: f64) -> Self {
        Self {
            scale,
            offset,
            fit_scale,
        }
    }

    /// Content-space point currently drawn under `screen`.
    pub fn screen_to_content(&self, screen: Point) -> Point {
        (screen - self.offset) / self.scale
    }

    /// Screen position at which `content` is currently drawn.
    pub fn content_to_screen(&self, content: Point) -> Point {
        self.offset + content * self.scale
    }

    /// Zoom level for display, e.g. `150` for a scale of 1.5.
    pub fn zoom_percent(&self) -> i32 {
        (self.scale * 100.0).round() as i32
    }

    /// Whether the scale is within `epsilon` of the fit scale.
    pub fn is_at_fit(&self, epsilon: f64) -> bool {
        (self.scale - self.fit_scale).abs() <= epsilon
    }

    /// Content-to-viewport affine matrix: translate(offset) × scale(scale).
    pub fn matrix(&self) -> Mat3 {
        let (dx, dy) = self.offset.into_parts();
        Mat3::translation(dx, dy).multiply(&Mat3::scale_around(self.scale, 0.0, 0.0))
    }

    /// CSS `transform` value for an element with `transform-origin: 0 0`.
    pub fn css_transform(&self) -> String {
        let m = self.matrix().data;
        format!(
            "matrix({}, {}, {}, {}, {}, {})",
            m[0][0], m[1][0], m[0][1], m[1][1], m[0][2], m[1][2]
        )
    }
}
