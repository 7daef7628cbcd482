use crate::config::ViewerConfig;
use crate::pixel_size::PixelSize;
use crate::points::Point;
use crate::viewport::ViewportState;

/// A 3x3 homogeneous transformation matrix for 2D affine transformations
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Mat3 {
    /// Row-major order: [[m00, m01, m02], [m10, m11, m12], [m20, m21, m22]]
    pub data: [[f64; 3]; 3],
}

impl Mat3 {
    pub fn identity() -> Self {
        Self {
            data: [[1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0]],
        }
    }

    pub fn translation(dx: f64, dy: f64) -> Self {
        Self {
            data: [[1.0, 0.0, dx], [0.0, 1.0, dy], [0.0, 0.0, 1.0]],
        }
    }

    /// Scale matrix that keeps (cx, cy) fixed.
    ///
    /// Equivalent to: translate(-cx, -cy) → scale(factor) → translate(cx, cy)
    pub fn scale_around(factor: f64, cx: f64, cy: f64) -> Self {
        Self {
            data: [
                [factor, 0.0, cx * (1.0 - factor)],
                [0.0, factor, cy * (1.0 - factor)],
                [0.0, 0.0, 1.0],
            ],
        }
    }

    /// self × other (applies `other` first when transforming points)
    pub fn multiply(&self, other: &Mat3) -> Self {
        let mut result = [[0.0; 3]; 3];

        for (i, row) in result.iter_mut().enumerate() {
            for (j, cell) in row.iter_mut().enumerate() {
                *cell = self.data[i][0] * other.data[0][j]
                    + self.data[i][1] * other.data[1][j]
                    + self.data[i][2] * other.data[2][j];
            }
        }

        Self { data: result }
    }

    pub fn apply(&self, point: Point) -> Point {
        let (x, y) = point.into_parts();
        Point::new(
            self.data[0][0] * x + self.data[0][1] * y + self.data[0][2],
            self.data[1][0] * x + self.data[1][1] * y + self.data[1][2],
        )
    }
}

/// Clamp a requested scale into `[min_zoom, max_zoom]`.
///
/// NaN resolves to the lower bound. Bounds given in the wrong order are
/// swapped and a NaN bound collapses onto the other one, so this never panics.
pub fn clamp_scale(scale: f64, min_zoom: f64, max_zoom: f64) -> f64 {
    let lower = min_zoom.min(max_zoom);
    let upper = min_zoom.max(max_zoom);
    if scale.is_nan() {
        return lower;
    }
    scale.max(lower).min(upper)
}

/// Scale and offset that fit `content` entirely inside `viewport`, centered.
///
/// Returns `None` until both sizes are measured.
pub fn compute_fit(
    content: PixelSize,
    viewport: PixelSize,
    min_zoom: f64,
    max_zoom: f64,
) -> Option<(f64, Point)> {
    if !content.is_measured() || !viewport.is_measured() {
        return None;
    }

    let raw = (viewport.width / content.width).min(viewport.height / content.height);
    let fit_scale = clamp_scale(raw, min_zoom, max_zoom);
    let offset = Point::new(
        (viewport.width - content.width * fit_scale) / 2.0,
        (viewport.height - content.height * fit_scale) / 2.0,
    );

    Some((fit_scale, offset))
}

/// Full viewport state at fit for the given sizes.
pub fn fit_state(
    content: PixelSize,
    viewport: PixelSize,
    config: &ViewerConfig,
) -> Option<ViewportState> {
    compute_fit(content, viewport, config.min_zoom, config.max_zoom)
        .map(|(fit_scale, offset)| ViewportState::new(fit_scale, offset, fit_scale))
}

/// Change scale to `new_scale` while the content under `anchor` stays put.
///
/// `new_scale` must already be clamped; this function does not clamp.
pub fn zoom_at_anchor(state: &ViewportState, anchor: Point, new_scale: f64) -> ViewportState {
    let content_point = state.screen_to_content(anchor);
    let offset = anchor - content_point * new_scale;

    ViewportState {
        scale: new_scale,
        offset,
        fit_scale: state.fit_scale,
    }
}

/// Translate the content by (dx, dy) screen pixels. Offset is never clamped.
pub fn pan(state: &ViewportState, dx: f64, dy: f64) -> ViewportState {
    ViewportState {
        offset: state.offset + Point::new(dx, dy),
        ..*state
    }
}

/// Multiply the scale by `factor` around `anchor`, clamped to the zoom bounds.
pub fn zoom_by_factor(
    state: &ViewportState,
    factor: f64,
    anchor: Point,
    min_zoom: f64,
    max_zoom: f64,
) -> ViewportState {
    let new_scale = clamp_scale(state.scale * factor, min_zoom, max_zoom);
    zoom_at_anchor(state, anchor, new_scale)
}
