//! Gesture interpretation.
//!
//! [`ViewerEngine`] is the single owner of the view transform. Hosts feed it
//! sizes and raw input events in arrival order and read back the transform
//! to draw. Every call completes synchronously and none of them can fail:
//! input that cannot be applied yet (no content, unknown pointer, degenerate
//! pinch) is dropped.

use crate::config::ViewerConfig;
use crate::pixel_size::PixelSize;
use crate::pointer::{GestureMode, PointerId, PointerTracker, PointerUpdate};
use crate::points::Point;
use crate::tap::{TapDetector, TapKind};
use crate::transforms::{clamp_scale, fit_state, pan, zoom_at_anchor, zoom_by_factor};
use crate::viewport::ViewportState;

/// Magnification of a double-tap zoom, relative to the fit scale.
pub const DOUBLE_TAP_ZOOM_FACTOR: f64 = 2.0;

#[derive(Clone, Debug)]
pub struct ViewerEngine {
    config: ViewerConfig,
    content_size: PixelSize,
    viewport_size: PixelSize,
    state: Option<ViewportState>,
    pointers: PointerTracker,
    taps: TapDetector,
}

impl ViewerEngine {
    /// An invalid config is replaced by the default one, with a warning.
    pub fn new(config: ViewerConfig) -> Self {
        let config = config.validate().unwrap_or_else(|err| {
            log::warn!("Invalid viewer config ({}), using defaults", err);
            ViewerConfig::default()
        });
        let pointers = PointerTracker::new(config.tap_slop_px);
        Self {
            config,
            content_size: PixelSize::default(),
            viewport_size: PixelSize::default(),
            state: None,
            pointers,
            taps: TapDetector::new(),
        }
    }

    pub fn config(&self) -> &ViewerConfig {
        &self.config
    }

    // ========== Outputs ==========

    /// Current transform, or `None` until both sizes are known.
    pub fn state(&self) -> Option<&ViewportState> {
        self.state.as_ref()
    }

    pub fn is_ready(&self) -> bool {
        self.state.is_some()
    }

    pub fn scale(&self) -> Option<f64> {
        self.state.map(|s| s.scale)
    }

    pub fn offset(&self) -> Option<Point> {
        self.state.map(|s| s.offset)
    }

    pub fn fit_scale(&self) -> Option<f64> {
        self.state.map(|s| s.fit_scale)
    }

    pub fn zoom_percent(&self) -> Option<i32> {
        self.state.map(|s| s.zoom_percent())
    }

    pub fn css_transform(&self) -> Option<String> {
        self.state.map(|s| s.css_transform())
    }

    pub fn gesture_mode(&self) -> GestureMode {
        self.pointers.mode()
    }

    pub fn content_size(&self) -> PixelSize {
        self.content_size
    }

    pub fn viewport_size(&self) -> PixelSize {
        self.viewport_size
    }

    // ========== Sizes ==========

    /// New content finished loading with the given natural size.
    ///
    /// Any gesture in progress belonged to the old content and is dropped.
    pub fn set_content_size(&mut self, width: f64, height: f64) {
        self.content_size = PixelSize::new(width, height);
        self.pointers.clear();
        self.taps.reset();
        self.state = fit_state(self.content_size, self.viewport_size, &self.config);
        log::debug!(
            "content {}x{} → {:?}",
            width,
            height,
            self.state.map(|s| s.fit_scale)
        );
    }

    /// Content is being replaced or removed; nothing is drawable until the
    /// next `set_content_size`.
    pub fn clear_content(&mut self) {
        self.content_size = PixelSize::default();
        self.pointers.clear();
        self.taps.reset();
        self.state = None;
    }

    /// The viewport container was (re)measured. Refits when the size changed.
    pub fn set_viewport_size(&mut self, width: f64, height: f64) {
        let size = PixelSize::new(width, height);
        if size == self.viewport_size {
            return;
        }
        self.viewport_size = size;

        // A collapsed container keeps the last good transform.
        if let Some(fit) = fit_state(self.content_size, size, &self.config) {
            log::debug!("viewport {}x{} → fit {}", width, height, fit.fit_scale);
            self.state = Some(fit);
            self.rebase_gesture();
        }
    }

    // ========== Pointer input ==========

    pub fn pointer_down(&mut self, id: PointerId, x: f64, y: f64) {
        let point = Point::new(x, y);
        if !point.is_finite() {
            return;
        }
        let scale = self.current_scale();
        self.pointers.pointer_down(id, point, scale);
        log::trace!("pointer {:?} down → {:?}", id, self.pointers.mode());
    }

    pub fn pointer_move(&mut self, id: PointerId, x: f64, y: f64) {
        let point = Point::new(x, y);
        if !point.is_finite() {
            return;
        }
        let scale = self.current_scale();
        let update = self.pointers.pointer_move(id, point, scale);
        let Some(state) = self.state.as_mut() else {
            return;
        };

        match update {
            PointerUpdate::None => {}
            PointerUpdate::Pan { dx, dy } => {
                *state = pan(state, dx, dy);
            }
            PointerUpdate::Pinch {
                anchor,
                distance,
                midpoint,
            } => {
                let ratio = distance / anchor.start_distance;
                let candidate = clamp_scale(
                    anchor.start_scale * ratio,
                    self.config.min_zoom,
                    self.config.max_zoom,
                );
                *state = zoom_at_anchor(state, midpoint, candidate);
            }
        }
    }

    /// Release a contact. Returns the tap position if the press qualifies as
    /// a tap; the host passes it on to [`ViewerEngine::tap`] with a timestamp.
    pub fn pointer_up(&mut self, id: PointerId) -> Option<Point> {
        let tap = self.pointers.pointer_up(id);
        log::trace!("pointer {:?} up → {:?}", id, self.pointers.mode());
        tap
    }

    pub fn pointer_cancel(&mut self, id: PointerId) {
        self.pointers.pointer_cancel(id);
        log::trace!("pointer {:?} cancelled → {:?}", id, self.pointers.mode());
    }

    // ========== Wheel, tap and buttons ==========

    /// Wheel zoom anchored at the cursor. Negative `delta_y` zooms in.
    pub fn wheel(&mut self, delta_y: f64, x: f64, y: f64) {
        let anchor = Point::new(x, y);
        if !delta_y.is_finite() || !anchor.is_finite() {
            return;
        }
        let Some(state) = self.state.as_mut() else {
            return;
        };

        let delta = -delta_y * self.config.wheel_sensitivity;
        let new_scale = clamp_scale(
            state.scale + delta,
            self.config.min_zoom,
            self.config.max_zoom,
        );
        *state = zoom_at_anchor(state, anchor, new_scale);
        self.rebase_gesture();
    }

    /// A completed tap at viewport position (x, y).
    ///
    /// A double-tap toggles between fit and [`DOUBLE_TAP_ZOOM_FACTOR`]× fit,
    /// zooming in around the tap point and recentering on the way back.
    pub fn tap(&mut self, x: f64, y: f64, timestamp_ms: f64) -> Option<TapKind> {
        let point = Point::new(x, y);
        if !point.is_finite() || !timestamp_ms.is_finite() {
            return None;
        }
        let state = self.state?;

        let kind = self
            .taps
            .classify(timestamp_ms, f64::from(self.config.double_tap_window_ms));
        if kind == TapKind::Double {
            if state.is_at_fit(self.config.fit_epsilon) {
                let target = clamp_scale(
                    state.fit_scale * DOUBLE_TAP_ZOOM_FACTOR,
                    self.config.min_zoom,
                    self.config.max_zoom,
                );
                log::debug!("double-tap at ({}, {}): zoom to {}", x, y, target);
                self.state = Some(zoom_at_anchor(&state, point, target));
                self.rebase_gesture();
            } else {
                log::debug!("double-tap at ({}, {}): back to fit", x, y);
                self.reset();
            }
        }
        Some(kind)
    }

    /// Step zoom in around the viewport centre.
    pub fn zoom_in(&mut self) {
        self.zoom_around_center(self.config.zoom_step);
    }

    /// Step zoom out around the viewport centre.
    pub fn zoom_out(&mut self) {
        self.zoom_around_center(1.0 / self.config.zoom_step);
    }

    /// Return to the fit transform for the current sizes.
    pub fn reset(&mut self) {
        if let Some(fit) = fit_state(self.content_size, self.viewport_size, &self.config) {
            self.state = Some(fit);
            self.rebase_gesture();
        }
    }

    fn zoom_around_center(&mut self, factor: f64) {
        // No centre to zoom around while the container is collapsed
        if !self.viewport_size.is_measured() {
            return;
        }
        let center = self.viewport_size.center();
        if let Some(state) = self.state.as_mut() {
            *state = zoom_by_factor(
                state,
                factor,
                center,
                self.config.min_zoom,
                self.config.max_zoom,
            );
            self.rebase_gesture();
        }
    }

    /// A pinch in progress continues from the scale just set, not the one it started at.
    fn rebase_gesture(&mut self) {
        let scale = self.current_scale();
        self.pointers.rebase_pinch(scale);
    }

    fn current_scale(&self) -> f64 {
        self.state.map(|s| s.scale).unwrap_or(1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ready_engine() -> ViewerEngine {
        let mut engine = ViewerEngine::new(ViewerConfig::default());
        engine.set_viewport_size(800.0, 600.0);
        engine.set_content_size(1600.0, 1200.0);
        engine
    }

    #[test]
    fn engine_is_not_ready_until_both_sizes_known() {
        let mut engine = ViewerEngine::new(ViewerConfig::default());
        assert!(!engine.is_ready());

        engine.set_content_size(1600.0, 1200.0);
        assert!(!engine.is_ready());

        engine.set_viewport_size(800.0, 600.0);
        assert_eq!(engine.fit_scale(), Some(0.5));
        assert_eq!(engine.scale(), Some(0.5));
        assert_eq!(engine.zoom_percent(), Some(50));
    }

    #[test]
    fn input_before_ready_is_ignored() {
        let mut engine = ViewerEngine::new(ViewerConfig::default());
        engine.wheel(-100.0, 10.0, 10.0);
        engine.zoom_in();
        engine.reset();
        assert_eq!(engine.tap(10.0, 10.0, 0.0), None);
        engine.pointer_down(PointerId(1), 0.0, 0.0);
        engine.pointer_move(PointerId(1), 50.0, 0.0);
        assert!(engine.state().is_none());
    }

    #[test]
    fn wheel_up_zooms_in_around_cursor() {
        let mut engine = ready_engine();
        let cursor = Point::new(200.0, 150.0);
        let before = engine.state().unwrap().screen_to_content(cursor);

        engine.wheel(-100.0, cursor.x(), cursor.y());

        let state = engine.state().unwrap();
        assert!((state.scale - 0.65).abs() < 1e-12);
        let after = state.screen_to_content(cursor);
        assert!((after.x() - before.x()).abs() < 1e-9);
        assert!((after.y() - before.y()).abs() < 1e-9);
    }

    #[test]
    fn wheel_is_clamped() {
        let mut engine = ready_engine();
        engine.wheel(1.0e6, 0.0, 0.0);
        assert_eq!(engine.scale(), Some(0.2));
        engine.wheel(-1.0e6, 0.0, 0.0);
        assert_eq!(engine.scale(), Some(4.0));
    }

    #[test]
    fn non_finite_wheel_is_ignored() {
        let mut engine = ready_engine();
        engine.wheel(f64::NAN, 0.0, 0.0);
        assert_eq!(engine.scale(), Some(0.5));
    }

    #[test]
    fn drag_pans() {
        let mut engine = ready_engine();
        engine.pointer_down(PointerId(1), 100.0, 100.0);
        engine.pointer_move(PointerId(1), 130.0, 90.0);
        assert_eq!(engine.gesture_mode(), GestureMode::Panning);
        assert_eq!(engine.offset(), Some(Point::new(30.0, -10.0)));
        assert_eq!(engine.pointer_up(PointerId(1)), None);
        assert_eq!(engine.gesture_mode(), GestureMode::Idle);
    }

    #[test]
    fn zoom_buttons_step_around_center() {
        let mut engine = ready_engine();
        engine.zoom_in();
        assert!((engine.scale().unwrap() - 0.6).abs() < 1e-12);

        let center = Point::new(400.0, 300.0);
        let state = engine.state().unwrap();
        // Content centre stays at the viewport centre
        let content_center = state.screen_to_content(center);
        assert!((content_center.x() - 800.0).abs() < 1e-9);
        assert!((content_center.y() - 600.0).abs() < 1e-9);

        engine.zoom_out();
        assert!((engine.scale().unwrap() - 0.5).abs() < 1e-12);
    }

    #[test]
    fn reset_returns_to_fit() {
        let mut engine = ready_engine();
        engine.wheel(-300.0, 10.0, 10.0);
        engine.pointer_down(PointerId(1), 0.0, 0.0);
        engine.pointer_move(PointerId(1), 77.0, 33.0);
        engine.pointer_up(PointerId(1));

        engine.reset();

        assert_eq!(engine.scale(), Some(0.5));
        assert_eq!(engine.offset(), Some(Point::ORIGIN));
    }

    #[test]
    fn new_content_drops_gesture_in_progress() {
        let mut engine = ready_engine();
        engine.pointer_down(PointerId(1), 0.0, 0.0);
        engine.pointer_down(PointerId(2), 100.0, 0.0);
        assert_eq!(engine.gesture_mode(), GestureMode::Pinching);

        engine.set_content_size(400.0, 300.0);

        assert_eq!(engine.gesture_mode(), GestureMode::Idle);
        assert_eq!(engine.fit_scale(), Some(2.0));
    }

    #[test]
    fn clear_content_unloads_state() {
        let mut engine = ready_engine();
        engine.clear_content();
        assert!(!engine.is_ready());
        assert_eq!(engine.css_transform(), None);
    }

    #[test]
    fn collapsed_viewport_keeps_last_transform() {
        let mut engine = ready_engine();
        engine.wheel(-100.0, 0.0, 0.0);
        let before = *engine.state().unwrap();

        engine.set_viewport_size(0.0, 0.0);

        assert_eq!(engine.state(), Some(&before));
    }

    #[test]
    fn collapsed_viewport_ignores_zoom_buttons() {
        let mut engine = ready_engine();
        engine.set_viewport_size(0.0, 0.0);
        let before = *engine.state().unwrap();

        engine.zoom_in();
        engine.zoom_out();
        engine.zoom_in();

        assert_eq!(engine.state(), Some(&before));
    }

    #[test]
    fn invalid_config_falls_back_to_defaults() {
        let mut engine = ViewerEngine::new(ViewerConfig::default().with_zoom_bounds(5.0, 1.0));
        assert_eq!(engine.config(), &ViewerConfig::default());

        engine.set_viewport_size(800.0, 600.0);
        engine.set_content_size(1600.0, 1200.0);
        assert_eq!(engine.fit_scale(), Some(0.5));

        let engine = ViewerEngine::new(ViewerConfig::default().with_zoom_bounds(f64::NAN, 4.0));
        assert_eq!(engine.config(), &ViewerConfig::default());
    }

    #[test]
    fn css_transform_follows_state() {
        let engine = ready_engine();
        assert_eq!(
            engine.css_transform().as_deref(),
            Some("matrix(0.5, 0, 0, 0.5, 0, 0)")
        );
    }
}
