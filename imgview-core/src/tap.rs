/// Classification of a completed tap.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TapKind {
    Single,
    Double,
}

/// Pairs taps into double-taps by timing alone.
#[derive(Clone, Debug, Default)]
pub struct TapDetector {
    last_tap_ms: Option<f64>,
}

impl TapDetector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Classify a tap at `now_ms` (monotonic clock).
    ///
    /// The stored timestamp is updated for every tap, single or double, so a
    /// third rapid tap pairs with the second rather than being ignored.
    pub fn classify(&mut self, now_ms: f64, window_ms: f64) -> TapKind {
        let kind = match self.last_tap_ms {
            Some(last) if now_ms >= last && now_ms - last < window_ms => TapKind::Double,
            _ => TapKind::Single,
        };
        self.last_tap_ms = Some(now_ms);
        kind
    }

    pub fn reset(&mut self) {
        self.last_tap_ms = None;
    }
}
