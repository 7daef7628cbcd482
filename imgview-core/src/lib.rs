pub mod config;
pub mod gesture;
pub mod pixel_size;
pub mod pointer;
pub mod points;
pub mod tap;
pub mod transforms;
pub mod viewport;

pub use config::{ConfigError, ViewerConfig, ViewerVariant};
pub use gesture::{ViewerEngine, DOUBLE_TAP_ZOOM_FACTOR};
pub use pixel_size::PixelSize;
pub use pointer::{GestureMode, PinchAnchor, PointerId, PointerTracker, PointerUpdate};
pub use points::Point;
pub use tap::{TapDetector, TapKind};
pub use transforms::{
    clamp_scale, compute_fit, fit_state, pan, zoom_at_anchor, zoom_by_factor, Mat3,
};
pub use viewport::ViewportState;
