mod image_viewer;
mod zoom_controls;

pub use image_viewer::ImageViewer;
pub use zoom_controls::ZoomControls;
