mod escape_key;
mod use_viewer_interaction;

pub use escape_key::use_escape_key;
pub use use_viewer_interaction::{use_viewer_interaction, ViewerInteraction};
