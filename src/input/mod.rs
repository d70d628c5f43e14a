pub mod gesture;
pub mod handler;

pub use gesture::{DragTracker, heading_from_translation};
pub use handler::{InputHandler, KeyAction};
