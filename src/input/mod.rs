pub mod events;
pub mod handler;
pub mod zoom;

// Re-export the essential types
pub use events::{InputEvent, MapEvent};
pub use handler::{Action, EventManager, InputHandler};
pub use zoom::ZoomController;
