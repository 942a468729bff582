//! Input plumbing: keys, per-window mouse state and the event poll seam.

mod events;
mod keys;
mod mouse;

pub use events::{EventSource, ScriptStep, ScriptedEvents};
pub use keys::{Key, KeyBindings};
pub use mouse::{MouseButton, MouseEvent, MouseEventKind, MouseState};
