//! figure-rs: figures, pannable plots and image inspection windows.
//!
//! Widgets compose deterministic `RenderFrame`s and hand them to a
//! backend-supplied `Renderer`; input arrives through an `EventSource` that
//! writes mouse activity into a per-window `MouseState`. Nothing here talks to
//! a windowing system directly, so every transform and widget behavior can be
//! exercised headless with `NullRenderer` and `ScriptedEvents`.

pub mod api;
pub mod core;
pub mod error;
pub mod interaction;
pub mod render;
pub mod telemetry;

pub use api::{
    Figure, FigureConfig, ImageInspector, InspectorConfig, Plot, Window, display, plot, plot_xy,
};
pub use error::{FigureError, FigureResult};
