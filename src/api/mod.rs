mod entry;
mod figure;
mod inspector;
mod plot;
mod window;

pub use entry::{PLOT_WINDOW_SIZE, display, display_with, plot, plot_with_style, plot_xy};
pub use figure::{Figure, FigureConfig, StripLayout};
pub use inspector::{ImageInspector, InspectorAction, InspectorConfig};
pub use plot::{PLOT_POLL_INTERVAL, Plot, PlotAction};
pub use window::{BASE_FONT_PX, Brush, FontSpec, TextAnnotation, Window};
