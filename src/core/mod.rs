pub mod bounds;
pub mod format;
pub mod image;
pub mod nearest;
pub mod plot_view;
pub mod types;

pub use bounds::{Bounds2, PixelRect};
pub use format::{format_fixed, format_tick};
pub use image::ImageBuffer;
pub use nearest::nearest_point_index;
pub use plot_view::{MIN_ZOOM_FACTOR, PlotParams, PlotStyle, ViewTransform};
pub use types::{DataPoint, DevicePoint, Viewport};
