mod frame;
mod null_renderer;
mod primitives;

pub use frame::RenderFrame;
pub use null_renderer::NullRenderer;
pub use primitives::{
    CirclePrimitive, Color, LinePrimitive, PointPrimitive, RectPrimitive, TextHAlign,
    TextPrimitive,
};

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::core::Viewport;
use crate::error::FigureResult;

/// On-screen position and size of a window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WindowPlacement {
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
}

/// Contract implemented by any rendering backend.
///
/// Backends receive a fully materialized, deterministic `RenderFrame` so
/// drawing code remains isolated from widget and interaction logic.
pub trait Renderer {
    fn render(&mut self, frame: &RenderFrame) -> FigureResult<()>;

    /// Moves or resizes the backing window. Offscreen backends ignore it.
    fn place(&mut self, _placement: WindowPlacement) -> FigureResult<()> {
        Ok(())
    }
}

/// Backends that can encode the last presented frame to an image file.
pub trait ScreenCapture {
    fn save_frame(&mut self, path: &Path) -> FigureResult<()>;
}

/// Opens backend surfaces for named windows.
///
/// Any `FnMut(&str, Viewport) -> FigureResult<R>` closure qualifies.
pub trait SurfaceFactory {
    type Renderer: Renderer;

    fn open(&mut self, name: &str, size: Viewport) -> FigureResult<Self::Renderer>;
}

impl<R, F> SurfaceFactory for F
where
    R: Renderer,
    F: FnMut(&str, Viewport) -> FigureResult<R>,
{
    type Renderer = R;

    fn open(&mut self, name: &str, size: Viewport) -> FigureResult<R> {
        self(name, size)
    }
}

#[cfg(feature = "cairo-backend")]
mod cairo_backend;
#[cfg(feature = "cairo-backend")]
pub use cairo_backend::{CairoContextRenderer, CairoRenderStats, CairoRenderer, load_png};
