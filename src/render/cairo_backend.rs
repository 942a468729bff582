use cairo::{Context, Format, ImageSurface};
use pango::FontDescription;
use std::f64::consts::TAU;
use std::fs::File;
use std::path::Path;

use crate::core::ImageBuffer;
use crate::error::{FigureError, FigureResult};
use crate::render::{Color, RenderFrame, Renderer, ScreenCapture, TextHAlign};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CairoRenderStats {
    pub lines_drawn: usize,
    pub rects_drawn: usize,
    pub circles_drawn: usize,
    pub points_drawn: usize,
    pub texts_drawn: usize,
}

/// Optional extension trait for renderers that can draw into an external Cairo
/// context (for example a toolkit drawing-area callback).
pub trait CairoContextRenderer {
    fn render_on_cairo_context(
        &mut self,
        context: &Context,
        frame: &RenderFrame,
    ) -> FigureResult<()>;
}

/// Cairo + Pango + PangoCairo renderer backend.
///
/// Frames are painted onto an offscreen ARGB32 surface that follows the frame
/// size; `ScreenCapture` encodes that surface as PNG.
#[derive(Debug)]
pub struct CairoRenderer {
    surface: ImageSurface,
    clear_color: Color,
    last_stats: CairoRenderStats,
}

impl CairoRenderer {
    pub fn new(width: i32, height: i32) -> FigureResult<Self> {
        Ok(Self {
            surface: create_surface(width, height)?,
            clear_color: Color::BLACK,
            last_stats: CairoRenderStats::default(),
        })
    }

    #[must_use]
    pub fn backend_name(&self) -> &'static str {
        "cairo+pango+pangocairo"
    }

    #[must_use]
    pub fn surface(&self) -> &ImageSurface {
        &self.surface
    }

    #[must_use]
    pub fn clear_color(&self) -> Color {
        self.clear_color
    }

    pub fn set_clear_color(&mut self, color: Color) -> FigureResult<()> {
        color.validate()?;
        self.clear_color = color;
        Ok(())
    }

    #[must_use]
    pub fn last_stats(&self) -> CairoRenderStats {
        self.last_stats
    }

    /// Reads back the surface as an RGB image.
    pub fn snapshot(&mut self) -> FigureResult<ImageBuffer> {
        surface_to_image(&mut self.surface)
    }

    fn ensure_surface_size(&mut self, frame: &RenderFrame) -> FigureResult<()> {
        let width = frame_dim(frame.viewport.width)?;
        let height = frame_dim(frame.viewport.height)?;
        if self.surface.width() != width || self.surface.height() != height {
            self.surface = create_surface(width, height)?;
        }
        Ok(())
    }

    fn render_with_context(&mut self, context: &Context, frame: &RenderFrame) -> FigureResult<()> {
        frame.validate()?;
        self.clear_color.validate()?;

        apply_color(context, self.clear_color);
        context
            .paint()
            .map_err(|err| map_backend_error("failed to clear surface", err))?;

        if let Some(background) = &frame.background {
            paint_image(context, background)?;
        }

        let mut stats = CairoRenderStats::default();

        for rect in &frame.rects {
            apply_color(context, rect.color);
            context.rectangle(rect.x, rect.y, rect.width, rect.height);
            if rect.filled {
                context
                    .fill()
                    .map_err(|err| map_backend_error("failed to fill rectangle", err))?;
            } else {
                context.set_line_width(rect.stroke_width);
                context
                    .stroke()
                    .map_err(|err| map_backend_error("failed to stroke rectangle", err))?;
            }
            stats.rects_drawn += 1;
        }

        for line in &frame.lines {
            apply_color(context, line.color);
            context.set_line_width(line.stroke_width);
            context.move_to(line.x1, line.y1);
            context.line_to(line.x2, line.y2);
            context
                .stroke()
                .map_err(|err| map_backend_error("failed to stroke line", err))?;
            stats.lines_drawn += 1;
        }

        for circle in &frame.circles {
            apply_color(context, circle.color);
            context.new_sub_path();
            context.arc(circle.x, circle.y, circle.radius, 0.0, TAU);
            if circle.filled {
                context
                    .fill()
                    .map_err(|err| map_backend_error("failed to fill circle", err))?;
            } else {
                context.set_line_width(circle.stroke_width);
                context
                    .stroke()
                    .map_err(|err| map_backend_error("failed to stroke circle", err))?;
            }
            stats.circles_drawn += 1;
        }

        for point in &frame.points {
            apply_color(context, point.color);
            context.rectangle(point.x.floor(), point.y.floor(), 1.0, 1.0);
            context
                .fill()
                .map_err(|err| map_backend_error("failed to set point", err))?;
            stats.points_drawn += 1;
        }

        for text in &frame.texts {
            let layout = pangocairo::functions::create_layout(context);
            let font_description =
                FontDescription::from_string(&format!("Sans {}px", text.font_size_px));
            layout.set_font_description(Some(&font_description));
            layout.set_text(&text.text);

            let (text_width, _text_height) = layout.pixel_size();
            let x = match text.h_align {
                TextHAlign::Left => text.x,
                TextHAlign::Center => text.x - f64::from(text_width) / 2.0,
                TextHAlign::Right => text.x - f64::from(text_width),
            };

            apply_color(context, text.color);
            context.move_to(x, text.y);
            pangocairo::functions::show_layout(context, &layout);
            stats.texts_drawn += 1;
        }

        self.last_stats = stats;
        Ok(())
    }
}

impl Renderer for CairoRenderer {
    fn render(&mut self, frame: &RenderFrame) -> FigureResult<()> {
        self.ensure_surface_size(frame)?;
        let context = Context::new(&self.surface)
            .map_err(|err| map_backend_error("failed to create cairo context", err))?;
        self.render_with_context(&context, frame)?;
        drop(context);
        self.surface.flush();
        Ok(())
    }
}

impl CairoContextRenderer for CairoRenderer {
    fn render_on_cairo_context(
        &mut self,
        context: &Context,
        frame: &RenderFrame,
    ) -> FigureResult<()> {
        self.render_with_context(context, frame)
    }
}

impl ScreenCapture for CairoRenderer {
    fn save_frame(&mut self, path: &Path) -> FigureResult<()> {
        let mut file = File::create(path)?;
        self.surface
            .write_to_png(&mut file)
            .map_err(|err| FigureError::Backend(format!("failed to encode png: {err}")))
    }
}

/// Decodes a PNG file into an RGB image.
pub fn load_png(path: &Path) -> FigureResult<ImageBuffer> {
    let mut file = File::open(path)?;
    let mut surface = ImageSurface::create_from_png(&mut file)
        .map_err(|err| FigureError::InvalidImage(format!("failed to decode png: {err}")))?;
    surface_to_image(&mut surface)
}

fn surface_to_image(surface: &mut ImageSurface) -> FigureResult<ImageBuffer> {
    surface.flush();
    let width = surface_dim(surface.width())?;
    let height = surface_dim(surface.height())?;
    let stride = surface_dim(surface.stride())? as usize;
    let data = surface
        .data()
        .map_err(|err| FigureError::Backend(format!("failed to borrow surface data: {err}")))?;
    ImageBuffer::from_argb32(&data, width, height, stride)
}

fn paint_image(context: &Context, image: &ImageBuffer) -> FigureResult<()> {
    let width = frame_dim(image.width())?;
    let height = frame_dim(image.height())?;
    let stride = Format::ARgb32
        .stride_for_width(image.width())
        .map_err(|err| map_backend_error("failed to compute stride", err))?;
    let data = image.to_argb32(stride as usize)?;
    let source = ImageSurface::create_for_data(data, Format::ARgb32, width, height, stride)
        .map_err(|err| map_backend_error("failed to wrap background", err))?;
    context
        .set_source_surface(&source, 0.0, 0.0)
        .map_err(|err| map_backend_error("failed to set background source", err))?;
    context
        .paint()
        .map_err(|err| map_backend_error("failed to paint background", err))
}

fn create_surface(width: i32, height: i32) -> FigureResult<ImageSurface> {
    if width <= 0 || height <= 0 {
        return Err(FigureError::InvalidData(
            "cairo surface size must be > 0".to_owned(),
        ));
    }
    ImageSurface::create(Format::ARgb32, width, height)
        .map_err(|err| map_backend_error("failed to create cairo surface", err))
}

fn frame_dim(value: u32) -> FigureResult<i32> {
    i32::try_from(value)
        .map_err(|_| FigureError::InvalidData(format!("dimension {value} exceeds cairo limits")))
}

fn surface_dim(value: i32) -> FigureResult<u32> {
    u32::try_from(value)
        .map_err(|_| FigureError::Backend(format!("negative surface dimension {value}")))
}

fn apply_color(context: &Context, color: Color) {
    context.set_source_rgba(color.red, color.green, color.blue, color.alpha);
}

fn map_backend_error(prefix: &str, err: cairo::Error) -> FigureError {
    FigureError::Backend(format!("{prefix}: {err}"))
}
