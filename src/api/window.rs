use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{debug, trace, warn};

use crate::core::{ImageBuffer, PixelRect, Viewport, format_fixed};
use crate::error::FigureResult;
use crate::interaction::{EventSource, Key, MouseButton, MouseState};
use crate::render::{
    CirclePrimitive, Color, LinePrimitive, PointPrimitive, RectPrimitive, RenderFrame, Renderer,
    ScreenCapture, TextHAlign, TextPrimitive, WindowPlacement,
};

/// Pixel height of text written at font scale 1.
pub const BASE_FONT_PX: f64 = 12.0;

/// Radius of the circle drawn by `Window::mark` for non-zero thickness.
const MARKER_RADIUS: f64 = 2.0;

/// Current drawing color and stroke.
///
/// A negative thickness fills rectangles and circles.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Brush {
    pub color: Color,
    pub thickness: i32,
}

impl Default for Brush {
    fn default() -> Self {
        Self {
            color: Color::RED,
            thickness: 1,
        }
    }
}

impl Brush {
    fn stroke_width(self) -> f64 {
        f64::from(self.thickness.abs().max(1))
    }

    fn fills(self) -> bool {
        self.thickness < 0
    }
}

/// Text settings; the scale multiplies `BASE_FONT_PX`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FontSpec {
    pub scale: f64,
    pub thickness: f64,
}

impl Default for FontSpec {
    fn default() -> Self {
        Self {
            scale: 1.0,
            thickness: 1.0,
        }
    }
}

impl FontSpec {
    #[must_use]
    pub fn size_px(self) -> f64 {
        BASE_FONT_PX * self.scale
    }
}

/// A caption placed on an image.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TextAnnotation {
    pub x: i32,
    pub y: i32,
    pub text: String,
    pub color: Color,
    pub font_size: f64,
    pub font_thickness: f64,
}

impl Default for TextAnnotation {
    fn default() -> Self {
        Self {
            x: 20,
            y: 20,
            text: String::new(),
            color: Color::RED,
            font_size: 1.0,
            font_thickness: 1.0,
        }
    }
}

impl TextAnnotation {
    #[must_use]
    pub fn new(x: i32, y: i32, text: impl Into<String>) -> Self {
        Self {
            x,
            y,
            text: text.into(),
            ..Self::default()
        }
    }
}

/// A named display: a persisted original image, the transient frame drawn
/// over it, brush and font state, and the window's mouse context.
///
/// `reset_display` restores the frame from the original; every drawing call
/// targets the frame until the next reset.
pub struct Window<R: Renderer> {
    name: String,
    renderer: R,
    original: ImageBuffer,
    frame: RenderFrame,
    brush: Brush,
    font: FontSpec,
    margin: i32,
    placement: WindowPlacement,
    mouse: MouseState,
}

impl<R: Renderer> Window<R> {
    /// Creates a window with a black `size` display.
    pub fn new(name: impl Into<String>, renderer: R, size: Viewport) -> FigureResult<Self> {
        let original = ImageBuffer::new(size.width, size.height)?;
        let name = name.into();
        debug!(window = %name, width = size.width, height = size.height, "create window");
        Ok(Self {
            name,
            renderer,
            frame: RenderFrame::with_background(original.clone()),
            original,
            brush: Brush::default(),
            font: FontSpec::default(),
            margin: 50,
            placement: WindowPlacement {
                x: 0,
                y: 0,
                width: size.width,
                height: size.height,
            },
            mouse: MouseState::new(dim_i32(size.width), dim_i32(size.height)),
        })
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    /// Size of the display buffer (not of the on-screen window).
    #[must_use]
    pub fn size(&self) -> Viewport {
        self.original.viewport()
    }

    #[must_use]
    pub fn original(&self) -> &ImageBuffer {
        &self.original
    }

    /// The frame that the next `show`/`refresh` presents.
    #[must_use]
    pub fn frame(&self) -> &RenderFrame {
        &self.frame
    }

    #[must_use]
    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    pub fn renderer_mut(&mut self) -> &mut R {
        &mut self.renderer
    }

    #[must_use]
    pub fn into_renderer(self) -> R {
        self.renderer
    }

    #[must_use]
    pub fn placement(&self) -> WindowPlacement {
        self.placement
    }

    #[must_use]
    pub fn brush(&self) -> Brush {
        self.brush
    }

    #[must_use]
    pub fn font(&self) -> FontSpec {
        self.font
    }

    #[must_use]
    pub fn margin(&self) -> i32 {
        self.margin
    }

    pub fn set_margin(&mut self, margin: i32) {
        self.margin = margin;
    }

    /// Replaces the display with a black `width x height` canvas.
    pub fn init(&mut self, width: u32, height: u32) -> FigureResult<()> {
        self.create_display(width, height)
    }

    pub fn create_display(&mut self, width: u32, height: u32) -> FigureResult<()> {
        self.original = ImageBuffer::new(width, height)?;
        debug!(window = %self.name, width, height, "create display");
        self.reset_display();
        Ok(())
    }

    pub fn set_image(&mut self, image: &ImageBuffer) {
        self.original = image.clone();
        debug!(
            window = %self.name,
            width = image.width(),
            height = image.height(),
            "set image"
        );
        self.reset_display();
    }

    /// Sets the display from row-major samples with 1, 3 or 4 channels.
    pub fn set_image_raw(
        &mut self,
        data: &[u8],
        width: u32,
        height: u32,
        channels: usize,
    ) -> FigureResult<()> {
        let image = ImageBuffer::from_raw(data, width, height, channels)?;
        self.set_image(&image);
        Ok(())
    }

    /// Discards everything drawn since the last reset.
    pub fn reset_display(&mut self) {
        self.frame = RenderFrame::with_background(self.original.clone());
    }

    pub fn set_color(&mut self, color: Color) {
        self.brush.color = color;
    }

    pub fn set_color_rgb(&mut self, red: u8, green: u8, blue: u8) {
        self.brush.color = Color::rgb8(red, green, blue);
    }

    pub fn set_thickness(&mut self, thickness: i32) {
        self.brush.thickness = thickness;
    }

    pub fn set_font(&mut self, font: FontSpec) {
        self.font = font;
    }

    pub fn draw_line(&mut self, x0: f64, y0: f64, x1: f64, y1: f64) {
        self.frame.lines.push(LinePrimitive::new(
            x0,
            y0,
            x1,
            y1,
            self.brush.stroke_width(),
            self.brush.color,
        ));
    }

    /// Line of `length` pixels from `(x, y)` at `angle` radians.
    pub fn draw_ray(&mut self, x: f64, y: f64, length: f64, angle: f64) {
        self.draw_line(x, y, x + length * angle.cos(), y + length * angle.sin());
    }

    pub fn draw_rectangle(&mut self, x: f64, y: f64, width: f64, height: f64) {
        let rect = if self.brush.fills() {
            RectPrimitive::filled(x, y, width, height, self.brush.color)
        } else {
            RectPrimitive::outline(x, y, width, height, self.brush.stroke_width(), self.brush.color)
        };
        self.frame.rects.push(rect);
    }

    pub fn draw_circle(&mut self, x: f64, y: f64, radius: f64) {
        let circle = if self.brush.fills() {
            CirclePrimitive::filled(x, y, radius, self.brush.color)
        } else {
            CirclePrimitive::outline(x, y, radius, self.brush.stroke_width(), self.brush.color)
        };
        self.frame.circles.push(circle);
    }

    /// Closed polygon through `points`.
    pub fn draw_polygon(&mut self, points: &[(f64, f64)]) {
        let Some(&first) = points.first() else {
            return;
        };
        for pair in points.windows(2) {
            self.draw_line(pair[0].0, pair[0].1, pair[1].0, pair[1].1);
        }
        if let Some(&last) = points.last() {
            self.draw_line(last.0, last.1, first.0, first.1);
        }
    }

    /// Marker with the brush thickness.
    pub fn mark(&mut self, x: f64, y: f64) {
        self.mark_with(x, y, self.brush.thickness);
    }

    /// Marker at `(x, y)`: thickness 0 sets a single pixel, anything else
    /// draws a small circle stroked (or filled, when negative) with it.
    /// Markers outside the display are skipped.
    pub fn mark_with(&mut self, x: f64, y: f64, thickness: i32) {
        let size = self.size();
        if x < 0.0 || y < 0.0 || x >= f64::from(size.width) || y >= f64::from(size.height) {
            return;
        }
        let color = self.brush.color;
        match thickness {
            0 => self.frame.points.push(PointPrimitive::new(x, y, color)),
            t if t < 0 => self
                .frame
                .circles
                .push(CirclePrimitive::filled(x, y, MARKER_RADIUS, color)),
            t => self.frame.circles.push(CirclePrimitive::outline(
                x,
                y,
                MARKER_RADIUS,
                f64::from(t),
                color,
            )),
        }
    }

    /// Highlights the pixels flagged in `mask`. A permanent mark is burnt into
    /// the original and survives resets.
    pub fn mark_region(&mut self, mask: &[bool], permanent: bool) -> FigureResult<()> {
        if permanent {
            self.original.overlay_mask(mask)?;
            self.reset_display();
            return Ok(());
        }
        let background = self
            .frame
            .background
            .get_or_insert_with(|| self.original.clone());
        background.overlay_mask(mask)
    }

    /// Writes `text` with the brush color; empty text is ignored.
    pub fn write(&mut self, x: f64, y: f64, text: &str) {
        self.write_aligned(x, y, text, TextHAlign::Left);
    }

    /// Like `write`, with `x` anchoring the left edge, center or right edge
    /// of the text.
    pub fn write_aligned(&mut self, x: f64, y: f64, text: &str, h_align: TextHAlign) {
        if text.is_empty() {
            return;
        }
        self.frame.texts.push(TextPrimitive::new(
            text,
            x,
            y,
            self.font.size_px(),
            self.brush.color,
            h_align,
        ));
    }

    pub fn write_number(&mut self, x: f64, y: f64, value: f64, decimals: usize) {
        self.write(x, y, &format_fixed(value, decimals));
    }

    /// Writes each annotation with its own color and size; the brush and font
    /// are left untouched.
    pub fn write_annotations(&mut self, annotations: &[TextAnnotation]) {
        for annotation in annotations {
            if annotation.text.is_empty() || annotation.font_size <= 0.0 {
                warn!(window = %self.name, "skipping empty or unsized annotation");
                continue;
            }
            self.frame.texts.push(TextPrimitive::new(
                annotation.text.clone(),
                f64::from(annotation.x),
                f64::from(annotation.y),
                BASE_FONT_PX * annotation.font_size,
                annotation.color,
                TextHAlign::Left,
            ));
        }
    }

    /// Replaces the current frame with the `size x size` region of `source`'s
    /// current image centered on `(x, y)`. Primitives queued on `source` are
    /// not copied.
    pub fn set_display_from<S: Renderer>(
        &mut self,
        source: &Window<S>,
        x: i32,
        y: i32,
        size: u32,
    ) -> FigureResult<()> {
        let region = source.current_image().crop_centered(x, y, size)?;
        self.frame = RenderFrame::with_background(region);
        Ok(())
    }

    /// Like `set_display_from`, but the copy becomes the persisted original.
    pub fn set_original_from<S: Renderer>(
        &mut self,
        source: &Window<S>,
        x: i32,
        y: i32,
        size: u32,
    ) -> FigureResult<()> {
        self.original = source.original.crop_centered(x, y, size)?;
        self.reset_display();
        Ok(())
    }

    /// Crops the current frame to the `size x size` square whose top-left
    /// corner is `size / 2` up and left of `(x, y)`, clamped at zero.
    pub fn zoom_to_point(&mut self, x: i32, y: i32, size: u32) -> FigureResult<()> {
        let side = dim_i32(size);
        let x0 = x.saturating_sub(side / 2).max(0);
        let y0 = y.saturating_sub(side / 2).max(0);
        let region = self
            .current_image()
            .crop(PixelRect::new(x0, y0, side, side))?;
        self.frame = RenderFrame::with_background(region);
        Ok(())
    }

    fn current_image(&self) -> &ImageBuffer {
        self.frame.background.as_ref().unwrap_or(&self.original)
    }

    /// Presents the current frame.
    pub fn show(&mut self) -> FigureResult<()> {
        self.refresh()
    }

    pub fn refresh(&mut self) -> FigureResult<()> {
        trace!(
            window = %self.name,
            lines = self.frame.lines.len(),
            circles = self.frame.circles.len(),
            points = self.frame.points.len(),
            texts = self.frame.texts.len(),
            "present frame"
        );
        self.renderer.render(&self.frame)
    }

    pub fn move_to(&mut self, x: i32, y: i32) -> FigureResult<()> {
        self.placement.x = x;
        self.placement.y = y;
        self.renderer.place(self.placement)
    }

    /// Resizes the on-screen window; the display buffer keeps its size.
    pub fn resize(&mut self, width: u32, height: u32) -> FigureResult<()> {
        self.placement.width = width;
        self.placement.height = height;
        self.renderer.place(self.placement)
    }

    #[must_use]
    pub fn mouse(&self) -> &MouseState {
        &self.mouse
    }

    pub fn mouse_mut(&mut self) -> &mut MouseState {
        &mut self.mouse
    }

    /// Captures the whole display and clears the pending pointer event.
    pub fn reset_mouse(&mut self) {
        let size = self.size();
        self.mouse.reset(dim_i32(size.width), dim_i32(size.height));
    }

    #[must_use]
    pub fn mouse_move_event(&self) -> Option<(i32, i32)> {
        self.mouse.move_position()
    }

    #[must_use]
    pub fn mouse_click(&self, button: MouseButton) -> Option<(i32, i32)> {
        self.mouse.click_position(button)
    }

    /// Polls `events` for up to `timeout`, routing pointer activity into this
    /// window's mouse state.
    pub fn wait<E: EventSource + ?Sized>(
        &mut self,
        events: &mut E,
        timeout: Duration,
    ) -> FigureResult<Option<Key>> {
        events.wait(timeout, &mut self.mouse)
    }
}

impl<R: Renderer + ScreenCapture> Window<R> {
    /// Presents the current frame and encodes it to `path`.
    pub fn save_screen(&mut self, path: &Path) -> FigureResult<()> {
        self.refresh()?;
        debug!(window = %self.name, path = %path.display(), "save screen");
        self.renderer.save_frame(path)
    }
}

fn dim_i32(value: u32) -> i32 {
    i32::try_from(value).unwrap_or(i32::MAX)
}
