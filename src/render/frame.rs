use crate::core::{ImageBuffer, Viewport};
use crate::error::{FigureError, FigureResult};
use crate::render::{CirclePrimitive, LinePrimitive, PointPrimitive, RectPrimitive, TextPrimitive};

/// Backend-agnostic scene for one window draw pass.
///
/// Backends paint `background` first, then rects, lines, circles, points and
/// texts in insertion order within each kind.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderFrame {
    pub viewport: Viewport,
    pub background: Option<ImageBuffer>,
    pub lines: Vec<LinePrimitive>,
    pub rects: Vec<RectPrimitive>,
    pub circles: Vec<CirclePrimitive>,
    pub points: Vec<PointPrimitive>,
    pub texts: Vec<TextPrimitive>,
}

impl RenderFrame {
    #[must_use]
    pub fn new(viewport: Viewport) -> Self {
        Self {
            viewport,
            background: None,
            lines: Vec::new(),
            rects: Vec::new(),
            circles: Vec::new(),
            points: Vec::new(),
            texts: Vec::new(),
        }
    }

    /// Frame sized to `image` with the image as background.
    #[must_use]
    pub fn with_background(image: ImageBuffer) -> Self {
        let mut frame = Self::new(image.viewport());
        frame.background = Some(image);
        frame
    }

    pub fn validate(&self) -> FigureResult<()> {
        if !self.viewport.is_valid() {
            return Err(FigureError::InvalidViewport {
                width: self.viewport.width,
                height: self.viewport.height,
            });
        }
        if let Some(background) = &self.background {
            if background.viewport() != self.viewport {
                return Err(FigureError::InvalidImage(format!(
                    "background is {}x{}, frame is {}x{}",
                    background.width(),
                    background.height(),
                    self.viewport.width,
                    self.viewport.height
                )));
            }
        }

        for line in &self.lines {
            line.validate()?;
        }
        for rect in &self.rects {
            rect.validate()?;
        }
        for circle in &self.circles {
            circle.validate()?;
        }
        for point in &self.points {
            point.validate()?;
        }
        for text in &self.texts {
            text.validate()?;
        }

        Ok(())
    }

    #[must_use]
    pub fn primitive_count(&self) -> usize {
        self.lines.len() + self.rects.len() + self.circles.len() + self.points.len() + self.texts.len()
    }

    /// True when no primitive is queued; the background does not count.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.primitive_count() == 0
    }
}
