use crate::error::FigureResult;
use crate::render::{RenderFrame, Renderer, WindowPlacement};

/// No-op renderer used by tests and headless usage.
///
/// It still validates frame content so tests can catch invalid geometry
/// without a real backend.
#[derive(Debug, Default)]
pub struct NullRenderer {
    pub frames_rendered: usize,
    pub last_line_count: usize,
    pub last_rect_count: usize,
    pub last_circle_count: usize,
    pub last_point_count: usize,
    pub last_text_count: usize,
    pub last_placement: Option<WindowPlacement>,
}

impl Renderer for NullRenderer {
    fn render(&mut self, frame: &RenderFrame) -> FigureResult<()> {
        frame.validate()?;
        self.frames_rendered += 1;
        self.last_line_count = frame.lines.len();
        self.last_rect_count = frame.rects.len();
        self.last_circle_count = frame.circles.len();
        self.last_point_count = frame.points.len();
        self.last_text_count = frame.texts.len();
        Ok(())
    }

    fn place(&mut self, placement: WindowPlacement) -> FigureResult<()> {
        self.last_placement = Some(placement);
        Ok(())
    }
}
