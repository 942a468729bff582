use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::core::{Bounds2, Viewport, format_tick};
use crate::error::{FigureError, FigureResult};
use crate::interaction::{EventSource, Key};
use crate::render::{Color, Renderer, TextHAlign};

use super::Window;

const FLAT_RANGE_PAD: f64 = 0.5;
const GRID_DASH: i32 = 5;
const GRID_PERIOD: usize = 10;

/// Strip chart setup.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FigureConfig {
    pub width: u32,
    pub height: u32,
    pub margin: u32,
    pub x_ticks: u32,
    pub y_ticks: u32,
    pub show_axes: bool,
    pub show_grid: bool,
    pub line_thickness: i32,
    pub axis_color: Color,
    pub line_color: Color,
    pub bar_color: Color,
    pub text_color: Color,
    pub mark_color: Color,
    pub grid_color: Color,
    pub title: Option<String>,
}

impl Default for FigureConfig {
    fn default() -> Self {
        Self {
            width: 600,
            height: 300,
            margin: 40,
            x_ticks: 10,
            y_ticks: 4,
            show_axes: true,
            show_grid: true,
            line_thickness: 1,
            axis_color: Color::WHITE,
            line_color: Color::rgb8(100, 255, 100),
            bar_color: Color::RED,
            text_color: Color::rgb8(180, 180, 0),
            mark_color: Color::RED,
            grid_color: Color::rgb8(90, 90, 90),
            title: None,
        }
    }
}

impl FigureConfig {
    pub fn validate(&self) -> FigureResult<()> {
        Viewport::new(self.width, self.height).validate()?;
        if self.width <= 2 * self.margin || self.height <= 2 * self.margin {
            return Err(FigureError::InvalidData(format!(
                "margin {} leaves no plot area in {}x{}",
                self.margin, self.width, self.height
            )));
        }
        if self.x_ticks == 0 || self.y_ticks == 0 {
            return Err(FigureError::InvalidData(
                "tick counts must be > 0".to_owned(),
            ));
        }
        for color in [
            self.axis_color,
            self.line_color,
            self.bar_color,
            self.text_color,
            self.mark_color,
            self.grid_color,
        ] {
            color.validate()?;
        }
        Ok(())
    }

    pub fn from_json_str(input: &str) -> FigureResult<Self> {
        let config: Self = serde_json::from_str(input)
            .map_err(|e| FigureError::InvalidData(format!("failed to parse figure config: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_json_pretty(&self) -> FigureResult<String> {
        serde_json::to_string_pretty(self).map_err(|e| {
            FigureError::InvalidData(format!("failed to serialize figure config: {e}"))
        })
    }
}

/// Sample index/value to pixel mapping of a strip chart.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StripLayout {
    width: f64,
    height: f64,
    margin: f64,
    count: usize,
    range: Bounds2,
}

impl StripLayout {
    /// Horizontal pixels per sample.
    #[must_use]
    pub fn step_x(&self) -> f64 {
        (self.width - 2.0 * self.margin) / self.count.max(1) as f64
    }

    /// Vertical pixels per value unit.
    #[must_use]
    pub fn step_y(&self) -> f64 {
        (self.height - 2.0 * self.margin) / self.range.height()
    }

    #[must_use]
    pub fn x(&self, index: f64) -> f64 {
        self.margin + index * self.step_x()
    }

    #[must_use]
    pub fn y(&self, value: f64) -> f64 {
        self.height - self.margin - (value - self.range.min_y) * self.step_y()
    }

    /// Pixel row of the x axis.
    #[must_use]
    pub fn baseline(&self) -> f64 {
        self.height - self.margin
    }
}

/// Strip chart of a flat sample buffer against its index.
pub struct Figure<R: Renderer> {
    config: FigureConfig,
    samples: Vec<f64>,
    pinned_range: Option<Bounds2>,
    window: Window<R>,
}

impl<R: Renderer> Figure<R> {
    pub fn new(name: impl Into<String>, renderer: R, config: FigureConfig) -> FigureResult<Self> {
        config.validate()?;
        let window = Window::new(name, renderer, Viewport::new(config.width, config.height))?;
        Ok(Self {
            config,
            samples: Vec::new(),
            pinned_range: None,
            window,
        })
    }

    #[must_use]
    pub fn config(&self) -> &FigureConfig {
        &self.config
    }

    #[must_use]
    pub fn samples(&self) -> &[f64] {
        &self.samples
    }

    #[must_use]
    pub fn window(&self) -> &Window<R> {
        &self.window
    }

    pub fn window_mut(&mut self) -> &mut Window<R> {
        &mut self.window
    }

    #[must_use]
    pub fn into_window(self) -> Window<R> {
        self.window
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.window.set_name(name);
    }

    /// Replaces the sample buffer.
    pub fn set(&mut self, samples: &[f64]) -> FigureResult<()> {
        if samples.iter().any(|v| !v.is_finite()) {
            return Err(FigureError::InvalidData(
                "figure samples must be finite".to_owned(),
            ));
        }
        self.samples = samples.to_vec();
        trace!(count = self.samples.len(), "set figure samples");
        Ok(())
    }

    /// `set` for any losslessly widening numeric type (bytes, ints, f32).
    pub fn set_values<T: Copy + Into<f64>>(&mut self, samples: &[T]) -> FigureResult<()> {
        let widened: Vec<f64> = samples.iter().map(|&v| v.into()).collect();
        self.set(&widened)
    }

    /// Pins the axis range; without it the range follows the samples.
    pub fn set_range(&mut self, range: Bounds2) {
        self.pinned_range = Some(range);
    }

    pub fn clear_range(&mut self) {
        self.pinned_range = None;
    }

    /// Effective axis range: x spans the sample indices, y the sample values.
    #[must_use]
    pub fn range(&self) -> Bounds2 {
        let range = self.pinned_range.unwrap_or_else(|| {
            let mut bounds = Bounds2::empty();
            for &value in &self.samples {
                bounds.update(0.0, value);
            }
            bounds.min_x = 0.0;
            bounds.max_x = self.samples.len() as f64;
            bounds
        });
        range.ensure_extent(FLAT_RANGE_PAD)
    }

    #[must_use]
    pub fn layout(&self) -> StripLayout {
        StripLayout {
            width: f64::from(self.config.width),
            height: f64::from(self.config.height),
            margin: f64::from(self.config.margin),
            count: self.samples.len(),
            range: self.range(),
        }
    }

    /// Pixel position of sample `index`.
    #[must_use]
    pub fn sample_to_pixel(&self, index: usize) -> Option<(f64, f64)> {
        let value = *self.samples.get(index)?;
        let layout = self.layout();
        Some((layout.x(index as f64), layout.y(value)))
    }

    pub fn set_ticks(&mut self, y_ticks: u32, x_ticks: u32) -> FigureResult<()> {
        if x_ticks == 0 || y_ticks == 0 {
            return Err(FigureError::InvalidData(
                "tick counts must be > 0".to_owned(),
            ));
        }
        self.config.y_ticks = y_ticks;
        self.config.x_ticks = x_ticks;
        Ok(())
    }

    pub fn axis(&mut self, show: bool) {
        self.config.show_axes = show;
    }

    pub fn grid(&mut self, show: bool) {
        self.config.show_grid = show;
    }

    pub fn set_line_color(&mut self, color: Color) {
        self.config.line_color = color;
    }

    pub fn set_bar_color(&mut self, color: Color) {
        self.config.bar_color = color;
    }

    pub fn set_axis_color(&mut self, color: Color) {
        self.config.axis_color = color;
    }

    pub fn set_thickness(&mut self, thickness: i32) {
        self.config.line_thickness = thickness;
    }

    pub fn set_margin(&mut self, margin: u32) -> FigureResult<()> {
        let mut config = self.config.clone();
        config.margin = margin;
        config.validate()?;
        self.config = config;
        Ok(())
    }

    pub fn set_title(&mut self, title: impl Into<String>) {
        let title = title.into();
        self.config.title = (!title.is_empty()).then_some(title);
    }

    fn use_line_brush(&mut self) {
        self.window.set_color(self.config.line_color);
        self.window.set_thickness(self.config.line_thickness);
    }

    fn check_index(&self, index: usize) -> FigureResult<()> {
        if index < self.samples.len() {
            Ok(())
        } else {
            Err(FigureError::InvalidData(format!(
                "sample index {index} out of range for {} samples",
                self.samples.len()
            )))
        }
    }

    /// Axes with tick marks and value labels.
    pub fn draw_axis(&mut self) {
        let (w, h, m) = (
            f64::from(self.config.width),
            f64::from(self.config.height),
            f64::from(self.config.margin),
        );
        let range = self.range();
        let x_ticks = self.config.x_ticks;
        let y_ticks = self.config.y_ticks;
        let dw = (w - 2.0 * m) / f64::from(x_ticks);
        let dh = (h - 2.0 * m) / f64::from(y_ticks);
        let x_step = range.width() / f64::from(x_ticks);
        let y_step = range.height() / f64::from(y_ticks);
        let tick = dh / 10.0;

        self.window.set_color(self.config.axis_color);
        self.window.set_thickness(self.config.line_thickness);
        self.window.draw_line(m, h - m, m, m);
        self.window.draw_line(m, h - m, w - m, h - m);

        for i in 0..=x_ticks {
            let i = f64::from(i);
            let x = m + i * dw;
            self.window.draw_line(x, h - m - tick, x, h - m + tick);
            let label = format!("{}", (range.min_x + i * x_step).trunc() as i64);
            self.window
                .write_aligned(x, h - m + 10.0, &label, TextHAlign::Center);
        }

        for i in 0..=y_ticks {
            let i = f64::from(i);
            let y = h - m - i * dh;
            self.window.draw_line(m - tick, y, m + tick, y);
            let label = format_tick(range.min_y + i * y_step);
            self.window
                .write_aligned(m - tick - 2.0, y - 0.2 * dh, &label, TextHAlign::Right);
        }
    }

    /// Dashed grid lines at every tick.
    pub fn draw_grid(&mut self) {
        let (w, h, m) = (
            self.config.width as i32,
            self.config.height as i32,
            self.config.margin as i32,
        );
        let dw = f64::from(w - 2 * m) / f64::from(self.config.x_ticks);
        let dh = f64::from(h - 2 * m) / f64::from(self.config.y_ticks);

        self.window.set_color(self.config.grid_color);
        self.window.set_thickness(1);

        for i in 1..=self.config.y_ticks {
            let y = f64::from(h - m) - f64::from(i) * dh;
            for x in (m..w - m).step_by(GRID_PERIOD) {
                self.window
                    .draw_line(f64::from(x), y, f64::from(x + GRID_DASH), y);
            }
        }
        for i in 1..=self.config.x_ticks {
            let x = f64::from(m) + f64::from(i) * dw;
            let mut y = h - m;
            while y > m {
                self.window
                    .draw_line(x, f64::from(y), x, f64::from(y - GRID_DASH));
                y -= GRID_PERIOD as i32;
            }
        }
    }

    /// Polyline through consecutive samples.
    pub fn plot(&mut self) {
        if self.samples.is_empty() {
            return;
        }
        let layout = self.layout();
        self.use_line_brush();
        for (n, pair) in self.samples.windows(2).enumerate() {
            let n = n as f64;
            self.window.draw_line(
                layout.x(n),
                layout.y(pair[0]),
                layout.x(n + 1.0),
                layout.y(pair[1]),
            );
        }
    }

    /// Sets `samples` and plots them, optionally in a new line color.
    pub fn plot_samples(&mut self, samples: &[f64], color: Option<Color>) -> FigureResult<()> {
        if let Some(color) = color {
            self.set_line_color(color);
        }
        self.set(samples)?;
        self.plot();
        Ok(())
    }

    /// Segment from value `y0` at index `n0` to `y1` at `n1`.
    pub fn line(&mut self, y0: f64, n0: f64, y1: f64, n1: f64) {
        if self.samples.is_empty() {
            return;
        }
        let layout = self.layout();
        self.use_line_brush();
        self.window
            .draw_line(layout.x(n0), layout.y(y0), layout.x(n1), layout.y(y1));
    }

    /// Vertical line from one sample (or every sample) down to the x axis.
    pub fn stem(&mut self, index: Option<usize>) -> FigureResult<()> {
        if self.samples.is_empty() {
            return Ok(());
        }
        if let Some(index) = index {
            self.check_index(index)?;
        }
        let layout = self.layout();
        self.use_line_brush();
        for (n, value) in self.selected(index) {
            let x = layout.x(n as f64);
            self.window.draw_line(x, layout.y(value), x, layout.baseline());
        }
        Ok(())
    }

    /// Small circle at one sample (or every sample).
    pub fn scatter(&mut self, index: Option<usize>) -> FigureResult<()> {
        if self.samples.is_empty() {
            return Ok(());
        }
        if let Some(index) = index {
            self.check_index(index)?;
        }
        let layout = self.layout();
        self.use_line_brush();
        for (n, value) in self.selected(index) {
            self.window.draw_circle(layout.x(n as f64), layout.y(value), 2.0);
        }
        Ok(())
    }

    fn selected(&self, index: Option<usize>) -> Vec<(usize, f64)> {
        match index {
            Some(index) => vec![(index, self.samples[index])],
            None => self.samples.iter().copied().enumerate().collect(),
        }
    }

    /// Label just above sample `index`.
    pub fn text(&mut self, index: usize, label: &str) -> FigureResult<()> {
        if self.samples.is_empty() {
            return Ok(());
        }
        self.check_index(index)?;
        let layout = self.layout();
        let (x, y) = (layout.x(index as f64), layout.y(self.samples[index]));
        self.window.set_color(self.config.text_color);
        self.window.write(x, y - 20.0, label);
        Ok(())
    }

    /// One bar per sample from the x axis up to the value.
    pub fn bar(&mut self, filled: bool) {
        if self.samples.is_empty() {
            return;
        }
        let layout = self.layout();
        let thickness = self.config.line_thickness.max(1);
        self.window.set_color(self.config.bar_color);
        self.window
            .set_thickness(if filled { -thickness } else { thickness });
        let bar_width = layout.step_x() * 0.9;
        for (n, &value) in self.samples.iter().enumerate() {
            let top = layout.y(value);
            self.window.draw_rectangle(
                layout.x(n as f64),
                top,
                bar_width,
                layout.baseline() - top,
            );
        }
    }

    /// Highlights sample `index` with a circle and stem in `color` (the mark
    /// color when `None`).
    pub fn mark(&mut self, index: usize, color: Option<Color>) -> FigureResult<()> {
        if self.samples.is_empty() {
            return Ok(());
        }
        self.check_index(index)?;
        let saved = self.config.line_color;
        self.config.line_color = color.unwrap_or(self.config.mark_color);
        let result = self
            .scatter(Some(index))
            .and_then(|()| self.stem(Some(index)));
        self.config.line_color = saved;
        result
    }

    /// Draws axes, grid and title as configured, then presents the frame.
    pub fn show(&mut self) -> FigureResult<()> {
        self.window.set_margin(self.config.margin as i32);
        if self.config.show_axes {
            self.draw_axis();
        }
        if self.config.show_grid {
            self.draw_grid();
        }
        if let Some(title) = self.config.title.clone() {
            let m = f64::from(self.config.margin);
            self.window.set_color(self.config.axis_color);
            self.window.write(m, m / 2.0, &title);
            self.window.set_color(self.config.line_color);
        }
        self.window.show()
    }

    pub fn refresh(&mut self) -> FigureResult<()> {
        self.window.refresh()
    }

    /// Clears everything drawn since the last reset.
    pub fn reset(&mut self) {
        self.window.reset_display();
    }

    /// New display size; the canvas is cleared.
    pub fn resize(&mut self, width: u32, height: u32) -> FigureResult<()> {
        let mut config = self.config.clone();
        config.width = width;
        config.height = height;
        config.validate()?;
        self.config = config;
        debug!(width, height, "resize figure");
        self.window.init(width, height)
    }

    pub fn move_to(&mut self, x: i32, y: i32) -> FigureResult<()> {
        self.window.move_to(x, y)
    }

    pub fn wait<E: EventSource + ?Sized>(
        &mut self,
        events: &mut E,
        timeout: Duration,
    ) -> FigureResult<Option<Key>> {
        self.window.wait(events, timeout)
    }
}

#[cfg(test)]
mod tests {
    use super::{Figure, FigureConfig};
    use crate::render::NullRenderer;

    #[test]
    fn auto_range_spans_indices_and_values() {
        let mut figure =
            Figure::new("strip", NullRenderer::default(), FigureConfig::default()).expect("figure");
        figure.set(&[3.0, -1.0, 5.0, 2.0]).expect("set");
        let range = figure.range();
        assert_eq!((range.min_x, range.max_x), (0.0, 4.0));
        assert_eq!((range.min_y, range.max_y), (-1.0, 5.0));
    }

    #[test]
    fn draw_calls_on_empty_figure_are_no_ops() {
        let mut figure =
            Figure::new("strip", NullRenderer::default(), FigureConfig::default()).expect("figure");
        figure.plot();
        figure.bar(true);
        figure.stem(None).expect("stem");
        figure.mark(3, None).expect("mark on empty figure");
        assert!(figure.window().frame().is_empty());
    }
}
