use std::ops::ControlFlow;
use std::time::Duration;

use smallvec::SmallVec;
use tracing::{debug, info, trace};

use crate::core::{
    Bounds2, DataPoint, DevicePoint, PlotParams, PlotStyle, ViewTransform, Viewport, format_fixed,
    nearest_point_index,
};
use crate::error::{FigureError, FigureResult};
use crate::interaction::{EventSource, Key, KeyBindings, MouseButton};
use crate::render::{Color, Renderer};

use super::Window;

/// Key poll timeout of the interactive loop.
pub const PLOT_POLL_INTERVAL: Duration = Duration::from_millis(40);

/// Ticks per axis drawn by `Plot::draw_grid`.
const GRID_TICKS: u32 = 10;
/// Dotted grid marks between two ticks.
const GRID_DOTS_PER_TICK: u32 = 4;
/// Length of the cursor crosshair arms.
const CROSSHAIR_ARM: f64 = 30.0;
/// Fraction of the visible span moved by one arrow key press.
const PAN_FRACTION: f64 = 10.0;
const ZOOM_STEP: f64 = 0.8;

const BORDER_COLOR: Color = Color::rgb(100.0 / 255.0, 100.0 / 255.0, 150.0 / 255.0);
const ORIGIN_AXIS_COLOR: Color = Color::rgb(125.0 / 255.0, 125.0 / 255.0, 110.0 / 255.0);
const POINT_COLOR: Color = Color::rgb(10.0 / 255.0, 1.0, 0.0);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlotAction {
    Quit,
    ToggleGrid,
    ResetView,
    PanLeft,
    PanRight,
    PanUp,
    PanDown,
    ZoomOut,
    ZoomIn,
}

fn default_bindings() -> KeyBindings<PlotAction> {
    KeyBindings::new()
        .with(Key::Char('q'), PlotAction::Quit, "quit")
        .with(Key::Char('g'), PlotAction::ToggleGrid, "toggle grid")
        .with(Key::Char('0'), PlotAction::ResetView, "reset zoom and center on origin")
        .with(Key::Left, PlotAction::PanLeft, "pan left")
        .with(Key::Right, PlotAction::PanRight, "pan right")
        .with(Key::Up, PlotAction::PanUp, "pan up")
        .with(Key::Down, PlotAction::PanDown, "pan down")
        .with(Key::Char('-'), PlotAction::ZoomOut, "zoom out")
        .with(Key::Char('='), PlotAction::ZoomIn, "zoom in")
}

/// Marker size for the current zoom: `round(2 / zoom)` kept within 2..=10.
fn point_size(zoom_factor: f64) -> i32 {
    (2.0 / zoom_factor).round().clamp(2.0, 10.0) as i32
}

/// Pannable, zoomable scatter/line plot of `(x, y)` samples.
///
/// Samples are drawn through a `ViewTransform`; arrow keys pan, `-`/`=`
/// zoom around the sample nearest the cursor, a right click centers on
/// the nearest sample and a left click marks and records the clicked point.
pub struct Plot<R: Renderer> {
    window: Window<R>,
    transform: ViewTransform,
    samples: Vec<DataPoint>,
    show_grid: bool,
    cursor: Option<DevicePoint>,
    last_click: Option<DataPoint>,
    bindings: KeyBindings<PlotAction>,
}

impl<R: Renderer> Plot<R> {
    pub fn new(renderer: R, size: Viewport) -> FigureResult<Self> {
        Self::with_params(renderer, size, PlotParams::default())
    }

    pub fn with_params(renderer: R, size: Viewport, params: PlotParams) -> FigureResult<Self> {
        let transform = ViewTransform::new(params, size)?;
        let mut window = Window::new("plot", renderer, size)?;
        window.move_to(0, 0)?;
        Ok(Self {
            window,
            transform,
            samples: Vec::new(),
            show_grid: true,
            cursor: None,
            last_click: None,
            bindings: default_bindings(),
        })
    }

    #[must_use]
    pub fn window(&self) -> &Window<R> {
        &self.window
    }

    pub fn window_mut(&mut self) -> &mut Window<R> {
        &mut self.window
    }

    #[must_use]
    pub fn transform(&self) -> &ViewTransform {
        &self.transform
    }

    #[must_use]
    pub fn params(&self) -> &PlotParams {
        self.transform.params()
    }

    #[must_use]
    pub fn samples(&self) -> &[DataPoint] {
        &self.samples
    }

    #[must_use]
    pub fn show_grid(&self) -> bool {
        self.show_grid
    }

    #[must_use]
    pub fn cursor(&self) -> Option<DevicePoint> {
        self.cursor
    }

    /// Data coordinate of the most recent left click.
    #[must_use]
    pub fn last_click(&self) -> Option<DataPoint> {
        self.last_click
    }

    #[must_use]
    pub fn bindings(&self) -> &KeyBindings<PlotAction> {
        &self.bindings
    }

    pub fn bindings_mut(&mut self) -> &mut KeyBindings<PlotAction> {
        &mut self.bindings
    }

    /// Replaces the view parameters wholesale.
    pub fn set_params(&mut self, params: PlotParams) -> FigureResult<()> {
        self.transform = ViewTransform::new(params, self.window.size())?;
        Ok(())
    }

    pub fn set_style(&mut self, style: PlotStyle) {
        self.transform.set_style(style);
    }

    /// Plots `ys` against their index.
    pub fn set_values(&mut self, ys: &[f64]) -> FigureResult<()> {
        let points = ys
            .iter()
            .enumerate()
            .map(|(index, &y)| DataPoint::new(index as f64, y))
            .collect();
        self.replace_samples(points)
    }

    pub fn set_xy(&mut self, xs: &[f64], ys: &[f64]) -> FigureResult<()> {
        if xs.len() != ys.len() {
            return Err(FigureError::InvalidData(format!(
                "x/y length mismatch: {} vs {}",
                xs.len(),
                ys.len()
            )));
        }
        let points = xs
            .iter()
            .zip(ys)
            .map(|(&x, &y)| DataPoint::new(x, y))
            .collect();
        self.replace_samples(points)
    }

    fn replace_samples(&mut self, points: Vec<DataPoint>) -> FigureResult<()> {
        if points.iter().any(|p| !p.x.is_finite() || !p.y.is_finite()) {
            return Err(FigureError::InvalidData(
                "plot samples must be finite".to_owned(),
            ));
        }
        if let Some(bounds) = Bounds2::from_points(points.iter().map(|p| (p.x, p.y))) {
            self.transform.set_bounds(bounds);
        }
        debug!(count = points.len(), "set plot samples");
        self.samples = points;
        Ok(())
    }

    pub fn shift_x(&mut self, dx: f64) {
        self.transform.shift_x(dx);
    }

    pub fn shift_y(&mut self, dy: f64) {
        self.transform.shift_y(dy);
    }

    /// Zooms by `factor` and re-centers on the sample nearest the cursor, or
    /// on the cursor itself when there are no samples.
    pub fn zoom(&mut self, factor: f64) -> FigureResult<()> {
        let cursor = self.cursor.unwrap_or_else(|| {
            let (x, y) = self.window.size().center();
            DevicePoint::new(x, y)
        });
        let under_cursor = self.transform.device_to_data(cursor);
        let target = self
            .find_closest(under_cursor.x, under_cursor.y)
            .map_or(under_cursor, |index| self.samples[index]);
        self.transform.zoom_by(factor, target)?;
        trace!(zoom = self.transform.params().zoom_factor, "zoom plot");
        Ok(())
    }

    /// Moves the view so data point `(tx, ty)` sits at the window center.
    pub fn center_coordinate(&mut self, tx: f64, ty: f64) {
        self.transform.center_on(DataPoint::new(tx, ty));
    }

    /// Visible data span along x.
    #[must_use]
    pub fn x_range(&self) -> f64 {
        self.transform.visible_x_span()
    }

    /// Visible data span along y.
    #[must_use]
    pub fn y_range(&self) -> f64 {
        self.transform.visible_y_span()
    }

    /// Index of the sample closest (on screen) to data point `(rx, ry)`.
    #[must_use]
    pub fn find_closest(&self, rx: f64, ry: f64) -> Option<usize> {
        nearest_point_index(&self.samples, DataPoint::new(rx, ry), &self.transform)
    }

    /// Clears the display and draws grid and data, then presents.
    pub fn redraw(&mut self) -> FigureResult<()> {
        self.window.reset_display();
        if self.show_grid {
            self.draw_grid();
        }
        self.draw_data();
        self.window.refresh()
    }

    fn draw_data(&mut self) {
        let style = self.transform.params().style;
        if style.stems {
            self.draw_stems();
        }
        if style.dots {
            self.draw_points();
        }
        if style.line {
            self.draw_line();
        }
    }

    /// Plot-area border, tick marks with data labels, dotted grid and the
    /// axes through the data origin when they are on screen.
    pub fn draw_grid(&mut self) {
        let t = self.transform;
        let (plot_w, plot_h) = t.plot_extent();
        let device = t.device();

        self.window.set_color(BORDER_COLOR);
        self.window.set_thickness(1);

        let corners = [
            t.centered_to_device(0.0, 0.0),
            t.centered_to_device(plot_w, 0.0),
            t.centered_to_device(plot_w, plot_h),
            t.centered_to_device(0.0, plot_h),
        ];
        for (i, from) in corners.iter().enumerate() {
            let to = corners[(i + 1) % corners.len()];
            self.window.draw_line(from.x, from.y, to.x, to.y);
        }
        let (mid_x, mid_y) = device.center();
        self.window.mark_with(mid_x, mid_y, 0);

        let dots = GRID_TICKS * GRID_DOTS_PER_TICK;
        let x_step = plot_w / f64::from(GRID_TICKS);
        let y_step = plot_h / f64::from(GRID_TICKS);

        for i in 0..=GRID_TICKS {
            let cx = f64::from(i) * x_step;
            for k in 0..dots {
                let dot = t.centered_to_device(cx, f64::from(k) * plot_h / f64::from(dots));
                self.window.mark_with(dot.x, dot.y, 0);
            }
            let top = t.centered_to_device(cx, 0.0);
            let bottom = t.centered_to_device(cx, -10.0);
            self.window.draw_line(top.x, top.y, bottom.x, bottom.y - 2.0);
            let value = t.device_to_data(top).x;
            self.window
                .write(bottom.x - 15.0, bottom.y, &format_fixed(value, 2));
        }

        for i in 0..=GRID_TICKS {
            let cy = f64::from(i) * y_step;
            for k in 0..dots {
                let dot = t.centered_to_device(f64::from(k) * plot_w / f64::from(dots), cy);
                self.window.mark_with(dot.x, dot.y, 0);
            }
            let outer = t.centered_to_device(-10.0, cy);
            let inner = t.centered_to_device(0.0, cy);
            self.window.draw_line(outer.x, outer.y, inner.x, inner.y);
            let value = t.device_to_data(inner).y;
            let label_x = if value > 0.0 { 30.0 } else { 17.0 };
            self.window
                .write(label_x, inner.y - 5.0, &format_fixed(value, 2));
        }

        let origin = t.data_to_device(DataPoint::new(0.0, 0.0));
        self.window.set_color(Color::RED);
        self.window.mark_with(origin.x, origin.y, 5);

        let params = t.params();
        let (w, h) = (f64::from(device.width), f64::from(device.height));
        let mut axes: SmallVec<[(f64, f64, f64, f64); 2]> = SmallVec::new();
        if t.is_visible_x(origin.x) {
            axes.push((origin.x, params.y_margin, origin.x, h - params.y_margin));
        }
        if t.is_visible_y(origin.y) {
            axes.push((params.x_margin, origin.y, w - params.x_margin, origin.y));
        }
        self.window.set_color(ORIGIN_AXIS_COLOR);
        for (x0, y0, x1, y1) in axes {
            self.window.draw_line(x0, y0, x1, y1);
        }
    }

    /// One marker per sample, sized by the zoom factor.
    pub fn draw_points(&mut self) {
        let size = point_size(self.transform.params().zoom_factor);
        self.window.set_color(POINT_COLOR);
        for index in 0..self.samples.len() {
            let at = self.transform.data_to_device(self.samples[index]);
            self.window.mark_with(at.x, at.y, size);
        }
    }

    /// Polyline through consecutive samples.
    pub fn draw_line(&mut self) {
        self.window.set_color(Color::YELLOW);
        for index in 1..self.samples.len() {
            let from = self.transform.data_to_device(self.samples[index - 1]);
            let to = self.transform.data_to_device(self.samples[index]);
            self.window.draw_line(from.x, from.y, to.x, to.y);
        }
    }

    /// Vertical line from each sample to the data `y = 0` level.
    pub fn draw_stems(&mut self) {
        self.window.set_color(POINT_COLOR);
        for index in 0..self.samples.len() {
            let sample = self.samples[index];
            let top = self.transform.data_to_device(sample);
            let base = self.transform.data_to_device(DataPoint::new(sample.x, 0.0));
            self.window.draw_line(top.x, top.y, base.x, base.y);
        }
    }

    /// Crosshair at the cursor, a marker on the nearest sample with its
    /// projections onto both data axes, and a status line.
    pub fn draw_mouse_shadow(&mut self) {
        let Some(cursor) = self.cursor else {
            return;
        };
        let (mx, my) = (cursor.x, cursor.y);
        self.window.set_color(Color::RED);
        self.window.draw_line(mx, my + 1.0, mx, my + 1.0 + CROSSHAIR_ARM);
        self.window.draw_line(mx, my - 1.0, mx, my - 1.0 - CROSSHAIR_ARM);
        self.window.draw_line(mx + 1.0, my, mx + 1.0 + CROSSHAIR_ARM, my);
        self.window.draw_line(mx - 1.0, my, mx - 1.0 - CROSSHAIR_ARM, my);

        let data = self.transform.device_to_data(cursor);
        let status_y = f64::from(self.window.size().height) - 20.0;
        let mouse = format!("Mouse ({},{})", format_fixed(data.x, 3), format_fixed(data.y, 3));

        let Some(index) = self.find_closest(data.x, data.y) else {
            self.window.write(20.0, status_y, &mouse);
            return;
        };
        let closest = self.samples[index];
        let at = self.transform.data_to_device(closest);
        self.window.mark_with(at.x, at.y, 4);
        self.window.write(
            20.0,
            status_y,
            &format!("{mouse} -> [ Closest Point {index} ]"),
        );

        let projections = [
            (DataPoint::new(closest.x, 0.0), closest.x),
            (DataPoint::new(0.0, closest.y), closest.y),
        ];
        for (foot, value) in projections {
            let foot = self.transform.data_to_device(foot);
            self.window.draw_line(at.x, at.y, foot.x, foot.y);
            self.window
                .write(foot.x + 3.0, foot.y - 12.0, &format_fixed(value, 5));
        }
    }

    /// Applies the binding of `key`. Returns `Break` when the plot should
    /// close.
    pub fn handle_key(&mut self, key: Key) -> FigureResult<ControlFlow<()>> {
        if key == Key::Close {
            return Ok(ControlFlow::Break(()));
        }
        let Some(action) = self.bindings.resolve(key) else {
            return Ok(ControlFlow::Continue(()));
        };
        trace!(?key, ?action, "plot key");
        match action {
            PlotAction::Quit => return Ok(ControlFlow::Break(())),
            PlotAction::ToggleGrid => self.show_grid = !self.show_grid,
            PlotAction::ResetView => {
                self.transform.reset_zoom();
                self.center_coordinate(0.0, 0.0);
            }
            PlotAction::PanLeft => self.shift_x(-self.x_range() / PAN_FRACTION),
            PlotAction::PanRight => self.shift_x(self.x_range() / PAN_FRACTION),
            PlotAction::PanUp => self.shift_y(self.y_range() / PAN_FRACTION),
            PlotAction::PanDown => self.shift_y(-self.y_range() / PAN_FRACTION),
            PlotAction::ZoomOut => self.zoom(1.0 / ZOOM_STEP)?,
            PlotAction::ZoomIn => self.zoom(ZOOM_STEP)?,
        }
        self.redraw()?;
        Ok(ControlFlow::Continue(()))
    }

    /// Consumes the window's pending pointer event.
    ///
    /// A move only redraws the shadow and keeps the event pending, so the
    /// shadow follows every later redraw until the pointer does something
    /// else.
    pub fn handle_mouse(&mut self) -> FigureResult<()> {
        if let Some((x, y)) = self.window.mouse_move_event() {
            self.cursor = Some(DevicePoint::new(f64::from(x), f64::from(y)));
            self.draw_mouse_shadow();
            return self.window.refresh();
        }
        if let Some((x, y)) = self.window.mouse_click(MouseButton::Right) {
            let at = DevicePoint::new(f64::from(x), f64::from(y));
            self.cursor = Some(at);
            let data = self.transform.device_to_data(at);
            if let Some(index) = self.find_closest(data.x, data.y) {
                let target = self.samples[index];
                self.center_coordinate(target.x, target.y);
            }
            self.redraw()?;
        } else if let Some((x, y)) = self.window.mouse_click(MouseButton::Left) {
            let at = DevicePoint::new(f64::from(x), f64::from(y));
            self.cursor = Some(at);
            let data = self.transform.device_to_data(at);
            self.redraw()?;
            self.window.set_color(Color::RED);
            self.window
                .mark_with(at.x, at.y, point_size(self.transform.params().zoom_factor));
            self.window.refresh()?;
            info!(x, y, rx = data.x, ry = data.y, "clicked coordinate");
            self.last_click = Some(data);
        }
        self.window.reset_mouse();
        Ok(())
    }

    /// Runs the interactive loop until quit: the first sample is moved to
    /// the plot origin, then every poll handles one key, redraws and
    /// handles the pointer.
    pub fn display<E: EventSource + ?Sized>(&mut self, events: &mut E) -> FigureResult<()> {
        if let Some(first) = self.samples.first().copied() {
            self.shift_x(first.x);
            self.shift_y(first.y);
        }
        self.window.reset_mouse();
        self.redraw()?;
        loop {
            if let Some(key) = self.window.wait(events, PLOT_POLL_INTERVAL)? {
                if self.handle_key(key)?.is_break() {
                    break;
                }
            }
            self.redraw()?;
            self.handle_mouse()?;
            self.window.refresh()?;
        }
        debug!("plot closed");
        Ok(())
    }
}
