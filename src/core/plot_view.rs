use serde::{Deserialize, Serialize};

use crate::core::{Bounds2, DataPoint, DevicePoint, Viewport};
use crate::error::{FigureError, FigureResult};

/// Lower clamp for the zoom factor; keeps the per-pixel scale away from zero.
pub const MIN_ZOOM_FACTOR: f64 = 1.0 / 128.0;

/// Half-extent used to widen a flat data axis.
const FLAT_AXIS_PAD: f64 = 0.5;

/// Which sample decorations a plot draws.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlotStyle {
    pub dots: bool,
    pub line: bool,
    pub stems: bool,
}

impl Default for PlotStyle {
    fn default() -> Self {
        Self {
            dots: true,
            line: true,
            stems: false,
        }
    }
}

impl PlotStyle {
    #[must_use]
    pub const fn dots() -> Self {
        Self {
            dots: true,
            line: false,
            stems: false,
        }
    }

    #[must_use]
    pub const fn line() -> Self {
        Self {
            dots: false,
            line: true,
            stems: false,
        }
    }

    #[must_use]
    pub const fn stems() -> Self {
        Self {
            dots: true,
            line: false,
            stems: true,
        }
    }
}

/// Viewport configuration of a pannable plot.
///
/// `bounds` is the data range fitted to the plot area at zoom 1; `x_shift` and
/// `y_shift` are the data coordinates sitting on the plot-area origin
/// (bottom-left corner).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlotParams {
    pub x_shift: f64,
    pub y_shift: f64,
    pub zoom_factor: f64,
    pub x_margin: f64,
    pub y_margin: f64,
    pub bounds: Bounds2,
    pub style: PlotStyle,
}

impl Default for PlotParams {
    fn default() -> Self {
        Self {
            x_shift: 0.0,
            y_shift: 0.0,
            zoom_factor: 1.0,
            x_margin: 80.0,
            y_margin: 50.0,
            bounds: Bounds2::default(),
            style: PlotStyle::default(),
        }
    }
}

impl PlotParams {
    pub fn validate(&self) -> FigureResult<()> {
        if !self.zoom_factor.is_finite() || self.zoom_factor <= 0.0 {
            return Err(FigureError::InvalidData(
                "zoom factor must be finite and > 0".to_owned(),
            ));
        }
        for (name, value) in [
            ("x_shift", self.x_shift),
            ("y_shift", self.y_shift),
            ("x_margin", self.x_margin),
            ("y_margin", self.y_margin),
        ] {
            if !value.is_finite() {
                return Err(FigureError::InvalidData(format!("`{name}` must be finite")));
            }
        }
        if self.x_margin < 0.0 || self.y_margin < 0.0 {
            return Err(FigureError::InvalidData(
                "plot margins must be >= 0".to_owned(),
            ));
        }
        Ok(())
    }

    pub fn from_json_str(input: &str) -> FigureResult<Self> {
        let params: Self = serde_json::from_str(input)
            .map_err(|e| FigureError::InvalidData(format!("failed to parse plot params: {e}")))?;
        params.validate()?;
        Ok(params)
    }

    pub fn to_json_pretty(&self) -> FigureResult<String> {
        serde_json::to_string_pretty(self)
            .map_err(|e| FigureError::InvalidData(format!("failed to serialize plot params: {e}")))
    }
}

/// Affine mapping between data, centered and device coordinates.
///
/// Centered space has its origin on the bottom-left corner of the plot area
/// with y growing upward; device space is the window's pixel grid.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewTransform {
    params: PlotParams,
    device: Viewport,
}

impl ViewTransform {
    pub fn new(mut params: PlotParams, device: Viewport) -> FigureResult<Self> {
        device.validate()?;
        params.validate()?;
        let plot_w = f64::from(device.width) - 2.0 * params.x_margin;
        let plot_h = f64::from(device.height) - 2.0 * params.y_margin;
        if plot_w <= 0.0 || plot_h <= 0.0 {
            return Err(FigureError::InvalidData(format!(
                "margins leave no plot area in a {}x{} window",
                device.width, device.height
            )));
        }
        params.bounds = params.bounds.ensure_extent(FLAT_AXIS_PAD);
        Ok(Self { params, device })
    }

    #[must_use]
    pub fn params(&self) -> &PlotParams {
        &self.params
    }

    #[must_use]
    pub fn device(&self) -> Viewport {
        self.device
    }

    /// Width and height of the plot area in pixels.
    #[must_use]
    pub fn plot_extent(&self) -> (f64, f64) {
        (
            f64::from(self.device.width) - 2.0 * self.params.x_margin,
            f64::from(self.device.height) - 2.0 * self.params.y_margin,
        )
    }

    /// Data units per pixel along each axis at the current zoom.
    #[must_use]
    pub fn scale(&self) -> (f64, f64) {
        let (plot_w, plot_h) = self.plot_extent();
        let bounds = self.params.bounds;
        (
            bounds.width() / plot_w * self.params.zoom_factor,
            bounds.height() / plot_h * self.params.zoom_factor,
        )
    }

    #[must_use]
    pub fn device_to_centered(&self, point: DevicePoint) -> (f64, f64) {
        (
            point.x - self.params.x_margin,
            f64::from(self.device.height) - point.y - self.params.y_margin,
        )
    }

    #[must_use]
    pub fn centered_to_device(&self, cx: f64, cy: f64) -> DevicePoint {
        DevicePoint::new(
            cx + self.params.x_margin,
            f64::from(self.device.height) - self.params.y_margin - cy,
        )
    }

    #[must_use]
    pub fn centered_to_data(&self, cx: f64, cy: f64) -> DataPoint {
        let (sx, sy) = self.scale();
        DataPoint::new(sx * cx + self.params.x_shift, sy * cy + self.params.y_shift)
    }

    #[must_use]
    pub fn data_to_centered(&self, point: DataPoint) -> (f64, f64) {
        let (sx, sy) = self.scale();
        (
            (point.x - self.params.x_shift) / sx,
            (point.y - self.params.y_shift) / sy,
        )
    }

    #[must_use]
    pub fn device_to_data(&self, point: DevicePoint) -> DataPoint {
        let (cx, cy) = self.device_to_centered(point);
        self.centered_to_data(cx, cy)
    }

    #[must_use]
    pub fn data_to_device(&self, point: DataPoint) -> DevicePoint {
        let (cx, cy) = self.data_to_centered(point);
        self.centered_to_device(cx, cy)
    }

    pub fn shift_x(&mut self, dx: f64) {
        self.params.x_shift += dx;
    }

    pub fn shift_y(&mut self, dy: f64) {
        self.params.y_shift += dy;
    }

    /// Multiplies the zoom factor by `factor` (clamped at `MIN_ZOOM_FACTOR`)
    /// and re-centers the view on `target`.
    pub fn zoom_by(&mut self, factor: f64, target: DataPoint) -> FigureResult<()> {
        if !factor.is_finite() || factor <= 0.0 {
            return Err(FigureError::InvalidData(
                "zoom step must be finite and > 0".to_owned(),
            ));
        }
        self.params.zoom_factor = (self.params.zoom_factor * factor).max(MIN_ZOOM_FACTOR);
        self.center_on(target);
        Ok(())
    }

    /// Restores zoom 1 without touching the shift.
    pub fn reset_zoom(&mut self) {
        self.params.zoom_factor = 1.0;
    }

    /// Shifts the view so `target` lands on the device center.
    pub fn center_on(&mut self, target: DataPoint) {
        let (gx, gy) = self.device.center();
        let at_center = self.device_to_data(DevicePoint::new(gx, gy));
        self.params.x_shift -= at_center.x - target.x;
        self.params.y_shift -= at_center.y - target.y;
    }

    pub fn set_bounds(&mut self, bounds: Bounds2) {
        self.params.bounds = bounds.ensure_extent(FLAT_AXIS_PAD);
    }

    pub fn set_style(&mut self, style: PlotStyle) {
        self.params.style = style;
    }

    /// Data span currently visible across the plot area's width.
    #[must_use]
    pub fn visible_x_span(&self) -> f64 {
        let (plot_w, _) = self.plot_extent();
        self.centered_to_data(plot_w, 0.0).x - self.centered_to_data(0.0, 0.0).x
    }

    /// Data span currently visible across the plot area's height.
    #[must_use]
    pub fn visible_y_span(&self) -> f64 {
        let (_, plot_h) = self.plot_extent();
        self.centered_to_data(0.0, plot_h).y - self.centered_to_data(0.0, 0.0).y
    }

    #[must_use]
    pub fn is_visible(&self, point: DevicePoint) -> bool {
        self.is_visible_x(point.x) && self.is_visible_y(point.y)
    }

    #[must_use]
    pub fn is_visible_x(&self, gx: f64) -> bool {
        gx >= self.params.x_margin && gx < f64::from(self.device.width) - self.params.x_margin
    }

    #[must_use]
    pub fn is_visible_y(&self, gy: f64) -> bool {
        gy >= self.params.y_margin && gy < f64::from(self.device.height) - self.params.y_margin
    }
}

#[cfg(test)]
mod tests {
    use super::{MIN_ZOOM_FACTOR, PlotParams, ViewTransform};
    use crate::core::{Bounds2, DataPoint, Viewport};
    use approx::assert_relative_eq;

    fn transform() -> ViewTransform {
        let params = PlotParams {
            bounds: Bounds2::new(0.0, 100.0, -1.0, 1.0),
            ..PlotParams::default()
        };
        ViewTransform::new(params, Viewport::new(1024, 512)).expect("valid transform")
    }

    #[test]
    fn plot_origin_maps_to_bottom_left_of_plot_area() {
        let view = transform();
        let origin = view.data_to_device(DataPoint::new(0.0, 0.0));
        assert_relative_eq!(origin.x, 80.0);
        assert_relative_eq!(origin.y, 512.0 - 50.0);
    }

    #[test]
    fn center_on_places_target_at_device_center() {
        let mut view = transform();
        view.center_on(DataPoint::new(42.0, 0.25));
        let center = view.data_to_device(DataPoint::new(42.0, 0.25));
        assert_relative_eq!(center.x, 512.0, epsilon = 1e-9);
        assert_relative_eq!(center.y, 256.0, epsilon = 1e-9);
    }

    #[test]
    fn zoom_is_clamped() {
        let mut view = transform();
        for _ in 0..20 {
            view.zoom_by(0.5, DataPoint::new(0.0, 0.0)).expect("zoom");
        }
        assert_eq!(view.params().zoom_factor, MIN_ZOOM_FACTOR);
    }

    #[test]
    fn visible_span_tracks_zoom() {
        let mut view = transform();
        assert_relative_eq!(view.visible_x_span(), 100.0, epsilon = 1e-9);
        view.zoom_by(0.5, DataPoint::new(50.0, 0.0)).expect("zoom");
        assert_relative_eq!(view.visible_x_span(), 50.0, epsilon = 1e-9);
    }

    #[test]
    fn margins_must_leave_plot_area() {
        let params = PlotParams::default();
        assert!(ViewTransform::new(params, Viewport::new(160, 400)).is_err());
        assert!(ViewTransform::new(params, Viewport::new(161, 400)).is_ok());
    }
}
