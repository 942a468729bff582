use tracing::debug;

use crate::core::{DataPoint, ImageBuffer, PlotStyle, Viewport};
use crate::error::FigureResult;
use crate::interaction::EventSource;
use crate::render::SurfaceFactory;

use super::{ImageInspector, InspectorConfig, Plot};

/// Window size used by the plotting entry points.
pub const PLOT_WINDOW_SIZE: Viewport = Viewport {
    width: 1024,
    height: 512,
};

/// Inspects `image` interactively with the default setup until quit.
///
/// Returns the last clicked pixel, if any.
pub fn display<F, E>(
    image: &ImageBuffer,
    surfaces: F,
    events: &mut E,
) -> FigureResult<Option<(i32, i32)>>
where
    F: SurfaceFactory,
    E: EventSource + ?Sized,
{
    display_with(image, surfaces, events, InspectorConfig::default())
}

pub fn display_with<F, E>(
    image: &ImageBuffer,
    surfaces: F,
    events: &mut E,
    config: InspectorConfig,
) -> FigureResult<Option<(i32, i32)>>
where
    F: SurfaceFactory,
    E: EventSource + ?Sized,
{
    let mut inspector = ImageInspector::new(image.clone(), surfaces, config)?;
    inspector.create()?;
    inspector.run(events)?;
    Ok(inspector.last_click())
}

/// Plots `ys` against their index in dots and lines until quit.
///
/// Returns the data coordinate of the last left click, if any.
pub fn plot<F, E>(ys: &[f64], surfaces: F, events: &mut E) -> FigureResult<Option<DataPoint>>
where
    F: SurfaceFactory,
    E: EventSource + ?Sized,
{
    plot_with_style(None, ys, PlotStyle::default(), surfaces, events)
}

pub fn plot_xy<F, E>(
    xs: &[f64],
    ys: &[f64],
    surfaces: F,
    events: &mut E,
) -> FigureResult<Option<DataPoint>>
where
    F: SurfaceFactory,
    E: EventSource + ?Sized,
{
    plot_with_style(Some(xs), ys, PlotStyle::default(), surfaces, events)
}

/// Plots `ys` against `xs` (or the sample index) with an explicit style.
pub fn plot_with_style<F, E>(
    xs: Option<&[f64]>,
    ys: &[f64],
    style: PlotStyle,
    mut surfaces: F,
    events: &mut E,
) -> FigureResult<Option<DataPoint>>
where
    F: SurfaceFactory,
    E: EventSource + ?Sized,
{
    let renderer = surfaces.open("plot", PLOT_WINDOW_SIZE)?;
    let mut plot = Plot::new(renderer, PLOT_WINDOW_SIZE)?;
    match xs {
        Some(xs) => plot.set_xy(xs, ys)?,
        None => plot.set_values(ys)?,
    }
    plot.set_style(style);
    debug!(samples = ys.len(), ?style, "plot");
    plot.display(events)?;
    Ok(plot.last_click())
}
