use std::ops::ControlFlow;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, trace};

use crate::core::{ImageBuffer, Viewport};
use crate::error::{FigureError, FigureResult};
use crate::interaction::{EventSource, Key, KeyBindings, MouseButton};
use crate::render::{Color, SurfaceFactory};

use super::{TextAnnotation, Window};

const MAIN_WINDOW_NAME: &str = "image window";
const MAGNIFIER_WINDOW_NAME: &str = "zoom";
const HELP_COLOR: Color = Color::rgb(1.0, 1.0, 10.0 / 255.0);

/// Image inspector setup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct InspectorConfig {
    /// On-screen width of the main window; the height keeps the image aspect.
    pub window_width: u32,
    /// Side of the square region shown by the magnifier.
    pub magnifier_size: u32,
    /// On-screen enlargement of the magnifier window.
    pub magnifier_scale: u32,
    pub poll_interval_ms: u64,
    pub hover: bool,
    pub help: bool,
    pub shadow: bool,
}

impl Default for InspectorConfig {
    fn default() -> Self {
        Self {
            window_width: 700,
            magnifier_size: 101,
            magnifier_scale: 3,
            poll_interval_ms: 5,
            hover: true,
            help: true,
            shadow: true,
        }
    }
}

impl InspectorConfig {
    pub fn validate(&self) -> FigureResult<()> {
        if self.window_width == 0 || self.magnifier_size == 0 || self.magnifier_scale == 0 {
            return Err(FigureError::InvalidData(
                "inspector window, magnifier size and scale must be > 0".to_owned(),
            ));
        }
        Ok(())
    }

    pub fn from_json_str(input: &str) -> FigureResult<Self> {
        let config: Self = serde_json::from_str(input).map_err(|e| {
            FigureError::InvalidData(format!("failed to parse inspector config: {e}"))
        })?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_json_pretty(&self) -> FigureResult<String> {
        serde_json::to_string_pretty(self).map_err(|e| {
            FigureError::InvalidData(format!("failed to serialize inspector config: {e}"))
        })
    }

    #[must_use]
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InspectorAction {
    Quit,
    ToggleHover,
    ToggleHelp,
    ToggleShadow,
    ToggleMagnifier,
}

fn default_bindings() -> KeyBindings<InspectorAction> {
    KeyBindings::new()
        .with(Key::Char('h'), InspectorAction::ToggleHelp, "toggle help text")
        .with(Key::Char('q'), InspectorAction::Quit, "quit")
        .with(Key::Char('z'), InspectorAction::ToggleMagnifier, "toggle zoom window")
        .with(Key::Char('m'), InspectorAction::ToggleShadow, "enable mouse shadow")
        .with(Key::Char('b'), InspectorAction::ToggleHover, "toggle hover tracking")
}

/// Interactive viewer for one image: cursor shadow, magnifier window, help
/// and coordinate overlays.
pub struct ImageInspector<F: SurfaceFactory> {
    surfaces: F,
    config: InspectorConfig,
    image: ImageBuffer,
    main: Option<Window<F::Renderer>>,
    magnifier: Option<Window<F::Renderer>>,
    cursor: (i32, i32),
    last_click: Option<(i32, i32)>,
    annotations: Vec<TextAnnotation>,
    bindings: KeyBindings<InspectorAction>,
}

impl<F: SurfaceFactory> ImageInspector<F> {
    pub fn new(image: ImageBuffer, surfaces: F, config: InspectorConfig) -> FigureResult<Self> {
        config.validate()?;
        Ok(Self {
            surfaces,
            config,
            image,
            main: None,
            magnifier: None,
            cursor: (0, 0),
            last_click: None,
            annotations: Vec::new(),
            bindings: default_bindings(),
        })
    }

    #[must_use]
    pub fn config(&self) -> &InspectorConfig {
        &self.config
    }

    #[must_use]
    pub fn image(&self) -> &ImageBuffer {
        &self.image
    }

    #[must_use]
    pub fn main_window(&self) -> Option<&Window<F::Renderer>> {
        self.main.as_ref()
    }

    #[must_use]
    pub fn magnifier(&self) -> Option<&Window<F::Renderer>> {
        self.magnifier.as_ref()
    }

    /// Last hovered (or clicked) image pixel.
    #[must_use]
    pub fn cursor(&self) -> (i32, i32) {
        self.cursor
    }

    #[must_use]
    pub fn last_click(&self) -> Option<(i32, i32)> {
        self.last_click
    }

    #[must_use]
    pub fn hover(&self) -> bool {
        self.config.hover
    }

    #[must_use]
    pub fn help(&self) -> bool {
        self.config.help
    }

    #[must_use]
    pub fn shadow(&self) -> bool {
        self.config.shadow
    }

    #[must_use]
    pub fn bindings(&self) -> &KeyBindings<InspectorAction> {
        &self.bindings
    }

    pub fn bindings_mut(&mut self) -> &mut KeyBindings<InspectorAction> {
        &mut self.bindings
    }

    /// On-screen size of the main window.
    #[must_use]
    pub fn window_size(&self) -> Viewport {
        let width = self.config.window_width;
        let aspect = f64::from(self.image.height()) / f64::from(self.image.width());
        let height = (f64::from(width) * aspect).round().max(1.0) as u32;
        Viewport::new(width, height)
    }

    /// Opens the main window showing the image at the origin of the screen.
    pub fn create(&mut self) -> FigureResult<()> {
        let renderer = self
            .surfaces
            .open(MAIN_WINDOW_NAME, self.image.viewport())?;
        let mut window = Window::new(MAIN_WINDOW_NAME, renderer, self.image.viewport())?;
        window.set_image(&self.image);
        let size = self.window_size();
        window.resize(size.width, size.height)?;
        window.move_to(0, 0)?;
        window.reset_mouse();
        window.show()?;
        debug!(
            width = size.width,
            height = size.height,
            "create inspector window"
        );
        self.main = Some(window);
        Ok(())
    }

    fn main_mut(&mut self) -> FigureResult<&mut Window<F::Renderer>> {
        self.main
            .as_mut()
            .ok_or_else(|| FigureError::Backend("inspector window is not created".to_owned()))
    }

    /// Persistent text drawn on every pass.
    pub fn set_annotations(&mut self, annotations: Vec<TextAnnotation>) {
        self.annotations = annotations;
    }

    /// Opens the magnifier next to the main window, or closes it when open.
    pub fn toggle_magnifier(&mut self) -> FigureResult<()> {
        if self.magnifier.take().is_some() {
            debug!("close magnifier");
            return Ok(());
        }
        let side = self.config.magnifier_size;
        let size = Viewport::new(side, side);
        let renderer = self.surfaces.open(MAGNIFIER_WINDOW_NAME, size)?;
        let mut window = Window::new(MAGNIFIER_WINDOW_NAME, renderer, size)?;
        let scaled = side * self.config.magnifier_scale;
        window.resize(scaled, scaled)?;
        window.move_to(self.window_size().width as i32, 0)?;
        window.show()?;
        debug!(size = side, "open magnifier");
        self.magnifier = Some(window);
        Ok(())
    }

    /// Copies the region around the cursor into the magnifier and outlines
    /// its central part.
    ///
    /// Only the main window's image raster is magnified. Overlays queued on
    /// the main window in the same pass, such as the crosshair and messages,
    /// do not appear in the magnifier.
    pub fn update_magnifier(&mut self) -> FigureResult<()> {
        let (Some(zoom), Some(main)) = (self.magnifier.as_mut(), self.main.as_ref()) else {
            return Ok(());
        };
        let side = self.config.magnifier_size as i32;
        let (x, y) = self.cursor;
        zoom.set_display_from(main, x, y, self.config.magnifier_size)?;
        let half = (f64::from(side) / 2.5) as i32;
        let corner = side / 2 - half;
        zoom.draw_rectangle(
            f64::from(corner),
            f64::from(corner),
            f64::from(2 * half + 1),
            f64::from(2 * half + 1),
        );
        Ok(())
    }

    /// Pixel marker, crosshair arms, diagonal ticks and a ring around the
    /// cursor.
    pub fn draw_mouse_shadow(&mut self) -> FigureResult<()> {
        if !self.config.shadow {
            return Ok(());
        }
        let (x, y) = self.cursor;
        let (x, y) = (f64::from(x), f64::from(y));
        let window = self.main_mut()?;
        window.set_thickness(1);
        window.set_color(Color::WHITE);
        window.mark_with(x, y, 0);
        window.set_color(Color::GREEN);
        window.draw_line(x, y + 4.0, x, y + 17.0);
        window.draw_line(x, y - 4.0, x, y - 17.0);
        window.draw_line(x + 4.0, y, x + 17.0, y);
        window.draw_line(x - 4.0, y, x - 17.0, y);
        window.set_color(Color::RED);
        for (dx, dy) in [(1.0, -1.0), (1.0, 1.0), (-1.0, -1.0), (-1.0, 1.0)] {
            window.draw_line(x + 3.0 * dx, y + 3.0 * dy, x + 15.0 * dx, y + 15.0 * dy);
        }
        window.draw_circle(x, y, 15.0);
        Ok(())
    }

    /// One line per key binding in the top-left corner.
    pub fn display_help(&mut self) -> FigureResult<()> {
        if !self.config.help {
            return Ok(());
        }
        let lines = self.bindings.help_lines();
        let window = self.main_mut()?;
        window.set_color(HELP_COLOR);
        for (row, line) in lines.iter().enumerate() {
            window.write(10.0, 20.0 * (row as f64 + 1.0), line);
        }
        Ok(())
    }

    /// Cursor coordinates near the bottom of the image, plus annotations.
    pub fn display_messages(&mut self) -> FigureResult<()> {
        let (x, y) = self.cursor;
        let bottom = f64::from(self.image.height()) - 20.0;
        let annotations = std::mem::take(&mut self.annotations);
        let window = self.main_mut()?;
        window.set_color(Color::YELLOW);
        window.write(10.0, bottom, &format!("({x},{y})"));
        window.write_annotations(&annotations);
        self.annotations = annotations;
        Ok(())
    }

    /// Applies the binding of `key`. Returns `Break` on quit.
    pub fn handle_key(&mut self, key: Key) -> FigureResult<ControlFlow<()>> {
        if key == Key::Close {
            return Ok(ControlFlow::Break(()));
        }
        let Some(action) = self.bindings.resolve(key) else {
            return Ok(ControlFlow::Continue(()));
        };
        trace!(?key, ?action, "inspector key");
        match action {
            InspectorAction::Quit => return Ok(ControlFlow::Break(())),
            InspectorAction::ToggleHover => self.config.hover = !self.config.hover,
            InspectorAction::ToggleHelp => self.config.help = !self.config.help,
            InspectorAction::ToggleShadow => self.config.shadow = !self.config.shadow,
            InspectorAction::ToggleMagnifier => self.toggle_magnifier()?,
        }
        Ok(ControlFlow::Continue(()))
    }

    /// Tracks the cursor while hovering and records left clicks.
    pub fn handle_mouse(&mut self) -> FigureResult<()> {
        let hover = self.config.hover;
        let window = self.main_mut()?;
        let mut cursor = None;
        if hover {
            if let Some(position) = window.mouse_move_event() {
                cursor = Some(position);
                window.reset_mouse();
            }
        }
        let click = window.mouse_click(MouseButton::Left);
        if let Some((x, y)) = click {
            info!(x, y, "clicked");
            window.reset_mouse();
            cursor = Some((x, y));
            self.last_click = click;
        }
        if let Some(position) = cursor {
            self.cursor = position;
        }
        Ok(())
    }

    fn refresh(&mut self) -> FigureResult<()> {
        self.main_mut()?.refresh()?;
        if let Some(zoom) = self.magnifier.as_mut() {
            zoom.refresh()?;
        }
        Ok(())
    }

    /// Runs the interactive loop until quit, creating the window first when
    /// needed.
    pub fn run<E: EventSource + ?Sized>(&mut self, events: &mut E) -> FigureResult<()> {
        if self.main.is_none() {
            self.create()?;
        }
        let poll = self.config.poll_interval();
        self.main_mut()?.reset_mouse();
        loop {
            let window = self.main_mut()?;
            window.reset_display();
            if let Some(key) = window.wait(events, poll)? {
                if self.handle_key(key)?.is_break() {
                    break;
                }
            }
            self.handle_mouse()?;
            self.draw_mouse_shadow()?;
            self.update_magnifier()?;
            self.display_help()?;
            self.display_messages()?;
            self.refresh()?;
        }
        debug!("inspector closed");
        Ok(())
    }

    /// Shows the image without overlays until a key arrives or, with a
    /// `timeout`, until it elapses. Returns the key, if any.
    pub fn display_only<E: EventSource + ?Sized>(
        &mut self,
        events: &mut E,
        timeout: Option<Duration>,
    ) -> FigureResult<Option<Key>> {
        if self.main.is_none() {
            self.create()?;
        }
        let poll = self.config.poll_interval();
        let window = self.main_mut()?;
        window.show()?;
        match timeout {
            Some(timeout) => window.wait(events, timeout),
            None => loop {
                if let Some(key) = window.wait(events, poll)? {
                    return Ok(Some(key));
                }
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::InspectorConfig;

    #[test]
    fn default_config_matches_documented_values() {
        let config = InspectorConfig::default();
        assert_eq!(config.window_width, 700);
        assert_eq!(config.magnifier_size, 101);
        assert_eq!(config.poll_interval_ms, 5);
        assert!(config.hover && config.help && config.shadow);
    }

    #[test]
    fn zero_magnifier_is_rejected() {
        let error = InspectorConfig::from_json_str(r#"{"magnifier_size":0}"#)
            .expect_err("zero magnifier must fail");
        assert!(error.to_string().contains("magnifier"));
    }
}
