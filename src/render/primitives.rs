use serde::{Deserialize, Serialize};

use crate::error::{FigureError, FigureResult};

/// RGBA color in normalized 0..=1 channel values.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Color {
    pub red: f64,
    pub green: f64,
    pub blue: f64,
    pub alpha: f64,
}

impl Color {
    pub const BLACK: Self = Self::rgb(0.0, 0.0, 0.0);
    pub const WHITE: Self = Self::rgb(1.0, 1.0, 1.0);
    pub const RED: Self = Self::rgb(1.0, 0.0, 0.0);
    pub const GREEN: Self = Self::rgb(0.0, 1.0, 0.0);
    pub const YELLOW: Self = Self::rgb(1.0, 1.0, 0.0);

    #[must_use]
    pub const fn rgba(red: f64, green: f64, blue: f64, alpha: f64) -> Self {
        Self {
            red,
            green,
            blue,
            alpha,
        }
    }

    #[must_use]
    pub const fn rgb(red: f64, green: f64, blue: f64) -> Self {
        Self::rgba(red, green, blue, 1.0)
    }

    /// Opaque color from 8-bit channels.
    #[must_use]
    pub fn rgb8(red: u8, green: u8, blue: u8) -> Self {
        Self::rgb(
            f64::from(red) / 255.0,
            f64::from(green) / 255.0,
            f64::from(blue) / 255.0,
        )
    }

    /// 8-bit channels, rounded; alpha is ignored.
    #[must_use]
    pub fn to_rgb8(self) -> [u8; 3] {
        let quantize = |value: f64| (value.clamp(0.0, 1.0) * 255.0).round() as u8;
        [
            quantize(self.red),
            quantize(self.green),
            quantize(self.blue),
        ]
    }

    pub fn validate(self) -> FigureResult<()> {
        for (channel, value) in [
            ("red", self.red),
            ("green", self.green),
            ("blue", self.blue),
            ("alpha", self.alpha),
        ] {
            if !value.is_finite() || !(0.0..=1.0).contains(&value) {
                return Err(FigureError::InvalidData(format!(
                    "color channel `{channel}` must be finite and in [0, 1]"
                )));
            }
        }
        Ok(())
    }
}

fn ensure_finite(values: &[f64], what: &str) -> FigureResult<()> {
    if values.iter().all(|v| v.is_finite()) {
        Ok(())
    } else {
        Err(FigureError::InvalidData(format!(
            "{what} coordinates must be finite"
        )))
    }
}

/// Draw command for one line segment in pixel space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinePrimitive {
    pub x1: f64,
    pub y1: f64,
    pub x2: f64,
    pub y2: f64,
    pub stroke_width: f64,
    pub color: Color,
}

impl LinePrimitive {
    #[must_use]
    pub const fn new(x1: f64, y1: f64, x2: f64, y2: f64, stroke_width: f64, color: Color) -> Self {
        Self {
            x1,
            y1,
            x2,
            y2,
            stroke_width,
            color,
        }
    }

    pub fn validate(self) -> FigureResult<()> {
        ensure_finite(&[self.x1, self.y1, self.x2, self.y2], "line")?;
        if !self.stroke_width.is_finite() || self.stroke_width <= 0.0 {
            return Err(FigureError::InvalidData(
                "line stroke width must be finite and > 0".to_owned(),
            ));
        }
        self.color.validate()
    }
}

/// Draw command for an axis-aligned rectangle, either outlined or filled.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RectPrimitive {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub stroke_width: f64,
    pub filled: bool,
    pub color: Color,
}

impl RectPrimitive {
    #[must_use]
    pub const fn outline(
        x: f64,
        y: f64,
        width: f64,
        height: f64,
        stroke_width: f64,
        color: Color,
    ) -> Self {
        Self {
            x,
            y,
            width,
            height,
            stroke_width,
            filled: false,
            color,
        }
    }

    #[must_use]
    pub const fn filled(x: f64, y: f64, width: f64, height: f64, color: Color) -> Self {
        Self {
            x,
            y,
            width,
            height,
            stroke_width: 1.0,
            filled: true,
            color,
        }
    }

    pub fn validate(self) -> FigureResult<()> {
        ensure_finite(&[self.x, self.y, self.width, self.height], "rectangle")?;
        if !self.filled && (!self.stroke_width.is_finite() || self.stroke_width <= 0.0) {
            return Err(FigureError::InvalidData(
                "rectangle stroke width must be finite and > 0".to_owned(),
            ));
        }
        self.color.validate()
    }
}

/// Draw command for a circle centered at `(x, y)`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CirclePrimitive {
    pub x: f64,
    pub y: f64,
    pub radius: f64,
    pub stroke_width: f64,
    pub filled: bool,
    pub color: Color,
}

impl CirclePrimitive {
    #[must_use]
    pub const fn outline(x: f64, y: f64, radius: f64, stroke_width: f64, color: Color) -> Self {
        Self {
            x,
            y,
            radius,
            stroke_width,
            filled: false,
            color,
        }
    }

    #[must_use]
    pub const fn filled(x: f64, y: f64, radius: f64, color: Color) -> Self {
        Self {
            x,
            y,
            radius,
            stroke_width: 1.0,
            filled: true,
            color,
        }
    }

    pub fn validate(self) -> FigureResult<()> {
        ensure_finite(&[self.x, self.y], "circle")?;
        if !self.radius.is_finite() || self.radius < 0.0 {
            return Err(FigureError::InvalidData(
                "circle radius must be finite and >= 0".to_owned(),
            ));
        }
        if !self.filled && (!self.stroke_width.is_finite() || self.stroke_width <= 0.0) {
            return Err(FigureError::InvalidData(
                "circle stroke width must be finite and > 0".to_owned(),
            ));
        }
        self.color.validate()
    }
}

/// Single pixel write.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointPrimitive {
    pub x: f64,
    pub y: f64,
    pub color: Color,
}

impl PointPrimitive {
    #[must_use]
    pub const fn new(x: f64, y: f64, color: Color) -> Self {
        Self { x, y, color }
    }

    pub fn validate(self) -> FigureResult<()> {
        ensure_finite(&[self.x, self.y], "point")?;
        self.color.validate()
    }
}

/// Horizontal text alignment relative to `TextPrimitive::x`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextHAlign {
    Left,
    Center,
    Right,
}

/// Draw command for one label; `(x, y)` is the top-left of the text box for
/// left-aligned text.
#[derive(Debug, Clone, PartialEq)]
pub struct TextPrimitive {
    pub text: String,
    pub x: f64,
    pub y: f64,
    pub font_size_px: f64,
    pub color: Color,
    pub h_align: TextHAlign,
}

impl TextPrimitive {
    #[must_use]
    pub fn new(
        text: impl Into<String>,
        x: f64,
        y: f64,
        font_size_px: f64,
        color: Color,
        h_align: TextHAlign,
    ) -> Self {
        Self {
            text: text.into(),
            x,
            y,
            font_size_px,
            color,
            h_align,
        }
    }

    pub fn validate(&self) -> FigureResult<()> {
        if self.text.is_empty() {
            return Err(FigureError::InvalidData(
                "text primitive must not be empty".to_owned(),
            ));
        }
        ensure_finite(&[self.x, self.y], "text")?;
        if !self.font_size_px.is_finite() || self.font_size_px <= 0.0 {
            return Err(FigureError::InvalidData(
                "font size must be finite and > 0".to_owned(),
            ));
        }
        self.color.validate()
    }
}

#[cfg(test)]
mod tests {
    use super::{CirclePrimitive, Color, RectPrimitive};

    #[test]
    fn rgb8_round_trips() {
        let color = Color::rgb8(100, 255, 3);
        assert_eq!(color.to_rgb8(), [100, 255, 3]);
    }

    #[test]
    fn filled_shapes_skip_stroke_validation() {
        let mut rect = RectPrimitive::filled(0.0, 0.0, 4.0, 4.0, Color::RED);
        rect.stroke_width = 0.0;
        rect.validate().expect("filled rect ignores stroke");

        let circle = CirclePrimitive::outline(1.0, 1.0, 2.0, 0.0, Color::RED);
        assert!(circle.validate().is_err());
    }
}
