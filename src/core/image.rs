use crate::core::{PixelRect, Viewport};
use crate::error::{FigureError, FigureResult};

/// Owned 8-bit RGB raster with interleaved channels.
///
/// Every display buffer is three-channel; single-channel and RGBA input is
/// expanded or reduced on the way in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageBuffer {
    width: u32,
    height: u32,
    data: Vec<u8>,
}

impl ImageBuffer {
    pub const CHANNELS: usize = 3;

    /// Black image of the given size.
    pub fn new(width: u32, height: u32) -> FigureResult<Self> {
        Self::filled(width, height, [0, 0, 0])
    }

    pub fn filled(width: u32, height: u32, rgb: [u8; 3]) -> FigureResult<Self> {
        let len = checked_len(width, height)?;
        let mut data = Vec::with_capacity(len);
        for _ in 0..(len / Self::CHANNELS) {
            data.extend_from_slice(&rgb);
        }
        Ok(Self {
            width,
            height,
            data,
        })
    }

    /// Builds an RGB buffer from row-major samples with `channels` values per
    /// pixel: 1 (gray), 3 (RGB) or 4 (RGBA, alpha dropped).
    pub fn from_raw(data: &[u8], width: u32, height: u32, channels: usize) -> FigureResult<Self> {
        let len = checked_len(width, height)?;
        let pixels = len / Self::CHANNELS;
        if !matches!(channels, 1 | 3 | 4) {
            return Err(FigureError::InvalidImage(format!(
                "unsupported channel count: {channels}"
            )));
        }
        if data.len() != pixels * channels {
            return Err(FigureError::InvalidImage(format!(
                "expected {} samples for {width}x{height}x{channels}, got {}",
                pixels * channels,
                data.len()
            )));
        }

        let data = match channels {
            3 => data.to_vec(),
            1 => data.iter().flat_map(|&v| [v, v, v]).collect(),
            _ => data
                .chunks_exact(4)
                .flat_map(|px| [px[0], px[1], px[2]])
                .collect(),
        };
        Ok(Self {
            width,
            height,
            data,
        })
    }

    pub fn from_gray(data: &[u8], width: u32, height: u32) -> FigureResult<Self> {
        Self::from_raw(data, width, height, 1)
    }

    pub fn from_rgb(data: &[u8], width: u32, height: u32) -> FigureResult<Self> {
        Self::from_raw(data, width, height, 3)
    }

    #[must_use]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[must_use]
    pub fn height(&self) -> u32 {
        self.height
    }

    #[must_use]
    pub fn viewport(&self) -> Viewport {
        Viewport::new(self.width, self.height)
    }

    #[must_use]
    pub fn as_raw(&self) -> &[u8] {
        &self.data
    }

    fn offset(&self, x: i64, y: i64) -> Option<usize> {
        if x < 0 || y < 0 || x >= i64::from(self.width) || y >= i64::from(self.height) {
            return None;
        }
        usize::try_from((y * i64::from(self.width) + x) * Self::CHANNELS as i64).ok()
    }

    #[must_use]
    pub fn pixel(&self, x: i64, y: i64) -> Option<[u8; 3]> {
        self.offset(x, y)
            .map(|i| [self.data[i], self.data[i + 1], self.data[i + 2]])
    }

    /// Writes one pixel; coordinates outside the image are ignored.
    pub fn set_pixel(&mut self, x: i64, y: i64, rgb: [u8; 3]) {
        if let Some(i) = self.offset(x, y) {
            self.data[i..i + Self::CHANNELS].copy_from_slice(&rgb);
        }
    }

    pub fn fill(&mut self, rgb: [u8; 3]) {
        for px in self.data.chunks_exact_mut(Self::CHANNELS) {
            px.copy_from_slice(&rgb);
        }
    }

    /// Copies `region` into a new buffer of the region's size. Source pixels
    /// outside this image come out black.
    pub fn crop(&self, region: PixelRect) -> FigureResult<Self> {
        if region.is_empty() {
            return Err(FigureError::InvalidImage(format!(
                "crop region must be non-empty, got {}x{}",
                region.width, region.height
            )));
        }
        let mut out = Self::new(region.width as u32, region.height as u32)?;
        for dy in 0..region.height {
            for dx in 0..region.width {
                if let Some(rgb) = self.pixel(
                    i64::from(region.x) + i64::from(dx),
                    i64::from(region.y) + i64::from(dy),
                ) {
                    out.set_pixel(i64::from(dx), i64::from(dy), rgb);
                }
            }
        }
        Ok(out)
    }

    /// Square `size x size` window centered on `(cx, cy)`.
    ///
    /// The half-width is `(size - 1) / 2`, so even sizes leave the last row
    /// and column black.
    pub fn crop_centered(&self, cx: i32, cy: i32, size: u32) -> FigureResult<Self> {
        let side = i32::try_from(size)
            .map_err(|_| FigureError::InvalidImage(format!("window size too large: {size}")))?;
        if side <= 0 {
            return Err(FigureError::InvalidImage(
                "window size must be > 0".to_owned(),
            ));
        }
        let half = (side - 1) / 2;
        let mut out = Self::new(size, size)?;
        for yu in -half..=half {
            for xu in -half..=half {
                if let Some(rgb) = self.pixel(
                    i64::from(cx) + i64::from(xu),
                    i64::from(cy) + i64::from(yu),
                ) {
                    out.set_pixel(i64::from(xu + half), i64::from(yu + half), rgb);
                }
            }
        }
        Ok(out)
    }

    /// Saturates the blue channel of every pixel flagged in `mask`
    /// (row-major, one entry per pixel).
    pub fn overlay_mask(&mut self, mask: &[bool]) -> FigureResult<()> {
        let pixels = self.data.len() / Self::CHANNELS;
        if mask.len() != pixels {
            return Err(FigureError::InvalidImage(format!(
                "mask has {} entries, image has {pixels} pixels",
                mask.len()
            )));
        }
        for (px, _) in self
            .data
            .chunks_exact_mut(Self::CHANNELS)
            .zip(mask)
            .filter(|(_, flagged)| **flagged)
        {
            px[2] = 255;
        }
        Ok(())
    }

    /// Packs the image into native-endian ARGB32 rows of `stride` bytes,
    /// the layout cairo image surfaces expect. Alpha is always opaque.
    pub fn to_argb32(&self, stride: usize) -> FigureResult<Vec<u8>> {
        let row_bytes = self.width as usize * 4;
        if stride < row_bytes {
            return Err(FigureError::InvalidImage(format!(
                "stride {stride} shorter than row of {row_bytes} bytes"
            )));
        }
        let mut out = vec![0u8; stride * self.height as usize];
        let src_row = self.width as usize * Self::CHANNELS;
        for (src, dst) in self
            .data
            .chunks_exact(src_row.max(1))
            .zip(out.chunks_exact_mut(stride))
        {
            for (rgb, argb) in src.chunks_exact(Self::CHANNELS).zip(dst.chunks_exact_mut(4)) {
                let word = 0xff00_0000
                    | (u32::from(rgb[0]) << 16)
                    | (u32::from(rgb[1]) << 8)
                    | u32::from(rgb[2]);
                argb.copy_from_slice(&word.to_ne_bytes());
            }
        }
        Ok(out)
    }

    /// Inverse of `to_argb32`. Premultiplied color is un-premultiplied using
    /// the stored alpha; fully transparent pixels become black.
    pub fn from_argb32(data: &[u8], width: u32, height: u32, stride: usize) -> FigureResult<Self> {
        let row_bytes = width as usize * 4;
        if stride < row_bytes || data.len() < stride * height as usize {
            return Err(FigureError::InvalidImage(format!(
                "argb32 buffer too small for {width}x{height} with stride {stride}"
            )));
        }
        let mut out = Self::new(width, height)?;
        for (y, row) in data.chunks_exact(stride).take(height as usize).enumerate() {
            for (x, px) in row[..row_bytes].chunks_exact(4).enumerate() {
                let word = u32::from_ne_bytes([px[0], px[1], px[2], px[3]]);
                let alpha = (word >> 24) & 0xff;
                let channel = |shift: u32| -> u8 {
                    let value = (word >> shift) & 0xff;
                    match alpha {
                        0 => 0,
                        255 => value as u8,
                        a => ((value * 255 + a / 2) / a).min(255) as u8,
                    }
                };
                out.set_pixel(x as i64, y as i64, [channel(16), channel(8), channel(0)]);
            }
        }
        Ok(out)
    }
}

fn checked_len(width: u32, height: u32) -> FigureResult<usize> {
    if width == 0 || height == 0 {
        return Err(FigureError::InvalidViewport { width, height });
    }
    (width as usize)
        .checked_mul(height as usize)
        .and_then(|pixels| pixels.checked_mul(ImageBuffer::CHANNELS))
        .ok_or_else(|| FigureError::InvalidImage(format!("image too large: {width}x{height}")))
}
