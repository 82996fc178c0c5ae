//! Raster representation shared by every filter.

use std::fmt;
use std::path::Path;

use image::{DynamicImage, RgbImage, RgbaImage};

use crate::error::FilterError;

/// Channel layout of a raster, remembered so encoding writes the same layout back.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChannelLayout {
    /// Three 8-bit channels.
    Rgb,
    /// Three 8-bit color channels plus 8-bit alpha.
    Rgba,
}

impl fmt::Display for ChannelLayout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Rgb => write!(f, "RGB"),
            Self::Rgba => write!(f, "RGBA"),
        }
    }
}

impl From<image::ColorType> for ChannelLayout {
    fn from(color: image::ColorType) -> Self {
        if color.has_alpha() {
            Self::Rgba
        } else {
            Self::Rgb
        }
    }
}

/// Width × height grid of 8-bit pixels, stored row-major.
///
/// Pixels are always held as `[r, g, b, a]`. RGB rasters carry an opaque
/// alpha of 255 that is dropped again on encode. A raster is never mutated
/// after construction; filters build a new one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Raster {
    width: u32,
    height: u32,
    pixels: Vec<[u8; 4]>,
    layout: ChannelLayout,
}

impl Raster {
    /// Build a raster from row-major pixels.
    ///
    /// Fails with [`FilterError::InvalidParameter`] when `pixels.len()` is not
    /// `width * height`.
    pub fn new(
        width: u32,
        height: u32,
        pixels: Vec<[u8; 4]>,
        layout: ChannelLayout,
    ) -> Result<Self, FilterError> {
        let expected = width as usize * height as usize;
        if pixels.len() != expected {
            return Err(FilterError::invalid(
                "pixels",
                format!("{} pixels for {width}x{height}", pixels.len()),
                "exactly width * height pixels",
            ));
        }
        Ok(Self {
            width,
            height,
            pixels,
            layout,
        })
    }

    /// Build an RGB raster where every pixel is `rgb`.
    pub fn filled(width: u32, height: u32, rgb: [u8; 3]) -> Self {
        let px = [rgb[0], rgb[1], rgb[2], u8::MAX];
        Self {
            width,
            height,
            pixels: vec![px; width as usize * height as usize],
            layout: ChannelLayout::Rgb,
        }
    }

    /// Build an RGB raster by evaluating `f(x, y)` for every pixel.
    pub fn from_fn(width: u32, height: u32, mut f: impl FnMut(u32, u32) -> [u8; 3]) -> Self {
        let mut pixels = Vec::with_capacity(width as usize * height as usize);
        for y in 0..height {
            for x in 0..width {
                let [r, g, b] = f(x, y);
                pixels.push([r, g, b, u8::MAX]);
            }
        }
        Self {
            width,
            height,
            pixels,
            layout: ChannelLayout::Rgb,
        }
    }

    pub(crate) fn with_pixels(&self, pixels: Vec<[u8; 4]>) -> Self {
        debug_assert_eq!(pixels.len(), self.pixels.len());
        Self {
            width: self.width,
            height: self.height,
            pixels,
            layout: self.layout,
        }
    }

    /// Image width in pixels.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Image height in pixels.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Channel layout of the source.
    pub fn layout(&self) -> ChannelLayout {
        self.layout
    }

    /// All pixels in row-major order.
    pub fn pixels(&self) -> &[[u8; 4]] {
        &self.pixels
    }

    /// Pixel at `(x, y)`, or `None` outside the raster.
    pub fn get(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        Some(self.pixels[y as usize * self.width as usize + x as usize])
    }

    /// Color channels of the pixel at `(x, y)`, or `None` outside the raster.
    pub fn rgb(&self, x: u32, y: u32) -> Option<[u8; 3]> {
        self.get(x, y).map(|[r, g, b, _]| [r, g, b])
    }

    /// Returns `true` when the raster holds no pixels.
    pub fn is_empty(&self) -> bool {
        self.pixels.is_empty()
    }

    /// Convert a decoded image, keeping its alpha when it has one.
    pub fn from_dynamic(img: &DynamicImage) -> Self {
        let layout = ChannelLayout::from(img.color());
        let rgba = img.to_rgba8();
        let (width, height) = rgba.dimensions();
        let pixels = rgba.pixels().map(|p| p.0).collect();
        Self {
            width,
            height,
            pixels,
            layout,
        }
    }

    /// Convert to an `image` buffer in this raster's layout.
    pub fn to_dynamic(&self) -> DynamicImage {
        let raw: &[u8] = bytemuck::cast_slice(self.pixels.as_slice());
        match self.layout {
            ChannelLayout::Rgba => {
                let buf = RgbaImage::from_raw(self.width, self.height, raw.to_vec())
                    .unwrap_or_else(|| RgbaImage::new(self.width, self.height));
                DynamicImage::ImageRgba8(buf)
            }
            ChannelLayout::Rgb => {
                let rgb: Vec<u8> = self
                    .pixels
                    .iter()
                    .flat_map(|&[r, g, b, _]| [r, g, b])
                    .collect();
                let buf = RgbImage::from_raw(self.width, self.height, rgb)
                    .unwrap_or_else(|| RgbImage::new(self.width, self.height));
                DynamicImage::ImageRgb8(buf)
            }
        }
    }

    /// Encode to `path`; the format follows the file extension.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), FilterError> {
        crate::io::save_raster(self, path.as_ref())
    }

    /// Hand the raster to the platform image viewer.
    pub fn show(&self) -> Result<(), FilterError> {
        crate::io::show_raster(self, None).map(|_| ())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_rejects_wrong_pixel_count() {
        let err = Raster::new(2, 2, vec![[0, 0, 0, 255]; 3], ChannelLayout::Rgb).unwrap_err();
        assert!(matches!(err, FilterError::InvalidParameter { name: "pixels", .. }));
    }

    #[test]
    fn test_from_fn_is_row_major() {
        let raster = Raster::from_fn(3, 2, |x, y| [x as u8, y as u8, 0]);
        assert_eq!(raster.pixels()[4], [1, 1, 0, 255]);
        assert_eq!(raster.rgb(2, 1), Some([2, 1, 0]));
        assert_eq!(raster.get(3, 0), None);
    }

    #[test]
    fn test_dynamic_roundtrip_keeps_alpha() {
        let pixels = vec![[10, 20, 30, 40], [50, 60, 70, 80]];
        let raster = Raster::new(2, 1, pixels.clone(), ChannelLayout::Rgba).unwrap();
        let back = Raster::from_dynamic(&raster.to_dynamic());
        assert_eq!(back.layout(), ChannelLayout::Rgba);
        assert_eq!(back.pixels(), pixels.as_slice());
    }

    #[test]
    fn test_rgb_layout_encodes_three_channels() {
        let raster = Raster::filled(2, 2, [1, 2, 3]);
        let img = raster.to_dynamic();
        assert_eq!(img.color(), image::ColorType::Rgb8);
        assert_eq!(ChannelLayout::from(img.color()), ChannelLayout::Rgb);
    }
}
