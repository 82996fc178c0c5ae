//! Filter configuration records.
//!
//! Each filter owns a small immutable record whose `Default` is the
//! documented default. [`FilterOp`] wraps all of them so a whole chain can be
//! described as data and (de)serialized as JSON.
//!
//! Out-of-range numbers are accepted; the filter's own arithmetic and the
//! engine's [`OverflowPolicy`](crate::transform::evaluate::OverflowPolicy)
//! decide what happens to them.

use serde::{Deserialize, Serialize};

pub use crate::filters::gray::{GrayMode, LightenLevel};
pub use crate::filters::lumios::LumiosColor;
pub use crate::filters::predominance::PredominantColor;
pub use crate::transform::kernel::BuiltinKernel;

/// Add `floor(255 × adjust / 100)` to every channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Brightness {
    /// Percent of full scale. Default: 5.
    pub adjust: i32,
}

impl Default for Brightness {
    fn default() -> Self {
        Self { adjust: 5 }
    }
}

/// Scale distance from mid-gray by `((adjust + 100) / 100)²`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Contrast {
    /// Percent. 0 = neutral.
    pub adjust: i32,
}

/// Push non-maximal channels away from (positive) or toward (negative) the max.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Saturation {
    /// Percent. Default: 10.
    pub adjust: i32,
}

impl Default for Saturation {
    fn default() -> Self {
        Self { adjust: 10 }
    }
}

/// Saturation weighted by how saturated the pixel already is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Vibrance {
    /// Percent. Default: 50.
    pub adjust: i32,
}

impl Default for Vibrance {
    fn default() -> Self {
        Self { adjust: 50 }
    }
}

/// Gray-scale conversion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct GrayScale {
    pub mode: GrayMode,
}

/// Sepia toning blended in by percent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Sepia {
    /// Percent of the full sepia matrix. Default: 100.
    pub adjust: i32,
}

impl Default for Sepia {
    fn default() -> Self {
        Self { adjust: 100 }
    }
}

/// Photographic negative.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Invert;

/// Uniform per-pixel noise added equally to all channels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Noise {
    /// Percent of full scale for the noise half-width. Default: 10.
    pub adjust: i32,
    /// Seed for reproducible output. `None` draws a fresh seed per call.
    pub seed: Option<u64>,
}

impl Default for Noise {
    fn default() -> Self {
        Self {
            adjust: 10,
            seed: None,
        }
    }
}

/// Power curve on normalized channels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Gamma {
    /// Exponent. Default: 2. 1 = neutral.
    pub adjust: f64,
}

impl Default for Gamma {
    fn default() -> Self {
        Self { adjust: 2.0 }
    }
}

/// Snap channels near either end of the range to that end.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Clip {
    /// Percent of full scale for the band width. Default: 15.
    pub adjust: i32,
}

impl Default for Clip {
    fn default() -> Self {
        Self { adjust: 15 }
    }
}

/// Black-and-white binarization of the luma.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Threshold {
    /// Luma cut. Values strictly above become white. Default: 127.
    pub limiar: i32,
}

impl Default for Threshold {
    fn default() -> Self {
        Self { limiar: 127 }
    }
}

/// Invert channels above a limit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Solarize {
    /// Default: 128. 255 = neutral.
    pub limit: i32,
}

impl Default for Solarize {
    fn default() -> Self {
        Self { limit: 128 }
    }
}

/// Keep pixels of one named color, gray out the rest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Predominance {
    pub color: PredominantColor,
}

/// Tint toward one primary.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Lumios {
    /// Default: blue.
    pub color: LumiosColor,
    /// Fraction in `[0, 1]`; each 0.1 is one lift step. Default: 0.1.
    pub percent: f64,
}

impl Default for Lumios {
    fn default() -> Self {
        Self {
            color: LumiosColor::Blue,
            percent: 0.1,
        }
    }
}

/// Brightness(+10) → Contrast(+30) → Sepia(60 %) → Saturation(−30).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SoftSaturation;

/// Convolution with one of the built-in kernels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Convolve {
    pub kernel: BuiltinKernel,
}

/// Box blur.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BoxBlur {
    /// Pixels averaged in each direction; may be fractional. Default: 1.
    pub radius: f32,
}

impl Default for BoxBlur {
    fn default() -> Self {
        Self { radius: 1.0 }
    }
}

/// Gaussian blur.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GaussianBlur {
    /// Standard deviation in pixels. Default: 2.
    pub sigma: f32,
}

impl Default for GaussianBlur {
    fn default() -> Self {
        Self { sigma: 2.0 }
    }
}

/// Unsharp mask.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UnsharpMask {
    /// Blur standard deviation. Default: 2.
    pub sigma: f32,
    /// Strength of the sharpening, in percent. Default: 50.
    pub percent: i32,
    /// Minimum difference before sharpening kicks in. Default: 3.
    pub threshold: i32,
}

impl Default for UnsharpMask {
    fn default() -> Self {
        Self {
            sigma: 2.0,
            percent: 50,
            threshold: 3,
        }
    }
}

/// Any filter, as data.
///
/// Serialized with a `"filter"` tag next to the record's own fields, e.g.
/// `{"filter": "brightness", "adjust": 10}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "filter", rename_all = "snake_case")]
pub enum FilterOp {
    Brightness(Brightness),
    Contrast(Contrast),
    Saturation(Saturation),
    Vibrance(Vibrance),
    Gray(GrayScale),
    Sepia(Sepia),
    Invert,
    Noise(Noise),
    Gamma(Gamma),
    Clip(Clip),
    Threshold(Threshold),
    Solarize(Solarize),
    Predominance(Predominance),
    Lumios(Lumios),
    SoftSaturation,
    Convolve(Convolve),
    BoxBlur(BoxBlur),
    GaussianBlur(GaussianBlur),
    UnsharpMask(UnsharpMask),
}
