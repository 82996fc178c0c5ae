//! Spatial filters: kernel convolution, box blur, Gaussian blur, and unsharp
//! mask.
//!
//! Everything here runs on the pixel engine, so rows are processed in
//! parallel and alpha is copied from the source. Blurs are separable: one
//! horizontal pass kept in `f64`, then a vertical pass, with edge pixels
//! extended outward. Spatial filters always saturate into `0..=255`,
//! whatever the overflow policy says.

use std::fmt;
use std::str::FromStr;

use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::error::FilterError;
use crate::image::Raster;
use crate::transform::evaluate::{EngineOptions, OverflowPolicy, map_rows};

const SATURATE: EngineOptions = EngineOptions {
    overflow: OverflowPolicy::Clamp,
};

/// Largest accepted box-blur radius or Gaussian sigma, in pixels.
pub const MAX_BLUR_RADIUS: f32 = 4096.0;

/// Square convolution kernel with a scale and an offset.
///
/// ```text
/// out = round(Σ wᵢ · pᵢ / scale + offset)
/// ```
///
/// Pixels closer than `size / 2` to an edge have no full neighbourhood and
/// are copied from the source unchanged.
#[derive(Debug, Clone, PartialEq)]
pub struct Kernel {
    size: u32,
    weights: Vec<f64>,
    scale: f64,
    offset: f64,
}

impl Kernel {
    /// Build a kernel from `size × size` row-major weights. `size` must be odd.
    ///
    /// `scale` defaults to the sum of the weights, or 1 when they sum to 0.
    pub fn new(
        size: u32,
        weights: Vec<f64>,
        scale: Option<f64>,
        offset: f64,
    ) -> Result<Self, FilterError> {
        if size % 2 == 0 {
            return Err(FilterError::invalid(
                "kernel size",
                size.to_string(),
                "an odd size",
            ));
        }
        let side = size as usize;
        if weights.len() != side * side {
            return Err(FilterError::invalid(
                "kernel weights",
                format!("{} weights", weights.len()),
                "size * size weights",
            ));
        }
        if !weights.iter().all(|w| w.is_finite()) || !offset.is_finite() {
            return Err(FilterError::invalid(
                "kernel weights",
                format!("{weights:?} + {offset}"),
                "finite weights and offset",
            ));
        }
        let scale = match scale {
            Some(s) if s.is_finite() && s != 0.0 => s,
            Some(s) => {
                return Err(FilterError::invalid(
                    "kernel scale",
                    s.to_string(),
                    "a finite non-zero value",
                ));
            }
            None => default_scale(&weights),
        };
        Ok(Self {
            size,
            weights,
            scale,
            offset,
        })
    }

    fn preset(size: u32, weights: &[f64], scale: f64, offset: f64) -> Self {
        Self {
            size,
            weights: weights.to_vec(),
            scale,
            offset,
        }
    }

    pub fn size(&self) -> u32 {
        self.size
    }

    pub fn weights(&self) -> &[f64] {
        &self.weights
    }

    pub fn scale(&self) -> f64 {
        self.scale
    }

    pub fn offset(&self) -> f64 {
        self.offset
    }
}

fn default_scale(weights: &[f64]) -> f64 {
    let sum: f64 = weights.iter().sum();
    if sum == 0.0 { 1.0 } else { sum }
}

/// Built-in kernels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BuiltinKernel {
    /// 5×5 ring average.
    Blur,
    /// Edge detector on a white background (offset 255).
    Contour,
    Detail,
    EdgeEnhance,
    EdgeEnhanceMore,
    /// Relief effect around mid-gray (offset 128).
    Emboss,
    FindEdges,
    #[default]
    Sharpen,
    /// Stronger sharpen: center 8, four direct neighbours −1.
    SharpenStrong,
    Smooth,
    /// 5×5 center-weighted smooth.
    SmoothMore,
}

impl BuiltinKernel {
    /// All built-in kernels, in declaration order.
    pub const ALL: [Self; 11] = [
        Self::Blur,
        Self::Contour,
        Self::Detail,
        Self::EdgeEnhance,
        Self::EdgeEnhanceMore,
        Self::Emboss,
        Self::FindEdges,
        Self::Sharpen,
        Self::SharpenStrong,
        Self::Smooth,
        Self::SmoothMore,
    ];

    /// Name accepted by [`FromStr`].
    pub const fn name(self) -> &'static str {
        match self {
            Self::Blur => "blur",
            Self::Contour => "contour",
            Self::Detail => "detail",
            Self::EdgeEnhance => "edge_enhance",
            Self::EdgeEnhanceMore => "edge_enhance_more",
            Self::Emboss => "emboss",
            Self::FindEdges => "find_edges",
            Self::Sharpen => "sharpen",
            Self::SharpenStrong => "sharpen_strong",
            Self::Smooth => "smooth",
            Self::SmoothMore => "smooth_more",
        }
    }

    /// Weights, scale, and offset of this preset.
    pub fn kernel(self) -> Kernel {
        match self {
            Self::Blur => Kernel::preset(
                5,
                &[
                    1.0, 1.0, 1.0, 1.0, 1.0, //
                    1.0, 0.0, 0.0, 0.0, 1.0, //
                    1.0, 0.0, 0.0, 0.0, 1.0, //
                    1.0, 0.0, 0.0, 0.0, 1.0, //
                    1.0, 1.0, 1.0, 1.0, 1.0,
                ],
                16.0,
                0.0,
            ),
            Self::Contour => Kernel::preset(
                3,
                &[-1.0, -1.0, -1.0, -1.0, 8.0, -1.0, -1.0, -1.0, -1.0],
                1.0,
                255.0,
            ),
            Self::Detail => Kernel::preset(
                3,
                &[0.0, -1.0, 0.0, -1.0, 10.0, -1.0, 0.0, -1.0, 0.0],
                6.0,
                0.0,
            ),
            Self::EdgeEnhance => Kernel::preset(
                3,
                &[-1.0, -1.0, -1.0, -1.0, 10.0, -1.0, -1.0, -1.0, -1.0],
                2.0,
                0.0,
            ),
            Self::EdgeEnhanceMore => Kernel::preset(
                3,
                &[-1.0, -1.0, -1.0, -1.0, 9.0, -1.0, -1.0, -1.0, -1.0],
                1.0,
                0.0,
            ),
            Self::Emboss => Kernel::preset(
                3,
                &[-1.0, 0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 0.0],
                1.0,
                128.0,
            ),
            Self::FindEdges => Kernel::preset(
                3,
                &[-1.0, -1.0, -1.0, -1.0, 8.0, -1.0, -1.0, -1.0, -1.0],
                1.0,
                0.0,
            ),
            Self::Sharpen => Kernel::preset(
                3,
                &[-2.0, -2.0, -2.0, -2.0, 32.0, -2.0, -2.0, -2.0, -2.0],
                16.0,
                0.0,
            ),
            Self::SharpenStrong => Kernel::preset(
                3,
                &[0.0, -1.0, 0.0, -1.0, 8.0, -1.0, 0.0, -1.0, 0.0],
                4.0,
                0.0,
            ),
            Self::Smooth => Kernel::preset(
                3,
                &[1.0, 1.0, 1.0, 1.0, 5.0, 1.0, 1.0, 1.0, 1.0],
                13.0,
                0.0,
            ),
            Self::SmoothMore => Kernel::preset(
                5,
                &[
                    1.0, 1.0, 1.0, 1.0, 1.0, //
                    1.0, 5.0, 5.0, 5.0, 1.0, //
                    1.0, 5.0, 44.0, 5.0, 1.0, //
                    1.0, 5.0, 5.0, 5.0, 1.0, //
                    1.0, 1.0, 1.0, 1.0, 1.0,
                ],
                100.0,
                0.0,
            ),
        }
    }
}

impl fmt::Display for BuiltinKernel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for BuiltinKernel {
    type Err = FilterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = s.trim().to_ascii_lowercase().replace('-', "_");
        Self::ALL
            .into_iter()
            .find(|kernel| kernel.name() == name)
            .ok_or_else(|| {
                FilterError::invalid(
                    "kernel",
                    s,
                    "blur, contour, detail, edge_enhance, edge_enhance_more, emboss, \
                     find_edges, sharpen, sharpen_strong, smooth or smooth_more",
                )
            })
    }
}

/// Convolve the color channels with `kernel`.
pub fn convolve(raster: &Raster, kernel: &Kernel) -> Result<Raster, FilterError> {
    let radius = kernel.size / 2;
    let side = kernel.size as usize;
    let (width, height) = (raster.width(), raster.height());

    map_rows(
        "convolve",
        raster,
        &SATURATE,
        |y| y,
        |&mut y, x, rgb| {
            if x < radius || y < radius || x + radius >= width || y + radius >= height {
                return rgb.map(f64::from);
            }
            let mut acc = [0.0_f64; 3];
            for (i, weight) in kernel.weights.iter().enumerate() {
                let sx = x + (i % side) as u32 - radius;
                let sy = y + (i / side) as u32 - radius;
                if let Some(px) = raster.rgb(sx, sy) {
                    for c in 0..3 {
                        acc[c] += weight * f64::from(px[c]);
                    }
                }
            }
            acc.map(|v| (v / kernel.scale + kernel.offset).round())
        },
    )
}

/// Average over a `(2 × radius + 1)²` box, extending edge pixels outward.
///
/// A fractional radius gives the outermost row and column a partial weight.
/// Radius 0 returns the input unchanged.
pub fn box_blur(raster: &Raster, radius: f32) -> Result<Raster, FilterError> {
    if !(radius.is_finite() && (0.0..=MAX_BLUR_RADIUS).contains(&radius)) {
        return Err(FilterError::invalid(
            "radius",
            radius.to_string(),
            "a value in 0..=4096",
        ));
    }
    if radius == 0.0 || raster.is_empty() {
        return Ok(raster.clone());
    }

    separable("box_blur", raster, &box_taps(f64::from(radius)))
}

/// Convolve with `taps` along rows, then along columns. `taps` has odd
/// length and is centered on the output pixel.
fn separable(name: &'static str, raster: &Raster, taps: &[f64]) -> Result<Raster, FilterError> {
    let reach = (taps.len() / 2) as i64;
    let width = raster.width() as usize;
    let height = raster.height() as usize;

    let mut rows = vec![[0.0_f64; 3]; raster.pixels().len()];
    rows.par_chunks_mut(width)
        .zip(raster.pixels().par_chunks(width))
        .for_each(|(out, row)| {
            for (x, acc) in out.iter_mut().enumerate() {
                for (k, weight) in taps.iter().enumerate() {
                    let px = row[clamp_index(x as i64 + k as i64 - reach, width)];
                    for c in 0..3 {
                        acc[c] += weight * f64::from(px[c]);
                    }
                }
            }
        });

    map_rows(
        name,
        raster,
        &SATURATE,
        |y| y as usize,
        |&mut y, x, _| {
            let mut acc = [0.0_f64; 3];
            for (k, weight) in taps.iter().enumerate() {
                let sy = clamp_index(y as i64 + k as i64 - reach, height);
                let px = rows[sy * width + x as usize];
                for c in 0..3 {
                    acc[c] += weight * px[c];
                }
            }
            acc.map(f64::round)
        },
    )
}

/// Normalized 1-D box weights: whole pixels within `radius` weigh 1, the
/// next pixel on each side weighs the fractional part.
fn box_taps(radius: f64) -> Vec<f64> {
    let whole = radius.floor();
    let frac = radius - whole;
    let norm = 2.0 * radius + 1.0;
    let mut taps = vec![1.0 / norm; 2 * whole as usize + 1];
    if frac > 0.0 {
        taps.insert(0, frac / norm);
        taps.push(frac / norm);
    }
    taps
}

fn clamp_index(i: i64, len: usize) -> usize {
    i.clamp(0, len as i64 - 1) as usize
}

/// Gaussian blur with standard deviation `sigma` pixels.
pub fn gaussian_blur(raster: &Raster, sigma: f32) -> Result<Raster, FilterError> {
    check_sigma(sigma)?;
    if raster.is_empty() {
        return Ok(raster.clone());
    }
    separable("gaussian_blur", raster, &gaussian_taps(f64::from(sigma)))
}

/// Normalized 1-D Gaussian weights reaching `ceil(3σ)` pixels each way.
fn gaussian_taps(sigma: f64) -> Vec<f64> {
    let reach = (3.0 * sigma).ceil() as i64;
    let taps: Vec<f64> = (-reach..=reach)
        .map(|k| (-((k * k) as f64) / (2.0 * sigma * sigma)).exp())
        .collect();
    let sum: f64 = taps.iter().sum();
    taps.into_iter().map(|t| t / sum).collect()
}

/// Unsharp mask.
///
/// ```text
/// diff = p − gaussian(p, sigma)
/// out  = p + diff × percent / 100   if |diff| >= threshold
///        p                          otherwise
/// ```
pub fn unsharp_mask(
    raster: &Raster,
    sigma: f32,
    percent: i32,
    threshold: i32,
) -> Result<Raster, FilterError> {
    let blurred = gaussian_blur(raster, sigma)?;
    let gain = f64::from(percent) / 100.0;

    map_rows(
        "unsharp_mask",
        raster,
        &SATURATE,
        |y| y,
        |&mut y, x, rgb| {
            let soft = blurred.rgb(x, y).unwrap_or(rgb);
            std::array::from_fn(|c| {
                let diff = i32::from(rgb[c]) - i32::from(soft[c]);
                let base = f64::from(rgb[c]);
                if diff.abs() >= threshold {
                    (base + f64::from(diff) * gain).round()
                } else {
                    base
                }
            })
        },
    )
}

fn check_sigma(sigma: f32) -> Result<(), FilterError> {
    if sigma.is_finite() && sigma > 0.0 && sigma <= MAX_BLUR_RADIUS {
        Ok(())
    } else {
        Err(FilterError::invalid(
            "sigma",
            sigma.to_string(),
            "a value above 0 and at most 4096",
        ))
    }
}
