//! Pixel transform engine — runs a per-pixel mapping over a whole raster.
//!
//! Rows are processed in parallel with rayon. Every mapping returns
//! unclamped `f64` channels; the engine truncates toward zero and then
//! applies the [`OverflowPolicy`]. Alpha is copied through untouched.
//!
//! ```text
//!   Raster ──→ par rows ──→ f(rgb) ──→ trunc ──→ policy ──→ new Raster
//! ```

use std::fmt;
use std::str::FromStr;

use rand::Rng;
use rayon::prelude::*;
use tracing::debug;

use crate::error::FilterError;
use crate::filters::{chroma, gray, lumios, noise, predominance, tone};
use crate::image::Raster;
use crate::transform::kernel;
use crate::transform::params::{
    BoxBlur, Brightness, Clip, Contrast, Convolve, FilterOp, Gamma, GaussianBlur, GrayMode, GrayScale,
    Invert, Lumios, Noise, Predominance, Saturation, Sepia, SoftSaturation, Solarize, Threshold,
    UnsharpMask, Vibrance,
};

/// What to do with a channel that leaves `0..=255` after truncation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OverflowPolicy {
    /// Saturate to 0 or 255.
    #[default]
    Clamp,
    /// Abort with [`FilterError::ArithmeticOverflow`].
    Error,
}

impl fmt::Display for OverflowPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Clamp => write!(f, "clamp"),
            Self::Error => write!(f, "error"),
        }
    }
}

impl FromStr for OverflowPolicy {
    type Err = FilterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "clamp" => Ok(Self::Clamp),
            "error" => Ok(Self::Error),
            _ => Err(FilterError::invalid("overflow policy", s, "clamp or error")),
        }
    }
}

/// Engine settings shared by every filter in a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct EngineOptions {
    pub overflow: OverflowPolicy,
}

/// A transform from one raster to a new one.
pub trait Filter {
    /// Short name used in logs.
    fn name(&self) -> &'static str;

    /// Apply with explicit engine options.
    fn apply_with(&self, raster: &Raster, options: &EngineOptions) -> Result<Raster, FilterError>;

    /// Apply with default options (clamping).
    fn apply(&self, raster: &Raster) -> Result<Raster, FilterError> {
        self.apply_with(raster, &EngineOptions::default())
    }
}

/// Truncate toward zero, then bring into range per `policy`.
///
/// Returns the out-of-range integer value on overflow under
/// [`OverflowPolicy::Error`].
fn finalize(value: f64, policy: OverflowPolicy) -> Result<u8, i64> {
    let t = value.trunc();
    if (0.0..=255.0).contains(&t) {
        return Ok(t as u8);
    }
    match policy {
        // `as` saturates and maps NaN to 0.
        OverflowPolicy::Clamp => Ok(t as u8),
        OverflowPolicy::Error => Err(t as i64),
    }
}

/// Map every pixel independently.
pub fn map_pixels<F>(
    name: &'static str,
    raster: &Raster,
    options: &EngineOptions,
    f: F,
) -> Result<Raster, FilterError>
where
    F: Fn([u8; 3]) -> [f64; 3] + Sync,
{
    map_rows(name, raster, options, |_| (), |_, _, rgb| f(rgb))
}

/// Map every pixel with per-row state.
///
/// `init(y)` builds the state for row `y` once; `f` then sees each pixel of
/// that row left to right together with its column. Used by filters that
/// need a row-local random generator or read neighbouring pixels.
pub fn map_rows<S, I, F>(
    name: &'static str,
    raster: &Raster,
    options: &EngineOptions,
    init: I,
    f: F,
) -> Result<Raster, FilterError>
where
    I: Fn(u32) -> S + Sync,
    F: Fn(&mut S, u32, [u8; 3]) -> [f64; 3] + Sync,
{
    debug!(
        filter = name,
        width = raster.width(),
        height = raster.height(),
        overflow = %options.overflow,
        "applying filter"
    );

    if raster.is_empty() {
        return Ok(raster.clone());
    }

    let width = raster.width() as usize;
    let policy = options.overflow;
    let src = raster.pixels();
    let mut dst = vec![[0_u8; 4]; src.len()];

    dst.par_chunks_mut(width)
        .zip(src.par_chunks(width))
        .enumerate()
        .try_for_each(|(y, (row_out, row_in))| {
            let mut state = init(y as u32);
            for (x, (out, &[r, g, b, a])) in row_out.iter_mut().zip(row_in).enumerate() {
                let mapped = f(&mut state, x as u32, [r, g, b]);
                let mut px = [0_u8, 0, 0, a];
                for c in 0..3 {
                    px[c] = finalize(mapped[c], policy).map_err(|value| {
                        FilterError::ArithmeticOverflow {
                            x: x as u32,
                            y: y as u32,
                            value,
                        }
                    })?;
                }
                *out = px;
            }
            Ok::<(), FilterError>(())
        })?;

    Ok(raster.with_pixels(dst))
}

impl Filter for Brightness {
    fn name(&self) -> &'static str {
        "brightness"
    }

    fn apply_with(&self, raster: &Raster, options: &EngineOptions) -> Result<Raster, FilterError> {
        let offset = tone::brightness_offset(self.adjust);
        map_pixels(self.name(), raster, options, |rgb| {
            tone::apply_brightness(rgb, offset)
        })
    }
}

impl Filter for Contrast {
    fn name(&self) -> &'static str {
        "contrast"
    }

    fn apply_with(&self, raster: &Raster, options: &EngineOptions) -> Result<Raster, FilterError> {
        let gain = tone::contrast_gain(self.adjust);
        map_pixels(self.name(), raster, options, |rgb| tone::apply_contrast(rgb, gain))
    }
}

impl Filter for Saturation {
    fn name(&self) -> &'static str {
        "saturation"
    }

    fn apply_with(&self, raster: &Raster, options: &EngineOptions) -> Result<Raster, FilterError> {
        map_pixels(self.name(), raster, options, |rgb| {
            chroma::apply_saturation(rgb, self.adjust)
        })
    }
}

impl Filter for Vibrance {
    fn name(&self) -> &'static str {
        "vibrance"
    }

    fn apply_with(&self, raster: &Raster, options: &EngineOptions) -> Result<Raster, FilterError> {
        map_pixels(self.name(), raster, options, |rgb| {
            chroma::apply_vibrance(rgb, self.adjust)
        })
    }
}

impl Filter for GrayScale {
    fn name(&self) -> &'static str {
        "gray"
    }

    fn apply_with(&self, raster: &Raster, options: &EngineOptions) -> Result<Raster, FilterError> {
        map_pixels(self.name(), raster, options, |rgb| gray::apply_gray(rgb, self.mode))
    }
}

impl Filter for Sepia {
    fn name(&self) -> &'static str {
        "sepia"
    }

    fn apply_with(&self, raster: &Raster, options: &EngineOptions) -> Result<Raster, FilterError> {
        map_pixels(self.name(), raster, options, |rgb| {
            chroma::apply_sepia(rgb, self.adjust)
        })
    }
}

impl Filter for Invert {
    fn name(&self) -> &'static str {
        "invert"
    }

    fn apply_with(&self, raster: &Raster, options: &EngineOptions) -> Result<Raster, FilterError> {
        map_pixels(self.name(), raster, options, tone::apply_invert)
    }
}

impl Filter for Noise {
    fn name(&self) -> &'static str {
        "noise"
    }

    fn apply_with(&self, raster: &Raster, options: &EngineOptions) -> Result<Raster, FilterError> {
        let amplitude = noise::noise_amplitude(self.adjust);
        let seed = self.seed.unwrap_or_else(|| rand::thread_rng().r#gen());
        map_rows(
            self.name(),
            raster,
            options,
            |y| noise::row_rng(seed, y),
            |rng, _, rgb| noise::apply_noise(rgb, noise::draw_offset(rng, amplitude)),
        )
    }
}

impl Filter for Gamma {
    fn name(&self) -> &'static str {
        "gamma"
    }

    fn apply_with(&self, raster: &Raster, options: &EngineOptions) -> Result<Raster, FilterError> {
        if !self.adjust.is_finite() {
            return Err(FilterError::invalid(
                "gamma",
                self.adjust.to_string(),
                "a finite exponent",
            ));
        }
        map_pixels(self.name(), raster, options, |rgb| {
            tone::apply_gamma(rgb, self.adjust)
        })
    }
}

impl Filter for Clip {
    fn name(&self) -> &'static str {
        "clip"
    }

    fn apply_with(&self, raster: &Raster, options: &EngineOptions) -> Result<Raster, FilterError> {
        let amount = tone::clip_amount(self.adjust);
        map_pixels(self.name(), raster, options, |rgb| tone::apply_clip(rgb, amount))
    }
}

impl Filter for Threshold {
    fn name(&self) -> &'static str {
        "threshold"
    }

    /// Two passes: luma gray-scale first, then binarize each channel of the
    /// gray raster.
    fn apply_with(&self, raster: &Raster, options: &EngineOptions) -> Result<Raster, FilterError> {
        let gray = GrayScale {
            mode: GrayMode::Luma,
        }
        .apply_with(raster, options)?;
        map_pixels(self.name(), &gray, options, |rgb| {
            rgb.map(|c| tone::threshold_level(c, self.limiar))
        })
    }
}

impl Filter for Solarize {
    fn name(&self) -> &'static str {
        "solarize"
    }

    fn apply_with(&self, raster: &Raster, options: &EngineOptions) -> Result<Raster, FilterError> {
        map_pixels(self.name(), raster, options, |rgb| {
            tone::apply_solarize(rgb, self.limit)
        })
    }
}

impl Filter for Predominance {
    fn name(&self) -> &'static str {
        "predominance"
    }

    fn apply_with(&self, raster: &Raster, options: &EngineOptions) -> Result<Raster, FilterError> {
        map_pixels(self.name(), raster, options, |rgb| {
            predominance::apply_predominance(rgb, self.color)
        })
    }
}

impl Filter for Lumios {
    fn name(&self) -> &'static str {
        "lumios"
    }

    fn apply_with(&self, raster: &Raster, options: &EngineOptions) -> Result<Raster, FilterError> {
        let steps = lumios::lumios_steps(self.percent);
        map_pixels(self.name(), raster, options, |rgb| {
            lumios::apply_lumios(rgb, self.color, steps)
        })
    }
}

impl Filter for Convolve {
    fn name(&self) -> &'static str {
        "convolve"
    }

    fn apply_with(&self, raster: &Raster, _options: &EngineOptions) -> Result<Raster, FilterError> {
        kernel::convolve(raster, &self.kernel.kernel())
    }
}

impl Filter for BoxBlur {
    fn name(&self) -> &'static str {
        "box_blur"
    }

    fn apply_with(&self, raster: &Raster, _options: &EngineOptions) -> Result<Raster, FilterError> {
        kernel::box_blur(raster, self.radius)
    }
}

impl Filter for GaussianBlur {
    fn name(&self) -> &'static str {
        "gaussian_blur"
    }

    fn apply_with(&self, raster: &Raster, _options: &EngineOptions) -> Result<Raster, FilterError> {
        kernel::gaussian_blur(raster, self.sigma)
    }
}

impl Filter for UnsharpMask {
    fn name(&self) -> &'static str {
        "unsharp_mask"
    }

    fn apply_with(&self, raster: &Raster, _options: &EngineOptions) -> Result<Raster, FilterError> {
        kernel::unsharp_mask(raster, self.sigma, self.percent, self.threshold)
    }
}

impl Filter for FilterOp {
    fn name(&self) -> &'static str {
        match self {
            Self::Brightness(f) => f.name(),
            Self::Contrast(f) => f.name(),
            Self::Saturation(f) => f.name(),
            Self::Vibrance(f) => f.name(),
            Self::Gray(f) => f.name(),
            Self::Sepia(f) => f.name(),
            Self::Invert => Invert.name(),
            Self::Noise(f) => f.name(),
            Self::Gamma(f) => f.name(),
            Self::Clip(f) => f.name(),
            Self::Threshold(f) => f.name(),
            Self::Solarize(f) => f.name(),
            Self::Predominance(f) => f.name(),
            Self::Lumios(f) => f.name(),
            Self::SoftSaturation => SoftSaturation.name(),
            Self::Convolve(f) => f.name(),
            Self::BoxBlur(f) => f.name(),
            Self::GaussianBlur(f) => f.name(),
            Self::UnsharpMask(f) => f.name(),
        }
    }

    fn apply_with(&self, raster: &Raster, options: &EngineOptions) -> Result<Raster, FilterError> {
        match self {
            Self::Brightness(f) => f.apply_with(raster, options),
            Self::Contrast(f) => f.apply_with(raster, options),
            Self::Saturation(f) => f.apply_with(raster, options),
            Self::Vibrance(f) => f.apply_with(raster, options),
            Self::Gray(f) => f.apply_with(raster, options),
            Self::Sepia(f) => f.apply_with(raster, options),
            Self::Invert => Invert.apply_with(raster, options),
            Self::Noise(f) => f.apply_with(raster, options),
            Self::Gamma(f) => f.apply_with(raster, options),
            Self::Clip(f) => f.apply_with(raster, options),
            Self::Threshold(f) => f.apply_with(raster, options),
            Self::Solarize(f) => f.apply_with(raster, options),
            Self::Predominance(f) => f.apply_with(raster, options),
            Self::Lumios(f) => f.apply_with(raster, options),
            Self::SoftSaturation => SoftSaturation.apply_with(raster, options),
            Self::Convolve(f) => f.apply_with(raster, options),
            Self::BoxBlur(f) => f.apply_with(raster, options),
            Self::GaussianBlur(f) => f.apply_with(raster, options),
            Self::UnsharpMask(f) => f.apply_with(raster, options),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::image::ChannelLayout;
    use crate::transform::params::{LumiosColor, PredominantColor};

    fn gradient() -> Raster {
        Raster::from_fn(16, 16, |x, y| [(x * 16) as u8, (y * 16) as u8, ((x + y) * 8) as u8])
    }

    #[test]
    fn test_input_is_left_untouched() {
        let input = gradient();
        let copy = input.clone();
        let _ = Invert.apply(&input).unwrap();
        assert_eq!(input, copy);
    }

    #[test]
    fn test_invert_twice_is_identity() {
        let input = gradient();
        let twice = Invert.apply(&Invert.apply(&input).unwrap()).unwrap();
        assert_eq!(twice, input);
    }

    #[test]
    fn test_invert_scenario_pixel() {
        let out = Invert.apply(&Raster::filled(1, 1, [10, 200, 0])).unwrap();
        assert_eq!(out.rgb(0, 0), Some([245, 55, 255]));
    }

    #[test]
    fn test_alpha_is_preserved() {
        let raster = Raster::new(
            2,
            1,
            vec![[10, 20, 30, 7], [40, 50, 60, 200]],
            ChannelLayout::Rgba,
        )
        .unwrap();
        let out = Brightness { adjust: 50 }.apply(&raster).unwrap();
        assert_eq!(out.pixels()[0][3], 7);
        assert_eq!(out.pixels()[1][3], 200);
        assert_eq!(out.layout(), ChannelLayout::Rgba);
    }

    #[test]
    fn test_brightness_clamps_by_default() {
        let out = Brightness { adjust: 10 }
            .apply(&Raster::filled(1, 1, [250, 10, 0]))
            .unwrap();
        assert_eq!(out.rgb(0, 0), Some([255, 35, 25]));
        let out = Brightness { adjust: -10 }
            .apply(&Raster::filled(1, 1, [250, 10, 0]))
            .unwrap();
        assert_eq!(out.rgb(0, 0), Some([224, 0, 0]));
    }

    #[test]
    fn test_brightness_overflow_errors_under_error_policy() {
        let options = EngineOptions {
            overflow: OverflowPolicy::Error,
        };
        let err = Brightness { adjust: 10 }
            .apply_with(&Raster::filled(3, 2, [250, 10, 0]), &options)
            .unwrap_err();
        match err {
            FilterError::ArithmeticOverflow { value, .. } => assert_eq!(value, 275),
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[test]
    fn test_in_range_result_passes_error_policy() {
        let options = EngineOptions {
            overflow: OverflowPolicy::Error,
        };
        assert!(Invert.apply_with(&gradient(), &options).is_ok());
    }

    #[test]
    fn test_gamma_scenario_and_identity() {
        let raster = Raster::filled(1, 1, [128, 128, 128]);
        let out = Gamma { adjust: 2.0 }.apply(&raster).unwrap();
        assert_eq!(out.rgb(0, 0), Some([64, 64, 64]));

        let input = gradient();
        assert_eq!(Gamma { adjust: 1.0 }.apply(&input).unwrap(), input);
    }

    #[test]
    fn test_non_finite_gamma_is_rejected() {
        for adjust in [f64::NAN, f64::INFINITY, f64::NEG_INFINITY] {
            let err = Gamma { adjust }
                .apply_with(
                    &gradient(),
                    &EngineOptions {
                        overflow: OverflowPolicy::Error,
                    },
                )
                .unwrap_err();
            assert!(
                matches!(err, FilterError::InvalidParameter { name: "gamma", .. }),
                "unexpected error {err:?}"
            );
        }
    }

    #[test]
    fn test_boundary_identities() {
        let input = gradient();
        assert_eq!(Contrast { adjust: 0 }.apply(&input).unwrap(), input);
        assert_eq!(Solarize { limit: 255 }.apply(&input).unwrap(), input);
    }

    #[test]
    fn test_threshold_scenarios() {
        let out = Threshold { limiar: 127 }
            .apply(&Raster::filled(1, 1, [200, 200, 200]))
            .unwrap();
        assert_eq!(out.rgb(0, 0), Some([255, 255, 255]));
        let out = Threshold { limiar: 127 }
            .apply(&Raster::filled(1, 1, [50, 50, 50]))
            .unwrap();
        assert_eq!(out.rgb(0, 0), Some([0, 0, 0]));
    }

    #[test]
    fn test_threshold_output_is_binary() {
        let out = Threshold::default().apply(&gradient()).unwrap();
        for px in out.pixels() {
            assert!(px[0] == 0 || px[0] == 255);
            assert_eq!(px[0], px[1]);
            assert_eq!(px[1], px[2]);
        }
    }

    #[test]
    fn test_noise_with_seed_is_reproducible() {
        let input = gradient();
        let noise = Noise {
            adjust: 20,
            seed: Some(99),
        };
        let a = noise.apply(&input).unwrap();
        let b = noise.apply(&input).unwrap();
        assert_eq!(a, b);
        assert_ne!(a, input);
    }

    #[test]
    fn test_noise_shifts_channels_equally() {
        let input = Raster::filled(8, 8, [100, 120, 140]);
        let out = Noise {
            adjust: 10,
            seed: Some(3),
        }
        .apply(&input)
        .unwrap();
        for px in out.pixels() {
            let shift = i16::from(px[0]) - 100;
            assert_eq!(i16::from(px[1]) - 120, shift);
            assert_eq!(i16::from(px[2]) - 140, shift);
            assert!(shift.abs() <= 26);
        }
    }

    #[test]
    fn test_zero_noise_is_identity() {
        let input = gradient();
        let out = Noise {
            adjust: 0,
            seed: None,
        }
        .apply(&input)
        .unwrap();
        assert_eq!(out, input);
    }

    #[test]
    fn test_predominance_and_lumios_dispatch() {
        let input = Raster::filled(2, 2, [200, 30, 40]);
        let op = FilterOp::Predominance(Predominance {
            color: PredominantColor::Blue,
        });
        assert_eq!(op.apply(&input).unwrap().rgb(1, 1), Some([90, 90, 90]));

        let op = FilterOp::Lumios(Lumios {
            color: LumiosColor::Red,
            percent: 0.1,
        });
        assert_eq!(op.apply(&input).unwrap().rgb(0, 0), Some([205, 90, 90]));
    }

    #[test]
    fn test_empty_raster_is_returned_as_is() {
        let empty = Raster::filled(0, 0, [0, 0, 0]);
        assert!(Sepia::default().apply(&empty).unwrap().is_empty());
    }

    #[test]
    fn test_gray_optimize_clamps_white() {
        let out = GrayScale {
            mode: GrayMode::Optimize,
        }
        .apply(&Raster::filled(1, 1, [255, 255, 255]))
        .unwrap();
        assert_eq!(out.rgb(0, 0), Some([255, 255, 255]));
    }

    #[test]
    fn test_spatial_ops_saturate_and_keep_alpha_under_error_policy() {
        let raster = Raster::new(
            4,
            4,
            vec![[200, 10, 90, 255]; 16],
            ChannelLayout::Rgba,
        )
        .unwrap();
        let options = EngineOptions {
            overflow: OverflowPolicy::Error,
        };
        let op = FilterOp::Convolve(Convolve {
            kernel: crate::transform::params::BuiltinKernel::Contour,
        });
        let out = op.apply_with(&raster, &options).unwrap();
        assert_eq!(out.get(1, 1), Some([255, 255, 255, 255]));
        assert_eq!(out.get(0, 0), Some([200, 10, 90, 255]));

        let out = FilterOp::BoxBlur(BoxBlur { radius: 1.0 })
            .apply_with(&raster, &options)
            .unwrap();
        assert_eq!(out, raster);
    }

    #[test]
    fn test_overflow_policy_parses() {
        assert_eq!("Error".parse::<OverflowPolicy>().unwrap(), OverflowPolicy::Error);
        assert!("wrap".parse::<OverflowPolicy>().is_err());
    }
}
