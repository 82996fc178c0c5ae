//! Command-line arguments and their mapping onto library filters.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use imfilters_core::transform::params::{
    BoxBlur, BuiltinKernel, Brightness, Clip, Contrast, Convolve, FilterOp, Gamma, GaussianBlur, GrayMode,
    GrayScale, Lumios, LumiosColor, Noise, Predominance, PredominantColor, Saturation, Sepia,
    Solarize, Threshold, UnsharpMask, Vibrance,
};
use imfilters_core::{Filter, FilterError, OverflowPolicy, Recipe};

/// Apply color and tone filters to an image.
#[derive(Parser, Debug)]
#[command(name = "imfilters", author, version, about)]
pub struct Args {
    /// Image to read
    pub input: PathBuf,

    /// Where to write the result; the format follows the extension
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Open the result in an image viewer (implied when no output is given)
    #[arg(long)]
    pub show: bool,

    /// What to do with channels outside 0..=255 [env: IMFILTERS_OVERFLOW]
    #[arg(long)]
    pub overflow: Option<OverflowPolicy>,

    /// Viewer command for --show [env: IMFILTERS_VIEWER]
    #[arg(long)]
    pub viewer: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

/// One filter per subcommand. Options default to the library defaults.
#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum Command {
    /// Shift every channel by a percentage of full scale
    Brightness {
        #[arg(long, default_value_t = 5, allow_negative_numbers = true)]
        adjust: i32,
    },
    /// Stretch or flatten around mid-gray
    Contrast {
        #[arg(long, default_value_t = 0, allow_negative_numbers = true)]
        adjust: i32,
    },
    /// Push channels away from or toward the strongest one
    Saturation {
        #[arg(long, default_value_t = 10, allow_negative_numbers = true)]
        adjust: i32,
    },
    /// Saturation that spares already saturated pixels
    Vibrance {
        #[arg(long, default_value_t = 50, allow_negative_numbers = true)]
        adjust: i32,
    },
    /// Gray-scale: normal, optimize, 25%, 50% or 75%
    Gray {
        #[arg(long, default_value_t = GrayMode::Luma)]
        mode: GrayMode,
    },
    /// Sepia toning
    Sepia {
        #[arg(long, default_value_t = 100, allow_negative_numbers = true)]
        adjust: i32,
    },
    /// Photographic negative
    Invert,
    /// Uniform noise, equal on all channels of a pixel
    Noise {
        #[arg(long, default_value_t = 10, allow_negative_numbers = true)]
        adjust: i32,
        /// Seed for reproducible output
        #[arg(long)]
        seed: Option<u64>,
    },
    /// Power curve on normalized channels
    Gamma {
        #[arg(long, default_value_t = 2.0, allow_negative_numbers = true)]
        adjust: f64,
    },
    /// Snap channels near black or white to the extreme
    Clip {
        #[arg(long, default_value_t = 15, allow_negative_numbers = true)]
        adjust: i32,
    },
    /// Binarize the luma
    Threshold {
        #[arg(long, default_value_t = 127, allow_negative_numbers = true)]
        limiar: i32,
    },
    /// Invert channels above a limit
    Solarize {
        #[arg(long, default_value_t = 128, allow_negative_numbers = true)]
        limit: i32,
    },
    /// Keep pixels of one color, gray out the rest
    Predominance {
        #[arg(long)]
        color: PredominantColor,
    },
    /// Tint toward red, green or blue
    Lumios {
        #[arg(long, default_value_t = LumiosColor::Blue)]
        color: LumiosColor,
        #[arg(long, default_value_t = 0.1, allow_negative_numbers = true)]
        percent: f64,
    },
    /// Brightness, contrast, sepia and desaturation in one preset
    SoftSaturation,
    /// Run a JSON recipe of filters
    Recipe {
        #[arg(long)]
        file: PathBuf,
    },
    /// Convolution with a built-in kernel
    Convolve {
        #[arg(long, default_value_t = BuiltinKernel::Sharpen)]
        kernel: BuiltinKernel,
    },
    /// Average over a square box
    BoxBlur {
        #[arg(long, default_value_t = 1.0)]
        radius: f32,
    },
    /// Gaussian blur
    GaussianBlur {
        #[arg(long, default_value_t = 2.0)]
        sigma: f32,
    },
    /// Unsharp mask
    UnsharpMask {
        #[arg(long, default_value_t = 2.0)]
        sigma: f32,
        #[arg(long, default_value_t = 50, allow_negative_numbers = true)]
        percent: i32,
        #[arg(long, default_value_t = 3, allow_negative_numbers = true)]
        threshold: i32,
    },
}

impl Command {
    /// Build the filter this subcommand names. Only `recipe` touches the disk.
    pub fn into_filter(self) -> Result<Box<dyn Filter>, FilterError> {
        let op = match self {
            Self::Brightness { adjust } => FilterOp::Brightness(Brightness { adjust }),
            Self::Contrast { adjust } => FilterOp::Contrast(Contrast { adjust }),
            Self::Saturation { adjust } => FilterOp::Saturation(Saturation { adjust }),
            Self::Vibrance { adjust } => FilterOp::Vibrance(Vibrance { adjust }),
            Self::Gray { mode } => FilterOp::Gray(GrayScale { mode }),
            Self::Sepia { adjust } => FilterOp::Sepia(Sepia { adjust }),
            Self::Invert => FilterOp::Invert,
            Self::Noise { adjust, seed } => FilterOp::Noise(Noise { adjust, seed }),
            Self::Gamma { adjust } => FilterOp::Gamma(Gamma { adjust }),
            Self::Clip { adjust } => FilterOp::Clip(Clip { adjust }),
            Self::Threshold { limiar } => FilterOp::Threshold(Threshold { limiar }),
            Self::Solarize { limit } => FilterOp::Solarize(Solarize { limit }),
            Self::Predominance { color } => FilterOp::Predominance(Predominance { color }),
            Self::Lumios { color, percent } => FilterOp::Lumios(Lumios { color, percent }),
            Self::SoftSaturation => FilterOp::SoftSaturation,
            Self::Recipe { file } => return Ok(Box::new(Recipe::load(&file)?)),
            Self::Convolve { kernel } => FilterOp::Convolve(Convolve { kernel }),
            Self::BoxBlur { radius } => FilterOp::BoxBlur(BoxBlur { radius }),
            Self::GaussianBlur { sigma } => FilterOp::GaussianBlur(GaussianBlur { sigma }),
            Self::UnsharpMask {
                sigma,
                percent,
                threshold,
            } => FilterOp::UnsharpMask(UnsharpMask {
                sigma,
                percent,
                threshold,
            }),
        };
        Ok(Box::new(op))
    }
}
