//! Tone adjustments: brightness, contrast, gamma, clip, solarize, invert, threshold.

use super::widen;

/// Channel offset for a brightness adjustment given in percent.
///
/// ```text
/// offset = floor(255 × adjust / 100)
/// ```
pub fn brightness_offset(adjust: i32) -> f64 {
    (255.0 * (f64::from(adjust) / 100.0)).floor()
}

/// Add the same offset to every channel.
pub fn apply_brightness(rgb: [u8; 3], offset: f64) -> [f64; 3] {
    widen(rgb).map(|c| c + offset)
}

/// Contrast gain for an adjustment in percent: `((adjust + 100) / 100)²`.
///
/// `adjust = 0` gives a gain of exactly 1.
pub fn contrast_gain(adjust: i32) -> f64 {
    ((f64::from(adjust) + 100.0) / 100.0).powi(2)
}

/// Scale each channel's distance from mid-gray by `gain`.
///
/// ```text
/// out = ((in / 255 − 0.5) × gain + 0.5) × 255
/// ```
///
/// A gain of 1 returns the input exactly; the normalize/rescale round trip
/// would otherwise truncate some values one step down.
pub fn apply_contrast(rgb: [u8; 3], gain: f64) -> [f64; 3] {
    if (gain - 1.0).abs() < 1e-12 {
        return widen(rgb);
    }
    widen(rgb).map(|c| ((c / 255.0 - 0.5) * gain + 0.5) * 255.0)
}

/// Power curve on normalized channels: `(in / 255)^exponent × 255`.
pub fn apply_gamma(rgb: [u8; 3], exponent: f64) -> [f64; 3] {
    widen(rgb).map(|c| (c / 255.0).powf(exponent) * 255.0)
}

/// Clip band width for an adjustment in percent: `|adjust| × 2.55`.
pub fn clip_amount(adjust: i32) -> f64 {
    f64::from(adjust).abs() * 2.55
}

/// Push channels within `amount` of either end of the range to that end.
///
/// Channels in between pass through untouched.
pub fn apply_clip(rgb: [u8; 3], amount: f64) -> [f64; 3] {
    widen(rgb).map(|c| {
        if c > 255.0 - amount {
            255.0
        } else if c < amount {
            0.0
        } else {
            c
        }
    })
}

/// Invert channels strictly above `limit`.
pub fn apply_solarize(rgb: [u8; 3], limit: i32) -> [f64; 3] {
    rgb.map(|c| {
        if i32::from(c) > limit {
            f64::from(255 - c)
        } else {
            f64::from(c)
        }
    })
}

/// Photographic negative.
pub fn apply_invert(rgb: [u8; 3]) -> [f64; 3] {
    rgb.map(|c| f64::from(255 - c))
}

/// Binarize a gray level: above `limiar` is white, at or below it is black.
pub fn threshold_level(gray: u8, limiar: i32) -> f64 {
    if i32::from(gray) > limiar { 255.0 } else { 0.0 }
}
