//! Color-space conversions and luminance.
//!
//! All functions are pure and operate on 8-bit RGB triples. HSV and HSL
//! triples are `f64` in `[0, 1]`.

pub mod hsl;
pub mod hsv;
pub mod luminance;

pub use hsl::rgb_to_hsl;
pub use hsv::{hsv_to_rgb, rgb_to_hsv};
pub use luminance::{average, luminance};

/// Hue in `[0, 1)` from the six-sector formula.
///
/// `max` must be the largest of `r, g, b` and `delta` the spread between the
/// largest and smallest channel. Works on any channel scale because only
/// channel differences divided by `delta` enter the result.
///
/// ```text
/// max == r → (g − b) / Δ + (6 if g < b else 0)
/// max == g → (b − r) / Δ + 2
/// max == b → (r − g) / Δ + 4
/// h = sector / 6
/// ```
pub(crate) fn hue(r: f64, g: f64, b: f64, max: f64, delta: f64) -> f64 {
    if delta == 0.0 {
        return 0.0;
    }

    let sector = if max == r {
        (g - b) / delta + if g < b { 6.0 } else { 0.0 }
    } else if max == g {
        (b - r) / delta + 2.0
    } else {
        (r - g) / delta + 4.0
    };
    sector / 6.0
}
