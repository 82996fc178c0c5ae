//! RGB → HSL conversion.

use super::hue;

/// Convert an 8-bit RGB triple to `[h, s, l]`, each in `[0, 1]`.
///
/// ```text
/// l = (max + min) / 2
/// s = 0                       if max == min
///     Δ / (2 − max − min)     if l > 0.5
///     Δ / (max − min)         otherwise
/// ```
///
/// The low-lightness branch divides the spread by itself, so every
/// non-gray color with `l <= 0.5` reports `s = 1`.
pub fn rgb_to_hsl(rgb: [u8; 3]) -> [f64; 3] {
    let [r, g, b] = rgb.map(|c| f64::from(c) / 255.0);
    let max = r.max(g).max(b);
    let min = r.min(g).min(b);
    let l = (max + min) / 2.0;

    if max == min {
        return [0.0, 0.0, l];
    }

    let delta = max - min;
    let s = if l > 0.5 {
        delta / (2.0 - max - min)
    } else {
        delta / (max - min)
    };

    [hue(r, g, b, max, delta), s, l]
}
