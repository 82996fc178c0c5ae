//! Chroma adjustments: saturation, vibrance, and sepia toning.
//!
//! Saturation and vibrance move every non-maximal channel along the line
//! toward (negative amount) or away from (positive amount) the largest
//! channel. The largest channel itself never changes, so hue ordering is
//! preserved.

use super::widen;

/// Classic sepia matrix rows.
const SEPIA: [[f64; 3]; 3] = [
    [0.393, 0.769, 0.189],
    [0.349, 0.686, 0.168],
    [0.272, 0.534, 0.131],
];

/// Move every channel except the maximum by `(max − c) × amount`.
fn pull_toward_max(rgb: [u8; 3], amount: f64) -> [f64; 3] {
    let max = f64::from(rgb[0].max(rgb[1]).max(rgb[2]));
    widen(rgb).map(|c| if c == max { c } else { c + (max - c) * amount })
}

/// Saturation with `adjust` in percent; positive values saturate.
///
/// ```text
/// c' = c + (max − c) × (adjust × −0.01)    for c ≠ max
/// ```
pub fn apply_saturation(rgb: [u8; 3], adjust: i32) -> [f64; 3] {
    pull_toward_max(rgb, f64::from(adjust) * -0.01)
}

/// Vibrance with `adjust` in percent.
///
/// The pull amount scales with how far the maximum already sits from the
/// channel average, so muted pixels move less than vivid ones:
///
/// ```text
/// amt = (|max − avg| × 2 / 255) × (−adjust) / 100
/// c' = c + (max − c) × amt    for c ≠ max
/// ```
pub fn apply_vibrance(rgb: [u8; 3], adjust: i32) -> [f64; 3] {
    let [r, g, b] = widen(rgb);
    let max = r.max(g).max(b);
    let avg = (r + g + b) / 3.0;
    let amount = ((max - avg).abs() * 2.0 / 255.0) * -f64::from(adjust) / 100.0;
    pull_toward_max(rgb, amount)
}

/// Sepia blended in by `adjust` percent.
///
/// Off-diagonal terms are scaled by `k = adjust / 100`; the diagonal becomes
/// `1 − (1 − m_ii) × k` so `k = 0` is the identity and `k = 1` the full
/// matrix. Each output is capped at 255.
///
/// ```text
/// r' = min(255, r(1 − 0.607k) + g(0.769k) + b(0.189k))
/// g' = min(255, r(0.349k) + g(1 − 0.314k) + b(0.168k))
/// b' = min(255, r(0.272k) + g(0.534k) + b(1 − 0.869k))
/// ```
pub fn apply_sepia(rgb: [u8; 3], adjust: i32) -> [f64; 3] {
    let k = f64::from(adjust) / 100.0;
    let px = widen(rgb);

    let mut out = [0.0_f64; 3];
    for (row, coeffs) in SEPIA.iter().enumerate() {
        let mut acc = 0.0;
        for (col, &m) in coeffs.iter().enumerate() {
            let weight = if row == col { 1.0 - (1.0 - m) * k } else { m * k };
            acc += px[col] * weight;
        }
        out[row] = acc.min(255.0);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f64 = 1e-9;

    #[test]
    fn test_saturation_keeps_max_channel() {
        let out = apply_saturation([200, 100, 50], 10);
        assert_eq!(out[0], 200.0);
    }

    #[test]
    fn test_positive_saturation_spreads_channels() {
        // amount = −0.1: g = 100 + 100 × −0.1 = 90
        let out = apply_saturation([200, 100, 50], 10);
        assert!((out[1] - 90.0).abs() < EPSILON);
        assert!((out[2] - 35.0).abs() < EPSILON);
    }

    #[test]
    fn test_negative_saturation_pulls_toward_max() {
        let out = apply_saturation([200, 100, 50], -100);
        assert!((out[1] - 200.0).abs() < EPSILON);
        assert!((out[2] - 200.0).abs() < EPSILON);
    }

    #[test]
    fn test_vibrance_leaves_gray_untouched() {
        assert_eq!(apply_vibrance([90, 90, 90], 50), [90.0, 90.0, 90.0]);
    }

    #[test]
    fn test_vibrance_scales_with_existing_saturation() {
        let muted = apply_vibrance([120, 110, 100], 50);
        let vivid = apply_vibrance([240, 60, 30], 50);
        let muted_shift = 100.0 - muted[2];
        let vivid_shift = 30.0 - vivid[2];
        assert!(muted_shift > 0.0 && vivid_shift > muted_shift);
    }

    #[test]
    fn test_sepia_zero_is_identity() {
        let out = apply_sepia([12, 140, 230], 0);
        for (o, i) in out.iter().zip([12.0, 140.0, 230.0]) {
            assert!((o - i).abs() < EPSILON);
        }
    }

    #[test]
    fn test_sepia_full_matches_classic_matrix() {
        let out = apply_sepia([100, 100, 100], 100);
        assert!((out[0] - 135.1).abs() < 1e-6, "red {}", out[0]);
        assert!((out[1] - 120.3).abs() < 1e-6, "green {}", out[1]);
        assert!((out[2] - 93.7).abs() < 1e-6, "blue {}", out[2]);
    }

    #[test]
    fn test_sepia_caps_at_white() {
        assert_eq!(apply_sepia([255, 255, 255], 100)[0], 255.0);
    }
}
