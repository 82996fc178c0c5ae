//! Luma and channel-average helpers.

/// BT.601 luma weights.
const LUMA_BT601: [f64; 3] = [0.299, 0.587, 0.114];

/// BT.601 luma, truncated to an integer.
///
/// ```text
/// Y = floor(0.299 R + 0.587 G + 0.114 B)
/// ```
pub fn luminance(rgb: [u8; 3]) -> u8 {
    let [r, g, b] = rgb.map(f64::from);
    let y = LUMA_BT601[0] * r + LUMA_BT601[1] * g + LUMA_BT601[2] * b;
    y.floor().clamp(0.0, 255.0) as u8
}

/// Integer mean of the three channels, `(r + g + b) div 3`.
pub fn average(rgb: [u8; 3]) -> u8 {
    let sum: u16 = rgb.iter().map(|&c| u16::from(c)).sum();
    (sum / 3) as u8
}
