//! RGB ↔ HSV conversion.

use super::hue;

/// Convert an 8-bit RGB triple to `[h, s, v]`, each in `[0, 1]`.
///
/// `s` is `Δ / max` (0 for black) and `v` is the largest channel scaled to
/// `[0, 1]`. Grays (`max == min`) have `h = 0` and `s = 0`.
pub fn rgb_to_hsv(rgb: [u8; 3]) -> [f64; 3] {
    let [r, g, b] = rgb.map(f64::from);
    let max = r.max(g).max(b);
    let min = r.min(g).min(b);
    let delta = max - min;

    let s = if max == 0.0 { 0.0 } else { delta / max };
    let h = hue(r, g, b, max, delta);

    [h, s, max / 255.0]
}

/// Convert `[h, s, v]` back to 8-bit RGB.
///
/// Standard sector algorithm:
///
/// ```text
/// i = floor(h × 6) mod 6,  f = h × 6 − floor(h × 6)
/// p = v(1 − s),  q = v(1 − f·s),  t = v(1 − (1 − f)·s)
///
/// i:   0  1  2  3  4  5
/// r:   v  q  p  p  t  v
/// g:   t  v  v  q  p  p
/// b:   p  p  t  v  v  q
/// ```
///
/// Each channel is `floor(c × 255)`, saturated into `0..=255`.
pub fn hsv_to_rgb(hsv: [f64; 3]) -> [u8; 3] {
    let [h, s, v] = hsv;

    let scaled = (h * 6.0).floor();
    let f = h * 6.0 - scaled;
    let p = v * (1.0 - s);
    let q = v * (1.0 - f * s);
    let t = v * (1.0 - (1.0 - f) * s);

    let (r, g, b) = match (scaled as i64).rem_euclid(6) {
        0 => (v, t, p),
        1 => (q, v, p),
        2 => (p, v, t),
        3 => (p, q, v),
        4 => (t, p, v),
        _ => (v, p, q),
    };

    [r, g, b].map(|c| (c * 255.0).floor().clamp(0.0, 255.0) as u8)
}
