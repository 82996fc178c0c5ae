//! Uniform luminance noise.
//!
//! One draw per pixel, added identically to all three channels. Each row
//! owns its own generator seeded from the base seed and the row index, so
//! output depends only on the seed, never on how rows are scheduled.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Odd 64-bit constant used to spread row indices across the seed space.
const ROW_MIX: u64 = 0x9E37_79B9_7F4A_7C15;

/// Noise half-width for an adjustment in percent: `|adjust| × 2.55`.
pub fn noise_amplitude(adjust: i32) -> f64 {
    f64::from(adjust).abs() * 2.55
}

/// Generator for row `y` of an image noised with `seed`.
pub fn row_rng(seed: u64, y: u32) -> StdRng {
    StdRng::seed_from_u64(seed ^ u64::from(y).wrapping_add(1).wrapping_mul(ROW_MIX))
}

/// Draw one rounded offset uniformly from `[-amplitude, amplitude]`.
pub fn draw_offset<R: Rng>(rng: &mut R, amplitude: f64) -> f64 {
    if amplitude <= 0.0 {
        return 0.0;
    }
    rng.gen_range(-amplitude..=amplitude).round()
}

/// Add `offset` to every channel.
pub fn apply_noise(rgb: [u8; 3], offset: f64) -> [f64; 3] {
    rgb.map(|c| f64::from(c) + offset)
}
