//! Per-pixel filter math — tone, chroma, gray-scale, noise, predominance, and lumios.
//!
//! Every function here maps one 8-bit RGB triple to an unclamped `f64`
//! triple. Truncation and range handling happen once, in the engine
//! ([`crate::transform::evaluate`]).

pub mod chroma;
pub mod gray;
pub mod lumios;
pub mod noise;
pub mod predominance;
pub mod tone;

/// Widen an 8-bit triple for arithmetic.
pub(crate) fn widen(rgb: [u8; 3]) -> [f64; 3] {
    rgb.map(f64::from)
}
