//! Gray-scale tone mapping.
//!
//! One component with three strategies: BT.601 luma, the legacy
//! "optimized" integer mix, and luma lightened toward white by a fixed
//! percentage.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::color::luminance;
use crate::error::FilterError;

/// How far [`GrayMode::Lighten`] moves luma toward white.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LightenLevel {
    /// 25 %.
    Quarter,
    /// 50 %.
    Half,
    /// 75 %.
    ThreeQuarters,
}

impl LightenLevel {
    /// Blend fraction in `[0, 1]`.
    pub const fn fraction(self) -> f64 {
        match self {
            Self::Quarter => 0.25,
            Self::Half => 0.5,
            Self::ThreeQuarters => 0.75,
        }
    }
}

/// Gray-scale strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GrayMode {
    /// BT.601 luma on all channels.
    #[default]
    Luma,
    /// `trunc(0.21 R + trunc(0.71 G) + trunc(0.8 B) div 3)`.
    ///
    /// Can exceed 255 for bright inputs; the engine's overflow policy
    /// decides what happens then.
    Optimize,
    /// Luma blended toward white.
    Lighten(LightenLevel),
}

impl fmt::Display for GrayMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Luma => write!(f, "normal"),
            Self::Optimize => write!(f, "optimize"),
            Self::Lighten(level) => write!(f, "{}%", (level.fraction() * 100.0) as u32),
        }
    }
}

impl FromStr for GrayMode {
    type Err = FilterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().trim_end_matches('%') {
            "normal" | "luma" => Ok(Self::Luma),
            "optimize" => Ok(Self::Optimize),
            "25" => Ok(Self::Lighten(LightenLevel::Quarter)),
            "50" => Ok(Self::Lighten(LightenLevel::Half)),
            "75" => Ok(Self::Lighten(LightenLevel::ThreeQuarters)),
            _ => Err(FilterError::invalid(
                "gray mode",
                s,
                "normal, optimize, 25%, 50% or 75%",
            )),
        }
    }
}

/// Gray level for one pixel under `mode`, replicated to all three channels.
pub fn apply_gray(rgb: [u8; 3], mode: GrayMode) -> [f64; 3] {
    let level = match mode {
        GrayMode::Luma => f64::from(luminance(rgb)),
        GrayMode::Optimize => optimized_level(rgb),
        GrayMode::Lighten(amount) => {
            let y = f64::from(luminance(rgb));
            y + (255.0 - y) * amount.fraction()
        }
    };
    [level; 3]
}

fn optimized_level(rgb: [u8; 3]) -> f64 {
    let [r, g, b] = rgb.map(f64::from);
    let blue = ((b * 0.8).trunc() / 3.0).floor();
    (r * 0.21 + (g * 0.71).trunc() + blue).trunc()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_luma_mode_replicates_luminance() {
        assert_eq!(apply_gray([255, 0, 0], GrayMode::Luma), [76.0; 3]);
    }

    #[test]
    fn test_optimize_uses_integer_intermediates() {
        // 0.21×100 = 21, trunc(0.71×100) = 71, trunc(0.8×100) div 3 = 26
        assert_eq!(apply_gray([100, 100, 100], GrayMode::Optimize), [118.0; 3]);
    }

    #[test]
    fn test_optimize_can_exceed_white() {
        assert!(apply_gray([255, 255, 255], GrayMode::Optimize)[0] > 255.0);
    }

    #[test]
    fn test_lighten_half_moves_halfway_to_white() {
        assert_eq!(
            apply_gray([0, 0, 0], GrayMode::Lighten(LightenLevel::Half)),
            [127.5; 3]
        );
    }

    #[test]
    fn test_parse_modes() {
        assert_eq!("optimize".parse::<GrayMode>().unwrap(), GrayMode::Optimize);
        assert_eq!("Normal".parse::<GrayMode>().unwrap(), GrayMode::Luma);
        assert_eq!(
            "75%".parse::<GrayMode>().unwrap(),
            GrayMode::Lighten(LightenLevel::ThreeQuarters)
        );
        assert!("sepia".parse::<GrayMode>().is_err());
    }

    #[test]
    fn test_display_roundtrips_through_parse() {
        for mode in [
            GrayMode::Luma,
            GrayMode::Optimize,
            GrayMode::Lighten(LightenLevel::Quarter),
        ] {
            assert_eq!(mode.to_string().parse::<GrayMode>().unwrap(), mode);
        }
    }
}
