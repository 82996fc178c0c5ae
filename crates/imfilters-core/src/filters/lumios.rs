//! Lumios tint: lift one channel toward white, flatten the other two to gray.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::color::average;
use crate::error::FilterError;

/// Channel that keeps (and gains) color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LumiosColor {
    Red,
    Green,
    #[default]
    Blue,
}

impl LumiosColor {
    const fn index(self) -> usize {
        match self {
            Self::Red => 0,
            Self::Green => 1,
            Self::Blue => 2,
        }
    }
}

impl fmt::Display for LumiosColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Red => write!(f, "red"),
            Self::Green => write!(f, "green"),
            Self::Blue => write!(f, "blue"),
        }
    }
}

impl FromStr for LumiosColor {
    type Err = FilterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "red" => Ok(Self::Red),
            "green" => Ok(Self::Green),
            "blue" => Ok(Self::Blue),
            _ => Err(FilterError::invalid("lumios color", s, "red, green or blue")),
        }
    }
}

/// Integer lift steps for a `percent` given as a fraction (`0.1` = one step).
///
/// ```text
/// steps = trunc(clamp(percent × 10, 0, 10))
/// ```
pub fn lumios_steps(percent: f64) -> u8 {
    if percent.is_nan() {
        return 0;
    }
    (percent * 10.0).clamp(0.0, 10.0).trunc() as u8
}

/// Tint one pixel.
///
/// ```text
/// target' = target + ((255 − target) div 10) × steps
/// other'  = (r + g + b) div 3
/// ```
pub fn apply_lumios(rgb: [u8; 3], color: LumiosColor, steps: u8) -> [f64; 3] {
    let med = f64::from(average(rgb));
    let mut out = [med; 3];
    let idx = color.index();
    let c = u16::from(rgb[idx]);
    out[idx] = f64::from(c + ((255 - c) / 10) * u16::from(steps));
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_steps_clamp() {
        assert_eq!(lumios_steps(0.1), 1);
        assert_eq!(lumios_steps(0.55), 5);
        assert_eq!(lumios_steps(3.0), 10);
        assert_eq!(lumios_steps(-1.0), 0);
        assert_eq!(lumios_steps(f64::NAN), 0);
    }

    #[test]
    fn test_blue_lift_and_gray_others() {
        // med = (30 + 60 + 90) div 3 = 60; blue = 90 + (165 div 10) × 1 = 106
        assert_eq!(
            apply_lumios([30, 60, 90], LumiosColor::Blue, 1),
            [60.0, 60.0, 106.0]
        );
    }

    #[test]
    fn test_full_lift_stays_in_range() {
        let out = apply_lumios([0, 0, 0], LumiosColor::Red, 10);
        assert_eq!(out, [250.0, 0.0, 0.0]);
        let out = apply_lumios([255, 0, 0], LumiosColor::Red, 10);
        assert_eq!(out[0], 255.0);
    }

    #[test]
    fn test_unknown_color_is_an_error() {
        let err = "purple".parse::<LumiosColor>().unwrap_err();
        assert!(matches!(
            err,
            FilterError::InvalidParameter { name: "lumios color", .. }
        ));
    }
}
