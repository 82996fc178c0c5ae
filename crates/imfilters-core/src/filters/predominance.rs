//! Color predominance: keep pixels matching a named color, gray out the rest.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::color::average;
use crate::error::FilterError;

/// Named color signature.
///
/// Each variant is a fixed set of inequalities between channels (and, for
/// some colors, absolute bounds on one channel).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PredominantColor {
    #[default]
    Red,
    Blue,
    Green,
    Yellow,
    #[serde(alias = "ciano")]
    Cyan,
    Purple,
    Pink,
    Orange,
}

impl PredominantColor {
    /// All signatures, in declaration order.
    pub const ALL: [Self; 8] = [
        Self::Red,
        Self::Blue,
        Self::Green,
        Self::Yellow,
        Self::Cyan,
        Self::Purple,
        Self::Pink,
        Self::Orange,
    ];

    /// Lower-case name accepted by [`FromStr`].
    pub const fn name(self) -> &'static str {
        match self {
            Self::Red => "red",
            Self::Blue => "blue",
            Self::Green => "green",
            Self::Yellow => "yellow",
            Self::Cyan => "cyan",
            Self::Purple => "purple",
            Self::Pink => "pink",
            Self::Orange => "orange",
        }
    }

    /// Whether `rgb` carries this color's signature.
    ///
    /// ```text
    /// red     r > g, r > b
    /// blue    b > g, b > r
    /// green   g > r, g > b
    /// yellow  r > b, g > b, g > 200
    /// cyan    b > r, g > b
    /// purple  b > r, b > g, 100 < r < 200
    /// pink    r > g, r > b, b > g, b > 100
    /// orange  r > g, r > b, g > b, 50 < g < 150
    /// ```
    pub fn matches(self, rgb: [u8; 3]) -> bool {
        let [r, g, b] = rgb;
        match self {
            Self::Red => r > g && r > b,
            Self::Blue => b > g && b > r,
            Self::Green => g > r && g > b,
            Self::Yellow => r > b && g > b && g > 200,
            Self::Cyan => b > r && g > b,
            Self::Purple => b > r && b > g && r > 100 && r < 200,
            Self::Pink => r > g && r > b && b > g && b > 100,
            Self::Orange => r > g && r > b && g > b && g > 50 && g < 150,
        }
    }
}

impl fmt::Display for PredominantColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for PredominantColor {
    type Err = FilterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = s.trim().to_ascii_lowercase();
        if name == "ciano" {
            return Ok(Self::Cyan);
        }
        Self::ALL
            .into_iter()
            .find(|color| color.name() == name)
            .ok_or_else(|| {
                FilterError::invalid(
                    "predominance color",
                    s,
                    "red, blue, green, yellow, ciano, purple, pink or orange",
                )
            })
    }
}

/// Keep the pixel when it matches `color`, otherwise replace it with its
/// channel average.
pub fn apply_predominance(rgb: [u8; 3], color: PredominantColor) -> [f64; 3] {
    if color.matches(rgb) {
        rgb.map(f64::from)
    } else {
        [f64::from(average(rgb)); 3]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_matching_pixel_is_kept() {
        assert_eq!(
            apply_predominance([200, 30, 40], PredominantColor::Red),
            [200.0, 30.0, 40.0]
        );
    }

    #[test]
    fn test_non_matching_pixel_is_grayed() {
        assert_eq!(
            apply_predominance([30, 200, 40], PredominantColor::Red),
            [90.0; 3]
        );
    }

    #[test]
    fn test_ties_do_not_match() {
        assert!(!PredominantColor::Red.matches([100, 100, 50]));
        assert!(!PredominantColor::Green.matches([100, 100, 50]));
    }

    #[test]
    fn test_bounded_signatures() {
        assert!(PredominantColor::Yellow.matches([230, 220, 10]));
        assert!(!PredominantColor::Yellow.matches([230, 180, 10]));
        assert!(PredominantColor::Purple.matches([150, 50, 220]));
        assert!(!PredominantColor::Purple.matches([90, 50, 220]));
        assert!(PredominantColor::Pink.matches([250, 90, 180]));
        assert!(PredominantColor::Orange.matches([250, 120, 20]));
        assert!(!PredominantColor::Orange.matches([250, 160, 20]));
        assert!(PredominantColor::Cyan.matches([10, 220, 200]));
    }

    #[test]
    fn test_parse_accepts_both_cyan_spellings() {
        assert_eq!("ciano".parse::<PredominantColor>().unwrap(), PredominantColor::Cyan);
        assert_eq!("Cyan".parse::<PredominantColor>().unwrap(), PredominantColor::Cyan);
    }

    #[test]
    fn test_parse_unknown_color_is_invalid_parameter() {
        let err = "magenta".parse::<PredominantColor>().unwrap_err();
        assert!(matches!(err, FilterError::InvalidParameter { .. }));
    }
}
