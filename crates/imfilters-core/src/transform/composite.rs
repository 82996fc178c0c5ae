//! Composite transforms — fixed or data-driven chains of filters.
//!
//! Stages run strictly in order: stage N+1 starts only once stage N has
//! produced its whole raster, and the previous intermediate is dropped as
//! soon as the next one exists. The first failing stage aborts the chain.

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::FilterError;
use crate::image::Raster;
use crate::transform::evaluate::{EngineOptions, Filter};
use crate::transform::params::{Brightness, Contrast, FilterOp, Saturation, Sepia, SoftSaturation};

/// An ordered list of filters applied one after another.
///
/// JSON form: `{"steps": [{"filter": "brightness", "adjust": 10}, ...]}`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Recipe {
    pub steps: Vec<FilterOp>,
}

impl Recipe {
    /// Build a recipe from steps.
    pub fn new(steps: Vec<FilterOp>) -> Self {
        Self { steps }
    }

    /// The soft-saturation preset.
    pub fn soft_saturation() -> Self {
        Self::new(vec![
            FilterOp::Brightness(Brightness { adjust: 10 }),
            FilterOp::Contrast(Contrast { adjust: 30 }),
            FilterOp::Sepia(Sepia { adjust: 60 }),
            FilterOp::Saturation(Saturation { adjust: -30 }),
        ])
    }

    /// Parse a JSON recipe.
    pub fn from_json(json: &str) -> Result<Self, FilterError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Read and parse a JSON recipe file.
    pub fn load(path: &Path) -> Result<Self, FilterError> {
        let text = std::fs::read_to_string(path).map_err(|err| {
            if err.kind() == std::io::ErrorKind::NotFound {
                FilterError::NotFound(path.to_path_buf())
            } else {
                FilterError::Io(err)
            }
        })?;
        Self::from_json(&text)
    }

    /// Serialize to pretty-printed JSON.
    pub fn to_json(&self) -> Result<String, FilterError> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

impl Filter for Recipe {
    fn name(&self) -> &'static str {
        "recipe"
    }

    fn apply_with(&self, raster: &Raster, options: &EngineOptions) -> Result<Raster, FilterError> {
        let Some((first, rest)) = self.steps.split_first() else {
            return Ok(raster.clone());
        };

        let mut current = run_stage(0, first, raster, options)?;
        for (index, step) in rest.iter().enumerate() {
            current = run_stage(index + 1, step, &current, options)?;
        }
        Ok(current)
    }
}

fn run_stage(
    index: usize,
    step: &FilterOp,
    input: &Raster,
    options: &EngineOptions,
) -> Result<Raster, FilterError> {
    debug!(stage = index, filter = step.name(), "running recipe stage");
    step.apply_with(input, options).inspect_err(|err| {
        warn!(stage = index, filter = step.name(), error = %err, "recipe stage failed");
    })
}

impl Filter for SoftSaturation {
    fn name(&self) -> &'static str {
        "soft_saturation"
    }

    fn apply_with(&self, raster: &Raster, options: &EngineOptions) -> Result<Raster, FilterError> {
        Recipe::soft_saturation().apply_with(raster, options)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transform::evaluate::OverflowPolicy;
    use crate::transform::params::Invert;

    fn sample() -> Raster {
        Raster::from_fn(8, 8, |x, y| [(x * 30) as u8, (y * 30) as u8, 90])
    }

    #[test]
    fn test_soft_saturation_equals_manual_chain() {
        let input = sample();
        let manual = Brightness { adjust: 10 }.apply(&input).unwrap();
        let manual = Contrast { adjust: 30 }.apply(&manual).unwrap();
        let manual = Sepia { adjust: 60 }.apply(&manual).unwrap();
        let manual = Saturation { adjust: -30 }.apply(&manual).unwrap();

        assert_eq!(SoftSaturation.apply(&input).unwrap(), manual);
    }

    #[test]
    fn test_empty_recipe_is_identity() {
        let input = sample();
        assert_eq!(Recipe::default().apply(&input).unwrap(), input);
    }

    #[test]
    fn test_failing_stage_aborts_chain() {
        let recipe = Recipe::new(vec![
            FilterOp::Brightness(Brightness { adjust: 100 }),
            FilterOp::Invert,
        ]);
        let options = EngineOptions {
            overflow: OverflowPolicy::Error,
        };
        let err = recipe
            .apply_with(&Raster::filled(2, 2, [200, 0, 0]), &options)
            .unwrap_err();
        assert!(matches!(err, FilterError::ArithmeticOverflow { .. }));
    }

    #[test]
    fn test_recipe_json_roundtrip() {
        let recipe = Recipe::soft_saturation();
        let json = recipe.to_json().unwrap();
        assert_eq!(Recipe::from_json(&json).unwrap(), recipe);
    }

    #[test]
    fn test_recipe_from_handwritten_json() {
        let recipe = Recipe::from_json(
            r#"{"steps": [{"filter": "invert"}, {"filter": "invert"}, {"filter": "soft_saturation"}]}"#,
        )
        .unwrap();
        assert_eq!(recipe.steps.len(), 3);
        assert_eq!(recipe.steps[0], FilterOp::Invert);

        let input = sample();
        assert_eq!(
            recipe.apply(&input).unwrap(),
            SoftSaturation.apply(&Invert.apply(&Invert.apply(&input).unwrap()).unwrap()).unwrap()
        );
    }

    #[test]
    fn test_bad_recipe_json_is_reported() {
        let err = Recipe::from_json(r#"{"steps": [{"filter": "blur"}]}"#).unwrap_err();
        assert!(matches!(err, FilterError::Recipe(_)));
    }
}
