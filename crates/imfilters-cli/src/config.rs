//! Environment-driven defaults for the command line.

use imfilters_core::OverflowPolicy;
use tracing::warn;

/// Overrides the engine overflow policy (`clamp` or `error`).
pub const OVERFLOW_ENV: &str = "IMFILTERS_OVERFLOW";
/// Overrides the command used by `--show`.
pub const VIEWER_ENV: &str = "IMFILTERS_VIEWER";

/// Runtime configuration assembled from the environment.
///
/// Command-line flags take precedence over anything set here.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CliConfig {
    /// Overflow policy when `--overflow` is not given.
    pub overflow: OverflowPolicy,
    /// Viewer command when `--viewer` is not given. `None` uses the platform opener.
    pub viewer: Option<String>,
}

impl CliConfig {
    /// Read `IMFILTERS_OVERFLOW` and `IMFILTERS_VIEWER`.
    pub fn from_env() -> Self {
        Self::from_vars(
            std::env::var(OVERFLOW_ENV).ok(),
            std::env::var(VIEWER_ENV).ok(),
        )
    }

    fn from_vars(overflow: Option<String>, viewer: Option<String>) -> Self {
        let overflow = overflow
            .and_then(|raw| {
                raw.parse()
                    .inspect_err(|err| warn!(var = OVERFLOW_ENV, %err, "ignoring bad value"))
                    .ok()
            })
            .unwrap_or_default();
        Self {
            overflow,
            viewer: viewer.filter(|v| !v.trim().is_empty()),
        }
    }
}
