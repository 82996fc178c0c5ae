//! Image file I/O and viewer hand-off.
//!
//! Decoding and encoding go through the `image` crate (PNG, JPEG, TIFF,
//! BMP, ...). The format is picked from the file contents on load and from
//! the extension on save.

use std::path::{Path, PathBuf};
use std::process::Command;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::{Duration, SystemTime};

use tracing::{debug, info};

use crate::error::FilterError;
use crate::image::Raster;

/// Counter keeping concurrent `show_raster` temp files apart.
static SHOW_COUNTER: AtomicUsize = AtomicUsize::new(0);

/// File-name prefix of viewer previews in the temp directory.
const PREVIEW_PREFIX: &str = "imfilters-";

/// Previews older than this are deleted by the next `show_raster`.
const PREVIEW_RETENTION: Duration = Duration::from_secs(60 * 60);

/// Load an image from disk.
///
/// Fails with [`FilterError::NotFound`] for a missing path and
/// [`FilterError::UnsupportedFormat`] when no decoder recognises the file.
pub fn load_raster(path: &Path) -> Result<Raster, FilterError> {
    if !path.exists() {
        return Err(FilterError::NotFound(path.to_path_buf()));
    }

    let img = image::open(path).map_err(|err| match err {
        image::ImageError::Unsupported(reason) => FilterError::UnsupportedFormat {
            path: path.to_path_buf(),
            reason: reason.to_string(),
        },
        image::ImageError::IoError(io) if io.kind() == std::io::ErrorKind::NotFound => {
            FilterError::NotFound(path.to_path_buf())
        }
        source => FilterError::Decode {
            path: path.to_path_buf(),
            source,
        },
    })?;

    let raster = Raster::from_dynamic(&img);
    info!(
        path = %path.display(),
        width = raster.width(),
        height = raster.height(),
        layout = %raster.layout(),
        "decoded image"
    );
    Ok(raster)
}

/// Write `raster` to `path`, replacing any existing file.
pub fn save_raster(raster: &Raster, path: &Path) -> Result<(), FilterError> {
    raster
        .to_dynamic()
        .save(path)
        .map_err(|source| FilterError::Encode {
            path: path.to_path_buf(),
            source,
        })?;
    info!(path = %path.display(), "encoded image");
    Ok(())
}

/// Save to a temporary PNG and open it in an external viewer.
///
/// `viewer` overrides the platform default (`xdg-open`, `open`, or
/// `start`). Returns once the viewer process has been spawned.
///
/// The preview has to outlive this call because the viewer opens it
/// asynchronously. It is left in the temp directory and removed by a later
/// call once it is more than an hour old.
pub fn show_raster(raster: &Raster, viewer: Option<&str>) -> Result<PathBuf, FilterError> {
    let dir = std::env::temp_dir();
    sweep_stale_previews(&dir, SystemTime::now(), PREVIEW_RETENTION);

    let n = SHOW_COUNTER.fetch_add(1, Ordering::Relaxed);
    let path = dir.join(format!("{PREVIEW_PREFIX}{}-{n}.png", std::process::id()));
    save_raster(raster, &path)?;

    viewer_command(viewer)
        .arg(&path)
        .spawn()
        .map_err(FilterError::Display)?;
    info!(path = %path.display(), "handed image to viewer");
    Ok(path)
}

/// Delete previews in `dir` last modified more than `retention` before `now`.
/// Returns how many were removed. Failures are skipped.
fn sweep_stale_previews(dir: &Path, now: SystemTime, retention: Duration) -> usize {
    let Ok(entries) = std::fs::read_dir(dir) else {
        return 0;
    };

    let mut removed = 0;
    for entry in entries.flatten() {
        let name = entry.file_name();
        let is_preview = name
            .to_str()
            .is_some_and(|n| n.starts_with(PREVIEW_PREFIX) && n.ends_with(".png"));
        if !is_preview {
            continue;
        }
        let stale = entry
            .metadata()
            .and_then(|meta| meta.modified())
            .ok()
            .and_then(|modified| now.duration_since(modified).ok())
            .is_some_and(|age| age > retention);
        if stale && std::fs::remove_file(entry.path()).is_ok() {
            removed += 1;
        }
    }

    if removed > 0 {
        debug!(removed, dir = %dir.display(), "removed stale previews");
    }
    removed
}

fn viewer_command(viewer: Option<&str>) -> Command {
    if let Some(program) = viewer {
        return Command::new(program);
    }
    if cfg!(target_os = "macos") {
        Command::new("open")
    } else if cfg!(target_os = "windows") {
        let mut cmd = Command::new("cmd");
        cmd.args(["/C", "start", ""]);
        cmd
    } else {
        Command::new("xdg-open")
    }
}
