//! File round trips through the `image` codecs.

use imfilters_core::transform::params::{Sepia, Threshold};
use imfilters_core::{ChannelLayout, Filter, FilterError, Raster, load_raster, save_raster};

fn checkerboard() -> Raster {
    Raster::from_fn(6, 5, |x, y| {
        if (x + y) % 2 == 0 {
            [250, 120, 10]
        } else {
            [5, 60, 200]
        }
    })
}

#[test]
fn test_png_roundtrip_is_lossless() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("board.png");

    let raster = checkerboard();
    save_raster(&raster, &path).unwrap();
    let back = load_raster(&path).unwrap();

    assert_eq!(back, raster);
    assert_eq!(back.layout(), ChannelLayout::Rgb);
}

#[test]
fn test_rgba_png_keeps_alpha() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("alpha.png");

    let raster = Raster::new(2, 1, vec![[1, 2, 3, 0], [4, 5, 6, 128]], ChannelLayout::Rgba).unwrap();
    raster.save(&path).unwrap();

    assert_eq!(load_raster(&path).unwrap(), raster);
}

#[test]
fn test_save_overwrites_existing_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("out.png");

    save_raster(&checkerboard(), &path).unwrap();
    let thresholded = Threshold::default().apply(&checkerboard()).unwrap();
    save_raster(&thresholded, &path).unwrap();

    assert_eq!(load_raster(&path).unwrap(), thresholded);
}

#[test]
fn test_filtered_output_survives_reload() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("in.png");
    let output = dir.path().join("out.png");

    save_raster(&checkerboard(), &input).unwrap();
    let loaded = load_raster(&input).unwrap();
    let sepia = Sepia::default().apply(&loaded).unwrap();
    sepia.save(&output).unwrap();

    assert_eq!(load_raster(&output).unwrap(), sepia);
    assert_eq!(load_raster(&input).unwrap(), loaded);
}

#[test]
fn test_missing_input_is_not_found() {
    let dir = tempfile::tempdir().unwrap();
    let err = load_raster(&dir.path().join("nope.png")).unwrap_err();
    assert!(matches!(err, FilterError::NotFound(_)));
}

#[test]
fn test_garbage_file_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("noise.png");
    std::fs::write(&path, b"definitely not a png").unwrap();

    let err = load_raster(&path).unwrap_err();
    assert!(
        matches!(
            err,
            FilterError::UnsupportedFormat { .. } | FilterError::Decode { .. }
        ),
        "unexpected error {err:?}"
    );
}

#[test]
fn test_unknown_extension_fails_to_encode() {
    let dir = tempfile::tempdir().unwrap();
    let err = save_raster(&checkerboard(), &dir.path().join("out.notaformat")).unwrap_err();
    assert!(matches!(err, FilterError::Encode { .. }));
}

#[test]
fn test_unwritable_path_fails_to_encode() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("missing-dir").join("out.png");
    let err = save_raster(&checkerboard(), &path).unwrap_err();
    assert!(matches!(err, FilterError::Encode { .. }));
}
