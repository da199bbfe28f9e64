//! Writing decoded segmentation images to disk.

use std::path::{Path, PathBuf};

use anyhow::Context;
use pseg_client::{EncodedImage, SegmentationResult};
use tracing::info;

/// Stem used for output names: the source file name without its extension.
fn output_stem(source: &Path) -> String {
    source
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| "upload".to_string())
}

/// `<out_dir>/<index>_<stem>_<suffix>.<ext>` for one image of a result.
///
/// `index` is the input's position in the run, so inputs sharing a stem
/// (`a/road.jpg` and `b/road.jpg`, or `road.jpg` and `road.png`) never
/// write to the same path.
pub fn image_path(
    out_dir: &Path,
    index: usize,
    source: &Path,
    suffix: &str,
    image: &EncodedImage,
) -> PathBuf {
    out_dir.join(format!(
        "{:03}_{}_{}.{}",
        index,
        output_stem(source),
        suffix,
        image.extension()
    ))
}

/// Write both images of a segmentation result, creating `out_dir` if needed.
///
/// Returns the written paths, original first.
pub async fn write_segmentation(
    out_dir: &Path,
    index: usize,
    source: &Path,
    result: &SegmentationResult,
) -> anyhow::Result<Vec<PathBuf>> {
    tokio::fs::create_dir_all(out_dir)
        .await
        .with_context(|| format!("failed to create {}", out_dir.display()))?;

    let mut written = Vec::with_capacity(2);
    for (suffix, image) in [
        ("original", &result.original_image),
        ("segmentation", &result.segmentation_image),
    ] {
        let path = image_path(out_dir, index, source, suffix, image);
        image
            .save_to(&path)
            .await
            .with_context(|| format!("failed to write {}", path.display()))?;
        info!("Wrote {} ({} bytes)", path.display(), image.bytes.len());
        written.push(path);
    }

    Ok(written)
}
