//! Image decode/encode at the edges of the pipeline.

use crate::core::error::{FilmError, FilmResult};
use image::{ImageFormat, RgbImage};
use std::io::Cursor;
use std::path::{Path, PathBuf};

/// Reads source photos and writes graded results.
pub trait ImageCodec {
    /// Decode the image at `path`, normalised to 8-bit RGB.
    fn decode(&self, path: &Path) -> FilmResult<RgbImage>;

    /// Encode `image` to `path`; the format follows the file extension.
    fn encode(&self, image: &RgbImage, path: &Path) -> FilmResult<()>;
}

/// Codec backed by the `image` crate and the local filesystem.
///
/// Encoding happens fully in memory and lands on disk through a rename, so a
/// failed save never leaves a truncated file at the output path.
#[derive(Debug, Clone, Copy, Default)]
pub struct FileCodec;

impl ImageCodec for FileCodec {
    fn decode(&self, path: &Path) -> FilmResult<RgbImage> {
        if !path.is_file() {
            return Err(FilmError::NotFound { path: path.to_path_buf() });
        }
        let image = image::open(path).map_err(|e| match e {
            image::ImageError::IoError(io) if io.kind() == std::io::ErrorKind::NotFound => {
                FilmError::NotFound { path: path.to_path_buf() }
            }
            other => FilmError::from(other),
        })?;
        Ok(image.to_rgb8())
    }

    fn encode(&self, image: &RgbImage, path: &Path) -> FilmResult<()> {
        let format = ImageFormat::from_path(path)?;

        let mut bytes = Vec::new();
        image.write_to(&mut Cursor::new(&mut bytes), format)?;

        let staging = staging_path(path);
        if let Err(e) = std::fs::write(&staging, &bytes) {
            let _ = std::fs::remove_file(&staging);
            return Err(e.into());
        }
        if let Err(e) = std::fs::rename(&staging, path) {
            let _ = std::fs::remove_file(&staging);
            return Err(e.into());
        }
        Ok(())
    }
}

/// Hidden sibling used while an encode is in flight.
fn staging_path(path: &Path) -> PathBuf {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    path.with_file_name(format!(".{}.partial", name))
}
