//! Writing snapshots to image files

use image::{DynamicImage, ImageFormat};
use log::info;
use std::path::{Path, PathBuf};

use crate::capture::Raster;

/// Encoders offered in the save dialog, in menu order
pub const SAVE_FORMATS: &[ImageFormat] = &[
    ImageFormat::Png,
    ImageFormat::Jpeg,
    ImageFormat::Bmp,
    ImageFormat::Gif,
    ImageFormat::Tiff,
    ImageFormat::Tga,
    ImageFormat::WebP,
    ImageFormat::Ico,
];

#[derive(Debug)]
pub enum SaveError {
    /// Neither the file name nor the chosen filter name a format
    NoExtension(PathBuf),
    UnsupportedFormat(String),
    Io(std::io::Error),
    Encode(image::ImageError),
}

impl std::fmt::Display for SaveError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SaveError::NoExtension(path) => {
                write!(f, "No image format extension for {}", path.display())
            }
            SaveError::UnsupportedFormat(ext) => {
                write!(f, "No writer for image format \"{}\"", ext)
            }
            SaveError::Io(e) => write!(f, "I/O error: {}", e),
            SaveError::Encode(e) => write!(f, "Encoding failed: {}", e),
        }
    }
}

impl std::error::Error for SaveError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SaveError::Io(e) => Some(e),
            SaveError::Encode(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for SaveError {
    fn from(e: std::io::Error) -> Self {
        SaveError::Io(e)
    }
}

impl From<image::ImageError> for SaveError {
    fn from(e: image::ImageError) -> Self {
        match e {
            image::ImageError::IoError(io) => SaveError::Io(io),
            other => SaveError::Encode(other),
        }
    }
}

/// Primary file extension of a format
pub fn extension(format: ImageFormat) -> &'static str {
    format.extensions_str().first().copied().unwrap_or("png")
}

/// Look up a supported format by extension, case-insensitively
pub fn format_for_extension(ext: &str) -> Option<ImageFormat> {
    ImageFormat::from_extension(ext).filter(|f| SAVE_FORMATS.contains(f))
}

/// Decide the final path and format for a file chosen in the save dialog
///
/// A supported extension on the file name wins. Otherwise the fallback
/// format's extension is appended to the full name.
pub fn resolve_target(
    path: &Path,
    fallback: Option<ImageFormat>,
) -> Result<(PathBuf, ImageFormat), SaveError> {
    if let Some(format) = path
        .extension()
        .and_then(|e| e.to_str())
        .and_then(format_for_extension)
    {
        return Ok((path.to_path_buf(), format));
    }

    let format = fallback.ok_or_else(|| SaveError::NoExtension(path.to_path_buf()))?;
    let mut name = path
        .file_name()
        .ok_or_else(|| SaveError::NoExtension(path.to_path_buf()))?
        .to_os_string();
    name.push(".");
    name.push(extension(format));
    Ok((path.with_file_name(name), format))
}

/// Whether saving to `target` would replace a file the dialog never asked
/// about, because an extension was appended to the `chosen` name
pub fn unconfirmed_overwrite(chosen: &Path, target: &Path) -> bool {
    target != chosen && target.exists()
}

/// Encode `raster` into `path`
pub fn save_raster(raster: &Raster, path: &Path, format: ImageFormat) -> Result<(), SaveError> {
    if !SAVE_FORMATS.contains(&format) {
        return Err(SaveError::UnsupportedFormat(extension(format).to_string()));
    }

    match format {
        // no alpha channel in these encoders
        ImageFormat::Jpeg => DynamicImage::ImageRgba8(raster.clone())
            .to_rgb8()
            .save_with_format(path, format)?,
        _ => raster.save_with_format(path, format)?,
    }

    info!("Image saved to {:?}", path);
    Ok(())
}
