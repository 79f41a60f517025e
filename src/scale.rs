//! Never-upscale image scaling.
//!
//! A source image is either copied unchanged (when it already fits the
//! requested box) or shrunk uniformly and re-encoded in its own format.

use std::fs;
use std::path::Path;

use image::imageops::FilterType;
use image::{DynamicImage, ImageFormat, ImageReader};

use crate::error::ImgfindError;

/// Produces the output file for a resolved reference.
pub trait Scaler {
    /// Write a copy of `source` at `dest` that fits within
    /// `target_width` × `target_height` (0 = unconstrained) and return the
    /// written image's dimensions.
    fn scale(
        &self,
        source: &Path,
        dest: &Path,
        target_width: u32,
        target_height: u32,
    ) -> Result<(u32, u32), ImgfindError>;
}

/// The scaler used by the CLI: header probe with `imagesize`, resize and
/// re-encode with `image`.
#[derive(Clone, Copy, Debug, Default)]
pub struct RasterScaler;

impl Scaler for RasterScaler {
    fn scale(
        &self,
        source: &Path,
        dest: &Path,
        target_width: u32,
        target_height: u32,
    ) -> Result<(u32, u32), ImgfindError> {
        scale_image(source, dest, target_width, target_height)
    }
}

/// Uniform scale factor for an `iw` × `ih` image and a target box.
///
/// Returns 1.0 when both targets are 0. Values of 1.0 or more mean no
/// shrinking is needed.
pub fn scale_factor(iw: u32, ih: u32, target_width: u32, target_height: u32) -> f64 {
    let fx = f64::from(target_width) / f64::from(iw);
    let fy = f64::from(target_height) / f64::from(ih);
    match (target_width > 0, target_height > 0) {
        (false, false) => 1.0,
        (true, false) => fx,
        (false, true) => fy,
        (true, true) => fx.min(fy),
    }
}

/// Output dimensions for an `iw` × `ih` image, or `None` when the image
/// already fits and should be copied as-is.
pub fn scaled_size(
    iw: u32,
    ih: u32,
    target_width: u32,
    target_height: u32,
) -> Option<(u32, u32)> {
    let factor = scale_factor(iw, ih, target_width, target_height);
    if factor.is_nan() || factor >= 1.0 {
        return None;
    }
    Some((scale_axis(iw, factor), scale_axis(ih, factor)))
}

fn scale_axis(len: u32, factor: f64) -> u32 {
    (f64::from(len) * factor).round().max(1.0) as u32
}

/// Copy or shrink `source` into `dest`; see [`Scaler::scale`].
pub fn scale_image(
    source: &Path,
    dest: &Path,
    target_width: u32,
    target_height: u32,
) -> Result<(u32, u32), ImgfindError> {
    let (iw, ih) = read_image_dimensions(source)?;

    if let Some(parent) = dest.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(ImgfindError::Io)?;
    }

    match scaled_size(iw, ih, target_width, target_height) {
        None => {
            copy_unchanged(source, dest)?;
            log::debug!("copied {} ({iw}x{ih}) to {}", source.display(), dest.display());
            Ok((iw, ih))
        }
        Some((width, height)) => {
            resize_to(source, dest, width, height)?;
            log::debug!(
                "scaled {} from {iw}x{ih} to {width}x{height} at {}",
                source.display(),
                dest.display()
            );
            Ok((width, height))
        }
    }
}

/// Native pixel dimensions read from the image header.
pub fn read_image_dimensions(path: &Path) -> Result<(u32, u32), ImgfindError> {
    let size = imagesize::size(path).map_err(|source| ImgfindError::ImageHeader {
        path: path.to_path_buf(),
        source,
    })?;

    let width = u32::try_from(size.width).map_err(|_| {
        ImgfindError::UnsupportedFormat(format!(
            "image width {} of {} does not fit in u32",
            size.width,
            path.display()
        ))
    })?;
    let height = u32::try_from(size.height).map_err(|_| {
        ImgfindError::UnsupportedFormat(format!(
            "image height {} of {} does not fit in u32",
            size.height,
            path.display()
        ))
    })?;

    Ok((width, height))
}

fn copy_unchanged(source: &Path, dest: &Path) -> Result<(), ImgfindError> {
    if same_file(source, dest) {
        return Ok(());
    }
    fs::copy(source, dest)
        .map(|_| ())
        .map_err(|err| ImgfindError::ImageCopy {
            source_path: source.to_path_buf(),
            dest: dest.to_path_buf(),
            source: err,
        })
}

fn same_file(a: &Path, b: &Path) -> bool {
    match (fs::canonicalize(a), fs::canonicalize(b)) {
        (Ok(a), Ok(b)) => a == b,
        _ => false,
    }
}

fn resize_to(source: &Path, dest: &Path, width: u32, height: u32) -> Result<(), ImgfindError> {
    let reader = ImageReader::open(source)
        .and_then(|reader| reader.with_guessed_format())
        .map_err(|err| ImgfindError::ImageDecode {
            path: source.to_path_buf(),
            source: image::ImageError::IoError(err),
        })?;

    let format = reader
        .format()
        .or_else(|| ImageFormat::from_path(source).ok())
        .ok_or_else(|| {
            ImgfindError::UnsupportedFormat(format!(
                "cannot determine image format of {}",
                source.display()
            ))
        })?;

    let decoded = reader.decode().map_err(|err| ImgfindError::ImageDecode {
        path: source.to_path_buf(),
        source: err,
    })?;

    let mut resized = decoded.resize_exact(width, height, FilterType::Lanczos3);
    if format == ImageFormat::Jpeg && resized.color().has_alpha() {
        resized = DynamicImage::ImageRgb8(resized.to_rgb8());
    }

    resized
        .save_with_format(dest, format)
        .map_err(|err| ImgfindError::ImageEncode {
            path: dest.to_path_buf(),
            source: err,
        })
}
