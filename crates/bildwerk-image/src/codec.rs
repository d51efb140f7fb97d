// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Decoding from files and buffers, and encoding a `DynamicImage`
// into the pixel layout each output format accepts.

use std::borrow::Cow;
use std::io::Cursor;
use std::path::Path;

use bildwerk_core::ToolConfig;
use bildwerk_core::error::{BildwerkError, Result};
use bildwerk_core::types::ImageKind;
use image::codecs::jpeg::JpegEncoder;
use image::codecs::png::{CompressionType, FilterType as PngFilter, PngEncoder};
use image::{DynamicImage, ImageFormat, ImageReader};
use tracing::debug;

/// JPEG quality when neither the caller nor the config picks one.
pub const DEFAULT_JPEG_QUALITY: u8 = 90;

/// Encoder settings for a single write.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct EncodeOptions {
    /// JPEG quality 0-100. Ignored by lossless formats.
    pub quality: Option<u8>,
    /// Use the best PNG compression.
    pub optimize: bool,
}

impl EncodeOptions {
    pub fn from_config(config: &ToolConfig) -> Self {
        Self {
            quality: Some(config.jpeg_quality),
            optimize: config.png_optimize,
        }
    }
}

/// Map a Bildwerk format to the `image` crate's encoder format.
pub fn image_format(kind: ImageKind) -> Result<ImageFormat> {
    match kind {
        ImageKind::Jpeg => Ok(ImageFormat::Jpeg),
        ImageKind::Png => Ok(ImageFormat::Png),
        ImageKind::Gif => Ok(ImageFormat::Gif),
        ImageKind::Bmp => Ok(ImageFormat::Bmp),
        ImageKind::Tiff => Ok(ImageFormat::Tiff),
        ImageKind::WebP => Ok(ImageFormat::WebP),
        ImageKind::Ico => Ok(ImageFormat::Ico),
        ImageKind::Svg => Err(BildwerkError::UnsupportedFormat(
            "svg (vector output is not supported)".into(),
        )),
    }
}

/// Map a detected `image` format back to a Bildwerk format.
pub fn kind_from_format(format: ImageFormat) -> Option<ImageKind> {
    match format {
        ImageFormat::Jpeg => Some(ImageKind::Jpeg),
        ImageFormat::Png => Some(ImageKind::Png),
        ImageFormat::Gif => Some(ImageKind::Gif),
        ImageFormat::Bmp => Some(ImageKind::Bmp),
        ImageFormat::Tiff => Some(ImageKind::Tiff),
        ImageFormat::WebP => Some(ImageKind::WebP),
        ImageFormat::Ico => Some(ImageKind::Ico),
        _ => None,
    }
}

/// Decode an image file, sniffing the format from its contents.
pub fn decode_file(path: &Path) -> Result<DynamicImage> {
    let reader = ImageReader::open(path)?.with_guessed_format()?;
    reader
        .decode()
        .map_err(|err| decode_error(err, &path.display().to_string()))
}

/// Decode an encoded buffer (JPEG, PNG, etc.).
pub fn decode_bytes(data: &[u8]) -> Result<DynamicImage> {
    image::load_from_memory(data).map_err(|err| decode_error(err, "buffer"))
}

fn decode_error(err: image::ImageError, source: &str) -> BildwerkError {
    match err {
        image::ImageError::IoError(io_err) => BildwerkError::Io(io_err),
        other => BildwerkError::Decode(format!("{source}: {other}")),
    }
}

/// Encode `image` as `kind`, returning the raw bytes.
pub fn encode(image: &DynamicImage, kind: ImageKind, options: EncodeOptions) -> Result<Vec<u8>> {
    let format = image_format(kind)?;
    let prepared = for_encoder(image, kind);
    let mut buffer = Vec::new();

    let written = match kind {
        ImageKind::Jpeg => {
            let quality = options.quality.unwrap_or(DEFAULT_JPEG_QUALITY).clamp(1, 100);
            prepared.write_with_encoder(JpegEncoder::new_with_quality(&mut buffer, quality))
        }
        ImageKind::Png if options.optimize => prepared.write_with_encoder(
            PngEncoder::new_with_quality(&mut buffer, CompressionType::Best, PngFilter::Adaptive),
        ),
        _ => prepared.write_to(&mut Cursor::new(&mut buffer), format),
    };
    written.map_err(|err| BildwerkError::Encode(format!("{kind}: {err}")))?;

    debug!(format = %kind, bytes = buffer.len(), "Image encoded");
    Ok(buffer)
}

/// Encode `image` as `kind` and write it to `path`.
pub fn write_file(
    image: &DynamicImage,
    path: &Path,
    kind: ImageKind,
    options: EncodeOptions,
) -> Result<()> {
    let bytes = encode(image, kind, options)?;
    std::fs::write(path, bytes)?;
    Ok(())
}

/// Convert to a pixel layout the target encoder accepts. JPEG and BMP lose
/// alpha, and the remaining palette-style formats are written as RGBA8.
fn for_encoder(image: &DynamicImage, kind: ImageKind) -> Cow<'_, DynamicImage> {
    use DynamicImage::*;

    let has_alpha = image.color().has_alpha();
    match (kind, image) {
        (ImageKind::Jpeg, ImageLuma8(_) | ImageRgb8(_)) => Cow::Borrowed(image),
        (ImageKind::Jpeg, _) if !image.color().has_color() => {
            Cow::Owned(ImageLuma8(image.to_luma8()))
        }
        (ImageKind::Jpeg, _) => Cow::Owned(ImageRgb8(image.to_rgb8())),

        (
            ImageKind::Png,
            ImageLuma8(_) | ImageLumaA8(_) | ImageRgb8(_) | ImageRgba8(_) | ImageLuma16(_)
            | ImageLumaA16(_) | ImageRgb16(_) | ImageRgba16(_),
        ) => Cow::Borrowed(image),

        (ImageKind::Bmp, ImageLuma8(_) | ImageRgb8(_)) => Cow::Borrowed(image),
        (ImageKind::Bmp, _) => Cow::Owned(ImageRgb8(image.to_rgb8())),

        (ImageKind::Tiff, ImageLuma8(_) | ImageRgb8(_) | ImageRgba8(_)) => Cow::Borrowed(image),

        (ImageKind::WebP, ImageRgb8(_)) => Cow::Borrowed(image),
        (ImageKind::WebP, _) if !has_alpha => Cow::Owned(ImageRgb8(image.to_rgb8())),

        (_, ImageRgba8(_)) => Cow::Borrowed(image),
        _ => Cow::Owned(ImageRgba8(image.to_rgba8())),
    }
}
