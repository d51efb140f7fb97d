// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Read-only inspection: dominant colours, basic file info and EXIF tags.

use std::collections::{BTreeMap, HashMap};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use bildwerk_core::error::{BildwerkError, Result};
use bildwerk_core::types::{Color, ImageInfo, ImageKind, PaletteEntry};
use image::{DynamicImage, ImageReader};
use tracing::{debug, instrument};

use crate::codec;

/// The `count` most frequent RGB colours and their share of all pixels,
/// most frequent first. Ties are broken by colour value.
pub fn color_palette(image: &DynamicImage, count: usize) -> Vec<PaletteEntry> {
    let rgb = image.to_rgb8();
    let total = (u64::from(rgb.width()) * u64::from(rgb.height())).max(1) as f64;

    let mut counts: HashMap<[u8; 3], u64> = HashMap::new();
    for pixel in rgb.pixels() {
        *counts.entry(pixel.0).or_insert(0) += 1;
    }
    debug!(distinct = counts.len(), "Colours counted");

    let mut ranked: Vec<([u8; 3], u64)> = counts.into_iter().collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(&b.0)));
    ranked
        .into_iter()
        .take(count)
        .map(|([r, g, b], n)| PaletteEntry {
            color: Color::rgb(r, g, b),
            percentage: (n as f64 * 10_000.0 / total).round() / 100.0,
        })
        .collect()
}

/// Dimensions, detected format, colour type and size of an image file.
#[instrument(skip_all, fields(path = %path.display()))]
pub fn image_info(path: &Path) -> Result<ImageInfo> {
    let reader = ImageReader::open(path)?.with_guessed_format()?;
    let format = reader.format().and_then(codec::kind_from_format);
    let image = reader
        .decode()
        .map_err(|err| BildwerkError::Decode(format!("{}: {err}", path.display())))?;

    Ok(ImageInfo {
        path: path.to_path_buf(),
        width: image.width(),
        height: image.height(),
        format,
        color_type: format!("{:?}", image.color()),
        has_alpha: image.color().has_alpha(),
        file_size: std::fs::metadata(path)?.len(),
    })
}

/// EXIF tags of `path` as display strings, keyed by tag name. Tags from the
/// primary image win over duplicates in the thumbnail directory. Files
/// without EXIF data, including formats that cannot carry it (BMP, GIF,
/// ICO), yield an empty map.
#[instrument(skip_all, fields(path = %path.display()))]
pub fn exif_fields(path: &Path) -> Result<BTreeMap<String, String>> {
    let mut reader = BufReader::new(File::open(path)?);
    if let Some(kind @ (ImageKind::Bmp | ImageKind::Gif | ImageKind::Ico)) = ImageKind::from_path(path) {
        debug!(format = %kind, "Format has no EXIF container");
        return Ok(BTreeMap::new());
    }
    let exif = match exif::Reader::new().read_from_container(&mut reader) {
        Ok(exif) => exif,
        Err(exif::Error::NotFound(_)) => {
            debug!("No EXIF data");
            return Ok(BTreeMap::new());
        }
        Err(exif::Error::InvalidFormat("Unknown image format")) => {
            debug!("Container not recognised, no EXIF data");
            return Ok(BTreeMap::new());
        }
        Err(exif::Error::Io(err)) => return Err(err.into()),
        Err(err) => return Err(BildwerkError::Metadata(err.to_string())),
    };

    let mut fields = BTreeMap::new();
    for field in exif.fields() {
        fields
            .entry(field.tag.to_string())
            .or_insert_with(|| field.display_value().with_unit(&exif).to_string());
    }
    debug!(tags = fields.len(), "EXIF read");
    Ok(fields)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgb, RgbImage};

    fn two_tone() -> DynamicImage {
        // 75% red, 25% blue.
        DynamicImage::ImageRgb8(RgbImage::from_fn(4, 4, |x, _| {
            if x < 3 { Rgb([255, 0, 0]) } else { Rgb([0, 0, 255]) }
        }))
    }

    #[test]
    fn palette_orders_by_frequency() {
        let palette = color_palette(&two_tone(), 10);
        assert_eq!(palette.len(), 2);
        assert_eq!(palette[0].color, Color::rgb(255, 0, 0));
        assert_eq!(palette[0].percentage, 75.0);
        assert_eq!(palette[1].percentage, 25.0);
    }

    #[test]
    fn palette_respects_count_and_sums_below_hundred() {
        let img = DynamicImage::ImageRgb8(RgbImage::from_fn(7, 3, |x, y| Rgb([x as u8, y as u8, 0])));
        let palette = color_palette(&img, 5);
        assert_eq!(palette.len(), 5);
        let sum: f64 = palette.iter().map(|entry| entry.percentage).sum();
        assert!(sum <= 100.0);
    }

    #[test]
    fn info_reports_png_details() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("info.png");
        two_tone().save(&path).unwrap();

        let info = image_info(&path).unwrap();
        assert_eq!((info.width, info.height), (4, 4));
        assert_eq!(info.format, Some(bildwerk_core::ImageKind::Png));
        assert_eq!(info.color_type, "Rgb8");
        assert!(!info.has_alpha);
        assert!(info.file_size > 0);
    }

    #[test]
    fn jpeg_without_exif_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("plain.jpeg");
        two_tone().save(&path).unwrap();
        assert!(exif_fields(&path).unwrap().is_empty());
    }

    #[test]
    fn formats_without_exif_container_are_empty() {
        let dir = tempfile::tempdir().unwrap();
        for name in ["plain.bmp", "plain.gif"] {
            let path = dir.path().join(name);
            two_tone().save(&path).unwrap();
            assert!(exif_fields(&path).unwrap().is_empty(), "{name}");
        }
        // A BMP under a misleading name still has no EXIF.
        let renamed = dir.path().join("bitmap.dat");
        std::fs::copy(dir.path().join("plain.bmp"), &renamed).unwrap();
        assert!(exif_fields(&renamed).unwrap().is_empty());
    }

    #[test]
    fn missing_file_is_io_error() {
        assert!(matches!(
            exif_fields(Path::new("/nonexistent/photo.jpg")),
            Err(BildwerkError::Io(_))
        ));
    }
}
