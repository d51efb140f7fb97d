// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// File-to-file operations. Each one checks its paths, decodes the input,
// applies one `ImageProcessor` step, writes `<prefix>_<stem>.<ext>` into the
// output folder and returns the written path.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use bildwerk_core::ToolConfig;
use bildwerk_core::error::{BildwerkError, Result};
use bildwerk_core::types::{
    BlurKind, Color, FlipDirection, ImageInfo, ImageKind, MergeDirection, PaletteEntry, Rect,
    TextOptions,
};
use image::imageops;
use image::{DynamicImage, Rgba, RgbaImage};
use tracing::{info, instrument, warn};

use crate::codec::{self, EncodeOptions};
use crate::image::processor::canvas_size;
use crate::image::{ImageProcessor, inspect};
use crate::paths;

/// Runs Bildwerk operations against files, using one `ToolConfig`.
#[derive(Debug, Clone, Default)]
pub struct Editor {
    config: ToolConfig,
}

impl Editor {
    pub fn new(config: ToolConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ToolConfig {
        &self.config
    }

    // -- Format ---------------------------------------------------------------

    /// Re-encode `input` as `target_format`, written as
    /// `<output_dir>/<stem>.<ext>` (`converted_image` unless `stem` is given).
    #[instrument(skip_all, fields(input = %input.as_ref().display(), target_format = %target_format))]
    pub fn convert_image(
        &self,
        input: impl AsRef<Path>,
        output_dir: impl AsRef<Path>,
        target_format: &str,
        stem: Option<&str>,
    ) -> Result<PathBuf> {
        let (input, output_dir) = (input.as_ref(), output_dir.as_ref());
        paths::require_file(input)?;
        paths::require_dir(output_dir)?;
        let kind: ImageKind = target_format.parse()?;
        codec::image_format(kind)?;

        let output = paths::named_output(output_dir, stem.unwrap_or("converted_image"), kind);
        ImageProcessor::open(input)?.save(&output, kind, self.encode_options())?;
        info!(output = %output.display(), format = %kind, "Image converted");
        Ok(output)
    }

    /// Re-encode `input` in its own format at `quality` (0-100). With
    /// `optimize`, PNG output uses the best compression.
    #[instrument(skip_all, fields(input = %input.as_ref().display(), quality = quality, optimize = optimize))]
    pub fn compress_image(
        &self,
        input: impl AsRef<Path>,
        output_dir: impl AsRef<Path>,
        quality: i32,
        optimize: bool,
    ) -> Result<PathBuf> {
        let quality = u8::try_from(quality)
            .ok()
            .filter(|q| *q <= 100)
            .ok_or(BildwerkError::InvalidPercentage(quality))?;
        let options = EncodeOptions {
            quality: Some(quality),
            optimize: optimize || self.config.png_optimize,
        };
        self.transform_with(input.as_ref(), output_dir.as_ref(), "compressed", options, Ok)
    }

    // -- Geometry -------------------------------------------------------------

    /// Resize to exactly `width` x `height`, or to fit within them when
    /// `keep_aspect` is set.
    pub fn resize_image(
        &self,
        input: impl AsRef<Path>,
        output_dir: impl AsRef<Path>,
        width: u32,
        height: u32,
        keep_aspect: bool,
    ) -> Result<PathBuf> {
        let filter = self.config.resample;
        self.transform(input.as_ref(), output_dir.as_ref(), "resized", |p| {
            if keep_aspect {
                p.resize(width, height, filter)
            } else {
                p.resize_exact(width, height, filter)
            }
        })
    }

    pub fn crop_image(
        &self,
        input: impl AsRef<Path>,
        output_dir: impl AsRef<Path>,
        rect: impl Into<Rect>,
    ) -> Result<PathBuf> {
        let rect = rect.into();
        self.transform(input.as_ref(), output_dir.as_ref(), "cropped", |p| p.crop(rect))
    }

    pub fn flip_image(
        &self,
        input: impl AsRef<Path>,
        output_dir: impl AsRef<Path>,
        direction: FlipDirection,
    ) -> Result<PathBuf> {
        self.transform(input.as_ref(), output_dir.as_ref(), "flipped", |p| Ok(p.flip(direction)))
    }

    /// Rotate counter-clockwise by `angle` degrees.
    pub fn rotate_image(
        &self,
        input: impl AsRef<Path>,
        output_dir: impl AsRef<Path>,
        angle: f32,
        expand: bool,
    ) -> Result<PathBuf> {
        let fill = self.config.rotate_fill;
        self.transform(input.as_ref(), output_dir.as_ref(), "rotated", |p| {
            Ok(p.rotate(angle, expand, fill))
        })
    }

    pub fn add_border(
        &self,
        input: impl AsRef<Path>,
        output_dir: impl AsRef<Path>,
        size: u32,
        color: impl Into<Color>,
    ) -> Result<PathBuf> {
        let color = color.into();
        self.transform(input.as_ref(), output_dir.as_ref(), "added_border", |p| {
            p.add_border(size, color)
        })
    }

    // -- Filters --------------------------------------------------------------

    pub fn blur_image(
        &self,
        input: impl AsRef<Path>,
        output_dir: impl AsRef<Path>,
        kind: BlurKind,
        radius: u32,
    ) -> Result<PathBuf> {
        self.transform(input.as_ref(), output_dir.as_ref(), "blurred", |p| Ok(p.blur(kind, radius)))
    }

    pub fn blur_area(
        &self,
        input: impl AsRef<Path>,
        output_dir: impl AsRef<Path>,
        rect: impl Into<Rect>,
        radius: u32,
    ) -> Result<PathBuf> {
        let rect = rect.into();
        self.transform(input.as_ref(), output_dir.as_ref(), "blurred_area", |p| {
            p.blur_area(rect, radius)
        })
    }

    pub fn pixelate_area(
        &self,
        input: impl AsRef<Path>,
        output_dir: impl AsRef<Path>,
        rect: impl Into<Rect>,
        block: u32,
    ) -> Result<PathBuf> {
        let rect = rect.into();
        self.transform(input.as_ref(), output_dir.as_ref(), "pixelated_area", |p| {
            p.pixelate_area(rect, block)
        })
    }

    /// Add Gaussian noise. The same `seed` always gives the same output.
    pub fn add_gaussian_noise(
        &self,
        input: impl AsRef<Path>,
        output_dir: impl AsRef<Path>,
        mean: f64,
        stddev: f64,
        seed: u64,
    ) -> Result<PathBuf> {
        self.transform(input.as_ref(), output_dir.as_ref(), "noisy", |p| {
            p.gaussian_noise(mean, stddev, seed)
        })
    }

    // -- Colour ---------------------------------------------------------------

    /// Make pixels of exactly `color` transparent. Formats without alpha
    /// (JPEG, BMP) lose the transparency when written.
    pub fn make_color_transparent(
        &self,
        input: impl AsRef<Path>,
        output_dir: impl AsRef<Path>,
        color: impl Into<Color>,
    ) -> Result<PathBuf> {
        let color = color.into();
        self.transform(input.as_ref(), output_dir.as_ref(), "removed_transparency", |p| {
            Ok(p.make_color_transparent(color))
        })
    }

    pub fn replace_color(
        &self,
        input: impl AsRef<Path>,
        output_dir: impl AsRef<Path>,
        from: impl Into<Color>,
        to: impl Into<Color>,
    ) -> Result<PathBuf> {
        let (from, to) = (from.into(), to.into());
        self.transform(input.as_ref(), output_dir.as_ref(), "replaced_color", |p| {
            Ok(p.replace_color(from, to))
        })
    }

    pub fn add_contrast(
        &self,
        input: impl AsRef<Path>,
        output_dir: impl AsRef<Path>,
        factor: f32,
    ) -> Result<PathBuf> {
        require_factor("contrast", factor)?;
        self.transform(input.as_ref(), output_dir.as_ref(), "added_contrast", |p| {
            Ok(p.adjust_contrast(factor))
        })
    }

    pub fn adjust_brightness(
        &self,
        input: impl AsRef<Path>,
        output_dir: impl AsRef<Path>,
        factor: f32,
    ) -> Result<PathBuf> {
        require_factor("brightness", factor)?;
        self.transform(input.as_ref(), output_dir.as_ref(), "adjusted_brightness", |p| {
            Ok(p.adjust_brightness(factor))
        })
    }

    pub fn grayscale_image(
        &self,
        input: impl AsRef<Path>,
        output_dir: impl AsRef<Path>,
    ) -> Result<PathBuf> {
        self.transform(input.as_ref(), output_dir.as_ref(), "grayscale", |p| Ok(p.grayscale()))
    }

    // -- Annotation -----------------------------------------------------------

    /// Draw `text` with its box's top-left corner at `position`.
    pub fn add_text(
        &self,
        input: impl AsRef<Path>,
        output_dir: impl AsRef<Path>,
        text: &str,
        position: (i32, i32),
        options: &TextOptions,
    ) -> Result<PathBuf> {
        let shadow_offset = self.config.shadow_offset;
        self.transform(input.as_ref(), output_dir.as_ref(), "text", |p| {
            p.draw_text(text, position, options, shadow_offset)
        })
    }

    // -- Composition ----------------------------------------------------------

    /// Resize every existing image in `images` to `tile` and lay them out in
    /// a row or column on a canvas of the configured background colour.
    /// Paths that do not exist are skipped with a warning.
    #[instrument(skip_all, fields(count = images.len(), direction = ?direction, output_format = %output_format))]
    pub fn merge_images<P: AsRef<Path>>(
        &self,
        images: &[P],
        tile: (u32, u32),
        output_dir: impl AsRef<Path>,
        output_format: &str,
        direction: MergeDirection,
    ) -> Result<PathBuf> {
        let output_dir = output_dir.as_ref();
        paths::require_dir(output_dir)?;
        let kind: ImageKind = output_format.parse()?;
        codec::image_format(kind)?;

        let (tile_w, tile_h) = canvas_size(u64::from(tile.0), u64::from(tile.1))?;
        let existing: Vec<&Path> = images
            .iter()
            .map(AsRef::as_ref)
            .filter(|path| {
                let found = path.is_file();
                if !found {
                    warn!(path = %path.display(), "Image does not exist, skipping");
                }
                found
            })
            .collect();
        if existing.is_empty() {
            return Err(BildwerkError::NothingToMerge);
        }

        let count = existing.len() as u64;
        let (canvas_w, canvas_h) = match direction {
            MergeDirection::Horizontal => canvas_size(u64::from(tile_w) * count, u64::from(tile_h))?,
            MergeDirection::Vertical => canvas_size(u64::from(tile_w), u64::from(tile_h) * count)?,
        };
        let mut tiles = Vec::with_capacity(existing.len());
        for path in existing {
            let tile = ImageProcessor::open(path)?
                .resize_exact(tile_w, tile_h, self.config.resample)?
                .into_dynamic()
                .into_rgba8();
            tiles.push(tile);
        }

        let mut canvas = RgbaImage::from_pixel(
            canvas_w,
            canvas_h,
            Rgba(self.config.merge_background.to_rgba_array()),
        );
        for (i, tile) in tiles.iter().enumerate() {
            let offset = i as i64;
            let (x, y) = match direction {
                MergeDirection::Horizontal => (offset * i64::from(tile_w), 0),
                MergeDirection::Vertical => (0, offset * i64::from(tile_h)),
            };
            imageops::replace(&mut canvas, tile, x, y);
        }

        let output = paths::named_output(output_dir, direction.file_stem(), kind);
        ImageProcessor::from_dynamic(DynamicImage::ImageRgba8(canvas)).save(
            &output,
            kind,
            self.encode_options(),
        )?;
        info!(output = %output.display(), count, canvas_w, canvas_h, "Images merged");
        Ok(output)
    }

    /// Write a `width` x `height` image filled with `color` to `output`. The
    /// format comes from the output's extension.
    #[instrument(skip_all, fields(output = %output.as_ref().display()))]
    pub fn create_solid_color_image(
        &self,
        output: impl AsRef<Path>,
        (width, height): (u32, u32),
        color: impl Into<Color>,
    ) -> Result<PathBuf> {
        let output = output.as_ref();
        if let Some(parent) = output.parent().filter(|p| !p.as_os_str().is_empty()) {
            paths::require_dir(parent)?;
        }
        let kind = paths::kind_of(output)?;
        if width == 0 || height == 0 {
            return Err(BildwerkError::invalid("size", format!("{width}x{height}")));
        }
        canvas_size(u64::from(width), u64::from(height))?;

        let canvas = RgbaImage::from_pixel(width, height, Rgba(color.into().to_rgba_array()));
        ImageProcessor::from_dynamic(DynamicImage::ImageRgba8(canvas)).save(
            output,
            kind,
            self.encode_options(),
        )?;
        info!(width, height, "Solid colour image written");
        Ok(output.to_path_buf())
    }

    // -- Inspection -----------------------------------------------------------

    /// The `count` most frequent colours of `input`.
    pub fn color_palette(&self, input: impl AsRef<Path>, count: usize) -> Result<Vec<PaletteEntry>> {
        let input = input.as_ref();
        paths::require_file(input)?;
        let processor = ImageProcessor::open(input)?;
        Ok(inspect::color_palette(processor.as_dynamic(), count))
    }

    pub fn image_info(&self, input: impl AsRef<Path>) -> Result<ImageInfo> {
        let input = input.as_ref();
        paths::require_file(input)?;
        inspect::image_info(input)
    }

    pub fn exif_data(&self, input: impl AsRef<Path>) -> Result<BTreeMap<String, String>> {
        let input = input.as_ref();
        paths::require_file(input)?;
        inspect::exif_fields(input)
    }

    // -- Helpers --------------------------------------------------------------

    fn encode_options(&self) -> EncodeOptions {
        EncodeOptions::from_config(&self.config)
    }

    fn transform(
        &self,
        input: &Path,
        output_dir: &Path,
        prefix: &str,
        op: impl FnOnce(ImageProcessor) -> Result<ImageProcessor>,
    ) -> Result<PathBuf> {
        self.transform_with(input, output_dir, prefix, self.encode_options(), op)
    }

    #[instrument(skip_all, fields(input = %input.display(), prefix = %prefix))]
    fn transform_with(
        &self,
        input: &Path,
        output_dir: &Path,
        prefix: &str,
        options: EncodeOptions,
        op: impl FnOnce(ImageProcessor) -> Result<ImageProcessor>,
    ) -> Result<PathBuf> {
        paths::require_file(input)?;
        paths::require_dir(output_dir)?;
        let (output, kind) = paths::prefixed_output(input, output_dir, prefix)?;
        codec::image_format(kind)?;

        let processed = op(ImageProcessor::open(input)?)?;
        processed.save(&output, kind, options)?;
        info!(
            output = %output.display(),
            width = processed.width(),
            height = processed.height(),
            "Image written"
        );
        Ok(output)
    }
}

fn require_factor(name: &'static str, factor: f32) -> Result<()> {
    if factor.is_finite() && factor >= 0.0 {
        Ok(())
    } else {
        Err(BildwerkError::invalid(name, format!("factor {factor} must be zero or more")))
    }
}
