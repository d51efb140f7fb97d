// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Callback-driven front ends bound to one input (ImageTool) or one list of
// inputs (MergeImages). Every method returns whether it succeeded and tells
// the caller why in plain English.

use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};

use bildwerk_core::ToolConfig;
use bildwerk_core::error::Result;
use bildwerk_core::human_errors::humanize_error;
use bildwerk_core::types::{
    BlurKind, Color, FlipDirection, ImageInfo, ImageKind, MergeDirection, PaletteEntry, Rect,
    TextOptions,
};
use tracing::{debug, warn};

use crate::editor::Editor;

type Callback = Box<dyn Fn(&str)>;

/// Routes outcomes to the optional success and failure callbacks.
#[derive(Default)]
struct Reporter {
    on_success: Option<Callback>,
    on_failure: Option<Callback>,
}

impl Reporter {
    fn written(&self, action: &str, result: Result<PathBuf>) -> bool {
        self.value(action, result)
            .map(|path| {
                let message = format!("{action}: saved {}", path.display());
                debug!(%message);
                if let Some(callback) = &self.on_success {
                    callback(&message);
                }
            })
            .is_some()
    }

    fn value<T>(&self, action: &str, result: Result<T>) -> Option<T> {
        match result {
            Ok(value) => Some(value),
            Err(err) => {
                warn!(action, error = %err, "Operation failed");
                if let Some(callback) = &self.on_failure {
                    callback(&format!("{action} failed. {}", humanize_error(&err)));
                }
                None
            }
        }
    }
}

impl fmt::Debug for Reporter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Reporter")
            .field("on_success", &self.on_success.is_some())
            .field("on_failure", &self.on_failure.is_some())
            .finish()
    }
}

/// Applies operations to one input image, writing every result into the
/// same output folder.
#[derive(Debug)]
pub struct ImageTool {
    input: PathBuf,
    output_dir: PathBuf,
    editor: Editor,
    reporter: Reporter,
}

impl ImageTool {
    pub fn new(input: impl Into<PathBuf>, output_dir: impl Into<PathBuf>) -> Self {
        Self {
            input: input.into(),
            output_dir: output_dir.into(),
            editor: Editor::default(),
            reporter: Reporter::default(),
        }
    }

    /// Called with a short message after each successful write.
    pub fn on_success(mut self, callback: impl Fn(&str) + 'static) -> Self {
        self.reporter.on_success = Some(Box::new(callback));
        self
    }

    /// Called with a human-readable explanation whenever an operation fails.
    pub fn on_failure(mut self, callback: impl Fn(&str) + 'static) -> Self {
        self.reporter.on_failure = Some(Box::new(callback));
        self
    }

    pub fn with_config(mut self, config: ToolConfig) -> Self {
        self.editor = Editor::new(config);
        self
    }

    pub fn input(&self) -> &Path {
        &self.input
    }

    /// Convert to `target_format`. `stem` names the output file; `None`
    /// gives `converted_image`.
    pub fn convert_image(&self, target_format: &str, stem: Option<&str>) -> bool {
        let result = self
            .editor
            .convert_image(&self.input, &self.output_dir, target_format, stem);
        self.reporter.written("Convert", result)
    }

    pub fn compress_image(&self, quality: i32, optimize: bool) -> bool {
        let result = self
            .editor
            .compress_image(&self.input, &self.output_dir, quality, optimize);
        self.reporter.written("Compress", result)
    }

    pub fn resize_image(&self, width: u32, height: u32, keep_aspect: bool) -> bool {
        let result = self
            .editor
            .resize_image(&self.input, &self.output_dir, width, height, keep_aspect);
        self.reporter.written("Resize", result)
    }

    pub fn crop_image(&self, rect: impl Into<Rect>) -> bool {
        let result = self.editor.crop_image(&self.input, &self.output_dir, rect);
        self.reporter.written("Crop", result)
    }

    pub fn flip_image(&self, direction: FlipDirection) -> bool {
        let result = self.editor.flip_image(&self.input, &self.output_dir, direction);
        self.reporter.written("Flip", result)
    }

    pub fn rotate_image(&self, angle: f32, expand: bool) -> bool {
        let result = self
            .editor
            .rotate_image(&self.input, &self.output_dir, angle, expand);
        self.reporter.written("Rotate", result)
    }

    pub fn add_border_image(&self, size: u32, color: impl Into<Color>) -> bool {
        let result = self.editor.add_border(&self.input, &self.output_dir, size, color);
        self.reporter.written("Add border", result)
    }

    pub fn blur_image(&self, kind: BlurKind, radius: u32) -> bool {
        let result = self.editor.blur_image(&self.input, &self.output_dir, kind, radius);
        self.reporter.written("Blur", result)
    }

    pub fn make_color_transparent(&self, color: impl Into<Color>) -> bool {
        let result = self
            .editor
            .make_color_transparent(&self.input, &self.output_dir, color);
        self.reporter.written("Make colour transparent", result)
    }

    pub fn add_contrast_image(&self, factor: f32) -> bool {
        let result = self.editor.add_contrast(&self.input, &self.output_dir, factor);
        self.reporter.written("Add contrast", result)
    }

    pub fn adjust_brightness(&self, factor: f32) -> bool {
        let result = self
            .editor
            .adjust_brightness(&self.input, &self.output_dir, factor);
        self.reporter.written("Adjust brightness", result)
    }

    pub fn grayscale_image(&self) -> bool {
        let result = self.editor.grayscale_image(&self.input, &self.output_dir);
        self.reporter.written("Grayscale", result)
    }

    /// Draw `text` (lines separated by `\n`) with its box at `position`.
    pub fn add_text_to_image(&self, text: &str, position: (i32, i32), options: &TextOptions) -> bool {
        let result = self
            .editor
            .add_text(&self.input, &self.output_dir, text, position, options);
        self.reporter.written("Add text", result)
    }

    pub fn blur_area(&self, rect: impl Into<Rect>, radius: u32) -> bool {
        let result = self.editor.blur_area(&self.input, &self.output_dir, rect, radius);
        self.reporter.written("Blur area", result)
    }

    pub fn pixelate_area(&self, rect: impl Into<Rect>, block: u32) -> bool {
        let result = self
            .editor
            .pixelate_area(&self.input, &self.output_dir, rect, block);
        self.reporter.written("Pixelate area", result)
    }

    pub fn add_gaussian_noise(&self, mean: f64, stddev: f64, seed: u64) -> bool {
        let result = self
            .editor
            .add_gaussian_noise(&self.input, &self.output_dir, mean, stddev, seed);
        self.reporter.written("Add noise", result)
    }

    pub fn replace_color(&self, from: impl Into<Color>, to: impl Into<Color>) -> bool {
        let result = self
            .editor
            .replace_color(&self.input, &self.output_dir, from, to);
        self.reporter.written("Replace colour", result)
    }

    pub fn get_color_palette(&self, count: usize) -> Option<Vec<PaletteEntry>> {
        let result = self.editor.color_palette(&self.input, count);
        self.reporter.value("Read colour palette", result)
    }

    pub fn get_image_info(&self) -> Option<ImageInfo> {
        self.reporter
            .value("Read image info", self.editor.image_info(&self.input))
    }

    pub fn get_exif_data(&self) -> Option<BTreeMap<String, String>> {
        self.reporter
            .value("Read EXIF data", self.editor.exif_data(&self.input))
    }
}

/// Lays a list of images out side by side or stacked, each resized to one
/// tile size.
#[derive(Debug)]
pub struct MergeImages {
    images: Vec<PathBuf>,
    output_dir: PathBuf,
    tile: (u32, u32),
    format: ImageKind,
    editor: Editor,
    reporter: Reporter,
}

impl MergeImages {
    pub fn new<P: Into<PathBuf>>(
        images: impl IntoIterator<Item = P>,
        output_dir: impl Into<PathBuf>,
        tile: (u32, u32),
    ) -> Self {
        Self {
            images: images.into_iter().map(Into::into).collect(),
            output_dir: output_dir.into(),
            tile,
            format: ImageKind::Png,
            editor: Editor::default(),
            reporter: Reporter::default(),
        }
    }

    pub fn on_success(mut self, callback: impl Fn(&str) + 'static) -> Self {
        self.reporter.on_success = Some(Box::new(callback));
        self
    }

    pub fn on_failure(mut self, callback: impl Fn(&str) + 'static) -> Self {
        self.reporter.on_failure = Some(Box::new(callback));
        self
    }

    pub fn with_config(mut self, config: ToolConfig) -> Self {
        self.editor = Editor::new(config);
        self
    }

    /// Output format of the merged image (PNG unless changed).
    pub fn with_format(mut self, format: ImageKind) -> Self {
        self.format = format;
        self
    }

    pub fn merge_horizontally(&self) -> bool {
        self.merge(MergeDirection::Horizontal)
    }

    pub fn merge_vertically(&self) -> bool {
        self.merge(MergeDirection::Vertical)
    }

    fn merge(&self, direction: MergeDirection) -> bool {
        let result = self.editor.merge_images(
            self.images.as_slice(),
            self.tile,
            &self.output_dir,
            self.format.extension(),
            direction,
        );
        self.reporter.written("Merge", result)
    }
}
