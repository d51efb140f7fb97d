// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// One-call functions that never fail loudly. Each runs the matching `Editor`
// operation with the default configuration, logs any error and returns
// `true` only if the output was written.

use std::collections::BTreeMap;
use std::path::Path;

use bildwerk_core::error::Result;
use bildwerk_core::types::{
    BlurKind, Color, FlipDirection, ImageInfo, MergeDirection, PaletteEntry, Rect, TextOptions,
};
use tracing::warn;

use crate::editor::Editor;

fn succeeded<T>(operation: &'static str, result: Result<T>) -> Option<T> {
    result
        .map_err(|err| warn!(operation, error = %err, "Operation failed"))
        .ok()
}

fn editor() -> Editor {
    Editor::default()
}

pub fn convert_image(input: impl AsRef<Path>, output_dir: impl AsRef<Path>, target_format: &str) -> bool {
    succeeded("convert_image", editor().convert_image(input, output_dir, target_format, None)).is_some()
}

pub fn compress_image(
    input: impl AsRef<Path>,
    output_dir: impl AsRef<Path>,
    quality: i32,
    optimize: bool,
) -> bool {
    succeeded("compress_image", editor().compress_image(input, output_dir, quality, optimize)).is_some()
}

pub fn resize_image(
    input: impl AsRef<Path>,
    output_dir: impl AsRef<Path>,
    width: u32,
    height: u32,
    keep_aspect: bool,
) -> bool {
    succeeded(
        "resize_image",
        editor().resize_image(input, output_dir, width, height, keep_aspect),
    )
    .is_some()
}

pub fn crop_image(input: impl AsRef<Path>, output_dir: impl AsRef<Path>, rect: impl Into<Rect>) -> bool {
    succeeded("crop_image", editor().crop_image(input, output_dir, rect)).is_some()
}

pub fn flip_image(input: impl AsRef<Path>, output_dir: impl AsRef<Path>, direction: FlipDirection) -> bool {
    succeeded("flip_image", editor().flip_image(input, output_dir, direction)).is_some()
}

/// `angle` is in degrees, counter-clockwise.
pub fn rotate_image(input: impl AsRef<Path>, output_dir: impl AsRef<Path>, angle: f32, expand: bool) -> bool {
    succeeded("rotate_image", editor().rotate_image(input, output_dir, angle, expand)).is_some()
}

pub fn add_border(
    input: impl AsRef<Path>,
    output_dir: impl AsRef<Path>,
    size: u32,
    color: impl Into<Color>,
) -> bool {
    succeeded("add_border", editor().add_border(input, output_dir, size, color)).is_some()
}

pub fn blur_image(input: impl AsRef<Path>, output_dir: impl AsRef<Path>, kind: BlurKind, radius: u32) -> bool {
    succeeded("blur_image", editor().blur_image(input, output_dir, kind, radius)).is_some()
}

pub fn make_color_transparent(
    input: impl AsRef<Path>,
    output_dir: impl AsRef<Path>,
    color: impl Into<Color>,
) -> bool {
    succeeded(
        "make_color_transparent",
        editor().make_color_transparent(input, output_dir, color),
    )
    .is_some()
}

pub fn add_contrast(input: impl AsRef<Path>, output_dir: impl AsRef<Path>, factor: f32) -> bool {
    succeeded("add_contrast", editor().add_contrast(input, output_dir, factor)).is_some()
}

pub fn adjust_brightness(input: impl AsRef<Path>, output_dir: impl AsRef<Path>, factor: f32) -> bool {
    succeeded("adjust_brightness", editor().adjust_brightness(input, output_dir, factor)).is_some()
}

pub fn grayscale_image(input: impl AsRef<Path>, output_dir: impl AsRef<Path>) -> bool {
    succeeded("grayscale_image", editor().grayscale_image(input, output_dir)).is_some()
}

pub fn add_text(
    input: impl AsRef<Path>,
    output_dir: impl AsRef<Path>,
    text: &str,
    position: (i32, i32),
    options: &TextOptions,
) -> bool {
    succeeded("add_text", editor().add_text(input, output_dir, text, position, options)).is_some()
}

pub fn blur_area(
    input: impl AsRef<Path>,
    output_dir: impl AsRef<Path>,
    rect: impl Into<Rect>,
    radius: u32,
) -> bool {
    succeeded("blur_area", editor().blur_area(input, output_dir, rect, radius)).is_some()
}

pub fn pixelate_area(
    input: impl AsRef<Path>,
    output_dir: impl AsRef<Path>,
    rect: impl Into<Rect>,
    block: u32,
) -> bool {
    succeeded("pixelate_area", editor().pixelate_area(input, output_dir, rect, block)).is_some()
}

pub fn add_gaussian_noise(
    input: impl AsRef<Path>,
    output_dir: impl AsRef<Path>,
    mean: f64,
    stddev: f64,
    seed: u64,
) -> bool {
    succeeded(
        "add_gaussian_noise",
        editor().add_gaussian_noise(input, output_dir, mean, stddev, seed),
    )
    .is_some()
}

pub fn replace_color(
    input: impl AsRef<Path>,
    output_dir: impl AsRef<Path>,
    from: impl Into<Color>,
    to: impl Into<Color>,
) -> bool {
    succeeded("replace_color", editor().replace_color(input, output_dir, from, to)).is_some()
}

pub fn merge_images_horizontally<P: AsRef<Path>>(
    images: &[P],
    tile: (u32, u32),
    output_dir: impl AsRef<Path>,
    output_format: &str,
) -> bool {
    succeeded(
        "merge_images_horizontally",
        editor().merge_images(images, tile, output_dir, output_format, MergeDirection::Horizontal),
    )
    .is_some()
}

pub fn merge_images_vertically<P: AsRef<Path>>(
    images: &[P],
    tile: (u32, u32),
    output_dir: impl AsRef<Path>,
    output_format: &str,
) -> bool {
    succeeded(
        "merge_images_vertically",
        editor().merge_images(images, tile, output_dir, output_format, MergeDirection::Vertical),
    )
    .is_some()
}

pub fn create_solid_color_image(output: impl AsRef<Path>, size: (u32, u32), color: impl Into<Color>) -> bool {
    succeeded(
        "create_solid_color_image",
        editor().create_solid_color_image(output, size, color),
    )
    .is_some()
}

pub fn get_color_palette(input: impl AsRef<Path>, count: usize) -> Option<Vec<PaletteEntry>> {
    succeeded("get_color_palette", editor().color_palette(input, count))
}

pub fn get_image_info(input: impl AsRef<Path>) -> Option<ImageInfo> {
    succeeded("get_image_info", editor().image_info(input))
}

pub fn get_exif_data(input: impl AsRef<Path>) -> Option<BTreeMap<String, String>> {
    succeeded("get_exif_data", editor().exif_data(input))
}
