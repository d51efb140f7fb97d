// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Core domain types for Bildwerk: formats, colours, rectangles and the
// per-operation option enums.

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::BildwerkError;

/// Image file formats Bildwerk recognises.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ImageKind {
    Jpeg,
    Png,
    Gif,
    Bmp,
    Tiff,
    WebP,
    Ico,
    /// Recognised by name only. Raster output cannot be written as SVG.
    Svg,
}

impl ImageKind {
    /// Infer the kind from a file extension or format name.
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.trim_start_matches('.').to_ascii_lowercase().as_str() {
            "jpg" | "jpeg" => Some(Self::Jpeg),
            "png" => Some(Self::Png),
            "gif" => Some(Self::Gif),
            "bmp" => Some(Self::Bmp),
            "tif" | "tiff" => Some(Self::Tiff),
            "webp" => Some(Self::WebP),
            "ico" => Some(Self::Ico),
            "svg" => Some(Self::Svg),
            _ => None,
        }
    }

    /// Infer the kind from the extension of `path`.
    pub fn from_path(path: &Path) -> Option<Self> {
        path.extension()
            .and_then(|ext| ext.to_str())
            .and_then(Self::from_extension)
    }

    /// Extension used when naming output files.
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Jpeg => "jpeg",
            Self::Png => "png",
            Self::Gif => "gif",
            Self::Bmp => "bmp",
            Self::Tiff => "tiff",
            Self::WebP => "webp",
            Self::Ico => "ico",
            Self::Svg => "svg",
        }
    }

    pub fn mime_type(&self) -> &'static str {
        match self {
            Self::Jpeg => "image/jpeg",
            Self::Png => "image/png",
            Self::Gif => "image/gif",
            Self::Bmp => "image/bmp",
            Self::Tiff => "image/tiff",
            Self::WebP => "image/webp",
            Self::Ico => "image/x-icon",
            Self::Svg => "image/svg+xml",
        }
    }

    /// Whether the format keeps an alpha channel when written.
    pub fn supports_alpha(&self) -> bool {
        !matches!(self, Self::Jpeg | Self::Bmp)
    }
}

impl fmt::Display for ImageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

impl FromStr for ImageKind {
    type Err = BildwerkError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_extension(s).ok_or_else(|| BildwerkError::UnsupportedFormat(s.to_owned()))
    }
}

/// An 8-bit RGBA colour.
///
/// Parses from `#rgb`, `#rrggbb`, `#rrggbbaa` or a handful of CSS colour
/// names, and serialises as `#rrggbbaa`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const BLACK: Color = Color::rgb(0, 0, 0);
    pub const WHITE: Color = Color::rgb(255, 255, 255);
    pub const TRANSPARENT: Color = Color::rgba(255, 255, 255, 0);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub fn to_rgb_array(self) -> [u8; 3] {
        [self.r, self.g, self.b]
    }

    pub fn to_rgba_array(self) -> [u8; 4] {
        [self.r, self.g, self.b, self.a]
    }

    fn named(name: &str) -> Option<Self> {
        let color = match name {
            "black" => Self::BLACK,
            "white" => Self::WHITE,
            "red" => Self::rgb(255, 0, 0),
            "green" => Self::rgb(0, 128, 0),
            "blue" => Self::rgb(0, 0, 255),
            "yellow" => Self::rgb(255, 255, 0),
            "orange" => Self::rgb(255, 165, 0),
            "purple" => Self::rgb(128, 0, 128),
            "gray" | "grey" => Self::rgb(128, 128, 128),
            "transparent" => Self::TRANSPARENT,
            _ => return None,
        };
        Some(color)
    }
}

impl From<(u8, u8, u8)> for Color {
    fn from((r, g, b): (u8, u8, u8)) -> Self {
        Self::rgb(r, g, b)
    }
}

impl From<(u8, u8, u8, u8)> for Color {
    fn from((r, g, b, a): (u8, u8, u8, u8)) -> Self {
        Self::rgba(r, g, b, a)
    }
}

impl FromStr for Color {
    type Err = BildwerkError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_ascii_lowercase();
        if let Some(color) = Self::named(&lower) {
            return Ok(color);
        }

        let bad = || BildwerkError::invalid("color", format!("cannot parse {s:?}"));
        let hex = lower.strip_prefix('#').ok_or_else(bad)?;
        if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(bad());
        }
        let byte = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).map_err(|_| bad());
        let nibble = |i: usize| u8::from_str_radix(&hex[i..i + 1], 16).map(|v| v * 17).map_err(|_| bad());

        match hex.len() {
            3 => Ok(Self::rgb(nibble(0)?, nibble(1)?, nibble(2)?)),
            6 => Ok(Self::rgb(byte(0)?, byte(2)?, byte(4)?)),
            8 => Ok(Self::rgba(byte(0)?, byte(2)?, byte(4)?, byte(6)?)),
            _ => Err(bad()),
        }
    }
}

impl TryFrom<String> for Color {
    type Error = BildwerkError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Color> for String {
    fn from(color: Color) -> Self {
        color.to_string()
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}{:02x}", self.r, self.g, self.b, self.a)
    }
}

/// A crop box in `(left, upper, right, lower)` form. Right and lower are exclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rect {
    pub left: u32,
    pub upper: u32,
    pub right: u32,
    pub lower: u32,
}

impl Rect {
    pub fn new(left: u32, upper: u32, right: u32, lower: u32) -> Self {
        Self {
            left,
            upper,
            right,
            lower,
        }
    }

    pub fn width(&self) -> u32 {
        self.right.saturating_sub(self.left)
    }

    pub fn height(&self) -> u32 {
        self.lower.saturating_sub(self.upper)
    }

    /// Reject empty and inverted boxes.
    pub fn validate(&self) -> Result<(), BildwerkError> {
        if self.width() == 0 || self.height() == 0 {
            return Err(BildwerkError::invalid(
                "rectangle",
                format!(
                    "({}, {}, {}, {}) is empty",
                    self.left, self.upper, self.right, self.lower
                ),
            ));
        }
        Ok(())
    }

    /// Intersection with a `width` x `height` image, or `None` if they do not overlap.
    pub fn clip_to(&self, width: u32, height: u32) -> Option<Rect> {
        let clipped = Rect::new(
            self.left.min(width),
            self.upper.min(height),
            self.right.min(width),
            self.lower.min(height),
        );
        (clipped.width() > 0 && clipped.height() > 0).then_some(clipped)
    }
}

impl From<(u32, u32, u32, u32)> for Rect {
    fn from((left, upper, right, lower): (u32, u32, u32, u32)) -> Self {
        Self::new(left, upper, right, lower)
    }
}

/// Mirror direction for flips.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FlipDirection {
    /// Left to right.
    Horizontal,
    /// Top to bottom.
    Vertical,
    Both,
}

impl FromStr for FlipDirection {
    type Err = BildwerkError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "horizontal" | "h" => Ok(Self::Horizontal),
            "vertical" | "v" => Ok(Self::Vertical),
            "both" => Ok(Self::Both),
            other => Err(BildwerkError::invalid("flip direction", other.to_owned())),
        }
    }
}

/// Layout of a merged image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MergeDirection {
    /// Side by side, left to right.
    Horizontal,
    /// Stacked, top to bottom.
    Vertical,
}

impl MergeDirection {
    /// Stem of the merged output file.
    pub fn file_stem(&self) -> &'static str {
        match self {
            Self::Horizontal => "merged_images_horizontally",
            Self::Vertical => "merged_images_vertically",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BlurKind {
    Box,
    Gaussian,
}

impl FromStr for BlurKind {
    type Err = BildwerkError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "box" => Ok(Self::Box),
            "gaussian" => Ok(Self::Gaussian),
            other => Err(BildwerkError::invalid("blur kind", other.to_owned())),
        }
    }
}

/// Resampling filter used by resize and merge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ResampleFilter {
    Nearest,
    Triangle,
    CatmullRom,
    Gaussian,
    #[default]
    Lanczos3,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum TextAlign {
    #[default]
    Left,
    Center,
    Right,
}

impl FromStr for TextAlign {
    type Err = BildwerkError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "left" => Ok(Self::Left),
            "center" | "centre" => Ok(Self::Center),
            "right" => Ok(Self::Right),
            other => Err(BildwerkError::invalid("text alignment", other.to_owned())),
        }
    }
}

/// Rendering options for text overlays.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TextOptions {
    /// Path to a TrueType or OpenType font file.
    pub font_path: PathBuf,
    /// Glyph height in pixels.
    pub font_size: f32,
    pub color: Color,
    /// Fill of the box drawn behind the text, if any.
    pub bg_color: Option<Color>,
    /// Colour of a drop shadow, if any.
    pub shadow_color: Option<Color>,
    /// Line advance as a multiple of `font_size`.
    pub line_height: f32,
    /// Fake bold by drawing each line twice, one pixel apart.
    pub bold: bool,
    /// Box size. Measured from the text when `None`.
    pub box_width: Option<u32>,
    pub box_height: Option<u32>,
    pub align: TextAlign,
    /// Corner radius of the background box.
    pub radius: u32,
    /// Space between the box edge and the text.
    pub padding: u32,
}

impl TextOptions {
    pub fn new(font_path: impl Into<PathBuf>, font_size: f32) -> Self {
        Self {
            font_path: font_path.into(),
            font_size,
            color: Color::BLACK,
            bg_color: None,
            shadow_color: None,
            line_height: 1.2,
            bold: false,
            box_width: None,
            box_height: None,
            align: TextAlign::Left,
            radius: 0,
            padding: 0,
        }
    }
}

/// Summary of an image file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageInfo {
    pub path: PathBuf,
    pub width: u32,
    pub height: u32,
    pub format: Option<ImageKind>,
    /// Decoded colour type, e.g. `Rgb8`.
    pub color_type: String,
    pub has_alpha: bool,
    pub file_size: u64,
}

/// One colour of a palette and its share of the image's pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PaletteEntry {
    pub color: Color,
    /// Percentage of all pixels, rounded to two decimals.
    pub percentage: f64,
}
