// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Text overlays: multi-line text with an optional rounded background box and
// drop shadow, rasterised by `imageproc` from an `ab_glyph` font.

use ab_glyph::{FontVec, PxScale};
use bildwerk_core::error::{BildwerkError, Result};
use bildwerk_core::types::{Color, TextAlign, TextOptions};
use image::{Rgba, RgbaImage};
use imageproc::drawing::{draw_filled_circle_mut, draw_filled_rect_mut, draw_text_mut, text_size};
use imageproc::rect::Rect as PixelRect;
use tracing::{debug, instrument};

use super::processor::{ImageProcessor, restore_mode};

/// Load a TrueType/OpenType font from disk.
pub fn load_font(path: &std::path::Path) -> Result<FontVec> {
    let data = std::fs::read(path)
        .map_err(|err| BildwerkError::Font(format!("{}: {err}", path.display())))?;
    FontVec::try_from_vec(data).map_err(|err| BildwerkError::Font(format!("{}: {err}", path.display())))
}

/// Largest font size accepted, in pixels.
pub const MAX_FONT_SIZE: f32 = 10_000.0;
/// Largest line-height multiplier accepted.
pub const MAX_LINE_HEIGHT: f32 = 10.0;
/// Bound on box sizes, padding, radius and each position coordinate.
pub const MAX_EXTENT: u32 = 1 << 20;

impl ImageProcessor {
    /// Draw `text` with its box's top-left corner at `position`.
    ///
    /// Lines are split on `\n` and advance by `font_size * line_height`. The
    /// box is sized from the text plus padding unless `box_width` /
    /// `box_height` are given; alignment is relative to the box.
    #[instrument(skip(self, text, options), fields(lines = text.lines().count()))]
    pub fn draw_text(
        self,
        text: &str,
        position: (i32, i32),
        options: &TextOptions,
        shadow_offset: u32,
    ) -> Result<Self> {
        validate_geometry(position, options, shadow_offset)?;
        let font = load_font(&options.font_path)?;
        Ok(self.draw_text_with_font(text, position, options, shadow_offset, &font))
    }

    fn draw_text_with_font(
        self,
        text: &str,
        (x, y): (i32, i32),
        options: &TextOptions,
        shadow_offset: u32,
        font: &FontVec,
    ) -> Self {
        let scale = PxScale::from(options.font_size);
        let lines: Vec<&str> = text.split('\n').collect();
        let widths: Vec<u32> = lines.iter().map(|line| text_size(scale, font, line).0).collect();
        let advance = i64::from((options.font_size * options.line_height).round() as i32);
        let pad = i64::from(options.padding);
        let (x, y) = (i64::from(x), i64::from(y));

        // Keeps box corners inside i32 for the drawing calls.
        let limit = 2 * i64::from(MAX_EXTENT);
        let text_w = i64::from(widths.iter().copied().max().unwrap_or(0));
        let text_h = advance * (lines.len() as i64 - 1) + options.font_size.ceil() as i64;
        let box_w = options.box_width.map_or(text_w + 2 * pad, i64::from).min(limit);
        let box_h = options.box_height.map_or(text_h + 2 * pad, i64::from).min(limit);
        debug!(box_w, box_h, text_w, text_h, "Text box measured");

        let color = self.image.color();
        let (keep_alpha, gray_source) = (color.has_alpha(), !color.has_color());
        let mut canvas = self.image.into_rgba8();
        let bottom = i64::from(canvas.height());

        if let Some(bg) = options.bg_color {
            draw_rounded_rect(&mut canvas, x as i32, y as i32, box_w as u32, box_h as u32, options.radius, bg);
        }

        for (i, (line, width)) in lines.iter().zip(&widths).enumerate() {
            let line_y = y + pad + i as i64 * advance;
            if line_y >= bottom {
                break;
            }
            let slack = box_w - 2 * pad - i64::from(*width);
            let line_x = match options.align {
                TextAlign::Left => x + pad,
                TextAlign::Center => x + pad + slack / 2,
                TextAlign::Right => x + pad + slack,
            };
            let (Ok(line_x), Ok(line_y)) = (i32::try_from(line_x), i32::try_from(line_y)) else {
                continue;
            };

            if let Some(shadow) = options.shadow_color {
                let off = shadow_offset as i32;
                draw_line(&mut canvas, shadow, line_x + off, line_y + off, scale, font, line, options.bold);
            }
            draw_line(&mut canvas, options.color, line_x, line_y, scale, font, line, options.bold);
        }

        Self {
            image: restore_mode(canvas, keep_alpha, gray_source),
        }
    }
}

fn validate_geometry((x, y): (i32, i32), options: &TextOptions, shadow_offset: u32) -> Result<()> {
    let size = options.font_size;
    if !(size.is_finite() && size > 0.0 && size <= MAX_FONT_SIZE) {
        return Err(BildwerkError::invalid("font size", size.to_string()));
    }
    let line_height = options.line_height;
    if !(line_height.is_finite() && line_height > 0.0 && line_height <= MAX_LINE_HEIGHT) {
        return Err(BildwerkError::invalid("line height", line_height.to_string()));
    }
    let extents = [
        ("box width", options.box_width.unwrap_or(0)),
        ("box height", options.box_height.unwrap_or(0)),
        ("padding", options.padding),
        ("radius", options.radius),
        ("shadow offset", shadow_offset),
        ("position", x.unsigned_abs().max(y.unsigned_abs())),
    ];
    for (name, value) in extents {
        if value > MAX_EXTENT {
            return Err(BildwerkError::invalid(name, format!("{value} exceeds {MAX_EXTENT}")));
        }
    }
    Ok(())
}

#[allow(clippy::too_many_arguments)]
fn draw_line(
    canvas: &mut RgbaImage,
    color: Color,
    x: i32,
    y: i32,
    scale: PxScale,
    font: &FontVec,
    line: &str,
    bold: bool,
) {
    let pixel = Rgba(color.to_rgba_array());
    draw_text_mut(canvas, pixel, x, y, scale, font, line);
    if bold {
        draw_text_mut(canvas, pixel, x + 1, y, scale, font, line);
    }
}

/// Filled rectangle whose corners are rounded to `radius`.
fn draw_rounded_rect(canvas: &mut RgbaImage, x: i32, y: i32, w: u32, h: u32, radius: u32, color: Color) {
    if w == 0 || h == 0 {
        return;
    }
    let pixel = Rgba(color.to_rgba_array());
    let r = radius.min(w / 2).min(h / 2);
    if r == 0 {
        draw_filled_rect_mut(canvas, PixelRect::at(x, y).of_size(w, h), pixel);
        return;
    }

    let ri = r as i32;
    if w > 2 * r {
        draw_filled_rect_mut(canvas, PixelRect::at(x + ri, y).of_size(w - 2 * r, h), pixel);
    }
    if h > 2 * r {
        draw_filled_rect_mut(canvas, PixelRect::at(x, y + ri).of_size(w, h - 2 * r), pixel);
    }
    let (right, bottom) = (x + w as i32 - 1 - ri, y + h as i32 - 1 - ri);
    for center in [(x + ri, y + ri), (right, y + ri), (x + ri, bottom), (right, bottom)] {
        draw_filled_circle_mut(canvas, center, ri, pixel);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{DynamicImage, GenericImageView, GrayImage, Luma, Rgb, RgbImage};

    const FONT: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/tests/fixtures/DejaVuSansMono.ttf");

    fn white(width: u32, height: u32) -> ImageProcessor {
        ImageProcessor::from_dynamic(DynamicImage::ImageRgb8(RgbImage::from_pixel(
            width,
            height,
            Rgb([255, 255, 255]),
        )))
    }

    /// Leftmost column holding a dark pixel.
    fn first_inked_column(image: &DynamicImage) -> Option<u32> {
        let rgb = image.to_rgb8();
        (0..rgb.width()).find(|&x| (0..rgb.height()).any(|y| rgb.get_pixel(x, y).0[0] < 128))
    }

    #[test]
    fn rounded_rect_leaves_corners_and_fills_center() {
        let mut canvas = RgbaImage::from_pixel(40, 40, Rgba([0, 0, 0, 255]));
        draw_rounded_rect(&mut canvas, 0, 0, 40, 40, 10, Color::WHITE);
        assert_eq!(canvas.get_pixel(20, 20).0, [255, 255, 255, 255]);
        assert_eq!(canvas.get_pixel(0, 0).0, [0, 0, 0, 255]);
        assert_eq!(canvas.get_pixel(20, 0).0, [255, 255, 255, 255]);
    }

    #[test]
    fn square_rect_when_radius_zero() {
        let mut canvas = RgbaImage::from_pixel(10, 10, Rgba([0, 0, 0, 255]));
        draw_rounded_rect(&mut canvas, 2, 2, 4, 4, 0, Color::rgb(9, 9, 9));
        assert_eq!(canvas.get_pixel(2, 2).0, [9, 9, 9, 255]);
        assert_eq!(canvas.get_pixel(6, 6).0, [0, 0, 0, 255]);
    }

    #[test]
    fn missing_font_is_font_error() {
        let processor = ImageProcessor::from_dynamic(DynamicImage::ImageRgb8(RgbImage::new(10, 10)));
        let options = TextOptions::new("/nonexistent/font.ttf", 12.0);
        let err = processor.draw_text("hi", (0, 0), &options, 2).unwrap_err();
        assert!(matches!(err, BildwerkError::Font(_)));
    }

    #[test]
    fn non_font_file_is_font_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("fake.ttf");
        std::fs::write(&path, b"not a font").unwrap();
        assert!(matches!(load_font(&path), Err(BildwerkError::Font(_))));
    }

    #[test]
    fn bad_font_size_is_rejected_before_loading() {
        let processor = ImageProcessor::from_dynamic(DynamicImage::ImageRgb8(RgbImage::new(4, 4)));
        let options = TextOptions::new("/nonexistent/font.ttf", 0.0);
        let err = processor.draw_text("x", (0, 0), &options, 0).unwrap_err();
        assert!(matches!(err, BildwerkError::InvalidParameter { name: "font size", .. }));
    }

    #[test]
    fn text_is_inked_inside_its_box_only() {
        let options = TextOptions::new(FONT, 20.0);
        let image = white(120, 40)
            .draw_text("Hi", (10, 5), &options, 0)
            .unwrap()
            .into_dynamic();
        assert_eq!(image.color(), image::ColorType::Rgb8);
        assert_eq!(image.dimensions(), (120, 40));
        let inked = first_inked_column(&image).unwrap();
        assert!((10..40).contains(&inked), "first ink at {inked}");
        let rgb = image.to_rgb8();
        assert!((70..120).all(|x| (0..40).all(|y| rgb.get_pixel(x, y).0 == [255, 255, 255])));
    }

    #[test]
    fn alignment_moves_text_across_the_box() {
        let column = |align| {
            let options = TextOptions {
                box_width: Some(200),
                align,
                ..TextOptions::new(FONT, 16.0)
            };
            let image = white(220, 30).draw_text("ab", (0, 0), &options, 0).unwrap();
            first_inked_column(&image.into_dynamic()).unwrap()
        };
        let (left, center, right) = (column(TextAlign::Left), column(TextAlign::Center), column(TextAlign::Right));
        assert!(left < 10, "left at {left}");
        assert!(left < center && center < right, "{left} {center} {right}");
        assert!((80..110).contains(&center), "center at {center}");
        assert!(right > 170, "right at {right}");
    }

    #[test]
    fn background_box_and_shadow_are_drawn() {
        let options = TextOptions {
            bg_color: Some(Color::rgb(200, 0, 0)),
            shadow_color: Some(Color::rgb(0, 0, 255)),
            box_width: Some(60),
            box_height: Some(30),
            radius: 6,
            ..TextOptions::new(FONT, 18.0)
        };
        let image = white(100, 50).draw_text("W", (5, 5), &options, 3).unwrap().into_dynamic();
        let rgb = image.to_rgb8();
        assert_eq!(rgb.get_pixel(60, 30).0, [200, 0, 0]);
        assert_eq!(rgb.get_pixel(5, 5).0, [255, 255, 255]);
        assert_eq!(rgb.get_pixel(90, 45).0, [255, 255, 255]);
        assert!(rgb.pixels().any(|p| p.0[2] > 128 && p.0[0] < 128));
    }

    #[test]
    fn gray_input_keeps_luma_for_black_text() {
        let processor =
            ImageProcessor::from_dynamic(DynamicImage::ImageLuma8(GrayImage::from_pixel(60, 30, Luma([255]))));
        let image = processor
            .draw_text("ok", (2, 2), &TextOptions::new(FONT, 16.0), 0)
            .unwrap()
            .into_dynamic();
        assert_eq!(image.color(), image::ColorType::L8);
        assert!(first_inked_column(&image).is_some());
    }

    #[test]
    fn lines_below_the_canvas_are_skipped() {
        let text = "x\n".repeat(10_000);
        let image = white(30, 30).draw_text(&text, (0, 0), &TextOptions::new(FONT, 12.0), 0).unwrap();
        assert_eq!(image.into_dynamic().dimensions(), (30, 30));
    }

    #[test]
    fn oversized_geometry_is_rejected() {
        let huge_padding = TextOptions {
            padding: u32::MAX,
            ..TextOptions::new(FONT, 12.0)
        };
        let err = white(4, 4).draw_text("x", (0, 0), &huge_padding, 0).unwrap_err();
        assert!(matches!(err, BildwerkError::InvalidParameter { name: "padding", .. }));

        let tall_lines = TextOptions {
            line_height: 1e9,
            ..TextOptions::new(FONT, 12.0)
        };
        let err = white(4, 4).draw_text("x", (0, 0), &tall_lines, 0).unwrap_err();
        assert!(matches!(err, BildwerkError::InvalidParameter { name: "line height", .. }));

        let far = white(4, 4).draw_text("x", (i32::MIN, 0), &TextOptions::new(FONT, 12.0), 0);
        assert!(matches!(far, Err(BildwerkError::InvalidParameter { name: "position", .. })));

        let huge_font = white(4, 4).draw_text("x", (0, 0), &TextOptions::new(FONT, 1e7), 0);
        assert!(matches!(huge_font, Err(BildwerkError::InvalidParameter { name: "font size", .. })));
    }
}
