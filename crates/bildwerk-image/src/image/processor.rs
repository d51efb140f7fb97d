// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Image processor — the pixel operations behind every Bildwerk file operation.
// Operates on in-memory images using the `image` and `imageproc` crates.

use bildwerk_core::error::{BildwerkError, Result};
use bildwerk_core::types::{BlurKind, Color, FlipDirection, ImageKind, Rect, ResampleFilter};
use image::imageops::{self, FilterType};
use image::{DynamicImage, GrayImage, Luma, Rgba, RgbaImage};
use imageproc::filter::{box_filter, gaussian_blur_f32};
use imageproc::geometric_transformations::{self, Interpolation};
use tracing::{debug, info, instrument};

use crate::codec::{self, EncodeOptions};

/// Image processing pipeline operating on a single in-memory image.
///
/// All operations are non-destructive: each method consumes `self` and returns a
/// new `ImageProcessor` wrapping the transformed image, enabling method chaining.
/// Operations that can reject their parameters return `Result<Self>`.
///
/// ```ignore
/// let png = ImageProcessor::open("photo.jpg")?
///     .resize_exact(800, 600, ResampleFilter::Lanczos3)?
///     .rotate(90.0, true, Color::TRANSPARENT)
///     .grayscale()
///     .to_bytes(ImageKind::Png, EncodeOptions::default())?;
/// ```
#[derive(Debug, Clone)]
pub struct ImageProcessor {
    /// The current working image.
    pub(crate) image: DynamicImage,
}

impl ImageProcessor {
    // -- Construction ---------------------------------------------------------

    /// Load an image from a file path.
    #[instrument(skip_all, fields(path = %path.as_ref().display()))]
    pub fn open(path: impl AsRef<std::path::Path>) -> Result<Self> {
        let img = codec::decode_file(path.as_ref())?;
        info!(width = img.width(), height = img.height(), "Image loaded");
        Ok(Self { image: img })
    }

    /// Create a processor from raw encoded bytes (JPEG, PNG, etc.).
    #[instrument(skip(data), fields(data_len = data.len()))]
    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        let img = codec::decode_bytes(data)?;
        debug!(width = img.width(), height = img.height(), "Image decoded from bytes");
        Ok(Self { image: img })
    }

    /// Wrap an already-decoded `DynamicImage`.
    pub fn from_dynamic(image: DynamicImage) -> Self {
        Self { image }
    }

    // -- Accessors ------------------------------------------------------------

    /// Current image width in pixels.
    pub fn width(&self) -> u32 {
        self.image.width()
    }

    /// Current image height in pixels.
    pub fn height(&self) -> u32 {
        self.image.height()
    }

    /// Borrow the underlying `DynamicImage`.
    pub fn as_dynamic(&self) -> &DynamicImage {
        &self.image
    }

    /// Consume the processor and return the underlying `DynamicImage`.
    pub fn into_dynamic(self) -> DynamicImage {
        self.image
    }

    // -- Geometry -------------------------------------------------------------

    /// Resize the image to fit within `max_width` x `max_height`, preserving
    /// aspect ratio.
    #[instrument(skip(self))]
    pub fn resize(self, max_width: u32, max_height: u32, filter: ResampleFilter) -> Result<Self> {
        require_size(max_width, max_height)?;
        info!(
            from_w = self.image.width(),
            from_h = self.image.height(),
            max_width,
            max_height,
            "Resizing image"
        );
        let resized = self.image.resize(max_width, max_height, filter_type(filter));
        debug!(new_w = resized.width(), new_h = resized.height(), "Resize complete");
        Ok(Self { image: resized })
    }

    /// Resize the image to exactly `width` x `height`, ignoring aspect ratio.
    #[instrument(skip(self))]
    pub fn resize_exact(self, width: u32, height: u32, filter: ResampleFilter) -> Result<Self> {
        require_size(width, height)?;
        canvas_size(u64::from(width), u64::from(height))?;
        let resized = self.image.resize_exact(width, height, filter_type(filter));
        Ok(Self { image: resized })
    }

    /// Cut out `rect`. The result is always exactly `rect` sized; any part of
    /// the box outside the source is left zero-filled.
    #[instrument(skip(self))]
    pub fn crop(self, rect: Rect) -> Result<Self> {
        rect.validate()?;
        canvas_size(u64::from(rect.width()), u64::from(rect.height()))?;
        let (img_w, img_h) = (self.image.width(), self.image.height());
        info!(?rect, img_w, img_h, "Cropping image");

        let cropped = if rect.right <= img_w && rect.lower <= img_h {
            self.image
                .crop_imm(rect.left, rect.upper, rect.width(), rect.height())
        } else {
            let mut canvas = DynamicImage::new(rect.width(), rect.height(), self.image.color());
            imageops::replace(
                &mut canvas,
                &self.image,
                -i64::from(rect.left),
                -i64::from(rect.upper),
            );
            canvas
        };
        Ok(Self { image: cropped })
    }

    /// Mirror the image.
    #[instrument(skip(self))]
    pub fn flip(self, direction: FlipDirection) -> Self {
        let image = match direction {
            FlipDirection::Horizontal => self.image.fliph(),
            FlipDirection::Vertical => self.image.flipv(),
            FlipDirection::Both => self.image.fliph().flipv(),
        };
        Self { image }
    }

    /// Rotate the image counter-clockwise by `degrees`.
    ///
    /// Right-angle rotations are lossless. Other angles use bilinear
    /// interpolation and paint uncovered corners with `fill`. With `expand`,
    /// the canvas grows to hold the whole rotated image; without it the
    /// original dimensions are kept and the corners are clipped.
    #[instrument(skip(self), fields(degrees, expand))]
    pub fn rotate(self, degrees: f32, expand: bool, fill: Color) -> Self {
        info!(degrees, expand, "Rotating image");

        let normalised = degrees.rem_euclid(360.0);
        let near = |target: f32| (normalised - target).abs() < 0.01;
        if near(0.0) || near(360.0) {
            return self;
        }
        if near(180.0) {
            return Self {
                image: self.image.rotate180(),
            };
        }
        let square = self.image.width() == self.image.height();
        if expand || square {
            if near(90.0) {
                return Self {
                    image: self.image.rotate270(),
                };
            }
            if near(270.0) {
                return Self {
                    image: self.image.rotate90(),
                };
            }
        }

        let fill = Rgba(fill.to_rgba_array());
        let radians = normalised.to_radians();
        let source = self.image.to_rgba8();
        if !expand {
            let rotated = geometric_transformations::rotate_about_center(
                &source,
                -radians,
                Interpolation::Bilinear,
                fill,
            );
            return Self {
                image: DynamicImage::ImageRgba8(rotated),
            };
        }

        // Pad to hold the rotated image, rotate, then cut out its bounding box.
        let (src_w, src_h) = source.dimensions();
        let (bound_w, bound_h) = rotated_bounds(src_w, src_h, radians);
        let (pad_w, pad_h) = (src_w.max(bound_w), src_h.max(bound_h));
        let mut canvas = RgbaImage::from_pixel(pad_w, pad_h, fill);
        imageops::replace(
            &mut canvas,
            &source,
            i64::from((pad_w - src_w) / 2),
            i64::from((pad_h - src_h) / 2),
        );
        let rotated = geometric_transformations::rotate_about_center(
            &canvas,
            -radians,
            Interpolation::Bilinear,
            fill,
        );
        let fitted = imageops::crop_imm(
            &rotated,
            (pad_w - bound_w) / 2,
            (pad_h - bound_h) / 2,
            bound_w,
            bound_h,
        )
        .to_image();
        debug!(width = bound_w, height = bound_h, "General rotation applied");
        Self {
            image: DynamicImage::ImageRgba8(fitted),
        }
    }

    /// Surround the image with a `size`-pixel frame of `color`.
    #[instrument(skip(self))]
    pub fn add_border(self, size: u32, color: Color) -> Result<Self> {
        let grow = 2 * u64::from(size);
        let (width, height) = canvas_size(
            u64::from(self.image.width()) + grow,
            u64::from(self.image.height()) + grow,
        )?;
        let source = self.image.to_rgba8();
        let mut canvas = RgbaImage::from_pixel(width, height, Rgba(color.to_rgba_array()));
        imageops::replace(&mut canvas, &source, i64::from(size), i64::from(size));
        let keep_alpha = self.image.color().has_alpha() || color.a != 255;
        Ok(Self {
            image: restore_mode(canvas, keep_alpha, !self.image.color().has_color()),
        })
    }

    // -- Filters --------------------------------------------------------------

    /// Blur the whole image. A radius of zero leaves it untouched.
    #[instrument(skip(self))]
    pub fn blur(self, kind: BlurKind, radius: u32) -> Self {
        if radius == 0 {
            return self;
        }
        let color = self.image.color();
        let blurred = blur_rgba(&self.image.to_rgba8(), kind, radius);
        Self {
            image: restore_mode(blurred, color.has_alpha(), !color.has_color()),
        }
    }

    /// Gaussian-blur only the part of the image inside `rect`.
    #[instrument(skip(self))]
    pub fn blur_area(self, rect: Rect, radius: u32) -> Result<Self> {
        let area = self.clip(rect)?;
        if radius == 0 {
            return Ok(self);
        }
        self.map_region(area, |region| blur_rgba(&region, BlurKind::Gaussian, radius))
    }

    /// Pixelate the part of the image inside `rect` into `block`-sized squares.
    #[instrument(skip(self))]
    pub fn pixelate_area(self, rect: Rect, block: u32) -> Result<Self> {
        if block == 0 {
            return Err(BildwerkError::invalid("block size", "must be at least 1"));
        }
        let area = self.clip(rect)?;
        self.map_region(area, |region| {
            let (w, h) = region.dimensions();
            let small = imageops::resize(
                &region,
                (w / block).max(1),
                (h / block).max(1),
                FilterType::Nearest,
            );
            imageops::resize(&small, w, h, FilterType::Nearest)
        })
    }

    /// Add Gaussian noise to the colour channels. Alpha is preserved.
    #[instrument(skip(self))]
    pub fn gaussian_noise(self, mean: f64, stddev: f64, seed: u64) -> Result<Self> {
        if !mean.is_finite() || !stddev.is_finite() || stddev < 0.0 {
            return Err(BildwerkError::invalid(
                "noise parameters",
                format!("mean {mean}, standard deviation {stddev}"),
            ));
        }
        let noisy = imageproc::noise::gaussian_noise(&self.image.to_rgb8(), mean, stddev, seed);
        if !self.image.color().has_alpha() {
            return Ok(Self {
                image: DynamicImage::ImageRgb8(noisy),
            });
        }
        let alpha = self.image.to_rgba8();
        let merged = RgbaImage::from_fn(noisy.width(), noisy.height(), |x, y| {
            let [r, g, b] = noisy.get_pixel(x, y).0;
            Rgba([r, g, b, alpha.get_pixel(x, y).0[3]])
        });
        Ok(Self {
            image: DynamicImage::ImageRgba8(merged),
        })
    }

    // -- Colour ---------------------------------------------------------------

    /// Convert the image to 8-bit grayscale (luma). Alpha is dropped.
    #[instrument(skip(self))]
    pub fn grayscale(self) -> Self {
        info!("Converting to grayscale");
        Self {
            image: DynamicImage::ImageLuma8(self.image.to_luma8()),
        }
    }

    /// Adjust contrast by a factor. Values > 1.0 increase contrast; values
    /// < 1.0 decrease it; 0.0 gives a flat grey at the mean luma. A value of
    /// 1.0 is a no-op.
    #[instrument(skip(self), fields(factor))]
    pub fn adjust_contrast(self, factor: f32) -> Self {
        info!(factor, "Adjusting contrast");

        let luma = self.image.to_luma8();
        let total: u64 = luma.pixels().map(|p| u64::from(p.0[0])).sum();
        let count = (u64::from(luma.width()) * u64::from(luma.height())).max(1);
        let mean = (total as f32 / count as f32 + 0.5).floor();

        let adjust = move |channel: u8| -> u8 {
            let val = mean + factor * (f32::from(channel) - mean);
            val.round().clamp(0.0, 255.0) as u8
        };
        self.map_pixels(|Rgba([r, g, b, a])| Rgba([adjust(r), adjust(g), adjust(b), a]))
    }

    /// Scale brightness by a factor. 0.0 is black, 1.0 is a no-op.
    #[instrument(skip(self), fields(factor))]
    pub fn adjust_brightness(self, factor: f32) -> Self {
        info!(factor, "Adjusting brightness");
        let adjust = move |channel: u8| -> u8 {
            (f32::from(channel) * factor).round().clamp(0.0, 255.0) as u8
        };
        self.map_pixels(|Rgba([r, g, b, a])| Rgba([adjust(r), adjust(g), adjust(b), a]))
    }

    /// Replace every pixel whose RGB exactly matches `from` with `to`,
    /// keeping the pixel's alpha.
    #[instrument(skip(self))]
    pub fn replace_color(self, from: Color, to: Color) -> Self {
        let target = from.to_rgb_array();
        self.map_pixels(|Rgba([r, g, b, a])| {
            if [r, g, b] == target {
                Rgba([to.r, to.g, to.b, a])
            } else {
                Rgba([r, g, b, a])
            }
        })
    }

    /// Make every pixel whose RGB exactly matches `target` fully transparent
    /// white. The result always carries an alpha channel.
    #[instrument(skip(self))]
    pub fn make_color_transparent(self, target: Color) -> Self {
        let target = target.to_rgb_array();
        let mut rgba = self.image.into_rgba8();
        let mut cleared = 0usize;
        for pixel in rgba.pixels_mut() {
            if pixel.0[..3] == target {
                *pixel = Rgba(Color::TRANSPARENT.to_rgba_array());
                cleared += 1;
            }
        }
        debug!(cleared, "Pixels made transparent");
        Self {
            image: DynamicImage::ImageRgba8(rgba),
        }
    }

    // -- Output ---------------------------------------------------------------

    /// Encode the current image as `kind`.
    pub fn to_bytes(&self, kind: ImageKind, options: EncodeOptions) -> Result<Vec<u8>> {
        codec::encode(&self.image, kind, options)
    }

    /// Write the image to a file as `kind`.
    pub fn save(
        &self,
        path: impl AsRef<std::path::Path>,
        kind: ImageKind,
        options: EncodeOptions,
    ) -> Result<()> {
        codec::write_file(&self.image, path.as_ref(), kind, options)
    }

    // -- Helpers --------------------------------------------------------------

    fn map_pixels(self, f: impl Fn(Rgba<u8>) -> Rgba<u8>) -> Self {
        let color = self.image.color();
        let mut rgba = self.image.into_rgba8();
        for pixel in rgba.pixels_mut() {
            *pixel = f(*pixel);
        }
        Self {
            image: restore_mode(rgba, color.has_alpha(), !color.has_color()),
        }
    }

    /// Validate `rect` and clip it to the image.
    fn clip(&self, rect: Rect) -> Result<Rect> {
        rect.validate()?;
        rect.clip_to(self.image.width(), self.image.height())
            .ok_or_else(|| BildwerkError::invalid("rectangle", format!("{rect:?} lies outside the image")))
    }

    fn map_region(self, area: Rect, f: impl FnOnce(RgbaImage) -> RgbaImage) -> Result<Self> {
        let color = self.image.color();
        let mut rgba = self.image.into_rgba8();
        let region =
            imageops::crop_imm(&rgba, area.left, area.upper, area.width(), area.height()).to_image();
        let processed = f(region);
        imageops::replace(
            &mut rgba,
            &processed,
            i64::from(area.left),
            i64::from(area.upper),
        );
        Ok(Self {
            image: restore_mode(rgba, color.has_alpha(), !color.has_color()),
        })
    }
}

pub(crate) fn filter_type(filter: ResampleFilter) -> FilterType {
    match filter {
        ResampleFilter::Nearest => FilterType::Nearest,
        ResampleFilter::Triangle => FilterType::Triangle,
        ResampleFilter::CatmullRom => FilterType::CatmullRom,
        ResampleFilter::Gaussian => FilterType::Gaussian,
        ResampleFilter::Lanczos3 => FilterType::Lanczos3,
    }
}

fn require_size(width: u32, height: u32) -> Result<()> {
    if width == 0 || height == 0 {
        return Err(BildwerkError::invalid(
            "size",
            format!("{width}x{height} has a zero dimension"),
        ));
    }
    Ok(())
}

/// Largest canvas an operation will allocate, in pixels.
pub(crate) const MAX_CANVAS_PIXELS: u64 = 1 << 28;

/// Check a requested canvas size. Sizes are computed in `u64` so that
/// callers can add and multiply without wrapping.
pub(crate) fn canvas_size(width: u64, height: u64) -> Result<(u32, u32)> {
    let too_big = || {
        BildwerkError::invalid(
            "size",
            format!("{width}x{height} exceeds the {MAX_CANVAS_PIXELS} pixel limit"),
        )
    };
    let w = u32::try_from(width).map_err(|_| too_big())?;
    let h = u32::try_from(height).map_err(|_| too_big())?;
    if width.saturating_mul(height) > MAX_CANVAS_PIXELS {
        return Err(too_big());
    }
    Ok((w, h))
}

/// Size of the box that holds a `width` x `height` image rotated by `radians`.
fn rotated_bounds(width: u32, height: u32, radians: f32) -> (u32, u32) {
    let (sin, cos) = f64::from(radians).sin_cos();
    let (w, h) = (f64::from(width), f64::from(height));
    // 1e-6 keeps exact fits from rounding up a pixel.
    let side = |extent: f64| (extent - 1e-6).ceil().max(1.0) as u32;
    (
        side(w * cos.abs() + h * sin.abs()),
        side(w * sin.abs() + h * cos.abs()),
    )
}

/// Repack an RGBA working buffer into the source's layout: alpha only if
/// the source had it, and luma if the source was gray and still is.
pub(crate) fn restore_mode(rgba: RgbaImage, keep_alpha: bool, gray_source: bool) -> DynamicImage {
    let still_gray = gray_source && rgba.pixels().all(|Rgba([r, g, b, _])| r == g && g == b);
    let image = DynamicImage::ImageRgba8(rgba);
    match (still_gray, keep_alpha) {
        (true, true) => DynamicImage::ImageLumaA8(image.to_luma_alpha8()),
        (true, false) => DynamicImage::ImageLuma8(image.to_luma8()),
        (false, true) => image,
        (false, false) => DynamicImage::ImageRgb8(image.to_rgb8()),
    }
}

fn blur_rgba(rgba: &RgbaImage, kind: BlurKind, radius: u32) -> RgbaImage {
    match kind {
        BlurKind::Gaussian => gaussian_blur_f32(rgba, radius as f32),
        BlurKind::Box => {
            let (width, height) = rgba.dimensions();
            let planes: Vec<GrayImage> = (0..4)
                .map(|channel| {
                    let plane =
                        GrayImage::from_fn(width, height, |x, y| Luma([rgba.get_pixel(x, y).0[channel]]));
                    box_filter(&plane, radius, radius)
                })
                .collect();
            RgbaImage::from_fn(width, height, |x, y| {
                Rgba([0, 1, 2, 3].map(|c| planes[c].get_pixel(x, y).0[0]))
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{GenericImageView, RgbImage};

    fn gradient(width: u32, height: u32) -> ImageProcessor {
        ImageProcessor::from_dynamic(DynamicImage::ImageRgb8(RgbImage::from_fn(width, height, |x, y| {
            image::Rgb([(x * 255 / width.max(1)) as u8, (y * 255 / height.max(1)) as u8, 100])
        })))
    }

    #[test]
    fn resize_exact_hits_requested_size() {
        let out = gradient(40, 30).resize_exact(17, 9, ResampleFilter::Lanczos3).unwrap();
        assert_eq!((out.width(), out.height()), (17, 9));
    }

    #[test]
    fn resize_keeps_aspect_ratio() {
        let out = gradient(400, 200).resize(100, 100, ResampleFilter::Triangle).unwrap();
        assert_eq!((out.width(), out.height()), (100, 50));
    }

    #[test]
    fn resize_rejects_zero_dimension() {
        assert!(gradient(10, 10).resize_exact(0, 5, ResampleFilter::Nearest).is_err());
    }

    #[test]
    fn crop_inside_bounds() {
        let out = gradient(50, 40).crop(Rect::new(10, 5, 30, 25)).unwrap();
        assert_eq!(out.as_dynamic().dimensions(), (20, 20));
        assert_eq!(
            out.as_dynamic().get_pixel(0, 0),
            gradient(50, 40).as_dynamic().get_pixel(10, 5)
        );
    }

    #[test]
    fn crop_past_edge_is_zero_filled_to_exact_size() {
        let out = gradient(20, 20).crop(Rect::new(10, 10, 40, 30)).unwrap();
        assert_eq!(out.as_dynamic().dimensions(), (30, 20));
        assert_eq!(out.as_dynamic().get_pixel(25, 15).0, [0, 0, 0, 255]);
    }

    #[test]
    fn crop_rejects_empty_box() {
        assert!(gradient(20, 20).crop(Rect::new(5, 5, 5, 9)).is_err());
    }

    #[test]
    fn flip_both_moves_corner_to_corner() {
        let original = gradient(8, 6);
        let corner = original.as_dynamic().get_pixel(0, 0);
        let flipped = original.flip(FlipDirection::Both);
        assert_eq!(flipped.as_dynamic().get_pixel(7, 5), corner);
    }

    #[test]
    fn rotate_right_angle_with_expand_swaps_dimensions() {
        let out = gradient(30, 10).rotate(90.0, true, Color::TRANSPARENT);
        assert_eq!((out.width(), out.height()), (10, 30));
    }

    #[test]
    fn rotate_ninety_is_counter_clockwise() {
        let source = gradient(30, 10);
        let top_right = source.as_dynamic().get_pixel(29, 0);
        let out = source.rotate(90.0, true, Color::TRANSPARENT);
        assert_eq!(out.as_dynamic().get_pixel(0, 0), top_right);
    }

    #[test]
    fn rotate_arbitrary_angle_expands_canvas() {
        let out = gradient(40, 20).rotate(45.0, true, Color::WHITE);
        assert!(out.width() > 40 && out.height() > 20);
        let kept = gradient(40, 20).rotate(45.0, false, Color::WHITE);
        assert_eq!((kept.width(), kept.height()), (40, 20));
    }

    #[test]
    fn rotate_full_turn_is_identity() {
        let out = gradient(12, 7).rotate(360.0, true, Color::TRANSPARENT);
        assert_eq!(out.as_dynamic(), gradient(12, 7).as_dynamic());
    }

    #[test]
    fn border_grows_each_axis() {
        let out = gradient(20, 10).add_border(5, Color::rgb(255, 0, 0)).unwrap();
        assert_eq!((out.width(), out.height()), (30, 20));
        assert_eq!(out.as_dynamic().get_pixel(0, 0).0, [255, 0, 0, 255]);
        assert!(!out.as_dynamic().color().has_alpha());
    }

    #[test]
    fn rotate_expand_fits_the_rotated_bounding_box() {
        let out = gradient(100, 10).rotate(80.0, true, Color::WHITE);
        assert_eq!((out.width(), out.height()), (28, 101));

        let out = gradient(40, 20).rotate(45.0, true, Color::WHITE);
        assert_eq!((out.width(), out.height()), (43, 43));
        assert_ne!(out.as_dynamic().get_pixel(21, 21).0, [255, 255, 255, 255]);
        assert_eq!(out.as_dynamic().get_pixel(0, 0).0, [255, 255, 255, 255]);
    }

    #[test]
    fn oversized_border_is_rejected() {
        let err = gradient(2, 2).add_border(3_000_000_000, Color::BLACK).unwrap_err();
        assert!(matches!(err, BildwerkError::InvalidParameter { name: "size", .. }));
        assert!(gradient(2, 2).add_border(20_000, Color::BLACK).is_err());
    }

    #[test]
    fn canvas_size_bounds() {
        assert_eq!(canvas_size(640, 480).unwrap(), (640, 480));
        assert!(canvas_size(u64::from(u32::MAX) + 1, 1).is_err());
        assert!(canvas_size(1 << 15, 1 << 14).is_err());
        assert!(gradient(4, 4).resize_exact(100_000, 100_000, ResampleFilter::Nearest).is_err());
    }

    #[test]
    fn grayscale_is_luma8_without_alpha() {
        let img = RgbaImage::from_pixel(3, 3, Rgba([200, 10, 10, 40]));
        let out = ImageProcessor::from_dynamic(DynamicImage::ImageRgba8(img)).grayscale();
        assert_eq!(out.as_dynamic().color(), image::ColorType::L8);
    }

    #[test]
    fn gray_source_stays_gray_unless_colour_is_added() {
        let gray = || {
            ImageProcessor::from_dynamic(DynamicImage::ImageLuma8(GrayImage::from_fn(6, 6, |x, _| {
                Luma([(x * 40) as u8])
            })))
        };
        assert_eq!(gray().adjust_contrast(1.5).as_dynamic().color(), image::ColorType::L8);
        assert_eq!(gray().adjust_brightness(0.5).as_dynamic().color(), image::ColorType::L8);
        assert_eq!(gray().blur(BlurKind::Box, 1).as_dynamic().color(), image::ColorType::L8);
        assert_eq!(
            gray().add_border(2, Color::WHITE).unwrap().as_dynamic().color(),
            image::ColorType::L8
        );

        let recoloured = gray().replace_color(Color::BLACK, Color::rgb(255, 0, 0));
        assert_eq!(recoloured.as_dynamic().color(), image::ColorType::Rgb8);
        assert_eq!(recoloured.as_dynamic().get_pixel(0, 0).0, [255, 0, 0, 255]);
    }

    #[test]
    fn blur_zero_radius_is_noop() {
        let out = gradient(10, 10).blur(BlurKind::Box, 0);
        assert_eq!(out.as_dynamic(), gradient(10, 10).as_dynamic());
    }

    #[test]
    fn box_blur_smooths_a_hard_edge() {
        let img = RgbImage::from_fn(20, 1, |x, _| if x < 10 { image::Rgb([0, 0, 0]) } else { image::Rgb([255, 255, 255]) });
        let out = ImageProcessor::from_dynamic(DynamicImage::ImageRgb8(img)).blur(BlurKind::Box, 2);
        let edge = out.as_dynamic().get_pixel(10, 0).0[0];
        assert!(edge > 0 && edge < 255, "edge value {edge}");
    }

    #[test]
    fn gaussian_blur_keeps_dimensions() {
        let out = gradient(25, 15).blur(BlurKind::Gaussian, 3);
        assert_eq!((out.width(), out.height()), (25, 15));
    }

    #[test]
    fn contrast_and_brightness_identity_at_one() {
        let original = gradient(16, 16);
        let expected = original.as_dynamic().clone();
        let out = original.adjust_contrast(1.0).adjust_brightness(1.0);
        assert_eq!(out.as_dynamic(), &expected);
    }

    #[test]
    fn zero_contrast_flattens_to_mean() {
        let img = RgbImage::from_fn(2, 1, |x, _| if x == 0 { image::Rgb([0, 0, 0]) } else { image::Rgb([200, 200, 200]) });
        let out = ImageProcessor::from_dynamic(DynamicImage::ImageRgb8(img)).adjust_contrast(0.0);
        assert_eq!(out.as_dynamic().get_pixel(0, 0), out.as_dynamic().get_pixel(1, 0));
        assert_eq!(out.as_dynamic().get_pixel(0, 0).0[0], 100);
    }

    #[test]
    fn brightness_doubles_and_saturates() {
        let img = RgbImage::from_pixel(1, 1, image::Rgb([50, 100, 200]));
        let out = ImageProcessor::from_dynamic(DynamicImage::ImageRgb8(img)).adjust_brightness(2.0);
        assert_eq!(out.as_dynamic().get_pixel(0, 0).0, [100, 200, 255, 255]);
    }

    #[test]
    fn transparent_color_clears_exact_matches_only() {
        let img = RgbImage::from_fn(2, 1, |x, _| if x == 0 { image::Rgb([0, 0, 0]) } else { image::Rgb([0, 0, 1]) });
        let out = ImageProcessor::from_dynamic(DynamicImage::ImageRgb8(img)).make_color_transparent(Color::BLACK);
        assert_eq!(out.as_dynamic().get_pixel(0, 0).0, [255, 255, 255, 0]);
        assert_eq!(out.as_dynamic().get_pixel(1, 0).0, [0, 0, 1, 255]);
    }

    #[test]
    fn replace_color_keeps_alpha() {
        let img = RgbaImage::from_pixel(1, 1, Rgba([255, 255, 255, 90]));
        let out = ImageProcessor::from_dynamic(DynamicImage::ImageRgba8(img))
            .replace_color(Color::WHITE, Color::rgb(255, 0, 0));
        assert_eq!(out.as_dynamic().get_pixel(0, 0).0, [255, 0, 0, 90]);
    }

    #[test]
    fn pixelate_area_only_touches_the_box() {
        let original = gradient(40, 40);
        let outside = original.as_dynamic().get_pixel(35, 35);
        let out = original.pixelate_area(Rect::new(0, 0, 20, 20), 10).unwrap();
        assert_eq!(out.as_dynamic().get_pixel(35, 35), outside);
        assert_eq!(out.as_dynamic().get_pixel(0, 0), out.as_dynamic().get_pixel(9, 9));
    }

    #[test]
    fn area_outside_image_is_rejected() {
        assert!(gradient(10, 10).blur_area(Rect::new(20, 20, 30, 30), 2).is_err());
        assert!(gradient(10, 10).pixelate_area(Rect::new(0, 0, 5, 5), 0).is_err());
    }

    #[test]
    fn blur_area_clips_oversized_box() {
        let out = gradient(30, 30).blur_area(Rect::new(10, 10, 300, 300), 2).unwrap();
        assert_eq!((out.width(), out.height()), (30, 30));
    }

    #[test]
    fn noise_is_seeded_and_keeps_alpha() {
        let img = RgbaImage::from_pixel(8, 8, Rgba([128, 128, 128, 77]));
        let a = ImageProcessor::from_dynamic(DynamicImage::ImageRgba8(img.clone()))
            .gaussian_noise(0.0, 20.0, 7)
            .unwrap();
        let b = ImageProcessor::from_dynamic(DynamicImage::ImageRgba8(img))
            .gaussian_noise(0.0, 20.0, 7)
            .unwrap();
        assert_eq!(a.as_dynamic(), b.as_dynamic());
        assert!(a.as_dynamic().to_rgba8().pixels().all(|p| p.0[3] == 77));
        assert!(gradient(4, 4).gaussian_noise(0.0, -1.0, 1).is_err());
    }

    #[test]
    fn bytes_round_trip_preserves_dimensions() {
        let png = gradient(33, 21).to_bytes(ImageKind::Png, EncodeOptions::default()).unwrap();
        let back = ImageProcessor::from_bytes(&png).unwrap();
        assert_eq!((back.width(), back.height()), (33, 21));
    }
}
