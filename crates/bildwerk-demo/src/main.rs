// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Bildwerk demo.
//
// Entry point. Initialises logging, loads `bildwerk.json` from the assets
// folder (first argument, default `assets`) and runs every operation on
// `original.jpg`, then merges `cat1.jpg`..`cat4.jpg`.

use std::path::{Path, PathBuf};

use bildwerk_core::ToolConfig;
use bildwerk_core::types::{BlurKind, Color, FlipDirection, TextAlign, TextOptions};
use bildwerk_image::{ImageTool, MergeImages, ops};

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let assets = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("assets"));
    tracing::info!(assets = %assets.display(), "Bildwerk demo starting");

    let config = ToolConfig::load_or_default(assets.join("bildwerk.json"));
    let original = assets.join("original.jpg");
    if !original.is_file() {
        tracing::warn!(path = %original.display(), "No sample photo, using a solid placeholder");
        ops::create_solid_color_image(&original, (1280, 720), Color::rgb(70, 130, 180));
    }

    let tool = ImageTool::new(&original, &assets)
        .with_config(config.clone())
        .on_success(|msg| println!("{msg}"))
        .on_failure(|msg| eprintln!("{msg}"));
    edit_walkthrough(&tool, &assets);

    let cats: Vec<PathBuf> = (1..=4).map(|i| assets.join(format!("cat{i}.jpg"))).collect();
    let merge = MergeImages::new(&cats, &assets, (400, 400))
        .with_config(config)
        .on_success(|msg| println!("{msg}"))
        .on_failure(|msg| eprintln!("{msg}"));
    merge.merge_horizontally();
    merge.merge_vertically();

    ops::create_solid_color_image(assets.join("output.jpg"), (400, 200), (255, 0, 0));
    tracing::info!("Bildwerk demo finished");
}

fn edit_walkthrough(tool: &ImageTool, assets: &Path) {
    tool.convert_image("png", Some("default"));
    tool.compress_image(70, true);
    tool.resize_image(1920, 1080, true);
    tool.crop_image((0, 0, 3840, 2160));
    tool.flip_image(FlipDirection::Both);
    tool.rotate_image(180.0, true);
    tool.add_border_image(50, (255, 0, 0));
    tool.blur_image(BlurKind::Gaussian, 5);
    tool.make_color_transparent(Color::BLACK);
    tool.add_contrast_image(2.0);
    tool.adjust_brightness(2.0);
    tool.grayscale_image();

    let options = TextOptions {
        color: Color::BLACK,
        bg_color: Some(Color::rgb(255, 165, 0)),
        box_width: Some(1200),
        box_height: Some(300),
        align: TextAlign::Center,
        radius: 50,
        ..TextOptions::new(assets.join("Poppins-Regular.ttf"), 96.0)
    };
    tool.add_text_to_image("Dodge Challenger\nSRT Demon 170", (50, 50), &options);
    tool.blur_area((0, 0, 600, 600), 50);
    tool.pixelate_area((0, 0, 600, 600), 50);
    tool.add_gaussian_noise(0.0, 50.0, 0);
    tool.replace_color((255, 255, 255), (255, 0, 0));

    if let Some(palette) = tool.get_color_palette(15) {
        for entry in palette {
            println!("{}, {}%", entry.color, entry.percentage);
        }
    }
    if let Some(info) = tool.get_image_info() {
        println!("{info:?}");
    }
    if let Some(exif) = tool.get_exif_data() {
        for (tag, value) in exif {
            println!("{tag}: {value}");
        }
    }
}
