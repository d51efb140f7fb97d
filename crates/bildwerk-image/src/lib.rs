// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// bildwerk-image — One-call image file operations.
//
// Provides format conversion, compression, geometry (resize, crop, flip,
// rotate, border), filters, colour adjustments, text overlays, merging and
// inspection. `Editor` returns typed results; `ops`, `ImageTool` and
// `MergeImages` turn every outcome into a success flag.

pub mod codec;
pub mod editor;
pub mod image;
pub mod ops;
pub mod paths;
pub mod tool;

// Re-export the primary structs so callers can use `bildwerk_image::Editor` etc.
pub use crate::codec::EncodeOptions;
pub use crate::editor::Editor;
pub use crate::image::ImageProcessor;
pub use crate::image::text::load_font;
pub use crate::tool::{ImageTool, MergeImages};
