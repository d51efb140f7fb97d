// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// In-memory pixel operations, text overlays and inspection.

pub mod inspect;
pub mod processor;
pub mod text;

pub use processor::ImageProcessor;
