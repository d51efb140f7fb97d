// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Input checks and output file naming.

use std::path::{Path, PathBuf};

use bildwerk_core::error::{BildwerkError, Result};
use bildwerk_core::types::ImageKind;

/// Fail with `InputNotFound` unless `path` is an existing regular file.
pub fn require_file(path: &Path) -> Result<()> {
    if path.is_file() {
        Ok(())
    } else {
        Err(BildwerkError::InputNotFound(path.to_path_buf()))
    }
}

/// Fail with `OutputDirNotFound` unless `dir` is an existing directory.
pub fn require_dir(dir: &Path) -> Result<()> {
    if dir.is_dir() {
        Ok(())
    } else {
        Err(BildwerkError::OutputDirNotFound(dir.to_path_buf()))
    }
}

/// Format of `path`, judged by its extension.
pub fn kind_of(path: &Path) -> Result<ImageKind> {
    ImageKind::from_path(path).ok_or_else(|| {
        let ext = path
            .extension()
            .map(|ext| ext.to_string_lossy().into_owned())
            .unwrap_or_else(|| "(no extension)".into());
        BildwerkError::UnsupportedFormat(ext)
    })
}

/// `<output_dir>/<prefix>_<input stem>.<ext>`, keeping the input's format.
pub fn prefixed_output(input: &Path, output_dir: &Path, prefix: &str) -> Result<(PathBuf, ImageKind)> {
    let kind = kind_of(input)?;
    let stem = input
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_else(|| "image".into());
    Ok((named_output(output_dir, &format!("{prefix}_{stem}"), kind), kind))
}

/// `<output_dir>/<stem>.<ext>`.
pub fn named_output(output_dir: &Path, stem: &str, kind: ImageKind) -> PathBuf {
    output_dir.join(format!("{stem}.{}", kind.extension()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prefixed_output_canonicalises_jpg() {
        let (path, kind) =
            prefixed_output(Path::new("assets/cat.jpg"), Path::new("out"), "resized").unwrap();
        assert_eq!(path, Path::new("out").join("resized_cat.jpeg"));
        assert_eq!(kind, ImageKind::Jpeg);
    }

    #[test]
    fn unknown_extension_is_unsupported() {
        let err = kind_of(Path::new("notes.txt")).unwrap_err();
        assert!(matches!(err, BildwerkError::UnsupportedFormat(ext) if ext == "txt"));
        assert!(kind_of(Path::new("Makefile")).is_err());
    }

    #[test]
    fn require_checks_kind_of_entry() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("a.png");
        std::fs::write(&file, b"x").unwrap();

        assert!(require_file(&file).is_ok());
        assert!(matches!(require_file(dir.path()), Err(BildwerkError::InputNotFound(_))));
        assert!(require_dir(dir.path()).is_ok());
        assert!(matches!(require_dir(&file), Err(BildwerkError::OutputDirNotFound(_))));
    }
}
