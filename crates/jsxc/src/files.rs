//! Input discovery and output naming.

use std::path::{Path, PathBuf};

use anyhow::Result;
use walkdir::WalkDir;

/// An input file and its path relative to the argument it was found under.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceFile {
    pub path: PathBuf,
    /// Used to mirror the input layout under an output directory
    pub relative: PathBuf,
}

/// Expand the command line paths into source files.
///
/// Files are taken as given. Directories are walked for `.jsx` files, in
/// sorted order.
pub fn collect(paths: &[PathBuf]) -> Result<Vec<SourceFile>> {
    let mut sources = Vec::new();

    for path in paths {
        if path.is_file() {
            let relative = path
                .file_name()
                .map(PathBuf::from)
                .unwrap_or_else(|| path.clone());
            sources.push(SourceFile {
                path: path.clone(),
                relative,
            });
        } else if path.is_dir() {
            let mut found: Vec<SourceFile> = WalkDir::new(path)
                .follow_links(true)
                .into_iter()
                .filter_map(|e| e.ok())
                .filter(|e| e.file_type().is_file() && has_jsx_extension(e.path()))
                .map(|e| SourceFile {
                    relative: e
                        .path()
                        .strip_prefix(path)
                        .map(Path::to_path_buf)
                        .unwrap_or_else(|_| e.path().to_path_buf()),
                    path: e.into_path(),
                })
                .collect();
            found.sort_by(|a, b| a.path.cmp(&b.path));
            sources.extend(found);
        } else {
            anyhow::bail!("Path not found: {}", path.display());
        }
    }

    Ok(sources)
}

/// Where the compiled form of `source` is written: next to the input, or
/// at the same relative location under `out_dir`.
pub fn output_path(source: &SourceFile, out_dir: Option<&Path>, extension: &str) -> PathBuf {
    let base = match out_dir {
        Some(dir) => dir.join(&source.relative),
        None => source.path.clone(),
    };
    base.with_extension(extension)
}

fn has_jsx_extension(path: &Path) -> bool {
    path.extension().and_then(|e| e.to_str()) == Some("jsx")
}
