//! Built-in server skeleton for binary distribution.
//!
//! The skeleton under `templates/mcp/server/typescript/` is included at compile
//! time with `rust-embed`, so `automcp generate` works right after
//! `cargo install` without a separate template checkout. `automcp template
//! export` writes it back to disk for customization.
//!
//! # Usage
//!
//! ```no_run
//! use automcp::core::templates::export_skeleton;
//! use std::path::Path;
//!
//! # async fn run() -> automcp::Result<()> {
//! let count = export_skeleton(Path::new("/tmp/skeleton")).await?;
//! println!("Exported {count} files");
//! # Ok(())
//! # }
//! ```

use std::path::{Path, PathBuf};

use rust_embed::RustEmbed;
use tokio::fs;
use tracing::{debug, info};

use crate::core::error::{Error, Result};

/// Container for the skeleton embedded at compile time.
///
/// Paths are relative to the skeleton root (`package.json`, `src/index.ts`, ...).
#[derive(RustEmbed)]
#[folder = "templates/mcp/server/typescript/"]
pub struct EmbeddedSkeleton;

/// A skeleton file held in memory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkeletonFile {
    pub relative_path: PathBuf,
    pub contents: Vec<u8>,
}

/// All embedded skeleton files, sorted by path
pub fn embedded_files() -> Vec<SkeletonFile> {
    let mut files: Vec<SkeletonFile> = EmbeddedSkeleton::iter()
        .filter_map(|path| {
            EmbeddedSkeleton::get(path.as_ref()).map(|file| SkeletonFile {
                relative_path: PathBuf::from(path.as_ref()),
                contents: file.data.to_vec(),
            })
        })
        .collect();
    files.sort_by(|a, b| a.relative_path.cmp(&b.relative_path));
    files
}

/// Write the embedded skeleton under `dest`, returning the number of files written
pub async fn export_skeleton(dest: &Path) -> Result<usize> {
    info!(output_dir = %dest.display(), "Exporting embedded skeleton");

    fs::create_dir_all(dest).await.map_err(|e| {
        Error::config(format!(
            "Failed to create directory {}: {e}",
            dest.display()
        ))
    })?;

    let files = embedded_files();
    for file in &files {
        let target = dest.join(&file.relative_path);
        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent).await?;
        }
        fs::write(&target, &file.contents).await?;
        debug!(file = %target.display(), "Exported skeleton file");
    }

    info!(file_count = files.len(), "Skeleton export completed");
    Ok(files.len())
}
