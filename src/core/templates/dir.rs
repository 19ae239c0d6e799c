//! Resolution of the skeleton a run is generated from

use std::path::{Path, PathBuf};
use tracing::debug;

/// Environment variable naming a skeleton directory
pub const TEMPLATE_DIR_ENV: &str = "AUTOMCP_TEMPLATE_DIR";

/// Trait for reading template configuration, allowing dependency injection for testing
pub trait TemplateConfigReader {
    fn get_template_dir(&self) -> Option<String>;
}

/// Production implementation that reads from environment variables
pub struct EnvTemplateConfigReader;

impl TemplateConfigReader for EnvTemplateConfigReader {
    fn get_template_dir(&self) -> Option<String> {
        std::env::var(TEMPLATE_DIR_ENV)
            .ok()
            .filter(|dir| !dir.trim().is_empty())
    }
}

/// Mock implementation for testing with controlled values
#[cfg(test)]
pub struct MockTemplateConfigReader(Option<String>);

#[cfg(test)]
impl MockTemplateConfigReader {
    pub fn new(template_dir: Option<String>) -> Self {
        Self(template_dir)
    }
}

#[cfg(test)]
impl TemplateConfigReader for MockTemplateConfigReader {
    fn get_template_dir(&self) -> Option<String> {
        self.0.clone()
    }
}

/// Where the project skeleton comes from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Skeleton {
    /// A skeleton directory on disk
    ///
    /// Symlinked directories inside it are followed (each real directory once)
    /// and a dangling symlink fails the copy. The directory must not lie inside
    /// the output directory it is generated into.
    Directory(PathBuf),
    /// The skeleton compiled into the binary
    Embedded,
}

impl Skeleton {
    /// Pick the skeleton: explicit directory (CLI flag or config file), then the
    /// environment, then the embedded one
    pub fn resolve(explicit: Option<&Path>, reader: &dyn TemplateConfigReader) -> Self {
        if let Some(dir) = explicit {
            debug!("Using template directory directly: {}", dir.display());
            return Skeleton::Directory(dir.to_path_buf());
        }
        if let Some(dir) = reader.get_template_dir() {
            debug!("Using template directory from {}: {}", TEMPLATE_DIR_ENV, dir);
            return Skeleton::Directory(PathBuf::from(dir));
        }
        debug!("Using embedded template");
        Skeleton::Embedded
    }

    /// Human-readable origin, for logs
    pub fn describe(&self) -> String {
        match self {
            Skeleton::Directory(path) => path.display().to_string(),
            Skeleton::Embedded => "embedded".to_string(),
        }
    }
}
