//! Turns a skeleton plus a descriptor list into a server project on disk.
//!
//! The run is sequential: everything that can fail without touching the disk
//! (skeleton lookup, code generation, JSON rendering) happens first, then the
//! skeleton is copied to `<servers_root>/<service>` and every copied file is
//! specialized in place.

use std::collections::HashSet;
use std::io;
use std::path::{Path, PathBuf};

use tokio::fs;
use tracing::{debug, info};

use crate::core::error::{Error, Result};
use crate::core::templates::dir::Skeleton;
use crate::core::templates::embedded::embedded_files;
use crate::core::templates::kind::{FileKind, Substitutions};
use crate::core::{Endpoint, ServiceName};
use crate::generation::sanitizers::quote;
use crate::generation::{GeneratorOptions, setup_server};

/// Outcome of one generation run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationReport {
    /// `<servers_root>/<service>`
    pub output_dir: PathBuf,
    /// Files of the generated project, relative to `output_dir`, sorted
    pub files: Vec<PathBuf>,
    /// Number of tools registered in `setupServer`
    pub tools: usize,
}

/// Instantiates the server skeleton for one service
#[derive(Debug, Clone)]
pub struct TemplateInstantiator {
    service: ServiceName,
    servers_root: PathBuf,
    options: GeneratorOptions,
}

impl TemplateInstantiator {
    pub fn new(service: ServiceName, servers_root: impl Into<PathBuf>) -> Self {
        Self {
            service,
            servers_root: servers_root.into(),
            options: GeneratorOptions::default(),
        }
    }

    pub fn with_options(mut self, options: GeneratorOptions) -> Self {
        self.options = options;
        self
    }

    pub fn target_dir(&self) -> PathBuf {
        self.servers_root.join(self.service.as_str())
    }

    /// Expansions for `{{NAME}}` and `{{TOOLS}}`
    pub fn substitutions(&self, endpoints: &[Endpoint]) -> Result<Substitutions> {
        Ok(Substitutions {
            name: self.service.as_str().to_string(),
            quoted_name: quote(self.service.as_str()),
            tools_source: setup_server(endpoints, &self.service, self.options)?,
            tools_json: serde_json::to_string_pretty(endpoints)?,
        })
    }

    /// Generate the project, replacing any previous output for this service
    pub async fn instantiate(
        &self,
        skeleton: &Skeleton,
        endpoints: &[Endpoint],
    ) -> Result<GenerationReport> {
        if let Skeleton::Directory(path) = skeleton {
            let is_dir = fs::metadata(path)
                .await
                .map(|meta| meta.is_dir())
                .unwrap_or(false);
            if !is_dir {
                return Err(Error::TemplateMissing { path: path.clone() });
            }
        }

        let substitutions = self.substitutions(endpoints)?;
        let target = self.target_dir();
        if let Skeleton::Directory(source) = skeleton {
            self.ensure_outside_target(source, &target).await?;
        }

        info!(
            service = %self.service,
            skeleton = %skeleton.describe(),
            output_dir = %target.display(),
            tools = endpoints.len(),
            "Generating MCP server"
        );

        self.prepare_target(&target).await?;
        match skeleton {
            Skeleton::Directory(source) => self.copy_directory(source, &target).await?,
            Skeleton::Embedded => self.write_embedded(&target).await?,
        }

        let files = self.collect_files(&target).await?;
        for relative in &files {
            self.specialize(&target.join(relative), &substitutions)
                .await?;
        }

        info!(
            service = %self.service,
            file_count = files.len(),
            "MCP server generated"
        );

        Ok(GenerationReport {
            output_dir: target,
            files,
            tools: endpoints.len(),
        })
    }

    fn write_error<'a>(&'a self, path: &'a Path) -> impl FnOnce(io::Error) -> Error + 'a {
        move |source| Error::partial_write(self.service.as_str(), path, source)
    }

    /// Clearing the target must never delete the skeleton being copied
    async fn ensure_outside_target(&self, source: &Path, target: &Path) -> Result<()> {
        if !fs::try_exists(target)
            .await
            .map_err(self.write_error(target))?
        {
            return Ok(());
        }
        let source_real = fs::canonicalize(source)
            .await
            .map_err(self.write_error(source))?;
        let target_real = fs::canonicalize(target)
            .await
            .map_err(self.write_error(target))?;
        if source_real.starts_with(&target_real) {
            return Err(Error::config(format!(
                "Template directory {} lies inside the output directory {}; it would be \
                 deleted before being copied",
                source.display(),
                target.display()
            )));
        }
        Ok(())
    }

    async fn prepare_target(&self, target: &Path) -> Result<()> {
        fs::create_dir_all(&self.servers_root)
            .await
            .map_err(self.write_error(&self.servers_root))?;
        if fs::try_exists(target)
            .await
            .map_err(self.write_error(target))?
        {
            debug!(output_dir = %target.display(), "Removing previous output");
            fs::remove_dir_all(target)
                .await
                .map_err(self.write_error(target))?;
        }
        fs::create_dir_all(target)
            .await
            .map_err(self.write_error(target))
    }

    async fn copy_directory(&self, source: &Path, target: &Path) -> Result<()> {
        for relative in self.collect_files(source).await? {
            let from = source.join(&relative);
            let to = target.join(&relative);
            if let Some(parent) = to.parent() {
                fs::create_dir_all(parent)
                    .await
                    .map_err(self.write_error(parent))?;
            }
            fs::copy(&from, &to).await.map_err(self.write_error(&to))?;
        }
        Ok(())
    }

    async fn write_embedded(&self, target: &Path) -> Result<()> {
        for file in embedded_files() {
            let to = target.join(&file.relative_path);
            if let Some(parent) = to.parent() {
                fs::create_dir_all(parent)
                    .await
                    .map_err(self.write_error(parent))?;
            }
            fs::write(&to, &file.contents)
                .await
                .map_err(self.write_error(&to))?;
        }
        Ok(())
    }

    /// Every file under `root`, relative to it, sorted
    ///
    /// Symlinked directories are followed once each; dangling links are
    /// reported as files so the copy step fails on them.
    async fn collect_files(&self, root: &Path) -> Result<Vec<PathBuf>> {
        let mut files = Vec::new();
        let mut pending = vec![PathBuf::new()];
        let mut visited = HashSet::new();
        visited.insert(fs::canonicalize(root).await.map_err(self.write_error(root))?);

        while let Some(relative) = pending.pop() {
            let dir = root.join(&relative);
            let mut entries = fs::read_dir(&dir).await.map_err(self.write_error(&dir))?;
            while let Some(entry) = entries.next_entry().await.map_err(self.write_error(&dir))? {
                let path = relative.join(entry.file_name());
                let file_type = entry
                    .file_type()
                    .await
                    .map_err(self.write_error(&dir))?;
                let is_dir = if file_type.is_symlink() {
                    fs::metadata(entry.path())
                        .await
                        .map(|meta| meta.is_dir())
                        .unwrap_or(false)
                } else {
                    file_type.is_dir()
                };
                if !is_dir {
                    files.push(path);
                    continue;
                }
                let entry_path = entry.path();
                let real = fs::canonicalize(&entry_path)
                    .await
                    .map_err(self.write_error(&entry_path))?;
                if visited.insert(real) {
                    pending.push(path);
                } else {
                    debug!(dir = %entry_path.display(), "Skipping directory already visited");
                }
            }
        }

        files.sort();
        Ok(files)
    }

    async fn specialize(&self, path: &Path, substitutions: &Substitutions) -> Result<()> {
        let bytes = fs::read(path).await.map_err(self.write_error(path))?;
        let Ok(content) = String::from_utf8(bytes) else {
            debug!(file = %path.display(), "Skipping non-UTF-8 file");
            return Ok(());
        };

        let kind = FileKind::classify(path);
        let rendered = substitutions.apply(kind, &content);
        debug!(file = %path.display(), kind = %kind, "Writing specialized file");
        fs::write(path, rendered)
            .await
            .map_err(self.write_error(path))
    }
}
