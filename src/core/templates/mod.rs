//! Server skeleton handling.
//!
//! - [`dir`]: where the skeleton comes from (flag, config, env, embedded)
//! - [`embedded`]: the skeleton compiled into the binary
//! - [`kind`]: per-file placeholder substitution
//! - [`instantiator`]: copying and specializing the skeleton for one service

pub mod dir;
pub mod embedded;
pub mod instantiator;
pub mod kind;

pub use dir::{EnvTemplateConfigReader, Skeleton, TEMPLATE_DIR_ENV, TemplateConfigReader};
pub use embedded::{EmbeddedSkeleton, SkeletonFile, embedded_files, export_skeleton};
pub use instantiator::{GenerationReport, TemplateInstantiator};
pub use kind::{FileKind, NAME_TOKEN, Substitutions, TOOLS_TOKEN};
