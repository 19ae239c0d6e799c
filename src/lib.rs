//! automcp: generates TypeScript MCP servers from HTTP endpoint descriptors.
//!
//! Descriptors are loaded and validated by [`core::descriptor`], turned into
//! tool registrations by [`generation`], and spliced into a server skeleton
//! by [`core::templates`].
#![deny(unsafe_code)]

pub mod core;
pub mod generation;

pub use crate::core::error::{Error, Result};
pub use crate::core::{
    Config, Endpoint, GenerationReport, ServiceName, Skeleton, TemplateInstantiator,
};
pub use crate::generation::GeneratorOptions;
