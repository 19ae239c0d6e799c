//! Core types shared by every stage of generation: the descriptor model,
//! validated service names, configuration and errors.

pub mod config;
pub mod descriptor;
pub mod error;
pub mod service;
pub mod templates;

pub use config::Config;
pub use descriptor::{BaseType, Endpoint, Header, HttpMethod, ParamType, Parameter};
pub use error::{Error, Result};
pub use service::ServiceName;
pub use templates::{GenerationReport, Skeleton, TemplateInstantiator};
