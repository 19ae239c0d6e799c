//! Code generation: descriptors in, TypeScript out.
//!
//! - [`sanitizers`]: identifier and literal escaping
//! - [`typescript`]: IR and the printer
//! - [`schema`]: zod shapes per parameter list
//! - [`request`]: fetch-based handlers per endpoint
//! - [`registry`]: `server.tool(...)` registrations and `setupServer`

pub mod registry;
pub mod request;
pub mod sanitizers;
pub mod schema;
pub mod typescript;

pub use registry::{GeneratorOptions, setup_server};
