//! Tool registration emitter.
//!
//! Produces one `server.tool(name, description, shape, handler)` call per
//! endpoint and wraps them, in descriptor order, in the `setupServer` routine
//! that the skeleton's bootstrap calls for both transports.

use std::collections::HashSet;

use tracing::{debug, warn};

use crate::core::{Endpoint, Error, Result, ServiceName};
use crate::generation::request::handler;
use crate::generation::sanitizers::Binding;
use crate::generation::schema::schema_object;
use crate::generation::typescript::{Expr, FnParam, Printer, Stmt};

/// Name of the generated setup routine
pub const SETUP_FUNCTION: &str = "setupServer";

/// Options controlling registry emission
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GeneratorOptions {
    /// Fail on duplicate endpoint names instead of passing them through
    pub reject_duplicate_names: bool,
}

/// Registration statement for one endpoint
pub fn registration(endpoint: &Endpoint, service: &ServiceName) -> Result<Stmt> {
    check_bindings(endpoint)?;
    debug!(
        endpoint = %endpoint.name,
        method = %endpoint.method,
        params = endpoint.params.len(),
        "Emitting tool registration"
    );
    Ok(Stmt::Expr(Expr::ident("server").method(
        "tool",
        vec![
            Expr::str(&endpoint.name),
            Expr::str(&endpoint.description),
            schema_object(&endpoint.params),
            handler(endpoint, service),
        ],
    )))
}

/// Two parameters must not collapse onto the same code identifier
fn check_bindings(endpoint: &Endpoint) -> Result<()> {
    let mut seen = HashSet::new();
    for param in &endpoint.params {
        let binding = Binding::for_param(param);
        if !seen.insert(binding.safe.clone()) {
            return Err(Error::descriptor(format!(
                "endpoint '{}': parameter '{}' collides with another parameter as '{}'",
                endpoint.name, binding.original, binding.safe
            )));
        }
    }
    Ok(())
}

fn check_duplicates(endpoints: &[Endpoint], options: GeneratorOptions) -> Result<()> {
    let mut seen = HashSet::new();
    for endpoint in endpoints {
        if seen.insert(endpoint.name.as_str()) {
            continue;
        }
        if options.reject_duplicate_names {
            return Err(Error::DuplicateEndpoint(endpoint.name.clone()));
        }
        warn!(
            endpoint = %endpoint.name,
            "Duplicate endpoint name; registering it again as-is"
        );
    }
    Ok(())
}

/// The `setupServer` function declaration
pub fn setup_server_stmt(
    endpoints: &[Endpoint],
    service: &ServiceName,
    options: GeneratorOptions,
) -> Result<Stmt> {
    check_duplicates(endpoints, options)?;
    let body = endpoints
        .iter()
        .map(|endpoint| registration(endpoint, service))
        .collect::<Result<Vec<_>>>()?;
    Ok(Stmt::Function {
        name: SETUP_FUNCTION.to_string(),
        params: vec![FnParam {
            name: "server".to_string(),
            ty: Some("McpServer".to_string()),
        }],
        body,
    })
}

/// Rendered `setupServer` source, spliced into the bootstrap at `{{TOOLS}}`
pub fn setup_server(
    endpoints: &[Endpoint],
    service: &ServiceName,
    options: GeneratorOptions,
) -> Result<String> {
    let stmt = setup_server_stmt(endpoints, service, options)?;
    let mut printer = Printer::new();
    printer.print_stmts(&[stmt]);
    let mut source = printer.finish();
    // The placeholder line already ends with a newline
    if source.ends_with('\n') {
        source.pop();
    }
    Ok(source)
}
