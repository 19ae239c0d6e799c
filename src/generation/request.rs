//! Request handler synthesis.
//!
//! Turns one [`Endpoint`] into the async tool handler registered with the MCP
//! server. The handler destructures its validated arguments, builds the URL
//! (path interpolation plus a query string for GET), assembles headers, sends
//! the request with `fetch` and normalizes the JSON response.
//!
//! Path parameters are interpolated into the URL template. The remaining
//! parameters go into the query string for GET and into a JSON body for every
//! other method. Wire-facing keys always use the original parameter name.

use tracing::debug;

use crate::core::descriptor::{UrlSegment, split_url_template};
use crate::core::{Endpoint, Header, HttpMethod, ServiceName};
use crate::generation::sanitizers::{Binding, env_var_for_header, fresh_local};
use crate::generation::typescript::{
    Arrow, BinOp, Expr, Pattern, Prop, PropKey, Stmt, TemplatePart,
};

/// Name of the error class the skeleton defines for failed API calls
pub const ENDPOINT_ERROR_CLASS: &str = "EndpointError";

/// Local variable names used inside one handler
#[derive(Debug, Clone)]
struct Locals {
    args: String,
    extra: String,
    params: String,
    url: String,
    response: String,
    data: String,
}

impl Locals {
    fn for_bindings(bindings: &[Binding]) -> Self {
        Self {
            args: fresh_local("args", bindings),
            extra: fresh_local("extra", bindings),
            params: fresh_local("params", bindings),
            url: fresh_local("url", bindings),
            response: fresh_local("response", bindings),
            data: fresh_local("responseData", bindings),
        }
    }
}

/// `process.env["NAME"]`
fn process_env(var: &str) -> Expr {
    Expr::ident("process").member("env").index(Expr::str(var))
}

fn json_stringify(args: Vec<Expr>) -> Expr {
    Expr::ident("JSON").method("stringify", args)
}

/// URL expression: a template literal when path parameters exist, a plain string otherwise
pub fn url_expr(endpoint: &Endpoint) -> Expr {
    if endpoint.path_params().next().is_none() {
        return Expr::str(&endpoint.url);
    }

    let parts = split_url_template(&endpoint.url)
        .into_iter()
        .map(|segment| match segment {
            UrlSegment::Text(text) => TemplatePart::Text(text.to_string()),
            UrlSegment::Placeholder(name) => {
                TemplatePart::Interp(Expr::ident(Binding::new(name).safe))
            }
        })
        .collect();
    Expr::Template(parts)
}

fn is_suppressed(header: &Header, bearer_auth: bool) -> bool {
    let lower = header.name.to_lowercase();
    lower == "content-type" || (bearer_auth && lower == "authorization")
}

/// Header entries in emission order
pub fn header_props(endpoint: &Endpoint, service: &ServiceName) -> Vec<Prop> {
    let mut props = vec![Prop::Pair(
        PropKey::Quoted("Content-Type".to_string()),
        Expr::str("application/json"),
    )];

    if endpoint.bearer_auth {
        props.push(Prop::Pair(
            PropKey::Quoted("Authorization".to_string()),
            Expr::Template(vec![
                TemplatePart::Text("Bearer ".to_string()),
                TemplatePart::Interp(process_env(&service.api_key_var())),
            ]),
        ));
    }

    for header in &endpoint.headers {
        if is_suppressed(header, endpoint.bearer_auth) {
            debug!(
                endpoint = %endpoint.name,
                header = %header.name,
                "Skipping header covered by generated defaults"
            );
            continue;
        }
        let value = if header.is_env {
            process_env(&env_var_for_header(&header.name))
        } else {
            // Known limitation: the literal value is the header name itself
            Expr::str(&header.name)
        };
        props.push(Prop::Pair(PropKey::Quoted(header.name.clone()), value));
    }

    props
}

/// Statements building the query-string map for GET requests
fn query_stmts(query: &[Binding], endpoint: &Endpoint, locals: &Locals) -> Vec<Stmt> {
    let mut stmts = vec![Stmt::Const {
        pattern: Pattern::Ident(locals.params.clone()),
        ty: Some("Record<string, string>".to_string()),
        init: Expr::object(vec![]),
    }];

    for (binding, param) in query.iter().zip(endpoint.query_params()) {
        let value = Expr::ident(&binding.safe);
        let stringified = if param.param_type.is_array {
            value.method("join", vec![Expr::str(",")])
        } else {
            Expr::ident("String").call(vec![value])
        };
        stmts.push(Stmt::If {
            cond: Expr::ident(&binding.safe).binary(BinOp::StrictNe, Expr::ident("undefined")),
            then: Box::new(Stmt::Assign {
                target: Expr::ident(&locals.params).index(Expr::str(&binding.original)),
                value: stringified,
            }),
        });
    }

    stmts
}

/// `JSON.stringify({ ... })` keyed by original names
fn body_expr(query: &[Binding]) -> Expr {
    let props = query
        .iter()
        .map(|binding| {
            if binding.is_shorthand() {
                Prop::Shorthand(binding.safe.clone())
            } else {
                Prop::Pair(
                    PropKey::Auto(binding.original.clone()),
                    Expr::ident(&binding.safe),
                )
            }
        })
        .collect();
    json_stringify(vec![Expr::object(props)])
}

fn success_result(locals: &Locals) -> Expr {
    let text = json_stringify(vec![
        Expr::object(vec![
            Prop::Pair(PropKey::Auto("data".to_string()), Expr::ident(&locals.data)),
            Prop::Pair(PropKey::Auto("message".to_string()), Expr::str("Success")),
        ]),
        Expr::Null,
        Expr::Number(2),
    ]);
    let item = Expr::object_multiline(vec![
        Prop::Pair(PropKey::Auto("type".to_string()), Expr::str("text").as_const()),
        Prop::Pair(PropKey::Auto("text".to_string()), text),
    ]);
    Expr::object_multiline(vec![Prop::Pair(
        PropKey::Auto("content".to_string()),
        Expr::Array(vec![item]),
    )])
}

/// Handler statements for one endpoint
pub fn handler_body(endpoint: &Endpoint, service: &ServiceName) -> Vec<Stmt> {
    let bindings: Vec<Binding> = endpoint.params.iter().map(Binding::for_param).collect();
    let query: Vec<Binding> = endpoint.query_params().map(Binding::for_param).collect();
    let locals = Locals::for_bindings(&bindings);
    let is_get = endpoint.method == HttpMethod::Get;

    let mut stmts = vec![Stmt::Const {
        pattern: Pattern::Object(bindings.iter().map(|b| b.safe.clone()).collect()),
        ty: None,
        init: Expr::ident(&locals.args),
    }];

    let mut url = url_expr(endpoint);
    if is_get && !query.is_empty() {
        stmts.extend(query_stmts(&query, endpoint, &locals));
        let search = Expr::new_(
            Expr::ident("URLSearchParams"),
            vec![Expr::ident(&locals.params)],
        )
        .method("toString", vec![]);
        url = url
            .binary(BinOp::Add, Expr::str("?"))
            .binary(BinOp::Add, search);
    }
    stmts.push(Stmt::const_(&locals.url, url));

    let mut init = vec![
        Prop::Pair(
            PropKey::Auto("method".to_string()),
            Expr::str(endpoint.method.as_str()),
        ),
        Prop::Pair(
            PropKey::Auto("headers".to_string()),
            Expr::object_multiline(header_props(endpoint, service)),
        ),
    ];
    if !is_get && !query.is_empty() {
        init.push(Prop::Pair(
            PropKey::Auto("body".to_string()),
            body_expr(&query),
        ));
    }

    stmts.push(Stmt::const_(
        &locals.response,
        Expr::ident("fetch")
            .call(vec![Expr::ident(&locals.url), Expr::object_multiline(init)])
            .await_(),
    ));
    stmts.push(Stmt::const_(
        &locals.data,
        Expr::ident(&locals.response)
            .method("json", vec![])
            .await_(),
    ));
    stmts.push(Stmt::If {
        cond: Expr::ident(&locals.data).member("error"),
        then: Box::new(Stmt::Throw(Expr::new_(
            Expr::ident(ENDPOINT_ERROR_CLASS),
            vec![
                Expr::str(&endpoint.name),
                Expr::ident(&locals.data).member("error"),
            ],
        ))),
    });
    stmts.push(Stmt::Return(success_result(&locals)));

    stmts
}

/// The `async (args, extra) => { ... }` handler for one endpoint
pub fn handler(endpoint: &Endpoint, service: &ServiceName) -> Expr {
    let bindings: Vec<Binding> = endpoint.params.iter().map(Binding::for_param).collect();
    let locals = Locals::for_bindings(&bindings);
    Expr::Arrow(Arrow {
        is_async: true,
        params: vec![locals.args, locals.extra],
        body: handler_body(endpoint, service),
    })
}
