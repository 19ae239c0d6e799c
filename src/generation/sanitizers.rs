//! Identifier sanitizing and literal escaping for emitted TypeScript.
//!
//! Everything that turns descriptor text into source text goes through this
//! module:
//! - [`Binding`] keeps a parameter's original (wire) name next to its code-safe
//!   name, so schema keys, destructuring and references cannot drift apart
//! - [`quote`] is the only producer of double-quoted string literals
//! - [`escape_template_text`] escapes static text inside template literals

use crate::core::Parameter;

const RESERVED_WORDS: &[&str] = &[
    "break", "case", "catch", "class", "const", "continue", "debugger", "default", "delete",
    "do", "else", "enum", "export", "extends", "false", "finally", "for", "function", "if",
    "import", "in", "instanceof", "new", "null", "return", "super", "switch", "this", "throw",
    "true", "try", "typeof", "var", "void", "while", "with", "yield", "let", "static",
    "implements", "interface", "package", "private", "protected", "public", "await",
];

/// Globals referenced by generated handlers; a binding must never shadow them
const HANDLER_GLOBALS: &[&str] = &[
    "fetch",
    "process",
    "String",
    "JSON",
    "URLSearchParams",
    "EndpointError",
    "z",
    "undefined",
];

/// Replace every `.` (and any other character not allowed in an identifier) with `_`
///
/// A leading digit gets a `_` prefix. Reserved words and the globals the
/// generated handler calls get a `_` suffix, so the result can always be used as
/// a destructuring binding.
///
/// # Examples
/// ```
/// use automcp::generation::sanitizers::sanitize_identifier;
///
/// assert_eq!(sanitize_identifier("user.id"), "user_id");
/// assert_eq!(sanitize_identifier("a.b.c"), "a_b_c");
/// assert_eq!(sanitize_identifier("plain"), "plain");
/// assert_eq!(sanitize_identifier("page-size"), "page_size");
/// assert_eq!(sanitize_identifier("default"), "default_");
/// assert_eq!(sanitize_identifier("fetch"), "fetch_");
/// ```
pub fn sanitize_identifier(raw: &str) -> String {
    let mut safe: String = raw
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '_' || c == '$' {
                c
            } else {
                '_'
            }
        })
        .collect();
    if safe.is_empty() || safe.starts_with(|c: char| c.is_ascii_digit()) {
        safe.insert(0, '_');
    }
    if RESERVED_WORDS.contains(&safe.as_str()) || HANDLER_GLOBALS.contains(&safe.as_str()) {
        safe.push('_');
    }
    safe
}

/// A parameter name in both of its forms
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Binding {
    /// Name as the remote API knows it; used for every wire-facing key
    pub original: String,
    /// Code identifier used for schema keys, destructuring and references
    pub safe: String,
}

impl Binding {
    pub fn new(original: &str) -> Self {
        Self {
            original: original.to_string(),
            safe: sanitize_identifier(original),
        }
    }

    pub fn for_param(param: &Parameter) -> Self {
        Self::new(&param.name)
    }

    /// Whether the wire key can be written as object shorthand
    pub fn is_shorthand(&self) -> bool {
        self.original == self.safe
    }
}

/// Quote text as a double-quoted TypeScript string literal
///
/// # Examples
/// ```
/// use automcp::generation::sanitizers::quote;
///
/// assert_eq!(quote("plain"), "\"plain\"");
/// assert_eq!(quote("say \"hi\""), "\"say \\\"hi\\\"\"");
/// assert_eq!(quote("a\nb"), "\"a\\nb\"");
/// ```
pub fn quote(text: &str) -> String {
    let mut out = String::with_capacity(text.len() + 2);
    out.push('"');
    for ch in text.chars() {
        match ch {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            '\u{2028}' => out.push_str("\\u2028"),
            '\u{2029}' => out.push_str("\\u2029"),
            c if c.is_control() => out.push_str(&format!("\\u{:04x}", c as u32)),
            c => out.push(c),
        }
    }
    out.push('"');
    out
}

/// Escape static text for use between the backticks of a template literal
pub fn escape_template_text(text: &str) -> String {
    text.replace('\\', "\\\\")
        .replace('`', "\\`")
        .replace("${", "\\${")
}

/// Whether `name` can be written bare as an identifier or property key
pub fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) if first.is_ascii_alphabetic() || first == '_' || first == '$' => {
            chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '$')
        }
        _ => false,
    }
}

/// Environment variable holding the value of an env-sourced header
pub fn env_var_for_header(header_name: &str) -> String {
    header_name.to_uppercase()
}

/// Pick a local variable name that does not collide with any parameter binding
pub fn fresh_local(base: &str, bindings: &[Binding]) -> String {
    let mut name = base.to_string();
    while bindings.iter().any(|b| b.safe == name) {
        name.push('_');
    }
    name
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_binding_keeps_both_forms() {
        let binding = Binding::new("user.profile.id");
        assert_eq!(binding.original, "user.profile.id");
        assert_eq!(binding.safe, "user_profile_id");
        assert!(!binding.is_shorthand());
        assert!(Binding::new("limit").is_shorthand());
    }

    #[test]
    fn test_sanitize_identifier_avoids_handler_globals() {
        for global in ["fetch", "process", "String", "JSON", "URLSearchParams", "EndpointError", "z", "undefined"] {
            assert_eq!(sanitize_identifier(global), format!("{global}_"));
        }
        assert_eq!(sanitize_identifier("fetcher"), "fetcher");
        assert!(!Binding::new("process").is_shorthand());
    }

    #[test]
    fn test_sanitize_identifier_edge_cases() {
        assert_eq!(sanitize_identifier("filter.created.gte"), "filter_created_gte");
        assert_eq!(sanitize_identifier("2fa_code"), "_2fa_code");
        assert_eq!(sanitize_identifier("class"), "class_");
        assert_eq!(sanitize_identifier("tags[]"), "tags__");
        assert_eq!(sanitize_identifier(""), "_");
        assert!(is_identifier(&sanitize_identifier("x-api.key")));
    }

    #[test]
    fn test_quote_escapes_everything_unsafe() {
        assert_eq!(quote(r"C:\path"), r#""C:\\path""#);
        assert_eq!(quote("tab\there"), "\"tab\\there\"");
        assert_eq!(quote("\u{0007}"), "\"\\u0007\"");
        assert_eq!(quote("line\u{2028}sep"), "\"line\\u2028sep\"");
        assert_eq!(quote("smart \u{201C}quotes\u{201D}"), "\"smart \u{201C}quotes\u{201D}\"");
    }

    #[test]
    fn test_escape_template_text() {
        assert_eq!(escape_template_text("https://a.b/c"), "https://a.b/c");
        assert_eq!(escape_template_text("a`b"), "a\\`b");
        assert_eq!(escape_template_text("cost${x}"), "cost\\${x}");
        assert_eq!(escape_template_text("back\\slash"), "back\\\\slash");
    }

    #[test]
    fn test_is_identifier() {
        assert!(is_identifier("user_id"));
        assert!(is_identifier("$ref"));
        assert!(is_identifier("_private"));
        assert!(!is_identifier("1st"));
        assert!(!is_identifier("x-api-key"));
        assert!(!is_identifier("user.id"));
        assert!(!is_identifier(""));
    }

    #[test]
    fn test_env_var_for_header() {
        assert_eq!(env_var_for_header("X-Api-Key"), "X-API-KEY");
        assert_eq!(env_var_for_header("api_token"), "API_TOKEN");
    }

    #[test]
    fn test_fresh_local_avoids_bindings() {
        let bindings = vec![Binding::new("params"), Binding::new("params_")];
        assert_eq!(fresh_local("params", &bindings), "params__");
        assert_eq!(fresh_local("response", &bindings), "response");
    }
}
