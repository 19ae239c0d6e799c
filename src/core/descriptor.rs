//! Endpoint descriptor model.
//!
//! Descriptors come from an external extraction step and are not guaranteed to
//! be well-formed, so the loosely-typed JSON fields are parsed into tagged types
//! here ([`HttpMethod`], [`ParamType`]) and checked by [`Endpoint::validate`]
//! before anything is generated. Unknown parameter types are kept verbatim and
//! degrade later instead of failing.

use std::collections::HashSet;
use std::fmt::{self, Display};
use std::path::Path;
use std::str::FromStr;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::core::error::{Error, Result};

static PLACEHOLDER_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\{([^}]+)\}").unwrap());

/// HTTP method of an endpoint
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Patch,
    Delete,
}

impl HttpMethod {
    pub fn as_str(self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Patch => "PATCH",
            HttpMethod::Delete => "DELETE",
        }
    }

    pub fn all() -> &'static [HttpMethod] {
        &[
            HttpMethod::Get,
            HttpMethod::Post,
            HttpMethod::Put,
            HttpMethod::Patch,
            HttpMethod::Delete,
        ]
    }
}

impl Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for HttpMethod {
    type Err = Error;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "GET" => Ok(HttpMethod::Get),
            "POST" => Ok(HttpMethod::Post),
            "PUT" => Ok(HttpMethod::Put),
            "PATCH" => Ok(HttpMethod::Patch),
            "DELETE" => Ok(HttpMethod::Delete),
            _ => Err(Error::descriptor(format!(
                "unknown HTTP method '{}'. Available methods: {}",
                s,
                HttpMethod::all()
                    .iter()
                    .map(|m| m.as_str())
                    .collect::<Vec<_>>()
                    .join(", ")
            ))),
        }
    }
}

impl TryFrom<String> for HttpMethod {
    type Error = Error;

    fn try_from(value: String) -> std::result::Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<HttpMethod> for String {
    fn from(value: HttpMethod) -> Self {
        value.as_str().to_string()
    }
}

/// Scalar part of a parameter type
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum BaseType {
    String,
    Integer,
    Number,
    Boolean,
    Object,
    /// Anything the extractor produced that we do not recognize, kept verbatim
    Unknown(String),
}

impl BaseType {
    fn parse(raw: &str) -> Self {
        match raw {
            "string" => BaseType::String,
            "integer" => BaseType::Integer,
            "number" => BaseType::Number,
            "boolean" => BaseType::Boolean,
            "object" => BaseType::Object,
            other => BaseType::Unknown(other.to_string()),
        }
    }

    fn as_str(&self) -> &str {
        match self {
            BaseType::String => "string",
            BaseType::Integer => "integer",
            BaseType::Number => "number",
            BaseType::Boolean => "boolean",
            BaseType::Object => "object",
            BaseType::Unknown(raw) => raw,
        }
    }
}

/// Parameter type: a base type, optionally as an array (`T[]`)
///
/// Any JSON value is accepted; non-string values become [`BaseType::Unknown`]
/// holding their JSON text.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "serde_json::Value", into = "String")]
pub struct ParamType {
    pub base: BaseType,
    pub is_array: bool,
}

impl ParamType {
    pub fn scalar(base: BaseType) -> Self {
        Self {
            base,
            is_array: false,
        }
    }

    pub fn array(base: BaseType) -> Self {
        Self {
            base,
            is_array: true,
        }
    }
}

impl Default for ParamType {
    fn default() -> Self {
        Self::scalar(BaseType::Unknown("any".to_string()))
    }
}

impl From<&str> for ParamType {
    fn from(raw: &str) -> Self {
        let raw = raw.trim();
        match raw.strip_suffix("[]") {
            Some(base) => Self::array(BaseType::parse(base)),
            None => Self::scalar(BaseType::parse(raw)),
        }
    }
}

impl From<String> for ParamType {
    fn from(raw: String) -> Self {
        Self::from(raw.as_str())
    }
}

impl From<serde_json::Value> for ParamType {
    fn from(raw: serde_json::Value) -> Self {
        match raw {
            serde_json::Value::String(text) => Self::from(text.as_str()),
            other => Self::scalar(BaseType::Unknown(other.to_string())),
        }
    }
}

impl From<ParamType> for String {
    fn from(value: ParamType) -> Self {
        value.to_string()
    }
}

impl Display for ParamType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_array {
            write!(f, "{}[]", self.base.as_str())
        } else {
            f.write_str(self.base.as_str())
        }
    }
}

/// A single endpoint parameter
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Parameter {
    pub name: String,
    #[serde(rename = "type", default)]
    pub param_type: ParamType,
    #[serde(default)]
    pub required: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Substituted into the URL template instead of sent as query/body data
    #[serde(default)]
    pub in_path: bool,
}

impl Parameter {
    pub fn new(name: impl Into<String>, param_type: impl Into<ParamType>) -> Self {
        Self {
            name: name.into(),
            param_type: param_type.into(),
            required: false,
            description: None,
            in_path: false,
        }
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn in_path(mut self) -> Self {
        self.in_path = true;
        self.required = true;
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Path parameters are always required
    pub fn is_required(&self) -> bool {
        self.required || self.in_path
    }
}

/// A declared request header
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Header {
    pub name: String,
    #[serde(default)]
    pub required: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Value comes from the environment variable named after the upper-cased header
    #[serde(default)]
    pub is_env: bool,
}

impl Header {
    pub fn literal(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            required: false,
            description: None,
            is_env: false,
        }
    }

    pub fn env(name: impl Into<String>) -> Self {
        Self {
            is_env: true,
            ..Self::literal(name)
        }
    }
}

/// Description of one HTTP endpoint, turned into one MCP tool
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Endpoint {
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub method: HttpMethod,
    pub url: String,
    #[serde(default)]
    pub params: Vec<Parameter>,
    #[serde(default)]
    pub headers: Vec<Header>,
    #[serde(default)]
    pub bearer_auth: bool,
}

/// Piece of a URL template
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UrlSegment<'a> {
    Text(&'a str),
    Placeholder(&'a str),
}

/// Split a URL template into static text and `{param}` placeholders
pub fn split_url_template(url: &str) -> Vec<UrlSegment<'_>> {
    let mut segments = Vec::new();
    let mut last = 0;
    for caps in PLACEHOLDER_RE.captures_iter(url) {
        let (Some(whole), Some(name)) = (caps.get(0), caps.get(1)) else {
            continue;
        };
        if whole.start() > last {
            segments.push(UrlSegment::Text(&url[last..whole.start()]));
        }
        segments.push(UrlSegment::Placeholder(name.as_str()));
        last = whole.end();
    }
    if last < url.len() {
        segments.push(UrlSegment::Text(&url[last..]));
    }
    segments
}

impl Endpoint {
    pub fn new(name: impl Into<String>, method: HttpMethod, url: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: String::new(),
            method,
            url: url.into(),
            params: Vec::new(),
            headers: Vec::new(),
            bearer_auth: false,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_param(mut self, param: Parameter) -> Self {
        self.params.push(param);
        self
    }

    pub fn with_header(mut self, header: Header) -> Self {
        self.headers.push(header);
        self
    }

    pub fn with_bearer_auth(mut self) -> Self {
        self.bearer_auth = true;
        self
    }

    /// Parameters substituted into the URL template
    pub fn path_params(&self) -> impl Iterator<Item = &Parameter> {
        self.params.iter().filter(|p| p.in_path)
    }

    /// Parameters sent in the query string (GET) or the JSON body (anything else)
    pub fn query_params(&self) -> impl Iterator<Item = &Parameter> {
        self.params.iter().filter(|p| !p.in_path)
    }

    /// Placeholder names in the URL template, in order of appearance
    pub fn url_placeholders(&self) -> Vec<&str> {
        split_url_template(&self.url)
            .into_iter()
            .filter_map(|segment| match segment {
                UrlSegment::Placeholder(name) => Some(name),
                UrlSegment::Text(_) => None,
            })
            .collect()
    }

    /// Check the descriptor invariants
    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(Error::descriptor(format!(
                "endpoint for {} {} has an empty name",
                self.method, self.url
            )));
        }

        let mut seen = HashSet::new();
        for param in &self.params {
            if !seen.insert(param.name.as_str()) {
                return Err(Error::descriptor(format!(
                    "endpoint '{}' declares parameter '{}' more than once",
                    self.name, param.name
                )));
            }
        }

        let mut seen_headers = HashSet::new();
        for header in &self.headers {
            if !seen_headers.insert(header.name.to_lowercase()) {
                return Err(Error::descriptor(format!(
                    "endpoint '{}' declares header '{}' more than once",
                    self.name, header.name
                )));
            }
        }

        let placeholders = self.url_placeholders();
        for placeholder in &placeholders {
            let declared = self
                .params
                .iter()
                .any(|p| p.in_path && p.name == *placeholder);
            if !declared {
                return Err(Error::descriptor(format!(
                    "endpoint '{}' uses '{{{}}}' in its URL without a matching path parameter",
                    self.name, placeholder
                )));
            }
        }

        for param in self.path_params() {
            if !placeholders.contains(&param.name.as_str()) {
                warn!(
                    endpoint = %self.name,
                    param = %param.name,
                    "Path parameter does not appear in the URL template"
                );
            }
        }

        Ok(())
    }
}

/// Raw descriptor file contents: the extractor emits either a list or a lone object
#[derive(Deserialize)]
#[serde(untagged)]
enum DescriptorFile {
    Many(Vec<Endpoint>),
    One(Box<Endpoint>),
}

/// Parse and validate descriptors from JSON text
pub fn parse_descriptors(json: &str) -> Result<Vec<Endpoint>> {
    let endpoints = match serde_json::from_str::<DescriptorFile>(json) {
        Ok(DescriptorFile::Many(endpoints)) => endpoints,
        Ok(DescriptorFile::One(endpoint)) => vec![*endpoint],
        // Re-parse as a list so the reported error points at the offending field
        Err(_) => serde_json::from_str::<Vec<Endpoint>>(json)?,
    };

    for endpoint in &endpoints {
        endpoint.validate()?;
    }
    debug!(count = endpoints.len(), "Parsed endpoint descriptors");
    Ok(endpoints)
}

/// Load and validate descriptors from a JSON file
pub async fn load_descriptors<P: AsRef<Path>>(path: P) -> Result<Vec<Endpoint>> {
    let content = tokio::fs::read_to_string(path.as_ref()).await?;
    parse_descriptors(&content)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_method_parse_is_case_insensitive() {
        assert_eq!("get".parse::<HttpMethod>().unwrap(), HttpMethod::Get);
        assert_eq!("Patch".parse::<HttpMethod>().unwrap(), HttpMethod::Patch);
        assert_eq!(" DELETE ".parse::<HttpMethod>().unwrap(), HttpMethod::Delete);
        assert!("FETCH".parse::<HttpMethod>().is_err());
    }

    #[test]
    fn test_param_type_parse() {
        assert_eq!(ParamType::from("integer"), ParamType::scalar(BaseType::Integer));
        assert_eq!(ParamType::from("string[]"), ParamType::array(BaseType::String));
        assert_eq!(
            ParamType::from("uuid"),
            ParamType::scalar(BaseType::Unknown("uuid".to_string()))
        );
        assert_eq!(
            ParamType::from("date[]"),
            ParamType::array(BaseType::Unknown("date".to_string()))
        );
        assert_eq!(ParamType::from("boolean[]").to_string(), "boolean[]");
        assert_eq!(ParamType::from("weird").to_string(), "weird");
    }

    #[test]
    fn test_parse_descriptor_defaults() {
        let json = r#"[{
            "name": "listPets",
            "description": "List pets",
            "method": "get",
            "url": "https://api.example.com/pets",
            "params": [{"name": "limit", "type": "integer", "required": false, "description": "Max"}]
        }]"#;
        let endpoints = parse_descriptors(json).unwrap();
        assert_eq!(endpoints.len(), 1);
        let endpoint = &endpoints[0];
        assert_eq!(endpoint.method, HttpMethod::Get);
        assert!(endpoint.headers.is_empty());
        assert!(!endpoint.bearer_auth);
        assert!(!endpoint.params[0].in_path);
    }

    #[test]
    fn test_parse_single_object() {
        let json = r#"{"name": "ping", "method": "GET", "url": "https://api.example.com/ping"}"#;
        let endpoints = parse_descriptors(json).unwrap();
        assert_eq!(endpoints.len(), 1);
        assert_eq!(endpoints[0].name, "ping");
    }

    #[test]
    fn test_malformed_param_types_degrade_to_unknown() {
        let json = r#"[{
            "name": "search",
            "method": "GET",
            "url": "https://api.example.com/search",
            "params": [
                {"name": "a", "type": null},
                {"name": "b", "type": ["string", "null"]},
                {"name": "c", "type": 42},
                {"name": "d"}
            ]
        }]"#;
        let endpoints = parse_descriptors(json).unwrap();
        let types: Vec<_> = endpoints[0]
            .params
            .iter()
            .map(|p| p.param_type.clone())
            .collect();
        assert_eq!(
            types,
            vec![
                ParamType::scalar(BaseType::Unknown("null".to_string())),
                ParamType::scalar(BaseType::Unknown("[\"string\",\"null\"]".to_string())),
                ParamType::scalar(BaseType::Unknown("42".to_string())),
                ParamType::default(),
            ]
        );
    }

    #[test]
    fn test_parse_rejects_unknown_method() {
        let json = r#"[{"name": "x", "method": "FETCH", "url": "https://a.b/c"}]"#;
        assert!(parse_descriptors(json).is_err());
    }

    #[test]
    fn test_serialize_keeps_wire_shape() {
        let endpoint = Endpoint::new("getUser", HttpMethod::Get, "https://a.b/users/{id}")
            .with_param(Parameter::new("id", "integer").in_path());
        let value = serde_json::to_value(&endpoint).unwrap();
        assert_eq!(value["method"], "GET");
        assert_eq!(value["params"][0]["type"], "integer");
        assert_eq!(value["params"][0]["in_path"], true);
        assert_eq!(value["bearer_auth"], false);
    }

    #[test]
    fn test_split_url_template() {
        let segments = split_url_template("https://a.b/users/{id}/posts/{post.id}?x=1");
        assert_eq!(
            segments,
            vec![
                UrlSegment::Text("https://a.b/users/"),
                UrlSegment::Placeholder("id"),
                UrlSegment::Text("/posts/"),
                UrlSegment::Placeholder("post.id"),
                UrlSegment::Text("?x=1"),
            ]
        );
        assert_eq!(
            split_url_template("https://a.b/plain"),
            vec![UrlSegment::Text("https://a.b/plain")]
        );
    }

    #[test]
    fn test_validate_requires_path_param_for_placeholder() {
        let endpoint = Endpoint::new("getUser", HttpMethod::Get, "https://a.b/users/{id}")
            .with_param(Parameter::new("id", "integer").required());
        let err = endpoint.validate().unwrap_err();
        assert!(err.to_string().contains("{id}"));
    }

    #[test]
    fn test_validate_rejects_duplicate_params() {
        let endpoint = Endpoint::new("search", HttpMethod::Get, "https://a.b/search")
            .with_param(Parameter::new("q", "string"))
            .with_param(Parameter::new("q", "string"));
        assert!(endpoint.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_duplicate_headers() {
        let endpoint = Endpoint::new("search", HttpMethod::Get, "https://a.b/search")
            .with_header(Header::env("X-Api-Key"))
            .with_header(Header::literal("x-api-key"));
        assert!(endpoint.validate().is_err());
    }

    #[test]
    fn test_path_params_are_required() {
        let mut param = Parameter::new("id", "integer");
        param.in_path = true;
        assert!(!param.required);
        assert!(param.is_required());
    }
}
