//! Classification of skeleton files for placeholder substitution.
//!
//! Only two tokens exist, `{{NAME}}` and `{{TOOLS}}`, and what they expand to
//! depends on which file they appear in.
//!
//! # Examples
//!
//! ```
//! use automcp::core::templates::FileKind;
//! use std::path::Path;
//!
//! assert_eq!(FileKind::classify(Path::new("package.json")), FileKind::PackageManifest);
//! assert_eq!(FileKind::classify(Path::new("src/index.ts")), FileKind::Bootstrap);
//! assert_eq!(FileKind::classify(Path::new("README.md")), FileKind::Other);
//! ```

// Internal imports (std, crate)
use std::fmt;
use std::path::Path;

/// Placeholder replaced by the service name
pub const NAME_TOKEN: &str = "{{NAME}}";
/// Placeholder replaced by the tool registrations (bootstrap) or their JSON (elsewhere)
pub const TOOLS_TOKEN: &str = "{{TOOLS}}";

/// How a skeleton file is specialized
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FileKind {
    /// `package.json`: `{{NAME}}` only, as the bare service name
    PackageManifest,
    /// `index.ts`: quoted `{{NAME}}` and the generated `setupServer` for `{{TOOLS}}`
    Bootstrap,
    /// Everything else: bare `{{NAME}}` and pretty JSON descriptors for `{{TOOLS}}`
    Other,
}

impl FileKind {
    /// Classify a file by its name
    pub fn classify(path: &Path) -> Self {
        match path.file_name().and_then(|name| name.to_str()) {
            Some("package.json") => FileKind::PackageManifest,
            Some("index.ts") => FileKind::Bootstrap,
            _ => FileKind::Other,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            FileKind::PackageManifest => "package_manifest",
            FileKind::Bootstrap => "bootstrap",
            FileKind::Other => "other",
        }
    }
}

impl fmt::Display for FileKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Expansions for the two placeholders in one run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Substitutions {
    /// Bare service name
    pub name: String,
    /// Service name as a string literal
    pub quoted_name: String,
    /// Rendered `setupServer` routine
    pub tools_source: String,
    /// Descriptor list as pretty-printed JSON
    pub tools_json: String,
}

impl Substitutions {
    /// Apply every substitution for `kind` to `content`
    pub fn apply(&self, kind: FileKind, content: &str) -> String {
        match kind {
            FileKind::PackageManifest => content.replace(NAME_TOKEN, &self.name),
            FileKind::Bootstrap => content
                .replace(NAME_TOKEN, &self.quoted_name)
                .replace(TOOLS_TOKEN, &self.tools_source),
            FileKind::Other => content
                .replace(NAME_TOKEN, &self.name)
                .replace(TOOLS_TOKEN, &self.tools_json),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn subs() -> Substitutions {
        Substitutions {
            name: "weather".to_string(),
            quoted_name: "\"weather\"".to_string(),
            tools_source: "function setupServer(server: McpServer) {}".to_string(),
            tools_json: "[]".to_string(),
        }
    }

    #[test]
    fn test_classify_by_file_name() {
        assert_eq!(
            FileKind::classify(Path::new("a/b/package.json")),
            FileKind::PackageManifest
        );
        assert_eq!(
            FileKind::classify(Path::new("src/index.ts")),
            FileKind::Bootstrap
        );
        assert_eq!(FileKind::classify(Path::new("src/util.ts")), FileKind::Other);
        assert_eq!(
            FileKind::classify(Path::new("package.json.bak")),
            FileKind::Other
        );
    }

    #[test]
    fn test_package_manifest_only_replaces_name() {
        let out = subs().apply(
            FileKind::PackageManifest,
            "{\"name\": \"{{NAME}}\", \"x\": \"{{TOOLS}}\"}",
        );
        assert_eq!(out, "{\"name\": \"weather\", \"x\": \"{{TOOLS}}\"}");
    }

    #[test]
    fn test_bootstrap_quotes_name_and_inlines_tools() {
        let out = subs().apply(FileKind::Bootstrap, "const NAME = {{NAME}}\n{{TOOLS}}\n");
        assert_eq!(
            out,
            "const NAME = \"weather\"\nfunction setupServer(server: McpServer) {}\n"
        );
    }

    #[test]
    fn test_other_files_get_json_and_replace_globally() {
        let out = subs().apply(FileKind::Other, "# {{NAME}}\n{{TOOLS}}\n{{NAME}} {{TOOLS}}");
        assert_eq!(out, "# weather\n[]\nweather []");
    }
}
