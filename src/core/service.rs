//! Validated service names.
//!
//! The service name names the output directory, the npm package and the
//! environment variable holding the bearer credential, so it is restricted
//! to letters, digits, `-` and `_`.

use std::fmt::{self, Display};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::core::error::Error;

/// Name of the service being generated
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ServiceName(String);

impl ServiceName {
    /// Validate a raw service name
    pub fn new(raw: impl Into<String>) -> Result<Self, Error> {
        let raw = raw.into();
        let valid = !raw.is_empty()
            && raw
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
        if valid {
            Ok(Self(raw))
        } else {
            Err(Error::InvalidServiceName(raw))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Upper snake form used as the environment variable prefix
    ///
    /// ```
    /// use automcp::core::ServiceName;
    ///
    /// let name = ServiceName::new("acme-billing").unwrap();
    /// assert_eq!(name.env_prefix(), "ACME_BILLING");
    /// ```
    pub fn env_prefix(&self) -> String {
        self.0.replace('-', "_").to_uppercase()
    }

    /// Environment variable the generated server reads its bearer token from
    pub fn api_key_var(&self) -> String {
        format!("{}_API_KEY", self.env_prefix())
    }
}

impl Display for ServiceName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for ServiceName {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl TryFrom<String> for ServiceName {
    type Error = Error;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<ServiceName> for String {
    fn from(value: ServiceName) -> Self {
        value.0
    }
}

impl AsRef<str> for ServiceName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
