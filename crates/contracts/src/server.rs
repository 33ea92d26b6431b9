//! ServerName / ServerDescriptor - directory entries
//!
//! Names are validated identifiers so they can be used as lookup keys.

use serde::{Deserialize, Deserializer, Serialize};
use std::borrow::Borrow;
use std::fmt;
use std::ops::Deref;
use std::str::FromStr;

use crate::ContractError;

/// Validated server name
///
/// Must start with an ASCII letter or `_`, followed by ASCII letters,
/// digits, or `_`.
///
/// # Examples
/// ```
/// use contracts::ServerName;
///
/// let name = ServerName::new("arduino").unwrap();
/// assert_eq!(name, "arduino");
/// assert!(ServerName::new("9lives").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct ServerName(String);

impl ServerName {
    pub fn new(name: impl Into<String>) -> Result<Self, ContractError> {
        let name = name.into();
        validate_identifier(&name)?;
        Ok(Self(name))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

fn validate_identifier(name: &str) -> Result<(), ContractError> {
    let mut chars = name.chars();
    let Some(first) = chars.next() else {
        return Err(ContractError::invalid_server_name(name, "name is empty"));
    };
    if !(first.is_ascii_alphabetic() || first == '_') {
        return Err(ContractError::invalid_server_name(
            name,
            "name must start with a letter or '_'",
        ));
    }
    if let Some(bad) = chars.find(|c| !(c.is_ascii_alphanumeric() || *c == '_')) {
        return Err(ContractError::invalid_server_name(
            name,
            format!("unexpected character {bad:?}"),
        ));
    }
    Ok(())
}

impl Deref for ServerName {
    type Target = str;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl Borrow<str> for ServerName {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for ServerName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl FromStr for ServerName {
    type Err = ContractError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl fmt::Display for ServerName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl PartialEq<str> for ServerName {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for ServerName {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

impl<'de> Deserialize<'de> for ServerName {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Self::new(s).map_err(serde::de::Error::custom)
    }
}

/// A named network endpoint reported by the directory
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerDescriptor {
    pub name: ServerName,
    /// `host:port`
    pub address: String,
}

impl ServerDescriptor {
    pub fn new(name: ServerName, address: impl Into<String>) -> Self {
        Self {
            name,
            address: address.into(),
        }
    }
}
