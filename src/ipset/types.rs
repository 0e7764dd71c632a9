use std::{
    convert::Infallible,
    fmt::{Display, Formatter, Result as FmtResult},
    str::FromStr,
};

use serde::Deserialize;

/// Kind of set handed to `ipset create`
#[derive(Clone, Debug, Default, Deserialize, PartialEq, Eq)]
#[serde(from = "String")]
pub enum SetType {
    /// `hash:ip`, a hash of single IP addresses
    #[default]
    HashIp,
    /// Any type token this crate does not know how to create
    Unsupported(String),
}

impl SetType {
    pub fn as_str(&self) -> &str {
        match self {
            SetType::HashIp => "hash:ip",
            SetType::Unsupported(s) => s,
        }
    }

    /// Whether [`IpSet::validate`](super::IpSet::validate) accepts this type
    pub fn is_supported(&self) -> bool { !matches!(self, SetType::Unsupported(_)) }
}

impl FromStr for SetType {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s.trim() {
            "hash:ip" => SetType::HashIp,
            other => SetType::Unsupported(other.to_string()),
        })
    }
}

impl From<String> for SetType {
    fn from(s: String) -> Self {
        let Ok(set_type) = s.parse::<SetType>();
        set_type
    }
}

impl Display for SetType {
    fn fmt(&self, f: &mut Formatter) -> FmtResult { f.write_str(self.as_str()) }
}

/// Protocol family of a hash set
#[derive(Clone, Debug, Default, Deserialize, PartialEq, Eq)]
#[serde(from = "String")]
pub enum HashFamily {
    /// IPv4
    #[default]
    Inet,
    /// IPv6
    Inet6,
    Unsupported(String),
}

impl HashFamily {
    pub fn as_str(&self) -> &str {
        match self {
            HashFamily::Inet => "inet",
            HashFamily::Inet6 => "inet6",
            HashFamily::Unsupported(s) => s,
        }
    }

    pub fn is_supported(&self) -> bool { !matches!(self, HashFamily::Unsupported(_)) }
}

impl FromStr for HashFamily {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s.trim() {
            "inet" => HashFamily::Inet,
            "inet6" => HashFamily::Inet6,
            other => HashFamily::Unsupported(other.to_string()),
        })
    }
}

impl From<String> for HashFamily {
    fn from(s: String) -> Self {
        let Ok(family) = s.parse::<HashFamily>();
        family
    }
}

impl Display for HashFamily {
    fn fmt(&self, f: &mut Formatter) -> FmtResult { f.write_str(self.as_str()) }
}

/// A single member of a set
///
/// The element is whatever token the set type accepts (for `hash:ip`, an IP
/// address). An empty comment is treated the same as no comment.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Entry {
    pub element: String,
    pub comment: Option<String>,
}

impl Entry {
    pub fn new(element: &str) -> Self {
        Entry {
            element: element.to_string(),
            comment: None,
        }
    }

    pub fn with_comment(element: &str, comment: &str) -> Self {
        Entry {
            element: element.to_string(),
            comment: Some(comment.to_string()),
        }
    }

    /// The comment, if present and non-empty
    pub fn comment(&self) -> Option<&str> { self.comment.as_deref().filter(|c| !c.is_empty()) }
}

impl Display for Entry {
    fn fmt(&self, f: &mut Formatter) -> FmtResult {
        match self.comment() {
            Some(comment) => write!(f, "{} ({})", self.element, comment),
            None => f.write_str(&self.element),
        }
    }
}
