//! Request method tokens.

use std::fmt;
use std::str::FromStr;

/// The verb of a request line.
///
/// Only `GET` is served. The other standard verbs are told apart so they
/// can be logged by name, and anything else is kept verbatim as
/// [`Method::Extension`] instead of failing the parse.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Method {
    GET,
    HEAD,
    POST,
    PUT,
    DELETE,
    CONNECT,
    OPTIONS,
    TRACE,
    Extension(String),
}

const STANDARD: [Method; 8] = [
    Method::GET,
    Method::HEAD,
    Method::POST,
    Method::PUT,
    Method::DELETE,
    Method::CONNECT,
    Method::OPTIONS,
    Method::TRACE,
];

impl Method {
    /// Classify a request line token. Never fails.
    pub fn from_token(token: &str) -> Self {
        token
            .parse()
            .unwrap_or_else(|_| Method::Extension(token.to_string()))
    }

    /// Whether the token was one of the standard verbs.
    pub fn is_recognized(&self) -> bool {
        !matches!(self, Method::Extension(_))
    }

    pub fn as_str(&self) -> &str {
        match self {
            Method::GET => "GET",
            Method::HEAD => "HEAD",
            Method::POST => "POST",
            Method::PUT => "PUT",
            Method::DELETE => "DELETE",
            Method::CONNECT => "CONNECT",
            Method::OPTIONS => "OPTIONS",
            Method::TRACE => "TRACE",
            Method::Extension(token) => token,
        }
    }
}

/// Strict: only the standard verbs parse, compared case-sensitively.
impl FromStr for Method {
    type Err = String;

    fn from_str(token: &str) -> Result<Self, Self::Err> {
        STANDARD
            .iter()
            .find(|method| method.as_str() == token)
            .cloned()
            .ok_or_else(|| token.to_string())
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
