//! HTTP method tokens.

use crate::error::RouteError;
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::fmt;
use std::str::FromStr;

/// An HTTP method, validated as an RFC 9110 token.
///
/// Methods are case-sensitive: `get` and `GET` are different methods.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Method(Cow<'static, str>);

impl Method {
    pub const GET: Method = Method(Cow::Borrowed("GET"));
    pub const HEAD: Method = Method(Cow::Borrowed("HEAD"));
    pub const POST: Method = Method(Cow::Borrowed("POST"));
    pub const PUT: Method = Method(Cow::Borrowed("PUT"));
    pub const PATCH: Method = Method(Cow::Borrowed("PATCH"));
    pub const DELETE: Method = Method(Cow::Borrowed("DELETE"));
    pub const OPTIONS: Method = Method(Cow::Borrowed("OPTIONS"));

    /// Validate and wrap a method name.
    ///
    /// # Errors
    ///
    /// Returns [`RouteError::InvalidMethod`] unless `method` is a non-empty
    /// HTTP token.
    pub fn new(method: impl Into<String>) -> Result<Self, RouteError> {
        let method = method.into();
        if is_token(&method) {
            Ok(Self(Cow::Owned(method)))
        } else {
            Err(RouteError::InvalidMethod { method })
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Returns true if `s` is a non-empty HTTP token.
pub fn is_token(s: &str) -> bool {
    !s.is_empty()
        && s.bytes().all(|b| {
            b.is_ascii_alphanumeric()
                || matches!(
                    b,
                    b'!' | b'#'
                        | b'$'
                        | b'%'
                        | b'&'
                        | b'\''
                        | b'*'
                        | b'+'
                        | b'-'
                        | b'.'
                        | b'^'
                        | b'_'
                        | b'`'
                        | b'|'
                        | b'~'
                )
        })
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Method {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl PartialEq<str> for Method {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for Method {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

impl FromStr for Method {
    type Err = RouteError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl TryFrom<String> for Method {
    type Error = RouteError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl TryFrom<&str> for Method {
    type Error = RouteError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Method> for String {
    fn from(method: Method) -> Self {
        method.0.into_owned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_tokens() {
        assert!(Method::new("GET").is_ok());
        assert!(Method::new("M-SEARCH").is_ok());
        assert!(Method::new("purge").is_ok());
        assert_eq!(Method::new("POST").unwrap(), Method::POST);
    }

    #[test]
    fn test_invalid_tokens() {
        for bad in ["", "GET POST", "{}", "GE\tT", "ÜBER"] {
            assert!(
                matches!(Method::new(bad), Err(RouteError::InvalidMethod { .. })),
                "{bad:?} should be rejected"
            );
        }
    }

    #[test]
    fn test_case_sensitive() {
        assert_ne!(Method::new("get").unwrap(), Method::GET);
        assert!(Method::GET == "GET");
    }

    #[test]
    fn test_serde_validates() {
        let m: Method = serde_json::from_str("\"PATCH\"").unwrap();
        assert_eq!(m, Method::PATCH);
        assert!(serde_json::from_str::<Method>("\"BAD METHOD\"").is_err());
        assert_eq!(serde_json::to_string(&Method::GET).unwrap(), "\"GET\"");
    }
}
