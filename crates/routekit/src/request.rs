//! Minimal request carrier handed to and returned from the matcher.

use std::sync::Arc;

/// Method, path and bound attributes of an incoming request.
///
/// Attributes are copy-on-write: [`Request::with_attribute`] returns a new
/// request and leaves the original untouched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Request {
    method: String,
    path: String,
    attributes: Arc<Vec<(String, String)>>,
}

impl Request {
    /// Build a request from a method and a URI; query string and fragment
    /// are dropped.
    ///
    /// The method is kept verbatim. A method that is not a valid HTTP token
    /// never matches a route, but path matching (and therefore the allowed
    /// methods of a failure) still happens.
    pub fn new(method: impl Into<String>, uri: &str) -> Self {
        let end = uri.find(['?', '#']).unwrap_or(uri.len());
        Self {
            method: method.into(),
            path: uri[..end].to_string(),
            attributes: Arc::new(Vec::new()),
        }
    }

    pub fn method(&self) -> &str {
        &self.method
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    /// Value of an attribute bound by a match.
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    /// Bound attributes in binding order.
    pub fn attributes(&self) -> impl Iterator<Item = (&str, &str)> {
        self.attributes
            .iter()
            .map(|(n, v)| (n.as_str(), v.as_str()))
    }

    /// A copy of this request with `name` bound to `value`.
    #[must_use = "This method returns a new Request and does not modify self"]
    pub fn with_attribute(&self, name: impl Into<String>, value: impl Into<String>) -> Self {
        let mut next = self.clone();
        let name = name.into();
        let value = value.into();
        let attributes = Arc::make_mut(&mut next.attributes);
        match attributes.iter_mut().find(|(n, _)| *n == name) {
            Some(slot) => slot.1 = value,
            None => attributes.push((name, value)),
        }
        next
    }

    pub(crate) fn with_attributes(&self, bound: Vec<(String, String)>) -> Self {
        bound
            .into_iter()
            .fold(self.clone(), |request, (name, value)| {
                request.with_attribute(name, value)
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strips_query_and_fragment() {
        assert_eq!(Request::new("GET", "/users/1?x=1#top").path(), "/users/1");
        assert_eq!(Request::new("GET", "/users/1#top?x").path(), "/users/1");
        assert_eq!(Request::new("GET", "/users").path(), "/users");
    }

    #[test]
    fn test_with_attribute_is_copy_on_write() {
        let original = Request::new("GET", "/users/7");
        let bound = original.with_attribute("id", "7");
        assert_eq!(original.attribute("id"), None);
        assert_eq!(bound.attribute("id"), Some("7"));

        let rebound = bound.with_attribute("id", "8");
        assert_eq!(bound.attribute("id"), Some("7"));
        assert_eq!(rebound.attribute("id"), Some("8"));
        assert_eq!(rebound.attributes().count(), 1);
    }
}
