//! Reverse routing: build a path from a route and attribute values.

use crate::error::{UriError, UriResult};
use crate::path::{Path, PathVisitor};
use crate::types::Types;
use std::collections::BTreeMap;
use std::fmt::Display;

/// Attribute values collected from any `(name, Display)` pairs.
pub type UriValues = BTreeMap<String, String>;

/// Collect `(name, value)` pairs into [`UriValues`].
pub fn uri_values<I, K, V>(values: I) -> UriValues
where
    I: IntoIterator<Item = (K, V)>,
    K: AsRef<str>,
    V: Display,
{
    values
        .into_iter()
        .map(|(k, v)| (k.as_ref().to_string(), v.to_string()))
        .collect()
}

/// Render `path` with `values`, prepending `prefix`.
///
/// An optional suffix is written only if at least one attribute inside it
/// has a value; once written, every attribute it contains is required.
pub(crate) fn generate(
    path: &Path,
    types: &Types,
    values: &UriValues,
    prefix: &str,
) -> UriResult<String> {
    let mut writer = UriWriter {
        path,
        types,
        values,
        buffer: String::from(prefix),
        done: false,
    };
    path.accept(&mut writer)?;
    Ok(writer.buffer)
}

struct UriWriter<'a> {
    path: &'a Path,
    types: &'a Types,
    values: &'a UriValues,
    buffer: String,
    done: bool,
}

impl PathVisitor for UriWriter<'_> {
    type Output = UriResult<()>;

    fn visit_static(&mut self, text: &str, next: &Path) -> UriResult<()> {
        if !self.done {
            self.buffer.push_str(text);
        }
        next.accept(self)
    }

    fn visit_attribute(&mut self, name: &str, type_name: Option<&str>, next: &Path) -> UriResult<()> {
        if self.done {
            return next.accept(self);
        }

        let value = self
            .values
            .get(name)
            .ok_or_else(|| UriError::MissingAttribute {
                definition: self.path.to_string(),
                attribute: name.to_string(),
            })?;

        let ty = self
            .types
            .resolve(type_name)
            .unwrap_or_else(|| self.types.implicit());
        if !ty.matches(value) {
            return Err(UriError::InvalidValue {
                attribute: name.to_string(),
                value: value.clone(),
                type_name: ty.name().to_string(),
                pattern: ty.pattern().to_string(),
            });
        }

        self.buffer.push_str(value);
        next.accept(self)
    }

    fn visit_optional(&mut self, inner: &Path) -> UriResult<()> {
        if self.done {
            return Ok(());
        }
        let present = inner
            .attributes()
            .iter()
            .any(|a| self.values.contains_key(&a.name));
        if present {
            inner.accept(self)
        } else {
            self.done = true;
            Ok(())
        }
    }

    fn visit_empty(&mut self) -> UriResult<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse;

    fn render(definition: &str, values: &[(&str, &str)], prefix: &str) -> UriResult<String> {
        let types = Types::default();
        let path = parse(definition, &types).unwrap();
        generate(&path, &types, &uri_values(values.iter().copied()), prefix)
    }

    #[test]
    fn test_optional_suffix_omitted() {
        let definition = "/users/{name}[/{id:number}]";
        assert_eq!(render(definition, &[("name", "ada")], "").unwrap(), "/users/ada");
        assert_eq!(
            render(definition, &[("name", "ada"), ("id", "7")], "").unwrap(),
            "/users/ada/7"
        );
    }

    #[test]
    fn test_missing_required_attribute() {
        let err = render("/users/{name}[/{id:number}]", &[("id", "7")], "").unwrap_err();
        assert_eq!(err.attribute(), Some("name"));
        assert!(matches!(err, UriError::MissingAttribute { .. }));
    }

    #[test]
    fn test_entered_optional_requires_all_its_attributes() {
        let definition = "/archive[/{year:number}[/{month:number}]]";
        assert_eq!(render(definition, &[], "").unwrap(), "/archive");
        assert_eq!(render(definition, &[("year", "2024")], "").unwrap(), "/archive/2024");
        let err = render(definition, &[("month", "02")], "").unwrap_err();
        assert_eq!(err.attribute(), Some("year"));
    }

    #[test]
    fn test_value_must_match_type() {
        let err = render("/users/{id:number}", &[("id", "abc")], "").unwrap_err();
        match err {
            UriError::InvalidValue {
                attribute,
                value,
                type_name,
                ..
            } => {
                assert_eq!(attribute, "id");
                assert_eq!(value, "abc");
                assert_eq!(type_name, "number");
            }
            other => panic!("unexpected error: {other:?}"),
        }
        let err = render("/files/{name}", &[("name", "a/b")], "").unwrap_err();
        assert!(matches!(err, UriError::InvalidValue { .. }));
    }

    #[test]
    fn test_prefix_is_prepended() {
        assert_eq!(
            render("/users/{id}", &[("id", "1")], "/api/v1").unwrap(),
            "/api/v1/users/1"
        );
    }

    #[test]
    fn test_display_values() {
        let types = Types::default();
        let path = parse("/page/{n:number}", &types).unwrap();
        let values = uri_values([("n", 42)]);
        assert_eq!(generate(&path, &types, &values, "").unwrap(), "/page/42");
    }

    #[test]
    fn test_static_only_optional_is_omitted() {
        assert_eq!(render("/docs[/index]", &[], "").unwrap(), "/docs");
    }
}
