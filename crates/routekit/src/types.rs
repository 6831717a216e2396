//! Attribute types registry.
//!
//! A [`Types`] registry maps type names to regular expression fragments. Every
//! attribute in a route definition resolves to one of these types, either
//! explicitly (`{id:number}`) or through the registry's single implicit type
//! (`{id}`).
//!
//! # Default Types
//!
//! | name     | pattern              |
//! |----------|----------------------|
//! | `any`    | `[^/]+` (implicit)   |
//! | `alnum`  | `[a-zA-Z0-9]+`       |
//! | `alpha`  | `[a-zA-Z]+`          |
//! | `date`   | `[0-9]{4}-[0-9]{2}-[0-9]{2}` |
//! | `digit`  | `[0-9]`              |
//! | `number` | `[0-9]+`             |
//! | `word`   | `[a-zA-Z0-9_]+`      |
//!
//! The digit and word classes are spelled out in ASCII: `\d` and `\w` are
//! Unicode classes in `regex` and would accept digits such as `٤٢`.
//!
//! # Example
//! ```rust,ignore
//! use routekit::Types;
//!
//! let types = Types::builder()
//!     .add("slug", "[a-z0-9-]+")
//!     .build()?;
//! assert!(types.get("slug").unwrap().matches("hello-world"));
//! ```

use crate::cursor::is_identifier_char;
use crate::error::TypesError;
use regex::Regex;
use std::sync::{Arc, LazyLock};

/// Name of the implicit type in the default registry.
pub const DEFAULT_IMPLICIT_TYPE: &str = "any";

/// The default type table, in declaration order.
pub const DEFAULT_TYPE_PATTERNS: &[(&str, &str)] = &[
    ("any", r"[^/]+"),
    ("alnum", r"[a-zA-Z0-9]+"),
    ("alpha", r"[a-zA-Z]+"),
    ("date", r"[0-9]{4}-[0-9]{2}-[0-9]{2}"),
    ("digit", r"[0-9]"),
    ("number", r"[0-9]+"),
    ("word", r"[a-zA-Z0-9_]+"),
];

static DEFAULT_TYPES: LazyLock<Types> = LazyLock::new(|| {
    Types::builder_empty()
        .extend_defaults()
        .build()
        .expect("default type table is valid")
});

/// Declaration of a type before validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeDef {
    /// Type name, must match `^\w+$`.
    pub name: String,
    /// Regular expression fragment.
    pub pattern: String,
    /// Whether this is the registry's implicit type.
    pub implicit: bool,
}

impl TypeDef {
    /// Declare an explicit type.
    pub fn new(name: impl Into<String>, pattern: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            pattern: pattern.into(),
            implicit: false,
        }
    }

    /// Mark this type as the implicit one.
    pub fn implicit(mut self) -> Self {
        self.implicit = true;
        self
    }
}

/// A validated type: name, fragment and a full-match regex for values.
#[derive(Debug, Clone)]
pub struct Type {
    name: String,
    pattern: String,
    implicit: bool,
    full_match: Regex,
}

impl Type {
    /// The type name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The regular expression fragment, unanchored.
    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    /// Whether this is the registry's implicit type.
    pub fn is_implicit(&self) -> bool {
        self.implicit
    }

    /// Returns true if `value` matches the whole pattern.
    pub fn matches(&self, value: &str) -> bool {
        self.full_match.is_match(value)
    }

    /// The anchored `^(?:pattern)$` regex.
    pub(crate) fn full_match(&self) -> &Regex {
        &self.full_match
    }
}

impl PartialEq for Type {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name && self.pattern == other.pattern && self.implicit == other.implicit
    }
}

impl Eq for Type {}

/// Closed, ordered registry of attribute types with one implicit type.
///
/// Cheap to clone; routes keep a handle to the registry they were parsed with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Types {
    inner: Arc<TypesInner>,
}

#[derive(Debug, PartialEq, Eq)]
struct TypesInner {
    types: Vec<Type>,
    implicit: usize,
}

impl Default for Types {
    fn default() -> Self {
        DEFAULT_TYPES.clone()
    }
}

impl Types {
    /// Build a registry from declarations.
    ///
    /// Fails unless the set is non-empty, every name is a word, names are
    /// unique, every pattern compiles without named groups, and exactly one
    /// type is implicit.
    pub fn new(defs: impl IntoIterator<Item = TypeDef>) -> Result<Self, TypesError> {
        let defs: Vec<TypeDef> = defs.into_iter().collect();
        if defs.is_empty() {
            return Err(TypesError::Empty);
        }

        let mut types: Vec<Type> = Vec::with_capacity(defs.len());
        for def in defs {
            if def.name.is_empty() || !def.name.chars().all(is_identifier_char) {
                return Err(TypesError::InvalidName { name: def.name });
            }
            if types.iter().any(|t| t.name == def.name) {
                return Err(TypesError::DuplicateName { name: def.name });
            }
            types.push(compile_type(def)?);
        }

        let implicit: Vec<usize> = types
            .iter()
            .enumerate()
            .filter(|(_, t)| t.implicit)
            .map(|(i, _)| i)
            .collect();
        let implicit = match implicit.as_slice() {
            [] => return Err(TypesError::MissingImplicit),
            [one] => *one,
            many => {
                return Err(TypesError::MultipleImplicit {
                    names: many.iter().map(|&i| types[i].name.clone()).collect(),
                });
            }
        };

        Ok(Self {
            inner: Arc::new(TypesInner { types, implicit }),
        })
    }

    /// Start from the default table.
    pub fn builder() -> TypesBuilder {
        Self::builder_empty().extend_defaults()
    }

    /// Start from an empty table.
    pub fn builder_empty() -> TypesBuilder {
        TypesBuilder::default()
    }

    /// Look up a type by name.
    pub fn get(&self, name: &str) -> Option<&Type> {
        self.inner.types.iter().find(|t| t.name == name)
    }

    /// The type used by attributes without an explicit `:type`.
    pub fn implicit(&self) -> &Type {
        &self.inner.types[self.inner.implicit]
    }

    /// Resolve an attribute's optional type name.
    pub fn resolve(&self, type_name: Option<&str>) -> Option<&Type> {
        match type_name {
            Some(name) => self.get(name),
            None => Some(self.implicit()),
        }
    }

    /// Iterate over types in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = &Type> {
        self.inner.types.iter()
    }

    /// Number of declared types.
    pub fn len(&self) -> usize {
        self.inner.types.len()
    }

    /// Always false for a built registry; provided for symmetry with `len`.
    pub fn is_empty(&self) -> bool {
        self.inner.types.is_empty()
    }
}

fn compile_type(def: TypeDef) -> Result<Type, TypesError> {
    // Probe the bare fragment first so errors point at the user's pattern.
    let probe = Regex::new(&format!("(?:{})", def.pattern)).map_err(|e| {
        TypesError::InvalidPattern {
            name: def.name.clone(),
            pattern: def.pattern.clone(),
            message: e.to_string(),
        }
    })?;
    if probe.capture_names().flatten().next().is_some() {
        return Err(TypesError::NamedGroup {
            name: def.name,
            pattern: def.pattern,
        });
    }

    let full_match = Regex::new(&format!("^(?:{})$", def.pattern)).map_err(|e| {
        TypesError::InvalidPattern {
            name: def.name.clone(),
            pattern: def.pattern.clone(),
            message: e.to_string(),
        }
    })?;

    Ok(Type {
        name: def.name,
        pattern: def.pattern,
        implicit: def.implicit,
        full_match,
    })
}

/// Builder for [`Types`].
///
/// Adding a name that already exists replaces its pattern in place, so custom
/// tables can override defaults.
#[derive(Debug, Clone, Default)]
pub struct TypesBuilder {
    defs: Vec<TypeDef>,
    implicit: Option<String>,
}

impl TypesBuilder {
    fn extend_defaults(mut self) -> Self {
        for (name, pattern) in DEFAULT_TYPE_PATTERNS {
            self = self.add(*name, *pattern);
        }
        if self.implicit.is_none() {
            self.implicit = Some(DEFAULT_IMPLICIT_TYPE.to_string());
        }
        self
    }

    /// Declare or override a type.
    pub fn add(mut self, name: impl Into<String>, pattern: impl Into<String>) -> Self {
        let def = TypeDef::new(name, pattern);
        match self.defs.iter_mut().find(|d| d.name == def.name) {
            Some(existing) => existing.pattern = def.pattern,
            None => self.defs.push(def),
        }
        self
    }

    /// Choose the implicit type by name.
    pub fn implicit(mut self, name: impl Into<String>) -> Self {
        self.implicit = Some(name.into());
        self
    }

    /// Validate and build the registry.
    pub fn build(self) -> Result<Types, TypesError> {
        let mut defs = self.defs;
        let empty = defs.is_empty();
        if let Some(name) = self.implicit {
            match defs.iter_mut().find(|d| d.name == name) {
                Some(def) => def.implicit = true,
                None if empty => return Err(TypesError::Empty),
                None => return Err(TypesError::UnknownImplicit { name }),
            }
        }
        Types::new(defs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_registry() {
        let types = Types::default();
        assert_eq!(types.len(), 7);
        assert_eq!(types.implicit().name(), "any");
        assert_eq!(types.get("number").map(Type::pattern), Some(r"[0-9]+"));
        let names: Vec<&str> = types.iter().map(Type::name).collect();
        assert_eq!(
            names,
            vec!["any", "alnum", "alpha", "date", "digit", "number", "word"]
        );
    }

    #[test]
    fn test_full_match_is_anchored() {
        let types = Types::default();
        let number = types.get("number").unwrap();
        assert!(number.matches("123"));
        assert!(!number.matches("12a"));
        assert!(!number.matches(""));
        let date = types.get("date").unwrap();
        assert!(date.matches("2024-01-31"));
        assert!(!date.matches("2024-1-31"));
    }

    #[test]
    fn test_default_classes_are_ascii() {
        let types = Types::default();
        let number = types.get("number").unwrap();
        assert!(!number.matches("\u{0664}\u{0662}"));
        assert!(!number.matches("４２"));
        assert!(!types.get("digit").unwrap().matches("\u{0664}"));
        assert!(!types.get("date").unwrap().matches("\u{0662}024-01-31"));

        let word = types.get("word").unwrap();
        assert!(word.matches("snake_case_42"));
        assert!(!word.matches("café"));
    }

    #[test]
    fn test_resolve_falls_back_to_implicit() {
        let types = Types::default();
        assert_eq!(types.resolve(None).map(Type::name), Some("any"));
        assert_eq!(types.resolve(Some("alpha")).map(Type::name), Some("alpha"));
        assert!(types.resolve(Some("uuid")).is_none());
    }

    #[test]
    fn test_builder_overrides_and_extends() {
        let types = Types::builder()
            .add("number", "[0-9]{1,3}")
            .add("slug", "[a-z0-9-]+")
            .implicit("slug")
            .build()
            .unwrap();
        assert_eq!(types.get("number").unwrap().pattern(), "[0-9]{1,3}");
        assert_eq!(types.len(), 8);
        assert_eq!(types.implicit().name(), "slug");
        assert!(!types.get("any").unwrap().is_implicit());
    }

    #[test]
    fn test_empty_registry_rejected() {
        assert_eq!(Types::new(Vec::new()), Err(TypesError::Empty));
        assert_eq!(Types::builder_empty().build(), Err(TypesError::Empty));
        assert_eq!(
            Types::builder_empty().implicit("any").build(),
            Err(TypesError::Empty)
        );
    }

    #[test]
    fn test_missing_and_multiple_implicit() {
        let err = Types::new(vec![TypeDef::new("a", "x")]).unwrap_err();
        assert_eq!(err, TypesError::MissingImplicit);

        let err = Types::new(vec![
            TypeDef::new("a", "x").implicit(),
            TypeDef::new("b", "y").implicit(),
        ])
        .unwrap_err();
        assert!(matches!(err, TypesError::MultipleImplicit { names } if names == vec!["a", "b"]));
    }

    #[test]
    fn test_invalid_name_and_pattern() {
        let err = Types::new(vec![TypeDef::new("bad name", "x").implicit()]).unwrap_err();
        assert!(matches!(err, TypesError::InvalidName { .. }));

        let err = Types::new(vec![TypeDef::new("broken", "[a-").implicit()]).unwrap_err();
        assert!(matches!(err, TypesError::InvalidPattern { .. }));

        let err = Types::new(vec![TypeDef::new("named", "(?P<x>a)").implicit()]).unwrap_err();
        assert!(matches!(err, TypesError::NamedGroup { .. }));
    }

    #[test]
    fn test_unknown_implicit_in_builder() {
        let err = Types::builder().implicit("nope").build().unwrap_err();
        assert_eq!(err, TypesError::UnknownImplicit { name: "nope".into() });
    }
}
