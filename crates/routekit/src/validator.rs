//! Semantic checks for paths that did not come through the parser.

use crate::error::{DefinitionError, DefinitionResult};
use crate::path::{Path, PathVisitor};
use crate::types::Types;

/// Check `path` for repeated attribute names and unknown types.
///
/// Every repeated name is reported at once, in order of first repetition.
/// Name collisions take precedence over unknown types.
pub fn validate(path: &Path, types: &Types) -> DefinitionResult<()> {
    let mut validator = Validator {
        types,
        seen: Vec::new(),
        repeated: Vec::new(),
        unknown: None,
    };
    path.accept(&mut validator);

    if !validator.repeated.is_empty() {
        return Err(DefinitionError::AmbiguousAttribute {
            definition: path.to_string(),
            names: validator.repeated,
        });
    }
    if let Some((attribute, type_name)) = validator.unknown {
        return Err(DefinitionError::UnknownType {
            definition: path.to_string(),
            attribute,
            type_name,
        });
    }
    Ok(())
}

struct Validator<'a> {
    types: &'a Types,
    seen: Vec<String>,
    repeated: Vec<String>,
    unknown: Option<(String, String)>,
}

impl PathVisitor for Validator<'_> {
    type Output = ();

    fn visit_static(&mut self, _text: &str, next: &Path) {
        next.accept(self);
    }

    fn visit_attribute(&mut self, name: &str, type_name: Option<&str>, next: &Path) {
        if self.seen.iter().any(|n| n == name) {
            if !self.repeated.iter().any(|n| n == name) {
                self.repeated.push(name.to_string());
            }
        } else {
            self.seen.push(name.to_string());
        }

        if self.unknown.is_none() && self.types.resolve(type_name).is_none() {
            self.unknown = type_name.map(|t| (name.to_string(), t.to_string()));
        }

        next.accept(self);
    }

    fn visit_optional(&mut self, inner: &Path) {
        inner.accept(self);
    }

    fn visit_empty(&mut self) {}
}
