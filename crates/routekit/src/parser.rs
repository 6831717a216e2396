//! Recursive-descent parser for route definitions.
//!
//! ```text
//! route      := (static | attribute | optional)*
//! static     := text-not-in "{}[]"
//! attribute  := "{" name (":" type)? "}"
//! optional   := "[" route "]"
//! ```
//!
//! Names and types are 1 to [`MAX_NAME_LENGTH`] identifier characters. The
//! parser checks duplicate attribute names and unknown types as it goes, so
//! a returned [`Path`] is always valid for the registry it was parsed with.

use crate::MAX_NAME_LENGTH;
use crate::cursor::Cursor;
use crate::error::{DefinitionError, DefinitionResult};
use crate::path::Path;
use crate::types::Types;

const STATIC_STOP: &[char] = &['{', '}', '[', ']'];

/// Parse `definition` against `types`.
///
/// # Errors
///
/// Returns a [`DefinitionError`] carrying the character position for any
/// syntax error, or the semantic error for a duplicate attribute name or an
/// unknown type.
///
/// # Example
/// ```rust,ignore
/// let path = routekit::parse("/users/{id:number}", &Types::default())?;
/// assert_eq!(path.to_string(), "/users/{id:number}");
/// ```
pub fn parse(definition: &str, types: &Types) -> DefinitionResult<Path> {
    let mut parser = Parser {
        cursor: Cursor::new(definition),
        definition,
        types,
        seen: Vec::new(),
    };
    let path = parser.parse_route()?;
    parser.check_leftover()?;
    tracing::trace!(definition = %definition, "Definition parsed");
    Ok(path)
}

struct Parser<'a> {
    cursor: Cursor<'a>,
    definition: &'a str,
    types: &'a Types,
    seen: Vec<String>,
}

impl Parser<'_> {
    fn parse_route(&mut self) -> DefinitionResult<Path> {
        match self.cursor.peek() {
            None | Some(']') => Ok(Path::Empty),
            Some('{') => self.parse_attribute(),
            Some('[') => self.parse_optional(),
            Some('}') => Err(self.cursor.unexpected('}', Vec::new())),
            Some(_) => self.parse_static(),
        }
    }

    fn parse_static(&mut self) -> DefinitionResult<Path> {
        let text = self.cursor.take_all_until(STATIC_STOP);
        let next = self.parse_route()?;
        Ok(Path::literal(text, next))
    }

    fn parse_attribute(&mut self) -> DefinitionResult<Path> {
        self.cursor.expect('{')?;

        let name_at = self.cursor.index();
        let name = self.cursor.take_all_alnum_until(&[':', '}'])?;
        if name.is_empty() {
            return Err(DefinitionError::EmptyAttributeName {
                at: self.cursor.location_at(name_at),
            });
        }
        if name.chars().count() > MAX_NAME_LENGTH {
            return Err(DefinitionError::AttributeNameTooLong {
                name,
                at: self.cursor.location_at(name_at),
            });
        }
        if self.seen.contains(&name) {
            return Err(DefinitionError::AmbiguousAttribute {
                definition: self.definition.to_string(),
                names: vec![name],
            });
        }

        let type_name = if self.cursor.peek() == Some(':') {
            self.cursor.take();
            Some(self.parse_type(&name)?)
        } else {
            None
        };

        self.cursor.expect('}')?;
        self.seen.push(name.clone());

        let next = self.parse_route()?;
        Ok(Path::Attribute {
            name,
            type_name,
            next: Box::new(next),
        })
    }

    fn parse_type(&mut self, attribute: &str) -> DefinitionResult<String> {
        let type_at = self.cursor.index();
        let type_name = self.cursor.take_all_alnum_until(&['}'])?;
        if type_name.is_empty() {
            return Err(DefinitionError::EmptyTypeName {
                at: self.cursor.location_at(type_at),
            });
        }
        if type_name.chars().count() > MAX_NAME_LENGTH {
            return Err(DefinitionError::TypeNameTooLong {
                type_name,
                at: self.cursor.location_at(type_at),
            });
        }
        if self.types.get(&type_name).is_none() {
            return Err(DefinitionError::UnknownType {
                definition: self.definition.to_string(),
                attribute: attribute.to_string(),
                type_name,
            });
        }
        Ok(type_name)
    }

    fn parse_optional(&mut self) -> DefinitionResult<Path> {
        self.cursor.expect('[')?;
        let inner = self.parse_route()?;
        self.check_suffix()?;
        self.cursor.expect(']')?;
        Ok(Path::optional(inner))
    }

    /// A nested optional closed with `]` must be followed by the closing `]`
    /// of its parent (or the end of input).
    fn check_suffix(&self) -> DefinitionResult<()> {
        match self.cursor.peek() {
            Some(c) if c != ']' && self.cursor.last() == Some(']') => {
                Err(DefinitionError::OptionalNotSuffix {
                    at: self.cursor.location(),
                })
            }
            _ => Ok(()),
        }
    }

    fn check_leftover(&self) -> DefinitionResult<()> {
        self.check_suffix()?;
        match self.cursor.peek() {
            Some(found) => Err(self.cursor.unexpected(found, Vec::new())),
            None => Ok(()),
        }
    }
}
