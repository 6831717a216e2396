//! Error types for route compilation, matching and URI generation.
//!
//! Errors are grouped by the phase that raises them:
//!
//! - [`DefinitionError`]: the definition string is malformed (syntax) or
//!   contradicts itself (duplicate attributes, unknown types)
//! - [`TypesError`]: a types registry could not be built
//! - [`RouteError`]: a route could not be registered
//! - [`CompileError`]: a matcher could not be built from a route collection
//! - [`UriError`]: a URI could not be generated from a route and its values
//! - [`ConfigError`]: a router configuration is inconsistent
//!
//! Every definition/type error is a registration-time failure. A request that
//! matches nothing is *not* an error of this module; see
//! [`MatchFailure`](crate::MatchFailure).
//!
//! # Example
//! ```rust,ignore
//! use routekit::{parse, DefinitionError, Types};
//!
//! let err = parse("/users/{}", &Types::default()).unwrap_err();
//! assert!(matches!(err, DefinitionError::EmptyAttributeName { .. }));
//! println!("{err}");
//! // attribute name missing at index 8
//! // /users/{}
//! //         ^
//! ```

use crate::compiler::Strategy;
use std::fmt;
use thiserror::Error;

// =============================================================================
// Locations
// =============================================================================

/// A character position inside a route definition.
///
/// Displays as the definition followed by a caret under the offending
/// character, so it can be appended to any message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Location {
    /// The full definition being parsed.
    pub definition: String,
    /// Character (not byte) index of the offending position.
    pub index: usize,
}

impl Location {
    /// Create a location for `definition` at character `index`.
    pub fn new(definition: impl Into<String>, index: usize) -> Self {
        Self {
            definition: definition.into(),
            index,
        }
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}\n{}^", self.definition, " ".repeat(self.index))
    }
}

fn describe_expected(expected: &[char]) -> String {
    match expected {
        [] => String::new(),
        [only] => format!(", expected '{}'", only),
        many => {
            let list: Vec<String> = many.iter().map(|c| format!("'{}'", c)).collect();
            format!(", expected one of {}", list.join(", "))
        }
    }
}

// =============================================================================
// Definition Errors
// =============================================================================

/// Error raised while parsing or validating a route definition.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DefinitionError {
    /// The definition ended where more input was required.
    #[error("unexpected end of definition{}\n{at}", describe_expected(.expected))]
    UnexpectedEnd {
        /// Where the input ran out.
        at: Location,
        /// Characters that would have been accepted.
        expected: Vec<char>,
    },

    /// A character appeared where it is not allowed.
    #[error("unexpected '{found}' at index {}{}\n{at}", .at.index, describe_expected(.expected))]
    UnexpectedChar {
        /// The offending character.
        found: char,
        /// Its position.
        at: Location,
        /// Characters that would have been accepted, if known.
        expected: Vec<char>,
    },

    /// `{}` or `{:type}`.
    #[error("attribute name missing at index {}\n{at}", .at.index)]
    EmptyAttributeName {
        /// Position where the name should start.
        at: Location,
    },

    /// Attribute name longer than [`MAX_NAME_LENGTH`](crate::MAX_NAME_LENGTH).
    #[error("attribute name '{name}' is too long at index {}\n{at}", .at.index)]
    AttributeNameTooLong {
        /// The rejected name.
        name: String,
        /// Position of the name.
        at: Location,
    },

    /// `{name:}`.
    #[error("attribute type missing at index {}\n{at}", .at.index)]
    EmptyTypeName {
        /// Position where the type should start.
        at: Location,
    },

    /// Type name longer than [`MAX_NAME_LENGTH`](crate::MAX_NAME_LENGTH).
    #[error("attribute type '{type_name}' is too long at index {}\n{at}", .at.index)]
    TypeNameTooLong {
        /// The rejected type name.
        type_name: String,
        /// Position of the type name.
        at: Location,
    },

    /// Something follows a closed optional sequence.
    #[error("optional sequence must be a suffix, found more input at index {}\n{at}", .at.index)]
    OptionalNotSuffix {
        /// Position of the first character after the `]`.
        at: Location,
    },

    /// The same attribute name is declared more than once.
    #[error("ambiguous attribute name(s) {} in '{definition}'", quote_all(.names))]
    AmbiguousAttribute {
        /// The definition, reconstructed from its AST.
        definition: String,
        /// Every name that occurs more than once.
        names: Vec<String>,
    },

    /// An attribute refers to a type the registry does not know.
    #[error("unknown type '{type_name}' for attribute '{attribute}' in '{definition}'")]
    UnknownType {
        /// The definition, reconstructed from its AST.
        definition: String,
        /// The attribute declaring the type.
        attribute: String,
        /// The unknown type name.
        type_name: String,
    },
}

fn quote_all(names: &[String]) -> String {
    names
        .iter()
        .map(|n| format!("'{}'", n))
        .collect::<Vec<_>>()
        .join(", ")
}

impl DefinitionError {
    /// The position of a syntax error, `None` for semantic errors.
    pub fn location(&self) -> Option<&Location> {
        match self {
            Self::UnexpectedEnd { at, .. }
            | Self::UnexpectedChar { at, .. }
            | Self::EmptyAttributeName { at }
            | Self::AttributeNameTooLong { at, .. }
            | Self::EmptyTypeName { at }
            | Self::TypeNameTooLong { at, .. }
            | Self::OptionalNotSuffix { at } => Some(at),
            Self::AmbiguousAttribute { .. } | Self::UnknownType { .. } => None,
        }
    }

    /// Returns true for errors raised by the grammar rather than the validator.
    pub fn is_syntax_error(&self) -> bool {
        self.location().is_some()
    }
}

/// Result type alias for definition parsing.
pub type DefinitionResult<T> = Result<T, DefinitionError>;

// =============================================================================
// Types Registry Errors
// =============================================================================

/// Error raised while building a [`Types`](crate::Types) registry.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TypesError {
    /// No type was declared.
    #[error("types registry must declare at least one type")]
    Empty,

    /// No type is marked implicit.
    #[error("types registry has no implicit type")]
    MissingImplicit,

    /// More than one type is marked implicit.
    #[error("types registry has several implicit types: {}", .names.join(", "))]
    MultipleImplicit {
        /// Every type marked implicit.
        names: Vec<String>,
    },

    /// Name does not match `^\w+$`.
    #[error("invalid type name '{name}'")]
    InvalidName {
        /// The rejected name.
        name: String,
    },

    /// The same name was declared twice.
    #[error("type '{name}' is declared more than once")]
    DuplicateName {
        /// The repeated name.
        name: String,
    },

    /// The implicit type refers to an undeclared name.
    #[error("implicit type '{name}' is not declared")]
    UnknownImplicit {
        /// The undeclared name.
        name: String,
    },

    /// The pattern is not a valid regular expression fragment.
    #[error("invalid pattern for type '{name}': {message}")]
    InvalidPattern {
        /// Type name.
        name: String,
        /// The rejected pattern.
        pattern: String,
        /// Message from the regex compiler.
        message: String,
    },

    /// The pattern declares a named group, which would clash with matcher groups.
    #[error("pattern for type '{name}' must not declare named groups: {pattern}")]
    NamedGroup {
        /// Type name.
        name: String,
        /// The rejected pattern.
        pattern: String,
    },
}

// =============================================================================
// Route Errors
// =============================================================================

/// Error raised while registering a route.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RouteError {
    /// The definition could not be parsed or validated.
    #[error("invalid route {method} '{definition}': {source}")]
    Definition {
        /// Method of the rejected route.
        method: String,
        /// Definition of the rejected route.
        definition: String,
        /// The underlying parse or validation error.
        #[source]
        source: DefinitionError,
    },

    /// The method is not a valid HTTP token.
    #[error("invalid HTTP method '{method}'")]
    InvalidMethod {
        /// The rejected method.
        method: String,
    },

    /// Another route already uses this name.
    #[error("route name '{name}' is already registered")]
    DuplicateName {
        /// The repeated name.
        name: String,
    },

    /// A custom types registry could not be built.
    #[error(transparent)]
    Types(#[from] TypesError),
}

impl RouteError {
    /// Wrap a definition error with the route it belongs to.
    pub fn definition(
        method: impl Into<String>,
        definition: impl Into<String>,
        source: DefinitionError,
    ) -> Self {
        Self::Definition {
            method: method.into(),
            definition: definition.into(),
            source,
        }
    }
}

/// Result type alias for route registration.
pub type RouteResult<T> = Result<T, RouteError>;

// =============================================================================
// Compile Errors
// =============================================================================

/// Error raised while compiling a route collection into a matcher.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CompileError {
    /// The generated regular expression was rejected (usually its size limit).
    #[error("{strategy} strategy could not build its pattern: {message}")]
    Pattern {
        /// Strategy that generated the pattern.
        strategy: Strategy,
        /// Message from the regex compiler.
        message: String,
    },
}

impl CompileError {
    pub(crate) fn pattern(strategy: Strategy, err: regex::Error) -> Self {
        Self::Pattern {
            strategy,
            message: err.to_string(),
        }
    }
}

// =============================================================================
// URI Errors
// =============================================================================

/// Error raised while generating a URI.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UriError {
    /// No route carries this name.
    #[error("no route named '{name}'")]
    UnknownRoute {
        /// The requested name.
        name: String,
    },

    /// A value required to build the URI was not supplied.
    #[error("missing value for attribute '{attribute}' of '{definition}'")]
    MissingAttribute {
        /// The route definition.
        definition: String,
        /// The attribute without a value.
        attribute: String,
    },

    /// A supplied value does not match the attribute's type.
    #[error("value '{value}' for attribute '{attribute}' does not match type '{type_name}' ({pattern})")]
    InvalidValue {
        /// The attribute.
        attribute: String,
        /// The rejected value.
        value: String,
        /// The attribute's type name.
        type_name: String,
        /// The type's pattern.
        pattern: String,
    },
}

impl UriError {
    /// The attribute that caused the error, if any.
    pub fn attribute(&self) -> Option<&str> {
        match self {
            Self::UnknownRoute { .. } => None,
            Self::MissingAttribute { attribute, .. } | Self::InvalidValue { attribute, .. } => {
                Some(attribute)
            }
        }
    }
}

/// Result type alias for URI generation.
pub type UriResult<T> = Result<T, UriError>;

// =============================================================================
// Config Errors
// =============================================================================

/// Error raised by [`RouterConfig::validate`](crate::RouterConfig::validate).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// The prefix must be empty, or start with `/` and not end with one.
    #[error("invalid URI prefix '{prefix}': must be empty or start with '/' and not end with '/'")]
    InvalidUriPrefix {
        /// The rejected prefix.
        prefix: String,
    },
}

// =============================================================================
// Umbrella
// =============================================================================

/// Category of an [`Error`], for exhaustive matching without payloads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    Definition,
    Types,
    Route,
    Compile,
    Uri,
    Config,
}

/// Any error this crate can produce.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// See [`DefinitionError`].
    #[error(transparent)]
    Definition(#[from] DefinitionError),
    /// See [`TypesError`].
    #[error(transparent)]
    Types(#[from] TypesError),
    /// See [`RouteError`].
    #[error(transparent)]
    Route(#[from] RouteError),
    /// See [`CompileError`].
    #[error(transparent)]
    Compile(#[from] CompileError),
    /// See [`UriError`].
    #[error(transparent)]
    Uri(#[from] UriError),
    /// See [`ConfigError`].
    #[error(transparent)]
    Config(#[from] ConfigError),
}

impl Error {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Definition(_) => ErrorKind::Definition,
            Self::Types(_) => ErrorKind::Types,
            Self::Route(_) => ErrorKind::Route,
            Self::Compile(_) => ErrorKind::Compile,
            Self::Uri(_) => ErrorKind::Uri,
            Self::Config(_) => ErrorKind::Config,
        }
    }
}

/// Result type alias using the umbrella [`Error`].
pub type Result<T, E = Error> = std::result::Result<T, E>;
