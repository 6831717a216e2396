//! Route-path abstract syntax tree.
//!
//! A parsed definition is a forward-chained list of [`Path`] nodes terminated
//! by [`Path::Empty`]. An [`Path::Optional`] carries its own inner chain and is
//! always the last node of the chain that contains it.
//!
//! Traversal goes through [`PathVisitor`]: [`Path::accept`] dispatches to the
//! visitor method for the node's variant and the visitor decides whether (and
//! how) to continue into the `next` node.
//!
//! # Example
//! ```rust,ignore
//! use routekit::Path;
//!
//! // "/users/{id:number}[/edit]"
//! let path = Path::literal(
//!     "/users/",
//!     Path::attribute("id", Some("number"), Path::optional(Path::literal("/edit", Path::Empty))),
//! );
//! assert_eq!(path.to_string(), "/users/{id:number}[/edit]");
//! ```

use std::fmt;

/// One node of a route definition.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Path {
    /// Literal text.
    Static {
        /// Text to match verbatim.
        text: String,
        /// Rest of the chain.
        next: Box<Path>,
    },
    /// Named parameter, `{name}` or `{name:type}`.
    Attribute {
        /// Attribute name.
        name: String,
        /// Explicit type name; `None` means the registry's implicit type.
        type_name: Option<String>,
        /// Rest of the chain.
        next: Box<Path>,
    },
    /// Optional suffix, `[...]`.
    Optional(Box<Path>),
    /// End of a chain.
    Empty,
}

/// Traversal protocol over [`Path`] nodes, one method per variant.
pub trait PathVisitor {
    /// Value produced for each visited node.
    type Output;

    /// Visit a literal node.
    fn visit_static(&mut self, text: &str, next: &Path) -> Self::Output;

    /// Visit an attribute node.
    fn visit_attribute(&mut self, name: &str, type_name: Option<&str>, next: &Path)
    -> Self::Output;

    /// Visit an optional suffix.
    fn visit_optional(&mut self, inner: &Path) -> Self::Output;

    /// Visit the end of a chain.
    fn visit_empty(&mut self) -> Self::Output;
}

/// An attribute declared by a path, with its requiredness.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attribute {
    /// Attribute name.
    pub name: String,
    /// Explicit type name, `None` for the implicit type.
    pub type_name: Option<String>,
    /// False exactly when the attribute sits inside an optional suffix.
    pub required: bool,
}

impl Path {
    /// A literal node followed by `next`.
    pub fn literal(text: impl Into<String>, next: Path) -> Self {
        Self::Static {
            text: text.into(),
            next: Box::new(next),
        }
    }

    /// An attribute node followed by `next`.
    pub fn attribute(name: impl Into<String>, type_name: Option<&str>, next: Path) -> Self {
        Self::Attribute {
            name: name.into(),
            type_name: type_name.map(str::to_string),
            next: Box::new(next),
        }
    }

    /// An optional suffix wrapping `inner`.
    pub fn optional(inner: Path) -> Self {
        Self::Optional(Box::new(inner))
    }

    /// Dispatch to the visitor method for this node.
    pub fn accept<V: PathVisitor + ?Sized>(&self, visitor: &mut V) -> V::Output {
        match self {
            Self::Static { text, next } => visitor.visit_static(text, next),
            Self::Attribute {
                name,
                type_name,
                next,
            } => visitor.visit_attribute(name, type_name.as_deref(), next),
            Self::Optional(inner) => visitor.visit_optional(inner),
            Self::Empty => visitor.visit_empty(),
        }
    }

    /// Returns true for the chain terminator.
    pub fn is_empty(&self) -> bool {
        matches!(self, Self::Empty)
    }

    /// Every attribute along the chain, in definition order.
    pub fn attributes(&self) -> Vec<Attribute> {
        let mut collector = AttributeCollector {
            required: true,
            found: Vec::new(),
        };
        self.accept(&mut collector);
        collector.found
    }

    /// Returns true if the chain declares no attribute at all.
    pub fn is_static(&self) -> bool {
        self.attributes().is_empty()
    }
}

struct AttributeCollector {
    required: bool,
    found: Vec<Attribute>,
}

impl PathVisitor for AttributeCollector {
    type Output = ();

    fn visit_static(&mut self, _text: &str, next: &Path) {
        next.accept(self);
    }

    fn visit_attribute(&mut self, name: &str, type_name: Option<&str>, next: &Path) {
        self.found.push(Attribute {
            name: name.to_string(),
            type_name: type_name.map(str::to_string),
            required: self.required,
        });
        next.accept(self);
    }

    fn visit_optional(&mut self, inner: &Path) {
        let required = std::mem::replace(&mut self.required, false);
        inner.accept(self);
        self.required = required;
    }

    fn visit_empty(&mut self) {}
}

/// Writes the definition text back out.
struct DefinitionWriter<'a, 'b> {
    f: &'a mut fmt::Formatter<'b>,
}

impl PathVisitor for DefinitionWriter<'_, '_> {
    type Output = fmt::Result;

    fn visit_static(&mut self, text: &str, next: &Path) -> fmt::Result {
        self.f.write_str(text)?;
        next.accept(self)
    }

    fn visit_attribute(&mut self, name: &str, type_name: Option<&str>, next: &Path) -> fmt::Result {
        match type_name {
            Some(type_name) => write!(self.f, "{{{}:{}}}", name, type_name)?,
            None => write!(self.f, "{{{}}}", name)?,
        }
        next.accept(self)
    }

    fn visit_optional(&mut self, inner: &Path) -> fmt::Result {
        self.f.write_str("[")?;
        inner.accept(self)?;
        self.f.write_str("]")
    }

    fn visit_empty(&mut self) -> fmt::Result {
        Ok(())
    }
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.accept(&mut DefinitionWriter { f })
    }
}
