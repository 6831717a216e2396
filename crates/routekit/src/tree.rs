//! Shared prefix tree over every route of a collection.
//!
//! Each route path is flattened into segments (literal, attribute, or an
//! optional suffix kept as one opaque unit) and inserted into a forest with
//! one [`Node::Leaf`] per route. At each level only the most recently added
//! child is considered for merging. Reading leaves left to right therefore
//! always yields routes in registration order.

use crate::method::Method;
use crate::path::Path;
use crate::route::RouteCollection;
use crate::types::{Type, Types};
use std::fmt;

/// A node of the shared tree.
#[derive(Debug, Clone)]
pub enum Node {
    /// Literal text shared by every route below.
    Static {
        text: String,
        children: Vec<Node>,
    },
    /// Attribute with its resolved type.
    Attribute {
        name: String,
        ty: Type,
        children: Vec<Node>,
    },
    /// Optional suffix; its children are always leaves.
    Optional {
        path: Path,
        types: Types,
        children: Vec<Node>,
    },
    /// End of route number `index`.
    Leaf { index: usize, method: Method },
}

impl Node {
    /// Child nodes; empty for leaves.
    pub fn children(&self) -> &[Node] {
        match self {
            Self::Static { children, .. }
            | Self::Attribute { children, .. }
            | Self::Optional { children, .. } => children,
            Self::Leaf { .. } => &[],
        }
    }

    fn children_mut(&mut self) -> Option<&mut Vec<Node>> {
        match self {
            Self::Static { children, .. }
            | Self::Attribute { children, .. }
            | Self::Optional { children, .. } => Some(children),
            Self::Leaf { .. } => None,
        }
    }

    /// Route indices of every leaf below (and including) this node, in order.
    pub fn leaves(&self) -> Vec<usize> {
        let mut out = Vec::new();
        collect_leaves(std::slice::from_ref(self), &mut out);
        out
    }

    /// Smallest route index reachable from this node.
    pub fn min_leaf(&self) -> Option<usize> {
        match self {
            Self::Leaf { index, .. } => Some(*index),
            _ => self.children().iter().filter_map(Node::min_leaf).min(),
        }
    }

    fn accepts(&self, segment: &Segment) -> bool {
        match (self, segment) {
            (Self::Static { text, .. }, Segment::Static(other)) => text == other,
            (Self::Attribute { name, ty, .. }, Segment::Attribute { name: n, ty: t }) => {
                name == n && ty == t
            }
            (
                Self::Optional { path, types, .. },
                Segment::Optional {
                    path: p,
                    types: t,
                },
            ) => path == p && types == t,
            _ => false,
        }
    }
}

fn collect_leaves(nodes: &[Node], out: &mut Vec<usize>) {
    for node in nodes {
        match node {
            Node::Leaf { index, .. } => out.push(*index),
            other => collect_leaves(other.children(), out),
        }
    }
}

/// One element of a flattened route path.
#[derive(Debug, Clone)]
enum Segment {
    Static(String),
    Attribute { name: String, ty: Type },
    Optional { path: Path, types: Types },
}

impl Segment {
    fn into_node(self, children: Vec<Node>) -> Node {
        match self {
            Self::Static(text) => Node::Static { text, children },
            Self::Attribute { name, ty } => Node::Attribute { name, ty, children },
            Self::Optional { path, types } => Node::Optional {
                path,
                types,
                children,
            },
        }
    }
}

fn serialize(path: &Path, types: &Types) -> Vec<Segment> {
    let mut segments = Vec::new();
    let mut current = path;
    loop {
        match current {
            Path::Static { text, next } => {
                segments.push(Segment::Static(text.clone()));
                current = next;
            }
            Path::Attribute {
                name,
                type_name,
                next,
            } => {
                let ty = types
                    .resolve(type_name.as_deref())
                    .unwrap_or_else(|| types.implicit())
                    .clone();
                segments.push(Segment::Attribute {
                    name: name.clone(),
                    ty,
                });
                current = next;
            }
            Path::Optional(inner) => {
                segments.push(Segment::Optional {
                    path: (**inner).clone(),
                    types: types.clone(),
                });
                break;
            }
            Path::Empty => break,
        }
    }
    segments
}

fn insert(level: &mut Vec<Node>, segments: &[Segment], leaf: Node) {
    let Some((first, rest)) = segments.split_first() else {
        level.push(leaf);
        return;
    };

    if let Some(last) = level.last_mut() {
        if last.accepts(first) {
            if let Some(children) = last.children_mut() {
                insert(children, rest, leaf);
                return;
            }
        }
    }

    let mut chain = vec![leaf];
    for segment in segments.iter().rev() {
        chain = vec![segment.clone().into_node(chain)];
    }
    level.extend(chain);
}

/// A forest of [`Node`]s with one leaf per route.
///
/// Merging only looks at the last child of each level, so routes sharing a
/// prefix converge only when registered back to back. `GET /a`, `GET /b`,
/// `POST /a` build three roots, and the two `/a` chains are matched
/// separately. Folding `POST /a` into the first chain would put its leaf
/// ahead of `GET /b`.
#[derive(Debug, Clone, Default)]
pub struct Tree {
    roots: Vec<Node>,
}

impl Tree {
    /// Merge every route of `routes` into a shared tree.
    pub fn build<H>(routes: &RouteCollection<H>) -> Self {
        let mut roots = Vec::new();
        for (index, route) in routes.iter().enumerate() {
            let segments = serialize(route.path(), route.types());
            let leaf = Node::Leaf {
                index,
                method: route.method().clone(),
            };
            insert(&mut roots, &segments, leaf);
        }
        Self { roots }
    }

    pub fn roots(&self) -> &[Node] {
        &self.roots
    }

    /// Route indices read left to right.
    pub fn leaves(&self) -> Vec<usize> {
        let mut out = Vec::new();
        collect_leaves(&self.roots, &mut out);
        out
    }

    /// Total number of nodes, leaves included.
    pub fn node_count(&self) -> usize {
        fn count(nodes: &[Node]) -> usize {
            nodes.iter().map(|n| 1 + count(n.children())).sum()
        }
        count(&self.roots)
    }
}

impl fmt::Display for Tree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fn write_level(f: &mut fmt::Formatter<'_>, nodes: &[Node], depth: usize) -> fmt::Result {
            for node in nodes {
                let indent = "  ".repeat(depth);
                match node {
                    Node::Static { text, .. } => writeln!(f, "{indent}\"{text}\"")?,
                    Node::Attribute { name, ty, .. } => {
                        writeln!(f, "{indent}{{{}:{}}}", name, ty.name())?
                    }
                    Node::Optional { path, .. } => writeln!(f, "{indent}[{path}]")?,
                    Node::Leaf { index, method } => writeln!(f, "{indent}{method} -> #{index}")?,
                }
                write_level(f, node.children(), depth + 1)?;
            }
            Ok(())
        }
        write_level(f, &self.roots, 0)
    }
}
