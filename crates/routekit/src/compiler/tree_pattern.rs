//! Marked pattern laid out over the shared prefix tree.
//!
//! Literal prefixes from the roots down are written once and their children
//! become alternations. From the first attribute or optional node on, the
//! subtree is expanded into one alternative per leaf chain, each with its
//! own group names. Leftmost-first preference then still visits routes in
//! registration order, because the tree keeps leaves in that order.
//!
//! Factoring stops at attributes. A table of `/resource/{id}/...` routes
//! shares only the `/resource/` literal, so its pattern is about the size
//! of the single pattern.

use super::pattern::{
    Bindings, GroupNames, MarkedPattern, alternation, write_attribute, write_leaf, write_path,
};
use super::{Matcher, Outcome, Strategy};
use crate::error::CompileError;
use crate::route::RouteCollection;
use crate::tree::{Node, Tree};

#[derive(Debug)]
pub struct TreePatternMatcher {
    inner: MarkedPattern,
}

struct Emitter {
    groups: GroupNames,
    bindings: Vec<Bindings>,
}

impl Emitter {
    fn level(&mut self, nodes: &[Node]) -> String {
        let alternatives: Vec<String> = nodes.iter().map(|node| self.node(node)).collect();
        alternation(alternatives)
    }

    fn node(&mut self, node: &Node) -> String {
        match node {
            Node::Static { text, children } => {
                let mut out = regex::escape(text);
                out.push_str(&self.level(children));
                out
            }
            Node::Leaf { index, method } => {
                let mut out = String::new();
                write_leaf(&mut out, method, *index);
                out
            }
            Node::Attribute { .. } | Node::Optional { .. } => {
                let mut chains = Vec::new();
                collect_chains(node, &mut Vec::new(), &mut chains);
                let alternatives = chains.iter().map(|chain| self.chain(chain)).collect();
                alternation(alternatives)
            }
        }
    }

    fn chain(&mut self, chain: &[&Node]) -> String {
        let mut out = String::new();
        let mut bound = Bindings::new();
        for node in chain {
            match node {
                Node::Static { text, .. } => out.push_str(&regex::escape(text)),
                Node::Attribute { name, ty, .. } => {
                    write_attribute(&mut out, name, ty, &mut self.groups, &mut bound)
                }
                Node::Optional { path, types, .. } => {
                    out.push_str("(?:");
                    write_path(&mut out, path, types, &mut self.groups, &mut bound);
                    out.push_str(")?");
                }
                Node::Leaf { index, method } => {
                    write_leaf(&mut out, method, *index);
                    if let Some(slot) = self.bindings.get_mut(*index) {
                        *slot = std::mem::take(&mut bound);
                    }
                }
            }
        }
        out
    }
}

fn collect_chains<'a>(node: &'a Node, prefix: &mut Vec<&'a Node>, out: &mut Vec<Vec<&'a Node>>) {
    prefix.push(node);
    if let Node::Leaf { .. } = node {
        out.push(prefix.clone());
    } else {
        for child in node.children() {
            collect_chains(child, prefix, out);
        }
    }
    prefix.pop();
}

impl TreePatternMatcher {
    pub fn compile<H>(routes: &RouteCollection<H>) -> Result<Self, CompileError> {
        Self::from_tree(&Tree::build(routes), routes)
    }

    pub(crate) fn from_tree<H>(
        tree: &Tree,
        routes: &RouteCollection<H>,
    ) -> Result<Self, CompileError> {
        let mut emitter = Emitter {
            groups: GroupNames::default(),
            bindings: vec![Bindings::new(); routes.len()],
        };
        let body = if tree.roots().is_empty() {
            None
        } else {
            Some(format!("(?:{})", emitter.level(tree.roots())))
        };

        Ok(Self {
            inner: MarkedPattern::new(
                Strategy::TreePattern,
                body,
                emitter.bindings,
                routes.known_methods(),
            )?,
        })
    }
}

impl Matcher for TreePatternMatcher {
    fn strategy(&self) -> Strategy {
        self.inner.strategy()
    }

    fn find(&self, method: &str, path: &str) -> Outcome {
        self.inner.find(method, path)
    }

    fn pattern(&self) -> Option<&str> {
        self.inner.pattern()
    }
}
