//! Step programs and the two interpreting strategies.
//!
//! A route path compiles to a list of [`Step`]s. [`run`] executes a step list
//! with backtracking and hands every successful end position to a
//! continuation, in the same preference order a regex engine would use:
//! captures try the longest slice first, optionals try their content before
//! skipping it.

use super::{AllowedMethods, Matcher, Outcome, Strategy};
use crate::method::Method;
use crate::path::{Path, PathVisitor};
use crate::route::RouteCollection;
use crate::tree::{Node, Tree};
use crate::types::Types;
use regex::Regex;
use std::collections::{BTreeMap, HashSet};

/// One instruction of a route program.
#[derive(Debug, Clone)]
pub(crate) enum Step {
    /// Match text verbatim.
    Literal(String),
    /// Bind `name` to a slice that fully matches `regex`.
    Capture { name: String, regex: Regex },
    /// Run the inner steps or skip them.
    Optional(Vec<Step>),
}

/// Captured attributes as byte ranges into the subject.
type Spans = Vec<(String, usize, usize)>;

/// Step suffixes already known to fail from a position, keyed by the address
/// of the suffix's first step.
///
/// Every slice handed to [`run`] is a suffix of a program, so that address
/// identifies the suffix and, through it, the continuation it runs into.
pub(crate) type Failed = HashSet<(usize, usize)>;

type Continuation<'c> = dyn FnMut(usize, &mut Spans, &mut Failed) -> bool + 'c;

fn suffix_key(steps: &[Step], pos: usize) -> Option<(usize, usize)> {
    steps
        .first()
        .map(|step| (std::ptr::from_ref(step) as usize, pos))
}

pub(crate) fn program(path: &Path, types: &Types) -> Vec<Step> {
    let mut writer = ProgramWriter {
        types,
        steps: Vec::new(),
    };
    path.accept(&mut writer);
    writer.steps
}

struct ProgramWriter<'a> {
    types: &'a Types,
    steps: Vec<Step>,
}

impl PathVisitor for ProgramWriter<'_> {
    type Output = ();

    fn visit_static(&mut self, text: &str, next: &Path) {
        self.steps.push(Step::Literal(text.to_string()));
        next.accept(self);
    }

    fn visit_attribute(&mut self, name: &str, type_name: Option<&str>, next: &Path) {
        let ty = self
            .types
            .resolve(type_name)
            .unwrap_or_else(|| self.types.implicit());
        self.steps.push(Step::Capture {
            name: name.to_string(),
            regex: ty.full_match().clone(),
        });
        next.accept(self);
    }

    fn visit_optional(&mut self, inner: &Path) {
        self.steps.push(Step::Optional(program(inner, self.types)));
    }

    fn visit_empty(&mut self) {}
}

/// Execute `steps` on `input` from `pos`.
///
/// Returns true as soon as the continuation does; false once every
/// alternative has been tried. A suffix that failed from a position is
/// recorded in `failed` and never re-run from it, which bounds the work to
/// one evaluation per (step, position). This holds as long as the
/// continuation's answer depends on the position alone.
pub(crate) fn run(
    steps: &[Step],
    input: &str,
    pos: usize,
    spans: &mut Spans,
    failed: &mut Failed,
    k: &mut Continuation<'_>,
) -> bool {
    let Some((step, rest)) = steps.split_first() else {
        return k(pos, spans, failed);
    };
    let key = (std::ptr::from_ref(step) as usize, pos);
    if failed.contains(&key) {
        return false;
    }

    let matched = match step {
        Step::Literal(text) => {
            input[pos..].starts_with(text.as_str())
                && run(rest, input, pos + text.len(), spans, failed, k)
        }
        Step::Capture { name, regex } => {
            let follow = match rest.first() {
                Some(Step::Literal(text)) => Some(text.as_str()),
                _ => None,
            };
            let mut matched = false;
            for end in (pos..=input.len()).rev() {
                if !input.is_char_boundary(end) {
                    continue;
                }
                if let Some(text) = follow {
                    if !input[end..].starts_with(text) {
                        continue;
                    }
                }
                if suffix_key(rest, end).is_some_and(|next| failed.contains(&next)) {
                    continue;
                }
                if !regex.is_match(&input[pos..end]) {
                    continue;
                }
                spans.push((name.clone(), pos, end));
                if run(rest, input, end, spans, failed, k) {
                    matched = true;
                    break;
                }
                spans.pop();
            }
            matched
        }
        Step::Optional(inner) => {
            let entered = {
                let mut then =
                    |p: usize, s: &mut Spans, f: &mut Failed| run(rest, input, p, s, f, &mut *k);
                run(inner, input, pos, spans, failed, &mut then)
            };
            entered || run(rest, input, pos, spans, failed, k)
        }
    };

    if !matched {
        failed.insert(key);
    }
    matched
}

fn resolve_spans(input: &str, spans: &Spans) -> Vec<(String, String)> {
    spans
        .iter()
        .map(|(name, start, end)| (name.clone(), input[*start..*end].to_string()))
        .collect()
}

// =============================================================================
// Linear
// =============================================================================

#[derive(Debug)]
struct LinearRoute {
    method: Method,
    steps: Vec<Step>,
}

/// Runs each route's program in registration order.
#[derive(Debug)]
pub struct LinearMatcher {
    routes: Vec<LinearRoute>,
}

impl LinearMatcher {
    pub fn compile<H>(routes: &RouteCollection<H>) -> Self {
        Self {
            routes: routes
                .iter()
                .map(|route| LinearRoute {
                    method: route.method().clone(),
                    steps: program(route.path(), route.types()),
                })
                .collect(),
        }
    }
}

impl Matcher for LinearMatcher {
    fn strategy(&self) -> Strategy {
        Strategy::Linear
    }

    fn find(&self, method: &str, path: &str) -> Outcome {
        let mut allowed = AllowedMethods::default();
        for (index, route) in self.routes.iter().enumerate() {
            let mut spans = Spans::new();
            let mut failed = Failed::new();
            let mut found: Option<Spans> = None;
            let mut accept = |p: usize, s: &mut Spans, _: &mut Failed| {
                if p == path.len() {
                    found = Some(s.clone());
                    true
                } else {
                    false
                }
            };
            run(&route.steps, path, 0, &mut spans, &mut failed, &mut accept);

            let Some(spans) = found else {
                continue;
            };
            if route.method == method {
                return Outcome::Matched {
                    index,
                    captures: resolve_spans(path, &spans),
                };
            }
            allowed.record(&route.method, index);
        }
        allowed.into_outcome()
    }
}

// =============================================================================
// Tree
// =============================================================================

#[derive(Debug)]
enum Op {
    Literal(String),
    Capture { name: String, regex: Regex },
    /// A single `Step::Optional` so the shared runner can drive it.
    Optional(Vec<Step>),
    Leaf { index: usize, method: Method },
}

#[derive(Debug)]
struct ArenaNode {
    op: Op,
    children: Vec<usize>,
    min_leaf: usize,
}

/// The shared tree flattened into an arena and walked depth first.
///
/// The walk is memoized on (node, position) and records the first parse
/// reaching each leaf. Subtrees whose smallest route index cannot beat the
/// current match are skipped.
#[derive(Debug)]
pub struct TreeMatcher {
    nodes: Vec<ArenaNode>,
    roots: Vec<usize>,
}

impl TreeMatcher {
    pub fn compile<H>(routes: &RouteCollection<H>) -> Self {
        Self::from_tree(&Tree::build(routes))
    }

    pub(crate) fn from_tree(tree: &Tree) -> Self {
        let mut nodes = Vec::new();
        let roots = tree
            .roots()
            .iter()
            .map(|node| flatten(node, &mut nodes))
            .collect();
        Self { nodes, roots }
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }
}

fn flatten(node: &Node, nodes: &mut Vec<ArenaNode>) -> usize {
    let op = match node {
        Node::Static { text, .. } => Op::Literal(text.clone()),
        Node::Attribute { name, ty, .. } => Op::Capture {
            name: name.clone(),
            regex: ty.full_match().clone(),
        },
        Node::Optional { path, types, .. } => {
            Op::Optional(vec![Step::Optional(program(path, types))])
        }
        Node::Leaf { index, method } => Op::Leaf {
            index: *index,
            method: method.clone(),
        },
    };
    let id = nodes.len();
    nodes.push(ArenaNode {
        op,
        children: Vec::new(),
        min_leaf: node.min_leaf().unwrap_or(usize::MAX),
    });
    let children: Vec<usize> = node
        .children()
        .iter()
        .map(|child| flatten(child, nodes))
        .collect();
    nodes[id].children = children;
    id
}

struct Walk<'a> {
    nodes: &'a [ArenaNode],
    input: &'a str,
    method: &'a str,
    visited: HashSet<(usize, usize)>,
    reached: BTreeMap<usize, (&'a Method, Spans)>,
    best: Option<usize>,
}

impl<'a> Walk<'a> {
    fn level(&mut self, ids: &[usize], pos: usize, spans: &mut Spans) {
        for &id in ids {
            self.visit(id, pos, spans);
        }
    }

    fn visit(&mut self, id: usize, pos: usize, spans: &mut Spans) {
        let nodes = self.nodes;
        let input = self.input;
        let node = &nodes[id];
        if self.best.is_some_and(|best| node.min_leaf > best) {
            return;
        }
        if !self.visited.insert((id, pos)) {
            return;
        }

        match &node.op {
            Op::Leaf { index, method } => {
                if pos != input.len() || self.reached.contains_key(index) {
                    return;
                }
                self.reached.insert(*index, (method, spans.clone()));
                if *method == self.method && self.best.is_none_or(|best| *index < best) {
                    self.best = Some(*index);
                }
            }
            Op::Literal(text) => {
                if input[pos..].starts_with(text.as_str()) {
                    self.level(&node.children, pos + text.len(), spans);
                }
            }
            Op::Capture { name, regex } => {
                for end in (pos..=input.len()).rev() {
                    if !input.is_char_boundary(end) || !regex.is_match(&input[pos..end]) {
                        continue;
                    }
                    spans.push((name.clone(), pos, end));
                    self.level(&node.children, end, spans);
                    spans.pop();
                }
            }
            Op::Optional(steps) => {
                let mut failed = Failed::new();
                let mut then = |p: usize, s: &mut Spans, _: &mut Failed| {
                    self.level(&node.children, p, s);
                    false
                };
                run(steps, input, pos, spans, &mut failed, &mut then);
            }
        }
    }
}

impl Matcher for TreeMatcher {
    fn strategy(&self) -> Strategy {
        Strategy::Tree
    }

    fn find(&self, method: &str, path: &str) -> Outcome {
        let mut walk = Walk {
            nodes: &self.nodes,
            input: path,
            method,
            visited: HashSet::new(),
            reached: BTreeMap::new(),
            best: None,
        };
        let mut spans = Spans::new();
        walk.level(&self.roots, 0, &mut spans);

        if let Some(best) = walk.best {
            if let Some((_, spans)) = walk.reached.get(&best) {
                return Outcome::Matched {
                    index: best,
                    captures: resolve_spans(path, spans),
                };
            }
        }

        let mut allowed = AllowedMethods::default();
        for (index, (method, _)) in &walk.reached {
            allowed.record(method, *index);
        }
        allowed.into_outcome()
    }
}
