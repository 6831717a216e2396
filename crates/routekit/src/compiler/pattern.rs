//! Regex generation shared by the pattern strategies.
//!
//! Attributes become named groups with generated names (`g0`, `g1`, ...),
//! and each route's end is marked with an empty group `m<index>` so the
//! winning alternative can be read back from the captures. A binding list per
//! route maps attribute names to their group names in definition order.

use super::{AllowedMethods, Outcome, Strategy};
use crate::error::CompileError;
use crate::method::{Method, is_token};
use crate::path::{Path, PathVisitor};
use crate::types::{Type, Types};
use regex::{Captures, Regex};

/// Attribute name to generated group name, in definition order.
pub(crate) type Bindings = Vec<(String, String)>;

/// Hands out unique group names within one regex.
#[derive(Debug, Default)]
pub(crate) struct GroupNames {
    next: usize,
}

impl GroupNames {
    pub(crate) fn fresh(&mut self) -> String {
        let name = format!("g{}", self.next);
        self.next += 1;
        name
    }
}

/// Name of the empty group marking the end of route `index`.
pub(crate) fn mark_name(index: usize) -> String {
    format!("m{}", index)
}

/// The string matched by marked patterns: `<path>{}<method>`.
///
/// Methods are HTTP tokens and never contain braces, so the last `{}` always
/// separates the path from the method.
pub(crate) fn subject(path: &str, method: &str) -> String {
    format!("{}{{}}{}", path, method)
}

/// `\{\}METHOD(?P<mN>)`.
pub(crate) fn write_leaf(out: &mut String, method: &Method, index: usize) {
    out.push_str(r"\{\}");
    out.push_str(&regex::escape(method.as_str()));
    out.push_str("(?P<");
    out.push_str(&mark_name(index));
    out.push_str(">)");
}

pub(crate) fn write_attribute(
    out: &mut String,
    name: &str,
    ty: &Type,
    groups: &mut GroupNames,
    bindings: &mut Bindings,
) {
    let group = groups.fresh();
    out.push_str("(?P<");
    out.push_str(&group);
    out.push('>');
    out.push_str(ty.pattern());
    out.push(')');
    bindings.push((name.to_string(), group));
}

/// Render `path` as an unanchored regex fragment.
pub(crate) fn write_path(
    out: &mut String,
    path: &Path,
    types: &Types,
    groups: &mut GroupNames,
    bindings: &mut Bindings,
) {
    path.accept(&mut PatternWriter {
        out,
        types,
        groups,
        bindings,
    });
}

struct PatternWriter<'a> {
    out: &'a mut String,
    types: &'a Types,
    groups: &'a mut GroupNames,
    bindings: &'a mut Bindings,
}

impl PathVisitor for PatternWriter<'_> {
    type Output = ();

    fn visit_static(&mut self, text: &str, next: &Path) {
        self.out.push_str(&regex::escape(text));
        next.accept(self);
    }

    fn visit_attribute(&mut self, name: &str, type_name: Option<&str>, next: &Path) {
        let ty = self
            .types
            .resolve(type_name)
            .unwrap_or_else(|| self.types.implicit());
        write_attribute(self.out, name, ty, self.groups, self.bindings);
        next.accept(self);
    }

    fn visit_optional(&mut self, inner: &Path) {
        self.out.push_str("(?:");
        inner.accept(self);
        self.out.push_str(")?");
    }

    fn visit_empty(&mut self) {}
}

/// `(?:a|b|c)`, or the only alternative unwrapped.
pub(crate) fn alternation(alternatives: Vec<String>) -> String {
    if alternatives.len() == 1 {
        alternatives.into_iter().collect()
    } else {
        format!("(?:{})", alternatives.join("|"))
    }
}

pub(crate) fn build_regex(pattern: &str, strategy: Strategy) -> Result<Regex, CompileError> {
    Regex::new(pattern).map_err(|e| CompileError::pattern(strategy, e))
}

/// Values of the groups in `bindings` that took part in the match.
pub(crate) fn extract(captures: &Captures<'_>, bindings: &Bindings) -> Vec<(String, String)> {
    bindings
        .iter()
        .filter_map(|(attribute, group)| {
            captures
                .name(group)
                .map(|m| (attribute.clone(), m.as_str().to_string()))
        })
        .collect()
}

// =============================================================================
// Marked pattern
// =============================================================================

/// One regex over `<path>{}<method>` whose alternatives end in route marks.
///
/// Shared by the single-pattern and tree-pattern strategies, which differ
/// only in how the pattern text is laid out.
#[derive(Debug)]
pub(crate) struct MarkedPattern {
    strategy: Strategy,
    pattern: String,
    regex: Option<Regex>,
    /// (capture group index, route index) for every mark.
    marks: Vec<(usize, usize)>,
    /// Per route, attribute bindings.
    bindings: Vec<Bindings>,
    /// Distinct route methods in order of first registration.
    known: Vec<Method>,
}

impl MarkedPattern {
    /// Anchor `body` and compile it. An empty route set compiles to no regex.
    pub(crate) fn new(
        strategy: Strategy,
        body: Option<String>,
        bindings: Vec<Bindings>,
        known: Vec<Method>,
    ) -> Result<Self, CompileError> {
        let Some(body) = body else {
            return Ok(Self {
                strategy,
                pattern: String::new(),
                regex: None,
                marks: Vec::new(),
                bindings,
                known,
            });
        };

        let pattern = format!("^{}$", body);
        let regex = build_regex(&pattern, strategy)?;
        let mut marks: Vec<(usize, usize)> = regex
            .capture_names()
            .enumerate()
            .filter_map(|(group, name)| {
                let index = name?.strip_prefix('m')?.parse::<usize>().ok()?;
                Some((group, index))
            })
            .collect();
        marks.sort_by_key(|(_, index)| *index);

        Ok(Self {
            strategy,
            pattern,
            regex: Some(regex),
            marks,
            bindings,
            known,
        })
    }

    pub(crate) fn strategy(&self) -> Strategy {
        self.strategy
    }

    pub(crate) fn pattern(&self) -> Option<&str> {
        self.regex.as_ref().map(|_| self.pattern.as_str())
    }

    /// Index and captures of the route matching `path` with `method`.
    fn lookup(&self, path: &str, method: &str) -> Option<(usize, Vec<(String, String)>)> {
        let regex = self.regex.as_ref()?;
        let subject = subject(path, method);
        let captures = regex.captures(&subject)?;
        let index = self
            .marks
            .iter()
            .find(|(group, _)| captures.get(*group).is_some())
            .map(|(_, index)| *index)?;
        let bound = self
            .bindings
            .get(index)
            .map(|b| extract(&captures, b))
            .unwrap_or_default();
        Some((index, bound))
    }

    pub(crate) fn find(&self, method: &str, path: &str) -> Outcome {
        if is_token(method) {
            if let Some((index, captures)) = self.lookup(path, method) {
                return Outcome::Matched { index, captures };
            }
        }

        let mut allowed = AllowedMethods::default();
        for known in &self.known {
            if let Some((index, _)) = self.lookup(path, known.as_str()) {
                allowed.record(known, index);
            }
        }
        allowed.into_outcome()
    }
}
