//! One alternation over every route.

use super::pattern::{Bindings, GroupNames, MarkedPattern, write_leaf, write_path};
use super::{Matcher, Outcome, Strategy};
use crate::error::CompileError;
use crate::route::RouteCollection;

/// `^(?:P0\{\}M0(?P<m0>)|P1\{\}M1(?P<m1>)|...)$` evaluated against
/// `<path>{}<method>`.
///
/// Leftmost-first alternation makes the lowest-index matching route win.
/// Allowed methods are recovered by re-running the pattern once per known
/// method.
#[derive(Debug)]
pub struct SinglePatternMatcher {
    inner: MarkedPattern,
}

impl SinglePatternMatcher {
    pub fn compile<H>(routes: &RouteCollection<H>) -> Result<Self, CompileError> {
        let mut groups = GroupNames::default();
        let mut bindings: Vec<Bindings> = Vec::with_capacity(routes.len());
        let mut alternatives = Vec::with_capacity(routes.len());

        for (index, route) in routes.iter().enumerate() {
            let mut out = String::new();
            let mut bound = Bindings::new();
            write_path(&mut out, route.path(), route.types(), &mut groups, &mut bound);
            write_leaf(&mut out, route.method(), index);
            alternatives.push(out);
            bindings.push(bound);
        }

        let body = if alternatives.is_empty() {
            None
        } else {
            Some(format!("(?:{})", alternatives.join("|")))
        };

        Ok(Self {
            inner: MarkedPattern::new(
                Strategy::SinglePattern,
                body,
                bindings,
                routes.known_methods(),
            )?,
        })
    }
}

impl Matcher for SinglePatternMatcher {
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
