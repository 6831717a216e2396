//! Compilers turning a route collection into an executable [`Matcher`].
//!
//! Five strategies are available and all of them agree on every request:
//! the winner is the lowest-index route whose path and method both match,
//! and a failure lists, per method, the first route whose path matched.
//!
//! | strategy         | executes                                                  |
//! |------------------|-----------------------------------------------------------|
//! | `multi_pattern`  | one anchored regex per route, tried in order              |
//! | `single_pattern` | one alternation over `<path>{}<method>` with route marks  |
//! | `tree_pattern`   | the single-pattern idea over the shared prefix tree       |
//! | `linear`         | a step program per route run by a backtracking loop       |
//! | `tree`           | the shared tree as an arena walked depth first            |
//!
//! # Example
//! ```rust,ignore
//! use routekit::{compile, Strategy};
//!
//! let matcher = compile(&routes, Strategy::Linear)?;
//! match matcher.find("GET", "/users/42") {
//!     Outcome::Matched { index, captures } => { /* ... */ }
//!     Outcome::Failed { allowed } => { /* 404 or 405 */ }
//! }
//! ```

mod multi;
mod pattern;
mod program;
mod single;
mod tree_pattern;

use crate::error::CompileError;
use crate::logging::log_router_compiled;
use crate::method::Method;
use crate::route::RouteCollection;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::time::Instant;

pub use multi::MultiPatternMatcher;
pub use program::{LinearMatcher, TreeMatcher};
pub use single::SinglePatternMatcher;
pub use tree_pattern::TreePatternMatcher;

// =============================================================================
// Strategy
// =============================================================================

/// How a route collection is turned into a matcher.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Strategy {
    /// One regex per route.
    MultiPattern,
    /// One regex for every route, method included in the subject.
    SinglePattern,
    /// One regex built from the shared prefix tree.
    #[default]
    TreePattern,
    /// Step programs tried route by route.
    Linear,
    /// Arena interpreter over the shared prefix tree.
    Tree,
}

impl Strategy {
    /// Every strategy, in declaration order.
    pub const ALL: [Strategy; 5] = [
        Strategy::MultiPattern,
        Strategy::SinglePattern,
        Strategy::TreePattern,
        Strategy::Linear,
        Strategy::Tree,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::MultiPattern => "multi_pattern",
            Self::SinglePattern => "single_pattern",
            Self::TreePattern => "tree_pattern",
            Self::Linear => "linear",
            Self::Tree => "tree",
        }
    }

    /// Returns true for strategies backed by regular expressions.
    pub fn is_pattern(&self) -> bool {
        matches!(
            self,
            Self::MultiPattern | Self::SinglePattern | Self::TreePattern
        )
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Strategy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|strategy| strategy.as_str() == s)
            .ok_or_else(|| {
                let names: Vec<&str> = Self::ALL.iter().map(Strategy::as_str).collect();
                format!("unknown strategy '{}', expected one of {}", s, names.join(", "))
            })
    }
}

// =============================================================================
// Matcher
// =============================================================================

/// Result of running a matcher against a method and a path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Route `index` matched; captures are in the route's attribute order and
    /// omit optional attributes that did not participate.
    Matched {
        index: usize,
        captures: Vec<(String, String)>,
    },
    /// Nothing matched. `allowed` holds one entry per method whose route
    /// matched the path, ordered by route index; empty means not found.
    Failed { allowed: Vec<(Method, usize)> },
}

/// A compiled, immutable request matcher.
pub trait Matcher: fmt::Debug + Send + Sync {
    /// The strategy that produced this matcher.
    fn strategy(&self) -> Strategy;

    /// Match a request method and path (query string already removed).
    fn find(&self, method: &str, path: &str) -> Outcome;

    /// The generated regular expression, for pattern strategies.
    fn pattern(&self) -> Option<&str> {
        None
    }

    /// Every generated regular expression, one per route for
    /// `multi_pattern`.
    fn patterns(&self) -> Vec<&str> {
        self.pattern().into_iter().collect()
    }
}

/// Compile `routes` with `strategy`.
///
/// # Errors
///
/// Returns [`CompileError`] if a generated regular expression is rejected.
pub fn compile<H>(
    routes: &RouteCollection<H>,
    strategy: Strategy,
) -> Result<Box<dyn Matcher>, CompileError> {
    let start = Instant::now();
    let matcher: Box<dyn Matcher> = match strategy {
        Strategy::MultiPattern => Box::new(MultiPatternMatcher::compile(routes)?),
        Strategy::SinglePattern => Box::new(SinglePatternMatcher::compile(routes)?),
        Strategy::TreePattern => Box::new(TreePatternMatcher::compile(routes)?),
        Strategy::Linear => Box::new(LinearMatcher::compile(routes)),
        Strategy::Tree => Box::new(TreeMatcher::compile(routes)),
    };
    log_router_compiled(strategy, routes.len(), start.elapsed());
    Ok(matcher)
}

// =============================================================================
// Allowed methods
// =============================================================================

/// Accumulates `(method, route)` pairs for a failure, first route per method.
#[derive(Debug, Default)]
pub(crate) struct AllowedMethods {
    entries: Vec<(Method, usize)>,
}

impl AllowedMethods {
    pub(crate) fn record(&mut self, method: &Method, index: usize) {
        match self.entries.iter_mut().find(|(m, _)| m == method) {
            Some(entry) if entry.1 > index => entry.1 = index,
            Some(_) => {}
            None => self.entries.push((method.clone(), index)),
        }
    }

    pub(crate) fn into_outcome(mut self) -> Outcome {
        self.entries.sort_by_key(|(_, index)| *index);
        Outcome::Failed {
            allowed: self.entries,
        }
    }
}
