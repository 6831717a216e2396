//! One anchored regex per route.

use super::pattern::{Bindings, GroupNames, build_regex, extract, write_path};
use super::{AllowedMethods, Matcher, Outcome, Strategy};
use crate::error::CompileError;
use crate::method::Method;
use crate::route::RouteCollection;
use regex::Regex;

#[derive(Debug)]
struct CompiledRoute {
    regex: Regex,
    method: Method,
    bindings: Bindings,
}

/// Tries `^P$` for each route in registration order.
///
/// The first route whose path and method both match wins; routes whose path
/// matched with another method are remembered for the failure.
#[derive(Debug)]
pub struct MultiPatternMatcher {
    routes: Vec<CompiledRoute>,
}

impl MultiPatternMatcher {
    pub fn compile<H>(routes: &RouteCollection<H>) -> Result<Self, CompileError> {
        let mut compiled = Vec::with_capacity(routes.len());
        for route in routes {
            let mut groups = GroupNames::default();
            let mut bindings = Bindings::new();
            let mut body = String::new();
            write_path(&mut body, route.path(), route.types(), &mut groups, &mut bindings);
            compiled.push(CompiledRoute {
                regex: build_regex(&format!("^{}$", body), Strategy::MultiPattern)?,
                method: route.method().clone(),
                bindings,
            });
        }
        Ok(Self { routes: compiled })
    }
}

impl Matcher for MultiPatternMatcher {
    fn strategy(&self) -> Strategy {
        Strategy::MultiPattern
    }

    fn find(&self, method: &str, path: &str) -> Outcome {
        let mut allowed = AllowedMethods::default();
        for (index, route) in self.routes.iter().enumerate() {
            let Some(captures) = route.regex.captures(path) else {
                continue;
            };
            if route.method == method {
                return Outcome::Matched {
                    index,
                    captures: extract(&captures, &route.bindings),
                };
            }
            allowed.record(&route.method, index);
        }
        allowed.into_outcome()
    }

    fn patterns(&self) -> Vec<&str> {
        self.routes.iter().map(|route| route.regex.as_str()).collect()
    }
}
