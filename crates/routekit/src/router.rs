//! The compiled router: matching and reverse routing.
//!
//! # Example
//! ```rust,ignore
//! use routekit::{Method, Request, RouteCollection, Router};
//!
//! let mut routes = RouteCollection::new();
//! routes.add_methods(&[Method::GET, Method::POST], "/users/{id:number}", "users")?;
//! let router = Router::new(routes)?;
//!
//! match router.match_request(&Request::new("DELETE", "/users/42")) {
//!     Ok(matched) => println!("{}", matched.handler()),
//!     Err(failure) if failure.is_method_not_allowed() => {
//!         println!("405, Allow: {}", failure.allow_header());
//!     }
//!     Err(_) => println!("404"),
//! }
//! ```

use crate::compiler::{Matcher, Outcome, Strategy, compile};
use crate::config::RouterConfig;
use crate::error::{Result, UriResult};
use crate::logging::{log_method_not_allowed, log_request_matched, log_request_not_found};
use crate::method::Method;
use crate::request::Request;
use crate::route::{Route, RouteCollection};
use std::fmt::{self, Display};

/// Outcome of [`Router::match_request`].
pub type MatchResult<'r, H> = std::result::Result<Match<'r, H>, MatchFailure<'r, H>>;

/// Immutable router built once from a route collection.
#[derive(Debug)]
pub struct Router<H> {
    routes: RouteCollection<H>,
    matcher: Box<dyn Matcher>,
    config: RouterConfig,
}

impl<H> Router<H> {
    /// Compile `routes` with the default configuration.
    pub fn new(routes: RouteCollection<H>) -> Result<Self> {
        Self::with_config(routes, RouterConfig::default())
    }

    /// Compile `routes` with `config`.
    ///
    /// # Errors
    ///
    /// Fails if the configuration is invalid or the strategy cannot build its
    /// matcher.
    pub fn with_config(routes: RouteCollection<H>, config: RouterConfig) -> Result<Self> {
        config.validate()?;
        let matcher = compile(&routes, config.strategy)?;
        Ok(Self {
            routes,
            matcher,
            config,
        })
    }

    pub fn routes(&self) -> &RouteCollection<H> {
        &self.routes
    }

    pub fn config(&self) -> &RouterConfig {
        &self.config
    }

    pub fn strategy(&self) -> Strategy {
        self.matcher.strategy()
    }

    /// The generated regular expression for pattern strategies.
    pub fn pattern(&self) -> Option<&str> {
        self.matcher.pattern()
    }

    /// Every generated regular expression; one per route for `multi_pattern`,
    /// empty for the interpreters.
    pub fn patterns(&self) -> Vec<&str> {
        self.matcher.patterns()
    }

    /// Match a request.
    ///
    /// On success the returned request carries the captured attributes; on
    /// failure the allowed methods tell a 404 from a 405.
    pub fn match_request(&self, request: &Request) -> MatchResult<'_, H> {
        match self.matcher.find(request.method(), request.path()) {
            Outcome::Matched { index, captures } => {
                log_request_matched(request.method(), request.path(), index);
                match self.routes.get(index) {
                    Some(route) => Ok(Match {
                        route,
                        index,
                        request: request.with_attributes(captures),
                    }),
                    None => Err(MatchFailure {
                        allowed: Vec::new(),
                        request: request.clone(),
                    }),
                }
            }
            Outcome::Failed { allowed } => {
                let failure = MatchFailure {
                    allowed: allowed
                        .into_iter()
                        .filter_map(|(method, index)| {
                            self.routes.get(index).map(|route| (method, route))
                        })
                        .collect(),
                    request: request.clone(),
                };
                if failure.is_not_found() {
                    log_request_not_found(request.method(), request.path());
                } else {
                    log_method_not_allowed(
                        request.method(),
                        request.path(),
                        &failure.allow_header(),
                    );
                }
                Err(failure)
            }
        }
    }

    /// Shorthand for matching `Request::new(method, uri)`.
    pub fn match_uri(&self, method: &str, uri: &str) -> MatchResult<'_, H> {
        self.match_request(&Request::new(method, uri))
    }

    /// Generate a URI for a named route, prepending the configured prefix.
    pub fn uri<I, K, V>(&self, name: &str, values: I) -> UriResult<String>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Display,
    {
        self.routes.uri(name, values, &self.config.uri_prefix)
    }
}

// =============================================================================
// Match
// =============================================================================

/// A successful match.
#[derive(Debug)]
pub struct Match<'r, H> {
    route: &'r Route<H>,
    index: usize,
    request: Request,
}

impl<'r, H> Match<'r, H> {
    pub fn route(&self) -> &'r Route<H> {
        self.route
    }

    /// Registration index of the matched route.
    pub fn index(&self) -> usize {
        self.index
    }

    pub fn handler(&self) -> &'r H {
        self.route.handler()
    }

    /// The request with captured attributes bound.
    pub fn request(&self) -> &Request {
        &self.request
    }

    /// A captured attribute; `None` for an optional attribute that did not
    /// take part in the match.
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.request.attribute(name)
    }

    pub fn into_request(self) -> Request {
        self.request
    }
}

// =============================================================================
// Match Failure
// =============================================================================

/// No route accepted the request.
///
/// `allowed` lists one entry per method whose route matched the path, in
/// route order. Empty means not found (404); otherwise the method is not
/// allowed (405).
#[derive(Debug)]
pub struct MatchFailure<'r, H> {
    allowed: Vec<(Method, &'r Route<H>)>,
    request: Request,
}

impl<'r, H> MatchFailure<'r, H> {
    pub fn is_not_found(&self) -> bool {
        self.allowed.is_empty()
    }

    pub fn is_method_not_allowed(&self) -> bool {
        !self.allowed.is_empty()
    }

    /// HTTP status for this failure, 404 or 405.
    pub fn status_code(&self) -> u16 {
        if self.is_not_found() { 404 } else { 405 }
    }

    /// Method to route pairs.
    pub fn allowed(&self) -> &[(Method, &'r Route<H>)] {
        &self.allowed
    }

    pub fn allowed_methods(&self) -> impl Iterator<Item = &Method> {
        self.allowed.iter().map(|(method, _)| method)
    }

    /// Value for an `Allow` response header, e.g. `GET, POST`.
    pub fn allow_header(&self) -> String {
        self.allowed_methods()
            .map(Method::as_str)
            .collect::<Vec<_>>()
            .join(", ")
    }

    /// The request as received.
    pub fn request(&self) -> &Request {
        &self.request
    }
}

impl<H> fmt::Display for MatchFailure<'_, H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_not_found() {
            write!(
                f,
                "no route for {} {}",
                self.request.method(),
                self.request.path()
            )
        } else {
            write!(
                f,
                "method {} not allowed for {} (allow: {})",
                self.request.method(),
                self.request.path(),
                self.allow_header()
            )
        }
    }
}

impl<H: fmt::Debug> std::error::Error for MatchFailure<'_, H> {}
