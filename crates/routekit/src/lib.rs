//! # routekit
//!
//! Route-definition compiler and HTTP request matcher with reverse URI
//! generation.
//!
//! ## Overview
//!
//! - **Definition language** with typed attributes and optional suffixes:
//!   `/users/{name}[/{id:number}]`
//! - **Positional errors** that point at the offending character
//! - **Five matching strategies** that agree on every request
//! - **405 bookkeeping**: a failed match lists the methods the path allows
//! - **Reverse routing** from a route name and attribute values
//!
//! ## Architecture
//!
//! ```text
//! definition ──▶ Parser ──▶ Path (AST) ──▶ Route ──▶ RouteCollection
//!                                                        │
//!                              ┌─────────────────────────┤
//!                              ▼                         ▼
//!                          Tree (shared prefixes)    URI generator
//!                              │
//!                              ▼
//!                Compiler (Strategy) ──▶ Matcher ──▶ Match | MatchFailure
//! ```
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use routekit::prelude::*;
//!
//! let mut routes = RouteCollection::new();
//! routes.add_named("users.show", Method::GET, "/users/{id:number}", "show_user")?;
//! routes.add_named("users.list", Method::GET, "/users[/page/{page:number}]", "list_users")?;
//!
//! let router = Router::with_config(routes, RouterConfig::new().with_strategy(Strategy::Tree))?;
//!
//! let matched = router.match_uri("GET", "/users/42").unwrap();
//! assert_eq!(matched.attribute("id"), Some("42"));
//!
//! assert_eq!(router.uri("users.list", [("page", 2)])?, "/users/page/2");
//! ```

mod compiler;
mod config;
mod cursor;
pub mod error;
pub mod logging;
mod method;
mod parser;
mod path;
mod request;
mod route;
mod router;
pub mod tree;
mod types;
mod uri;
mod validator;

#[cfg(test)]
mod tests;

/// Longest accepted attribute or type name, in characters.
pub const MAX_NAME_LENGTH: usize = 32;

pub use compiler::{
    LinearMatcher, Matcher, MultiPatternMatcher, Outcome, SinglePatternMatcher, Strategy,
    TreeMatcher, TreePatternMatcher, compile,
};
pub use config::RouterConfig;
pub use error::{
    CompileError, ConfigError, DefinitionError, DefinitionResult, Error, ErrorKind, Location,
    Result, RouteError, RouteResult, TypesError, UriError, UriResult,
};
pub use method::{Method, is_token};
pub use parser::parse;
pub use path::{Attribute, Path, PathVisitor};
pub use request::Request;
pub use route::{Route, RouteCollection};
pub use router::{Match, MatchFailure, MatchResult, Router};
pub use tree::Tree;
pub use types::{DEFAULT_IMPLICIT_TYPE, DEFAULT_TYPE_PATTERNS, Type, TypeDef, Types, TypesBuilder};
pub use uri::{UriValues, uri_values};
pub use validator::validate;

/// Prelude for convenient imports
///
/// ```rust,ignore
/// use routekit::prelude::*;
/// ```
pub mod prelude {
    pub use crate::{
        // Errors
        Error,
        // Routing
        Match,
        MatchFailure,
        Method,
        Request,
        Result,
        Route,
        RouteCollection,
        Router,
        RouterConfig,
        Strategy,
        Types,
    };
}
