//! Routes and the ordered route collection.
//!
//! A [`RouteCollection`] is append-only: registration order is precedence,
//! and the index a route receives on registration is its identity for the
//! compilers and the matcher.
//!
//! # Example
//! ```rust,ignore
//! use routekit::{Method, RouteCollection};
//!
//! let mut routes = RouteCollection::new();
//! routes.add_named("users.show", Method::GET, "/users/{id:number}", "show_user")?;
//! routes.add_methods(&[Method::PUT, Method::PATCH], "/users/{id:number}", "update_user")?;
//!
//! let uri = routes.uri("users.show", [("id", 42)], "")?;
//! assert_eq!(uri, "/users/42");
//! ```

use crate::error::{RouteError, RouteResult, UriError, UriResult};
use crate::logging::{log_route_registered, log_route_rejected};
use crate::method::Method;
use crate::parser::parse;
use crate::path::{Attribute, Path};
use crate::types::{Type, Types};
use crate::uri::{generate, uri_values};
use crate::validator::validate;
use std::collections::HashMap;
use std::fmt::{self, Display};

// =============================================================================
// Route
// =============================================================================

/// One registered route: method, parsed path, handler and its types registry.
#[derive(Debug, Clone)]
pub struct Route<H> {
    method: Method,
    definition: String,
    path: Path,
    handler: H,
    types: Types,
    name: Option<String>,
}

impl<H> Route<H> {
    /// Parse `definition` with the default types registry.
    pub fn new(method: Method, definition: &str, handler: H) -> RouteResult<Self> {
        Self::with_types(method, definition, handler, Types::default())
    }

    /// Parse `definition` against `types`.
    pub fn with_types(
        method: Method,
        definition: &str,
        handler: H,
        types: Types,
    ) -> RouteResult<Self> {
        let path = parse(definition, &types).map_err(|e| {
            log_route_rejected(method.as_str(), definition, &e.to_string());
            RouteError::definition(method.as_str(), definition, e)
        })?;
        Ok(Self {
            method,
            definition: definition.to_string(),
            path,
            handler,
            types,
            name: None,
        })
    }

    /// Wrap a path built in code, running the semantic checks the parser
    /// would have run.
    pub fn from_path(method: Method, path: Path, handler: H, types: Types) -> RouteResult<Self> {
        let definition = path.to_string();
        validate(&path, &types).map_err(|e| {
            log_route_rejected(method.as_str(), &definition, &e.to_string());
            RouteError::definition(method.as_str(), definition.as_str(), e)
        })?;
        Ok(Self {
            method,
            definition,
            path,
            handler,
            types,
            name: None,
        })
    }

    /// Attach a name for reverse routing.
    #[must_use = "This method returns a new Route and does not modify self"]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn method(&self) -> &Method {
        &self.method
    }

    /// The definition text the route was registered with.
    pub fn definition(&self) -> &str {
        &self.definition
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn handler(&self) -> &H {
        &self.handler
    }

    pub fn types(&self) -> &Types {
        &self.types
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Attributes in definition order.
    pub fn attributes(&self) -> Vec<Attribute> {
        self.path.attributes()
    }

    /// Resolve an attribute's type against this route's registry.
    pub fn resolve_type(&self, type_name: Option<&str>) -> &Type {
        self.types
            .resolve(type_name)
            .unwrap_or_else(|| self.types.implicit())
    }

    /// Generate a URI for this route.
    ///
    /// # Errors
    ///
    /// Returns [`UriError`] if a required value is missing or a value does
    /// not match its attribute's type.
    pub fn uri<I, K, V>(&self, values: I, prefix: &str) -> UriResult<String>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Display,
    {
        generate(&self.path, &self.types, &uri_values(values), prefix)
    }
}

impl<H> fmt::Display for Route<H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.method, self.definition)?;
        if let Some(name) = &self.name {
            write!(f, " ({})", name)?;
        }
        Ok(())
    }
}

// =============================================================================
// Route Collection
// =============================================================================

/// Ordered, append-only list of routes with a name index.
#[derive(Debug, Clone)]
pub struct RouteCollection<H> {
    routes: Vec<Route<H>>,
    names: HashMap<String, usize>,
    types: Types,
}

impl<H> Default for RouteCollection<H> {
    fn default() -> Self {
        Self::new()
    }
}

impl<H> RouteCollection<H> {
    /// Empty collection using the default types registry.
    pub fn new() -> Self {
        Self::with_types(Types::default())
    }

    /// Empty collection parsing definitions against `types`.
    pub fn with_types(types: Types) -> Self {
        Self {
            routes: Vec::new(),
            names: HashMap::new(),
            types,
        }
    }

    /// The registry used by [`add`](Self::add) and [`add_named`](Self::add_named).
    pub fn types(&self) -> &Types {
        &self.types
    }

    /// Register an anonymous route, returning its index.
    pub fn add(&mut self, method: Method, definition: &str, handler: H) -> RouteResult<usize> {
        let route = Route::with_types(method, definition, handler, self.types.clone())?;
        self.push(route)
    }

    /// Register a named route, returning its index.
    pub fn add_named(
        &mut self,
        name: impl Into<String>,
        method: Method,
        definition: &str,
        handler: H,
    ) -> RouteResult<usize> {
        let route =
            Route::with_types(method, definition, handler, self.types.clone())?.with_name(name);
        self.push(route)
    }

    /// Register one route per method sharing a definition and handler.
    ///
    /// Nothing is registered if the definition is invalid.
    pub fn add_methods(
        &mut self,
        methods: &[Method],
        definition: &str,
        handler: H,
    ) -> RouteResult<Vec<usize>>
    where
        H: Clone,
    {
        let mut pending = Vec::with_capacity(methods.len());
        for method in methods {
            pending.push(Route::with_types(
                method.clone(),
                definition,
                handler.clone(),
                self.types.clone(),
            )?);
        }
        pending.into_iter().map(|route| self.push(route)).collect()
    }

    /// Append an already built route.
    ///
    /// # Errors
    ///
    /// Returns [`RouteError::DuplicateName`] if the route's name is taken.
    pub fn push(&mut self, route: Route<H>) -> RouteResult<usize> {
        let index = self.routes.len();
        if let Some(name) = route.name() {
            if self.names.contains_key(name) {
                return Err(RouteError::DuplicateName {
                    name: name.to_string(),
                });
            }
            self.names.insert(name.to_string(), index);
        }
        log_route_registered(
            index,
            route.method().as_str(),
            route.definition(),
            route.name(),
        );
        self.routes.push(route);
        Ok(index)
    }

    pub fn get(&self, index: usize) -> Option<&Route<H>> {
        self.routes.get(index)
    }

    /// Look up a route by name.
    pub fn by_name(&self, name: &str) -> Option<&Route<H>> {
        self.names.get(name).and_then(|&i| self.routes.get(i))
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Route<H>> {
        self.routes.iter()
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }

    /// Distinct methods in order of first registration.
    pub fn known_methods(&self) -> Vec<Method> {
        let mut methods: Vec<Method> = Vec::new();
        for route in &self.routes {
            if !methods.contains(route.method()) {
                methods.push(route.method().clone());
            }
        }
        methods
    }

    /// Generate a URI for the route registered under `name`.
    ///
    /// # Errors
    ///
    /// Returns [`UriError::UnknownRoute`] for an unregistered name, or the
    /// generator's error otherwise.
    pub fn uri<I, K, V>(&self, name: &str, values: I, prefix: &str) -> UriResult<String>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Display,
    {
        let route = self.by_name(name).ok_or_else(|| UriError::UnknownRoute {
            name: name.to_string(),
        })?;
        route.uri(values, prefix)
    }
}

impl<'a, H> IntoIterator for &'a RouteCollection<H> {
    type Item = &'a Route<H>;
    type IntoIter = std::slice::Iter<'a, Route<H>>;

    fn into_iter(self) -> Self::IntoIter {
        self.routes.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::DefinitionError;

    #[test]
    fn test_registration_order_is_index() {
        let mut routes = RouteCollection::new();
        assert_eq!(routes.add(Method::GET, "/a", 1).unwrap(), 0);
        assert_eq!(routes.add(Method::POST, "/b", 2).unwrap(), 1);
        assert_eq!(routes.len(), 2);
        assert_eq!(*routes.get(1).unwrap().handler(), 2);
    }

    #[test]
    fn test_definition_errors_are_wrapped() {
        let mut routes: RouteCollection<()> = RouteCollection::new();
        let err = routes.add(Method::GET, "/users/{}", ()).unwrap_err();
        match err {
            RouteError::Definition {
                method,
                definition,
                source,
            } => {
                assert_eq!(method, "GET");
                assert_eq!(definition, "/users/{}");
                assert!(matches!(source, DefinitionError::EmptyAttributeName { .. }));
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert!(routes.is_empty());
    }

    #[test]
    fn test_duplicate_names_rejected() {
        let mut routes = RouteCollection::new();
        routes.add_named("home", Method::GET, "/", ()).unwrap();
        let err = routes.add_named("home", Method::POST, "/", ()).unwrap_err();
        assert_eq!(err, RouteError::DuplicateName { name: "home".into() });
        assert_eq!(routes.len(), 1);
    }

    #[test]
    fn test_add_methods_registers_each() {
        let mut routes = RouteCollection::new();
        let indices = routes
            .add_methods(&[Method::GET, Method::POST], "/users/{id:number}", "h")
            .unwrap();
        assert_eq!(indices, vec![0, 1]);
        assert_eq!(routes.known_methods(), vec![Method::GET, Method::POST]);
    }

    #[test]
    fn test_add_methods_is_atomic() {
        let mut routes = RouteCollection::new();
        assert!(routes.add_methods(&[Method::GET, Method::POST], "/{", "h").is_err());
        assert!(routes.is_empty());
    }

    #[test]
    fn test_uri_by_name() {
        let mut routes = RouteCollection::new();
        routes
            .add_named("users.show", Method::GET, "/users/{id:number}", ())
            .unwrap();
        assert_eq!(routes.uri("users.show", [("id", 42)], "").unwrap(), "/users/42");
        assert_eq!(
            routes.uri("missing", [("id", 1)], ""),
            Err(UriError::UnknownRoute { name: "missing".into() })
        );
    }

    #[test]
    fn test_from_path_runs_validator() {
        let path = Path::attribute("a", None, Path::attribute("a", None, Path::Empty));
        let err = Route::from_path(Method::GET, path, (), Types::default()).unwrap_err();
        assert!(matches!(
            err,
            RouteError::Definition {
                source: DefinitionError::AmbiguousAttribute { .. },
                ..
            }
        ));
    }

    #[test]
    fn test_route_display() {
        let route = Route::new(Method::GET, "/users/{id}", ()).unwrap().with_name("u");
        assert_eq!(route.to_string(), "GET /users/{id} (u)");
    }
}
