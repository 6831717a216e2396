//! Turns a [`RoutesFile`] into a compiled [`Router`].

use crate::config::{RouteEntry, RoutesFile};
use crate::error::{CliError, CliResult};
use routekit::{Method, RouteCollection, RouteError, Router, Types, TypesError};
use std::collections::BTreeMap;

/// Handler labels are the payload of every route built here.
pub type RouteTable = Router<String>;

/// Build the types registry: built-in types plus the file's `[types]`.
pub fn build_types(extra: &BTreeMap<String, String>) -> Result<Types, TypesError> {
    extra
        .iter()
        .fold(Types::builder(), |builder, (name, pattern)| {
            builder.add(name.clone(), pattern.clone())
        })
        .build()
}

fn register(
    routes: &mut RouteCollection<String>,
    entry: &RouteEntry,
) -> Result<usize, RouteError> {
    let method = Method::new(entry.method.clone())?;
    let handler = entry.handler_label();
    match &entry.name {
        Some(name) => routes.add_named(name.clone(), method, &entry.path, handler),
        None => routes.add(method, &entry.path, handler),
    }
}

/// Register every route, stopping at the first failure.
pub fn build_routes(file: &RoutesFile) -> CliResult<RouteCollection<String>> {
    let mut routes = RouteCollection::with_types(build_types(&file.types)?);
    for (index, entry) in file.routes.iter().enumerate() {
        register(&mut routes, entry).map_err(|source| CliError::Route {
            index,
            name: entry.name.clone(),
            source,
        })?;
    }
    Ok(routes)
}

/// Register and compile every route.
pub fn build_router(file: &RoutesFile) -> CliResult<RouteTable> {
    let routes = build_routes(file)?;
    Ok(Router::with_config(routes, file.router.clone())?)
}

/// Register every route and compile the result, collecting all failures.
///
/// Returns the router when nothing failed, otherwise [`CliError::Check`]
/// with one entry per rejected route (or the single types/compile error).
pub fn check(file: &RoutesFile) -> CliResult<RouteTable> {
    let types = build_types(&file.types)?;
    let mut routes = RouteCollection::with_types(types);
    let mut failures = Vec::new();

    for (index, entry) in file.routes.iter().enumerate() {
        if let Err(source) = register(&mut routes, entry) {
            failures.push(CliError::Route {
                index,
                name: entry.name.clone(),
                source,
            });
        }
    }

    if !failures.is_empty() {
        return Err(CliError::Check(failures));
    }
    Ok(Router::with_config(routes, file.router.clone())?)
}

/// Parse `key=value` arguments for URI generation.
pub fn parse_assignments<S: AsRef<str>>(args: &[S]) -> CliResult<Vec<(String, String)>> {
    args.iter()
        .map(|arg| {
            let arg = arg.as_ref();
            match arg.split_once('=') {
                Some((key, value)) if !key.is_empty() => Ok((key.to_string(), value.to_string())),
                _ => Err(CliError::invalid_argument(arg, "expected key=value")),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ConfigManager;
    use std::path::Path;

    fn file(content: &str) -> RoutesFile {
        ConfigManager::parse(Path::new("test.toml"), content).unwrap()
    }

    #[test]
    fn test_custom_type_overrides_builtin() {
        let mut extra = BTreeMap::new();
        extra.insert("number".to_string(), "[0-9]{2}".to_string());
        let types = build_types(&extra).unwrap();
        assert_eq!(types.get("number").unwrap().pattern(), "[0-9]{2}");
        assert!(types.get("alpha").is_some());
    }

    #[test]
    fn test_invalid_type_pattern_is_reported() {
        let mut extra = BTreeMap::new();
        extra.insert("broken".to_string(), "(".to_string());
        assert!(matches!(
            build_types(&extra),
            Err(TypesError::InvalidPattern { .. })
        ));
    }

    #[test]
    fn test_build_router_matches_with_handler_labels() {
        let router = build_router(&file(
            r#"
[[routes]]
name = "users.show"
path = "/users/{id:number}"
handler = "users::show"

[[routes]]
method = "POST"
path = "/users"
"#,
        ))
        .unwrap();

        let matched = router.match_uri("GET", "/users/7").unwrap();
        assert_eq!(matched.handler(), "users::show");
        let matched = router.match_uri("POST", "/users").unwrap();
        assert_eq!(matched.handler(), "POST /users");
    }

    #[test]
    fn test_build_routes_stops_at_first_error() {
        let err = build_routes(&file(
            r#"
[[routes]]
path = "/ok"

[[routes]]
name = "bad"
path = "/users/{}"
"#,
        ))
        .unwrap_err();
        assert!(matches!(err, CliError::Route { index: 1, .. }));
    }

    #[test]
    fn test_check_collects_every_failure() {
        let err = check(&file(
            r#"
[[routes]]
path = "/users/{}"

[[routes]]
method = "G ET"
path = "/a"

[[routes]]
path = "/fine"
"#,
        ))
        .unwrap_err();
        let CliError::Check(failures) = err else {
            panic!("expected a check error");
        };
        assert_eq!(failures.len(), 2);
        assert!(failures[0].to_string().contains("attribute name missing at index 8"));
        assert!(matches!(failures[1], CliError::Route { index: 1, .. }));
    }

    #[test]
    fn test_check_rejects_bad_prefix() {
        let err = check(&file("[router]\nuri_prefix = \"api/\"\n")).unwrap_err();
        assert!(matches!(err, CliError::Router(_)));
    }

    #[test]
    fn test_parse_assignments() {
        let pairs = parse_assignments(&["id=3", "q=a=b", "empty="]).unwrap();
        assert_eq!(
            pairs,
            vec![
                ("id".to_string(), "3".to_string()),
                ("q".to_string(), "a=b".to_string()),
                ("empty".to_string(), String::new()),
            ]
        );
        assert!(parse_assignments(&["novalue"]).is_err());
        assert!(parse_assignments(&["=x"]).is_err());
    }
}
