//! End-to-end scenarios, each run against every strategy.

use crate::compiler::Strategy;
use crate::config::RouterConfig;
use crate::error::{DefinitionError, RouteError, UriError};
use crate::method::Method;
use crate::route::RouteCollection;
use crate::router::Router;

fn router_for(
    strategy: Strategy,
    defs: &[(Method, &str, &'static str)],
) -> Router<&'static str> {
    let mut routes = RouteCollection::new();
    for (method, definition, handler) in defs {
        routes.add(method.clone(), definition, *handler).unwrap();
    }
    Router::with_config(routes, RouterConfig::new().with_strategy(strategy)).unwrap()
}

fn methods(failure: &crate::router::MatchFailure<'_, &'static str>) -> Vec<String> {
    failure.allowed_methods().map(|m| m.to_string()).collect()
}

#[test]
fn overlapping_routes_with_different_methods() {
    for strategy in Strategy::ALL {
        let router = router_for(
            strategy,
            &[
                (Method::GET, "/users/{id:number}", "a"),
                (Method::POST, "/users/{name}", "b"),
            ],
        );

        let a = router.match_uri("GET", "/users/42").unwrap();
        assert_eq!(*a.handler(), "a", "{strategy}");

        let b = router.match_uri("POST", "/users/42").unwrap();
        assert_eq!(*b.handler(), "b", "{strategy}");
        assert_eq!(b.attribute("name"), Some("42"));

        let failure = router.match_uri("PUT", "/users/42").unwrap_err();
        assert_eq!(methods(&failure), vec!["GET", "POST"], "{strategy}");

        // Only B's path matches a non-numeric segment.
        let failure = router.match_uri("GET", "/users/ada").unwrap_err();
        assert_eq!(methods(&failure), vec!["POST"], "{strategy}");
    }
}

#[test]
fn optional_suffix_is_omitted_and_matched() {
    for strategy in Strategy::ALL {
        let mut routes = RouteCollection::new();
        routes
            .add_named("user", Method::GET, "/users/{name}[/{id:number}]", ())
            .unwrap();
        let router =
            Router::with_config(routes, RouterConfig::new().with_strategy(strategy)).unwrap();

        assert_eq!(router.uri("user", [("name", "ada")]).unwrap(), "/users/ada");
        assert_eq!(
            router.uri("user", [("name", "ada"), ("id", "3")]).unwrap(),
            "/users/ada/3"
        );

        let short = router.match_uri("GET", "/users/ada").unwrap();
        assert_eq!(short.attribute("name"), Some("ada"));
        assert_eq!(short.attribute("id"), None, "{strategy}");

        let long = router.match_uri("GET", "/users/ada/3").unwrap();
        assert_eq!(long.attribute("id"), Some("3"), "{strategy}");
    }
}

#[test]
fn ambiguous_routes_first_registered_wins() {
    for strategy in Strategy::ALL {
        let router = router_for(
            strategy,
            &[
                (Method::GET, "/files/{name}", "generic"),
                (Method::GET, "/files/{id:number}", "numeric"),
                (Method::GET, "/files/readme", "static"),
            ],
        );
        for path in ["/files/7", "/files/readme", "/files/x"] {
            let matched = router.match_uri("GET", path).unwrap();
            assert_eq!(*matched.handler(), "generic", "{strategy} {path}");
        }
    }
}

#[test]
fn method_not_allowed_lists_every_method() {
    for strategy in Strategy::ALL {
        let mut routes = RouteCollection::new();
        routes
            .add_methods(&[Method::GET, Method::POST], "/users/{id:number}", "users")
            .unwrap();
        let router =
            Router::with_config(routes, RouterConfig::new().with_strategy(strategy)).unwrap();

        let failure = router.match_uri("DELETE", "/users/42").unwrap_err();
        assert!(failure.is_method_not_allowed());
        assert_eq!(failure.allow_header(), "GET, POST", "{strategy}");

        let failure = router.match_uri("GET", "/users/abc").unwrap_err();
        assert!(failure.is_not_found(), "{strategy}");
        assert_eq!(failure.allowed_methods().count(), 0);
    }
}

#[test]
fn allowed_methods_are_ordered_by_route() {
    for strategy in Strategy::ALL {
        let router = router_for(
            strategy,
            &[
                (Method::PUT, "/x/{id:number}", "put"),
                (Method::GET, "/x/{name}", "get_name"),
                (Method::PUT, "/x/{any}", "put_again"),
                (Method::DELETE, "/x/1", "delete"),
            ],
        );
        let failure = router.match_uri("POST", "/x/1").unwrap_err();
        assert_eq!(methods(&failure), vec!["PUT", "GET", "DELETE"], "{strategy}");
        let pairs: Vec<&str> = failure.allowed().iter().map(|(_, r)| *r.handler()).collect();
        assert_eq!(pairs, vec!["put", "get_name", "delete"], "{strategy}");
    }
}

#[test]
fn invalid_request_method_never_matches() {
    for strategy in Strategy::ALL {
        let router = router_for(strategy, &[(Method::GET, "/a", "a")]);
        let failure = router.match_uri("G ET", "/a").unwrap_err();
        assert_eq!(methods(&failure), vec!["GET"], "{strategy}");
    }
}

#[test]
fn query_and_fragment_are_ignored() {
    for strategy in Strategy::ALL {
        let router = router_for(strategy, &[(Method::GET, "/search/{term}", "search")]);
        let matched = router.match_uri("GET", "/search/rust?page=2#results").unwrap();
        assert_eq!(matched.attribute("term"), Some("rust"), "{strategy}");
    }
}

#[test]
fn nested_optionals_match_every_depth() {
    for strategy in Strategy::ALL {
        let router = router_for(
            strategy,
            &[(
                Method::GET,
                "/archive[/{year:number}[/{month:number}]]",
                "archive",
            )],
        );
        for (path, year, month) in [
            ("/archive", None, None),
            ("/archive/2024", Some("2024"), None),
            ("/archive/2024/02", Some("2024"), Some("02")),
        ] {
            let matched = router.match_uri("GET", path).unwrap();
            assert_eq!(matched.attribute("year"), year, "{strategy} {path}");
            assert_eq!(matched.attribute("month"), month, "{strategy} {path}");
        }
        assert!(router.match_uri("GET", "/archive/").is_err());
    }
}

#[test]
fn unicode_paths() {
    for strategy in Strategy::ALL {
        let router = router_for(strategy, &[(Method::GET, "/tags/{tag}", "tag")]);
        let matched = router.match_uri("GET", "/tags/naïve").unwrap();
        assert_eq!(matched.attribute("tag"), Some("naïve"), "{strategy}");
    }
}

#[test]
fn number_rejects_non_ascii_digits() {
    for strategy in Strategy::ALL {
        let router = router_for(strategy, &[(Method::GET, "/users/{id:number}", "user")]);
        let failure = router.match_uri("GET", "/users/\u{0664}\u{0662}").unwrap_err();
        assert!(failure.is_not_found(), "{strategy}");
        assert!(router.match_uri("GET", "/users/42").is_ok(), "{strategy}");
    }
}

#[test]
fn empty_attribute_name_is_reported_at_index_8() {
    let mut routes: RouteCollection<()> = RouteCollection::new();
    let err = routes.add(Method::GET, "/users/{}", ()).unwrap_err();
    let RouteError::Definition { source, .. } = err else {
        panic!("expected a definition error");
    };
    assert!(matches!(source, DefinitionError::EmptyAttributeName { .. }));
    assert_eq!(source.location().map(|l| l.index), Some(8));
    assert!(source.to_string().starts_with("attribute name missing at index 8"));
}

#[test]
fn uri_errors_name_the_attribute() {
    let mut routes = RouteCollection::new();
    routes
        .add_named("post", Method::GET, "/posts/{id:number}/{slug:word}", ())
        .unwrap();
    let router = Router::new(routes).unwrap();

    let err = router.uri("post", [("id", "1")]).unwrap_err();
    assert_eq!(err.attribute(), Some("slug"));

    let err = router.uri("post", [("id", "one"), ("slug", "x")]).unwrap_err();
    assert!(matches!(err, UriError::InvalidValue { ref attribute, .. } if attribute == "id"));
}

#[test]
fn custom_types_take_part_in_matching() {
    let types = crate::types::Types::builder()
        .add("slug", "[a-z0-9]+(?:-[a-z0-9]+)*")
        .build()
        .unwrap();
    for strategy in Strategy::ALL {
        let mut routes = RouteCollection::with_types(types.clone());
        routes
            .add(Method::GET, "/blog/{post:slug}", "post")
            .unwrap();
        let router =
            Router::with_config(routes, RouterConfig::new().with_strategy(strategy)).unwrap();
        let matched = router.match_uri("GET", "/blog/hello-world").unwrap();
        assert_eq!(matched.attribute("post"), Some("hello-world"), "{strategy}");
        assert!(router.match_uri("GET", "/blog/Hello").is_err());
    }
}

#[test]
fn adjacent_captures_fail_fast_on_long_paths() {
    let path = format!("/{}/", "-".repeat(200));
    for strategy in Strategy::ALL {
        let router = router_for(strategy, &[(Method::GET, "/{a}-{b}-{c}-{d}", "dashes")]);
        let started = std::time::Instant::now();
        let failure = router.match_uri("GET", &path).unwrap_err();
        assert!(failure.is_not_found(), "{strategy}");
        assert!(
            started.elapsed() < std::time::Duration::from_secs(2),
            "{strategy} took {:?}",
            started.elapsed()
        );
    }
}
