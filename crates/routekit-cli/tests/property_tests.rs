//! Property-based tests for routekit-cli.
//!
//! Properties tested:
//! - Config override precedence
//! - `key=value` parsing keeps everything after the first `=`
//! - A route table written to disk loads back with the same routes
//! - URIs generated from a loaded table match their own route

use proptest::prelude::*;
use std::fmt::Write as _;
use std::fs;
use tempfile::TempDir;

use routekit::Strategy as MatchStrategy;
use routekit_cli::{
    config::{CliArgs, ConfigManager, RoutesFile},
    loader,
};

// =============================================================================
// Generators for property tests
// =============================================================================

fn arb_strategy() -> impl Strategy<Value = MatchStrategy> {
    prop::sample::select(MatchStrategy::ALL.to_vec())
}

fn arb_prefix() -> impl Strategy<Value = String> {
    prop_oneof![Just(String::new()), "(/[a-z]{1,5}){1,2}"]
}

/// A list of distinct static path segments, one route each.
fn arb_segments() -> impl Strategy<Value = Vec<String>> {
    prop::collection::btree_set("[a-z]{1,6}", 1..6).prop_map(|set| set.into_iter().collect())
}

fn table(segments: &[String]) -> String {
    let mut out = String::from("[router]\n\n");
    for segment in segments {
        writeln!(out, "[[routes]]").unwrap();
        writeln!(out, "name = \"{}\"", segment).unwrap();
        writeln!(out, "path = \"/{}/{{id:number}}[/{{tab:alpha}}]\"", segment).unwrap();
        writeln!(out, "handler = \"{}::show\"\n", segment).unwrap();
    }
    out
}

// =============================================================================
// Property Tests
// =============================================================================

proptest! {
    /// Property: CLI overrides always win over file values.
    #[test]
    fn prop_config_override_precedence(
        file_strategy in arb_strategy(),
        cli_strategy in prop::option::of(arb_strategy()),
        cli_prefix in prop::option::of(arb_prefix()),
    ) {
        let mut file = RoutesFile::default();
        file.router.strategy = file_strategy;
        file.router.uri_prefix = "/file".to_string();

        let merged = ConfigManager::merge_cli_args(
            file,
            &CliArgs {
                strategy: cli_strategy,
                uri_prefix: cli_prefix.clone(),
            },
        );

        prop_assert_eq!(merged.router.strategy, cli_strategy.unwrap_or(file_strategy));
        prop_assert_eq!(
            merged.router.uri_prefix,
            cli_prefix.unwrap_or_else(|| "/file".to_string())
        );
    }

    /// Property: the key ends at the first `=` and the value keeps the rest.
    #[test]
    fn prop_assignment_split(key in "[a-z_]{1,8}", value in "[a-z0-9=/]{0,12}") {
        let arg = format!("{}={}", key, value);
        let parsed = loader::parse_assignments(&[arg]).unwrap();
        prop_assert_eq!(parsed, vec![(key, value)]);
    }

    /// Property: a written table loads back with every route in order.
    #[test]
    fn prop_table_loads_in_order(segments in arb_segments()) {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("routekit.toml");
        fs::write(&path, table(&segments)).unwrap();

        let file = ConfigManager::load(Some(&path)).unwrap();
        let names: Vec<_> = file.routes.iter().filter_map(|r| r.name.clone()).collect();
        prop_assert_eq!(&names, &segments);

        let router = loader::check(&file).unwrap();
        prop_assert_eq!(router.routes().len(), segments.len());
    }

    /// Property: a generated URI matches the route it was generated from.
    #[test]
    fn prop_url_then_match(
        segments in arb_segments(),
        pick in any::<prop::sample::Index>(),
        id in 0u32..100_000,
        tab in prop::option::of("[a-z]{1,5}"),
        strategy in arb_strategy(),
    ) {
        let mut file = ConfigManager::parse(std::path::Path::new("mem.toml"), &table(&segments)).unwrap();
        file.router.strategy = strategy;
        let router = loader::build_router(&file).unwrap();

        let name = &segments[pick.index(segments.len())];
        let mut values = vec![("id".to_string(), id.to_string())];
        if let Some(tab) = &tab {
            values.push(("tab".to_string(), tab.clone()));
        }
        let uri = router.uri(name, values).unwrap();

        let matched = router.match_uri("GET", &uri).unwrap();
        prop_assert_eq!(matched.route().name(), Some(name.as_str()));
        let expected_id = id.to_string();
        prop_assert_eq!(matched.attribute("id"), Some(expected_id.as_str()));
        prop_assert_eq!(matched.attribute("tab"), tab.as_deref());
    }
}
