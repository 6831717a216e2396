//! Configuration management for the CLI.
//!
//! This module handles loading the route table from `routekit.toml` files
//! and merging it with command-line arguments.

use crate::error::{CliResult, ConfigError};
use routekit::{RouterConfig, Strategy};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Default configuration filename.
pub const CONFIG_FILENAME: &str = "routekit.toml";

/// A route table file.
#[derive(Debug, Default, Clone, Deserialize)]
#[serde(default)]
pub struct RoutesFile {
    /// Router settings.
    pub router: RouterConfig,

    /// Extra or overriding type patterns, by type name.
    pub types: BTreeMap<String, String>,

    /// Routes in registration order.
    pub routes: Vec<RouteEntry>,
}

/// One `[[routes]]` entry.
#[derive(Debug, Clone, Deserialize)]
pub struct RouteEntry {
    /// Name used for URI generation.
    #[serde(default)]
    pub name: Option<String>,

    /// HTTP method.
    #[serde(default = "default_method")]
    pub method: String,

    /// Route definition, e.g. `/users/{id:number}`.
    pub path: String,

    /// Free-form handler label printed on a match.
    #[serde(default)]
    pub handler: Option<String>,
}

fn default_method() -> String {
    "GET".to_string()
}

impl RouteEntry {
    /// Handler label, falling back to the route name and then the definition.
    pub fn handler_label(&self) -> String {
        self.handler
            .clone()
            .or_else(|| self.name.clone())
            .unwrap_or_else(|| format!("{} {}", self.method, self.path))
    }
}

/// CLI overrides applied on top of the file.
#[derive(Debug, Default, Clone)]
pub struct CliArgs {
    /// `--strategy`
    pub strategy: Option<Strategy>,
    /// `--uri-prefix`
    pub uri_prefix: Option<String>,
}

/// Configuration manager for loading and merging configs.
pub struct ConfigManager;

impl ConfigManager {
    /// Load a route table from a file path.
    ///
    /// If the path is None, loads `routekit.toml` from the working directory.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::NotFound`] if the file does not exist.
    pub fn load(path: Option<&Path>) -> CliResult<RoutesFile> {
        let config_path = Self::resolve(path);

        if !config_path.exists() {
            return Err(ConfigError::NotFound { path: config_path }.into());
        }

        let content = std::fs::read_to_string(&config_path).map_err(|e| ConfigError::Io {
            path: config_path.clone(),
            source: e,
        })?;

        let file = Self::parse(&config_path, &content)?;
        tracing::debug!(
            path = %config_path.display(),
            routes = file.routes.len(),
            types = file.types.len(),
            "Loaded route table"
        );
        Ok(file)
    }

    /// Parse a route table from TOML text; `path` is only used in errors.
    pub fn parse(path: &Path, content: &str) -> CliResult<RoutesFile> {
        let file: RoutesFile = toml::from_str(content)
            .map_err(|e| ConfigError::invalid_toml(path, e.to_string()))?;
        Ok(file)
    }

    /// Merge CLI arguments into configuration.
    ///
    /// CLI arguments take precedence over config file values.
    pub fn merge_cli_args(mut file: RoutesFile, args: &CliArgs) -> RoutesFile {
        if let Some(strategy) = args.strategy {
            file.router.strategy = strategy;
        }

        if let Some(ref prefix) = args.uri_prefix {
            file.router.uri_prefix = prefix.clone();
        }

        file
    }

    /// Write the commented default file to `path`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::AlreadyExists`] if the file exists and `force`
    /// is not set.
    pub fn write_default(path: &Path, force: bool) -> CliResult<()> {
        if path.exists() && !force {
            return Err(ConfigError::AlreadyExists {
                path: path.to_path_buf(),
            }
            .into());
        }
        std::fs::write(path, Self::default_config_content()).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;
        Ok(())
    }

    /// Generate default configuration file content with comments.
    pub fn default_config_content() -> &'static str {
        r#"# routekit route table

[router]
# Matching strategy: multi_pattern, single_pattern, tree_pattern, linear or tree
strategy = "tree_pattern"

# Prepended to every generated URI ("" or "/mount", no trailing slash)
uri_prefix = ""

# Extra or overriding attribute types, name = "regex"
# Built in: any (implicit), alnum, alpha, date, digit, number, word
[types]
slug = "[a-z0-9]+(?:-[a-z0-9]+)*"

# Routes are tried in the order they appear here; the first match wins.
[[routes]]
name = "home"
method = "GET"
path = "/"
handler = "pages::home"

[[routes]]
name = "users.list"
method = "GET"
path = "/users[/page/{page:number}]"
handler = "users::list"

[[routes]]
name = "users.show"
method = "GET"
path = "/users/{id:number}"
handler = "users::show"

[[routes]]
method = "PUT"
path = "/users/{id:number}"
handler = "users::update"

[[routes]]
name = "posts.show"
method = "GET"
path = "/posts/{slug:slug}"
handler = "posts::show"
"#
    }

    fn resolve(path: Option<&Path>) -> PathBuf {
        path.map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(CONFIG_FILENAME))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_content_parses() {
        let file =
            ConfigManager::parse(Path::new("routekit.toml"), ConfigManager::default_config_content())
                .unwrap();
        assert_eq!(file.router, RouterConfig::default());
        assert_eq!(file.routes.len(), 5);
        assert_eq!(file.types.get("slug").map(String::as_str), Some("[a-z0-9]+(?:-[a-z0-9]+)*"));
    }

    #[test]
    fn test_empty_file_is_default() {
        let file = ConfigManager::parse(Path::new("x.toml"), "").unwrap();
        assert!(file.routes.is_empty());
        assert!(file.types.is_empty());
        assert_eq!(file.router.strategy, Strategy::TreePattern);
    }

    #[test]
    fn test_route_entry_defaults() {
        let file = ConfigManager::parse(
            Path::new("x.toml"),
            r#"
[[routes]]
path = "/a"
"#,
        )
        .unwrap();
        let entry = &file.routes[0];
        assert_eq!(entry.method, "GET");
        assert_eq!(entry.name, None);
        assert_eq!(entry.handler_label(), "GET /a");
    }

    #[test]
    fn test_strategy_is_snake_case() {
        let file = ConfigManager::parse(
            Path::new("x.toml"),
            "[router]\nstrategy = \"single_pattern\"\n",
        )
        .unwrap();
        assert_eq!(file.router.strategy, Strategy::SinglePattern);
    }

    #[test]
    fn test_invalid_toml_names_the_file() {
        let err = ConfigManager::parse(Path::new("broken.toml"), "[[routes]]\nmethod = 1\n")
            .unwrap_err();
        assert!(err.to_string().contains("broken.toml"));
    }

    #[test]
    fn test_cli_args_take_precedence() {
        let file = RoutesFile::default();
        let args = CliArgs {
            strategy: Some(Strategy::Linear),
            uri_prefix: Some("/api".to_string()),
        };
        let merged = ConfigManager::merge_cli_args(file, &args);
        assert_eq!(merged.router.strategy, Strategy::Linear);
        assert_eq!(merged.router.uri_prefix, "/api");
    }

    #[test]
    fn test_merge_keeps_file_values_without_overrides() {
        let mut file = RoutesFile::default();
        file.router.strategy = Strategy::Tree;
        let merged = ConfigManager::merge_cli_args(file, &CliArgs::default());
        assert_eq!(merged.router.strategy, Strategy::Tree);
    }
}
