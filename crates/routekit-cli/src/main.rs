//! # routekit
//!
//! Check, inspect and exercise a route table from the command line.
//!
//! ## Usage
//!
//! ```bash
//! # Write a commented routekit.toml
//! routekit init
//!
//! # Compile every route and report all errors
//! routekit check
//!
//! # Print the shared prefix tree
//! routekit tree
//!
//! # Match a request (exit code 2 on 404/405)
//! routekit match GET /users/42
//!
//! # Generate a URI for a named route
//! routekit url users.list page=2
//!
//! # Print the compiled regex
//! routekit --strategy single_pattern pattern
//! ```

use clap::{Parser, Subcommand};
use colored::Colorize;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use routekit::{Strategy, Tree};
use routekit_cli::{
    config::{CliArgs, ConfigManager, RoutesFile},
    error::{CliError, CliResult},
    loader::{self, RouteTable},
};

#[derive(Parser)]
#[command(name = "routekit")]
#[command(author, version, about = "Compile, inspect and match HTTP route tables", long_about = None)]
struct Cli {
    /// Route table file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Matching strategy, overrides the file
    #[arg(short, long, global = true)]
    strategy: Option<Strategy>,

    /// URI prefix, overrides the file
    #[arg(long, global = true)]
    uri_prefix: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Write a commented default routekit.toml
    Init {
        /// Output path for the file
        #[arg(short, long, default_value = "routekit.toml")]
        output: PathBuf,

        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },

    /// Compile every route and report all errors
    Check,

    /// Print the shared prefix tree
    Tree,

    /// Match a request against the table
    Match {
        /// Request method, e.g. GET
        method: String,

        /// Request URI; query string and fragment are ignored
        uri: String,
    },

    /// Generate a URI for a named route
    Url {
        /// Route name
        name: String,

        /// Attribute values as key=value
        values: Vec<String>,
    },

    /// Print the compiled regex of a pattern strategy
    Pattern,
}

fn main() -> ExitCode {
    init_tracing();
    let cli = Cli::parse();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            print_error(&e);
            ExitCode::from(e.exit_code())
        }
    }
}

fn init_tracing() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "routekit=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn run(cli: Cli) -> CliResult<()> {
    let args = CliArgs {
        strategy: cli.strategy,
        uri_prefix: cli.uri_prefix,
    };

    match cli.command {
        Commands::Init { output, force } => cmd_init(output, force),
        Commands::Check => cmd_check(load(cli.config, &args)?),
        Commands::Tree => cmd_tree(load(cli.config, &args)?),
        Commands::Match { method, uri } => cmd_match(load(cli.config, &args)?, &method, &uri),
        Commands::Url { name, values } => cmd_url(load(cli.config, &args)?, &name, &values),
        Commands::Pattern => cmd_pattern(load(cli.config, &args)?),
    }
}

fn load(path: Option<PathBuf>, args: &CliArgs) -> CliResult<RoutesFile> {
    let file = ConfigManager::load(path.as_deref())?;
    Ok(ConfigManager::merge_cli_args(file, args))
}

/// Init command implementation.
fn cmd_init(output: PathBuf, force: bool) -> CliResult<()> {
    ConfigManager::write_default(&output, force)?;
    println!("{} {}", "Created".green(), output.display());
    Ok(())
}

/// Check command implementation.
fn cmd_check(file: RoutesFile) -> CliResult<()> {
    let router = loader::check(&file)?;
    println!(
        "{} {} route(s) compiled with {}",
        "OK".green().bold(),
        router.routes().len(),
        router.strategy().to_string().cyan()
    );
    Ok(())
}

/// Tree command implementation.
fn cmd_tree(file: RoutesFile) -> CliResult<()> {
    let router = loader::build_router(&file)?;
    let tree = Tree::build(router.routes());
    print!("{}", tree);
    println!();
    for (index, route) in router.routes().iter().enumerate() {
        println!("  {} {}", format!("#{}", index).dimmed(), route);
    }
    Ok(())
}

/// Match command implementation.
fn cmd_match(file: RoutesFile, method: &str, uri: &str) -> CliResult<()> {
    let router: RouteTable = loader::build_router(&file)?;

    match router.match_uri(method, uri) {
        Ok(matched) => {
            println!("{} {}", "200".green().bold(), matched.route());
            println!("  handler: {}", matched.handler().cyan());
            for (name, value) in matched.request().attributes() {
                println!("  {} = {}", name.yellow(), value);
            }
            Ok(())
        }
        Err(failure) if failure.is_not_found() => Err(CliError::NoMatch {
            status: failure.status_code(),
            message: format!("Not Found: {} {}", method, failure.request().path()),
        }),
        Err(failure) => Err(CliError::NoMatch {
            status: failure.status_code(),
            message: format!("Method Not Allowed (Allow: {})", failure.allow_header()),
        }),
    }
}

/// Url command implementation.
fn cmd_url(file: RoutesFile, name: &str, values: &[String]) -> CliResult<()> {
    let values = loader::parse_assignments(values)?;
    let router = loader::build_router(&file)?;
    let uri = router.uri(name, values)?;
    println!("{}", uri);
    Ok(())
}

/// Pattern command implementation.
fn cmd_pattern(file: RoutesFile) -> CliResult<()> {
    let router = loader::build_router(&file)?;
    let strategy = router.strategy();
    if !strategy.is_pattern() {
        return Err(CliError::invalid_argument(
            strategy.to_string(),
            "only multi_pattern, single_pattern and tree_pattern compile to regular expressions",
        ));
    }

    let patterns = router.patterns();
    if patterns.is_empty() {
        println!("{}", "No routes.".yellow());
    } else if strategy == Strategy::MultiPattern {
        for (route, pattern) in router.routes().iter().zip(patterns) {
            println!("{}", route.to_string().dimmed());
            println!("  {}", pattern);
        }
    } else {
        for pattern in patterns {
            println!("{}", pattern);
        }
    }
    Ok(())
}

fn print_error(error: &CliError) {
    match error {
        CliError::NoMatch { .. } => eprintln!("{}", error.to_string().yellow().bold()),
        CliError::Check(failures) => {
            for failure in failures {
                eprintln!("{} {}", "error:".red().bold(), failure);
            }
            eprintln!("{} {}", "error:".red().bold(), error);
        }
        _ => eprintln!("{} {}", "error:".red().bold(), error),
    }
}
