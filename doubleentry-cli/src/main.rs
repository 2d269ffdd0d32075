//! Double-entry CLI — inspect a chart of accounts and resolved handles.
//!
//! Commands:
//! - `accounts` — list the chart's accounts in definition order
//! - `handle` — resolve one account (optionally scoped) and print its identity
//! - `sort` — resolve several accounts and print them in handle order
//!
//! Scoped accounts in the chart are resolved with raw text/integer ids; the
//! CLI has no host entity types to project.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

use doubleentry_core::{AccountChart, AccountHandle, AccountRegistry, Scope, ScopeResolvers};

#[derive(Parser)]
#[command(
    name = "doubleentry",
    about = "Double-entry CLI — chart of accounts and account handles"
)]
struct Cli {
    /// Path to the chart of accounts (TOML).
    #[arg(long, global = true, default_value = "accounts.toml")]
    chart: PathBuf,

    /// Enable debug logging (overridden by RUST_LOG).
    #[arg(short, long, global = true, default_value_t = false)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List defined accounts in definition order.
    Accounts,
    /// Resolve one account handle.
    Handle {
        /// Account identifier.
        identifier: String,

        /// Scope value. Canonical integers (`42`, `-3`) are passed as integers.
        #[arg(long)]
        scope: Option<String>,

        /// Print as JSON.
        #[arg(long, default_value_t = false)]
        json: bool,
    },
    /// Resolve several handles (`identifier` or `identifier@scope`) and print them sorted.
    Sort {
        #[arg(required = true)]
        accounts: Vec<String>,
    },
}

#[derive(Serialize)]
struct HandleReport<'a> {
    identifier: &'a str,
    scoped: bool,
    scope_identity: Option<&'a str>,
    hash_key: String,
    currency: &'a str,
    positive_only: bool,
    negative_only: bool,
}

impl<'a> From<&'a AccountHandle> for HandleReport<'a> {
    fn from(handle: &'a AccountHandle) -> Self {
        Self {
            identifier: handle.identifier(),
            scoped: handle.is_scoped(),
            scope_identity: handle.scope_identity(),
            hash_key: handle.hash_key(),
            currency: handle.currency().code(),
            positive_only: handle.positive_only(),
            negative_only: handle.negative_only(),
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let registry = load_registry(&cli.chart)?;

    match cli.command {
        Commands::Accounts => run_accounts(&registry),
        Commands::Handle {
            identifier,
            scope,
            json,
        } => run_handle(&registry, &identifier, scope.as_deref(), json),
        Commands::Sort { accounts } => run_sort(&registry, &accounts),
    }
}

fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn load_registry(path: &Path) -> Result<AccountRegistry> {
    let chart = AccountChart::from_path(path)
        .with_context(|| format!("loading chart {}", path.display()))?;
    let resolvers = ScopeResolvers::raw_for(chart.scope_kinds());
    let registry = chart.into_registry(&resolvers)?;
    tracing::info!(accounts = registry.len(), "chart loaded");
    Ok(registry)
}

/// Integer only when the text is the integer's canonical form, so ids such
/// as `007` or `+5` keep their spelling.
fn parse_scope(value: &str) -> Scope {
    match value.parse::<i64>() {
        Ok(id) if id.to_string() == value => Scope::Integer(id),
        _ => Scope::Text(value.to_string()),
    }
}

/// `identifier@scope` -> (identifier, Some(scope)); a bare identifier is unscoped.
fn parse_account_arg(arg: &str) -> (&str, Option<Scope>) {
    match arg.split_once('@') {
        Some((identifier, scope)) => (identifier, Some(parse_scope(scope))),
        None => (arg, None),
    }
}

fn run_accounts(registry: &AccountRegistry) -> Result<()> {
    println!(
        "{:<32} {:<12} {:<5} {:<5} {}",
        "IDENTIFIER", "SCOPE", "POS", "NEG", "CURRENCY"
    );
    for account in registry {
        let scope = account.scope_identifier().map(|s| s.kind()).unwrap_or("-");
        println!(
            "{:<32} {:<12} {:<5} {:<5} {}",
            account.identifier(),
            scope,
            account.positive_only(),
            account.negative_only(),
            account.currency()
        );
    }
    println!("{} account(s)", registry.len());
    Ok(())
}

fn run_handle(registry: &AccountRegistry, identifier: &str, scope: Option<&str>, json: bool) -> Result<()> {
    let handle = registry.account(identifier, scope.map(parse_scope))?;
    if json {
        println!("{}", serde_json::to_string_pretty(&HandleReport::from(&handle))?);
    } else {
        println!("{handle}");
        println!("  scope identity: {}", handle.scope_identity().unwrap_or("-"));
        println!("  hash key:       {}", handle.hash_key());
    }
    Ok(())
}

fn run_sort(registry: &AccountRegistry, args: &[String]) -> Result<()> {
    let mut handles = args
        .iter()
        .map(|arg| {
            let (identifier, scope) = parse_account_arg(arg);
            registry
                .account(identifier, scope)
                .with_context(|| format!("resolving {arg}"))
        })
        .collect::<Result<Vec<_>>>()?;
    handles.sort();
    for handle in &handles {
        println!("{}", handle.hash_key());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_scope() {
        assert!(matches!(parse_scope("42"), Scope::Integer(42)));
        assert!(matches!(parse_scope("-3"), Scope::Integer(-3)));
        assert!(matches!(parse_scope("org-1"), Scope::Text(ref s) if s == "org-1"));
    }

    #[test]
    fn test_parse_scope_keeps_non_canonical_integers_as_text() {
        for value in ["007", "+5", "-0", "00"] {
            assert!(
                matches!(parse_scope(value), Scope::Text(ref s) if s == value),
                "{value} should stay text"
            );
        }
        assert!(matches!(parse_scope("0"), Scope::Integer(0)));
    }

    #[test]
    fn test_parse_account_arg() {
        let (identifier, scope) = parse_account_arg("wallet@7");
        assert_eq!(identifier, "wallet");
        assert!(matches!(scope, Some(Scope::Integer(7))));

        let (identifier, scope) = parse_account_arg("cash");
        assert_eq!(identifier, "cash");
        assert!(scope.is_none());
    }

    #[test]
    fn test_cli_parses() {
        let cli = Cli::try_parse_from([
            "doubleentry",
            "--chart",
            "chart.toml",
            "handle",
            "wallet",
            "--scope",
            "7",
            "--json",
        ])
        .unwrap();
        assert_eq!(cli.chart, PathBuf::from("chart.toml"));
        assert!(matches!(
            cli.command,
            Commands::Handle { ref identifier, json: true, .. } if identifier == "wallet"
        ));
    }
}
