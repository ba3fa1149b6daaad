use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use tracing::debug;

use upstream_version::config::{self, Config};
use upstream_version::logging;
use upstream_version::output::{self, OutputFormat};
use upstream_version::version::aggregator::{Aggregator, Mode};
use upstream_version::version::builtin::builtin_registry;
use upstream_version::version::cache::FileCache;
use upstream_version::version::catalog::PackageCatalog;
use upstream_version::version::fetcher::HttpFetcher;

#[derive(Parser)]
#[command(name = "upstream-version")]
#[command(version, about = "Report the latest upstream release of well-known software")]
struct Cli {
    #[command(flatten)]
    global: GlobalArgs,

    #[command(subcommand)]
    command: Command,
}

#[derive(Args)]
struct GlobalArgs {
    /// Output format
    #[arg(long, value_enum, global = true, default_value_t = OutputFormat::Plain)]
    format: OutputFormat,

    /// Maximum number of packages resolved at once
    #[arg(short, long, global = true)]
    jobs: Option<usize>,

    /// Per-request timeout in seconds
    #[arg(long, global = true, value_parser = clap::value_parser!(u64).range(1..))]
    timeout: Option<u64>,

    /// JSON configuration file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Command {
    /// List known package names
    List {
        /// Group names by category
        #[arg(long)]
        categories: bool,
    },
    /// Resolve every known package
    All {
        /// Resolve one package at a time, in catalog order
        #[arg(long)]
        serial: bool,
    },
    /// Resolve the given packages
    Get {
        #[arg(required = true)]
        names: Vec<String>,

        /// Resolve one package at a time, in catalog order
        #[arg(long)]
        serial: bool,
    },
    /// List known packages whose version cannot currently be determined
    Missing,
    /// Manage the response cache
    Cache {
        #[command(subcommand)]
        action: CacheAction,
    },
}

#[derive(Subcommand)]
enum CacheAction {
    /// Remove every cached response
    Clear,
}

fn mode(serial: bool) -> Mode {
    if serial { Mode::Serial } else { Mode::Concurrent }
}

fn load_config(global: &GlobalArgs) -> anyhow::Result<Config> {
    let mut config = match &global.config {
        Some(path) => Config::load(path)?,
        None => Config::default(),
    };
    if let Some(jobs) = global.jobs {
        config.fetch.concurrency = jobs;
    }
    if let Some(timeout) = global.timeout {
        config.fetch.timeout_ms = timeout.saturating_mul(1000);
    }
    Ok(config)
}

fn build_aggregator(config: &Config) -> anyhow::Result<Aggregator> {
    let cache_dir = config.cache_dir();
    debug!("Using cache directory {}", cache_dir.display());

    let cache = FileCache::new(&cache_dir, config.cache_ttl())
        .with_context(|| format!("cannot use cache directory {}", cache_dir.display()))?;
    let fetcher = HttpFetcher::new(Arc::new(cache), config.fetch_timeout())?;

    Ok(
        Aggregator::new(Arc::new(builtin_registry()), Arc::new(fetcher))
            .with_concurrency(config.concurrency()),
    )
}

async fn run(cli: Cli) -> anyhow::Result<String> {
    let config = load_config(&cli.global)?;
    let format = cli.global.format;

    let rendered = match cli.command {
        Command::List { categories } => {
            let catalog = PackageCatalog::from_registry(&builtin_registry());
            if categories {
                output::render_categories(catalog.by_category(), format)?
            } else {
                output::render_names(&catalog.names(), format)?
            }
        }
        Command::All { serial } => {
            let results = build_aggregator(&config)?.resolve_all(mode(serial)).await?;
            output::render(&results, format)?
        }
        Command::Get { names, serial } => {
            let results = build_aggregator(&config)?
                .resolve(&names, mode(serial))
                .await?;
            output::render(&results, format)?
        }
        Command::Missing => {
            let missing = build_aggregator(&config)?.missing().await?;
            output::render_names(&missing, format)?
        }
        Command::Cache {
            action: CacheAction::Clear,
        } => {
            let cache = FileCache::new(&config.cache_dir(), config.cache_ttl())?;
            let removed = cache.clear()?;
            eprintln!(
                "Removed {} cached responses from {}",
                removed,
                cache.dir().display()
            );
            String::new()
        }
    };
    Ok(rendered)
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let _guard = logging::init(cli.global.verbose, config::log_path().as_deref());

    let rendered = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?
        .block_on(run(cli))?;

    print!("{}", rendered);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use serial_test::serial;

    #[test]
    fn timeout_flag_overrides_config_in_milliseconds() {
        let cli = Cli::try_parse_from(["upstream-version", "--timeout", "7", "all"]).unwrap();

        let config = load_config(&cli.global).unwrap();

        assert_eq!(config.fetch.timeout_ms, 7_000);
    }

    #[test]
    fn huge_timeout_saturates_instead_of_wrapping() {
        let max = u64::MAX.to_string();
        let cli = Cli::try_parse_from(["upstream-version", "--timeout", &max, "all"]).unwrap();

        let config = load_config(&cli.global).unwrap();

        assert_eq!(config.fetch.timeout_ms, u64::MAX);
    }

    #[rstest]
    #[case("0")]
    #[case("-1")]
    fn timeout_flag_rejects_non_positive_values(#[case] value: &str) {
        let result = Cli::try_parse_from(["upstream-version", "all", "--timeout", value]);
        assert!(result.is_err());
    }

    #[test]
    #[serial]
    fn list_works_without_a_usable_cache_directory() {
        // A path below a regular file can never be created
        let file = tempfile::NamedTempFile::new().unwrap();
        unsafe { std::env::set_var(config::CACHE_DIR_ENV, file.path().join("cache")) };

        let cli = Cli::try_parse_from(["upstream-version", "list"]).unwrap();
        let rendered = tokio::runtime::Builder::new_current_thread()
            .build()
            .unwrap()
            .block_on(run(cli));

        unsafe { std::env::remove_var(config::CACHE_DIR_ENV) };
        assert!(rendered.unwrap().lines().any(|line| line == "bash"));
    }
}
