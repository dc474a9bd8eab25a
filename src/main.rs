use std::io::Write;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use ngxbrew::app::output::{write_installed, write_resolution, write_versions};
use ngxbrew::app::resolver::VersionResolver;
use ngxbrew::config::Config;
use ngxbrew::version::fetcher::HttpCatalogFetcher;
use ngxbrew::version::types::Family;

#[derive(Parser)]
#[command(name = "ngxbrew")]
#[command(version, about = "Resolve and list nginx/openresty builds")]
struct Cli {
    /// Always fetch the catalog instead of reading the cache
    #[arg(long, global = true)]
    no_cache: bool,

    /// Drop the cached catalog before loading it
    #[arg(long, global = true)]
    refresh: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Resolve a (partial) version such as "1.9" or "openresty-1.9"
    Resolve { version: String },
    /// List nginx versions
    Nginxes {
        /// Only versions starting with this prefix
        #[arg(long)]
        head: Option<String>,
    },
    /// List openresty versions
    Openresties {
        #[arg(long)]
        head: Option<String>,
    },
    /// List installed builds
    List,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut config = Config::from_env();
    if cli.no_cache {
        config = config.without_cache();
    }
    let _guard = ngxbrew::logging::init(&config.log_path())?;

    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?
        .block_on(run(cli, config))
}

async fn run(cli: Cli, config: Config) -> anyhow::Result<()> {
    let resolver = VersionResolver::new(&config, Arc::new(HttpCatalogFetcher::default()));
    let mut out = std::io::stdout().lock();

    match cli.command {
        Command::Resolve { version } => {
            let (_, family) = ngxbrew::version::naming::resolve(&version);
            if cli.refresh {
                resolver.refresh(family)?;
            }
            writeln!(out, "checking version ...")?;
            let resolution = resolver.resolve(&version).await?;
            write_resolution(&mut out, &resolution)?;
        }
        Command::Nginxes { head } => {
            list_versions(&resolver, &mut out, Family::Nginx, head, cli.refresh).await?
        }
        Command::Openresties { head } => {
            list_versions(&resolver, &mut out, Family::Openresty, head, cli.refresh).await?
        }
        Command::List => {
            let builds = resolver.installed()?;
            write_installed(&mut out, &builds)?;
        }
    }

    Ok(())
}

async fn list_versions(
    resolver: &VersionResolver,
    out: &mut impl Write,
    family: Family,
    head: Option<String>,
    refresh: bool,
) -> anyhow::Result<()> {
    if refresh {
        resolver.refresh(family)?;
    }
    let versions = resolver.versions(family, head.as_deref()).await?;
    write_versions(out, family, &versions)?;
    Ok(())
}
