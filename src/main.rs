use std::io::{self, IsTerminal};
use std::net::SocketAddr;
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use shopcheck::cli::{Prompter, read_report, run_check};
use shopcheck::config::{self, Config};
use shopcheck::render::render;
use shopcheck::report::normalize::{NormalizedReport, OverallResult};
use shopcheck::server;
use shopcheck::shopify::http::HttpShopApi;

#[derive(Parser)]
#[command(
    name = "shopcheck",
    version,
    about = "Check that a Shopify store's Admin API credentials work."
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,

    /// Tracing filter, e.g. `shopcheck=debug` (overrides SHOPCHECK_LOG_FILTER)
    #[arg(long, global = true)]
    log_filter: Option<String>,

    /// Admin API version to call (overrides SHOPCHECK_API_VERSION)
    #[arg(long, global = true)]
    api_version: Option<String>,

    /// Upstream scheme, `https` or `http` (overrides SHOPCHECK_UPSTREAM_SCHEME)
    #[arg(long, global = true)]
    upstream_scheme: Option<String>,
}

#[derive(Subcommand)]
enum Command {
    /// Serve the check endpoints over HTTP (default)
    Serve {
        /// Address to listen on (overrides SHOPCHECK_BIND_ADDR)
        #[arg(short, long)]
        bind: Option<SocketAddr>,
    },
    /// Run a single check from the terminal
    Check {
        /// Store URL, e.g. `mystore` or `mystore.myshopify.com` (prompted if omitted)
        #[arg(short, long)]
        store: Option<String>,

        /// Admin API access token (prompted if omitted)
        #[arg(short, long)]
        token: Option<String>,

        /// Print the raw JSON report instead of rendering it
        #[arg(long, default_value_t = false)]
        json: bool,
    },
    /// Render a saved report of any shape. Reads stdin when no file is given.
    Render {
        file: Option<PathBuf>,

        /// Print the normalized report as JSON
        #[arg(long, default_value_t = false)]
        json: bool,
    },
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();
    let mut config = Config::from_env()?;

    if let Some(version) = cli.api_version {
        config.api_version = version;
    }
    if let Some(scheme) = cli.upstream_scheme {
        let scheme = scheme.to_ascii_lowercase();
        config::validate_scheme(&scheme)?;
        config.upstream_scheme = scheme;
    }

    let command = cli.command.unwrap_or(Command::Serve { bind: None });

    // Terminal commands stay quiet unless asked; the server logs at the configured level.
    let filter = match (&cli.log_filter, &command) {
        (Some(filter), _) => filter.clone(),
        (None, Command::Serve { .. }) => config.log_filter.clone(),
        (None, _) => "warn".to_string(),
    };
    init_tracing(&filter);

    match command {
        Command::Serve { bind } => {
            if let Some(bind) = bind {
                config.bind_addr = bind;
            }
            server::serve(config).await?;
            Ok(ExitCode::SUCCESS)
        }
        Command::Check { store, token, json } => handle_check(&config, store, token, json).await,
        Command::Render { file, json } => handle_render(file, json),
    }
}

fn init_tracing(filter: &str) {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(io::stderr)
        .init();
}

async fn handle_check(
    config: &Config,
    store: Option<String>,
    token: Option<String>,
    json: bool,
) -> Result<ExitCode> {
    let api = HttpShopApi::from_config(config)?;
    let interactive = io::stdin().is_terminal();
    let mut prompter = Prompter::new(io::stdin().lock(), io::stdout());

    let outcome = run_check(
        &api,
        &config.api_version,
        store,
        token,
        &mut prompter,
        interactive,
    )
    .await?;

    match (&outcome.raw, json) {
        (Some(raw), true) => println!("{}", serde_json::to_string_pretty(raw)?),
        _ => print_report(&outcome.report, json)?,
    }
    Ok(exit_code(&outcome.report))
}

fn handle_render(file: Option<PathBuf>, json: bool) -> Result<ExitCode> {
    let report = read_report(file.as_deref(), io::stdin())?;
    print_report(&report, json)?;
    Ok(exit_code(&report))
}

fn print_report(report: &NormalizedReport, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(report)?);
    } else {
        print!("{}", render(report));
    }
    Ok(())
}

fn exit_code(report: &NormalizedReport) -> ExitCode {
    match report.overall_result {
        Some(OverallResult::Failed) => ExitCode::FAILURE,
        _ => ExitCode::SUCCESS,
    }
}
