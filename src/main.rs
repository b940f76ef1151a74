use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use tracing::info;

use tripdeck::artifact::{ArtifactKind, Upload};
use tripdeck::config::DashboardConfig;
use tripdeck::dashboard::{DashboardInput, build_view};
use tripdeck::{logging, validate_budget, validate_duration, view, web};

#[derive(Parser)]
#[command(
    name = "tripdeck",
    version,
    about = "Trip planning dashboard for search, hotel package and report artifacts"
)]
struct Cli {
    /// Configuration file (TOML)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Serve the dashboard over HTTP (default)
    Serve {
        #[arg(long)]
        host: Option<String>,
        #[arg(short, long)]
        port: Option<u16>,
    },
    /// Render the dashboard page for local files and print it to stdout
    Render(RenderArgs),
    /// Check budget and duration values
    Check {
        #[arg(long, default_value = "")]
        budget: String,
        #[arg(long, default_value = "")]
        duration: String,
    },
}

#[derive(Args)]
struct RenderArgs {
    #[arg(long)]
    search_queries: Option<PathBuf>,
    #[arg(long)]
    search_results: Option<PathBuf>,
    #[arg(long)]
    trip_packages: Option<PathBuf>,
    #[arg(long)]
    html_report: Option<PathBuf>,
    #[arg(long)]
    country: Option<String>,
    #[arg(long)]
    city: Option<String>,
    #[arg(long)]
    budget: Option<String>,
    #[arg(long)]
    trip_type: Option<String>,
    #[arg(long)]
    duration: Option<String>,
}

impl RenderArgs {
    fn path(&self, kind: ArtifactKind) -> Option<&Path> {
        match kind {
            ArtifactKind::SearchQueries => self.search_queries.as_deref(),
            ArtifactKind::SearchResults => self.search_results.as_deref(),
            ArtifactKind::HotelPackages => self.trip_packages.as_deref(),
            ArtifactKind::HtmlReport => self.html_report.as_deref(),
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = DashboardConfig::load_from_path(cli.config.clone())
        .context("Failed to load configuration")?;
    logging::init(&config.logging, cli.verbose)?;

    match cli.command.unwrap_or(Command::Serve {
        host: None,
        port: None,
    }) {
        Command::Serve { host, port } => {
            if let Some(host) = host {
                config.server.host = host;
            }
            if let Some(port) = port {
                config.server.port = port;
            }
            config.validate()?;
            info!(config = ?cli.config, "Starting tripdeck {}", tripdeck::VERSION);
            web::run(config).await
        }
        Command::Render(args) => {
            println!("{}", render_page(&config, &args));
            Ok(())
        }
        Command::Check { budget, duration } => {
            println!("budget {budget:?}: {}", verdict(validate_budget(&budget)));
            println!("duration {duration:?}: {}", verdict(validate_duration(&duration)));
            Ok(())
        }
    }
}

fn render_page(config: &DashboardConfig, args: &RenderArgs) -> String {
    let mut params = config.defaults.trip_parameters();
    let overrides = [
        (&mut params.country, &args.country),
        (&mut params.city, &args.city),
        (&mut params.budget, &args.budget),
        (&mut params.trip_type, &args.trip_type),
        (&mut params.duration, &args.duration),
    ];
    for (slot, value) in overrides {
        if let Some(value) = value {
            slot.clone_from(value);
        }
    }

    let mut input = DashboardInput::new(params);
    for kind in ArtifactKind::ALL {
        let Some(path) = args.path(kind) else {
            continue;
        };
        match Upload::read(path) {
            Ok(upload) => input.set_upload(kind, upload),
            Err(e) => input.set_unreadable(kind, &e),
        }
    }

    view::page(&build_view(&input, &config.report)).into_string()
}

fn verdict(valid: bool) -> &'static str {
    if valid { "valid" } else { "invalid" }
}
