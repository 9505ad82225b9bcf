mod config;
mod logging;
mod render;

use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::mpsc;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{anyhow, Context};
use clap::{Parser, Subcommand, ValueEnum};
use dashboard_core::{ArtifactId, ArtifactKind};
use dashboard_engine::{ChannelNotificationSink, Dashboard, DownloadError};
use dashboard_logging::{dashboard_error, dashboard_info};

use config::DashboardConfig;
use logging::LogDestination;

#[derive(Parser)]
#[command(name = "dashboard")]
#[command(about = "Drive a content-acquisition service: submit jobs, browse and download results")]
struct Cli {
    /// RON configuration file; missing file means defaults.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Service base URL, e.g. http://localhost:8000/api
    #[arg(long)]
    base_url: Option<String>,

    /// Directory downloads are saved into.
    #[arg(long)]
    download_dir: Option<PathBuf>,

    #[arg(long, value_enum)]
    log: Option<LogDestination>,

    /// Log at debug level.
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Check that the service is up
    Health,
    /// Submit an acquisition job
    Submit {
        /// Page URL to acquire from (repeatable)
        #[arg(long = "url")]
        urls: Vec<String>,
        /// Search keyword (repeatable)
        #[arg(long = "keyword")]
        keywords: Vec<String>,
        /// Wait for the post-submission refresh and print the lists
        #[arg(long)]
        wait: bool,
    },
    /// Ask the service to store one media URL right away
    Fetch {
        url: String,
    },
    /// List stored media or documents
    List {
        #[arg(value_enum)]
        kind: KindArg,
    },
    /// Save one stored artifact locally
    Download {
        #[arg(value_enum)]
        kind: KindArg,
        id: String,
        /// File name to save as
        #[arg(long)]
        name: Option<String>,
    },
    /// Generate or download the report bundle
    Report {
        #[command(subcommand)]
        action: ReportAction,
    },
}

#[derive(Subcommand)]
enum ReportAction {
    Generate,
    Download,
}

#[derive(Clone, Copy, ValueEnum)]
enum KindArg {
    Media,
    Documents,
}

impl From<KindArg> for ArtifactKind {
    fn from(kind: KindArg) -> Self {
        match kind {
            KindArg::Media => ArtifactKind::Media,
            KindArg::Documents => ArtifactKind::Document,
        }
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let mut config = match load_file_config(&cli) {
        Ok(config) => config,
        Err(err) => {
            eprintln!("error: {err:#}");
            return ExitCode::FAILURE;
        }
    };
    // Logging starts before the overrides so they can be logged.
    logging::initialize(config.log_destination, cli.verbose);
    apply_overrides(&cli, &mut config, |name| std::env::var(name).ok());

    let (tx, rx) = mpsc::channel();
    let outcome = match Dashboard::new(
        config.dashboard_settings(),
        Arc::new(ChannelNotificationSink::new(tx)),
    ) {
        Ok(dashboard) => run(&dashboard, &config, cli.command).await,
        Err(err) => Err(err.into()),
    };

    // Failures already on the channel are printed once, from there.
    let mut reported = false;
    for notification in rx.try_iter() {
        eprintln!("{}", render::render_notification(&notification));
        reported = true;
    }
    match outcome {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            dashboard_error!("Command failed: {:#}", err);
            if !reported {
                eprintln!("error: {err:#}");
            }
            ExitCode::FAILURE
        }
    }
}

/// The config file plus the `--log` flag: everything logging needs.
fn load_file_config(cli: &Cli) -> anyhow::Result<DashboardConfig> {
    let mut config = DashboardConfig::load(cli.config.as_deref())?;
    if let Some(destination) = cli.log {
        config.log_destination = destination;
    }
    Ok(config)
}

/// Environment first, then command-line flags.
fn apply_overrides(
    cli: &Cli,
    config: &mut DashboardConfig,
    var: impl Fn(&str) -> Option<String>,
) {
    config.apply_env(var);
    if let Some(base_url) = &cli.base_url {
        config.base_url = base_url.clone();
    }
    if let Some(dir) = &cli.download_dir {
        config.download_dir = dir.clone();
    }
}

async fn run(
    dashboard: &Dashboard,
    config: &DashboardConfig,
    command: Commands,
) -> anyhow::Result<()> {
    match command {
        Commands::Health => {
            let health = dashboard.health().await?;
            println!("{}", render::render_health(&health));
        }
        Commands::Submit {
            urls,
            keywords,
            wait,
        } => {
            let acceptance = dashboard.coordinator().submit(&urls, &keywords).await?;
            println!("{}", render::render_acceptance(&acceptance));
            if wait && acceptance.is_accepted() {
                // The refresh task runs on this runtime while we sleep.
                tokio::time::sleep(config.refresh_delay() + Duration::from_millis(500)).await;
                print_lines(render::render(&dashboard.view()));
            }
        }
        Commands::Fetch { url } => {
            let outcome = dashboard.coordinator().download_now(&url).await?;
            println!("{}", render::render_direct_download(&outcome));
            if outcome.success {
                let view = dashboard.view();
                print_lines(render::render_collection(
                    ArtifactKind::Media,
                    &view.media,
                    &view.media_rows(),
                ));
            }
        }
        Commands::List { kind } => {
            let kind = ArtifactKind::from(kind);
            dashboard.collection(kind).refresh().await?;
            let view = dashboard.view();
            let (state, rows) = match kind {
                ArtifactKind::Media => (&view.media, view.media_rows()),
                ArtifactKind::Document => (&view.documents, view.document_rows()),
            };
            print_lines(render::render_collection(kind, state, &rows));
        }
        Commands::Download { kind, id, name } => {
            let kind = ArtifactKind::from(kind);
            let id = ArtifactId::new(id.trim());
            dashboard.collection(kind).refresh().await?;
            let artifact = dashboard
                .collection(kind)
                .current_state()
                .items
                .into_iter()
                .find(|artifact| artifact.id == id)
                .ok_or_else(|| anyhow!("no {kind} item with id {id}"))?;
            if !artifact.is_downloadable() {
                return Err(anyhow!("{kind} item {id} is not stored on the service yet"));
            }
            let path = dashboard
                .downloads(kind)
                .download(&artifact, name.as_deref())
                .await
                .with_context(|| format!("downloading {kind} item {id}"))?;
            dashboard_info!("Saved {} item {} to {:?}", kind, id, path);
            println!("Saved {}", path.display());
        }
        Commands::Report { action } => match action {
            ReportAction::Generate => {
                let status = dashboard.reports().generate().await?;
                println!("{}", render::render_report_status(&status));
            }
            ReportAction::Download => match dashboard.reports().download().await {
                Ok(path) => println!("Saved {}", path.display()),
                Err(DownloadError::AlreadyInFlight { .. }) => {
                    println!("Report download already running")
                }
                Err(err) => return Err(err.into()),
            },
        },
    }
    Ok(())
}

fn print_lines(lines: Vec<String>) {
    for line in lines {
        println!("{line}");
    }
}
