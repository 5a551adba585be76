//! `showcase`: terminal portfolio and course journey.
//!
//! Built on [ratatui](https://ratatui.rs). Three tabs, switched with number
//! keys (1-3): the profile, the auto-advancing weekly carousel (with a detail
//! page per week), and a contact form delivered through EmailJS.
//!
//! Logs are written to a file (default under the platform data dir) so the
//! terminal stays clean. Settings come from `config.toml` and `SHOWCASE_*`
//! environment variables, with CLI flags taking precedence.

mod action;
mod app;
mod component;
mod event;
mod screen;
mod screens;
mod theme;
mod tui;
mod widgets;

use std::path::PathBuf;
use std::str::FromStr;
use std::sync::Arc;

use clap::Parser;
use color_eyre::eyre::{Result, WrapErr, eyre};
use tracing::info;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use showcase_config::{Config, ConfigError};
use showcase_core::Catalog;
use showcase_mail::EmailJsClient;

use crate::app::{App, AppOptions};
use crate::theme::ThemeName;

/// Terminal portfolio with an auto-advancing course journey.
#[derive(Parser, Debug)]
#[command(name = "showcase", version, about)]
struct Cli {
    /// Config file (defaults to the platform config dir)
    #[arg(short, long, env = "SHOWCASE_CONFIG")]
    config: Option<PathBuf>,

    /// Weekly carousel autoplay interval in milliseconds
    #[arg(short = 'i', long)]
    interval_ms: Option<u64>,

    /// Start with the weekly carousel paused
    #[arg(long)]
    no_autoplay: bool,

    /// Initial theme (light, dark, blue, green, orange)
    #[arg(short, long)]
    theme: Option<String>,

    /// Load course content from a TOML file instead of the built-in catalog
    #[arg(long)]
    catalog: Option<PathBuf>,

    /// Log file path (defaults to <data dir>/showcase.log)
    #[arg(long)]
    log_file: Option<PathBuf>,

    /// Write the effective config to the config path and exit
    #[arg(long)]
    init_config: bool,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

/// Set up file-based tracing. Nothing may log to stdout/stderr while the
/// terminal is in raw mode. The returned guard flushes logs on drop.
fn setup_tracing(cli: &Cli) -> WorkerGuard {
    let log_level = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!(
            "showcase_tui={log_level},showcase_core={log_level},showcase_mail={log_level}"
        ))
    });

    let log_file = cli
        .log_file
        .clone()
        .unwrap_or_else(|| showcase_config::data_dir().join("showcase.log"));
    let log_dir = log_file
        .parent()
        .map_or_else(std::env::temp_dir, std::path::Path::to_path_buf);
    let _ = std::fs::create_dir_all(&log_dir);
    let log_filename = log_file
        .file_name()
        .unwrap_or(std::ffi::OsStr::new("showcase.log"));

    let file_appender = tracing_appender::rolling::never(&log_dir, log_filename);
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_writer(non_blocking)
                .with_ansi(false)
                .with_target(true)
                .with_thread_ids(true),
        )
        .init();

    guard
}

/// Config file + env, then CLI overrides on top.
fn resolve_config(cli: &Cli) -> Result<Config> {
    let path = cli.config.clone().unwrap_or_else(showcase_config::config_path);
    let mut config = showcase_config::load_config_from(&path)
        .wrap_err_with(|| format!("failed to load {}", path.display()))?;

    if let Some(ms) = cli.interval_ms {
        config.carousel.interval_ms = ms;
    }
    if cli.no_autoplay {
        config.carousel.autoplay = false;
    }
    if let Some(ref name) = cli.theme {
        config.theme.name.clone_from(name);
    }
    if let Some(ref catalog) = cli.catalog {
        config.content.path = Some(catalog.clone());
    }
    config.validate()?;
    Ok(config)
}

/// Build the EmailJS client, or `None` when delivery is not configured.
fn build_mailer(config: &Config) -> Result<Option<Arc<EmailJsClient>>> {
    match showcase_config::mail_setup(&config.contact) {
        Ok(setup) => {
            let client = EmailJsClient::new(setup.endpoint, setup.credentials, setup.timeout)?;
            Ok(Some(Arc::new(client)))
        }
        Err(ConfigError::NoCredentials { what }) => {
            info!(%what, "contact delivery disabled");
            Ok(None)
        }
        Err(e) => Err(e.into()),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Install panic/error hooks BEFORE entering the terminal
    tui::install_hooks()?;

    // Tracing to file; hold the guard so logs flush on exit
    let _log_guard = setup_tracing(&cli);

    let config = resolve_config(&cli)?;

    if cli.init_config {
        let path = cli.config.clone().unwrap_or_else(showcase_config::config_path);
        showcase_config::save_config_to(&config, &path)?;
        println!("wrote {}", path.display());
        return Ok(());
    }

    let theme = ThemeName::from_str(&config.theme.name)
        .map_err(|_| eyre!("unknown theme '{}'", config.theme.name))?;

    let catalog = match config.content.path {
        Some(ref path) => Catalog::from_path(path)
            .wrap_err_with(|| format!("failed to load catalog {}", path.display()))?,
        None => Catalog::embedded()?,
    };
    let mailer = build_mailer(&config)?;

    info!(
        weeks = catalog.len(),
        interval = %humantime::format_duration(config.carousel.interval()),
        autoplay = config.carousel.autoplay,
        %theme,
        delivery = mailer.is_some(),
        "starting showcase"
    );

    let options = AppOptions {
        catalog: Arc::new(catalog),
        week_interval: config.carousel.interval(),
        week_autoplay: config.carousel.autoplay,
        theme,
        theme_interval: config.theme.interval(),
        theme_autoplay: config.theme.autoplay,
    };

    let mut app = App::new(options, mailer)?;
    app.run().await?;

    Ok(())
}
