// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! vnotify CLI
//!
//! Runs notification scripts against a headless host and manages the
//! overlay settings document.

use std::io::{self, Write};
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;
use vnotify_config_fs::{load_settings_file, FsConfigStore};
use vnotify_core::config::{ConfigService, ConfigStore, SETTINGS_KEY};
use vnotify_core::{OverlayConfig, Viewport};

mod script;

#[derive(Parser, Debug)]
#[command(name = "vnotify", author, version, about = "Viewport notification overlay tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run a step script headlessly and print events as JSON lines
    Run {
        /// Path to the script (JSON array of steps)
        script: PathBuf,
        /// Settings file to start from (defaults apply when omitted)
        #[arg(long)]
        settings: Option<PathBuf>,
        /// Viewport width in pixels
        #[arg(long, default_value_t = 1280.0)]
        width: f32,
        /// Viewport DPI
        #[arg(long, default_value_t = 72.0)]
        dpi: f32,
    },
    /// Inspect or create the settings document
    Settings {
        #[command(subcommand)]
        action: SettingsAction,
    },
}

#[derive(Subcommand, Debug)]
enum SettingsAction {
    /// Write default settings
    Init {
        /// Settings file (defaults to the user config directory)
        #[arg(long)]
        path: Option<PathBuf>,
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
    /// Print the effective settings
    Show {
        /// Settings file (defaults to the user config directory)
        #[arg(long)]
        path: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("warn".parse()?))
        .with_writer(io::stderr)
        .init();

    let stdout = io::stdout();
    let mut out = stdout.lock();
    match cli.command {
        Commands::Run {
            script,
            settings,
            width,
            dpi,
        } => run(&script, settings.as_deref(), Viewport { width, dpi }, &mut out),
        Commands::Settings { action } => match action {
            SettingsAction::Init { path, force } => init_settings(path, force, &mut out),
            SettingsAction::Show { path } => show_settings(path, &mut out),
        },
    }
}

fn run(script: &Path, settings: Option<&Path>, viewport: Viewport, out: &mut impl Write) -> Result<()> {
    if !(viewport.width.is_finite() && viewport.width > 0.0 && viewport.dpi.is_finite()) {
        bail!("viewport must have a positive width and finite dpi");
    }
    let config = match settings {
        Some(path) => load_settings_file(path)
            .with_context(|| format!("failed to load settings from {}", path.display()))?,
        None => OverlayConfig::default(),
    };
    let source = std::fs::read_to_string(script)
        .with_context(|| format!("failed to read {}", script.display()))?;
    let steps = script::parse(&source)?;
    tracing::debug!(steps = steps.len(), "running script");
    script::run(&steps, config, viewport, out)
}

fn store_for(path: Option<PathBuf>) -> Result<FsConfigStore> {
    match path {
        Some(path) => Ok(FsConfigStore::single_file(path)),
        None => FsConfigStore::new().context("no user config directory"),
    }
}

fn init_settings(path: Option<PathBuf>, force: bool, out: &mut impl Write) -> Result<()> {
    let store = store_for(path)?;
    let target = store.path_for(SETTINGS_KEY);
    if !force && store.load_raw(SETTINGS_KEY).is_ok() {
        bail!("{} already exists (use --force to overwrite)", target.display());
    }
    ConfigService::new(store).save_overlay(&OverlayConfig::default())?;
    writeln!(out, "{}", target.display())?;
    Ok(())
}

fn show_settings(path: Option<PathBuf>, out: &mut impl Write) -> Result<()> {
    let service = ConfigService::new(store_for(path)?);
    let config = service.load_overlay()?;
    serde_json::to_writer_pretty(&mut *out, &config)?;
    writeln!(out)?;
    Ok(())
}
