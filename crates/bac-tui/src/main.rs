// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

//! Interactive autocomplete demo.

use std::io;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use bac_core::{AutocompleteController, AutocompleteOptions, HeadlessSurface, Resource};
use bac_runtime::{AutocompleteRuntime, HttpTransport};
use bac_tui::{App, DemoCallbacks, TerminalConfig, cleanup_terminal, demo, setup_terminal};
use clap::Parser;
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use tracing::info;
use url::Url;

#[derive(Debug, Parser)]
#[command(name = "bac", about = "Try the autocomplete controller in a terminal")]
struct Args {
    /// Look suggestions up at this endpoint instead of a local collection
    #[arg(long, conflicts_with = "collection")]
    remote: Option<Url>,

    /// JSON array of suggestions to match locally
    #[arg(long)]
    collection: Option<PathBuf>,

    /// Options file, TOML or JSON
    #[arg(long, env = "BAC_OPTIONS")]
    options: Option<PathBuf>,

    #[command(flatten)]
    logging: bac_logging::CliLoggingArgs,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    args.logging.init("bac-tui", true)?;

    let options = match &args.options {
        Some(path) => demo::load_options(path)?,
        None => AutocompleteOptions::default(),
    };
    let resource = match (&args.remote, &args.collection) {
        (Some(url), _) => Resource::remote(url.as_str()),
        (None, Some(path)) => Resource::Local(demo::load_collection(path)?),
        (None, None) => Resource::Local(demo::colors()),
    };
    info!(mode = ?resource.mode(), "starting autocomplete demo");

    let callbacks = DemoCallbacks::new();
    let last_selected = callbacks.last_selected();
    let controller = demo::demo_controller(resource, &options, callbacks);
    let transport = HttpTransport::new(None).context("failed to build HTTP client")?;
    let app = App::new(
        AutocompleteRuntime::new(controller, Arc::new(transport)),
        last_selected,
    );

    setup_terminal(&TerminalConfig::default())?;
    let result = run(app).await;
    cleanup_terminal();

    let controller = result?;
    info!(value = controller.input().value(), "demo finished");
    Ok(())
}

async fn run(app: App) -> anyhow::Result<AutocompleteController<HeadlessSurface>> {
    let mut terminal = Terminal::new(CrosstermBackend::new(io::stdout()))?;
    terminal.clear()?;
    app.run(&mut terminal).await
}
