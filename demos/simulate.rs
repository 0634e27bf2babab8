// Simulated load of a manifest file
//
// Usage: cargo run --example simulate -- <manifest.json> [failing-id,...]
//
// Every dispatched asset completes immediately unless it is listed as failing.

use anyhow::{Context, Result};
use dependency_loader::{DependencyLoader, LoaderEvent, Manifest, QueuedStarter};
use log::info;

fn main() -> Result<()> {
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .init();

    let mut args = std::env::args().skip(1);
    let path = args
        .next()
        .context("Missing manifest path: simulate <manifest.json> [failing-id,...]")?;
    let failing: Vec<String> = args
        .next()
        .map(|list| list.split(',').map(str::to_string).collect())
        .unwrap_or_default();

    let manifest = Manifest::load(&path)?;
    info!("Loaded manifest {} with {} assets", path, manifest.len());

    let mut loader = DependencyLoader::new(&manifest, QueuedStarter::new());
    loader.listen("loaded", |event| {
        if let LoaderEvent::Loaded(asset) = event {
            info!("loaded {} ({})", asset.id(), asset.source());
        }
    });
    loader.listen("error", |event| {
        if let Some(asset) = event.asset() {
            info!("error {} ({})", asset.id(), asset.source());
        }
    });
    loader.listen("complete", |_| info!("complete"));

    loader.start()?;

    while let Some(id) = loader.starter_mut().pop() {
        if failing.contains(&id) {
            loader.on_failed(&id)?;
        } else {
            loader.on_completed(&id)?;
        }
    }

    let progress = loader.progress();
    info!(
        "{} of {} assets loaded ({:.0}%)",
        progress.loaded,
        progress.declared,
        progress.fraction() * 100.0
    );

    if !loader.is_complete() {
        anyhow::bail!("Loading did not complete");
    }

    Ok(())
}
