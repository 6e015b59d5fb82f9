//! Generate static files

use anyhow::Result;
use notify::Watcher;
use std::time::Duration;
use tokio::sync::mpsc;

use crate::generator::Generator;
use crate::Folio;

/// Generate the static site
pub async fn run(folio: &Folio) -> Result<()> {
    let start = std::time::Instant::now();

    let generator = Generator::new(folio)?;
    generator.generate().await?;

    let duration = start.elapsed();
    tracing::info!("Generated in {:.2}s", duration.as_secs_f64());

    Ok(())
}

/// Watch for file changes and regenerate
pub async fn watch(folio: &Folio) -> Result<()> {
    let (tx, mut rx) = mpsc::unbounded_channel();

    let mut watcher = notify::recommended_watcher(move |res| {
        if let Ok(event) = res {
            let _ = tx.send(event);
        }
    })?;

    // Watch content directory (section pages, metadata, notebooks)
    watcher.watch(&folio.content_dir, notify::RecursiveMode::Recursive)?;

    // Watch assets directory
    if folio.assets_dir.exists() {
        watcher.watch(&folio.assets_dir, notify::RecursiveMode::Recursive)?;
    }

    // Watch config file
    let config_path = folio.base_dir.join("_config.yml");
    if config_path.exists() {
        watcher.watch(&config_path, notify::RecursiveMode::NonRecursive)?;
    }

    tracing::info!("Watching for changes. Press Ctrl+C to stop.");

    // Debounce: only rebuild if more than 500ms since the last rebuild
    let mut last_rebuild = std::time::Instant::now();

    while let Some(_event) = rx.recv().await {
        if last_rebuild.elapsed() > Duration::from_millis(500) {
            tracing::info!("File changed, regenerating...");
            if let Err(e) = run(folio).await {
                tracing::error!("Generation failed: {}", e);
            }
            last_rebuild = std::time::Instant::now();
        }
    }

    Ok(())
}
