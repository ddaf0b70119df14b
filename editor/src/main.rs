use jems_editor::config;
use jems_editor::{EditStore, render_state, replay};
use jems_shared::MapDocument;
use tokio::io::BufReader;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| config::DEFAULT_LOG_FILTER.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let store = EditStore::new();

    if let Some(path) = config::map_path() {
        let bytes = match tokio::fs::read(&path).await {
            Ok(bytes) => bytes,
            Err(e) => {
                tracing::error!(error = %e, path = %path.display(), "failed to read map document");
                return;
            }
        };
        let map: MapDocument = match serde_json::from_slice(&bytes) {
            Ok(map) => map,
            Err(e) => {
                tracing::error!(error = %e, path = %path.display(), "failed to parse map document");
                return;
            }
        };
        tracing::info!(
            map_id = %map.id,
            groups = map.regions.len(),
            regions = map.regions.total_regions(),
            "loaded map document"
        );
        store.load(map);
    } else {
        tracing::info!(
            "{} is not set, starting from the placeholder document",
            config::MAP_PATH_ENV
        );
    }

    let mut updates = store.subscribe();
    let watcher = tokio::spawn(async move {
        while updates.changed().await.is_ok() {
            let state = updates.borrow_and_update().clone();
            tracing::debug!(
                groups = state.map.regions.len(),
                regions = state.map.regions.total_regions(),
                legend_stops = state.map.legend.choropleth_legend.items.len(),
                modal = state.modal.as_str(),
                "state published"
            );
        }
    });

    let applied = replay(&store, BufReader::new(tokio::io::stdin())).await;
    tracing::info!(applied, "finished replaying actions");

    match render_state(&store.state(), config::pretty_output()) {
        Ok(json) => println!("{json}"),
        Err(e) => tracing::error!(error = %e, "failed to serialize edit state"),
    }

    drop(store);
    if let Err(e) = watcher.await {
        tracing::warn!(error = %e, "state watcher task failed");
    }
}
