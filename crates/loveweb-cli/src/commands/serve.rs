use std::sync::Arc;

use anyhow::Result;

use loveweb_engine::AssetCatalog;
use loveweb_server::{AppState, InMemoryDelivery, InMemoryRegistry};

use crate::cli::ServeArgs;
use crate::config::Config;

pub async fn handle(args: ServeArgs, config: &Config) -> Result<()> {
    let host = args.host.unwrap_or_else(|| config.server.host.clone());
    let port = args.port.unwrap_or(config.server.port);
    let assets_dir = args.assets.unwrap_or_else(|| config.assets_dir.clone());

    let state = AppState::new(
        AssetCatalog::new(assets_dir),
        Arc::new(InMemoryRegistry::new()),
        Arc::new(InMemoryDelivery::new()),
    );

    loveweb_server::serve(state, &host, port).await
}
