use anyhow::Result;

use loveweb_core::{Artifact, PackagingJob, SourceInput};
use loveweb_engine::{AssetCatalog, Orchestrator};

use crate::cli::ExportArgs;
use crate::config::Config;

pub async fn handle(args: ExportArgs, config: &Config) -> Result<()> {
    let orchestrator = Orchestrator::new(AssetCatalog::new(config.assets_dir.clone()));

    let job = PackagingJob::new(SourceInput::classify(&args.input));
    let artifact = orchestrator.export_source(&job).await?;

    match artifact {
        Artifact::SourceArchive(bytes) => {
            if let Some(parent) = args.output.parent() {
                tokio::fs::create_dir_all(parent).await?;
            }
            let size = bytes.len();
            tokio::fs::write(&args.output, bytes).await?;
            println!("✓ Exported source archive: {}", args.output.display());
            println!("  Size: {} bytes", size);
        }
        other => anyhow::bail!("unexpected artifact kind {}", other.kind()),
    }

    Ok(())
}
