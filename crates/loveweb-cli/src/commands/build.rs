use anyhow::Result;

use loveweb_core::{Artifact, PackagingJob, SourceInput};
use loveweb_engine::{AssetCatalog, Orchestrator};

use crate::cli::BuildArgs;
use crate::config::Config;

pub async fn handle(args: BuildArgs, config: &Config) -> Result<()> {
    let orchestrator = Orchestrator::new(AssetCatalog::new(config.assets_dir.clone()));

    let job = PackagingJob::new(SourceInput::classify(&args.input))
        .with_title(&args.title)
        .with_memory_limit(args.memory)
        .with_single_file(args.single_file)
        .with_compatibility(args.compatibility);

    let artifact = orchestrator.package(&job).await?;
    tokio::fs::create_dir_all(&args.output).await?;

    match artifact {
        Artifact::SingleDocument(bytes) => {
            let path = args.output.join("index.html");
            let size = bytes.len();
            tokio::fs::write(&path, bytes).await?;
            println!("✓ Built single-document bundle: {}", path.display());
            println!("  Size: {} bytes", size);
        }
        Artifact::DirectoryTree(files) => {
            // The orchestrator already wrote its own staging copy; persist
            // the returned tree at the requested destination.
            for (name, bytes) in &files {
                tokio::fs::write(args.output.join(name), bytes).await?;
            }
            println!("✓ Built web bundle: {}", args.output.display());
            println!("  Files: {}", files.len());
            println!(
                "  Payload: {} bytes",
                files.get("game.data").map(Vec::len).unwrap_or(0)
            );
        }
        other => anyhow::bail!("unexpected artifact kind {}", other.kind()),
    }

    Ok(())
}
