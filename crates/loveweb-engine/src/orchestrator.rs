//! Job orchestrator
//!
//! Owns the full packaging lifecycle: state transitions, the pipeline
//! stages, and temp-resource cleanup on every exit path. Jobs share no
//! mutable state; each gets its own staging set, so concurrent jobs never
//! observe each other's partial writes. Dropping the returned future
//! mid-flight still cleans up via `Staging`'s drop.

use tracing::{debug, warn};

use loveweb_core::{Artifact, JobState, PackagingJob, Result, SourceInput};
use loveweb_sources::{collect, InputResolver, Staging};

use crate::assets::{AssetCatalog, Flavor};
use crate::{archive, builder, emit, render};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    /// Runtime bundle: directory tree or single document per the job.
    Bundle,
    /// Zip of the original source tree; builder and renderer are skipped.
    SourceArchive,
}

pub struct Orchestrator {
    resolver: InputResolver,
    assets: AssetCatalog,
}

impl Orchestrator {
    pub fn new(assets: AssetCatalog) -> Self {
        Self {
            resolver: InputResolver::new(),
            assets,
        }
    }

    /// Run the full pipeline and emit the runtime bundle.
    pub async fn package(&self, job: &PackagingJob) -> Result<Artifact> {
        self.run(job, Mode::Bundle).await
    }

    /// Package the resolved source tree as a `.love` zip archive.
    pub async fn export_source(&self, job: &PackagingJob) -> Result<Artifact> {
        self.run(job, Mode::SourceArchive).await
    }

    async fn run(&self, job: &PackagingJob, mode: Mode) -> Result<Artifact> {
        let mut staging = Staging::new();
        let mut state = JobState::Created;

        let result = self.run_stages(job, mode, &mut staging, &mut state).await;
        match &result {
            Ok(artifact) => {
                advance(&mut state, JobState::Done);
                debug!(title = %job.title, kind = artifact.kind(), "packaging job done");
            }
            Err(err) => {
                advance(&mut state, JobState::Failed);
                warn!(title = %job.title, %err, "packaging job failed");
            }
        }
        staging.cleanup();
        result
    }

    async fn run_stages(
        &self,
        job: &PackagingJob,
        mode: Mode,
        staging: &mut Staging,
        state: &mut JobState,
    ) -> Result<Artifact> {
        advance(state, JobState::ResolvingInput);
        let root = self.resolver.resolve(&job.input, staging).await?;

        // Remote and inline inputs claim to be packaged archives; reject
        // garbage before spending any bundling work on it.
        if !matches!(job.input, SourceInput::LocalPath { .. }) {
            archive::validate_archive(&root)?;
        }

        advance(state, JobState::CollectingFiles);
        let tree = collect(&root)?;

        if mode == Mode::SourceArchive {
            advance(state, JobState::EmittingArtifact);
            return Ok(Artifact::SourceArchive(archive::build_source_archive(
                &tree,
            )?));
        }

        advance(state, JobState::BuildingBundle);
        let bundle = builder::build(&tree, job.memory_limit).await?;

        advance(state, JobState::Rendering);
        if job.single_file {
            let html = render::render_single_document(&bundle, job, &self.assets).await?;
            advance(state, JobState::EmittingArtifact);
            Ok(Artifact::SingleDocument(html.into_bytes()))
        } else {
            let rendered = render::render_directory(&bundle, job)?;
            advance(state, JobState::EmittingArtifact);
            let out_dir = staging.temp_dir("out")?;
            let files = emit::emit_directory(
                &rendered,
                &bundle,
                &self.assets,
                Flavor::from_compatibility(job.compatibility),
                &out_dir,
            )
            .await?;
            Ok(Artifact::DirectoryTree(files))
        }
    }
}

fn advance(state: &mut JobState, next: JobState) {
    debug!(from = state.as_str(), to = next.as_str(), "job state");
    *state = next;
}
