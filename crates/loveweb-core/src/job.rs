//! Packaging job model

use serde::{Deserialize, Serialize};

use crate::SourceInput;

pub const DEFAULT_TITLE: &str = "Love Game";
pub const DEFAULT_MEMORY_LIMIT: u64 = 67_108_864;

/// One request-scoped packaging operation. Immutable once built; the
/// orchestrator owns its temporary resources for the job's lifetime.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PackagingJob {
    pub input: SourceInput,
    pub title: String,
    pub memory_limit: u64,
    pub single_file: bool,
    pub compatibility: bool,
}

impl PackagingJob {
    pub fn new(input: SourceInput) -> Self {
        Self {
            input,
            title: DEFAULT_TITLE.to_string(),
            memory_limit: DEFAULT_MEMORY_LIMIT,
            single_file: true,
            compatibility: false,
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    pub fn with_memory_limit(mut self, limit: u64) -> Self {
        self.memory_limit = limit;
        self
    }

    pub fn with_single_file(mut self, single_file: bool) -> Self {
        self.single_file = single_file;
        self
    }

    pub fn with_compatibility(mut self, compatibility: bool) -> Self {
        self.compatibility = compatibility;
        self
    }
}

/// Lifecycle of a packaging job. `Failed` is reachable from any state and
/// both terminal states trigger temp-resource cleanup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobState {
    Created,
    ResolvingInput,
    CollectingFiles,
    BuildingBundle,
    Rendering,
    EmittingArtifact,
    Done,
    Failed,
}

impl JobState {
    pub fn as_str(&self) -> &'static str {
        match self {
            JobState::Created => "created",
            JobState::ResolvingInput => "resolving_input",
            JobState::CollectingFiles => "collecting_files",
            JobState::BuildingBundle => "building_bundle",
            JobState::Rendering => "rendering",
            JobState::EmittingArtifact => "emitting_artifact",
            JobState::Done => "done",
            JobState::Failed => "failed",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, JobState::Done | JobState::Failed)
    }
}
