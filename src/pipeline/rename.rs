// src/pipeline/rename.rs

use tracing::debug;

use crate::pipeline::Artifact;

/// Give the artifact its fixed output name. Content is left untouched.
pub fn rename_artifact(artifact: Artifact, target: &str) -> Artifact {
    debug!(from = %artifact.name(), to = %target, "renaming artifact");
    Artifact::new(target, artifact.into_contents())
}
