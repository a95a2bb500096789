// src/config/validate.rs

use std::path::Path;

use globset::Glob;

use crate::config::model::{ConfigFile, RawConfigFile};
use crate::errors::{PipelineError, Result};

impl TryFrom<RawConfigFile> for ConfigFile {
    type Error = PipelineError;

    fn try_from(raw: RawConfigFile) -> std::result::Result<Self, Self::Error> {
        validate_raw_config(&raw)?;
        Ok(ConfigFile::new_unchecked(raw))
    }
}

fn validate_raw_config(cfg: &RawConfigFile) -> Result<()> {
    validate_global_config(cfg)?;
    validate_compiler(cfg)?;
    validate_pipeline(cfg)?;
    validate_watch(cfg)?;
    Ok(())
}

fn validate_global_config(cfg: &RawConfigFile) -> Result<()> {
    // triggered_while_running_behaviour is strongly typed and checked by serde.
    if cfg.config.queue_length == 0 {
        return Err(PipelineError::ConfigError(
            "[config].queue_length must be >= 1 (got 0)".to_string(),
        ));
    }
    Ok(())
}

fn validate_compiler(cfg: &RawConfigFile) -> Result<()> {
    if cfg.compiler.program.trim().is_empty() {
        return Err(PipelineError::ConfigError(
            "[compiler].program must not be empty".to_string(),
        ));
    }
    Ok(())
}

fn validate_pipeline(cfg: &RawConfigFile) -> Result<()> {
    let pipeline = &cfg.pipeline;

    if pipeline.source.as_os_str().is_empty() {
        return Err(PipelineError::ConfigError(
            "[pipeline].source must not be empty".to_string(),
        ));
    }
    if pipeline.source.file_stem().is_none() {
        return Err(PipelineError::ConfigError(format!(
            "[pipeline].source {:?} does not name a file",
            pipeline.source
        )));
    }

    // The output is a literal file name; directories belong in `dest`.
    let output = pipeline.output.as_str();
    let is_bare_name = Path::new(output)
        .file_name()
        .is_some_and(|name| name == output);
    if output.is_empty() || !is_bare_name {
        return Err(PipelineError::ConfigError(format!(
            "[pipeline].output must be a plain file name (got {output:?})"
        )));
    }

    Ok(())
}

fn validate_watch(cfg: &RawConfigFile) -> Result<()> {
    if cfg.watch.patterns.is_empty() {
        return Err(PipelineError::ConfigError(
            "[watch].patterns must contain at least one glob".to_string(),
        ));
    }

    for pattern in cfg.watch.patterns.iter().chain(cfg.watch.exclude.iter()) {
        Glob::new(pattern).map_err(|e| {
            PipelineError::ConfigError(format!("invalid glob pattern {pattern:?}: {e}"))
        })?;
    }
    Ok(())
}
