use std::path::Path;

use elmpipe::config::{ConfigFile, RawConfigFile};
use elmpipe::types::TriggerWhileRunningBehaviour;

/// Builder for `ConfigFile` to simplify test setup.
pub struct ConfigFileBuilder {
    config: RawConfigFile,
}

impl ConfigFileBuilder {
    pub fn new() -> Self {
        Self {
            config: RawConfigFile::default(),
        }
    }

    pub fn source(mut self, path: &str) -> Self {
        self.config.pipeline.source = path.into();
        self
    }

    pub fn output(mut self, name: &str) -> Self {
        self.config.pipeline.output = name.to_string();
        self
    }

    pub fn dest(mut self, dir: &str) -> Self {
        self.config.pipeline.dest = dir.into();
        self
    }

    /// Use the shell script written by
    /// [`write_fake_elm`](crate::fake_compiler::write_fake_elm) as compiler.
    pub fn fake_compiler(mut self, script: &Path) -> Self {
        let script = script.to_string_lossy().into_owned();
        self.config.compiler.program = "sh".to_string();
        self.config.compiler.make_args = vec![script.clone(), "make".to_string()];
        self.config.compiler.init_args = vec![script, "--version".to_string()];
        self
    }

    pub fn program(mut self, program: &str) -> Self {
        self.config.compiler.program = program.to_string();
        self
    }

    pub fn behaviour(mut self, behaviour: TriggerWhileRunningBehaviour) -> Self {
        self.config.config.triggered_while_running_behaviour = behaviour;
        self
    }

    pub fn queue_length(mut self, len: usize) -> Self {
        self.config.config.queue_length = len;
        self
    }

    pub fn watch(mut self, pattern: &str) -> Self {
        self.config.watch.patterns = vec![pattern.to_string()];
        self
    }

    pub fn build(self) -> ConfigFile {
        ConfigFile::try_from(self.config).expect("Failed to build valid config from builder")
    }

    pub fn build_raw(self) -> RawConfigFile {
        self.config
    }
}

impl Default for ConfigFileBuilder {
    fn default() -> Self {
        Self::new()
    }
}
