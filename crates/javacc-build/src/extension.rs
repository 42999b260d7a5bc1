//! The registry of named generation configurations.

use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use indexmap::map::Entry;

use crate::config::GenerationConfig;

/// Name of the extension and of the aggregate unit.
pub const EXTENSION_NAME: &str = "javacc";
/// Group every generation unit is listed under.
pub const GROUP_NAME: &str = "JAVACC Code Generation";
/// JavaCC version used when none is configured.
pub const DEFAULT_JAVACC_VERSION: &str = "4.2";
/// Output location of generated code, relative to the build directory.
pub const CODEGEN_OUTPUT_PATH: &str = "generated/javacc";

/// Named generation configurations, kept in registration order.
#[derive(Debug, Clone)]
pub struct JavaccExtension {
    build_dir: PathBuf,
    javacc_version: String,
    configs: IndexMap<String, GenerationConfig>,
}

impl JavaccExtension {
    /// Create an empty registry. Default output directories live below `build_dir`.
    pub fn new(build_dir: impl Into<PathBuf>) -> Self {
        Self {
            build_dir: build_dir.into(),
            javacc_version: DEFAULT_JAVACC_VERSION.to_owned(),
            configs: IndexMap::new(),
        }
    }

    pub fn build_dir(&self) -> &Path {
        &self.build_dir
    }

    pub fn javacc_version(&self) -> &str {
        &self.javacc_version
    }

    pub fn set_javacc_version(&mut self, version: impl Into<String>) {
        self.javacc_version = version.into();
    }

    /// Maven coordinate of the generator jar for the configured version.
    pub fn javacc_artifact(&self) -> String {
        format!("net.java.dev.javacc:javacc:{}", self.javacc_version)
    }

    /// Default output directory for a configuration name.
    pub fn default_output_dir(&self, name: &str) -> PathBuf {
        self.build_dir
            .join(CODEGEN_OUTPUT_PATH)
            .join(name.replace(' ', "_"))
    }

    /// Get the configuration called `name`, creating it with defaults on first use.
    pub fn register(&mut self, name: &str) -> &mut GenerationConfig {
        let output_dir = self.default_output_dir(name);
        match self.configs.entry(name.to_owned()) {
            Entry::Occupied(entry) => entry.into_mut(),
            Entry::Vacant(entry) => {
                tracing::debug!("Registered JavaCC configuration {name}");
                entry.insert(GenerationConfig::new(name, output_dir))
            }
        }
    }

    pub fn get(&self, name: &str) -> Option<&GenerationConfig> {
        self.configs.get(name)
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut GenerationConfig> {
        self.configs.get_mut(name)
    }

    /// Configurations in registration order.
    pub fn iter(&self) -> impl Iterator<Item = &GenerationConfig> {
        self.configs.values()
    }

    pub fn for_each(&self, f: impl FnMut(&GenerationConfig)) {
        self.configs.values().for_each(f)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.configs.keys().map(|s| s.as_str())
    }

    pub fn len(&self) -> usize {
        self.configs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.configs.is_empty()
    }
}
