use std::path::Path;

use anyhow::{Context, anyhow};
use javacc_build::JavaccExtension;
use javacc_build_config::{CONFIG_FILENAME, ProjectConfig};

/// A loaded configuration file and the registry it describes.
pub struct Project {
    pub config: ProjectConfig,
    pub extension: JavaccExtension,
}

impl Project {
    /// Load `path`, or search upward from the current directory when `None`.
    pub fn load(path: Option<&Path>) -> anyhow::Result<Self> {
        let config = match path {
            Some(path) => ProjectConfig::load(path)
                .with_context(|| format!("Error loading {}", path.display()))?,
            None => {
                let current_dir =
                    std::env::current_dir().context("Failed to get current directory")?;
                ProjectConfig::discover(&current_dir)
                    .with_context(|| format!("Error loading {CONFIG_FILENAME}"))?
                    .ok_or_else(|| anyhow!("No {CONFIG_FILENAME} found"))?
            }
        };

        let extension = config.extension();
        tracing::debug!(
            "Loaded {} configuration(s) from {}",
            extension.len(),
            config.path.display()
        );

        Ok(Self { config, extension })
    }
}
