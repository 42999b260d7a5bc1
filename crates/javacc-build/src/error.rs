//! Error types.

use std::io;
use std::path::PathBuf;
use std::time::Duration;

use crate::generator::Tool;

/// A configuration problem, detected before any generator runs.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("JavaCC configuration '{name}' has no input file")]
    MissingInputFile { name: String },

    #[error("Input file of JavaCC configuration '{name}' does not exist: {}", path.display())]
    InputFileNotFound { name: String, path: PathBuf },

    #[error("JavaCC configuration '{name}' has an empty output directory")]
    MissingOutputDir { name: String },

    #[error("Configurations '{first}' and '{second}' both map to unit '{unit}'")]
    AmbiguousUnitName {
        unit: String,
        first: String,
        second: String,
    },

    #[error("Configurations '{first}' and '{second}' both generate into {}", dir.display())]
    OutputDirConflict {
        dir: PathBuf,
        first: String,
        second: String,
    },

    #[error("Unknown JavaCC configuration: {0}")]
    UnknownConfig(String),

    #[error("No tool classpath configured; add the jar of {artifact}")]
    MissingClasspath { artifact: String },

    #[error("Tool classpath entry contains the path list separator: {}", path.display())]
    InvalidClasspath { path: PathBuf },
}

/// Failure of a generation unit.
#[derive(Debug, thiserror::Error)]
pub enum GenerateError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("Failed to launch {tool}: {source}")]
    Launch {
        tool: Tool,
        #[source]
        source: io::Error,
    },

    #[error("{tool} did not finish within {}s", timeout.as_secs())]
    TimedOut { tool: Tool, timeout: Duration },

    #[error("JJTree code generation failed for '{name}' (exit status {status})")]
    JjTreeFailed { name: String, status: i32 },

    #[error("JavaCC code generation failed for '{name}' (exit status {status})")]
    JavaccFailed { name: String, status: i32 },
}

impl GenerateError {
    /// The generator that failed, if the failure came from a generator run.
    pub fn tool(&self) -> Option<Tool> {
        match self {
            GenerateError::Launch { tool, .. } | GenerateError::TimedOut { tool, .. } => {
                Some(*tool)
            }
            GenerateError::JjTreeFailed { .. } => Some(Tool::JjTree),
            GenerateError::JavaccFailed { .. } => Some(Tool::Javacc),
            GenerateError::Config(_) | GenerateError::Io(_) => None,
        }
    }
}
