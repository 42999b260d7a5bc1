//! The two-stage generation pipeline of a single configuration.
//!
//! When JJTree options are configured, JJTree runs first and writes an
//! intermediate `.jj` grammar into the output directory; JavaCC then reads that
//! file instead of the original grammar. A failing stage ends the run.

use std::fs;
use std::path::{Path, PathBuf};

use crate::args::{self, OUTPUT_DIRECTORY};
use crate::config::GenerationConfig;
use crate::error::{ConfigError, GenerateError};
use crate::generator::{Generator, Tool};

/// Extension of the grammar JJTree produces.
pub const JJ_EXTENSION: &str = "jj";

/// Everything a generation run needs, taken from a [`GenerationConfig`].
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationRequest {
    pub name: String,
    /// Absolute output directory, already expanded by the package path.
    pub output_dir: PathBuf,
    /// Absolute path of the grammar file.
    pub input_file: PathBuf,
    pub javacc_args: Vec<String>,
    /// `None` when JJTree is not configured.
    pub jjtree_args: Option<Vec<String>>,
}

impl GenerationRequest {
    /// Validate `config` and translate its options.
    pub fn from_config(config: &GenerationConfig) -> Result<Self, GenerateError> {
        let name = config.name().to_owned();

        let input_file = config
            .input_file
            .as_deref()
            .ok_or_else(|| ConfigError::MissingInputFile { name: name.clone() })?;
        if !input_file.is_file() {
            return Err(ConfigError::InputFileNotFound {
                name,
                path: input_file.to_path_buf(),
            }
            .into());
        }
        if config.output_dir.as_os_str().is_empty() {
            return Err(ConfigError::MissingOutputDir { name }.into());
        }

        Ok(Self {
            output_dir: std::path::absolute(config.resolved_output_dir())?,
            input_file: std::path::absolute(input_file)?,
            javacc_args: args::javacc_args(config),
            jjtree_args: args::jjtree_args(config),
            name,
        })
    }

    fn output_directory_arg(&self) -> String {
        format!("-{OUTPUT_DIRECTORY}={}", self.output_dir.display())
    }

    /// Full JJTree argument list, if JJTree runs.
    pub fn jjtree_command_line(&self) -> Option<Vec<String>> {
        let mut line = self.jjtree_args.clone()?;
        line.push(self.output_directory_arg());
        line.push(self.input_file.display().to_string());
        Some(line)
    }

    /// Grammar file JavaCC reads: the JJTree output when JJTree runs,
    /// otherwise the input file.
    pub fn javacc_grammar(&self) -> PathBuf {
        if self.jjtree_args.is_some() {
            self.output_dir.join(intermediate_file_name(&self.input_file))
        } else {
            self.input_file.clone()
        }
    }

    /// Full JavaCC argument list.
    pub fn javacc_command_line(&self) -> Vec<String> {
        let mut line = self.javacc_args.clone();
        line.push(self.output_directory_arg());
        line.push(self.javacc_grammar().display().to_string());
        line
    }
}

/// Result of a successful run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationOutcome {
    pub output_dir: PathBuf,
    /// The grammar JavaCC generated from.
    pub grammar: PathBuf,
    pub jjtree_ran: bool,
}

/// Name of the grammar JJTree writes for `input`: the file name with its last
/// extension replaced by `.jj`. Names without an extension are kept.
pub fn intermediate_file_name(input: &Path) -> String {
    let name = input
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    match name.rfind('.') {
        Some(dot) if dot + 1 < name.len() => format!("{}.{JJ_EXTENSION}", &name[..dot]),
        _ => name,
    }
}

/// Run JJTree (if configured) and JavaCC for `request`.
pub fn run(
    request: &GenerationRequest,
    generator: &dyn Generator,
) -> Result<GenerationOutcome, GenerateError> {
    fs::create_dir_all(&request.output_dir)?;

    let jjtree_ran = if let Some(line) = request.jjtree_command_line() {
        tracing::info!("Start JJTree first for {} ...", request.name);
        tracing::debug!("JJTree arguments: {line:?}");
        let status = generator.run(Tool::JjTree, &line)?;
        if status != 0 {
            tracing::error!("JJTree code generation failed for {}!", request.name);
            return Err(GenerateError::JjTreeFailed {
                name: request.name.clone(),
                status,
            });
        }
        true
    } else {
        false
    };

    tracing::info!("Start JavaCC code generation for {}", request.name);
    let line = request.javacc_command_line();
    tracing::debug!("JavaCC arguments: {line:?}");
    let status = generator.run(Tool::Javacc, &line)?;
    if status != 0 {
        tracing::error!("JavaCC code generation failed for {}!", request.name);
        return Err(GenerateError::JavaccFailed {
            name: request.name.clone(),
            status,
        });
    }

    Ok(GenerationOutcome {
        output_dir: request.output_dir.clone(),
        grammar: request.javacc_grammar(),
        jjtree_ran,
    })
}
