//! `Javacc.toml` configuration files.
//!
//! A configuration file declares the generator version, the tool classpath,
//! JVM settings and one `[configs.<name>]` table per grammar:
//!
//! ```toml
//! javacc-version = "7.0.13"
//! tool-classpath = ["lib/javacc-7.0.13.jar"]
//!
//! [fork]
//! jvm-args = ["-Xmx512m"]
//!
//! [configs.calc]
//! input-file = "src/main/javacc/calc.jjt"
//! package-name = "com.example.calc"
//! static = false
//! lookahead = 2
//!
//! [configs.calc.jjtree]
//! multi = true
//! ```
//!
//! Relative paths are resolved against the directory of the file. The
//! presence of a `jjtree` table enables the JJTree pre-pass. Unknown keys are
//! rejected in every table.

use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use javacc_build::{ForkOptions, JavaccExtension, JavaccOptions, JjTreeOptions};
use serde::Deserialize;

/// The standard configuration filename.
pub const CONFIG_FILENAME: &str = "Javacc.toml";

/// Build directory used when the file does not name one.
pub const DEFAULT_BUILD_DIR: &str = "build";

/// Error type for configuration loading.
#[derive(Debug, thiserror::Error)]
pub enum ConfigFileError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Syntax error: {0}")]
    Toml(#[from] toml::de::Error),
}

/// One `[configs.<name>]` table.
///
/// Generator options sit next to the entry's own keys. Keys that are neither
/// are rejected.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(try_from = "toml::Table")]
pub struct ConfigEntry {
    pub input_file: Option<PathBuf>,
    pub output_dir: Option<PathBuf>,
    pub source_set: Option<String>,
    pub package_name: Option<String>,
    pub args: Vec<String>,
    pub jjtree: Option<JjTreeOptions>,
    pub options: JavaccOptions,
}

/// The keys of a `[configs.<name>]` table that are not generator options.
#[derive(Default, Deserialize)]
#[serde(default, rename_all = "kebab-case", deny_unknown_fields)]
struct EntryKeys {
    input_file: Option<PathBuf>,
    output_dir: Option<PathBuf>,
    source_set: Option<String>,
    package_name: Option<String>,
    args: Vec<String>,
    jjtree: Option<JjTreeOptions>,
}

const ENTRY_KEYS: &[&str] = &[
    "input-file",
    "output-dir",
    "source-set",
    "package-name",
    "args",
    "jjtree",
];

impl TryFrom<toml::Table> for ConfigEntry {
    type Error = toml::de::Error;

    fn try_from(mut table: toml::Table) -> Result<Self, Self::Error> {
        let mut keys = toml::Table::new();
        for key in ENTRY_KEYS {
            if let Some(value) = table.remove(*key) {
                keys.insert((*key).to_owned(), value);
            }
        }
        let keys: EntryKeys = toml::Value::Table(keys).try_into()?;
        let options: JavaccOptions = toml::Value::Table(table).try_into()?;

        Ok(Self {
            input_file: keys.input_file,
            output_dir: keys.output_dir,
            source_set: keys.source_set,
            package_name: keys.package_name,
            args: keys.args,
            jjtree: keys.jjtree,
            options,
        })
    }
}

/// The contents of a `Javacc.toml` file.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, rename_all = "kebab-case", deny_unknown_fields)]
pub struct JavaccConfigFile {
    pub javacc_version: Option<String>,
    pub build_dir: Option<PathBuf>,
    pub tool_classpath: Vec<PathBuf>,
    pub fork: ForkOptions,
    /// Grammar configurations in file order.
    pub configs: IndexMap<String, ConfigEntry>,
}

impl JavaccConfigFile {
    /// Load configuration from a file.
    pub fn load(path: &Path) -> Result<Self, ConfigFileError> {
        let content = std::fs::read_to_string(path)?;
        Self::parse_str(&content)
    }

    /// Parse configuration from a string.
    pub fn parse_str(content: &str) -> Result<Self, ConfigFileError> {
        Ok(toml::from_str(content)?)
    }

    /// Build the registry described by this file.
    pub fn to_extension(&self, base_dir: &Path) -> JavaccExtension {
        let build_dir = base_dir.join(
            self.build_dir
                .as_deref()
                .unwrap_or(Path::new(DEFAULT_BUILD_DIR)),
        );
        let mut extension = JavaccExtension::new(build_dir);
        if let Some(version) = &self.javacc_version {
            extension.set_javacc_version(version);
        }

        for (name, entry) in &self.configs {
            tracing::debug!("Loading JavaCC configuration {name}");
            let config = extension.register(name);
            if let Some(input) = &entry.input_file {
                config.set_input_file(base_dir.join(input));
            }
            if let Some(output) = &entry.output_dir {
                config.set_output_dir(base_dir.join(output));
            }
            if let Some(source_set) = &entry.source_set {
                config.set_source_set_name(source_set);
            }
            config.package_name = entry.package_name.clone();
            config
                .set_options(entry.options.clone())
                .add_args(entry.args.iter().cloned());
            if let Some(jjtree) = &entry.jjtree {
                config.set_jjtree(jjtree.clone());
            }
        }
        extension
    }

    /// Tool classpath with relative entries resolved against `base_dir`.
    pub fn tool_classpath(&self, base_dir: &Path) -> Vec<PathBuf> {
        self.tool_classpath.iter().map(|p| base_dir.join(p)).collect()
    }
}

/// The nearest `Javacc.toml` in `start_dir` or one of its ancestors.
pub fn find_config_file(start_dir: &Path) -> Option<PathBuf> {
    start_dir
        .ancestors()
        .map(|dir| dir.join(CONFIG_FILENAME))
        .find(|path| path.is_file())
}

/// A loaded configuration file and the directory its relative paths resolve against.
#[derive(Debug, Clone, PartialEq)]
pub struct ProjectConfig {
    pub path: PathBuf,
    pub base_dir: PathBuf,
    pub file: JavaccConfigFile,
}

impl ProjectConfig {
    pub fn load(path: &Path) -> Result<Self, ConfigFileError> {
        let file = JavaccConfigFile::load(path)?;
        let base_dir = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };
        Ok(Self {
            path: path.to_path_buf(),
            base_dir,
            file,
        })
    }

    /// Load the nearest configuration file above `start_dir`, if there is one.
    pub fn discover(start_dir: &Path) -> Result<Option<Self>, ConfigFileError> {
        find_config_file(start_dir)
            .map(|path| Self::load(&path))
            .transpose()
    }

    pub fn extension(&self) -> JavaccExtension {
        self.file.to_extension(&self.base_dir)
    }

    pub fn tool_classpath(&self) -> Vec<PathBuf> {
        self.file.tool_classpath(&self.base_dir)
    }
}
