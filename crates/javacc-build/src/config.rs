//! A single named generation configuration.

use std::path::{Path, PathBuf};

use crate::options::{JavaccOptions, JjTreeOptions};

/// Name of the source set generated code is added to unless configured otherwise.
pub const MAIN_SOURCE_SET: &str = "main";

/// Everything needed to generate sources from one grammar file.
///
/// Entries are created through [`JavaccExtension::register`](crate::JavaccExtension::register),
/// which fills in the output directory and source set defaults.
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationConfig {
    name: String,
    /// Directory the generated sources are written to.
    pub output_dir: PathBuf,
    /// The grammar file (`.jj`, or `.jjt` when JJTree runs first).
    pub input_file: Option<PathBuf>,
    /// Source set that compiles the generated sources.
    pub source_set_name: String,
    /// Java package of the generated code. Expands the output directory.
    pub package_name: Option<String>,
    pub options: JavaccOptions,
    /// Extra arguments appended after the derived options.
    pub args: Vec<String>,
    jjtree: JjTreeOptions,
}

impl GenerationConfig {
    pub(crate) fn new(name: impl Into<String>, output_dir: PathBuf) -> Self {
        Self {
            name: name.into(),
            output_dir,
            input_file: None,
            source_set_name: MAIN_SOURCE_SET.to_owned(),
            package_name: None,
            options: JavaccOptions::default(),
            args: Vec::new(),
            jjtree: JjTreeOptions::default(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Name of the generation unit created for this configuration,
    /// e.g. `javaccMyGrammar` for `"my grammar"`.
    pub fn unit_name(&self) -> String {
        let camel: String = self.name.split(' ').map(capitalize).collect();
        format!("javacc{camel}")
    }

    pub fn set_input_file(&mut self, path: impl Into<PathBuf>) -> &mut Self {
        self.input_file = Some(path.into());
        self
    }

    pub fn set_output_dir(&mut self, path: impl Into<PathBuf>) -> &mut Self {
        self.output_dir = path.into();
        self
    }

    pub fn set_package_name(&mut self, package: impl Into<String>) -> &mut Self {
        self.package_name = Some(package.into());
        self
    }

    pub fn set_source_set_name(&mut self, source_set: impl Into<String>) -> &mut Self {
        self.source_set_name = source_set.into();
        self
    }

    pub fn set_options(&mut self, options: JavaccOptions) -> &mut Self {
        self.options = options;
        self
    }

    pub fn add_arg(&mut self, arg: impl Into<String>) -> &mut Self {
        self.args.push(arg.into());
        self
    }

    pub fn add_args<I, S>(&mut self, args: I) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    /// Replace all extra arguments.
    pub fn set_args<I, S>(&mut self, args: I) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args = args.into_iter().map(Into::into).collect();
        self
    }

    /// Attach JJTree options. This enables the JJTree pre-pass.
    pub fn set_jjtree(&mut self, mut options: JjTreeOptions) -> &mut Self {
        options.mark_configured();
        self.jjtree = options;
        self
    }

    /// Edit the JJTree options in place and enable the pre-pass.
    pub fn configure_jjtree(&mut self, f: impl FnOnce(&mut JjTreeOptions)) -> &mut Self {
        f(&mut self.jjtree);
        self.jjtree.mark_configured();
        self
    }

    pub fn jjtree(&self) -> &JjTreeOptions {
        &self.jjtree
    }

    /// Mutable access to the JJTree options. Does not enable the pre-pass by itself.
    pub fn jjtree_mut(&mut self) -> &mut JjTreeOptions {
        &mut self.jjtree
    }

    /// The output directory expanded by the package path, if a package is set.
    pub fn resolved_output_dir(&self) -> PathBuf {
        resolve_output_dir(&self.output_dir, self.package_name.as_deref())
    }
}

/// Join `package` onto `output_dir` with every `.` as a path separator.
/// A missing or blank package leaves the directory unchanged.
pub fn resolve_output_dir(output_dir: &Path, package: Option<&str>) -> PathBuf {
    match package {
        Some(package) if !package.trim().is_empty() => {
            package.split('.').fold(output_dir.to_path_buf(), |dir, segment| dir.join(segment))
        }
        _ => output_dir.to_path_buf(),
    }
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
