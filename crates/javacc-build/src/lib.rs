//! Run JavaCC, and optionally JJTree, as a build step.
//!
//! Grammar files are described by named [`GenerationConfig`]s in a
//! [`JavaccExtension`]. Applying the [`JavaccPlugin`] turns each of them into a
//! [`GenerationUnit`] of a [`BuildGraph`]. Executing a unit translates its
//! options into generator arguments, runs JJTree when tree options are
//! configured, then runs JavaCC on the result.
//!
//! ```no_run
//! use std::path::PathBuf;
//!
//! use javacc_build::{
//!     BuildGraph, ForkOptions, JavaProcess, JavaccExtension, JavaccOptions, JjTreeOptions,
//!     SourceSetRegistry,
//! };
//!
//! let mut extension = JavaccExtension::new("build");
//! extension
//!     .register("calc")
//!     .set_input_file("src/main/javacc/calc.jjt")
//!     .set_package_name("com.example.calc")
//!     .set_options(JavaccOptions::builder().static_param(false).build())
//!     .set_jjtree(JjTreeOptions::builder().multi(true).visitor(true).build());
//!
//! let mut graph = BuildGraph::from_extension(&extension)?;
//! let mut source_sets = SourceSetRegistry::with_defaults();
//! graph.link_source_sets(&mut source_sets);
//!
//! let classpath = [PathBuf::from("lib/javacc.jar")];
//! let java = JavaProcess::new(&extension, &classpath, ForkOptions::default())?;
//! let report = graph.execute(&java, &[], 4)?;
//! assert!(report.is_success());
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod args;
mod config;
mod error;
pub mod executor;
mod extension;
mod generator;
mod options;
mod plugin;
pub mod runner;

pub use config::{GenerationConfig, MAIN_SOURCE_SET, resolve_output_dir};
pub use error::{ConfigError, GenerateError};
pub use extension::{
    CODEGEN_OUTPUT_PATH, DEFAULT_JAVACC_VERSION, EXTENSION_NAME, GROUP_NAME, JavaccExtension,
};
pub use generator::{ForkOptions, Generator, JavaProcess, TERMINATED, Tool};
pub use options::{DEFAULT_NODE_PREFIX, Flag, JavaccOptions, JjTreeOptions};
pub use plugin::{
    AGGREGATE_DESCRIPTION, AggregateUnit, BuildGraph, BuildReport, GenerationUnit, JavaccPlugin,
    SourceLink, SourceSetRegistry, SourceSets, UnitReport,
};
pub use runner::{GenerationOutcome, GenerationRequest};
