//! Registration of generation units with the build.
//!
//! [`JavaccPlugin::apply`] turns every configuration of a [`JavaccExtension`]
//! into a [`GenerationUnit`] that the aggregate `javacc` unit depends on. The
//! output directories are handed to the build's source sets later, through
//! [`BuildGraph::link_source_sets`], once the build has set those up.

use std::path::{Path, PathBuf};

use indexmap::IndexMap;

use crate::config::GenerationConfig;
use crate::error::{ConfigError, GenerateError};
use crate::executor::{self, RunResult};
use crate::extension::{EXTENSION_NAME, GROUP_NAME, JavaccExtension};
use crate::generator::Generator;
use crate::runner::{self, GenerationOutcome, GenerationRequest};

pub const AGGREGATE_DESCRIPTION: &str = "Generate Java code with JAVA Compiler Compiler (JavaCC)";

/// Source sets of the consuming build.
pub trait SourceSets {
    /// Add `dir` as a source root of `source_set`. Returns `false` if the
    /// source set does not exist.
    fn add_source_dir(&mut self, source_set: &str, dir: &Path) -> bool;
}

/// A plain in-memory [`SourceSets`] implementation.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SourceSetRegistry {
    sets: IndexMap<String, Vec<PathBuf>>,
}

impl SourceSetRegistry {
    /// A registry with the conventional `main` and `test` source sets.
    pub fn with_defaults() -> Self {
        let mut registry = Self::default();
        registry.create("main");
        registry.create("test");
        registry
    }

    pub fn create(&mut self, name: &str) {
        self.sets.entry(name.to_owned()).or_default();
    }

    pub fn source_dirs(&self, name: &str) -> &[PathBuf] {
        self.sets.get(name).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[PathBuf])> {
        self.sets.iter().map(|(name, dirs)| (name.as_str(), dirs.as_slice()))
    }
}

impl SourceSets for SourceSetRegistry {
    fn add_source_dir(&mut self, source_set: &str, dir: &Path) -> bool {
        match self.sets.get_mut(source_set) {
            Some(dirs) => {
                if !dirs.iter().any(|d| d == dir) {
                    dirs.push(dir.to_path_buf());
                }
                true
            }
            None => false,
        }
    }
}

/// One schedulable generation step for a single configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationUnit {
    name: String,
    config: GenerationConfig,
}

impl GenerationUnit {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn group(&self) -> &str {
        GROUP_NAME
    }

    /// The configuration as it was when the plugin was applied.
    pub fn config(&self) -> &GenerationConfig {
        &self.config
    }

    pub fn request(&self) -> Result<GenerationRequest, GenerateError> {
        GenerationRequest::from_config(&self.config)
    }

    /// Run this unit on the calling thread.
    pub fn execute(&self, generator: &dyn Generator) -> Result<GenerationOutcome, GenerateError> {
        runner::run(&self.request()?, generator)
    }
}

/// The umbrella unit, complete once all its dependencies are.
#[derive(Debug, Clone, PartialEq)]
pub struct AggregateUnit {
    pub name: String,
    pub description: String,
    pub group: String,
    pub depends_on: Vec<String>,
}

impl Default for AggregateUnit {
    fn default() -> Self {
        Self {
            name: EXTENSION_NAME.to_owned(),
            description: AGGREGATE_DESCRIPTION.to_owned(),
            group: GROUP_NAME.to_owned(),
            depends_on: Vec::new(),
        }
    }
}

/// A generated-source root waiting to be added to a source set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceLink {
    pub unit: String,
    pub source_set: String,
    pub dir: PathBuf,
}

/// Units created by the plugin.
#[derive(Debug, Clone, Default)]
pub struct BuildGraph {
    aggregate: AggregateUnit,
    units: IndexMap<String, GenerationUnit>,
    pending_links: IndexMap<String, SourceLink>,
}

impl BuildGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// A graph with the plugin applied to `extension`.
    pub fn from_extension(extension: &JavaccExtension) -> Result<Self, ConfigError> {
        let mut graph = Self::new();
        JavaccPlugin::apply(extension, &mut graph)?;
        Ok(graph)
    }

    pub fn aggregate(&self) -> &AggregateUnit {
        &self.aggregate
    }

    pub fn units(&self) -> impl Iterator<Item = &GenerationUnit> {
        self.units.values()
    }

    pub fn unit(&self, name: &str) -> Option<&GenerationUnit> {
        self.units.get(name)
    }

    /// Find a unit by unit name or configuration name.
    pub fn find(&self, name: &str) -> Option<&GenerationUnit> {
        self.units
            .get(name)
            .or_else(|| self.units.values().find(|u| u.config.name() == name))
    }

    pub fn pending_links(&self) -> impl Iterator<Item = &SourceLink> {
        self.pending_links.values()
    }

    /// Add every output directory to its source set. Call once the build's
    /// source sets exist. Links to unknown source sets are dropped.
    pub fn link_source_sets(&mut self, source_sets: &mut dyn SourceSets) -> Vec<SourceLink> {
        let mut linked = Vec::new();
        for (_, link) in self.pending_links.drain(..) {
            if source_sets.add_source_dir(&link.source_set, &link.dir) {
                tracing::debug!(
                    "Added {} to source set {}",
                    link.dir.display(),
                    link.source_set
                );
                linked.push(link);
            } else {
                tracing::debug!(
                    "Source set {} of {} not found, generated sources are not compiled",
                    link.source_set,
                    link.unit
                );
            }
        }
        linked
    }

    /// Run the selected units (all if `only` is empty) on `workers` threads.
    ///
    /// Every selected unit is validated before the first generator starts.
    pub fn execute(
        &self,
        generator: &dyn Generator,
        only: &[String],
        workers: usize,
    ) -> Result<BuildReport, GenerateError> {
        let selected: Vec<&GenerationUnit> = if only.is_empty() {
            self.units.values().collect()
        } else {
            only.iter()
                .map(|name| {
                    self.find(name)
                        .ok_or_else(|| ConfigError::UnknownConfig(name.clone()))
                })
                .collect::<Result<_, _>>()?
        };

        let requests = selected
            .iter()
            .map(|unit| unit.request())
            .collect::<Result<Vec<_>, _>>()?;

        let results = executor::execute(requests, generator, workers)?;

        Ok(BuildReport {
            aggregate: self.aggregate.name.clone(),
            units: selected
                .into_iter()
                .zip(results)
                .map(|(unit, result)| UnitReport {
                    unit: unit.name.clone(),
                    config: unit.config.name().to_owned(),
                    result,
                })
                .collect(),
        })
    }

    fn add_unit(&mut self, config: &GenerationConfig) -> Result<(), ConfigError> {
        let name = config.unit_name();
        if let Some(existing) = self.units.get(&name)
            && existing.config.name() != config.name()
        {
            return Err(ConfigError::AmbiguousUnitName {
                unit: name,
                first: existing.config.name().to_owned(),
                second: config.name().to_owned(),
            });
        }

        let dir = config.resolved_output_dir();
        if let Some(other) = self
            .units
            .values()
            .find(|u| u.config.name() != config.name() && u.config.resolved_output_dir() == dir)
        {
            return Err(ConfigError::OutputDirConflict {
                dir,
                first: other.config.name().to_owned(),
                second: config.name().to_owned(),
            });
        }

        self.pending_links.insert(
            name.clone(),
            SourceLink {
                unit: name.clone(),
                source_set: config.source_set_name.clone(),
                dir: config.output_dir.clone(),
            },
        );
        if !self.aggregate.depends_on.contains(&name) {
            self.aggregate.depends_on.push(name.clone());
        }
        self.units.insert(
            name.clone(),
            GenerationUnit {
                name,
                config: config.clone(),
            },
        );
        Ok(())
    }
}

/// Outcome of one unit.
#[derive(Debug)]
pub struct UnitReport {
    pub unit: String,
    pub config: String,
    pub result: RunResult,
}

/// Outcome of a build: one report per executed unit, in registration order.
#[derive(Debug)]
pub struct BuildReport {
    pub aggregate: String,
    pub units: Vec<UnitReport>,
}

impl BuildReport {
    /// The aggregate unit succeeds only if every unit did.
    pub fn is_success(&self) -> bool {
        self.units.iter().all(|u| u.result.is_ok())
    }

    pub fn failures(&self) -> impl Iterator<Item = (&UnitReport, &GenerateError)> {
        self.units
            .iter()
            .filter_map(|u| u.result.as_ref().err().map(|e| (u, e)))
    }
}

/// Creates one generation unit per configuration.
pub struct JavaccPlugin;

impl JavaccPlugin {
    /// Register the units of `extension` in `graph`.
    ///
    /// Units take a snapshot of their configuration. Applying again refreshes
    /// the snapshots and adds units for new configurations.
    pub fn apply(extension: &JavaccExtension, graph: &mut BuildGraph) -> Result<(), ConfigError> {
        tracing::info!(
            "JavaCC plugin registers {} configuration(s) using {}",
            extension.len(),
            extension.javacc_artifact()
        );
        extension.iter().try_for_each(|config| graph.add_unit(config))
    }
}
