//! Generate command - runs JJTree and JavaCC for the configured grammars.

use std::time::Instant;

use javacc_build::{BuildGraph, JavaProcess, SourceSetRegistry, executor};
use nu_ansi_term::Color;

use crate::util::Project;

#[derive(clap::Args)]
pub struct Args {
    /// Configuration or unit names to generate (default: all)
    #[arg(num_args = 0..)]
    pub names: Vec<String>,

    /// Number of units generated in parallel (default: available cores)
    #[arg(short, long)]
    pub jobs: Option<usize>,
}

pub fn run(args: Args, project: &Project) -> anyhow::Result<()> {
    let start = Instant::now();

    let mut graph = BuildGraph::from_extension(&project.extension)?;
    let mut source_sets = SourceSetRegistry::with_defaults();
    graph.link_source_sets(&mut source_sets);

    let classpath = project.config.tool_classpath();
    let java = JavaProcess::new(
        &project.extension,
        &classpath,
        project.config.file.fork.clone(),
    )?;
    let jobs = args.jobs.unwrap_or_else(executor::default_parallelism);

    let report = graph.execute(&java, &args.names, jobs)?;

    for unit in &report.units {
        match &unit.result {
            Ok(outcome) => println!(
                "{} {} -> {}",
                Color::Green.paint("✓"),
                unit.unit,
                outcome.output_dir.display()
            ),
            Err(e) => eprintln!("{} {}: {e}", Color::Red.paint("✗"), unit.unit),
        }
    }

    for (name, dirs) in source_sets.iter().filter(|(_, dirs)| !dirs.is_empty()) {
        for dir in dirs {
            println!("  source set {name}: {}", dir.display());
        }
    }

    let failed = report.failures().count();
    let elapsed = start.elapsed();
    if failed == 0 {
        println!(
            "{}",
            Color::Green.paint(format!(
                "{}: {} unit(s) generated in {:.2?}",
                report.aggregate,
                report.units.len(),
                elapsed
            ))
        );
        Ok(())
    } else {
        eprintln!(
            "{}",
            Color::Red.paint(format!(
                "{}: {failed} of {} unit(s) failed, their output is incomplete",
                report.aggregate,
                report.units.len()
            ))
        );
        std::process::exit(1);
    }
}
