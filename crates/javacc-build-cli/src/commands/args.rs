//! Args command - prints generator arguments without running anything.

use anyhow::anyhow;
use javacc_build::{GenerationRequest, Tool};

use crate::util::Project;

#[derive(clap::Args)]
pub struct Args {
    /// Configuration name
    pub name: String,
}

pub fn run(args: Args, project: &Project) -> anyhow::Result<()> {
    let config = project
        .extension
        .iter()
        .find(|c| c.name() == args.name || c.unit_name() == args.name)
        .ok_or_else(|| anyhow!("Unknown JavaCC configuration: {}", args.name))?;

    let request = GenerationRequest::from_config(config)?;
    if let Some(line) = request.jjtree_command_line() {
        println!("{} {}", Tool::JjTree, line.join(" "));
    }
    println!("{} {}", Tool::Javacc, request.javacc_command_line().join(" "));
    Ok(())
}
