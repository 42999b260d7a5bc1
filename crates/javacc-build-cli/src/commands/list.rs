use nu_ansi_term::Color;

use crate::util::Project;

#[derive(clap::Args)]
pub struct Args {}

pub fn run(_args: Args, project: &Project) -> anyhow::Result<()> {
    println!(
        "{} (javacc {})",
        project.config.path.display(),
        project.extension.javacc_version()
    );
    for config in project.extension.iter() {
        let input = config
            .input_file
            .as_ref()
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| Color::Red.paint("<no input file>").to_string());
        let jjtree = if config.jjtree().is_configured() {
            " +jjtree"
        } else {
            ""
        };
        println!(
            "{} ({}){jjtree}\n  input:      {input}\n  output:     {}\n  source set: {}",
            Color::Cyan.paint(config.name()),
            config.unit_name(),
            config.resolved_output_dir().display(),
            config.source_set_name
        );
    }
    Ok(())
}
