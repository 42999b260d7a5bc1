use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use javacc_build::{
    BuildGraph, GenerateError, Generator, JavaccExtension, JavaccOptions, JjTreeOptions,
    SourceSetRegistry, Tool,
};
use pretty_assertions::assert_eq;

/// Stands in for the JVM: records every run and writes what the real tools would.
struct FakeTools {
    calls: Mutex<Vec<(Tool, Vec<String>)>>,
    jjtree_status: i32,
    javacc_status: i32,
}

impl FakeTools {
    fn new(jjtree_status: i32, javacc_status: i32) -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            jjtree_status,
            javacc_status,
        }
    }

    fn calls(&self) -> Vec<(Tool, Vec<String>)> {
        self.calls.lock().unwrap().clone()
    }
}

fn output_dir(args: &[String]) -> PathBuf {
    args.iter()
        .find_map(|a| a.strip_prefix("-OUTPUT_DIRECTORY="))
        .map(PathBuf::from)
        .expect("OUTPUT_DIRECTORY argument")
}

impl Generator for FakeTools {
    fn run(&self, tool: Tool, args: &[String]) -> Result<i32, GenerateError> {
        self.calls.lock().unwrap().push((tool, args.to_vec()));
        let out = output_dir(args);
        let input = Path::new(args.last().unwrap());
        match tool {
            Tool::JjTree => {
                if self.jjtree_status == 0 {
                    let stem = input.file_stem().unwrap().to_string_lossy();
                    fs::write(out.join(format!("{stem}.jj")), "options {}").unwrap();
                }
                Ok(self.jjtree_status)
            }
            Tool::Javacc => {
                assert!(input.is_file(), "JavaCC input must exist: {}", input.display());
                if self.javacc_status == 0 {
                    fs::write(out.join("Parser.java"), "class Parser {}").unwrap();
                }
                Ok(self.javacc_status)
            }
        }
    }
}

struct Project {
    dir: tempfile::TempDir,
    extension: JavaccExtension,
}

impl Project {
    fn new() -> Self {
        let dir = tempfile::tempdir().unwrap();
        let extension = JavaccExtension::new(dir.path().join("build"));
        Self { dir, extension }
    }

    fn grammar(&self, name: &str) -> PathBuf {
        let path = self.dir.path().join("src").join(name);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, "PARSER_BEGIN(Parser) PARSER_END(Parser)").unwrap();
        path
    }
}

#[test]
fn test_plain_javacc_never_runs_jjtree() {
    let mut project = Project::new();
    let grammar = project.grammar("calc.jj");
    project
        .extension
        .register("calc")
        .set_input_file(&grammar)
        .set_options(JavaccOptions::builder().static_param(false).build());

    let graph = BuildGraph::from_extension(&project.extension).unwrap();
    let tools = FakeTools::new(0, 0);
    let report = graph.execute(&tools, &[], 2).unwrap();

    assert!(report.is_success());
    let calls = tools.calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].0, Tool::Javacc);

    let out = project.dir.path().join("build/generated/javacc/calc");
    assert_eq!(
        calls[0].1,
        vec![
            "-STATIC=false".to_owned(),
            format!("-OUTPUT_DIRECTORY={}", out.display()),
            grammar.display().to_string(),
        ]
    );
    assert!(out.join("Parser.java").is_file());
    assert!(!out.join("calc.jj").exists());
}

#[test]
fn test_jjtree_output_feeds_javacc() {
    let mut project = Project::new();
    let grammar = project.grammar("grammar.jjt");
    project
        .extension
        .register("grammar")
        .set_input_file(&grammar)
        .set_package_name("com.example")
        .set_jjtree(JjTreeOptions::builder().multi(true).build());

    let graph = BuildGraph::from_extension(&project.extension).unwrap();
    let tools = FakeTools::new(0, 0);
    let report = graph.execute(&tools, &[], 1).unwrap();

    assert!(report.is_success());
    let out = project
        .dir
        .path()
        .join("build/generated/javacc/grammar/com/example");
    let calls = tools.calls();
    assert_eq!(calls.len(), 2);

    assert_eq!(calls[0].0, Tool::JjTree);
    assert_eq!(
        calls[0].1,
        vec![
            "-MULTI=true".to_owned(),
            "-NODE_PREFIX=AST".to_owned(),
            format!("-OUTPUT_DIRECTORY={}", out.display()),
            grammar.display().to_string(),
        ]
    );

    assert_eq!(calls[1].0, Tool::Javacc);
    assert_eq!(
        calls[1].1.last().unwrap(),
        &out.join("grammar.jj").display().to_string()
    );

    let outcome = report.units[0].result.as_ref().unwrap();
    assert!(outcome.jjtree_ran);
    assert_eq!(outcome.grammar, out.join("grammar.jj"));
}

#[test]
fn test_jjtree_failure_skips_javacc() {
    let mut project = Project::new();
    let grammar = project.grammar("broken.jjt");
    project
        .extension
        .register("broken")
        .set_input_file(&grammar)
        .set_jjtree(JjTreeOptions::default());

    let graph = BuildGraph::from_extension(&project.extension).unwrap();
    let tools = FakeTools::new(1, 0);
    let report = graph.execute(&tools, &[], 1).unwrap();

    assert!(!report.is_success());
    let calls = tools.calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].0, Tool::JjTree);

    let (unit, error) = report.failures().next().unwrap();
    assert_eq!(unit.unit, "javaccBroken");
    assert!(matches!(error, GenerateError::JjTreeFailed { status: 1, .. }));
    assert_eq!(error.tool(), Some(Tool::JjTree));
}

#[test]
fn test_failure_does_not_affect_other_units() {
    let mut project = Project::new();
    let good = project.grammar("good.jj");
    let bad = project.grammar("bad.jjt");
    project.extension.register("good").set_input_file(&good);
    project
        .extension
        .register("bad")
        .set_input_file(&bad)
        .set_jjtree(JjTreeOptions::default());

    let graph = BuildGraph::from_extension(&project.extension).unwrap();
    let tools = FakeTools::new(2, 0);
    let report = graph.execute(&tools, &[], 2).unwrap();

    assert_eq!(report.units.len(), 2);
    assert!(report.units[0].result.is_ok());
    assert!(report.units[1].result.is_err());
    assert!(
        project
            .dir
            .path()
            .join("build/generated/javacc/good/Parser.java")
            .is_file()
    );
}

#[test]
fn test_execute_selected_units() {
    let mut project = Project::new();
    let a = project.grammar("a.jj");
    let b = project.grammar("b.jj");
    project.extension.register("a").set_input_file(&a);
    project.extension.register("b").set_input_file(&b);

    let graph = BuildGraph::from_extension(&project.extension).unwrap();
    let tools = FakeTools::new(0, 0);
    let report = graph.execute(&tools, &["javaccB".to_owned()], 2).unwrap();

    assert_eq!(report.units.len(), 1);
    assert_eq!(report.units[0].config, "b");
    assert_eq!(tools.calls().len(), 1);
}

#[test]
fn test_generated_dirs_join_source_sets() {
    let mut project = Project::new();
    let grammar = project.grammar("calc.jj");
    project
        .extension
        .register("calc")
        .set_input_file(&grammar)
        .set_package_name("com.example");

    let mut graph = BuildGraph::from_extension(&project.extension).unwrap();
    let mut sets = SourceSetRegistry::with_defaults();
    graph.link_source_sets(&mut sets);

    assert_eq!(
        sets.source_dirs("main"),
        &[project.dir.path().join("build/generated/javacc/calc")]
    );
}
