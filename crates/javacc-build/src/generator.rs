//! Launching the code generators.
//!
//! JJTree and JavaCC keep parser state in static fields, so two runs must
//! never share a JVM. [`JavaProcess`] starts a fresh JVM for every run.

use std::ffi::OsString;
use std::fmt;
use std::path::PathBuf;
use std::process::{Child, Command, ExitStatus};
use std::thread;
use std::time::{Duration, Instant};

use bon::Builder;
use indexmap::IndexMap;
use serde::Deserialize;

use crate::error::{ConfigError, GenerateError};
use crate::extension::JavaccExtension;

/// Exit status reported when a generator was terminated by a signal.
pub const TERMINATED: i32 = -1;

const POLL_INTERVAL: Duration = Duration::from_millis(50);

/// The two generators of the JavaCC distribution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Tool {
    JjTree,
    Javacc,
}

impl Tool {
    pub fn main_class(self) -> &'static str {
        match self {
            Tool::JjTree => "org.javacc.jjtree.Main",
            Tool::Javacc => "org.javacc.parser.Main",
        }
    }
}

impl fmt::Display for Tool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Tool::JjTree => f.write_str("JJTree"),
            Tool::Javacc => f.write_str("JavaCC"),
        }
    }
}

/// Runs a generator with a complete argument list and reports its exit status.
///
/// Implementations must isolate runs from each other: units run concurrently
/// on the worker pool and may call `run` from several threads at once.
pub trait Generator: Send + Sync {
    fn run(&self, tool: Tool, args: &[String]) -> Result<i32, GenerateError>;
}

impl<G: Generator + ?Sized> Generator for std::sync::Arc<G> {
    fn run(&self, tool: Tool, args: &[String]) -> Result<i32, GenerateError> {
        (**self).run(tool, args)
    }
}

/// Settings of the forked JVM.
#[derive(Debug, Clone, Default, PartialEq, Builder, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct ForkOptions {
    /// Java executable. Defaults to `$JAVA_HOME/bin/java`, then `java` on the `PATH`.
    #[builder(into)]
    pub java: Option<PathBuf>,
    #[builder(default)]
    pub jvm_args: Vec<String>,
    #[builder(default)]
    pub env: IndexMap<String, String>,
    /// Kill a generator run after this many seconds.
    pub timeout_secs: Option<u64>,
}

impl ForkOptions {
    pub fn java_executable(&self) -> PathBuf {
        if let Some(java) = &self.java {
            return java.clone();
        }
        match std::env::var_os("JAVA_HOME") {
            Some(home) if !home.is_empty() => PathBuf::from(home).join("bin").join("java"),
            _ => PathBuf::from("java"),
        }
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }
}

/// Runs each generator invocation in its own JVM.
#[derive(Debug, Clone)]
pub struct JavaProcess {
    classpath: OsString,
    fork: ForkOptions,
}

impl JavaProcess {
    /// Create a launcher for the generator jar(s) in `classpath`.
    pub fn new(
        extension: &JavaccExtension,
        classpath: &[PathBuf],
        fork: ForkOptions,
    ) -> Result<Self, ConfigError> {
        let artifact = extension.javacc_artifact();
        if classpath.is_empty() {
            return Err(ConfigError::MissingClasspath { artifact });
        }
        let classpath = std::env::join_paths(classpath).map_err(|_| {
            let path = classpath
                .iter()
                .find(|entry| std::env::join_paths([entry]).is_err())
                .cloned()
                .unwrap_or_default();
            ConfigError::InvalidClasspath { path }
        })?;
        tracing::debug!("Using {artifact} from {}", classpath.to_string_lossy());
        Ok(Self { classpath, fork })
    }

    pub fn fork_options(&self) -> &ForkOptions {
        &self.fork
    }

    /// The command that runs `tool` with `args`.
    pub fn command(&self, tool: Tool, args: &[String]) -> Command {
        let mut command = Command::new(self.fork.java_executable());
        command
            .args(&self.fork.jvm_args)
            .arg("-cp")
            .arg(&self.classpath)
            .arg(tool.main_class())
            .args(args)
            .envs(&self.fork.env);
        command
    }
}

impl Generator for JavaProcess {
    fn run(&self, tool: Tool, args: &[String]) -> Result<i32, GenerateError> {
        let mut command = self.command(tool, args);
        tracing::debug!("Running {tool}: {command:?}");

        let mut child = command
            .spawn()
            .map_err(|source| GenerateError::Launch { tool, source })?;

        let status = match self.fork.timeout() {
            None => child.wait()?,
            Some(timeout) => match wait_with_timeout(&mut child, timeout)? {
                Some(status) => status,
                None => return Err(GenerateError::TimedOut { tool, timeout }),
            },
        };
        Ok(status.code().unwrap_or(TERMINATED))
    }
}

/// Wait for `child`, killing it once `timeout` has passed. Returns `None` if killed.
fn wait_with_timeout(child: &mut Child, timeout: Duration) -> std::io::Result<Option<ExitStatus>> {
    let deadline = Instant::now() + timeout;
    loop {
        if let Some(status) = child.try_wait()? {
            return Ok(Some(status));
        }
        if Instant::now() >= deadline {
            child.kill()?;
            child.wait()?;
            return Ok(None);
        }
        thread::sleep(POLL_INTERVAL);
    }
}

#[cfg(test)]
mod tests {
    use std::ffi::OsStr;

    use super::*;

    fn extension() -> JavaccExtension {
        JavaccExtension::new("/build")
    }

    #[test]
    fn test_missing_classpath_names_artifact() {
        let err = JavaProcess::new(&extension(), &[], ForkOptions::default()).unwrap_err();
        assert_eq!(
            err.to_string(),
            "No tool classpath configured; add the jar of net.java.dev.javacc:javacc:4.2"
        );
    }

    #[test]
    fn test_command_line() {
        let fork = ForkOptions::builder()
            .java("/opt/jdk/bin/java")
            .jvm_args(vec!["-Xmx256m".to_owned()])
            .build();
        let process =
            JavaProcess::new(&extension(), &[PathBuf::from("/lib/javacc.jar")], fork).unwrap();
        let command = process.command(Tool::JjTree, &["-MULTI=true".to_owned(), "g.jjt".to_owned()]);

        assert_eq!(command.get_program(), OsStr::new("/opt/jdk/bin/java"));
        let args: Vec<&OsStr> = command.get_args().collect();
        assert_eq!(
            args,
            vec![
                OsStr::new("-Xmx256m"),
                OsStr::new("-cp"),
                OsStr::new("/lib/javacc.jar"),
                OsStr::new("org.javacc.jjtree.Main"),
                OsStr::new("-MULTI=true"),
                OsStr::new("g.jjt"),
            ]
        );
    }

    #[cfg(unix)]
    #[test]
    fn test_classpath_entry_with_separator() {
        let err = JavaProcess::new(
            &extension(),
            &[PathBuf::from("/lib/ok.jar"), PathBuf::from("/a.jar:/b.jar")],
            ForkOptions::default(),
        )
        .unwrap_err();
        assert!(matches!(
            err,
            ConfigError::InvalidClasspath { ref path }
                if path == std::path::Path::new("/a.jar:/b.jar")
        ));
    }

    #[test]
    fn test_explicit_java_wins() {
        let fork = ForkOptions::builder().java("/custom/java").build();
        assert_eq!(fork.java_executable(), PathBuf::from("/custom/java"));
    }

    #[test]
    fn test_timeout() {
        assert_eq!(ForkOptions::default().timeout(), None);
        let fork = ForkOptions::builder().timeout_secs(5).build();
        assert_eq!(fork.timeout(), Some(Duration::from_secs(5)));
    }

    /// A launcher whose "JVM" is `/bin/sh -c <script>`. The generator
    /// arguments land in the script's positional parameters.
    #[cfg(unix)]
    fn shell(script: &str, timeout_secs: Option<u64>) -> JavaProcess {
        let fork = ForkOptions::builder()
            .java("/bin/sh")
            .jvm_args(vec!["-c".to_owned(), script.to_owned()])
            .maybe_timeout_secs(timeout_secs)
            .build();
        JavaProcess::new(&extension(), &[PathBuf::from("/lib/javacc.jar")], fork).unwrap()
    }

    #[cfg(unix)]
    #[test]
    fn test_run_reports_exit_status() {
        let args = ["-STATIC=false".to_owned()];
        assert_eq!(shell("exit 0", None).run(Tool::Javacc, &args).unwrap(), 0);
        assert_eq!(shell("exit 3", None).run(Tool::Javacc, &args).unwrap(), 3);
    }

    #[cfg(unix)]
    #[test]
    fn test_run_passes_main_class_and_args() {
        // $0 is "-cp", $1 the classpath, $2 the main class, $3 the first argument.
        let script = r#"[ "$2" = org.javacc.parser.Main ] && [ "$3" = -LOOKAHEAD=2 ]"#;
        let status = shell(script, None)
            .run(Tool::Javacc, &["-LOOKAHEAD=2".to_owned()])
            .unwrap();
        assert_eq!(status, 0);
    }

    #[cfg(unix)]
    #[test]
    fn test_run_killed_by_signal() {
        let status = shell("kill -9 $$", None).run(Tool::JjTree, &[]).unwrap();
        assert_eq!(status, TERMINATED);
    }

    #[cfg(unix)]
    #[test]
    fn test_run_times_out() {
        let started = Instant::now();
        let err = shell("exec sleep 30", Some(1)).run(Tool::Javacc, &[]).unwrap_err();
        assert!(matches!(
            err,
            GenerateError::TimedOut { tool: Tool::Javacc, timeout }
                if timeout == Duration::from_secs(1)
        ));
        assert!(started.elapsed() < Duration::from_secs(20));
    }

    #[cfg(unix)]
    #[test]
    fn test_run_within_timeout() {
        assert_eq!(shell("exit 4", Some(10)).run(Tool::Javacc, &[]).unwrap(), 4);
    }

    #[test]
    fn test_missing_java_executable() {
        let dir = tempfile::tempdir().unwrap();
        let fork = ForkOptions::builder()
            .java(dir.path().join("no-such-java"))
            .build();
        let process =
            JavaProcess::new(&extension(), &[PathBuf::from("/lib/javacc.jar")], fork).unwrap();
        let err = process.run(Tool::JjTree, &[]).unwrap_err();
        assert!(matches!(err, GenerateError::Launch { tool: Tool::JjTree, .. }));
        assert_eq!(err.tool(), Some(Tool::JjTree));
    }

    #[cfg(unix)]
    #[test]
    fn test_failing_generator_fails_the_unit() {
        use crate::runner::{self, GenerationRequest};

        let dir = tempfile::tempdir().unwrap();
        let request = GenerationRequest {
            name: "calc".to_owned(),
            output_dir: dir.path().join("out"),
            input_file: dir.path().join("calc.jj"),
            javacc_args: Vec::new(),
            jjtree_args: None,
        };
        let err = runner::run(&request, &shell("exit 2", None)).unwrap_err();
        assert!(matches!(err, GenerateError::JavaccFailed { status: 2, .. }));
        assert!(dir.path().join("out").is_dir());
    }
}
