//! Invocation of the jj executable.
//!
//! jj owns all repository state; jjview only ever reads its coloured text
//! output. [`CommandRunner`] is the seam between the worker thread and the
//! process spawn so the worker can be driven by canned output in tests.

use std::path::{Path, PathBuf};
use std::process::Command;

use thiserror::Error;

/// Errors from running a jj subcommand.
#[derive(Debug, Error)]
pub enum RunnerError {
    #[error("failed to launch {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },
    #[error("`jj {args}` exited with {status}: {stderr}")]
    Failed { args: String, status: String, stderr: String },
}

/// Runs one jj subcommand to completion and returns its stdout.
pub trait CommandRunner: Send {
    fn run(&self, args: &[&str]) -> Result<String, RunnerError>;
}

/// Runs the real jj binary against one workspace.
#[derive(Debug, Clone)]
pub struct JjRunner {
    program: PathBuf,
    workspace: PathBuf,
}

impl JjRunner {
    pub fn new(program: impl Into<PathBuf>, workspace: impl Into<PathBuf>) -> Self {
        Self { program: program.into(), workspace: workspace.into() }
    }
}

impl CommandRunner for JjRunner {
    fn run(&self, args: &[&str]) -> Result<String, RunnerError> {
        let output = Command::new(&self.program)
            .arg("--color=always")
            .arg("--no-pager")
            .arg("-R")
            .arg(&self.workspace)
            .args(args)
            .output()
            .map_err(|source| RunnerError::Spawn {
                program: self.program.display().to_string(),
                source,
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(RunnerError::Failed {
                args: args.join(" "),
                status: output.status.to_string(),
                stderr: jjview_core::ansi::strip(stderr.trim()).into_owned(),
            });
        }
        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

/// Arguments for the listing, preview and file summary commands.
pub(crate) mod args {
    pub fn log(revset: Option<&str>) -> Vec<&str> {
        match revset {
            Some(revset) => vec!["log", "-r", revset],
            None => vec!["log"],
        }
    }

    pub fn op_log() -> Vec<&'static str> {
        vec!["op", "log"]
    }

    pub fn evolog(revision: &str) -> Vec<&str> {
        vec!["evolog", "-r", revision]
    }

    pub fn show(revision: &str) -> Vec<&str> {
        vec!["show", "-r", revision]
    }

    pub fn op_show(operation: &str) -> Vec<&str> {
        vec!["op", "show", "-p", operation]
    }

    pub fn diff_summary(revision: &str) -> Vec<&str> {
        vec!["diff", "--summary", "-r", revision]
    }
}

/// Walks up from `start` to the nearest directory holding a `.jj` directory.
pub fn find_workspace_root(start: &Path) -> Option<PathBuf> {
    start.ancestors().find(|dir| dir.join(".jj").is_dir()).map(Path::to_path_buf)
}
