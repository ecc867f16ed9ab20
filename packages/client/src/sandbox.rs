//! Project execution sandbox.
//!
//! Mounts the file tree into a scratch directory, runs an install step to
//! completion, then spawns the start step and scans its stdout for a
//! server-ready line to produce the preview address. Re-running kills the
//! previous start process first.

use std::path::{Path, PathBuf};
use std::process::Stdio;

use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::process::{Child, Command};

use atelier_server::domain::FileTree;

use crate::error::ClientError;

/// Commands the sandbox runs and the stdout marker that signals readiness.
#[derive(Debug, Clone)]
pub struct RunConfig {
    /// Install step, run to completion before the start step
    pub install: Vec<String>,
    /// Start step, left running; its stdout is scanned for the marker
    pub start: Vec<String>,
    /// Substring of the stdout line announcing the server is up
    pub ready_marker: String,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            install: vec!["npm".to_string(), "install".to_string()],
            start: vec!["npm".to_string(), "start".to_string()],
            ready_marker: "http".to_string(),
        }
    }
}

/// Runs the project tree as a local child process.
pub struct ProcessSandbox {
    workdir: PathBuf,
    config: RunConfig,
    current: Option<Child>,
}

impl ProcessSandbox {
    pub fn new(workdir: PathBuf, config: RunConfig) -> Self {
        Self {
            workdir,
            config,
            current: None,
        }
    }

    /// A per-project scratch directory under the system temp dir.
    pub fn for_project(project_id: &str, config: RunConfig) -> Self {
        Self::new(
            std::env::temp_dir().join(format!("atelier-run-{project_id}")),
            config,
        )
    }

    pub fn workdir(&self) -> &Path {
        &self.workdir
    }

    /// Write the tree into the scratch directory, replacing whatever a
    /// previous mount left there.
    pub async fn mount(&self, tree: &FileTree) -> Result<(), ClientError> {
        if let Err(e) = tokio::fs::remove_dir_all(&self.workdir).await {
            if e.kind() != std::io::ErrorKind::NotFound {
                return Err(e.into());
            }
        }
        tokio::fs::create_dir_all(&self.workdir).await?;
        for path in tree.file_paths() {
            let contents = tree
                .read(&path)
                .map_err(|e| ClientError::Sandbox(format!("unreadable tree entry: {e}")))?;
            let target = self.workdir.join(&path);
            if let Some(parent) = target.parent() {
                tokio::fs::create_dir_all(parent).await?;
            }
            tokio::fs::write(target, contents).await?;
        }
        Ok(())
    }

    /// Write one file into the scratch directory, so a running preview
    /// serves a freshly saved edit without a full remount.
    pub async fn write_file(&self, path: &str, contents: &str) -> Result<(), ClientError> {
        let target = self.workdir.join(path);
        if let Some(parent) = target.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        tokio::fs::write(target, contents).await?;
        Ok(())
    }

    /// Mount the tree, run install, spawn start, and wait for the ready
    /// line. Returns the preview address parsed out of that line. Any
    /// previous run is killed first.
    pub async fn run(&mut self, tree: &FileTree) -> Result<String, ClientError> {
        self.stop().await;
        self.mount(tree).await?;

        let status = build_command(&self.config.install, &self.workdir)?
            .status()
            .await?;
        if !status.success() {
            return Err(ClientError::Sandbox(format!(
                "install step exited with {status}"
            )));
        }

        let mut child = build_command(&self.config.start, &self.workdir)?
            .stdout(Stdio::piped())
            .spawn()?;
        let stdout = child
            .stdout
            .take()
            .ok_or_else(|| ClientError::Sandbox("start step has no stdout".to_string()))?;
        self.current = Some(child);

        let mut lines = BufReader::new(stdout).lines();
        while let Some(line) = lines.next_line().await? {
            tracing::debug!("sandbox: {line}");
            if line.contains(&self.config.ready_marker) {
                let address = extract_address(&line).unwrap_or_else(|| line.trim().to_string());
                // keep draining so the child never blocks on a full pipe
                tokio::spawn(async move {
                    while let Ok(Some(line)) = lines.next_line().await {
                        tracing::debug!("sandbox: {line}");
                    }
                });
                return Ok(address);
            }
        }

        self.stop().await;
        Err(ClientError::Sandbox(
            "start step exited before reporting ready".to_string(),
        ))
    }

    /// Kill the running start process, if any.
    pub async fn stop(&mut self) {
        if let Some(mut child) = self.current.take() {
            if let Err(e) = child.kill().await {
                tracing::warn!("failed to kill previous run: {e}");
            }
        }
    }
}

fn build_command(argv: &[String], workdir: &Path) -> Result<Command, ClientError> {
    let (program, args) = argv
        .split_first()
        .ok_or_else(|| ClientError::Sandbox("empty command".to_string()))?;
    let mut command = Command::new(program);
    command.args(args).current_dir(workdir).kill_on_drop(true);
    Ok(command)
}

/// Pull an `http(s)://...` address out of a ready line.
fn extract_address(line: &str) -> Option<String> {
    let start = line.find("http")?;
    let address: String = line[start..]
        .split_whitespace()
        .next()?
        .trim_end_matches(|c: char| !c.is_alphanumeric() && c != '/')
        .to_string();
    (!address.is_empty()).then_some(address)
}
