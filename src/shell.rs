use color_eyre::eyre::{eyre, Result};
use std::path::Path;
use std::process::ExitStatus;
use tokio::process::Command;

/// Program and arguments that run a command line through the user's shell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShellSpec {
    pub program: String,
    pub args: Vec<String>,
}

pub fn shell_command(command: &str) -> ShellSpec {
    if cfg!(target_os = "windows") {
        ShellSpec {
            program: "cmd".to_string(),
            args: vec!["/C".to_string(), command.to_string()],
        }
    } else {
        let shell = std::env::var("SHELL")
            .ok()
            .filter(|s| !s.trim().is_empty())
            .unwrap_or_else(|| "/bin/sh".to_string());
        ShellSpec {
            program: shell,
            args: vec!["-c".to_string(), command.to_string()],
        }
    }
}

/// Runs `command` with inherited stdio and waits for it to exit.
pub async fn run(command: &str, dir: Option<&Path>) -> Result<ExitStatus> {
    let spec = shell_command(command);
    let mut cmd = Command::new(&spec.program);
    cmd.args(&spec.args);
    if let Some(dir) = dir {
        cmd.current_dir(dir);
    }

    tracing::info!("running `{command}` via {}", spec.program);
    let status = cmd.status().await.map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            eyre!("Shell {} not found", spec.program)
        } else {
            eyre!("Failed to run `{}`: {}", command, e)
        }
    })?;
    tracing::info!("`{command}` finished: {status}");
    Ok(status)
}

pub fn describe_status(status: ExitStatus) -> String {
    match status.code() {
        Some(0) => "ok".to_string(),
        Some(code) => format!("exit {code}"),
        None => "killed by signal".to_string(),
    }
}
