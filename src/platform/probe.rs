use std::process::Command;

/// Diagnostic command run once at startup.
pub const PROBE_PROGRAM: &str = "uname";
/// Substring in the probe output that marks a Linux-like host.
pub const LINUX_MARKER: &str = "Linux";

/// Host classification, computed once before any menu is built.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlatformInfo {
    pub is_linux_like: bool,
}

impl PlatformInfo {
    /// Classification used when the probe cannot run or says nothing.
    pub const FALLBACK: PlatformInfo = PlatformInfo { is_linux_like: false };

    pub fn linux() -> Self {
        Self { is_linux_like: true }
    }

    pub fn other() -> Self {
        Self { is_linux_like: false }
    }

    pub fn label(self) -> &'static str {
        if self.is_linux_like {
            "linux"
        } else {
            "other"
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ProbeError {
    #[error("failed to run {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },
    #[error("{program} exited with {status}")]
    Failed { program: String, status: String },
    #[error("{program} produced no output")]
    EmptyOutput { program: String },
}

/// Runs a program to completion and returns its standard output as text.
pub trait CommandRunner {
    fn output(&self, program: &str, args: &[&str]) -> Result<String, ProbeError>;
}

/// Spawns real processes.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemRunner;

impl CommandRunner for SystemRunner {
    fn output(&self, program: &str, args: &[&str]) -> Result<String, ProbeError> {
        let output = Command::new(program)
            .args(args)
            .output()
            .map_err(|source| ProbeError::Spawn {
                program: program.to_string(),
                source,
            })?;

        if !output.status.success() {
            return Err(ProbeError::Failed {
                program: program.to_string(),
                status: output.status.to_string(),
            });
        }

        Ok(String::from_utf8_lossy(&output.stdout).to_string())
    }
}

/// Runs the probe and reports failures instead of recovering from them.
pub fn try_probe(runner: &dyn CommandRunner) -> Result<PlatformInfo, ProbeError> {
    let out = runner.output(PROBE_PROGRAM, &[])?;
    if out.trim().is_empty() {
        return Err(ProbeError::EmptyOutput {
            program: PROBE_PROGRAM.to_string(),
        });
    }
    Ok(PlatformInfo {
        is_linux_like: out.contains(LINUX_MARKER),
    })
}

/// Classifies the host. Never fails: any probe error degrades to
/// [`PlatformInfo::FALLBACK`] (not Linux-like) after logging a warning.
pub fn probe(runner: &dyn CommandRunner) -> PlatformInfo {
    match try_probe(runner) {
        Ok(info) => {
            tracing::debug!("platform probe: {}", info.label());
            info
        }
        Err(e) => {
            tracing::warn!("platform probe failed, assuming non-Linux host: {e}");
            PlatformInfo::FALLBACK
        }
    }
}

pub fn probe_system() -> PlatformInfo {
    probe(&SystemRunner)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    enum Outcome {
        Stdout(&'static str),
        Exit,
        Missing,
    }

    struct FakeRunner {
        outcome: Outcome,
        calls: Cell<usize>,
    }

    impl FakeRunner {
        fn new(outcome: Outcome) -> Self {
            Self {
                outcome,
                calls: Cell::new(0),
            }
        }
    }

    impl CommandRunner for FakeRunner {
        fn output(&self, program: &str, _args: &[&str]) -> Result<String, ProbeError> {
            self.calls.set(self.calls.get() + 1);
            match self.outcome {
                Outcome::Stdout(s) => Ok(s.to_string()),
                Outcome::Exit => Err(ProbeError::Failed {
                    program: program.to_string(),
                    status: "exit status: 1".to_string(),
                }),
                Outcome::Missing => Err(ProbeError::Spawn {
                    program: program.to_string(),
                    source: std::io::Error::from(std::io::ErrorKind::NotFound),
                }),
            }
        }
    }

    #[test]
    fn linux_output_is_linux_like() {
        let runner = FakeRunner::new(Outcome::Stdout("Linux\n"));
        assert_eq!(probe(&runner), PlatformInfo::linux());
        assert_eq!(runner.calls.get(), 1);
    }

    #[test]
    fn darwin_output_is_not_linux_like() {
        let runner = FakeRunner::new(Outcome::Stdout("Darwin\n"));
        assert_eq!(probe(&runner), PlatformInfo::other());
    }

    #[test]
    fn marker_is_case_sensitive_substring() {
        let runner = FakeRunner::new(Outcome::Stdout("GNU/Linux x86_64"));
        assert!(probe(&runner).is_linux_like);
        let runner = FakeRunner::new(Outcome::Stdout("linux"));
        assert!(!probe(&runner).is_linux_like);
    }

    #[test]
    fn non_zero_exit_falls_back() {
        let runner = FakeRunner::new(Outcome::Exit);
        assert_eq!(probe(&runner), PlatformInfo::FALLBACK);
        assert!(matches!(try_probe(&runner), Err(ProbeError::Failed { .. })));
    }

    #[test]
    fn empty_output_falls_back() {
        let runner = FakeRunner::new(Outcome::Stdout("  \n"));
        assert_eq!(probe(&runner), PlatformInfo::FALLBACK);
        assert!(matches!(
            try_probe(&runner),
            Err(ProbeError::EmptyOutput { .. })
        ));
    }

    #[test]
    fn missing_program_falls_back() {
        let runner = FakeRunner::new(Outcome::Missing);
        assert_eq!(probe(&runner), PlatformInfo::FALLBACK);
    }

    #[test]
    fn fallback_is_not_linux_like() {
        assert!(!PlatformInfo::FALLBACK.is_linux_like);
        assert_eq!(PlatformInfo::FALLBACK.label(), "other");
    }
}
