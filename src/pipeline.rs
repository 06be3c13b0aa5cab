//! Best-effort external steps run before a batch comparison (index builds,
//! query scripts). A failing step is logged and recorded; it never aborts the
//! analysis that follows.

use serde::Serialize;
use std::path::Path;
use std::process::Command;

/// What happened when an external step ran
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StepOutcome {
    pub command: String,
    pub success: bool,
    /// None when the process could not be started or was killed by a signal
    pub exit_code: Option<i32>,
    /// Captured stderr, or the spawn error
    pub message: String,
}

/// Run one shell command through `sh -c` in `workdir`
pub fn run_step(command: &str, workdir: &Path) -> StepOutcome {
    log::info!("Running pre-step: {}", command);
    let output = Command::new("sh")
        .arg("-c")
        .arg(command)
        .current_dir(workdir)
        .output();

    let outcome = match output {
        Ok(out) => StepOutcome {
            command: command.to_string(),
            success: out.status.success(),
            exit_code: out.status.code(),
            message: String::from_utf8_lossy(&out.stderr).trim().to_string(),
        },
        Err(e) => StepOutcome {
            command: command.to_string(),
            success: false,
            exit_code: None,
            message: format!("failed to start: {}", e),
        },
    };

    if outcome.success {
        log::info!("Pre-step succeeded: {}", command);
    } else {
        log::warn!(
            "Pre-step failed ({}): {} {}",
            outcome
                .exit_code
                .map(|c| format!("exit code {}", c))
                .unwrap_or_else(|| "no exit code".to_string()),
            command,
            outcome.message
        );
    }
    outcome
}

/// Run every step in order, continuing past failures
pub fn run_steps(commands: &[String], workdir: &Path) -> Vec<StepOutcome> {
    commands.iter().map(|c| run_step(c, workdir)).collect()
}
