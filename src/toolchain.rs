use std::process::Command;

use crate::error::{DocrError, Result};

/// Run `<program> version` and extract the installed version
pub fn detect_version(program: &str) -> Result<String> {
    let output = Command::new(program)
        .arg("version")
        .output()
        .map_err(|e| DocrError::ToolchainUndetected(format!("{} version failed: {}", program, e)))?;

    if !output.status.success() {
        return Err(DocrError::ToolchainUndetected(format!(
            "{} version exited with status code: {}",
            program,
            output.status.code().unwrap_or(-1)
        )));
    }

    let stdout = String::from_utf8_lossy(&output.stdout);
    parse_version_output(&stdout).ok_or_else(|| {
        DocrError::ToolchainUndetected(format!(
            "unexpected output from {} version: {}",
            program,
            stdout.trim()
        ))
    })
}

/// The version is the second whitespace-delimited token:
/// `Crystal 1.14.0 [dacd97bcc] (2024-10-09)` -> `1.14.0`
pub fn parse_version_output(output: &str) -> Option<String> {
    output.split_whitespace().nth(1).map(str::to_string)
}
