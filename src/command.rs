//! Process-execution boundary
//!
//! Every interaction with the OS goes through [`CommandRunner`]: run a
//! native command, hand back its captured stdout, or fail with
//! [`SpoofError::CommandFailed`] carrying the rendered command line.
//! No output parsing happens at this layer.
//!
//! Arguments are passed as discrete argv elements and never through a
//! shell, so device identifiers taken from OS text output (which may
//! contain spaces) cannot be split or interpreted. No timeout is
//! imposed; a hang in the native tool hangs the operation.

use async_trait::async_trait;
use tokio::process::Command;
use tracing::debug;

use crate::error::{Result, SpoofError};

/// Executes native commands and captures their standard output
#[async_trait]
pub trait CommandRunner: Send + Sync {
    /// Run `program` with `args`, returning captured stdout as text
    async fn run(&self, program: &str, args: &[&str]) -> Result<String>;
}

/// Render a command line for diagnostics. Arguments containing
/// whitespace are quoted so the message reads back unambiguously.
pub fn render_command(program: &str, args: &[&str]) -> String {
    let mut parts = vec![program.to_string()];
    for arg in args {
        if arg.chars().any(char::is_whitespace) {
            parts.push(format!("\"{}\"", arg));
        } else {
            parts.push(arg.to_string());
        }
    }
    parts.join(" ")
}

/// [`CommandRunner`] backed by real process execution
pub struct SystemRunner;

#[async_trait]
impl CommandRunner for SystemRunner {
    async fn run(&self, program: &str, args: &[&str]) -> Result<String> {
        let rendered = render_command(program, args);
        debug!(command = %rendered, "running native command");

        let output = Command::new(program)
            .args(args)
            .output()
            .await
            .map_err(|err| SpoofError::command_failed(rendered.clone(), err.to_string()))?;

        if !output.status.success() {
            let detail = match output.status.code() {
                Some(code) => format!("exit status {}", code),
                None => "terminated by signal".to_string(),
            };
            return Err(SpoofError::command_failed(rendered, detail));
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}
