//! Version control adapter that shells out to the `git` executable.

use std::io::Read;
use std::path::Path;
use std::process::{Command, Stdio};
use std::thread;
use std::time::Duration;

use tracing::{debug, instrument, warn};

use stencil_core::{
    application::{ApplicationError, CancellationToken, ports::VersionControl},
    error::StencilResult,
};

const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(50);

/// Runs git commands as child processes.
///
/// The child is polled rather than waited on so that cancellation can kill
/// it mid-command.
#[derive(Debug, Clone)]
pub struct GitCli {
    program: String,
    poll_interval: Duration,
}

impl GitCli {
    pub fn new() -> Self {
        Self::with_program("git")
    }

    /// Use a specific executable instead of `git` from `PATH`.
    pub fn with_program(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            poll_interval: DEFAULT_POLL_INTERVAL,
        }
    }

    pub fn program(&self) -> &str {
        &self.program
    }
}

impl Default for GitCli {
    fn default() -> Self {
        Self::new()
    }
}

impl VersionControl for GitCli {
    #[instrument(skip_all, fields(dir = %working_dir.display()))]
    fn run(
        &self,
        args: &[&str],
        working_dir: &Path,
        cancel: &CancellationToken,
    ) -> StencilResult<()> {
        cancel.check()?;

        let command = format!("{} {}", self.program, args.join(" "));
        debug!(%command, "Spawning");

        let mut child = Command::new(&self.program)
            .args(args)
            .current_dir(working_dir)
            .env("GIT_TERMINAL_PROMPT", "0")
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| ApplicationError::Subprocess {
                command: command.clone(),
                reason: format!("failed to start: {e}"),
            })?;

        // Drain stderr on a separate thread so a chatty child cannot block on
        // a full pipe while we poll.
        let stderr = child.stderr.take().map(|mut pipe| {
            thread::spawn(move || {
                let mut buf = String::new();
                let _ = pipe.read_to_string(&mut buf);
                buf
            })
        });

        let status = loop {
            if cancel.is_cancelled() {
                warn!(%command, "Cancelled, killing child process");
                let _ = child.kill();
                let _ = child.wait();
                return Err(ApplicationError::Cancelled.into());
            }

            match child.try_wait() {
                Ok(Some(status)) => break status,
                Ok(None) => thread::sleep(self.poll_interval),
                Err(e) => {
                    let _ = child.kill();
                    return Err(ApplicationError::Subprocess {
                        command,
                        reason: format!("failed to wait: {e}"),
                    }
                    .into());
                }
            }
        };

        let stderr = stderr
            .and_then(|handle| handle.join().ok())
            .unwrap_or_default();

        if status.success() {
            debug!(%command, "Finished");
            Ok(())
        } else {
            let detail = stderr
                .lines()
                .rev()
                .find(|line| !line.trim().is_empty())
                .map(str::trim)
                .unwrap_or("no output");
            Err(ApplicationError::Subprocess {
                command,
                reason: format!("{status}: {detail}"),
            }
            .into())
        }
    }
}
