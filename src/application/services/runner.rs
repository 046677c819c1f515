//! Subprocess runner service
//!
//! Echoes and executes argument vectors, honoring dry-run and verbose.

use std::io::{self, Write};
use std::path::PathBuf;
use std::sync::Arc;

use tracing::{debug, instrument};

use crate::application::{ApplicationError, ApplicationResult, IoResultExt};
use crate::domain::{CommandLine, RunFlags};
use crate::exitcode;
use crate::infrastructure::traits::CommandRunner;

/// Service running one child process per call.
pub struct RunnerService {
    cmd: Arc<dyn CommandRunner>,
    workdir: PathBuf,
}

impl RunnerService {
    /// Create a runner; children start in `workdir`.
    pub fn new(cmd: Arc<dyn CommandRunner>, workdir: PathBuf) -> Self {
        Self { cmd, workdir }
    }

    /// Echo and/or run `line`, returning the exit code to report.
    ///
    /// The rendering goes to `out` when either flag is set. Dry-run returns
    /// `exitcode::OK` without starting anything; otherwise the child's exit
    /// code is returned unchanged.
    #[instrument(level = "debug", skip(self, out), fields(program = line.program()))]
    pub fn execute<W: Write>(
        &self,
        line: &CommandLine,
        flags: RunFlags,
        out: &mut W,
    ) -> ApplicationResult<i32> {
        if flags.echo() {
            writeln!(out, "$ {}", line.render()).with_context("write command echo")?;
            out.flush().with_context("flush command echo")?;
        }
        if flags.dry_run {
            debug!("dry-run: not executing");
            return Ok(exitcode::OK);
        }

        let code = self
            .cmd
            .run_attached(line.program(), line.args(), &self.workdir)
            .map_err(|e| match e.kind() {
                io::ErrorKind::NotFound => ApplicationError::CommandNotFound {
                    program: line.program().to_string(),
                },
                _ => ApplicationError::SpawnFailed {
                    program: line.program().to_string(),
                    source: e,
                },
            })?;
        debug!("execute: {} exited with {}", line.program(), code);
        Ok(code)
    }
}
