//! Runs a [`Pipeline`] as connected child processes.
//!
//! Each stage's stdout feeds the next stage's stdin through an OS pipe, so
//! memory use is bounded by pipe buffers regardless of the data size. All
//! stages inherit stderr, which keeps the progress meter and tool
//! diagnostics visible on the terminal.

use super::Pipeline;
use super::Stage;
use crate::PackerError;
use crate::Result;
use std::fs::File;
use std::process::Child;
use std::process::ChildStdout;
use std::process::ExitStatus;
use std::process::Stdio;
use std::time::Duration;
use std::time::Instant;

/// Outcome of a successful pipeline run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineReport {
    /// Number of stages that ran.
    pub stages: usize,

    /// Size of the destination file after the run.
    pub bytes_written: u64,

    /// Wall-clock time from launch to the last exit.
    pub duration: Duration,
}

/// Launches every stage and blocks until all of them have exited.
///
/// The destination is created (or truncated) right before the stages are
/// launched. On failure it is left as is and may hold partial output.
///
/// # Errors
///
/// Returns `PipelineFailed` if the destination cannot be created, a stage
/// cannot be launched, or any stage exits unsuccessfully. Returns `Io` if
/// the destination is gone once every stage has succeeded.
pub fn execute(pipeline: &Pipeline) -> Result<PipelineReport> {
    let stages = pipeline.stages();
    let Some(last) = stages.last() else {
        return Err(PackerError::PipelineFailed {
            stage: "pipeline".into(),
            detail: "no stages".into(),
        });
    };

    log::debug!("running {}", pipeline.render());
    let started = Instant::now();

    let mut output = Some(File::create(pipeline.output()).map_err(|e| {
        PackerError::PipelineFailed {
            stage: last.label(),
            detail: format!("cannot create {}: {e}", pipeline.output().display()),
        }
    })?);

    let mut running: Vec<(&Stage, Child)> = Vec::with_capacity(stages.len());
    let mut upstream: Option<ChildStdout> = None;
    let mut launch_error = None;

    for (i, stage) in stages.iter().enumerate() {
        let is_last = i + 1 == stages.len();
        let mut cmd = stage.command();
        cmd.stdin(upstream.take().map_or_else(Stdio::null, Stdio::from));
        cmd.stdout(if is_last {
            output.take().map_or_else(Stdio::null, Stdio::from)
        } else {
            Stdio::piped()
        });
        cmd.stderr(Stdio::inherit());

        match cmd.spawn() {
            Ok(mut child) => {
                upstream = child.stdout.take();
                running.push((stage, child));
            }
            Err(e) => {
                launch_error = Some(PackerError::PipelineFailed {
                    stage: stage.label(),
                    detail: format!("cannot launch {}: {e}", stage.program().display()),
                });
                break;
            }
        }
    }

    // Close our copy of any dangling pipe so upstream stages see EOF/EPIPE.
    drop(upstream);

    // Reap every child before reporting anything.
    let mut statuses = Vec::with_capacity(running.len());
    let mut wait_error = None;
    for (stage, mut child) in running {
        match child.wait() {
            Ok(status) => {
                log::debug!("{} exited with {status}", stage.label());
                statuses.push((stage, status));
            }
            Err(e) => {
                wait_error.get_or_insert(PackerError::PipelineFailed {
                    stage: stage.label(),
                    detail: format!("cannot wait for process: {e}"),
                });
            }
        }
    }

    if let Some(err) = launch_error.or(wait_error) {
        return Err(err);
    }
    if let Some(err) = failure(&statuses) {
        return Err(err);
    }

    let bytes_written = std::fs::metadata(pipeline.output())?.len();
    Ok(PipelineReport {
        stages: statuses.len(),
        bytes_written,
        duration: started.elapsed(),
    })
}

/// Picks the stage to blame among the failed ones.
///
/// When a downstream stage dies, upstream writers get SIGPIPE; those are
/// consequences, so a stage that failed on its own is preferred.
fn failure(statuses: &[(&Stage, ExitStatus)]) -> Option<PackerError> {
    let failed: Vec<_> = statuses.iter().filter(|(_, s)| !s.success()).collect();
    let primary = failed
        .iter()
        .find(|(_, s)| !killed_by_sigpipe(s))
        .or_else(|| failed.first())?;

    let mut detail = primary.1.to_string();
    let others: Vec<_> = failed
        .iter()
        .filter(|(stage, _)| !std::ptr::eq(*stage, primary.0))
        .map(|(stage, status)| format!("{}: {status}", stage.label()))
        .collect();
    if !others.is_empty() {
        detail.push_str(&format!(" (also failed: {})", others.join(", ")));
    }

    Some(PackerError::PipelineFailed {
        stage: primary.0.label(),
        detail,
    })
}

#[cfg(unix)]
fn killed_by_sigpipe(status: &ExitStatus) -> bool {
    use std::os::unix::process::ExitStatusExt;
    const SIGPIPE: i32 = 13;
    status.signal() == Some(SIGPIPE)
}

#[cfg(not(unix))]
fn killed_by_sigpipe(_status: &ExitStatus) -> bool {
    false
}
