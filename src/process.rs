//! Fork one child per job, set up its redirect, exec, and reap every child.

use crate::command::{ExitCode, Job};
use crate::error::{ErrorSink, ShellError, report_from_child};
use nix::fcntl::{OFlag, open};
use nix::libc;
use nix::sys::stat::Mode;
use nix::sys::wait::{WaitStatus, waitpid};
use nix::unistd::{ForkResult, Pid, close, dup2, execv, fork};
use std::ffi::CString;
use std::os::unix::ffi::OsStrExt;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Exit status of a child whose redirect target could not be opened.
const REDIRECT_FAILED: i32 = 1;

/// Exit status of a child whose `execv` returned.
const EXEC_FAILED: i32 = 0;

/// Everything a child needs, built in the parent before forking.
///
/// The C strings are owned here and dropped with the request, so the
/// argument vector never outlives a failed `execv`.
#[derive(Debug)]
pub struct ExecRequest {
    program: CString,
    argv: Vec<CString>,
    redirect: Option<PathBuf>,
}

impl TryFrom<&Job> for ExecRequest {
    type Error = ShellError;

    fn try_from(job: &Job) -> Result<Self, Self::Error> {
        let program = CString::new(job.executable.as_os_str().as_bytes())
            .map_err(|_| ShellError::InvalidArgument(job.executable.display().to_string()))?;
        let argv = job
            .command
            .argv
            .iter()
            .map(|arg| c_string(arg))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            program,
            argv,
            redirect: job.command.redirect.clone(),
        })
    }
}

fn c_string(arg: &str) -> Result<CString, ShellError> {
    CString::new(arg).map_err(|_| ShellError::InvalidArgument(arg.to_string()))
}

/// A child that was forked, paired with the position of its job in the group.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Spawned {
    pub index: usize,
    pub pid: Pid,
}

/// Run every job of a group concurrently and wait for all of them.
///
/// Nothing is forked if any job has an argument that can't be passed to `execv`.
/// A fork failure is reported and the remaining jobs are still started. Returns the
/// exit status of each child that was spawned, in job order.
pub fn run_group(jobs: &[Job], sink: &mut dyn ErrorSink) -> Result<Vec<ExitCode>, ShellError> {
    let requests = jobs
        .iter()
        .map(ExecRequest::try_from)
        .collect::<Result<Vec<_>, _>>()?;

    let spawned = spawn_all(&requests, sink);
    Ok(wait_all(&spawned, sink))
}

fn spawn_all(requests: &[ExecRequest], sink: &mut dyn ErrorSink) -> Vec<Spawned> {
    let mut spawned = Vec::with_capacity(requests.len());
    for (index, request) in requests.iter().enumerate() {
        // SAFETY: the child only calls open/dup2/close/execv/write/_exit before
        // leaving, and never returns into the shell loop.
        match unsafe { fork() } {
            Ok(ForkResult::Parent { child }) => {
                debug!(index, pid = child.as_raw(), "spawned child");
                spawned.push(Spawned { index, pid: child });
            }
            Ok(ForkResult::Child) => exec_child(request),
            Err(source) => sink.report(&ShellError::Fork {
                program: request.program.to_string_lossy().into_owned(),
                source,
            }),
        }
    }
    spawned
}

/// Child side: redirect if asked to, then replace the process image.
fn exec_child(request: &ExecRequest) -> ! {
    if let Some(target) = &request.redirect {
        if redirect_output(target).is_err() {
            report_from_child();
            terminate(REDIRECT_FAILED);
        }
    }

    let _ = execv(&request.program, &request.argv);
    report_from_child();
    terminate(EXEC_FAILED)
}

/// Point stdout and stderr at `target`, created or truncated, mode `0700`.
fn redirect_output(target: &Path) -> nix::Result<()> {
    let fd = open(
        target,
        OFlag::O_CREAT | OFlag::O_WRONLY | OFlag::O_TRUNC,
        Mode::S_IRWXU,
    )?;
    dup2(fd, libc::STDOUT_FILENO)?;
    dup2(fd, libc::STDERR_FILENO)?;
    if fd > libc::STDERR_FILENO {
        close(fd)?;
    }
    Ok(())
}

fn terminate(code: i32) -> ! {
    // SAFETY: `_exit` skips atexit handlers and stdio flushing that belong to
    // the parent's state.
    unsafe { libc::_exit(code) }
}

/// Wait for each spawned child by its own pid.
fn wait_all(spawned: &[Spawned], sink: &mut dyn ErrorSink) -> Vec<ExitCode> {
    let mut codes = Vec::with_capacity(spawned.len());
    for child in spawned {
        match wait_for(child.pid) {
            Ok(status) => {
                let code = exit_code(status);
                debug!(index = child.index, pid = child.pid.as_raw(), code, "reaped child");
                codes.push(code);
            }
            Err(source) => sink.report(&ShellError::Wait {
                pid: child.pid.as_raw(),
                source,
            }),
        }
    }
    codes
}

/// `waitpid` until the child actually terminates, retrying on `EINTR`.
fn wait_for(pid: Pid) -> nix::Result<WaitStatus> {
    loop {
        match waitpid(pid, None) {
            Ok(status @ (WaitStatus::Exited(..) | WaitStatus::Signaled(..))) => return Ok(status),
            Ok(_) | Err(nix::Error::EINTR) => continue,
            Err(e) => return Err(e),
        }
    }
}

fn exit_code(status: WaitStatus) -> ExitCode {
    match status {
        WaitStatus::Exited(_, code) => code,
        WaitStatus::Signaled(_, signal, _) => 128 + signal as i32,
        _ => -1,
    }
}
