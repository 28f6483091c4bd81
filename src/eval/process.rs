use super::source::SOURCE_BUILTIN;
use super::{
    ExecError, Executor, Invocation, Scope, Status, STATUS_FAILURE, STATUS_NOT_EXECUTABLE,
    STATUS_NOT_FOUND, STATUS_SIGNAL_BASE, STATUS_SUCCESS,
};
use crate::ast::Command;
use log::{debug, trace};
use nix::unistd::{getpgrp, getpid, setpgid, Pid};
use std::collections::HashMap;
use std::io;
use std::os::fd::OwnedFd;
use std::os::unix::process::{CommandExt, ExitStatusExt};
use std::process::{self, ExitStatus, Stdio};
use std::rc::Rc;

impl Executor {
    /// Run the simple command gathered so far.
    ///
    /// With no words the command was only `name=value` parts: they are kept
    /// as shell variables.
    pub(crate) fn invoke(&mut self, invocation: Invocation) -> Result<Status, ExecError> {
        let Invocation { argv, overlay } = invocation;

        let Some((term, args)) = argv.split_first() else {
            if !overlay.is_empty() {
                for (name, value) in overlay {
                    self.vars.set(name, value);
                }
                self.last_status = STATUS_SUCCESS;
            }
            return Ok(STATUS_SUCCESS);
        };

        let status = if term == SOURCE_BUILTIN {
            self.builtin_source(args, overlay)
        } else {
            self.spawn(term, args, &overlay)?
        };
        self.last_status = status;
        Ok(status)
    }

    /// Fork and exec `term` with the current streams and process group, then
    /// wait for it
    fn spawn(
        &mut self,
        term: &str,
        args: &[String],
        overlay: &HashMap<String, String>,
    ) -> Result<Status, ExecError> {
        let mut command = process::Command::new(term);
        command.args(args).envs(overlay);

        if let Some(fd) = &self.streams.stdin {
            command.stdin(Stdio::from(fd.try_clone()?));
        }
        if let Some(fd) = &self.streams.stdout {
            command.stdout(Stdio::from(fd.try_clone()?));
        }
        if let Some(pgid) = self.pgid {
            // SAFETY: setpgid is async-signal-safe and touches no parent state
            unsafe {
                command.pre_exec(move || {
                    let _ = setpgid(Pid::from_raw(0), pgid);
                    Ok(())
                });
            }
        }

        let mut child = match command.spawn() {
            Ok(child) => child,
            Err(err) => return Ok(spawn_failure(term, &err)),
        };
        // Drop the parent's copies of the stream fds so pipe readers see EOF
        drop(command);

        let pid = child.id();
        self.last_pid = Some(pid);
        debug!("spawned {} (pid {})", term, pid);

        let status = exit_code(child.wait()?);
        debug!("{} (pid {}) exited with {}", term, pid, status);
        Ok(status)
    }

    /// `left | right`: `left` runs to completion writing into a pipe, then
    /// `right` runs reading from it
    pub(crate) fn run_pipe(
        &mut self,
        left: Invocation,
        right: &Command,
    ) -> Result<Status, ExecError> {
        let (reader, writer) = io::pipe()?;

        let mut scope = Scope::new(self);
        if scope.pgid.is_none() {
            scope.pgid = Some(pipeline_pgid());
        }

        scope.streams.stdout = Some(Rc::new(OwnedFd::from(writer)));
        let status = scope.invoke(left)?;
        if status != STATUS_SUCCESS {
            trace!("pipeline stopped: left side exited with {}", status);
            return Ok(status);
        }

        // Replacing the override closes the last handle on the write end
        scope.streams.stdout = scope.saved_stdout();
        scope.streams.stdin = Some(Rc::new(OwnedFd::from(reader)));
        trace!("pipeline: running right side");
        scope.run(right)
    }
}

/// Process group for a new pipeline: the shell's pid. Children cannot join
/// it unless the shell leads its own group, and they cannot log the failure.
pub(crate) fn pipeline_pgid() -> Pid {
    let shell = getpid();
    if getpgrp() != shell {
        debug!(
            "shell (pid {}) is not a process group leader; pipeline children keep their group",
            shell
        );
    }
    shell
}

/// Report a failed exec and pick its status
fn spawn_failure(term: &str, err: &io::Error) -> Status {
    if err.kind() == io::ErrorKind::NotFound {
        eprintln!("turtle: {}: command not found", term);
        STATUS_NOT_FOUND
    } else {
        eprintln!("turtle: {}: {}", term, err);
        STATUS_NOT_EXECUTABLE
    }
}

/// Exit code of a finished child, `128 + signal` if it was killed
pub(crate) fn exit_code(status: ExitStatus) -> Status {
    status
        .code()
        .or_else(|| status.signal().map(|sig| STATUS_SIGNAL_BASE + sig))
        .unwrap_or(STATUS_FAILURE)
}
