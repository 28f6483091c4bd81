//! Executor for turtle
//!
//! Tree-walks a parsed [`Command`], spawning one OS process per simple
//! command and wiring them together for the control operators:
//! - `a | b` runs `a` with stdout on a pipe, then `b` reading from it
//! - `a && b` runs `b` only when `a` succeeds
//! - `a || b` runs `b` only when `a` fails
//!
//! Word expansion ([`Executor::expand_word`]) and execution are mutually
//! recursive: `$(...)` and `<(...)` run nested commands with the executor's
//! output temporarily redirected. A failing substitution aborts the whole
//! enclosing command through [`ExecError::Abort`].
//!
//! Stream overrides and the process group are only changed through a
//! [`Scope`], which puts the previous values back when it is dropped.

mod process;
mod source;
mod vars;
mod word;

pub use vars::{SavedBindings, Variables, LAST_PID_VAR, LAST_STATUS_VAR};

use crate::ast::{Command, CommandPart};
use log::debug;
use nix::unistd::Pid;
use std::collections::HashMap;
use std::fs::File;
use std::ops::{Deref, DerefMut};
use std::os::fd::OwnedFd;
use std::path::Path;
use std::rc::Rc;
use tempfile::TempPath;
use thiserror::Error;

/// Exit status of a command
pub type Status = i32;

pub const STATUS_SUCCESS: Status = 0;
pub const STATUS_FAILURE: Status = 1;
/// Usage and syntax errors
pub const STATUS_USAGE: Status = 2;
pub const STATUS_NOT_EXECUTABLE: Status = 126;
pub const STATUS_NOT_FOUND: Status = 127;
/// Added to the signal number for processes killed by a signal
pub const STATUS_SIGNAL_BASE: Status = 128;
/// Commands stopped between steps by Ctrl-C
pub const STATUS_INTERRUPTED: Status = STATUS_SIGNAL_BASE + 2;

#[derive(Error, Debug)]
pub enum ExecError {
    /// A substitution failed; the enclosing command stops with this status
    #[error("aborted with status {0}")]
    Abort(Status),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("internal error: {0}")]
    Internal(String),
}

/// Standard stream overrides. `None` inherits the shell's own stream.
#[derive(Debug, Clone, Default)]
pub(crate) struct Streams {
    pub(crate) stdin: Option<Rc<OwnedFd>>,
    pub(crate) stdout: Option<Rc<OwnedFd>>,
}

/// Arguments and per-command assignments gathered while walking a command
#[derive(Debug, Default)]
pub(crate) struct Invocation {
    pub(crate) argv: Vec<String>,
    pub(crate) overlay: HashMap<String, String>,
}

/// The executor holds shell state across commands
pub struct Executor {
    /// Shell-local variables
    pub(crate) vars: Variables,
    pub(crate) streams: Streams,
    /// Process group joined by every spawned child of the current pipeline
    pub(crate) pgid: Option<Pid>,
    pub(crate) last_pid: Option<u32>,
    pub(crate) last_status: Status,
    /// Process substitution files, kept until the top-level command finishes
    pub(crate) substitutions: Vec<(TempPath, File)>,
}

impl Default for Executor {
    fn default() -> Self {
        Self::new()
    }
}

impl Executor {
    pub fn new() -> Self {
        Executor {
            vars: Variables::new(),
            streams: Streams::default(),
            pgid: None,
            last_pid: None,
            last_status: STATUS_SUCCESS,
            substitutions: Vec::new(),
        }
    }

    /// Run a command and return its exit status.
    ///
    /// Errors never escape: an aborted substitution yields its status and any
    /// other failure is reported on stderr with status 1.
    pub fn exec(&mut self, cmd: &Command) -> Status {
        let result = self.try_exec(cmd);
        self.settle(result)
    }

    /// Run a command, returning the error detail instead of a status
    pub fn try_exec(&mut self, cmd: &Command) -> Result<Status, ExecError> {
        let result = self.run(cmd);
        if !self.substitutions.is_empty() {
            debug!("removing {} process substitution file(s)", self.substitutions.len());
            self.substitutions.clear();
        }
        result
    }

    /// Source a script with positional parameters, as `. path args...` does
    pub fn source_file(&mut self, path: impl AsRef<Path>, args: &[String]) -> Status {
        let mut argv = Vec::with_capacity(args.len() + 1);
        argv.push(path.as_ref().to_string_lossy().into_owned());
        argv.extend_from_slice(args);

        let status = self.builtin_source(&argv, HashMap::new());
        self.substitutions.clear();
        self.last_status = status;
        status
    }

    /// Look up a variable the way `$name` would
    pub fn var(&self, name: &str) -> Option<String> {
        self.lookup(name, &HashMap::new())
    }

    pub fn set_var(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.vars.set(name, value);
    }

    pub fn vars(&self) -> &Variables {
        &self.vars
    }

    /// Pid of the most recently spawned child
    pub fn last_pid(&self) -> Option<u32> {
        self.last_pid
    }

    pub fn last_status(&self) -> Status {
        self.last_status
    }

    /// Record a status for `$?` that no command produced, such as a syntax
    /// error
    pub fn set_last_status(&mut self, status: Status) {
        self.last_status = status;
    }

    /// Send the output of every following command to `fd`
    pub fn set_output(&mut self, fd: impl Into<OwnedFd>) {
        self.streams.stdout = Some(Rc::new(fd.into()));
    }

    /// Feed every following command from `fd`
    pub fn set_input(&mut self, fd: impl Into<OwnedFd>) {
        self.streams.stdin = Some(Rc::new(fd.into()));
    }

    /// Go back to inheriting the shell's own stdin and stdout
    pub fn reset_streams(&mut self) {
        self.streams = Streams::default();
    }

    /// Turn the outcome of a command into a status and record it as `$?`
    pub(crate) fn settle(&mut self, result: Result<Status, ExecError>) -> Status {
        match result {
            Ok(status) => status,
            Err(ExecError::Abort(status)) => {
                debug!("command aborted with status {}", status);
                self.last_status = status;
                status
            }
            Err(err) => {
                eprintln!("turtle: {}", err);
                self.last_status = STATUS_FAILURE;
                STATUS_FAILURE
            }
        }
    }

    /// Walk the parts of a command. Operators hand over to their right-hand
    /// side and end the walk.
    pub(crate) fn run(&mut self, cmd: &Command) -> Result<Status, ExecError> {
        if cmd.is_assignment_only() {
            for part in &cmd.parts {
                if let CommandPart::VarAssignment { name, value } = part {
                    let value = self.expand_word(value)?;
                    self.vars.set(name.as_str(), value);
                }
            }
            self.last_status = STATUS_SUCCESS;
            return Ok(STATUS_SUCCESS);
        }

        let mut invocation = Invocation::default();
        for part in &cmd.parts {
            match part {
                CommandPart::VarAssignment { name, value } => {
                    let value = self.expand_in(value, &invocation.overlay)?;
                    invocation.overlay.insert(name.clone(), value);
                }
                CommandPart::Word(word) => {
                    let arg = self.expand_in(word, &invocation.overlay)?;
                    invocation.argv.push(arg);
                }
                CommandPart::Pipe(right) => return self.run_pipe(invocation, right),
                CommandPart::And(right) => {
                    let status = self.invoke(invocation)?;
                    if status != STATUS_SUCCESS {
                        return Ok(status);
                    }
                    return self.run(right);
                }
                CommandPart::Or(right) => {
                    let status = self.invoke(invocation)?;
                    if status == STATUS_SUCCESS {
                        return Ok(status);
                    }
                    return self.run(right);
                }
            }
        }

        self.invoke(invocation)
    }
}

/// Saves the executor's streams and process group and restores them on drop
pub(crate) struct Scope<'a> {
    executor: &'a mut Executor,
    saved_streams: Streams,
    saved_pgid: Option<Pid>,
}

impl<'a> Scope<'a> {
    pub(crate) fn new(executor: &'a mut Executor) -> Self {
        let saved_streams = executor.streams.clone();
        let saved_pgid = executor.pgid;
        Scope {
            executor,
            saved_streams,
            saved_pgid,
        }
    }

    /// The stdout that was in effect when the scope was entered
    pub(crate) fn saved_stdout(&self) -> Option<Rc<OwnedFd>> {
        self.saved_streams.stdout.clone()
    }
}

impl Deref for Scope<'_> {
    type Target = Executor;

    fn deref(&self) -> &Executor {
        self.executor
    }
}

impl DerefMut for Scope<'_> {
    fn deref_mut(&mut self) -> &mut Executor {
        self.executor
    }
}

impl Drop for Scope<'_> {
    fn drop(&mut self) {
        self.executor.streams = std::mem::take(&mut self.saved_streams);
        self.executor.pgid = self.saved_pgid;
    }
}
