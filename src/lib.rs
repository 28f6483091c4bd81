//! turtle - a small shell
//!
//! # Overview
//!
//! turtle reads shell-like text one logical command at a time and runs it by
//! spawning and wiring together OS processes.
//!
//! ```text
//! echo hi | wc -c                  # pipe
//! make && ./run || echo failed     # conditional chains
//! X=5 printenv X                   # per-command environment
//! echo "v=$X" '$X'                 # double quotes expand, single quotes don't
//! echo $(date) ; diff <(ls a) <(ls b)
//! . ./script.tt arg1 arg2          # source a script in this shell
//! ```
//!
//! # Architecture
//!
//! - [`parser::Parser`] turns text into [`ast::Command`] trees. Each call to
//!   [`Parser::parse_next`] consumes one command (up to `;` or a newline).
//! - [`eval::Executor`] walks a command, expands its words and spawns the
//!   processes, returning the exit status.
//!
//! # Example
//!
//! ```rust,no_run
//! use turtle::{Executor, Parser};
//!
//! let mut parser = Parser::new("X=5; echo \"v=$X\"");
//! let mut executor = Executor::new();
//! while let Some(cmd) = parser.parse_next().unwrap() {
//!     executor.exec(&cmd);
//! }
//! ```

#[cfg(not(unix))]
compile_error!("turtle only runs on Unix-like systems");

pub mod ast;
pub mod config;
pub mod eval;
pub mod lexer;
pub mod logging;
pub mod parser;
pub mod signals;

// Re-export commonly used items
pub use ast::{Command, CommandPart, StrPart, Word, WordPart};
pub use config::Config;
pub use eval::{ExecError, Executor, Status, Variables};
pub use parser::{parse, ParseError, Parser};

/// Parse and run every command in `input`, returning the last status.
///
/// Commands run as they are parsed, so a syntax error stops the run after
/// the commands before it have executed.
pub fn run(executor: &mut Executor, input: &str) -> Result<Status, ParseError> {
    let mut parser = Parser::new(input);
    let mut status = eval::STATUS_SUCCESS;
    loop {
        let cmd = match parser.parse_next() {
            Ok(Some(cmd)) => cmd,
            Ok(None) => return Ok(status),
            Err(err) => {
                executor.set_last_status(eval::STATUS_USAGE);
                return Err(err);
            }
        };
        if cmd.is_empty() {
            continue;
        }
        status = executor.exec(&cmd);
    }
}
