//! The `.` builtin: run a script file in the current shell

use super::{Executor, Status, STATUS_FAILURE, STATUS_INTERRUPTED, STATUS_SUCCESS, STATUS_USAGE};
use crate::parser::Parser;
use crate::signals;
use log::{debug, warn};
use std::collections::HashMap;
use std::fs;

pub(crate) const SOURCE_BUILTIN: &str = ".";

impl Executor {
    /// `. path [args...]`
    ///
    /// `$0` is the path and `$1..$n` the remaining arguments while the script
    /// runs. Assignments prefixed to `.` are visible for the same duration.
    /// Commands are parsed one at a time as the script runs. Stops at the
    /// first command that fails, or at a syntax error, and returns its status.
    pub(crate) fn builtin_source(
        &mut self,
        args: &[String],
        overlay: HashMap<String, String>,
    ) -> Status {
        let Some((path, params)) = args.split_first() else {
            eprintln!("turtle: .: filename argument required");
            return STATUS_USAGE;
        };

        let text = match fs::read_to_string(path) {
            Ok(text) => text,
            Err(err) => {
                eprintln!("turtle: .: {}: {}", path, err);
                return STATUS_FAILURE;
            }
        };

        let mut bindings: Vec<(String, String)> = overlay.into_iter().collect();
        bindings.push(("0".to_string(), path.clone()));
        bindings.extend(
            params
                .iter()
                .enumerate()
                .map(|(i, arg)| ((i + 1).to_string(), arg.clone())),
        );

        debug!("sourcing {}", path);
        let saved = self.vars.bind(bindings);

        let mut parser = Parser::new(&text);
        let mut status = STATUS_SUCCESS;
        loop {
            if signals::take_interrupt() {
                warn!("{}: interrupted", path);
                status = STATUS_INTERRUPTED;
                break;
            }
            let cmd = match parser.parse_next() {
                Ok(Some(cmd)) if cmd.is_empty() => continue,
                Ok(Some(cmd)) => cmd,
                Ok(None) => break,
                Err(err) => {
                    eprintln!("turtle: {}: {}", path, err);
                    status = STATUS_USAGE;
                    break;
                }
            };
            let result = self.run(&cmd);
            status = self.settle(result);
            if status != STATUS_SUCCESS {
                debug!("{}: stopping at status {}", path, status);
                break;
            }
        }

        self.vars.restore(saved);
        status
    }
}
