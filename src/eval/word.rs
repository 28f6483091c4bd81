//! Word expansion, including command and process substitution

use super::{ExecError, Executor, Scope, Status, STATUS_SUCCESS};
use crate::ast::{Command, StrPart, Word, WordPart};
use log::debug;
use std::collections::HashMap;
use std::fs::File;
use std::io::{self, Read};
use std::os::fd::OwnedFd;
use std::rc::Rc;
use std::thread;

/// Prefix of the temp files backing `<(...)`
const PROC_SUBST_PREFIX: &str = "turtle-proc-";

impl Executor {
    /// Expand a word to the string it stands for
    pub fn expand_word(&mut self, word: &Word) -> Result<String, ExecError> {
        self.expand_in(word, &HashMap::new())
    }

    /// Expand a word with a command's pending `name=value` assignments visible
    pub(crate) fn expand_in(
        &mut self,
        word: &Word,
        overlay: &HashMap<String, String>,
    ) -> Result<String, ExecError> {
        let mut out = String::new();

        for part in &word.parts {
            match part {
                WordPart::Literal(text) => out.push_str(text),
                WordPart::UnquotedString(parts) => {
                    for sub in parts {
                        match sub {
                            StrPart::Literal(text) => out.push_str(text),
                            StrPart::Var(name) => {
                                return Err(ExecError::Internal(format!(
                                    "variable '{}' inside a single-quoted string",
                                    name
                                )));
                            }
                        }
                    }
                }
                WordPart::QuotedString(parts) => {
                    for sub in parts {
                        match sub {
                            StrPart::Literal(text) => out.push_str(text),
                            StrPart::Var(name) => {
                                out.push_str(&self.lookup(name, overlay).unwrap_or_default())
                            }
                        }
                    }
                }
                WordPart::VarRef(name) => {
                    out.push_str(&self.lookup(name, overlay).unwrap_or_default())
                }
                WordPart::CommandSubstitution(cmd) => out.push_str(&self.capture_output(cmd)?),
                WordPart::ProcessSubstitution(cmd) => {
                    out.push_str(&self.process_substitution(cmd)?)
                }
            }
        }

        Ok(out)
    }

    /// `$(cmd)`: run `cmd` with stdout on a pipe and return what it wrote,
    /// minus one trailing newline
    fn capture_output(&mut self, cmd: &Command) -> Result<String, ExecError> {
        let (mut reader, writer) = io::pipe()?;

        // Drain concurrently so a large output cannot fill the pipe
        let drain = thread::spawn(move || -> io::Result<Vec<u8>> {
            let mut buf = Vec::new();
            reader.read_to_end(&mut buf)?;
            Ok(buf)
        });

        let result = {
            let mut scope = Scope::new(self);
            scope.streams.stdout = Some(Rc::new(OwnedFd::from(writer)));
            scope.run(cmd)
        };

        let mut bytes = drain
            .join()
            .map_err(|_| ExecError::Internal("command substitution reader panicked".into()))??;
        let status = abort_on_failure(result?)?;

        if bytes.last() == Some(&b'\n') {
            bytes.pop();
        }
        debug!("command substitution captured {} bytes (status {})", bytes.len(), status);
        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }

    /// `<(cmd)`: run `cmd` into a fresh temp file and return its path
    fn process_substitution(&mut self, cmd: &Command) -> Result<String, ExecError> {
        let (file, path) = tempfile::Builder::new()
            .prefix(PROC_SUBST_PREFIX)
            .tempfile()?
            .into_parts();

        let result = {
            let mut scope = Scope::new(self);
            scope.streams.stdout = Some(Rc::new(OwnedFd::from(file)));
            scope.run(cmd)
        };
        abort_on_failure(result?)?;

        let reader = File::open(&path)?;
        let display = path.to_string_lossy().into_owned();
        debug!("process substitution wrote {}", display);
        self.substitutions.push((path, reader));
        Ok(display)
    }
}

fn abort_on_failure(status: Status) -> Result<Status, ExecError> {
    if status == STATUS_SUCCESS {
        Ok(status)
    } else {
        Err(ExecError::Abort(status))
    }
}
