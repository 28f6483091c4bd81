use super::Executor;
use std::collections::HashMap;
use std::env;

/// Name of the variable holding the pid of the last spawned child
pub const LAST_PID_VAR: &str = "!";
/// Name of the variable holding the last exit status
pub const LAST_STATUS_VAR: &str = "?";

/// Shell-local variable table.
///
/// Values live only in the shell. They are not exported to children; only a
/// command's own `name=value` prefixes reach its environment.
#[derive(Debug, Clone, Default)]
pub struct Variables {
    table: HashMap<String, String>,
}

/// Previous values returned by [`Variables::bind`]
pub type SavedBindings = Vec<(String, Option<String>)>;

impl Variables {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.table.get(name).map(String::as_str)
    }

    pub fn set(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.table.insert(name.into(), value.into());
    }

    pub fn unset(&mut self, name: &str) -> Option<String> {
        self.table.remove(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.table.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.table.len()
    }

    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.table.keys().map(String::as_str)
    }

    /// Set every binding and return what each one replaced, for
    /// [`Variables::restore`]
    pub fn bind<I>(&mut self, bindings: I) -> SavedBindings
    where
        I: IntoIterator<Item = (String, String)>,
    {
        bindings
            .into_iter()
            .map(|(name, value)| {
                let previous = self.table.insert(name.clone(), value);
                (name, previous)
            })
            .collect()
    }

    /// Undo a [`Variables::bind`]. Applied in reverse so a name bound twice
    /// ends up with its original value.
    pub fn restore(&mut self, saved: SavedBindings) {
        for (name, previous) in saved.into_iter().rev() {
            match previous {
                Some(value) => {
                    self.table.insert(name, value);
                }
                None => {
                    self.table.remove(&name);
                }
            }
        }
    }
}

impl Executor {
    /// Resolve a variable: special names, then the command's own
    /// assignments, then shell variables, then the process environment
    pub(crate) fn lookup(&self, name: &str, overlay: &HashMap<String, String>) -> Option<String> {
        match name {
            LAST_PID_VAR => return self.last_pid.map(|pid| pid.to_string()),
            LAST_STATUS_VAR => return Some(self.last_status.to_string()),
            _ => {}
        }

        overlay
            .get(name)
            .cloned()
            .or_else(|| self.vars.get(name).map(str::to_string))
            .or_else(|| env::var_os(name).map(|v| v.to_string_lossy().into_owned()))
    }
}
