//! AST for turtle
//!
//! A parsed line is a tree of [`Command`]s. A command is a flat list of
//! parts; control operators (`|`, `&&`, `||`) hold the rest of the line as a
//! nested command, so they are always the last part of the command that owns
//! them. Words are lists of parts that concatenate left to right.

/// A piece of a quoted string
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StrPart {
    /// Raw text
    Literal(String),
    /// `$name` inside double quotes
    Var(String),
}

/// One segment of a word
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WordPart {
    /// Unquoted text, no expansion
    Literal(String),
    /// `'...'`: literal parts only
    UnquotedString(Vec<StrPart>),
    /// `"..."`: literal and variable parts
    QuotedString(Vec<StrPart>),
    /// `$name`, `$!`, `$?`
    VarRef(String),
    /// `$(...)`
    CommandSubstitution(Command),
    /// `<(...)`
    ProcessSubstitution(Command),
}

/// A single shell token built from one or more parts
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Word {
    pub parts: Vec<WordPart>,
}

impl Word {
    pub fn new(parts: Vec<WordPart>) -> Self {
        Word { parts }
    }

    /// A word made of a single literal
    pub fn literal(text: impl Into<String>) -> Self {
        Word {
            parts: vec![WordPart::Literal(text.into())],
        }
    }

    pub fn is_empty(&self) -> bool {
        self.parts.is_empty()
    }

    pub fn push(&mut self, part: WordPart) {
        self.parts.push(part);
    }
}

/// One element of a command
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandPart {
    /// `name=value`
    VarAssignment { name: String, value: Word },
    /// Program name or argument
    Word(Word),
    /// `left | right`
    Pipe(Command),
    /// `left && right`
    And(Command),
    /// `left || right`
    Or(Command),
}

impl CommandPart {
    /// Does this part hand control to a right-hand command?
    pub fn is_operator(&self) -> bool {
        matches!(
            self,
            CommandPart::Pipe(_) | CommandPart::And(_) | CommandPart::Or(_)
        )
    }
}

/// An ordered list of assignments, words and at most one trailing operator
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Command {
    pub parts: Vec<CommandPart>,
}

impl Command {
    pub fn new(parts: Vec<CommandPart>) -> Self {
        Command { parts }
    }

    pub fn is_empty(&self) -> bool {
        self.parts.is_empty()
    }

    pub fn push(&mut self, part: CommandPart) {
        self.parts.push(part);
    }

    /// Consists solely of `name=value` parts (and at least one of them)
    pub fn is_assignment_only(&self) -> bool {
        !self.parts.is_empty()
            && self
                .parts
                .iter()
                .all(|p| matches!(p, CommandPart::VarAssignment { .. }))
    }

    /// The words of this command, not including those of any right-hand command
    pub fn words(&self) -> impl Iterator<Item = &Word> {
        self.parts.iter().filter_map(|p| match p {
            CommandPart::Word(w) => Some(w),
            _ => None,
        })
    }

    /// The trailing operator part, if any
    pub fn operator(&self) -> Option<&CommandPart> {
        self.parts.last().filter(|p| p.is_operator())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn assignment_only() {
        let cmd = Command::new(vec![
            CommandPart::VarAssignment {
                name: "A".into(),
                value: Word::literal("1"),
            },
            CommandPart::VarAssignment {
                name: "B".into(),
                value: Word::literal("2"),
            },
        ]);
        assert!(cmd.is_assignment_only());
        assert!(!Command::default().is_assignment_only());

        let mut with_word = cmd.clone();
        with_word.push(CommandPart::Word(Word::literal("env")));
        assert!(!with_word.is_assignment_only());
    }

    #[test]
    fn operator_is_last_part() {
        let right = Command::new(vec![CommandPart::Word(Word::literal("wc"))]);
        let cmd = Command::new(vec![
            CommandPart::Word(Word::literal("echo")),
            CommandPart::Pipe(right.clone()),
        ]);
        assert_eq!(cmd.operator(), Some(&CommandPart::Pipe(right)));
        assert_eq!(cmd.words().count(), 1);
    }
}
