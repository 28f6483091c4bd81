//! Parser for turtle
//!
//! A cursor-based recursive-descent reader over an immutable input buffer.
//! Each call to [`Parser::parse_next`] consumes one logical command (up to a
//! newline, `;`, or the end of input) and leaves the cursor at the start of
//! the next one. Substitutions and the right-hand side of control operators
//! are parsed by re-entering the command parser on the same cursor.

use crate::ast::{Command, CommandPart, StrPart, Word, WordPart};
use crate::lexer::{
    self, AMPERSAND, COMMENT, DOUBLE_QUOTE, ESCAPE, PIPE, PROC_SUBST_START, SINGLE_QUOTE,
    SUBST_CLOSE, SUBST_OPEN, VAR_START,
};
use log::trace;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("unexpected character '{ch}' at offset {pos}")]
    UnexpectedChar { ch: char, pos: usize },
    #[error("background processes are not supported (offset {pos})")]
    BackgroundNotSupported { pos: usize },
    #[error("unterminated {quote} quote starting at offset {pos}")]
    UnterminatedQuote { quote: char, pos: usize },
    #[error("unterminated substitution starting at offset {pos}")]
    UnterminatedSubstitution { pos: usize },
    #[error("missing command around '{operator}' at offset {pos}")]
    MissingCommand { operator: &'static str, pos: usize },
}

impl ParseError {
    /// Byte offset into the parsed buffer where the error was detected
    pub fn position(&self) -> usize {
        match self {
            ParseError::UnexpectedChar { pos, .. }
            | ParseError::BackgroundNotSupported { pos }
            | ParseError::UnterminatedQuote { pos, .. }
            | ParseError::UnterminatedSubstitution { pos }
            | ParseError::MissingCommand { pos, .. } => *pos,
        }
    }
}

/// What ended the most recent command parse
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Terminator {
    End,
    Separator(char),
    Close,
}

/// Parser state
pub struct Parser<'a> {
    input: &'a str,
    pos: usize,
    /// Inside `$(...)` or `<(...)`: `)` ends the command
    in_substitution: bool,
    terminator: Terminator,
}

impl<'a> Parser<'a> {
    pub fn new(input: &'a str) -> Self {
        Parser {
            input,
            pos: 0,
            in_substitution: false,
            terminator: Terminator::End,
        }
    }

    /// Byte offset of the cursor
    pub fn position(&self) -> usize {
        self.pos
    }

    /// The input not consumed yet
    pub fn remainder(&self) -> &'a str {
        &self.input[self.pos..]
    }

    pub fn is_at_end(&self) -> bool {
        self.pos >= self.input.len()
    }

    /// Parse the next logical command, or `None` once the input is exhausted.
    ///
    /// On error the cursor is moved past the offending line so the caller can
    /// keep going with whatever follows it.
    pub fn parse_next(&mut self) -> Result<Option<Command>, ParseError> {
        if self.is_at_end() {
            return Ok(None);
        }

        self.in_substitution = false;
        match self.parse_command() {
            Ok(cmd) => {
                trace!("parsed command: {:?}", cmd);
                Ok(Some(cmd))
            }
            Err(err) => {
                self.skip_line();
                Err(err)
            }
        }
    }

    fn peek(&self) -> Option<char> {
        self.remainder().chars().next()
    }

    fn peek_second(&self) -> Option<char> {
        self.remainder().chars().nth(1)
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8();
        Some(c)
    }

    fn advance(&mut self, bytes: usize) {
        self.pos = (self.pos + bytes).min(self.input.len());
    }

    fn skip_blanks(&mut self) {
        while matches!(self.peek(), Some(c) if lexer::is_blank(c)) {
            self.bump();
        }
    }

    /// Discard everything up to (not including) the end of the line
    fn skip_comment(&mut self) {
        let len = lexer::rest_of_line(self.remainder()).map_or(0, |(_, text)| text.len());
        self.advance(len);
    }

    fn skip_line(&mut self) {
        self.skip_comment();
        if self.peek() == Some('\n') {
            self.bump();
        }
    }

    /// Parse one command. Stops after its terminator, or right after a
    /// control operator whose right-hand side has been parsed.
    fn parse_command(&mut self) -> Result<Command, ParseError> {
        let mut cmd = Command::default();
        let mut can_assign = true;

        loop {
            self.skip_blanks();
            let Some(c) = self.peek() else {
                self.terminator = Terminator::End;
                return Ok(cmd);
            };

            match c {
                COMMENT => self.skip_comment(),
                c if lexer::is_terminator(c) => {
                    self.bump();
                    self.terminator = Terminator::Separator(c);
                    return Ok(cmd);
                }
                SUBST_CLOSE if self.in_substitution => {
                    self.bump();
                    self.terminator = Terminator::Close;
                    return Ok(cmd);
                }
                AMPERSAND => {
                    let pos = self.pos;
                    if self.peek_second() != Some(AMPERSAND) {
                        return Err(ParseError::BackgroundNotSupported { pos });
                    }
                    self.advance(2);
                    let right = self.parse_operand(&cmd, "&&", pos)?;
                    cmd.push(CommandPart::And(right));
                    return Ok(cmd);
                }
                PIPE => {
                    let pos = self.pos;
                    if self.peek_second() == Some(PIPE) {
                        self.advance(2);
                        let right = self.parse_operand(&cmd, "||", pos)?;
                        cmd.push(CommandPart::Or(right));
                    } else {
                        self.advance(1);
                        let right = self.parse_operand(&cmd, "|", pos)?;
                        cmd.push(CommandPart::Pipe(right));
                    }
                    return Ok(cmd);
                }
                c if can_assign && lexer::is_literal_char(c) => match self.parse_assignment()? {
                    Some(assignment) => cmd.push(assignment),
                    None => {
                        can_assign = false;
                        let word = self.parse_word()?;
                        cmd.push(CommandPart::Word(word));
                    }
                },
                c if lexer::starts_word(c) => {
                    can_assign = false;
                    let word = self.parse_word()?;
                    cmd.push(CommandPart::Word(word));
                }
                ch => return Err(ParseError::UnexpectedChar { ch, pos: self.pos }),
            }
        }
    }

    /// Parse the command to the right of an operator
    fn parse_operand(
        &mut self,
        left: &Command,
        operator: &'static str,
        pos: usize,
    ) -> Result<Command, ParseError> {
        if left.is_empty() {
            return Err(ParseError::MissingCommand { operator, pos });
        }
        let right = self.parse_command()?;
        if right.is_empty() {
            return Err(ParseError::MissingCommand { operator, pos });
        }
        Ok(right)
    }

    /// Try to read `name=value`. The candidate token runs to the next blank
    /// or newline; it is an assignment when the text before its first `=` is
    /// an identifier.
    fn parse_assignment(&mut self) -> Result<Option<CommandPart>, ParseError> {
        let Ok((_, candidate)) = lexer::assignment_candidate(self.remainder()) else {
            return Ok(None);
        };
        let Some(eq) = candidate.find(lexer::ASSIGN) else {
            return Ok(None);
        };
        let name = &candidate[..eq];
        if !lexer::is_identifier(name) {
            return Ok(None);
        }

        let name = name.to_string();
        self.advance(eq + 1);
        let value = self.parse_word()?;
        Ok(Some(CommandPart::VarAssignment { name, value }))
    }

    fn parse_word(&mut self) -> Result<Word, ParseError> {
        let mut word = Word::default();

        while let Some(c) = self.peek() {
            match c {
                c if lexer::is_blank(c) || lexer::is_terminator(c) => break,
                PIPE | AMPERSAND => break,
                SUBST_CLOSE if self.in_substitution => break,
                VAR_START if self.peek_second() == Some(SUBST_OPEN) => {
                    let cmd = self.parse_substitution()?;
                    word.push(WordPart::CommandSubstitution(cmd));
                }
                PROC_SUBST_START if self.peek_second() == Some(SUBST_OPEN) => {
                    let cmd = self.parse_substitution()?;
                    word.push(WordPart::ProcessSubstitution(cmd));
                }
                SINGLE_QUOTE => word.push(self.parse_single_quoted()?),
                DOUBLE_QUOTE => word.push(self.parse_double_quoted()?),
                VAR_START => word.push(self.parse_var()),
                c if lexer::is_literal_char(c) => word.push(self.parse_literal(c)?),
                ch => return Err(ParseError::UnexpectedChar { ch, pos: self.pos }),
            }
        }

        Ok(word)
    }

    fn parse_literal(&mut self, first: char) -> Result<WordPart, ParseError> {
        let pos = self.pos;
        let (_, text) = lexer::literal_run(self.remainder(), self.in_substitution)
            .map_err(|_| ParseError::UnexpectedChar { ch: first, pos })?;
        self.advance(text.len());
        Ok(WordPart::Literal(text.to_string()))
    }

    /// `$name`, `$!`, `$?`; a `$` not followed by a name is literal
    fn parse_var(&mut self) -> WordPart {
        self.bump();
        match lexer::var_name(self.remainder()) {
            Ok((_, name)) => {
                self.advance(name.len());
                WordPart::VarRef(name.to_string())
            }
            Err(_) => WordPart::Literal(VAR_START.to_string()),
        }
    }

    fn parse_single_quoted(&mut self) -> Result<WordPart, ParseError> {
        let start = self.pos;
        self.bump();

        let unterminated = ParseError::UnterminatedQuote {
            quote: SINGLE_QUOTE,
            pos: start,
        };
        let (rest, body) = lexer::single_quoted_body(self.remainder()).map_err(|_| unterminated.clone())?;
        if rest.is_empty() {
            return Err(unterminated);
        }

        self.advance(body.len() + SINGLE_QUOTE.len_utf8());
        Ok(WordPart::UnquotedString(vec![StrPart::Literal(body.to_string())]))
    }

    fn parse_double_quoted(&mut self) -> Result<WordPart, ParseError> {
        let start = self.pos;
        self.bump();

        let mut parts = Vec::new();
        let mut text = String::new();

        loop {
            let Some(c) = self.peek() else {
                return Err(ParseError::UnterminatedQuote {
                    quote: DOUBLE_QUOTE,
                    pos: start,
                });
            };

            match c {
                DOUBLE_QUOTE => {
                    self.bump();
                    break;
                }
                ESCAPE => {
                    self.bump();
                    match self.peek() {
                        Some(escaped @ (DOUBLE_QUOTE | ESCAPE | VAR_START)) => {
                            self.bump();
                            text.push(escaped);
                        }
                        _ => text.push(ESCAPE),
                    }
                }
                VAR_START => {
                    self.bump();
                    match lexer::var_name(self.remainder()) {
                        Ok((_, name)) => {
                            self.advance(name.len());
                            if !text.is_empty() {
                                parts.push(StrPart::Literal(std::mem::take(&mut text)));
                            }
                            parts.push(StrPart::Var(name.to_string()));
                        }
                        Err(_) => text.push(VAR_START),
                    }
                }
                _ => {
                    let run = lexer::double_quoted_run(self.remainder()).map_or("", |(_, run)| run);
                    self.advance(run.len());
                    text.push_str(run);
                }
            }
        }

        if !text.is_empty() {
            parts.push(StrPart::Literal(text));
        }
        Ok(WordPart::QuotedString(parts))
    }

    /// Parse `$(...)` or `<(...)` through the matching `)`
    fn parse_substitution(&mut self) -> Result<Command, ParseError> {
        let start = self.pos;
        self.advance(2);

        let was_in_substitution = std::mem::replace(&mut self.in_substitution, true);
        let result = self.parse_command();
        self.in_substitution = was_in_substitution;
        let cmd = result?;

        match self.terminator {
            Terminator::Close => Ok(cmd),
            Terminator::Separator(ch) => Err(ParseError::UnexpectedChar {
                ch,
                pos: self.pos - ch.len_utf8(),
            }),
            Terminator::End => Err(ParseError::UnterminatedSubstitution { pos: start }),
        }
    }
}

/// Parse every command in `input`
pub fn parse(input: &str) -> Result<Vec<Command>, ParseError> {
    let mut parser = Parser::new(input);
    let mut commands = Vec::new();
    while let Some(cmd) = parser.parse_next()? {
        commands.push(cmd);
    }
    Ok(commands)
}
