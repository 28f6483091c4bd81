//! Lexical predicates for turtle
//!
//! Pure character classifiers plus the `nom` scanners the parser uses to
//! consume runs of characters. Nothing here holds state: every scanner takes
//! the unconsumed input and returns the rest alongside what it matched.

use nom::{
    branch::alt,
    bytes::complete::{take_till, take_while, take_while1},
    character::complete::one_of,
    combinator::recognize,
    IResult,
};

pub const SINGLE_QUOTE: char = '\'';
pub const DOUBLE_QUOTE: char = '"';
pub const VAR_START: char = '$';
pub const COMMENT: char = '#';
pub const PIPE: char = '|';
pub const AMPERSAND: char = '&';
pub const SEPARATOR: char = ';';
pub const ASSIGN: char = '=';
pub const SUBST_OPEN: char = '(';
pub const SUBST_CLOSE: char = ')';
pub const PROC_SUBST_START: char = '<';
pub const ESCAPE: char = '\\';

/// Special variable names that are a single punctuation character
pub const SPECIAL_VARS: &str = "!?";

/// Characters that may appear in an unquoted literal run
pub fn is_literal_char(c: char) -> bool {
    !(is_blank(c)
        || c == '\n'
        || c == VAR_START
        || c == '`'
        || c == '<'
        || c == '>'
        || c == AMPERSAND
        || c == DOUBLE_QUOTE
        || c == SINGLE_QUOTE
        || c == PIPE
        || c == SEPARATOR)
}

pub fn is_var_name_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

/// Word separators within a command
pub fn is_blank(c: char) -> bool {
    c == ' ' || c == '\t'
}

/// Characters that end a command
pub fn is_terminator(c: char) -> bool {
    c == '\n' || c == SEPARATOR
}

/// A name that can be assigned with `name=value`
pub fn is_identifier(s: &str) -> bool {
    let mut chars = s.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => chars.all(is_var_name_char),
        _ => false,
    }
}

/// Could `c` start a word at command level?
pub fn starts_word(c: char) -> bool {
    is_literal_char(c)
        || c == SINGLE_QUOTE
        || c == DOUBLE_QUOTE
        || c == VAR_START
        || c == PROC_SUBST_START
}

/// Scan a run of literal characters. Inside a substitution `)` ends the run.
pub fn literal_run(input: &str, in_substitution: bool) -> IResult<&str, &str> {
    take_while1(move |c: char| is_literal_char(c) && !(in_substitution && c == SUBST_CLOSE))(input)
}

/// Scan a variable name after `$`: one special character or an identifier run
pub fn var_name(input: &str) -> IResult<&str, &str> {
    alt((recognize(one_of(SPECIAL_VARS)), take_while1(is_var_name_char)))(input)
}

/// Scan the body of a single-quoted string (everything up to the closing quote)
pub fn single_quoted_body(input: &str) -> IResult<&str, &str> {
    take_while(|c: char| c != SINGLE_QUOTE)(input)
}

/// Scan literal text inside double quotes, stopping at `"`, `$` or `\`
pub fn double_quoted_run(input: &str) -> IResult<&str, &str> {
    take_while1(|c: char| c != DOUBLE_QUOTE && c != VAR_START && c != ESCAPE)(input)
}

/// Scan up to (not including) the end of the current line
pub fn rest_of_line(input: &str) -> IResult<&str, &str> {
    take_till(|c: char| c == '\n')(input)
}

/// Scan the candidate token for an assignment: everything up to a blank or newline
pub fn assignment_candidate(input: &str) -> IResult<&str, &str> {
    take_till(|c: char| is_blank(c) || c == '\n')(input)
}
