//! SQL statement tokenizer
//!
//! Splits the text of one migration file into executable statements. A `;`
//! ends a statement only in normal text; inside a quoted literal, a quoted
//! identifier, a dollar-quoted body or a comment it is ordinary content.
//!
//! The scanner is a single forward pass over the bytes of the input. Every
//! delimiter it reacts to is ASCII, so the byte offsets where it slices are
//! always char boundaries and multi-byte text passes through untouched.
//!
//! Dollar quotes follow a line-local rule: a `$` opens a dollar-quoted body
//! only if another `$` follows on the same line, and the text between the
//! two (inclusive) is the tag that closes it. A tag whose closing `$` sits on
//! the next line is therefore not recognized; files authored against that
//! rule rely on it, so it is kept as is.

use crate::model::Statement;

/// Lexical state of the scanner. Exactly one is active at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LexState<'a> {
    Normal,
    /// After `--`, up to and including the next newline
    LineComment,
    /// After `/*`, up to the first `*/`
    BlockComment,
    /// Inside `'...'`; `''` is an escaped quote
    SingleQuoted,
    /// Inside `"..."`; `""` is an escaped quote
    DoubleQuoted,
    /// Inside a dollar-quoted body, closed by the same tag (`$$`, `$fn$`)
    DollarQuoted { tag: &'a str },
}

/// Split raw migration text into statements, in source order.
///
/// Statements are trimmed and never whitespace-only. Text after the last
/// `;` is emitted as a final statement, so a missing trailing terminator is
/// tolerated. An unterminated quote or comment runs to the end of input.
pub fn tokenize(sql: &str) -> Vec<Statement> {
    let bytes = sql.as_bytes();
    let mut statements = Vec::new();
    let mut state = LexState::Normal;
    let mut start = 0;
    let mut pos = 0;

    while pos < bytes.len() {
        let current = bytes[pos];
        let next = bytes.get(pos + 1).copied();

        state = match state {
            LexState::Normal => match (current, next) {
                (b'-', Some(b'-')) => {
                    pos += 2;
                    LexState::LineComment
                }
                (b'/', Some(b'*')) => {
                    pos += 2;
                    LexState::BlockComment
                }
                (b'\'', _) => {
                    pos += 1;
                    LexState::SingleQuoted
                }
                (b'"', _) => {
                    pos += 1;
                    LexState::DoubleQuoted
                }
                (b'$', _) => match dollar_tag_at(sql, pos) {
                    Some(tag) => {
                        pos += tag.len();
                        LexState::DollarQuoted { tag }
                    }
                    None => {
                        pos += 1;
                        LexState::Normal
                    }
                },
                (b';', _) => {
                    push_statement(sql, start, pos, &mut statements);
                    pos += 1;
                    start = pos;
                    LexState::Normal
                }
                _ => {
                    pos += 1;
                    LexState::Normal
                }
            },

            LexState::LineComment => {
                pos += 1;
                if current == b'\n' {
                    LexState::Normal
                } else {
                    LexState::LineComment
                }
            }

            LexState::BlockComment => {
                if current == b'*' && next == Some(b'/') {
                    pos += 2;
                    LexState::Normal
                } else {
                    pos += 1;
                    LexState::BlockComment
                }
            }

            LexState::SingleQuoted => scan_quoted(b'\'', current, next, &mut pos, state),

            LexState::DoubleQuoted => scan_quoted(b'"', current, next, &mut pos, state),

            LexState::DollarQuoted { tag } => {
                if bytes[pos..].starts_with(tag.as_bytes()) {
                    pos += tag.len();
                    LexState::Normal
                } else {
                    pos += 1;
                    state
                }
            }
        };
    }

    push_statement(sql, start, bytes.len(), &mut statements);
    statements
}

/// Advance inside a quoted literal or identifier. A doubled quote is an
/// escape and keeps the state; a lone quote closes it.
fn scan_quoted<'a>(
    quote: u8,
    current: u8,
    next: Option<u8>,
    pos: &mut usize,
    state: LexState<'a>,
) -> LexState<'a> {
    if current != quote {
        *pos += 1;
        return state;
    }
    if next == Some(quote) {
        *pos += 2;
        return state;
    }
    *pos += 1;
    LexState::Normal
}

/// The dollar-quote tag opening at `pos`, if any.
///
/// `pos` must point at a `$`. The tag runs to the next `$` on the same line,
/// inclusive: `$$`, `$body$`.
fn dollar_tag_at(sql: &str, pos: usize) -> Option<&str> {
    let rest = &sql[pos + 1..];
    let line_end = rest.find('\n').unwrap_or(rest.len());
    let close = rest[..line_end].find('$')?;
    Some(&sql[pos..pos + close + 2])
}

fn push_statement(sql: &str, start: usize, end: usize, statements: &mut Vec<Statement>) {
    let raw = &sql[start..end];
    let text = raw.trim();
    if text.is_empty() {
        return;
    }
    let leading = raw.len() - raw.trim_start().len();
    let line = 1 + sql[..start + leading].matches('\n').count();
    statements.push(Statement {
        index: statements.len(),
        line,
        text: text.to_string(),
    });
}
