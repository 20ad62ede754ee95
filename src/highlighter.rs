// ABOUTME: rustyline helper: syntax colors and multi-line form validation

use rustyline::completion::Completer;
use rustyline::highlight::{CmdKind, Highlighter};
use rustyline::hint::Hinter;
use rustyline::validate::{ValidationContext, ValidationResult, Validator};
use rustyline::Helper;
use std::borrow::Cow;

// 4-bit ANSI colors for maximum terminal compatibility
const COLOR_RESET: &str = "\x1b[0m";
const COLOR_PARENS: &str = "\x1b[1;34m";
const COLOR_SPECIAL_FORM: &str = "\x1b[1;35m";
const COLOR_NUMBER: &str = "\x1b[33m";
const COLOR_STRING: &str = "\x1b[32m";
const COLOR_COMMENT: &str = "\x1b[90m";

pub struct LispHelper;

impl LispHelper {
    pub fn new() -> Self {
        LispHelper
    }
}

impl Default for LispHelper {
    fn default() -> Self {
        Self::new()
    }
}

impl Helper for LispHelper {}

impl Completer for LispHelper {
    type Candidate = String;
}

impl Hinter for LispHelper {
    type Hint = String;
}

impl Validator for LispHelper {
    /// An unbalanced line keeps the editor open, so multi-line forms can
    /// be typed without any continuation prompt tricks.
    fn validate(&self, ctx: &mut ValidationContext) -> rustyline::Result<ValidationResult> {
        let (depth, in_string) = scan_balance(ctx.input());
        if depth > 0 || in_string {
            Ok(ValidationResult::Incomplete)
        } else {
            Ok(ValidationResult::Valid(None))
        }
    }
}

impl Highlighter for LispHelper {
    fn highlight<'l>(&self, line: &'l str, _pos: usize) -> Cow<'l, str> {
        let highlighted = highlight_line(line);
        if highlighted == line {
            Cow::Borrowed(line)
        } else {
            Cow::Owned(highlighted)
        }
    }

    fn highlight_char(&self, _line: &str, _pos: usize, _kind: CmdKind) -> bool {
        true
    }
}

/// Net bracket depth and whether the line ends inside a string, comments
/// and string escapes accounted for.
fn scan_balance(input: &str) -> (i32, bool) {
    let mut depth = 0;
    let mut in_string = false;
    let mut escaped = false;
    let mut in_comment = false;
    for c in input.chars() {
        if in_comment {
            if c == '\n' {
                in_comment = false;
            }
            continue;
        }
        if in_string {
            if escaped {
                escaped = false;
            } else if c == '\\' {
                escaped = true;
            } else if c == '"' {
                in_string = false;
            }
            continue;
        }
        match c {
            '"' => in_string = true,
            ';' => in_comment = true,
            '(' | '[' => depth += 1,
            ')' | ']' => depth -= 1,
            _ => {}
        }
    }
    (depth, in_string)
}

fn is_special_form(word: &str) -> bool {
    matches!(
        word,
        "define"
            | "lambda"
            | "defmacro"
            | "if"
            | "set!"
            | "quote"
            | "quasiquote"
            | "unquote"
            | "unquote-splicing"
            | "let"
            | "when"
            | "unless"
    )
}

fn is_delimiter(c: char) -> bool {
    c.is_whitespace() || matches!(c, '(' | ')' | '[' | ']' | '"' | ';')
}

fn highlight_line(line: &str) -> String {
    let chars: Vec<char> = line.chars().collect();
    let mut out = String::with_capacity(line.len());
    let mut i = 0;

    while i < chars.len() {
        match chars[i] {
            ';' => {
                out.push_str(COLOR_COMMENT);
                while i < chars.len() && chars[i] != '\n' {
                    out.push(chars[i]);
                    i += 1;
                }
                out.push_str(COLOR_RESET);
            }
            '"' => {
                out.push_str(COLOR_STRING);
                out.push('"');
                i += 1;
                while i < chars.len() {
                    if chars[i] == '\\' && i + 1 < chars.len() {
                        out.push(chars[i]);
                        out.push(chars[i + 1]);
                        i += 2;
                    } else if chars[i] == '"' {
                        out.push('"');
                        i += 1;
                        break;
                    } else {
                        out.push(chars[i]);
                        i += 1;
                    }
                }
                out.push_str(COLOR_RESET);
            }
            '(' | ')' | '[' | ']' => {
                out.push_str(COLOR_PARENS);
                out.push(chars[i]);
                out.push_str(COLOR_RESET);
                i += 1;
            }
            c if c.is_ascii_digit() => {
                let start = i;
                while i < chars.len() && !is_delimiter(chars[i]) {
                    i += 1;
                }
                out.push_str(COLOR_NUMBER);
                out.extend(&chars[start..i]);
                out.push_str(COLOR_RESET);
            }
            c if c.is_whitespace() => {
                out.push(c);
                i += 1;
            }
            _ => {
                let start = i;
                while i < chars.len() && !is_delimiter(chars[i]) {
                    i += 1;
                }
                let word: String = chars[start..i].iter().collect();
                if is_special_form(&word) {
                    out.push_str(COLOR_SPECIAL_FORM);
                    out.push_str(&word);
                    out.push_str(COLOR_RESET);
                } else {
                    out.push_str(&word);
                }
            }
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_balance_counts_brackets() {
        assert_eq!(scan_balance("(+ 1 2)"), (0, false));
        assert_eq!(scan_balance("(define (f x)"), (1, false));
        assert_eq!(scan_balance("[1 2"), (1, false));
        assert_eq!(scan_balance(")"), (-1, false));
    }

    #[test]
    fn test_balance_ignores_brackets_in_strings_and_comments() {
        assert_eq!(scan_balance("\"(((\""), (0, false));
        assert_eq!(scan_balance("; (((("), (0, false));
        assert_eq!(scan_balance("\"unterminated"), (0, true));
        assert_eq!(scan_balance("\"esc \\\" (\""), (0, false));
    }

    #[test]
    fn test_highlight_colors_special_forms() {
        let out = highlight_line("(define x 1)");
        assert!(out.contains(COLOR_SPECIAL_FORM));
        assert!(out.contains(COLOR_NUMBER));
        assert!(out.contains("define"));
    }

    #[test]
    fn test_highlight_plain_symbols_untouched() {
        assert_eq!(highlight_line("foo-bar"), "foo-bar");
    }
}
