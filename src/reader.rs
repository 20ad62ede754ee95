// ABOUTME: The S-expression reader: turns a character source into Value trees

use crate::error::LispError;
use crate::source::{CharSource, StrSource, END};
use crate::value::Value;
use std::sync::Arc;

/// A reader with one code point of lookahead over a character source.
/// `read_form` yields one top-level form at a time; a source that drains
/// at a form boundary ends the stream cleanly.
pub struct Reader<S: CharSource> {
    src: S,
    ch: char,
}

/// Reads every top-level form of `input`.
pub fn read_str(input: &str) -> Result<Vec<Value>, LispError> {
    let mut reader = Reader::new(StrSource::new(input));
    let mut forms = Vec::new();
    while let Some(form) = reader.read_form()? {
        forms.push(form);
    }
    Ok(forms)
}

impl<S: CharSource> Reader<S> {
    pub fn new(src: S) -> Self {
        let mut reader = Reader { src, ch: END };
        reader.advance();
        reader
    }

    /// Consumes and returns the current code point, pulling in the next.
    fn advance(&mut self) -> char {
        let current = self.ch;
        self.ch = if self.src.has_next() {
            self.src.next()
        } else {
            END
        };
        current
    }

    fn take(&mut self, expected: char) -> bool {
        if self.ch == expected {
            self.advance();
            true
        } else {
            false
        }
    }

    fn expect(&mut self, expected: char) -> Result<(), LispError> {
        if self.take(expected) {
            Ok(())
        } else {
            Err(self.error(&format!("expected '{}', found '{}'", expected, self.ch)))
        }
    }

    fn between(&self, lo: char, hi: char) -> bool {
        lo <= self.ch && self.ch <= hi
    }

    fn error(&self, msg: &str) -> LispError {
        self.src.error(msg)
    }

    /// Whitespace and `;` comments are interchangeable.
    fn skip_blank(&mut self) {
        loop {
            match self.ch {
                ' ' | '\t' | '\n' | '\r' => {
                    self.advance();
                }
                ';' => {
                    while self.ch != '\n' && self.ch != END {
                        self.advance();
                    }
                }
                _ => break,
            }
        }
    }

    /// Reads one top-level form; `None` when the source drained cleanly at
    /// a form boundary.
    pub fn read_form(&mut self) -> Result<Option<Value>, LispError> {
        self.skip_blank();
        if self.ch == END {
            return Ok(None);
        }
        self.parse_value().map(Some)
    }

    fn parse_element(&mut self) -> Result<Value, LispError> {
        self.skip_blank();
        self.parse_value()
    }

    fn parse_value(&mut self) -> Result<Value, LispError> {
        match self.ch {
            '(' => {
                self.advance();
                self.parse_list(')')
            }
            '[' => {
                self.advance();
                self.parse_list(']')
            }
            '"' => {
                self.advance();
                self.parse_string()
            }
            ':' => {
                self.advance();
                self.parse_keyword()
            }
            '\'' => {
                self.advance();
                Ok(Value::Quoted(Arc::new(self.parse_element()?)))
            }
            '`' => {
                self.advance();
                Ok(Value::Quasiquoted(Arc::new(self.parse_element()?)))
            }
            ',' => {
                self.advance();
                if self.take('@') {
                    Ok(Value::Spliced(Arc::new(self.parse_element()?)))
                } else {
                    Ok(Value::Unquoted(Arc::new(self.parse_element()?)))
                }
            }
            ')' | ']' => {
                self.advance();
                Err(self.error("unopened braces"))
            }
            END => Err(self.error("unexpected end of input")),
            _ => self.parse_atom(),
        }
    }

    fn parse_list(&mut self, end: char) -> Result<Value, LispError> {
        let mut items = Vec::new();
        loop {
            self.skip_blank();
            if self.take(end) {
                return Ok(Value::list(items));
            }
            if self.take('.') {
                // after the dot: exactly one form, then the closing bracket
                let tail = self.parse_element()?;
                self.skip_blank();
                self.expect(end)?;
                return Ok(Value::dotted(items, tail));
            }
            if self.ch == END {
                return Err(self.error("unexpected end of input"));
            }
            items.push(self.parse_value()?);
        }
    }

    fn ident_char(c: char) -> bool {
        c.is_ascii_alphabetic()
            || matches!(
                c,
                '!' | '?' | '+' | '-' | '*' | '/' | '_' | '<' | '>' | '=' | '#'
            )
    }

    fn parse_ident(&mut self) -> String {
        let mut ident = String::new();
        if Self::ident_char(self.ch) {
            ident.push(self.advance());
        }
        self.finish_ident(&mut ident);
        ident
    }

    fn finish_ident(&mut self, ident: &mut String) {
        while Self::ident_char(self.ch) || self.between('0', '9') {
            ident.push(self.advance());
        }
    }

    fn parse_keyword(&mut self) -> Result<Value, LispError> {
        let ident = self.parse_ident();
        if ident.is_empty() {
            self.advance();
            return Err(self.error("invalid keyword"));
        }
        Ok(Value::Keyword(ident))
    }

    fn parse_atom(&mut self) -> Result<Value, LispError> {
        if self.between('0', '9') {
            return self.parse_number(false);
        }
        if self.ch == '-' {
            // minus is an identifier letter unless a digit follows
            self.advance();
            if self.between('0', '9') {
                return self.parse_number(true);
            }
            let mut ident = String::from("-");
            self.finish_ident(&mut ident);
            return Ok(Value::Symbol(ident));
        }

        let ident = self.parse_ident();
        if ident.is_empty() {
            let bad = self.advance();
            return Err(self.error(&format!("unexpected character '{}'", bad)));
        }
        if ident.starts_with('#') {
            return match ident.as_str() {
                "#t" => Ok(Value::Bool(true)),
                "#f" => Ok(Value::Bool(false)),
                "#nil" => Ok(Value::Nil),
                _ => Err(self.error(&format!("unknown special '{}'", ident))),
            };
        }
        Ok(Value::Symbol(ident))
    }

    fn parse_number(&mut self, negative: bool) -> Result<Value, LispError> {
        let mut text = String::new();
        if negative {
            text.push('-');
        }

        // integer part: 0 | [1-9] digit*
        if self.take('0') {
            text.push('0');
        } else if self.between('1', '9') {
            while self.between('0', '9') {
                text.push(self.advance());
            }
        } else {
            return Err(self.error("invalid number"));
        }

        if self.take('.') {
            text.push('.');
            while self.between('0', '9') {
                text.push(self.advance());
            }
        }

        if self.ch == 'e' || self.ch == 'E' {
            self.advance();
            text.push('e');
            if self.take('+') {
                // positive exponent, sign implied
            } else if self.take('-') {
                text.push('-');
            }
            if !self.between('0', '9') {
                return Err(self.error("invalid number"));
            }
            while self.between('0', '9') {
                text.push(self.advance());
            }
        }

        match text.parse::<f64>() {
            Ok(n) => Ok(Value::Number(n)),
            Err(e) => Err(self.error(&format!("invalid number: {}", e))),
        }
    }

    fn parse_string(&mut self) -> Result<Value, LispError> {
        let mut out = String::new();
        loop {
            if self.take('"') {
                return Ok(Value::Str(out));
            }
            if self.ch == END {
                return Err(self.error("string unterminated"));
            }
            if self.take('\\') {
                let esc = self.advance();
                self.push_escape(esc, &mut out)?;
            } else {
                out.push(self.advance());
            }
        }
    }

    fn push_escape(&mut self, esc: char, out: &mut String) -> Result<(), LispError> {
        match esc {
            '"' => out.push('"'),
            '\\' => out.push('\\'),
            '/' => out.push('/'),
            'b' => out.push('\u{8}'),
            'f' => out.push('\u{c}'),
            'n' => out.push('\n'),
            'r' => out.push('\r'),
            't' => out.push('\t'),
            'u' => self.push_unicode_escape(out)?,
            END => return Err(self.error("string unterminated")),
            other => {
                return Err(self.error(&format!("unknown escape character \\{}", other)));
            }
        }
        Ok(())
    }

    // \uXXXX carries a UTF-16 code unit; a high surrogate pairs with an
    // immediately following \uXXXX low surrogate, lone halves become U+FFFD.
    fn push_unicode_escape(&mut self, out: &mut String) -> Result<(), LispError> {
        let unit = self.parse_hex4()?;
        if let Some(c) = char::from_u32(unit) {
            out.push(c);
            return Ok(());
        }
        if (0xD800..0xDC00).contains(&unit) && self.take('\\') {
            let esc = self.advance();
            if esc == 'u' {
                let low = self.parse_hex4()?;
                if (0xDC00..0xE000).contains(&low) {
                    let scalar = 0x10000 + ((unit - 0xD800) << 10) + (low - 0xDC00);
                    out.push(char::from_u32(scalar).unwrap_or(char::REPLACEMENT_CHARACTER));
                } else {
                    out.push(char::REPLACEMENT_CHARACTER);
                    out.push(char::from_u32(low).unwrap_or(char::REPLACEMENT_CHARACTER));
                }
                return Ok(());
            }
            out.push(char::REPLACEMENT_CHARACTER);
            return self.push_escape(esc, out);
        }
        out.push(char::REPLACEMENT_CHARACTER);
        Ok(())
    }

    fn parse_hex4(&mut self) -> Result<u32, LispError> {
        let mut value = 0u32;
        for _ in 0..4 {
            let digit = match self.ch {
                '0'..='9' => self.ch as u32 - '0' as u32,
                'a'..='f' => self.ch as u32 - 'a' as u32 + 10,
                'A'..='F' => self.ch as u32 - 'A' as u32 + 10,
                _ => return Err(self.error("expected hex digit")),
            };
            self.advance();
            value = (value << 4) | digit;
        }
        Ok(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn read1(input: &str) -> Value {
        let mut forms = read_str(input).expect("parses");
        assert_eq!(forms.len(), 1, "expected one form in {:?}", input);
        forms.remove(0)
    }

    fn syntax_msg(input: &str) -> String {
        match read_str(input) {
            Err(LispError::Syntax { msg, .. }) => msg,
            other => panic!("expected syntax error for {:?}, got {:?}", input, other),
        }
    }

    #[test]
    fn test_parse_numbers() {
        assert_eq!(read1("42"), Value::Number(42.0));
        assert_eq!(read1("-42"), Value::Number(-42.0));
        assert_eq!(read1("0"), Value::Number(0.0));
        assert_eq!(read1("2.5"), Value::Number(2.5));
        assert_eq!(read1("-2.5"), Value::Number(-2.5));
        assert_eq!(read1("1e3"), Value::Number(1000.0));
        assert_eq!(read1("25e-1"), Value::Number(2.5));
        assert_eq!(read1("1E+2"), Value::Number(100.0));
    }

    #[test]
    fn test_invalid_number() {
        assert!(syntax_msg("1e").contains("invalid number"));
        assert!(syntax_msg("(+ 1eQ 2)").contains("invalid number"));
    }

    #[test]
    fn test_parse_symbols() {
        for sym in ["x", "foo", "foo-bar", "foo_bar", "map-1", "null?", "set!"] {
            assert_eq!(read1(sym), Value::symbol(sym));
        }
        for op in ["+", "-", "*", "/", "<", ">", "=", ">=", "<="] {
            assert_eq!(read1(op), Value::symbol(op));
        }
        // minus starts an identifier unless a digit follows
        assert_eq!(read1("-x"), Value::symbol("-x"));
    }

    #[test]
    fn test_parse_specials() {
        assert_eq!(read1("#t"), Value::Bool(true));
        assert_eq!(read1("#f"), Value::Bool(false));
        assert_eq!(read1("#nil"), Value::Nil);
        assert!(syntax_msg("#true").contains("unknown special"));
    }

    #[test]
    fn test_parse_keywords() {
        assert_eq!(read1(":hello"), Value::Keyword("hello".to_string()));
        assert_eq!(read1(":f5"), Value::Keyword("f5".to_string()));
        assert!(syntax_msg(":привет").contains("invalid keyword"));
    }

    #[test]
    fn test_parse_strings() {
        assert_eq!(read1(r#""hello""#), Value::Str("hello".to_string()));
        assert_eq!(read1(r#""""#), Value::Str(String::new()));
        assert_eq!(read1(r#""str\n""#), Value::Str("str\n".to_string()));
        assert_eq!(
            read1(r#""\"\\\/\b\f\n\r\t""#),
            Value::Str("\"\\/\u{8}\u{c}\n\r\t".to_string())
        );
        assert_eq!(read1(r#""é""#), Value::Str("é".to_string()));
        // surrogate pair combines into one scalar
        assert_eq!(
            read1(r#""\ud83d\ude42""#),
            Value::Str("🙂".to_string())
        );
        // lone surrogate half degrades to the replacement character
        assert_eq!(read1(r#""\ud83d""#), Value::Str("\u{fffd}".to_string()));
        assert_eq!(
            read1("\"\\thi🙂\\n\""),
            Value::Str("\thi🙂\n".to_string())
        );
    }

    #[test]
    fn test_string_errors() {
        assert!(syntax_msg(r#""abc"#).contains("string unterminated"));
        assert!(syntax_msg(r#""\uZZZZ""#).contains("expected hex digit"));
        assert!(syntax_msg(r#""\q""#).contains("unknown escape"));
    }

    #[test]
    fn test_parse_lists() {
        assert_eq!(read1("()"), Value::EmptyList);
        assert_eq!(read1("(  )"), Value::EmptyList);
        assert_eq!(
            read1("(+ a 10)"),
            Value::list(vec![
                Value::symbol("+"),
                Value::symbol("a"),
                Value::Number(10.0)
            ])
        );
        assert_eq!(
            read1("[1 2]"),
            Value::list(vec![Value::Number(1.0), Value::Number(2.0)])
        );
        assert_eq!(read1("(1 (2 3) 4)").to_string(), "(1 (2 3) 4)");
    }

    #[test]
    fn test_parse_dotted() {
        assert_eq!(
            read1("(a b . c)"),
            Value::dotted(
                vec![Value::symbol("a"), Value::symbol("b")],
                Value::symbol("c")
            )
        );
        // after the dot exactly one form is allowed
        assert!(syntax_msg("(a . b c)").contains("expected ')'"));
    }

    #[test]
    fn test_parse_quote_family() {
        assert_eq!(read1("'x"), Value::Quoted(Arc::new(Value::symbol("x"))));
        assert_eq!(
            read1("`x"),
            Value::Quasiquoted(Arc::new(Value::symbol("x")))
        );
        assert_eq!(read1(",x"), Value::Unquoted(Arc::new(Value::symbol("x"))));
        assert_eq!(read1(",@x"), Value::Spliced(Arc::new(Value::symbol("x"))));

        // nested quotes survive reading as nested wrappers
        assert_eq!(
            read1("''x"),
            Value::Quoted(Arc::new(Value::Quoted(Arc::new(Value::symbol("x")))))
        );
        assert_eq!(read1("`(1 ,a ,@b)").to_string(), "`(1 ,a ,@b)");
    }

    #[test]
    fn test_comments_are_whitespace() {
        assert_eq!(read1("; comment\n42"), Value::Number(42.0));
        assert_eq!(read1("(1 2 ; comment\n 3)").to_string(), "(1 2 3)");
    }

    #[test]
    fn test_empty_input() {
        assert_eq!(read_str("").unwrap(), vec![]);
        assert_eq!(read_str("  ; only a comment").unwrap(), vec![]);
    }

    #[test]
    fn test_multiple_top_level_forms() {
        let forms = read_str("1 2 (3)").unwrap();
        assert_eq!(forms.len(), 3);
    }

    #[test]
    fn test_eof_mid_form() {
        assert!(syntax_msg("(1 2").contains("unexpected end of input"));
        assert!(syntax_msg("'").contains("unexpected end of input"));
    }

    #[test]
    fn test_unopened_braces() {
        assert!(syntax_msg(")").contains("unopened braces"));
    }

    #[test]
    fn test_factorial_shape() {
        let code = "
            (define fac (lambda (n)
              (if (> n 0)
                (* n (fac (- n 1)))
                1)))";
        assert_eq!(
            read1(code).to_string(),
            "(define fac (lambda (n) (if (> n 0) (* n (fac (- n 1))) 1)))"
        );
    }

    #[test]
    fn test_errors_carry_position() {
        match read_str("   )") {
            Err(LispError::Syntax { pos, .. }) => assert_eq!(pos, 4),
            other => panic!("expected syntax error, got {:?}", other),
        }
    }
}
