//! Data-script format for `.js` data files.
//!
//! Data scripts are parsed, never executed. The accepted language is the
//! literal subset of JavaScript that authors actually write in data files:
//!
//! ```text
//! // optional prefix: `module.exports =` or `export default`
//! ({
//!     name: '{{ package.name }}',      // unquoted keys, single quotes
//!     "homepage": `https://x.dev`,     // backticks without ${}
//!     tags: ['css', 'theme',],         // trailing commas
//!     /* block comments */ stars: 1.2e3,
//! });
//! ```
//!
//! Identifiers are only allowed as object keys and as `true`, `false`,
//! `null`. Anything with behaviour (calls, spreads, computed keys,
//! interpolation) is rejected with a positioned [`ScriptError`].

use serde_json::{Map, Number, Value};
use thiserror::Error;

/// Deepest nesting of objects, arrays and parentheses accepted
const MAX_DEPTH: usize = 128;

/// A parse failure with a 1-based position
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{message} at line {line}, column {column}")]
pub struct ScriptError {
    pub line: usize,
    pub column: usize,
    pub message: String,
}

/// Evaluate a data script into a JSON value
pub fn evaluate(source: &str) -> Result<Value, ScriptError> {
    Parser::new(source).parse_program()
}

/// Escape `value` so it reads back unchanged inside any string literal
/// (`'...'`, `"..."` or `` `...` ``)
pub fn escape_string_content(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '\\' | '\'' | '"' | '`' | '$' => {
                out.push('\\');
                out.push(c);
            }
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\u{2028}' => out.push_str("\\u2028"),
            '\u{2029}' => out.push_str("\\u2029"),
            c => out.push(c),
        }
    }
    out
}

type ParseResult<T> = Result<T, ScriptError>;

struct Parser<'a> {
    src: &'a str,
    pos: usize,
}

impl<'a> Parser<'a> {
    fn new(src: &'a str) -> Self {
        let src = src.strip_prefix('\u{feff}').unwrap_or(src);
        Self { src, pos: 0 }
    }

    fn rest(&self) -> &'a str {
        &self.src[self.pos..]
    }

    fn peek(&self) -> Option<char> {
        self.rest().chars().next()
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8();
        Some(c)
    }

    fn error_at(&self, pos: usize, message: impl Into<String>) -> ScriptError {
        let before = &self.src[..pos];
        let line = before.matches('\n').count() + 1;
        let line_start = before.rfind('\n').map(|i| i + 1).unwrap_or(0);
        let column = before[line_start..].chars().count() + 1;
        ScriptError {
            line,
            column,
            message: message.into(),
        }
    }

    fn error(&self, message: impl Into<String>) -> ScriptError {
        self.error_at(self.pos, message)
    }

    fn expect(&mut self, expected: char) -> ParseResult<()> {
        self.skip_trivia()?;
        match self.peek() {
            Some(c) if c == expected => {
                self.bump();
                Ok(())
            }
            Some(c) => Err(self.error(format!("expected '{}', found '{}'", expected, c))),
            None => Err(self.error(format!("expected '{}', found end of input", expected))),
        }
    }

    /// Skip whitespace and comments
    fn skip_trivia(&mut self) -> ParseResult<()> {
        loop {
            let rest = self.rest();
            if rest.starts_with("//") {
                let len = rest.find('\n').unwrap_or(rest.len());
                self.pos += len;
            } else if rest.starts_with("/*") {
                let start = self.pos;
                match rest[2..].find("*/") {
                    Some(end) => self.pos += end + 4,
                    None => return Err(self.error_at(start, "unterminated block comment")),
                }
            } else if self.peek().is_some_and(char::is_whitespace) {
                self.bump();
            } else {
                return Ok(());
            }
        }
    }

    fn parse_program(mut self) -> ParseResult<Value> {
        self.skip_trivia()?;
        self.skip_export_prefix()?;

        let value = self.parse_value(0)?;

        self.skip_trivia()?;
        if self.peek() == Some(';') {
            self.bump();
            self.skip_trivia()?;
        }
        match self.peek() {
            None => Ok(value),
            Some(_) => Err(self.error("unexpected content after the data value")),
        }
    }

    /// Consume `module.exports =` or `export default` if present
    fn skip_export_prefix(&mut self) -> ParseResult<()> {
        let start = self.pos;
        match self.read_identifier() {
            Some("module") => {
                self.expect('.')?;
                self.skip_trivia()?;
                if self.read_identifier() != Some("exports") {
                    return Err(self.error("expected 'module.exports ='"));
                }
                self.expect('=')
            }
            Some("export") => {
                self.skip_trivia()?;
                if self.read_identifier() != Some("default") {
                    return Err(self.error("expected 'export default'"));
                }
                self.skip_trivia()
            }
            _ => {
                self.pos = start;
                Ok(())
            }
        }
    }

    fn read_identifier(&mut self) -> Option<&'a str> {
        let rest = self.rest();
        let mut chars = rest.char_indices();
        match chars.next() {
            Some((_, c)) if is_identifier_start(c) => {}
            _ => return None,
        }
        let len = chars
            .find(|(_, c)| !is_identifier_part(*c))
            .map(|(i, _)| i)
            .unwrap_or(rest.len());
        self.pos += len;
        Some(&rest[..len])
    }

    fn parse_value(&mut self, depth: usize) -> ParseResult<Value> {
        if depth > MAX_DEPTH {
            return Err(self.error("data nested too deeply"));
        }
        self.skip_trivia()?;

        match self.peek() {
            Some('{') => self.parse_object(depth),
            Some('[') => self.parse_array(depth),
            Some('(') => {
                self.bump();
                let value = self.parse_value(depth + 1)?;
                self.expect(')')?;
                Ok(value)
            }
            Some(quote @ ('"' | '\'' | '`')) => self.parse_string(quote).map(Value::String),
            Some('-' | '+' | '.' | '0'..='9') => self.parse_number(),
            Some(c) if is_identifier_start(c) => {
                let start = self.pos;
                match self.read_identifier() {
                    Some("true") => Ok(Value::Bool(true)),
                    Some("false") => Ok(Value::Bool(false)),
                    Some("null") => Ok(Value::Null),
                    Some(other) => Err(self.error_at(
                        start,
                        format!("'{}' is not a literal value", other),
                    )),
                    None => Err(self.error_at(start, "expected a value")),
                }
            }
            Some(c) => Err(self.error(format!("unexpected character '{}'", c))),
            None => Err(self.error("unexpected end of input, expected a value")),
        }
    }

    fn parse_object(&mut self, depth: usize) -> ParseResult<Value> {
        self.bump();
        let mut map = Map::new();

        loop {
            self.skip_trivia()?;
            if self.peek() == Some('}') {
                self.bump();
                break;
            }

            let key = self.parse_key()?;
            self.expect(':')?;
            let value = self.parse_value(depth + 1)?;
            map.insert(key, value);

            self.skip_trivia()?;
            match self.peek() {
                Some(',') => {
                    self.bump();
                }
                Some('}') => {
                    self.bump();
                    break;
                }
                Some(c) => return Err(self.error(format!("expected ',' or '}}', found '{}'", c))),
                None => return Err(self.error("unterminated object")),
            }
        }

        Ok(Value::Object(map))
    }

    fn parse_key(&mut self) -> ParseResult<String> {
        match self.peek() {
            Some(quote @ ('"' | '\'')) => self.parse_string(quote),
            Some(c) if is_identifier_start(c) => match self.read_identifier() {
                Some(key) => Ok(key.to_string()),
                None => Err(self.error("expected a property name")),
            },
            Some('0'..='9') => {
                let start = self.pos;
                while self.peek().is_some_and(|c| c.is_ascii_digit()) {
                    self.bump();
                }
                Ok(self.src[start..self.pos].to_string())
            }
            Some('[') => Err(self.error("computed property names are not supported")),
            Some('.') => Err(self.error("spread properties are not supported")),
            Some(c) => Err(self.error(format!("unexpected character '{}' in property name", c))),
            None => Err(self.error("unterminated object")),
        }
    }

    fn parse_array(&mut self, depth: usize) -> ParseResult<Value> {
        self.bump();
        let mut items = Vec::new();

        loop {
            self.skip_trivia()?;
            if self.peek() == Some(']') {
                self.bump();
                break;
            }

            items.push(self.parse_value(depth + 1)?);

            self.skip_trivia()?;
            match self.peek() {
                Some(',') => {
                    self.bump();
                }
                Some(']') => {
                    self.bump();
                    break;
                }
                Some(c) => return Err(self.error(format!("expected ',' or ']', found '{}'", c))),
                None => return Err(self.error("unterminated array")),
            }
        }

        Ok(Value::Array(items))
    }

    fn parse_string(&mut self, quote: char) -> ParseResult<String> {
        let start = self.pos;
        self.bump();
        let mut out = String::new();

        loop {
            let Some(c) = self.bump() else {
                return Err(self.error_at(start, "unterminated string"));
            };
            match c {
                c if c == quote => return Ok(out),
                '\\' => self.parse_escape(&mut out)?,
                '$' if quote == '`' && self.peek() == Some('{') => {
                    return Err(self.error_at(
                        self.pos - 1,
                        "template interpolation '${' is not supported",
                    ));
                }
                '\n' | '\r' if quote != '`' => {
                    return Err(self.error_at(start, "unterminated string"));
                }
                c => out.push(c),
            }
        }
    }

    fn parse_escape(&mut self, out: &mut String) -> ParseResult<()> {
        let escape_start = self.pos - 1;
        let Some(c) = self.bump() else {
            return Err(self.error_at(escape_start, "unterminated escape sequence"));
        };

        match c {
            'n' => out.push('\n'),
            't' => out.push('\t'),
            'r' => out.push('\r'),
            'b' => out.push('\u{8}'),
            'f' => out.push('\u{c}'),
            'v' => out.push('\u{b}'),
            '0' => out.push('\0'),
            'x' => {
                let code = self.read_hex(2, escape_start)?;
                out.push(char::from_u32(code).unwrap_or(char::REPLACEMENT_CHARACTER));
            }
            'u' => {
                let c = self.parse_unicode_escape(escape_start)?;
                out.push(c);
            }
            // Line continuation
            '\n' | '\u{2028}' | '\u{2029}' => {}
            '\r' => {
                if self.peek() == Some('\n') {
                    self.bump();
                }
            }
            // Quotes, backslash, and any non-special character stand for themselves
            other => out.push(other),
        }
        Ok(())
    }

    fn parse_unicode_escape(&mut self, escape_start: usize) -> ParseResult<char> {
        let code = if self.peek() == Some('{') {
            self.bump();
            let src = self.src;
            let start = self.pos;
            while self.peek().is_some_and(|c| c.is_ascii_hexdigit()) {
                self.bump();
            }
            let digits = &src[start..self.pos];
            if digits.is_empty() || self.bump() != Some('}') {
                return Err(self.error_at(escape_start, "invalid unicode escape"));
            }
            u32::from_str_radix(digits, 16)
                .map_err(|_| self.error_at(escape_start, "invalid unicode escape"))?
        } else {
            self.read_hex(4, escape_start)?
        };

        // High surrogate: combine with a following \uDC00-\uDFFF
        if (0xD800..0xDC00).contains(&code) && self.rest().starts_with("\\u") {
            let checkpoint = self.pos;
            self.pos += 2;
            if let Ok(low) = self.read_hex(4, escape_start) {
                if (0xDC00..0xE000).contains(&low) {
                    let combined = 0x10000 + ((code - 0xD800) << 10) + (low - 0xDC00);
                    if let Some(c) = char::from_u32(combined) {
                        return Ok(c);
                    }
                }
            }
            self.pos = checkpoint;
        }

        Ok(char::from_u32(code).unwrap_or(char::REPLACEMENT_CHARACTER))
    }

    fn read_hex(&mut self, len: usize, escape_start: usize) -> ParseResult<u32> {
        let digits = self
            .rest()
            .get(..len)
            .filter(|d| d.chars().all(|c| c.is_ascii_hexdigit()))
            .ok_or_else(|| self.error_at(escape_start, "invalid hexadecimal escape"))?;
        self.pos += len;
        u32::from_str_radix(digits, 16)
            .map_err(|_| self.error_at(escape_start, "invalid hexadecimal escape"))
    }

    fn parse_number(&mut self) -> ParseResult<Value> {
        let start = self.pos;
        if matches!(self.peek(), Some('-' | '+')) {
            self.bump();
        }

        let int_digits = self.eat_digits();
        let mut is_float = false;

        let mut frac_digits = 0;
        if self.peek() == Some('.') {
            is_float = true;
            self.bump();
            frac_digits = self.eat_digits();
        }
        if int_digits == 0 && frac_digits == 0 {
            return Err(self.error_at(start, "invalid number"));
        }

        if matches!(self.peek(), Some('e' | 'E')) {
            is_float = true;
            self.bump();
            if matches!(self.peek(), Some('-' | '+')) {
                self.bump();
            }
            if self.eat_digits() == 0 {
                return Err(self.error_at(start, "invalid number exponent"));
            }
        }

        let literal = self.src[start..self.pos].trim_start_matches('+');

        if !is_float {
            if let Ok(n) = literal.parse::<i64>() {
                return Ok(Value::Number(n.into()));
            }
            if let Ok(n) = literal.parse::<u64>() {
                return Ok(Value::Number(n.into()));
            }
        }

        literal
            .parse::<f64>()
            .ok()
            .and_then(Number::from_f64)
            .map(Value::Number)
            .ok_or_else(|| self.error_at(start, "number out of range"))
    }

    fn eat_digits(&mut self) -> usize {
        let mut count = 0;
        while self.peek().is_some_and(|c| c.is_ascii_digit()) {
            self.bump();
            count += 1;
        }
        count
    }
}

fn is_identifier_start(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_' || c == '$'
}

fn is_identifier_part(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_' || c == '$'
}
