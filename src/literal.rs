//! Tolerant parser for JavaScript object literals.
//!
//! Minified bundles embed data as object literals that are not valid JSON:
//! keys may be bare identifiers, fractional numbers may lack their leading
//! zero (`.5`), strings may use single quotes, and the minifier writes `!0`
//! and `!1` for `true` and `false`. This module parses that dialect into a
//! [`serde_json::Value`] so the rest of the crate only ever deals with
//! well-formed structured data.

use serde_json::{Map, Number, Value};

/// Syntax error in an object literal.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message} at byte {offset}")]
pub struct LiteralError {
    /// Byte offset into the parsed text.
    pub offset: usize,
    /// What was expected or found.
    pub message: String,
}

type ParseResult<T> = std::result::Result<T, LiteralError>;

/// Parse a complete literal (object, array, string, number, or keyword).
///
/// Surrounding whitespace and a single trailing `;` are accepted; anything
/// else after the value is an error.
///
/// # Errors
///
/// Returns a [`LiteralError`] pointing at the first offending byte.
pub fn parse_literal(src: &str) -> ParseResult<Value> {
    let mut parser = Parser::new(src);
    let value = parser.parse_value()?;
    parser.skip_ws();
    parser.eat(b';');
    parser.skip_ws();
    if !parser.at_end() {
        return Err(parser.error("unexpected trailing input"));
    }
    Ok(value)
}

/// Parse a literal that must be an object.
///
/// # Errors
///
/// Returns a [`LiteralError`] on bad syntax or when the literal is not an
/// object.
pub fn parse_object_literal(src: &str) -> ParseResult<Map<String, Value>> {
    match parse_literal(src)? {
        Value::Object(map) => Ok(map),
        _ => Err(LiteralError {
            offset: 0,
            message: "expected an object literal".to_string(),
        }),
    }
}

/// Rewrite a JavaScript object literal as strict JSON text.
///
/// # Errors
///
/// Returns a [`LiteralError`] when `src` is not a parseable literal.
///
/// # Example
///
/// ```rust
/// use wtm_factor::literal::to_strict_json;
///
/// let json = to_strict_json("{a:.5,'b':-.25,c:{d:1,},}")?;
/// assert_eq!(json, r#"{"a":0.5,"b":-0.25,"c":{"d":1}}"#);
/// # Ok::<(), wtm_factor::literal::LiteralError>(())
/// ```
pub fn to_strict_json(src: &str) -> ParseResult<String> {
    parse_literal(src).map(|value| value.to_string())
}

/// Cursor over literal source text.
pub(crate) struct Parser<'a> {
    src: &'a str,
    pos: usize,
}

impl<'a> Parser<'a> {
    pub(crate) fn new(src: &'a str) -> Self {
        Self { src, pos: 0 }
    }

    pub(crate) fn pos(&self) -> usize {
        self.pos
    }

    pub(crate) fn rewind(&mut self, pos: usize) {
        self.pos = pos;
    }

    pub(crate) fn at_end(&self) -> bool {
        self.pos >= self.src.len()
    }

    pub(crate) fn peek(&self) -> Option<u8> {
        self.src.as_bytes().get(self.pos).copied()
    }

    pub(crate) fn error(&self, message: impl Into<String>) -> LiteralError {
        LiteralError {
            offset: self.pos,
            message: message.into(),
        }
    }

    pub(crate) fn skip_ws(&mut self) {
        while let Some(b) = self.peek() {
            if b.is_ascii_whitespace() {
                self.pos += 1;
            } else {
                break;
            }
        }
    }

    pub(crate) fn eat(&mut self, byte: u8) -> bool {
        if self.peek() == Some(byte) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn expect(&mut self, byte: u8) -> ParseResult<()> {
        if self.eat(byte) {
            Ok(())
        } else {
            Err(self.error(format!("expected `{}`", byte as char)))
        }
    }

    pub(crate) fn parse_value(&mut self) -> ParseResult<Value> {
        self.skip_ws();
        match self.peek() {
            Some(b'{') => self.parse_object().map(Value::Object),
            Some(b'[') => self.parse_array(),
            Some(q @ (b'"' | b'\'')) => self.parse_string(q).map(Value::String),
            Some(b'-' | b'+' | b'.' | b'0'..=b'9') => self.parse_number().map(Value::Number),
            Some(b'!') => self.parse_negation(),
            Some(b) if is_ident_byte(b) => self.parse_keyword(),
            Some(b) => Err(self.error(format!("unexpected `{}`", b as char))),
            None => Err(self.error("unexpected end of input")),
        }
    }

    pub(crate) fn parse_object(&mut self) -> ParseResult<Map<String, Value>> {
        self.expect(b'{')?;
        let mut map = Map::new();
        loop {
            self.skip_ws();
            if self.eat(b'}') {
                return Ok(map);
            }
            let key = self.parse_key()?;
            self.skip_ws();
            self.expect(b':')?;
            let value = self.parse_value()?;
            map.insert(key, value);
            self.skip_ws();
            if self.eat(b',') {
                continue;
            }
            self.skip_ws();
            if self.eat(b'}') {
                return Ok(map);
            }
            return Err(self.error("expected `,` or `}`"));
        }
    }

    fn parse_array(&mut self) -> ParseResult<Value> {
        self.expect(b'[')?;
        let mut items = Vec::new();
        loop {
            self.skip_ws();
            if self.eat(b']') {
                return Ok(Value::Array(items));
            }
            items.push(self.parse_value()?);
            self.skip_ws();
            if self.eat(b',') {
                continue;
            }
            if self.eat(b']') {
                return Ok(Value::Array(items));
            }
            return Err(self.error("expected `,` or `]`"));
        }
    }

    /// Object key: a quoted string or a bare identifier.
    pub(crate) fn parse_key(&mut self) -> ParseResult<String> {
        self.skip_ws();
        match self.peek() {
            Some(q @ (b'"' | b'\'')) => self.parse_string(q),
            Some(b) if is_key_byte(b) => Ok(self.take_while(is_key_byte).to_string()),
            Some(b) => Err(self.error(format!("expected key, found `{}`", b as char))),
            None => Err(self.error("expected key, found end of input")),
        }
    }

    fn take_while(&mut self, accept: fn(u8) -> bool) -> &'a str {
        let start = self.pos;
        while self.peek().is_some_and(accept) {
            self.pos += 1;
        }
        let src = self.src;
        &src[start..self.pos]
    }

    fn parse_string(&mut self, quote: u8) -> ParseResult<String> {
        let open = self.pos;
        self.expect(quote)?;
        let mut out = String::new();
        let src = self.src;
        let mut chars = src[self.pos..].char_indices();

        while let Some((idx, c)) = chars.next() {
            match c {
                c if c as u32 == u32::from(quote) => {
                    self.pos += idx + 1;
                    return Ok(out);
                }
                '\\' => {
                    let Some((_, esc)) = chars.next() else { break };
                    match esc {
                        'n' => out.push('\n'),
                        't' => out.push('\t'),
                        'r' => out.push('\r'),
                        'b' => out.push('\u{8}'),
                        'f' => out.push('\u{c}'),
                        'u' => {
                            let offset = self.pos + idx;
                            let invalid = |hex: String| LiteralError {
                                offset,
                                message: format!("invalid unicode escape `\\u{hex}`"),
                            };
                            let hex: String = chars.by_ref().take(4).map(|(_, h)| h).collect();
                            let mut code =
                                u32::from_str_radix(&hex, 16).map_err(|_| invalid(hex.clone()))?;

                            // UTF-16 surrogate pair: `\uD83D\uDE00`
                            if (0xD800..0xDC00).contains(&code) {
                                let mut lookahead = chars.clone();
                                let low = match (lookahead.next(), lookahead.next()) {
                                    (Some((_, '\\')), Some((_, 'u'))) => {
                                        let low_hex: String =
                                            lookahead.by_ref().take(4).map(|(_, h)| h).collect();
                                        u32::from_str_radix(&low_hex, 16)
                                            .ok()
                                            .filter(|low| (0xDC00..0xE000).contains(low))
                                    }
                                    _ => None,
                                };
                                if let Some(low) = low {
                                    code = 0x10000 + ((code - 0xD800) << 10) + (low - 0xDC00);
                                    chars = lookahead;
                                }
                            }

                            out.push(char::from_u32(code).ok_or_else(|| invalid(hex))?);
                        }
                        other => out.push(other),
                    }
                }
                c => out.push(c),
            }
        }

        Err(LiteralError {
            offset: open,
            message: "unterminated string".to_string(),
        })
    }

    fn parse_number(&mut self) -> ParseResult<Number> {
        let start = self.pos;
        let negative = if self.eat(b'-') {
            true
        } else {
            self.eat(b'+');
            false
        };

        let int_part = self.take_digits();
        let frac_part = if self.eat(b'.') { Some(self.take_digits()) } else { None };
        if int_part.is_empty() && frac_part.is_none_or(str::is_empty) {
            self.pos = start;
            return Err(self.error("malformed number"));
        }

        let mut exponent = String::new();
        if matches!(self.peek(), Some(b'e' | b'E')) {
            self.pos += 1;
            if let Some(sign @ (b'-' | b'+')) = self.peek() {
                exponent.push(sign as char);
                self.pos += 1;
            }
            let digits = self.take_digits();
            if digits.is_empty() {
                return Err(self.error("malformed exponent"));
            }
            exponent.push_str(digits);
        }

        let sign = if negative { "-" } else { "" };
        let int_part = if int_part.is_empty() { "0" } else { int_part };

        if frac_part.is_none() && exponent.is_empty() {
            if let Ok(n) = format!("{sign}{int_part}").parse::<i64>() {
                return Ok(Number::from(n));
            }
        }

        let frac_part = match frac_part {
            Some(f) if !f.is_empty() => f,
            _ => "0",
        };
        let text = if exponent.is_empty() {
            format!("{sign}{int_part}.{frac_part}")
        } else {
            format!("{sign}{int_part}.{frac_part}e{exponent}")
        };

        text.parse::<f64>()
            .ok()
            .and_then(Number::from_f64)
            .ok_or_else(|| LiteralError {
                offset: start,
                message: format!("number `{text}` out of range"),
            })
    }

    fn take_digits(&mut self) -> &'a str {
        let start = self.pos;
        while self.peek().is_some_and(|b| b.is_ascii_digit()) {
            self.pos += 1;
        }
        let src = self.src;
        &src[start..self.pos]
    }

    /// Minifier booleans: `!0` is true, `!1` is false.
    fn parse_negation(&mut self) -> ParseResult<Value> {
        self.expect(b'!')?;
        match self.peek() {
            Some(b'0') => {
                self.pos += 1;
                Ok(Value::Bool(true))
            }
            Some(b'1') => {
                self.pos += 1;
                Ok(Value::Bool(false))
            }
            _ => Err(self.error("expected `0` or `1` after `!`")),
        }
    }

    fn parse_keyword(&mut self) -> ParseResult<Value> {
        let start = self.pos;
        match self.take_while(is_ident_byte) {
            "true" => Ok(Value::Bool(true)),
            "false" => Ok(Value::Bool(false)),
            "null" | "undefined" => Ok(Value::Null),
            other => {
                let message = format!("unsupported identifier `{other}`");
                self.pos = start;
                Err(self.error(message))
            }
        }
    }

    /// Advance past the current top-level item, stopping before the next
    /// `,` that is not nested inside brackets or a string.
    pub(crate) fn skip_item(&mut self) {
        let src = self.src;
        let bytes = src.as_bytes();
        let mut depth = 0usize;
        let mut quote: Option<u8> = None;

        while let Some(&b) = bytes.get(self.pos) {
            match quote {
                Some(q) => {
                    if b == b'\\' {
                        self.pos += 1;
                    } else if b == q {
                        quote = None;
                    }
                }
                None => match b {
                    b'"' | b'\'' => quote = Some(b),
                    b'{' | b'[' | b'(' => depth += 1,
                    b'}' | b']' | b')' => depth = depth.saturating_sub(1),
                    b',' if depth == 0 => return,
                    _ => {}
                },
            }
            self.pos += 1;
        }
    }
}

fn is_ident_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'_' || b == b'$'
}

/// Bare keys also accept selector characters (`#factor-x`).
fn is_key_byte(b: u8) -> bool {
    is_ident_byte(b) || b == b'#' || b == b'-'
}
