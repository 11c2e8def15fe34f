//! Conversion of JavaScript object-literal deps sources into JSON text
//!
//! `deps.js` files hold a single literal expression such as
//! `({ mustDeps: [{ block: 'i-bem', elems: ['dom'] }] })`. Instead of evaluating
//! the file, the literal is re-tokenized into strict JSON: comments are dropped,
//! wrapping parentheses and semicolons removed, single-quoted strings and bare
//! keys re-quoted, and trailing commas blanked. Any other expression (calls,
//! variables, operators) is rejected.

use serde_json::Value;

/// JSON text plus, for every output byte, the byte offset it came from in the source
#[derive(Debug)]
pub struct Normalized {
    pub json: String,
    origins: Vec<usize>,
}

impl Normalized {
    /// Source offset for a byte offset in the JSON text
    pub fn origin(&self, json_offset: usize) -> usize {
        self.origins
            .get(json_offset)
            .or_else(|| self.origins.last())
            .copied()
            .unwrap_or(0)
    }

    /// Source offset for a 1-based line/column reported by `serde_json`
    pub fn origin_at(&self, line: usize, column: usize) -> usize {
        let line_start: usize = self
            .json
            .split_inclusive('\n')
            .take(line.saturating_sub(1))
            .map(str::len)
            .sum();
        self.origin(line_start + column.saturating_sub(1))
    }
}

/// Syntax problem found while re-tokenizing, located in the deps source text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LiteralError {
    pub offset: usize,
    pub len: usize,
    pub message: String,
}

impl LiteralError {
    fn new(offset: usize, len: usize, message: impl Into<String>) -> Self {
        Self {
            offset,
            len,
            message: message.into(),
        }
    }
}

struct Emitter {
    json: String,
    origins: Vec<usize>,
    trailing_comma: Option<usize>,
}

impl Emitter {
    fn push(&mut self, text: &str, origin: usize) {
        self.json.push_str(text);
        self.origins.extend(std::iter::repeat_n(origin, text.len()));
    }

    fn token(&mut self, text: &str, origin: usize) {
        self.trailing_comma = None;
        self.push(text, origin);
    }

    fn comma(&mut self, origin: usize) {
        self.trailing_comma = Some(self.json.len());
        self.push(",", origin);
    }

    fn close(&mut self, text: &str, origin: usize) {
        if let Some(at) = self.trailing_comma.take() {
            self.json.replace_range(at..at + 1, " ");
        }
        self.push(text, origin);
    }
}

/// Re-tokenize a JavaScript literal expression into JSON
pub fn to_json(source: &str) -> Result<Normalized, LiteralError> {
    let bytes = source.as_bytes();
    let mut out = Emitter {
        json: String::with_capacity(source.len()),
        origins: Vec::with_capacity(source.len()),
        trailing_comma: None,
    };
    let mut pos = if source.starts_with('\u{feff}') {
        '\u{feff}'.len_utf8()
    } else {
        0
    };

    while pos < bytes.len() {
        let c = bytes[pos];
        match c {
            b' ' | b'\t' | b'\r' | b'\n' => {
                out.push(&source[pos..pos + 1], pos);
                pos += 1;
            }
            b'/' if bytes.get(pos + 1) == Some(&b'/') => {
                pos = source[pos..]
                    .find('\n')
                    .map(|n| pos + n)
                    .unwrap_or(bytes.len());
            }
            b'/' if bytes.get(pos + 1) == Some(&b'*') => {
                let end = source[pos + 2..]
                    .find("*/")
                    .ok_or_else(|| LiteralError::new(pos, 2, "unterminated block comment"))?;
                pos += 2 + end + 2;
            }
            b'(' | b')' | b';' => pos += 1,
            b'{' | b'[' | b':' => {
                out.token(&source[pos..pos + 1], pos);
                pos += 1;
            }
            b'}' | b']' => {
                out.close(&source[pos..pos + 1], pos);
                pos += 1;
            }
            b',' => {
                out.comma(pos);
                pos += 1;
            }
            b'\'' | b'"' => {
                let (text, end) = read_string(source, pos)?;
                let quoted = Value::String(text).to_string();
                out.token(&quoted, pos);
                pos = end;
            }
            b'-' | b'+' | b'.' | b'0'..=b'9'
                if c != b'.' || bytes.get(pos + 1).is_some_and(u8::is_ascii_digit) =>
            {
                let end = scan(bytes, pos, |b| b.is_ascii_alphanumeric() || b"._+-".contains(&b));
                let number = normalize_number(&source[pos..end])
                    .ok_or_else(|| LiteralError::new(pos, end - pos, "invalid number literal"))?;
                if next_significant(source, end) == Some(b':') {
                    out.token(&Value::String(number).to_string(), pos);
                } else {
                    out.token(&number, pos);
                }
                pos = end;
            }
            c if is_ident_start(c) => {
                let end = scan(bytes, pos, is_ident_part);
                let word = &source[pos..end];
                if next_significant(source, end) == Some(b':') {
                    out.token(&Value::String(word.to_string()).to_string(), pos);
                } else {
                    match word {
                        "true" | "false" | "null" => out.token(word, pos),
                        "undefined" => out.token("null", pos),
                        _ => {
                            return Err(LiteralError::new(
                                pos,
                                word.len(),
                                format!(
                                    "unsupported expression `{word}`, deps must be a plain literal"
                                ),
                            ));
                        }
                    }
                }
                pos = end;
            }
            _ => {
                let len = source[pos..].chars().next().map_or(1, char::len_utf8);
                return Err(LiteralError::new(
                    pos,
                    len,
                    format!("unexpected character `{}`", &source[pos..pos + len]),
                ));
            }
        }
    }

    Ok(Normalized {
        json: out.json,
        origins: out.origins,
    })
}

fn is_ident_start(b: u8) -> bool {
    b.is_ascii_alphabetic() || b == b'_' || b == b'$'
}

fn is_ident_part(b: u8) -> bool {
    is_ident_start(b) || b.is_ascii_digit()
}

fn scan(bytes: &[u8], start: usize, accept: impl Fn(u8) -> bool) -> usize {
    bytes[start..]
        .iter()
        .position(|&b| !accept(b))
        .map_or(bytes.len(), |n| start + n)
}

/// First byte at or after `from` that is not whitespace or part of a comment
fn next_significant(source: &str, mut from: usize) -> Option<u8> {
    let bytes = source.as_bytes();
    loop {
        match *bytes.get(from)? {
            b if b.is_ascii_whitespace() => from += 1,
            b'/' if bytes.get(from + 1) == Some(&b'/') => {
                from += source[from..].find('\n')?;
            }
            b'/' if bytes.get(from + 1) == Some(&b'*') => {
                from += 2 + source[from + 2..].find("*/")? + 2;
            }
            b => return Some(b),
        }
    }
}

/// JSON spelling of a JS numeric literal, if it has one
fn normalize_number(raw: &str) -> Option<String> {
    let (sign, digits) = match raw.as_bytes().first() {
        Some(b'-') => ("-", &raw[1..]),
        Some(b'+') => ("", &raw[1..]),
        _ => ("", raw),
    };
    let digits = digits.replace('_', "");

    let radix = match digits.get(..2).map(str::to_ascii_lowercase).as_deref() {
        Some("0x") => Some(16),
        Some("0o") => Some(8),
        Some("0b") => Some(2),
        _ => None,
    };
    if let Some(radix) = radix {
        let n = i64::from_str_radix(&digits[2..], radix).ok()?;
        return Some(format!("{sign}{n}"));
    }

    let n: f64 = digits.parse().ok()?;
    if !n.is_finite() {
        return None;
    }
    if digits.bytes().all(|b| b.is_ascii_digit()) {
        let trimmed = digits.trim_start_matches('0');
        let trimmed = if trimmed.is_empty() { "0" } else { trimmed };
        return Some(format!("{sign}{trimmed}"));
    }
    Some(format!("{sign}{n}"))
}

/// Decode a quoted JS string starting at `start`; returns the text and the offset after it
fn read_string(source: &str, start: usize) -> Result<(String, usize), LiteralError> {
    let quote = source.as_bytes()[start] as char;
    let mut text = String::new();
    let mut chars = source[start + 1..].char_indices();

    while let Some((i, c)) = chars.next() {
        let at = start + 1 + i;
        match c {
            c if c == quote => return Ok((text, at + 1)),
            '\n' => break,
            '\\' => {
                let Some((_, escaped)) = chars.next() else {
                    break;
                };
                match escaped {
                    'n' => text.push('\n'),
                    't' => text.push('\t'),
                    'r' => text.push('\r'),
                    'b' => text.push('\u{8}'),
                    'f' => text.push('\u{c}'),
                    'v' => text.push('\u{b}'),
                    '0' => text.push('\0'),
                    '\n' => {}
                    '\r' => {
                        if chars.clone().next().map(|(_, c)| c) == Some('\n') {
                            chars.next();
                        }
                    }
                    'x' => {
                        let hex: String = chars.by_ref().take(2).map(|(_, c)| c).collect();
                        text.push(decode_code_point(parse_hex(&hex, at)?, &hex, at)?);
                    }
                    'u' => {
                        let hex: String = if chars.clone().next().map(|(_, c)| c) == Some('{') {
                            chars.next();
                            chars
                                .by_ref()
                                .map(|(_, c)| c)
                                .take_while(|&c| c != '}')
                                .collect()
                        } else {
                            chars.by_ref().take(4).map(|(_, c)| c).collect()
                        };
                        let mut code = parse_hex(&hex, at)?;
                        if (0xD800..0xDC00).contains(&code) {
                            let mut ahead = chars.clone();
                            if let (Some((_, '\\')), Some((_, 'u'))) = (ahead.next(), ahead.next())
                            {
                                let low: String =
                                    ahead.by_ref().take(4).map(|(_, c)| c).collect();
                                if let Ok(low @ 0xDC00..=0xDFFF) = u32::from_str_radix(&low, 16) {
                                    code = 0x10000 + ((code - 0xD800) << 10) + (low - 0xDC00);
                                    chars = ahead;
                                }
                            }
                        }
                        text.push(decode_code_point(code, &hex, at)?);
                    }
                    other => text.push(other),
                }
            }
            c => text.push(c),
        }
    }

    Err(LiteralError::new(start, 1, "unterminated string literal"))
}

fn invalid_escape(hex: &str, at: usize) -> LiteralError {
    LiteralError::new(at, 2, format!("invalid escape sequence `{hex}`"))
}

fn parse_hex(hex: &str, at: usize) -> Result<u32, LiteralError> {
    u32::from_str_radix(hex, 16).map_err(|_| invalid_escape(hex, at))
}

/// Unpaired surrogates have no `char` and are rejected
fn decode_code_point(code: u32, hex: &str, at: usize) -> Result<char, LiteralError> {
    char::from_u32(code).ok_or_else(|| invalid_escape(hex, at))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn decode(source: &str) -> Value {
        let normalized = to_json(source).unwrap();
        serde_json::from_str(&normalized.json).unwrap()
    }

    #[test]
    fn test_wrapped_object_with_bare_keys() {
        let source = r#"({
            mustDeps: [
                { block: 'i-bem', elems: ['dom', 'html'] }
            ],
            shouldDeps: { block: "link", mods: { pseudo: true } }
        })"#;
        assert_eq!(
            decode(source),
            json!({
                "mustDeps": [{ "block": "i-bem", "elems": ["dom", "html"] }],
                "shouldDeps": { "block": "link", "mods": { "pseudo": true } }
            })
        );
    }

    #[test]
    fn test_comments_and_trailing_commas() {
        let source = "[\n  // first\n  { tech: 'js', /* inline */ mustDeps: 'b1', },\n  'b2',\n];";
        assert_eq!(
            decode(source),
            json!([{ "tech": "js", "mustDeps": "b1" }, "b2"])
        );
    }

    #[test]
    fn test_key_order_is_preserved() {
        let value = decode("{ tech: 't', block: 'b', elem: 'e' }");
        let keys: Vec<_> = value.as_object().unwrap().keys().cloned().collect();
        assert_eq!(keys, vec!["tech", "block", "elem"]);
    }

    #[test]
    fn test_string_escapes() {
        assert_eq!(
            decode(r#"{ a: 'it\'s', b: "q\"t", c: 'A\x42\u{43}', d: 'l\
ine' }"#),
            json!({ "a": "it's", "b": "q\"t", "c": "ABC", "d": "line" })
        );
    }

    #[test]
    fn test_literals_and_numbers() {
        assert_eq!(
            decode("{ a: undefined, b: null, c: false, d: -1, e: .5, f: 0x10, g: +3 }"),
            json!({ "a": null, "b": null, "c": false, "d": -1, "e": 0.5, "f": 16, "g": 3 })
        );
    }

    #[test]
    fn test_leading_byte_order_mark_is_skipped() {
        let source = "\u{feff}({ block: 'b' })";
        assert_eq!(decode(source), json!({ "block": "b" }));

        let err = to_json("\u{feff}({ block: name })").unwrap_err();
        assert_eq!(&"\u{feff}({ block: name })"[err.offset..err.offset + err.len], "name");
    }

    #[test]
    fn test_surrogate_pair_escape() {
        assert_eq!(
            decode(r"{ a: '\uD83D\uDE00', b: 'x\u{1F600}' }"),
            json!({ "a": "😀", "b": "x😀" })
        );

        let err = to_json(r"{ a: '\uD83D' }").unwrap_err();
        assert_eq!(err.message, "invalid escape sequence `D83D`");
    }

    #[test]
    fn test_comment_between_key_and_colon() {
        assert_eq!(
            decode("{ block /* c */ : 'b', elem // e\n : 'e' }"),
            json!({ "block": "b", "elem": "e" })
        );
    }

    #[test]
    fn test_numeric_keys_are_quoted() {
        assert_eq!(decode("({ 1: 'a', 0x2 : 'b' })"), json!({ "1": "a", "2": "b" }));
    }

    #[test]
    fn test_binary_and_octal_numbers() {
        assert_eq!(decode("[0b101, 0o17, -0B11, 0O7]"), json!([5, 15, -3, 7]));
    }

    #[test]
    fn test_rejects_expressions() {
        let source = "[{ block: 'a' }].concat(deps)";
        let err = to_json(source).unwrap_err();
        assert_eq!(err.offset, source.find('.').unwrap());

        let err = to_json("({ block: name })").unwrap_err();
        assert_eq!(err.offset, 10);
        assert!(err.message.contains("`name`"));
    }

    #[test]
    fn test_unterminated_string() {
        let err = to_json("{ block: 'abc }").unwrap_err();
        assert_eq!(err.offset, 9);
        assert_eq!(err.message, "unterminated string literal");
    }

    #[test]
    fn test_unterminated_comment() {
        let err = to_json("{ /* block: 'a' }").unwrap_err();
        assert_eq!(err.offset, 2);
    }

    #[test]
    fn test_origin_maps_back_to_source() {
        let source = "({\n  tech: 'x' % 2\n})";
        let err = to_json(source).unwrap_err();
        assert_eq!(&source[err.offset..err.offset + err.len], "%");

        let source = "({\n  tech: 'x' 'y'\n})";
        let normalized = to_json(source).unwrap();
        let err = serde_json::from_str::<Value>(&normalized.json).unwrap_err();
        let offset = normalized.origin_at(err.line(), err.column());
        assert_eq!(&source[offset..offset + 3], "'y'");
    }
}
