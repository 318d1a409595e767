// Schema regexes with JavaScript `RegExp` matching rules

use regex::Regex;
use std::borrow::Cow;
use std::fmt::{self, Write};

/// First char of the private-use block standing in for UTF-16 surrogates
const SURROGATE_BASE: u32 = 0xF0000;

const DIGIT_RANGE: &str = "0-9";
const WORD_RANGES: &str = "0-9A-Za-z_";
const DIGIT: &str = "[0-9]";
const NOT_DIGIT: &str = "[^0-9]";
const WORD: &str = "[0-9A-Za-z_]";
const NOT_WORD: &str = "[^0-9A-Za-z_]";
const ANY_UNIT: &str = r"[^\n\r\x{2028}\x{2029}]";

/// A compiled `regex` directive.
///
/// The source is written in JavaScript syntax and matched the way a
/// non-unicode `RegExp` does: `\d`, `\w` and `\b` are ASCII-only and `.`
/// consumes a single UTF-16 code unit, so a character outside the BMP
/// counts as two.
///
/// ```
/// use spectraget_validation::Pattern;
///
/// let zip = Pattern::new(r"^\d{5}$").unwrap();
/// assert!(zip.is_match("12345"));
/// assert!(!zip.is_match("١٢٣٤٥"));
///
/// assert!(!Pattern::new("^.$").unwrap().is_match("😀"));
/// assert!(Pattern::new("^..$").unwrap().is_match("😀"));
/// ```
#[derive(Debug, Clone)]
pub struct Pattern {
    source: String,
    regex: Regex,
}

impl Pattern {
    pub fn new(source: &str) -> Result<Self, regex::Error> {
        let regex = Regex::new(&translate(source))?;
        Ok(Self {
            source: source.to_string(),
            regex,
        })
    }

    /// The pattern as written in the schema
    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn is_match(&self, text: &str) -> bool {
        self.regex.is_match(&split_surrogates(text))
    }
}

impl fmt::Display for Pattern {
    /// Literal form, `/source/` with bare slashes and line breaks escaped
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_char('/')?;

        let mut in_class = false;
        let mut chars = self.source.chars();
        while let Some(c) = chars.next() {
            match c {
                '\\' => {
                    f.write_char('\\')?;
                    match chars.next() {
                        Some('\n') => f.write_char('n')?,
                        Some('\r') => f.write_char('r')?,
                        Some(next) => f.write_char(next)?,
                        None => {}
                    }
                }
                '/' if !in_class => f.write_str("\\/")?,
                '\n' => f.write_str("\\n")?,
                '\r' => f.write_str("\\r")?,
                '\u{2028}' => f.write_str("\\u2028")?,
                '\u{2029}' => f.write_str("\\u2029")?,
                '[' => {
                    in_class = true;
                    f.write_char(c)?;
                }
                ']' => {
                    in_class = false;
                    f.write_char(c)?;
                }
                _ => f.write_char(c)?,
            }
        }

        f.write_char('/')
    }
}

/// Rewrite a JavaScript pattern into `regex` syntax over the text produced
/// by [`split_surrogates`].
fn translate(source: &str) -> String {
    let mut out = String::with_capacity(source.len() + 16);
    let mut in_class = false;
    let mut chars = source.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '\\' => {
                let Some(escaped) = chars.next() else {
                    out.push('\\');
                    break;
                };
                match escaped {
                    'd' if in_class => out.push_str(DIGIT_RANGE),
                    'w' if in_class => out.push_str(WORD_RANGES),
                    'd' => out.push_str(DIGIT),
                    'D' => out.push_str(NOT_DIGIT),
                    'w' => out.push_str(WORD),
                    'W' => out.push_str(NOT_WORD),
                    // backspace inside a class
                    'b' if in_class => out.push_str(r"\x08"),
                    'b' => out.push_str(r"(?-u:\b)"),
                    // `regex` refuses an ASCII `\B` on `&str` haystacks
                    'B' => out.push_str(r"\B"),
                    '/' => out.push('/'),
                    'u' => push_unicode_escape(&mut out, &mut chars),
                    other if other as u32 > 0xFFFF => push_units(&mut out, other),
                    other => {
                        out.push('\\');
                        out.push(other);
                    }
                }
            }
            '[' if !in_class => {
                in_class = true;
                out.push('[');
                if chars.peek() == Some(&'^') {
                    chars.next();
                    out.push('^');
                }
            }
            ']' if in_class => {
                in_class = false;
                out.push(']');
            }
            // class set operators in `regex`, plain chars in JS
            '[' | '&' | '~' if in_class => {
                out.push('\\');
                out.push(c);
            }
            '.' if !in_class => out.push_str(ANY_UNIT),
            c if c as u32 > 0xFFFF => push_units(&mut out, c),
            c => out.push(c),
        }
    }

    out
}

/// `\uXXXX`; lone surrogates map onto their stand-in chars
fn push_unicode_escape(out: &mut String, chars: &mut std::iter::Peekable<std::str::Chars<'_>>) {
    let digits: String = chars.clone().take(4).collect();
    match u32::from_str_radix(&digits, 16) {
        Ok(unit) if digits.len() == 4 && digits.chars().all(|d| d.is_ascii_hexdigit()) => {
            for _ in 0..4 {
                chars.next();
            }
            if (0xD800..=0xDFFF).contains(&unit) {
                push_stand_in(out, unit);
            } else {
                let _ = write!(out, r"\x{{{:X}}}", unit);
            }
        }
        _ => out.push('u'),
    }
}

fn push_units(out: &mut String, c: char) {
    let mut units = [0u16; 2];
    for unit in c.encode_utf16(&mut units) {
        push_stand_in(out, u32::from(*unit));
    }
}

fn push_stand_in(out: &mut String, unit: u32) {
    let _ = write!(out, r"\x{{{:X}}}", SURROGATE_BASE + (unit - 0xD800));
}

/// Replace every character outside the BMP with two stand-in chars, one
/// per UTF-16 surrogate.
fn split_surrogates(text: &str) -> Cow<'_, str> {
    if text.chars().all(|c| (c as u32) <= 0xFFFF) {
        return Cow::Borrowed(text);
    }

    let mut out = String::with_capacity(text.len() * 2);
    for c in text.chars() {
        if (c as u32) <= 0xFFFF {
            out.push(c);
            continue;
        }
        let mut units = [0u16; 2];
        for unit in c.encode_utf16(&mut units) {
            if let Some(stand_in) = char::from_u32(SURROGATE_BASE + (u32::from(*unit) - 0xD800)) {
                out.push(stand_in);
            }
        }
    }
    Cow::Owned(out)
}
