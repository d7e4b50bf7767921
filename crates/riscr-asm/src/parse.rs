use std::fmt;
use std::num::IntErrorKind;

use crate::error::AsmError;

const COMMENT_CHAR: char = ';';
const SEPARATORS: [char; 3] = [',', '(', ')'];

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    Int(i64),
    /// Register name or label.
    Word(String),
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::Int(v) => write!(f, "{v}"),
            Token::Word(w) => f.write_str(w),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceLine {
    /// 1-based line number in the source text.
    pub line: usize,
    /// Upper-cased.
    pub mnemonic: String,
    pub operands: Vec<Token>,
}

/// `0x`-prefixed tokens are hex, tokens starting with a digit are decimal,
/// either may carry a leading `-`. Everything else is a word.
fn parse_token(line: usize, raw: &str) -> Result<Token, AsmError> {
    let (neg, body) = match raw.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, raw),
    };
    let bad = || AsmError::BadNumber {
        line,
        token: raw.to_string(),
    };
    let parsed = if let Some(hex) = body.strip_prefix("0x").or_else(|| body.strip_prefix("0X")) {
        if hex.is_empty() || !hex.bytes().all(|c| c.is_ascii_hexdigit()) {
            return Err(bad());
        }
        i64::from_str_radix(hex, 16)
    } else if body.starts_with(|c: char| c.is_ascii_digit()) {
        body.parse::<i64>()
    } else {
        return Ok(Token::Word(raw.to_string()));
    };
    match parsed {
        Ok(v) => Ok(Token::Int(if neg { -v } else { v })),
        // Well-formed but wider than i64: saturate so the range check reports it.
        Err(e) if *e.kind() == IntErrorKind::PosOverflow => Err(AsmError::OutOfRange {
            line,
            what: "integer",
            value: if neg { i64::MIN } else { i64::MAX },
        }),
        Err(_) => Err(bad()),
    }
}

/// Tokenize a single line; `None` for blank and comment-only lines.
pub fn parse_line(line: usize, text: &str) -> Result<Option<SourceLine>, AsmError> {
    let code = match text.find(COMMENT_CHAR) {
        Some(p) => &text[..p],
        None => text,
    };
    let mut words = code.split(|c: char| c.is_whitespace() || SEPARATORS.contains(&c))
        .filter(|w| !w.is_empty());
    let Some(mnemonic) = words.next() else {
        return Ok(None);
    };
    let operands = words
        .map(|w| parse_token(line, w))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(Some(SourceLine {
        line,
        mnemonic: mnemonic.to_ascii_uppercase(),
        operands,
    }))
}

pub fn tokenize(src: &str) -> Result<Vec<SourceLine>, AsmError> {
    let mut out = Vec::new();
    for (i, text) in src.lines().enumerate() {
        if let Some(l) = parse_line(i + 1, text)? {
            out.push(l);
        }
    }
    Ok(out)
}
