//! Hex text format shared by the assembler and the simulator: uppercase
//! two-digit bytes separated by spaces, one instruction per line on output,
//! any whitespace layout accepted on input.

use std::fmt::Write as _;

#[derive(thiserror::Error, Debug, PartialEq, Eq)]
pub enum ImageError {
    #[error("token {index} ({token:?}) is not a hex byte")]
    BadByte { index: usize, token: String },
}

pub fn parse_hex(text: &str) -> Result<Vec<u8>, ImageError> {
    text.split_whitespace()
        .enumerate()
        .map(|(index, token)| {
            let ok = token.len() <= 2 && token.bytes().all(|c| c.is_ascii_hexdigit());
            match u8::from_str_radix(token, 16) {
                Ok(b) if ok => Ok(b),
                _ => Err(ImageError::BadByte {
                    index,
                    token: token.to_string(),
                }),
            }
        })
        .collect()
}

/// One record per line, no trailing newline.
pub fn format_hex<R: AsRef<[u8]>>(records: &[R]) -> String {
    let mut out = String::new();
    for (i, rec) in records.iter().enumerate() {
        if i > 0 {
            out.push('\n');
        }
        for (j, b) in rec.as_ref().iter().enumerate() {
            if j > 0 {
                out.push(' ');
            }
            let _ = write!(out, "{b:02X}");
        }
    }
    out
}
