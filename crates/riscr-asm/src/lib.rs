pub mod encode;
pub mod error;
pub mod parse;
pub mod resolve;

pub use encode::{Record, Tail, Target};
pub use error::AsmError;
pub use resolve::{LabelState, LabelTable};

use riscr::image::format_hex;

/// Assembled output: one byte vector per source instruction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Program {
    pub records: Vec<Vec<u8>>,
}

impl Program {
    /// The flat image, ready to load at address 0.
    pub fn bytes(&self) -> Vec<u8> {
        self.records.concat()
    }

    pub fn len(&self) -> usize {
        self.records.iter().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn to_hex(&self) -> String {
        format_hex(&self.records)
    }
}

/// Assemble a whole source file. All-or-nothing: the first error aborts.
pub fn assemble(src: &str) -> Result<Program, AsmError> {
    let lines = parse::tokenize(src)?;
    let mut records = lines
        .iter()
        .map(encode::encode_line)
        .collect::<Result<Vec<_>, _>>()?;

    let mut labels = resolve::accumulate(&records)?;
    resolve::resolve(&mut records, &mut labels)?;
    resolve::mark_retro(&mut records);

    let records = records
        .iter()
        .map(|r| {
            r.bytes().ok_or_else(|| AsmError::DanglingLabel {
                line: r.line,
                name: r.label().unwrap_or_default().to_string(),
            })
        })
        .collect::<Result<Vec<_>, _>>()?;
    Ok(Program { records })
}
