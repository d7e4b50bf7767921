/// Assembly errors. Any of them aborts the whole file; nothing is emitted.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum AsmError {
    #[error("line {line}: unrecognized instruction `{mnemonic}`")]
    UnknownInstruction { line: usize, mnemonic: String },
    #[error("line {line}: unknown register `{name}`")]
    UnknownRegister { line: usize, name: String },
    #[error("line {line}: malformed number `{token}`")]
    BadNumber { line: usize, token: String },
    #[error("line {line}: {what} {value} does not fit in 16 bits")]
    OutOfRange {
        line: usize,
        what: &'static str,
        value: i64,
    },
    #[error("line {line}: expected `{syntax}`, got {found} operand(s)")]
    Arity {
        line: usize,
        syntax: String,
        found: usize,
    },
    #[error("line {line}: expected a register, got `{found}`")]
    ExpectedRegister { line: usize, found: String },
    #[error("line {line}: expected an integer, got `{found}`")]
    ExpectedInteger { line: usize, found: String },
    #[error("line {line}: {mnemonic} is two-address, `{dst}` and `{src}` must be the same register")]
    TwoAddress {
        line: usize,
        mnemonic: String,
        dst: String,
        src: String,
    },
    #[error("line {line}: label `{name}` appears only once")]
    DanglingLabel { line: usize, name: String },
    #[error("line {line}: label `{name}` appears more than twice")]
    LabelReused { line: usize, name: String },
    #[error("line {line}: distance {distance} to label `{name}` does not fit in 16 bits")]
    DisplacementOutOfRange {
        line: usize,
        name: String,
        distance: i32,
    },
}
