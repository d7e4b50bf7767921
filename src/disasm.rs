use crate::decoder::{Decoded, Decoder, StepLen};
use crate::instructions::{self, Form};
use crate::isa::riscr::{reg_name, RiscrDecoder};

pub fn fmt_decoded(d: &Decoded) -> String {
    let Some(desc) = instructions::by_opcode(d.op.opcode()) else {
        return format!("{:?}", d.op);
    };
    let mn = desc.mnemonic.to_lowercase();
    let (r1, r2) = (reg_name(d.r1), reg_name(d.r2));
    match desc.form {
        Form::None => mn,
        Form::RegReg => format!("{mn} {r1}, {r2}"),
        Form::RegImm => format!("{mn} {r1}, {:#x}", d.ext as u16),
        Form::RegMem => format!("{mn} {r1}, {}({r2})", d.ext),
        Form::Branch => format!("{mn} {r1}, {r2}, {}", fmt_disp(d.ext)),
        Form::Jump => format!("{mn} {}", fmt_disp(d.ext)),
    }
}

fn fmt_disp(disp: i16) -> String {
    if disp < 0 {
        format!("-{:#x}", -(disp as i32))
    } else {
        format!("+{disp:#x}")
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Line {
    pub addr: u32,
    pub bytes: Vec<u8>,
    pub text: String,
}

/// Linear sweep over an image, threading the step length the same way the
/// CPU does in straight-line code. Undecodable words are shown as `.half`.
pub fn listing(image: &[u8]) -> Vec<Line> {
    let dec = RiscrDecoder::new();
    let mut out = Vec::new();
    let mut pc = 0usize;
    let mut carry = StepLen::INITIAL;
    while pc + 2 <= image.len() {
        let word = u16::from_le_bytes([image[pc], image[pc + 1]]) as u32;
        let ext = image
            .get(pc + 2..pc + 4)
            .map(|b| u16::from_le_bytes([b[0], b[1]]) as u32)
            .unwrap_or(0);
        match dec.decode(word | ext << 16, carry) {
            Some(d) => {
                let width = d.width() as usize;
                let end = (pc + width).min(image.len());
                out.push(Line {
                    addr: pc as u32,
                    bytes: image[pc..end].to_vec(),
                    text: fmt_decoded(&d),
                });
                // Width comes from the opcode, not the carry, so a listing
                // stays aligned even over a mis-flagged instruction.
                carry = d.step;
                pc += width;
            }
            None => {
                out.push(Line {
                    addr: pc as u32,
                    bytes: image[pc..pc + 2].to_vec(),
                    text: format!(".half {word:#06x}"),
                });
                carry = StepLen::INITIAL;
                pc += 2;
            }
        }
    }
    out
}
