use pretty_assertions::assert_eq;

use riscr::decoder::{Decoder, StepLen};
use riscr::disasm::{fmt_decoded, listing};
use riscr::isa::riscr::RiscrDecoder;

#[test]
fn disasm_addi_and_branch() {
    let dec = RiscrDecoder::new();
    // ADDI s3, 0x10
    let addi = (0x10u32 << 16) | (15u32 << 8) | 0x21;
    let d = dec.decode(addi, StepLen::INITIAL).unwrap();
    assert_eq!(fmt_decoded(&d), "addi s3, 0x10");

    // JLE a2, a3, +0x20 with RETRO set
    let jle = (0x20u32 << 16) | (13u32 << 12) | (12u32 << 8) | 0x74;
    let d2 = dec.decode(jle, StepLen(4)).unwrap();
    assert_eq!(fmt_decoded(&d2), "jle a2, a3, +0x20");
    assert_eq!(d2.step, StepLen(4));
}

#[test]
fn listing_walks_mixed_widths() {
    let image = [
        0x01, 0xBA, // add a0, a1
        0x25, 0x05, 0x03, 0x00, // rori t0, 0x3
        0x48, 0x65, // swp t0, t1 (RETRO)
        0x0F, 0x00, // hlt
    ];
    let lines = listing(&image);
    let addrs: Vec<u32> = lines.iter().map(|l| l.addr).collect();
    assert_eq!(addrs, vec![0, 2, 6, 8]);
    assert_eq!(lines[1].text, "rori t0, 0x3");
    assert_eq!(lines[1].bytes, vec![0x25, 0x05, 0x03, 0x00]);
    assert_eq!(lines[2].text, "swp t0, t1");
    assert_eq!(lines[3].text, "hlt");
}
