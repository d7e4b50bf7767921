use pretty_assertions::assert_eq;

use riscr::decoder::{Decoder, StepLen};
use riscr::exec::IntExecutor;
use riscr::image::parse_hex;
use riscr::isa::riscr::{reg_index, RiscrDecoder};
use riscr::{Cpu, CpuConfig};
use riscr_asm::{assemble, AsmError};

fn run(src: &str) -> Cpu {
    let program = assemble(src).unwrap();
    let cfg = CpuConfig {
        step_budget: Some(10_000),
        ..CpuConfig::default()
    };
    let mut mem = cfg.memory();
    mem.load(&program.bytes()).unwrap();
    let mut cpu = Cpu::new(cfg);
    cpu.run(&mut mem, &RiscrDecoder::new(), &IntExecutor).unwrap();
    cpu
}

fn reg(cpu: &Cpu, name: &str) -> u32 {
    cpu.gpr[reg_index(name).unwrap() as usize]
}

#[test]
fn addi_addi_hlt_end_to_end() {
    let src = "ADDI a0, a0, 5\nADDI a0, a0, 10\nHLT\n";
    let program = assemble(src).unwrap();
    assert_eq!(
        program.bytes(),
        vec![0x21, 0x0A, 0x05, 0x00, 0x61, 0x0A, 0x0A, 0x00, 0x4F, 0x00]
    );
    assert_eq!(program.to_hex(), "21 0A 05 00\n61 0A 0A 00\n4F 00");

    let cpu = run(src);
    assert!(cpu.is_halted());
    assert_eq!(reg(&cpu, "a0"), 15);
    assert_eq!(cpu.pc, 10);
}

#[test]
fn hex_image_round_trips() {
    let program = assemble("ADDI t0, 0x1F\nSWP t0, t1\nJMP 0\nHLT").unwrap();
    assert_eq!(parse_hex(&program.to_hex()).unwrap(), program.bytes());
    assert_eq!(program.len(), 12);
}

#[test]
fn forward_jump_skips_dead_code() {
    let src = "
        JMP skip              ; 0x00
        ADDI a0, 0x63         ; 0x04 dead
        XORI a1, 0xFF         ; 0x08 dead
        JNE zero, zero, skip  ; 0x0C label site, never taken
        ADDI a2, 1            ; 0x10
        HLT                   ; 0x14
    ";
    let program = assemble(src).unwrap();
    // distance from the instruction after the jump (0x04) to the label site (0x0C)
    assert_eq!(program.records[0], vec![0x36, 0x00, 0x08, 0x00]);

    let cpu = run(src);
    assert_eq!(reg(&cpu, "a0"), 0);
    assert_eq!(reg(&cpu, "a1"), 0);
    assert_eq!(reg(&cpu, "a2"), 1);
    assert_eq!(cpu.pc, 0x16);
}

#[test]
fn loop_label_resolves_forward_then_backward() {
    let src = "
        ADDI a0, 5            ; 0x00 counter
        JMP loop              ; 0x04 declare: enter at the test
        ADDI a1, 3            ; 0x08 loop head
        SUBI a0, 1            ; 0x0C
        JNE a0, zero, loop    ; 0x10 back edge
        HLT                   ; 0x14
    ";
    let program = assemble(src).unwrap();
    assert_eq!(program.records[1], vec![0x76, 0x00, 0x08, 0x00]);
    assert_eq!(program.records[4], vec![0x71, 0x0A, 0xF4, 0xFF]);

    // back edge: 0x10 + 4 - 12 = 0x08, the loop head
    let disp = i16::from_le_bytes([program.records[4][2], program.records[4][3]]);
    assert!(disp < 0);
    assert_eq!(0x10 + 4 + disp as i32, 0x08);

    let cpu = run(src);
    assert_eq!(reg(&cpu, "a0"), 0);
    assert_eq!(reg(&cpu, "a1"), 15);
}

#[test]
fn loop_over_mixed_widths() {
    let src = "
        ADDI t0, 4            ; 0x00
        JMP sum               ; 0x04
        ADD a0, t0            ; 0x08 2 bytes, RETRO
        SUBI t0, 1            ; 0x0A
        JNE t0, zero, sum     ; 0x0E
        SWP a0, a1            ; 0x12
        HLT                   ; 0x14
    ";
    let program = assemble(src).unwrap();
    let opcodes: Vec<u8> = program.records.iter().map(|r| r[0]).collect();
    assert_eq!(opcodes, vec![0x21, 0x76, 0x41, 0x22, 0x71, 0x48, 0x0F]);

    let cpu = run(src);
    assert_eq!(reg(&cpu, "a0"), 0);
    assert_eq!(reg(&cpu, "a1"), 4 + 3 + 2 + 1);
    assert_eq!(cpu.pc, 0x16);
}

#[test]
fn memory_swap_through_stack_pointer() {
    let src = "
        ADDI sp, 0x100
        ADDI a0, 0x1234
        MSWP a0, -4(sp)       ; stash a0, a0 <- 0
        ADDI a1, 0x55
        MSWP a1, -4(sp)       ; a1 <- 0x1234
        HLT
    ";
    let cpu = run(src);
    assert_eq!(reg(&cpu, "a0"), 0);
    assert_eq!(reg(&cpu, "a1"), 0x1234);
}

#[test]
fn rotate_round_trip_via_assembler() {
    for n in 0..32 {
        let src = format!("ADDI s0, 0x7ABC\nROLI s0, {n}\nRORI s0, {n}\nHLT");
        assert_eq!(reg(&run(&src), "s0"), 0x7ABC, "n = {n}");
    }
}

#[test]
fn immediates_decode_to_what_was_written() {
    let dec = RiscrDecoder::new();
    for imm in [0u32, 1, 0xFF, 0x100, 0x7FFF, 0x8000, 0xFFFE, 0xFFFF] {
        let bytes = assemble(&format!("ADDI a0, {imm:#x}")).unwrap().bytes();
        let raw = u32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]);
        let d = dec.decode(raw, StepLen::INITIAL).unwrap();
        assert_eq!(d.ext as u16 as u32, imm);
    }
    assert_eq!(
        assemble("ADDI a0, 0x10000").unwrap_err(),
        AsmError::OutOfRange { line: 1, what: "immediate", value: 0x10000 }
    );
    assert_eq!(
        assemble("ADDI a0, 99999999999999999999").unwrap_err(),
        AsmError::OutOfRange { line: 1, what: "integer", value: i64::MAX }
    );
}

#[test]
fn any_error_aborts_the_whole_file() {
    assert_eq!(
        assemble("ADDI a0, 1\nFOO a0\nHLT").unwrap_err(),
        AsmError::UnknownInstruction { line: 2, mnemonic: "FOO".into() }
    );
    assert_eq!(
        assemble("ADD a0, bogus").unwrap_err(),
        AsmError::UnknownRegister { line: 1, name: "bogus".into() }
    );
    assert!(matches!(
        assemble("JMP once\nHLT"),
        Err(AsmError::DanglingLabel { line: 1, .. })
    ));
}

#[test]
fn empty_source_is_empty_program() {
    let program = assemble("; nothing here\n\n").unwrap();
    assert!(program.is_empty());
    assert_eq!(program.to_hex(), "");
}
