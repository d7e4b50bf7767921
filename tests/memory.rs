use pretty_assertions::assert_eq;

use riscr::exec::IntExecutor;
use riscr::isa::riscr::RiscrDecoder;
use riscr::{Bus, Cpu, CpuConfig, LinearMemory, Trap};

const SP: u32 = 2;
const A0: u32 = 10;

fn enc_mswp(rd: u32, rb: u32, off: i16) -> u32 {
    (off as u16 as u32) << 16 | (rb << 12) | (rd << 8) | 0x29
}

#[test]
fn mswp_swaps_register_with_word_little_endian() {
    let mut mem = LinearMemory::new(0x200);
    // 0x0000: MSWP a0, -4(sp)
    // 0x0004: HLT (RETRO)
    mem.write_u32(0, enc_mswp(A0, SP, -4)).unwrap();
    mem.write_u16(4, 0x004F).unwrap();
    mem.write_u32(0xFC, 0x1122_3344).unwrap();

    let mut cpu = Cpu::new(CpuConfig::default());
    cpu.gpr[A0 as usize] = 0xDEAD_BEEF;
    cpu.gpr[SP as usize] = 0x100;
    cpu.run(&mut mem, &RiscrDecoder::new(), &IntExecutor).unwrap();

    assert_eq!(cpu.gpr[A0 as usize], 0x1122_3344);
    assert_eq!(mem.read_u32(0xFC).unwrap(), 0xDEAD_BEEF);
    assert_eq!(&mem.mem[0xFC..0x100], &[0xEF, 0xBE, 0xAD, 0xDE]);
    assert_eq!(cpu.gpr[SP as usize], 0x100);
}

#[test]
fn mswp_twice_restores_both_sides() {
    let mut mem = LinearMemory::new(0x100);
    mem.write_u32(0, enc_mswp(A0, SP, 0x40)).unwrap();
    mem.write_u32(4, enc_mswp(A0, SP, 0x40) | 0x40).unwrap();
    mem.write_u16(8, 0x004F).unwrap();
    mem.write_u32(0x40, 7).unwrap();

    let mut cpu = Cpu::new(CpuConfig::default());
    cpu.gpr[A0 as usize] = 9;
    cpu.run(&mut mem, &RiscrDecoder::new(), &IntExecutor).unwrap();
    assert_eq!(cpu.gpr[A0 as usize], 9);
    assert_eq!(mem.read_u32(0x40).unwrap(), 7);
}

#[test]
fn out_of_bounds_data_access_traps() {
    let cfg = CpuConfig::default();
    let mut mem = cfg.memory();
    mem.write_u32(0, enc_mswp(A0, SP, 0)).unwrap();
    let mut cpu = Cpu::new(cfg);
    cpu.gpr[SP as usize] = (1 << 20) - 2;
    let err = cpu
        .step(&mut mem, &RiscrDecoder::new(), &IntExecutor)
        .unwrap_err();
    assert!(matches!(err, Trap::Bus { addr: 0xF_FFFE, .. }));
    // the faulting instruction leaves state untouched
    assert_eq!(cpu.pc, 0);
    assert_eq!(cpu.gpr[A0 as usize], 0);
}

#[test]
fn running_off_the_end_of_memory_traps() {
    let mut mem = LinearMemory::new(4);
    mem.load(&[0x00, 0x00, 0x00, 0x00]).unwrap();
    let mut cpu = Cpu::new(CpuConfig::default());
    let err = cpu
        .run(&mut mem, &RiscrDecoder::new(), &IntExecutor)
        .unwrap_err();
    assert!(matches!(err, Trap::Bus { addr: 4, .. }));
}

#[test]
fn unknown_opcode_traps() {
    for raw in [0x0006u16, 0x003F, 0x0086] {
        let mut mem = LinearMemory::new(16);
        mem.write_u16(0, raw).unwrap();
        let mut cpu = Cpu::new(CpuConfig::default());
        let err = cpu
            .step(&mut mem, &RiscrDecoder::new(), &IntExecutor)
            .unwrap_err();
        assert!(
            matches!(err, Trap::InvalidInstruction { pc: 0, raw: r } if r == raw),
            "{raw:#06x}"
        );
    }
}

#[test]
fn opcode_bit_seven_is_ignored() {
    let mut mem = LinearMemory::new(16);
    // 0x0000: ADD a0, a1 with bit 7 set
    // 0x0002: HLT
    mem.load(&[0x81, 0xBA, 0x0F, 0x00]).unwrap();
    let mut cpu = Cpu::new(CpuConfig::default());
    cpu.gpr[A0 as usize] = 1;
    cpu.gpr[A0 as usize + 1] = 2;
    let steps = cpu.run(&mut mem, &RiscrDecoder::new(), &IntExecutor).unwrap();
    assert_eq!(steps, 2);
    assert_eq!(cpu.gpr[A0 as usize], 3);
    assert_eq!(cpu.pc, 4);
}

#[test]
fn linear_memory_bounds() {
    let mut mem = LinearMemory::new(8);
    assert!(mem.write_u32(4, 1).is_ok());
    assert!(mem.write_u32(5, 1).is_err());
    assert!(mem.read_u16(7).is_err());
    assert!(mem.read_u8(8).is_err());
    assert!(mem.read_u32(u32::MAX).is_err());
    assert!(mem.load(&[0; 9]).is_err());
    mem.write_u16(0, 0xBEEF).unwrap();
    assert_eq!(mem.read_u8(0).unwrap(), 0xEF);
    assert_eq!(mem.read_u8(1).unwrap(), 0xBE);
}
