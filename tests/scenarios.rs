//! End-to-end instruction sequences exercising full `step` cycles, mirroring
//! the worked examples used to validate this core against its reference.

use mos6502::{Bus, BusAccess, Cpu, RamBus, RecordingBus, StatusFlag};

fn cpu_at(bus: &mut RamBus, entry_pc: u16) -> Cpu {
    let mut cpu = Cpu::new();
    cpu.reset(bus, entry_pc);
    cpu
}

#[test]
fn immediate_load_then_branch_if_zero() {
    // LDA #$00 ; BEQ +2 ; LDA #$FF
    let mut bus = RamBus::new().with_memory_at(0x0400, &[0xA9, 0x00, 0xF0, 0x02, 0xA9, 0xFF]);
    let mut cpu = cpu_at(&mut bus, 0x0400);

    cpu.step(&mut bus).unwrap(); // LDA #$00
    cpu.step(&mut bus).unwrap(); // BEQ, taken since Z is set

    assert_eq!(cpu.a, 0x00);
    assert!(cpu.p.get(StatusFlag::Zero));
    assert_eq!(cpu.pc, 0x0406, "branch jumps clean over the skipped LDA #$FF");
}

#[test]
fn stack_roundtrip_through_pha_pla() {
    // LDA #$42 ; PHA ; LDA #$00 ; PLA
    let mut bus = RamBus::new().with_memory_at(0x0400, &[0xA9, 0x42, 0x48, 0xA9, 0x00, 0x68]);
    let mut cpu = cpu_at(&mut bus, 0x0400);

    cpu.step(&mut bus).unwrap(); // LDA #$42
    assert_eq!(cpu.a, 0x42);

    cpu.step(&mut bus).unwrap(); // PHA
    assert_eq!(bus.memory[0x01FD], 0x42);
    assert_eq!(cpu.sp, 0xFC);

    cpu.step(&mut bus).unwrap(); // LDA #$00
    assert_eq!(cpu.a, 0x00);

    cpu.step(&mut bus).unwrap(); // PLA
    assert_eq!(cpu.a, 0x42);
    assert_eq!(cpu.sp, 0xFD);
}

#[test]
fn jsr_lands_exactly_on_its_own_target_and_rts_returns_past_it() {
    // JSR $0405 ; (two padding bytes) ; RTS, where $0405 is the RTS itself.
    let mut bus = RamBus::new().with_memory_at(0x0400, &[0x20, 0x05, 0x04, 0x00, 0x00, 0x60]);
    let mut cpu = cpu_at(&mut bus, 0x0400);

    cpu.step(&mut bus).unwrap(); // JSR $0405

    assert_eq!(cpu.pc, 0x0405);
    assert_eq!(bus.memory[0x01FD], 0x04);
    assert_eq!(bus.memory[0x01FC], 0x02);
    assert_eq!(cpu.sp, 0xFB);

    cpu.step(&mut bus).unwrap(); // RTS

    assert_eq!(cpu.pc, 0x0403);
    assert_eq!(cpu.sp, 0xFD);
}

#[test]
fn adc_with_overflow() {
    let mut bus = RamBus::new().with_memory_at(0x0400, &[0x69, 0x50]); // ADC #$50
    let mut cpu = cpu_at(&mut bus, 0x0400);
    cpu.a = 0x50;

    cpu.step(&mut bus).unwrap();

    assert_eq!(cpu.a, 0xA0);
    assert!(cpu.p.get(StatusFlag::Negative));
    assert!(cpu.p.get(StatusFlag::Overflow));
    assert!(!cpu.p.get(StatusFlag::Carry));
    assert!(!cpu.p.get(StatusFlag::Zero));
}

#[test]
fn compare_then_branch_skips_to_the_following_load() {
    // CMP #$10 ; BEQ +2 ; NOP ; NOP ; LDA #$01
    let mut bus = RamBus::new()
        .with_memory_at(0x0400, &[0xC9, 0x10, 0xF0, 0x02, 0xEA, 0xEA, 0xA9, 0x01]);
    let mut cpu = cpu_at(&mut bus, 0x0400);
    cpu.a = 0x10;

    cpu.step(&mut bus).unwrap(); // CMP #$10
    assert!(cpu.p.get(StatusFlag::Zero));
    assert!(cpu.p.get(StatusFlag::Carry));

    cpu.step(&mut bus).unwrap(); // BEQ, taken
    assert_eq!(cpu.pc, 0x0406);

    cpu.step(&mut bus).unwrap(); // LDA #$01
    assert_eq!(cpu.a, 0x01);
}

#[test]
fn jsr_issues_operand_reads_before_a_high_then_low_push() {
    // JSR $1234
    let mut bus = RecordingBus::new().with_memory_at(0x0400, &[0x20, 0x34, 0x12]);
    let mut cpu = Cpu::new();
    cpu.reset(&mut bus, 0x0400);

    cpu.step(&mut bus).unwrap();

    assert_eq!(
        bus.log,
        vec![
            BusAccess::Read { address: 0x0400 }, // opcode fetch
            BusAccess::Read { address: 0x0401 }, // target lo
            BusAccess::Read { address: 0x0402 }, // target hi
            BusAccess::Write { address: 0x01FD, value: 0x04 }, // return-point hi
            BusAccess::Write { address: 0x01FC, value: 0x02 }, // return-point lo
        ]
    );
}

#[test]
fn brk_pushes_pc_then_status_before_reading_the_vector() {
    let mut bus = RecordingBus::new().with_memory_at(0x0400, &[0x00]);
    let mut cpu = Cpu::new();
    cpu.reset(&mut bus, 0x0400);

    cpu.step(&mut bus).unwrap();

    assert_eq!(
        bus.log,
        vec![
            BusAccess::Read { address: 0x0400 }, // opcode fetch
            BusAccess::Write { address: 0x01FD, value: 0x04 }, // pc+1 hi
            BusAccess::Write { address: 0x01FC, value: 0x01 }, // pc+1 lo
            BusAccess::Write { address: 0x01FB, value: 0x30 }, // status, Break+Unused forced
            BusAccess::Read { address: 0xFFFE }, // vector lo
            BusAccess::Read { address: 0xFFFF }, // vector hi
        ]
    );
}

#[test]
fn zero_page_x_indexed_load_wraps_within_page_zero() {
    // LDA $81,X with X=$FF ; effective address wraps to $80.
    let mut bus = RamBus::new()
        .with_memory_at(0x0080, &[0x99])
        .with_memory_at(0x0400, &[0xB5, 0x81]);
    let mut cpu = cpu_at(&mut bus, 0x0400);
    cpu.x = 0xFF;

    cpu.step(&mut bus).unwrap();

    assert_eq!(cpu.a, 0x99);
}
