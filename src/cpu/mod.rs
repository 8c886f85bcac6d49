pub mod addressing;
pub mod dispatch;
pub mod error;
pub mod opcode;
pub mod operand;
pub mod register;
pub mod status;

use crate::bus::Bus;

pub use addressing::AddressingMode;
pub use dispatch::InstructionSignature;
pub use error::Error;
pub use opcode::Opcode;
pub use operand::Operand;
pub use register::Register;
pub use status::{Status, StatusFlag};

pub type Result<A> = std::result::Result<A, Error>;

const STACK_PAGE: u16 = 0x0100;
const IRQ_VECTOR_ADDRESS: u16 = 0xFFFE;

/// The full architectural state of a MOS 6502: the six registers, nothing
/// else. The core holds no memory of its own — every byte it reads or
/// writes goes through the `Bus` the caller hands to `reset`/`step`.
#[derive(Debug, Clone, Copy)]
pub struct Cpu {
    /// Program counter: address of the next byte to fetch.
    pub pc: u16,

    /// Accumulator.
    pub a: u8,

    /// Index register X.
    pub x: u8,

    /// Index register Y.
    pub y: u8,

    /// Stack pointer. The stack lives in page 1 (`0x0100`-`0x01FF`);
    /// accesses target `0x0100 + sp`.
    pub sp: u8,

    /// Processor status register (`NV-BDIZC`).
    pub p: Status,
}

impl Cpu {
    /// A freshly zeroed CPU. Callers must `reset` before the first `step`.
    pub fn new() -> Cpu {
        Cpu {
            pc: 0,
            a: 0,
            x: 0,
            y: 0,
            sp: 0,
            p: Status(0),
        }
    }

    /// Initialize register state the way this core's validated reference
    /// does: `a = x = y = 0`, `sp = 0xFD`, `p` with only the unused bit
    /// set, `pc = entry_pc`. The `I` flag is deliberately left clear — see
    /// [`Cpu::reset_strict`] for the hardware-accurate alternative.
    pub fn reset(&mut self, _bus: &mut impl Bus, entry_pc: u16) {
        self.a = 0;
        self.x = 0;
        self.y = 0;
        self.sp = 0xFD;
        self.p = Status::default();
        self.pc = entry_pc;
    }

    /// Same as [`Cpu::reset`], but also sets the `I` (interrupt-disable)
    /// flag, matching real silicon's reset behavior.
    pub fn reset_strict(&mut self, bus: &mut impl Bus, entry_pc: u16) {
        self.reset(bus, entry_pc);
        self.p.set(StatusFlag::InterruptDisable, true);
    }

    /// Fetch, decode, and execute exactly one instruction.
    ///
    /// On `Error::IllegalOpcode` the register file is left exactly as it
    /// was before the failed decode — only the opcode byte itself was read
    /// from the bus and `pc` advanced past it; no other register was
    /// mutated and no operand or effective-address access occurred.
    pub fn step(&mut self, bus: &mut impl Bus) -> Result<()> {
        let opcode_pc = self.pc;
        let opcode_byte = self.fetch_u8(bus);
        let signature = InstructionSignature::decode(opcode_byte, opcode_pc)?;

        let operand = signature.addressing_mode.resolve(self, bus);
        self.execute(signature.opcode, operand, bus);

        Ok(())
    }

    fn fetch_u8(&mut self, bus: &mut impl Bus) -> u8 {
        let value = bus.read_u8(self.pc);
        self.pc = self.pc.wrapping_add(1);
        value
    }

    fn fetch_u16(&mut self, bus: &mut impl Bus) -> u16 {
        let lo = self.fetch_u8(bus);
        let hi = self.fetch_u8(bus);
        u16::from_le_bytes([lo, hi])
    }

    fn read_register(&self, register: Register) -> u8 {
        match register {
            Register::A => self.a,
            Register::X => self.x,
            Register::Y => self.y,
            Register::Sp => self.sp,
            Register::P => self.p.0,
        }
    }

    fn write_register(&mut self, register: Register, value: u8) {
        match register {
            Register::A => self.a = value,
            Register::X => self.x = value,
            Register::Y => self.y = value,
            Register::Sp => self.sp = value,
            Register::P => self.p = Status(value),
        }
    }

    fn push_u8(&mut self, bus: &mut impl Bus, value: u8) {
        bus.write_u8(STACK_PAGE + self.sp as u16, value);
        self.sp = self.sp.wrapping_sub(1);
    }

    fn pull_u8(&mut self, bus: &mut impl Bus) -> u8 {
        self.sp = self.sp.wrapping_add(1);
        bus.read_u8(STACK_PAGE + self.sp as u16)
    }

    fn push_u16(&mut self, bus: &mut impl Bus, value: u16) {
        let [lo, hi] = value.to_le_bytes();
        self.push_u8(bus, hi);
        self.push_u8(bus, lo);
    }

    fn pull_u16(&mut self, bus: &mut impl Bus) -> u16 {
        let lo = self.pull_u8(bus);
        let hi = self.pull_u8(bus);
        u16::from_le_bytes([lo, hi])
    }

    fn set_nz(&mut self, value: u8) {
        self.p.set(StatusFlag::Zero, value == 0);
        self.p.set(StatusFlag::Negative, value & 0b1000_0000 != 0);
    }

    fn execute(&mut self, opcode: Opcode, operand: Operand, bus: &mut impl Bus) {
        match opcode {
            Opcode::LDA => self.op_load(Register::A, operand, bus),
            Opcode::LDX => self.op_load(Register::X, operand, bus),
            Opcode::LDY => self.op_load(Register::Y, operand, bus),

            Opcode::STA => self.op_store(Register::A, operand, bus),
            Opcode::STX => self.op_store(Register::X, operand, bus),
            Opcode::STY => self.op_store(Register::Y, operand, bus),

            Opcode::TAX => self.op_transfer(Register::A, Register::X),
            Opcode::TAY => self.op_transfer(Register::A, Register::Y),
            Opcode::TXA => self.op_transfer(Register::X, Register::A),
            Opcode::TYA => self.op_transfer(Register::Y, Register::A),
            Opcode::TSX => self.op_transfer(Register::Sp, Register::X),

            // `TXS` is the one transfer that does not touch NZ.
            Opcode::TXS => self.sp = self.x,

            Opcode::PHA => self.push_u8(bus, self.a),
            Opcode::PLA => self.op_pull_into(Register::A, bus),
            Opcode::PHP => self.op_push_status(bus),
            Opcode::PLP => self.op_pull_status(bus, false),

            Opcode::AND => self.op_logical(operand, bus, |a, m| a & m),
            Opcode::ORA => self.op_logical(operand, bus, |a, m| a | m),
            Opcode::EOR => self.op_logical(operand, bus, |a, m| a ^ m),
            Opcode::BIT => self.op_bit(operand, bus),

            Opcode::ADC => self.op_add(operand, bus),
            Opcode::SBC => self.op_subtract(operand, bus),

            Opcode::CMP => self.op_compare(self.a, operand, bus),
            Opcode::CPX => self.op_compare(self.x, operand, bus),
            Opcode::CPY => self.op_compare(self.y, operand, bus),

            Opcode::INC => self.op_modify(operand, bus, |v| v.wrapping_add(1)),
            Opcode::DEC => self.op_modify(operand, bus, |v| v.wrapping_sub(1)),
            Opcode::INX => self.op_increment_register(Register::X, 1),
            Opcode::INY => self.op_increment_register(Register::Y, 1),
            Opcode::DEX => self.op_increment_register(Register::X, -1),
            Opcode::DEY => self.op_increment_register(Register::Y, -1),

            Opcode::ASL => self.op_shift_left(operand, bus),
            Opcode::LSR => self.op_shift_right(operand, bus),
            Opcode::ROL => self.op_rotate_left(operand, bus),
            Opcode::ROR => self.op_rotate_right(operand, bus),

            Opcode::BPL => self.op_branch_if(!self.p.get(StatusFlag::Negative), operand),
            Opcode::BMI => self.op_branch_if(self.p.get(StatusFlag::Negative), operand),
            Opcode::BVC => self.op_branch_if(!self.p.get(StatusFlag::Overflow), operand),
            Opcode::BVS => self.op_branch_if(self.p.get(StatusFlag::Overflow), operand),
            Opcode::BCC => self.op_branch_if(!self.p.get(StatusFlag::Carry), operand),
            Opcode::BCS => self.op_branch_if(self.p.get(StatusFlag::Carry), operand),
            Opcode::BNE => self.op_branch_if(!self.p.get(StatusFlag::Zero), operand),
            Opcode::BEQ => self.op_branch_if(self.p.get(StatusFlag::Zero), operand),

            Opcode::JMP => self.pc = operand_address(operand),
            Opcode::JSR => self.op_jump_subroutine(operand, bus),
            Opcode::RTS => self.op_return(bus),

            Opcode::BRK => self.op_break(bus),
            Opcode::RTI => self.op_return_from_interrupt(bus),

            Opcode::CLC => self.p.set(StatusFlag::Carry, false),
            Opcode::SEC => self.p.set(StatusFlag::Carry, true),
            Opcode::CLD => self.p.set(StatusFlag::DecimalMode, false),
            Opcode::SED => self.p.set(StatusFlag::DecimalMode, true),
            Opcode::CLI => self.p.set(StatusFlag::InterruptDisable, false),
            Opcode::SEI => self.p.set(StatusFlag::InterruptDisable, true),
            Opcode::CLV => self.p.set(StatusFlag::Overflow, false),

            Opcode::NOP => {}
        }
    }

    fn op_load(&mut self, register: Register, operand: Operand, bus: &mut impl Bus) {
        let value = operand.load(self, bus);
        self.write_register(register, value);
        self.set_nz(value);
    }

    fn op_store(&mut self, register: Register, operand: Operand, bus: &mut impl Bus) {
        let value = self.read_register(register);
        operand.store(self, bus, value);
    }

    fn op_transfer(&mut self, from: Register, to: Register) {
        let value = self.read_register(from);
        self.write_register(to, value);
        self.set_nz(value);
    }

    fn op_pull_into(&mut self, register: Register, bus: &mut impl Bus) {
        let value = self.pull_u8(bus);
        self.write_register(register, value);
        self.set_nz(value);
    }

    /// `PHP` pushes `P` with the `Break` and unused bits forced set; those
    /// two bits have no storage in `P` itself and exist only on the stack.
    fn op_push_status(&mut self, bus: &mut impl Bus) {
        let mut pushed = self.p;
        pushed.set(StatusFlag::Break, true);
        pushed.set(StatusFlag::Unused, true);
        self.push_u8(bus, pushed.0);
    }

    /// Restores `P` from the stack, forcing the unused bit set and the
    /// `Break` bit to `forced_break`. `PLP` forces it clear (`Break` is a
    /// stack-only artifact); `RTI` forces it set, per this core's
    /// validated reference.
    fn op_pull_status(&mut self, bus: &mut impl Bus, forced_break: bool) {
        let mut status = Status(self.pull_u8(bus));
        status.set(StatusFlag::Unused, true);
        status.set(StatusFlag::Break, forced_break);
        self.p = status;
    }

    fn op_logical(&mut self, operand: Operand, bus: &mut impl Bus, f: impl FnOnce(u8, u8) -> u8) {
        let value = operand.load(self, bus);
        self.a = f(self.a, value);
        self.set_nz(self.a);
    }

    fn op_bit(&mut self, operand: Operand, bus: &mut impl Bus) {
        let value = operand.load(self, bus);
        self.p.set(StatusFlag::Negative, value & 0b1000_0000 != 0);
        self.p.set(StatusFlag::Overflow, value & 0b0100_0000 != 0);
        self.p.set(StatusFlag::Zero, (self.a & value) == 0);
    }

    fn op_add(&mut self, operand: Operand, bus: &mut impl Bus) {
        let value = operand.load(self, bus);
        let (result, carry, overflow) = add_with_carry(self.a, value, self.p.get(StatusFlag::Carry));
        self.a = result;
        self.p.set(StatusFlag::Carry, carry);
        self.p.set(StatusFlag::Overflow, overflow);
        self.set_nz(self.a);
    }

    /// `SBC m` is `ADC(!m)`: subtraction is addition of the one's
    /// complement, with the incoming `Carry` acting as the "not borrow"
    /// flag, exactly as the reference instruction set treats it.
    fn op_subtract(&mut self, operand: Operand, bus: &mut impl Bus) {
        let value = operand.load(self, bus);
        let (result, carry, overflow) = add_with_carry(self.a, !value, self.p.get(StatusFlag::Carry));
        self.a = result;
        self.p.set(StatusFlag::Carry, carry);
        self.p.set(StatusFlag::Overflow, overflow);
        self.set_nz(self.a);
    }

    fn op_compare(&mut self, register_value: u8, operand: Operand, bus: &mut impl Bus) {
        let value = operand.load(self, bus);
        let result = register_value.wrapping_sub(value);
        self.p.set(StatusFlag::Carry, register_value >= value);
        self.set_nz(result);
    }

    fn op_modify(&mut self, operand: Operand, bus: &mut impl Bus, f: impl FnOnce(u8) -> u8) {
        let (_, output) = operand.modify(self, bus, f);
        self.set_nz(output);
    }

    fn op_increment_register(&mut self, register: Register, delta: i8) {
        let value = self.read_register(register).wrapping_add(delta as u8);
        self.write_register(register, value);
        self.set_nz(value);
    }

    fn op_shift_left(&mut self, operand: Operand, bus: &mut impl Bus) {
        let (input, output) = operand.modify(self, bus, |v| v << 1);
        self.p.set(StatusFlag::Carry, input & 0b1000_0000 != 0);
        self.set_nz(output);
    }

    fn op_shift_right(&mut self, operand: Operand, bus: &mut impl Bus) {
        let (input, output) = operand.modify(self, bus, |v| v >> 1);
        self.p.set(StatusFlag::Carry, input & 0b0000_0001 != 0);
        self.set_nz(output);
    }

    fn op_rotate_left(&mut self, operand: Operand, bus: &mut impl Bus) {
        let carry_in = self.p.get(StatusFlag::Carry) as u8;
        let (input, output) = operand.modify(self, bus, |v| (v << 1) | carry_in);
        self.p.set(StatusFlag::Carry, input & 0b1000_0000 != 0);
        self.set_nz(output);
    }

    fn op_rotate_right(&mut self, operand: Operand, bus: &mut impl Bus) {
        let carry_in = self.p.get(StatusFlag::Carry) as u8;
        let (input, output) = operand.modify(self, bus, |v| (v >> 1) | (carry_in << 7));
        self.p.set(StatusFlag::Carry, input & 0b0000_0001 != 0);
        self.set_nz(output);
    }

    fn op_branch_if(&mut self, condition: bool, operand: Operand) {
        if condition {
            self.pc = operand_address(operand);
        }
    }

    /// `JSR` saves the address of the *last byte of the JSR instruction*
    /// (`pc - 1`, since `pc` has already advanced past the full 3-byte
    /// instruction by the time the addressing mode resolved), not the
    /// address of the following instruction.
    fn op_jump_subroutine(&mut self, operand: Operand, bus: &mut impl Bus) {
        let return_point = self.pc.wrapping_sub(1);
        self.push_u16(bus, return_point);
        self.pc = operand_address(operand);
    }

    fn op_return(&mut self, bus: &mut impl Bus) {
        let raw = self.pull_u16(bus);
        self.pc = raw.wrapping_add(1);
    }

    /// `BRK` is this core's only entry into the IRQ vector: it pushes
    /// `pc + 1` (the byte after the signature byte is conventionally a
    /// padding byte, skipped), pushes `P` with `Break` and the unused bit
    /// forced set, sets `I`, then jumps through `0xFFFE`/`0xFFFF`.
    fn op_break(&mut self, bus: &mut impl Bus) {
        let return_point = self.pc.wrapping_add(1);
        self.push_u16(bus, return_point);
        self.op_push_status(bus);
        self.p.set(StatusFlag::InterruptDisable, true);
        self.pc = bus.read_u16(IRQ_VECTOR_ADDRESS);
    }

    /// `RTI` pulls `P` (forcing `Break` and unused both set) then `pc`,
    /// with no `+1` adjustment — unlike `RTS`, the pushed `pc` already
    /// points at the instruction to resume at.
    fn op_return_from_interrupt(&mut self, bus: &mut impl Bus) {
        self.op_pull_status(bus, true);
        self.pc = self.pull_u16(bus);
    }
}

impl Default for Cpu {
    fn default() -> Cpu {
        Cpu::new()
    }
}

fn operand_address(operand: Operand) -> u16 {
    match operand {
        Operand::Memory(address) => address,
        _ => unreachable!("branch/jump addressing modes always resolve to Operand::Memory"),
    }
}

/// Shared addition core for `ADC`/`SBC` (the latter adds the bitwise NOT
/// of its operand). Returns `(result, carry_out, overflow)`.
fn add_with_carry(a: u8, m: u8, carry_in: bool) -> (u8, bool, bool) {
    let sum = a as u16 + m as u16 + carry_in as u16;
    let result = sum as u8;
    let carry_out = sum > 0xFF;
    let overflow = (a ^ result) & (m ^ result) & 0b1000_0000 != 0;
    (result, carry_out, overflow)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bus::RamBus;

    #[test]
    pub fn reset_initializes_registers_per_spec() {
        let mut cpu = Cpu::new();
        let mut bus = RamBus::new();

        cpu.reset(&mut bus, 0x8000);

        assert_eq!(cpu.pc, 0x8000);
        assert_eq!(cpu.a, 0);
        assert_eq!(cpu.x, 0);
        assert_eq!(cpu.y, 0);
        assert_eq!(cpu.sp, 0xFD);
        assert_eq!(cpu.p, Status(0x20));
    }

    #[test]
    pub fn reset_strict_also_sets_interrupt_disable() {
        let mut cpu = Cpu::new();
        let mut bus = RamBus::new();

        cpu.reset_strict(&mut bus, 0x8000);

        assert!(cpu.p.get(StatusFlag::InterruptDisable));
    }

    #[test]
    pub fn op_load_immediate_sets_register_and_flags() {
        let mut bus = RamBus::new().with_memory_at(0x0400, &[0xA9, 0x00]);
        let mut cpu = Cpu::new();
        cpu.reset(&mut bus, 0x0400);

        cpu.step(&mut bus).unwrap();

        assert_eq!(cpu.a, 0x00);
        assert!(cpu.p.get(StatusFlag::Zero));
        assert!(!cpu.p.get(StatusFlag::Negative));
        assert_eq!(cpu.pc, 0x0402);
    }

    #[test]
    pub fn op_store_zero_page_writes_through_the_bus() {
        let mut bus = RamBus::new().with_memory_at(0x0400, &[0x85, 0x10]);
        let mut cpu = Cpu::new();
        cpu.reset(&mut bus, 0x0400);
        cpu.a = 0x42;

        cpu.step(&mut bus).unwrap();

        assert_eq!(bus.memory[0x0010], 0x42);
    }

    #[test]
    pub fn op_jump_subroutine_and_return_round_trips_pc() {
        // 0x0400: JSR 0x0500 ; RTS is the first byte at 0x0500.
        let mut bus = RamBus::new()
            .with_memory_at(0x0400, &[0x20, 0x00, 0x05])
            .with_memory_at(0x0500, &[0x60]);
        let mut cpu = Cpu::new();
        cpu.reset(&mut bus, 0x0400);

        cpu.step(&mut bus).unwrap(); // JSR
        assert_eq!(cpu.pc, 0x0500);
        assert_eq!(cpu.sp, 0xFB);
        assert_eq!(bus.memory[0x01FD], 0x04);
        assert_eq!(bus.memory[0x01FC], 0x02);

        cpu.step(&mut bus).unwrap(); // RTS
        assert_eq!(cpu.pc, 0x0403);
        assert_eq!(cpu.sp, 0xFD);
    }

    #[test]
    pub fn op_push_pull_accumulator_round_trips() {
        let mut bus = RamBus::new().with_memory_at(0x0400, &[0x48, 0x68]);
        let mut cpu = Cpu::new();
        cpu.reset(&mut bus, 0x0400);
        cpu.a = 0x37;

        cpu.step(&mut bus).unwrap(); // PHA
        cpu.a = 0x00;
        cpu.step(&mut bus).unwrap(); // PLA

        assert_eq!(cpu.a, 0x37);
        assert_eq!(cpu.sp, 0xFD);
    }

    #[test]
    pub fn php_sets_break_and_unused_bits_only_on_the_pushed_copy() {
        let mut bus = RamBus::new().with_memory_at(0x0400, &[0x08]);
        let mut cpu = Cpu::new();
        cpu.reset(&mut bus, 0x0400);
        cpu.p = Status(0);

        cpu.step(&mut bus).unwrap(); // PHP

        let pushed = bus.memory[0x01FD];
        assert_eq!(pushed, 0b0011_0000);
        assert_eq!(cpu.p, Status(0), "PHP must not mutate the live P register");
    }

    #[test]
    pub fn plp_forces_unused_set_and_break_clear() {
        let mut bus = RamBus::new().with_memory_at(0x0400, &[0x28]);
        let mut cpu = Cpu::new();
        cpu.reset(&mut bus, 0x0400);
        cpu.sp = 0xFC;
        bus.memory[0x01FD] = 0xFF;

        cpu.step(&mut bus).unwrap(); // PLP

        assert!(cpu.p.get(StatusFlag::Unused));
        assert!(!cpu.p.get(StatusFlag::Break));
    }

    #[test]
    pub fn brk_pushes_pc_plus_one_then_status_and_sets_interrupt_disable() {
        let mut bus = RamBus::new()
            .with_memory_at(0x0400, &[0x00, 0x00])
            .with_memory_at(0xFFFE, &[0x00, 0x06]);
        let mut cpu = Cpu::new();
        cpu.reset(&mut bus, 0x0400);

        cpu.step(&mut bus).unwrap();

        assert_eq!(cpu.pc, 0x0600);
        assert!(cpu.p.get(StatusFlag::InterruptDisable));
        assert_eq!(bus.memory[0x01FD], 0x04);
        assert_eq!(bus.memory[0x01FC], 0x02);
    }

    #[test]
    pub fn rti_restores_pc_with_no_plus_one_adjustment() {
        let mut bus = RamBus::new().with_memory_at(0x0400, &[0x40]);
        let mut cpu = Cpu::new();
        cpu.reset(&mut bus, 0x0400);
        cpu.sp = 0xFC;
        bus.memory[0x01FD] = 0x00; // pushed status
        bus.memory[0x01FE] = 0x34; // pc lo
        bus.memory[0x01FF] = 0x12; // pc hi

        cpu.step(&mut bus).unwrap();

        assert_eq!(cpu.pc, 0x1234);
    }

    #[test]
    pub fn rti_forces_unused_and_break_both_set() {
        let mut bus = RamBus::new().with_memory_at(0x0400, &[0x40]);
        let mut cpu = Cpu::new();
        cpu.reset(&mut bus, 0x0400);
        cpu.sp = 0xFC;
        bus.memory[0x01FD] = 0x00; // pushed status, Break and Unused both clear
        bus.memory[0x01FE] = 0x00;
        bus.memory[0x01FF] = 0x00;

        cpu.step(&mut bus).unwrap();

        assert!(cpu.p.get(StatusFlag::Unused));
        assert!(cpu.p.get(StatusFlag::Break));
    }

    #[test]
    pub fn adc_sets_carry_and_overflow_on_signed_overflow() {
        let mut bus = RamBus::new().with_memory_at(0x0400, &[0x69, 0x50]);
        let mut cpu = Cpu::new();
        cpu.reset(&mut bus, 0x0400);
        cpu.a = 0x50; // 0x50 + 0x50 = 0xA0, signed overflow (+ + + => -)

        cpu.step(&mut bus).unwrap();

        assert_eq!(cpu.a, 0xA0);
        assert!(!cpu.p.get(StatusFlag::Carry));
        assert!(cpu.p.get(StatusFlag::Overflow));
        assert!(cpu.p.get(StatusFlag::Negative));
    }

    #[test]
    pub fn sbc_without_incoming_borrow_subtracts_one_extra() {
        let mut bus = RamBus::new().with_memory_at(0x0400, &[0xE9, 0x01]);
        let mut cpu = Cpu::new();
        cpu.reset(&mut bus, 0x0400);
        cpu.a = 0x05;
        cpu.p.set(StatusFlag::Carry, false); // Carry clear means a borrow is pending

        cpu.step(&mut bus).unwrap();

        assert_eq!(cpu.a, 0x03); // 5 - 1 - 1
        assert!(cpu.p.get(StatusFlag::Carry)); // no further borrow needed
    }

    #[test]
    pub fn cmp_sets_carry_when_register_is_greater_or_equal() {
        let mut bus = RamBus::new().with_memory_at(0x0400, &[0xC9, 0x10]);
        let mut cpu = Cpu::new();
        cpu.reset(&mut bus, 0x0400);
        cpu.a = 0x10;

        cpu.step(&mut bus).unwrap();

        assert!(cpu.p.get(StatusFlag::Carry));
        assert!(cpu.p.get(StatusFlag::Zero));
        assert_eq!(cpu.a, 0x10, "CMP must not mutate the accumulator");
    }

    #[test]
    pub fn nop_only_advances_pc() {
        let mut bus = RamBus::new().with_memory_at(0x0400, &[0xEA]);
        let mut cpu = Cpu::new();
        cpu.reset(&mut bus, 0x0400);
        let before = cpu;

        cpu.step(&mut bus).unwrap();

        assert_eq!(cpu.pc, before.pc.wrapping_add(1));
        assert_eq!(cpu.a, before.a);
        assert_eq!(cpu.x, before.x);
        assert_eq!(cpu.y, before.y);
        assert_eq!(cpu.sp, before.sp);
        assert_eq!(cpu.p, before.p);
    }

    #[test]
    pub fn illegal_opcode_leaves_registers_untouched() {
        let mut bus = RamBus::new().with_memory_at(0x0400, &[0x02]);
        let mut cpu = Cpu::new();
        cpu.reset(&mut bus, 0x0400);
        let before = cpu;

        let error = cpu.step(&mut bus).unwrap_err();

        assert_eq!(error, Error::IllegalOpcode { opcode: 0x02, pc: 0x0400 });
        assert_eq!(cpu.a, before.a);
        assert_eq!(cpu.x, before.x);
        assert_eq!(cpu.y, before.y);
        assert_eq!(cpu.sp, before.sp);
        assert_eq!(cpu.p, before.p);
        // The opcode byte itself was still fetched off the bus before decode
        // failed, so pc has advanced past it — only the register file (not
        // pc) is left untouched by a failed decode.
        assert_eq!(cpu.pc, before.pc.wrapping_add(1));
    }

    #[test]
    pub fn txs_does_not_touch_flags() {
        let mut bus = RamBus::new().with_memory_at(0x0400, &[0x9A]);
        let mut cpu = Cpu::new();
        cpu.reset(&mut bus, 0x0400);
        cpu.x = 0x00; // would set Zero if TXS updated flags
        let status_before = cpu.p;

        cpu.step(&mut bus).unwrap();

        assert_eq!(cpu.sp, 0x00);
        assert_eq!(cpu.p, status_before);
    }

    #[test]
    pub fn asl_accumulator_shifts_and_sets_carry_from_bit_seven() {
        let mut bus = RamBus::new().with_memory_at(0x0400, &[0x0A]);
        let mut cpu = Cpu::new();
        cpu.reset(&mut bus, 0x0400);
        cpu.a = 0b1000_0001;

        cpu.step(&mut bus).unwrap();

        assert_eq!(cpu.a, 0b0000_0010);
        assert!(cpu.p.get(StatusFlag::Carry));
    }
}
