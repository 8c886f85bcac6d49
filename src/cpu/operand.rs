use crate::bus::Bus;
use crate::cpu::register::Register;
use crate::cpu::Cpu;

/// A fully resolved addressing target: the place an instruction's operand
/// actually lives, produced by [`AddressingMode::resolve`](crate::cpu::addressing::AddressingMode::resolve).
///
/// Unlike the raw [`AddressingMode`](crate::cpu::addressing::AddressingMode),
/// `Operand` carries the resolved value or address rather than the recipe
/// for finding it — `load`/`store` need no further addressing logic.
#[derive(PartialEq, Eq, Clone, Copy, Debug)]
pub enum Operand {
    /// The accumulator, targeted directly by `AddressingMode::Accumulator`
    /// (e.g. `ROL A`, `LSR A`).
    Accumulator,

    /// A literal value read straight out of the instruction stream.
    /// Never a valid write target.
    Immediate(u8),

    /// A bus address, produced by every other addressing mode.
    Memory(u16),
}

impl Operand {
    /// Read the value this operand refers to.
    pub fn load(&self, cpu: &Cpu, bus: &mut impl Bus) -> u8 {
        match *self {
            Operand::Accumulator => cpu.a,
            Operand::Immediate(value) => value,
            Operand::Memory(address) => bus.read_u8(address),
        }
    }

    /// Write `value` to this operand's target.
    ///
    /// Only opcodes whose addressing mode can resolve to `Accumulator` or
    /// `Memory` are ever paired with a store — the dispatch table never
    /// pairs a store/RMW opcode with `Immediate` addressing, so reaching
    /// that arm here would mean the dispatch table itself is wrong.
    pub fn store(&self, cpu: &mut Cpu, bus: &mut impl Bus, value: u8) {
        match *self {
            Operand::Accumulator => cpu.write_register(Register::A, value),
            Operand::Memory(address) => bus.write_u8(address, value),
            Operand::Immediate(_) => unreachable!(
                "dispatch table paired a store/modify opcode with Immediate addressing"
            ),
        }
    }

    /// Read-modify-write: load the current value, apply `f`, store the
    /// result back, and return `(input, output)` so callers can derive
    /// flags from either side (e.g. `CMP`-style subtraction uses `input`,
    /// `INC`/`ASL`-style shifts use `output`).
    pub fn modify(
        &self,
        cpu: &mut Cpu,
        bus: &mut impl Bus,
        f: impl FnOnce(u8) -> u8,
    ) -> (u8, u8) {
        let input = self.load(cpu, bus);
        let output = f(input);
        self.store(cpu, bus, output);
        (input, output)
    }
}
