//! A host-agnostic, instruction-stepped MOS 6502 core.
//!
//! The [`Cpu`] holds the full architectural register file and nothing
//! else; every byte it touches flows through a host-supplied [`Bus`].
//! `step` fetches, decodes, and executes exactly one instruction. Cycle
//! timing, decimal-mode arithmetic, unofficial opcodes, and hardware
//! interrupt lines beyond `BRK` are not modeled.

pub mod bus;
pub mod cpu;

pub use bus::{Bus, BusAccess, RamBus, RecordingBus};
pub use cpu::{AddressingMode, Cpu, Error, Opcode, Operand, Register, Result, Status, StatusFlag};
