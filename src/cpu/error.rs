use thiserror::Error;

/// The only error kind the core ever returns. Bus callbacks are total, so
/// the one failure mode left is the dispatcher reading a byte with no
/// defined instruction signature.
#[derive(Error, Debug, PartialEq, Eq, Clone, Copy)]
pub enum Error {
    #[error("illegal opcode {opcode:#04x} at {pc:#06x}")]
    IllegalOpcode { opcode: u8, pc: u16 },
}
