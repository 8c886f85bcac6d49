/// `Bus` is the host-supplied memory interface the [`Cpu`](crate::Cpu) talks
/// to. Every instruction byte, operand byte, indirect-address byte,
/// effective-address read/write, and stack access the core performs is a
/// call to `read_u8`/`write_u8`.
///
/// Implementations may have side effects (MMIO); the core never assumes
/// purity or idempotence and never elides a call the reference hardware
/// would make.
pub trait Bus {
    fn read_u8(&mut self, address: u16) -> u8;

    fn write_u8(&mut self, address: u16, value: u8);

    /// Read a `u16` from the bus starting at `address`, little-endian.
    fn read_u16(&mut self, address: u16) -> u16 {
        let lo = self.read_u8(address);
        let hi = self.read_u8(address.wrapping_add(1));
        u16::from_le_bytes([lo, hi])
    }

    /// Write a `u16` to the bus starting at `address`, little-endian.
    fn write_u16(&mut self, address: u16, value: u16) {
        let [lo, hi] = value.to_le_bytes();
        self.write_u8(address, lo);
        self.write_u8(address.wrapping_add(1), hi);
    }
}

/// A flat 64KiB RAM `Bus` used by this crate's own tests. Not the only
/// permitted `Bus` implementation — hosts are free to route reads/writes
/// to ROM, mirrored RAM, MMIO registers, and so on.
pub struct RamBus {
    pub memory: [u8; RamBus::SIZE],
}

impl RamBus {
    pub const SIZE: usize = 65536;

    pub fn new() -> RamBus {
        RamBus {
            memory: [0; RamBus::SIZE],
        }
    }

    /// Write `bytes` into RAM starting at `start`.
    pub fn with_memory_at(mut self, start: u16, bytes: &[u8]) -> RamBus {
        let start = start as usize;
        self.memory[start..start + bytes.len()].copy_from_slice(bytes);
        self
    }
}

impl Default for RamBus {
    fn default() -> RamBus {
        RamBus::new()
    }
}

impl Bus for RamBus {
    fn read_u8(&mut self, address: u16) -> u8 {
        self.memory[address as usize]
    }

    fn write_u8(&mut self, address: u16, value: u8) {
        self.memory[address as usize] = value;
    }
}

/// A single access `RecordingBus` observed, in the order it happened.
#[derive(PartialEq, Eq, Clone, Copy, Debug)]
pub enum BusAccess {
    Read { address: u16 },
    Write { address: u16, value: u8 },
}

/// A `Bus` that wraps a `RamBus` and records every access in order, so
/// tests can assert on the exact read/write sequence an instruction
/// issues (e.g. `JSR`'s two operand reads then its high-then-low push, or
/// `BRK`'s pc-then-status push followed by the vector read).
pub struct RecordingBus {
    pub inner: RamBus,
    pub log: Vec<BusAccess>,
}

impl RecordingBus {
    pub fn new() -> RecordingBus {
        RecordingBus { inner: RamBus::new(), log: Vec::new() }
    }

    /// Write `bytes` into the underlying RAM starting at `start`, without
    /// recording an access — this seeds initial memory, it isn't part of
    /// the instruction sequence under test.
    pub fn with_memory_at(mut self, start: u16, bytes: &[u8]) -> RecordingBus {
        self.inner = self.inner.with_memory_at(start, bytes);
        self
    }
}

impl Default for RecordingBus {
    fn default() -> RecordingBus {
        RecordingBus::new()
    }
}

impl Bus for RecordingBus {
    fn read_u8(&mut self, address: u16) -> u8 {
        self.log.push(BusAccess::Read { address });
        self.inner.read_u8(address)
    }

    fn write_u8(&mut self, address: u16, value: u8) {
        self.log.push(BusAccess::Write { address, value });
        self.inner.write_u8(address, value)
    }
}
