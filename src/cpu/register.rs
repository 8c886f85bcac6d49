/// The single-byte registers `read_register`/`write_register` can target.
///
/// `Sp` is included alongside `A`/`X`/`Y` so `TSX` (`Sp` → `X`) can share
/// the same `op_transfer` plumbing as the accumulator/index transfers.
/// `P` is included for symmetry with the full register file, but `PHP`/
/// `PLP`/`RTI` never route through it: `P` has stack-only bits (`Break`,
/// the unused bit) that `write_register` doesn't force, so those three
/// opcodes go through the dedicated `op_push_status`/`op_pull_status`
/// instead.
#[derive(PartialEq, Eq, Clone, Copy, Debug)]
pub enum Register {
    A,
    X,
    Y,
    Sp,
    P,
}
