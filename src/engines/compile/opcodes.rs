//! Opcode numbering for compiled instructions.
//!
//! The interpreter consuming the instruction stream keys off these values;
//! they are stable within a build but carry no cross-version guarantee.

pub const ADD: u8 = 1;
pub const SUB: u8 = 2;
pub const MUL: u8 = 3;
pub const DIV: u8 = 4;
pub const MIN: u8 = 5;
pub const MAX: u8 = 6;
pub const AVG: u8 = 7;
pub const AND: u8 = 8;
pub const OR: u8 = 9;
pub const NOT: u8 = 10;
pub const GT: u8 = 11;
pub const LT: u8 = 12;

pub const VARIABLE: u8 = 18;
pub const CONSTANT: u8 = 20;
pub const ARG: u8 = 25;
pub const CALL: u8 = 26;

/// Fallback for symbols the mapper does not recognize
pub const NOP: u8 = 0;
