//! Instruction-set facts for the PDP-11 style target: registers, addressing
//! modes, opcode tables and the bit layout of instruction words.

pub mod inst;
pub mod mode;
pub mod op;
pub mod reg;

/// A 16-bit machine word. Addresses are measured in words as well.
pub type Word = u16;
