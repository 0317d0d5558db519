use crate::{mode::AddrMode, reg::Reg, Word};

/// A 6-bit operand field: addressing mode in bits 3-5, register in bits 0-2.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Field {
    pub mode: AddrMode,
    pub reg: Reg,
}

impl Field {
    pub const fn new(mode: AddrMode, reg: Reg) -> Self {
        Field { mode, reg }
    }

    /// `Rn`
    pub const fn reg(reg: Reg) -> Self {
        Field::new(AddrMode::Register, reg)
    }

    /// `#n`, the value follows in the next word.
    pub const fn immediate() -> Self {
        Field::new(AddrMode::AutoIncrement, Reg::PC)
    }

    /// `@#n`, the address follows in the next word.
    pub const fn absolute() -> Self {
        Field::new(AddrMode::AutoIncrementDeferred, Reg::PC)
    }

    pub fn bits(self) -> Word {
        (self.mode.bits() << 3) | self.reg.bits()
    }
}

/// An encoded instruction word, one variant per instruction group.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Inst {
    /// Operand-less, or an already encoded word.
    Raw(Word),
    Single { opcode: Word, dst: Field },
    Double { opcode: Word, src: Field, dst: Field },
    /// Register-constrained first operand: only the register survives.
    RegOp { opcode: Word, reg: Reg, dst: Field },
    Branch { opcode: Word, offset: i8 },
}

impl Inst {
    pub fn to_word(&self) -> Word {
        match *self {
            Inst::Raw(word) => word,
            Inst::Single { opcode, dst } => opcode | dst.bits(),
            Inst::Double { opcode, src, dst } => opcode | (src.bits() << 6) | dst.bits(),
            Inst::RegOp { opcode, reg, dst } => opcode | (reg.bits() << 6) | dst.bits(),
            Inst::Branch { opcode, offset } => opcode | (offset as u8 as Word),
        }
    }
}

/// Word displacement from a branch at `at` to `target`.
pub fn displacement(target: Word, at: Word) -> i32 {
    target as i32 - at as i32
}

/// Truncates a displacement to the signed byte a branch can hold.
pub fn branch_offset(displacement: i32) -> i8 {
    displacement as i8
}

pub fn fits_branch(displacement: i32) -> bool {
    (i8::MIN as i32..=i8::MAX as i32).contains(&displacement)
}
