use std::collections::HashMap;

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use strum::Display;

use crate::Word;

/// Instruction group, by operand arity and encoding shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display)]
pub enum Group {
    /// `OPCODE dst`, 6-bit field in bits 0-5
    SingleOperand,
    /// `OPCODE src, dst`, src in bits 6-11, dst in bits 0-5
    DoubleOperand,
    /// `OPCODE reg, dst`, register in bits 6-8, dst in bits 0-5
    OneAndHalf,
    /// `OPCODE offset`, signed word displacement in bits 0-7
    Branch,
    Unknown,
}

pub const HALT: Word = 0o000000;
pub const RTS: Word = 0o000200;
pub const JMP: Word = 0o000100;
pub const JSR: Word = 0o004000;
pub const BR: Word = 0o000400;
pub const MOV: Word = 0o010000;
pub const MUL: Word = 0o070000;
pub const CLR: Word = 0o005000;

const SINGLE_OPERAND: &[(Word, &str)] = &[
    (0o005000, "CLR"),
    (0o105000, "CLRB"),
    (0o005100, "COM"),
    (0o105100, "COMB"),
    (0o005200, "INC"),
    (0o105200, "INCB"),
    (0o005300, "DEC"),
    (0o105300, "DECB"),
    (0o005400, "NEG"),
    (0o105400, "NEGB"),
    (0o005700, "TST"),
    (0o105700, "TSTB"),
    (0o006200, "ASR"),
    (0o106200, "ASRB"),
    (0o006300, "ASL"),
    (0o106300, "ASLB"),
    (0o006000, "ROR"),
    (0o106000, "RORB"),
    (0o006100, "ROL"),
    (0o106100, "ROLB"),
    (0o000300, "SWAB"),
    (0o005500, "ADC"),
    (0o105500, "ADCB"),
    (0o005600, "SBC"),
    (0o105600, "SBCB"),
    (0o006700, "SXT"),
    (0o000100, "JMP"),
    (0o000200, "RTS"),
    // JSR PC, dst
    (0o004700, "CALL"),
];

const DOUBLE_OPERAND: &[(Word, &str)] = &[
    (0o010000, "MOV"),
    (0o110000, "MOVB"),
    (0o020000, "CMP"),
    (0o120000, "CMPB"),
    (0o060000, "ADD"),
    (0o160000, "SUB"),
    (0o030000, "BIT"),
    (0o130000, "BITB"),
    (0o040000, "BIC"),
    (0o140000, "BICB"),
    (0o050000, "BIS"),
    (0o150000, "BISB"),
];

const ONE_AND_HALF: &[(Word, &str)] = &[
    (0o070000, "MUL"),
    (0o071000, "DIV"),
    (0o072000, "ASH"),
    (0o073000, "ASHC"),
    (0o074000, "XOR"),
    (0o004000, "JSR"),
];

const BRANCH: &[(Word, &str)] = &[
    (0o000400, "BR"),
    (0o001000, "BNE"),
    (0o001400, "BEQ"),
    (0o100000, "BPL"),
    (0o100400, "BMI"),
    (0o102000, "BVC"),
    (0o102400, "BVS"),
    (0o103000, "BCC"),
    (0o103400, "BCS"),
    (0o002000, "BGE"),
    (0o002400, "BLT"),
    (0o003000, "BGT"),
    (0o003400, "BLE"),
    (0o101000, "BHI"),
    (0o101400, "BLOS"),
    (0o103000, "BHIS"),
    (0o103400, "BLO"),
];

/// Operand-less instructions. Known by name only; they classify as [`Group::Unknown`].
const NO_OPERAND: &[(Word, &str)] = &[
    (0o000000, "HALT"),
    (0o000001, "WAIT"),
    (0o000002, "RTI"),
    (0o000003, "BPT"),
    (0o000004, "IOT"),
    (0o000005, "RESET"),
    (0o000006, "RTT"),
    // RTS PC
    (0o000207, "RETURN"),
    (0o000240, "NOP"),
    (0o000241, "CLC"),
    (0o000242, "CLV"),
    (0o000244, "CLZ"),
    (0o000250, "CLN"),
    (0o000257, "CCC"),
    (0o000261, "SEC"),
    (0o000262, "SEV"),
    (0o000264, "SEZ"),
    (0o000270, "SEN"),
    (0o000277, "SCC"),
];

const TABLES: [(Group, &[(Word, &str)]); 5] = [
    (Group::SingleOperand, SINGLE_OPERAND),
    (Group::DoubleOperand, DOUBLE_OPERAND),
    (Group::OneAndHalf, ONE_AND_HALF),
    (Group::Branch, BRANCH),
    (Group::Unknown, NO_OPERAND),
];

static GROUPS: Lazy<HashMap<Word, Group>> = Lazy::new(|| {
    let mut map = HashMap::new();
    for (group, table) in TABLES.iter() {
        if *group == Group::Unknown {
            continue;
        }
        for (opcode, _) in table.iter() {
            map.entry(*opcode).or_insert(*group);
        }
    }
    map
});

// First name wins for aliased opcodes (BCC/BHIS, BCS/BLO).
static MNEMONICS: Lazy<HashMap<Word, &'static str>> = Lazy::new(|| {
    let mut map = HashMap::new();
    for (_, table) in TABLES.iter() {
        for (opcode, name) in table.iter() {
            map.entry(*opcode).or_insert(*name);
        }
    }
    map
});

static OPCODES: Lazy<HashMap<&'static str, Word>> = Lazy::new(|| {
    TABLES
        .iter()
        .flat_map(|(_, table)| table.iter())
        .map(|(opcode, name)| (*name, *opcode))
        .collect()
});

/// Classifies an opcode into its instruction group.
pub fn classify(opcode: Word) -> Group {
    GROUPS.get(&opcode).copied().unwrap_or(Group::Unknown)
}

pub fn mnemonic(opcode: Word) -> Option<&'static str> {
    MNEMONICS.get(&opcode).copied()
}

/// Looks up an opcode by mnemonic, ignoring case.
pub fn opcode(name: &str) -> Option<Word> {
    OPCODES.get(name.to_ascii_uppercase().as_str()).copied()
}
