//! Second pass: resolves label references against the first pass's table
//! and emits the final word stream.

use arch::{
    inst::{self, Field, Inst},
    op::Group,
    reg::Reg,
    Word,
};

use crate::{
    ast::{walk, Body, Command, CommandId, Operand, Program, Visitor},
    error::{Diagnostic, ErrorKind, Warning, WarningKind},
    layout::Layout,
};

/// Raw output of the second pass.
///
/// Undefined labels are replaced by address 0 so the pass can go on and
/// report every one of them; `words` is meaningless whenever `errors` is
/// not empty.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Emission {
    pub words: Vec<Word>,
    pub errors: Vec<Diagnostic>,
    pub warnings: Vec<Warning>,
}

struct SecondPass<'a> {
    layout: &'a Layout,
    base: Word,
    counter: Word,
    out: Emission,
}

impl<'a> SecondPass<'a> {
    fn new(layout: &'a Layout, base: Word) -> Self {
        SecondPass {
            layout,
            base,
            counter: 0,
            out: Emission::default(),
        }
    }

    fn resolve(&mut self, id: CommandId, command: &Command, name: &str) -> Word {
        match self.layout.labels().get(name) {
            Some(addr) => addr,
            None => {
                self.out.errors.push(Diagnostic::new(
                    id,
                    command.line,
                    ErrorKind::UndefinedLabel(name.to_string()),
                ));
                0
            }
        }
    }

    /// Operand field plus the extra word it needs, if any.
    fn operand(
        &mut self,
        id: CommandId,
        command: &Command,
        operand: &Operand,
    ) -> (Field, Option<Word>) {
        match operand {
            Operand::Register { mode, reg, offset } => {
                let extra = mode.is_indexed().then_some(*offset);
                (Field::new(*mode, *reg), extra)
            }
            Operand::Number { mode, value } => (Field::new(*mode, Reg::PC), Some(*value)),
            Operand::Label(name) => {
                let addr = self.resolve(id, command, name);
                (Field::absolute(), Some(addr.wrapping_add(self.base)))
            }
        }
    }

    fn branch(&mut self, id: CommandId, command: &Command, target: &Operand) -> Inst {
        let displacement = match target {
            Operand::Label(name) => {
                let addr = self.resolve(id, command, name);
                inst::displacement(addr, self.counter)
            }
            // a signed word displacement
            Operand::Number { value, .. } => *value as i16 as i32,
            // rejected by the validator
            Operand::Register { .. } => 0,
        };
        if !inst::fits_branch(displacement) {
            self.out.warnings.push(Warning {
                command: id,
                line: command.line,
                kind: WarningKind::BranchOutOfRange {
                    target: target.to_string(),
                    offset: displacement,
                },
            });
        }
        Inst::Branch {
            opcode: command.opcode,
            offset: inst::branch_offset(displacement),
        }
    }
}

impl Visitor for SecondPass<'_> {
    fn command(&mut self, id: CommandId, command: &Command) {
        debug_assert_eq!(self.counter, self.layout.address(id));
        let start = self.out.words.len();

        match &command.body {
            Body::Zero => self.out.words.push(Inst::Raw(command.opcode).to_word()),
            Body::Raw(word) => self.out.words.push(Inst::Raw(*word).to_word()),
            Body::One(first) if command.group() == Group::Branch => {
                let inst = self.branch(id, command, first);
                self.out.words.push(inst.to_word());
            }
            Body::One(first) => {
                let (dst, extra) = self.operand(id, command, first);
                let inst = Inst::Single {
                    opcode: command.opcode,
                    dst,
                };
                self.out.words.push(inst.to_word());
                self.out.words.extend(extra);
            }
            Body::Two(first, second) => {
                let (src, src_extra) = self.operand(id, command, first);
                let (dst, dst_extra) = self.operand(id, command, second);
                let inst = match command.group() {
                    Group::OneAndHalf => Inst::RegOp {
                        opcode: command.opcode,
                        reg: src.reg,
                        dst,
                    },
                    _ => Inst::Double {
                        opcode: command.opcode,
                        src,
                        dst,
                    },
                };
                self.out.words.push(inst.to_word());
                self.out.words.extend(src_extra);
                self.out.words.extend(dst_extra);
            }
        }

        let emitted = &self.out.words[start..];
        log::trace!(
            "emit: line {} at {:06o}: {}",
            command.line,
            self.counter,
            emitted
                .iter()
                .map(|word| format!("{:06o}", word))
                .collect::<Vec<_>>()
                .join(" ")
        );
        self.counter = self.counter.wrapping_add(emitted.len() as Word);
    }
}

/// Runs the second pass with `base` added to every label address used as data.
pub fn second_pass(program: &Program, layout: &Layout, base: Word) -> Emission {
    let mut pass = SecondPass::new(layout, base);
    walk(program, &mut pass);
    debug_assert_eq!(pass.counter, layout.size());
    log::debug!(
        "emit: {} words, {} errors",
        pass.out.words.len(),
        pass.out.errors.len()
    );
    pass.out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::first_pass;
    use arch::{mode::AddrMode, op};

    fn emit(commands: Vec<Command>, base: Word) -> Emission {
        let program = Program::new(commands);
        let layout = first_pass(&program);
        second_pass(&program, &layout, base)
    }

    macro_rules! test_words {
        ($($name:ident: [$($command:expr),* $(,)?] => [$($word:expr),* $(,)?],)*) => {
            $(
                #[test]
                fn $name() {
                    let out = emit(vec![$($command),*], 0);
                    assert!(out.errors.is_empty(), "{:?}", out.errors);
                    let expected: Vec<Word> = vec![$($word),*];
                    assert_eq!(out.words, expected, "{:?}", out.words);
                }
            )*
        }
    }

    test_words! {
        words_halt: [Command::new(op::HALT, 1)] => [0o000000],
        words_raw: [Command::raw(0o123456, 1)] => [0o123456],
        words_clr_r3: [Command::one(op::CLR, Operand::reg(Reg::R3), 1)] => [0o005003],
        words_clr_autodec: [
            Command::one(op::CLR, Operand::register(AddrMode::AutoDecrement, Reg::SP), 1),
        ] => [0o005046],
        words_clr_indexed: [Command::one(op::CLR, Operand::indexed(Reg::R1, 0o20), 1)] => [0o005061, 0o20],
        words_tst_immediate: [Command::one(0o005700, Operand::imm(7), 1)] => [0o005727, 7],
        words_mov_registers: [
            Command::two(op::MOV, Operand::reg(Reg::R1), Operand::reg(Reg::R2), 1),
        ] => [0o010102],
        words_mov_imm_indexed: [
            Command::two(op::MOV, Operand::imm(0o12), Operand::indexed(Reg::R4, 0o6), 1),
        ] => [0o012764, 0o12, 0o6],
        words_mov_indexed_abs: [
            Command::two(op::MOV, Operand::index_deferred(Reg::R2, 3), Operand::abs(0o400), 1),
        ] => [0o017237, 3, 0o400],
        words_mul: [
            Command::two(op::MUL, Operand::reg(Reg::R2), Operand::indexed(Reg::R3, 4), 1),
        ] => [0o070263, 4],
        words_br_number: [Command::one(op::BR, Operand::imm(4), 1)] => [0o000404],
        words_br_negative_number: [Command::one(op::BR, Operand::imm(0o177775), 1)] => [0o000775],
    }

    #[test]
    fn branch_back() {
        let out = emit(
            vec![
                Command::new(op::HALT, 1),
                Command::new(op::HALT, 2),
                Command::new(op::HALT, 3).with_label("TOP"),
                Command::new(op::HALT, 4),
                Command::new(op::HALT, 5),
                Command::one(op::BR, Operand::label("TOP"), 6),
            ],
            0,
        );
        assert!(out.errors.is_empty());
        assert_eq!(out.words[5] & 0xFF, 0xFD);
        assert_eq!(out.words[5], op::BR | 0xFD);
    }

    #[test]
    fn branch_forward() {
        let out = emit(
            vec![
                Command::one(op::BR, Operand::label("LATER"), 1),
                Command::one(op::CLR, Operand::indexed(Reg::R0, 1), 2),
                Command::new(op::HALT, 3).with_label("LATER"),
            ],
            0,
        );
        assert!(out.errors.is_empty());
        assert_eq!(out.words, vec![op::BR | 3, 0o005060, 1, op::HALT]);
    }

    #[test]
    fn label_as_data_address() {
        let out = emit(
            vec![
                Command::one(op::JMP, Operand::label("THERE"), 1),
                Command::new(op::HALT, 2),
                Command::new(op::HALT, 3).with_label("THERE"),
            ],
            0o1000,
        );
        assert!(out.errors.is_empty());
        assert_eq!(out.words, vec![0o000137, 0o1003, 0, 0]);
    }

    #[test]
    fn label_in_double_operand() {
        let out = emit(
            vec![
                Command::two(op::MOV, Operand::label("VALUE"), Operand::reg(Reg::R0), 1),
                Command::raw(0o52, 2).with_label("VALUE"),
            ],
            0o100,
        );
        assert!(out.errors.is_empty());
        assert_eq!(out.words, vec![0o013700, 0o102, 0o52]);
    }

    #[test]
    fn undefined_label_substitutes_zero() {
        let out = emit(
            vec![
                Command::one(op::JMP, Operand::label("MISSING"), 7),
                Command::one(op::BR, Operand::label("MISSING"), 8),
            ],
            0o1000,
        );
        assert_eq!(
            out.errors,
            vec![
                Diagnostic::new(CommandId(0), 7, ErrorKind::UndefinedLabel("MISSING".into())),
                Diagnostic::new(CommandId(1), 8, ErrorKind::UndefinedLabel("MISSING".into())),
            ]
        );
        // placeholder address 0 plus base, then a branch from 2 back to 0
        assert_eq!(out.words, vec![0o000137, 0o1000, op::BR | 0xFE]);
    }

    #[test]
    fn far_branch_warns() {
        let mut commands = vec![Command::one(op::BR, Operand::label("FAR"), 1)];
        commands.extend((0..200).map(|line| Command::new(op::HALT, line + 2)));
        commands.push(Command::new(op::HALT, 300).with_label("FAR"));
        let out = emit(commands, 0);
        assert!(out.errors.is_empty());
        assert_eq!(out.warnings.len(), 1);
        assert_eq!(
            out.warnings[0].kind,
            WarningKind::BranchOutOfRange {
                target: "FAR".into(),
                offset: 201,
            }
        );
        assert_eq!(out.words[0], op::BR | (201u16 & 0xFF));
    }

    #[test]
    fn far_numeric_branch_warns() {
        let out = emit(vec![Command::one(op::BR, Operand::imm(0o1000), 3)], 0);
        assert_eq!(out.words, vec![op::BR]);
        assert_eq!(
            out.warnings,
            vec![Warning {
                command: CommandId(0),
                line: 3,
                kind: WarningKind::BranchOutOfRange {
                    target: "#1000".into(),
                    offset: 0o1000,
                },
            }]
        );
    }

    #[test]
    fn two_operand_branch_keeps_layout() {
        let out = emit(
            vec![
                Command::two(op::BR, Operand::imm(1), Operand::reg(Reg::R0), 1),
                Command::new(op::HALT, 2).with_label("X"),
                Command::one(op::BR, Operand::label("X"), 3),
            ],
            0,
        );
        assert!(out.errors.is_empty());
        assert_eq!(out.words, vec![0o003300, 1, op::HALT, op::BR | 0xFF]);
    }
}
