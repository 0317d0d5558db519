//! Rejects operand shapes that are illegal for a command's instruction group.

use arch::{
    mode::AddrMode,
    op::{self, Group},
};

use crate::{
    ast::{walk, Body, Command, CommandId, Mode, Operand, OperandKind, Program, Visitor},
    error::{Diagnostic, ErrorKind},
};

fn register_direct(operand: &Operand) -> bool {
    operand.kind() == OperandKind::Register && operand.mode() == Mode::Addr(AddrMode::Register)
}

#[derive(Debug, Default)]
pub struct Validator {
    errors: Vec<Diagnostic>,
}

impl Validator {
    pub fn new() -> Self {
        Validator { errors: vec![] }
    }

    pub fn into_errors(self) -> Vec<Diagnostic> {
        self.errors
    }

    fn error(&mut self, id: CommandId, command: &Command, kind: ErrorKind) {
        self.errors.push(Diagnostic::new(id, command.line, kind));
    }

    fn check_single(&mut self, id: CommandId, command: &Command, first: &Operand) {
        if command.opcode == op::RTS && !register_direct(first) {
            self.error(id, command, ErrorKind::RtsExpectsRegister);
        }
    }

    fn check_branch(&mut self, id: CommandId, command: &Command, first: &Operand) {
        match first.kind() {
            OperandKind::Number | OperandKind::LabelRef => {}
            OperandKind::Register => self.error(id, command, ErrorKind::LabelOrIntExpected),
        }
    }

    /// Only the register number of the first operand is encoded.
    fn check_one_and_half(&mut self, id: CommandId, command: &Command, first: &Operand) {
        if !register_direct(first) {
            self.error(id, command, ErrorKind::RegisterExpected);
        }
    }
}

impl Visitor for Validator {
    fn command(&mut self, id: CommandId, command: &Command) {
        match &command.body {
            Body::Zero | Body::Raw(_) => {}
            Body::One(first) => match command.group() {
                Group::SingleOperand => self.check_single(id, command, first),
                Group::Branch => self.check_branch(id, command, first),
                _ => self.error(id, command, ErrorKind::WrongOperandsNumber),
            },
            Body::Two(first, _) => match command.group() {
                Group::DoubleOperand => {}
                Group::OneAndHalf => self.check_one_and_half(id, command, first),
                _ => self.error(id, command, ErrorKind::WrongOperandsNumber),
            },
        }
    }
}

/// Collects every semantic error in the program. The program is not modified.
pub fn validate(program: &Program) -> Vec<Diagnostic> {
    let mut validator = Validator::new();
    walk(program, &mut validator);
    let errors = validator.into_errors();
    log::debug!(
        "validate: {} commands, {} errors",
        program.len(),
        errors.len()
    );
    errors
}
