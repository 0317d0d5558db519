//! First pass: assigns every command its word address and builds the label table.
//!
//! The pass never fails. Labels referenced before their definition are
//! simply not looked at here; resolving them is the second pass's job.

use arch::{op::Group, Word};

use crate::{
    ast::{walk, Body, Command, CommandId, Label, Operand, Program, Visitor},
    error::{Diagnostic, ErrorKind, Warning, WarningKind},
    label::LabelTable,
};

/// Extra words an operand needs after the instruction word: literals,
/// indexed modes and label addresses each take one.
pub fn operand_size(operand: &Operand) -> Word {
    match operand {
        Operand::Number { .. } | Operand::Label(_) => 1,
        Operand::Register { mode, .. } if mode.is_indexed() => 1,
        Operand::Register { .. } => 0,
    }
}

/// Words occupied by a command, the instruction word included.
///
/// The operand of a one-operand branch becomes the displacement byte and
/// never needs an extra word. Any other shape is sized like the second
/// pass encodes it, whatever its group.
pub fn command_size(command: &Command) -> Word {
    match &command.body {
        Body::Zero | Body::Raw(_) => 1,
        Body::One(_) if command.group() == Group::Branch => 1,
        Body::One(_) | Body::Two(..) => 1 + command.operands().map(operand_size).sum::<Word>(),
    }
}

/// Result of the first pass, a side table over the program.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Layout {
    addresses: Vec<Word>,
    labels: LabelTable,
    warnings: Vec<Warning>,
    errors: Vec<Diagnostic>,
    size: Word,
}

impl Layout {
    /// Word address of a command.
    ///
    /// # Panics
    ///
    /// If `id` does not belong to the program this layout was built from.
    pub fn address(&self, id: CommandId) -> Word {
        self.addresses[id.0]
    }

    pub fn addresses(&self) -> &[Word] {
        &self.addresses
    }

    pub fn labels(&self) -> &LabelTable {
        &self.labels
    }

    pub fn warnings(&self) -> &[Warning] {
        &self.warnings
    }

    /// Set when the program outgrows the address space. Addresses past the
    /// offending command have wrapped and must not be used.
    pub fn errors(&self) -> &[Diagnostic] {
        &self.errors
    }

    /// Total words the program occupies.
    pub fn size(&self) -> Word {
        self.size
    }
}

#[derive(Debug, Default)]
struct FirstPass {
    counter: Word,
    addresses: Vec<Word>,
    lines: Vec<usize>,
    labels: LabelTable,
    warnings: Vec<Warning>,
    errors: Vec<Diagnostic>,
}

impl Visitor for FirstPass {
    fn command(&mut self, id: CommandId, command: &Command) {
        debug_assert_eq!(id.0, self.addresses.len());
        let size = command_size(command);
        log::trace!(
            "layout: line {} at {:06o}, {} words",
            command.line,
            self.counter,
            size
        );
        self.addresses.push(self.counter);
        self.lines.push(command.line);
        self.counter = match self.counter.checked_add(size) {
            Some(next) => next,
            None => {
                if self.errors.is_empty() {
                    self.errors
                        .push(Diagnostic::new(id, command.line, ErrorKind::ProgramTooLarge));
                }
                self.counter.wrapping_add(size)
            }
        };
    }

    fn label(&mut self, id: CommandId, label: &Label) {
        let addr = self.addresses[id.0];
        if let Some(previous) = self.labels.bind(&label.name, addr, id) {
            self.warnings.push(Warning {
                command: id,
                line: self.lines[id.0],
                kind: WarningKind::RedefinedLabel {
                    name: label.name.clone(),
                    previous_line: self.lines[previous.command.0],
                },
            });
        }
    }
}

pub fn first_pass(program: &Program) -> Layout {
    let mut pass = FirstPass::default();
    walk(program, &mut pass);
    log::debug!(
        "layout: {} commands, {} words, {} labels",
        program.len(),
        pass.counter,
        pass.labels.len()
    );
    Layout {
        addresses: pass.addresses,
        labels: pass.labels,
        warnings: pass.warnings,
        errors: pass.errors,
        size: pass.counter,
    }
}
