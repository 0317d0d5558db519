//! Syntax tree handed over by the front end.
//!
//! A [`Program`] owns its commands in source order. Nothing in the tree is
//! mutated by the passes: addresses assigned by the first pass live in a
//! side table keyed by [`CommandId`].

use std::fmt;

use arch::{
    mode::AddrMode,
    op::{self, Group},
    reg::Reg,
    Word,
};

/// Position of a command in its program.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CommandId(pub usize);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Label {
    pub name: String,
}

impl Label {
    pub fn new(name: impl Into<String>) -> Self {
        Label { name: name.into() }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperandKind {
    Register,
    Number,
    LabelRef,
}

/// Addressing mode of an operand. Label references carry a pseudo-mode
/// until the second pass picks their encoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Addr(AddrMode),
    Label,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Operand {
    /// `offset` is only read by the indexed modes.
    Register {
        mode: AddrMode,
        reg: Reg,
        offset: Word,
    },
    /// A literal. Encoded with PC as the register and the value in the next word.
    Number { mode: AddrMode, value: Word },
    Label(String),
}

impl Operand {
    pub fn register(mode: AddrMode, reg: Reg) -> Self {
        Operand::Register {
            mode,
            reg,
            offset: 0,
        }
    }

    /// `Rn`
    pub fn reg(reg: Reg) -> Self {
        Operand::register(AddrMode::Register, reg)
    }

    /// `X(Rn)`
    pub fn indexed(reg: Reg, offset: Word) -> Self {
        Operand::Register {
            mode: AddrMode::Index,
            reg,
            offset,
        }
    }

    /// `@X(Rn)`
    pub fn index_deferred(reg: Reg, offset: Word) -> Self {
        Operand::Register {
            mode: AddrMode::IndexDeferred,
            reg,
            offset,
        }
    }

    /// `#n`
    pub fn imm(value: Word) -> Self {
        Operand::Number {
            mode: AddrMode::AutoIncrement,
            value,
        }
    }

    /// `@#n`
    pub fn abs(value: Word) -> Self {
        Operand::Number {
            mode: AddrMode::AutoIncrementDeferred,
            value,
        }
    }

    pub fn label(name: impl Into<String>) -> Self {
        Operand::Label(name.into())
    }

    pub fn kind(&self) -> OperandKind {
        match self {
            Operand::Register { .. } => OperandKind::Register,
            Operand::Number { .. } => OperandKind::Number,
            Operand::Label(_) => OperandKind::LabelRef,
        }
    }

    pub fn mode(&self) -> Mode {
        match self {
            Operand::Register { mode, .. } | Operand::Number { mode, .. } => Mode::Addr(*mode),
            Operand::Label(_) => Mode::Label,
        }
    }

    pub fn is_indexed(&self) -> bool {
        matches!(self.mode(), Mode::Addr(mode) if mode.is_indexed())
    }
}

fn fmt_mode(f: &mut fmt::Formatter<'_>, mode: AddrMode, reg: &str, offset: Word) -> fmt::Result {
    match mode {
        AddrMode::Register => write!(f, "{}", reg),
        AddrMode::RegisterDeferred => write!(f, "({})", reg),
        AddrMode::AutoIncrement => write!(f, "({})+", reg),
        AddrMode::AutoIncrementDeferred => write!(f, "@({})+", reg),
        AddrMode::AutoDecrement => write!(f, "-({})", reg),
        AddrMode::AutoDecrementDeferred => write!(f, "@-({})", reg),
        AddrMode::Index => write!(f, "{:o}({})", offset, reg),
        AddrMode::IndexDeferred => write!(f, "@{:o}({})", offset, reg),
    }
}

/// Assembler syntax, numbers in octal.
impl fmt::Display for Operand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operand::Register { mode, reg, offset } => {
                fmt_mode(f, *mode, &reg.to_string(), *offset)
            }
            Operand::Number {
                mode: AddrMode::AutoIncrement,
                value,
            } => write!(f, "#{:o}", value),
            Operand::Number {
                mode: AddrMode::AutoIncrementDeferred,
                value,
            } => write!(f, "@#{:o}", value),
            Operand::Number { mode, value } => fmt_mode(f, *mode, "PC", *value),
            Operand::Label(name) => write!(f, "{}", name),
        }
    }
}

/// Shape of a command by operand count.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Body {
    Zero,
    One(Operand),
    Two(Operand, Operand),
    /// An already encoded word, emitted as is.
    Raw(Word),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Command {
    pub opcode: Word,
    pub line: usize,
    /// Labels defined immediately before this command.
    pub labels: Vec<Label>,
    pub body: Body,
}

impl Command {
    pub fn new(opcode: Word, line: usize) -> Self {
        Command {
            opcode,
            line,
            labels: vec![],
            body: Body::Zero,
        }
    }

    pub fn one(opcode: Word, first: Operand, line: usize) -> Self {
        Command {
            body: Body::One(first),
            ..Command::new(opcode, line)
        }
    }

    pub fn two(opcode: Word, first: Operand, second: Operand, line: usize) -> Self {
        Command {
            body: Body::Two(first, second),
            ..Command::new(opcode, line)
        }
    }

    pub fn raw(word: Word, line: usize) -> Self {
        Command {
            body: Body::Raw(word),
            ..Command::new(word, line)
        }
    }

    pub fn with_label(mut self, name: impl Into<String>) -> Self {
        self.labels.push(Label::new(name));
        self
    }

    pub fn group(&self) -> Group {
        op::classify(self.opcode)
    }

    pub fn operands(&self) -> impl Iterator<Item = &Operand> {
        let (first, second) = match &self.body {
            Body::Zero | Body::Raw(_) => (None, None),
            Body::One(first) => (Some(first), None),
            Body::Two(first, second) => (Some(first), Some(second)),
        };
        first.into_iter().chain(second)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Program {
    commands: Vec<Command>,
}

impl Program {
    pub fn new(commands: Vec<Command>) -> Self {
        Program { commands }
    }

    pub fn push(&mut self, command: Command) -> CommandId {
        self.commands.push(command);
        CommandId(self.commands.len() - 1)
    }

    pub fn get(&self, id: CommandId) -> Option<&Command> {
        self.commands.get(id.0)
    }

    pub fn commands(&self) -> &[Command] {
        &self.commands
    }

    pub fn iter(&self) -> impl Iterator<Item = (CommandId, &Command)> {
        self.commands
            .iter()
            .enumerate()
            .map(|(idx, command)| (CommandId(idx), command))
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }
}

impl FromIterator<Command> for Program {
    fn from_iter<I: IntoIterator<Item = Command>>(iter: I) -> Self {
        Program::new(iter.into_iter().collect())
    }
}

/// A pass over the tree.
///
/// `command` is required and sees the whole command; implementations match
/// on [`Body`] to handle each operand shape. The other hooks default to
/// no-ops.
pub trait Visitor {
    fn program(&mut self, _program: &Program) {}
    fn command(&mut self, id: CommandId, command: &Command);
    fn label(&mut self, _id: CommandId, _label: &Label) {}
    fn operand(&mut self, _id: CommandId, _operand: &Operand) {}
}

/// Visits the program, then each command in order followed by its labels
/// and operands.
pub fn walk<V: Visitor + ?Sized>(program: &Program, visitor: &mut V) {
    visitor.program(program);
    for (id, command) in program.iter() {
        visitor.command(id, command);
        for label in &command.labels {
            visitor.label(id, label);
        }
        for operand in command.operands() {
            visitor.operand(id, operand);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Trace(Vec<String>);

    impl Visitor for Trace {
        fn program(&mut self, program: &Program) {
            self.0.push(format!("program {}", program.len()));
        }
        fn command(&mut self, id: CommandId, command: &Command) {
            let shape = match &command.body {
                Body::Zero => "zero",
                Body::One(_) => "one",
                Body::Two(..) => "two",
                Body::Raw(_) => "raw",
            };
            self.0.push(format!("command {} {}", id.0, shape));
        }
        fn label(&mut self, id: CommandId, label: &Label) {
            self.0.push(format!("label {} {}", id.0, label.name));
        }
        fn operand(&mut self, id: CommandId, operand: &Operand) {
            self.0.push(format!("operand {} {:?}", id.0, operand.kind()));
        }
    }

    #[test]
    fn walk_order() {
        let program = Program::new(vec![
            Command::two(op::MOV, Operand::imm(1), Operand::reg(Reg::R0), 1).with_label("A"),
            Command::one(op::BR, Operand::label("A"), 2)
                .with_label("B")
                .with_label("C"),
            Command::raw(0o777, 3),
            Command::new(op::HALT, 4),
        ]);
        let mut trace = Trace::default();
        walk(&program, &mut trace);
        assert_eq!(
            trace.0,
            vec![
                "program 4",
                "command 0 two",
                "label 0 A",
                "operand 0 Number",
                "operand 0 Register",
                "command 1 one",
                "label 1 B",
                "label 1 C",
                "operand 1 LabelRef",
                "command 2 raw",
                "command 3 zero",
            ]
        );
    }

    #[test]
    fn operand_modes() {
        assert_eq!(
            Operand::imm(5).mode(),
            Mode::Addr(AddrMode::AutoIncrement)
        );
        assert_eq!(Operand::label("X").mode(), Mode::Label);
        assert!(Operand::indexed(Reg::R1, 2).is_indexed());
        assert!(Operand::index_deferred(Reg::R1, 2).is_indexed());
        assert!(!Operand::reg(Reg::R1).is_indexed());
        assert!(!Operand::label("X").is_indexed());
    }

    #[test]
    fn operand_syntax() {
        assert_eq!(Operand::reg(Reg::R3).to_string(), "R3");
        assert_eq!(
            Operand::register(AddrMode::AutoDecrement, Reg::SP).to_string(),
            "-(R6)"
        );
        assert_eq!(Operand::indexed(Reg::R1, 0o20).to_string(), "20(R1)");
        assert_eq!(Operand::index_deferred(Reg::R2, 4).to_string(), "@4(R2)");
        assert_eq!(Operand::imm(0o12).to_string(), "#12");
        assert_eq!(Operand::abs(0o400).to_string(), "@#400");
        assert_eq!(Operand::label("LOOP").to_string(), "LOOP");
    }

    #[test]
    fn raw_command_has_no_operands() {
        let command = Command::raw(0o1234, 7);
        assert_eq!(command.operands().count(), 0);
        assert_eq!(command.opcode, 0o1234);
    }
}
