use std::fmt;

use thiserror::Error;

use arch::Word;

use crate::ast::CommandId;

/// What is wrong with a command.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ErrorKind {
    #[error("wrong operands number.")]
    WrongOperandsNumber,

    #[error("wrong operand (label or int is expected).")]
    LabelOrIntExpected,

    #[error("wrong operand (register is expected).")]
    RegisterExpected,

    #[error("wrong operand (RTS expects only a register).")]
    RtsExpectsRegister,

    #[error("label doesn't exist: {0}")]
    UndefinedLabel(String),

    #[error("program does not fit in {} words.", Word::MAX)]
    ProgramTooLarge,
}

/// An error tied to the command that caused it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub command: CommandId,
    pub line: usize,
    pub kind: ErrorKind,
}

impl Diagnostic {
    pub fn new(command: CommandId, line: usize, kind: ErrorKind) -> Self {
        Diagnostic {
            command,
            line,
            kind,
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "line:{} error:{}", self.line, self.kind)
    }
}

/// Every error a failed stage found. Never empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Errors(Vec<Diagnostic>);

impl Errors {
    /// `Ok` when the stage reported nothing.
    pub fn check(diagnostics: Vec<Diagnostic>) -> Result<(), Errors> {
        if diagnostics.is_empty() {
            Ok(())
        } else {
            Err(Errors(diagnostics))
        }
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.0
    }

    pub fn into_vec(self) -> Vec<Diagnostic> {
        self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for Errors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (idx, diagnostic) in self.0.iter().enumerate() {
            if idx > 0 {
                writeln!(f)?;
            }
            write!(f, "{}", diagnostic)?;
        }
        Ok(())
    }
}

impl std::error::Error for Errors {}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum WarningKind {
    #[error("re-defined label: `{name}` (already defined at line {previous_line}, the value has been overridden)")]
    RedefinedLabel { name: String, previous_line: usize },

    #[error("branch to `{target}` is out of range ({offset} words), displacement truncated")]
    BranchOutOfRange { target: String, offset: i32 },
}

/// Something suspicious that does not stop assembly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Warning {
    pub command: CommandId,
    pub line: usize,
    pub kind: WarningKind,
}

impl fmt::Display for Warning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "line:{} warning:{}", self.line, self.kind)
    }
}

/// Failures of the command-line collaborators around the core.
#[derive(Error, Debug)]
pub enum Error {
    #[error("Failed to open file: {0}")]
    FileOpen(String, #[source] std::io::Error),

    #[error("Failed to read file: {0}")]
    FileRead(String, #[source] std::io::Error),

    #[error("Failed to create file: {0}")]
    FileCreate(String, #[source] std::io::Error),

    #[error("Failed to write file: {0}")]
    FileWrite(String, #[source] std::io::Error),

    #[error("Data file is empty: {0}")]
    EmptyDataFile(String),

    #[error("Cannot decode program: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Unknown operation at line {line}: `{name}`")]
    UnknownOperation { line: usize, name: String },

    #[error("Entry at line {line} has neither an operation nor a raw word")]
    MissingOperation { line: usize },

    #[error("Entry at line {line} has both an operation and a raw word")]
    AmbiguousEntry { line: usize },

    #[error("Entry at line {line} has {count} operands, at most 2 are allowed")]
    TooManyOperands { line: usize, count: usize },

    #[error("Number at line {line} does not fit in a word: {value}")]
    NumberOutOfRange { line: usize, value: i64 },

    #[error("Labels without a following command: {}", .0.join(", "))]
    DanglingLabels(Vec<String>),

    #[error("{0}")]
    Assembly(#[from] Errors),
}
