//! YAML program description, read by the command-line tool.
//!
//! Each entry is one command, or a bare `labels` list that attaches to the
//! next command:
//!
//! ```yaml
//! - labels: [START]
//!   op: MOV
//!   operands: [ { num: 10 }, { reg: R1 } ]
//! - op: BR
//!   operands: [ { label: START } ]
//! - raw: 0o177777
//! ```

use std::{fs::File, io::Read};

use arch::{mode::AddrMode, op, reg::Reg, Word};
use serde::Deserialize;

use crate::{
    ast::{Body, Command, Label, Operand, Program},
    error::Error,
};

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct Entry {
    #[serde(default)]
    labels: Vec<String>,
    op: Option<Op>,
    #[serde(default)]
    operands: Vec<OperandEntry>,
    raw: Option<i64>,
    line: Option<usize>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum Op {
    Code(i64),
    Name(String),
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum OperandEntry {
    Register {
        reg: Reg,
        #[serde(default)]
        mode: AddrMode,
        #[serde(default)]
        offset: i64,
    },
    Number {
        num: i64,
        #[serde(default = "immediate")]
        mode: AddrMode,
    },
    Label {
        label: String,
    },
}

fn immediate() -> AddrMode {
    AddrMode::AutoIncrement
}

/// Accepts both unsigned words and negative two's complement values.
fn word(line: usize, value: i64) -> Result<Word, Error> {
    if (i16::MIN as i64..=Word::MAX as i64).contains(&value) {
        Ok(value as Word)
    } else {
        Err(Error::NumberOutOfRange { line, value })
    }
}

impl OperandEntry {
    fn into_operand(self, line: usize) -> Result<Operand, Error> {
        Ok(match self {
            OperandEntry::Register { reg, mode, offset } => Operand::Register {
                mode,
                reg,
                offset: word(line, offset)?,
            },
            OperandEntry::Number { num, mode } => Operand::Number {
                mode,
                value: word(line, num)?,
            },
            OperandEntry::Label { label } => Operand::Label(label),
        })
    }
}

impl Entry {
    /// `None` for a label-only entry.
    fn into_command(self, line: usize) -> Result<Option<Command>, Error> {
        let opcode = match (self.op, self.raw) {
            (Some(_), Some(_)) => return Err(Error::AmbiguousEntry { line }),
            (None, Some(raw)) if self.operands.is_empty() => {
                return Ok(Some(Command::raw(word(line, raw)?, line)));
            }
            (None, Some(_)) => return Err(Error::AmbiguousEntry { line }),
            (None, None) if self.operands.is_empty() && !self.labels.is_empty() => {
                return Ok(None);
            }
            (None, None) => return Err(Error::MissingOperation { line }),
            (Some(Op::Code(code)), None) => word(line, code)?,
            (Some(Op::Name(name)), None) => match op::opcode(&name) {
                Some(opcode) => opcode,
                None => return Err(Error::UnknownOperation { line, name }),
            },
        };

        let count = self.operands.len();
        let mut operands = self
            .operands
            .into_iter()
            .map(|operand| operand.into_operand(line));
        let body = match count {
            0 => Body::Zero,
            1 => Body::One(next(&mut operands, line)?),
            2 => Body::Two(next(&mut operands, line)?, next(&mut operands, line)?),
            _ => return Err(Error::TooManyOperands { line, count }),
        };
        Ok(Some(Command {
            opcode,
            line,
            labels: vec![],
            body,
        }))
    }
}

fn next(
    operands: &mut impl Iterator<Item = Result<Operand, Error>>,
    line: usize,
) -> Result<Operand, Error> {
    operands
        .next()
        .unwrap_or(Err(Error::MissingOperation { line }))
}

/// Decodes a YAML program. Lines default to the 1-based entry index.
pub fn parse(text: &str) -> Result<Program, Error> {
    if text.trim().is_empty() {
        return Ok(Program::default());
    }
    let entries: Vec<Entry> = serde_yaml::from_str(text)?;

    let mut program = Program::default();
    let mut pending: Vec<Label> = vec![];
    for (idx, entry) in entries.into_iter().enumerate() {
        let line = entry.line.unwrap_or(idx + 1);
        pending.extend(entry.labels.iter().map(Label::new));
        if let Some(mut command) = entry.into_command(line)? {
            command.labels = std::mem::take(&mut pending);
            program.push(command);
        }
    }

    if !pending.is_empty() {
        return Err(Error::DanglingLabels(
            pending.into_iter().map(|label| label.name).collect(),
        ));
    }
    log::debug!("source: {} commands", program.len());
    Ok(program)
}

pub fn load(path: &str) -> Result<Program, Error> {
    let mut file = File::open(path).map_err(|e| Error::FileOpen(path.to_string(), e))?;
    let mut text = String::new();
    file.read_to_string(&mut text)
        .map_err(|e| Error::FileRead(path.to_string(), e))?;
    parse(&text)
}
