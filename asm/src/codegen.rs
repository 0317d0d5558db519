//! Pipeline driver: validation, first pass, second pass.

use arch::Word;

use crate::{
    ast::Program,
    emit::second_pass,
    error::{Errors, Warning},
    layout::{first_pass, Layout},
    semantic,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Options {
    /// Added to every label address emitted as an absolute operand.
    pub base_load_address: Word,
}

/// A successfully generated program.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Generated {
    pub words: Vec<Word>,
    pub layout: Layout,
    /// Warnings of both passes, in program order per pass.
    pub warnings: Vec<Warning>,
}

/// Semantic validation only.
pub fn validate(program: &Program) -> Result<(), Errors> {
    Errors::check(semantic::validate(program))
}

/// Runs both passes over a program assumed to be valid.
///
/// Fails when the program outgrows the address space, or with every
/// undefined label reference when any label cannot be resolved; no words
/// are produced in either case.
pub fn generate(program: &Program, options: &Options) -> Result<Generated, Errors> {
    let layout = first_pass(program);
    Errors::check(layout.errors().to_vec())?;
    let emission = second_pass(program, &layout, options.base_load_address);
    Errors::check(emission.errors)?;

    let mut warnings = layout.warnings().to_vec();
    warnings.extend(emission.warnings);
    log::debug!(
        "generate: {} words, base {:06o}, {} warnings",
        emission.words.len(),
        options.base_load_address,
        warnings.len()
    );
    Ok(Generated {
        words: emission.words,
        layout,
        warnings,
    })
}

/// Validates, then generates. Code generation is never attempted on a
/// program with semantic errors.
pub fn assemble(program: &Program, options: &Options) -> Result<Generated, Errors> {
    validate(program)?;
    generate(program, options)
}
