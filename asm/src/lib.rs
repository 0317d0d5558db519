//! Two-pass code generator for PDP-11 style assembly.
//!
//! The front end hands over a [`ast::Program`]; [`assemble`] validates it,
//! lays it out and emits machine words.

pub mod ast;
pub mod codegen;
pub mod emit;
pub mod error;
pub mod image;
pub mod label;
pub mod layout;
pub mod semantic;
pub mod source;

pub use codegen::{assemble, generate, validate, Generated, Options};
pub use error::{Diagnostic, Error, Errors};
