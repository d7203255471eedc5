//! A single-pass compiler and stack-based bytecode virtual machine for a
//! small imperative scripting language: let-bindings, `if`/`else`,
//! `while`, `break`, first-class functions, `print`, and the usual
//! arithmetic/bitwise/logical operators.

pub mod chunk;
pub mod compiler;
pub mod error;
pub mod opcode;
pub mod scanner;
pub mod token;
pub mod value;
pub mod vm;

use std::io::Write;

pub use error::InterpretError;

/// Compiles and runs `source`, writing any `print`ed output to stdout.
/// Each call constructs independent compiler and VM state — nothing is
/// retained between calls.
pub fn interpret(source: &str) -> Result<(), InterpretError> {
  let mut stdout = std::io::stdout();
  interpret_to(source, &mut stdout)
}

/// Same as [`interpret`], but writes `print`ed output to `sink` instead of
/// stdout. Exists so tests can assert on exact program output without
/// capturing a subprocess.
pub fn interpret_to(source: &str, sink: &mut dyn Write) -> Result<(), InterpretError> {
  let function = compiler::compile(source)?;
  vm::run(function, sink)
}
