use std::fmt;

/// Why the compiler rejected a program, not counting the cascade of
/// secondary errors panic-mode synchronization swallows.
#[derive(Debug, Clone, PartialEq)]
pub enum CompileErrorKind {
  UnexpectedToken { expected: &'static str, found: String },
  IllegalToken(String),
  UndefinedVariable(String),
  TooManyLocals,
  TooManyConstants,
  JumpTooLarge,
  BreakOutsideLoop,
  ReturnOutsideFunction,
  InvalidAssignmentTarget,
  TooManyArguments,
}

impl fmt::Display for CompileErrorKind {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      CompileErrorKind::UnexpectedToken { expected, found } => {
        write!(f, "Expected {}, found '{}'.", expected, found)
      }
      CompileErrorKind::IllegalToken(msg) => write!(f, "{}", msg),
      CompileErrorKind::UndefinedVariable(name) => {
        write!(f, "Use of undeclared variable '{}'.", name)
      }
      CompileErrorKind::TooManyLocals => {
        write!(f, "Too many local variables in one function scope.")
      }
      CompileErrorKind::TooManyConstants => {
        write!(f, "Too many constants in one chunk.")
      }
      CompileErrorKind::JumpTooLarge => write!(f, "Loop or branch body too large to jump over."),
      CompileErrorKind::BreakOutsideLoop => write!(f, "Cannot use 'break' outside of a loop."),
      CompileErrorKind::ReturnOutsideFunction => {
        write!(f, "Cannot use 'return' outside of a function.")
      }
      CompileErrorKind::InvalidAssignmentTarget => write!(f, "Invalid assignment target."),
      CompileErrorKind::TooManyArguments => write!(f, "Cannot pass more than 255 arguments."),
    }
  }
}

/// Why the VM aborted a running program.
#[derive(Debug, Clone, PartialEq)]
pub enum RuntimeErrorKind {
  TypeMismatch(String),
  UndefinedGlobal(String),
  DivisionByZero,
  ArityMismatch { expected: u8, found: usize },
  NotCallable(&'static str),
  StackOverflow,
}

impl fmt::Display for RuntimeErrorKind {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      RuntimeErrorKind::TypeMismatch(msg) => write!(f, "{}", msg),
      RuntimeErrorKind::UndefinedGlobal(name) => write!(f, "Undefined variable '{}'.", name),
      RuntimeErrorKind::DivisionByZero => write!(f, "Division by zero."),
      RuntimeErrorKind::ArityMismatch { expected, found } => {
        write!(f, "Expected {} argument(s) but got {}.", expected, found)
      }
      RuntimeErrorKind::NotCallable(type_name) => {
        write!(f, "Cannot call a value of type '{}'.", type_name)
      }
      RuntimeErrorKind::StackOverflow => write!(f, "Stack overflow."),
    }
  }
}

/// The single error type returned by [`crate::interpret`]: either phase,
/// always carrying the source line that triggered it. A plain hand-rolled
/// `Display` impl with no ANSI color codes or traceback: a single call
/// frame and line number is what failed, so there's nothing to trace
/// through.
#[derive(Debug, Clone, PartialEq)]
pub enum InterpretError {
  Compile { kind: CompileErrorKind, line: usize },
  Runtime { kind: RuntimeErrorKind, line: usize },
}

impl fmt::Display for InterpretError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      InterpretError::Compile { kind, line } => {
        write!(f, "[line {}] CompileError: {}", line, kind)
      }
      InterpretError::Runtime { kind, line } => {
        write!(f, "[line {}] RuntimeError: {}", line, kind)
      }
    }
  }
}

impl std::error::Error for InterpretError {}
