mod call_frame;
mod run;

use std::io::Write;
use std::rc::Rc;

use hashbrown::HashMap;

use crate::error::InterpretError;
use crate::value::{FunctionObj, Value};

use call_frame::CallFrame;

/// Frame count and value-stack depth are both bounded at 65,025 — past
/// that a program is assumed to be runaway recursion rather than a
/// legitimate deep call, and the VM aborts instead of letting the host
/// process exhaust memory.
const MAX_FRAMES: usize = 65_025;
const MAX_STACK: usize = 65_025;

/// The stack machine: one shared value stack across all call frames, a
/// process-wide (for the duration of one `interpret` call) global map, and
/// the frame stack driving the dispatch loop in `run.rs`.
pub struct Vm {
  frames: Vec<CallFrame>,
  stack: Vec<Value>,
  globals: HashMap<Rc<str>, Value>,
}

/// Runs a freshly compiled top-level function to completion, writing
/// `print` output to `sink`. `sink` is an injected [`Write`] rather than a
/// hardcoded `io::stdout()` lock so tests can assert on exact output
/// without spawning a subprocess; the CLI wires it to real stdout.
pub fn run(function: Rc<FunctionObj>, sink: &mut dyn Write) -> Result<(), InterpretError> {
  let mut vm = Vm::new(function);
  vm.execute(sink)
}

impl Vm {
  fn new(function: Rc<FunctionObj>) -> Self {
    Self {
      frames: vec![CallFrame::new(function, 0)],
      stack: Vec::new(),
      globals: HashMap::new(),
    }
  }

  fn current_frame(&self) -> &CallFrame {
    self.frames.last().expect("at least one call frame")
  }

  fn current_frame_mut(&mut self) -> &mut CallFrame {
    self.frames.last_mut().expect("at least one call frame")
  }

  fn current_line(&self) -> usize {
    let frame = self.current_frame();
    // ip has already been advanced past the opcode byte by the time an
    // error is reported, so the triggering instruction is at ip - 1.
    let at = frame.ip.saturating_sub(1);
    frame.function.chunk.line_at(at)
  }

  fn push(&mut self, value: Value) -> Result<(), InterpretError> {
    if self.stack.len() >= MAX_STACK {
      return Err(self.runtime_error(crate::error::RuntimeErrorKind::StackOverflow));
    }
    self.stack.push(value);
    Ok(())
  }

  fn pop(&mut self) -> Value {
    self.stack.pop().expect("stack underflow would be a compiler bug")
  }

  fn peek(&self, distance: usize) -> &Value {
    let len = self.stack.len();
    &self.stack[len - 1 - distance]
  }

  fn runtime_error(&self, kind: crate::error::RuntimeErrorKind) -> InterpretError {
    InterpretError::Runtime { kind, line: self.current_line() }
  }
}
