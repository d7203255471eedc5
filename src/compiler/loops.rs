use crate::error::CompileErrorKind;
use crate::opcode::OpCode;
use crate::token::TokenKind;

use super::Compiler;

impl<'a> Compiler<'a> {
  /// `while expr BLOCK`. Pending `break` sites are scoped to this loop via
  /// a push/pop on the current function's break-list stack (see
  /// `FunctionScope::loop_breaks`), so a loop nested inside this one
  /// cannot steal or be stolen from when its own `break`s are patched.
  pub(super) fn while_statement(&mut self) {
    let line = self.previous.line;
    let start = self.current_fn().function.chunk.code.len();

    self.expression();
    let exit_site = self.emit_jump(OpCode::JUMP_IF_FALSE, line);
    self.emit_op(OpCode::POP, line);

    self.current_fn_mut().loop_breaks.push(Vec::new());
    self.block();
    let end_line = self.previous.line;

    self.emit_loop_back(start, end_line);
    self.patch_jump(exit_site, end_line);
    self.emit_op(OpCode::POP, end_line);

    let breaks = self.current_fn_mut().loop_breaks.pop().expect("pushed on loop entry");
    for site in breaks {
      self.patch_jump(site, end_line);
    }
  }

  pub(super) fn break_statement(&mut self) {
    let line = self.previous.line;
    if self.current_fn().loop_breaks.is_empty() {
      self.error_at(line, CompileErrorKind::BreakOutsideLoop);
    }

    let site = self.emit_jump(OpCode::JUMP, line);
    if let Some(list) = self.current_fn_mut().loop_breaks.last_mut() {
      list.push(site);
    }
    self.consume(TokenKind::SEMICOLON, "';'");
  }
}
