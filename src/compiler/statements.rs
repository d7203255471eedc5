use crate::error::CompileErrorKind;
use crate::opcode::OpCode;
use crate::token::TokenKind;

use super::{Compiler, Target};

impl<'a> Compiler<'a> {
  pub(super) fn statement(&mut self) {
    if self.matches(&TokenKind::PRINT) {
      self.print_statement();
    } else if self.check(&TokenKind::L_CURLY) {
      self.block();
    } else if self.matches(&TokenKind::IF_KW) {
      self.if_statement();
    } else if self.matches(&TokenKind::WHILE_KW) {
      self.while_statement();
    } else if self.matches(&TokenKind::BREAK_KW) {
      self.break_statement();
    } else if self.matches(&TokenKind::RETURN_KW) {
      self.return_statement();
    } else if self.matches(&TokenKind::SEMICOLON) {
      // empty statement
    } else if self.check(&TokenKind::IDENTIFIER) && self.assignment_op_ahead().is_some() {
      self.assignment_statement();
    } else {
      self.expression_statement();
    }
  }

  /// `{ decl* }`. Pops one local per declaration whose scope depth
  /// exceeded the block's own, preserving the stack-discipline invariant
  /// that compile-time local count always tracks runtime stack depth.
  pub(super) fn block(&mut self) {
    self.consume(TokenKind::L_CURLY, "'{'");
    self.begin_scope();
    while !self.check(&TokenKind::R_CURLY) && !self.check(&TokenKind::EOF) {
      self.declaration();
    }
    self.end_scope();
    self.consume(TokenKind::R_CURLY, "'}'");
  }

  fn print_statement(&mut self) {
    let line = self.previous.line;
    let mut count: u32 = 0;
    loop {
      self.expression();
      count += 1;
      if !self.matches(&TokenKind::COMMA) {
        break;
      }
    }
    self.consume(TokenKind::SEMICOLON, "';'");

    if count > 255 {
      self.error_at(line, CompileErrorKind::TooManyArguments);
    }
    self.emit_op(OpCode::PRINT, line);
    self.emit_byte(count as u8, line);
  }

  /// `if expr BLOCK (else if … | else BLOCK)?`. Two `POP`s are required —
  /// one on each arm — because `JUMP_IF_FALSE` leaves the condition on the
  /// stack and whichever arm runs must consume it itself.
  pub(super) fn if_statement(&mut self) {
    let line = self.previous.line;
    self.expression();
    let else_site = self.emit_jump(OpCode::JUMP_IF_FALSE, line);
    self.emit_op(OpCode::POP, line);
    self.block();

    let end_site = self.emit_jump(OpCode::JUMP, self.previous.line);
    self.patch_jump(else_site, self.previous.line);
    self.emit_op(OpCode::POP, self.previous.line);

    if self.matches(&TokenKind::ELSE_KW) {
      if self.matches(&TokenKind::IF_KW) {
        self.if_statement();
      } else {
        self.block();
      }
    }
    self.patch_jump(end_site, self.previous.line);
  }

  fn return_statement(&mut self) {
    let line = self.previous.line;
    if self.current_fn().is_script {
      self.error_at(line, CompileErrorKind::ReturnOutsideFunction);
    }

    if self.matches(&TokenKind::SEMICOLON) {
      self.emit_op(OpCode::PUSH_NIL, line);
      self.emit_op(OpCode::RETURN, line);
      return;
    }
    self.expression();
    self.consume(TokenKind::SEMICOLON, "';'");
    self.emit_op(OpCode::RETURN, line);
  }

  fn assignment_op_ahead(&self) -> Option<TokenKind> {
    match self.peek_next_kind() {
      kind @ (TokenKind::EQUALS
      | TokenKind::PLUS_EQ
      | TokenKind::MINUS_EQ
      | TokenKind::STAR_EQ
      | TokenKind::SLASH_EQ
      | TokenKind::PERCENT_EQ
      | TokenKind::BIT_L_SHIFT_EQ
      | TokenKind::BIT_R_SHIFT_EQ
      | TokenKind::BIT_AND_EQ
      | TokenKind::BIT_OR_EQ
      | TokenKind::BIT_XOR_EQ) => Some(kind),
      _ => None,
    }
  }

  /// `IDENT (= | compound-assign-op) expr ;`. Resolved by one-token
  /// lookahead in [`Self::assignment_op_ahead`]. `SET_GLOBAL` pops the
  /// written value off the stack itself at runtime, so a global
  /// assignment statement is already stack-neutral with no help from
  /// the compiler. `SET_LOCAL` does not pop — its slot is lower in the
  /// stack than the value it's writing, so the written value is left
  /// sitting on top — which means a local assignment statement needs an
  /// explicit trailing `POP` to stay stack-neutral, the same way
  /// [`Self::expression_statement`] pops whatever its expression leaves
  /// behind.
  fn assignment_statement(&mut self) {
    let line = self.current.line;
    let name = self.current.lexeme.clone();
    self.advance(); // consume the identifier
    let target = self.resolve_variable(&name, line);
    self.advance(); // consume the assign-operator

    let op = self.previous.kind.clone();

    if op != TokenKind::EQUALS {
      self.emit_get(&target, line);
    }

    self.expression();

    if op != TokenKind::EQUALS {
      let arith_op = match op {
        TokenKind::PLUS_EQ => OpCode::ADD,
        TokenKind::MINUS_EQ => OpCode::SUB,
        TokenKind::STAR_EQ => OpCode::MUL,
        TokenKind::SLASH_EQ => OpCode::DIV,
        TokenKind::PERCENT_EQ => OpCode::MOD,
        TokenKind::BIT_L_SHIFT_EQ => OpCode::SHL,
        TokenKind::BIT_R_SHIFT_EQ => OpCode::SHR,
        TokenKind::BIT_AND_EQ => OpCode::BIT_AND,
        TokenKind::BIT_OR_EQ => OpCode::BIT_OR,
        TokenKind::BIT_XOR_EQ => OpCode::BIT_XOR,
        _ => unreachable!("assignment_op_ahead only admits assign operators"),
      };
      self.emit_op(arith_op, line);
    }

    self.consume(TokenKind::SEMICOLON, "';'");
    self.emit_set(&target, line);
    if let Target::Local(_) = target {
      self.emit_op(OpCode::POP, line);
    }
  }

  fn emit_get(&mut self, target: &Target, line: usize) {
    match *target {
      Target::Local(slot) => {
        self.emit_op(OpCode::GET_LOCAL, line);
        self.emit_byte(slot, line);
      }
      Target::Global(idx) => {
        self.emit_op(OpCode::GET_GLOBAL, line);
        self.emit_byte(idx, line);
      }
    }
  }

  fn emit_set(&mut self, target: &Target, line: usize) {
    match *target {
      Target::Local(slot) => {
        self.emit_op(OpCode::SET_LOCAL, line);
        self.emit_byte(slot, line);
      }
      Target::Global(idx) => {
        self.emit_op(OpCode::SET_GLOBAL, line);
        self.emit_byte(idx, line);
      }
    }
  }

  fn expression_statement(&mut self) {
    let line = self.current.line;
    self.expression();
    self.consume(TokenKind::SEMICOLON, "';'");
    self.emit_op(OpCode::POP, line);
  }
}
