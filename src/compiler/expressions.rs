use std::rc::Rc;

use crate::error::CompileErrorKind;
use crate::opcode::OpCode;
use crate::token::TokenKind;
use crate::value::Value;

use super::{Compiler, Target};

/// One precedence tighter than the tightest infix operator (`CALL`), so a
/// unary operand parses through calls (`-f(x)` is `-(f(x))`) but no
/// further binary operator.
const HIGHEST_PREC: u8 = 6;

fn infix_precedence(kind: &TokenKind) -> u8 {
  match kind {
    TokenKind::LOGIC_OR => 1,
    TokenKind::LOGIC_AND => 2,
    TokenKind::LOGIC_EQ
    | TokenKind::LOGIC_NOT_EQ
    | TokenKind::LESS_THAN
    | TokenKind::LESS_THAN_EQ
    | TokenKind::GREATER_THAN
    | TokenKind::GREATER_THAN_EQ => 3,
    TokenKind::PLUS | TokenKind::MINUS | TokenKind::BIT_OR | TokenKind::BIT_XOR => 4,
    TokenKind::STAR
    | TokenKind::SLASH
    | TokenKind::PERCENT
    | TokenKind::BIT_L_SHIFT
    | TokenKind::BIT_R_SHIFT
    | TokenKind::BIT_AND => 5,
    TokenKind::L_PAREN => 6,
    _ => 0,
  }
}

impl<'a> Compiler<'a> {
  pub(super) fn expression(&mut self) {
    self.parse_precedence(1);
  }

  /// Consumes a prefix form, then repeatedly consumes infix operators
  /// whose precedence is at least `min_prec`, recursing one level tighter
  /// after each to keep them left-associative.
  fn parse_precedence(&mut self, min_prec: u8) {
    self.advance();
    self.parse_prefix();

    while infix_precedence(&self.current.kind) >= min_prec {
      self.advance();
      self.parse_infix();
    }
  }

  fn parse_prefix(&mut self) {
    let kind = self.previous.kind.clone();
    let line = self.previous.line;

    match kind {
      TokenKind::PLUS => {
        self.parse_precedence(HIGHEST_PREC);
        self.emit_op(OpCode::UNARY_ADD, line);
      }
      TokenKind::MINUS => {
        self.parse_precedence(HIGHEST_PREC);
        self.emit_op(OpCode::UNARY_SUB, line);
      }
      TokenKind::BIT_NOT => {
        self.parse_precedence(HIGHEST_PREC);
        self.emit_op(OpCode::UNARY_TILDE, line);
      }
      TokenKind::BANG => {
        self.parse_precedence(HIGHEST_PREC);
        self.emit_op(OpCode::UNARY_NOT, line);
      }
      TokenKind::L_PAREN => {
        self.parse_precedence(1);
        self.consume(TokenKind::R_PAREN, "')'");
      }
      TokenKind::INT => {
        let lexeme = self.previous.lexeme.clone();
        match lexeme.parse::<i64>() {
          Ok(v) => self.emit_constant(Value::Int(v), line),
          Err(_) => self.error_at(
            line,
            CompileErrorKind::IllegalToken(format!("Integer literal '{}' out of range.", lexeme)),
          ),
        }
      }
      TokenKind::FLOAT => {
        let lexeme = self.previous.lexeme.clone();
        match lexeme.parse::<f64>() {
          Ok(v) => self.emit_constant(Value::Float(v), line),
          Err(_) => self.error_at(
            line,
            CompileErrorKind::IllegalToken(format!("Float literal '{}' out of range.", lexeme)),
          ),
        }
      }
      TokenKind::STRING => {
        let raw = &*self.previous.lexeme;
        let inner = &raw[1..raw.len() - 1];
        self.emit_constant(Value::Str(Rc::from(inner)), line);
      }
      TokenKind::TRUE => self.emit_constant(Value::Bool(true), line),
      TokenKind::FALSE => self.emit_constant(Value::Bool(false), line),
      TokenKind::NIL => self.emit_constant(Value::Nil, line),
      TokenKind::IDENTIFIER => {
        let name = self.previous.lexeme.clone();
        match self.resolve_variable(&name, line) {
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
      _ => {
        let found = self.previous.lexeme.to_string();
        self.error_at(
          line,
          CompileErrorKind::UnexpectedToken { expected: "an expression", found },
        );
      }
    }
  }

  fn parse_infix(&mut self) {
    let kind = self.previous.kind.clone();
    let line = self.previous.line;

    match kind {
      TokenKind::LOGIC_OR => {
        self.parse_precedence(2);
        self.emit_op(OpCode::OR, line);
      }
      TokenKind::LOGIC_AND => {
        self.parse_precedence(3);
        self.emit_op(OpCode::AND, line);
      }
      TokenKind::LOGIC_EQ => {
        self.parse_precedence(4);
        self.emit_op(OpCode::EQL, line);
      }
      TokenKind::LOGIC_NOT_EQ => {
        self.parse_precedence(4);
        self.emit_op(OpCode::EQL, line);
        self.emit_op(OpCode::UNARY_NOT, line);
      }
      TokenKind::LESS_THAN => {
        self.parse_precedence(4);
        self.emit_op(OpCode::LSS, line);
      }
      TokenKind::LESS_THAN_EQ => {
        self.parse_precedence(4);
        self.emit_op(OpCode::GTR, line);
        self.emit_op(OpCode::UNARY_NOT, line);
      }
      TokenKind::GREATER_THAN => {
        self.parse_precedence(4);
        self.emit_op(OpCode::GTR, line);
      }
      TokenKind::GREATER_THAN_EQ => {
        self.parse_precedence(4);
        self.emit_op(OpCode::LSS, line);
        self.emit_op(OpCode::UNARY_NOT, line);
      }
      TokenKind::PLUS => {
        self.parse_precedence(5);
        self.emit_op(OpCode::ADD, line);
      }
      TokenKind::MINUS => {
        self.parse_precedence(5);
        self.emit_op(OpCode::SUB, line);
      }
      TokenKind::BIT_OR => {
        self.parse_precedence(5);
        self.emit_op(OpCode::BIT_OR, line);
      }
      TokenKind::BIT_XOR => {
        self.parse_precedence(5);
        self.emit_op(OpCode::BIT_XOR, line);
      }
      TokenKind::STAR => {
        self.parse_precedence(6);
        self.emit_op(OpCode::MUL, line);
      }
      TokenKind::SLASH => {
        self.parse_precedence(6);
        self.emit_op(OpCode::DIV, line);
      }
      TokenKind::PERCENT => {
        self.parse_precedence(6);
        self.emit_op(OpCode::MOD, line);
      }
      TokenKind::BIT_L_SHIFT => {
        self.parse_precedence(6);
        self.emit_op(OpCode::SHL, line);
      }
      TokenKind::BIT_R_SHIFT => {
        self.parse_precedence(6);
        self.emit_op(OpCode::SHR, line);
      }
      TokenKind::BIT_AND => {
        self.parse_precedence(6);
        self.emit_op(OpCode::BIT_AND, line);
      }
      TokenKind::L_PAREN => self.call_expression(line),
      _ => unreachable!("infix_precedence only admits tokens handled above"),
    }
  }

  fn call_expression(&mut self, line: usize) {
    let mut argc: u32 = 0;
    if !self.check(&TokenKind::R_PAREN) {
      loop {
        self.expression();
        argc += 1;
        if !self.matches(&TokenKind::COMMA) {
          break;
        }
      }
    }
    self.consume(TokenKind::R_PAREN, "')'");

    if argc > 255 {
      self.error_at(line, CompileErrorKind::TooManyArguments);
    }
    self.emit_op(OpCode::CALL, line);
    self.emit_byte(argc as u8, line);
  }

  fn emit_constant(&mut self, value: Value, line: usize) {
    let idx = self.add_constant(value, line);
    self.emit_op(OpCode::CONST, line);
    self.emit_byte(idx, line);
  }
}
