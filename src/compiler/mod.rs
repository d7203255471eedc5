mod expressions;
mod functions;
mod loops;
mod statements;

use std::rc::Rc;

use crate::error::{CompileErrorKind, InterpretError};
use crate::opcode::OpCode;
use crate::scanner::Scanner;
use crate::token::{Token, TokenKind};
use crate::value::{FunctionObj, Value};

use functions::FunctionScope;

/// Resolves an identifier to either a compile-time stack slot or a
/// constant-pool index naming a global.
pub enum Target {
  Local(u8),
  Global(u8),
}

/// The single-pass compiler: tokens in, bytecode out, no intermediate AST.
/// Owns a stack of [`FunctionScope`]s — the chain of per-function contexts
/// described in the data model, modeled positionally rather than with
/// parent pointers.
pub struct Compiler<'a> {
  scanner: Scanner<'a>,
  previous: Token,
  current: Token,
  had_error: bool,
  panic_mode: bool,
  error: Option<InterpretError>,
  functions: Vec<FunctionScope>,
}

/// Compiles `source` into the implicit top-level function (arity 0, name
/// `None`). Returns every compile error the synchronize-and-continue loop
/// reported the first of, or the finished function on success.
pub fn compile(source: &str) -> Result<Rc<FunctionObj>, InterpretError> {
  let mut compiler = Compiler::new(source);

  while !compiler.check(&TokenKind::EOF) {
    compiler.declaration();
  }

  let line = compiler.current.line;
  compiler.emit_op(OpCode::PUSH_NIL, line);
  compiler.emit_op(OpCode::RETURN, line);

  if compiler.had_error {
    return Err(compiler.error.unwrap());
  }

  let top = compiler.functions.pop().expect("top-level function scope");
  Ok(Rc::new(top.function))
}

impl<'a> Compiler<'a> {
  fn new(source: &'a str) -> Self {
    let placeholder = Token { kind: TokenKind::EOF, lexeme: Rc::from(""), line: 1 };
    let mut compiler = Self {
      scanner: Scanner::new(source),
      previous: placeholder.clone(),
      current: placeholder,
      had_error: false,
      panic_mode: false,
      error: None,
      functions: vec![FunctionScope::new(None, true, 0)],
    };
    compiler.advance();
    compiler
  }

  fn current_fn(&self) -> &FunctionScope {
    self.functions.last().expect("at least one function scope")
  }

  fn current_fn_mut(&mut self) -> &mut FunctionScope {
    self.functions.last_mut().expect("at least one function scope")
  }

  // --- token stream plumbing: advance/check/matches/consume ---

  fn advance(&mut self) {
    std::mem::swap(&mut self.previous, &mut self.current);
    loop {
      self.current = self.scanner.next();
      if let TokenKind::ERROR(kind) = &self.current.kind {
        let message = kind.message().to_string();
        let line = self.current.line;
        self.error_at(line, CompileErrorKind::IllegalToken(message));
        continue;
      }
      break;
    }
  }

  fn check(&self, kind: &TokenKind) -> bool {
    &self.current.kind == kind
  }

  fn matches(&mut self, kind: &TokenKind) -> bool {
    if self.check(kind) {
      self.advance();
      true
    } else {
      false
    }
  }

  fn consume(&mut self, kind: TokenKind, expected: &'static str) {
    if self.check(&kind) {
      self.advance();
      return;
    }
    let found = self.current.lexeme.to_string();
    let line = self.current.line;
    self.error_at(line, CompileErrorKind::UnexpectedToken { expected, found });
  }

  /// One-token lookahead past `current`, used only to decide whether an
  /// identifier starts an assignment statement.
  fn peek_next_kind(&self) -> TokenKind {
    self.scanner.peek(0).kind
  }

  fn error_at(&mut self, line: usize, kind: CompileErrorKind) {
    self.had_error = true;
    if self.panic_mode {
      return;
    }
    self.panic_mode = true;
    self.error = Some(InterpretError::Compile { kind, line });
  }

  /// Skips tokens until a likely statement boundary, so one bad token
  /// does not cascade into a string of spurious follow-on errors.
  fn synchronize(&mut self) {
    self.panic_mode = false;

    while !self.check(&TokenKind::EOF) {
      if self.previous.kind == TokenKind::SEMICOLON {
        return;
      }
      match self.current.kind {
        TokenKind::FN_KW
        | TokenKind::LET_KW
        | TokenKind::IF_KW
        | TokenKind::WHILE_KW
        | TokenKind::RETURN_KW
        | TokenKind::PRINT
        | TokenKind::L_CURLY => return,
        _ => {}
      }
      self.advance();
    }
  }

  // --- bytecode emission ---

  fn emit_byte(&mut self, byte: u8, line: usize) {
    self.current_fn_mut().function.chunk.push_byte(byte, line);
  }

  fn emit_op(&mut self, op: OpCode, line: usize) {
    self.current_fn_mut().function.chunk.push_op(op, line);
  }

  fn emit_jump(&mut self, op: OpCode, line: usize) -> usize {
    self.emit_op(op, line);
    self.current_fn_mut().function.chunk.push_jump_placeholder(line)
  }

  fn patch_jump(&mut self, site: usize, line: usize) {
    if self.current_fn_mut().function.chunk.patch_jump(site).is_err() {
      self.error_at(line, CompileErrorKind::JumpTooLarge);
    }
  }

  fn emit_loop_back(&mut self, start: usize, line: usize) {
    self.emit_op(OpCode::JUMP_BACK, line);
    match self.current_fn().function.chunk.back_jump_offset(start) {
      Ok(offset) => self.current_fn_mut().function.chunk.push_short(offset, line),
      Err(()) => self.error_at(line, CompileErrorKind::JumpTooLarge),
    }
  }

  fn add_constant(&mut self, value: Value, line: usize) -> u8 {
    match self.current_fn_mut().function.chunk.add_constant(value) {
      Ok(idx) => idx,
      Err(_) => {
        self.error_at(line, CompileErrorKind::TooManyConstants);
        0
      }
    }
  }

  // --- scope / variable resolution, shared by let, fn params, and
  // assignment/identifier expression parsing ---

  fn begin_scope(&mut self) {
    self.current_fn_mut().scope_depth += 1;
  }

  fn end_scope(&mut self) {
    let line = self.previous.line;
    let depth = {
      let scope = self.current_fn_mut();
      scope.scope_depth -= 1;
      scope.scope_depth
    };

    while self.current_fn().locals.last().map_or(false, |l| l.depth > depth) {
      self.current_fn_mut().locals.pop();
      self.emit_op(OpCode::POP, line);
    }
  }

  fn declare_local(&mut self, name: Rc<str>, line: usize) {
    if self.current_fn().locals.len() >= 255 {
      self.error_at(line, CompileErrorKind::TooManyLocals);
      return;
    }
    let depth = self.current_fn().scope_depth;
    self.current_fn_mut().locals.push(functions::Local { name, depth });
  }

  /// Binds `name` as a variable in whatever scope is current: a true
  /// global at top-level scope depth 0, a local everywhere else
  /// (including inside a function's own depth-1 parameter scope).
  fn bind_variable(&mut self, name: Rc<str>, line: usize) {
    if self.current_fn().scope_depth == 0 {
      let idx = self.add_constant(Value::Str(Rc::clone(&name)), line);
      self.emit_op(OpCode::DEF_GLOBAL, line);
      self.emit_byte(idx, line);
    } else {
      self.declare_local(name, line);
    }
  }

  fn resolve_variable(&mut self, name: &str, line: usize) -> Target {
    match self.current_fn().resolve_local(name) {
      Some(slot) => Target::Local(slot),
      None => {
        let idx = self.add_constant(Value::Str(Rc::from(name)), line);
        Target::Global(idx)
      }
    }
  }

  // --- declarations ---

  fn declaration(&mut self) {
    if self.matches(&TokenKind::FN_KW) {
      self.function_declaration();
    } else if self.matches(&TokenKind::LET_KW) {
      self.var_declaration();
    } else {
      self.statement();
    }

    if self.panic_mode {
      self.synchronize();
    }
  }

  fn var_declaration(&mut self) {
    let line = self.current.line;
    let name: Rc<str> = Rc::from(&*self.current.lexeme);
    self.consume(TokenKind::IDENTIFIER, "a variable name");
    self.consume(TokenKind::EQUALS, "'='");
    self.expression();
    self.consume(TokenKind::SEMICOLON, "';'");
    self.bind_variable(name, line);
  }

  /// `fn NAME ( PARAM , … ) BLOCK`. Compiles the body in a fresh function
  /// context (scope depth starts at 1, as if already inside the body's
  /// own block, since parameters are locals too), then treats the
  /// resulting function value exactly like a `let`-bound variable in the
  /// enclosing context.
  fn function_declaration(&mut self) {
    let decl_line = self.current.line;
    let name: Rc<str> = Rc::from(&*self.current.lexeme);
    self.consume(TokenKind::IDENTIFIER, "a function name");

    self.functions.push(FunctionScope::new(Some(Rc::clone(&name)), false, 1));

    self.consume(TokenKind::L_PAREN, "'('");
    if !self.check(&TokenKind::R_PAREN) {
      loop {
        let param_line = self.current.line;
        let param_name: Rc<str> = Rc::from(&*self.current.lexeme);
        self.consume(TokenKind::IDENTIFIER, "a parameter name");
        self.declare_local(param_name, param_line);
        if self.current_fn().function.arity == 255 {
          self.error_at(param_line, CompileErrorKind::TooManyArguments);
        } else {
          self.current_fn_mut().function.arity += 1;
        }
        if !self.matches(&TokenKind::COMMA) {
          break;
        }
      }
    }
    self.consume(TokenKind::R_PAREN, "')'");

    self.block();
    let end_line = self.previous.line;
    self.emit_op(OpCode::PUSH_NIL, end_line);
    self.emit_op(OpCode::RETURN, end_line);

    let scope = self.functions.pop().expect("pushed function scope");
    let func = Rc::new(scope.function);
    self.bind_function(name, func, decl_line);
  }

  fn bind_function(&mut self, name: Rc<str>, func: Rc<FunctionObj>, line: usize) {
    self.emit_constant_fn(func, line);
    self.bind_variable(name, line);
  }

  fn emit_constant_fn(&mut self, func: Rc<FunctionObj>, line: usize) {
    let idx = self.add_constant(Value::Function(func), line);
    self.emit_op(OpCode::CONST, line);
    self.emit_byte(idx, line);
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn opcodes(source: &str) -> Vec<OpCode> {
    let function = compile(source).expect("program compiles");
    function
      .chunk
      .code
      .iter()
      .filter_map(|&byte| OpCode::decode(byte))
      .collect()
  }

  #[test]
  fn a_block_pops_its_locals_back_off_on_the_way_out() {
    // Two locals declared, both must be popped before the trailing
    // PUSH_NIL/RETURN pair the top-level function always ends with.
    let ops = opcodes("{ let a = 1; let b = 2; }");
    let pops = ops.iter().filter(|op| **op == OpCode::POP).count();
    assert_eq!(pops, 2);
  }

  #[test]
  fn le_desugars_to_greater_then_not() {
    let ops = opcodes("print 1 <= 2;");
    let gtr_at = ops.iter().position(|op| *op == OpCode::GTR).expect("a GTR op");
    assert_eq!(ops[gtr_at + 1], OpCode::UNARY_NOT);
  }

  #[test]
  fn ge_desugars_to_less_then_not() {
    let ops = opcodes("print 1 >= 2;");
    let lss_at = ops.iter().position(|op| *op == OpCode::LSS).expect("a LSS op");
    assert_eq!(ops[lss_at + 1], OpCode::UNARY_NOT);
  }

  #[test]
  fn compound_assignment_never_leaves_a_bare_set_local_unused() {
    // SET_LOCAL leaves its value on the stack; a bare assignment statement
    // must still end in a POP so the stack doesn't grow unboundedly.
    let ops = opcodes("{ let a = 1; a += 1; }");
    let set_at = ops.iter().position(|op| *op == OpCode::SET_LOCAL).expect("a SET_LOCAL op");
    assert_eq!(ops[set_at + 1], OpCode::POP);
  }

  #[test]
  fn redeclaring_a_local_in_the_same_scope_shadows_the_earlier_one() {
    // Not a compile error: resolve_local's reverse search always finds the
    // newest matching name, so the later `a` simply shadows the earlier one
    // for the rest of the scope.
    let ops = opcodes("{ let a = 1; let a = a + 1; print a; }");
    assert!(ops.iter().any(|op| *op == OpCode::GET_LOCAL));
  }

  #[test]
  fn shadowing_across_nested_blocks_is_allowed() {
    assert!(compile("{ let a = 1; { let a = 2; } }").is_ok());
  }
}
