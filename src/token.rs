use std::rc::Rc;

/// The kind of a single lexical token.
///
/// **NOTE:** Changing the order of these variants is harmless (unlike the
/// `OpCode` enum) since token kinds are never cast to or from a raw byte.
#[allow(non_camel_case_types)]
#[derive(Debug, Clone, PartialEq)]
pub enum TokenKind {
  // Literals
  IDENTIFIER,
  INT,
  FLOAT,
  STRING,
  TRUE,
  FALSE,
  NIL,

  // Keywords
  LET_KW,
  FN_KW,
  RETURN_KW,
  IF_KW,
  ELSE_KW,
  WHILE_KW,
  BREAK_KW,
  CONTINUE_KW,
  PRINT,

  // Single-character symbols
  PLUS,
  MINUS,
  STAR,
  SLASH,
  PERCENT,
  BIT_AND,
  BIT_OR,
  BIT_XOR,
  BIT_NOT,
  BANG,
  EQUALS,
  LESS_THAN,
  GREATER_THAN,
  L_PAREN,
  R_PAREN,
  L_CURLY,
  R_CURLY,
  COMMA,
  SEMICOLON,

  // Two-character symbols
  LOGIC_AND,      // &&
  LOGIC_OR,       // ||
  LOGIC_EQ,       // ==
  LOGIC_NOT_EQ,   // !=
  LESS_THAN_EQ,   // <=
  GREATER_THAN_EQ, // >=
  BIT_L_SHIFT,    // <<
  BIT_R_SHIFT,    // >>

  // Assign-operator family
  PLUS_EQ,
  MINUS_EQ,
  STAR_EQ,
  SLASH_EQ,
  PERCENT_EQ,
  BIT_L_SHIFT_EQ,
  BIT_R_SHIFT_EQ,
  BIT_AND_EQ,
  BIT_OR_EQ,
  BIT_XOR_EQ,

  EOF,
  ERROR(IllegalTokenKind),
}

/// The reason a token could not be scanned.
#[derive(Debug, Clone, PartialEq)]
pub enum IllegalTokenKind {
  UnexpectedChar,
  UnterminatedString,
  UnterminatedBlockComment,
  MalformedNumericSeparator,
}

impl IllegalTokenKind {
  pub fn message(&self) -> &'static str {
    match self {
      IllegalTokenKind::UnexpectedChar => "Unexpected character.",
      IllegalTokenKind::UnterminatedString => "Unterminated string.",
      IllegalTokenKind::UnterminatedBlockComment => "Unterminated block comment.",
      IllegalTokenKind::MalformedNumericSeparator => "Malformed numeric separator.",
    }
  }
}

/// A single lexical token produced by the [`Scanner`](crate::scanner::Scanner).
#[derive(Debug, Clone)]
pub struct Token {
  pub kind: TokenKind,
  /// The token's source text. `Rc<str>` so `peek`-ed tokens can be cloned
  /// cheaply while the scanner rewinds its own position.
  pub lexeme: Rc<str>,
  pub line: usize,
}

impl Token {
  pub fn is_eof(&self) -> bool {
    matches!(self.kind, TokenKind::EOF)
  }
}

/// Classifies an already-scanned identifier lexeme as a boolean literal, a
/// keyword, or a plain identifier, in that preference order.
pub fn classify_identifier(lexeme: &str) -> TokenKind {
  match lexeme {
    "true" => TokenKind::TRUE,
    "false" => TokenKind::FALSE,
    "let" => TokenKind::LET_KW,
    "fn" => TokenKind::FN_KW,
    "return" => TokenKind::RETURN_KW,
    "if" => TokenKind::IF_KW,
    "else" => TokenKind::ELSE_KW,
    "while" => TokenKind::WHILE_KW,
    "break" => TokenKind::BREAK_KW,
    "continue" => TokenKind::CONTINUE_KW,
    "print" => TokenKind::PRINT,
    "nil" => TokenKind::NIL,
    _ => TokenKind::IDENTIFIER,
  }
}
