use std::fmt;
use std::rc::Rc;

use crate::chunk::Chunk;

/// A runtime value. `Str` and `Function` are heap payloads shared through
/// `Rc` rather than copied. Trimmed to the primitives this language
/// actually has — no arrays, ranges, or native functions.
#[derive(Clone)]
pub enum Value {
  Nil,
  Bool(bool),
  Int(i64),
  Float(f64),
  Str(Rc<str>),
  Function(Rc<FunctionObj>),
}

/// A compiled function: its arity, its own chunk of bytecode, and an
/// optional name (`None` for the implicit top-level script function).
pub struct FunctionObj {
  pub name: Option<Rc<str>>,
  pub arity: u8,
  pub chunk: Chunk,
}

impl Value {
  pub fn type_name(&self) -> &'static str {
    match self {
      Value::Nil => "nil",
      Value::Bool(_) => "bool",
      Value::Int(_) => "int",
      Value::Float(_) => "float",
      Value::Str(_) => "string",
      Value::Function(_) => "function",
    }
  }

  pub fn is_int(&self) -> bool {
    matches!(self, Value::Int(_))
  }

  pub fn is_float(&self) -> bool {
    matches!(self, Value::Float(_))
  }

  pub fn is_numeric(&self) -> bool {
    matches!(self, Value::Int(_) | Value::Float(_))
  }

  pub fn as_int(&self) -> Option<i64> {
    match self {
      Value::Int(v) => Some(*v),
      _ => None,
    }
  }

  pub fn as_float(&self) -> Option<f64> {
    match self {
      Value::Float(v) => Some(*v),
      _ => None,
    }
  }
}

impl PartialEq for Value {
  fn eq(&self, other: &Self) -> bool {
    match (self, other) {
      (Value::Nil, Value::Nil) => true,
      (Value::Bool(a), Value::Bool(b)) => a == b,
      (Value::Int(a), Value::Int(b)) => a == b,
      (Value::Float(a), Value::Float(b)) => a == b,
      (Value::Str(a), Value::Str(b)) => a == b,
      (Value::Function(a), Value::Function(b)) => Rc::ptr_eq(a, b),
      // Differing variants are never equal, including numeric-looking
      // cross-type comparisons like `1 == 1.0`.
      _ => false,
    }
  }
}

impl fmt::Display for Value {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Value::Nil => write!(f, "nil"),
      Value::Bool(b) => write!(f, "{}", b),
      Value::Int(i) => write!(f, "{}", i),
      Value::Float(n) => write!(f, "{}", n),
      Value::Str(s) => write!(f, "{}", s),
      Value::Function(func) => match &func.name {
        Some(name) => write!(f, "<fn {}>", name),
        None => write!(f, "<fn script>"),
      },
    }
  }
}
