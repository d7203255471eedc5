/// The set of instructions supported by the virtual machine.
///
/// **NOTE:** decoding never uses `transmute` over a raw `#[repr(u8)]` cast —
/// an unrecognized byte in the instruction stream must be a catchable
/// runtime error, not undefined behavior, so [`OpCode::decode`] is a plain
/// exhaustive match and encoding goes through [`OpCode::as_byte`].
#[allow(non_camel_case_types)]
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum OpCode {
  CONST,
  PUSH_NIL,
  POP,

  DEF_GLOBAL,
  GET_GLOBAL,
  SET_GLOBAL,
  GET_LOCAL,
  SET_LOCAL,

  UNARY_NOT,
  UNARY_SUB,
  UNARY_TILDE,
  UNARY_ADD,

  ADD,
  SUB,
  MUL,
  DIV,
  MOD,

  BIT_OR,
  BIT_XOR,
  BIT_AND,
  SHL,
  SHR,

  AND,
  OR,

  EQL,
  LSS,
  GTR,

  PRINT,

  JUMP,
  JUMP_IF_FALSE,
  JUMP_BACK,

  CALL,
  RETURN,
}

impl OpCode {
  pub fn as_byte(self) -> u8 {
    self as u8
  }

  pub fn decode(byte: u8) -> Option<OpCode> {
    match byte {
      0 => Some(OpCode::CONST),
      1 => Some(OpCode::PUSH_NIL),
      2 => Some(OpCode::POP),
      3 => Some(OpCode::DEF_GLOBAL),
      4 => Some(OpCode::GET_GLOBAL),
      5 => Some(OpCode::SET_GLOBAL),
      6 => Some(OpCode::GET_LOCAL),
      7 => Some(OpCode::SET_LOCAL),
      8 => Some(OpCode::UNARY_NOT),
      9 => Some(OpCode::UNARY_SUB),
      10 => Some(OpCode::UNARY_TILDE),
      11 => Some(OpCode::UNARY_ADD),
      12 => Some(OpCode::ADD),
      13 => Some(OpCode::SUB),
      14 => Some(OpCode::MUL),
      15 => Some(OpCode::DIV),
      16 => Some(OpCode::MOD),
      17 => Some(OpCode::BIT_OR),
      18 => Some(OpCode::BIT_XOR),
      19 => Some(OpCode::BIT_AND),
      20 => Some(OpCode::SHL),
      21 => Some(OpCode::SHR),
      22 => Some(OpCode::AND),
      23 => Some(OpCode::OR),
      24 => Some(OpCode::EQL),
      25 => Some(OpCode::LSS),
      26 => Some(OpCode::GTR),
      27 => Some(OpCode::PRINT),
      28 => Some(OpCode::JUMP),
      29 => Some(OpCode::JUMP_IF_FALSE),
      30 => Some(OpCode::JUMP_BACK),
      31 => Some(OpCode::CALL),
      32 => Some(OpCode::RETURN),
      _ => None,
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn every_variant_round_trips_through_its_byte() {
    let all = [
      OpCode::CONST,
      OpCode::PUSH_NIL,
      OpCode::POP,
      OpCode::DEF_GLOBAL,
      OpCode::GET_GLOBAL,
      OpCode::SET_GLOBAL,
      OpCode::GET_LOCAL,
      OpCode::SET_LOCAL,
      OpCode::UNARY_NOT,
      OpCode::UNARY_SUB,
      OpCode::UNARY_TILDE,
      OpCode::UNARY_ADD,
      OpCode::ADD,
      OpCode::SUB,
      OpCode::MUL,
      OpCode::DIV,
      OpCode::MOD,
      OpCode::BIT_OR,
      OpCode::BIT_XOR,
      OpCode::BIT_AND,
      OpCode::SHL,
      OpCode::SHR,
      OpCode::AND,
      OpCode::OR,
      OpCode::EQL,
      OpCode::LSS,
      OpCode::GTR,
      OpCode::PRINT,
      OpCode::JUMP,
      OpCode::JUMP_IF_FALSE,
      OpCode::JUMP_BACK,
      OpCode::CALL,
      OpCode::RETURN,
    ];

    for op in all {
      assert_eq!(OpCode::decode(op.as_byte()), Some(op));
    }
  }

  #[test]
  fn unrecognized_byte_decodes_to_none() {
    assert_eq!(OpCode::decode(255), None);
  }
}
