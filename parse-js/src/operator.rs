//! Operators and their binding strength. Higher precedence binds tighter.

use serde::Serialize;

pub mod prec {
  pub const SEQUENCE: u8 = 1;
  /// Assignment, arrow functions, `yield`, and anything allowed as an argument or element.
  pub const ASSIGNMENT: u8 = 2;
  pub const CONDITIONAL: u8 = 3;
  pub const UNARY: u8 = 15;
  pub const POSTFIX: u8 = 16;
  /// Member access, calls, `new` with arguments, tagged templates.
  pub const CALL: u8 = 17;
  pub const PRIMARY: u8 = 18;
}

#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize)]
pub enum BinaryOp {
  Add,
  Sub,
  Mul,
  Div,
  Rem,
  Exp,
  Shl,
  Shr,
  UShr,
  BitAnd,
  BitOr,
  BitXor,
  And,
  Or,
  Nullish,
  Eq,
  NotEq,
  StrictEq,
  StrictNotEq,
  Lt,
  LtEq,
  Gt,
  GtEq,
  In,
  InstanceOf,
}

impl BinaryOp {
  /// `in` and `instanceof` are matched as words by the caller.
  pub fn from_token(text: &str) -> Option<BinaryOp> {
    Some(match text {
      "+" => BinaryOp::Add,
      "-" => BinaryOp::Sub,
      "*" => BinaryOp::Mul,
      "/" => BinaryOp::Div,
      "%" => BinaryOp::Rem,
      "**" => BinaryOp::Exp,
      "<<" => BinaryOp::Shl,
      ">>" => BinaryOp::Shr,
      ">>>" => BinaryOp::UShr,
      "&" => BinaryOp::BitAnd,
      "|" => BinaryOp::BitOr,
      "^" => BinaryOp::BitXor,
      "&&" => BinaryOp::And,
      "||" => BinaryOp::Or,
      "??" => BinaryOp::Nullish,
      "==" => BinaryOp::Eq,
      "!=" => BinaryOp::NotEq,
      "===" => BinaryOp::StrictEq,
      "!==" => BinaryOp::StrictNotEq,
      "<" => BinaryOp::Lt,
      "<=" => BinaryOp::LtEq,
      ">" => BinaryOp::Gt,
      ">=" => BinaryOp::GtEq,
      "in" => BinaryOp::In,
      "instanceof" => BinaryOp::InstanceOf,
      _ => return None,
    })
  }

  pub fn as_str(self) -> &'static str {
    match self {
      BinaryOp::Add => "+",
      BinaryOp::Sub => "-",
      BinaryOp::Mul => "*",
      BinaryOp::Div => "/",
      BinaryOp::Rem => "%",
      BinaryOp::Exp => "**",
      BinaryOp::Shl => "<<",
      BinaryOp::Shr => ">>",
      BinaryOp::UShr => ">>>",
      BinaryOp::BitAnd => "&",
      BinaryOp::BitOr => "|",
      BinaryOp::BitXor => "^",
      BinaryOp::And => "&&",
      BinaryOp::Or => "||",
      BinaryOp::Nullish => "??",
      BinaryOp::Eq => "==",
      BinaryOp::NotEq => "!=",
      BinaryOp::StrictEq => "===",
      BinaryOp::StrictNotEq => "!==",
      BinaryOp::Lt => "<",
      BinaryOp::LtEq => "<=",
      BinaryOp::Gt => ">",
      BinaryOp::GtEq => ">=",
      BinaryOp::In => "in",
      BinaryOp::InstanceOf => "instanceof",
    }
  }

  pub fn prec(self) -> u8 {
    match self {
      BinaryOp::Nullish | BinaryOp::Or => 4,
      BinaryOp::And => 5,
      BinaryOp::BitOr => 6,
      BinaryOp::BitXor => 7,
      BinaryOp::BitAnd => 8,
      BinaryOp::Eq | BinaryOp::NotEq | BinaryOp::StrictEq | BinaryOp::StrictNotEq => 9,
      BinaryOp::Lt
      | BinaryOp::LtEq
      | BinaryOp::Gt
      | BinaryOp::GtEq
      | BinaryOp::In
      | BinaryOp::InstanceOf => 10,
      BinaryOp::Shl | BinaryOp::Shr | BinaryOp::UShr => 11,
      BinaryOp::Add | BinaryOp::Sub => 12,
      BinaryOp::Mul | BinaryOp::Div | BinaryOp::Rem => 13,
      BinaryOp::Exp => 14,
    }
  }

  pub fn is_right_assoc(self) -> bool {
    self == BinaryOp::Exp
  }

  pub fn is_word(self) -> bool {
    matches!(self, BinaryOp::In | BinaryOp::InstanceOf)
  }

  /// `&&` and `||`, which cannot be mixed with `??` without parentheses.
  pub fn is_logical_and_or(self) -> bool {
    matches!(self, BinaryOp::And | BinaryOp::Or)
  }
}

#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize)]
pub enum AssignOp {
  Assign,
  Add,
  Sub,
  Mul,
  Div,
  Rem,
  Exp,
  Shl,
  Shr,
  UShr,
  BitAnd,
  BitOr,
  BitXor,
  And,
  Or,
  Nullish,
}

impl AssignOp {
  pub fn from_token(text: &str) -> Option<AssignOp> {
    Some(match text {
      "=" => AssignOp::Assign,
      "+=" => AssignOp::Add,
      "-=" => AssignOp::Sub,
      "*=" => AssignOp::Mul,
      "/=" => AssignOp::Div,
      "%=" => AssignOp::Rem,
      "**=" => AssignOp::Exp,
      "<<=" => AssignOp::Shl,
      ">>=" => AssignOp::Shr,
      ">>>=" => AssignOp::UShr,
      "&=" => AssignOp::BitAnd,
      "|=" => AssignOp::BitOr,
      "^=" => AssignOp::BitXor,
      "&&=" => AssignOp::And,
      "||=" => AssignOp::Or,
      "??=" => AssignOp::Nullish,
      _ => return None,
    })
  }

  pub fn as_str(self) -> &'static str {
    match self {
      AssignOp::Assign => "=",
      AssignOp::Add => "+=",
      AssignOp::Sub => "-=",
      AssignOp::Mul => "*=",
      AssignOp::Div => "/=",
      AssignOp::Rem => "%=",
      AssignOp::Exp => "**=",
      AssignOp::Shl => "<<=",
      AssignOp::Shr => ">>=",
      AssignOp::UShr => ">>>=",
      AssignOp::BitAnd => "&=",
      AssignOp::BitOr => "|=",
      AssignOp::BitXor => "^=",
      AssignOp::And => "&&=",
      AssignOp::Or => "||=",
      AssignOp::Nullish => "??=",
    }
  }
}

#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize)]
pub enum UnaryOp {
  Neg,
  Plus,
  Not,
  BitNot,
  Typeof,
  Void,
  Delete,
  Await,
}

impl UnaryOp {
  pub fn from_token(text: &str) -> Option<UnaryOp> {
    Some(match text {
      "-" => UnaryOp::Neg,
      "+" => UnaryOp::Plus,
      "!" => UnaryOp::Not,
      "~" => UnaryOp::BitNot,
      "typeof" => UnaryOp::Typeof,
      "void" => UnaryOp::Void,
      "delete" => UnaryOp::Delete,
      _ => return None,
    })
  }

  pub fn as_str(self) -> &'static str {
    match self {
      UnaryOp::Neg => "-",
      UnaryOp::Plus => "+",
      UnaryOp::Not => "!",
      UnaryOp::BitNot => "~",
      UnaryOp::Typeof => "typeof",
      UnaryOp::Void => "void",
      UnaryOp::Delete => "delete",
      UnaryOp::Await => "await",
    }
  }

  pub fn is_word(self) -> bool {
    matches!(
      self,
      UnaryOp::Typeof | UnaryOp::Void | UnaryOp::Delete | UnaryOp::Await
    )
  }
}

#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize)]
pub enum UpdateOp {
  Inc,
  Dec,
}

impl UpdateOp {
  pub fn as_str(self) -> &'static str {
    match self {
      UpdateOp::Inc => "++",
      UpdateOp::Dec => "--",
    }
  }
}

#[cfg(test)]
mod tests {
  use super::prec;
  use super::AssignOp;
  use super::BinaryOp;

  #[test]
  fn tokens_map_back_to_their_text() {
    for text in ["+", "**", ">>>", "??", "!==", "instanceof"] {
      assert_eq!(BinaryOp::from_token(text).map(BinaryOp::as_str), Some(text));
    }
    for text in ["=", "**=", ">>>=", "??=", "&&="] {
      assert_eq!(AssignOp::from_token(text).map(AssignOp::as_str), Some(text));
    }
    assert_eq!(BinaryOp::from_token("=>"), None);
  }

  #[test]
  fn binary_operators_sit_between_conditional_and_unary() {
    assert_eq!(BinaryOp::Nullish.prec(), BinaryOp::Or.prec());
    assert!(BinaryOp::And.prec() > BinaryOp::Or.prec());
    assert!(BinaryOp::Or.prec() > prec::CONDITIONAL);
    assert!(BinaryOp::Exp.prec() < prec::UNARY);
    assert!(BinaryOp::Exp.is_right_assoc());
  }
}
