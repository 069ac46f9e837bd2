use crate::pat::emit_params;
use crate::pat::emit_pat;
use crate::precedence::contains_call;
use crate::precedence::expr_prec;
use crate::precedence::mixes_nullish;
use crate::precedence::start_of;
use crate::precedence::Start;
use crate::stmt::emit_block;
use crate::Emitter;
use parse_js::ast::class::ClassMember;
use parse_js::ast::class::MethodKind;
use parse_js::ast::class::ObjectMember;
use parse_js::ast::class::PropKey;
use parse_js::ast::expr::Arg;
use parse_js::ast::expr::ArrayElem;
use parse_js::ast::expr::BinaryExpr;
use parse_js::ast::expr::Expr;
use parse_js::ast::expr::TemplatePart;
use parse_js::ast::func::Function;
use parse_js::ast::func::FunctionBody;
use parse_js::ast::node::Node;
use parse_js::ast::pat::DeclName;
use parse_js::num::JsNumber;
use parse_js::operator::prec;

/// The shortest decimal text that reads back as `value`.
pub(crate) fn number_text(value: JsNumber) -> String {
  let v = value.0;
  if v.is_infinite() {
    return "1e999".to_string();
  };
  let plain = v.to_string();
  let exponent = format!("{v:e}");
  if exponent.len() < plain.len() {
    exponent
  } else {
    plain
  }
}

pub fn emit_expr(out: &mut Emitter, expr: &Node<Expr>) {
  emit_expr_at(out, expr, prec::SEQUENCE);
}

/// Emits `expr` where the grammar needs at least `min` precedence, adding parentheses if it binds
/// more loosely.
pub(crate) fn emit_expr_at(out: &mut Emitter, expr: &Node<Expr>, min: u8) {
  if expr_prec(expr) < min {
    emit_in_parens(out, expr);
  } else {
    emit_unparenthesized(out, expr);
  }
}

pub(crate) fn emit_in_parens(out: &mut Emitter, expr: &Node<Expr>) {
  out.punct("(");
  emit_expr(out, expr);
  out.punct(")");
}

// The object of a member access, callee or tag. An optional chain there would extend over the
// access.
fn emit_object(out: &mut Emitter, object: &Node<Expr>) {
  if matches!(object.stx.as_ref(), Expr::Chain(_)) {
    emit_in_parens(out, object);
  } else {
    emit_expr_at(out, object, prec::CALL);
  }
}

fn emit_args(out: &mut Emitter, args: &[Arg]) {
  out.punct("(");
  for (i, arg) in args.iter().enumerate() {
    if i > 0 {
      out.punct(",");
    };
    if arg.spread {
      out.punct("...");
    };
    emit_expr_at(out, &arg.value, prec::ASSIGNMENT);
  }
  out.punct(")");
}

fn emit_binary(out: &mut Emitter, binary: &BinaryExpr) {
  let op = binary.op;
  let (left_min, right_min) = if op.is_right_assoc() {
    // `-a ** b` is a syntax error.
    (prec::POSTFIX, op.prec())
  } else {
    (op.prec(), op.prec() + 1)
  };
  for (i, operand) in [&binary.left, &binary.right].into_iter().enumerate() {
    if i == 1 {
      if op.is_word() {
        out.keyword(op.as_str());
      } else {
        out.punct(op.as_str());
      };
    };
    if mixes_nullish(op, operand) {
      emit_in_parens(out, operand);
    } else {
      emit_expr_at(out, operand, if i == 0 { left_min } else { right_min });
    };
  }
}

fn emit_template(out: &mut Emitter, parts: &[TemplatePart]) {
  out.verbatim("`");
  for part in parts {
    match part {
      TemplatePart::Raw(raw) => out.template_chunk(raw),
      TemplatePart::Expr(expr) => {
        out.template_chunk("${");
        emit_expr(out, expr);
        out.template_chunk("}");
      }
    };
  }
  out.template_chunk("`");
}

pub(crate) fn emit_prop_key(out: &mut Emitter, key: &PropKey) {
  match key {
    PropKey::Ident(name) => out.ident(name),
    PropKey::Str(value) => out.string(value),
    PropKey::Number(value) => out.number(&number_text(*value)),
    PropKey::BigInt(digits) => out.number(&format!("{digits}n")),
    PropKey::Private(name) => out.ident(&format!("#{name}")),
    PropKey::Computed(expr) => {
      out.punct("[");
      emit_expr_at(out, expr, prec::ASSIGNMENT);
      out.punct("]");
    }
  };
}

fn emit_function_body(out: &mut Emitter, body: &FunctionBody) {
  match body {
    FunctionBody::Block(stmts) => emit_block(out, stmts),
    FunctionBody::Expr(expr) => {
      if start_of(expr) == Start::Brace {
        emit_in_parens(out, expr);
      } else {
        emit_expr_at(out, expr, prec::ASSIGNMENT);
      }
    }
  };
}

/// `function`, with its name if it has one. Also used for declarations.
pub(crate) fn emit_function(out: &mut Emitter, name: Option<&Node<DeclName>>, func: &Function) {
  if func.is_async {
    out.keyword("async");
  };
  out.keyword("function");
  if func.generator {
    out.punct("*");
  };
  if let Some(name) = name {
    out.ident(&name.stx.name);
  };
  emit_params(out, &func.params);
  emit_function_body(out, &func.body);
}

fn emit_arrow(out: &mut Emitter, func: &Function) {
  if func.is_async {
    out.keyword("async");
  };
  emit_params(out, &func.params);
  out.punct("=>");
  emit_function_body(out, &func.body);
}

fn emit_method(out: &mut Emitter, key: &PropKey, kind: MethodKind, func: &Function) {
  if func.is_async {
    out.keyword("async");
  };
  if func.generator {
    out.punct("*");
  };
  match kind {
    MethodKind::Method => {}
    MethodKind::Getter => out.keyword("get"),
    MethodKind::Setter => out.keyword("set"),
  };
  emit_prop_key(out, key);
  emit_params(out, &func.params);
  emit_function_body(out, &func.body);
}

fn emit_object_member(out: &mut Emitter, member: &ObjectMember) {
  match member {
    ObjectMember::Prop { key, value } => {
      emit_prop_key(out, key);
      out.punct(":");
      emit_expr_at(out, value, prec::ASSIGNMENT);
    }
    ObjectMember::Method { key, kind, func } => emit_method(out, key, *kind, &func.stx),
    ObjectMember::Shorthand { id } => out.ident(&id.stx.name),
    ObjectMember::Spread { value } => {
      out.punct("...");
      emit_expr_at(out, value, prec::ASSIGNMENT);
    }
  };
}

fn emit_class_member(out: &mut Emitter, member: &ClassMember) {
  match member {
    ClassMember::Method {
      is_static,
      key,
      kind,
      func,
    } => {
      if *is_static {
        out.keyword("static");
      };
      emit_method(out, key, *kind, &func.stx);
    }
    ClassMember::Field {
      is_static,
      key,
      value,
    } => {
      if *is_static {
        out.keyword("static");
      };
      emit_prop_key(out, key);
      if let Some(value) = value {
        out.punct("=");
        emit_expr_at(out, value, prec::ASSIGNMENT);
      };
      out.punct(";");
    }
    ClassMember::StaticBlock { body } => {
      out.keyword("static");
      emit_block(out, body);
    }
  };
}

/// `class`, with its name if it has one. Also used for declarations.
pub(crate) fn emit_class(
  out: &mut Emitter,
  name: Option<&Node<DeclName>>,
  extends: Option<&Node<Expr>>,
  members: &[Node<ClassMember>],
) {
  out.keyword("class");
  if let Some(name) = name {
    out.ident(&name.stx.name);
  };
  if let Some(extends) = extends {
    out.keyword("extends");
    emit_expr_at(out, extends, prec::CALL);
  };
  out.punct("{");
  for member in members {
    emit_class_member(out, &member.stx);
  }
  out.punct("}");
}

fn emit_unparenthesized(out: &mut Emitter, expr: &Node<Expr>) {
  match expr.stx.as_ref() {
    Expr::Array(array) => {
      out.punct("[");
      let count = array.stx.elements.len();
      for (i, elem) in array.stx.elements.iter().enumerate() {
        let value = match elem {
          ArrayElem::Hole => {
            out.punct(",");
            continue;
          }
          ArrayElem::Single(value) => value,
          ArrayElem::Spread(value) => {
            out.punct("...");
            value
          }
        };
        emit_expr_at(out, value, prec::ASSIGNMENT);
        if i + 1 < count {
          out.punct(",");
        };
      }
      out.punct("]");
    }
    Expr::Arrow(arrow) => emit_arrow(out, &arrow.stx.func.stx),
    Expr::Assign(assign) => {
      emit_pat(out, &assign.stx.target);
      out.punct(assign.stx.op.as_str());
      emit_expr_at(out, &assign.stx.value, prec::ASSIGNMENT);
    }
    Expr::BigInt(big) => out.number(&format!("{}n", big.stx.value)),
    Expr::Binary(binary) => emit_binary(out, &binary.stx),
    Expr::Bool(b) => out.keyword(if b.stx.value { "true" } else { "false" }),
    Expr::Call(call) => {
      emit_object(out, &call.stx.callee);
      if call.stx.optional {
        out.punct("?.");
      };
      emit_args(out, &call.stx.args);
    }
    Expr::Chain(chain) => emit_expr_at(out, &chain.stx.expr, prec::CALL),
    Expr::Class(class) => emit_class(
      out,
      class.stx.name.as_ref(),
      class.stx.extends.as_ref(),
      &class.stx.members,
    ),
    Expr::Cond(cond) => {
      emit_expr_at(out, &cond.stx.test, prec::CONDITIONAL + 1);
      out.punct("?");
      emit_expr_at(out, &cond.stx.consequent, prec::ASSIGNMENT);
      out.punct(":");
      emit_expr_at(out, &cond.stx.alternate, prec::ASSIGNMENT);
    }
    Expr::Function(func) => emit_function(out, func.stx.name.as_ref(), &func.stx.func.stx),
    Expr::Ident(id) => out.ident(&id.stx.name),
    Expr::Import(import) => {
      out.keyword("import");
      out.punct("(");
      emit_expr_at(out, &import.stx.module, prec::ASSIGNMENT);
      if let Some(options) = &import.stx.options {
        out.punct(",");
        emit_expr_at(out, options, prec::ASSIGNMENT);
      };
      out.punct(")");
    }
    Expr::ImportMeta(_) => {
      out.keyword("import");
      out.punct(".");
      out.keyword("meta");
    }
    Expr::Index(index) => {
      emit_object(out, &index.stx.object);
      if index.stx.optional {
        out.punct("?.");
      };
      out.punct("[");
      emit_expr(out, &index.stx.index);
      out.punct("]");
    }
    Expr::Member(member) => {
      emit_object(out, &member.stx.object);
      out.punct(if member.stx.optional { "?." } else { "." });
      out.ident(&member.stx.prop);
    }
    Expr::New(new) => {
      out.keyword("new");
      if contains_call(&new.stx.callee) {
        emit_in_parens(out, &new.stx.callee);
      } else {
        emit_expr_at(out, &new.stx.callee, prec::CALL);
      };
      emit_args(out, &new.stx.args);
    }
    Expr::NewTarget(_) => {
      out.keyword("new");
      out.punct(".");
      out.keyword("target");
    }
    Expr::Null(_) => out.keyword("null"),
    Expr::Number(num) => out.number(&number_text(num.stx.value)),
    Expr::Object(object) => {
      out.punct("{");
      for (i, member) in object.stx.members.iter().enumerate() {
        if i > 0 {
          out.punct(",");
        };
        emit_object_member(out, &member.stx);
      }
      out.punct("}");
    }
    Expr::Regex(regex) => out.regex(&regex.stx.pattern, &regex.stx.flags),
    Expr::Seq(seq) => {
      for (i, expr) in seq.stx.exprs.iter().enumerate() {
        if i > 0 {
          out.punct(",");
        };
        emit_expr_at(out, expr, prec::ASSIGNMENT);
      }
    }
    Expr::Str(lit) => match &lit.stx.raw {
      Some(raw) => out.verbatim(raw),
      None => out.string(&lit.stx.value),
    },
    Expr::Super(_) => out.keyword("super"),
    Expr::TaggedTemplate(tagged) => {
      emit_object(out, &tagged.stx.tag);
      emit_template(out, &tagged.stx.parts);
    }
    Expr::Template(template) => emit_template(out, &template.stx.parts),
    Expr::This(_) => out.keyword("this"),
    Expr::Unary(unary) => {
      let op = unary.stx.op;
      if op.is_word() {
        out.keyword(op.as_str());
      } else {
        out.punct(op.as_str());
      };
      emit_expr_at(out, &unary.stx.arg, prec::UNARY);
    }
    Expr::Update(update) => {
      let op = update.stx.op.as_str();
      if update.stx.prefix {
        out.punct(op);
        emit_expr_at(out, &update.stx.arg, prec::UNARY);
      } else {
        emit_expr_at(out, &update.stx.arg, prec::CALL);
        out.punct(op);
      };
    }
    Expr::Yield(y) => {
      out.keyword("yield");
      if y.stx.delegate {
        out.punct("*");
      };
      if let Some(arg) = &y.stx.arg {
        emit_expr_at(out, arg, prec::ASSIGNMENT);
      };
    }
  };
}

#[cfg(test)]
mod tests {
  use super::number_text;
  use parse_js::num::JsNumber;

  #[test]
  fn numbers_use_the_shorter_form() {
    assert_eq!(number_text(JsNumber(0.5)), "0.5");
    assert_eq!(number_text(JsNumber(255.0)), "255");
    assert_eq!(number_text(JsNumber(1e21)), "1e21");
    assert_eq!(number_text(JsNumber(1e-7)), "1e-7");
    assert_eq!(number_text(JsNumber(f64::INFINITY)), "1e999");
  }
}
