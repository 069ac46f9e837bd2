use crate::expr::emit_expr_at;
use crate::expr::emit_prop_key;
use crate::Emitter;
use parse_js::ast::expr::Expr;
use parse_js::ast::func::Param;
use parse_js::ast::node::Node;
use parse_js::ast::pat::ArrayPat;
use parse_js::ast::pat::ObjectPat;
use parse_js::ast::pat::Pat;
use parse_js::operator::prec;

fn emit_default(out: &mut Emitter, default: Option<&Node<Expr>>) {
  if let Some(default) = default {
    out.punct("=");
    emit_expr_at(out, default, prec::ASSIGNMENT);
  };
}

fn emit_rest(out: &mut Emitter, rest: Option<&Node<Pat>>) {
  if let Some(rest) = rest {
    out.punct("...");
    emit_pat(out, rest);
  };
}

// A hole is a lone comma, so a trailing hole needs one of its own.
fn emit_array_pat(out: &mut Emitter, arr: &ArrayPat) {
  out.punct("[");
  let count = arr.elements.len();
  for (i, elem) in arr.elements.iter().enumerate() {
    match elem {
      None => out.punct(","),
      Some(elem) => {
        emit_pat(out, &elem.target);
        emit_default(out, elem.default.as_ref());
        if i + 1 < count || arr.rest.is_some() {
          out.punct(",");
        };
      }
    };
  }
  emit_rest(out, arr.rest.as_ref());
  out.punct("]");
}

fn emit_object_pat(out: &mut Emitter, obj: &ObjectPat) {
  out.punct("{");
  for (i, prop) in obj.props.iter().enumerate() {
    if i > 0 {
      out.punct(",");
    };
    let prop = prop.stx.as_ref();
    if !prop.is_shorthand() {
      emit_prop_key(out, &prop.key);
      out.punct(":");
    };
    emit_pat(out, &prop.target);
    emit_default(out, prop.default.as_ref());
  }
  if obj.rest.is_some() {
    if !obj.props.is_empty() {
      out.punct(",");
    };
    emit_rest(out, obj.rest.as_ref());
  };
  out.punct("}");
}

pub fn emit_pat(out: &mut Emitter, pat: &Node<Pat>) {
  match pat.stx.as_ref() {
    Pat::Ident(id) => out.ident(&id.stx.name),
    Pat::Array(arr) => emit_array_pat(out, &arr.stx),
    Pat::Object(obj) => emit_object_pat(out, &obj.stx),
    Pat::Member(target) => emit_expr_at(out, target, prec::CALL),
  };
}

pub(crate) fn emit_params(out: &mut Emitter, params: &[Node<Param>]) {
  out.punct("(");
  for (i, param) in params.iter().enumerate() {
    if i > 0 {
      out.punct(",");
    };
    if param.stx.rest {
      out.punct("...");
    };
    emit_pat(out, &param.stx.pat.stx.pat);
    emit_default(out, param.stx.default.as_ref());
  }
  out.punct(")");
}
