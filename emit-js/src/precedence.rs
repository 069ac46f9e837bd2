use derive_visitor::Drive;
use derive_visitor::Visitor;
use parse_js::ast::expr::BinaryExpr;
use parse_js::ast::expr::Expr;
use parse_js::ast::node::Node;
use parse_js::ast::pat::Pat;
use parse_js::operator::prec;
use parse_js::operator::BinaryOp;

/// How tightly an expression binds, on the parser's scale. A child is parenthesized when it binds
/// more loosely than its position requires.
pub fn expr_prec(expr: &Node<Expr>) -> u8 {
  match expr.stx.as_ref() {
    Expr::Seq(_) => prec::SEQUENCE,
    Expr::Arrow(_) | Expr::Assign(_) | Expr::Yield(_) => prec::ASSIGNMENT,
    Expr::Cond(_) => prec::CONDITIONAL,
    Expr::Binary(binary) => binary.stx.op.prec(),
    Expr::Unary(_) => prec::UNARY,
    Expr::Update(update) if update.stx.prefix => prec::UNARY,
    Expr::Update(_) => prec::POSTFIX,
    Expr::Call(_)
    | Expr::Chain(_)
    | Expr::Import(_)
    | Expr::Index(_)
    | Expr::Member(_)
    | Expr::New(_)
    | Expr::TaggedTemplate(_) => prec::CALL,
    _ => prec::PRIMARY,
  }
}

/// `??` next to `&&` or `||`, which the grammar only accepts with parentheses.
pub fn mixes_nullish(op: BinaryOp, operand: &Node<Expr>) -> bool {
  let Expr::Binary(inner) = operand.stx.as_ref() else {
    return false;
  };
  let inner = inner.stx.op;
  (op == BinaryOp::Nullish && inner.is_logical_and_or())
    || (op.is_logical_and_or() && inner == BinaryOp::Nullish)
}

/// Whether a call appears along the callee chain, which `new` would take as its own arguments.
pub fn contains_call(expr: &Node<Expr>) -> bool {
  match expr.stx.as_ref() {
    Expr::Call(_) | Expr::Import(_) | Expr::Chain(_) => true,
    Expr::Member(member) => contains_call(&member.stx.object),
    Expr::Index(index) => contains_call(&index.stx.object),
    Expr::TaggedTemplate(tagged) => contains_call(&tagged.stx.tag),
    _ => false,
  }
}

type BinaryExprNode = Node<BinaryExpr>;

#[derive(Default, Visitor)]
#[visitor(BinaryExprNode(enter))]
struct InOperator {
  found: bool,
}

impl InOperator {
  fn enter_binary_expr_node(&mut self, node: &BinaryExprNode) {
    self.found |= node.stx.op == BinaryOp::In;
  }
}

/// Whether `in` is used anywhere inside, including nested functions. The head of a `for` loop
/// would read it as a `for...in`.
pub fn contains_in(expr: &Node<Expr>) -> bool {
  let mut visitor = InOperator::default();
  expr.drive(&mut visitor);
  visitor.found
}

/// What an expression's first token is, where that first token matters.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Start {
  Brace,
  Function,
  Class,
  Other,
}

/// The first token of the expression as it would be emitted. Parenthesized operands are not
/// accounted for, so this may claim a brace where a parenthesis ends up coming first.
pub fn start_of(expr: &Node<Expr>) -> Start {
  match expr.stx.as_ref() {
    Expr::Object(_) => Start::Brace,
    Expr::Function(_) => Start::Function,
    Expr::Class(_) => Start::Class,
    Expr::Assign(assign) => match assign.stx.target.stx.as_ref() {
      Pat::Object(_) => Start::Brace,
      Pat::Member(object) => start_of(object),
      Pat::Ident(_) | Pat::Array(_) => Start::Other,
    },
    Expr::Binary(binary) => start_of(&binary.stx.left),
    Expr::Call(call) => start_of(&call.stx.callee),
    Expr::Chain(chain) => start_of(&chain.stx.expr),
    Expr::Cond(cond) => start_of(&cond.stx.test),
    Expr::Index(index) => start_of(&index.stx.object),
    Expr::Member(member) => start_of(&member.stx.object),
    Expr::Seq(seq) => seq.stx.exprs.first().map_or(Start::Other, start_of),
    Expr::TaggedTemplate(tagged) => start_of(&tagged.stx.tag),
    Expr::Update(update) if !update.stx.prefix => start_of(&update.stx.arg),
    _ => Start::Other,
  }
}

#[cfg(test)]
mod tests {
  use super::contains_in;
  use super::expr_prec;
  use super::start_of;
  use super::Start;
  use parse_js::ast::expr::Expr;
  use parse_js::ast::node::Node;
  use parse_js::ast::stmt::Stmt;
  use parse_js::operator::prec;

  fn expr(source: &str) -> Node<Expr> {
    let mut module = parse_js::parse(source).unwrap();
    match *module.stx.body.remove(0).stx {
      Stmt::Expr(stmt) => stmt.stx.expr,
      _ => panic!("not an expression statement"),
    }
  }

  #[test]
  fn precedence_follows_the_grammar() {
    assert_eq!(expr_prec(&expr("a, b")), prec::SEQUENCE);
    assert_eq!(expr_prec(&expr("a = b")), prec::ASSIGNMENT);
    assert_eq!(expr_prec(&expr("a ? b : c")), prec::CONDITIONAL);
    assert!(expr_prec(&expr("a || b")) < expr_prec(&expr("a * b")));
    assert_eq!(expr_prec(&expr("++a")), prec::UNARY);
    assert_eq!(expr_prec(&expr("a++")), prec::POSTFIX);
    assert_eq!(expr_prec(&expr("a?.b")), prec::CALL);
    assert_eq!(expr_prec(&expr("a")), prec::PRIMARY);
  }

  #[test]
  fn statement_starts() {
    assert_eq!(start_of(&expr("({}).x")), Start::Brace);
    assert_eq!(start_of(&expr("({ a } = b)")), Start::Brace);
    assert_eq!(start_of(&expr("(function () {})()")), Start::Function);
    assert_eq!(start_of(&expr("(class {}).name")), Start::Class);
    assert_eq!(start_of(&expr("a + {}")), Start::Other);
  }

  #[test]
  fn finds_nested_in() {
    assert!(contains_in(&expr(r#"f(() => "k" in o)"#)));
    assert!(!contains_in(&expr("a instanceof B")));
  }
}
