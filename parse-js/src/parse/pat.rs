use super::Parser;
use crate::ast::class::ObjectMember;
use crate::ast::class::PropKey;
use crate::ast::expr::ArrayElem;
use crate::ast::expr::ArrayExpr;
use crate::ast::expr::AssignExpr;
use crate::ast::expr::Expr;
use crate::ast::expr::Ident;
use crate::ast::expr::ObjectExpr;
use crate::ast::node::Node;
use crate::ast::pat::ArrayPat;
use crate::ast::pat::IdentPat;
use crate::ast::pat::ObjectPat;
use crate::ast::pat::ObjectPatProp;
use crate::ast::pat::Pat;
use crate::ast::pat::PatElem;
use crate::error::SyntaxErrorKind;
use crate::error::SyntaxResult;
use crate::lex::TokenKind;
use crate::loc::Loc;
use crate::operator::AssignOp;

impl<'a> Parser<'a> {
  /// An identifier being declared, with its location.
  pub(super) fn parse_binding_ident(&mut self) -> SyntaxResult<(String, Loc)> {
    let TokenKind::Word { name, .. } = &self.token.kind else {
      return Err(self.unexpected("an identifier"));
    };
    let name = name.clone();
    let loc = self.token.loc;
    self.check_binding_name(&name, loc)?;
    self.bump()?;
    Ok((name, loc))
  }

  /// A declaration target: an identifier, or an array or object pattern of them.
  pub(super) fn parse_binding_pat(&mut self) -> SyntaxResult<Node<Pat>> {
    let start = self.start();
    match self.punct() {
      Some("[") => {
        self.bump()?;
        let mut elements = Vec::new();
        let mut rest = None;
        while !self.is_punct("]") {
          if self.eat_punct(",")? {
            elements.push(None);
            continue;
          };
          if self.eat_punct("...")? {
            rest = Some(self.parse_binding_pat()?);
            break;
          };
          let target = self.parse_binding_pat()?;
          let default = self.parse_binding_default()?;
          elements.push(Some(PatElem { target, default }));
          if !self.is_punct("]") {
            self.expect_punct(",")?;
          };
        }
        self.expect_punct("]")?;
        Ok(Node::new(self.loc_from(start), ArrayPat { elements, rest }).into_wrapped())
      }
      Some("{") => {
        self.bump()?;
        let mut props = Vec::new();
        let mut rest = None;
        while !self.is_punct("}") {
          if self.eat_punct("...")? {
            let (name, loc) = self.parse_binding_ident()?;
            rest = Some(Node::new(loc, IdentPat { name }).into_wrapped());
            break;
          };
          let prop_start = self.start();
          let key_token = self.token.clone();
          let key = self.parse_prop_key(false)?;
          let target = if self.eat_punct(":")? {
            self.parse_binding_pat()?
          } else {
            let TokenKind::Word { name, .. } = key_token.kind else {
              return Err(self.unexpected("`:`"));
            };
            self.check_binding_name(&name, key_token.loc)?;
            Node::new(key_token.loc, IdentPat { name }).into_wrapped()
          };
          let default = self.parse_binding_default()?;
          props.push(Node::new(self.loc_from(prop_start), ObjectPatProp {
            key,
            target,
            default,
          }));
          if !self.is_punct("}") {
            self.expect_punct(",")?;
          };
        }
        self.expect_punct("}")?;
        Ok(Node::new(self.loc_from(start), ObjectPat { props, rest }).into_wrapped())
      }
      _ => {
        let (name, loc) = self.parse_binding_ident()?;
        Ok(Node::new(loc, IdentPat { name }).into_wrapped())
      }
    }
  }

  fn parse_binding_default(&mut self) -> SyntaxResult<Option<Node<Expr>>> {
    if !self.eat_punct("=")? {
      return Ok(None);
    };
    Ok(Some(self.with_in(|p| p.parse_assignment())?))
  }

  /// Targets of `++`, `--` and compound assignment: a name or a property access, never
  /// through an optional chain.
  pub(super) fn check_simple_target(&self, expr: &Node<Expr>) -> SyntaxResult<()> {
    match expr.stx.as_ref() {
      Expr::Ident(id) => self.check_assignable_name(&id.stx.name, expr.loc),
      Expr::Member(member) if !member.stx.optional => Ok(()),
      Expr::Index(index) if !index.stx.optional => Ok(()),
      _ => Err(self.error(SyntaxErrorKind::InvalidAssignmentTarget, expr.loc)),
    }
  }

  pub(super) fn simple_target(&self, expr: Node<Expr>) -> SyntaxResult<Node<Pat>> {
    self.check_simple_target(&expr)?;
    let loc = expr.loc;
    Ok(match expr.stx.as_ident() {
      Some(name) => Node::new(loc, IdentPat {
        name: name.to_string(),
      })
      .into_wrapped(),
      None => Node::new(loc, Pat::Member(expr)),
    })
  }

  /// Reinterprets an expression already parsed as the left side of `=` or of a `for...in/of`
  /// head, e.g. `[a, b.c] = d`.
  pub(super) fn expr_to_pat(&self, expr: Node<Expr>) -> SyntaxResult<Node<Pat>> {
    let loc = expr.loc;
    let is_member = match expr.stx.as_ref() {
      Expr::Member(member) => !member.stx.optional,
      Expr::Index(index) => !index.stx.optional,
      _ => false,
    };
    if is_member {
      return Ok(Node::new(loc, Pat::Member(expr)));
    };
    let parenthesized = expr.is_parenthesized();
    match *expr.stx {
      Expr::Ident(id) => {
        let Ident { name } = *id.stx;
        self.check_assignable_name(&name, loc)?;
        Ok(Node::new(loc, IdentPat { name }).into_wrapped())
      }
      Expr::Array(arr) if !parenthesized => self.array_to_pat(loc, *arr.stx),
      Expr::Object(obj) if !parenthesized => self.object_to_pat(loc, *obj.stx),
      _ => Err(self.error(SyntaxErrorKind::InvalidAssignmentTarget, loc)),
    }
  }

  /// An element that may carry a default, written as an assignment: `[a = 1] = b`.
  fn expr_to_pat_elem(&self, expr: Node<Expr>) -> SyntaxResult<PatElem> {
    let loc = expr.loc;
    let parenthesized = expr.is_parenthesized();
    match *expr.stx {
      Expr::Assign(assign) if !parenthesized && assign.stx.op == AssignOp::Assign => {
        let AssignExpr { target, value, .. } = *assign.stx;
        Ok(PatElem {
          target,
          default: Some(value),
        })
      }
      stx => {
        let expr = Node {
          loc,
          stx: Box::new(stx),
          assoc: expr.assoc,
        };
        Ok(PatElem {
          target: self.expr_to_pat(expr)?,
          default: None,
        })
      }
    }
  }

  fn array_to_pat(&self, loc: Loc, arr: ArrayExpr) -> SyntaxResult<Node<Pat>> {
    let count = arr.elements.len();
    let mut elements = Vec::new();
    let mut rest = None;
    for (i, elem) in arr.elements.into_iter().enumerate() {
      match elem {
        ArrayElem::Hole => elements.push(None),
        ArrayElem::Single(expr) => elements.push(Some(self.expr_to_pat_elem(expr)?)),
        ArrayElem::Spread(expr) => {
          if i + 1 != count || matches!(expr.stx.as_ref(), Expr::Assign(_)) {
            return Err(self.error(
              SyntaxErrorKind::Invalid("a rest element must be last and have no default"),
              expr.loc,
            ));
          };
          rest = Some(self.expr_to_pat(expr)?);
        }
      }
    }
    Ok(Node::new(loc, ArrayPat { elements, rest }).into_wrapped())
  }

  fn object_to_pat(&self, loc: Loc, obj: ObjectExpr) -> SyntaxResult<Node<Pat>> {
    let count = obj.members.len();
    let mut props = Vec::new();
    let mut rest = None;
    for (i, member) in obj.members.into_iter().enumerate() {
      let member_loc = member.loc;
      match *member.stx {
        ObjectMember::Prop { key, value } => {
          let PatElem { target, default } = self.expr_to_pat_elem(value)?;
          props.push(Node::new(member_loc, ObjectPatProp {
            key,
            target,
            default,
          }));
        }
        ObjectMember::Shorthand { id } => {
          let id_loc = id.loc;
          let Ident { name } = *id.stx;
          self.check_assignable_name(&name, id_loc)?;
          let target = Node::new(id_loc, IdentPat { name: name.clone() }).into_wrapped();
          props.push(Node::new(member_loc, ObjectPatProp {
            key: PropKey::Ident(name),
            target,
            default: None,
          }));
        }
        ObjectMember::Spread { value } => {
          let target = self.expr_to_pat(value)?;
          if i + 1 != count || matches!(target.stx.as_ref(), Pat::Array(_) | Pat::Object(_)) {
            return Err(self.error(
              SyntaxErrorKind::Invalid("a rest property must be last and be a simple target"),
              member_loc,
            ));
          };
          rest = Some(target);
        }
        ObjectMember::Method { .. } => {
          return Err(self.error(SyntaxErrorKind::InvalidAssignmentTarget, member_loc));
        }
      }
    }
    Ok(Node::new(loc, ObjectPat { props, rest }).into_wrapped())
  }
}
