use crate::loc::Loc;
use ahash::HashMap;
use derive_visitor::Drive;
use derive_visitor::DriveMut;
use serde::Serialize;
use serde::Serializer;
use std::any::Any;
use std::any::TypeId;
use std::fmt;
use std::fmt::Debug;
use std::fmt::Formatter;

/// Side table keyed by type. Passes attach scopes and markers here without the syntax types
/// knowing about them. Values must be `Send + Sync` so trees can be handed between threads.
#[derive(Default)]
pub struct AssocData {
  values: HashMap<TypeId, Box<dyn Any + Send + Sync>>,
}

impl AssocData {
  pub fn get<T: Any>(&self) -> Option<&T> {
    self
      .values
      .get(&TypeId::of::<T>())
      .and_then(|value| value.downcast_ref())
  }

  pub fn has<T: Any>(&self) -> bool {
    self.values.contains_key(&TypeId::of::<T>())
  }

  pub fn set<T: Any + Send + Sync>(&mut self, value: T) {
    self.values.insert(TypeId::of::<T>(), Box::new(value));
  }

  pub fn remove<T: Any>(&mut self) {
    self.values.remove(&TypeId::of::<T>());
  }
}

/// Set by the parser on an expression written inside parentheses.
#[derive(Clone, Copy, Debug)]
pub struct Parenthesized;

#[derive(Drive, DriveMut)]
pub struct Node<S: Drive + DriveMut> {
  #[drive(skip)]
  pub loc: Loc,
  pub stx: Box<S>,
  #[drive(skip)]
  pub assoc: AssocData,
}

impl<S: Drive + DriveMut> Node<S> {
  pub fn new(loc: Loc, stx: S) -> Node<S> {
    Node {
      loc,
      stx: Box::new(stx),
      assoc: AssocData::default(),
    }
  }

  /// Wraps this node in a new node of an enum with a variant for it, e.g. `Node<Ident>` into
  /// `Node<Expr>`.
  pub fn into_wrapped<T: From<Node<S>> + Drive + DriveMut>(self) -> Node<T> {
    let loc = self.loc;
    Node::new(loc, T::from(self))
  }

  /// Replaces the syntax, keeping the location and associated data.
  pub fn map_stx<T: Drive + DriveMut>(self, f: impl FnOnce(S) -> T) -> Node<T> {
    Node {
      loc: self.loc,
      stx: Box::new(f(*self.stx)),
      assoc: self.assoc,
    }
  }

  pub fn is_parenthesized(&self) -> bool {
    self.assoc.has::<Parenthesized>()
  }
}

impl<S: Debug + Drive + DriveMut> Debug for Node<S> {
  fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
    self.stx.fmt(f)
  }
}

// Locations and associated data are left out, so two trees serialize the same when their syntax
// is the same.
impl<S: Serialize + Drive + DriveMut> Serialize for Node<S> {
  fn serialize<Se: Serializer>(&self, serializer: Se) -> Result<Se::Ok, Se::Error> {
    self.stx.serialize(serializer)
  }
}

#[cfg(test)]
mod tests {
  use super::AssocData;
  use super::Node;
  use crate::ast::expr::Expr;
  use crate::ast::expr::Ident;
  use crate::loc::Loc;

  #[test]
  fn assoc_data_is_keyed_by_type() {
    struct Marker(u32);
    let mut assoc = AssocData::default();
    assert!(!assoc.has::<Marker>());
    assoc.set(Marker(32));
    assert_eq!(assoc.get::<Marker>().map(|m| m.0), Some(32));
    assoc.set(Marker(7));
    assert_eq!(assoc.get::<Marker>().map(|m| m.0), Some(7));
    assoc.remove::<Marker>();
    assert!(assoc.get::<Marker>().is_none());
  }

  #[test]
  fn wrapping_keeps_the_location() {
    let id = Node::new(Loc(2, 5), Ident { name: "map".into() });
    let expr: Node<Expr> = id.into_wrapped();
    assert_eq!(expr.loc, Loc(2, 5));
    let Expr::Ident(id) = *expr.stx else {
      panic!("not an identifier");
    };
    assert_eq!(id.stx.name, "map");
  }
}
