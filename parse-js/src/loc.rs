use memchr::memchr_iter;
use std::cmp::max;
use std::cmp::min;
use std::ops::Add;
use std::ops::AddAssign;

/// Byte offsets into the module source. Nodes synthesized by a transform borrow the location of
/// the node they replace.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Default)]
pub struct Loc(pub usize, pub usize);

/// One-based line and column. Columns count bytes.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub struct LineCol {
  pub line: usize,
  pub column: usize,
}

impl Loc {
  pub fn len(&self) -> usize {
    self.1.saturating_sub(self.0)
  }

  pub fn is_empty(&self) -> bool {
    self.len() == 0
  }

  pub fn start_line_col(&self, source: &str) -> LineCol {
    let offset = min(self.0, source.len());
    let mut line = 1;
    let mut line_start = 0;
    for nl in memchr_iter(b'\n', &source.as_bytes()[..offset]) {
      line += 1;
      line_start = nl + 1;
    }
    LineCol {
      line,
      column: offset - line_start + 1,
    }
  }
}

impl Add for Loc {
  type Output = Loc;

  fn add(self, rhs: Loc) -> Loc {
    Loc(min(self.0, rhs.0), max(self.1, rhs.1))
  }
}

impl AddAssign for Loc {
  fn add_assign(&mut self, rhs: Loc) {
    *self = *self + rhs;
  }
}

#[cfg(test)]
mod tests {
  use super::LineCol;
  use super::Loc;

  #[test]
  fn add_covers_both() {
    assert_eq!(Loc(4, 6) + Loc(1, 2), Loc(1, 6));
    let mut loc = Loc(3, 3);
    loc += Loc(3, 9);
    assert_eq!(loc, Loc(3, 9));
  }

  #[test]
  fn line_col_counts_from_one() {
    let source = "a\nbc\n  d";
    assert_eq!(Loc(0, 1).start_line_col(source), LineCol { line: 1, column: 1 });
    assert_eq!(Loc(3, 4).start_line_col(source), LineCol { line: 2, column: 2 });
    assert_eq!(Loc(7, 8).start_line_col(source), LineCol { line: 3, column: 3 });
  }
}
