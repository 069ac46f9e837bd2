//! Compact JavaScript code generation for `parse-js` syntax trees.
//!
//! Output is minimal: no indentation or newlines, and whitespace only where two adjacent tokens
//! would otherwise merge. Parentheses are derived from the parser's operator table, so emitted code
//! parses back to the same tree.

mod emitter;
mod escape;
mod expr;
mod pat;
mod precedence;
mod stmt;

pub use emitter::EmitError;
pub use emitter::EmitErrorKind;
pub use emitter::EmitResult;
pub use emitter::Emitter;
pub use expr::emit_expr;
pub use pat::emit_pat;
pub use stmt::emit_module;
pub use stmt::emit_stmt;

use parse_js::ast::module::Module;
use parse_js::ast::node::Node;

/// Emits a whole module.
pub fn emit_js(module: &Node<Module>) -> EmitResult<String> {
  let mut out = Emitter::new();
  emit_module(&mut out, module);
  out.finish()
}
