use ast::module::Module;
use ast::node::Node;
use error::SyntaxResult;
use parse::Parser;

pub mod ast;
pub mod char;
pub mod error;
pub mod lex;
pub mod loc;
pub mod num;
pub mod operator;
pub mod parse;

/// Parses JavaScript source as an ECMAScript module.
pub fn parse(source: &str) -> SyntaxResult<Node<Module>> {
  Parser::new(source)?.parse_module()
}
