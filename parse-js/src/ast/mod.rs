pub mod class;
pub mod expr;
pub mod func;
pub mod module;
pub mod node;
pub mod pat;
pub mod stmt;
