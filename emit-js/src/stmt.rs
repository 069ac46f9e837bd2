use crate::expr::emit_class;
use crate::expr::emit_expr;
use crate::expr::emit_expr_at;
use crate::expr::emit_function;
use crate::expr::emit_in_parens;
use crate::pat::emit_pat;
use crate::precedence::contains_in;
use crate::precedence::start_of;
use crate::precedence::Start;
use crate::EmitError;
use crate::Emitter;
use parse_js::ast::expr::Expr;
use parse_js::ast::module::ExportClause;
use parse_js::ast::module::ExportListStmt;
use parse_js::ast::module::ImportAttribute;
use parse_js::ast::module::ImportClause;
use parse_js::ast::module::ImportStmt;
use parse_js::ast::module::Module;
use parse_js::ast::module::ModuleName;
use parse_js::ast::node::Node;
use parse_js::ast::stmt::BlockStmt;
use parse_js::ast::stmt::ExportMode;
use parse_js::ast::stmt::ForHead;
use parse_js::ast::stmt::ForInit;
use parse_js::ast::stmt::Stmt;
use parse_js::ast::stmt::VarDecl;
use parse_js::operator::prec;

pub fn emit_module(out: &mut Emitter, module: &Node<Module>) {
  if let Some(hashbang) = &module.stx.hashbang {
    out.verbatim("#!");
    out.template_chunk(hashbang);
    out.line_break();
  };
  emit_stmts(out, &module.stx.body);
}

pub(crate) fn emit_stmts(out: &mut Emitter, stmts: &[Node<Stmt>]) {
  for stmt in stmts {
    emit_stmt(out, stmt);
  }
}

pub(crate) fn emit_block(out: &mut Emitter, stmts: &[Node<Stmt>]) {
  out.punct("{");
  emit_stmts(out, stmts);
  out.punct("}");
}

fn emit_block_stmt(out: &mut Emitter, block: &Node<BlockStmt>) {
  emit_block(out, &block.stx.body);
}

fn emit_export_mode(out: &mut Emitter, mode: ExportMode) {
  match mode {
    ExportMode::Local => {}
    ExportMode::Named => out.keyword("export"),
    ExportMode::Default => {
      out.keyword("export");
      out.keyword("default");
    }
  };
}

fn emit_module_name(out: &mut Emitter, name: &ModuleName) {
  match name {
    ModuleName::Ident(name) => out.ident(name),
    ModuleName::Str(name) => out.string(name),
  };
}

fn emit_attributes(out: &mut Emitter, attributes: &[ImportAttribute]) {
  if attributes.is_empty() {
    return;
  };
  out.keyword("with");
  out.punct("{");
  for (i, attr) in attributes.iter().enumerate() {
    if i > 0 {
      out.punct(",");
    };
    emit_module_name(out, &attr.key);
    out.punct(":");
    out.string(&attr.value);
  }
  out.punct("}");
}

// `in` inside a `for` head initializer would be read as `for...in`.
fn emit_var(out: &mut Emitter, decl: &VarDecl, in_for_head: bool) {
  if decl.export {
    out.keyword("export");
  };
  out.keyword(decl.kind.as_str());
  for (i, declarator) in decl.declarators.iter().enumerate() {
    if i > 0 {
      out.punct(",");
    };
    emit_pat(out, &declarator.pat.stx.pat);
    if let Some(init) = &declarator.init {
      out.punct("=");
      if in_for_head && contains_in(init) {
        emit_in_parens(out, init);
      } else {
        emit_expr_at(out, init, prec::ASSIGNMENT);
      };
    };
  }
}

fn emit_import(out: &mut Emitter, import: &ImportStmt) {
  out.keyword("import");
  if let Some(default) = &import.default {
    out.ident(&default.stx.name);
    if import.clause.is_some() {
      out.punct(",");
    };
  };
  match &import.clause {
    None => {}
    Some(ImportClause::Namespace(local)) => {
      out.punct("*");
      out.keyword("as");
      out.ident(&local.stx.name);
    }
    Some(ImportClause::Named(specifiers)) => {
      out.punct("{");
      for (i, spec) in specifiers.iter().enumerate() {
        if i > 0 {
          out.punct(",");
        };
        let local = &spec.stx.local.stx.name;
        if spec.stx.imported.as_str() != local {
          emit_module_name(out, &spec.stx.imported);
          out.keyword("as");
        };
        out.ident(local);
      }
      out.punct("}");
    }
  };
  if import.default.is_some() || import.clause.is_some() {
    out.keyword("from");
  };
  out.string(&import.module);
  emit_attributes(out, &import.attributes);
  out.punct(";");
}

fn emit_export_list(out: &mut Emitter, export: &ExportListStmt) {
  out.keyword("export");
  match &export.clause {
    ExportClause::All(alias) => {
      if export.from.is_none() {
        out.fail(EmitError::unsupported("`export *` without `from`"));
        return;
      };
      out.punct("*");
      if let Some(alias) = alias {
        out.keyword("as");
        emit_module_name(out, alias);
      };
    }
    ExportClause::Named(specifiers) => {
      out.punct("{");
      for (i, spec) in specifiers.iter().enumerate() {
        if i > 0 {
          out.punct(",");
        };
        emit_module_name(out, &spec.stx.local);
        if spec.stx.exported != spec.stx.local {
          out.keyword("as");
          emit_module_name(out, &spec.stx.exported);
        };
      }
      out.punct("}");
    }
  };
  if let Some(from) = &export.from {
    out.keyword("from");
    out.string(from);
    emit_attributes(out, &export.attributes);
  };
  out.punct(";");
}

fn emit_for_head(out: &mut Emitter, head: &ForHead) {
  match head {
    ForHead::Pat(pat) => emit_pat(out, pat),
    ForHead::Var(decl) => emit_var(out, &decl.stx, false),
  };
}

/// Whether the statement ends in an `if` without an `else`, which a following `else` would attach
/// to.
fn ends_with_open_if(stmt: &Node<Stmt>) -> bool {
  match stmt.stx.as_ref() {
    Stmt::If(if_stmt) => match &if_stmt.stx.alternate {
      None => true,
      Some(alternate) => ends_with_open_if(alternate),
    },
    Stmt::Labeled(labeled) => ends_with_open_if(&labeled.stx.body),
    Stmt::For(for_stmt) => ends_with_open_if(&for_stmt.stx.body),
    Stmt::ForIn(for_in) => ends_with_open_if(&for_in.stx.body),
    Stmt::ForOf(for_of) => ends_with_open_if(&for_of.stx.body),
    Stmt::While(while_stmt) => ends_with_open_if(&while_stmt.stx.body),
    _ => false,
  }
}

fn emit_expr_stmt(out: &mut Emitter, expr: &Node<Expr>) {
  // A parenthesized string is not a directive and must not become one.
  let keeps_parens = expr.is_parenthesized() && matches!(expr.stx.as_ref(), Expr::Str(_));
  if keeps_parens || start_of(expr) != Start::Other {
    emit_in_parens(out, expr);
  } else {
    emit_expr(out, expr);
  };
  out.punct(";");
}

pub fn emit_stmt(out: &mut Emitter, stmt: &Node<Stmt>) {
  match stmt.stx.as_ref() {
    Stmt::Block(block) => emit_block_stmt(out, block),
    Stmt::Break(brk) => {
      out.keyword("break");
      if let Some(label) = &brk.stx.label {
        out.ident(label);
      };
      out.punct(";");
    }
    Stmt::Class(decl) => {
      emit_export_mode(out, decl.stx.export);
      emit_class(
        out,
        decl.stx.name.as_ref(),
        decl.stx.extends.as_ref(),
        &decl.stx.members,
      );
    }
    Stmt::Continue(cont) => {
      out.keyword("continue");
      if let Some(label) = &cont.stx.label {
        out.ident(label);
      };
      out.punct(";");
    }
    Stmt::Debugger(_) => {
      out.keyword("debugger");
      out.punct(";");
    }
    Stmt::DoWhile(do_while) => {
      out.keyword("do");
      emit_stmt(out, &do_while.stx.body);
      out.keyword("while");
      out.punct("(");
      emit_expr(out, &do_while.stx.test);
      out.punct(")");
      out.punct(";");
    }
    Stmt::Empty(_) => out.punct(";"),
    Stmt::ExportDefault(export) => {
      out.keyword("export");
      out.keyword("default");
      let expr = &export.stx.expr;
      if matches!(start_of(expr), Start::Function | Start::Class) {
        emit_in_parens(out, expr);
      } else {
        emit_expr_at(out, expr, prec::ASSIGNMENT);
      };
      out.punct(";");
    }
    Stmt::ExportList(export) => emit_export_list(out, &export.stx),
    Stmt::Expr(expr) => emit_expr_stmt(out, &expr.stx.expr),
    Stmt::For(for_stmt) => {
      out.keyword("for");
      out.punct("(");
      match &for_stmt.stx.init {
        ForInit::None => {}
        ForInit::Expr(init) => {
          if contains_in(init) {
            emit_in_parens(out, init);
          } else {
            emit_expr(out, init);
          };
        }
        ForInit::Var(decl) => emit_var(out, &decl.stx, true),
      };
      out.punct(";");
      if let Some(test) = &for_stmt.stx.test {
        emit_expr(out, test);
      };
      out.punct(";");
      if let Some(update) = &for_stmt.stx.update {
        emit_expr(out, update);
      };
      out.punct(")");
      emit_stmt(out, &for_stmt.stx.body);
    }
    Stmt::ForIn(for_in) => {
      out.keyword("for");
      out.punct("(");
      emit_for_head(out, &for_in.stx.head);
      out.keyword("in");
      emit_expr(out, &for_in.stx.object);
      out.punct(")");
      emit_stmt(out, &for_in.stx.body);
    }
    Stmt::ForOf(for_of) => {
      out.keyword("for");
      if for_of.stx.is_await {
        out.keyword("await");
      };
      out.punct("(");
      emit_for_head(out, &for_of.stx.head);
      out.keyword("of");
      emit_expr_at(out, &for_of.stx.iterable, prec::ASSIGNMENT);
      out.punct(")");
      emit_stmt(out, &for_of.stx.body);
    }
    Stmt::Function(decl) => {
      emit_export_mode(out, decl.stx.export);
      emit_function(out, decl.stx.name.as_ref(), &decl.stx.func.stx);
    }
    Stmt::If(if_stmt) => {
      out.keyword("if");
      out.punct("(");
      emit_expr(out, &if_stmt.stx.test);
      out.punct(")");
      let consequent = &if_stmt.stx.consequent;
      match &if_stmt.stx.alternate {
        None => emit_stmt(out, consequent),
        Some(alternate) => {
          if ends_with_open_if(consequent) {
            out.punct("{");
            emit_stmt(out, consequent);
            out.punct("}");
          } else {
            emit_stmt(out, consequent);
          };
          out.keyword("else");
          emit_stmt(out, alternate);
        }
      };
    }
    Stmt::Import(import) => emit_import(out, &import.stx),
    Stmt::Labeled(labeled) => {
      out.ident(&labeled.stx.label);
      out.punct(":");
      emit_stmt(out, &labeled.stx.body);
    }
    Stmt::Return(ret) => {
      out.keyword("return");
      if let Some(value) = &ret.stx.value {
        emit_expr(out, value);
      };
      out.punct(";");
    }
    Stmt::Switch(switch) => {
      out.keyword("switch");
      out.punct("(");
      emit_expr(out, &switch.stx.discriminant);
      out.punct(")");
      out.punct("{");
      for case in &switch.stx.cases {
        match &case.stx.test {
          Some(test) => {
            out.keyword("case");
            emit_expr(out, test);
          }
          None => out.keyword("default"),
        };
        out.punct(":");
        emit_stmts(out, &case.stx.body);
      }
      out.punct("}");
    }
    Stmt::Throw(throw) => {
      out.keyword("throw");
      emit_expr(out, &throw.stx.value);
      out.punct(";");
    }
    Stmt::Try(try_stmt) => {
      out.keyword("try");
      emit_block_stmt(out, &try_stmt.stx.block);
      if let Some(handler) = &try_stmt.stx.handler {
        out.keyword("catch");
        if let Some(param) = &handler.stx.param {
          out.punct("(");
          emit_pat(out, &param.stx.pat);
          out.punct(")");
        };
        emit_block_stmt(out, &handler.stx.body);
      };
      if let Some(finalizer) = &try_stmt.stx.finalizer {
        out.keyword("finally");
        emit_block_stmt(out, finalizer);
      };
    }
    Stmt::Var(decl) => {
      emit_var(out, &decl.stx, false);
      out.punct(";");
    }
    Stmt::While(while_stmt) => {
      out.keyword("while");
      out.punct("(");
      emit_expr(out, &while_stmt.stx.test);
      out.punct(")");
      emit_stmt(out, &while_stmt.stx.body);
    }
  };
  out.locate(stmt.loc);
}
