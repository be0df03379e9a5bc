use super::escape::emit_string_literal_double_quoted;
use super::precedence::contains_bare_in;
use super::precedence::is_ambiguous_stmt_start;
use super::precedence::ASSIGNMENT_PRECEDENCE;
use super::EmitResult;
use super::JsEmitter;
use crate::ast::expr::pat::Pat;
use crate::ast::expr::Expr;
use crate::ast::import_export::ExportNames;
use crate::ast::import_export::ImportNames;
use crate::ast::import_export::ModuleExportImportName;
use crate::ast::node::Node;
use crate::ast::stmt::decl::VarDecl;
use crate::ast::stmt::ForInOfLhs;
use crate::ast::stmt::ForTripleStmtInit;
use crate::ast::stmt::ImportStmt;
use crate::ast::stmt::Stmt;
use std::fmt;

/// Whether a statement ends with an `if` lacking an `else`, which would capture a following
/// `else` that belongs to an outer `if`.
fn ends_with_open_if(stmt: &Node<Stmt>) -> bool {
  match stmt.stx.as_ref() {
    Stmt::If(if_stmt) => match &if_stmt.stx.alternate {
      Some(alternate) => ends_with_open_if(alternate),
      None => true,
    },
    Stmt::ForIn(for_stmt) => ends_with_open_if(&for_stmt.stx.body),
    Stmt::ForOf(for_stmt) => ends_with_open_if(&for_stmt.stx.body),
    Stmt::ForTriple(for_stmt) => ends_with_open_if(&for_stmt.stx.body),
    Stmt::While(while_stmt) => ends_with_open_if(&while_stmt.stx.body),
    Stmt::With(with_stmt) => ends_with_open_if(&with_stmt.stx.body),
    Stmt::Label(label) => ends_with_open_if(&label.stx.statement),
    _ => false,
  }
}

impl<'a, W: fmt::Write> JsEmitter<'a, W> {
  /// Writes `{`, each statement on its own line one level deeper, then `}`.
  pub(super) fn emit_block_body(&mut self, body: &[Node<Stmt>]) -> EmitResult {
    self.out.write_char('{')?;
    if body.is_empty() {
      return self.out.write_char('}');
    };
    self.indent += 1;
    for stmt in body {
      self.newline()?;
      self.emit_stmt(stmt)?;
    }
    self.indent -= 1;
    self.newline()?;
    self.out.write_char('}')
  }

  /// Writes the body of a loop or `if`, after a space.
  fn emit_nested_stmt(&mut self, stmt: &Node<Stmt>) -> EmitResult {
    self.out.write_char(' ')?;
    self.emit_stmt(stmt)
  }

  fn emit_module_name(&mut self, name: &ModuleExportImportName) -> EmitResult {
    match name {
      ModuleExportImportName::Ident(name) => self.out.write_str(name),
      ModuleExportImportName::Str(name) => emit_string_literal_double_quoted(&mut *self.out, name),
    }
  }

  fn emit_from(&mut self, module: &str) -> EmitResult {
    self.out.write_str(" from ")?;
    emit_string_literal_double_quoted(&mut *self.out, module)
  }

  /// Writes a declaration without its trailing semicolon, as it also appears in `for` heads.
  fn emit_var_decl(&mut self, decl: &Node<VarDecl>, in_for_head: bool) -> EmitResult {
    if decl.stx.export {
      self.out.write_str("export ")?;
    };
    self.out.write_str(decl.stx.mode.keyword())?;
    self.out.write_char(' ')?;
    for (i, declarator) in decl.stx.declarators.iter().enumerate() {
      if i > 0 {
        self.out.write_str(", ")?;
      };
      self.emit_pat(&declarator.pattern.stx.pat)?;
      if let Some(init) = &declarator.initializer {
        self.out.write_str(" = ")?;
        if in_for_head && contains_bare_in(init) {
          self.emit_wrapped(init)?;
        } else {
          self.emit_expr_with_min_prec(init, ASSIGNMENT_PRECEDENCE)?;
        };
      };
    }
    Ok(())
  }

  fn emit_for_in_of_lhs(&mut self, lhs: &ForInOfLhs) -> EmitResult {
    match lhs {
      ForInOfLhs::Assign(pat) => self.emit_pat(pat),
      ForInOfLhs::Decl { mode, pattern } => {
        self.out.write_str(mode.keyword())?;
        self.out.write_char(' ')?;
        self.emit_pat(&pattern.stx.pat)
      }
    }
  }

  fn emit_import_stmt(&mut self, import: &Node<ImportStmt>) -> EmitResult {
    self.out.write_str("import ")?;
    let ImportStmt {
      default,
      names,
      module,
    } = import.stx.as_ref();
    if let Some(default) = default {
      self.emit_pat(&default.stx.pat)?;
      if names.is_some() {
        self.out.write_str(", ")?;
      };
    };
    match names {
      Some(ImportNames::All(alias)) => {
        self.out.write_str("* as ")?;
        self.emit_pat(&alias.stx.pat)?;
      }
      Some(ImportNames::Specific(names)) => {
        self.out.write_char('{')?;
        for (i, name) in names.iter().enumerate() {
          if i > 0 {
            self.out.write_str(", ")?;
          };
          self.emit_module_name(&name.stx.importable)?;
          let alias = &name.stx.alias.stx.pat;
          let same = match (&name.stx.importable, alias.stx.as_ref()) {
            (ModuleExportImportName::Ident(importable), Pat::Id(id)) => {
              *importable == id.stx.name
            }
            _ => false,
          };
          if !same {
            self.out.write_str(" as ")?;
            self.emit_pat(alias)?;
          };
        }
        self.out.write_char('}')?;
      }
      None => {}
    };
    if default.is_none() && names.is_none() {
      emit_string_literal_double_quoted(&mut *self.out, module)?;
    } else {
      self.emit_from(module)?;
    };
    self.out.write_char(';')
  }

  pub fn emit_stmt(&mut self, stmt: &Node<Stmt>) -> EmitResult {
    self.emit_comments_before(stmt.loc.0, false)?;
    match stmt.stx.as_ref() {
      Stmt::Block(block) => self.emit_block_body(&block.stx.body),
      Stmt::Break(brk) => {
        self.out.write_str("break")?;
        if let Some(label) = &brk.stx.label {
          write!(self.out, " {}", label)?;
        };
        self.out.write_char(';')
      }
      Stmt::Continue(cont) => {
        self.out.write_str("continue")?;
        if let Some(label) = &cont.stx.label {
          write!(self.out, " {}", label)?;
        };
        self.out.write_char(';')
      }
      Stmt::Debugger(_) => self.out.write_str("debugger;"),
      Stmt::DoWhile(do_while) => {
        self.out.write_str("do")?;
        self.emit_nested_stmt(&do_while.stx.body)?;
        self.out.write_str(" while (")?;
        self.emit_expr(&do_while.stx.condition)?;
        self.out.write_str(");")
      }
      Stmt::Empty(_) => self.out.write_char(';'),
      Stmt::ExportDefaultExpr(export) => {
        self.out.write_str("export default ")?;
        let expression = &export.stx.expression;
        // A leading function or class would be read as a declaration.
        let is_decl_like = matches!(
          expression.stx.as_ref(),
          Expr::Func(_) | Expr::Class(_)
        ) || is_ambiguous_stmt_start(expression);
        if is_decl_like {
          self.emit_wrapped(expression)?;
        } else {
          self.emit_expr_with_min_prec(expression, ASSIGNMENT_PRECEDENCE)?;
        };
        self.out.write_char(';')
      }
      Stmt::ExportList(export) => {
        self.out.write_str("export ")?;
        match &export.stx.names {
          ExportNames::All(alias) => {
            self.out.write_char('*')?;
            if let Some(alias) = alias {
              write!(self.out, " as {}", alias.stx.name)?;
            };
          }
          ExportNames::Specific(names) => {
            self.out.write_char('{')?;
            for (i, name) in names.iter().enumerate() {
              if i > 0 {
                self.out.write_str(", ")?;
              };
              self.emit_module_name(&name.stx.exportable)?;
              if name.stx.alias != name.stx.exportable {
                self.out.write_str(" as ")?;
                self.emit_module_name(&name.stx.alias)?;
              };
            }
            self.out.write_char('}')?;
          }
        };
        if let Some(from) = &export.stx.from {
          self.emit_from(from)?;
        };
        self.out.write_char(';')
      }
      Stmt::Expr(expr_stmt) => {
        let expr = &expr_stmt.stx.expr;
        if is_ambiguous_stmt_start(expr) {
          self.emit_wrapped(expr)?;
        } else {
          self.emit_expr(expr)?;
        };
        self.out.write_char(';')
      }
      Stmt::ForIn(for_in) => {
        self.out.write_str("for (")?;
        self.emit_for_in_of_lhs(&for_in.stx.lhs)?;
        self.out.write_str(" in ")?;
        self.emit_expr(&for_in.stx.rhs)?;
        self.out.write_char(')')?;
        self.emit_nested_stmt(&for_in.stx.body)
      }
      Stmt::ForOf(for_of) => {
        self.out.write_str(if for_of.stx.await_ { "for await (" } else { "for (" })?;
        self.emit_for_in_of_lhs(&for_of.stx.lhs)?;
        self.out.write_str(" of ")?;
        self.emit_expr_with_min_prec(&for_of.stx.rhs, ASSIGNMENT_PRECEDENCE)?;
        self.out.write_char(')')?;
        self.emit_nested_stmt(&for_of.stx.body)
      }
      Stmt::ForTriple(for_triple) => {
        self.out.write_str("for (")?;
        match &for_triple.stx.init {
          ForTripleStmtInit::None => {}
          ForTripleStmtInit::Expr(init) => {
            if contains_bare_in(init) || is_ambiguous_stmt_start(init) {
              self.emit_wrapped(init)?;
            } else {
              self.emit_expr(init)?;
            };
          }
          ForTripleStmtInit::Decl(decl) => self.emit_var_decl(decl, true)?,
        };
        self.out.write_char(';')?;
        if let Some(cond) = &for_triple.stx.cond {
          self.out.write_char(' ')?;
          self.emit_expr(cond)?;
        };
        self.out.write_char(';')?;
        if let Some(post) = &for_triple.stx.post {
          self.out.write_char(' ')?;
          self.emit_expr(post)?;
        };
        self.out.write_char(')')?;
        self.emit_nested_stmt(&for_triple.stx.body)
      }
      Stmt::If(if_stmt) => {
        self.out.write_str("if (")?;
        self.emit_expr(&if_stmt.stx.test)?;
        self.out.write_char(')')?;
        let consequent = &if_stmt.stx.consequent;
        match &if_stmt.stx.alternate {
          Some(alternate) => {
            if ends_with_open_if(consequent) {
              self.out.write_char(' ')?;
              self.emit_block_body(std::slice::from_ref(consequent))?;
            } else {
              self.emit_nested_stmt(consequent)?;
            };
            self.out.write_str(" else")?;
            self.emit_nested_stmt(alternate)
          }
          None => self.emit_nested_stmt(consequent),
        }
      }
      Stmt::Import(import) => self.emit_import_stmt(import),
      Stmt::Label(label) => {
        write!(self.out, "{}:", label.stx.name)?;
        self.emit_nested_stmt(&label.stx.statement)
      }
      Stmt::Return(ret) => {
        self.out.write_str("return")?;
        if let Some(value) = &ret.stx.value {
          self.out.write_char(' ')?;
          self.emit_expr(value)?;
        };
        self.out.write_char(';')
      }
      Stmt::Switch(switch) => {
        self.out.write_str("switch (")?;
        self.emit_expr(&switch.stx.test)?;
        self.out.write_str(") {")?;
        self.indent += 1;
        for branch in switch.stx.branches.iter() {
          self.newline()?;
          match &branch.stx.case {
            Some(case) => {
              self.out.write_str("case ")?;
              self.emit_expr(case)?;
              self.out.write_char(':')?;
            }
            None => self.out.write_str("default:")?,
          };
          self.indent += 1;
          for stmt in branch.stx.body.iter() {
            self.newline()?;
            self.emit_stmt(stmt)?;
          }
          self.indent -= 1;
        }
        self.indent -= 1;
        self.newline()?;
        self.out.write_char('}')
      }
      Stmt::Throw(throw) => {
        self.out.write_str("throw ")?;
        self.emit_expr(&throw.stx.value)?;
        self.out.write_char(';')
      }
      Stmt::Try(try_stmt) => {
        self.out.write_str("try ")?;
        self.emit_block_body(&try_stmt.stx.wrapped.stx.body)?;
        if let Some(catch) = &try_stmt.stx.catch {
          self.out.write_str(" catch ")?;
          if let Some(parameter) = &catch.stx.parameter {
            self.out.write_char('(')?;
            self.emit_pat(&parameter.stx.pat)?;
            self.out.write_str(") ")?;
          };
          self.emit_block_body(&catch.stx.body)?;
        };
        if let Some(finally) = &try_stmt.stx.finally {
          self.out.write_str(" finally ")?;
          self.emit_block_body(&finally.stx.body)?;
        };
        Ok(())
      }
      Stmt::While(while_stmt) => {
        self.out.write_str("while (")?;
        self.emit_expr(&while_stmt.stx.condition)?;
        self.out.write_char(')')?;
        self.emit_nested_stmt(&while_stmt.stx.body)
      }
      Stmt::With(with) => {
        self.out.write_str("with (")?;
        self.emit_expr(&with.stx.object)?;
        self.out.write_char(')')?;
        self.emit_nested_stmt(&with.stx.body)
      }
      Stmt::ClassDecl(decl) => {
        if decl.stx.export {
          self.out.write_str("export ")?;
        };
        if decl.stx.export_default {
          self.out.write_str("default ")?;
        };
        self.emit_class(decl.stx.name.as_ref(), decl.stx.extends.as_ref(), &decl.stx.members)
      }
      Stmt::FunctionDecl(decl) => {
        if decl.stx.export {
          self.out.write_str("export ")?;
        };
        if decl.stx.export_default {
          self.out.write_str("default ")?;
        };
        self.emit_func_prefix(&decl.stx.function)?;
        self.emit_func_name(decl.stx.name.as_ref())?;
        self.emit_func_params_and_body(&decl.stx.function)
      }
      Stmt::VarDecl(decl) => {
        self.emit_var_decl(decl, false)?;
        self.out.write_char(';')
      }
    }
  }
}
