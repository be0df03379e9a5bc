use super::expr::pat::is_valid_pattern_identifier;
use super::ParseCtx;
use super::Parser;
use crate::ast::expr::pat::IdPat;
use crate::ast::import_export::ExportName;
use crate::ast::import_export::ExportNames;
use crate::ast::import_export::ImportName;
use crate::ast::import_export::ImportNames;
use crate::ast::import_export::ModuleExportImportName;
use crate::ast::node::Node;
use crate::ast::stmt::decl::PatDecl;
use crate::ast::stmt::ExportDefaultExprStmt;
use crate::ast::stmt::ExportListStmt;
use crate::ast::stmt::ImportStmt;
use crate::ast::stmt::Stmt;
use crate::error::SyntaxErrorType;
use crate::error::SyntaxResult;
use crate::token::Kw;
use crate::token::TT;

impl<'a> Parser<'a> {
  /// Parses a name in an import or export list, which may be any identifier name or a string.
  fn module_export_import_name(&mut self) -> SyntaxResult<ModuleExportImportName> {
    let t = self.peek();
    match t.typ {
      TT::Str => Ok(ModuleExportImportName::Str(self.lit_str_val()?.1)),
      TT::Ident => {
        self.consume();
        Ok(ModuleExportImportName::Ident(self.string(t.loc)))
      }
      typ if typ.is_keyword() => {
        self.consume();
        Ok(ModuleExportImportName::Ident(self.string(t.loc)))
      }
      _ => Err(t.error(SyntaxErrorType::ExpectedSyntax("exported or imported name"))),
    }
  }

  /// A binding created by an import, which must be a plain identifier.
  fn import_binding(&mut self, ctx: ParseCtx) -> SyntaxResult<Node<PatDecl>> {
    let id = self.id_pat(ctx)?;
    Ok(Node::new(id.loc, PatDecl {
      pat: id.into_wrapped(),
    }))
  }

  fn import_names(&mut self, ctx: ParseCtx) -> SyntaxResult<ImportNames> {
    if self.consume_if(TT::Star).is_match() {
      self.require_word("as")?;
      return Ok(ImportNames::All(self.import_binding(ctx)?));
    };
    self.require(TT::LBrace)?;
    let names = self.list_with_loc(TT::Comma, TT::RBrace, |p| {
      let name_token = p.peek();
      let importable = p.module_export_import_name()?;
      let alias = if p.consume_if_word("as") {
        p.import_binding(ctx)?
      } else {
        // Without an alias, the imported name must itself be a valid binding name.
        let valid = matches!(importable, ModuleExportImportName::Ident(_))
          && is_valid_pattern_identifier(name_token.typ, ctx.rules);
        if !valid {
          return Err(name_token.error(SyntaxErrorType::ExpectedSyntax("as")));
        };
        Node::new(name_token.loc, PatDecl {
          pat: Node::new(name_token.loc, IdPat {
            name: importable.as_str().to_string(),
          })
          .into_wrapped(),
        })
      };
      Ok(ImportName { importable, alias })
    })?;
    Ok(ImportNames::Specific(names))
  }

  /// Skips import attributes such as `with { type: "json" }`.
  fn skip_import_attributes(&mut self, ctx: ParseCtx) -> SyntaxResult<()> {
    let t = self.peek();
    let is_attributes = t.typ == TT::Kw(Kw::With)
      || (t.typ == TT::Ident && self.str(t.loc) == "assert" && !t.preceded_by_line_terminator);
    if is_attributes {
      self.consume();
      self.lit_obj(ctx)?;
    };
    Ok(())
  }

  pub fn import_stmt(&mut self, ctx: ParseCtx) -> SyntaxResult<Node<ImportStmt>> {
    self.with_loc(|p| {
      p.require(TT::Kw(Kw::Import))?;
      if p.peek().typ == TT::Str {
        let module = p.lit_str_val()?.1;
        p.skip_import_attributes(ctx)?;
        p.require_semicolon()?;
        return Ok(ImportStmt {
          default: None,
          names: None,
          module,
        });
      };
      let default = match p.peek().typ {
        TT::Star | TT::LBrace => None,
        _ => Some(p.import_binding(ctx)?),
      };
      let names = match default.is_none() || p.consume_if(TT::Comma).is_match() {
        true => Some(p.import_names(ctx)?),
        false => None,
      };
      p.require_word("from")?;
      let module = p.lit_str_val()?.1;
      p.skip_import_attributes(ctx)?;
      p.require_semicolon()?;
      Ok(ImportStmt {
        default,
        names,
        module,
      })
    })
  }

  fn export_list(&mut self, ctx: ParseCtx) -> SyntaxResult<Node<ExportListStmt>> {
    self.with_loc(|p| {
      let names = if p.consume_if(TT::Star).is_match() {
        let alias = match p.consume_if_word("as") {
          true => Some(p.id_pat(ctx)?),
          false => None,
        };
        ExportNames::All(alias)
      } else {
        p.require(TT::LBrace)?;
        let names = p.list_with_loc(TT::Comma, TT::RBrace, |p| {
          let exportable = p.module_export_import_name()?;
          let alias = match p.consume_if_word("as") {
            true => p.module_export_import_name()?,
            false => exportable.clone(),
          };
          Ok(ExportName { exportable, alias })
        })?;
        ExportNames::Specific(names)
      };
      let from = match p.consume_if_word("from") {
        true => Some(p.lit_str_val()?.1),
        false => None,
      };
      if from.is_none() && matches!(names, ExportNames::All(_)) {
        return Err(p.peek().error(SyntaxErrorType::ExpectedSyntax("from")));
      };
      if from.is_some() {
        p.skip_import_attributes(ctx)?;
      };
      p.require_semicolon()?;
      Ok(ExportListStmt { names, from })
    })
  }

  pub fn export_stmt(&mut self, ctx: ParseCtx) -> SyntaxResult<Node<Stmt>> {
    let start = self.checkpoint();
    self.require(TT::Kw(Kw::Export))?;
    let [t, next] = self.peek_n::<2>();
    let is_async_func = t.typ == TT::Ident
      && self.str(t.loc) == "async"
      && next.typ == TT::Kw(Kw::Function)
      && !next.preceded_by_line_terminator;
    let mut stmt: Node<Stmt> = match t.typ {
      TT::Kw(Kw::Default) => {
        self.consume();
        let [t, next] = self.peek_n::<2>();
        let is_async_func = t.typ == TT::Ident
          && self.str(t.loc) == "async"
          && next.typ == TT::Kw(Kw::Function)
          && !next.preceded_by_line_terminator;
        match t.typ {
          TT::Kw(Kw::Function) => self.func_decl(ctx, true, true)?.into_wrapped(),
          TT::Kw(Kw::Class) => self.class_decl(ctx, true, true)?.into_wrapped(),
          _ if is_async_func => self.func_decl(ctx, true, true)?.into_wrapped(),
          _ => {
            let expression = self.assignment_expr(ctx, &[])?;
            self.require_semicolon()?;
            Node::new(expression.loc, ExportDefaultExprStmt { expression }).into_wrapped()
          }
        }
      }
      TT::Kw(Kw::Var) | TT::Kw(Kw::Let) | TT::Kw(Kw::Const) => {
        let decl = self.var_decl(ctx, true, &[])?;
        self.require_semicolon()?;
        decl.into_wrapped()
      }
      TT::Kw(Kw::Function) => self.func_decl(ctx, true, false)?.into_wrapped(),
      TT::Kw(Kw::Class) => self.class_decl(ctx, true, false)?.into_wrapped(),
      _ if is_async_func => self.func_decl(ctx, true, false)?.into_wrapped(),
      TT::Star | TT::LBrace => self.export_list(ctx)?.into_wrapped(),
      _ => return Err(t.error(SyntaxErrorType::ExpectedSyntax("exportable"))),
    };
    // Include the `export` keyword.
    stmt.loc = self.since_checkpoint(&start);
    Ok(stmt)
  }
}
