use super::Binding;
use super::RewriteError;
use crate::ast::class_or_object::ClassOrObjKey;
use crate::ast::expr::pat::IdPat;
use crate::ast::expr::pat::ObjPat;
use crate::ast::expr::pat::Pat;
use crate::ast::expr::BinaryExpr;
use crate::ast::expr::CallExpr;
use crate::ast::expr::Expr;
use crate::ast::import_export::ImportNames;
use crate::ast::node::Node;
use crate::ast::stmt::decl::PatDecl;
use crate::ast::stmt::decl::VarDecl;
use crate::ast::stmt::ImportStmt;
use crate::ast::stmt::Stmt;
use crate::ast::stx::TopLevel;
use crate::config::RewriteOptions;
use crate::operator::OperatorName;
use crate::registry::is_reserved_alias;
use crate::registry::ExportedSymbol;
use crate::symbol::BindingResolver;
use crate::symbol::Symbol;
use ahash::HashSet;
use ahash::HashSetExt;
use std::borrow::Cow;
use tracing::debug;
use tracing::trace;

/// A binding, and the index of the top-level statement that introduces it.
pub struct Discovered {
  pub binding: Binding,
  pub stmt: usize,
}

#[derive(Default)]
pub struct Discovery {
  pub bindings: Vec<Discovered>,
  pub last_import: Option<usize>,
  pub last_require: Option<usize>,
  /// Whether the module assigns `module.exports` at the top level.
  pub assigns_module_exports: bool,
}

impl Discovery {
  /// Where the registry is created: after the last import statement, or the last recognized
  /// `require` if there are no imports.
  pub fn anchor(&self) -> Option<usize> {
    self.last_import.or(self.last_require)
  }
}

fn collect_pat_names<'a>(pat: &'a Pat, out: &mut Vec<&'a str>) {
  match pat {
    Pat::Id(id) => out.push(&id.stx.name),
    Pat::Arr(arr) => {
      for elem in arr.stx.elements.iter().flatten() {
        collect_pat_names(&elem.target.stx, out);
      }
      if let Some(rest) = &arr.stx.rest {
        collect_pat_names(&rest.stx, out);
      };
    }
    Pat::Obj(obj) => {
      for prop in obj.stx.properties.iter() {
        collect_pat_names(&prop.stx.target.stx, out);
      }
      if let Some(rest) = &obj.stx.rest {
        out.push(&rest.stx.name);
      };
    }
  }
}

/// Whether a top-level statement declares `name` in module scope.
pub fn declares_top_level_name(top: &TopLevel, name: &str) -> bool {
  let mut names = Vec::new();
  for stmt in top.body.iter() {
    match stmt.stx.as_ref() {
      Stmt::Import(import) => {
        if let Some(default) = &import.stx.default {
          collect_pat_names(&default.stx.pat.stx, &mut names);
        };
        match &import.stx.names {
          Some(ImportNames::All(alias)) => collect_pat_names(&alias.stx.pat.stx, &mut names),
          Some(ImportNames::Specific(specific)) => {
            for spec in specific.iter() {
              collect_pat_names(&spec.stx.alias.stx.pat.stx, &mut names);
            }
          }
          None => {}
        };
      }
      Stmt::VarDecl(decl) => {
        for declarator in decl.stx.declarators.iter() {
          collect_pat_names(&declarator.pattern.stx.pat.stx, &mut names);
        }
      }
      Stmt::ClassDecl(decl) => names.extend(decl.stx.name.iter().map(|n| n.stx.name.as_str())),
      Stmt::FunctionDecl(decl) => names.extend(decl.stx.name.iter().map(|n| n.stx.name.as_str())),
      _ => {}
    };
  }
  names.contains(&name)
}

/// A `require("path")` call, optionally as the last expression of a comma sequence, and optionally
/// followed by one property access.
pub struct RequireCall<'a> {
  pub path: &'a str,
  pub property: Option<Cow<'a, str>>,
}

// Coverage instrumentation turns `x` into `(cov_1.s[0]++, x)`.
fn strip_sequence(mut expr: &Node<Expr>) -> &Node<Expr> {
  while let Expr::Binary(binary) = expr.stx.as_ref() {
    if binary.stx.operator != OperatorName::Comma {
      break;
    };
    expr = &binary.stx.right;
  }
  expr
}

fn require_path<'a>(expr: &'a Node<Expr>, resolver: &dyn BindingResolver) -> Option<&'a str> {
  let Expr::Call(call) = strip_sequence(expr).stx.as_ref() else {
    return None;
  };
  let CallExpr {
    optional_chaining,
    callee,
    arguments,
  } = call.stx.as_ref();
  if *optional_chaining {
    return None;
  };
  let Expr::Id(callee) = callee.stx.as_ref() else {
    return None;
  };
  // A local function called `require` is not the module system's.
  if callee.stx.name != "require" || resolver.resolve(&callee.stx.name, &callee.assoc).is_some() {
    return None;
  };
  let [arg] = arguments.as_slice() else {
    return None;
  };
  if arg.stx.spread {
    return None;
  };
  match arg.stx.value.stx.as_ref() {
    Expr::LitStr(path) => Some(&path.stx.value),
    _ => None,
  }
}

pub fn require_call<'a>(
  expr: &'a Node<Expr>,
  resolver: &dyn BindingResolver,
) -> Option<RequireCall<'a>> {
  let expr = strip_sequence(expr);
  match expr.stx.as_ref() {
    Expr::Member(member) if !member.stx.optional_chaining => Some(RequireCall {
      path: require_path(&member.stx.left, resolver)?,
      property: Some(Cow::Borrowed(member.stx.right.as_str())),
    }),
    Expr::ComputedMember(member) if !member.stx.optional_chaining => {
      // Numeric keys name the property their canonical string form does, so `[1.0]` is `"1"`.
      let property = match member.stx.member.stx.as_ref() {
        Expr::LitStr(key) => Cow::Borrowed(key.stx.value.as_str()),
        Expr::LitNum(key) => Cow::Owned(key.stx.value.to_string()),
        _ => return None,
      };
      Some(RequireCall {
        path: require_path(&member.stx.object, resolver)?,
        property: Some(property),
      })
    }
    _ => Some(RequireCall {
      path: require_path(expr, resolver)?,
      property: None,
    }),
  }
}

fn is_module_exports(expr: &Node<Expr>, resolver: &dyn BindingResolver) -> bool {
  let Expr::Member(member) = expr.stx.as_ref() else {
    return false;
  };
  let Expr::Id(object) = member.stx.left.stx.as_ref() else {
    return false;
  };
  object.stx.name == "module"
    && member.stx.right == "exports"
    && resolver.resolve(&object.stx.name, &object.assoc).is_none()
}

pub struct Discoverer<'a> {
  resolver: &'a dyn BindingResolver,
  options: &'a RewriteOptions,
  registered: HashSet<Symbol>,
  discovery: Discovery,
}

impl<'a> Discoverer<'a> {
  pub fn new(resolver: &'a dyn BindingResolver, options: &'a RewriteOptions) -> Self {
    Discoverer {
      resolver,
      options,
      registered: HashSet::new(),
      discovery: Discovery::default(),
    }
  }

  /// Finds every mockable binding introduced by a top-level statement, in source order.
  pub fn discover(mut self, top: &TopLevel) -> Result<Discovery, RewriteError> {
    for (index, stmt) in top.body.iter().enumerate() {
      match stmt.stx.as_ref() {
        Stmt::Import(import) => {
          self.discovery.last_import = Some(index);
          self.import_stmt(index, import)?;
        }
        Stmt::VarDecl(decl) => self.var_decl(index, decl),
        Stmt::Expr(expr) => match expr.stx.expr.stx.as_ref() {
          Expr::Binary(binary) if binary.stx.operator == OperatorName::Assignment => {
            self.assignment(index, binary)
          }
          _ => {}
        },
        _ => {}
      };
    }
    Ok(self.discovery)
  }

  fn add(&mut self, stmt: usize, id: &Node<IdPat>, path: &str, symbol: ExportedSymbol) -> bool {
    let alias = &id.stx.name;
    if is_reserved_alias(alias) {
      debug!(alias = %alias, "skipping binding named like a registry operation");
      return false;
    };
    let Some(declaration) = self.resolver.resolve(alias, &id.assoc) else {
      trace!(alias = %alias, "skipping binding with no declaration");
      return false;
    };
    if !self.registered.insert(declaration) {
      return false;
    };
    debug!(alias = %alias, path, symbol = %symbol, "found mockable binding");
    self.discovery.bindings.push(Discovered {
      binding: Binding {
        alias: alias.clone(),
        path: path.to_string(),
        symbol,
        declaration,
      },
      stmt,
    });
    true
  }

  fn import_stmt(&mut self, index: usize, import: &Node<ImportStmt>) -> Result<(), RewriteError> {
    let module = &import.stx.module;
    if self.options.excludes_import(module) {
      debug!(module = %module, "skipping excluded import source");
      return Ok(());
    };
    let unsupported = |decl: &Node<PatDecl>| RewriteError::UnsupportedImportSpecifier {
      module: module.clone(),
      loc: decl.loc,
    };
    if let Some(default) = &import.stx.default {
      let Pat::Id(id) = default.stx.pat.stx.as_ref() else {
        return Err(unsupported(default));
      };
      self.add(index, id, module, ExportedSymbol::Default);
    };
    match &import.stx.names {
      Some(ImportNames::All(alias)) => {
        let Pat::Id(id) = alias.stx.pat.stx.as_ref() else {
          return Err(unsupported(alias));
        };
        self.add(index, id, module, ExportedSymbol::Namespace);
      }
      Some(ImportNames::Specific(names)) => {
        for name in names.iter() {
          let Pat::Id(id) = name.stx.alias.stx.pat.stx.as_ref() else {
            return Err(unsupported(&name.stx.alias));
          };
          let symbol = ExportedSymbol::from(name.stx.importable.as_str());
          self.add(index, id, module, symbol);
        }
      }
      None => {}
    };
    Ok(())
  }

  fn require_binding(&mut self, index: usize, id: &Node<IdPat>, path: &str, symbol: ExportedSymbol) {
    // Helpers generated by earlier compilation passes, such as `_interopRequireDefault`.
    if id.stx.name.starts_with('_') {
      trace!(alias = %id.stx.name, "skipping underscore-prefixed binding");
      return;
    };
    if self.add(index, id, path, symbol) {
      self.discovery.last_require = Some(index);
    };
  }

  fn destructured_require(&mut self, index: usize, pat: &ObjPat, path: &str) {
    for prop in pat.properties.iter() {
      let ClassOrObjKey::Direct(key) = &prop.stx.key else {
        continue;
      };
      let Pat::Id(id) = prop.stx.target.stx.as_ref() else {
        continue;
      };
      if prop.stx.default_value.is_some() {
        continue;
      };
      let symbol = ExportedSymbol::from(key.stx.key.as_str());
      self.require_binding(index, id, path, symbol);
    }
  }

  fn var_decl(&mut self, index: usize, decl: &Node<VarDecl>) {
    for declarator in decl.stx.declarators.iter() {
      let Some(init) = &declarator.initializer else {
        continue;
      };
      let Some(require) = require_call(init, self.resolver) else {
        continue;
      };
      if self.options.excludes_import(require.path) {
        debug!(module = %require.path, "skipping excluded require source");
        continue;
      };
      match (declarator.pattern.stx.pat.stx.as_ref(), require.property) {
        (Pat::Id(id), None) => {
          self.require_binding(index, id, require.path, ExportedSymbol::DynamicModule)
        }
        (Pat::Id(id), Some(property)) => {
          self.require_binding(index, id, require.path, ExportedSymbol::from(property.into_owned()))
        }
        (Pat::Obj(obj), None) => self.destructured_require(index, &obj.stx, require.path),
        _ => {}
      };
    }
  }

  fn assignment(&mut self, index: usize, assign: &Node<BinaryExpr>) {
    if is_module_exports(&assign.stx.left, self.resolver) {
      self.discovery.assigns_module_exports = true;
      return;
    };
    let Expr::IdPat(id) = assign.stx.left.stx.as_ref() else {
      return;
    };
    let Some(require) = require_call(&assign.stx.right, self.resolver) else {
      return;
    };
    if self.options.excludes_import(require.path) {
      return;
    };
    let symbol = match require.property {
      Some(property) => ExportedSymbol::from(property.into_owned()),
      None => ExportedSymbol::DynamicModule,
    };
    // The binding is keyed by what the target resolves to, which is its original declaration.
    self.require_binding(index, id, require.path, symbol);
  }
}
