use super::expr::pat::IdPat;
use super::node::Node;
use super::stmt::decl::PatDecl;
use derive_visitor::Drive;
use derive_visitor::DriveMut;
use serde::Serialize;

#[derive(Debug, Serialize, PartialEq, Eq, Clone)]
pub enum ModuleExportImportName {
  Ident(String),
  Str(String),
}

impl ModuleExportImportName {
  pub fn as_str(&self) -> &str {
    match self {
      ModuleExportImportName::Ident(name) | ModuleExportImportName::Str(name) => name,
    }
  }
}

#[derive(Debug, Drive, DriveMut, Serialize)]
pub struct ExportName {
  // For a local export list this is the local name. It's kept as a name rather than an IdExpr,
  // so it's never treated as a usage of the binding.
  #[drive(skip)]
  pub exportable: ModuleExportImportName,
  // The exported name. Always set, even when no explicit alias is written.
  #[drive(skip)]
  pub alias: ModuleExportImportName,
}

#[derive(Debug, Drive, DriveMut, Serialize)]
pub enum ExportNames {
  // `export * from "module"`
  // `export * as name from "module"`
  All(Option<Node<IdPat>>),
  // `export {a as default, b as c, d}`
  // `export {default, a as b} from "module"`
  Specific(Vec<Node<ExportName>>),
}

#[derive(Debug, Drive, DriveMut, Serialize)]
pub struct ImportName {
  #[drive(skip)]
  pub importable: ModuleExportImportName,
  // Always set, even when no explicit alias is written.
  pub alias: Node<PatDecl>,
}

#[derive(Debug, Drive, DriveMut, Serialize)]
pub enum ImportNames {
  // `import * as name`
  All(Node<PatDecl>),
  // `import {a as b, c, default as e}`
  Specific(Vec<Node<ImportName>>),
}
