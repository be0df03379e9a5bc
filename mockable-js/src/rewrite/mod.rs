//! Makes a module's imports mockable.
//!
//! Every binding introduced by an import declaration, or by a top-level `require` of a simple
//! shape, is registered in a per-module registry named `$imports`, and every reference to it is
//! rewritten into a read of the registry's property, e.g.
//!
//! ```js
//! import {ident} from "a-module";
//! ident();
//! ```
//!
//! becomes
//!
//! ```js
//! import {ident} from "a-module";
//! import {ImportMap} from "mockable-js/helpers";
//! const $imports = new ImportMap({ident: ["a-module", "ident", ident]});
//! $imports.ident();
//! export {$imports};
//! ```
//!
//! Constructs whose intent can't be determined (`require` calls in other positions, nested
//! destructuring, declarations inside functions) are left as they are.

use crate::ast::node::Node;
use crate::ast::stx::TopLevel;
use crate::config::RewriteOptions;
use crate::loc::Loc;
use crate::registry::ExportedSymbol;
use crate::registry::REGISTRY_NAME;
use crate::symbol::BindingResolver;
use crate::symbol::Symbol;
use ahash::HashMap;
use derive_visitor::DriveMut;
use discover::declares_top_level_name;
use discover::Discoverer;
use finalize::finalize;
use refs::ReferenceVisitor;
use serde::Serialize;
use std::path::Path;
use thiserror::Error;
use tracing::debug;
use tracing::debug_span;

mod build;
mod discover;
mod finalize;
mod refs;
#[cfg(test)]
mod tests;

/// A mockable binding.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Binding {
  /// Local name, and the name of the registry property.
  pub alias: String,
  /// Module specifier the binding was imported from.
  pub path: String,
  pub symbol: ExportedSymbol,
  #[serde(skip)]
  pub declaration: Symbol,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RewriteOutcome {
  /// The module's location is in an excluded directory.
  Excluded,
  /// The module declares its own top-level binding named like the registry.
  ReservedNameConflict,
  /// No mockable bindings were found.
  Unchanged,
  Rewritten(Vec<Binding>),
}

impl RewriteOutcome {
  pub fn bindings(&self) -> &[Binding] {
    match self {
      RewriteOutcome::Rewritten(bindings) => bindings,
      _ => &[],
    }
  }

  pub fn is_rewritten(&self) -> bool {
    matches!(self, RewriteOutcome::Rewritten(_))
  }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RewriteError {
  #[error("unsupported import specifier in import from \"{module}\" at [{}:{}]", .loc.0, .loc.1)]
  UnsupportedImportSpecifier { module: String, loc: Loc },
}

/// Rewrites the module in place so that its imports can be mocked.
///
/// `resolver` must identify the declaration of every identifier in `top`. `file` is the module's
/// location, used to decide whether it's excluded; modules without one are always processed.
/// The tree is only modified if the outcome is [`RewriteOutcome::Rewritten`].
pub fn rewrite_module(
  top: &mut Node<TopLevel>,
  resolver: &dyn BindingResolver,
  file: Option<&Path>,
  options: &RewriteOptions,
) -> Result<RewriteOutcome, RewriteError> {
  let _span = debug_span!("rewrite_module", file = ?file).entered();

  if options.excludes_file(file) {
    debug!("module is in an excluded directory");
    return Ok(RewriteOutcome::Excluded);
  };
  if declares_top_level_name(&top.stx, REGISTRY_NAME) {
    debug!("module already declares {}", REGISTRY_NAME);
    return Ok(RewriteOutcome::ReservedNameConflict);
  };

  let discovery = Discoverer::new(resolver, options).discover(&top.stx)?;
  if discovery.bindings.is_empty() {
    debug!("no mockable bindings");
    return Ok(RewriteOutcome::Unchanged);
  };

  let aliases = discovery
    .bindings
    .iter()
    .map(|d| (d.binding.declaration, d.binding.alias.clone()))
    .collect::<HashMap<_, _>>();
  let mut visitor = ReferenceVisitor::new(resolver, &aliases);
  top.drive_mut(&mut visitor);
  debug!(
    bindings = discovery.bindings.len(),
    references = visitor.rewritten,
    "rewrote references"
  );

  finalize(top, &discovery);
  Ok(RewriteOutcome::Rewritten(
    discovery.bindings.into_iter().map(|d| d.binding).collect(),
  ))
}
