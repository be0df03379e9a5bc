//! Scope analysis: which declaration each identifier in a module refers to.
//!
//! [`compute_symbols`] annotates the AST in place. Declaring names (binding patterns, function and
//! class names) get a [`DeclaredSymbol`]; every identifier gets a [`ResolvedSymbol`], which is
//! None for names declared nowhere in the module. Consumers query it through a
//! [`BindingResolver`].

use crate::ast::node::Node;
use crate::ast::node::NodeAssocData;
use crate::ast::stx::TopLevel;
use derive_visitor::DriveMut;
pub use scope::Scope;
pub use scope::ScopeType;
pub use scope::Symbol;
pub use scope::SymbolGenerator;
use tracing::trace;
pub use visitor::declared_symbol;
pub use visitor::resolved_symbol;
pub use visitor::DeclaredSymbol;
pub use visitor::ResolvedSymbol;
use visitor::DeclVisitor;
use visitor::ResolveVisitor;

pub mod scope;
#[cfg(test)]
mod tests;
pub mod visitor;

/// Annotates every identifier in the module with its declaration, returning the module scope.
pub fn compute_symbols(top_level_node: &mut Node<TopLevel>) -> Scope {
  let top_level_scope = Scope::new(SymbolGenerator::new(), None, ScopeType::Module);
  let mut decl_visitor = DeclVisitor::new(top_level_scope.clone());
  top_level_node.drive_mut(&mut decl_visitor);
  let mut resolve_visitor = ResolveVisitor::default();
  top_level_node.drive_mut(&mut resolve_visitor);
  trace!(
    resolved = resolve_visitor.resolved,
    unresolved = resolve_visitor.unresolved,
    "computed symbols"
  );
  top_level_scope
}

/// Answers which declaration an identifier refers to.
///
/// For a given node, the answer must be the same every time it's asked, so that identity of the
/// returned symbols can stand in for identity of declarations.
pub trait BindingResolver {
  /// `name` is the identifier's text and `assoc` the data attached to its node. Returns None for
  /// names that aren't declared in the module.
  fn resolve(&self, name: &str, assoc: &NodeAssocData) -> Option<Symbol>;
}

/// Reads the annotations left by [`compute_symbols`].
#[derive(Clone, Copy, Debug, Default)]
pub struct AssocResolver;

impl BindingResolver for AssocResolver {
  fn resolve(&self, _name: &str, assoc: &NodeAssocData) -> Option<Symbol> {
    resolved_symbol(assoc)
  }
}
