use super::build::construct_registry;
use super::build::export_registry;
use super::build::import_registry_class;
use super::build::register_binding;
use super::build::republish_registry;
use super::discover::Discovery;
use crate::ast::node::Node;
use crate::ast::stmt::Stmt;
use crate::ast::stx::TopLevel;
use crate::loc::Loc;
use std::collections::BTreeMap;
use tracing::trace;

/// Statements to insert, keyed by the index of the original statement they follow.
#[derive(Default)]
struct Splices {
  after: BTreeMap<usize, Vec<Node<Stmt>>>,
  tail: Vec<Node<Stmt>>,
}

impl Splices {
  fn insert_after(&mut self, index: usize, stmt: Node<Stmt>) {
    self.after.entry(index).or_default().push(stmt);
  }

  fn len(&self) -> usize {
    self.after.values().map(|v| v.len()).sum::<usize>() + self.tail.len()
  }

  // One pass over the original statements, so indices never shift while splicing.
  fn apply(mut self, body: &mut Vec<Node<Stmt>>) {
    let original = std::mem::take(body);
    body.reserve(original.len() + self.len());
    for (index, stmt) in original.into_iter().enumerate() {
      body.push(stmt);
      if let Some(extra) = self.after.remove(&index) {
        body.extend(extra);
      };
    }
    body.extend(self.tail);
  }
}

/// Inserts the registry's creation, registrations and exports into the module.
///
/// The registry is created right after the anchor statement with every binding introduced at or
/// before it; each later binding is registered right after its own statement.
pub fn finalize(top: &mut Node<TopLevel>, discovery: &Discovery) {
  let Some(anchor) = discovery.anchor() else {
    return;
  };
  let loc_after = |index: usize| Loc::at(top.stx.body[index].loc.1);
  let end = Loc::at(top.loc.1);

  let mut splices = Splices::default();
  let initial = discovery
    .bindings
    .iter()
    .filter(|d| d.stmt <= anchor)
    .map(|d| &d.binding)
    .collect::<Vec<_>>();
  let anchor_loc = loc_after(anchor);
  splices.insert_after(anchor, import_registry_class(anchor_loc));
  splices.insert_after(anchor, construct_registry(anchor_loc, &initial));

  for discovered in discovery.bindings.iter().filter(|d| d.stmt > anchor) {
    let loc = loc_after(discovered.stmt);
    splices.insert_after(discovered.stmt, register_binding(loc, &discovered.binding));
  }

  // Last, so that a `module.exports = ...` assignment, or the one a CommonJS transform would
  // generate for `export {...}`, can't replace the object it's published on.
  splices.tail.push(export_registry(end));
  if discovery.assigns_module_exports {
    splices.tail.push(republish_registry(end));
  };

  trace!(
    statements = splices.len(),
    initial = initial.len(),
    "splicing registry statements"
  );
  splices.apply(&mut top.stx.body);
}
