use super::ExportedSymbol;
use serde::Deserialize;
use std::collections::BTreeMap;

/// What replaces the exports of one module.
#[derive(Clone, Debug, PartialEq)]
pub enum Replacement<V> {
  /// Shorthand for `Exports({"default": f})`, for modules whose default export is a function.
  Function(V),
  /// Replacement values keyed by export name.
  Exports(BTreeMap<String, V>),
}

impl<V> Replacement<V> {
  pub fn into_exports(self) -> BTreeMap<String, V> {
    match self {
      Replacement::Function(f) => BTreeMap::from([(ExportedSymbol::Default.as_str().to_string(), f)]),
      Replacement::Exports(exports) => exports,
    }
  }
}

impl<V, K: Into<String>, const N: usize> From<[(K, V); N]> for Replacement<V> {
  fn from(exports: [(K, V); N]) -> Self {
    Replacement::Exports(exports.into_iter().map(|(k, v)| (k.into(), v)).collect())
  }
}

type Selector<'a, V> = Box<dyn FnMut(&str, &ExportedSymbol, &V) -> Option<V> + 'a>;

/// The argument to [`super::Registry::mock`].
pub enum Overlay<'a, V> {
  /// Replacements keyed by module path.
  Modules(BTreeMap<String, Replacement<V>>),
  /// Called with the path, exported symbol and current value of every alias; returns the
  /// replacement, or None to leave the alias alone.
  Select(Selector<'a, V>),
}

impl<'a, V> Overlay<'a, V> {
  pub fn modules() -> Self {
    Overlay::Modules(BTreeMap::new())
  }

  pub fn select(selector: impl FnMut(&str, &ExportedSymbol, &V) -> Option<V> + 'a) -> Self {
    Overlay::Select(Box::new(selector))
  }

  /// Adds the replacement for one module path. Has no effect on a selector overlay.
  pub fn with(mut self, path: impl Into<String>, replacement: impl Into<Replacement<V>>) -> Self {
    if let Overlay::Modules(modules) = &mut self {
      modules.insert(path.into(), replacement.into());
    };
    self
  }
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum RestoreTarget {
  /// `true` restores every alias imported from the path.
  Module(bool),
  /// Restores the aliases of the exports mapped to `true`.
  Symbols(BTreeMap<String, bool>),
}

/// Selects aliases to restore, by module path and optionally by export name. Deserializes from
/// JSON like `{"./a": true, "./b": {"default": true}}`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(transparent)]
pub struct RestoreSelection(BTreeMap<String, RestoreTarget>);

impl RestoreSelection {
  pub fn new() -> Self {
    RestoreSelection::default()
  }

  pub fn module(mut self, path: impl Into<String>) -> Self {
    self.0.insert(path.into(), RestoreTarget::Module(true));
    self
  }

  pub fn symbol(mut self, path: impl Into<String>, symbol: impl Into<String>) -> Self {
    let target = self
      .0
      .entry(path.into())
      .or_insert_with(|| RestoreTarget::Symbols(BTreeMap::new()));
    match target {
      RestoreTarget::Symbols(symbols) => {
        symbols.insert(symbol.into(), true);
      }
      // The whole module is already selected.
      RestoreTarget::Module(true) => {}
      RestoreTarget::Module(false) => {
        *target = RestoreTarget::Symbols(BTreeMap::from([(symbol.into(), true)]));
      }
    };
    self
  }

  pub fn selects(&self, path: &str, symbol: &ExportedSymbol) -> bool {
    match self.0.get(path) {
      Some(RestoreTarget::Module(all)) => *all,
      Some(RestoreTarget::Symbols(symbols)) => symbols.get(symbol.as_str()).copied().unwrap_or(false),
      None => false,
    }
  }
}
