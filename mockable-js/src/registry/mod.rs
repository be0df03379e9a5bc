//! The per-module table of mockable imports.
//!
//! A rewritten module constructs one registry, registers every binding it imports, and reads
//! bindings back through it. Tests then replace some of the values with [`Registry::mock`] and put
//! the originals back with [`Registry::restore`] or [`Registry::restore_all`].
//!
//! Metadata (origin of each alias and the value it was registered with) is kept apart from the
//! current values, so restoring never depends on what a mock did.

use ahash::HashMap;
use ahash::HashMapExt;
use serde::Deserialize;
use serde::Deserializer;
use serde::Serialize;
use serde::Serializer;
use std::collections::BTreeMap;
use std::fmt;
use thiserror::Error;
use tracing::debug;
use tracing::trace;

pub use overlay::Overlay;
pub use overlay::Replacement;
pub use overlay::RestoreSelection;
pub use overlay::RestoreTarget;

mod overlay;
#[cfg(test)]
mod tests;

/// Name of the registry binding declared and exported by rewritten modules.
pub const REGISTRY_NAME: &str = "$imports";
/// Name of the registry class, imported from [`HELPER_MODULE`].
pub const REGISTRY_CLASS: &str = "ImportMap";
/// Module that rewritten code imports the registry class from.
pub const HELPER_MODULE: &str = "mockable-js/helpers";
/// Source of [`HELPER_MODULE`], an ES module defining [`REGISTRY_CLASS`]. Its `$mock` and
/// `$restore` behave like [`Registry::mock`] and [`Registry::restore`].
pub const HELPER_SOURCE: &str = include_str!("../../helpers/index.js");
pub const ADD_METHOD: &str = "$add";
pub const MOCK_METHOD: &str = "$mock";
pub const RESTORE_METHOD: &str = "$restore";
pub const META_PROPERTY: &str = "$meta";

/// Names that would shadow the registry's own operations. Bindings with these aliases are never
/// registered.
pub const RESERVED_ALIASES: [&str; 4] = [ADD_METHOD, MOCK_METHOD, RESTORE_METHOD, META_PROPERTY];

pub fn is_reserved_alias(alias: &str) -> bool {
  RESERVED_ALIASES.contains(&alias)
}

/// Which export of the originating module a binding refers to.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ExportedSymbol {
  /// `import x from "m"`.
  Default,
  /// `import * as x from "m"`.
  Namespace,
  /// `const x = require("m")`: whatever the module system returns, with no known shape.
  DynamicModule,
  Named(String),
}

impl ExportedSymbol {
  pub fn as_str(&self) -> &str {
    match self {
      ExportedSymbol::Default => "default",
      ExportedSymbol::Namespace => "*",
      ExportedSymbol::DynamicModule => "<CJS>",
      ExportedSymbol::Named(name) => name,
    }
  }

  /// Namespace and dynamic module bindings take a whole replacement object at once.
  pub fn is_whole_module(&self) -> bool {
    matches!(self, ExportedSymbol::Namespace | ExportedSymbol::DynamicModule)
  }
}

impl From<&str> for ExportedSymbol {
  fn from(value: &str) -> Self {
    match value {
      "default" => ExportedSymbol::Default,
      "*" => ExportedSymbol::Namespace,
      "<CJS>" => ExportedSymbol::DynamicModule,
      name => ExportedSymbol::Named(name.to_string()),
    }
  }
}

impl From<String> for ExportedSymbol {
  fn from(value: String) -> Self {
    match value.as_str() {
      "default" | "*" | "<CJS>" => ExportedSymbol::from(value.as_str()),
      _ => ExportedSymbol::Named(value),
    }
  }
}

impl fmt::Display for ExportedSymbol {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

impl Serialize for ExportedSymbol {
  fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(self.as_str())
  }
}

impl<'de> Deserialize<'de> for ExportedSymbol {
  fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
    String::deserialize(deserializer).map(ExportedSymbol::from)
  }
}

/// A value a registry can hold.
pub trait ModuleValue: Clone {
  /// Builds the value that a namespace or dynamic module alias receives when its module is
  /// replaced with `exports`.
  fn from_exports(exports: &BTreeMap<String, Self>) -> Self;
}

impl ModuleValue for serde_json::Value {
  fn from_exports(exports: &BTreeMap<String, Self>) -> Self {
    serde_json::Value::Object(
      exports
        .iter()
        .map(|(k, v)| (k.clone(), v.clone()))
        .collect(),
    )
  }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RegistryError {
  /// A mock names an export that no registered alias was imported as.
  #[error("module does not import \"{symbol}\" from \"{path}\"")]
  UnknownImport { path: String, symbol: String },
}

/// Where an alias was imported from, and the value it was registered with.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ImportMeta<V> {
  pub path: String,
  pub symbol: ExportedSymbol,
  pub value: V,
}

pub struct Registry<V> {
  // Registration order.
  aliases: Vec<String>,
  meta: HashMap<String, ImportMeta<V>>,
  current: HashMap<String, V>,
}

impl<V: ModuleValue> Default for Registry<V> {
  fn default() -> Self {
    Registry {
      aliases: Vec::new(),
      meta: HashMap::new(),
      current: HashMap::new(),
    }
  }
}

impl<V: ModuleValue> Registry<V> {
  /// Creates a registry holding `bindings`, each initially set to its registered value.
  pub fn new<A: Into<String>>(bindings: impl IntoIterator<Item = (A, ImportMeta<V>)>) -> Self {
    let mut registry = Registry::default();
    for (alias, meta) in bindings {
      registry.register(alias, meta.path, meta.symbol, meta.value);
    }
    registry
  }

  /// Adds an alias. Returns false and does nothing if the alias is one of the registry's own
  /// operation names.
  pub fn register(
    &mut self,
    alias: impl Into<String>,
    path: impl Into<String>,
    symbol: impl Into<ExportedSymbol>,
    value: V,
  ) -> bool {
    let alias = alias.into();
    if is_reserved_alias(&alias) {
      debug!(alias = %alias, "ignoring registration of reserved name");
      return false;
    };
    let meta = ImportMeta {
      path: path.into(),
      symbol: symbol.into(),
      value: value.clone(),
    };
    trace!(alias = %alias, path = %meta.path, symbol = %meta.symbol, "registered import");
    if self.meta.insert(alias.clone(), meta).is_none() {
      self.aliases.push(alias.clone());
    };
    self.current.insert(alias, value);
    true
  }

  /// The current value of an alias.
  pub fn get(&self, alias: &str) -> Option<&V> {
    self.current.get(alias)
  }

  pub fn meta(&self) -> impl Iterator<Item = (&str, &ImportMeta<V>)> {
    self
      .aliases
      .iter()
      .filter_map(|a| self.meta.get(a).map(|m| (a.as_str(), m)))
  }

  pub fn aliases(&self) -> impl Iterator<Item = &str> {
    self.aliases.iter().map(|a| a.as_str())
  }

  pub fn len(&self) -> usize {
    self.aliases.len()
  }

  pub fn is_empty(&self) -> bool {
    self.aliases.is_empty()
  }

  // Turns a selector into replacement descriptions keyed by module path, asking it once per alias.
  fn select(
    &self,
    mut selector: impl FnMut(&str, &ExportedSymbol, &V) -> Option<V>,
  ) -> BTreeMap<String, Replacement<V>> {
    let mut modules = BTreeMap::<String, BTreeMap<String, V>>::new();
    for (alias, meta) in self.meta() {
      let Some(current) = self.current.get(alias) else {
        continue;
      };
      if let Some(value) = selector(&meta.path, &meta.symbol, current) {
        modules
          .entry(meta.path.clone())
          .or_default()
          .insert(meta.symbol.as_str().to_string(), value);
      };
    }
    modules
      .into_iter()
      .map(|(path, exports)| (path, Replacement::Exports(exports)))
      .collect()
  }

  /// Replaces the values of the aliases named by `overlay`.
  ///
  /// Every path and export named must match at least one alias; otherwise an error naming the
  /// first unmatched pair is returned and nothing is changed. Namespace and dynamic module aliases
  /// of a mocked path receive the whole replacement object, which also counts as a match for every
  /// export in it.
  pub fn mock(&mut self, overlay: Overlay<'_, V>) -> Result<(), RegistryError> {
    let modules = match overlay {
      Overlay::Modules(modules) => modules,
      Overlay::Select(selector) => self.select(selector),
    };

    let mut assignments = Vec::<(String, V)>::new();
    for (path, replacement) in modules {
      let exports = replacement.into_exports();
      let mut whole_module_matched = false;
      for (alias, meta) in self.meta() {
        if meta.path == path && meta.symbol.is_whole_module() {
          assignments.push((alias.to_string(), V::from_exports(&exports)));
          whole_module_matched = true;
        };
      }
      for (symbol, value) in exports.iter() {
        let mut matched = whole_module_matched;
        for (alias, meta) in self.meta() {
          if meta.path == path && meta.symbol.as_str() == symbol {
            assignments.push((alias.to_string(), value.clone()));
            matched = true;
          };
        }
        if !matched {
          return Err(RegistryError::UnknownImport {
            path,
            symbol: symbol.clone(),
          });
        };
      }
    }

    debug!(count = assignments.len(), "mocking imports");
    for (alias, value) in assignments {
      self.current.insert(alias, value);
    }
    Ok(())
  }

  /// Resets every alias to the value it was registered with.
  pub fn restore_all(&mut self) {
    debug!("restoring all imports");
    for (alias, meta) in self.meta.iter() {
      self.current.insert(alias.clone(), meta.value.clone());
    }
  }

  /// Resets the aliases selected by `selection` to the values they were registered with. Entries
  /// that select nothing are ignored.
  pub fn restore(&mut self, selection: &RestoreSelection) {
    let mut restored = 0;
    for (alias, meta) in self.meta.iter() {
      if selection.selects(&meta.path, &meta.symbol) {
        self.current.insert(alias.clone(), meta.value.clone());
        restored += 1;
      };
    }
    debug!(restored, "restored imports");
  }
}

impl<V: fmt::Debug> fmt::Debug for Registry<V> {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let mut map = f.debug_map();
    for alias in self.aliases.iter() {
      if let Some(value) = self.current.get(alias) {
        map.entry(alias, value);
      };
    }
    map.finish()
  }
}
