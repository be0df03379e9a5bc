use ahash::HashMap;
use ahash::HashMapExt;
use parking_lot::RwLock;
use parking_lot::RwLockReadGuard;
use parking_lot::RwLockWriteGuard;
use serde::Serialize;
use std::fmt;
use std::sync::atomic::AtomicU64;
use std::sync::atomic::Ordering;
use std::sync::Arc;

/// Identity of one declared binding. Every reference that resolves to the same declaration gets
/// the same Symbol, regardless of the identifier's text.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct Symbol(u64);

impl Symbol {
  pub fn raw(self) -> u64 {
    self.0
  }

  pub fn from_raw(raw: u64) -> Self {
    Symbol(raw)
  }
}

/// Shared counter so that symbols are unique across all scopes of a module.
#[derive(Clone, Default)]
pub struct SymbolGenerator(Arc<AtomicU64>);

impl SymbolGenerator {
  pub fn new() -> SymbolGenerator {
    SymbolGenerator::default()
  }

  pub fn next(&self) -> Symbol {
    Symbol(self.0.fetch_add(1, Ordering::Relaxed))
  }
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum ScopeType {
  Module,
  NonArrowFunction,
  ArrowFunction,
  Block,
  /// Holds only the name of a named class or function expression, visible inside its body.
  ClassOrFuncExprName,
}

impl ScopeType {
  /// Whether `var` declarations are hoisted to this scope.
  pub fn is_closure(self) -> bool {
    matches!(
      self,
      ScopeType::Module | ScopeType::NonArrowFunction | ScopeType::ArrowFunction
    )
  }
}

pub struct ScopeData {
  generator: SymbolGenerator,
  typ: ScopeType,
  parent: Option<Scope>,
  symbols: HashMap<String, Symbol>,
  // For deterministic iteration.
  symbol_names: Vec<String>,
}

impl ScopeData {
  pub fn typ(&self) -> ScopeType {
    self.typ
  }

  pub fn parent(&self) -> Option<&Scope> {
    self.parent.as_ref()
  }

  /// Declares a name, returning the existing symbol if the name was already declared in this
  /// scope (e.g. `var a; var a;`).
  pub fn add_symbol(&mut self, name: String) -> Symbol {
    if let Some(symbol) = self.symbols.get(&name) {
      return *symbol;
    };
    let symbol = self.generator.next();
    self.symbol_names.push(name.clone());
    self.symbols.insert(name, symbol);
    symbol
  }

  pub fn get_symbol(&self, name: &str) -> Option<Symbol> {
    self.symbols.get(name).copied()
  }

  pub fn symbol_names(&self) -> &Vec<String> {
    &self.symbol_names
  }
}

/// A cheaply cloneable handle to a scope, which can be attached to nodes.
#[derive(Clone)]
pub struct Scope(Arc<RwLock<ScopeData>>);

impl Scope {
  pub fn new(generator: SymbolGenerator, parent: Option<Scope>, typ: ScopeType) -> Scope {
    Scope(Arc::new(RwLock::new(ScopeData {
      generator,
      typ,
      parent,
      symbols: HashMap::new(),
      symbol_names: Vec::new(),
    })))
  }

  pub fn data(&self) -> RwLockReadGuard<'_, ScopeData> {
    self.0.read()
  }

  pub fn data_mut(&self) -> RwLockWriteGuard<'_, ScopeData> {
    self.0.write()
  }

  pub fn create_child_scope(&self, typ: ScopeType) -> Scope {
    let generator = self.data().generator.clone();
    Scope::new(generator, Some(self.clone()), typ)
  }

  pub fn parent(&self) -> Option<Scope> {
    self.data().parent.clone()
  }

  pub fn find_self_or_ancestor(&self, pred: impl Fn(ScopeType) -> bool) -> Option<Scope> {
    let mut current = Some(self.clone());
    while let Some(scope) = current {
      let typ = scope.data().typ;
      if pred(typ) {
        return Some(scope);
      };
      current = scope.parent();
    }
    None
  }

  /// The scope that `var` declarations made in this scope belong to.
  pub fn closest_closure(&self) -> Scope {
    self
      .find_self_or_ancestor(|t| t.is_closure())
      .unwrap_or_else(|| self.clone())
  }

  pub fn find_symbol_with_scope(&self, name: &str) -> Option<(Scope, Symbol)> {
    let mut current = Some(self.clone());
    while let Some(scope) = current {
      let found = scope.data().get_symbol(name);
      if let Some(symbol) = found {
        return Some((scope, symbol));
      };
      current = scope.parent();
    }
    None
  }

  pub fn find_symbol(&self, name: &str) -> Option<Symbol> {
    self.find_symbol_with_scope(name).map(|(_, symbol)| symbol)
  }
}

impl PartialEq for Scope {
  fn eq(&self, other: &Self) -> bool {
    Arc::ptr_eq(&self.0, &other.0)
  }
}

impl Eq for Scope {}

impl fmt::Debug for Scope {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let data = self.data();
    f.debug_struct("Scope")
      .field("typ", &data.typ)
      .field("symbols", &data.symbol_names)
      .finish()
  }
}
