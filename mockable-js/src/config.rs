use crate::registry::HELPER_MODULE;
use regex::Regex;
use serde::Deserialize;
use std::fmt;
use std::path::Component;
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
  #[error("invalid options: {0}")]
  Json(#[from] serde_json::Error),
  #[error("invalid module pattern {pattern:?}: {source}")]
  InvalidPattern {
    pattern: String,
    #[source]
    source: regex::Error,
  },
}

/// Matches import sources by exact text or by regular expression.
#[derive(Clone, Deserialize)]
#[serde(try_from = "RawModuleFilter")]
pub enum ModuleFilter {
  Exact(String),
  Pattern(Regex),
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawModuleFilter {
  Exact(String),
  Pattern { pattern: String },
}

impl TryFrom<RawModuleFilter> for ModuleFilter {
  type Error = ConfigError;

  fn try_from(raw: RawModuleFilter) -> Result<Self, Self::Error> {
    match raw {
      RawModuleFilter::Exact(module) => Ok(ModuleFilter::Exact(module)),
      RawModuleFilter::Pattern { pattern } => ModuleFilter::pattern(&pattern),
    }
  }
}

impl ModuleFilter {
  pub fn pattern(pattern: &str) -> Result<ModuleFilter, ConfigError> {
    Regex::new(pattern)
      .map(ModuleFilter::Pattern)
      .map_err(|source| ConfigError::InvalidPattern {
        pattern: pattern.to_string(),
        source,
      })
  }

  pub fn matches(&self, module: &str) -> bool {
    match self {
      ModuleFilter::Exact(exact) => exact == module,
      ModuleFilter::Pattern(re) => re.is_match(module),
    }
  }
}

impl From<&str> for ModuleFilter {
  fn from(module: &str) -> Self {
    ModuleFilter::Exact(module.to_string())
  }
}

impl fmt::Debug for ModuleFilter {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      ModuleFilter::Exact(module) => write!(f, "{:?}", module),
      ModuleFilter::Pattern(re) => write!(f, "/{}/", re.as_str()),
    }
  }
}

/// Controls which modules and imports are rewritten.
#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase", default, deny_unknown_fields)]
pub struct RewriteOptions {
  /// Modules inside a directory with one of these names are left alone.
  pub exclude_dirs: Vec<String>,
  /// Imports from matching sources are never made mockable. Replaces the defaults when set.
  pub exclude_imports_from_modules: Vec<ModuleFilter>,
}

impl Default for RewriteOptions {
  fn default() -> Self {
    RewriteOptions {
      exclude_dirs: vec!["test".to_string(), "__tests__".to_string()],
      exclude_imports_from_modules: [
        ModuleFilter::from(HELPER_MODULE),
        // Does its own import interception, which rewritten imports would bypass.
        ModuleFilter::from("proxyquire"),
      ]
      .into_iter()
      // Virtual modules of bundler plugins.
      .chain(ModuleFilter::pattern(r"^\x00").ok())
      .collect(),
    }
  }
}

impl RewriteOptions {
  pub fn from_json(json: &str) -> Result<RewriteOptions, ConfigError> {
    Ok(serde_json::from_str(json)?)
  }

  pub fn with_exclude_dir(mut self, dir: impl Into<String>) -> Self {
    self.exclude_dirs.push(dir.into());
    self
  }

  pub fn with_excluded_import(mut self, filter: impl Into<ModuleFilter>) -> Self {
    self.exclude_imports_from_modules.push(filter.into());
    self
  }

  /// Whether the module at `file` must be passed through untouched. Modules with no known location
  /// are never excluded.
  pub fn excludes_file(&self, file: Option<&Path>) -> bool {
    let Some(dir) = file.and_then(|f| f.parent()) else {
      return false;
    };
    dir.components().any(|c| match c {
      Component::Normal(name) => self
        .exclude_dirs
        .iter()
        .any(|d| name.to_str() == Some(d.as_str())),
      _ => false,
    })
  }

  pub fn excludes_import(&self, module: &str) -> bool {
    self
      .exclude_imports_from_modules
      .iter()
      .any(|f| f.matches(module))
  }
}

#[cfg(test)]
mod tests {
  use super::ConfigError;
  use super::ModuleFilter;
  use super::RewriteOptions;
  use std::path::Path;

  #[test]
  fn test_defaults() {
    let options = RewriteOptions::default();
    assert!(options.excludes_file(Some(Path::new("src/test/foo.js"))));
    assert!(options.excludes_file(Some(Path::new("/a/__tests__/b/foo.js"))));
    assert!(!options.excludes_file(Some(Path::new("src/testing/foo.js"))));
    // Only directories count.
    assert!(!options.excludes_file(Some(Path::new("src/test"))));
    assert!(!options.excludes_file(None));

    assert!(options.excludes_import("mockable-js/helpers"));
    assert!(options.excludes_import("proxyquire"));
    assert!(options.excludes_import("\0commonjsHelpers.js"));
    assert!(!options.excludes_import("./foo"));
  }

  #[test]
  fn test_from_json() {
    let options = RewriteOptions::from_json(
      r#"{"excludeDirs": ["spec"], "excludeImportsFromModules": ["react", {"pattern": "^@internal/"}]}"#,
    )
    .unwrap();
    assert!(options.excludes_file(Some(Path::new("spec/a.js"))));
    assert!(!options.excludes_file(Some(Path::new("test/a.js"))));
    assert!(options.excludes_import("react"));
    assert!(options.excludes_import("@internal/x"));
    assert!(!options.excludes_import("react-dom"));
    assert!(!options.excludes_import("proxyquire"));
  }

  #[test]
  fn test_missing_keys_use_defaults() {
    let options = RewriteOptions::from_json(r#"{"excludeDirs": []}"#).unwrap();
    assert!(!options.excludes_file(Some(Path::new("test/a.js"))));
    assert!(options.excludes_import("proxyquire"));
  }

  #[test]
  fn test_invalid_config() {
    assert!(matches!(
      RewriteOptions::from_json(r#"{"excludeImportsFromModules": [{"pattern": "("}]}"#),
      Err(ConfigError::Json(_))
    ));
    assert!(matches!(
      ModuleFilter::pattern("("),
      Err(ConfigError::InvalidPattern { .. })
    ));
    assert!(RewriteOptions::from_json(r#"{"excludeDir": []}"#).is_err());
  }

  #[test]
  fn test_builders() {
    let options = RewriteOptions::default()
      .with_exclude_dir("fixtures")
      .with_excluded_import("sinon");
    assert!(options.excludes_file(Some(Path::new("fixtures/a.js"))));
    assert!(options.excludes_import("sinon"));
  }
}
