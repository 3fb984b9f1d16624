// Copyright 2018-2024 the Deno authors. MIT license.

use serde::Deserialize;
use serde::Serialize;

fn default_extensions() -> Vec<String> {
  vec![".js".to_string(), ".mjs".to_string(), ".cjs".to_string()]
}

fn default_es_extension() -> String {
  ".js".to_string()
}

fn is_true() -> bool {
  true
}

/// Which bare (non-local) specifiers are eligible for rewriting.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum IncludePackages {
  /// `true` makes every bare specifier eligible, `false` none of them.
  All(bool),
  /// Only specifiers of these packages or scopes (ex. `@scope` or
  /// `@scope/pkg`) are eligible.
  Only(Vec<String>),
}

impl Default for IncludePackages {
  fn default() -> Self {
    IncludePackages::All(false)
  }
}

impl IncludePackages {
  pub fn is_included(&self, specifier: &str) -> bool {
    match self {
      IncludePackages::All(value) => *value,
      IncludePackages::Only(names) => names.iter().any(|name| {
        let name = name.trim_end_matches('/');
        !name.is_empty()
          && specifier
            .strip_prefix(name)
            .map(|rest| rest.is_empty() || rest.starts_with('/'))
            .unwrap_or(false)
      }),
    }
  }
}

/// Options that control how specifiers are made fully specified.
///
/// These are supplied once per compilation and deserialize from the same
/// camelCase object a bundler would pass to its plugins.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FullySpecifiedOptions {
  /// Only rewrite when a matching file was found on disk. Otherwise the
  /// extension is chosen optimistically.
  pub ensure_file_exists: bool,
  /// Extensions probed, in order, when `ensure_file_exists` is set.
  #[serde(default = "default_extensions")]
  pub try_extensions: Vec<String>,
  /// Extensions that an ES module loader can run.
  #[serde(default = "default_extensions")]
  pub es_extensions: Vec<String>,
  #[serde(default = "default_es_extension")]
  pub es_extension_default: String,
  pub include_packages: IncludePackages,
  /// Resolve the sub-path of included packages on disk before rewriting.
  #[serde(default = "is_true")]
  pub handle_package_modules: bool,
}

impl Default for FullySpecifiedOptions {
  fn default() -> Self {
    Self {
      ensure_file_exists: false,
      try_extensions: default_extensions(),
      es_extensions: default_extensions(),
      es_extension_default: default_es_extension(),
      include_packages: IncludePackages::default(),
      handle_package_modules: true,
    }
  }
}

impl FullySpecifiedOptions {
  pub fn is_es_extension(&self, extension: &str) -> bool {
    self.es_extensions.iter().any(|e| e == extension)
  }
}
