// Copyright 2018-2024 the Deno authors. MIT license.

use std::collections::HashMap;
use std::fmt;
use std::path::Path;
use std::path::PathBuf;

mod file_system;

pub use file_system::path_with_suffix;
pub use file_system::FileSystem;
pub use file_system::NullFileSystem;

/// The on-disk entry point a bare specifier resolved to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackageEntry {
  /// The file the specifier resolved to.
  pub path: PathBuf,
  /// If the specifier referred to something within the package
  /// (ex. `pkg/sub`) rather than the package itself (ex. `pkg`).
  pub has_sub_path: bool,
}

/// Resolves bare specifiers to the files of installed packages.
pub trait PackageResolver: fmt::Debug {
  /// Resolves the bare specifier as seen from a module in `referrer_dir`.
  ///
  /// Returns `None` when the package isn't installed or the specifier
  /// doesn't resolve to a file.
  fn resolve_package_entry(
    &self,
    specifier: &str,
    referrer_dir: &Path,
  ) -> Option<PackageEntry>;
}

/// A package resolver where the entries are provided ahead of time. This is
/// useful for testing or for hosts that already resolved their packages.
#[derive(Debug, Default)]
pub struct MemoryPackageResolver {
  entries: HashMap<String, PackageEntry>,
}

impl MemoryPackageResolver {
  pub fn new<S: AsRef<str>, P: Into<PathBuf>>(entries: Vec<(S, P)>) -> Self {
    let mut resolver = Self::default();
    for (specifier, path) in entries {
      resolver.add_entry(specifier.as_ref(), path);
    }
    resolver
  }

  pub fn add_entry(&mut self, specifier: &str, path: impl Into<PathBuf>) {
    let has_sub_path = crate::packages::PackageSpecifier::parse(specifier)
      .map(|s| s.sub_path.is_some())
      .unwrap_or(false);
    self.entries.insert(
      specifier.to_string(),
      PackageEntry {
        path: path.into(),
        has_sub_path,
      },
    );
  }
}

impl PackageResolver for MemoryPackageResolver {
  fn resolve_package_entry(
    &self,
    specifier: &str,
    _referrer_dir: &Path,
  ) -> Option<PackageEntry> {
    self.entries.get(specifier).cloned()
  }
}
