// Copyright 2018-2024 the Deno authors. MIT license.

use crate::declaration::Declaration;
use crate::module_specifier::extname;
use crate::module_specifier::is_local_specifier;
use crate::options::FullySpecifiedOptions;
use crate::packages::PackageSpecifier;
use crate::resolver::ResolutionContext;
use crate::source::PackageResolver;

/// How an eligible specifier should be resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SpecifierKind {
  /// A relative or absolute path.
  Local,
  /// A path within a package (ex. `@scope/pkg/subdir`).
  Package {
    /// Extension of the file the specifier resolved to on disk. This is
    /// `None` when package sub-paths aren't resolved.
    entry_extension: Option<String>,
  },
}

/// Decides whether a declaration's specifier may be made fully specified.
///
/// Returns `None` for declarations that must be left alone: ones without a
/// specifier, type only declarations, and bare specifiers that aren't an
/// included package's sub-path.
pub fn classify(
  declaration: &Declaration,
  ctx: &ResolutionContext,
  options: &FullySpecifiedOptions,
  maybe_package_resolver: Option<&dyn PackageResolver>,
) -> Option<SpecifierKind> {
  let specifier = declaration.specifier()?;
  if declaration.is_type_only() {
    return None;
  }
  if is_local_specifier(specifier) {
    return Some(SpecifierKind::Local);
  }
  classify_package(specifier, ctx, options, maybe_package_resolver)
}

fn classify_package(
  specifier: &str,
  ctx: &ResolutionContext,
  options: &FullySpecifiedOptions,
  maybe_package_resolver: Option<&dyn PackageResolver>,
) -> Option<SpecifierKind> {
  if !options.include_packages.is_included(specifier) {
    return None;
  }

  if !options.handle_package_modules {
    let package_specifier = PackageSpecifier::parse(specifier).ok()?;
    return package_specifier
      .sub_path
      .map(|_| SpecifierKind::Package {
        entry_extension: None,
      });
  }

  let package_resolver = maybe_package_resolver?;
  let referrer_dir = ctx.referrer_dir()?;
  let Some(entry) =
    package_resolver.resolve_package_entry(specifier, referrer_dir)
  else {
    log::debug!(
      "Could not resolve package '{}' from {}.",
      specifier,
      ctx.referrer()
    );
    return None;
  };
  if !entry.has_sub_path {
    return None;
  }
  let entry_extension = entry
    .path
    .to_str()
    .map(|path| extname(path).to_string());
  Some(SpecifierKind::Package { entry_extension })
}
