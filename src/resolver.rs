// Copyright 2018-2024 the Deno authors. MIT license.

use std::borrow::Cow;
use std::path::Path;
use std::path::PathBuf;

use deno_path_util::url_to_file_path;
use serde::Serialize;

use crate::module_specifier::extname;
use crate::module_specifier::resolve_local_path;
use crate::module_specifier::ModuleSpecifier;
use crate::options::FullySpecifiedOptions;
use crate::source::path_with_suffix;
use crate::source::FileSystem;
use crate::specifier::SpecifierKind;

/// Information about the module that contains the declarations.
///
/// This is derived once per file and is the same for every declaration in it.
#[derive(Debug, Clone)]
pub struct ResolutionContext {
  referrer: ModuleSpecifier,
  referrer_dir: Option<PathBuf>,
  source_extension: String,
}

impl ResolutionContext {
  pub fn new(referrer: &ModuleSpecifier) -> Self {
    let referrer_dir = if referrer.scheme() == "file" {
      url_to_file_path(referrer)
        .ok()
        .and_then(|path| path.parent().map(|p| p.to_path_buf()))
    } else {
      None
    };
    Self {
      referrer: referrer.clone(),
      referrer_dir,
      source_extension: extname(referrer.path()).to_string(),
    }
  }

  pub fn referrer(&self) -> &ModuleSpecifier {
    &self.referrer
  }

  /// The directory of the referrer when it's on the file system.
  pub fn referrer_dir(&self) -> Option<&Path> {
    self.referrer_dir.as_deref()
  }

  /// The extension of the referrer (ex. `.mjs`), or an empty string.
  pub fn source_extension(&self) -> &str {
    &self.source_extension
  }

  /// Resolves a local specifier to a path on the file system.
  pub fn resolve_path(&self, specifier: &str) -> Option<PathBuf> {
    let referrer_dir = self.referrer_dir()?;
    Some(resolve_local_path(referrer_dir, specifier))
  }
}

/// The fully specified replacement for a specifier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TargetModule {
  pub specifier: String,
  pub extension: String,
}

/// Decides the fully specified form of `specifier`, or `None` when it
/// should be left as-is.
pub fn resolve_target(
  specifier: &str,
  kind: &SpecifierKind,
  ctx: &ResolutionContext,
  options: &FullySpecifiedOptions,
  file_system: &dyn FileSystem,
) -> Option<TargetModule> {
  let current_extension = extname(specifier);
  // the extension gate applies to packages too, so it runs before the
  // package rule (ex. `pkg/styles.css` stays as-is)
  if !current_extension.is_empty()
    && !options.is_es_extension(current_extension)
  {
    return None;
  }

  let target = match kind {
    SpecifierKind::Package { .. } => {
      let extension = &options.es_extension_default;
      TargetModule {
        specifier: format!("{}{}", specifier, extension),
        extension: extension.clone(),
      }
    }
    SpecifierKind::Local => resolve_local_target(
      specifier,
      current_extension,
      ctx,
      options,
      file_system,
    )?,
  };

  if target.extension == current_extension {
    None
  } else {
    Some(target)
  }
}

fn resolve_local_target(
  specifier: &str,
  current_extension: &str,
  ctx: &ResolutionContext,
  options: &FullySpecifiedOptions,
  file_system: &dyn FileSystem,
) -> Option<TargetModule> {
  let mut maybe_path = ctx.resolve_path(specifier);
  let is_directory = maybe_path
    .as_deref()
    .map(|path| file_system.is_dir(path))
    .unwrap_or(false);
  // an es extension on something that isn't a directory is already fully
  // specified, and takes precedence over the same extension and default
  // extension rules (ex. `./foo.mjs` never becomes `./foo.mjs.js`)
  if !current_extension.is_empty() && !is_directory {
    return None;
  }

  let mut specifier = Cow::Borrowed(specifier);
  if let Some(path) = maybe_path.as_mut().filter(|_| is_directory) {
    let sibling = path_with_suffix(path, &options.es_extension_default);
    if !file_system.exists(&sibling) {
      specifier =
        Cow::Owned(format!("{}/index", specifier.trim_end_matches('/')));
      path.push("index");
    }
  }

  let extension = if options.ensure_file_exists {
    let path = maybe_path?;
    probe_extensions(&path, ctx.source_extension(), options, file_system)?
  } else if options.is_es_extension(ctx.source_extension()) {
    ctx.source_extension()
  } else {
    options.es_extension_default.as_str()
  };

  Some(TargetModule {
    specifier: format!("{}{}", specifier, extension),
    extension: extension.to_string(),
  })
}

/// Finds the first extension where `path` + extension exists.
///
/// The referrer's own extension is tried first when it's an es extension,
/// then each of the configured try extensions in order.
pub fn probe_extensions<'a>(
  path: &Path,
  source_extension: &'a str,
  options: &'a FullySpecifiedOptions,
  file_system: &dyn FileSystem,
) -> Option<&'a str> {
  let same_extension =
    Some(source_extension).filter(|ext| options.is_es_extension(ext));
  same_extension
    .into_iter()
    .chain(options.try_extensions.iter().map(|ext| ext.as_str()))
    .find(|ext| file_system.exists(&path_with_suffix(path, ext)))
}
