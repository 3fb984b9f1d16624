// Copyright 2018-2024 the Deno authors. MIT license.

use std::borrow::Cow;
use std::path::Path;
use std::path::PathBuf;

use deno_path_util::normalize_path;

pub type ModuleSpecifier = url::Url;

/// If the specifier refers to a file relative to the referrer or to an
/// absolute path.
pub fn is_local_specifier(specifier: &str) -> bool {
  specifier.starts_with('.') || specifier.starts_with('/')
}

/// Gets the extension of the last path segment, including the leading
/// period, the same way Node's `path.extname` does.
///
/// A segment that only starts with a period (ex. `.hidden`) has no
/// extension, while `file.` has the extension `.`.
pub fn extname(specifier: &str) -> &str {
  let trimmed = specifier.trim_end_matches('/');
  let base = match trimmed.rfind('/') {
    Some(index) => &trimmed[index + 1..],
    None => trimmed,
  };
  if base == ".." {
    return "";
  }
  match base.rfind('.') {
    Some(0) | None => "",
    Some(index) => &base[index..],
  }
}

/// Resolves a local specifier against the referrer's directory to a file
/// path.
///
/// The specifier is treated as a path and not as a url, so characters such
/// as `?`, `#` or `%` stay part of the file name.
pub fn resolve_local_path(referrer_dir: &Path, specifier: &str) -> PathBuf {
  let path = normalize_path(Cow::Owned(referrer_dir.join(specifier)));
  // drops trailing slashes so that suffixes apply to the last segment
  path.components().collect()
}
