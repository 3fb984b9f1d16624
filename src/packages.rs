// Copyright 2018-2024 the Deno authors. MIT license.

use std::path::Path;
use std::path::PathBuf;

use serde::Deserialize;
use sys_traits::FsMetadata;
use sys_traits::FsRead;
use thiserror::Error;

use crate::source::path_with_suffix;
use crate::source::PackageEntry;
use crate::source::PackageResolver;

/// Extensions tried when a package sub-path doesn't name a file exactly.
const PACKAGE_FILE_EXTENSIONS: [&str; 4] = [".js", ".mjs", ".cjs", ".json"];

#[derive(Debug, Error, deno_error::JsError)]
#[class(type)]
#[error("Invalid package specifier '{text}'. {message}")]
pub struct PackageSpecifierParseError {
  message: String,
  text: String,
}

/// A bare specifier split into the package name and the path within it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackageSpecifier<'a> {
  /// The package name, including the scope (ex. `@scope/pkg`).
  pub name: &'a str,
  /// The path within the package, without the leading slash.
  pub sub_path: Option<&'a str>,
}

impl<'a> PackageSpecifier<'a> {
  pub fn parse(text: &'a str) -> Result<Self, PackageSpecifierParseError> {
    use monch::*;

    fn segment(input: &str) -> ParseResult<&str> {
      let (rest, segment) = take_while(|c| c != '/')(input)?;
      if segment.is_empty() {
        ParseError::fail(input, "Expected a package name segment.")
      } else if segment.contains(':') {
        ParseError::fail(input, "Package names can't contain a colon.")
      } else {
        Ok((rest, segment))
      }
    }

    fn name(input: &str) -> ParseResult<&str> {
      let (rest, _) = if input.starts_with('@') {
        let (rest, _) = segment(input)?;
        let (rest, _) = ch('/')(rest)?;
        segment(rest)?
      } else {
        segment(input)?
      };
      Ok((rest, &input[..input.len() - rest.len()]))
    }

    fn sub_path(input: &str) -> ParseResult<&str> {
      let (input, _) = ch('/')(input)?;
      Ok(("", input))
    }

    fn parse_specifier(input: &str) -> ParseResult<PackageSpecifier> {
      if input.starts_with('.') || input.starts_with('/') {
        return ParseError::fail(input, "Not a bare specifier.");
      }
      let (input, name) = name(input)?;
      let (input, maybe_sub_path) = maybe(sub_path)(input)?;
      Ok((
        input,
        PackageSpecifier {
          name,
          sub_path: maybe_sub_path.filter(|p| !p.is_empty()),
        },
      ))
    }

    with_failure_handling(parse_specifier)(text).map_err(|err| {
      PackageSpecifierParseError {
        message: format!("{err:#}"),
        text: text.to_string(),
      }
    })
  }
}

#[derive(Debug, Default, Deserialize)]
struct PackageJson {
  module: Option<String>,
  main: Option<String>,
}

/// Resolves bare specifiers by looking for the package in the
/// `node_modules` folders of the referrer's ancestor directories.
#[derive(Clone, Default)]
pub struct NodeModulesPackageResolver<TSys: FsMetadata + FsRead> {
  sys: TSys,
}

impl<TSys: FsMetadata + FsRead> std::fmt::Debug
  for NodeModulesPackageResolver<TSys>
{
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("NodeModulesPackageResolver").finish_non_exhaustive()
  }
}

impl<TSys: FsMetadata + FsRead> NodeModulesPackageResolver<TSys> {
  pub fn new(sys: TSys) -> Self {
    Self { sys }
  }

  fn find_package_dir(
    &self,
    name: &str,
    referrer_dir: &Path,
  ) -> Option<PathBuf> {
    referrer_dir.ancestors().find_map(|dir| {
      if dir.file_name().map(|n| n == "node_modules").unwrap_or(false) {
        return None;
      }
      let package_dir = dir.join("node_modules").join(name);
      self.sys.fs_is_dir_no_err(&package_dir).then_some(package_dir)
    })
  }

  fn read_package_json(&self, dir: &Path) -> Option<PackageJson> {
    let path = dir.join("package.json");
    let text = self.sys.fs_read_to_string(&path).ok()?;
    match serde_json::from_str(&text) {
      Ok(package_json) => Some(package_json),
      Err(err) => {
        log::debug!("Failed parsing '{}': {:#}", path.display(), err);
        None
      }
    }
  }

  fn resolve_file(&self, path: &Path) -> Option<PathBuf> {
    if self.sys.fs_is_file_no_err(path) {
      return Some(path.to_path_buf());
    }
    PACKAGE_FILE_EXTENSIONS
      .iter()
      .map(|ext| path_with_suffix(path, ext))
      .find(|path| self.sys.fs_is_file_no_err(path))
  }

  fn resolve_dir(&self, dir: &Path) -> Option<PathBuf> {
    if !self.sys.fs_is_dir_no_err(dir) {
      return None;
    }
    let maybe_main = self.read_package_json(dir).and_then(|package_json| {
      let entry = package_json.module.or(package_json.main)?;
      let path = dir.join(entry.trim_start_matches("./"));
      self
        .resolve_file(&path)
        .or_else(|| self.resolve_index(&path))
    });
    maybe_main.or_else(|| self.resolve_index(dir))
  }

  fn resolve_index(&self, dir: &Path) -> Option<PathBuf> {
    PACKAGE_FILE_EXTENSIONS
      .iter()
      .map(|ext| dir.join(format!("index{}", ext)))
      .find(|path| self.sys.fs_is_file_no_err(path))
  }
}

impl<TSys: FsMetadata + FsRead> PackageResolver
  for NodeModulesPackageResolver<TSys>
{
  fn resolve_package_entry(
    &self,
    specifier: &str,
    referrer_dir: &Path,
  ) -> Option<PackageEntry> {
    let package_specifier = match PackageSpecifier::parse(specifier) {
      Ok(package_specifier) => package_specifier,
      Err(err) => {
        log::debug!("{:#}", err);
        return None;
      }
    };
    let package_dir =
      self.find_package_dir(package_specifier.name, referrer_dir)?;
    let path = match package_specifier.sub_path {
      Some(sub_path) => {
        let target = package_dir.join(sub_path);
        self
          .resolve_file(&target)
          .or_else(|| self.resolve_dir(&target))?
      }
      None => self.resolve_dir(&package_dir)?,
    };
    Some(PackageEntry {
      path,
      has_sub_path: package_specifier.sub_path.is_some(),
    })
  }
}
