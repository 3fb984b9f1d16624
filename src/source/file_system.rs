// Copyright 2018-2024 the Deno authors. MIT license.

use std::ffi::OsString;
use std::path::Path;
use std::path::PathBuf;

use sys_traits::FsMetadata;

/// The file system queries needed to fully specify a module.
///
/// Errors (permissions, races) are treated as the path not existing.
pub trait FileSystem {
  fn exists(&self, path: &Path) -> bool;
  fn is_dir(&self, path: &Path) -> bool;
}

impl<TSys: FsMetadata> FileSystem for TSys {
  fn exists(&self, path: &Path) -> bool {
    self.fs_exists_no_err(path)
  }

  fn is_dir(&self, path: &Path) -> bool {
    self.fs_is_dir_no_err(path)
  }
}

/// A file system where nothing exists.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullFileSystem;

impl FileSystem for NullFileSystem {
  fn exists(&self, _path: &Path) -> bool {
    false
  }

  fn is_dir(&self, _path: &Path) -> bool {
    false
  }
}

/// Appends text to the final component of a path without treating it as a
/// new component (ex. `/a/foo` + `.js` -> `/a/foo.js`).
pub fn path_with_suffix(path: &Path, suffix: &str) -> PathBuf {
  let mut text = OsString::from(path.as_os_str());
  text.push(suffix);
  PathBuf::from(text)
}
