// Copyright 2018-2024 the Deno authors. MIT license.

// remove this after https://github.com/rustwasm/wasm-bindgen/issues/2774 is released
#![allow(clippy::unused_unit)]

use std::path::Path;
use std::path::PathBuf;

use fully_specified::fully_specify_module;
use fully_specified::source::FileSystem;
use fully_specified::source::PackageEntry;
use fully_specified::source::PackageResolver;
use fully_specified::FullySpecifiedOptions;
use fully_specified::FullySpecifyModuleOptions;
use fully_specified::ModuleSpecifier;
use serde::Deserialize;
use serde::Serialize;
use wasm_bindgen::prelude::*;

/// A file system backed by JavaScript callbacks that each take a path and
/// return a boolean.
pub struct JsFileSystem {
  exists: js_sys::Function,
  is_dir: js_sys::Function,
}

impl JsFileSystem {
  pub fn new(exists: js_sys::Function, is_dir: js_sys::Function) -> Self {
    Self { exists, is_dir }
  }

  fn call(func: &js_sys::Function, path: &Path) -> bool {
    let this = JsValue::null();
    let arg0 = JsValue::from(path.to_string_lossy().to_string());
    // a throwing callback means the path doesn't exist
    func
      .call1(&this, &arg0)
      .ok()
      .and_then(|value| value.as_bool())
      .unwrap_or(false)
  }
}

impl FileSystem for JsFileSystem {
  fn exists(&self, path: &Path) -> bool {
    Self::call(&self.exists, path)
  }

  fn is_dir(&self, path: &Path) -> bool {
    Self::call(&self.is_dir, path)
  }
}

#[derive(Debug, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
struct JsPackageEntry {
  path: PathBuf,
  has_sub_path: bool,
}

#[derive(Debug)]
pub struct JsPackageResolver {
  resolve: js_sys::Function,
}

impl JsPackageResolver {
  pub fn new(resolve: js_sys::Function) -> Self {
    Self { resolve }
  }
}

impl PackageResolver for JsPackageResolver {
  fn resolve_package_entry(
    &self,
    specifier: &str,
    referrer_dir: &Path,
  ) -> Option<PackageEntry> {
    let this = JsValue::null();
    let arg1 = JsValue::from(specifier);
    let arg2 = JsValue::from(referrer_dir.to_string_lossy().to_string());
    let value = self.resolve.call2(&this, &arg1, &arg2).ok()?;
    let entry: Option<JsPackageEntry> =
      serde_wasm_bindgen::from_value(value).ok()?;
    entry.map(|entry| PackageEntry {
      path: entry.path,
      has_sub_path: entry.has_sub_path,
    })
  }
}

#[wasm_bindgen(js_name = fullySpecify)]
pub fn js_fully_specify(
  specifier: String,
  source: String,
  maybe_options: JsValue,
  exists: js_sys::Function,
  is_dir: js_sys::Function,
  maybe_resolve_package: Option<js_sys::Function>,
) -> Result<JsValue, JsValue> {
  console_error_panic_hook::set_once();
  let specifier = ModuleSpecifier::parse(&specifier)
    .map_err(|err| js_sys::Error::new(&err.to_string()))?;
  let maybe_options: Option<FullySpecifiedOptions> =
    serde_wasm_bindgen::from_value(maybe_options)
      .map_err(|err| js_sys::Error::new(&err.to_string()))?;
  let options = maybe_options.unwrap_or_default();
  let file_system = JsFileSystem::new(exists, is_dir);
  let maybe_package_resolver =
    maybe_resolve_package.map(JsPackageResolver::new);
  let module = fully_specify_module(FullySpecifyModuleOptions {
    specifier: &specifier,
    source: source.into(),
    maybe_media_type: None,
    options: &options,
    file_system: &file_system,
    maybe_package_resolver: maybe_package_resolver
      .as_ref()
      .map(|r| r as &dyn PackageResolver),
  })
  .map_err(|err| js_sys::Error::new(&err.to_string()))?;
  let serializer =
    serde_wasm_bindgen::Serializer::new().serialize_maps_as_objects(true);
  module
    .serialize(&serializer)
    .map_err(|err| js_sys::Error::new(&err.to_string()).into())
}
