// Copyright 2018-2024 the Deno authors. MIT license.

use deno_ast::swc::ast::ExportAll;
use deno_ast::swc::ast::ImportDecl;
use deno_ast::swc::ast::ModuleDecl;
use deno_ast::swc::ast::NamedExport;
use deno_ast::swc::ast::Str;
use serde::Deserialize;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum DeclarationKind {
  /// `import ... from "./a"` or `import "./a"`
  Import,
  /// `export { a } from "./a"`
  ExportNamed,
  /// `export * from "./a"` or `export * as a from "./a"`
  ExportAll,
}

/// A module declaration that may reference another module.
#[derive(Debug, Clone, Copy)]
pub enum Declaration<'a> {
  Import(&'a ImportDecl),
  ExportNamed(&'a NamedExport),
  ExportAll(&'a ExportAll),
}

impl<'a> Declaration<'a> {
  pub fn from_module_decl(decl: &'a ModuleDecl) -> Option<Self> {
    match decl {
      ModuleDecl::Import(n) => Some(Declaration::Import(n)),
      ModuleDecl::ExportNamed(n) => Some(Declaration::ExportNamed(n)),
      ModuleDecl::ExportAll(n) => Some(Declaration::ExportAll(n)),
      ModuleDecl::ExportDecl(_)
      | ModuleDecl::ExportDefaultDecl(_)
      | ModuleDecl::ExportDefaultExpr(_)
      | ModuleDecl::TsImportEquals(_)
      | ModuleDecl::TsExportAssignment(_)
      | ModuleDecl::TsNamespaceExport(_) => None,
    }
  }

  pub fn kind(&self) -> DeclarationKind {
    match self {
      Declaration::Import(_) => DeclarationKind::Import,
      Declaration::ExportNamed(_) => DeclarationKind::ExportNamed,
      Declaration::ExportAll(_) => DeclarationKind::ExportAll,
    }
  }

  /// The string literal holding the specifier. A named export without a
  /// `from` clause has none.
  pub fn source(&self) -> Option<&'a Str> {
    match *self {
      Declaration::Import(n) => Some(&n.src),
      Declaration::ExportNamed(n) => n.src.as_deref(),
      Declaration::ExportAll(n) => Some(&n.src),
    }
  }

  pub fn specifier(&self) -> Option<&'a str> {
    self.source().map(|src| &*src.value)
  }

  /// If the declaration only affects types (ex. `import type { A } from "./a"`).
  pub fn is_type_only(&self) -> bool {
    match *self {
      Declaration::Import(n) => n.type_only,
      Declaration::ExportNamed(n) => n.type_only,
      Declaration::ExportAll(n) => n.type_only,
    }
  }

  /// Creates the same declaration with a new specifier. Everything else
  /// about the declaration is kept.
  pub fn reconstruct(&self, specifier: &str) -> ModuleDecl {
    match *self {
      Declaration::Import(n) => ModuleDecl::Import(ImportDecl {
        src: with_value(&n.src, specifier),
        ..n.clone()
      }),
      Declaration::ExportNamed(n) => ModuleDecl::ExportNamed(NamedExport {
        src: n.src.as_deref().map(|src| with_value(src, specifier)),
        ..n.clone()
      }),
      Declaration::ExportAll(n) => ModuleDecl::ExportAll(ExportAll {
        src: with_value(&n.src, specifier),
        ..n.clone()
      }),
    }
  }
}

fn with_value(src: &Str, value: &str) -> Box<Str> {
  Box::new(Str {
    span: src.span,
    value: value.into(),
    raw: None,
  })
}
