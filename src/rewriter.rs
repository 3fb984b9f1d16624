// Copyright 2018-2024 the Deno authors. MIT license.

use deno_ast::swc::ast::ModuleDecl;
use deno_ast::swc::ast::Program;
use deno_ast::swc::ecma_visit::VisitMut;
use deno_ast::swc::ecma_visit::VisitMutWith;
use serde::Deserialize;
use serde::Serialize;

use crate::declaration::Declaration;
use crate::declaration::DeclarationKind;
use crate::module_specifier::ModuleSpecifier;
use crate::options::FullySpecifiedOptions;
use crate::resolver::resolve_target;
use crate::resolver::ResolutionContext;
use crate::resolver::TargetModule;
use crate::source::FileSystem;
use crate::source::PackageResolver;
use crate::specifier::classify;

/// A specifier that was made fully specified.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpecifierRewrite {
  pub kind: DeclarationKind,
  pub from: String,
  pub to: String,
}

/// Makes the specifiers of the declarations in a single module fully
/// specified.
///
/// Every declaration is handled on its own. The only state kept across
/// declarations is the list of rewrites that were done.
pub struct FullySpecifier<'a> {
  ctx: ResolutionContext,
  options: &'a FullySpecifiedOptions,
  file_system: &'a dyn FileSystem,
  maybe_package_resolver: Option<&'a dyn PackageResolver>,
  rewrites: Vec<SpecifierRewrite>,
}

impl<'a> FullySpecifier<'a> {
  pub fn new(
    referrer: &ModuleSpecifier,
    options: &'a FullySpecifiedOptions,
    file_system: &'a dyn FileSystem,
    maybe_package_resolver: Option<&'a dyn PackageResolver>,
  ) -> Self {
    Self {
      ctx: ResolutionContext::new(referrer),
      options,
      file_system,
      maybe_package_resolver,
      rewrites: Vec::new(),
    }
  }

  /// Decides the new specifier for the declaration without recording it.
  pub fn evaluate(&self, declaration: &Declaration) -> Option<TargetModule> {
    let specifier = declaration.specifier()?;
    let Some(kind) = classify(
      declaration,
      &self.ctx,
      self.options,
      self.maybe_package_resolver,
    ) else {
      log::debug!(
        "Skipping '{}' in {}: not eligible.",
        specifier,
        self.ctx.referrer()
      );
      return None;
    };
    let maybe_target = resolve_target(
      specifier,
      &kind,
      &self.ctx,
      self.options,
      self.file_system,
    );
    if maybe_target.is_none() {
      log::debug!(
        "Leaving '{}' in {} as-is.",
        specifier,
        self.ctx.referrer()
      );
    }
    maybe_target
  }

  /// Decides the new specifier for the declaration and records the rewrite.
  pub fn rewrite(&mut self, declaration: &Declaration) -> Option<TargetModule> {
    let target = self.evaluate(declaration)?;
    let from = declaration.specifier()?.to_string();
    log::debug!(
      "Rewriting '{}' to '{}' in {}.",
      from,
      target.specifier,
      self.ctx.referrer()
    );
    self.rewrites.push(SpecifierRewrite {
      kind: declaration.kind(),
      from,
      to: target.specifier.clone(),
    });
    Some(target)
  }

  pub fn rewrites(&self) -> &[SpecifierRewrite] {
    &self.rewrites
  }

  pub fn into_rewrites(self) -> Vec<SpecifierRewrite> {
    self.rewrites
  }
}

impl VisitMut for FullySpecifier<'_> {
  fn visit_mut_module_decl(&mut self, node: &mut ModuleDecl) {
    let maybe_reconstructed = match Declaration::from_module_decl(node) {
      Some(declaration) => self
        .rewrite(&declaration)
        .map(|target| declaration.reconstruct(&target.specifier)),
      None => None,
    };
    match maybe_reconstructed {
      Some(reconstructed) => *node = reconstructed,
      // ex. `export declare namespace` may contain more declarations
      None => node.visit_mut_children_with(self),
    }
  }
}

pub struct FullySpecifyProgramOptions<'a> {
  pub specifier: &'a ModuleSpecifier,
  pub options: &'a FullySpecifiedOptions,
  pub file_system: &'a dyn FileSystem,
  pub maybe_package_resolver: Option<&'a dyn PackageResolver>,
}

/// Rewrites the specifiers of the program's import and export declarations
/// in place, returning what was rewritten.
pub fn fully_specify_program(
  program: &mut Program,
  options: FullySpecifyProgramOptions,
) -> Vec<SpecifierRewrite> {
  let mut fully_specifier = FullySpecifier::new(
    options.specifier,
    options.options,
    options.file_system,
    options.maybe_package_resolver,
  );
  program.visit_mut_with(&mut fully_specifier);
  fully_specifier.into_rewrites()
}
