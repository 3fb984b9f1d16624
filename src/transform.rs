// Copyright 2018-2024 the Deno authors. MIT license.

use std::sync::Arc;

use deno_ast::swc::ast::ModuleDecl;
use deno_ast::swc::ast::Str;
use deno_ast::swc::ecma_visit::Visit;
use deno_ast::swc::ecma_visit::VisitWith;
use deno_ast::MediaType;
use deno_ast::ParseDiagnostic;
use deno_ast::ParseParams;
use deno_ast::ParsedSource;
use deno_ast::ProgramRef;
use deno_ast::SourceRangedForSpanned;
use deno_ast::TextChange;
use serde::Serialize;
use thiserror::Error;

use crate::declaration::Declaration;
use crate::module_specifier::ModuleSpecifier;
use crate::options::FullySpecifiedOptions;
use crate::rewriter::FullySpecifier;
use crate::rewriter::SpecifierRewrite;
use crate::source::FileSystem;
use crate::source::PackageResolver;

#[derive(Debug, Error, deno_error::JsError)]
pub enum FullySpecifyError {
  #[class(syntax)]
  #[error(transparent)]
  Parse(#[from] Box<ParseDiagnostic>),
}

pub struct FullySpecifyModuleOptions<'a> {
  pub specifier: &'a ModuleSpecifier,
  pub source: Arc<str>,
  /// Media type to parse the source as. Defaults to the one of the
  /// specifier.
  pub maybe_media_type: Option<MediaType>,
  pub options: &'a FullySpecifiedOptions,
  pub file_system: &'a dyn FileSystem,
  pub maybe_package_resolver: Option<&'a dyn PackageResolver>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FullySpecifiedModule {
  pub text: String,
  pub rewrites: Vec<SpecifierRewrite>,
}

/// Makes the specifiers in the module's source text fully specified.
///
/// Only the text of the rewritten specifiers changes. When nothing is
/// rewritten the returned text is the source as-is.
pub fn fully_specify_module(
  options: FullySpecifyModuleOptions,
) -> Result<FullySpecifiedModule, FullySpecifyError> {
  let media_type = match options
    .maybe_media_type
    .unwrap_or_else(|| MediaType::from_specifier(options.specifier))
  {
    MediaType::Unknown => MediaType::JavaScript,
    // commonjs media types parse as scripts, which rejects the declarations
    // that get rewritten
    MediaType::Cjs => MediaType::Mjs,
    MediaType::Cts => MediaType::Mts,
    MediaType::Dcts => MediaType::Dmts,
    media_type => media_type,
  };
  let parsed_source = deno_ast::parse_program(ParseParams {
    specifier: options.specifier.clone(),
    text: options.source,
    media_type,
    capture_tokens: false,
    scope_analysis: false,
    maybe_syntax: None,
  })
  .map_err(Box::new)?;

  let mut collector = TextChangeCollector {
    parsed_source: &parsed_source,
    fully_specifier: FullySpecifier::new(
      options.specifier,
      options.options,
      options.file_system,
      options.maybe_package_resolver,
    ),
    text_changes: Vec::new(),
  };
  match parsed_source.program_ref() {
    ProgramRef::Module(module) => module.visit_with(&mut collector),
    // may still have `declare module` blocks with declarations
    ProgramRef::Script(script) => script.visit_with(&mut collector),
  }

  let text = if collector.text_changes.is_empty() {
    parsed_source.text().to_string()
  } else {
    deno_ast::apply_text_changes(parsed_source.text(), collector.text_changes)
  };
  Ok(FullySpecifiedModule {
    text,
    rewrites: collector.fully_specifier.into_rewrites(),
  })
}

struct TextChangeCollector<'a> {
  parsed_source: &'a ParsedSource,
  fully_specifier: FullySpecifier<'a>,
  text_changes: Vec<TextChange>,
}

impl TextChangeCollector<'_> {
  fn replace_str(&mut self, src: &Str, value: &str) {
    let range = src
      .range()
      .as_byte_range(self.parsed_source.text_info_lazy().range().start);
    let text = &self.parsed_source.text()[range.clone()];
    let quote = text.chars().next().filter(|c| *c == '"' || *c == '\'');
    match quote {
      Some(quote)
        if text.len() >= 2
          && !value.contains([quote, '\\', '\n', '\r']) =>
      {
        // keep the quotes and only replace what's between them
        self.text_changes.push(TextChange::new(
          range.start + 1,
          range.end - 1,
          value.to_string(),
        ));
      }
      _ => {
        let new_text = match serde_json::to_string(value) {
          Ok(new_text) => new_text,
          Err(err) => {
            log::debug!("Failed serializing '{}': {:#}", value, err);
            return;
          }
        };
        self
          .text_changes
          .push(TextChange::new(range.start, range.end, new_text));
      }
    }
  }
}

impl Visit for TextChangeCollector<'_> {
  fn visit_module_decl(&mut self, node: &ModuleDecl) {
    let Some(declaration) = Declaration::from_module_decl(node) else {
      node.visit_children_with(self);
      return;
    };
    let Some(target) = self.fully_specifier.rewrite(&declaration) else {
      return;
    };
    if let Some(src) = declaration.source() {
      self.replace_str(src, &target.specifier);
    }
  }
}

#[cfg(test)]
mod test {
  use pretty_assertions::assert_eq;
  use sys_traits::impls::InMemorySys;
  use sys_traits::FsCreateDirAll;
  use sys_traits::FsWrite;

  use super::*;
  use crate::declaration::DeclarationKind;
  use crate::options::IncludePackages;
  use crate::source::MemoryPackageResolver;
  use crate::source::NullFileSystem;

  fn sys_with_files(files: &[&str]) -> InMemorySys {
    let sys = InMemorySys::default();
    for file in files {
      let parent = std::path::Path::new(file).parent().unwrap();
      sys.fs_create_dir_all(parent).unwrap();
      sys.fs_write(file, "").unwrap();
    }
    sys
  }

  fn transform(
    referrer: &str,
    source: &str,
    options: &FullySpecifiedOptions,
    file_system: &dyn FileSystem,
    maybe_package_resolver: Option<&dyn PackageResolver>,
  ) -> FullySpecifiedModule {
    let specifier = ModuleSpecifier::parse(referrer).unwrap();
    fully_specify_module(FullySpecifyModuleOptions {
      specifier: &specifier,
      source: source.into(),
      maybe_media_type: None,
      options,
      file_system,
      maybe_package_resolver,
    })
    .unwrap()
  }

  #[test]
  fn existing_sibling_file() {
    let sys = sys_with_files(&["/project/a.js", "/project/foo.js"]);
    let result = transform(
      "file:///project/a.js",
      "import foo from './foo';\n",
      &Default::default(),
      &sys,
      None,
    );
    assert_eq!(result.text, "import foo from './foo.js';\n");
    assert_eq!(
      result.rewrites,
      vec![SpecifierRewrite {
        kind: DeclarationKind::Import,
        from: "./foo".to_string(),
        to: "./foo.js".to_string(),
      }]
    );
  }

  #[test]
  fn probes_when_ensuring_file_exists() {
    let sys = sys_with_files(&["/project/a.mjs", "/project/foo.cjs"]);
    let options = FullySpecifiedOptions {
      ensure_file_exists: true,
      ..Default::default()
    };
    let result = transform(
      "file:///project/a.mjs",
      "export * from \"./foo\";\nexport * from \"./missing\";\n",
      &options,
      &sys,
      None,
    );
    assert_eq!(
      result.text,
      "export * from \"./foo.cjs\";\nexport * from \"./missing\";\n"
    );
  }

  #[test]
  fn leaves_other_extensions() {
    let sys = sys_with_files(&["/project/styles.min.css"]);
    let source = "import './styles.min.css';\nimport data from './data.json' with { type: 'json' };\n";
    let result =
      transform("file:///project/a.js", source, &Default::default(), &sys, None);
    assert_eq!(result.text, source);
    assert!(result.rewrites.is_empty());
  }

  #[test]
  fn commonjs_extensions() {
    let sys = sys_with_files(&["/project/foo.cjs", "/project/bar.cts"]);
    let result = transform(
      "file:///project/a.cjs",
      "import foo from './foo';\nexport * from './bar';\n",
      &Default::default(),
      &sys,
      None,
    );
    assert_eq!(
      result.text,
      "import foo from './foo.cjs';\nexport * from './bar.cjs';\n"
    );
    let result = transform(
      "file:///project/a.cts",
      "export { bar } from './bar';\n",
      &Default::default(),
      &sys,
      None,
    );
    assert_eq!(result.text, "export { bar } from './bar.js';\n");
  }

  #[test]
  fn directory_index() {
    let sys = sys_with_files(&["/project/widgets/index.js"]);
    let result = transform(
      "file:///project/a.js",
      "export { Widget } from './widgets';\n",
      &Default::default(),
      &sys,
      None,
    );
    assert_eq!(result.text, "export { Widget } from './widgets/index.js';\n");
  }

  #[test]
  fn package_sub_path() {
    let resolver = MemoryPackageResolver::new(vec![(
      "@scope/pkg/subdir",
      "/project/node_modules/@scope/pkg/subdir/index.js",
    )]);
    let options = FullySpecifiedOptions {
      include_packages: IncludePackages::Only(vec!["@scope".to_string()]),
      ..Default::default()
    };
    let result = transform(
      "file:///project/a.js",
      "import { x } from '@scope/pkg/subdir';\nimport '@other/pkg/subdir';\n",
      &options,
      &NullFileSystem,
      Some(&resolver),
    );
    assert_eq!(
      result.text,
      "import { x } from '@scope/pkg/subdir.js';\nimport '@other/pkg/subdir';\n"
    );
  }

  #[test]
  fn dynamic_imports_untouched() {
    let sys = sys_with_files(&["/project/foo.js"]);
    let source = "const foo = await import('./foo');\nrequire('./foo');\n";
    let result =
      transform("file:///project/a.js", source, &Default::default(), &sys, None);
    assert_eq!(result.text, source);
  }

  #[test]
  fn type_only_untouched() {
    let sys = sys_with_files(&["/project/foo.ts"]);
    let source = concat!(
      "import type { Foo } from './foo';\n",
      "export type { Bar } from './foo';\n",
      "import { type Baz, qux } from './foo';\n",
    );
    let result =
      transform("file:///project/a.ts", source, &Default::default(), &sys, None);
    assert_eq!(
      result.text,
      concat!(
        "import type { Foo } from './foo';\n",
        "export type { Bar } from './foo';\n",
        "import { type Baz, qux } from './foo.js';\n",
      )
    );
  }

  #[test]
  fn preserves_formatting() {
    let source = concat!(
      "// leading comment\n",
      "import {\n  a,\n  b, // trailing\n} from \"./a\" /* after */;\n",
      "export{c}from'./c'\n",
    );
    let result = transform(
      "file:///project/a.js",
      source,
      &Default::default(),
      &NullFileSystem,
      None,
    );
    assert_eq!(
      result.text,
      concat!(
        "// leading comment\n",
        "import {\n  a,\n  b, // trailing\n} from \"./a.js\" /* after */;\n",
        "export{c}from'./c.js'\n",
      )
    );
  }

  #[test]
  fn escapes_quotes_in_new_specifier() {
    let sys = sys_with_files(&["/project/it's/index.js"]);
    let result = transform(
      "file:///project/a.js",
      "import \"./it's\";\nimport './it\\'s';\n",
      &Default::default(),
      &sys,
      None,
    );
    assert_eq!(
      result.text,
      "import \"./it's/index.js\";\nimport \"./it's/index.js\";\n"
    );
  }

  #[test]
  fn running_twice_is_idempotent() {
    let sys = sys_with_files(&["/project/foo.js", "/project/widgets/index.js"]);
    let options = FullySpecifiedOptions::default();
    let source = "import './foo';\nexport * as w from './widgets';\n";
    let once = transform("file:///project/a.js", source, &options, &sys, None);
    let twice =
      transform("file:///project/a.js", &once.text, &options, &sys, None);
    assert_eq!(twice.text, once.text);
    assert!(twice.rewrites.is_empty());
  }

  #[test]
  fn declare_module_bodies() {
    let source =
      "declare module \"mod\" {\n  export * from \"./inner\";\n}\n";
    let result = transform(
      "file:///project/a.d.ts",
      source,
      &Default::default(),
      &NullFileSystem,
      None,
    );
    assert_eq!(
      result.text,
      "declare module \"mod\" {\n  export * from \"./inner.js\";\n}\n"
    );
  }

  #[test]
  fn parse_error() {
    let specifier = ModuleSpecifier::parse("file:///project/a.js").unwrap();
    let err = fully_specify_module(FullySpecifyModuleOptions {
      specifier: &specifier,
      source: "import { from './a';".into(),
      maybe_media_type: None,
      options: &Default::default(),
      file_system: &NullFileSystem,
      maybe_package_resolver: None,
    })
    .unwrap_err();
    assert!(matches!(err, FullySpecifyError::Parse(_)));
  }
}
