// Copyright 2018-2024 the Deno authors. MIT license.

#![deny(clippy::print_stderr)]
#![deny(clippy::print_stdout)]

//! Rewrites the specifiers of import and export declarations to be fully
//! specified (ex. `./foo` to `./foo.js` and `./widgets` to
//! `./widgets/index.js`) so that strict ES module loaders can load them.

mod declaration;
mod module_specifier;
mod options;
pub mod packages;
mod resolver;
mod rewriter;
pub mod source;
mod specifier;
mod transform;

pub use declaration::Declaration;
pub use declaration::DeclarationKind;
pub use deno_ast::MediaType;
pub use module_specifier::extname;
pub use module_specifier::is_local_specifier;
pub use module_specifier::ModuleSpecifier;
pub use options::FullySpecifiedOptions;
pub use options::IncludePackages;
pub use resolver::probe_extensions;
pub use resolver::resolve_target;
pub use resolver::ResolutionContext;
pub use resolver::TargetModule;
pub use rewriter::fully_specify_program;
pub use rewriter::FullySpecifier;
pub use rewriter::FullySpecifyProgramOptions;
pub use rewriter::SpecifierRewrite;
pub use specifier::classify;
pub use specifier::SpecifierKind;
pub use transform::fully_specify_module;
pub use transform::FullySpecifiedModule;
pub use transform::FullySpecifyError;
pub use transform::FullySpecifyModuleOptions;
