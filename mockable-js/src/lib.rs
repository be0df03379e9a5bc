use ast::node::Node;
use ast::stx::TopLevel;
use config::RewriteOptions;
use emit::emit_js_string;
pub use err::TransformError;
use error::SyntaxResult;
use lex::Lexer;
use parse::Parser;
use rewrite::rewrite_module;
use rewrite::RewriteOutcome;
use std::path::Path;
use symbol::compute_symbols;
use symbol::AssocResolver;

pub mod ast;
pub mod char;
pub mod config;
pub mod emit;
mod err;
pub mod error;
pub mod lex;
pub mod loc;
pub mod num;
pub mod operator;
pub mod parse;
pub mod registry;
pub mod rewrite;
pub mod symbol;
pub mod token;

pub fn parse(source: &str) -> SyntaxResult<Node<TopLevel>> {
  let lexer = Lexer::new(source);
  let mut parser = Parser::new(lexer);
  parser.parse_top_level()
}

#[derive(Clone, Debug)]
pub struct Transformed {
  pub code: String,
  pub outcome: RewriteOutcome,
}

/// Makes the imports of a JavaScript module mockable.
///
/// # Arguments
///
/// * `source` - The module's source code.
/// * `file` - Where the module lives, used to skip modules in excluded directories.
/// * `options` - Which directories and import sources to leave alone.
///
/// The returned code is `source` itself unless the module was rewritten.
///
/// # Examples
///
/// ```
/// use mockable_js::config::RewriteOptions;
/// use mockable_js::transform;
///
/// let out = transform("import {a} from 'a'; a();", None, &RewriteOptions::default()).unwrap();
/// assert!(out.code.contains("$imports.a();"));
/// assert_eq!(out.outcome.bindings()[0].alias, "a");
/// ```
pub fn transform(
  source: &str,
  file: Option<&Path>,
  options: &RewriteOptions,
) -> Result<Transformed, TransformError> {
  let mut top = parse(source)?;
  compute_symbols(&mut top);
  let outcome = rewrite_module(&mut top, &AssocResolver, file, options)?;
  let code = match outcome {
    RewriteOutcome::Rewritten(_) => emit_js_string(&top),
    _ => source.to_string(),
  };
  Ok(Transformed { code, outcome })
}
