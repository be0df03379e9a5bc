use crate::error::SyntaxError;
use crate::rewrite::RewriteError;
use thiserror::Error;

#[derive(Clone, Debug, Error)]
pub enum TransformError {
  #[error("syntax error: {0}")]
  Syntax(#[from] SyntaxError),
  #[error(transparent)]
  Rewrite(#[from] RewriteError),
}
