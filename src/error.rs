use crate::loc::Name;

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(thiserror::Error, Debug, miette::Diagnostic)]
pub enum Error {
  #[error(transparent)]
  #[diagnostic(transparent)]
  Syntax(#[from] crate::parser::SyntaxError),

  #[error(transparent)]
  #[diagnostic(transparent)]
  Type(#[from] TypeError),

  #[error(transparent)]
  #[diagnostic(transparent)]
  Reference(#[from] ReferenceError),
}

#[derive(thiserror::Error, Debug, miette::Diagnostic)]
#[error("{message}")]
#[diagnostic(code(Eval::type_error))]
pub struct TypeError {
  pub message: String,
}

impl TypeError {
  pub fn new(message: impl Into<String>) -> Self {
    Self {
      message: message.into(),
    }
  }
}

#[derive(thiserror::Error, Debug, miette::Diagnostic)]
#[error("'{name}' is not defined")]
#[diagnostic(code(Eval::reference_error), help("parameters are inferred only for lowercase names"))]
pub struct ReferenceError {
  pub name: Name,
}

pub fn type_error<T>(message: impl Into<String>) -> Result<T> {
  Err(TypeError::new(message))?
}
