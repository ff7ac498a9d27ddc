use crate::{
  error::{Result, TypeError},
  lambda::Compiler,
  loc::Text,
  value::{Function, Value},
};

/// Anything that can stand in for a function: text or a callable.
pub trait AsCallable {
  fn as_callable(&self) -> Result<Function>;
}

#[derive(Clone, Debug, PartialEq)]
pub enum Callable {
  Text(Text),
  Function(Function),
}

impl TryFrom<Value> for Callable {
  type Error = TypeError;

  fn try_from(value: Value) -> Result<Self, Self::Error> {
    match value {
      Value::String(text) => Ok(Callable::Text(text)),
      Value::Function(function) => Ok(Callable::Function(function)),
      other => Err(TypeError::new(format!(
        "expected text or a function, got {}",
        other.type_name()
      ))),
    }
  }
}

fn has_return(text: &str) -> bool {
  let word = |char: Option<char>| char.is_some_and(crate::lexer::is_identifier_part);
  text.match_indices("return").any(|(i, keyword)| {
    !word(text[..i].chars().next_back()) && !word(text[i + keyword.len()..].chars().next())
  })
}

impl Compiler {
  pub fn coerce(&self, text: &str) -> Result<Function> {
    if has_return(text) {
      tracing::trace!(text, "coercing explicit body");
      self.body(text)
    } else {
      tracing::trace!(text, "coercing text expression");
      self.compile(text)
    }
  }
}

impl AsCallable for Function {
  fn as_callable(&self) -> Result<Function> {
    Ok(self.clone())
  }
}

impl AsCallable for str {
  fn as_callable(&self) -> Result<Function> {
    Compiler::default().coerce(self)
  }
}

impl AsCallable for String {
  fn as_callable(&self) -> Result<Function> {
    self.as_str().as_callable()
  }
}

impl AsCallable for Text {
  fn as_callable(&self) -> Result<Function> {
    self.as_ref().as_callable()
  }
}

impl AsCallable for Callable {
  fn as_callable(&self) -> Result<Function> {
    match self {
      Callable::Text(text) => text.as_callable(),
      Callable::Function(function) => function.as_callable(),
    }
  }
}

/// Text and functions coerce; any other value is a [`TypeError`], never a constant function.
impl AsCallable for Value {
  fn as_callable(&self) -> Result<Function> {
    Callable::try_from(self.clone())?.as_callable()
  }
}

impl<T: AsCallable + ?Sized> AsCallable for &T {
  fn as_callable(&self) -> Result<Function> {
    (**self).as_callable()
  }
}
