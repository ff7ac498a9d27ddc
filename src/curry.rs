use std::rc::Rc;

use crate::{
  callable::AsCallable,
  error::Result,
  value::{Function, Value},
};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Side {
  Left,
  Right,
}

#[derive(Clone)]
struct Curried {
  function: Function,
  arguments: Rc<[Value]>,
  side: Side,
  arity: Option<usize>,
}

impl Curried {
  fn into_function(self) -> Function {
    let remaining = self
      .arity
      .unwrap_or(self.function.arity())
      .saturating_sub(self.arguments.len());
    Function::with_receiver(remaining, move |this, arguments| self.apply(this, arguments))
  }

  fn apply(&self, this: &Value, later: &[Value]) -> Result<Value> {
    let combined = match self.side {
      Side::Left => [&self.arguments[..], later].concat(),
      Side::Right => [later, &self.arguments[..]].concat(),
    };

    match self.arity {
      Some(arity) if combined.len() < arity => {
        tracing::trace!(have = combined.len(), arity, "deferring arity-gated curry");
        let curried = Curried {
          arguments: combined.into(),
          ..self.clone()
        };
        Ok(Value::Function(curried.into_function()))
      }
      _ => self.function.call_with(this, &combined),
    }
  }
}

impl Function {
  pub fn curry(&self, arguments: impl IntoIterator<Item = Value>) -> Function {
    self.curried(arguments, Side::Left, None)
  }

  pub fn rcurry(&self, arguments: impl IntoIterator<Item = Value>) -> Function {
    self.curried(arguments, Side::Right, None)
  }

  pub fn ncurry(&self, arity: usize, arguments: impl IntoIterator<Item = Value>) -> Function {
    self.curried(arguments, Side::Left, Some(arity))
  }

  pub fn rncurry(&self, arity: usize, arguments: impl IntoIterator<Item = Value>) -> Function {
    self.curried(arguments, Side::Right, Some(arity))
  }

  pub fn partial(&self, template: impl IntoIterator<Item = Arg>) -> Partial {
    Partial::new(self.clone(), template.into_iter().collect())
  }

  fn curried(
    &self,
    arguments: impl IntoIterator<Item = Value>,
    side: Side,
    arity: Option<usize>,
  ) -> Function {
    Curried {
      function: self.clone(),
      arguments: arguments.into_iter().collect(),
      side,
      arity,
    }
    .into_function()
  }
}

pub fn curry(function: impl AsCallable, arguments: impl IntoIterator<Item = Value>) -> Result<Function> {
  Ok(function.as_callable()?.curry(arguments))
}

pub fn rcurry(
  function: impl AsCallable,
  arguments: impl IntoIterator<Item = Value>,
) -> Result<Function> {
  Ok(function.as_callable()?.rcurry(arguments))
}

pub fn ncurry(
  arity: usize,
  function: impl AsCallable,
  arguments: impl IntoIterator<Item = Value>,
) -> Result<Function> {
  Ok(function.as_callable()?.ncurry(arity, arguments))
}

pub fn rncurry(
  arity: usize,
  function: impl AsCallable,
  arguments: impl IntoIterator<Item = Value>,
) -> Result<Function> {
  Ok(function.as_callable()?.rncurry(arity, arguments))
}

pub fn partial(function: impl AsCallable, template: impl IntoIterator<Item = Arg>) -> Result<Partial> {
  Ok(function.as_callable()?.partial(template))
}

#[derive(Clone, Debug, PartialEq)]
pub enum Arg {
  Hole,
  Value(Value),
}

pub const HOLE: Arg = Arg::Hole;

impl Arg {
  pub fn value(value: impl Into<Value>) -> Self {
    Arg::Value(value.into())
  }
}

impl From<Value> for Arg {
  fn from(value: Value) -> Self {
    Arg::Value(value)
  }
}

#[derive(Clone, Debug)]
pub struct Partial {
  function: Function,
  template: Rc<[Arg]>,
  holes: Rc<[usize]>,
}

#[derive(Clone, Debug, PartialEq)]
pub enum Applied {
  Partial(Partial),
  Value(Value),
}

impl PartialEq for Partial {
  fn eq(&self, other: &Self) -> bool {
    self.function == other.function && self.template == other.template
  }
}

impl Applied {
  pub fn into_value(self) -> Value {
    match self {
      Applied::Partial(partial) => Value::Function(partial.to_function()),
      Applied::Value(value) => value,
    }
  }
}

impl Partial {
  pub fn new(function: Function, template: Vec<Arg>) -> Self {
    let holes = template
      .iter()
      .enumerate()
      .filter(|(_, arg)| matches!(arg, Arg::Hole))
      .map(|(i, _)| i)
      .collect();
    Self {
      function,
      template: template.into(),
      holes,
    }
  }

  pub fn holes(&self) -> usize {
    self.holes.len()
  }

  pub fn template(&self) -> &[Arg] {
    &self.template
  }

  pub fn apply(&self, arguments: impl IntoIterator<Item = Arg>) -> Result<Applied> {
    self.apply_with(&Value::Undefined, arguments)
  }

  /// Fills holes left to right with `arguments`, appending any surplus. The
  /// callable runs only once no hole is left; otherwise a new partial over the
  /// combined arguments comes back.
  pub fn apply_with(
    &self,
    this: &Value,
    arguments: impl IntoIterator<Item = Arg>,
  ) -> Result<Applied> {
    let arguments = arguments.into_iter().collect::<Vec<_>>();
    let filled = self.holes.len().min(arguments.len());

    let mut specialized = self.template.to_vec();
    for (position, argument) in self.holes.iter().zip(&arguments[..filled]) {
      specialized[*position] = argument.clone();
    }
    specialized.extend_from_slice(&arguments[filled..]);

    let values = specialized
      .iter()
      .map(|arg| match arg {
        Arg::Value(value) => Some(value.clone()),
        Arg::Hole => None,
      })
      .collect::<Option<Vec<_>>>();

    match values {
      Some(values) => Ok(Applied::Value(self.function.call_with(this, &values)?)),
      None => {
        tracing::trace!(template = specialized.len(), "holes remain after partial application");
        Ok(Applied::Partial(Partial::new(self.function.clone(), specialized)))
      }
    }
  }

  pub fn call(&self, arguments: &[Value]) -> Result<Value> {
    let arguments = arguments.iter().cloned().map(Arg::Value);
    Ok(self.apply(arguments)?.into_value())
  }

  pub fn to_function(&self) -> Function {
    let partial = self.clone();
    Function::with_receiver(self.holes(), move |this, arguments| {
      let arguments = arguments.iter().cloned().map(Arg::Value);
      Ok(partial.apply_with(this, arguments)?.into_value())
    })
  }
}

impl AsCallable for Partial {
  fn as_callable(&self) -> Result<Function> {
    Ok(self.to_function())
  }
}
