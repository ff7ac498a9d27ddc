use crate::{
  callable::AsCallable,
  error::Result,
  value::{Function, Value},
};

pub fn identity() -> Function {
  Function::new(1, |arguments| Ok(arguments.first().cloned().unwrap_or_default()))
}

pub fn constant(value: Value) -> Function {
  Function::new(0, move |_| Ok(value.clone()))
}

fn coerce_all<C: AsCallable>(functions: impl IntoIterator<Item = C>) -> Result<Vec<Function>> {
  functions.into_iter().map(|f| f.as_callable()).collect()
}

/// Right-to-left composition: `compose([f, g])(x)` is `f(g(x))`. The innermost
/// callable receives every argument.
pub fn compose<C: AsCallable>(functions: impl IntoIterator<Item = C>) -> Result<Function> {
  let mut functions = coerce_all(functions)?;
  functions.reverse();
  Ok(pipeline(functions))
}

pub fn sequence<C: AsCallable>(functions: impl IntoIterator<Item = C>) -> Result<Function> {
  Ok(pipeline(coerce_all(functions)?))
}

fn pipeline(functions: Vec<Function>) -> Function {
  let arity = functions.first().map_or(1, Function::arity);
  Function::with_receiver(arity, move |this, arguments| {
    let mut arguments = arguments.to_vec();
    for function in functions.iter() {
      arguments = vec![function.call_with(this, &arguments)?];
    }
    Ok(arguments.into_iter().next().unwrap_or_default())
  })
}

pub fn flip(function: impl AsCallable) -> Result<Function> {
  let function = function.as_callable()?;
  Ok(Function::with_receiver(function.arity(), move |this, arguments| {
    let mut arguments = arguments.to_vec();
    if arguments.len() >= 2 {
      arguments.swap(0, 1);
    }
    function.call_with(this, &arguments)
  }))
}

pub fn guard(function: impl AsCallable, guard: impl AsCallable) -> Result<Function> {
  guard_else(function, guard, identity())
}

pub fn guard_else(
  function: impl AsCallable,
  guard: impl AsCallable,
  otherwise: impl AsCallable,
) -> Result<Function> {
  let function = function.as_callable()?;
  let guard = guard.as_callable()?;
  let otherwise = otherwise.as_callable()?;
  Ok(Function::with_receiver(function.arity(), move |this, arguments| {
    if guard.call_with(this, arguments)?.truthy() {
      function.call_with(this, arguments)
    } else {
      otherwise.call_with(this, arguments)
    }
  }))
}

pub fn returning(function: impl AsCallable, value: Value) -> Result<Function> {
  let function = function.as_callable()?;
  Ok(Function::with_receiver(function.arity(), move |this, arguments| {
    function.call_with(this, arguments)?;
    Ok(value.clone())
  }))
}

pub fn saturate(function: impl AsCallable, arguments: Vec<Value>) -> Result<Function> {
  let function = function.as_callable()?;
  Ok(Function::with_receiver(0, move |this, _| {
    function.call_with(this, &arguments)
  }))
}

pub fn aritize(function: impl AsCallable, arity: usize) -> Result<Function> {
  let function = function.as_callable()?;
  Ok(Function::with_receiver(arity, move |this, arguments| {
    function.call_with(this, &arguments[..arguments.len().min(arity)])
  }))
}

#[cfg(test)]
mod test {
  use std::{cell::RefCell, rc::Rc};

  use pretty_assertions::assert_eq;

  use super::{aritize, compose, constant, flip, guard, guard_else, identity, returning, saturate, sequence};
  use crate::{
    error::Error,
    value::{Function, Value},
  };

  #[test]
  fn compose_runs_right_to_left() {
    let f = compose(["_ + 1", "_ * 2"]).unwrap();
    assert_eq!(f.call(&[5.into()]).unwrap(), Value::from(11));
  }

  #[test]
  fn sequence_runs_left_to_right() {
    let f = sequence(["_ + 1", "_ * 2"]).unwrap();
    assert_eq!(f.call(&[5.into()]).unwrap(), Value::from(12));
  }

  #[test]
  fn innermost_receives_every_argument() {
    let f = compose(["-_", "a, b -> a - b"]).unwrap();
    assert_eq!(f.call(&[2.into(), 5.into()]).unwrap(), Value::from(3));
  }

  #[test]
  fn empty_composition_is_identity() {
    let f = compose(Vec::<&str>::new()).unwrap();
    assert_eq!(f.call(&["x".into()]).unwrap(), Value::from("x"));
  }

  #[test]
  fn composition_rejects_non_callables() {
    let result = compose([Value::from("_"), Value::from(3)]);
    assert!(matches!(result, Err(Error::Type(_))));
  }

  #[test]
  fn flip_swaps_first_two() {
    let f = flip("a, b, c -> [a, b, c]").unwrap();
    assert_eq!(
      f.call(&[1.into(), 2.into(), 3.into()]).unwrap(),
      Value::from(vec![Value::from(2), Value::from(1), Value::from(3)])
    );
  }

  #[test]
  fn guard_chooses_branch() {
    let halve = guard("_ / 2", "_ % 2 == 0").unwrap();
    assert_eq!(halve.call(&[8.into()]).unwrap(), Value::from(4));
    assert_eq!(halve.call(&[7.into()]).unwrap(), Value::from(7));

    let sign = guard_else("'positive'", "_ > 0", "'other'").unwrap();
    assert_eq!(sign.call(&[1.into()]).unwrap(), Value::from("positive"));
    assert_eq!(sign.call(&[(-1).into()]).unwrap(), Value::from("other"));
  }

  #[test]
  fn returning_discards_result() {
    let seen = Rc::new(RefCell::new(vec![]));
    let log = seen.clone();
    let record = Function::new(1, move |arguments| {
      log.borrow_mut().push(arguments[0].clone());
      Ok(Value::Null)
    });
    let f = returning(record, Value::from("done")).unwrap();
    assert_eq!(f.call(&[1.into()]).unwrap(), Value::from("done"));
    assert_eq!(*seen.borrow(), vec![Value::from(1)]);
  }

  #[test]
  fn saturate_ignores_call_arguments() {
    let f = saturate("a, b -> a + b", vec![1.into(), 2.into()]).unwrap();
    assert_eq!(f.call(&[10.into(), 20.into()]).unwrap(), Value::from(3));
  }

  #[test]
  fn aritize_truncates() {
    let f = aritize("arguments.length", 2).unwrap();
    assert_eq!(f.call(&[1.into(), 2.into(), 3.into()]).unwrap(), Value::from(2));
    assert_eq!(f.call(&[1.into()]).unwrap(), Value::from(1));
  }

  #[test]
  fn constant_and_identity() {
    assert_eq!(constant(Value::from(7)).call(&[1.into()]).unwrap(), Value::from(7));
    assert_eq!(identity().call(&[]).unwrap(), Value::Undefined);
  }
}
