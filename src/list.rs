use crate::{
  callable::AsCallable,
  error::Result,
  value::{Function, Value},
};

fn index(i: usize) -> Value {
  Value::Number(i as f64)
}

pub fn map(function: impl AsCallable, items: &[Value]) -> Result<Vec<Value>> {
  let function = function.as_callable()?;
  items
    .iter()
    .enumerate()
    .map(|(i, item)| function.call(&[item.clone(), index(i)]))
    .collect()
}

pub fn select(function: impl AsCallable, items: &[Value]) -> Result<Vec<Value>> {
  let function = function.as_callable()?;
  let mut selected = vec![];
  for (i, item) in items.iter().enumerate() {
    if function.call(&[item.clone(), index(i)])?.truthy() {
      selected.push(item.clone());
    }
  }
  Ok(selected)
}

/// Left fold; the callback receives `(accumulator, element, index)`.
pub fn reduce(function: impl AsCallable, init: Value, items: &[Value]) -> Result<Value> {
  let function = function.as_callable()?;
  items.iter().enumerate().try_fold(init, |acc, (i, item)| {
    function.call(&[acc, item.clone(), index(i)])
  })
}

/// Right fold; the callback receives `(element, accumulator)`.
pub fn foldr(function: impl AsCallable, init: Value, items: &[Value]) -> Result<Value> {
  let function = function.as_callable()?;
  items
    .iter()
    .rev()
    .try_fold(init, |acc, item| function.call(&[item.clone(), acc]))
}

pub fn some(function: impl AsCallable, items: &[Value]) -> Result<Value> {
  let function = function.as_callable()?;
  for (i, item) in items.iter().enumerate() {
    let value = function.call(&[item.clone(), index(i)])?;
    if value.truthy() {
      return Ok(value);
    }
  }
  Ok(Value::Bool(false))
}

/// `false` at the first falsy result, otherwise the last result (`true` when empty).
pub fn every(function: impl AsCallable, items: &[Value]) -> Result<Value> {
  let function = function.as_callable()?;
  let mut value = Value::Bool(true);
  for (i, item) in items.iter().enumerate() {
    value = function.call(&[item.clone(), index(i)])?;
    if !value.truthy() {
      return Ok(Value::Bool(false));
    }
  }
  Ok(value)
}

pub fn until(predicate: impl AsCallable, function: impl AsCallable) -> Result<Function> {
  let predicate = predicate.as_callable()?;
  let function = function.as_callable()?;
  Ok(Function::new(1, move |arguments| {
    let mut value = arguments.first().cloned().unwrap_or_default();
    while !predicate.call(std::slice::from_ref(&value))?.truthy() {
      value = function.call(std::slice::from_ref(&value))?;
    }
    Ok(value)
  }))
}

pub fn zip(lists: &[Vec<Value>]) -> Vec<Value> {
  let len = lists.iter().map(Vec::len).min().unwrap_or(0);
  (0..len)
    .map(|i| Value::from(lists.iter().map(|list| list[i].clone()).collect::<Vec<_>>()))
    .collect()
}

#[cfg(test)]
mod test {
  use pretty_assertions::assert_eq;

  use super::{every, foldr, map, reduce, select, some, until, zip};
  use crate::{error::Error, value::Value};

  fn numbers(values: &[i32]) -> Vec<Value> {
    values.iter().map(|n| Value::from(*n)).collect()
  }

  #[test]
  fn map_accepts_every_form() {
    let items = numbers(&[1, 2, 3]);
    assert_eq!(map("x -> x * 2", &items).unwrap(), numbers(&[2, 4, 6]));
    assert_eq!(map("_ * 2", &items).unwrap(), numbers(&[2, 4, 6]));
    assert_eq!(map("*2", &items).unwrap(), numbers(&[2, 4, 6]));
    assert_eq!(map("x * 2", &items).unwrap(), numbers(&[2, 4, 6]));
    assert_eq!(map("x, i -> i", &items).unwrap(), numbers(&[0, 1, 2]));
  }

  #[test]
  fn map_coerces_first() {
    assert!(matches!(map(Value::from(2), &[]), Err(Error::Type(_))));
  }

  #[test]
  fn select_keeps_truthy() {
    let items = numbers(&[1, 2, 3, 4]);
    assert_eq!(select("_ % 2", &items).unwrap(), numbers(&[1, 3]));
    assert_eq!(select(">2", &items).unwrap(), numbers(&[3, 4]));
  }

  #[test]
  fn folds() {
    let items = numbers(&[1, 2, 3]);
    assert_eq!(reduce("+", Value::from(0), &items).unwrap(), Value::from(6));
    assert_eq!(
      reduce("acc, x -> acc + x", Value::from(""), &items).unwrap(),
      Value::from("123")
    );
    assert_eq!(
      foldr("x, acc -> acc + x", Value::from(""), &items).unwrap(),
      Value::from("321")
    );
  }

  #[test]
  fn some_and_every() {
    let items = numbers(&[1, 2, 3]);
    assert_eq!(some(">2", &items).unwrap(), Value::Bool(true));
    assert_eq!(some(">5", &items).unwrap(), Value::Bool(false));
    assert_eq!(every(">0", &items).unwrap(), Value::Bool(true));
    assert_eq!(every(">1", &items).unwrap(), Value::Bool(false));
    assert_eq!(every(">1", &[]).unwrap(), Value::Bool(true));
  }

  #[test]
  fn until_iterates() {
    let f = until(">100", "*2").unwrap();
    assert_eq!(f.call(&[Value::from(3)]).unwrap(), Value::from(192));
  }

  #[test]
  fn zip_stops_at_shortest() {
    let rows = zip(&[numbers(&[1, 2, 3]), numbers(&[4, 5])]);
    assert_eq!(rows, vec![Value::from(numbers(&[1, 4])), Value::from(numbers(&[2, 5]))]);
    assert!(zip(&[]).is_empty());
  }
}
