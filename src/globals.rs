use std::{collections::HashMap, rc::Rc};

use crate::{
  loc::Name,
  value::{Function, Value},
};

#[derive(Clone, Debug, Default)]
pub struct Globals(Rc<HashMap<Name, Value>>);

thread_local! {
  static STANDARD: Globals = Globals::standard();
}

fn numeric(arity: usize, op: fn(&[f64]) -> f64) -> Value {
  Value::Function(Function::new(arity, move |arguments| {
    let numbers = arguments.iter().map(Value::to_number).collect::<Vec<_>>();
    Ok(Value::Number(op(&numbers)))
  }))
}

fn first(numbers: &[f64]) -> f64 {
  numbers.first().copied().unwrap_or(f64::NAN)
}

// a NaN anywhere makes the result NaN
fn extreme(numbers: &[f64], init: f64, pick: fn(f64, f64) -> f64) -> f64 {
  if numbers.iter().any(|num| num.is_nan()) {
    f64::NAN
  } else {
    numbers.iter().copied().fold(init, pick)
  }
}

impl Globals {
  pub fn empty() -> Self {
    Self::default()
  }

  pub fn standard() -> Self {
    let math = Value::object([
      ("PI", Value::Number(std::f64::consts::PI)),
      ("E", Value::Number(std::f64::consts::E)),
      ("max", numeric(2, |xs| extreme(xs, f64::NEG_INFINITY, f64::max))),
      ("min", numeric(2, |xs| extreme(xs, f64::INFINITY, f64::min))),
      ("abs", numeric(1, |xs| first(xs).abs())),
      ("floor", numeric(1, |xs| first(xs).floor())),
      ("ceil", numeric(1, |xs| first(xs).ceil())),
      ("round", numeric(1, |xs| (first(xs) + 0.5).floor())),
      ("sqrt", numeric(1, |xs| first(xs).sqrt())),
      (
        "pow",
        numeric(2, |xs| first(xs).powf(xs.get(1).copied().unwrap_or(f64::NAN))),
      ),
    ]);

    Self::empty()
      .with("Math", math)
      .with(
        "String",
        Value::Function(Function::new(1, |arguments| {
          let text = arguments.first().map(Value::to_string).unwrap_or_default();
          Ok(Value::from(text))
        })),
      )
      .with(
        "Number",
        Value::Function(Function::new(1, |arguments| {
          let num = arguments.first().map_or(0.0, Value::to_number);
          Ok(Value::Number(num))
        })),
      )
      .with(
        "Array",
        Value::Function(Function::new(0, |arguments| Ok(Value::from(arguments.to_vec())))),
      )
      .with(
        "isNaN",
        Value::Function(Function::new(1, |arguments| {
          let num = arguments.first().map_or(f64::NAN, Value::to_number);
          Ok(Value::Bool(num.is_nan()))
        })),
      )
  }

  pub fn shared() -> Self {
    STANDARD.with(Globals::clone)
  }

  pub fn with(mut self, name: impl Into<Name>, value: Value) -> Self {
    Rc::make_mut(&mut self.0).insert(name.into(), value);
    self
  }

  pub fn get(&self, name: &str) -> Option<&Value> {
    self.0.get(name)
  }
}

#[cfg(test)]
mod test {
  use pretty_assertions::assert_eq;

  use super::Globals;
  use crate::value::Value;

  fn call(globals: &Globals, path: &[&str], arguments: &[Value]) -> Value {
    let mut value = globals.get(path[0]).cloned().unwrap();
    for name in &path[1..] {
      value = value.property(name).unwrap();
    }
    match value {
      Value::Function(function) => function.call(arguments).unwrap(),
      other => panic!("{other:?} is not callable"),
    }
  }

  #[test]
  fn math_functions() {
    let globals = Globals::standard();
    let max = call(&globals, &["Math", "max"], &[1.into(), 5.into(), 3.into()]);
    assert_eq!(max, Value::from(5));
    let min = call(&globals, &["Math", "min"], &[]);
    assert_eq!(min, Value::Number(f64::INFINITY));
    let pow = call(&globals, &["Math", "pow"], &[2.into(), 10.into()]);
    assert_eq!(pow, Value::from(1024));
  }

  #[test]
  fn extremes_propagate_nan() {
    let globals = Globals::standard();
    for name in ["max", "min"] {
      let result = call(&globals, &["Math", name], &[1.into(), Value::from(f64::NAN)]);
      assert!(matches!(result, Value::Number(num) if num.is_nan()));
    }
    let max = call(&globals, &["Math", "max"], &[1.into(), Value::from("x")]);
    assert!(matches!(max, Value::Number(num) if num.is_nan()));
  }

  #[test]
  fn conversions() {
    let globals = Globals::standard();
    assert_eq!(call(&globals, &["String"], &[Value::from(1.5)]), Value::from("1.5"));
    assert_eq!(call(&globals, &["Number"], &[Value::from(" 42 ")]), Value::from(42));
    assert_eq!(
      call(&globals, &["Array"], &[1.into(), 2.into()]),
      Value::from(vec![Value::from(1), Value::from(2)])
    );
  }

  #[test]
  fn custom_scope() {
    let globals = Globals::empty().with("answer", Value::from(42));
    assert_eq!(globals.get("answer"), Some(&Value::from(42)));
    assert_eq!(globals.get("Math"), None);
  }
}
